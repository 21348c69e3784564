/*
stage.rs

Copyright 2025 Hervé Quatremain

This file is part of Kanjimerge.

Kanjimerge is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Kanjimerge is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Kanjimerge. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Run one stage: the board session state machine.
//!
//! The player activates cells one at a time.
//! Depending on the current [`Mode`], activating a cell selects a part, moves it, proposes or
//! confirms a merge, splits a part, or sends a part to the goal.
//! Each activation returns the list of [`BoardEvent`] values that describe what happened, for
//! the presentation layer to render.
//!
//! Rejected actions are not errors: they are reported as events and raise the
//! invalid-action indicator over the involved cells.

use log::{debug, info};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::board::{Board, BoardPart, PartClass, PartId};
use crate::feedback::{FeedbackToken, InvalidActionFeedback};
use crate::generator::stage_parts::{StageParts, stage_parts};
use crate::goal::GoalState;
use crate::kanji::catalog::CatalogEntry;
use crate::kanji::decomposer::constituents_of;
use crate::kanji::merger::judge;
use crate::library::Library;

/// Proposed merge, waiting for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMerge {
    /// Part that the player selected first.
    pub source: PartId,

    /// Part that the player activated next. Activating it again confirms the merge.
    pub target: PartId,

    /// Result of the merge.
    pub preview: String,
}

/// Selection mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    NoSelection,
    Selected(PartId),
    PendingMerge(PendingMerge),
}

/// Reason why a part cannot be split.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SplitRejection {
    /// The character has no constituents.
    Indivisible,

    /// The board has no empty cell for the second constituent.
    NoFreeCell,
}

/// What happened after a cell activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardEvent {
    PartSelected {
        cell: usize,
        glyph: String,
    },

    PartMoved {
        from: usize,
        to: usize,
        glyph: String,
    },

    /// Two parts combine. The board does not change until the merge is confirmed.
    MergeProposed {
        source_cell: usize,
        target_cell: usize,
        preview: String,
    },

    /// The player activated another cell while a merge was pending.
    MergeCancelled {
        preview: String,
    },

    /// The two parts are replaced by their combination.
    /// When `absorbed` is true, the combination went to the goal instead of the board.
    MergeConfirmed {
        cell: usize,
        glyph: String,
        absorbed: bool,
    },

    MergeRejected {
        cells: [usize; 2],
        left: String,
        right: String,
        token: FeedbackToken,
    },

    /// The part is replaced by its two constituents.
    SplitSucceeded {
        glyph: String,
        left: (usize, String),
        right: (usize, String),
    },

    SplitRejected {
        cell: usize,
        glyph: String,
        reason: SplitRejection,
        token: FeedbackToken,
    },

    GoalSlotFilled {
        index: usize,
        glyph: String,
        cell: usize,
    },

    StageCleared {
        entry_id: String,
    },

    /// The cleared stage filled the badge gauge.
    /// Emitted by [`crate::game::Game`], never by the stage session itself.
    BadgeUnlocked {
        index: usize,
        glyph: String,
    },
}

impl BoardEvent {
    /// Whether the event reports a rejected action.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BoardEvent::MergeRejected { .. } | BoardEvent::SplitRejected { .. }
        )
    }
}

/// State of a stage in progress.
#[derive(Debug)]
pub struct StageSession {
    /// Static data, shared with the other sessions.
    library: Arc<Library>,

    /// Stage ordinal in the playlist.
    stage: usize,

    board: Board,
    goal: GoalState,
    mode: Mode,

    /// Whether all the goal components are filled. No more action is accepted.
    cleared: bool,

    feedback: InvalidActionFeedback,
}

impl StageSession {
    /// Create a [`StageSession`] object with the given board.
    pub fn new(library: Arc<Library>, entry: CatalogEntry, stage: usize, board: Board) -> Self {
        let duration: Duration = Duration::from_millis(library.settings.feedback_millis);
        Self {
            library,
            stage,
            board,
            goal: GoalState::new(entry),
            mode: Mode::NoSelection,
            cleared: false,
            feedback: InvalidActionFeedback::new(duration),
        }
    }

    /// Create a [`StageSession`] object, with the starting parts scattered on the board.
    pub fn seeded<R: Rng + ?Sized>(
        library: Arc<Library>,
        entry: CatalogEntry,
        stage: usize,
        rng: &mut R,
    ) -> Self {
        let board: Board = Self::seed_board(&library, &entry, stage, rng);
        info!("Stage {stage}: {} ({})", entry.form, entry.id);
        Self::new(library, entry, stage, board)
    }

    /// Build a board with the starting parts of the entry.
    fn seed_board<R: Rng + ?Sized>(
        library: &Library,
        entry: &CatalogEntry,
        stage: usize,
        rng: &mut R,
    ) -> Board {
        let parts: StageParts = stage_parts(
            entry,
            stage,
            &library.dictionary,
            &library.confusables,
            &library.settings,
            rng,
        );
        let mut board: Board = Board::new(library.settings.grid_size);
        board.scatter(&parts.all(), rng);
        board
    }

    /// Restart the stage with a new board. Pending feedback is cancelled.
    pub fn restart<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let entry: CatalogEntry = self.goal.target().clone();
        self.board = Self::seed_board(&self.library, &entry, self.stage, rng);
        self.goal = GoalState::new(entry);
        self.mode = Mode::NoSelection;
        self.cleared = false;
        self.feedback.cancel();
        debug!("Stage {} restarted", self.stage);
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn goal(&self) -> &GoalState {
        &self.goal
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Return the stage ordinal.
    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    /// Return the invalid-action indicator.
    pub fn feedback(&self) -> &InvalidActionFeedback {
        &self.feedback
    }

    /// Clear the invalid-action indicator identified by the token, if still visible.
    pub fn expire_feedback(&mut self, token: FeedbackToken) -> bool {
        self.feedback.expire(token)
    }

    /// Clear the invalid-action indicator if its display time is over.
    pub fn poll_feedback(&mut self, now: Instant) -> bool {
        self.feedback.poll(now)
    }

    /// Return the selected part, if any. During a pending merge, this is the source part.
    pub fn selected(&self) -> Option<&BoardPart> {
        match &self.mode {
            Mode::NoSelection => None,
            Mode::Selected(id) => self.board.part(*id),
            Mode::PendingMerge(p) => self.board.part(p.source),
        }
    }

    /// Process the activation of a cell by the player.
    ///
    /// Activations are ignored once the stage is cleared, and for cells outside the board.
    pub fn activate(&mut self, cell: usize) -> Vec<BoardEvent> {
        let mut events: Vec<BoardEvent> = Vec::new();
        if self.cleared || cell >= self.board.size() {
            return events;
        }

        if let Mode::PendingMerge(pending) = &self.mode {
            let pending: PendingMerge = pending.clone();
            if self.board.cell_of(pending.target) == Some(cell) {
                self.confirm_merge(pending, &mut events);
                return events;
            }
            // Cancel, and then process the activation as usual
            events.push(BoardEvent::MergeCancelled {
                preview: pending.preview,
            });
            self.mode = Mode::Selected(pending.source);
        }

        let clicked: Option<BoardPart> = self.board.get(cell).cloned();
        let selected: Option<PartId> = match self.mode {
            Mode::Selected(id) => Some(id),
            _ => None,
        };

        // A part that completes the goal goes there directly, unless the player is
        // re-activating the selected part
        if let Some(part) = &clicked {
            if selected != Some(part.id) {
                if let Some(index) = self.goal.fill(&part.glyph) {
                    self.board.remove(part.id);
                    self.mode = Mode::NoSelection;
                    events.push(BoardEvent::GoalSlotFilled {
                        index,
                        glyph: part.glyph.clone(),
                        cell,
                    });
                    self.check_cleared(&mut events);
                    return events;
                }
            }
        }

        let Some(selected) = selected else {
            if let Some(part) = clicked {
                self.mode = Mode::Selected(part.id);
                events.push(BoardEvent::PartSelected {
                    cell,
                    glyph: part.glyph,
                });
            }
            return events;
        };
        let Some(source) = self.board.part(selected).cloned() else {
            self.mode = Mode::NoSelection;
            return events;
        };

        match clicked {
            Some(part) if part.id == source.id => self.split(part, &mut events),
            None => {
                if self.board.move_part(source.id, cell) {
                    events.push(BoardEvent::PartMoved {
                        from: source.cell,
                        to: cell,
                        glyph: source.glyph,
                    });
                }
                self.mode = Mode::NoSelection;
            }
            Some(part) => match judge(&self.library.dictionary, &source.glyph, &part.glyph) {
                Ok(preview) => {
                    events.push(BoardEvent::MergeProposed {
                        source_cell: source.cell,
                        target_cell: cell,
                        preview: preview.clone(),
                    });
                    self.mode = Mode::PendingMerge(PendingMerge {
                        source: source.id,
                        target: part.id,
                        preview,
                    });
                }
                Err(e) => {
                    debug!("Merge rejected: {e}");
                    let cells: [usize; 2] = [source.cell, cell];
                    let token: FeedbackToken = self.feedback.raise(&cells, Instant::now());
                    events.push(BoardEvent::MergeRejected {
                        cells,
                        left: source.glyph,
                        right: part.glyph,
                        token,
                    });
                    self.mode = Mode::NoSelection;
                }
            },
        }
        events
    }

    /// Replace the two parts of a pending merge by their combination.
    ///
    /// When the combination fills a goal component, it is absorbed and not placed on the board.
    fn confirm_merge(&mut self, pending: PendingMerge, events: &mut Vec<BoardEvent>) {
        let cell: Option<usize> = self.board.cell_of(pending.target);
        self.board.remove(pending.source);
        self.board.remove(pending.target);
        self.mode = Mode::NoSelection;

        let Some(cell) = cell else {
            return;
        };
        match self.goal.fill(&pending.preview) {
            Some(index) => {
                events.push(BoardEvent::MergeConfirmed {
                    cell,
                    glyph: pending.preview.clone(),
                    absorbed: true,
                });
                events.push(BoardEvent::GoalSlotFilled {
                    index,
                    glyph: pending.preview,
                    cell,
                });
                self.check_cleared(events);
            }
            None => {
                self.board
                    .spawn(&pending.preview, PartClass::Composed, cell);
                events.push(BoardEvent::MergeConfirmed {
                    cell,
                    glyph: pending.preview,
                    absorbed: false,
                });
            }
        }
    }

    /// Replace the part by its two constituents. The second constituent goes to the first
    /// empty cell.
    fn split(&mut self, part: BoardPart, events: &mut Vec<BoardEvent>) {
        let rejection: Option<SplitRejection> =
            match constituents_of(&self.library.dictionary, &part.glyph) {
                None => Some(SplitRejection::Indivisible),
                Some((left, right)) => match self.board.first_empty() {
                    None => Some(SplitRejection::NoFreeCell),
                    Some(free) => {
                        self.board.remove(part.id);
                        self.board.spawn(&left, PartClass::Raw, part.cell);
                        self.board.spawn(&right, PartClass::Raw, free);
                        self.mode = Mode::NoSelection;
                        events.push(BoardEvent::SplitSucceeded {
                            glyph: part.glyph.clone(),
                            left: (part.cell, left),
                            right: (free, right),
                        });
                        None
                    }
                },
            };

        // The selection stays
        if let Some(reason) = rejection {
            debug!("Cannot split {}: {reason:?}", part.glyph);
            let token: FeedbackToken = self.feedback.raise(&[part.cell], Instant::now());
            events.push(BoardEvent::SplitRejected {
                cell: part.cell,
                glyph: part.glyph,
                reason,
                token,
            });
        }
    }

    fn check_cleared(&mut self, events: &mut Vec<BoardEvent>) {
        if self.goal.is_cleared() {
            self.cleared = true;
            self.mode = Mode::NoSelection;
            self.feedback.cancel();
            info!("Stage {} cleared: {}", self.stage, self.goal.target().form);
            events.push(BoardEvent::StageCleared {
                entry_id: self.goal.target().id.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn library() -> Arc<Library> {
        Arc::new(Library::embedded(Settings::default()).unwrap())
    }

    fn entry(components: &[&str]) -> CatalogEntry {
        CatalogEntry {
            id: String::from("test"),
            form: components.concat(),
            components: components.iter().map(|c| c.to_string()).collect(),
            ..CatalogEntry::fallback()
        }
    }

    /// Create a session with the given parts at the given cells.
    fn session(size: usize, goal: &[&str], parts: &[(usize, &str)]) -> StageSession {
        let mut board = Board::new(size);
        for (cell, glyph) in parts {
            board.spawn(glyph, PartClass::Raw, *cell).unwrap();
        }
        StageSession::new(library(), entry(goal), 5, board)
    }

    fn glyph_at(session: &StageSession, cell: usize) -> Option<&str> {
        session.board().get(cell).map(|p| p.glyph.as_str())
    }

    #[test]
    fn test_merge_then_confirm() {
        let mut s = session(16, &["林"], &[(0, "一"), (1, "一")]);

        assert_eq!(
            s.activate(0),
            vec![BoardEvent::PartSelected {
                cell: 0,
                glyph: String::from("一")
            }]
        );
        assert_eq!(
            s.activate(1),
            vec![BoardEvent::MergeProposed {
                source_cell: 0,
                target_cell: 1,
                preview: String::from("二")
            }]
        );
        assert!(matches!(s.mode(), Mode::PendingMerge(p) if p.preview == "二"));
        assert_eq!(s.board().parts().count(), 2);

        let events = s.activate(1);
        assert_eq!(
            events,
            vec![BoardEvent::MergeConfirmed {
                cell: 1,
                glyph: String::from("二"),
                absorbed: false
            }]
        );
        assert_eq!(s.board().parts().count(), 1);
        assert_eq!(glyph_at(&s, 1), Some("二"));
        assert_eq!(s.board().get(1).unwrap().class, PartClass::Composed);
        assert_eq!(s.mode(), &Mode::NoSelection);
        assert!(!s.is_cleared());
    }

    #[test]
    fn test_merge_clears_stage() {
        let mut s = session(16, &["二"], &[(3, "一"), (7, "一")]);
        s.activate(3);
        s.activate(7);
        let events = s.activate(7);

        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[0],
            BoardEvent::MergeConfirmed { absorbed: true, .. }
        ));
        assert!(matches!(
            &events[1],
            BoardEvent::GoalSlotFilled { index: 0, .. }
        ));
        assert_eq!(
            events[2],
            BoardEvent::StageCleared {
                entry_id: String::from("test")
            }
        );
        assert!(s.is_cleared());
        assert_eq!(s.board().parts().count(), 0);
        assert!(s.activate(0).is_empty());
    }

    #[test]
    fn test_goal_absorbs_parts() {
        let mut s = session(16, &["三", "三"], &[(0, "三"), (1, "三"), (2, "三")]);

        assert!(matches!(
            s.activate(0)[..],
            [BoardEvent::GoalSlotFilled { index: 0, .. }]
        ));
        let events = s.activate(1);
        assert!(matches!(
            events[..],
            [
                BoardEvent::GoalSlotFilled { index: 1, .. },
                BoardEvent::StageCleared { .. }
            ]
        ));
        assert!(s.is_cleared());
        // The extra part stays and is ignored
        assert!(s.activate(2).is_empty());
        assert_eq!(glyph_at(&s, 2), Some("三"));
    }

    #[test]
    fn test_goal_takes_priority_over_merge() {
        let mut s = session(16, &["日", "月"], &[(0, "月"), (1, "日")]);
        s.goal.fill("月");
        s.activate(0);

        // 月 is selected and 日 completes the goal: no merge into 明
        let events = s.activate(1);
        assert!(matches!(
            events[..],
            [BoardEvent::GoalSlotFilled { index: 0, .. }, BoardEvent::StageCleared { .. }]
        ));
    }

    #[test]
    fn test_split_then_merge_back() {
        let mut s = session(16, &["林"], &[(4, "明")]);
        s.activate(4);

        let events = s.activate(4);
        assert_eq!(
            events,
            vec![BoardEvent::SplitSucceeded {
                glyph: String::from("明"),
                left: (4, String::from("日")),
                right: (0, String::from("月")),
            }]
        );
        assert_eq!(s.mode(), &Mode::NoSelection);

        s.activate(4);
        s.activate(0);
        s.activate(0);
        assert_eq!(s.board().parts().count(), 1);
        assert_eq!(glyph_at(&s, 0), Some("明"));
    }

    #[test]
    fn test_split_rejections() {
        let mut s = session(2, &["林"], &[(0, "一"), (1, "明")]);

        s.activate(0);
        let events = s.activate(0);
        assert!(matches!(
            events[..],
            [BoardEvent::SplitRejected {
                reason: SplitRejection::Indivisible,
                cell: 0,
                ..
            }]
        ));
        assert!(events[0].is_rejection());
        assert_eq!(s.selected().map(|p| p.glyph.as_str()), Some("一"));
        assert_eq!(s.feedback().cells(), &[0]);

        // 一 and 明 do not combine
        s.activate(1);
        s.activate(1);
        let events = s.activate(1);
        assert!(matches!(
            events[..],
            [BoardEvent::SplitRejected {
                reason: SplitRejection::NoFreeCell,
                ..
            }]
        ));
        assert_eq!(glyph_at(&s, 1), Some("明"));
        assert_eq!(s.feedback().rejections(), 3);
    }

    #[test]
    fn test_merge_rejected() {
        let mut s = session(16, &["林"], &[(0, "水"), (5, "金")]);
        s.activate(0);
        let events = s.activate(5);

        let BoardEvent::MergeRejected { cells, token, .. } = &events[0] else {
            panic!("unexpected events {events:?}");
        };
        assert_eq!(cells, &[0, 5]);
        assert_eq!(s.mode(), &Mode::NoSelection);
        assert_eq!(s.feedback().cells(), &[0, 5]);
        assert!(s.expire_feedback(*token));
        assert!(!s.expire_feedback(*token));
        assert_eq!(s.board().parts().count(), 2);
    }

    #[test]
    fn test_move_and_cancel() {
        let mut s = session(16, &["林"], &[(0, "一"), (1, "一")]);

        s.activate(0);
        assert!(matches!(
            s.activate(9)[..],
            [BoardEvent::PartMoved { from: 0, to: 9, .. }]
        ));
        assert_eq!(glyph_at(&s, 9), Some("一"));
        assert_eq!(s.mode(), &Mode::NoSelection);

        // Activating an empty cell during a pending merge cancels it and moves the source
        s.activate(9);
        s.activate(1);
        let events = s.activate(3);
        assert_eq!(
            events,
            vec![
                BoardEvent::MergeCancelled {
                    preview: String::from("二")
                },
                BoardEvent::PartMoved {
                    from: 9,
                    to: 3,
                    glyph: String::from("一")
                }
            ]
        );
        assert_eq!(s.board().parts().count(), 2);
    }

    #[test]
    fn test_empty_and_out_of_range_cells() {
        let mut s = session(4, &["林"], &[(0, "木")]);
        assert!(s.activate(2).is_empty());
        assert!(s.activate(99).is_empty());
        assert_eq!(s.mode(), &Mode::NoSelection);
    }

    #[test]
    fn test_seeded_and_restart() {
        let library = library();
        let entry = library.resolve("w-0005").unwrap().clone();
        let mut rng = StdRng::seed_from_u64(11);
        let mut s = StageSession::seeded(library, entry, 20, &mut rng);

        // 日 月 日 and three distractors
        assert_eq!(s.board().parts().count(), 6);
        let cell = s.board().parts().next().unwrap().cell;
        s.activate(cell);
        s.restart(&mut rng);
        assert_eq!(s.board().parts().count(), 6);
        assert!(s.goal().filled().is_empty());
        assert_eq!(s.feedback().rejections(), 0);
    }
}

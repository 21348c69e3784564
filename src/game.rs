/*
game.rs

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

//! Manage the play-through in progress.
//!
//! The [`Game`] object ties the static data, the player's [`Progress`], and the current
//! [`StageSession`] together.
//! It generates the playlist when needed, resolves the catalog entry of each stage, and
//! records the player's collection and badges as stages are played.

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use strum_macros::Display;

use crate::badges::Badge;
use crate::config::DifficultyMode;
use crate::generator::playlist::{Playlist, PlaylistGenerator};
use crate::kanji::catalog::CatalogEntry;
use crate::library::Library;
use crate::progress::Progress;
use crate::stage::{BoardEvent, StageSession};

/// Reason for generating a new playlist.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Display)]
pub enum Regeneration {
    /// No playlist yet, or a playlist saved with other settings.
    Empty,

    /// The player completed the last stage.
    Loop,

    /// The playlist references an entry that the catalog does not have.
    DataMismatch,

    /// The player asked for a new play-through.
    Reset,

    /// The player changed the difficulty mode.
    ModeChange,
}

/// Play-through in progress.
#[derive(Debug)]
pub struct Game {
    /// Static data, shared with the stage sessions.
    library: Arc<Library>,

    progress: Progress,

    /// Current stage. None until [`Game::start`].
    session: Option<StageSession>,

    rng: StdRng,
}

impl Game {
    /// Create a [`Game`] object.
    pub fn new(library: Arc<Library>, progress: Progress) -> Self {
        Self::with_rng(library, progress, StdRng::from_rng(&mut rand::rng()))
    }

    /// Create a [`Game`] object that uses the given random generator.
    pub fn with_rng(library: Arc<Library>, progress: Progress, rng: StdRng) -> Self {
        Self {
            library,
            progress,
            session: None,
            rng,
        }
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Return the current stage.
    pub fn session(&self) -> Option<&StageSession> {
        self.session.as_ref()
    }

    /// Load the current stage of the saved progress.
    pub fn start(&mut self) {
        self.ensure_playlist();
        let stage: usize = if self.progress.stage < self.progress.playlist.len() {
            self.progress.stage
        } else {
            0
        };
        self.load_stage(stage);
    }

    /// Generate a playlist when there is none, or when it was generated with other settings.
    fn ensure_playlist(&mut self) {
        if self.progress.playlist.len() != self.library.settings.total_stages {
            self.regenerate(Regeneration::Empty);
        }
    }

    /// Generate a new playlist. Recently played entries are drawn last.
    pub fn regenerate(&mut self, reason: Regeneration) {
        let playlist: Playlist = PlaylistGenerator::new(
            &self.library.catalog,
            &self.library.settings,
            self.progress.mode,
        )
        .avoid(self.progress.recent())
        .generate(&mut self.rng);
        info!("New playlist ({reason})");
        self.progress.playlist = playlist;
    }

    /// Return the catalog entry for the given stage.
    ///
    /// When the playlist references an unknown entry, the playlist is regenerated once.
    /// If the entry still cannot be resolved, the fallback entry is returned.
    fn resolve(&mut self, stage: usize) -> CatalogEntry {
        if let Some(entry) = self.lookup(stage) {
            return entry;
        }
        warn!(
            "Stage {stage}: entry {:?} not found in the catalog",
            self.progress.playlist.get(stage)
        );
        self.regenerate(Regeneration::DataMismatch);
        match self.lookup(stage) {
            Some(entry) => entry,
            None => {
                warn!("Stage {stage}: using the fallback entry");
                CatalogEntry::fallback()
            }
        }
    }

    fn lookup(&self, stage: usize) -> Option<CatalogEntry> {
        let id: &str = self.progress.playlist.get(stage)?;
        self.library.resolve(id).cloned()
    }

    /// Start the given stage with a fresh board.
    ///
    /// Loading a stage does not unlock it: only clearing the previous stage does.
    pub fn load_stage(&mut self, stage: usize) {
        let entry: CatalogEntry = self.resolve(stage);
        self.progress.enter(stage);
        self.progress
            .push_recent(&entry.id, self.library.settings.history_size);
        self.session = Some(StageSession::seeded(
            Arc::clone(&self.library),
            entry,
            stage,
            &mut self.rng,
        ));
    }

    /// Process the activation of a cell in the current stage, and record the discoveries.
    ///
    /// Intermediate nodes are not characters, and are never added to the collection.
    /// When the cleared stage fills the badge gauge, a [`BoardEvent::BadgeUnlocked`] event is
    /// appended.
    pub fn activate(&mut self, cell: usize) -> Vec<BoardEvent> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let stage: usize = session.stage();
        let mut events: Vec<BoardEvent> = session.activate(cell);
        let mut badge: Option<Badge> = None;

        for event in &events {
            match event {
                BoardEvent::MergeConfirmed { glyph, .. } => {
                    if !self.library.dictionary.is_intermediate(glyph) {
                        self.progress.discover(glyph);
                    }
                }
                BoardEvent::StageCleared { entry_id } => {
                    self.progress.complete(entry_id);
                    self.progress.unlock(stage + 1);
                    badge = self.progress.charge_gauge();
                    self.progress.touch();
                }
                _ => (),
            }
        }
        if let Some(badge) = badge {
            events.push(BoardEvent::BadgeUnlocked {
                index: badge.index,
                glyph: badge.glyph.to_string(),
            });
        }
        events
    }

    /// Clear the invalid-action indicator of the current stage if its display time is over.
    pub fn poll_feedback(&mut self, now: Instant) -> bool {
        self.session
            .as_mut()
            .is_some_and(|s| s.poll_feedback(now))
    }

    /// Move to the next stage.
    ///
    /// After the last stage, a new playlist is generated and the play-through starts over.
    pub fn advance(&mut self) {
        let next: usize = self.session.as_ref().map_or(0, |s| s.stage() + 1);
        if next < self.progress.playlist.len() {
            self.load_stage(next);
            return;
        }
        self.progress.loops += 1;
        info!("Play-through {} completed", self.progress.loops);
        self.progress.restart_run();
        self.regenerate(Regeneration::Loop);
        self.load_stage(0);
    }

    /// Restart the current stage with a new board.
    pub fn restart_stage(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.restart(&mut self.rng);
        }
    }

    /// Start a new play-through. The collection is kept.
    pub fn reset(&mut self) {
        self.progress.restart_run();
        self.regenerate(Regeneration::Reset);
        self.load_stage(0);
    }

    /// Change the difficulty mode, and start a new play-through.
    pub fn set_difficulty_mode(&mut self, mode: DifficultyMode) {
        if mode == self.progress.mode {
            return;
        }
        self.progress.mode = mode;
        self.progress.restart_run();
        self.regenerate(Regeneration::ModeChange);
        self.load_stage(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::STAGES_PER_BADGE;
    use crate::board::{Board, PartClass};
    use crate::config::{FALLBACK_ENTRY_ID, Settings};

    fn game(settings: Settings, progress: Progress) -> Game {
        let library = Arc::new(Library::embedded(settings).unwrap());
        Game::with_rng(library, progress, StdRng::seed_from_u64(42))
    }

    /// Replace the current stage with a board that holds the given parts.
    fn install(game: &mut Game, goal: &[&str], parts: &[(usize, &str)]) {
        let mut board = Board::new(16);
        for (cell, glyph) in parts {
            board.spawn(glyph, PartClass::Raw, *cell).unwrap();
        }
        let entry = CatalogEntry {
            id: String::from("test"),
            form: goal.concat(),
            components: goal.iter().map(|c| c.to_string()).collect(),
            ..CatalogEntry::fallback()
        };
        let stage = game.progress.stage;
        game.session = Some(StageSession::new(
            Arc::clone(&game.library),
            entry,
            stage,
            board,
        ));
    }

    /// Activate cells until the current stage is cleared.
    fn solve(game: &mut Game) {
        for _ in 0..200 {
            let session = game.session().unwrap();
            if session.is_cleared() {
                return;
            }
            // Send any goal part to the goal, otherwise merge the first pair that combines
            let goal = session.goal();
            let library = game.library();
            let parts: Vec<(usize, String)> = session
                .board()
                .parts()
                .map(|p| (p.cell, p.glyph.clone()))
                .collect();
            if let Some((cell, _)) = parts.iter().find(|(_, g)| goal.accepts(g).is_some()) {
                let cell = *cell;
                game.activate(cell);
                continue;
            }
            let pair = parts.iter().enumerate().find_map(|(i, (a, ga))| {
                parts[i + 1..].iter().find_map(|(b, gb)| {
                    crate::kanji::merger::judge(&library.dictionary, ga, gb)
                        .ok()
                        .map(|_| (*a, *b))
                })
            });
            let (a, b) = pair.expect("no merge available");
            game.activate(a);
            game.activate(b);
            game.activate(b);
        }
        panic!("stage not cleared");
    }

    #[test]
    fn test_start_generates_playlist() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();

        assert_eq!(game.progress().playlist.len(), 100);
        let session = game.session().unwrap();
        assert_eq!(session.stage(), 0);
        assert_eq!(session.goal().target().id, "tutorial-01");
        assert_eq!(game.progress().recent().back().unwrap(), "tutorial-01");
    }

    #[test]
    fn test_tutorials_can_be_played() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();

        for stage in 0..3 {
            assert_eq!(game.session().unwrap().stage(), stage);
            solve(&mut game);
            assert!(game.progress().completed().contains(&format!("tutorial-0{}", stage + 1)));
            game.advance();
        }
        assert!(game.progress().discovered().contains("二"));
        assert_eq!(game.progress().furthest, 3);
    }

    #[test]
    fn test_loop_back_regenerates() {
        let settings = Settings {
            total_stages: 4,
            ..Default::default()
        };
        let mut game = game(settings, Progress::new());
        game.start();
        let first = game.progress().playlist.clone();

        for _ in 0..4 {
            game.advance();
        }
        // Back to the first stage of a new play-through
        assert_eq!(game.progress().loops, 1);
        assert_eq!(game.session().unwrap().stage(), 0);
        assert_eq!(game.progress().playlist.len(), 4);
        assert_eq!(&game.progress().playlist.ids()[..3], &first.ids()[..3]);
    }

    #[test]
    fn test_data_mismatch() {
        let mut progress = Progress::new();
        let mut ids: Vec<String> = vec![String::from("tutorial-01"); 100];
        ids[5] = String::from("removed-entry");
        progress.playlist = Playlist::from_ids(ids);
        progress.stage = 5;

        let mut game = game(Settings::default(), progress);
        game.start();

        let session = game.session().unwrap();
        assert_eq!(session.stage(), 5);
        assert_ne!(session.goal().target().id, "removed-entry");
        assert!(game.library().resolve(&session.goal().target().id).is_some());
    }

    #[test]
    fn test_fallback_entry() {
        // A playlist beyond the catalog cannot be resolved, even after regeneration
        let settings = Settings {
            total_stages: 2,
            ..Default::default()
        };
        let mut game = game(settings, Progress::new());
        game.start();
        game.load_stage(7);

        let session = game.session().unwrap();
        assert_eq!(session.goal().target().id, FALLBACK_ENTRY_ID);
        assert!(!session.board().parts().collect::<Vec<_>>().is_empty());
        assert_eq!(game.progress().furthest, 0);
    }

    #[test]
    fn test_skipping_does_not_unlock() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();
        for _ in 0..3 {
            game.advance();
        }
        assert_eq!(game.progress().stage, 3);
        assert_eq!(game.progress().furthest, 0);

        install(&mut game, &["二"], &[(0, "一"), (1, "一")]);
        game.activate(0);
        game.activate(1);
        game.activate(1);
        assert!(game.session().unwrap().is_cleared());
        assert_eq!(game.progress().furthest, 4);
    }

    #[test]
    fn test_intermediates_are_not_discovered() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();
        install(&mut game, &["品"], &[(0, "口"), (1, "口"), (2, "口")]);

        game.activate(0);
        game.activate(1);
        let events = game.activate(1);
        assert!(matches!(
            &events[..],
            [BoardEvent::MergeConfirmed { glyph, absorbed: false, .. }] if glyph == "&品-1"
        ));
        assert!(game.progress().discovered().is_empty());

        game.activate(2);
        game.activate(1);
        game.activate(1);
        assert!(game.session().unwrap().is_cleared());
        assert_eq!(
            game.progress().discovered().iter().collect::<Vec<_>>(),
            vec!["品"]
        );
    }

    #[test]
    fn test_badge_unlocked_every_ten_clears() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();

        for round in 1..=STAGES_PER_BADGE {
            install(&mut game, &["二"], &[(0, "一"), (1, "一")]);
            game.activate(0);
            game.activate(1);
            let events = game.activate(1);
            assert!(events.iter().any(|e| matches!(e, BoardEvent::StageCleared { .. })));

            let badge = events.iter().find_map(|e| match e {
                BoardEvent::BadgeUnlocked { index, glyph } => Some((*index, glyph.as_str())),
                _ => None,
            });
            if round < STAGES_PER_BADGE {
                assert_eq!(badge, None);
                assert_eq!(game.progress().gauge, round);
            } else {
                assert_eq!(badge, Some((0, "あ")));
                // The badge is the last event
                assert!(matches!(events.last(), Some(BoardEvent::BadgeUnlocked { .. })));
            }
        }
        assert_eq!(game.progress().gauge, 0);
        assert_eq!(game.progress().badges, 1);
    }

    #[test]
    fn test_mode_change() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();
        game.advance();
        game.set_difficulty_mode(DifficultyMode::Easy);

        assert_eq!(game.progress().mode, DifficultyMode::Easy);
        assert_eq!(game.progress().stage, 0);
        let first = game.session().unwrap().goal().target();
        assert!(!first.id.starts_with("tutorial"));
        assert!(first.difficulty <= 3);
    }

    #[test]
    fn test_reset_keeps_collection() {
        let mut game = game(Settings::default(), Progress::new());
        game.start();
        solve(&mut game);
        game.advance();
        game.reset();

        assert_eq!(game.progress().stage, 0);
        assert_eq!(game.progress().furthest, 0);
        assert_eq!(game.progress().completed().len(), 1);
    }
}

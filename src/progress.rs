/*
progress.rs

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

//! Track the progress of the player.
//!
//! The main object, [`Progress`], records the position in the play-through, the generated
//! playlist, the recently played entries, the player's collection (discovered characters
//! and completed words), and the badge gauge.
//! This object is saved after each stage and restored when Kanjimerge starts.
//! See the [`crate::saver::progress`] module that saves and restores the [`Progress`] object.

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

use crate::badges::{Badge, STAGES_PER_BADGE};
use crate::config::DifficultyMode;
use crate::generator::playlist::Playlist;

/// Progress of the player.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Progress {
    /// Ordinal of the current stage in the playlist.
    pub stage: usize,

    /// Highest stage ordinal that the player unlocked by clearing the previous stage.
    pub furthest: usize,

    /// Identifiers of the recently played entries, oldest first.
    recent: VecDeque<String>,

    /// Number of completed play-throughs.
    pub loops: usize,

    pub mode: DifficultyMode,

    /// Playlist of the current play-through. Empty until the first generation.
    pub playlist: Playlist,

    /// Characters that the player obtained by merging.
    discovered: BTreeSet<String>,

    /// Identifiers of the entries that the player completed.
    completed: BTreeSet<String>,

    /// Stages cleared since the last badge.
    pub gauge: usize,

    /// Number of unlocked badges.
    pub badges: usize,

    /// Last time the progress changed.
    pub last_played: Option<DateTime<Utc>>,
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl Progress {
    /// Create a [`Progress`] object for a new player.
    pub fn new() -> Self {
        Self {
            stage: 0,
            furthest: 0,
            recent: VecDeque::new(),
            loops: 0,
            mode: DifficultyMode::default(),
            playlist: Playlist::default(),
            discovered: BTreeSet::new(),
            completed: BTreeSet::new(),
            gauge: 0,
            badges: 0,
            last_played: None,
        }
    }

    /// Move to the given stage. The furthest stage does not change.
    pub fn enter(&mut self, stage: usize) {
        self.stage = stage;
        self.touch();
    }

    /// Make the given stage reachable.
    pub fn unlock(&mut self, stage: usize) {
        if stage > self.furthest {
            self.furthest = stage;
        }
    }

    /// Record a played entry. The oldest entries are forgotten beyond `bound` entries.
    pub fn push_recent(&mut self, id: &str, bound: usize) {
        if self.recent.back().map(String::as_str) == Some(id) {
            return;
        }
        self.recent.push_back(id.to_string());
        while self.recent.len() > bound {
            self.recent.pop_front();
        }
    }

    /// Return the recently played identifiers, oldest first.
    pub fn recent(&self) -> &VecDeque<String> {
        &self.recent
    }

    /// Record a discovered character. Return whether the character is new.
    pub fn discover(&mut self, glyph: &str) -> bool {
        let new: bool = self.discovered.insert(glyph.to_string());
        if new {
            debug!("New character discovered: {glyph}");
        }
        new
    }

    pub fn discovered(&self) -> &BTreeSet<String> {
        &self.discovered
    }

    /// Record a completed entry. Return whether the entry was not completed before.
    pub fn complete(&mut self, id: &str) -> bool {
        self.completed.insert(id.to_string())
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    /// Record a cleared stage in the badge gauge.
    ///
    /// When the gauge is full, the next badge is unlocked and the gauge starts over.
    /// Once all the badges are unlocked, the gauge no longer changes.
    pub fn charge_gauge(&mut self) -> Option<Badge> {
        if self.badges >= Badge::count() {
            return None;
        }
        self.gauge += 1;
        if self.gauge < STAGES_PER_BADGE {
            return None;
        }
        let badge: Badge = Badge::get(self.badges)?;
        self.badges += 1;
        self.gauge = 0;
        info!("Badge {} unlocked: {}", badge.index + 1, badge.glyph);
        Some(badge)
    }

    /// Start a new play-through from the first stage. The collection and the badges are kept.
    pub fn restart_run(&mut self) {
        self.stage = 0;
        self.furthest = 0;
        self.playlist = Playlist::default();
        self.touch();
    }

    /// Update the last played timestamp.
    pub fn touch(&mut self) {
        self.last_played = Some(Utc::now());
    }
}

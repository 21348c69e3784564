/*
feedback.rs

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

//! Manage the invalid-action indicator.
//!
//! When the player attempts an invalid merge or split, the involved cells are flagged for a short
//! time.
//! Each flag is identified by a token.
//! Expiring a flag with an outdated token does nothing, so that a late timer never clears a
//! more recent flag.

use log::debug;
use std::time::{Duration, Instant};

/// Identifier of a raised indicator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FeedbackToken(u64);

/// Manage the invalid-action indicator and the rejection counter.
#[derive(Debug, Clone)]
pub struct InvalidActionFeedback {
    /// How long the indicator stays visible.
    duration: Duration,

    /// Generation of the current indicator. Bumped on each raise and cancel.
    generation: u64,

    /// Flagged cells, empty when the indicator is not visible.
    cells: Vec<usize>,

    /// Time when the current indicator expires.
    deadline: Option<Instant>,

    /// Number of rejected actions since the last cancel.
    rejections: usize,
}

impl InvalidActionFeedback {
    /// Create an [`InvalidActionFeedback`] object.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            generation: 0,
            cells: Vec::new(),
            deadline: None,
            rejections: 0,
        }
    }

    /// Flag the given cells. A previous indicator is replaced.
    pub fn raise(&mut self, cells: &[usize], now: Instant) -> FeedbackToken {
        self.generation += 1;
        self.cells = cells.to_vec();
        self.deadline = Some(now + self.duration);
        self.rejections += 1;
        debug!(
            "Invalid action on cells {cells:?}: rejection count = {}",
            self.rejections
        );
        FeedbackToken(self.generation)
    }

    /// Clear the indicator if it is still the one identified by the token.
    ///
    /// Return whether the indicator was cleared.
    pub fn expire(&mut self, token: FeedbackToken) -> bool {
        if token.0 != self.generation || self.cells.is_empty() {
            return false;
        }
        self.cells.clear();
        self.deadline = None;
        true
    }

    /// Clear the indicator if its display time is over.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => self.expire(FeedbackToken(self.generation)),
            _ => false,
        }
    }

    /// Clear the indicator and the rejection counter. Outstanding tokens become invalid.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.cells.clear();
        self.deadline = None;
        self.rejections = 0;
    }

    /// Return the flagged cells.
    pub fn cells(&self) -> &[usize] {
        &self.cells
    }

    /// Whether the indicator is visible.
    pub fn is_active(&self) -> bool {
        !self.cells.is_empty()
    }

    /// Return the number of rejected actions.
    pub fn rejections(&self) -> usize {
        self.rejections
    }
}

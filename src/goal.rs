/*
goal.rs

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

//! Track which components of the target word the player has discovered.

use log::debug;
use std::collections::BTreeSet;

use crate::kanji::catalog::CatalogEntry;

/// Goal of a stage.
#[derive(Debug, Clone)]
pub struct GoalState {
    /// Target word.
    target: CatalogEntry,

    /// Indexes of the filled components. Each index is filled at most once.
    filled: BTreeSet<usize>,
}

impl GoalState {
    /// Create a [`GoalState`] object with no filled component.
    pub fn new(target: CatalogEntry) -> Self {
        Self {
            target,
            filled: BTreeSet::new(),
        }
    }

    /// Return the target word.
    pub fn target(&self) -> &CatalogEntry {
        &self.target
    }

    /// Return the filled indexes.
    pub fn filled(&self) -> &BTreeSet<usize> {
        &self.filled
    }

    /// Whether the component at the given index is filled.
    pub fn is_filled(&self, index: usize) -> bool {
        self.filled.contains(&index)
    }

    /// Return the index of the first unfilled component that requires the given character.
    pub fn accepts(&self, glyph: &str) -> Option<usize> {
        self.target
            .components
            .iter()
            .enumerate()
            .find(|(i, c)| !self.filled.contains(i) && c.as_str() == glyph)
            .map(|(i, _)| i)
    }

    /// Fill the first unfilled component that requires the given character.
    ///
    /// Return the filled index, or `None` if no unfilled component matches.
    pub fn fill(&mut self, glyph: &str) -> Option<usize> {
        let index: usize = self.accepts(glyph)?;
        self.filled.insert(index);
        debug!(
            "Goal {}: component {index} ({glyph}) filled, {}/{}",
            self.target.id,
            self.filled.len(),
            self.target.components.len()
        );
        Some(index)
    }

    /// Whether every component is filled.
    pub fn is_cleared(&self) -> bool {
        self.filled.len() == self.target.components.len()
    }
}

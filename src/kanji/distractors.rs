/*
distractors.rs

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

//! Select filler parts that look like the correct ones.

use log::debug;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Confusable characters and generic fillers.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct ConfusableTable {
    /// For each character, the characters that look or sound alike. Not necessarily symmetric.
    #[serde(default)]
    pairs: BTreeMap<String, Vec<String>>,

    /// Fillers that are always candidates.
    #[serde(default)]
    fillers: Vec<String>,
}

impl ConfusableTable {
    /// Build the table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Return the alternates of the given character.
    pub fn alternates(&self, glyph: &str) -> &[String] {
        self.pairs.get(glyph).map(Vec::as_slice).unwrap_or_default()
    }

    /// Return the candidate pool for the given correct parts, without duplicates.
    ///
    /// The pool is the alternates of each correct part followed by the fillers, minus the
    /// correct parts themselves.
    pub fn candidates(&self, correct: &[String]) -> Vec<String> {
        let mut pool: Vec<String> = Vec::new();
        let alternates = correct.iter().flat_map(|glyph| self.alternates(glyph));

        for candidate in alternates.chain(self.fillers.iter()) {
            if !correct.contains(candidate) && !pool.contains(candidate) {
                pool.push(candidate.clone());
            }
        }
        pool
    }

    /// Select up to `count` distractors for the given correct parts.
    ///
    /// Distractors are drawn without replacement, so the result has no duplicate. Fewer
    /// distractors are returned when the pool runs out or after `max_draws` draws.
    pub fn select<R: Rng + ?Sized>(
        &self,
        count: usize,
        correct: &[String],
        max_draws: usize,
        rng: &mut R,
    ) -> Vec<String> {
        let mut pool: Vec<String> = self.candidates(correct);
        let mut selected: Vec<String> = Vec::with_capacity(count);
        let mut draws: usize = 0;

        while selected.len() < count && draws < max_draws && !pool.is_empty() {
            let i: usize = rng.random_range(0..pool.len());
            selected.push(pool.swap_remove(i));
            draws += 1;
        }
        debug!("Distractors for {correct:?}: {selected:?}");
        selected
    }
}

/*
stage_parts.rs

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

//! Compute the parts that a stage starts with.

use log::debug;
use rand::Rng;

use crate::config::Settings;
use crate::kanji::catalog::CatalogEntry;
use crate::kanji::dictionary::Dictionary;
use crate::kanji::distractors::ConfusableTable;

/// Parts to place on the board at the beginning of a stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageParts {
    /// Parts needed to build the target characters.
    pub correct: Vec<String>,

    /// Parts that look like the correct ones but are not needed.
    pub distractors: Vec<String>,
}

impl StageParts {
    /// Return all the parts, the correct ones first.
    pub fn all(&self) -> Vec<String> {
        self.correct
            .iter()
            .chain(self.distractors.iter())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.correct.len() + self.distractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.correct.is_empty() && self.distractors.is_empty()
    }
}

/// Compute the starting parts of the given entry at the given stage ordinal.
///
/// The number of distractors follows [`Settings::distractor_count`], but never exceeds the
/// number of cells that the correct parts leave free.
pub fn stage_parts<R: Rng + ?Sized>(
    entry: &CatalogEntry,
    stage: usize,
    dictionary: &Dictionary,
    confusables: &ConfusableTable,
    settings: &Settings,
    rng: &mut R,
) -> StageParts {
    let correct: Vec<String> = entry.starting_parts(dictionary);
    let free: usize = settings.grid_size.saturating_sub(correct.len());
    let count: usize = settings.distractor_count(stage).min(free);

    // The target characters are never distractors either
    let mut excluded: Vec<String> = correct.clone();
    excluded.extend(entry.components.iter().cloned());

    let distractors: Vec<String> =
        confusables.select(count, &excluded, settings.max_distractor_draws, rng);
    debug!(
        "Stage {stage} ({}): parts {correct:?}, distractors {distractors:?}",
        entry.id
    );
    StageParts {
        correct,
        distractors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanji::catalog::Catalog;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn data() -> (Dictionary, ConfusableTable, Catalog) {
        let dictionary = Dictionary::from_json(include_str!("../../data/dictionary.json")).unwrap();
        let confusables =
            ConfusableTable::from_json(include_str!("../../data/confusables.json")).unwrap();
        let catalog =
            Catalog::from_json(include_str!("../../data/catalog.json"), &dictionary).unwrap();
        (dictionary, confusables, catalog)
    }

    #[test]
    fn test_no_distractor_early() {
        let (dictionary, confusables, catalog) = data();
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let entry = catalog.get("w-0005").unwrap();

        let parts = stage_parts(entry, 2, &dictionary, &confusables, &settings, &mut rng);
        assert_eq!(parts.correct, vec!["日", "月", "日"]);
        assert!(parts.distractors.is_empty());
    }

    #[test]
    fn test_distractor_schedule() {
        let (dictionary, confusables, catalog) = data();
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(2);
        let entry = catalog.get("w-0005").unwrap();

        for (stage, expected) in [(3, 1), (8, 2), (20, 3)] {
            let parts = stage_parts(entry, stage, &dictionary, &confusables, &settings, &mut rng);
            assert_eq!(parts.distractors.len(), expected);
            assert_eq!(parts.len(), 3 + expected);
            for d in &parts.distractors {
                assert!(!parts.correct.contains(d));
                assert!(!entry.components.contains(d));
            }
        }
    }

    #[test]
    fn test_distractors_fit_the_board() {
        let (dictionary, confusables, catalog) = data();
        let settings = Settings {
            grid_size: 4,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let entry = catalog.get("w-0005").unwrap();

        let parts = stage_parts(entry, 50, &dictionary, &confusables, &settings, &mut rng);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.all()[..3], parts.correct[..]);
    }

    #[test]
    fn test_seeded_entry() {
        let (dictionary, confusables, catalog) = data();
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(4);
        let entry = catalog.get("tutorial-02").unwrap();

        let parts = stage_parts(entry, 1, &dictionary, &confusables, &settings, &mut rng);
        assert_eq!(parts.all(), vec!["二", "一"]);
    }
}

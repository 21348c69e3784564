/*
playlist.rs

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

//! Generate the ordered list of catalog entries for a play-through.
//!
//! The playlist starts with the hand-authored tutorial entries (Normal mode), and then follows
//! the [`DifficultyCurve`].
//! The catalog is split into ten difficulty buckets, each shuffled and drawn without
//! replacement.
//! When the bucket for the target difficulty is empty, the nearest non-empty bucket is used,
//! the easier one first on a tie.
//! When all the buckets are empty, a random eligible entry is drawn, with repeats allowed.
//! Without any eligible entry, the draw uses the whole catalog.
//!
//! Recently played entries are moved to the end of the draw order of their bucket.

use log::{debug, info, warn};
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::curve::DifficultyCurve;
use crate::config::{DifficultyMode, FALLBACK_ENTRY_ID, MAX_DIFFICULTY, MIN_DIFFICULTY, Settings};
use crate::kanji::catalog::{Catalog, CatalogEntry};

/// Ordered list of catalog entry identifiers, one per stage.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct Playlist {
    ids: Vec<String>,
}

impl Playlist {
    /// Create a [`Playlist`] object from a list of identifiers.
    pub fn from_ids(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Return the identifier for the given stage.
    pub fn get(&self, stage: usize) -> Option<&str> {
        self.ids.get(stage).map(String::as_str)
    }

    /// Return all the identifiers.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Difficulty buckets, as lists of entry positions in the catalog.
/// The next entry to draw is at the end of each list.
struct Buckets {
    buckets: Vec<Vec<usize>>,
}

impl Buckets {
    /// Return the index of the bucket for the given difficulty.
    fn slot(difficulty: u8) -> usize {
        (difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY) - MIN_DIFFICULTY) as usize
    }

    /// Draw an entry for the given difficulty, searching outward when its bucket is empty.
    fn draw(&mut self, target: u8) -> Option<usize> {
        let target: usize = Self::slot(target);
        for offset in 0..self.buckets.len() {
            let mut slots: Vec<usize> = Vec::with_capacity(2);
            if offset == 0 {
                slots.push(target);
            } else {
                if target >= offset {
                    slots.push(target - offset);
                }
                if target + offset < self.buckets.len() {
                    slots.push(target + offset);
                }
            }
            for slot in slots {
                if let Some(i) = self.buckets[slot].pop() {
                    if offset > 0 {
                        debug!(
                            "Bucket {} is empty: using bucket {}",
                            target + 1,
                            slot + 1
                        );
                    }
                    return Some(i);
                }
            }
        }
        None
    }
}

/// Playlist generator.
pub struct PlaylistGenerator<'a> {
    catalog: &'a Catalog,
    settings: &'a Settings,
    mode: DifficultyMode,

    /// Recently played identifiers.
    recent: HashSet<&'a str>,
}

impl<'a> PlaylistGenerator<'a> {
    /// Create a [`PlaylistGenerator`] object.
    pub fn new(catalog: &'a Catalog, settings: &'a Settings, mode: DifficultyMode) -> Self {
        Self {
            catalog,
            settings,
            mode,
            recent: HashSet::new(),
        }
    }

    /// Provide the recently played identifiers, which are drawn last.
    pub fn avoid<I>(mut self, recent: I) -> Self
    where
        I: IntoIterator<Item = &'a String>,
    {
        self.recent = recent.into_iter().map(String::as_str).collect();
        self
    }

    /// Whether the entry can be drawn in the current mode.
    fn is_eligible(&self, entry: &CatalogEntry) -> bool {
        if self.settings.tutorial_ids.contains(&entry.id) {
            return false;
        }
        match self.mode {
            DifficultyMode::Easy => {
                entry.components.len() <= self.settings.easy_max_components
                    && entry.difficulty <= self.settings.easy_max_difficulty
            }
            DifficultyMode::Normal => true,
        }
    }

    /// Split the eligible entries into shuffled difficulty buckets.
    fn fill_buckets<R: Rng + ?Sized>(&self, rng: &mut R) -> Buckets {
        let mut buckets: Vec<Vec<usize>> =
            vec![Vec::new(); (MAX_DIFFICULTY - MIN_DIFFICULTY + 1) as usize];

        for (i, entry) in self.catalog.entries().iter().enumerate() {
            if self.is_eligible(entry) {
                buckets[Buckets::slot(entry.difficulty)].push(i);
            }
        }
        for bucket in &mut buckets {
            bucket.shuffle(rng);
            // Stable sort: recent entries go first, so they are popped last
            bucket.sort_by_key(|i| !self.recent.contains(self.catalog.entries()[*i].id.as_str()));
        }
        debug!(
            "Bucket sizes: {:?}",
            buckets.iter().map(Vec::len).collect::<Vec<usize>>()
        );
        Buckets { buckets }
    }

    /// Generate a playlist of [`Settings::total_stages`] identifiers.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Playlist {
        let total: usize = self.settings.total_stages;
        let mut ids: Vec<String> = Vec::with_capacity(total);

        if self.mode == DifficultyMode::Normal {
            for id in &self.settings.tutorial_ids {
                if ids.len() >= total {
                    break;
                }
                if self.catalog.contains(id) {
                    ids.push(id.clone());
                } else {
                    warn!("Tutorial entry {id} is not in the catalog: skipped");
                }
            }
        }

        let mut buckets: Buckets = self.fill_buckets(rng);
        let curve: DifficultyCurve = DifficultyCurve::new(self.settings, self.mode);
        let span: usize = total - ids.len();

        for position in 0..span {
            let target: u8 = curve.target(position, span);
            let id: String = match buckets.draw(target) {
                Some(i) => self.catalog.entries()[i].id.clone(),
                None => {
                    warn!(
                        "All the buckets are empty at stage {}: drawing from the whole catalog",
                        ids.len()
                    );
                    let eligible: Vec<&CatalogEntry> = self
                        .catalog
                        .entries()
                        .iter()
                        .filter(|e| self.is_eligible(e))
                        .collect();
                    match eligible.choose(rng) {
                        Some(entry) => entry.id.clone(),
                        None => match self.catalog.entries().choose(rng) {
                            Some(entry) => entry.id.clone(),
                            None => String::from(FALLBACK_ENTRY_ID),
                        },
                    }
                }
            };
            ids.push(id);
        }
        info!("Generated a {} playlist of {} stages", self.mode, ids.len());
        Playlist::from_ids(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kanji::dictionary::Dictionary;
    use crate::library::Library;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn catalog() -> Catalog {
        let dictionary = Dictionary::from_json(include_str!("../../data/dictionary.json")).unwrap();
        Catalog::from_json(include_str!("../../data/catalog.json"), &dictionary).unwrap()
    }

    fn entry(id: &str, difficulty: u8) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            difficulty,
            ..CatalogEntry::fallback()
        }
    }

    #[test]
    fn test_tutorial_first() {
        let catalog = catalog();
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(1);
        let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
            .generate(&mut rng);

        assert_eq!(playlist.len(), 100);
        assert_eq!(&playlist.ids()[..3], &settings.tutorial_ids[..]);
        assert!(playlist.ids()[3..].iter().all(|id| !id.starts_with("tutorial")));
    }

    #[test]
    fn test_embedded_playlists_have_no_repeat() {
        let library = Library::embedded(Settings::default()).unwrap();
        for mode in [DifficultyMode::Normal, DifficultyMode::Easy] {
            for seed in [2, 9, 31] {
                let mut rng = StdRng::seed_from_u64(seed);
                let playlist = PlaylistGenerator::new(&library.catalog, &library.settings, mode)
                    .generate(&mut rng);

                let unique: HashSet<&String> = playlist.ids().iter().collect();
                assert_eq!(playlist.len(), library.settings.total_stages);
                assert_eq!(unique.len(), playlist.len(), "{mode} playlist, seed {seed}");
            }
        }
    }

    #[test]
    fn test_outward_search_prefers_easier() {
        let catalog = Catalog::from_entries(vec![entry("two", 2), entry("four", 4)]);
        let settings = Settings {
            total_stages: 1,
            tutorial_ids: Vec::new(),
            ramp_start: 3.0,
            ramp_end: 3.0,
            wave_amplitude: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
            .generate(&mut rng);
        assert_eq!(playlist.ids(), &[String::from("two")]);
    }

    #[test]
    fn test_exhausted_buckets_fall_back() {
        let catalog = Catalog::from_entries(vec![entry("only", 5)]);
        let settings = Settings {
            total_stages: 4,
            tutorial_ids: Vec::new(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
            .generate(&mut rng);
        assert_eq!(playlist.ids(), &vec![String::from("only"); 4][..]);
    }

    #[test]
    fn test_empty_catalog_uses_fallback_id() {
        let catalog = Catalog::default();
        let settings = Settings {
            total_stages: 2,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(5);
        let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
            .generate(&mut rng);
        assert_eq!(playlist.get(1), Some(FALLBACK_ENTRY_ID));
    }

    #[test]
    fn test_recent_entries_drawn_last() {
        let catalog = Catalog::from_entries(vec![entry("a", 1), entry("b", 1), entry("c", 1)]);
        let settings = Settings {
            total_stages: 3,
            tutorial_ids: Vec::new(),
            ramp_end: 1.0,
            wave_amplitude: 0.0,
            ..Default::default()
        };
        let recent = vec![String::from("a"), String::from("b")];
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
                .avoid(&recent)
                .generate(&mut rng);
            assert_eq!(playlist.get(0), Some("c"));
        }
    }

    #[test]
    fn test_easy_mode() {
        let catalog = catalog();
        let settings = Settings::default();
        let mut rng = StdRng::seed_from_u64(6);
        let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Easy)
            .generate(&mut rng);

        assert_eq!(playlist.len(), 100);
        for id in playlist.ids() {
            let entry = catalog.get(id).unwrap();
            assert!(!settings.tutorial_ids.contains(id));
            assert!(entry.components.len() <= 2);
            assert!(entry.difficulty <= 3);
        }
    }

    #[test]
    fn test_regenerations_differ() {
        let catalog = catalog();
        let settings = Settings::default();
        let generator = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal);
        let mut rng = StdRng::seed_from_u64(7);
        let first = generator.generate(&mut rng);
        let second = generator.generate(&mut rng);
        assert_ne!(first, second);
        assert_eq!(&first.ids()[..3], &second.ids()[..3]);
    }

    proptest! {
        #[test]
        fn playlists_resolve(seed in any::<u64>(), total in 0usize..150) {
            let catalog = catalog();
            let settings = Settings { total_stages: total, ..Default::default() };
            let mut rng = StdRng::seed_from_u64(seed);
            let playlist = PlaylistGenerator::new(&catalog, &settings, DifficultyMode::Normal)
                .generate(&mut rng);

            prop_assert_eq!(playlist.len(), total);
            prop_assert!(playlist.ids().iter().all(|id| catalog.contains(id)));
        }
    }
}

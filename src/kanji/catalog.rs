/*
catalog.rs

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

//! Catalog of target words.
//!
//! Each [`CatalogEntry`] is a word to compose, with the list of the characters that the player
//! must discover to complete it.
//! The catalog is loaded once, curated (blacklisted and oversized entries are removed), and
//! then only read.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::decomposer::{atom_count, fully_decompose};
use super::dictionary::Dictionary;
use crate::config::{
    FALLBACK_ENTRY_ID, MAX_DIFFICULTY, MIN_DIFFICULTY, Settings, TARGET_PLACEHOLDER,
};

/// Segment of a sentence template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentencePart {
    /// Plain text.
    Text(String),

    /// Location of the target word.
    Slot,
}

/// Target word.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Unique identifier.
    pub id: String,

    /// Surface form of the word (one or more characters).
    #[serde(rename = "kanji")]
    pub form: String,

    /// Reading of the word.
    pub reading: String,

    /// Difficulty, from 1 to 10.
    pub difficulty: u8,

    /// Characters to discover, in order. The same character can appear several times.
    pub components: Vec<String>,

    /// Meaning of the word.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning: Option<String>,

    /// Sentence with exactly one [`TARGET_PLACEHOLDER`] placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence: Option<String>,

    /// Starting parts, for hand-authored stages. Otherwise, the starting parts are the leaves
    /// of the components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<Vec<String>>,
}

/// Catalog record as stored in the source file. The difficulty is optional.
#[derive(Deserialize, Debug)]
struct RawEntry {
    id: String,
    kanji: String,
    #[serde(default)]
    reading: String,
    difficulty: Option<i64>,
    components: Vec<String>,
    meaning: Option<String>,
    sentence: Option<String>,
    seed: Option<Vec<String>>,
}

impl CatalogEntry {
    /// Entry substituted when a stage cannot be resolved.
    pub fn fallback() -> Self {
        Self {
            id: String::from(FALLBACK_ENTRY_ID),
            form: String::from("平和"),
            reading: String::from("へいわ"),
            difficulty: MIN_DIFFICULTY,
            components: vec![String::from("平"), String::from("和")],
            meaning: Some(String::from("穏やかな状態")),
            sentence: Some(format!("世界の{TARGET_PLACEHOLDER}を祈る")),
            seed: None,
        }
    }

    /// Split the sentence around the target word.
    ///
    /// Without a sentence, the result is a single [`SentencePart::Slot`].
    pub fn sentence_parts(&self) -> Vec<SentencePart> {
        let template: &str = self.sentence.as_deref().unwrap_or(TARGET_PLACEHOLDER);
        let mut parts: Vec<SentencePart> = Vec::new();

        for (i, text) in template.split(TARGET_PLACEHOLDER).enumerate() {
            if i > 0 {
                parts.push(SentencePart::Slot);
            }
            if !text.is_empty() {
                parts.push(SentencePart::Text(text.to_string()));
            }
        }
        parts
    }

    /// Return the parts that the board starts with (distractors excluded).
    pub fn starting_parts(&self, dictionary: &Dictionary) -> Vec<String> {
        match &self.seed {
            Some(seed) => seed.clone(),
            None => self
                .components
                .iter()
                .flat_map(|c| fully_decompose(dictionary, c))
                .collect(),
        }
    }
}

/// Estimate the difficulty of a word from its length and the complexity of its characters.
///
/// Each component adds 1, 2, or 3 when it decomposes into 2, 3, or at least 4 leaves.
pub fn estimate_difficulty(components: &[String], dictionary: &Dictionary) -> u8 {
    let mut score: usize = components.len();
    for component in components {
        score += match atom_count(dictionary, component) {
            0 | 1 => 0,
            2 => 1,
            3 => 2,
            _ => 3,
        };
    }
    score.clamp(MIN_DIFFICULTY as usize, MAX_DIFFICULTY as usize) as u8
}

/// Catalog object.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Entries in source order.
    entries: Vec<CatalogEntry>,

    /// Position of each entry in [`Catalog::entries`], by identifier.
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Build the catalog from its JSON representation.
    ///
    /// Missing or out of range difficulties are estimated, sentences without exactly one
    /// placeholder are dropped, and entries without a component are ignored.
    pub fn from_json(json: &str, dictionary: &Dictionary) -> Result<Self, serde_json::Error> {
        let records: Vec<RawEntry> = serde_json::from_str(json)?;
        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(records.len());

        for r in records {
            if r.components.is_empty() {
                warn!("Catalog entry {} has no component: ignored", r.id);
                continue;
            }
            let difficulty: u8 = match r.difficulty {
                Some(d) if (MIN_DIFFICULTY as i64..=MAX_DIFFICULTY as i64).contains(&d) => d as u8,
                other => {
                    let estimated: u8 = estimate_difficulty(&r.components, dictionary);
                    debug!(
                        "Catalog entry {}: difficulty {other:?} replaced by {estimated}",
                        r.id
                    );
                    estimated
                }
            };
            let sentence: Option<String> = match r.sentence {
                Some(s) if s.matches(TARGET_PLACEHOLDER).count() == 1 => Some(s),
                Some(s) if s.is_empty() => None,
                Some(s) => {
                    warn!("Catalog entry {}: sentence {s:?} ignored", r.id);
                    None
                }
                None => None,
            };
            entries.push(CatalogEntry {
                id: r.id,
                form: r.kanji,
                reading: r.reading,
                difficulty,
                components: r.components,
                meaning: r.meaning.filter(|m| !m.is_empty()),
                sentence,
                seed: r.seed,
            });
        }
        Ok(Self::from_entries(entries))
    }

    /// Build the catalog from a list of entries. For duplicated identifiers, the first entry wins.
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog: Catalog = Catalog::default();
        for entry in entries {
            if catalog.index.contains_key(&entry.id) {
                warn!("Duplicated catalog entry {}: ignored", entry.id);
                continue;
            }
            catalog.index.insert(entry.id.clone(), catalog.entries.len());
            catalog.entries.push(entry);
        }
        catalog
    }

    /// Remove the entries that cannot be played: blacklisted characters, or more starting parts
    /// than cells on the board.
    ///
    /// Return the number of removed entries.
    pub fn retain_playable(&mut self, dictionary: &Dictionary, settings: &Settings) -> usize {
        let before: usize = self.entries.len();
        self.entries.retain(|entry| {
            if settings.is_blacklisted(&entry.form)
                || entry.components.iter().any(|c| settings.is_blacklisted(c))
            {
                debug!("Catalog entry {} is blacklisted", entry.id);
                return false;
            }
            let parts: usize = entry.starting_parts(dictionary).len();
            if parts > settings.grid_size {
                warn!(
                    "Catalog entry {} needs {parts} cells, more than the {} available",
                    entry.id, settings.grid_size
                );
                return false;
            }
            true
        });
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        before - self.entries.len()
    }

    /// Return the entry with the given identifier.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.index.get(id).map(|i| &self.entries[*i])
    }

    /// Whether the catalog has an entry with the given identifier.
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Return all the entries, in source order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

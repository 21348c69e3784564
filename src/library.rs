/*
library.rs

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

//! Load the static data.
//!
//! The dictionary, the confusable table, and the catalog are embedded in the binary at build
//! time.
//! A directory with the same files can replace them.
//! Once loaded, the [`Library`] object is read-only and can be shared between any number of
//! stage sessions.

use log::{info, warn};
use std::fs;
use std::path::Path;

use crate::config::{CATALOG_FILE, CONFUSABLES_FILE, DICTIONARY_FILE, Settings};
use crate::errors::DataError;
use crate::kanji::catalog::{Catalog, CatalogEntry};
use crate::kanji::dictionary::Dictionary;
use crate::kanji::distractors::ConfusableTable;

const EMBEDDED_DICTIONARY: &str = include_str!("../data/dictionary.json");
const EMBEDDED_CONFUSABLES: &str = include_str!("../data/confusables.json");
const EMBEDDED_CATALOG: &str = include_str!("../data/catalog.json");

/// Static data.
#[derive(Debug, Clone)]
pub struct Library {
    pub dictionary: Dictionary,
    pub confusables: ConfusableTable,

    /// Playable entries only.
    pub catalog: Catalog,

    /// Settings used to curate the catalog and to build the stages.
    pub settings: Settings,
}

impl Library {
    /// Load the data embedded in the binary.
    pub fn embedded(settings: Settings) -> Result<Self, DataError> {
        Self::from_json(
            EMBEDDED_DICTIONARY,
            EMBEDDED_CONFUSABLES,
            EMBEDDED_CATALOG,
            settings,
        )
    }

    /// Load the data from the JSON files in the given directory.
    pub fn from_dir(dir: &Path, settings: Settings) -> Result<Self, DataError> {
        let read = |name: &str| -> Result<String, DataError> {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| DataError::Read { path, source })
        };
        Self::from_json(
            &read(DICTIONARY_FILE)?,
            &read(CONFUSABLES_FILE)?,
            &read(CATALOG_FILE)?,
            settings,
        )
    }

    /// Parse the data and remove the entries that cannot be played.
    pub fn from_json(
        dictionary: &str,
        confusables: &str,
        catalog: &str,
        settings: Settings,
    ) -> Result<Self, DataError> {
        let dictionary: Dictionary =
            Dictionary::from_json(dictionary).map_err(|source| DataError::Parse {
                name: String::from(DICTIONARY_FILE),
                source,
            })?;
        let confusables: ConfusableTable =
            ConfusableTable::from_json(confusables).map_err(|source| DataError::Parse {
                name: String::from(CONFUSABLES_FILE),
                source,
            })?;
        let mut catalog: Catalog =
            Catalog::from_json(catalog, &dictionary).map_err(|source| DataError::Parse {
                name: String::from(CATALOG_FILE),
                source,
            })?;

        let removed: usize = catalog.retain_playable(&dictionary, &settings);
        if catalog.is_empty() {
            return Err(DataError::EmptyCatalog);
        }
        for id in &settings.tutorial_ids {
            if !catalog.contains(id) {
                warn!("Tutorial entry {id} is not playable");
            }
        }
        info!(
            "Loaded {} dictionary nodes and {} catalog entries ({removed} excluded)",
            dictionary.len(),
            catalog.len()
        );
        Ok(Self {
            dictionary,
            confusables,
            catalog,
            settings,
        })
    }

    /// Return the catalog entry with the given identifier.
    pub fn resolve(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.get(id)
    }
}

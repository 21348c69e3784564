/*
config.rs

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

//! Application constants and tunable settings.
//!
//! The constants identify the application and its files.
//! The [`Settings`] object groups the parameters that shape the play-through: the number of
//! stages, the tutorial lead-in, the difficulty curve, the board size, and the distractor
//! schedule.
//! All the settings have defaults, and any subset can be overridden from a JSON file.

use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::Display;

use crate::errors::DataError;

/// Name of the application, also used for the data directory.
pub const APP_NAME: &str = "kanjimerge";

/// Copyright notice displayed by `--version`.
pub const COPYRIGHT_NOTICE: &str = "Copyright 2025 Hervé Quatremain
License GPLv3+: GNU GPL version 3 or later <https://gnu.org/licenses/gpl.html>.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

/// Save file for the play-through progress.
pub const PROGRESS_FILE: &str = "progress.json";

/// Static data file names, when the data is loaded from a directory.
pub const DICTIONARY_FILE: &str = "dictionary.json";
pub const CONFUSABLES_FILE: &str = "confusables.json";
pub const CATALOG_FILE: &str = "catalog.json";

/// Placeholder for the target form in sentence templates.
pub const TARGET_PLACEHOLDER: &str = "{{target}}";

/// Identifier of the entry substituted when a stage cannot be resolved.
pub const FALLBACK_ENTRY_ID: &str = "fallback";

/// Lowest and highest catalog difficulty.
pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 10;

/// Difficulty mode of the play-through.
#[derive(
    Serialize,
    Deserialize,
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Display,
)]
pub enum DifficultyMode {
    /// Short words with simple characters only, no tutorial.
    Easy,

    /// Tutorial lead-in, then a difficulty curve that rises in waves.
    #[default]
    Normal,
}

/// Tunable parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Number of stages in a play-through.
    pub total_stages: usize,

    /// Hand-authored entries played first, in order (Normal mode only).
    pub tutorial_ids: Vec<String>,

    /// Target difficulty at the first stage after the tutorial.
    pub ramp_start: f64,

    /// Target difficulty at the last stage.
    pub ramp_end: f64,

    /// Amplitude of the oscillation around the ramp, in difficulty levels.
    pub wave_amplitude: f64,

    /// Period of the oscillation, in stages.
    pub wave_period: f64,

    /// Highest difficulty in Easy mode.
    pub easy_max_difficulty: u8,

    /// Largest number of components of an entry in Easy mode.
    pub easy_max_components: usize,

    /// Number of cells on the board.
    pub grid_size: usize,

    /// Distractor schedule: from the given stage ordinal, add the given number of distractors.
    pub distractor_schedule: Vec<(usize, usize)>,

    /// Maximum number of random draws when selecting distractors.
    pub max_distractor_draws: usize,

    /// Number of recently played entry ids to remember.
    pub history_size: usize,

    /// Entries that contain one of these characters are never played.
    pub blacklist: Vec<String>,

    /// How long the invalid-action indicator stays visible, in milliseconds.
    pub feedback_millis: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            total_stages: 100,
            tutorial_ids: vec![
                String::from("tutorial-01"),
                String::from("tutorial-02"),
                String::from("tutorial-03"),
            ],
            ramp_start: 1.0,
            ramp_end: 10.0,
            wave_amplitude: 2.0,
            wave_period: 10.0,
            easy_max_difficulty: 3,
            easy_max_components: 2,
            grid_size: 16,
            distractor_schedule: vec![(3, 1), (8, 2), (15, 3)],
            max_distractor_draws: 100,
            history_size: 50,
            blacklist: vec![String::from("穏"), String::from("隠"), String::from("勉")],
            feedback_millis: 600,
        }
    }
}

impl Settings {
    /// Load the settings from a JSON file. Missing fields keep their default value.
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let content: String = fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| DataError::Parse {
                name: path.display().to_string(),
                source,
            })?;
        debug!("Settings loaded from {path:?}: {settings:?}");
        Ok(settings)
    }

    /// Return the number of distractors to add to the given stage.
    pub fn distractor_count(&self, stage: usize) -> usize {
        self.distractor_schedule
            .iter()
            .filter(|(from, _)| stage >= *from)
            .map(|(_, count)| *count)
            .max()
            .unwrap_or(0)
    }

    /// Whether the given text contains a blacklisted character.
    pub fn is_blacklisted(&self, text: &str) -> bool {
        self.blacklist.iter().any(|b| text.contains(b.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distractor_schedule() {
        let settings = Settings::default();
        assert_eq!(settings.distractor_count(0), 0);
        assert_eq!(settings.distractor_count(2), 0);
        assert_eq!(settings.distractor_count(3), 1);
        assert_eq!(settings.distractor_count(8), 2);
        assert_eq!(settings.distractor_count(99), 3);
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"total_stages": 12, "wave_amplitude": 0.5}"#).unwrap();
        assert_eq!(settings.total_stages, 12);
        assert_eq!(settings.wave_amplitude, 0.5);
        assert_eq!(settings.grid_size, 16);
        assert_eq!(settings.tutorial_ids.len(), 3);
    }

    #[test]
    fn test_blacklist() {
        let settings = Settings::default();
        assert!(settings.is_blacklisted("平穏"));
        assert!(!settings.is_blacklisted("平和"));
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(DifficultyMode::Easy.to_string(), "Easy");
        assert_eq!(DifficultyMode::Normal.to_string(), "Normal");
    }
}

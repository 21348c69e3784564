/*
errors.rs

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

//! Error types.
//!
//! - `DataError`: the static data or the settings cannot be loaded.
//! - `SaveError`: the progress file cannot be read or written.
//!
//! Rejected player actions are not errors; see [`crate::stage::BoardEvent`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors while loading the static data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {name}: {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("The catalog has no playable entry")]
    EmptyCatalog,
}

/// Errors while saving or restoring the progress.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Cannot access the save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot decode the save file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

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

//! Save and restore the progress of the player.
//!
//! The [`Progress`] object is saved in the `progress.json` file after each stage, and is
//! restored when Kanjimerge starts.
//!
//! The saved object is a serialization of the [`Progress`] object in JSON format by using
//! [`serde`].

use log::debug;
use std::fs::{self, File, remove_file};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::{APP_NAME, PROGRESS_FILE};
use crate::errors::SaveError;
use crate::progress::Progress;

/// Return the default data directory, or None if the platform does not define one.
pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_NAME))
}

/// Object to save and restore the progress.
pub struct SaverProgress {
    /// Absolute path to the save file.
    save_file: PathBuf,
}

impl SaverProgress {
    /// Create a [`SaverProgress`] object.
    ///
    /// The provided [`PathBuf`] is the path to the directory where the progress must be saved.
    pub fn new(mut data_dir: PathBuf) -> Self {
        data_dir.push(PROGRESS_FILE);
        debug!("Progress file: {data_dir:?}");
        Self {
            save_file: data_dir,
        }
    }

    /// Return the path to the save file.
    pub fn path(&self) -> &Path {
        &self.save_file
    }

    /// Retrieve the [`Progress`] object from the save file.
    ///
    /// Return the [`Progress`] object or None if the save file does not exist.
    pub fn get_progress(&self) -> Result<Option<Progress>, SaveError> {
        let file: File = match File::open(&self.save_file) {
            Ok(f) => f,
            Err(error) => match error.kind() {
                ErrorKind::NotFound => return Ok(None),
                _ => {
                    return Err(SaveError::Io {
                        path: self.save_file.clone(),
                        source: error,
                    });
                }
            },
        };
        let reader: BufReader<File> = BufReader::new(file);
        let progress: Progress =
            serde_json::from_reader(reader).map_err(|source| SaveError::Json {
                path: self.save_file.clone(),
                source,
            })?;
        Ok(Some(progress))
    }

    /// Save the provided [`Progress`] object.
    pub fn save_progress(&self, progress: &Progress) -> Result<(), SaveError> {
        let io_error = |source: std::io::Error| SaveError::Io {
            path: self.save_file.clone(),
            source,
        };

        if let Some(dir) = self.save_file.parent() {
            fs::create_dir_all(dir).map_err(io_error)?;
        }
        let file: File = File::create(&self.save_file).map_err(io_error)?;
        let mut writer: BufWriter<File> = BufWriter::new(file);

        serde_json::to_writer(&mut writer, progress).map_err(|source| SaveError::Json {
            path: self.save_file.clone(),
            source,
        })?;
        writer.flush().map_err(io_error)?;
        Ok(())
    }

    /// Delete the save file.
    pub fn delete_save(&self) {
        let _ = remove_file(&self.save_file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::playlist::Playlist;

    #[test]
    fn test_save_and_restore() {
        let dir = tempfile::tempdir().unwrap();
        let saver = SaverProgress::new(dir.path().join("nested"));
        assert!(saver.get_progress().unwrap().is_none());

        let mut progress = Progress::new();
        progress.playlist = Playlist::from_ids(vec![String::from("a"), String::from("b")]);
        progress.enter(1);
        progress.unlock(2);
        progress.push_recent("a", 50);
        progress.discover("二");
        for _ in 0..12 {
            progress.charge_gauge();
        }
        saver.save_progress(&progress).unwrap();

        let restored = saver.get_progress().unwrap().unwrap();
        assert_eq!(restored.gauge, 2);
        assert_eq!(restored.badges, 1);
        assert_eq!(restored.furthest, 2);
        assert_eq!(restored, progress);

        saver.delete_save();
        assert!(saver.get_progress().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_save() {
        let dir = tempfile::tempdir().unwrap();
        let saver = SaverProgress::new(dir.path().to_path_buf());
        fs::write(saver.path(), "{ not json").unwrap();

        assert!(matches!(saver.get_progress(), Err(SaveError::Json { .. })));
    }
}

/*
merger.rs

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

//! Combine two characters.

use thiserror::Error;

use super::dictionary::{Dictionary, Node};

/// Reason why two characters do not combine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("{left} and {right} do not combine")]
    NoSuchCombination { left: String, right: String },
}

/// Return the character composed of `a` and `b`, in any order.
///
/// When several composites share the same pair, the first one in dictionary order is returned,
/// so that repeated calls give the same answer.
/// See [`Dictionary::collisions`].
pub fn judge(dictionary: &Dictionary, a: &str, b: &str) -> Result<String, MergeError> {
    dictionary
        .lookup_pair(a, b)
        .map(|node: &Node| node.glyph().to_string())
        .ok_or_else(|| MergeError::NoSuchCombination {
            left: a.to_string(),
            right: b.to_string(),
        })
}

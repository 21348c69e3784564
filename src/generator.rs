/*
generator.rs

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

//! Generate the content of a play-through.
//!
//! A play-through is a list of catalog entries, one per stage, represented by a
//! [`playlist::Playlist`] object.
//! You create this object by creating a [`playlist::PlaylistGenerator`] object and by using its
//! [`playlist::PlaylistGenerator::generate`] method.
//! The generator follows the target difficulty computed by a [`curve::DifficultyCurve`] object.
//!
//! When a stage starts, the parts that are placed on the board are computed by
//! [`stage_parts::stage_parts`]: the leaves of the target characters plus some distractors
//! that look like them.

pub mod curve;
pub mod playlist;
pub mod stage_parts;

/*
kanji.rs

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

//! Static reference data and the pure functions built on it.
//!
//! The [`dictionary::Dictionary`] object stores the composition rules: each composite character
//! decomposes into an ordered pair of constituents, which can themselves be composite.
//! Some characters are declared atomic and are never decomposed, even when a rule exists.
//!
//! Three groups of pure functions operate on the dictionary:
//!
//! * [`decomposer::fully_decompose`] and [`decomposer::constituents_of`] break characters down,
//!   either to the leaves or by one level (the "split" action).
//! * [`merger::judge`] combines two characters, regardless of their order.
//! * [`distractors::ConfusableTable::select`] picks filler parts that look like the correct ones.
//!
//! The [`catalog::Catalog`] object stores the target words, and [`checks`] verifies that the
//! catalog can be played with the dictionary.

pub mod catalog;
pub mod checks;
pub mod decomposer;
pub mod dictionary;
pub mod distractors;
pub mod merger;

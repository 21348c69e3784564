/*
lib.rs

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

//! Kanjimerge: compositional content engine for a kanji merging puzzle.
//!
//! The player recombines small graphical parts into the characters of a target word.
//! The crate provides the static data ([`kanji`]), the play-through generation
//! ([`generator`]), the board session state machine ([`stage`]), and the player's progress
//! ([`progress`], [`badges`], [`saver`]).
//! The [`game::Game`] object ties everything together.

pub mod badges;
pub mod board;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod game;
pub mod generator;
pub mod goal;
pub mod kanji;
pub mod library;
pub mod progress;
pub mod saver;
pub mod stage;

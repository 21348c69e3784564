/*
badges.rs

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

//! Badges awarded as the player clears stages.
//!
//! Every [`STAGES_PER_BADGE`] cleared stages, the next badge of the table is unlocked.
//! Each badge is a character.
//! Reading only the hiragana badges, in order, reveals a hidden message.

/// Number of cleared stages needed to unlock a badge.
pub const STAGES_PER_BADGE: usize = 10;

const GLYPHS: [&str; 40] = [
    "あ", "歩", "空", "静", "思", "考", "巡", "旅", "道", "知", //
    "そ", "理", "解", "ん", "結", "束", "で", "水", "流", "時", //
    "く", "雲", "光", "れ", "歴", "史", "て", "手", "触", "感", //
    "あ", "り", "在", "が", "画", "と", "都", "う", "有", "終",
];

/// Badge object.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Position in the badge table, which is also the unlock order.
    pub index: usize,
    pub glyph: &'static str,
}

impl Badge {
    /// Return the badge at the given position in the table.
    pub fn get(index: usize) -> Option<Self> {
        GLYPHS.get(index).map(|glyph| Self { index, glyph })
    }

    /// Number of badges in the table.
    pub fn count() -> usize {
        GLYPHS.len()
    }

    /// Whether the badge is part of the hidden message.
    pub fn is_message(&self) -> bool {
        self.glyph.chars().all(|c| ('ぁ'..='ん').contains(&c))
    }
}

/// Return the given number of badges, in unlock order.
pub fn unlocked(count: usize) -> Vec<Badge> {
    (0..count.min(Badge::count()))
        .filter_map(Badge::get)
        .collect()
}

/// Return the part of the hidden message revealed by the given number of badges.
pub fn message(count: usize) -> String {
    unlocked(count)
        .iter()
        .filter(|b| b.is_message())
        .map(|b| b.glyph)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table() {
        assert_eq!(Badge::count(), 40);
        assert_eq!(Badge::get(0).map(|b| b.glyph), Some("あ"));
        assert_eq!(Badge::get(39).map(|b| b.glyph), Some("終"));
        assert!(Badge::get(40).is_none());
        assert!(Badge::get(13).unwrap().is_message());
        assert!(!Badge::get(1).unwrap().is_message());
    }

    #[test]
    fn test_message() {
        assert_eq!(message(0), "");
        assert_eq!(message(11), "あそ");
        assert_eq!(message(40), "あそんでくれてありがとう");
        assert_eq!(unlocked(100).len(), 40);
    }
}

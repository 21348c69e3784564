/*
decomposer.rs

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

//! Break characters down into their constituents.
//!
//! [`fully_decompose`] follows the composition rules down to the leaves.
//! [`constituents_of`] only returns the immediate pair, for the one-level "split" action.
//!
//! The source data is expected to be acyclic, but the recursion still tracks the nodes that it
//! is expanding: a character that would be expanded inside its own expansion, or below
//! [`MAX_DEPTH`], is kept as a leaf.

use log::warn;

use super::dictionary::{Dictionary, Node, NodeId};

/// Deepest expansion before the character is kept as a leaf.
pub const MAX_DEPTH: usize = 32;

/// Return the ordered list of the leaves that compose the given character.
///
/// Atomic characters and characters without a rule are their own decomposition.
pub fn fully_decompose(dictionary: &Dictionary, glyph: &str) -> Vec<String> {
    let mut atoms: Vec<String> = Vec::new();
    match dictionary.id_of(glyph) {
        Some(id) => expand(dictionary, id, &mut Vec::new(), &mut atoms),
        None => atoms.push(glyph.to_string()),
    }
    atoms
}

/// Recursively expand a node, appending the leaves to `atoms`.
fn expand(dictionary: &Dictionary, id: NodeId, trail: &mut Vec<NodeId>, atoms: &mut Vec<String>) {
    let Some(node) = dictionary.get(id) else {
        return;
    };
    match node {
        Node::Composite { left, right, .. } => {
            if trail.contains(&id) || trail.len() >= MAX_DEPTH {
                warn!(
                    "Cannot decompose {} (cycle or depth {}): kept as a leaf",
                    node.glyph(),
                    trail.len()
                );
                atoms.push(node.glyph().to_string());
                return;
            }
            trail.push(id);
            expand(dictionary, *left, trail, atoms);
            expand(dictionary, *right, trail, atoms);
            trail.pop();
        }
        Node::Atomic(glyph) => atoms.push(glyph.clone()),
    }
}

/// Return the immediate constituents of the given character, or None if the character is a leaf.
pub fn constituents_of(dictionary: &Dictionary, glyph: &str) -> Option<(String, String)> {
    match dictionary.node(glyph)? {
        Node::Composite { left, right, .. } => Some((
            dictionary.get(*left)?.glyph().to_string(),
            dictionary.get(*right)?.glyph().to_string(),
        )),
        Node::Atomic(_) => None,
    }
}

/// Return the number of leaves in the decomposition of the given character.
pub fn atom_count(dictionary: &Dictionary, glyph: &str) -> usize {
    fully_decompose(dictionary, glyph).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dictionary() -> Dictionary {
        Dictionary::from_json(
            r#"{
                "atomic": ["一", "日", "月", "木"],
                "entries": {
                    "二": ["一", "一"],
                    "三": ["二", "一"],
                    "明": ["日", "月"],
                    "林": ["木", "木"],
                    "森": ["木", "林"],
                    "木": ["十", "八"],
                    "品": ["口", "&品-1"],
                    "壊": ["土", "十", "衣"]
                },
                "intermediates": {"&品-1": ["口", "口"]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fully_decompose() {
        let dictionary = dictionary();
        assert_eq!(fully_decompose(&dictionary, "三"), vec!["一", "一", "一"]);
        assert_eq!(fully_decompose(&dictionary, "森"), vec!["木", "木", "木"]);
        assert_eq!(fully_decompose(&dictionary, "品"), vec!["口", "口", "口"]);
    }

    #[test]
    fn test_leaves() {
        let dictionary = dictionary();
        // Atomic, even with a rule
        assert_eq!(fully_decompose(&dictionary, "木"), vec!["木"]);
        assert_eq!(constituents_of(&dictionary, "木"), None);
        // Unknown character
        assert_eq!(fully_decompose(&dictionary, "龍"), vec!["龍"]);
        assert_eq!(constituents_of(&dictionary, "龍"), None);
        // Malformed rule
        assert_eq!(fully_decompose(&dictionary, "壊"), vec!["壊"]);
        assert_eq!(constituents_of(&dictionary, "壊"), None);
    }

    #[test]
    fn test_constituents_of() {
        let dictionary = dictionary();
        assert_eq!(
            constituents_of(&dictionary, "三"),
            Some((String::from("二"), String::from("一")))
        );
        assert_eq!(
            constituents_of(&dictionary, "品"),
            Some((String::from("口"), String::from("&品-1")))
        );
    }

    #[test]
    fn test_cycle_is_kept_as_leaf() {
        let dictionary = Dictionary::from_json(
            r#"{"entries": {"甲": ["乙", "口"], "乙": ["甲", "十"], "丙": ["丙", "一"]}}"#,
        )
        .unwrap();

        assert_eq!(fully_decompose(&dictionary, "甲"), vec!["甲", "十", "口"]);
        assert_eq!(fully_decompose(&dictionary, "丙"), vec!["丙", "一"]);
    }

    #[test]
    fn test_atom_count() {
        let dictionary = dictionary();
        assert_eq!(atom_count(&dictionary, "明"), 2);
        assert_eq!(atom_count(&dictionary, "品"), 3);
        assert_eq!(atom_count(&dictionary, "一"), 1);
    }

    proptest! {
        #[test]
        fn decomposition_is_a_fixed_point(index in 0usize..12) {
            let dictionary = dictionary();
            let glyphs = ["一", "二", "三", "明", "林", "森", "木", "品", "&品-1", "壊", "口", "龍"];
            let atoms = fully_decompose(&dictionary, glyphs[index]);
            let again: Vec<String> = atoms
                .iter()
                .flat_map(|atom| fully_decompose(&dictionary, atom))
                .collect();
            prop_assert_eq!(atoms, again);
        }

        #[test]
        fn atomic_characters_are_leaves(index in 0usize..4) {
            let dictionary = dictionary();
            let atomic = ["一", "日", "月", "木"];
            prop_assert_eq!(fully_decompose(&dictionary, atomic[index]), vec![atomic[index].to_string()]);
            prop_assert_eq!(constituents_of(&dictionary, atomic[index]), None);
        }
    }
}

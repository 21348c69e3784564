/*
checks.rs

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

//! Verify that the catalog can be played with the dictionary.
//!
//! For each character used in a catalog component, the check establishes whether the player can
//! obtain it: atomic characters and characters that have a rule are fine; characters without a
//! rule are still seeded on the board as leaves, but are reported; cycles are errors.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::catalog::Catalog;
use super::dictionary::{Collision, Dictionary, Node, NodeId};

/// How a character can be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Buildability {
    /// Declared atomic.
    Atomic,

    /// Composed from atomic characters only.
    Composite,

    /// No rule: the character is seeded as is.
    Undefined,

    /// Composed, but some leaf has no rule.
    ReliesOn(String),

    /// The rules loop back to the character.
    Cyclic,
}

impl Buildability {
    /// Whether the character cannot be obtained.
    pub fn is_error(&self) -> bool {
        matches!(self, Buildability::Cyclic)
    }

    /// Whether the character can be obtained, but the data should be reviewed.
    pub fn is_warning(&self) -> bool {
        matches!(self, Buildability::Undefined | Buildability::ReliesOn(_))
    }
}

/// Result of the checks.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Number of distinct characters checked.
    pub checked: usize,

    /// Characters with a warning or an error, and the entries that use them.
    pub findings: BTreeMap<String, (Buildability, BTreeSet<String>)>,

    /// Pairs of constituents shared by several composites.
    pub collisions: Vec<Collision>,
}

impl Report {
    /// Number of characters that cannot be obtained.
    pub fn errors(&self) -> usize {
        self.findings.values().filter(|(b, _)| b.is_error()).count()
    }

    /// Number of characters to review.
    pub fn warnings(&self) -> usize {
        self.findings.values().filter(|(b, _)| b.is_warning()).count()
    }
}

/// Memoized classification of the dictionary nodes.
struct Checker<'a> {
    dictionary: &'a Dictionary,
    memo: HashMap<NodeId, Buildability>,
    trail: Vec<NodeId>,
}

impl<'a> Checker<'a> {
    fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            memo: HashMap::new(),
            trail: Vec::new(),
        }
    }

    /// Classify a character.
    fn classify(&mut self, glyph: &str) -> Buildability {
        if self.dictionary.is_atomic(glyph) {
            return Buildability::Atomic;
        }
        match self.dictionary.id_of(glyph) {
            Some(id) => self.classify_node(id),
            None => Buildability::Undefined,
        }
    }

    /// Recursively classify a node.
    fn classify_node(&mut self, id: NodeId) -> Buildability {
        if let Some(b) = self.memo.get(&id) {
            return b.clone();
        }
        if self.trail.contains(&id) {
            return Buildability::Cyclic;
        }
        let dictionary: &'a Dictionary = self.dictionary;
        let result: Buildability = match dictionary.get(id) {
            Some(Node::Composite { left, right, .. }) => {
                self.trail.push(id);
                let mut result: Buildability = Buildability::Composite;
                for child in [*left, *right] {
                    let glyph: &str = dictionary.get(child).map(Node::glyph).unwrap_or_default();
                    let b: Buildability = if dictionary.is_atomic(glyph) {
                        Buildability::Atomic
                    } else {
                        self.classify_node(child)
                    };
                    match b {
                        Buildability::Cyclic => {
                            result = Buildability::Cyclic;
                            break;
                        }
                        Buildability::Undefined => {
                            result = Buildability::ReliesOn(glyph.to_string());
                        }
                        Buildability::ReliesOn(leaf) => result = Buildability::ReliesOn(leaf),
                        Buildability::Atomic | Buildability::Composite => (),
                    }
                }
                self.trail.pop();
                result
            }
            Some(Node::Atomic(glyph)) if dictionary.is_atomic(glyph) => Buildability::Atomic,
            _ => Buildability::Undefined,
        };
        // A cycle result depends on the current trail; do not memoize it
        if result != Buildability::Cyclic {
            self.memo.insert(id, result.clone());
        }
        result
    }
}

/// Check every character used in the catalog components.
pub fn check_catalog(dictionary: &Dictionary, catalog: &Catalog) -> Report {
    let mut checker: Checker = Checker::new(dictionary);
    let mut usage: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();

    for entry in catalog.entries() {
        for component in &entry.components {
            usage
                .entry(component.as_str())
                .or_default()
                .insert(entry.id.clone());
        }
    }

    let mut report: Report = Report {
        checked: usage.len(),
        collisions: dictionary.collisions().to_vec(),
        ..Default::default()
    };
    for (glyph, entries) in usage {
        let b: Buildability = checker.classify(glyph);
        if b.is_error() || b.is_warning() {
            report.findings.insert(glyph.to_string(), (b, entries));
        }
    }
    report
}

/*
dictionary.rs

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

//! Composition dictionary.
//!
//! The dictionary is an arena of [`Node`] objects indexed by a stable [`NodeId`].
//! A node is either a leaf ([`Node::Atomic`]) or a binary composition ([`Node::Composite`])
//! that references its two constituents by their identifiers.
//!
//! Characters with more than two parts are flattened into binary compositions with
//! intermediate nodes. Intermediate nodes are declared in their own section of the source
//! file and are tagged as such.
//!
//! Node identifiers follow the order of the source file sections (entries, then
//! intermediates), each sorted by key. That order is also the tie-break when several
//! composites share the same pair of constituents.

use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Identifier of a node in the dictionary arena.
pub type NodeId = usize;

/// Dictionary node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Leaf: atomic character, character without a rule, or character with a malformed rule.
    Atomic(String),

    /// Character composed of two constituents.
    Composite {
        glyph: String,
        left: NodeId,
        right: NodeId,

        /// Whether the node only exists to flatten a character with more than two parts.
        intermediate: bool,
    },
}

impl Node {
    /// Return the character that the node represents.
    pub fn glyph(&self) -> &str {
        match self {
            Node::Atomic(glyph) => glyph,
            Node::Composite { glyph, .. } => glyph,
        }
    }
}

/// Several composites share the same unordered pair of constituents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// Constituents, in canonical order.
    pub pair: (String, String),

    /// Composite returned when merging the pair.
    pub selected: String,

    /// Other composites with the same pair, which a merge never produces.
    pub shadowed: Vec<String>,
}

/// Source file format.
#[derive(Deserialize, Debug, Default)]
struct DictionaryFile {
    #[serde(default)]
    atomic: Vec<String>,

    #[serde(default)]
    entries: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    intermediates: BTreeMap<String, Vec<String>>,
}

/// Composition dictionary.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    /// Node arena.
    nodes: Vec<Node>,

    /// Node identifier for each known character.
    index: HashMap<String, NodeId>,

    /// Characters that are always leaves.
    atomic: HashSet<String>,

    /// Reverse index: canonical pair of constituents to the resulting composite.
    merges: HashMap<(String, String), NodeId>,

    /// Pairs that several composites share.
    collisions: Vec<Collision>,
}

/// Return the unordered pair in a canonical order.
fn canonical_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

impl Dictionary {
    /// Build the dictionary from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: DictionaryFile = serde_json::from_str(json)?;
        Ok(Self::from_parts(file.atomic, file.entries, file.intermediates))
    }

    /// Build the dictionary from the atomic set and the two rule sections.
    ///
    /// A rule that does not have exactly two constituents is ignored, and the character is
    /// then treated as a leaf.
    pub fn from_parts(
        atomic: Vec<String>,
        entries: BTreeMap<String, Vec<String>>,
        intermediates: BTreeMap<String, Vec<String>>,
    ) -> Self {
        let mut dictionary: Dictionary = Dictionary {
            atomic: atomic.into_iter().collect(),
            ..Default::default()
        };

        // First pass: reserve an identifier for every rule key, so that the rules can
        // reference keys that come later in the file.
        let mut pending: Vec<(NodeId, String, String, bool)> = Vec::new();
        for (section, intermediate) in [(entries, false), (intermediates, true)] {
            for (glyph, parts) in section {
                if dictionary.index.contains_key(&glyph) {
                    warn!("Duplicated rule for {glyph}: ignored");
                    continue;
                }
                let id: NodeId = dictionary.push(Node::Atomic(glyph.clone()));
                if dictionary.atomic.contains(&glyph) {
                    debug!("{glyph} is atomic: rule ignored");
                    continue;
                }
                match <[String; 2]>::try_from(parts) {
                    Ok([left, right]) => pending.push((id, left, right, intermediate)),
                    Err(parts) => warn!(
                        "Rule for {glyph} has {} constituents instead of 2: treated as a leaf",
                        parts.len()
                    ),
                }
            }
        }

        // Second pass: link the composites to their constituents
        for (id, left, right, intermediate) in pending {
            let left: NodeId = dictionary.intern(&left);
            let right: NodeId = dictionary.intern(&right);
            let glyph: String = dictionary.nodes[id].glyph().to_string();
            dictionary.nodes[id] = Node::Composite {
                glyph,
                left,
                right,
                intermediate,
            };
        }

        dictionary.build_merge_index();
        debug!(
            "Dictionary: {} nodes, {} merge rules, {} collisions",
            dictionary.nodes.len(),
            dictionary.merges.len(),
            dictionary.collisions.len()
        );
        dictionary
    }

    /// Add a node to the arena.
    fn push(&mut self, node: Node) -> NodeId {
        let id: NodeId = self.nodes.len();
        self.index.insert(node.glyph().to_string(), id);
        self.nodes.push(node);
        id
    }

    /// Return the identifier of the given character, adding a leaf if the character is unknown.
    fn intern(&mut self, glyph: &str) -> NodeId {
        match self.index.get(glyph) {
            Some(id) => *id,
            None => self.push(Node::Atomic(glyph.to_string())),
        }
    }

    /// Build the reverse index. The first composite in arena order wins a shared pair.
    fn build_merge_index(&mut self) {
        let mut shared: BTreeMap<(String, String), Vec<NodeId>> = BTreeMap::new();

        for (id, node) in self.nodes.iter().enumerate() {
            if let Node::Composite { left, right, .. } = node {
                let pair = canonical_pair(self.nodes[*left].glyph(), self.nodes[*right].glyph());
                shared.entry(pair).or_default().push(id);
            }
        }

        for (pair, ids) in shared {
            if ids.len() > 1 {
                let collision: Collision = Collision {
                    pair: pair.clone(),
                    selected: self.nodes[ids[0]].glyph().to_string(),
                    shadowed: ids[1..]
                        .iter()
                        .map(|id| self.nodes[*id].glyph().to_string())
                        .collect(),
                };
                warn!(
                    "{} and {} compose several characters: {} is selected over {:?}",
                    pair.0, pair.1, collision.selected, collision.shadowed
                );
                self.collisions.push(collision);
            }
            self.merges.insert(pair, ids[0]);
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the dictionary has no node.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the character is declared atomic.
    pub fn is_atomic(&self, glyph: &str) -> bool {
        self.atomic.contains(glyph)
    }

    /// Whether the character is an intermediate node.
    pub fn is_intermediate(&self, glyph: &str) -> bool {
        matches!(
            self.node(glyph),
            Some(Node::Composite {
                intermediate: true,
                ..
            })
        )
    }

    /// Return the identifier of the given character.
    pub fn id_of(&self, glyph: &str) -> Option<NodeId> {
        self.index.get(glyph).copied()
    }

    /// Return the node with the given identifier.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Return the node for the given character.
    pub fn node(&self, glyph: &str) -> Option<&Node> {
        self.id_of(glyph).and_then(|id| self.nodes.get(id))
    }

    /// Return the composite made of the two characters, in any order.
    pub fn lookup_pair(&self, a: &str, b: &str) -> Option<&Node> {
        self.merges
            .get(&canonical_pair(a, b))
            .and_then(|id| self.nodes.get(*id))
    }

    /// Return the pairs shared by several composites.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Iterate over the composites as `(composite, left, right)` triplets, in arena order.
    pub fn composites(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Composite {
                glyph, left, right, ..
            } => Some((
                glyph.as_str(),
                self.nodes[*left].glyph(),
                self.nodes[*right].glyph(),
            )),
            Node::Atomic(_) => None,
        })
    }
}

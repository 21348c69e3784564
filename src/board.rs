/*
board.rs

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

//! Manage the parts on the board.
//!
//! The board is a fixed-size grid of cells.
//! Each cell is empty or holds one [`BoardPart`] object.

use log::{debug, warn};
use rand::Rng;
use rand::seq::index::sample;

/// Identifier of a part, unique within a stage.
pub type PartId = u64;

/// Origin of a part.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PartClass {
    /// Seeded at the beginning of the stage, or produced by a split.
    Raw,

    /// Produced by a merge.
    Composed,
}

/// Part on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardPart {
    /// Part identifier.
    pub id: PartId,

    /// Character of the part.
    pub glyph: String,

    pub class: PartClass,

    /// Index of the cell that holds the part.
    pub cell: usize,
}

/// Board object.
#[derive(Debug, Clone)]
pub struct Board {
    /// Cells, in reading order.
    cells: Vec<Option<BoardPart>>,

    /// Identifier for the next part.
    next_id: PartId,
}

impl Board {
    /// Create an empty [`Board`] object with the given number of cells.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![None; size],
            next_id: 1,
        }
    }

    /// Place the given characters on distinct random cells.
    ///
    /// Characters that do not fit on the board are dropped.
    pub fn scatter<R: Rng + ?Sized>(&mut self, glyphs: &[String], rng: &mut R) {
        let empty: Vec<usize> = self.empty_cells().collect();
        if glyphs.len() > empty.len() {
            warn!(
                "{} parts for {} free cells: {:?} dropped",
                glyphs.len(),
                empty.len(),
                &glyphs[empty.len()..]
            );
        }
        let amount: usize = glyphs.len().min(empty.len());
        for (glyph, i) in glyphs.iter().zip(sample(rng, empty.len(), amount)) {
            self.spawn(glyph, PartClass::Raw, empty[i]);
        }
    }

    /// Return the number of cells.
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    /// Return the part in the given cell.
    pub fn get(&self, cell: usize) -> Option<&BoardPart> {
        self.cells.get(cell).and_then(Option::as_ref)
    }

    /// Return the part with the given identifier.
    pub fn part(&self, id: PartId) -> Option<&BoardPart> {
        self.parts().find(|p| p.id == id)
    }

    /// Return the cell that holds the part with the given identifier.
    pub fn cell_of(&self, id: PartId) -> Option<usize> {
        self.part(id).map(|p| p.cell)
    }

    /// Iterate over the parts, in cell order.
    pub fn parts(&self) -> impl Iterator<Item = &BoardPart> {
        self.cells.iter().flatten()
    }

    /// Iterate over the indexes of the empty cells.
    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
    }

    /// Return the first empty cell.
    pub fn first_empty(&self) -> Option<usize> {
        self.empty_cells().next()
    }

    /// Whether the cell exists and is empty.
    pub fn is_empty_cell(&self, cell: usize) -> bool {
        matches!(self.cells.get(cell), Some(None))
    }

    /// Create a part in the given empty cell.
    ///
    /// Return the identifier of the new part, or `None` if the cell does not exist or is occupied.
    pub fn spawn(&mut self, glyph: &str, class: PartClass, cell: usize) -> Option<PartId> {
        if !self.is_empty_cell(cell) {
            warn!("Cannot place {glyph} in cell {cell}");
            return None;
        }
        let id: PartId = self.next_id;
        self.next_id += 1;
        self.cells[cell] = Some(BoardPart {
            id,
            glyph: glyph.to_string(),
            class,
            cell,
        });
        debug!("Part {id} ({glyph}) placed in cell {cell}");
        Some(id)
    }

    /// Remove the part with the given identifier from the board, and return it.
    pub fn remove(&mut self, id: PartId) -> Option<BoardPart> {
        let cell: usize = self.cell_of(id)?;
        self.cells[cell].take()
    }

    /// Move a part to an empty cell.
    ///
    /// Return `false` if the part does not exist or the destination is not empty.
    pub fn move_part(&mut self, id: PartId, cell: usize) -> bool {
        if !self.is_empty_cell(cell) {
            return false;
        }
        match self.remove(id) {
            Some(mut part) => {
                part.cell = cell;
                self.cells[cell] = Some(part);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn glyphs(g: &[&str]) -> Vec<String> {
        g.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_scatter_distinct_cells() {
        let mut board = Board::new(16);
        let mut rng = StdRng::seed_from_u64(1);
        board.scatter(&glyphs(&["日", "月", "日", "木"]), &mut rng);

        assert_eq!(board.parts().count(), 4);
        assert_eq!(board.empty_cells().count(), 12);
        let mut placed: Vec<&str> = board.parts().map(|p| p.glyph.as_str()).collect();
        placed.sort();
        assert_eq!(placed, vec!["日", "日", "月", "木"]);
        assert!(board.parts().all(|p| p.class == PartClass::Raw));
    }

    #[test]
    fn test_scatter_overflow() {
        let mut board = Board::new(2);
        let mut rng = StdRng::seed_from_u64(2);
        board.scatter(&glyphs(&["一", "二", "三"]), &mut rng);
        assert_eq!(board.parts().count(), 2);
        assert_eq!(board.first_empty(), None);
    }

    #[test]
    fn test_spawn_move_remove() {
        let mut board = Board::new(4);
        let a = board.spawn("一", PartClass::Raw, 1).unwrap();
        let b = board.spawn("二", PartClass::Composed, 2).unwrap();
        assert_ne!(a, b);
        assert_eq!(board.spawn("三", PartClass::Raw, 2), None);
        assert_eq!(board.spawn("三", PartClass::Raw, 9), None);
        assert_eq!(board.first_empty(), Some(0));

        assert!(board.move_part(a, 3));
        assert!(!board.move_part(a, 2));
        assert_eq!(board.cell_of(a), Some(3));
        assert_eq!(board.get(3).unwrap().glyph, "一");
        assert!(board.get(1).is_none());

        let removed = board.remove(b).unwrap();
        assert_eq!(removed.glyph, "二");
        assert!(board.remove(b).is_none());
        assert!(!board.move_part(b, 0));
    }
}

//! Board module - dense grid storage
//!
//! The board is a runtime-sized `width x height` grid stored as a flat
//! vector in row-major order (y * width + x). Every cell always holds
//! exactly one piece; empty cells hold a piece of kind `Empty`, never a
//! gap. Coordinates: (x, y) with x left to right, y top to bottom.

use arrayvec::ArrayVec;

use crate::core::piece::Piece;
use crate::types::{PieceKind, Position};

/// The game grid - dense piece storage with coordinate bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of pieces, row-major order (y * width + x).
    cells: Vec<Piece>,
}

impl Board {
    /// Create a board filled with empty placeholder pieces.
    pub fn new(width: u8, height: u8) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height as i8 {
            for x in 0..width as i8 {
                cells.push(Piece::empty(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Calculate flat index from (x, y) coordinates.
    #[inline]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn in_bounds(&self, x: i8, y: i8) -> bool {
        x >= 0 && x < self.width as i8 && y >= 0 && y < self.height as i8
    }

    /// Piece at (x, y), or None if out of bounds.
    pub fn get(&self, x: i8, y: i8) -> Option<&Piece> {
        self.index(x, y).map(|idx| &self.cells[idx])
    }

    pub fn get_mut(&mut self, x: i8, y: i8) -> Option<&mut Piece> {
        self.index(x, y).map(move |idx| &mut self.cells[idx])
    }

    /// Place a piece at (x, y), overwriting the previous occupant.
    /// The piece's stored coordinates are updated to match the cell.
    /// Returns false if out of bounds.
    pub fn set(&mut self, x: i8, y: i8, mut piece: Piece) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                piece.set_position(x, y);
                self.cells[idx] = piece;
                true
            }
            None => false,
        }
    }

    /// Swap the contents of two cells, keeping each piece's stored
    /// coordinates in sync with its new cell. The grid's logical state is
    /// updated immediately; any visual interpolation is the caller's
    /// concern. Returns false if either position is out of bounds.
    pub fn swap_cells(&mut self, a: Position, b: Position) -> bool {
        let (Some(ia), Some(ib)) = (self.index(a.x, a.y), self.index(b.x, b.y)) else {
            return false;
        };
        self.cells.swap(ia, ib);
        self.cells[ia].set_position(a.x, a.y);
        self.cells[ib].set_position(b.x, b.y);
        true
    }

    /// Orthogonal neighbors of a cell that are in bounds.
    pub fn neighbors(&self, x: i8, y: i8) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            let (nx, ny) = (x + dx, y + dy);
            if self.in_bounds(nx, ny) {
                out.push(Position::new(nx, ny));
            }
        }
        out
    }

    /// Count cells holding a piece of the given kind.
    pub fn count_kind(&self, kind: PieceKind) -> usize {
        self.cells.iter().filter(|p| p.kind() == kind).count()
    }

    /// Positions of all pieces of the given kind, row-major order.
    /// Obstacle objectives use this to count remaining blockers.
    pub fn positions_of_kind(&self, kind: PieceKind) -> Vec<Position> {
        self.cells
            .iter()
            .filter(|p| p.kind() == kind)
            .map(|p| p.position())
            .collect()
    }

    /// All pieces in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.cells.iter()
    }
}

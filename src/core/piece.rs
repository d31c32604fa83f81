//! Piece model - a single grid cell occupant
//!
//! Capability checks (movable / colored / clearable) are pattern matches on
//! the kind tag rather than optional behavior components. A piece's stored
//! coordinates always equal the cell it occupies while at rest; the board is
//! responsible for keeping them in sync when pieces move.

use crate::types::{PieceColor, PieceKind, Position};

/// One grid cell occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    color: Option<PieceColor>,
    x: i8,
    y: i8,
    score: u32,
    being_cleared: bool,
}

impl Piece {
    /// Create a piece at the given cell. Color is assigned separately
    /// (only meaningful for colored kinds).
    pub fn new(x: i8, y: i8, kind: PieceKind, score: u32) -> Self {
        Self {
            kind,
            color: None,
            x,
            y,
            score,
            being_cleared: false,
        }
    }

    /// Convenience constructor for an empty placeholder cell.
    pub fn empty(x: i8, y: i8) -> Self {
        Self::new(x, y, PieceKind::Empty, 0)
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Option<PieceColor> {
        self.color
    }

    pub fn x(&self) -> i8 {
        self.x
    }

    pub fn y(&self) -> i8 {
        self.y
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Score value reported with the `PieceCleared` event.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether gravity or a swap may relocate this piece.
    /// Empty placeholders and obstacles never move.
    pub fn is_movable(&self) -> bool {
        !matches!(self.kind, PieceKind::Empty | PieceKind::Obstacle)
    }

    /// Whether clear logic may remove this piece. Everything but the
    /// Empty placeholder is clearable (obstacles clear via adjacency).
    pub fn is_clearable(&self) -> bool {
        self.kind != PieceKind::Empty
    }

    /// Whether this piece carries a concrete color. A Rainbow piece acting
    /// as a wildcard has no color and never participates in matches.
    pub fn is_colored(&self) -> bool {
        self.color.is_some()
    }

    /// Whether this piece is a colored piece of exactly the given color.
    pub fn matches_color(&self, color: PieceColor) -> bool {
        self.color == Some(color)
    }

    pub fn is_being_cleared(&self) -> bool {
        self.being_cleared
    }

    pub fn set_color(&mut self, color: Option<PieceColor>) {
        self.color = color;
    }

    /// Mark this piece as mid-clear so a second clear is a no-op.
    pub(crate) fn mark_being_cleared(&mut self) {
        self.being_cleared = true;
    }

    pub(crate) fn set_position(&mut self, x: i8, y: i8) {
        self.x = x;
        self.y = y;
    }
}

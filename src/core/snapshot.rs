//! Read-only view of the grid for renderers and UIs
//!
//! A snapshot copies out only what a view layer needs to draw a frame:
//! per-cell kind and color, the filling flag, and the current selection.
//! Callers that render every frame reuse one snapshot via
//! [`crate::core::GridState::snapshot_into`] to avoid reallocating.

use crate::types::{PieceColor, PieceKind, Position};

/// One cell as a renderer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSnapshot {
    pub kind: PieceKind,
    pub color: Option<PieceColor>,
}

/// Renderer-facing copy of the grid state.
#[derive(Debug, Clone, Default)]
pub struct GridSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major, `width * height` entries.
    pub cells: Vec<CellSnapshot>,
    pub filling: bool,
    pub game_over: bool,
    pub pressed: Option<Position>,
    pub entered: Option<Position>,
}

impl GridSnapshot {
    /// Cell at (x, y), or None if out of bounds.
    pub fn cell(&self, x: i8, y: i8) -> Option<&CellSnapshot> {
        if x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8 {
            return None;
        }
        self.cells
            .get((y as usize) * (self.width as usize) + (x as usize))
    }
}

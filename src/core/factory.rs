//! Piece factory - kind registration and score values
//!
//! The grid requests every new piece from the factory instead of building
//! pieces inline; the registry doubles as the fail-fast check that every
//! piece kind a level can reference has been configured before the grid
//! starts. Score values ride on the spawned pieces and surface in
//! `PieceCleared` events.

use crate::core::piece::Piece;
use crate::types::PieceKind;

/// Registry of spawnable piece kinds with their per-piece score values.
#[derive(Debug, Clone, Default)]
pub struct PieceFactory {
    scores: [Option<u32>; PieceKind::COUNT],
}

impl PieceFactory {
    /// Empty registry; nothing is spawnable until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every kind registered at the stock score values.
    pub fn standard() -> Self {
        let mut factory = Self::new();
        factory.register(PieceKind::Empty, 0);
        factory.register(PieceKind::Normal, 100);
        factory.register(PieceKind::RowClear, 200);
        factory.register(PieceKind::ColumnClear, 200);
        factory.register(PieceKind::Rainbow, 500);
        factory.register(PieceKind::Obstacle, 1000);
        factory
    }

    /// Register (or re-register) a kind with its score value.
    pub fn register(&mut self, kind: PieceKind, score: u32) {
        self.scores[kind as usize] = Some(score);
    }

    pub fn is_registered(&self, kind: PieceKind) -> bool {
        self.scores[kind as usize].is_some()
    }

    /// Registered score for a kind.
    pub fn score(&self, kind: PieceKind) -> Option<u32> {
        self.scores[kind as usize]
    }

    /// Spawn a piece of the given kind at a cell. The grid validates the
    /// registry up front, so an unregistered kind here falls back to a
    /// zero score rather than failing mid-cascade.
    pub fn spawn(&self, x: i8, y: i8, kind: PieceKind) -> Piece {
        Piece::new(x, y, kind, self.score(kind).unwrap_or(0))
    }
}

//! Core types shared across the crate
//!
//! Pure data types used by the grid, the match detector, and the cascade
//! simulator. Serde derives are provided so level configurations can be
//! expressed as data files.

use serde::{Deserialize, Serialize};

/// Minimum run length that counts as a match.
pub const MIN_MATCH_LEN: usize = 3;

/// Match size that promotes one cell to a RowClear/ColumnClear piece.
pub const LINE_PIECE_MATCH_LEN: usize = 4;

/// Match size (and above) that promotes one cell to a Rainbow piece.
pub const RAINBOW_MATCH_LEN: usize = 5;

/// Default pacing hint between simulation steps (milliseconds).
///
/// The core never sleeps; this is carried through the config so a caller
/// can pace its view-layer animation between [`crate::core::GridState::step`]
/// calls.
pub const DEFAULT_STEP_MS: u32 = 100;

/// Smallest playable grid dimension.
pub const MIN_GRID_DIM: u8 = 3;

/// Smallest number of colors that keeps a board from matching itself
/// endlessly on refill.
pub const MIN_COLOR_COUNT: usize = 3;

/// Piece kinds on the grid.
///
/// Every cell always holds exactly one piece; `Empty` is a real piece kind,
/// not an absent cell, so the grid stays dense at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Empty,
    Normal,
    Obstacle,
    RowClear,
    ColumnClear,
    Rainbow,
}

impl PieceKind {
    /// Number of piece kinds (factory registry size).
    pub const COUNT: usize = 6;

    /// All kinds, in registry order.
    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::Empty,
        PieceKind::Normal,
        PieceKind::Obstacle,
        PieceKind::RowClear,
        PieceKind::ColumnClear,
        PieceKind::Rainbow,
    ];

    /// Convert to a stable lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::Empty => "empty",
            PieceKind::Normal => "normal",
            PieceKind::Obstacle => "obstacle",
            PieceKind::RowClear => "row_clear",
            PieceKind::ColumnClear => "column_clear",
            PieceKind::Rainbow => "rainbow",
        }
    }
}

/// Visual color categories for colored pieces.
///
/// A level opts into a prefix of this palette via
/// [`crate::core::GridConfig::color_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceColor {
    Red,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
}

impl PieceColor {
    /// Full palette, in spawn-index order.
    pub const PALETTE: [PieceColor; 6] = [
        PieceColor::Red,
        PieceColor::Yellow,
        PieceColor::Green,
        PieceColor::Blue,
        PieceColor::Purple,
        PieceColor::Pink,
    ];

    /// Color for a spawn index, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::PALETTE.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceColor::Red => "red",
            PieceColor::Yellow => "yellow",
            PieceColor::Green => "green",
            PieceColor::Blue => "blue",
            PieceColor::Purple => "purple",
            PieceColor::Pink => "pink",
        }
    }
}

/// A grid coordinate: 0-indexed, y increasing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i8,
    pub y: i8,
}

impl Position {
    pub fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Grid adjacency: same row or column, Manhattan distance 1.
    pub fn is_adjacent(&self, other: &Position) -> bool {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx + dy == 1
    }
}

/// Events emitted by the grid state machine, drained by the caller via
/// [`crate::core::GridState::take_events`].
///
/// `PieceCleared` fires exactly once per piece as it is cleared (the
/// `being_cleared` flag makes re-clears no-ops); objective trackers
/// accumulate score and obstacle progress from it. `MoveMade` fires once
/// per successful swap for move-limited objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridEvent {
    PieceCleared {
        kind: PieceKind,
        color: Option<PieceColor>,
        score: u32,
        x: i8,
        y: i8,
    },
    MoveMade,
}

/// Outcome of a single discrete simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// At least one piece fell or spawned this step.
    Moved,
    /// The grid had settled and a clear pass removed at least one match.
    Cleared,
    /// No movement and no matches: the grid is stable.
    Quiescent,
}

//! Core module - pure match-3 grid logic with no I/O dependencies
//!
//! This module contains all the grid rules: piece capabilities, match
//! detection, special-piece promotion, chain reactions, and the gravity
//! cascade. It has zero dependencies on rendering, input, or networking;
//! callers drive it through [`GridState`] and observe it through events
//! and snapshots.

pub mod board;
pub mod cascade;
pub mod config;
pub mod factory;
pub mod grid;
pub mod matcher;
pub mod piece;
pub mod rng;
pub mod snapshot;

// Re-export commonly used types
pub use board::Board;
pub use cascade::fill_step;
pub use config::{ConfigError, GridConfig, Placement, MAX_GRID_DIM};
pub use factory::PieceFactory;
pub use grid::GridState;
pub use matcher::find_match;
pub use piece::Piece;
pub use rng::SimpleRng;
pub use snapshot::{CellSnapshot, GridSnapshot};

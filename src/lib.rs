//! Match-3 grid rules engine.
//!
//! A deterministic, headless simulation of a tile-matching grid: swap
//! validation, line and L/T match detection, special-piece promotion,
//! chain reactions, and a gravity cascade with diagonal slides and
//! top-row refill. The crate owns the rules only; rendering, input
//! devices, and objective bookkeeping belong to the caller, which drives
//! the grid through [`core::GridState`] and observes it through drained
//! events and snapshots.
//!
//! ```
//! use match3_grid::core::{GridConfig, GridState, PieceFactory};
//! use match3_grid::types::PieceKind;
//!
//! let mut config = GridConfig::new(8, 8);
//! config.seed = 42;
//! let mut grid = GridState::new(config, PieceFactory::standard())?;
//!
//! // The first resolve populates the board and settles every cascade
//! grid.resolve();
//! assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
//!
//! // A swap attempt: press, drag, release
//! grid.press(3, 4);
//! grid.enter(3, 5);
//! if grid.release() {
//!     grid.resolve();
//!     for event in grid.take_events() {
//!         // score and objective tracking happens here
//!         let _ = event;
//!     }
//! }
//! # Ok::<(), match3_grid::core::ConfigError>(())
//! ```

pub mod core;
pub mod types;

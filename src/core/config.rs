//! Level configuration - grid dimensions, pacing, and seed placements
//!
//! A level is plain data: grid size, step pacing, the number of colors in
//! play, an RNG seed, and an ordered list of initial piece placements.
//! Validation is fail-fast for structural problems (sizes, missing factory
//! registrations); out-of-bounds placements are lenient and merely dropped
//! with a warning when the grid is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::factory::PieceFactory;
use crate::types::{PieceColor, PieceKind, DEFAULT_STEP_MS, MIN_COLOR_COUNT, MIN_GRID_DIM};

/// Largest grid dimension the i8 coordinate space supports.
pub const MAX_GRID_DIM: u8 = i8::MAX as u8;

/// An initial piece placement: (x, y, kind), applied in order before the
/// first fill pass. Cells left unseeded start empty and are refilled from
/// the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub x: i8,
    pub y: i8,
    pub kind: PieceKind,
}

/// Grid construction parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub width: u8,
    pub height: u8,
    /// Pacing hint between simulation steps, in milliseconds. The core
    /// never sleeps; callers use this to time view-layer animation.
    #[serde(default = "default_step_ms")]
    pub step_ms: u32,
    /// How many palette colors are in play for random refills.
    #[serde(default = "default_color_count")]
    pub color_count: usize,
    /// RNG seed; a given seed replays the exact same game.
    #[serde(default)]
    pub seed: u32,
    #[serde(default)]
    pub placements: Vec<Placement>,
}

fn default_step_ms() -> u32 {
    DEFAULT_STEP_MS
}

fn default_color_count() -> usize {
    MIN_COLOR_COUNT + 2
}

impl GridConfig {
    /// Config with default pacing, colors, and no seed placements.
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            step_ms: default_step_ms(),
            color_count: default_color_count(),
            seed: 1,
            placements: Vec::new(),
        }
    }

    /// Structural validation, run before the grid starts.
    pub fn validate(&self, factory: &PieceFactory) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_DIM || self.height < MIN_GRID_DIM {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.width > MAX_GRID_DIM || self.height > MAX_GRID_DIM {
            return Err(ConfigError::GridTooLarge {
                width: self.width,
                height: self.height,
            });
        }
        if self.color_count < MIN_COLOR_COUNT || self.color_count > PieceColor::PALETTE.len() {
            return Err(ConfigError::BadColorCount(self.color_count));
        }
        // Any kind can appear at runtime through promotion, so all of
        // them must be spawnable before the grid starts.
        for kind in PieceKind::ALL {
            if !factory.is_registered(kind) {
                return Err(ConfigError::UnregisteredKind(kind));
            }
        }
        Ok(())
    }
}

/// Fatal configuration problems, reported before any simulation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("grid {width}x{height} is below the {MIN_GRID_DIM}x{MIN_GRID_DIM} minimum")]
    GridTooSmall { width: u8, height: u8 },
    #[error("grid {width}x{height} exceeds the {MAX_GRID_DIM}x{MAX_GRID_DIM} maximum")]
    GridTooLarge { width: u8, height: u8 },
    #[error("color count {0} is outside the supported range")]
    BadColorCount(usize),
    #[error("piece kind `{}` has no registered factory entry", .0.as_str())]
    UnregisteredKind(PieceKind),
}

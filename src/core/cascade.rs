//! Cascade simulator - gravity, diagonal slides, and top-row refill
//!
//! A single [`fill_step`] moves every piece that can fall one row and
//! spawns fresh pieces into empty top-row cells. The grid state machine
//! loops it (flipping scan direction each step) until nothing moves, then
//! re-runs match clearing; that loop's fixed point is the quiescent grid.

use crate::core::board::Board;
use crate::core::factory::PieceFactory;
use crate::core::rng::SimpleRng;
use crate::types::{PieceColor, PieceKind, Position};

/// One gravity pass over the whole grid.
///
/// Rows are processed bottom-up starting at the second-to-last row;
/// columns left-to-right, or right-to-left when `inverse` is set (the
/// caller alternates `inverse` between steps so diagonal slides carry no
/// directional bias). A movable piece falls straight into an empty cell
/// below it, or slides diagonally into an empty cell one row down when
/// that column cannot be filled by a straight fall. Afterwards every
/// empty top-row cell receives a fresh normal piece of uniformly random
/// color. Returns whether anything moved or spawned.
pub fn fill_step(
    board: &mut Board,
    rng: &mut SimpleRng,
    factory: &PieceFactory,
    color_count: usize,
    inverse: bool,
) -> bool {
    let width = board.width() as i8;
    let height = board.height() as i8;
    let mut moved = false;

    for y in (0..height - 1).rev() {
        for loop_x in 0..width {
            let x = if inverse { width - 1 - loop_x } else { loop_x };

            if !board.get(x, y).is_some_and(|p| p.is_movable()) {
                continue;
            }

            if is_empty(board, x, y + 1) {
                board.swap_cells(Position::new(x, y), Position::new(x, y + 1));
                moved = true;
                continue;
            }

            // Straight fall blocked: try the diagonals, mirrored under
            // the inverse scan so neither side is favored overall.
            for diag in [-1i8, 1] {
                let diag_x = if inverse { x - diag } else { x + diag };
                if diag_x < 0 || diag_x >= width {
                    continue;
                }
                if !is_empty(board, diag_x, y + 1) {
                    continue;
                }
                if column_blocked_above(board, diag_x, y) {
                    continue;
                }

                board.swap_cells(Position::new(x, y), Position::new(diag_x, y + 1));
                moved = true;
                break;
            }
        }
    }

    for x in 0..width {
        if is_empty(board, x, 0) {
            let mut piece = factory.spawn(x, 0, PieceKind::Normal);
            piece.set_color(PieceColor::from_index(rng.pick_index(color_count)));
            board.set(x, 0, piece);
            moved = true;
        }
    }

    moved
}

fn is_empty(board: &Board, x: i8, y: i8) -> bool {
    board.get(x, y).is_some_and(|p| p.kind() == PieceKind::Empty)
}

/// Whether the column above (x, y) can still feed the cell below (x, y)
/// by straight falls, which forbids diagonal slides into it.
///
/// Walking upward from row y: a movable piece means the column is fed
/// from above (blocked); an immovable non-empty piece caps the column
/// (open for a slide); an entirely empty column is fed by top-row spawns
/// (blocked).
fn column_blocked_above(board: &Board, x: i8, y: i8) -> bool {
    for check_y in (0..=y).rev() {
        let Some(piece) = board.get(x, check_y) else {
            return true;
        };
        if piece.is_movable() {
            return true;
        }
        if piece.kind() != PieceKind::Empty {
            return false;
        }
    }
    true
}

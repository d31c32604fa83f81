//! Match detector - maximal same-color runs through a seed cell
//!
//! Pure functions over a board snapshot: no mutation, deterministic for a
//! given board. A match is a contiguous run of >= 3 same-colored pieces
//! along a row or column, optionally extended into an L/T shape by the
//! first run piece with a perpendicular run of >= 2 additional pieces.
//! Uncolored pieces (Empty, Obstacle, wildcard Rainbow) never seed or
//! join a match.

use crate::core::board::Board;
use crate::types::{PieceColor, Position, MIN_MATCH_LEN};

/// Minimum number of additional perpendicular pieces that turns a line
/// run into an L/T match.
const MIN_BRANCH_LEN: usize = 2;

/// Find the match containing the seed cell, if any.
///
/// Checks the horizontal run through the seed first, then the vertical
/// run; a qualifying run is extended with the first perpendicular branch
/// of >= 2 pieces found while walking the run in order. "First
/// qualifying branch wins" over "largest branch" - deliberately, since
/// the choice feeds promotion placement.
pub fn find_match(board: &Board, x: i8, y: i8) -> Option<Vec<Position>> {
    let seed = board.get(x, y)?;
    let color = seed.color()?;

    let horizontal = line_run(board, x, y, color, true);
    if horizontal.len() >= MIN_MATCH_LEN {
        return Some(with_branch(board, horizontal, color, true));
    }

    let vertical = line_run(board, x, y, color, false);
    if vertical.len() >= MIN_MATCH_LEN {
        return Some(with_branch(board, vertical, color, false));
    }

    None
}

/// Contiguous same-color run through (x, y) along one axis, seed
/// included. Stops at the first uncolored, differently colored, or
/// out-of-bounds cell in each direction.
fn line_run(board: &Board, x: i8, y: i8, color: PieceColor, horizontal: bool) -> Vec<Position> {
    let mut run = vec![Position::new(x, y)];
    let extent = if horizontal {
        board.width()
    } else {
        board.height()
    } as i8;

    for dir in [-1i8, 1] {
        for offset in 1..extent {
            let (cx, cy) = if horizontal {
                (x + dir * offset, y)
            } else {
                (x, y + dir * offset)
            };

            match board.get(cx, cy) {
                Some(piece) if piece.matches_color(color) => run.push(Position::new(cx, cy)),
                _ => break,
            }
        }
    }

    run
}

/// Extend a base line run into an L/T shape using the first piece of the
/// run whose perpendicular run has at least [`MIN_BRANCH_LEN`] extra
/// pieces. Returns the base run unchanged when no branch qualifies.
fn with_branch(
    board: &Board,
    base: Vec<Position>,
    color: PieceColor,
    base_horizontal: bool,
) -> Vec<Position> {
    let extent = if base_horizontal {
        board.height()
    } else {
        board.width()
    } as i8;

    for &pos in &base {
        let mut branch = Vec::new();

        for dir in [-1i8, 1] {
            for offset in 1..extent {
                let (cx, cy) = if base_horizontal {
                    (pos.x, pos.y + dir * offset)
                } else {
                    (pos.x + dir * offset, pos.y)
                };

                match board.get(cx, cy) {
                    Some(piece) if piece.matches_color(color) => {
                        branch.push(Position::new(cx, cy));
                    }
                    _ => break,
                }
            }
        }

        if branch.len() >= MIN_BRANCH_LEN {
            let mut combined = base;
            combined.extend(branch);
            return combined;
        }
    }

    base
}

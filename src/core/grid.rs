//! Grid state machine - swaps, clears, promotion, and the cascade loop
//!
//! `GridState` owns the piece array and everything that mutates it: the
//! press/enter/release input surface, swap validation, match clearing with
//! special-piece promotion, chain reactions, and the fill-until-stable
//! cascade loop. It is a single-writer state machine advanced by discrete
//! [`GridState::step`] calls; all pacing between steps is the caller's
//! responsibility.

use tracing::{debug, warn};

use crate::core::board::Board;
use crate::core::cascade::fill_step;
use crate::core::config::{ConfigError, GridConfig};
use crate::core::factory::PieceFactory;
use crate::core::matcher::find_match;
use crate::core::rng::SimpleRng;
use crate::core::snapshot::{CellSnapshot, GridSnapshot};
use crate::types::{
    GridEvent, PieceColor, PieceKind, Position, StepOutcome, LINE_PIECE_MATCH_LEN,
    RAINBOW_MATCH_LEN,
};

/// The complete grid simulation state.
#[derive(Debug, Clone)]
pub struct GridState {
    board: Board,
    rng: SimpleRng,
    factory: PieceFactory,
    color_count: usize,
    step_ms: u32,
    game_over: bool,
    filling: bool,
    inverse: bool,
    pressed: Option<Position>,
    entered: Option<Position>,
    /// Endpoints of the swap whose clear pass is currently running;
    /// cascade-produced clear passes have no swap context.
    swap_context: Option<(Position, Position)>,
    events: Vec<GridEvent>,
}

impl GridState {
    /// Build a grid from a level config and a piece factory.
    ///
    /// Fails fast on structural config problems (sizes, colors, kinds
    /// missing from the factory). Out-of-bounds seed placements are
    /// dropped with a warning. The grid starts in the filling state so
    /// the first [`resolve`](Self::resolve) populates every cell.
    pub fn new(config: GridConfig, factory: PieceFactory) -> Result<Self, ConfigError> {
        config.validate(&factory)?;

        let mut board = Board::new(config.width, config.height);
        let mut rng = SimpleRng::new(config.seed);

        for placement in &config.placements {
            if !board.in_bounds(placement.x, placement.y) {
                warn!(
                    x = placement.x,
                    y = placement.y,
                    kind = placement.kind.as_str(),
                    "dropping out-of-bounds seed placement"
                );
                continue;
            }

            let mut piece = factory.spawn(placement.x, placement.y, placement.kind);
            if matches!(
                placement.kind,
                PieceKind::Normal | PieceKind::RowClear | PieceKind::ColumnClear
            ) {
                piece.set_color(PieceColor::from_index(rng.pick_index(config.color_count)));
            }
            board.set(placement.x, placement.y, piece);
        }

        Ok(Self {
            board,
            rng,
            factory,
            color_count: config.color_count,
            step_ms: config.step_ms,
            game_over: false,
            filling: true,
            inverse: false,
            pressed: None,
            entered: None,
            swap_context: None,
            events: Vec::new(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Whether a cascade is still in flight. Objective trackers must wait
    /// for `false` before end-of-game evaluation: a running cascade may
    /// still clear objective pieces.
    pub fn is_filling(&self) -> bool {
        self.filling
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Freeze further swaps. In-flight cascades still run to quiescence.
    pub fn mark_game_over(&mut self) {
        self.game_over = true;
    }

    /// Pacing hint for the caller, from the level config.
    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    pub fn pressed(&self) -> Option<Position> {
        self.pressed
    }

    pub fn entered(&self) -> Option<Position> {
        self.entered
    }

    /// Drain the pending event queue.
    pub fn take_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    /// Record the pointer-down cell. No validation beyond bounds.
    pub fn press(&mut self, x: i8, y: i8) {
        if self.board.in_bounds(x, y) {
            self.pressed = Some(Position::new(x, y));
        }
    }

    /// Record the pointer-drag-over cell. No validation beyond bounds.
    pub fn enter(&mut self, x: i8, y: i8) {
        if self.board.in_bounds(x, y) {
            self.entered = Some(Position::new(x, y));
        }
    }

    /// Pointer-up: attempt the pending swap when both endpoints are set
    /// and grid-adjacent, then clear both selections regardless.
    /// Returns whether a swap was performed.
    pub fn release(&mut self) -> bool {
        let swapped = match (self.pressed, self.entered) {
            (Some(a), Some(b)) if a.is_adjacent(&b) => self.try_swap(a, b),
            _ => false,
        };
        self.pressed = None;
        self.entered = None;
        swapped
    }

    /// Attempt to swap two cells.
    ///
    /// A swap succeeds when the game is running, both pieces are movable,
    /// and either position matches after the swap or a rainbow piece is
    /// involved (rainbow swaps always succeed). Failure reverts the board
    /// exactly; most attempted swaps fail this way and that is normal
    /// gameplay, not an error.
    pub(crate) fn try_swap(&mut self, a: Position, b: Position) -> bool {
        if self.game_over {
            return false;
        }
        let movable = |pos: Position| {
            self.board
                .get(pos.x, pos.y)
                .is_some_and(|p| p.is_movable())
        };
        if !movable(a) || !movable(b) {
            return false;
        }

        self.board.swap_cells(a, b);

        let kind_at_a = self.board.get(a.x, a.y).map(|p| p.kind());
        let kind_at_b = self.board.get(b.x, b.y).map(|p| p.kind());
        let a_piece_matches = find_match(&self.board, b.x, b.y).is_some();
        let b_piece_matches = find_match(&self.board, a.x, a.y).is_some();
        let rainbow_swap = kind_at_a == Some(PieceKind::Rainbow)
            || kind_at_b == Some(PieceKind::Rainbow);

        if !(a_piece_matches || b_piece_matches || rainbow_swap) {
            self.board.swap_cells(a, b);
            return false;
        }

        self.events.push(GridEvent::MoveMade);
        self.swap_context = Some((a, b));

        self.resolve_rainbow_swap(b, a);
        self.resolve_rainbow_swap(a, b);

        self.clear_matches();

        // A swapped row/column piece detonates even without a match. Only
        // the piece that actually moved counts; a special promoted onto
        // the endpoint by the clear pass above stays armed.
        for (pos, kind) in [(b, kind_at_b), (a, kind_at_a)] {
            if matches!(kind, Some(PieceKind::RowClear | PieceKind::ColumnClear))
                && self.board.get(pos.x, pos.y).map(|p| p.kind()) == kind
            {
                self.clear_piece(pos.x, pos.y);
            }
        }

        self.swap_context = None;
        true
    }

    /// Rainbow half of a successful swap: the rainbow takes the other
    /// piece's color (staying a wildcard when the other piece has none)
    /// and immediately self-clears, which wipes that color grid-wide.
    fn resolve_rainbow_swap(&mut self, pos: Position, other: Position) {
        if self.board.get(pos.x, pos.y).map(|p| p.kind()) != Some(PieceKind::Rainbow) {
            return;
        }
        let taken = self.board.get(other.x, other.y).and_then(|p| p.color());
        if taken.is_some() {
            if let Some(piece) = self.board.get_mut(pos.x, pos.y) {
                piece.set_color(taken);
            }
        }
        self.clear_piece(pos.x, pos.y);
    }

    /// Clear a single cell.
    ///
    /// No-op (returns false) when the cell is not clearable or already
    /// mid-clear, making overlapping match clears and chain reactions
    /// idempotent. Otherwise: mark the piece, emit `PieceCleared`, fire
    /// the kind's chain effect (row/column/color wipes), replace the cell
    /// with an empty placeholder, and clear orthogonally adjacent
    /// obstacles.
    pub fn clear_piece(&mut self, x: i8, y: i8) -> bool {
        let Some(piece) = self.board.get(x, y) else {
            return false;
        };
        if !piece.is_clearable() || piece.is_being_cleared() {
            return false;
        }

        let (kind, color, score) = (piece.kind(), piece.color(), piece.score());
        if let Some(piece) = self.board.get_mut(x, y) {
            piece.mark_being_cleared();
        }
        self.events.push(GridEvent::PieceCleared {
            kind,
            color,
            score,
            x,
            y,
        });

        // Chain effects run while the cell still holds the flagged
        // piece, so the sweep below skips it instead of recursing.
        match kind {
            PieceKind::RowClear => self.clear_row(y),
            PieceKind::ColumnClear => self.clear_column(x),
            PieceKind::Rainbow => self.clear_color(color),
            _ => {}
        }

        self.board.set(x, y, self.factory.spawn(x, y, PieceKind::Empty));
        self.clear_adjacent_obstacles(x, y);
        // Any cleared cell leaves a hole, so the cascade has work to do
        self.filling = true;
        true
    }

    /// Obstacles never match; they clear only by sitting orthogonally
    /// next to a cleared cell. Adjacency clears do not chain further.
    fn clear_adjacent_obstacles(&mut self, x: i8, y: i8) {
        let neighbors = self.board.neighbors(x, y);
        for pos in neighbors {
            let Some(piece) = self.board.get(pos.x, pos.y) else {
                continue;
            };
            if piece.kind() != PieceKind::Obstacle
                || !piece.is_clearable()
                || piece.is_being_cleared()
            {
                continue;
            }

            let score = piece.score();
            self.events.push(GridEvent::PieceCleared {
                kind: PieceKind::Obstacle,
                color: None,
                score,
                x: pos.x,
                y: pos.y,
            });
            self.board
                .set(pos.x, pos.y, self.factory.spawn(pos.x, pos.y, PieceKind::Empty));
        }
    }

    /// Force-clear every cell of a row (row-piece detonation).
    pub fn clear_row(&mut self, row: i8) {
        for x in 0..self.board.width() as i8 {
            self.clear_piece(x, row);
        }
    }

    /// Force-clear every cell of a column (column-piece detonation).
    pub fn clear_column(&mut self, column: i8) {
        for y in 0..self.board.height() as i8 {
            self.clear_piece(column, y);
        }
    }

    /// Force-clear every piece of a color; `None` is the wildcard and
    /// clears every clearable piece on the grid.
    pub fn clear_color(&mut self, color: Option<PieceColor>) {
        for y in 0..self.board.height() as i8 {
            for x in 0..self.board.width() as i8 {
                let hit = match color {
                    None => true,
                    Some(c) => self.board.get(x, y).is_some_and(|p| p.matches_color(c)),
                };
                if hit {
                    self.clear_piece(x, y);
                }
            }
        }
    }

    /// One full clear pass: scan the grid row-major, clear every match of
    /// size >= 3, and promote special pieces for larger matches. Returns
    /// whether anything cleared.
    pub fn clear_matches(&mut self) -> bool {
        let mut cleared_any = false;
        let (width, height) = (self.board.width() as i8, self.board.height() as i8);

        for y in 0..height {
            for x in 0..width {
                if !self.board.get(x, y).is_some_and(|p| p.is_clearable()) {
                    continue;
                }
                let Some(matched) = find_match(&self.board, x, y) else {
                    continue;
                };

                let seed_color = self.board.get(x, y).and_then(|p| p.color());
                let promotion = self.promotion_kind(matched.len());
                let mut special_pos = matched[self.rng.pick_index(matched.len())];

                for &pos in &matched {
                    if self.clear_piece(pos.x, pos.y) {
                        cleared_any = true;
                        // Promotions land on a swap endpoint when one was
                        // part of the match.
                        if let Some((a, b)) = self.swap_context {
                            if pos == a || pos == b {
                                special_pos = pos;
                            }
                        }
                    }
                }

                if let Some(kind) = promotion {
                    let mut piece = self.factory.spawn(special_pos.x, special_pos.y, kind);
                    if matches!(kind, PieceKind::RowClear | PieceKind::ColumnClear) {
                        piece.set_color(seed_color);
                    }
                    self.board.set(special_pos.x, special_pos.y, piece);
                }
            }
        }

        cleared_any
    }

    /// Special piece earned by a match of the given size, if any.
    ///
    /// Size 4 orientation follows the swap axis when a swap produced the
    /// match (same row -> RowClear), otherwise it is a coin flip.
    fn promotion_kind(&mut self, match_len: usize) -> Option<PieceKind> {
        if match_len >= RAINBOW_MATCH_LEN {
            Some(PieceKind::Rainbow)
        } else if match_len == LINE_PIECE_MATCH_LEN {
            match self.swap_context {
                Some((a, b)) if a.y == b.y => Some(PieceKind::RowClear),
                Some(_) => Some(PieceKind::ColumnClear),
                None => {
                    if self.rng.next_range(2) == 0 {
                        Some(PieceKind::RowClear)
                    } else {
                        Some(PieceKind::ColumnClear)
                    }
                }
            }
        } else {
            None
        }
    }

    /// Advance the simulation by one discrete step.
    ///
    /// While filling: run one gravity pass; once the grid settles, run a
    /// clear pass; once a clear pass removes nothing the grid is
    /// quiescent and `filling` drops. The caller inserts any
    /// presentation pacing between calls.
    pub fn step(&mut self) -> StepOutcome {
        if !self.filling {
            return StepOutcome::Quiescent;
        }

        if fill_step(
            &mut self.board,
            &mut self.rng,
            &self.factory,
            self.color_count,
            self.inverse,
        ) {
            self.inverse = !self.inverse;
            return StepOutcome::Moved;
        }

        if self.clear_matches() {
            return StepOutcome::Cleared;
        }

        self.filling = false;
        StepOutcome::Quiescent
    }

    /// Run [`step`](Self::step) to quiescence and return how many steps
    /// it took. For headless callers that do not pace animation.
    pub fn resolve(&mut self) -> u32 {
        let mut steps = 0;
        while self.step() != StepOutcome::Quiescent {
            steps += 1;
        }
        if steps > 0 {
            debug!(steps, "grid settled");
        }
        steps
    }

    /// Fill a reusable snapshot with the current renderer-facing state.
    pub fn snapshot_into(&self, out: &mut GridSnapshot) {
        out.width = self.board.width();
        out.height = self.board.height();
        out.cells.clear();
        out.cells.extend(self.board.pieces().map(|p| CellSnapshot {
            kind: p.kind(),
            color: p.color(),
        }));
        out.filling = self.filling;
        out.game_over = self.game_over;
        out.pressed = self.pressed;
        out.entered = self.entered;
    }

    pub fn snapshot(&self) -> GridSnapshot {
        let mut out = GridSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::Piece;

    /// Colored normal piece for hand-built boards.
    fn colored(x: i8, y: i8, color: PieceColor) -> Piece {
        let mut piece = Piece::new(x, y, PieceKind::Normal, 100);
        piece.set_color(Some(color));
        piece
    }

    /// A grid whose board is overwritten with a deterministic matchless
    /// pattern: color index (x + 2y) mod 5 has no 3-run in either axis,
    /// and Pink (index 5) never appears, so tests can paint Pink pieces
    /// without colliding with the background.
    fn fresh_grid(width: u8, height: u8) -> GridState {
        let mut config = GridConfig::new(width, height);
        config.seed = 12345;
        let mut grid = GridState::new(config, PieceFactory::standard()).unwrap();
        for y in 0..height as i8 {
            for x in 0..width as i8 {
                let color = PieceColor::from_index((x as usize + 2 * y as usize) % 5);
                let mut piece = Piece::new(x, y, PieceKind::Normal, 100);
                piece.set_color(color);
                grid.board_mut().set(x, y, piece);
            }
        }
        assert_eq!(grid.resolve(), 0, "background pattern must be matchless");
        grid.take_events();
        grid
    }

    fn cleared_events(grid: &mut GridState) -> Vec<GridEvent> {
        grid.take_events()
            .into_iter()
            .filter(|e| matches!(e, GridEvent::PieceCleared { .. }))
            .collect()
    }

    #[test]
    fn test_three_match_clears_without_promotion() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 0, colored(x, 0, PieceColor::Pink));
        }

        assert!(grid.clear_matches());

        for x in 0..3 {
            assert_eq!(grid.board().get(x, 0).unwrap().kind(), PieceKind::Empty);
        }
        let events = cleared_events(&mut grid);
        assert_eq!(events.len(), 3);
        for event in events {
            assert!(matches!(
                event,
                GridEvent::PieceCleared {
                    kind: PieceKind::Normal,
                    color: Some(PieceColor::Pink),
                    score: 100,
                    ..
                }
            ));
        }
        assert_eq!(grid.board().count_kind(PieceKind::RowClear), 0);
        assert_eq!(grid.board().count_kind(PieceKind::ColumnClear), 0);
        assert_eq!(grid.board().count_kind(PieceKind::Rainbow), 0);
    }

    #[test]
    fn test_four_match_swap_promotes_row_clear_at_entered_cell() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 2, colored(x, 2, PieceColor::Pink));
        }
        grid.board_mut().set(4, 2, colored(4, 2, PieceColor::Pink));

        grid.press(4, 2);
        grid.enter(3, 2);
        assert!(grid.release());

        // Horizontal swap axis picks the RowClear orientation; the
        // promoted piece lands on the cleared entered cell and keeps the
        // match's color.
        let special = grid.board().get(3, 2).unwrap();
        assert_eq!(special.kind(), PieceKind::RowClear);
        assert_eq!(special.color(), Some(PieceColor::Pink));

        let events = grid.take_events();
        assert!(events.contains(&GridEvent::MoveMade));
        let cleared = events
            .iter()
            .filter(|e| matches!(e, GridEvent::PieceCleared { .. }))
            .count();
        assert_eq!(cleared, 4);
        assert!(grid.is_filling());
    }

    #[test]
    fn test_five_match_swap_promotes_rainbow() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..4 {
            grid.board_mut().set(x, 3, colored(x, 3, PieceColor::Pink));
        }
        grid.board_mut().set(4, 4, colored(4, 4, PieceColor::Pink));

        grid.press(4, 4);
        grid.enter(4, 3);
        assert!(grid.release());

        assert_eq!(grid.board().count_kind(PieceKind::Rainbow), 1);
        let rainbow = grid.board().get(4, 3).unwrap();
        assert_eq!(rainbow.kind(), PieceKind::Rainbow);
        // Promoted rainbows are wildcards until a swap assigns a color
        assert_eq!(rainbow.color(), None);
        assert_eq!(cleared_events(&mut grid).len(), 5);
    }

    #[test]
    fn test_rainbow_swap_clears_entire_color() {
        let mut grid = fresh_grid(6, 6);
        grid.board_mut()
            .set(2, 2, Piece::new(2, 2, PieceKind::Rainbow, 500));
        // (3, 2) holds a Green background piece
        assert_eq!(
            grid.board().get(3, 2).unwrap().color(),
            Some(PieceColor::Green)
        );
        let greens_before = grid
            .board()
            .pieces()
            .filter(|p| p.matches_color(PieceColor::Green))
            .count();
        assert!(greens_before > 1);

        grid.press(2, 2);
        grid.enter(3, 2);
        assert!(grid.release());

        assert_eq!(
            grid.board()
                .pieces()
                .filter(|p| p.matches_color(PieceColor::Green))
                .count(),
            0
        );
        assert_eq!(grid.board().count_kind(PieceKind::Rainbow), 0);

        let events = cleared_events(&mut grid);
        assert_eq!(events.len(), greens_before + 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, GridEvent::PieceCleared { kind: PieceKind::Rainbow, .. })));
    }

    #[test]
    fn test_double_rainbow_swap_wipes_the_grid() {
        let mut grid = fresh_grid(6, 6);
        grid.board_mut()
            .set(2, 2, Piece::new(2, 2, PieceKind::Rainbow, 500));
        grid.board_mut()
            .set(3, 2, Piece::new(3, 2, PieceKind::Rainbow, 500));

        grid.press(2, 2);
        grid.enter(3, 2);
        assert!(grid.release());

        // A colorless rainbow clears as a wildcard: everything goes
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 36);

        let steps = grid.resolve();
        assert!(steps > 0);
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
        assert!(!grid.is_filling());
    }

    #[test]
    fn test_obstacles_clear_by_orthogonal_adjacency_only() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 0, colored(x, 0, PieceColor::Pink));
        }
        grid.board_mut()
            .set(2, 1, Piece::new(2, 1, PieceKind::Obstacle, 1000));
        grid.board_mut()
            .set(3, 1, Piece::new(3, 1, PieceKind::Obstacle, 1000));

        assert!(grid.clear_matches());

        // (2, 1) sits under a cleared cell; (3, 1) is only diagonal to one
        assert_eq!(grid.board().get(2, 1).unwrap().kind(), PieceKind::Empty);
        assert_eq!(grid.board().get(3, 1).unwrap().kind(), PieceKind::Obstacle);
        assert!(cleared_events(&mut grid).iter().any(|e| matches!(
            e,
            GridEvent::PieceCleared {
                kind: PieceKind::Obstacle,
                score: 1000,
                x: 2,
                y: 1,
                ..
            }
        )));
    }

    #[test]
    fn test_failed_swap_reverts_board_exactly() {
        let mut grid = fresh_grid(6, 6);
        let before = grid.board().clone();

        grid.press(0, 0);
        grid.enter(1, 0);
        assert!(!grid.release());

        assert_eq!(*grid.board(), before);
        assert!(grid.take_events().is_empty());
        assert!(!grid.is_filling());
        assert_eq!(grid.pressed(), None);
        assert_eq!(grid.entered(), None);
    }

    #[test]
    fn test_swap_rejects_immovable_piece() {
        let mut grid = fresh_grid(6, 6);
        grid.board_mut()
            .set(2, 2, Piece::new(2, 2, PieceKind::Obstacle, 1000));

        grid.press(2, 2);
        grid.enter(2, 3);
        assert!(!grid.release());
    }

    #[test]
    fn test_game_over_blocks_swaps_but_not_cascades() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 2, colored(x, 2, PieceColor::Pink));
        }
        grid.board_mut().set(4, 2, colored(4, 2, PieceColor::Pink));

        // Start a cascade, then end the game while it is in flight
        grid.press(4, 2);
        grid.enter(3, 2);
        assert!(grid.release());
        assert!(grid.is_filling());
        grid.mark_game_over();

        let before = grid.board().clone();
        grid.press(0, 5);
        grid.enter(1, 5);
        assert!(!grid.release());
        assert_eq!(*grid.board(), before);

        // The in-flight cascade still settles
        let mut steps = 0;
        while grid.step() != StepOutcome::Quiescent {
            steps += 1;
            assert!(steps < 500);
        }
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
    }

    #[test]
    fn test_line_piece_chain_reaction() {
        let mut grid = fresh_grid(6, 6);
        grid.board_mut()
            .set(1, 1, Piece::new(1, 1, PieceKind::RowClear, 200));
        grid.board_mut()
            .set(4, 1, Piece::new(4, 1, PieceKind::ColumnClear, 200));

        assert!(grid.clear_piece(1, 1));

        // The row detonation hits the column piece, which chains
        for x in 0..6 {
            assert_eq!(grid.board().get(x, 1).unwrap().kind(), PieceKind::Empty);
        }
        for y in 0..6 {
            assert_eq!(grid.board().get(4, y).unwrap().kind(), PieceKind::Empty);
        }
        // 6 cells in the row plus 5 more in the column, each cleared once
        assert_eq!(cleared_events(&mut grid).len(), 11);
    }

    #[test]
    fn test_swapped_line_piece_detonates_without_matching() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 2, colored(x, 2, PieceColor::Pink));
        }
        grid.board_mut().set(3, 3, colored(3, 3, PieceColor::Pink));
        let mut row_piece = Piece::new(3, 2, PieceKind::RowClear, 200);
        row_piece.set_color(Some(PieceColor::Red));
        grid.board_mut().set(3, 2, row_piece);

        // The pink completes a 4-match at (3, 2); the row piece lands at
        // (3, 3) with no match of its own and detonates anyway.
        grid.press(3, 3);
        grid.enter(3, 2);
        assert!(grid.release());

        for x in 0..6 {
            assert_eq!(grid.board().get(x, 3).unwrap().kind(), PieceKind::Empty);
        }
        // Vertical swap axis promotes a ColumnClear, which stays armed
        let special = grid.board().get(3, 2).unwrap();
        assert_eq!(special.kind(), PieceKind::ColumnClear);
        assert_eq!(special.color(), Some(PieceColor::Pink));
        assert!(grid.take_events().iter().any(|e| matches!(
            e,
            GridEvent::PieceCleared {
                kind: PieceKind::RowClear,
                ..
            }
        )));
    }

    #[test]
    fn test_direct_clears_arm_the_cascade() {
        // Clears initiated outside a swap (objective logic, caller-driven
        // detonations) must wake the fill loop just like a swap does
        let mut grid = fresh_grid(6, 6);
        assert!(grid.clear_piece(2, 2));
        assert!(grid.is_filling());
        assert!(grid.resolve() > 0);
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);

        // Same for a region clear; the background pattern always has reds
        let mut grid = fresh_grid(6, 6);
        grid.clear_color(Some(PieceColor::Red));
        assert!(grid.is_filling());
        grid.resolve();
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
        assert!(!grid.is_filling());
    }

    #[test]
    fn test_clear_piece_is_idempotent() {
        let mut grid = fresh_grid(6, 6);
        assert!(grid.clear_piece(2, 2));
        assert!(!grid.clear_piece(2, 2));
        assert_eq!(cleared_events(&mut grid).len(), 1);
    }

    #[test]
    fn test_clear_row_and_column_surface() {
        let mut grid = fresh_grid(6, 6);
        grid.clear_row(0);
        for x in 0..6 {
            assert_eq!(grid.board().get(x, 0).unwrap().kind(), PieceKind::Empty);
        }
        grid.clear_column(5);
        for y in 0..6 {
            assert_eq!(grid.board().get(5, y).unwrap().kind(), PieceKind::Empty);
        }
        // Row 0 and column 5 overlap in one cell
        assert_eq!(cleared_events(&mut grid).len(), 11);
    }

    #[test]
    fn test_resolve_leaves_no_matches() {
        let mut grid = fresh_grid(6, 6);
        for x in 0..3 {
            grid.board_mut().set(x, 0, colored(x, 0, PieceColor::Pink));
        }
        grid.clear_matches();
        grid.resolve();

        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
        assert!(!grid.is_filling());
        for y in 0..6 {
            for x in 0..6 {
                assert!(find_match(grid.board(), x, y).is_none());
            }
        }
    }

    #[test]
    fn test_monochrome_grid_settles() {
        let mut config = GridConfig::new(6, 6);
        config.seed = 5;
        let mut grid = GridState::new(config, PieceFactory::standard()).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                grid.board_mut().set(x, y, colored(x, y, PieceColor::Red));
            }
        }

        // Everything matches at once; the cascade must still reach a
        // stable board
        let steps = grid.resolve();
        assert!(steps > 0);
        assert!(!grid.is_filling());
        assert_eq!(grid.board().count_kind(PieceKind::Empty), 0);
        for y in 0..6 {
            for x in 0..6 {
                assert!(find_match(grid.board(), x, y).is_none());
            }
        }
    }

    #[test]
    fn test_checkerboard_grid_is_already_quiescent() {
        let mut config = GridConfig::new(6, 6);
        config.seed = 5;
        let mut grid = GridState::new(config, PieceFactory::standard()).unwrap();
        for y in 0..6 {
            for x in 0..6 {
                let color = if (x + y) % 2 == 0 {
                    PieceColor::Red
                } else {
                    PieceColor::Blue
                };
                grid.board_mut().set(x, y, colored(x, y, color));
            }
        }

        let before = grid.board().clone();
        assert_eq!(grid.resolve(), 0);
        assert_eq!(*grid.board(), before);
    }

    #[test]
    fn test_press_out_of_bounds_is_ignored() {
        let mut grid = fresh_grid(6, 6);
        grid.press(-1, 0);
        grid.enter(0, 0);
        assert_eq!(grid.pressed(), None);
        assert!(!grid.release());
    }

    #[test]
    fn test_take_events_drains_queue() {
        let mut grid = fresh_grid(6, 6);
        grid.clear_piece(0, 0);
        assert!(!grid.take_events().is_empty());
        assert!(grid.take_events().is_empty());
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut grid = fresh_grid(6, 6);
        grid.press(1, 1);
        grid.enter(1, 2);

        let snapshot = grid.snapshot();
        assert_eq!(snapshot.width, 6);
        assert_eq!(snapshot.height, 6);
        assert_eq!(snapshot.cells.len(), 36);
        assert_eq!(snapshot.pressed, Some(Position::new(1, 1)));
        assert_eq!(snapshot.entered, Some(Position::new(1, 2)));
        assert!(!snapshot.game_over);

        let cell = snapshot.cell(3, 2).unwrap();
        let piece = grid.board().get(3, 2).unwrap();
        assert_eq!(cell.kind, piece.kind());
        assert_eq!(cell.color, piece.color());

        // Reuse path matches the fresh snapshot
        let mut reused = GridSnapshot::default();
        grid.snapshot_into(&mut reused);
        assert_eq!(reused.cells, snapshot.cells);
    }
}

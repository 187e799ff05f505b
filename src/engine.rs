//! The move orchestrator.
//!
//! [`Engine::play`] takes a full-board snapshot and returns the board with
//! the computer's move applied. It works out which side is moving, stops
//! early on decided games, opens empty boards in the center, and otherwise
//! hands a bounded window of the board (the active region) to the tier
//! selected by the difficulty.

use fastrand::Rng;
use tracing::{debug, info, instrument};

use crate::board::{Board, Mark, Move, Outcome, win_length};
use crate::error::EngineError;
use crate::region::{
    Region, expand_region, expand_region_if_edge_has_mark, extract_used_region, paste_region,
    slice_region,
};
use crate::strategy::Difficulty;

/// Result of one [`Engine::play`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Game state after the move (or before it, if no move was made).
    pub outcome: Outcome,
    /// Window the tier searched; `None` for empty or already-decided boards.
    pub region: Option<Region>,
    /// Full-board cell that was filled; `None` if the game was already decided.
    pub mv: Option<Move>,
    /// The full board after the move.
    pub board: Board,
}

/// Stateless apart from its random source: every call is independent.
pub struct Engine {
    rng: Rng,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine seeded from system entropy.
    pub fn new() -> Self {
        Self { rng: Rng::new() }
    }

    /// An engine whose random choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Rng::with_seed(seed),
        }
    }

    /// Compute the next move for `mark` (inferred when `None`) on `board`.
    #[instrument(skip(self, board), fields(size = board.rows()))]
    pub fn play(
        &mut self,
        board: Board,
        mark: Option<Mark>,
        difficulty: Difficulty,
        last_move: Option<Move>,
    ) -> Result<MoveOutcome, EngineError> {
        let mark = mark.unwrap_or_else(|| board.next_mark());
        debug!(%mark, %difficulty, "resolved acting mark");

        if !board.is_square() {
            return Err(EngineError::MalformedBoard {
                reason: format!("board is {}x{}, must be square", board.rows(), board.columns()),
            });
        }
        let size = board.rows();
        let win_length = win_length(size)?;

        if let Some(done) = settled(&board) {
            info!(outcome = ?done.outcome, "game already decided");
            return Ok(done);
        }

        validate(&board, last_move)?;

        if board.is_empty() {
            let mv = self.center_start(size);
            let mut board = board;
            board.place(mv, mark);
            info!(?mv, "opening move");
            return Ok(MoveOutcome {
                outcome: board.winner(None, win_length),
                region: None,
                mv: Some(mv),
                board,
            });
        }

        // Non-empty boards always have a used region.
        let Some(used) = extract_used_region(&board) else {
            return Err(EngineError::NoAvailableMoves);
        };
        let mut region = expand_region_if_edge_has_mark(&board, &used);
        let mut sub = slice_region(&board, &region);

        let outcome = board.winner(None, win_length);
        if outcome.is_decided() || board.is_full() {
            info!(?outcome, "nothing to play");
            return Ok(MoveOutcome {
                outcome,
                region: None,
                mv: None,
                board,
            });
        }

        while sub.is_full() && !board.is_full() {
            region = expand_region(&region, size, difficulty.expand_padding());
            sub = slice_region(&board, &region);
        }
        debug!(?region, "active region");

        let local_last = last_move.and_then(|mv| region.to_local(mv));
        let (played, local) = difficulty.strategy().play(
            &sub,
            mark,
            local_last,
            win_length,
            &mut self.rng,
        )?;

        let mut board = board;
        paste_region(&mut board, &region, &played)?;
        let mv = region.to_global(local);
        let outcome = board.winner(None, win_length);
        info!(?mv, ?outcome, "engine moved");

        Ok(MoveOutcome {
            outcome,
            region: Some(region),
            mv: Some(mv),
            board,
        })
    }

    /// Center cell of an empty board, rounding each axis down or up at random.
    fn center_start(&mut self, size: usize) -> Move {
        let low = (size - 1) / 2;
        let high = size / 2;
        let row = if self.rng.bool() { low } else { high };
        let column = if self.rng.bool() { low } else { high };
        Move::new(row, column)
    }
}

/// The unchanged result for a board that somebody has already won.
///
/// Returns `None` when the game is still open, or when the board is not a
/// supported square so that no win length applies. Other request fields are
/// never consulted: a won board is reported as won even if the rest of the
/// request is invalid.
pub fn settled(board: &Board) -> Option<MoveOutcome> {
    if !board.is_square() {
        return None;
    }
    let win_length = win_length(board.rows()).ok()?;
    match board.winner(None, win_length) {
        outcome @ Outcome::Win(_) => Some(MoveOutcome {
            outcome,
            region: None,
            mv: None,
            board: board.clone(),
        }),
        _ => None,
    }
}

/// Reject requests that cannot produce a move. Runs before any mutation.
fn validate(board: &Board, last_move: Option<Move>) -> Result<(), EngineError> {
    if let Some(mv) = last_move.filter(|&mv| !board.contains(mv)) {
        return Err(EngineError::InvalidLastMove {
            row: mv.row as i64,
            column: mv.column as i64,
            size: board.rows(),
        });
    }
    if board.is_full() {
        return Err(EngineError::NoAvailableMoves);
    }
    Ok(())
}

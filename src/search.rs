//! Adversarial search (hard tier).
//!
//! Move selection runs in three stages:
//!
//! 1. Play any cell that wins on the spot.
//! 2. Otherwise occupy any cell where the opponent would win next turn.
//! 3. Otherwise run depth-limited minimax with alpha-beta pruning, scoring
//!    leaves with [`evaluate`].
//!
//! The search owns a single scratch grid and mutates it in place: every
//! tried cell is put back to empty before the next sibling is tried, so the
//! grid is identical to the input once the search returns.

use fastrand::Rng;
use tracing::{debug, trace};

use crate::board::{Board, Cell, Mark, Move, Outcome};
use crate::constants::{
    DIRECTIONS, EVAL_CENTER_RADIUS, EVAL_LINE, EVAL_OPEN_OPP, EVAL_OPEN_OWN, INFINITY, WIN_SCORE,
};
use crate::error::EngineError;
use crate::strategy::Strategy;

/// Win, block, then minimax to `max_depth` plies below the root move.
#[derive(Debug, Clone, Copy)]
pub struct SearchTier {
    max_depth: u32,
}

impl SearchTier {
    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }
}

impl Strategy for SearchTier {
    fn select_move(
        &self,
        board: &Board,
        mark: Mark,
        _last_move: Option<Move>,
        win_length: usize,
        _rng: &mut Rng,
    ) -> Result<Move, EngineError> {
        let moves = board.available_moves();
        if moves.is_empty() {
            return Err(EngineError::NoAvailableMoves);
        }
        let mut scratch = board.clone();

        if let Some(mv) = find_completing(&mut scratch, &moves, mark, win_length) {
            debug!(?mv, "taking immediate win");
            return Ok(mv);
        }
        if let Some(mv) = find_completing(&mut scratch, &moves, mark.opponent(), win_length) {
            debug!(?mv, "blocking immediate loss");
            return Ok(mv);
        }

        let mut search = Search {
            board: &mut scratch,
            mark,
            win_length,
            max_depth: self.max_depth,
            nodes: 0,
        };
        let (mv, score) = search.best_root_move(&moves);
        debug!(?mv, score, nodes = search.nodes, "minimax finished");
        debug_assert_eq!(&scratch, board, "search must restore the board");
        Ok(mv)
    }
}

/// First cell (row-major) where `mark` completes a line.
fn find_completing(
    scratch: &mut Board,
    moves: &[Move],
    mark: Mark,
    win_length: usize,
) -> Option<Move> {
    moves.iter().copied().find(|&mv| {
        scratch.place(mv, mark);
        let won = scratch.winner(None, win_length) == Outcome::Win(mark);
        scratch.clear(mv);
        won
    })
}

struct Search<'a> {
    board: &'a mut Board,
    mark: Mark,
    win_length: usize,
    max_depth: u32,
    nodes: u64,
}

impl Search<'_> {
    /// Highest-scoring root move; ties go to the earliest in row-major order.
    fn best_root_move(&mut self, moves: &[Move]) -> (Move, i32) {
        let mut best = (moves[0], -INFINITY);
        for &mv in moves {
            self.board.place(mv, self.mark);
            // Moves that cannot beat the current best are cut off early;
            // their bounded score never compares strictly greater.
            let score = self.minimax(0, false, best.1, INFINITY);
            self.board.clear(mv);
            trace!(?mv, score, "root move");
            if score > best.1 {
                best = (mv, score);
            }
        }
        best
    }

    fn minimax(&mut self, depth: u32, maximizing: bool, mut alpha: i32, mut beta: i32) -> i32 {
        self.nodes += 1;
        match self.board.winner(None, self.win_length) {
            Outcome::Win(m) if m == self.mark => return WIN_SCORE - depth as i32,
            Outcome::Win(_) => return depth as i32 - WIN_SCORE,
            Outcome::Draw => return 0,
            Outcome::InProgress => {}
        }
        if depth >= self.max_depth {
            return evaluate(self.board, self.mark, self.win_length);
        }

        let to_play = if maximizing {
            self.mark
        } else {
            self.mark.opponent()
        };
        let mut best = if maximizing { -INFINITY } else { INFINITY };
        for mv in self.board.available_moves() {
            self.board.place(mv, to_play);
            let score = self.minimax(depth + 1, !maximizing, alpha, beta);
            self.board.clear(mv);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }
}

/// Static evaluation of `board` from `mark`'s point of view.
///
/// Every complete window of `win_length` cells in each scanning direction
/// contributes: cubes of the piece count for uncontested windows, large
/// bonuses for finished or one-short lines, and the mirror-image penalties
/// for the opponent. Own marks near the center earn a small extra bonus.
pub fn evaluate(board: &Board, mark: Mark, win_length: usize) -> i32 {
    let len = win_length as i32;
    let mut score = 0;

    for row in 0..board.rows() {
        for column in 0..board.columns() {
            for (dr, dc) in DIRECTIONS {
                let Some((own, opp)) = window_counts(board, row, column, dr, dc, mark, win_length)
                else {
                    continue;
                };
                let empty = len - own - opp;

                if own == len {
                    score += EVAL_LINE;
                }
                if opp == len {
                    score -= EVAL_LINE;
                }
                if own == len - 1 && empty == 1 {
                    score += EVAL_OPEN_OWN;
                }
                if opp == len - 1 && empty == 1 {
                    score -= EVAL_OPEN_OPP;
                }

                if own > 0 && opp == 0 {
                    score += own.pow(3);
                } else if opp > 0 && own == 0 {
                    score -= opp.pow(3);
                }
            }
        }
    }

    let (mid_row, mid_column) = (board.rows() / 2, board.columns() / 2);
    for row in 0..board.rows() {
        for column in 0..board.columns() {
            if board.get(row, column) == Cell::Marked(mark) {
                let dist = (row.abs_diff(mid_row) + column.abs_diff(mid_column)) as i32;
                score += (EVAL_CENTER_RADIUS - dist).max(0);
            }
        }
    }

    score
}

/// Own and opponent counts in the window starting at (`row`, `column`),
/// or `None` if the window runs off the grid.
fn window_counts(
    board: &Board,
    row: usize,
    column: usize,
    dr: isize,
    dc: isize,
    mark: Mark,
    win_length: usize,
) -> Option<(i32, i32)> {
    let mut own = 0;
    let mut opp = 0;
    for i in 0..win_length as isize {
        match board.get_signed(row as isize + dr * i, column as isize + dc * i)? {
            Cell::Marked(m) if m == mark => own += 1,
            Cell::Marked(_) => opp += 1,
            Cell::Empty => {}
        }
    }
    Some((own, opp))
}

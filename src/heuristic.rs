//! Feature-weighted move scoring (medium tier).
//!
//! Every empty cell gets a score from a handful of local features:
//! winning, blocking a win, blocking a near-win, centrality, clustering with
//! our own marks, and proximity to the last move. Instead of always playing
//! the top cell, the tier samples uniformly among everything within
//! [`NEAR_TOP_MARGIN`] of the best, so equal positions do not always get the
//! same reply.

use fastrand::Rng;
use tracing::trace;

use crate::board::{Board, Mark, Move, Outcome};
use crate::constants::{
    NEAR_TOP_MARGIN, WEIGHT_BLOCK, WEIGHT_CENTER, WEIGHT_LAST_MOVE, WEIGHT_NEAR_BLOCK,
    WEIGHT_OWN_NEIGHBOR, WEIGHT_WIN,
};
use crate::error::EngineError;
use crate::strategy::{Strategy, pick};

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicTier;

impl Strategy for HeuristicTier {
    fn select_move(
        &self,
        board: &Board,
        mark: Mark,
        last_move: Option<Move>,
        win_length: usize,
        rng: &mut Rng,
    ) -> Result<Move, EngineError> {
        let scored = score_moves(board, mark, last_move, win_length);
        let Some(best) = scored.iter().map(|&(_, s)| s).max() else {
            return Err(EngineError::NoAvailableMoves);
        };
        let shortlist: Vec<Move> = scored
            .iter()
            .filter(|&&(_, s)| s >= best - NEAR_TOP_MARGIN)
            .map(|&(mv, _)| mv)
            .collect();
        trace!(best, candidates = shortlist.len(), "medium shortlist");
        pick(&shortlist, rng)
    }
}

/// Score every empty cell of `board` for `mark`, in row-major order.
pub fn score_moves(
    board: &Board,
    mark: Mark,
    last_move: Option<Move>,
    win_length: usize,
) -> Vec<(Move, i32)> {
    let mut scratch = board.clone();
    board
        .available_moves()
        .into_iter()
        .map(|mv| (mv, score_cell(&mut scratch, mv, mark, last_move, win_length)))
        .collect()
}

/// Score one empty cell. `scratch` is used for hypothetical placements and
/// is left as it was found.
fn score_cell(
    scratch: &mut Board,
    mv: Move,
    mark: Mark,
    last_move: Option<Move>,
    win_length: usize,
) -> i32 {
    let opponent = mark.opponent();
    let mut score = 0;

    if wins_after(scratch, mv, mark, win_length) {
        score += WEIGHT_WIN;
    }
    if wins_after(scratch, mv, opponent, win_length) {
        score += WEIGHT_BLOCK;
    }
    // One short of a win for the opponent means this cell sits on a line
    // they are building.
    if wins_after(scratch, mv, opponent, win_length - 1) {
        score += WEIGHT_NEAR_BLOCK;
    }
    if is_central(scratch, mv) {
        score += WEIGHT_CENTER;
    }
    if scratch.has_neighbor(mv, mark) {
        score += WEIGHT_OWN_NEIGHBOR;
    }
    if let Some(last) = last_move {
        match mv.chebyshev(last) {
            1 => score += WEIGHT_LAST_MOVE[0],
            2 => score += WEIGHT_LAST_MOVE[1],
            _ => {}
        }
    }
    score
}

/// Whether placing `mark` at `mv` produces a run of `length` for `mark`.
fn wins_after(scratch: &mut Board, mv: Move, mark: Mark, length: usize) -> bool {
    scratch.place(mv, mark);
    let outcome = scratch.winner(None, length);
    scratch.clear(mv);
    outcome == Outcome::Win(mark)
}

/// Whether `mv` lies within one step of the grid's center on both axes.
fn is_central(board: &Board, mv: Move) -> bool {
    // Doubled coordinates keep the center of even-sized axes integral.
    let near = |index: usize, len: usize| (2 * index).abs_diff(len - 1) <= 2;
    near(mv.row, board.rows()) && near(mv.column, board.columns())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[&str]]) -> Board {
        let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.to_vec()).collect();
        Board::parse(&rows).unwrap()
    }

    fn score_of(scored: &[(Move, i32)], mv: Move) -> i32 {
        scored.iter().find(|(m, _)| *m == mv).map(|&(_, s)| s).unwrap()
    }

    #[test]
    fn test_central_cells() {
        let b = Board::square(5);
        assert!(is_central(&b, Move::new(2, 2)));
        assert!(is_central(&b, Move::new(1, 3)));
        assert!(!is_central(&b, Move::new(0, 2)));

        // Even axis: the center is 1.5, so only indices 1 and 2 qualify.
        let b = Board::new(4, 4);
        assert!(is_central(&b, Move::new(1, 2)));
        assert!(!is_central(&b, Move::new(0, 3)));

        // Rectangular sub-boards use each axis' own center.
        let b = Board::new(2, 7);
        assert!(is_central(&b, Move::new(0, 4)));
        assert!(!is_central(&b, Move::new(1, 5)));
    }

    #[test]
    fn test_winning_cell_scores_highest() {
        let b = board(&[&["x", "x", ""], &["", "o", ""], &["", "", "o"]]);
        let scored = score_moves(&b, Mark::X, None, 3);
        let win = score_of(&scored, Move::new(0, 2));
        assert!(win >= WEIGHT_WIN);
        assert!(scored.iter().all(|&(_, s)| s <= win));
    }

    #[test]
    fn test_block_scores_above_quiet_cells() {
        let b = board(&[&["o", "o", ""], &["", "x", ""], &["", "", ""]]);
        let scored = score_moves(&b, Mark::X, None, 3);
        let block = score_of(&scored, Move::new(0, 2));
        assert!(block >= WEIGHT_BLOCK);
        for &(mv, s) in &scored {
            if mv != Move::new(0, 2) {
                assert!(s < block - NEAR_TOP_MARGIN, "{mv:?} scored {s}");
            }
        }
    }

    #[test]
    fn test_last_move_proximity() {
        let b = Board::square(7);
        let last = Some(Move::new(0, 0));
        let scored = score_moves(&b, Mark::X, last, 5);
        assert_eq!(score_of(&scored, Move::new(1, 1)), WEIGHT_LAST_MOVE[0]);
        assert_eq!(score_of(&scored, Move::new(0, 2)), WEIGHT_LAST_MOVE[1]);
        assert_eq!(score_of(&scored, Move::new(6, 0)), 0);
    }

    #[test]
    fn test_medium_takes_the_win() {
        let b = board(&[&["x", "x", ""], &["", "o", ""], &["", "", "o"]]);
        for seed in 0..20 {
            let mut rng = Rng::with_seed(seed);
            let mv = HeuristicTier
                .select_move(&b, Mark::X, None, 3, &mut rng)
                .unwrap();
            assert_eq!(mv, Move::new(0, 2));
        }
    }

    #[test]
    fn test_scratch_board_is_restored() {
        let b = board(&[&["x", "", ""], &["", "o", ""], &["", "", ""]]);
        let mut scratch = b.clone();
        for mv in b.available_moves() {
            score_cell(&mut scratch, mv, Mark::X, None, 3);
        }
        assert_eq!(scratch, b);
    }
}

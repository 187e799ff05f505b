//! Random move tiers.
//!
//! - [`RandomTier`] (very easy) plays any empty cell.
//! - [`NeighborTier`] (easy) prefers cells touching the last move, which
//!   makes it look like it is responding to the opponent.

use fastrand::Rng;

use crate::board::{Board, Mark, Move};
use crate::error::EngineError;
use crate::strategy::{Strategy, pick};

/// Uniformly random empty cell.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTier;

impl Strategy for RandomTier {
    fn select_move(
        &self,
        board: &Board,
        _mark: Mark,
        _last_move: Option<Move>,
        _win_length: usize,
        rng: &mut Rng,
    ) -> Result<Move, EngineError> {
        pick(&board.available_moves(), rng)
    }
}

/// Uniformly random empty cell within one step of the last move.
///
/// Falls back to any empty cell when there is no last move or when all of
/// its neighbors are taken.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeighborTier;

impl Strategy for NeighborTier {
    fn select_move(
        &self,
        board: &Board,
        _mark: Mark,
        last_move: Option<Move>,
        _win_length: usize,
        rng: &mut Rng,
    ) -> Result<Move, EngineError> {
        let moves = board.available_moves();
        if let Some(last) = last_move {
            let near: Vec<Move> = moves
                .iter()
                .copied()
                .filter(|mv| mv.chebyshev(last) <= 1)
                .collect();
            if !near.is_empty() {
                return pick(&near, rng);
            }
        }
        pick(&moves, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_tier_picks_empty_cells() {
        let mut board = Board::square(3);
        board.place(Move::new(0, 0), Mark::X);
        board.place(Move::new(1, 1), Mark::O);
        let mut rng = Rng::with_seed(42);
        for _ in 0..50 {
            let mv = RandomTier
                .select_move(&board, Mark::X, None, 3, &mut rng)
                .unwrap();
            assert!(board.get(mv.row, mv.column).is_empty());
        }
    }

    #[test]
    fn test_random_tier_is_reproducible() {
        let board = Board::new(4, 5);
        let first: Vec<Move> = {
            let mut rng = Rng::with_seed(9);
            (0..10)
                .map(|_| RandomTier.select_move(&board, Mark::X, None, 4, &mut rng).unwrap())
                .collect()
        };
        let mut rng = Rng::with_seed(9);
        for expected in first {
            let mv = RandomTier
                .select_move(&board, Mark::X, None, 4, &mut rng)
                .unwrap();
            assert_eq!(mv, expected);
        }
    }

    #[test]
    fn test_neighbor_tier_stays_near_last_move() {
        let mut board = Board::square(5);
        board.place(Move::new(2, 2), Mark::O);
        let last = Move::new(2, 2);
        let mut rng = Rng::with_seed(3);
        for _ in 0..100 {
            let mv = NeighborTier
                .select_move(&board, Mark::X, Some(last), 4, &mut rng)
                .unwrap();
            assert!(mv.chebyshev(last) <= 1, "{mv:?} is too far");
        }
    }

    #[test]
    fn test_neighbor_tier_falls_back_when_surrounded() {
        // Every neighbor of the corner is taken; only (2, 2) is free.
        let mut board = Board::square(3);
        for (i, mv) in board.available_moves().into_iter().enumerate() {
            if mv != Move::new(2, 2) {
                board.place(mv, if i % 2 == 0 { Mark::X } else { Mark::O });
            }
        }

        let mut rng = Rng::with_seed(11);
        let mv = NeighborTier
            .select_move(&board, Mark::X, Some(Move::new(0, 0)), 3, &mut rng)
            .unwrap();
        assert_eq!(mv, Move::new(2, 2));
    }
}

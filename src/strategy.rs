//! Difficulty tiers and the move-selection interface they share.

use fastrand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

use crate::board::{Board, Mark, Move};
use crate::constants::{EXPAND_PADDING, HARD_EXPAND_PADDING, MAX_SEARCH_DEPTH};
use crate::error::EngineError;
use crate::heuristic::HeuristicTier;
use crate::random::{NeighborTier, RandomTier};
use crate::search::SearchTier;

/// A move-selection policy.
///
/// Tiers only ever see a sub-board. `last_move` is already in the
/// sub-board's coordinates, and the returned move must be an empty cell of
/// `board`.
pub trait Strategy {
    fn select_move(
        &self,
        board: &Board,
        mark: Mark,
        last_move: Option<Move>,
        win_length: usize,
        rng: &mut Rng,
    ) -> Result<Move, EngineError>;

    /// Select a move and return a copy of `board` with `mark` placed there.
    fn play(
        &self,
        board: &Board,
        mark: Mark,
        last_move: Option<Move>,
        win_length: usize,
        rng: &mut Rng,
    ) -> Result<(Board, Move), EngineError> {
        let mv = self.select_move(board, mark, last_move, win_length, rng)?;
        let mut next = board.clone();
        next.place(mv, mark);
        Ok((next, mv))
    }
}

/// The four difficulty levels, named as on the wire.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    EnumIter,
    strum::Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    /// Uniformly random empty cell.
    VeryEasy,
    /// Random cell next to the last move.
    Easy,
    /// Weighted feature scoring with near-top sampling.
    Medium,
    /// Win/block checks, then depth-limited alpha-beta minimax.
    Hard,
}

impl Difficulty {
    pub fn parse(name: &str) -> Result<Difficulty, EngineError> {
        name.parse().map_err(|_| EngineError::UnknownDifficulty {
            difficulty: name.to_string(),
        })
    }

    /// The tier that plays at this difficulty.
    pub fn strategy(self) -> Box<dyn Strategy> {
        match self {
            Difficulty::VeryEasy => Box::new(RandomTier),
            Difficulty::Easy => Box::new(NeighborTier),
            Difficulty::Medium => Box::new(HeuristicTier),
            Difficulty::Hard => Box::new(SearchTier::new(MAX_SEARCH_DEPTH)),
        }
    }

    /// Padding used to grow an exhausted active region.
    pub fn expand_padding(self) -> usize {
        match self {
            Difficulty::Hard => HARD_EXPAND_PADDING,
            _ => EXPAND_PADDING,
        }
    }
}

/// Pick uniformly from `moves`, or fail when there are none.
pub(crate) fn pick(moves: &[Move], rng: &mut Rng) -> Result<Move, EngineError> {
    if moves.is_empty() {
        return Err(EngineError::NoAvailableMoves);
    }
    Ok(moves[rng.usize(..moves.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_names() {
        assert_eq!(Difficulty::parse("very-easy"), Ok(Difficulty::VeryEasy));
        assert_eq!(Difficulty::parse("easy"), Ok(Difficulty::Easy));
        assert_eq!(Difficulty::parse("medium"), Ok(Difficulty::Medium));
        assert_eq!(Difficulty::parse("hard"), Ok(Difficulty::Hard));
        assert_eq!(
            Difficulty::parse("impossible"),
            Err(EngineError::UnknownDifficulty {
                difficulty: "impossible".to_string()
            })
        );
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for difficulty in Difficulty::iter() {
            assert_eq!(Difficulty::parse(&difficulty.to_string()), Ok(difficulty));
        }
    }

    #[test]
    fn test_every_tier_fails_on_full_board() {
        let mut board = Board::square(3);
        for (i, mv) in board.available_moves().into_iter().enumerate() {
            let mark = if [0, 2, 3, 7, 8].contains(&i) { Mark::X } else { Mark::O };
            board.place(mv, mark);
        }
        let mut rng = Rng::with_seed(1);
        for difficulty in Difficulty::iter() {
            let result = difficulty
                .strategy()
                .select_move(&board, Mark::X, None, 3, &mut rng);
            assert_eq!(result, Err(EngineError::NoAvailableMoves), "{difficulty}");
        }
    }

    #[test]
    fn test_play_places_the_mark() {
        let board = Board::square(3);
        let mut rng = Rng::with_seed(5);
        for difficulty in Difficulty::iter() {
            let (next, mv) = difficulty
                .strategy()
                .play(&board, Mark::O, None, 3, &mut rng)
                .unwrap();
            assert_eq!(next.count(Mark::O), 1);
            assert_eq!(next.get(mv.row, mv.column), crate::board::Cell::Marked(Mark::O));
        }
    }
}

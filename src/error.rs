//! Error taxonomy for the move engine.

use derive_more::{Display, Error};
use strum::IntoStaticStr;

/// Everything that can go wrong while computing a move.
///
/// The variant name doubles as the stable error kind reported to callers
/// (see [`EngineError::kind`]).
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, IntoStaticStr)]
pub enum EngineError {
    /// Board side length outside 3..=9.
    #[display("board size {size} is not supported, use 3 to 9")]
    UnsupportedBoardSize { size: usize },
    /// Board is not a non-empty square grid.
    #[display("malformed board: {reason}")]
    MalformedBoard { reason: String },
    /// Mark (or cell symbol) is not one of `x`, `o`.
    #[display("invalid mark {mark:?}, must be \"x\" or \"o\"")]
    InvalidMark { mark: String },
    /// Difficulty is not one of the four tiers.
    #[display("unknown difficulty {difficulty:?}, expected one of: very-easy, easy, medium, hard")]
    UnknownDifficulty { difficulty: String },
    /// Region bounds are inverted or outside the board.
    #[display("invalid region coordinates: {reason}")]
    InvalidRegion { reason: String },
    /// Last move is outside the board.
    #[display("invalid last move ({row}, {column}) for a board of size {size}")]
    InvalidLastMove { row: i64, column: i64, size: usize },
    /// Board is full and nobody has won.
    #[display("no available moves, board is full")]
    NoAvailableMoves,
    /// Sub-board does not have the shape of the region it is pasted into.
    #[display("sub-board is {rows}x{columns} but region is {height}x{width}")]
    RegionShapeMismatch {
        rows: usize,
        columns: usize,
        height: usize,
        width: usize,
    },
}

impl EngineError {
    /// Stable machine-readable kind, e.g. `"NoAvailableMoves"`.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant_name() {
        assert_eq!(EngineError::NoAvailableMoves.kind(), "NoAvailableMoves");
        let err = EngineError::UnsupportedBoardSize { size: 12 };
        assert_eq!(err.kind(), "UnsupportedBoardSize");
    }

    #[test]
    fn test_display_is_descriptive() {
        let err = EngineError::RegionShapeMismatch {
            rows: 2,
            columns: 3,
            height: 3,
            width: 3,
        };
        assert_eq!(err.to_string(), "sub-board is 2x3 but region is 3x3");
    }
}

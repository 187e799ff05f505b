//! nrow-ai: a move engine for N-in-a-row games.
//!
//! Boards range from 3x3 to 9x9, and the number of marks needed to win
//! grows with the board (3 on 3x3, 4 up to 6x6, 5 up to 9x9). The engine
//! plays at four difficulty tiers, from uniformly random up to alpha-beta
//! minimax, and always searches a bounded window around the marks already
//! placed rather than the whole board.
//!
//! ## Modules
//!
//! - [`constants`] - Board limits, tier weights, and search parameters
//! - [`board`] - Cells, marks, boards, and win detection
//! - [`region`] - Active-region extraction, growth, slicing, and pasting
//! - [`strategy`] - The [`strategy::Strategy`] trait and difficulty dispatch
//! - [`random`] - Very easy and easy tiers
//! - [`heuristic`] - Medium tier (feature scoring)
//! - [`search`] - Hard tier (win/block checks and minimax)
//! - [`engine`] - The orchestrator that ties a request together
//! - [`protocol`] - JSON request/response handling for the binary
//! - [`error`] - The [`error::EngineError`] taxonomy
//!
//! ## Example
//!
//! ```
//! use nrow_ai::board::{Board, Mark, Move, Outcome};
//! use nrow_ai::engine::Engine;
//! use nrow_ai::strategy::Difficulty;
//!
//! let rows = vec![
//!     vec!["x", "x", ""],
//!     vec!["", "o", ""],
//!     vec!["", "", "o"],
//! ];
//! let board = Board::parse(&rows).unwrap();
//!
//! let mut engine = Engine::with_seed(7);
//! let result = engine.play(board, Some(Mark::X), Difficulty::Hard, None).unwrap();
//! assert_eq!(result.mv, Some(Move::new(0, 2)));
//! assert_eq!(result.outcome, Outcome::Win(Mark::X));
//! ```

pub mod board;
pub mod constants;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod protocol;
pub mod random;
pub mod region;
pub mod search;
pub mod strategy;

//! Constants for board dimensions, tier weights, and search parameters.
//!
//! This module contains all the tuning constants for the move engine.
//! Board size is a runtime property of each request, so only its bounds
//! live here; everything else is fixed at compile time.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board side length.
pub const MIN_BOARD_SIZE: usize = 3;

/// Largest supported board side length.
pub const MAX_BOARD_SIZE: usize = 9;

/// Scanning directions as (row step, column step): right, down, down-right, down-left.
///
/// The order is part of the winner tie-break and must not change.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// =============================================================================
// Region Expansion
// =============================================================================

/// Padding used when the active region runs out of empty cells (hard tier).
pub const HARD_EXPAND_PADDING: usize = 2;

/// Padding used when the active region runs out of empty cells (other tiers).
pub const EXPAND_PADDING: usize = 1;

// =============================================================================
// Heuristic Tier Weights
// =============================================================================

/// Bonus for a cell that completes a winning line for the acting mark.
pub const WEIGHT_WIN: i32 = 100;

/// Bonus for a cell that blocks an immediate opponent win.
pub const WEIGHT_BLOCK: i32 = 90;

/// Bonus for a cell that blocks an opponent line one move from winning.
pub const WEIGHT_NEAR_BLOCK: i32 = 80;

/// Bonus for cells in the central 3x3 neighborhood.
pub const WEIGHT_CENTER: i32 = 10;

/// Bonus for cells adjacent to one of our own marks.
pub const WEIGHT_OWN_NEIGHBOR: i32 = 5;

/// Bonus by Chebyshev distance from the last move (distance 1, 2).
pub const WEIGHT_LAST_MOVE: [i32; 2] = [8, 4];

/// Candidates scoring within this many points of the best are sampled uniformly.
pub const NEAR_TOP_MARGIN: i32 = 5;

// =============================================================================
// Adversarial Search
// =============================================================================

/// Maximum minimax depth below the root move.
pub const MAX_SEARCH_DEPTH: u32 = 3;

/// Terminal score magnitude; wins score `WIN_SCORE - depth`.
pub const WIN_SCORE: i32 = 10_000;

/// Bound used for the initial alpha-beta window.
pub const INFINITY: i32 = i32::MAX;

/// Evaluator bonus for a complete own line.
pub const EVAL_LINE: i32 = 5_000;

/// Evaluator bonus for an own window one move from complete.
pub const EVAL_OPEN_OWN: i32 = 1_500;

/// Evaluator penalty for an opponent window one move from complete.
pub const EVAL_OPEN_OPP: i32 = 2_000;

/// Centrality bonus per own mark is `max(0, EVAL_CENTER_RADIUS - manhattan distance)`.
pub const EVAL_CENTER_RADIUS: i32 = 5;

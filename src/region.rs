//! Active-region bookkeeping.
//!
//! Move tiers never look at the whole board. The engine computes the
//! bounding rectangle of every placed mark, grows it a little, slices that
//! window out as a sub-board, and pastes the tier's result back in. This
//! keeps search cost proportional to the area actually in play.

use serde::Serialize;

use crate::board::{Board, Move};
use crate::error::EngineError;

/// Inclusive rectangle of board cells. `start <= end` on both axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    start_row: usize,
    end_row: usize,
    start_column: usize,
    end_column: usize,
}

impl Region {
    pub fn new(
        start_row: usize,
        end_row: usize,
        start_column: usize,
        end_column: usize,
    ) -> Result<Self, EngineError> {
        if start_row > end_row || start_column > end_column {
            return Err(EngineError::InvalidRegion {
                reason: format!(
                    "rows {start_row}..={end_row}, columns {start_column}..={end_column} are inverted"
                ),
            });
        }
        Ok(Self {
            start_row,
            end_row,
            start_column,
            end_column,
        })
    }

    /// The region covering a whole `rows` x `columns` grid.
    pub(crate) fn spanning(rows: usize, columns: usize) -> Self {
        Self {
            start_row: 0,
            end_row: rows.saturating_sub(1),
            start_column: 0,
            end_column: columns.saturating_sub(1),
        }
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    pub fn end_row(&self) -> usize {
        self.end_row
    }

    pub fn start_column(&self) -> usize {
        self.start_column
    }

    pub fn end_column(&self) -> usize {
        self.end_column
    }

    pub fn height(&self) -> usize {
        self.end_row - self.start_row + 1
    }

    pub fn width(&self) -> usize {
        self.end_column - self.start_column + 1
    }

    /// Fail with `InvalidRegion` unless the region fits a `size` x `size` board.
    pub fn check_within(&self, size: usize) -> Result<(), EngineError> {
        if self.end_row >= size || self.end_column >= size {
            return Err(EngineError::InvalidRegion {
                reason: format!(
                    "region ends at ({}, {}) outside a board of size {size}",
                    self.end_row, self.end_column
                ),
            });
        }
        Ok(())
    }

    pub fn contains(&self, mv: Move) -> bool {
        (self.start_row..=self.end_row).contains(&mv.row)
            && (self.start_column..=self.end_column).contains(&mv.column)
    }

    pub(crate) fn contains_signed(&self, row: isize, column: isize) -> bool {
        row >= self.start_row as isize
            && row <= self.end_row as isize
            && column >= self.start_column as isize
            && column <= self.end_column as isize
    }

    /// Whether `other` lies entirely inside this region.
    pub fn encloses(&self, other: &Region) -> bool {
        self.start_row <= other.start_row
            && self.start_column <= other.start_column
            && self.end_row >= other.end_row
            && self.end_column >= other.end_column
    }

    /// Translate a full-board coordinate into this region's local frame.
    pub fn to_local(&self, mv: Move) -> Option<Move> {
        self.contains(mv)
            .then(|| Move::new(mv.row - self.start_row, mv.column - self.start_column))
    }

    /// Translate a region-local coordinate back onto the full board.
    pub fn to_global(&self, mv: Move) -> Move {
        Move::new(mv.row + self.start_row, mv.column + self.start_column)
    }
}

/// Minimal rectangle covering every mark, or `None` for an empty board.
pub fn extract_used_region(board: &Board) -> Option<Region> {
    let mut bounds: Option<Region> = None;
    for row in 0..board.rows() {
        for column in 0..board.columns() {
            if board.get(row, column).is_empty() {
                continue;
            }
            let r = bounds.get_or_insert(Region {
                start_row: row,
                end_row: row,
                start_column: column,
                end_column: column,
            });
            r.start_row = r.start_row.min(row);
            r.end_row = r.end_row.max(row);
            r.start_column = r.start_column.min(column);
            r.end_column = r.end_column.max(column);
        }
    }
    bounds
}

/// Grow `region` by `padding` on every side, clamped to a `board_size` board.
pub fn expand_region(region: &Region, board_size: usize, padding: usize) -> Region {
    let last = board_size.saturating_sub(1);
    Region {
        start_row: region.start_row.saturating_sub(padding),
        end_row: (region.end_row + padding).min(last),
        start_column: region.start_column.saturating_sub(padding),
        end_column: (region.end_column + padding).min(last),
    }
}

/// Push out by one any edge that has a mark on it, where the board has room.
///
/// Each edge is checked against the input region independently, so a
/// mark in a corner grows both adjoining edges.
pub fn expand_region_if_edge_has_mark(board: &Board, region: &Region) -> Region {
    let occupied = |row: usize, column: usize| !board.get(row, column).is_empty();
    let columns = region.start_column..=region.end_column;
    let rows = region.start_row..=region.end_row;
    let mut grown = *region;

    if region.start_row > 0 && columns.clone().any(|c| occupied(region.start_row, c)) {
        grown.start_row -= 1;
    }
    if region.end_row + 1 < board.rows() && columns.clone().any(|c| occupied(region.end_row, c)) {
        grown.end_row += 1;
    }
    if region.start_column > 0 && rows.clone().any(|r| occupied(r, region.start_column)) {
        grown.start_column -= 1;
    }
    if region.end_column + 1 < board.columns() && rows.clone().any(|r| occupied(r, region.end_column))
    {
        grown.end_column += 1;
    }
    grown
}

/// Copy the cells of `region` out into their own sub-board.
///
/// Panics if the region reaches past the board.
pub fn slice_region(board: &Board, region: &Region) -> Board {
    let mut sub = Board::new(region.height(), region.width());
    for row in 0..region.height() {
        for column in 0..region.width() {
            sub.set(
                row,
                column,
                board.get(region.start_row + row, region.start_column + column),
            );
        }
    }
    sub
}

/// Write `sub` back over `region`. Shapes must match exactly.
pub fn paste_region(board: &mut Board, region: &Region, sub: &Board) -> Result<(), EngineError> {
    if sub.rows() != region.height() || sub.columns() != region.width() {
        return Err(EngineError::RegionShapeMismatch {
            rows: sub.rows(),
            columns: sub.columns(),
            height: region.height(),
            width: region.width(),
        });
    }
    if region.end_row >= board.rows() || region.end_column >= board.columns() {
        return Err(EngineError::InvalidRegion {
            reason: format!(
                "region ends at ({}, {}) outside a {}x{} board",
                region.end_row,
                region.end_column,
                board.rows(),
                board.columns()
            ),
        });
    }
    for row in 0..sub.rows() {
        for column in 0..sub.columns() {
            board.set(
                region.start_row + row,
                region.start_column + column,
                sub.get(row, column),
            );
        }
    }
    Ok(())
}

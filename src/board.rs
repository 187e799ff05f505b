//! Grid representation, cell states, and win detection.
//!
//! A [`Board`] is a rectangular grid of [`Cell`]s stored row-major. Full
//! boards handed to the engine are square; sub-boards sliced out of a region
//! may be any rectangle, so nothing here assumes `rows == columns`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DIRECTIONS, MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::EngineError;
use crate::region::Region;

/// One of the two symbols a player can place.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mark::X => "x",
            Mark::O => "o",
        }
    }

    /// Parse the wire symbol (`"x"` or `"o"`).
    pub fn parse(symbol: &str) -> Result<Mark, EngineError> {
        match symbol {
            "x" => Ok(Mark::X),
            "o" => Ok(Mark::O),
            other => Err(EngineError::InvalidMark {
                mark: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// State of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Parse the wire symbol: `""` is empty, otherwise a mark.
    pub fn parse(symbol: &str) -> Result<Cell, EngineError> {
        if symbol.is_empty() {
            Ok(Cell::Empty)
        } else {
            Mark::parse(symbol).map(Cell::Marked)
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Cell::Empty => "",
            Cell::Marked(mark) => mark.symbol(),
        }
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        Cell::Marked(mark)
    }
}

/// A cell coordinate, 0-indexed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub row: usize,
    pub column: usize,
}

impl Move {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Chebyshev (king-move) distance between two cells.
    pub fn chebyshev(self, other: Move) -> usize {
        self.row
            .abs_diff(other.row)
            .max(self.column.abs_diff(other.column))
    }
}

/// Game state as seen by the winner scan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub fn is_decided(self) -> bool {
        self != Outcome::InProgress
    }
}

/// Number of marks in a row required to win on a `size` x `size` board.
pub fn win_length(size: usize) -> Result<usize, EngineError> {
    match size {
        3 => Ok(3),
        4..=6 => Ok(4),
        7..=9 => Ok(5),
        _ => Err(EngineError::UnsupportedBoardSize { size }),
    }
}

/// Whether `size` is a supported full-board side length.
pub fn is_supported_size(size: usize) -> bool {
    (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// An all-empty `rows` x `columns` grid.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![Cell::Empty; rows * columns],
        }
    }

    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a board from rows of cells. Rows must be non-empty and of equal length.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, EngineError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(EngineError::MalformedBoard {
                reason: "board must be a non-empty 2D grid".to_string(),
            });
        }
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(EngineError::MalformedBoard {
                reason: format!(
                    "row {bad} has {} cells, expected {width}",
                    rows[bad].len()
                ),
            });
        }
        Ok(Self {
            rows: height,
            columns: width,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse rows of wire symbols (`"x"`, `"o"`, `""`).
    pub fn parse<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self, EngineError> {
        let cells = rows
            .iter()
            .map(|row| row.iter().map(|s| Cell::parse(s.as_ref())).collect())
            .collect::<Result<Vec<Vec<Cell>>, _>>()?;
        Self::from_rows(cells)
    }

    /// Rows of wire symbols, the inverse of [`Board::parse`].
    pub fn to_symbols(&self) -> Vec<Vec<String>> {
        (0..self.rows)
            .map(|r| {
                (0..self.columns)
                    .map(|c| self.get(r, c).symbol().to_string())
                    .collect()
            })
            .collect()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    fn idx(&self, row: usize, column: usize) -> usize {
        row * self.columns + column
    }

    /// Cell at (`row`, `column`).
    ///
    /// Callers must pass in-bounds coordinates (see [`Board::contains`]);
    /// this panics otherwise. Use [`Board::get_signed`] for unchecked input.
    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[self.idx(row, column)]
    }

    /// Cell at a signed coordinate, or `None` off the grid.
    pub fn get_signed(&self, row: isize, column: isize) -> Option<Cell> {
        if row < 0 || column < 0 {
            return None;
        }
        let (row, column) = (row as usize, column as usize);
        if row >= self.rows || column >= self.columns {
            return None;
        }
        Some(self.get(row, column))
    }

    pub fn set(&mut self, row: usize, column: usize, cell: Cell) {
        let i = self.idx(row, column);
        self.cells[i] = cell;
    }

    pub fn place(&mut self, mv: Move, mark: Mark) {
        self.set(mv.row, mv.column, Cell::Marked(mark));
    }

    pub fn clear(&mut self, mv: Move) {
        self.set(mv.row, mv.column, Cell::Empty);
    }

    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.rows && mv.column < self.columns
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&c| c == Cell::Marked(mark)).count()
    }

    /// The side to move: the one with fewer marks, `X` when tied or empty.
    pub fn next_mark(&self) -> Mark {
        if self.count(Mark::X) > self.count(Mark::O) {
            Mark::O
        } else {
            Mark::X
        }
    }

    /// All empty cells in row-major order.
    pub fn available_moves(&self) -> Vec<Move> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| Move::new(i / self.columns, i % self.columns))
            .collect()
    }

    /// Whether any cell in the 8-neighborhood of `mv` holds `mark`.
    pub fn has_neighbor(&self, mv: Move, mark: Mark) -> bool {
        let (r, c) = (mv.row as isize, mv.column as isize);
        (-1..=1).any(|dr| {
            (-1..=1).any(|dc| {
                (dr, dc) != (0, 0) && self.get_signed(r + dr, c + dc) == Some(Cell::Marked(mark))
            })
        })
    }

    /// The region spanning the whole grid.
    pub fn full_region(&self) -> Region {
        Region::spanning(self.rows, self.columns)
    }

    /// Scan `region` (the whole grid when `None`) for a run of `win_length`
    /// identical marks.
    ///
    /// Runs are clipped to the region: cells outside it are never read. The
    /// first run found in row-major then [`DIRECTIONS`] order wins. With no
    /// run, a grid without empty cells is a draw.
    pub fn winner(&self, region: Option<&Region>, win_length: usize) -> Outcome {
        let full = self.full_region();
        let region = region.unwrap_or(&full);

        for row in region.start_row()..=region.end_row() {
            for column in region.start_column()..=region.end_column() {
                let Cell::Marked(mark) = self.get(row, column) else {
                    continue;
                };
                for (dr, dc) in DIRECTIONS {
                    if self.run_length(region, row, column, dr, dc, mark, win_length) == win_length
                    {
                        return Outcome::Win(mark);
                    }
                }
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// Consecutive `mark`s from (`row`, `column`) in one direction, capped at `limit`.
    #[allow(clippy::too_many_arguments)]
    fn run_length(
        &self,
        region: &Region,
        row: usize,
        column: usize,
        dr: isize,
        dc: isize,
        mark: Mark,
        limit: usize,
    ) -> usize {
        let mut count = 1;
        for step in 1..limit as isize {
            let r = row as isize + dr * step;
            let c = column as isize + dc * step;
            if !region.contains_signed(r, c) {
                break;
            }
            if self.get(r as usize, c as usize) != Cell::Marked(mark) {
                break;
            }
            count += 1;
        }
        count
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for column in 0..self.columns {
                let ch = match self.get(row, column) {
                    Cell::Marked(Mark::X) => 'X',
                    Cell::Marked(Mark::O) => 'O',
                    Cell::Empty => '.',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// Immutable connect-five board with gravity and line-based win detection
//
// Row 0 is the top of the grid and row ROWS - 1 the bottom. A piece dropped
// into a column lands on the lowest empty row. Every placement returns a new
// Board; an existing Board is never modified.

use std::fmt;

use crate::error::GameError;
use crate::types::PlayerId;

pub const ROWS: usize = 9;
pub const COLUMNS: usize = 9;
pub const WIN_LENGTH: usize = 5;

/// Line orientations as (row step, column step):
/// horizontal, vertical, "\" diagonal, "/" diagonal
pub const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Result of dropping a piece: the new board and the row the piece landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub board: Board,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<PlayerId>; COLUMNS]; ROWS],
}

impl Board {
    /// Creates an empty board
    pub fn new() -> Self {
        Board {
            cells: [[None; COLUMNS]; ROWS],
        }
    }

    /// Cell contents at (row, col). Panics on out-of-range coordinates, so
    /// only in-crate callers with known-good indices use it.
    pub(crate) fn get(&self, row: usize, col: usize) -> Option<PlayerId> {
        self.cells[row][col]
    }

    /// Bounds-checked cell lookup with signed coordinates: `None` off the
    /// board, `Some(None)` for an empty cell
    pub fn get_checked(&self, row: i32, col: i32) -> Option<Option<PlayerId>> {
        if row < 0 || col < 0 || row >= ROWS as i32 || col >= COLUMNS as i32 {
            return None;
        }
        Some(self.cells[row as usize][col as usize])
    }

    /// True iff the column exists and its top cell is empty
    pub fn is_valid_move(&self, col: usize) -> bool {
        col < COLUMNS && self.cells[0][col].is_none()
    }

    /// Lowest empty row of a column, `None` when the column is full
    pub fn target_row(&self, col: usize) -> Result<Option<usize>, GameError> {
        if col >= COLUMNS {
            return Err(GameError::ColumnOutOfRange { column: col });
        }

        Ok((0..ROWS).rev().find(|&row| self.cells[row][col].is_none()))
    }

    /// Drops a piece for `player` into `col`, returning the new board and the
    /// row it landed on
    pub fn place_piece(&self, col: usize, player: PlayerId) -> Result<Placement, GameError> {
        let row = self
            .target_row(col)?
            .ok_or(GameError::ColumnFull { column: col })?;

        let mut cells = self.cells;
        cells[row][col] = Some(player);

        Ok(Placement {
            board: Board { cells },
            row,
        })
    }

    /// True if `player` owns a run of at least WIN_LENGTH cells through
    /// (row, col) in any orientation. The origin cell counts toward the run.
    pub fn check_win(&self, row: usize, col: usize, player: PlayerId) -> bool {
        if row >= ROWS || col >= COLUMNS || self.cells[row][col] != Some(player) {
            return false;
        }

        DIRECTIONS
            .iter()
            .any(|&(dr, dc)| self.run_length(row, col, dr, dc, player) >= WIN_LENGTH)
    }

    /// Counts contiguous `player` cells through (row, col) along one orientation
    fn run_length(&self, row: usize, col: usize, dr: i32, dc: i32, player: PlayerId) -> usize {
        let mut count = 1;

        for sign in [1, -1] {
            let mut r = row as i32 + dr * sign;
            let mut c = col as i32 + dc * sign;
            while self.get_checked(r, c) == Some(Some(player)) {
                count += 1;
                r += dr * sign;
                c += dc * sign;
            }
        }

        count
    }

    /// True iff any column can still take a piece
    pub fn has_valid_moves(&self) -> bool {
        (0..COLUMNS).any(|col| self.is_valid_move(col))
    }

    pub fn is_full(&self) -> bool {
        !self.has_valid_moves()
    }

    /// Playable columns in ascending order
    pub fn valid_columns(&self) -> Vec<usize> {
        (0..COLUMNS).filter(|&col| self.is_valid_move(col)).collect()
    }

    pub fn piece_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Would dropping a `player` piece into `col` complete a line?
    pub fn is_winning_move(&self, col: usize, player: PlayerId) -> bool {
        match self.place_piece(col, player) {
            Ok(placement) => placement.board.check_win(placement.row, col, player),
            Err(_) => false,
        }
    }

    /// First column (lowest index) that wins immediately for `player`
    pub fn winning_move(&self, player: PlayerId) -> Option<usize> {
        (0..COLUMNS).find(|&col| self.is_winning_move(col, player))
    }

    /// Every WIN_LENGTH-cell window on the board, across all four orientations
    pub fn windows(&self) -> impl Iterator<Item = [Option<PlayerId>; WIN_LENGTH]> + '_ {
        (0..ROWS).flat_map(move |row| {
            (0..COLUMNS).flat_map(move |col| {
                DIRECTIONS
                    .into_iter()
                    .filter_map(move |(dr, dc)| self.window_at(row, col, dr, dc))
            })
        })
    }

    /// Window starting at (row, col), `None` if it would leave the board
    fn window_at(
        &self,
        row: usize,
        col: usize,
        dr: i32,
        dc: i32,
    ) -> Option<[Option<PlayerId>; WIN_LENGTH]> {
        let mut cells = [None; WIN_LENGTH];
        for (i, cell) in cells.iter_mut().enumerate() {
            let step = i as i32;
            *cell = self.get_checked(row as i32 + dr * step, col as i32 + dc * step)?;
        }
        Some(cells)
    }

    /// Stable sort of `columns` by ascending distance from the centre column
    pub fn center_order(columns: &[usize]) -> Vec<usize> {
        let center = (COLUMNS / 2) as i32;
        let mut ordered = columns.to_vec();
        ordered.sort_by_key(|&col| (col as i32 - center).abs());
        ordered
    }

    /// The `count` columns nearest the centre, ties broken toward lower indices
    pub fn center_columns(count: usize) -> Vec<usize> {
        let all: Vec<usize> = (0..COLUMNS).collect();
        let mut nearest = Self::center_order(&all);
        nearest.truncate(count);
        nearest.sort_unstable();
        nearest
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                let symbol = match cell {
                    None => '.',
                    Some(PlayerId::One) => 'X',
                    Some(PlayerId::Two) => 'O',
                };
                write!(f, "{} ", symbol)?;
            }
            writeln!(f)?;
        }
        for col in 0..COLUMNS {
            write!(f, "{} ", col)?;
        }
        writeln!(f)
    }
}

//! Board module - manages the game grid
//!
//! The board is a 6x7 grid where each cell can be empty or hold a player's token.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where row ranges 0..5 (top to bottom), col ranges 0..6 (left to right).
//! Pieces settle at the highest free row index of a column (gravity).

use arrayvec::ArrayVec;

use crate::error::BoardError;
use crate::types::{cell_token, Cell, Coordinate, Grid, Move, Player, COLS, ROWS};

/// Total number of cells on the board
const BOARD_SIZE: usize = ROWS * COLS;

/// The game board - 7 columns x 6 rows using flat array storage
///
/// The only mutation path is [`Board::drop_piece`], which keeps every column
/// gravity-packed: empty cells are contiguous at the top.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * COLS + col)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: usize, col: usize) -> Option<usize> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        Some(row * COLS + col)
    }

    /// Get cell at position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Cell at a known in-bounds coordinate.
    #[inline(always)]
    pub(crate) fn at(&self, row: usize, col: usize) -> Cell {
        self.cells[row * COLS + col]
    }

    /// True iff the topmost cell of `col` holds a token.
    ///
    /// Columns outside the board never accept a piece and report full.
    pub fn is_column_full(&self, col: usize) -> bool {
        match self.get(0, col) {
            Some(cell) => cell.is_some(),
            None => true,
        }
    }

    /// Number of tokens stacked in `col` (0 for out-of-range columns)
    pub fn column_height(&self, col: usize) -> usize {
        if col >= COLS {
            return 0;
        }
        (0..ROWS).filter(|&row| self.at(row, col).is_some()).count()
    }

    /// Drop a token for `player` into `col`.
    ///
    /// The token settles in the lowest empty cell of the column; the resolved
    /// coordinate is returned. A full or out-of-range column is an error and
    /// leaves the board untouched.
    pub fn drop_piece(&mut self, col: usize, player: Player) -> Result<Coordinate, BoardError> {
        if col >= COLS {
            return Err(BoardError::ColumnOutOfRange(col));
        }
        if self.is_column_full(col) {
            return Err(BoardError::ColumnFull(col));
        }

        // Scan bottom-up for the first free slot.
        let row = (0..ROWS)
            .rev()
            .find(|&row| self.at(row, col).is_none())
            .ok_or(BoardError::ColumnFull(col))?;

        self.cells[row * COLS + col] = Some(player);
        Ok(Coordinate::new(row as u8, col as u8))
    }

    pub(crate) fn apply(&mut self, mv: Move) -> Result<Coordinate, BoardError> {
        self.drop_piece(mv.col, mv.player)
    }

    /// Columns that can still take a token, left to right
    pub fn legal_columns(&self) -> ArrayVec<usize, COLS> {
        (0..COLS).filter(|&col| !self.is_column_full(col)).collect()
    }

    /// Number of tokens on the board
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Write the integer encoding (`0` empty, `1` human, `2` agent) into `out`.
    pub fn write_grid(&self, out: &mut Grid) {
        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, v) in out_row.iter_mut().enumerate() {
                *v = cell_token(self.at(row, col));
            }
        }
    }

    pub fn to_grid(&self) -> Grid {
        let mut grid = [[0u8; COLS]; ROWS];
        self.write_grid(&mut grid);
        grid
    }

    /// Rebuild a board from its integer encoding.
    ///
    /// Rejects unknown tokens and grids where a token sits above an empty cell.
    pub fn from_grid(grid: &Grid) -> Result<Self, BoardError> {
        let mut cells = [None; BOARD_SIZE];
        for (row, grid_row) in grid.iter().enumerate() {
            for (col, &token) in grid_row.iter().enumerate() {
                cells[row * COLS + col] = match token {
                    0 => None,
                    t => Some(Player::from_token(t).ok_or(BoardError::InvalidToken {
                        row,
                        col,
                        token: t,
                    })?),
                };
            }
        }

        let board = Self { cells };
        if let Some(at) = board.first_floating_piece() {
            return Err(BoardError::FloatingPiece {
                row: at.row as usize,
                col: at.col as usize,
            });
        }
        Ok(board)
    }

    /// First token (scanning columns left to right) resting above an empty cell.
    pub fn first_floating_piece(&self) -> Option<Coordinate> {
        for col in 0..COLS {
            for row in 0..ROWS - 1 {
                if self.at(row, col).is_some() && self.at(row + 1, col).is_none() {
                    return Some(Coordinate::new(row as u8, col as u8));
                }
            }
        }
        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..ROWS {
            for col in 0..COLS {
                let c = match self.at(row, col) {
                    None => '.',
                    Some(Player::Human) => 'X',
                    Some(Player::Agent) => 'O',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

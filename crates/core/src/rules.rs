//! Rules module - pure functions over a board snapshot
//!
//! Win detection scans every 4-cell window of the board exactly once, in a fixed
//! order, so that when several four-in-a-rows exist at once the same one is
//! always reported:
//!
//! 1. Horizontal (→), reported left to right
//! 2. Vertical, reported bottom to top
//! 3. Diagonal (↘), reported top-left to bottom-right
//! 4. Anti-diagonal (↙), reported top-right to bottom-left
//!
//! Within a direction, windows are visited by anchor row top to bottom, then
//! anchor column left to right.

use crate::board::Board;
use crate::types::{Coordinate, GameResult, Player, WinningLine, COLS, ROWS, WIN_LENGTH};

/// A scan direction with the anchor ranges that keep every window on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Direction {
    d_row: isize,
    d_col: isize,
    rows: (usize, usize),
    cols: (usize, usize),
}

const SPAN: usize = WIN_LENGTH - 1;

const DIRECTIONS: [Direction; 4] = [
    // Horizontal
    Direction {
        d_row: 0,
        d_col: 1,
        rows: (0, ROWS),
        cols: (0, COLS - SPAN),
    },
    // Vertical, anchored on the lowest cell
    Direction {
        d_row: -1,
        d_col: 0,
        rows: (SPAN, ROWS),
        cols: (0, COLS),
    },
    // Diagonal ↘
    Direction {
        d_row: 1,
        d_col: 1,
        rows: (0, ROWS - SPAN),
        cols: (0, COLS - SPAN),
    },
    // Anti-diagonal ↙
    Direction {
        d_row: 1,
        d_col: -1,
        rows: (0, ROWS - SPAN),
        cols: (SPAN, COLS),
    },
];

impl Direction {
    #[inline]
    fn window(&self, row: usize, col: usize) -> WinningLine {
        let mut line = [Coordinate::new(0, 0); WIN_LENGTH];
        for (i, slot) in line.iter_mut().enumerate() {
            let r = row as isize + self.d_row * i as isize;
            let c = col as isize + self.d_col * i as isize;
            *slot = Coordinate::new(r as u8, c as u8);
        }
        line
    }
}

/// First four-in-a-row of `player` in scan order, if any.
pub fn find_winning_line(board: &Board, player: Player) -> Option<WinningLine> {
    for dir in &DIRECTIONS {
        for row in dir.rows.0..dir.rows.1 {
            for col in dir.cols.0..dir.cols.1 {
                let line = dir.window(row, col);
                let owned = line
                    .iter()
                    .all(|c| board.at(c.row as usize, c.col as usize) == Some(player));
                if owned {
                    return Some(line);
                }
            }
        }
    }
    None
}

/// True iff every cell of the top row is filled.
///
/// Gravity keeps columns packed, so a full top row means a full board.
pub fn is_board_full(board: &Board) -> bool {
    (0..COLS).all(|col| board.at(0, col).is_some())
}

/// Result of the position right after `last_player` moved.
///
/// A win is checked before fullness: completing a line with the last free cell
/// is a win, not a draw.
pub fn evaluate(board: &Board, last_player: Player) -> GameResult {
    if let Some(line) = find_winning_line(board, last_player) {
        return GameResult::Win {
            player: last_player,
            line,
        };
    }
    if is_board_full(board) {
        return GameResult::Draw;
    }
    GameResult::InProgress
}

/// Number of distinct 4-cell windows on the board.
pub fn window_count() -> usize {
    DIRECTIONS
        .iter()
        .map(|d| (d.rows.1 - d.rows.0) * (d.cols.1 - d.cols.0))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(cells: &[(u8, u8)]) -> Vec<Coordinate> {
        cells.iter().map(|&(r, c)| Coordinate::new(r, c)).collect()
    }

    fn board_from_rows(rows: [&str; ROWS]) -> Board {
        let mut grid = [[0u8; COLS]; ROWS];
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                grid[r][c] = match ch {
                    'X' => 1,
                    'O' => 2,
                    _ => 0,
                };
            }
        }
        Board::from_grid(&grid).unwrap()
    }

    #[test]
    fn test_every_window_visited_once() {
        // 24 horizontal + 21 vertical + 12 + 12 diagonal
        assert_eq!(window_count(), 69);
    }

    #[test]
    fn test_empty_board_in_progress() {
        let board = Board::new();
        assert_eq!(find_winning_line(&board, Player::Human), None);
        assert!(!is_board_full(&board));
        assert_eq!(evaluate(&board, Player::Human), GameResult::InProgress);
    }

    #[test]
    fn test_horizontal_bottom_right_corner() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "OO.XXXX",
        ]);
        let line = find_winning_line(&board, Player::Human).unwrap();
        assert_eq!(line.to_vec(), coords(&[(5, 3), (5, 4), (5, 5), (5, 6)]));
        assert_eq!(find_winning_line(&board, Player::Agent), None);
    }

    #[test]
    fn test_vertical_reported_bottom_up() {
        let board = board_from_rows([
            ".......",
            ".......",
            "O......",
            "O......",
            "O......",
            "O......",
        ]);
        let line = find_winning_line(&board, Player::Agent).unwrap();
        assert_eq!(line.to_vec(), coords(&[(5, 0), (4, 0), (3, 0), (2, 0)]));
    }

    #[test]
    fn test_vertical_top_of_column() {
        let board = board_from_rows([
            "......X",
            "......X",
            "......X",
            "......X",
            "......O",
            "......O",
        ]);
        let line = find_winning_line(&board, Player::Human).unwrap();
        assert_eq!(line.to_vec(), coords(&[(3, 6), (2, 6), (1, 6), (0, 6)]));
    }

    #[test]
    fn test_diagonal_down_right() {
        let board = board_from_rows([
            ".......",
            ".......",
            "X......",
            "OX.....",
            "OOX....",
            "OOOX...",
        ]);
        let line = find_winning_line(&board, Player::Human).unwrap();
        assert_eq!(line.to_vec(), coords(&[(2, 0), (3, 1), (4, 2), (5, 3)]));
    }

    #[test]
    fn test_anti_diagonal_top_right_corner() {
        let board = board_from_rows([
            "......O",
            ".....OX",
            "....OXX",
            "...OXXO",
            "...XOOX",
            "...XOXO",
        ]);
        let line = find_winning_line(&board, Player::Agent).unwrap();
        assert_eq!(line.to_vec(), coords(&[(0, 6), (1, 5), (2, 4), (3, 3)]));
    }

    #[test]
    fn test_three_in_a_row_is_not_a_win() {
        let board = board_from_rows([
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "XXX.XXX",
        ]);
        assert_eq!(find_winning_line(&board, Player::Human), None);
    }

    #[test]
    fn test_horizontal_reported_before_vertical() {
        let board = board_from_rows([
            ".......",
            ".......",
            "X......",
            "X......",
            "X......",
            "XXXX...",
        ]);
        let line = find_winning_line(&board, Player::Human).unwrap();
        assert_eq!(line.to_vec(), coords(&[(5, 0), (5, 1), (5, 2), (5, 3)]));
    }

    #[test]
    fn test_full_board_draw() {
        let board = board_from_rows([
            "XOXOXOX",
            "XOXOXOX",
            "OXOXOXO",
            "XOXOXOX",
            "XOXOXOX",
            "OXOXOXO",
        ]);
        assert_eq!(find_winning_line(&board, Player::Human), None);
        assert_eq!(find_winning_line(&board, Player::Agent), None);
        assert!(is_board_full(&board));
        assert_eq!(evaluate(&board, Player::Human), GameResult::Draw);
    }

    #[test]
    fn test_win_on_last_cell_beats_draw() {
        // (0,3) is the last cell filled and completes the top row.
        let board = board_from_rows([
            "XXXXXOX",
            "XOXOXOX",
            "OXOXOXO",
            "XOXOXOX",
            "XOXOXOX",
            "OXOXOXO",
        ]);
        assert!(is_board_full(&board));
        assert_eq!(
            evaluate(&board, Player::Human),
            GameResult::Win {
                player: Player::Human,
                line: [
                    Coordinate::new(0, 0),
                    Coordinate::new(0, 1),
                    Coordinate::new(0, 2),
                    Coordinate::new(0, 3),
                ],
            }
        );
    }
}

//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (rules, turn control, agent protocol).
//!
//! # Board Dimensions
//!
//! Standard connect-four grid:
//!
//! - **Rows**: 6 (indexed 0-5, row 0 is the top row)
//! - **Columns**: 7 (indexed 0-6, column 0 is the leftmost)
//! - **Win length**: 4 tokens in a straight line
//!
//! # Integer Encoding
//!
//! The move-request boundary exchanges boards as integer grids:
//!
//! | Value | Meaning |
//! |-------|---------|
//! | `0` | Empty |
//! | `1` | Human |
//! | `2` | Agent |
//!
//! # Examples
//!
//! ```
//! use connect_four_types::{Coordinate, GameResult, Player, COLS, ROWS};
//!
//! assert_eq!(ROWS, 6);
//! assert_eq!(COLS, 7);
//!
//! assert_eq!(Player::Human.token(), 1);
//! assert_eq!(Player::from_token(2), Some(Player::Agent));
//! assert_eq!(Player::Human.opponent(), Player::Agent);
//!
//! let result = GameResult::Draw;
//! assert!(result.is_finished());
//! assert_eq!(Coordinate::new(5, 3).to_string(), "(5,3)");
//! ```

use std::fmt;

/// Board height in cells (6 rows)
pub const ROWS: usize = 6;

/// Board width in cells (7 columns)
pub const COLS: usize = 7;

/// Number of same-player tokens in a straight line that wins the game
pub const WIN_LENGTH: usize = 4;

/// Column value reserved by the agent to mean "no legal move, declare a draw".
pub const NO_MOVE_SENTINEL: i32 = -1;

/// Search depth used when the host does not choose one.
pub const DEFAULT_DEPTH: u8 = 4;

/// Integer grid exchanged with the agent (row 0 is the top row).
pub type Grid = [[u8; COLS]; ROWS];

/// Identifier of one outstanding agent request.
pub type RequestId = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_dimension_defaults() {
        assert_eq!(ROWS, 6);
        assert_eq!(COLS, 7);
        assert_eq!(WIN_LENGTH, 4);
        assert_eq!(NO_MOVE_SENTINEL, -1);
        assert_eq!(DEFAULT_DEPTH, 4);
    }

    #[test]
    fn player_tokens_roundtrip() {
        for player in [Player::Human, Player::Agent] {
            assert_eq!(Player::from_token(player.token()), Some(player));
        }
        assert_eq!(Player::from_token(0), None);
        assert_eq!(Player::from_token(3), None);
    }

    #[test]
    fn winner_of_result() {
        let line = [
            Coordinate::new(5, 0),
            Coordinate::new(5, 1),
            Coordinate::new(5, 2),
            Coordinate::new(5, 3),
        ];
        let win = GameResult::Win {
            player: Player::Agent,
            line,
        };
        assert_eq!(win.winner(), Some(Player::Agent));
        assert_eq!(win.winning_line(), Some(&line));
        assert_eq!(GameResult::Draw.winner(), None);
        assert!(!GameResult::InProgress.is_finished());
    }

    #[test]
    fn tally_records_outcomes() {
        let mut tally = Tally::default();
        tally.record(&GameResult::Win {
            player: Player::Human,
            line: [Coordinate::new(0, 0); 4],
        });
        tally.record(&GameResult::Draw);
        tally.record(&GameResult::InProgress);
        assert_eq!(
            tally,
            Tally {
                human_wins: 1,
                agent_wins: 0,
                draws: 1
            }
        );
        assert_eq!(tally.games(), 2);
    }
}

/// The two sides of a game.
///
/// The human always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    Human,
    Agent,
}

impl Player {
    /// Integer token used on the wire (`1` human, `2` agent)
    pub fn token(&self) -> u8 {
        match self {
            Player::Human => 1,
            Player::Agent => 2,
        }
    }

    /// Parse from a wire token. `0` (empty) and unknown values yield `None`.
    pub fn from_token(token: u8) -> Option<Self> {
        match token {
            1 => Some(Player::Human),
            2 => Some(Player::Agent),
            _ => None,
        }
    }

    pub fn opponent(&self) -> Self {
        match self {
            Player::Human => Player::Agent,
            Player::Agent => Player::Human,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Player::Human => "human",
            Player::Agent => "agent",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(Player)`: Cell holding that player's token
pub type Cell = Option<Player>;

/// Integer token of a cell (`0` when empty)
pub fn cell_token(cell: Cell) -> u8 {
    cell.map(|p| p.token()).unwrap_or(0)
}

/// A `(row, col)` position on the board; row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

impl Coordinate {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Four coordinates forming a four-in-a-row, in scan order.
pub type WinningLine = [Coordinate; WIN_LENGTH];

/// A column choice made by one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub col: usize,
    pub player: Player,
}

/// Outcome of the game after a move.
///
/// Produced fresh after every move; never mutated, only replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    InProgress,
    Win { player: Player, line: WinningLine },
    Draw,
}

impl GameResult {
    pub fn is_finished(&self) -> bool {
        !matches!(self, GameResult::InProgress)
    }

    pub fn winner(&self) -> Option<Player> {
        match self {
            GameResult::Win { player, .. } => Some(*player),
            _ => None,
        }
    }

    pub fn winning_line(&self) -> Option<&WinningLine> {
        match self {
            GameResult::Win { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Running win/loss/draw counts, kept across restarts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Tally {
    pub human_wins: u32,
    pub agent_wins: u32,
    pub draws: u32,
}

impl Tally {
    /// Count a finished game. `InProgress` is ignored.
    pub fn record(&mut self, result: &GameResult) {
        match result {
            GameResult::Win {
                player: Player::Human,
                ..
            } => self.human_wins += 1,
            GameResult::Win {
                player: Player::Agent,
                ..
            } => self.agent_wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::InProgress => {}
        }
    }

    pub fn games(&self) -> u32 {
        self.human_wins + self.agent_wins + self.draws
    }
}

/// UI events consumed by the turn controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameInput {
    /// The human clicked a column
    ColumnClicked(usize),
    /// Start a fresh game (tally is kept)
    RestartRequested,
}

/// Notifications produced by the turn controller for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A token settled at `at`
    CellFilled { at: Coordinate, player: Player },
    /// The side to move changed
    TurnChanged { to: Player },
    /// The game reached a terminal result (`Win` or `Draw`)
    GameEnded { result: GameResult },
    /// The running tally changed
    TallyUpdated { tally: Tally },
    /// The agent call for `request_id` failed; the turn may be retried
    AgentFailed { request_id: RequestId, reason: String },
    /// A new game started
    Restarted { game_id: u32 },
}

/// A move request issued by the controller after a non-terminal human move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AgentRequest {
    pub request_id: RequestId,
    /// Game the request belongs to (increments on restart)
    pub game_id: u32,
    pub board: Grid,
    pub depth: u8,
}

//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the board, the rules and the turn state machine.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: The same sequence of inputs always yields the same game
//! - **Testable**: Every rule and transition is exercised without a network
//! - **Portable**: Can run behind any view (terminal, web, headless)
//!
//! # Module Structure
//!
//! - [`board`]: 6x7 grid with gravity-drop insertion and read-only queries
//! - [`rules`]: Win detection in four directions, full-board detection, evaluation
//! - [`controller`]: Turn state machine coordinating the human and the external agent
//! - [`error`]: Error kinds for rejected moves, board contract violations and agent failures
//!
//! # Game Rules
//!
//! - **Gravity**: A token dropped in a column settles in its lowest empty cell
//! - **Win**: Four same-player tokens in a row, column or either diagonal
//! - **Draw**: The board fills up without a win; a move that fills the last
//!   cell and completes a line is a win
//! - **Order**: The human always moves first; the agent answers every
//!   non-terminal human move
//!
//! # Example
//!
//! ```
//! use connect_four_core::{rules, Board};
//! use connect_four_core::types::{GameResult, Player};
//!
//! let mut board = Board::new();
//! for _ in 0..4 {
//!     board.drop_piece(3, Player::Human).unwrap();
//! }
//! assert!(matches!(
//!     rules::evaluate(&board, Player::Human),
//!     GameResult::Win { player: Player::Human, .. }
//! ));
//! ```

pub mod board;
pub mod controller;
pub mod error;
pub mod rules;

pub use connect_four_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use controller::{AgentReply, GameSession, TurnController, TurnOutcome, TurnState};
pub use error::{AgentError, BoardError, InvalidMoveError, ReplyError};
pub use rules::{evaluate, find_winning_line, is_board_full};

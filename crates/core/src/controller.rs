//! Turn controller - sequences human moves, agent requests and agent replies
//!
//! The controller owns the [`GameSession`] and the running [`Tally`]. It accepts
//! a human move only in [`TurnState::AwaitingHuman`] and an agent reply only in
//! [`TurnState::AwaitingAgent`], and only when the reply carries the id of the
//! request currently outstanding. That mutual exclusion is the whole
//! concurrency discipline: a host may run the agent call on any executor as
//! long as it feeds the reply back here.
//!
//! # Example
//!
//! ```
//! use connect_four_core::{AgentReply, TurnController, TurnOutcome};
//! use connect_four_core::types::{GameResult, Player};
//!
//! let mut ctl = TurnController::new(4);
//! let TurnOutcome::AwaitingAgent(request) = ctl.submit_human_move(3).unwrap() else {
//!     panic!("expected an agent request");
//! };
//! assert_eq!(request.board[5][3], Player::Human.token());
//!
//! let outcome = ctl
//!     .apply_agent_reply(AgentReply::column(request.request_id, 2))
//!     .unwrap();
//! assert_eq!(outcome, TurnOutcome::AwaitingHuman);
//! assert_eq!(ctl.result(), GameResult::InProgress);
//! ```

use tracing::{debug, info, warn};

use crate::board::Board;
use crate::error::{AgentError, InvalidMoveError, ReplyError};
use crate::rules;
use crate::types::{
    AgentRequest, Coordinate, GameEvent, GameInput, GameResult, Move, Player, RequestId, Tally,
    COLS, NO_MOVE_SENTINEL,
};

/// Where the turn state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingHuman,
    /// Suspended on the external move request `request_id`
    AwaitingAgent {
        request_id: RequestId,
    },
    Finished(GameResult),
}

impl TurnState {
    pub fn label(&self) -> &'static str {
        match self {
            TurnState::AwaitingHuman => "awaiting human",
            TurnState::AwaitingAgent { .. } => "awaiting agent",
            TurnState::Finished(_) => "finished",
        }
    }

    /// Side expected to move next, `None` once finished.
    pub fn to_move(&self) -> Option<Player> {
        match self {
            TurnState::AwaitingHuman => Some(Player::Human),
            TurnState::AwaitingAgent { .. } => Some(Player::Agent),
            TurnState::Finished(_) => None,
        }
    }
}

/// Reply to an [`AgentRequest`], as delivered by whatever transport the host uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReply {
    pub request_id: RequestId,
    /// Column chosen by the agent (`-1` for "no legal move"), or the call failure
    pub outcome: Result<i32, AgentError>,
}

impl AgentReply {
    pub fn column(request_id: RequestId, column: i32) -> Self {
        Self {
            request_id,
            outcome: Ok(column),
        }
    }

    pub fn failed(request_id: RequestId, err: AgentError) -> Self {
        Self {
            request_id,
            outcome: Err(err),
        }
    }
}

/// What the host has to do next after a successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Enable move input for the human
    AwaitingHuman,
    /// Send this request to the agent and feed the reply back
    AwaitingAgent(AgentRequest),
    /// The game is over; only a restart is accepted
    Finished(GameResult),
}

/// One game's mutable state. Replaced wholesale on restart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    game_id: u32,
    board: Board,
    state: TurnState,
    result: GameResult,
    moves: u32,
}

impl GameSession {
    fn new(game_id: u32) -> Self {
        Self {
            game_id,
            board: Board::new(),
            state: TurnState::AwaitingHuman,
            result: GameResult::InProgress,
            moves: 0,
        }
    }

    pub fn game_id(&self) -> u32 {
        self.game_id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Tokens placed so far in this game
    pub fn moves(&self) -> u32 {
        self.moves
    }
}

/// The turn state machine.
#[derive(Debug, Clone)]
pub struct TurnController {
    session: GameSession,
    tally: Tally,
    /// Search depth carried by the next agent request
    depth: u8,
    next_request_id: RequestId,
    events: Vec<GameEvent>,
}

impl TurnController {
    /// Start the first game with the given agent search depth (at least 1).
    pub fn new(depth: u8) -> Self {
        Self {
            session: GameSession::new(1),
            tally: Tally::default(),
            depth: depth.max(1),
            next_request_id: 1,
            events: Vec::new(),
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn board(&self) -> &Board {
        &self.session.board
    }

    pub fn state(&self) -> TurnState {
        self.session.state
    }

    pub fn result(&self) -> GameResult {
        self.session.result
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn game_id(&self) -> u32 {
        self.session.game_id
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Change the search depth used by subsequent agent requests.
    pub fn set_depth(&mut self, depth: u8) {
        self.depth = depth.max(1);
    }

    /// Id of the outstanding agent request, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        match self.session.state {
            TurnState::AwaitingAgent { request_id } => Some(request_id),
            _ => None,
        }
    }

    /// Take all notifications queued since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Dispatch a UI event.
    ///
    /// Returns the agent request to send when a column click hands the turn to
    /// the agent.
    pub fn handle(&mut self, input: GameInput) -> Result<Option<AgentRequest>, InvalidMoveError> {
        match input {
            GameInput::ColumnClicked(col) => match self.submit_human_move(col)? {
                TurnOutcome::AwaitingAgent(request) => Ok(Some(request)),
                _ => Ok(None),
            },
            GameInput::RestartRequested => {
                self.restart();
                Ok(None)
            }
        }
    }

    /// Apply a human move in `col`.
    ///
    /// Rejected without any side effect when it is not the human's turn or the
    /// column is out of range or full.
    pub fn submit_human_move(&mut self, col: usize) -> Result<TurnOutcome, InvalidMoveError> {
        if self.session.state != TurnState::AwaitingHuman {
            return Err(InvalidMoveError::NotHumansTurn {
                state: self.session.state.label(),
            });
        }
        if col >= COLS {
            return Err(InvalidMoveError::ColumnOutOfRange(col));
        }
        if self.session.board.is_column_full(col) {
            return Err(InvalidMoveError::ColumnFull(col));
        }

        let mv = Move {
            col,
            player: Player::Human,
        };
        let at = self
            .session
            .board
            .apply(mv)
            .map_err(|_| InvalidMoveError::ColumnFull(col))?;
        self.record_drop(at, mv);

        let result = rules::evaluate(&self.session.board, Player::Human);
        if result.is_finished() {
            self.finish(result);
            return Ok(TurnOutcome::Finished(result));
        }

        let request = self.issue_request();
        self.events.push(GameEvent::TurnChanged {
            to: Player::Agent,
        });
        Ok(TurnOutcome::AwaitingAgent(request))
    }

    /// Re-issue the outstanding agent request under a fresh id.
    ///
    /// Any late reply to the previous id is discarded as stale.
    pub fn retry_agent_request(&mut self) -> Result<AgentRequest, InvalidMoveError> {
        match self.session.state {
            TurnState::AwaitingAgent { request_id } => {
                let request = self.issue_request();
                debug!(
                    superseded = request_id,
                    request_id = request.request_id,
                    "retrying agent request"
                );
                Ok(request)
            }
            other => Err(InvalidMoveError::NoPendingRequest {
                state: other.label(),
            }),
        }
    }

    /// Apply the agent's reply to the outstanding request.
    ///
    /// A stale reply changes nothing. A failed call or an illegal column leaves
    /// the controller in `AwaitingAgent` with the same request outstanding and
    /// queues an [`GameEvent::AgentFailed`]; the host may retry or restart.
    pub fn apply_agent_reply(&mut self, reply: AgentReply) -> Result<TurnOutcome, ReplyError> {
        let AgentReply {
            request_id,
            outcome,
        } = reply;

        if self.pending_request() != Some(request_id) {
            debug!(
                request_id,
                game_id = self.session.game_id,
                state = self.session.state.label(),
                "discarding stale agent reply"
            );
            return Err(ReplyError::Stale { request_id });
        }

        let column = match outcome {
            Ok(column) => column,
            Err(err) => return Err(self.agent_failed(request_id, err)),
        };

        if column == NO_MOVE_SENTINEL {
            info!(
                game_id = self.session.game_id,
                "agent reports no legal move"
            );
            self.finish(GameResult::Draw);
            return Ok(TurnOutcome::Finished(GameResult::Draw));
        }

        let col = match usize::try_from(column) {
            Ok(col) if col < COLS && !self.session.board.is_column_full(col) => col,
            _ => {
                let err = AgentError::IllegalColumn { column };
                return Err(self.agent_failed(request_id, err));
            }
        };

        let mv = Move {
            col,
            player: Player::Agent,
        };
        let at = match self.session.board.apply(mv) {
            Ok(at) => at,
            Err(_) => {
                let err = AgentError::IllegalColumn { column };
                return Err(self.agent_failed(request_id, err));
            }
        };
        self.record_drop(at, mv);

        let result = rules::evaluate(&self.session.board, Player::Agent);
        if result.is_finished() {
            self.finish(result);
            return Ok(TurnOutcome::Finished(result));
        }

        self.session.state = TurnState::AwaitingHuman;
        self.events.push(GameEvent::TurnChanged {
            to: Player::Human,
        });
        Ok(TurnOutcome::AwaitingHuman)
    }

    /// Replace the game with a fresh one. The tally is kept.
    ///
    /// An outstanding agent request is abandoned; its reply will be stale.
    pub fn restart(&mut self) {
        if let Some(request_id) = self.pending_request() {
            debug!(request_id, "abandoning outstanding agent request");
        }
        let game_id = self.session.game_id.wrapping_add(1);
        self.session = GameSession::new(game_id);
        self.events.push(GameEvent::Restarted { game_id });
        self.events.push(GameEvent::TurnChanged {
            to: Player::Human,
        });
        debug!(game_id, "game restarted");
    }

    fn issue_request(&mut self) -> AgentRequest {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.session.state = TurnState::AwaitingAgent { request_id };
        AgentRequest {
            request_id,
            game_id: self.session.game_id,
            board: self.session.board.to_grid(),
            depth: self.depth,
        }
    }

    fn record_drop(&mut self, at: Coordinate, mv: Move) {
        self.session.moves += 1;
        debug!(
            game_id = self.session.game_id,
            player = %mv.player,
            row = at.row,
            col = at.col,
            "piece dropped"
        );
        self.events.push(GameEvent::CellFilled {
            at,
            player: mv.player,
        });
    }

    fn finish(&mut self, result: GameResult) {
        self.session.state = TurnState::Finished(result);
        self.session.result = result;
        self.tally.record(&result);
        info!(
            game_id = self.session.game_id,
            winner = result.winner().map(|p| p.as_str()).unwrap_or("draw"),
            moves = self.session.moves,
            "game finished"
        );
        self.events.push(GameEvent::GameEnded { result });
        self.events.push(GameEvent::TallyUpdated {
            tally: self.tally,
        });
    }

    fn agent_failed(&mut self, request_id: RequestId, err: AgentError) -> ReplyError {
        warn!(request_id, error = %err, "agent move failed");
        self.events.push(GameEvent::AgentFailed {
            request_id,
            reason: err.to_string(),
        });
        ReplyError::Agent(err)
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_DEPTH)
    }
}

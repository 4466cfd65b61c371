//! Async game driver
//!
//! Runs the turn controller against a [`MoveSource`] from an async host: each
//! human move that hands over the turn awaits the agent (bounded by a timeout)
//! and applies its reply before returning.

use std::time::Duration;

use crate::client::{request_with_timeout, MoveSource};
use crate::core::{AgentReply, InvalidMoveError, ReplyError, TurnController, TurnOutcome};
use crate::types::{AgentRequest, GameEvent, GameInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    InvalidMove(#[from] InvalidMoveError),

    #[error(transparent)]
    Reply(#[from] ReplyError),
}

pub struct GameDriver<S> {
    controller: TurnController,
    source: S,
    timeout: Duration,
}

impl<S: MoveSource> GameDriver<S> {
    pub fn new(source: S, depth: u8, timeout: Duration) -> Self {
        Self {
            controller: TurnController::new(depth),
            source,
            timeout,
        }
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut TurnController {
        &mut self.controller
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.controller.take_events()
    }

    /// Play the human's column, then the agent's answer if the game goes on.
    ///
    /// On agent failure the controller stays in `AwaitingAgent`; call
    /// [`Self::retry`] or [`Self::restart`].
    pub async fn click_column(&mut self, col: usize) -> Result<TurnOutcome, DriverError> {
        match self.controller.submit_human_move(col)? {
            TurnOutcome::AwaitingAgent(request) => self.resolve(request).await,
            other => Ok(other),
        }
    }

    /// Ask the agent again for the outstanding turn.
    pub async fn retry(&mut self) -> Result<TurnOutcome, DriverError> {
        let request = self.controller.retry_agent_request()?;
        self.resolve(request).await
    }

    pub fn restart(&mut self) {
        self.controller.restart();
    }

    /// Dispatch a UI event.
    pub async fn handle(&mut self, input: GameInput) -> Result<TurnOutcome, DriverError> {
        match input {
            GameInput::ColumnClicked(col) => self.click_column(col).await,
            GameInput::RestartRequested => {
                self.restart();
                Ok(TurnOutcome::AwaitingHuman)
            }
        }
    }

    async fn resolve(&mut self, request: AgentRequest) -> Result<TurnOutcome, DriverError> {
        let outcome = request_with_timeout(&self.source, request, self.timeout).await;
        let reply = AgentReply {
            request_id: request.request_id,
            outcome,
        };
        Ok(self.controller.apply_agent_reply(reply)?)
    }
}

use crate::types::RequestId;

/// Board-level contract violations.
///
/// `ColumnFull` must never surface after a passing `is_column_full` check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("column {0} is full")]
    ColumnFull(usize),

    #[error("column {0} is outside the board")]
    ColumnOutOfRange(usize),

    #[error("invalid token {token} at ({row},{col})")]
    InvalidToken { row: usize, col: usize, token: u8 },

    #[error("token at ({row},{col}) rests above an empty cell")]
    FloatingPiece { row: usize, col: usize },
}

/// An input the controller refused. The game state is untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidMoveError {
    #[error("not the human's turn (controller is {state})")]
    NotHumansTurn { state: &'static str },

    /// Retry asked for while no agent request is outstanding
    #[error("no agent request to retry (controller is {state})")]
    NoPendingRequest { state: &'static str },

    #[error("column {0} is outside the board")]
    ColumnOutOfRange(usize),

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Failure of the external move-selection call.
///
/// Always recoverable: the controller stays in `AwaitingAgent`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    #[error("agent unavailable: {0}")]
    Unavailable(String),

    #[error("agent did not answer within {ms} ms")]
    TimedOut { ms: u64 },

    #[error("malformed agent response: {0}")]
    Malformed(String),

    #[error("agent chose illegal column {column}")]
    IllegalColumn { column: i32 },
}

impl AgentError {
    /// True for responses that arrived but broke the protocol.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            AgentError::Malformed(_) | AgentError::IllegalColumn { .. }
        )
    }
}

/// Why an agent reply was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplyError {
    /// Superseded by a retry or a restart, or no request outstanding.
    #[error("discarded stale reply for request {request_id}")]
    Stale { request_id: RequestId },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

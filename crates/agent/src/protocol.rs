//! Protocol module - JSON message types for the move-request boundary
//!
//! Implements a line-delimited JSON protocol: one request line, one reply line.
//! All messages have: type, seq (the controller's request id), ts (timestamp in ms)

use serde::{Deserialize, Serialize};

use crate::types::{AgentRequest, Grid, RequestId, NO_MOVE_SENTINEL};

// ============== Controller -> Agent Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRequestType {
    #[serde(rename = "move_request")]
    MoveRequest,
}

impl Default for MoveRequestType {
    fn default() -> Self {
        Self::MoveRequest
    }
}

/// Request for the agent's next column.
///
/// `board` is row-major with row 0 at the top: `0` empty, `1` human, `2` agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequestMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: MoveRequestType,
    pub seq: RequestId,
    pub ts: u64,
    pub board: Grid,
    pub depth: u8,
}

// ============== Agent -> Controller Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveType {
    #[serde(rename = "move")]
    Move,
}

impl Default for MoveType {
    fn default() -> Self {
        Self::Move
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

impl Default for ErrorType {
    fn default() -> Self {
        Self::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "invalid_request")]
    InvalidRequest,
    #[serde(rename = "invalid_board")]
    InvalidBoard,
}

/// The agent's chosen column; `-1` means no legal move (draw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: MoveType,
    pub seq: RequestId,
    pub ts: u64,
    pub column: i32,
    /// Selector's evaluation of the chosen move (informational)
    #[serde(default)]
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: ErrorType,
    pub seq: RequestId,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

/// Parsed agent reply
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Move(MoveMessage),
    Error(ErrorMessage),
}

impl ParsedReply {
    pub fn seq(&self) -> RequestId {
        match self {
            ParsedReply::Move(m) => m.seq,
            ParsedReply::Error(e) => e.seq,
        }
    }
}

/// Parse a reply line from the agent.
pub fn parse_reply(json: &str) -> Result<ParsedReply, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum AgentMessage {
        #[serde(rename = "move")]
        Move(MoveMessage),
        #[serde(rename = "error")]
        Error(ErrorMessage),
    }

    match serde_json::from_str::<AgentMessage>(json)? {
        AgentMessage::Move(m) => Ok(ParsedReply::Move(m)),
        AgentMessage::Error(e) => Ok(ParsedReply::Error(e)),
    }
}

/// Parse a request line sent to the agent.
pub fn parse_request(json: &str) -> Result<MoveRequestMessage, serde_json::Error> {
    serde_json::from_str(json)
}

/// Best-effort `seq` of a line that failed to parse, so errors can still be correlated.
pub fn extract_seq_best_effort(s: &str) -> Option<u64> {
    #[derive(Debug, Deserialize)]
    struct SeqOnly {
        seq: Option<u64>,
    }
    serde_json::from_str::<SeqOnly>(s).ok()?.seq
}

// ============== Utility Functions ==============

/// Create the wire request for a controller request
pub fn create_move_request(request: &AgentRequest) -> MoveRequestMessage {
    MoveRequestMessage {
        msg_type: MoveRequestType::MoveRequest,
        seq: request.request_id,
        ts: current_timestamp_ms(),
        board: request.board,
        depth: request.depth,
    }
}

/// Create a move reply; `None` becomes the no-move sentinel.
///
/// Columns past `i32::MAX` saturate so they stay out of range on the wire
/// instead of wrapping onto a playable column.
pub fn create_move(seq: RequestId, column: Option<usize>, score: f64) -> MoveMessage {
    let column = column.map(|c| i32::try_from(c).unwrap_or(i32::MAX));
    MoveMessage {
        msg_type: MoveType::Move,
        seq,
        ts: current_timestamp_ms(),
        column: column.unwrap_or(NO_MOVE_SENTINEL),
        score: if column.is_some() { score } else { 0.0 },
    }
}

/// Create an error message
pub fn create_error(seq: RequestId, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

//! Move-request client
//!
//! [`MoveSource`] is the seam between the turn controller and whatever picks
//! the agent's column. [`TcpMoveClient`] speaks the line protocol of
//! [`crate::protocol`] to a remote service, one connection per request.

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};

use crate::config::AgentConfig;
use crate::core::AgentError;
use crate::protocol::{create_move_request, parse_reply, ParsedReply};
use crate::types::{AgentRequest, RequestId};

/// Something that answers agent move requests with a column (or `-1`).
pub trait MoveSource: Send + Sync + 'static {
    fn request_move(
        &self,
        request: AgentRequest,
    ) -> impl Future<Output = Result<i32, AgentError>> + Send;
}

/// Synchronous closures answer immediately; handy for scripted agents.
impl<F> MoveSource for F
where
    F: Fn(&AgentRequest) -> Result<i32, AgentError> + Send + Sync + 'static,
{
    fn request_move(
        &self,
        request: AgentRequest,
    ) -> impl Future<Output = Result<i32, AgentError>> + Send {
        std::future::ready(self(&request))
    }
}

/// Run `source` for `request`, treating expiry of `timeout` as a failure.
pub async fn request_with_timeout<S: MoveSource>(
    source: &S,
    request: AgentRequest,
    timeout: Duration,
) -> Result<i32, AgentError> {
    let request_id = request.request_id;
    let pending = source.request_move(request);
    match tokio::time::timeout(timeout, pending).await {
        Ok(outcome) => outcome,
        Err(_) => {
            warn!(request_id, ?timeout, "agent request timed out");
            Err(AgentError::TimedOut {
                ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// TCP client for a remote move service.
#[derive(Debug, Clone)]
pub struct TcpMoveClient {
    config: AgentConfig,
}

impl TcpMoveClient {
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(AgentConfig::from_env())
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn exchange(&self, request: AgentRequest) -> Result<i32, AgentError> {
        let addr = self.config.address();
        let stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| AgentError::Unavailable(format!("connect {addr}: {e}")))?;
        let (reader, mut writer) = stream.into_split();

        let msg = create_move_request(&request);
        let mut buf = serde_json::to_vec(&msg).map_err(|e| AgentError::Malformed(e.to_string()))?;
        buf.push(b'\n');
        writer.write_all(&buf).await.map_err(io_unavailable)?;
        writer.flush().await.map_err(io_unavailable)?;
        debug!(request_id = request.request_id, %addr, depth = request.depth, "move request sent");

        let mut lines = BufReader::new(reader).lines();
        let line = lines
            .next_line()
            .await
            .map_err(io_unavailable)?
            .ok_or_else(|| AgentError::Unavailable("connection closed before reply".to_string()))?;

        decode_reply(request.request_id, line.trim())
    }
}

impl Default for TcpMoveClient {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl MoveSource for TcpMoveClient {
    fn request_move(
        &self,
        request: AgentRequest,
    ) -> impl Future<Output = Result<i32, AgentError>> + Send {
        let timeout = self.config.timeout();
        async move {
            match tokio::time::timeout(timeout, self.exchange(request)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(AgentError::TimedOut {
                    ms: timeout.as_millis() as u64,
                }),
            }
        }
    }
}

fn io_unavailable(e: std::io::Error) -> AgentError {
    AgentError::Unavailable(e.to_string())
}

/// Decode one reply line for request `seq` into a column.
///
/// Column legality is left to the controller; only the wire shape is checked.
pub fn decode_reply(seq: RequestId, line: &str) -> Result<i32, AgentError> {
    let reply = parse_reply(line).map_err(|e| AgentError::Malformed(e.to_string()))?;
    if reply.seq() != seq {
        return Err(AgentError::Malformed(format!(
            "reply seq {} does not match request {}",
            reply.seq(),
            seq
        )));
    }
    match reply {
        ParsedReply::Move(m) => Ok(m.column),
        ParsedReply::Error(e) => Err(AgentError::Malformed(format!(
            "agent rejected request: {}",
            e.message
        ))),
    }
}

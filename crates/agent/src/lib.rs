//! Agent module - the move-request boundary to the external move selector
//!
//! The turn controller never talks to the network itself. After a human move
//! that does not end the game it issues an [`AgentRequest`](crate::types::AgentRequest);
//! this crate carries that request to a move-selection service and hands the
//! reply back as an [`AgentReply`](crate::core::AgentReply).
//!
//! # Protocol Overview
//!
//! A **line-delimited JSON protocol** over TCP, one request per connection:
//!
//! 1. **Connection**: Client connects to the service (default: 127.0.0.1:8000)
//! 2. **Request**: Client sends `move_request` with the board and search depth
//! 3. **Reply**: Service answers with `move` (a column, `-1` for no legal move)
//!    or `error`
//!
//! # Message Types
//!
//! - **move_request**: `seq` (request id), `board` (6 rows of 7 ints, row 0 on top), `depth`
//! - **move**: `seq`, `column`, `score`
//! - **error**: `seq`, `code` (`invalid_request` | `invalid_board`), `message`
//!
//! # Environment Variables
//!
//! - `CONNECT4_AGENT_HOST`: Service address (default: "127.0.0.1")
//! - `CONNECT4_AGENT_PORT`: Service port (default: 8000)
//! - `CONNECT4_AGENT_TIMEOUT_MS`: Bound on one request (default: 5000)
//! - `CONNECT4_AGENT_DEPTH`: Search depth for new games (default: 4)
//! - `CONNECT4_SERVER_HOST` / `CONNECT4_SERVER_PORT`: Reference server listener
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"move_request","seq":1,"ts":1234567890,"board":[[0,0,0,0,0,0,0],...,[0,0,0,1,0,0,0]],"depth":4}
//! Server -> Client: {"type":"move","seq":1,"ts":1234567891,"column":3,"score":4.0}
//! ```
//!
//! # Hosts
//!
//! - [`GameDriver`] for async hosts: awaits the agent inline
//! - [`AgentBridge`] for synchronous loops: owns a runtime, replies are polled
//! - [`run_server`] hosts any [`MoveSelector`] behind the protocol

pub mod client;
pub mod config;
pub mod driver;
pub mod protocol;
pub mod runtime;
pub mod server;

pub use connect_four_core as core;
pub use connect_four_types as types;

pub use client::{decode_reply, request_with_timeout, MoveSource, TcpMoveClient};
pub use config::{AgentConfig, ServerConfig};
pub use driver::{DriverError, GameDriver};
pub use protocol::*;
pub use runtime::AgentBridge;
pub use server::{run_server, MoveSelector};

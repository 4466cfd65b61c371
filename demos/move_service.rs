//! Move service host.
//!
//! Serves the line protocol on `CONNECT4_SERVER_HOST:CONNECT4_SERVER_PORT`
//! with a selector that always plays the leftmost legal column.

use std::sync::Arc;

use anyhow::Result;

use connect_four::agent::{run_server, ServerConfig};
use connect_four::core::Board;

fn leftmost_legal(board: &Board, _depth: u8) -> Option<(usize, f64)> {
    board.legal_columns().first().map(|&c| (c, 0.0))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    run_server(ServerConfig::from_env(), Arc::new(leftmost_legal), None).await
}

//! TCP server for the move-request boundary
//!
//! Hosts any [`MoveSelector`] behind the line protocol of [`crate::protocol`].
//! The selection algorithm itself is supplied by the caller.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::core::{rules, Board};
use crate::protocol::{
    create_error, create_move, extract_seq_best_effort, parse_request, ErrorCode,
    MoveRequestMessage,
};

/// Picks the agent's column for a position.
pub trait MoveSelector: Send + Sync + 'static {
    /// Column to play for the agent on `board` and the selector's score for it;
    /// `None` when there is no legal move.
    fn select(&self, board: &Board, depth: u8) -> Option<(usize, f64)>;
}

impl<F> MoveSelector for F
where
    F: Fn(&Board, u8) -> Option<(usize, f64)> + Send + Sync + 'static,
{
    fn select(&self, board: &Board, depth: u8) -> Option<(usize, f64)> {
        self(board, depth)
    }
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with port 0).
pub async fn run_server<S: MoveSelector>(
    config: ServerConfig,
    selector: Arc<S>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!(%bound, "move service listening");
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let mut client_id_counter = 0usize;

    // Accept incoming connections
    loop {
        let (socket, peer) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;
        debug!(client_id, %peer, "client connected");

        let selector = Arc::clone(&selector);
        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, client_id, selector).await {
                warn!(client_id, error = %e, "client error");
            }
            debug!(client_id, "client disconnected");
        });
    }
}

/// Serve requests on one connection until the peer closes it.
async fn handle_client<S: MoveSelector>(
    socket: TcpStream,
    client_id: usize,
    selector: Arc<S>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();
    let mut buf: Vec<u8> = Vec::with_capacity(256);

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        buf.clear();
        match parse_request(trimmed) {
            Ok(request) => {
                let reply = answer(request, Arc::clone(&selector), client_id).await?;
                buf.extend_from_slice(reply.as_bytes());
            }
            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                warn!(client_id, seq, error = %e, "undecodable move request");
                let err = create_error(seq, ErrorCode::InvalidRequest, &e.to_string());
                serde_json::to_writer(&mut buf, &err)?;
            }
        }

        buf.push(b'\n');
        writer.write_all(&buf).await?;
        writer.flush().await?;
    }

    Ok(())
}

/// Build the reply line for one decoded request.
async fn answer<S: MoveSelector>(
    request: MoveRequestMessage,
    selector: Arc<S>,
    client_id: usize,
) -> anyhow::Result<String> {
    let seq = request.seq;
    let board = match Board::from_grid(&request.board) {
        Ok(board) => board,
        Err(e) => {
            warn!(client_id, seq, error = %e, "rejecting invalid board");
            let err = create_error(seq, ErrorCode::InvalidBoard, &e.to_string());
            return Ok(serde_json::to_string(&err)?);
        }
    };

    // Nothing to search on a full board.
    let choice = if rules::is_board_full(&board) {
        None
    } else {
        let depth = request.depth.max(1);
        tokio::task::spawn_blocking(move || selector.select(&board, depth)).await?
    };

    let (column, score) = match choice {
        Some((col, score)) => (Some(col), score),
        None => (None, 0.0),
    };
    debug!(client_id, seq, ?column, "move selected");
    Ok(serde_json::to_string(&create_move(seq, column, score))?)
}

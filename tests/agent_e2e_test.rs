//! End-to-end: controller -> TCP client -> move service -> reply

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

use connect_four::agent::{
    run_server, AgentConfig, DriverError, GameDriver, MoveSource, ServerConfig, TcpMoveClient,
};
use connect_four::core::{AgentError, Board, InvalidMoveError, ReplyError, TurnOutcome, TurnState};
use connect_four::types::{AgentRequest, GameInput, GameResult, Player, COLS, ROWS};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Always answers the rightmost legal column.
fn rightmost(board: &Board, _depth: u8) -> Option<(usize, f64)> {
    board.legal_columns().last().map(|&c| (c, 0.5))
}

async fn start_service() -> anyhow::Result<AgentConfig> {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let (ready_tx, ready_rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = run_server(config, Arc::new(rightmost), Some(ready_tx)).await;
    });
    let addr = tokio::time::timeout(Duration::from_secs(2), ready_rx).await??;

    Ok(AgentConfig {
        host: addr.ip().to_string(),
        port: addr.port(),
        timeout_ms: 2000,
        ..AgentConfig::default()
    })
}

#[tokio::test]
async fn driver_plays_against_tcp_service() -> anyhow::Result<()> {
    init_tracing();
    let config = start_service().await?;
    let timeout = config.timeout();
    let mut driver = GameDriver::new(TcpMoveClient::new(config), 4, timeout);

    // Human stacks column 0; the service keeps answering column 6.
    for _ in 0..3 {
        let outcome = driver.click_column(0).await?;
        assert_eq!(outcome, TurnOutcome::AwaitingHuman);
    }
    assert_eq!(
        driver.controller().board().get(ROWS - 1, COLS - 1),
        Some(Some(Player::Agent))
    );

    let outcome = driver.click_column(0).await?;
    let TurnOutcome::Finished(result) = outcome else {
        panic!("expected human win, got {outcome:?}");
    };
    assert_eq!(result.winner(), Some(Player::Human));
    assert_eq!(driver.controller().tally().human_wins, 1);

    driver.handle(GameInput::RestartRequested).await?;
    assert_eq!(driver.controller().state(), TurnState::AwaitingHuman);
    assert_eq!(driver.controller().tally().human_wins, 1);
    Ok(())
}

#[tokio::test]
async fn service_answers_raw_protocol() -> anyhow::Result<()> {
    init_tracing();
    let config = start_service().await?;

    let stream = TcpStream::connect(config.address()).await?;
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let board = [[0u8; COLS]; ROWS];
    let request = serde_json::json!({
        "type": "move_request",
        "seq": 11,
        "ts": 0,
        "board": board,
        "depth": 2,
    });
    writer
        .write_all(format!("{request}\n").as_bytes())
        .await?;

    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await??
        .expect("reply line");
    let reply: serde_json::Value = serde_json::from_str(&line)?;
    assert_eq!(reply["type"], "move");
    assert_eq!(reply["seq"], 11);
    assert_eq!(reply["column"], 6);

    // Garbage on the same connection gets an error line, not a disconnect.
    writer.write_all(b"{\"type\":\"move_request\",\"seq\":12}\n").await?;
    let line = tokio::time::timeout(Duration::from_secs(2), lines.next_line())
        .await??
        .expect("error line");
    let reply: serde_json::Value = serde_json::from_str(&line)?;
    assert_eq!(reply["type"], "error");
    assert_eq!(reply["code"], "invalid_request");
    assert_eq!(reply["seq"], 12);
    Ok(())
}

#[tokio::test]
async fn unreachable_service_leaves_turn_open() -> anyhow::Result<()> {
    init_tracing();
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    drop(listener);

    let config = AgentConfig {
        port,
        timeout_ms: 500,
        ..AgentConfig::default()
    };
    let timeout = config.timeout();
    let mut driver = GameDriver::new(TcpMoveClient::new(config), 4, timeout);

    let err = driver.click_column(3).await.unwrap_err();
    assert!(matches!(err, DriverError::Reply(ReplyError::Agent(_))));
    assert!(matches!(
        driver.controller().state(),
        TurnState::AwaitingAgent { .. }
    ));
    assert_eq!(driver.controller().board().piece_count(), 1);

    // Giving up on the turn starts over with the tally untouched.
    driver.restart();
    assert_eq!(driver.controller().board().piece_count(), 0);
    assert_eq!(driver.controller().tally().games(), 0);
    Ok(())
}

/// Fails the first call, then plays column 1.
struct Flaky {
    calls: AtomicUsize,
}

impl MoveSource for Flaky {
    async fn request_move(&self, _request: AgentRequest) -> Result<i32, AgentError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Err(AgentError::Unavailable("warming up".to_string()))
        } else {
            Ok(1)
        }
    }
}

#[tokio::test]
async fn retry_after_failure() {
    let source = Flaky {
        calls: AtomicUsize::new(0),
    };
    let mut driver = GameDriver::new(source, 4, Duration::from_secs(1));

    assert!(driver.click_column(3).await.is_err());
    let outcome = driver.retry().await.unwrap();
    assert_eq!(outcome, TurnOutcome::AwaitingHuman);
    assert_eq!(
        driver.controller().board().get(ROWS - 1, 1),
        Some(Some(Player::Agent))
    );

    let events = driver.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, connect_four::types::GameEvent::AgentFailed { .. })));
}

#[tokio::test]
async fn stalled_agent_times_out() {
    struct Stalled;
    impl MoveSource for Stalled {
        async fn request_move(&self, _request: AgentRequest) -> Result<i32, AgentError> {
            std::future::pending().await
        }
    }

    let mut driver = GameDriver::new(Stalled, 4, Duration::from_millis(30));
    let err = driver.click_column(0).await.unwrap_err();
    assert_eq!(
        err,
        DriverError::Reply(ReplyError::Agent(AgentError::TimedOut { ms: 30 }))
    );
}

#[test]
fn scripted_agent_draw_sentinel() {
    let source = |_: &AgentRequest| Ok::<i32, AgentError>(-1);
    let mut driver = GameDriver::new(source, 4, Duration::from_secs(1));

    let outcome = tokio_test::block_on(driver.click_column(2)).unwrap();
    assert_eq!(outcome, TurnOutcome::Finished(GameResult::Draw));
    assert_eq!(driver.controller().tally().draws, 1);
}

#[test]
fn retry_without_pending_request_is_rejected() {
    let source = |_: &AgentRequest| Ok::<i32, AgentError>(0);
    let mut driver = GameDriver::new(source, 4, Duration::from_secs(1));

    let err = tokio_test::block_on(driver.retry()).unwrap_err();
    assert_eq!(
        err,
        DriverError::InvalidMove(InvalidMoveError::NoPendingRequest {
            state: "awaiting human"
        })
    );
    assert_eq!(driver.controller().board().piece_count(), 0);
}

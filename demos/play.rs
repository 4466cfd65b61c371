//! Line-mode game host.
//!
//! Plays against the move service named by `CONNECT4_AGENT_*`. Type a column
//! (0-6) to drop a piece, `r` to retry a failed agent request, `n` for a new
//! game and `q` to quit.

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use connect_four::agent::{AgentConfig, GameDriver, TcpMoveClient};
use connect_four::core::TurnOutcome;
use connect_four::types::GameResult;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AgentConfig::from_env().normalized();
    let (depth, timeout) = (config.depth, config.timeout());
    let mut driver = GameDriver::new(TcpMoveClient::new(config), depth, timeout);

    println!("{}", driver.controller().board());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let outcome = match line.trim() {
            "q" => break,
            "n" => {
                driver.restart();
                Ok(TurnOutcome::AwaitingHuman)
            }
            "r" => driver.retry().await,
            input => match input.parse::<usize>() {
                Ok(col) => driver.click_column(col).await,
                Err(_) => {
                    println!("expected a column, r, n or q");
                    continue;
                }
            },
        };

        println!("{}", driver.controller().board());
        match outcome {
            Ok(TurnOutcome::Finished(GameResult::Draw)) => println!("draw (n for a new game)"),
            Ok(TurnOutcome::Finished(result)) => {
                if let Some(winner) = result.winner() {
                    println!("{winner} wins (n for a new game)");
                }
            }
            Ok(_) => {}
            Err(e) => println!("{e}"),
        }
    }

    let tally = driver.controller().tally();
    println!(
        "human {} / agent {} / draws {}",
        tally.human_wins, tally.agent_wins, tally.draws
    );
    Ok(())
}

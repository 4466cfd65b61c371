//! Agent runtime integration.
//!
//! Bridges a synchronous game loop with async move requests: requests run on an
//! owned tokio runtime and their replies come back through a channel that the
//! loop polls between frames.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::{request_with_timeout, MoveSource, TcpMoveClient};
use crate::config::AgentConfig;
use crate::core::AgentReply;
use crate::types::AgentRequest;

/// Running bridge instance.
pub struct AgentBridge<S> {
    rt: Runtime,
    source: Arc<S>,
    timeout: Duration,
    reply_tx: mpsc::UnboundedSender<AgentReply>,
    reply_rx: mpsc::UnboundedReceiver<AgentReply>,
}

impl AgentBridge<TcpMoveClient> {
    /// Start a bridge to the TCP move service configured in the environment.
    pub fn start_from_env() -> anyhow::Result<Self> {
        let config = AgentConfig::from_env();
        let timeout = config.timeout();
        Self::start(TcpMoveClient::new(config), timeout)
    }
}

impl<S: MoveSource> AgentBridge<S> {
    pub fn start(source: S, timeout: Duration) -> anyhow::Result<Self> {
        let rt = Runtime::new().context("failed to create tokio runtime")?;
        let (reply_tx, reply_rx) = mpsc::unbounded_channel::<AgentReply>();
        Ok(Self {
            rt,
            source: Arc::new(source),
            timeout,
            reply_tx,
            reply_rx,
        })
    }

    /// Send `request` without blocking; the reply arrives via [`Self::try_recv`].
    pub fn request(&self, request: AgentRequest) {
        let source = Arc::clone(&self.source);
        let reply_tx = self.reply_tx.clone();
        let timeout = self.timeout;
        debug!(request_id = request.request_id, "dispatching agent request");
        self.rt.spawn(async move {
            let outcome = request_with_timeout(source.as_ref(), request, timeout).await;
            let _ = reply_tx.send(AgentReply {
                request_id: request.request_id,
                outcome,
            });
        });
    }

    pub fn try_recv(&mut self) -> Option<AgentReply> {
        self.reply_rx.try_recv().ok()
    }

    /// Block the calling thread until a reply arrives or `wait` elapses.
    ///
    /// Must not be called from inside an async context.
    pub fn recv_timeout(&mut self, wait: Duration) -> Option<AgentReply> {
        let rx = &mut self.reply_rx;
        self.rt
            .block_on(async { tokio::time::timeout(wait, rx.recv()).await.ok().flatten() })
    }
}

//! Environment-driven configuration for the agent client and the reference server.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

use crate::types::DEFAULT_DEPTH;

/// Where and how to reach the move-selection service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub host: String,
    pub port: u16,
    /// Bound on one request/response exchange, connect included
    pub timeout_ms: u64,
    /// Search depth handed to new controllers
    pub depth: u8,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            timeout_ms: 5000,
            depth: DEFAULT_DEPTH,
        }
    }
}

impl AgentConfig {
    /// Create from environment variables
    ///
    /// - `CONNECT4_AGENT_HOST` (default `127.0.0.1`)
    /// - `CONNECT4_AGENT_PORT` (default `8000`)
    /// - `CONNECT4_AGENT_TIMEOUT_MS` (default `5000`)
    /// - `CONNECT4_AGENT_DEPTH` (default `4`)
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("CONNECT4_AGENT_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("CONNECT4_AGENT_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let timeout_ms = env::var("CONNECT4_AGENT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(defaults.timeout_ms);
        let depth = env::var("CONNECT4_AGENT_DEPTH")
            .ok()
            .and_then(|s| s.trim().parse::<u8>().ok())
            .unwrap_or(defaults.depth);

        Self {
            host,
            port,
            timeout_ms,
            depth,
        }
        .normalized()
    }

    /// Raise zero timeout and depth to their minimum of 1.
    pub fn normalized(mut self) -> Self {
        self.timeout_ms = self.timeout_ms.max(1);
        self.depth = self.depth.max(1);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Reference move-service listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Create from `CONNECT4_SERVER_HOST` / `CONNECT4_SERVER_PORT`
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let host = env::var("CONNECT4_SERVER_HOST")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = env::var("CONNECT4_SERVER_PORT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);

        Self { host, port }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_from_env() {
        // This test just ensures it doesn't panic
        let config = AgentConfig::from_env();
        assert!(config.timeout_ms >= 1);
        assert!(config.depth >= 1);
    }

    #[test]
    fn test_normalized_raises_zeroes() {
        let config = AgentConfig {
            timeout_ms: 0,
            depth: 0,
            ..AgentConfig::default()
        }
        .normalized();
        assert_eq!(config.timeout_ms, 1);
        assert_eq!(config.depth, 1);
    }

    #[test]
    fn test_defaults() {
        let config = AgentConfig::default();
        assert_eq!(config.address(), "127.0.0.1:8000");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.depth, 4);
    }

    #[test]
    fn test_server_socket_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        assert_eq!(config.socket_addr().unwrap().port(), 0);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }
}

//! Server configuration.

use clap::Parser;
use std::net::SocketAddr;

/// Default outbound queue length per session.
pub const DEFAULT_PEER_QUEUE: usize = 256;

/// Relay server configuration, from command-line flags or environment.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "collabboard-server",
    about = "WebSocket relay for CollabBoard rooms",
    version
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "COLLABBOARD_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Messages buffered per session before forwards to it are dropped
    #[arg(
        long,
        env = "COLLABBOARD_PEER_QUEUE",
        default_value_t = DEFAULT_PEER_QUEUE,
        value_parser = parse_queue_len
    )]
    pub peer_queue: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 5000)),
            peer_queue: DEFAULT_PEER_QUEUE,
        }
    }
}

fn parse_queue_len(s: &str) -> Result<usize, String> {
    let len: usize = s.parse().map_err(|e| format!("{e}"))?;
    if len == 0 {
        return Err("queue length must be at least 1".to_string());
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_parser() {
        let parsed = Config::try_parse_from(["collabboard-server"]).unwrap();
        let default = Config::default();
        assert_eq!(parsed.bind, default.bind);
        assert_eq!(parsed.peer_queue, default.peer_queue);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "collabboard-server",
            "--bind",
            "127.0.0.1:9000",
            "--peer-queue",
            "16",
        ])
        .unwrap();
        assert_eq!(config.bind, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.peer_queue, 16);
    }

    #[test]
    fn test_zero_queue_rejected() {
        assert!(Config::try_parse_from(["collabboard-server", "--peer-queue", "0"]).is_err());
    }
}

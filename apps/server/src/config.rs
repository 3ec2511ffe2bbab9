use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub const DEFAULT_TICKER: &str = "MOWI.OL";

pub struct Config {
    pub listen_addr: SocketAddr,
    /// Security every endpoint reports on.
    pub ticker: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            ticker: DEFAULT_TICKER.to_string(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("MOWI_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid MOWI_LISTEN_ADDR")?;
        let ticker = std::env::var("MOWI_TICKER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_TICKER.to_string());
        let cors_allow = std::env::var("MOWI_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("MOWI_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        Ok(Self {
            listen_addr,
            ticker,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

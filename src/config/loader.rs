// config with fallback urls and pacing parameters; credentials are
// typed into the shell per session and never read from the environment
use crate::types::{Config, PacingLimits};
use anyhow::Result;
use std::env;

pub const MAINNET_REST_URL: &str = "https://fapi.binance.com";
pub const TESTNET_REST_URL: &str = "https://testnet.binancefuture.com";

impl Default for PacingLimits {
    fn default() -> Self {
        Self {
            max_in_flight: 5,
            collation_pacing_ms: 1,
            set_pacing_ms: 200,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let limits = PacingLimits::default();

        Ok(Config {
            rest_url: env::var("BINANCE_FUTURES_URL")
                .unwrap_or_else(|_| MAINNET_REST_URL.to_string()),
            recv_window_ms: env_u64("BINANCE_RECV_WINDOW_MS", 5_000),
            http_timeout_secs: env_u64("HTTP_TIMEOUT_SECS", 30),
            limits: PacingLimits {
                max_in_flight: env_u64("LEVERAGE_FETCH_CONCURRENCY", limits.max_in_flight as u64)
                    .max(1) as usize,
                collation_pacing_ms: env_u64(
                    "LEVERAGE_FETCH_PACING_MS",
                    limits.collation_pacing_ms,
                ),
                set_pacing_ms: env_u64("LEVERAGE_SET_PACING_MS", limits.set_pacing_ms),
            },
        })
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

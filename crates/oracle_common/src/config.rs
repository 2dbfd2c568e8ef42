//! Daemon configuration.
//!
//! All environment access happens here, once, at startup. A missing API key
//! is a value the normalizer handles, never a startup failure.

use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8650";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Oracle daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Provider credential. Absent means every reading uses the fixed
    /// configuration-missing fallback.
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    /// Outbound request timeout. One attempt per request, no retry.
    pub timeout_secs: u64,
    pub listen_addr: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl OracleConfig {
    /// Build the config from the process environment.
    pub fn from_env() -> Self {
        Self {
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            endpoint: env_or("ORACLE_ENDPOINT", DEFAULT_ENDPOINT),
            model: env_or("ORACLE_MODEL", DEFAULT_MODEL),
            timeout_secs: env::var("ORACLE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            listen_addr: env_or("ORACLE_LISTEN_ADDR", DEFAULT_LISTEN_ADDR),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

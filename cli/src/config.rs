//! Client configuration with TOML file support.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use solsend_rpc::{RpcClientConfig, SendOptions};
use solsend_types::{Cluster, Commitment};
use solsend_utils::LogFormat;
use solsend_wallet_core::TransferSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(String),

    #[error("failed to serialize config: {0}")]
    Serialize(String),
}

/// Configuration for the `solsend` client.
///
/// Loaded from a TOML file via [`ClientConfig::from_toml_file`]; every field
/// has a default so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Which cluster to talk to.
    #[serde(default)]
    pub cluster: Cluster,

    /// JSON-RPC endpoint; overrides the cluster's public endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpc_url: Option<String>,

    /// Keypair file of the wallet account.
    #[serde(default = "default_keypair_path")]
    pub keypair_path: PathBuf,

    #[serde(default = "default_commitment")]
    pub commitment: Commitment,

    /// Rebroadcast attempts the node makes on our behalf.
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_keypair_path() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config/solana/id.json"),
        None => PathBuf::from("id.json"),
    }
}

fn default_commitment() -> Commitment {
    Commitment::Confirmed
}

fn default_max_retries() -> usize {
    5
}

fn default_history_limit() -> usize {
    solsend_wallet_core::dashboard::DEFAULT_HISTORY_LIMIT
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// The endpoint to send JSON-RPC requests to.
    pub fn endpoint(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.cluster.rpc_url())
    }

    pub fn rpc_client_config(&self) -> RpcClientConfig {
        RpcClientConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            ..RpcClientConfig::default()
        }
    }

    pub fn transfer_settings(&self) -> TransferSettings {
        TransferSettings {
            commitment: self.commitment,
            send_options: SendOptions {
                preflight_commitment: self.commitment,
                max_retries: Some(self.max_retries),
                ..SendOptions::default()
            },
            history_limit: self.history_limit,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            keypair_path: default_keypair_path(),
            commitment: default_commitment(),
            max_retries: default_max_retries(),
            history_limit: default_history_limit(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

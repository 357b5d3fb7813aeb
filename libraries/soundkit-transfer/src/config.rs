//! HTTP client settings.

use serde::{Deserialize, Serialize};

/// Timeouts and identification for download requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Whole-request timeout in seconds (0 disables it)
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// User-Agent header
    pub user_agent: String,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            // Whole tracks at 320kbps take a while on mobile links
            timeout_secs: 300,
            connect_timeout_secs: 10,
            user_agent: format!("SoundKit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

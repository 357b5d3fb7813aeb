//! Quality tiers for playback and downloads

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named bitrate bucket used to pick among a track's URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// 96 kbps
    Low,

    /// 160 kbps
    #[default]
    Medium,

    /// 320 kbps
    High,
}

impl QualityTier {
    /// All tiers, highest first
    pub const ALL: [QualityTier; 3] = [QualityTier::High, QualityTier::Medium, QualityTier::Low];

    /// Nominal bitrate of the tier
    pub fn bitrate_kbps(self) -> u32 {
        match self {
            QualityTier::Low => 96,
            QualityTier::Medium => 160,
            QualityTier::High => 320,
        }
    }

    /// Catalog label for the tier ("160kbps")
    pub fn label(self) -> String {
        format!("{}kbps", self.bitrate_kbps())
    }

    /// Lowercase tier name
    pub fn as_str(self) -> &'static str {
        match self {
            QualityTier::Low => "low",
            QualityTier::Medium => "medium",
            QualityTier::High => "high",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(QualityTier::Low),
            "medium" => Ok(QualityTier::Medium),
            "high" => Ok(QualityTier::High),
            other => Err(format!("unknown quality tier: {other}")),
        }
    }
}

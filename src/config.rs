// Slash configuration - Three independently settable percentages
//
// Values are read at slash time, never cached: changing a percentage does
// not retroactively affect already-recorded slashes. Idempotency is
// orthogonal to the percentage.

use serde::{Deserialize, Serialize};

/// Maximum slash percentage (inclusive). This is a percent scheme, not
/// basis points: 100 is accepted, 101 is not.
pub const MAX_SLASH_PERCENT: u64 = 100;

/// Slash percentages for the three punishment paths
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SlashConfig {
    blacklist_percent: u64,
    malicious_percent: u64,
    secret_reveal_percent: u64,
}

impl SlashConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Percentage deducted when an identity is blacklisted
    pub fn blacklist_percent(&self) -> u64 {
        self.blacklist_percent
    }

    /// Percentage deducted for proven equivocation
    pub fn malicious_percent(&self) -> u64 {
        self.malicious_percent
    }

    /// Percentage deducted for revealing a secret share
    pub fn secret_reveal_percent(&self) -> u64 {
        self.secret_reveal_percent
    }

    pub fn set_blacklist_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.blacklist_percent = Self::checked(percent)?;
        Ok(())
    }

    pub fn set_malicious_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.malicious_percent = Self::checked(percent)?;
        Ok(())
    }

    pub fn set_secret_reveal_percent(&mut self, percent: u64) -> Result<(), ConfigError> {
        self.secret_reveal_percent = Self::checked(percent)?;
        Ok(())
    }

    fn checked(percent: u64) -> Result<u64, ConfigError> {
        if percent > MAX_SLASH_PERCENT {
            return Err(ConfigError::InvalidPercentage { percent });
        }
        Ok(percent)
    }
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid percentage: {percent}")]
    InvalidPercentage { percent: u64 },
}

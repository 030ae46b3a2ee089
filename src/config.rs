//! Deployment settings
//!
//! JSON-loadable settings for building a vault and a ledger. Missing
//! fields fall back to the defaults: a 3-of-10 vault and a ledger with a
//! daily quota of 2000.

use crate::core::derive_address;
use crate::multisig::{ThresholdVault, VaultConfig, VaultError};
use crate::token::{IssuanceLedger, LedgerError, TokenMetadata, DEFAULT_DAILY_QUOTA};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default number of vault owners (m)
pub const DEFAULT_OWNER_COUNT: usize = 10;

/// Default confirmations required (n)
pub const DEFAULT_REQUIRED: usize = 3;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Vault deployment settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct VaultSettings {
    /// Explicit owner addresses; derived from `owner_count` when empty
    pub owners: Vec<String>,
    /// Number of owners to derive when `owners` is empty
    pub owner_count: usize,
    /// Confirmations required
    pub required: usize,
    pub label: Option<String>,
}

impl Default for VaultSettings {
    fn default() -> Self {
        Self {
            owners: Vec::new(),
            owner_count: DEFAULT_OWNER_COUNT,
            required: DEFAULT_REQUIRED,
            label: None,
        }
    }
}

impl VaultSettings {
    /// Owner addresses, explicit or derived
    pub fn owner_addresses(&self) -> Vec<String> {
        if !self.owners.is_empty() {
            return self.owners.clone();
        }
        (0..self.owner_count)
            .map(|i| derive_address(&format!("owner-{}", i)))
            .collect()
    }

    /// Build a vault from these settings
    pub fn build(&self, now: DateTime<Utc>) -> Result<ThresholdVault, ConfigError> {
        let config = VaultConfig::new(self.required, self.owner_addresses(), self.label.clone())?;
        Ok(ThresholdVault::new(config, now))
    }
}

/// Ledger deployment settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerSettings {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: u128,
    /// Initial TMAX
    pub daily_quota: u128,
    /// Seed admins; two derived admins when empty
    pub admins: Vec<String>,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            name: "Custom Token".to_string(),
            symbol: "CTK".to_string(),
            decimals: 18,
            max_supply: 1_000_000,
            daily_quota: DEFAULT_DAILY_QUOTA,
            admins: Vec::new(),
        }
    }
}

impl LedgerSettings {
    /// Admin addresses, explicit or derived
    pub fn admin_addresses(&self) -> Vec<String> {
        if !self.admins.is_empty() {
            return self.admins.clone();
        }
        (0..2)
            .map(|i| derive_address(&format!("admin-{}", i)))
            .collect()
    }

    /// Build a ledger from these settings
    pub fn build(&self, now: DateTime<Utc>) -> Result<IssuanceLedger, ConfigError> {
        let metadata = TokenMetadata::new(
            self.name.clone(),
            self.symbol.clone(),
            self.decimals,
            self.max_supply,
        )?;
        Ok(IssuanceLedger::new(
            metadata,
            self.admin_addresses(),
            self.daily_quota,
            now,
        )?)
    }
}

/// Top-level settings file
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub vault: VaultSettings,
    pub ledger: LedgerSettings,
}

impl Settings {
    /// Load settings from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render as pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.vault.owner_addresses().len(), 10);
        assert_eq!(settings.vault.required, 3);
        assert_eq!(settings.ledger.daily_quota, 2_000);
        assert_eq!(settings.ledger.admin_addresses().len(), 2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "vault": { "required": 2, "owner_count": 4 } }"#).unwrap();

        assert_eq!(settings.vault.required, 2);
        assert_eq!(settings.vault.owner_addresses().len(), 4);
        assert_eq!(settings.ledger, LedgerSettings::default());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "ledger": {{ "symbol": "QRM", "admins": ["a", "b", "c"], "daily_quota": 50 }} }}"#
        )
        .unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        let ledger = settings.ledger.build(Utc::now()).unwrap();

        assert_eq!(ledger.symbol(), "QRM");
        assert_eq!(ledger.tmax(), 50);
        assert_eq!(ledger.get_minting_admins().len(), 3);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            Settings::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Settings::from_file(Path::new("/nonexistent/settings.json")),
            Err(ConfigError::Io(_))
        ));

        let vault = VaultSettings {
            required: 11,
            ..Default::default()
        };
        assert!(matches!(
            vault.build(Utc::now()),
            Err(ConfigError::Vault(VaultError::InvalidThreshold(_)))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }
}

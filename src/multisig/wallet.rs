//! Vault configuration
//!
//! Owner roster and required-confirmation threshold, both fixed at creation.

use crate::approval::{ApprovalRule, PrincipalRegistry, RegistryError};
use crate::core::{is_null, BankError};
use crate::crypto::{base58check, hash160};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// P2SH version byte, produces addresses starting with '3'
const VAULT_ADDRESS_VERSION: u8 = 0x05;

/// Errors related to vault operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Vault needs at least one owner")]
    NoOwners,
    #[error("Duplicate owner: {0}")]
    DuplicateOwner(String),
    #[error("Null address cannot be an owner")]
    NullOwner,
    #[error("Caller is not an owner: {0}")]
    NotOwner(String),
    #[error("Transaction not found: {0}")]
    UnknownTransaction(u64),
    #[error("Transaction {id} already confirmed by {owner}")]
    AlreadyConfirmed { id: u64, owner: String },
    #[error("Transaction already executed: {0}")]
    AlreadyExecuted(u64),
    #[error("Transaction {id} not confirmed: have {have}, need {need}")]
    NotConfirmed { id: u64, have: usize, need: usize },
    #[error("Bank error: {0}")]
    Bank(#[from] BankError),
}

/// Configuration for a threshold vault
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultConfig {
    /// Confirmations required to execute (n in n-of-m)
    required: usize,
    /// Owners in registration order
    owners: PrincipalRegistry,
    /// Optional human-readable label
    pub label: Option<String>,
}

impl VaultConfig {
    /// Create a new vault configuration
    ///
    /// # Arguments
    /// * `required` - Confirmations required (n)
    /// * `owners` - Owner identities (m)
    /// * `label` - Optional label
    ///
    /// # Errors
    /// Returns error if the threshold is out of `1..=m` or the owner list is invalid
    pub fn new(
        required: usize,
        owners: Vec<String>,
        label: Option<String>,
    ) -> Result<Self, VaultError> {
        if owners.is_empty() {
            return Err(VaultError::NoOwners);
        }

        if required == 0 {
            return Err(VaultError::InvalidThreshold(
                "threshold must be at least 1".to_string(),
            ));
        }

        if required > owners.len() {
            return Err(VaultError::InvalidThreshold(format!(
                "threshold {} exceeds owner count {}",
                required,
                owners.len()
            )));
        }

        if owners.iter().any(|o| is_null(o)) {
            return Err(VaultError::NullOwner);
        }

        let owners = PrincipalRegistry::new(owners).map_err(|e| match e {
            RegistryError::Duplicate(owner) | RegistryError::NotRegistered(owner) => {
                VaultError::DuplicateOwner(owner)
            }
        })?;

        Ok(Self {
            required,
            owners,
            label,
        })
    }

    /// Confirmations required (n)
    pub fn required(&self) -> usize {
        self.required
    }

    /// Total owner count (m)
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// The owner roster
    pub fn owners(&self) -> &PrincipalRegistry {
        &self.owners
    }

    pub fn is_owner(&self, address: &str) -> bool {
        self.owners.contains(address)
    }

    /// Approval rule derived from the threshold
    pub fn rule(&self) -> ApprovalRule {
        ApprovalRule::AtLeast(self.required)
    }

    /// Get description like "3-of-10"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.required, self.owners.len())
    }

    /// Derive the vault address from the threshold and sorted owners
    ///
    /// Address = Base58Check(0x05 || RIPEMD160(SHA256(required || sorted_owners)))
    pub fn derive_address(&self) -> String {
        let mut sorted_owners = self.owners.members().to_vec();
        sorted_owners.sort();

        let mut script_data = (self.required as u64).to_be_bytes().to_vec();
        for owner in &sorted_owners {
            script_data.extend_from_slice(owner.as_bytes());
        }

        base58check(VAULT_ADDRESS_VERSION, &hash160(&script_data))
    }
}

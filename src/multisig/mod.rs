//! Threshold transaction vault
//!
//! An n-of-m vault: m owners fixed at creation, any of them may submit a
//! transfer, and the value is released once n distinct owners confirmed.
//!
//! # Example
//!
//! ```rust
//! use quorum_ledger::core::{derive_address, Clock, ManualClock, NativeBank};
//! use quorum_ledger::multisig::{ThresholdVault, VaultConfig};
//!
//! let owners: Vec<String> = (0..3).map(|i| derive_address(&format!("owner-{}", i))).collect();
//! let clock = ManualClock::default();
//! let mut bank = NativeBank::new();
//! bank.credit(&owners[0], 1_000).unwrap();
//!
//! let config = VaultConfig::new(2, owners.clone(), None).unwrap();
//! let mut vault = ThresholdVault::new(config, clock.now());
//! vault.deposit(&clock.call(&owners[0]).with_value(1_000), &mut bank).unwrap();
//!
//! // Submit (and implicitly confirm), then co-sign
//! let (id, _) = vault
//!     .submit_transaction(&clock.call(&owners[0]), &mut bank, "recipient", 100, None)
//!     .unwrap();
//! vault.confirm_transaction(&clock.call(&owners[1]), &mut bank, id).unwrap();
//!
//! assert_eq!(bank.balance_of("recipient"), 100);
//! ```

pub mod transaction;
pub mod vault;
pub mod wallet;

pub use transaction::{TxStatus, VaultTransaction};
pub use vault::{ThresholdVault, VaultEvent};
pub use wallet::{VaultConfig, VaultError};

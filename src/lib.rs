//! Quorum Ledger: threshold-approved state transitions in Rust
//!
//! This crate provides two engines built on one approval primitive:
//! - A threshold vault releasing native value once n of m owners confirm
//! - An issuance ledger whose admins mint under a daily quota and a
//!   supply cap, and govern their own roster and quota by vote
//!
//! Every operation takes a [`core::CallContext`] (caller, attached value,
//! time), either commits completely or returns an error with no effect,
//! and returns a [`core::Receipt`] of the events it emitted.
//!
//! # Example
//!
//! ```rust
//! use quorum_ledger::config::Settings;
//! use quorum_ledger::core::{Clock, ManualClock, NativeBank};
//!
//! let clock = ManualClock::default();
//! let settings = Settings::default();
//! let mut bank = NativeBank::new();
//!
//! // 3-of-10 vault
//! let mut vault = settings.vault.build(clock.now()).unwrap();
//! let owners = vault.owners().to_vec();
//! bank.credit(&owners[0], 1_000).unwrap();
//! vault.deposit(&clock.call(&owners[0]).with_value(1_000), &mut bank).unwrap();
//!
//! let (id, _) = vault
//!     .submit_transaction(&clock.call(&owners[0]), &mut bank, "recipient", 250, None)
//!     .unwrap();
//! vault.confirm_transaction(&clock.call(&owners[1]), &mut bank, id).unwrap();
//! vault.confirm_transaction(&clock.call(&owners[2]), &mut bank, id).unwrap();
//! assert_eq!(bank.balance_of("recipient"), 250);
//!
//! // Ledger with a daily quota of 2000
//! let mut ledger = settings.ledger.build(clock.now()).unwrap();
//! let admin = ledger.get_minting_admins()[0].clone();
//! ledger.mint(&clock.call(&admin), "holder", 2_000).unwrap();
//! assert!(ledger.mint(&clock.call(&admin), "holder", 1).is_err());
//! ```

pub mod approval;
pub mod cli;
pub mod config;
pub mod core;
pub mod crypto;
pub mod multisig;
pub mod token;

// Re-export commonly used types
pub use approval::{ApprovalRule, ApprovalSet, PrincipalRegistry};
pub use config::{ConfigError, LedgerSettings, Settings, VaultSettings};
pub use core::{CallContext, Clock, ManualClock, NativeBank, Receipt, SystemClock, NULL_ADDRESS};
pub use multisig::{ThresholdVault, TxStatus, VaultConfig, VaultError, VaultEvent};
pub use token::{IssuanceLedger, LedgerError, LedgerEvent, RosterAction, TokenMetadata};

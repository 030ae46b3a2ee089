//! Quota-governed issuance ledger
//!
//! An ERC-20 style token with:
//! - Minting restricted to a roster of admins
//! - A per-admin daily mint quota (TMAX), reset 24h after a window opens
//! - An immutable supply cap
//! - Roster changes approved by two distinct admins
//! - Quota changes approved by a strict majority of admins
//! - Transfers to the null address rejected
//!
//! # Example
//!
//! ```rust
//! use quorum_ledger::core::{Clock, ManualClock};
//! use quorum_ledger::token::{IssuanceLedger, TokenMetadata};
//!
//! let clock = ManualClock::default();
//! let metadata = TokenMetadata::new("Custom Token".into(), "CTK".into(), 18, 1_000_000).unwrap();
//! let mut ledger =
//!     IssuanceLedger::new(metadata, vec!["alice".into(), "bob".into()], 2_000, clock.now())
//!         .unwrap();
//!
//! ledger.mint(&clock.call("alice"), "holder", 1_500).unwrap();
//! assert!(ledger.mint(&clock.call("alice"), "holder", 501).is_err());
//!
//! // Both admins back a higher quota
//! ledger.propose_tmax(&clock.call("alice"), 5_000).unwrap();
//! ledger.propose_tmax(&clock.call("bob"), 5_000).unwrap();
//! assert_eq!(ledger.tmax(), 5_000);
//! ```

pub mod governance;
pub mod quota;
pub mod token;

pub use governance::{AdminGovernance, PendingAction, RosterAction, MIN_ADMINS};
pub use quota::{MintWindow, DEFAULT_DAILY_QUOTA, QUOTA_WINDOW_HOURS};
pub use token::{IssuanceLedger, LedgerError, LedgerEvent, TokenMetadata};

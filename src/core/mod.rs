//! Core building blocks shared by the vault and the ledger
//!
//! - Identities and the null address
//! - The calling convention (caller, attached value, time)
//! - The native value bank
//! - Per-call event receipts

pub mod address;
pub mod bank;
pub mod context;
pub mod receipt;

pub use address::{derive_address, is_null, NULL_ADDRESS};
pub use bank::{BankError, NativeBank};
pub use context::{CallContext, Clock, ManualClock, SystemClock};
pub use receipt::{append_to_log, Logged, Receipt};

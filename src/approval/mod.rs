//! Threshold approval primitive
//!
//! A registry of trusted principals combined with a rule deciding when
//! enough of them have approved. The vault uses `AtLeast(n)` over a fixed
//! owner roster; the ledger uses `DistinctPair` for roster changes and
//! `StrictMajority` for quota changes over its dynamic admin roster.

pub mod registry;
pub mod rule;

pub use registry::{PrincipalRegistry, RegistryError};
pub use rule::{ApprovalRule, ApprovalSet};

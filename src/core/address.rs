//! Identity handling
//!
//! Principals (owners, admins, holders) are opaque address strings.
//! Derived addresses are `0x` followed by 40 hex digits.

use crate::crypto::sha256_hex;

/// The null identity. Tokens sent here would be destroyed, so the
/// ledger refuses it as a destination.
pub const NULL_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Derive a deterministic address from an arbitrary seed
pub fn derive_address(seed: &str) -> String {
    format!("0x{}", &sha256_hex(seed.as_bytes())[..40])
}

/// Check whether an address is the null identity
pub fn is_null(address: &str) -> bool {
    address == NULL_ADDRESS
}

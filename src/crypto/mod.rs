//! Cryptographic utilities
//!
//! This module provides:
//! - SHA-256 / RIPEMD-160 hashing
//! - Base58Check encoding for vault addresses

pub mod hash;

pub use hash::{base58check, double_sha256, hash160, sha256, sha256_hex};

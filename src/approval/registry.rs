//! Registry of trusted principals
//!
//! An ordered, duplicate-free roster with membership and index lookup.
//! The vault freezes one at creation; the ledger mutates its admin roster
//! through governance.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors building or editing a registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Duplicate principal: {0}")]
    Duplicate(String),
    #[error("Principal not registered: {0}")]
    NotRegistered(String),
}

/// Ordered set of principals
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalRegistry {
    members: Vec<String>,
}

impl PrincipalRegistry {
    /// Build a registry, rejecting duplicates
    pub fn new(members: Vec<String>) -> Result<Self, RegistryError> {
        let mut sorted = members.clone();
        sorted.sort();
        for i in 1..sorted.len() {
            if sorted[i] == sorted[i - 1] {
                return Err(RegistryError::Duplicate(sorted[i].clone()));
            }
        }

        Ok(Self { members })
    }

    pub fn contains(&self, principal: &str) -> bool {
        self.members.iter().any(|m| m == principal)
    }

    /// Position of a principal in registration order
    pub fn index_of(&self, principal: &str) -> Option<usize> {
        self.members.iter().position(|m| m == principal)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.members.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Snapshot of the roster in registration order
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Append a principal
    pub fn insert(&mut self, principal: &str) -> Result<(), RegistryError> {
        if self.contains(principal) {
            return Err(RegistryError::Duplicate(principal.to_string()));
        }
        self.members.push(principal.to_string());
        Ok(())
    }

    /// Remove a principal, keeping the order of the rest
    pub fn remove(&mut self, principal: &str) -> Result<(), RegistryError> {
        let index = self
            .index_of(principal)
            .ok_or_else(|| RegistryError::NotRegistered(principal.to_string()))?;
        self.members.remove(index);
        Ok(())
    }
}

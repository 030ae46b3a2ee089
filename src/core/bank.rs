//! Native value bank
//!
//! Holds native-unit balances on behalf of the host environment. The
//! vault keeps its funds here under its own address.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors moving native value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Insufficient funds: have {have}, need {need}")]
    InsufficientFunds { have: u128, need: u128 },
    #[error("Balance overflow for {0}")]
    Overflow(String),
}

/// Native balances by address
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NativeBank {
    balances: HashMap<String, u128>,
}

impl NativeBank {
    /// Create an empty bank
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Get balance of an address
    pub fn balance_of(&self, address: &str) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    /// Create native units out of thin air (genesis funding)
    pub fn credit(&mut self, address: &str, amount: u128) -> Result<(), BankError> {
        let balance = self
            .balance_of(address)
            .checked_add(amount)
            .ok_or_else(|| BankError::Overflow(address.to_string()))?;
        self.balances.insert(address.to_string(), balance);
        Ok(())
    }

    /// Move native units between addresses. Nothing changes on failure.
    pub fn transfer(&mut self, from: &str, to: &str, amount: u128) -> Result<(), BankError> {
        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(BankError::InsufficientFunds {
                have: from_balance,
                need: amount,
            });
        }

        if from == to || amount == 0 {
            return Ok(());
        }

        let to_balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or_else(|| BankError::Overflow(to.to_string()))?;

        self.balances
            .insert(from.to_string(), from_balance - amount);
        self.balances.insert(to.to_string(), to_balance);
        Ok(())
    }

    /// Sum of all balances
    pub fn total(&self) -> u128 {
        self.balances.values().sum()
    }
}

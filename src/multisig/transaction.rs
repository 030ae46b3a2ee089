//! Vault transaction records
//!
//! A record is created by submission, collects owner confirmations and is
//! settled at most once. Records are never deleted.

use crate::approval::{ApprovalRule, ApprovalSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle position of a vault transaction
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum TxStatus {
    /// Collecting confirmations
    Submitted,
    /// Has enough confirmations, waiting for (sufficient) funds
    ExecutionEligible,
    /// Value has been disbursed (terminal)
    Executed,
}

/// A transfer proposed by an owner
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct VaultTransaction {
    /// Sequential ID, starting at 0
    pub id: u64,
    /// Recipient
    pub destination: String,
    /// Native units to send
    pub value: u128,
    /// Opaque payload
    pub data: Vec<u8>,
    /// Whether the value has been disbursed
    pub executed: bool,
    /// Owners who confirmed, in confirmation order
    confirmations: ApprovalSet,
    /// Owner who submitted
    pub submitted_by: String,
    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,
    /// Execution timestamp
    pub executed_at: Option<DateTime<Utc>>,
}

impl VaultTransaction {
    /// Create a new, unconfirmed record
    pub fn new(
        id: u64,
        destination: String,
        value: u128,
        data: Vec<u8>,
        submitted_by: String,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            destination,
            value,
            data,
            executed: false,
            confirmations: ApprovalSet::new(),
            submitted_by,
            submitted_at,
            executed_at: None,
        }
    }

    /// Record a confirmation. Returns false if `owner` already confirmed.
    pub fn confirm(&mut self, owner: &str) -> bool {
        self.confirmations.approve(owner)
    }

    pub fn is_confirmed_by(&self, owner: &str) -> bool {
        self.confirmations.contains(owner)
    }

    /// Number of confirmations collected
    pub fn confirmation_count(&self) -> usize {
        self.confirmations.count()
    }

    /// Owners who confirmed, in order
    pub fn confirmed_by(&self) -> &[String] {
        self.confirmations.approvers()
    }

    /// Whether the confirmations satisfy `rule`
    pub fn meets(&self, rule: &ApprovalRule, owner_count: usize) -> bool {
        rule.is_met(self.confirmation_count(), owner_count)
    }

    /// Current lifecycle status
    pub fn status(&self, rule: &ApprovalRule, owner_count: usize) -> TxStatus {
        if self.executed {
            TxStatus::Executed
        } else if self.meets(rule, owner_count) {
            TxStatus::ExecutionEligible
        } else {
            TxStatus::Submitted
        }
    }

    /// Settle the transaction
    pub fn mark_executed(&mut self, at: DateTime<Utc>) {
        self.executed = true;
        self.executed_at = Some(at);
    }
}

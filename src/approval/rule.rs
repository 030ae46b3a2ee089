//! Approval rules and approval tallies

use serde::{Deserialize, Serialize};

/// When a tally of distinct approvals is enough to act
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalRule {
    /// At least `n` approvals (vault n-of-m)
    AtLeast(usize),
    /// More than half of the current roster
    StrictMajority,
    /// Two distinct approvers
    DistinctPair,
}

impl ApprovalRule {
    /// Whether `count` approvals satisfy the rule for a roster of `roster_size`
    pub fn is_met(&self, count: usize, roster_size: usize) -> bool {
        match self {
            ApprovalRule::AtLeast(n) => count >= *n,
            ApprovalRule::StrictMajority => count * 2 > roster_size,
            ApprovalRule::DistinctPair => count >= 2,
        }
    }

    /// Approvals needed for a roster of `roster_size`
    pub fn required(&self, roster_size: usize) -> usize {
        match self {
            ApprovalRule::AtLeast(n) => *n,
            ApprovalRule::StrictMajority => roster_size / 2 + 1,
            ApprovalRule::DistinctPair => 2,
        }
    }
}

/// Distinct approvers, kept in the order they approved
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalSet {
    approvers: Vec<String>,
}

impl ApprovalSet {
    pub fn new() -> Self {
        Self {
            approvers: Vec::new(),
        }
    }

    /// Record an approval. Returns false if `who` had already approved.
    pub fn approve(&mut self, who: &str) -> bool {
        if self.contains(who) {
            return false;
        }
        self.approvers.push(who.to_string());
        true
    }

    /// Drop an approval. Returns false if `who` had not approved.
    pub fn withdraw(&mut self, who: &str) -> bool {
        let before = self.approvers.len();
        self.approvers.retain(|a| a != who);
        self.approvers.len() != before
    }

    pub fn contains(&self, who: &str) -> bool {
        self.approvers.iter().any(|a| a == who)
    }

    pub fn count(&self) -> usize {
        self.approvers.len()
    }

    pub fn approvers(&self) -> &[String] {
        &self.approvers
    }

    pub fn is_empty(&self) -> bool {
        self.approvers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least() {
        let rule = ApprovalRule::AtLeast(3);
        assert!(!rule.is_met(2, 10));
        assert!(rule.is_met(3, 10));
        assert_eq!(rule.required(10), 3);
    }

    #[test]
    fn test_strict_majority() {
        let rule = ApprovalRule::StrictMajority;
        // 1 of 2 is exactly half
        assert!(!rule.is_met(1, 2));
        assert!(rule.is_met(2, 2));
        assert!(!rule.is_met(2, 4));
        assert!(rule.is_met(2, 3));
        assert_eq!(rule.required(2), 2);
        assert_eq!(rule.required(5), 3);
    }

    #[test]
    fn test_distinct_pair() {
        let rule = ApprovalRule::DistinctPair;
        assert!(!rule.is_met(1, 5));
        assert!(rule.is_met(2, 5));
    }

    #[test]
    fn test_approval_set_order_and_dedup() {
        let mut set = ApprovalSet::new();
        assert!(set.approve("c"));
        assert!(set.approve("a"));
        assert!(!set.approve("c"));

        assert_eq!(set.approvers(), &["c", "a"]);
        assert_eq!(set.count(), 2);

        assert!(set.withdraw("c"));
        assert!(!set.withdraw("c"));
        assert_eq!(set.approvers(), &["a"]);
    }
}

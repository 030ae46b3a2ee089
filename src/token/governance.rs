//! Admin roster and daily quota governance
//!
//! Roster changes need two distinct admins proposing the same candidate
//! for the same action. The daily quota (TMAX) changes once strictly more
//! than half of the current roster proposed the same value.

use crate::approval::{ApprovalRule, ApprovalSet, PrincipalRegistry, RegistryError};
use crate::core::{is_null, Receipt};
use crate::token::token::{LedgerError, LedgerEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest roster that can still approve roster changes
pub const MIN_ADMINS: usize = 2;

/// Kind of roster change
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum RosterAction {
    Add,
    Remove,
}

/// A roster change waiting for its second approver
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PendingAction {
    /// Admin to add or remove
    pub candidate: String,
    approvals: ApprovalSet,
    /// When the first approver proposed it
    pub proposed_at: DateTime<Utc>,
}

impl PendingAction {
    fn new(candidate: &str, proposer: &str, proposed_at: DateTime<Utc>) -> Self {
        let mut approvals = ApprovalSet::new();
        approvals.approve(proposer);
        Self {
            candidate: candidate.to_string(),
            approvals,
            proposed_at,
        }
    }

    /// The admin who opened this slot
    pub fn proposer(&self) -> &str {
        self.approvals
            .approvers()
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn approvers(&self) -> &[String] {
        self.approvals.approvers()
    }
}

/// Admin roster, pending roster changes and quota proposals
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdminGovernance {
    admins: PrincipalRegistry,
    /// Current daily quota (TMAX)
    daily_quota: u128,
    pending_add: Option<PendingAction>,
    pending_remove: Option<PendingAction>,
    /// Proposed quota value -> admins currently backing it
    quota_proposals: BTreeMap<u128, ApprovalSet>,
}

impl AdminGovernance {
    /// Seed the roster and the initial quota
    pub fn new(admins: Vec<String>, daily_quota: u128) -> Result<Self, LedgerError> {
        if admins.len() < MIN_ADMINS {
            return Err(LedgerError::TooFewAdmins {
                have: admins.len(),
                min: MIN_ADMINS,
            });
        }
        if admins.iter().any(|a| is_null(a)) {
            return Err(LedgerError::NullAdmin);
        }
        if daily_quota == 0 {
            return Err(LedgerError::InvalidQuota);
        }

        let admins = PrincipalRegistry::new(admins).map_err(registry_error)?;

        Ok(Self {
            admins,
            daily_quota,
            pending_add: None,
            pending_remove: None,
            quota_proposals: BTreeMap::new(),
        })
    }

    pub fn is_admin(&self, address: &str) -> bool {
        self.admins.contains(address)
    }

    pub fn ensure_admin(&self, caller: &str) -> Result<(), LedgerError> {
        if !self.is_admin(caller) {
            return Err(LedgerError::NotMinter(caller.to_string()));
        }
        Ok(())
    }

    /// Roster snapshot in registration order
    pub fn admins(&self) -> &[String] {
        self.admins.members()
    }

    pub fn daily_quota(&self) -> u128 {
        self.daily_quota
    }

    /// The roster change waiting for a second approver, if any
    pub fn pending(&self, action: RosterAction) -> Option<&PendingAction> {
        match action {
            RosterAction::Add => self.pending_add.as_ref(),
            RosterAction::Remove => self.pending_remove.as_ref(),
        }
    }

    /// Number of admins currently backing `value`
    pub fn quota_votes(&self, value: u128) -> usize {
        self.quota_proposals
            .get(&value)
            .map(ApprovalSet::count)
            .unwrap_or(0)
    }

    /// The value an admin currently backs
    pub fn proposed_quota(&self, admin: &str) -> Option<u128> {
        self.quota_proposals
            .iter()
            .find(|(_, backers)| backers.contains(admin))
            .map(|(value, _)| *value)
    }

    /// Propose (or second) adding or removing `candidate`
    ///
    /// The first call opens the slot for that action, replacing any
    /// different candidate already pending. A second call from a different
    /// admin naming the same candidate enacts the change. A repeat from
    /// the same admin changes nothing.
    pub fn propose_roster_change(
        &mut self,
        action: RosterAction,
        caller: &str,
        candidate: &str,
        now: DateTime<Utc>,
        receipt: &mut Receipt<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.ensure_admin(caller)?;
        if is_null(candidate) {
            return Err(LedgerError::NullAdmin);
        }

        match action {
            RosterAction::Add => {
                if self.is_admin(candidate) {
                    return Err(LedgerError::AlreadyAdmin(candidate.to_string()));
                }
            }
            RosterAction::Remove => {
                if !self.is_admin(candidate) {
                    return Err(LedgerError::UnknownAdmin(candidate.to_string()));
                }
                if self.admins.len() - 1 < MIN_ADMINS {
                    return Err(LedgerError::TooFewAdmins {
                        have: self.admins.len() - 1,
                        min: MIN_ADMINS,
                    });
                }
            }
        }

        let roster_size = self.admins.len();
        let slot = match action {
            RosterAction::Add => &mut self.pending_add,
            RosterAction::Remove => &mut self.pending_remove,
        };

        let same_candidate = matches!(slot, Some(p) if p.candidate == candidate);
        if !same_candidate {
            if let Some(replaced) = slot.replace(PendingAction::new(candidate, caller, now)) {
                log::info!(
                    "Pending {:?} of {} replaced by {} (proposed by {})",
                    action,
                    replaced.candidate,
                    candidate,
                    caller
                );
            }
            receipt.push(LedgerEvent::AdminProposed {
                action,
                candidate: candidate.to_string(),
                proposer: caller.to_string(),
            });
            return Ok(());
        }

        let Some(pending) = slot.as_mut() else {
            return Ok(());
        };
        if !pending.approvals.approve(caller) {
            log::debug!("{} already approved {:?} of {}", caller, action, candidate);
            return Ok(());
        }
        if !ApprovalRule::DistinctPair.is_met(pending.approvals.count(), roster_size) {
            return Ok(());
        }

        let Some(pending) = slot.take() else {
            return Ok(());
        };
        self.enact(action, pending, receipt)
    }

    fn enact(
        &mut self,
        action: RosterAction,
        pending: PendingAction,
        receipt: &mut Receipt<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        let admin = pending.candidate.clone();
        let approvers = pending.approvals.approvers().to_vec();

        match action {
            RosterAction::Add => {
                self.admins.insert(&admin).map_err(registry_error)?;
                log::info!("Admin {} added (approved by {:?})", admin, approvers);
                receipt.push(LedgerEvent::AdminAdded { admin, approvers });
            }
            RosterAction::Remove => {
                self.admins.remove(&admin).map_err(registry_error)?;
                self.forget(&admin);
                log::info!("Admin {} removed (approved by {:?})", admin, approvers);
                receipt.push(LedgerEvent::AdminRemoved { admin, approvers });
                self.retally_quota(receipt);
            }
        }
        Ok(())
    }

    /// Enact the first proposed quota that holds a strict majority of the
    /// shrunken roster
    fn retally_quota(&mut self, receipt: &mut Receipt<LedgerEvent>) {
        let roster_size = self.admins.len();
        let passing = self
            .quota_proposals
            .iter()
            .find(|(_, backers)| {
                ApprovalRule::StrictMajority.is_met(backers.count(), roster_size)
            })
            .map(|(value, backers)| (*value, backers.count()));

        if let Some((value, votes)) = passing {
            self.enact_quota(value, votes, receipt);
        }
    }

    fn enact_quota(&mut self, value: u128, votes: usize, receipt: &mut Receipt<LedgerEvent>) {
        let old = self.daily_quota;
        self.daily_quota = value;
        self.quota_proposals.remove(&value);

        log::info!("Daily quota changed: {} -> {} ({} votes)", old, value, votes);
        receipt.push(LedgerEvent::QuotaChanged { old, new: value });
    }

    /// Drop everything a removed admin had in flight
    fn forget(&mut self, admin: &str) {
        for backers in self.quota_proposals.values_mut() {
            backers.withdraw(admin);
        }
        self.quota_proposals.retain(|_, backers| !backers.is_empty());

        if self
            .pending_add
            .as_ref()
            .is_some_and(|p| p.proposer() == admin)
        {
            self.pending_add = None;
        }
    }

    /// Back `value` as the new daily quota
    ///
    /// An admin backs one value at a time; proposing a new one moves their
    /// vote. The quota changes as soon as a strict majority of the current
    /// roster backs the same value, and that value's proposals are cleared.
    /// Removing an admin re-counts the standing proposals the same way.
    pub fn propose_quota(
        &mut self,
        caller: &str,
        value: u128,
        receipt: &mut Receipt<LedgerEvent>,
    ) -> Result<(), LedgerError> {
        self.ensure_admin(caller)?;
        if value == 0 {
            return Err(LedgerError::InvalidQuota);
        }

        for (proposed, backers) in self.quota_proposals.iter_mut() {
            if *proposed != value {
                backers.withdraw(caller);
            }
        }
        self.quota_proposals.retain(|_, backers| !backers.is_empty());

        let backers = self.quota_proposals.entry(value).or_default();
        backers.approve(caller);
        let votes = backers.count();

        receipt.push(LedgerEvent::QuotaProposed {
            proposer: caller.to_string(),
            value,
            votes,
        });

        if ApprovalRule::StrictMajority.is_met(votes, self.admins.len()) {
            self.enact_quota(value, votes, receipt);
        }

        Ok(())
    }
}

fn registry_error(e: RegistryError) -> LedgerError {
    match e {
        RegistryError::Duplicate(admin) => LedgerError::DuplicateAdmin(admin),
        RegistryError::NotRegistered(admin) => LedgerError::UnknownAdmin(admin),
    }
}

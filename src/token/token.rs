//! Quota-governed issuance ledger
//!
//! An ERC-20 style token whose supply is created only by admins, each
//! capped by a daily quota, under an immutable maximum supply.

use crate::core::{append_to_log, is_null, CallContext, Logged, Receipt};
use crate::token::governance::{AdminGovernance, PendingAction, RosterAction};
use crate::token::quota::MintWindow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Ledger errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Caller is not a minting admin: {0}")]
    NotMinter(String),
    #[error("Daily limit exceeded: minted {minted}, requested {requested}, quota {quota}")]
    DailyLimitExceeded {
        minted: u128,
        requested: u128,
        quota: u128,
    },
    #[error("Supply cap exceeded: supply {supply}, requested {requested}, max {max}")]
    SupplyCapExceeded {
        supply: u128,
        requested: u128,
        max: u128,
    },
    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },
    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: u128, need: u128 },
    #[error("Transfers to the null address are not allowed")]
    BurningDisallowed,
    #[error("Length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },
    #[error("Invalid amount: amount must be greater than 0")]
    InvalidAmount,
    #[error("Amount overflow")]
    Overflow,
    #[error("Invalid symbol: must be 1-10 characters")]
    InvalidSymbol,
    #[error("Invalid name: must be 1-50 characters")]
    InvalidName,
    #[error("Invalid decimals: must be 0-18")]
    InvalidDecimals,
    #[error("Invalid supply: max supply must be greater than 0")]
    InvalidSupply,
    #[error("Invalid quota: daily quota must be greater than 0")]
    InvalidQuota,
    #[error("Too few admins: {have}, need at least {min}")]
    TooFewAdmins { have: usize, min: usize },
    #[error("Already an admin: {0}")]
    AlreadyAdmin(String),
    #[error("Not an admin: {0}")]
    UnknownAdmin(String),
    #[error("Duplicate admin: {0}")]
    DuplicateAdmin(String),
    #[error("Null address cannot be an admin")]
    NullAdmin,
}

/// Audit events emitted by the ledger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LedgerEvent {
    Transfer {
        from: String,
        to: String,
        amount: u128,
    },
    Approval {
        owner: String,
        spender: String,
        amount: u128,
    },
    Mint {
        minter: String,
        to: String,
        amount: u128,
    },
    AdminProposed {
        action: RosterAction,
        candidate: String,
        proposer: String,
    },
    AdminAdded {
        admin: String,
        approvers: Vec<String>,
    },
    AdminRemoved {
        admin: String,
        approvers: Vec<String>,
    },
    QuotaProposed {
        proposer: String,
        value: u128,
        votes: usize,
    },
    QuotaChanged {
        old: u128,
        new: u128,
    },
}

/// Token metadata (immutable after creation)
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Token name (e.g., "Custom Token")
    pub name: String,
    /// Token symbol (e.g., "CTK")
    pub symbol: String,
    /// Decimal places
    pub decimals: u8,
    /// Hard cap on total supply
    pub max_supply: u128,
}

impl TokenMetadata {
    /// Create new token metadata with validation
    pub fn new(
        name: String,
        symbol: String,
        decimals: u8,
        max_supply: u128,
    ) -> Result<Self, LedgerError> {
        if name.is_empty() || name.len() > 50 {
            return Err(LedgerError::InvalidName);
        }

        if symbol.is_empty() || symbol.len() > 10 {
            return Err(LedgerError::InvalidSymbol);
        }

        if decimals > 18 {
            return Err(LedgerError::InvalidDecimals);
        }

        if max_supply == 0 {
            return Err(LedgerError::InvalidSupply);
        }

        Ok(Self {
            name,
            symbol,
            decimals,
            max_supply,
        })
    }
}

/// The issuance ledger
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IssuanceLedger {
    pub metadata: TokenMetadata,
    /// Balances: address -> amount
    balances: HashMap<String, u128>,
    /// Allowances: owner -> (spender -> amount)
    allowances: HashMap<String, HashMap<String, u128>>,
    total_supply: u128,
    governance: AdminGovernance,
    /// Mint windows by admin
    windows: HashMap<String, MintWindow>,
    /// Append-only audit log
    log: Vec<Logged<LedgerEvent>>,
    created_at: DateTime<Utc>,
}

impl IssuanceLedger {
    /// Create an empty ledger governed by `admins`
    pub fn new(
        metadata: TokenMetadata,
        admins: Vec<String>,
        daily_quota: u128,
        created_at: DateTime<Utc>,
    ) -> Result<Self, LedgerError> {
        let governance = AdminGovernance::new(admins, daily_quota)?;

        log::info!(
            "Ledger created: {} ({}), max supply {}, daily quota {}, {} admins",
            metadata.name,
            metadata.symbol,
            metadata.max_supply,
            daily_quota,
            governance.admins().len()
        );

        Ok(Self {
            metadata,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            total_supply: 0,
            governance,
            windows: HashMap::new(),
            log: Vec::new(),
            created_at,
        })
    }

    // =========================================================================
    // View functions
    // =========================================================================

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn max_supply(&self) -> u128 {
        self.metadata.max_supply
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    /// Current daily quota (TMAX)
    pub fn tmax(&self) -> u128 {
        self.governance.daily_quota()
    }

    /// Current admin roster
    pub fn get_minting_admins(&self) -> &[String] {
        self.governance.admins()
    }

    pub fn is_admin(&self, address: &str) -> bool {
        self.governance.is_admin(address)
    }

    /// Get balance of an address
    pub fn balance_of(&self, address: &str) -> u128 {
        *self.balances.get(address).unwrap_or(&0)
    }

    /// Get allowance for a spender
    pub fn allowance(&self, owner: &str, spender: &str) -> u128 {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }

    /// Get all holders with balances
    pub fn holders(&self) -> Vec<(&String, &u128)> {
        self.balances.iter().filter(|(_, &b)| b > 0).collect()
    }

    /// Amount `admin` has minted in their window as of `now`
    pub fn minted_today(&self, admin: &str, now: DateTime<Utc>) -> u128 {
        self.window(admin).current(now).minted
    }

    /// Amount `admin` may still mint in their window as of `now`
    pub fn remaining_quota(&self, admin: &str, now: DateTime<Utc>) -> u128 {
        self.window(admin).remaining(self.tmax(), now)
    }

    pub fn pending_admin_addition(&self) -> Option<&PendingAction> {
        self.governance.pending(RosterAction::Add)
    }

    pub fn pending_admin_removal(&self) -> Option<&PendingAction> {
        self.governance.pending(RosterAction::Remove)
    }

    /// Admins currently backing `value` as the daily quota
    pub fn tmax_votes(&self, value: u128) -> usize {
        self.governance.quota_votes(value)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Full audit log
    pub fn events(&self) -> &[Logged<LedgerEvent>] {
        &self.log
    }

    fn window(&self, admin: &str) -> MintWindow {
        self.windows.get(admin).cloned().unwrap_or_default()
    }

    // =========================================================================
    // Issuance
    // =========================================================================

    /// Mint `amount` to `recipient`, charged to the caller's daily quota
    pub fn mint(
        &mut self,
        ctx: &CallContext,
        recipient: &str,
        amount: u128,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.mint_batch(ctx, &[recipient.to_string()], &[amount])
    }

    /// Mint to several recipients as one all-or-nothing operation
    ///
    /// The quota and the supply cap are checked against the batch total.
    pub fn mint_batch(
        &mut self,
        ctx: &CallContext,
        recipients: &[String],
        amounts: &[u128],
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.governance.ensure_admin(&ctx.caller)?;

        if recipients.len() != amounts.len() {
            return Err(LedgerError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        if recipients.is_empty() {
            return Err(LedgerError::InvalidAmount);
        }

        let mut total: u128 = 0;
        for (recipient, &amount) in recipients.iter().zip(amounts) {
            if amount == 0 {
                return Err(LedgerError::InvalidAmount);
            }
            if is_null(recipient) {
                return Err(LedgerError::BurningDisallowed);
            }
            total = total.checked_add(amount).ok_or(LedgerError::Overflow)?;
        }

        let quota = self.tmax();
        let window = self.window(&ctx.caller);
        let window = window.after_mint(total, quota, ctx.now).ok_or_else(|| {
            LedgerError::DailyLimitExceeded {
                minted: window.current(ctx.now).minted,
                requested: total,
                quota,
            }
        })?;

        let new_supply = self
            .total_supply
            .checked_add(total)
            .filter(|supply| *supply <= self.metadata.max_supply)
            .ok_or(LedgerError::SupplyCapExceeded {
                supply: self.total_supply,
                requested: total,
                max: self.metadata.max_supply,
            })?;

        // All checks passed
        let mut receipt = Receipt::new();
        for (recipient, &amount) in recipients.iter().zip(amounts) {
            *self.balances.entry(recipient.clone()).or_insert(0) += amount;
            receipt.push(LedgerEvent::Mint {
                minter: ctx.caller.clone(),
                to: recipient.clone(),
                amount,
            });
        }
        self.total_supply = new_supply;
        self.windows.insert(ctx.caller.clone(), window);

        log::debug!(
            "{} minted {} to {} recipient(s), supply {}",
            ctx.caller,
            total,
            recipients.len(),
            self.total_supply
        );

        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    // =========================================================================
    // Transfers
    // =========================================================================

    /// Transfer tokens from the caller to `to`
    pub fn transfer(
        &mut self,
        ctx: &CallContext,
        to: &str,
        amount: u128,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.check_transfer(&ctx.caller, to, amount)?;
        let receipt = self.move_balance(&ctx.caller, to, amount);
        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Approve `spender` to transfer up to `amount` of the caller's tokens
    pub fn approve(
        &mut self,
        ctx: &CallContext,
        spender: &str,
        amount: u128,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        // Set allowance (can be 0 to revoke)
        self.allowances
            .entry(ctx.caller.clone())
            .or_default()
            .insert(spender.to_string(), amount);

        let mut receipt = Receipt::new();
        receipt.push(LedgerEvent::Approval {
            owner: ctx.caller.clone(),
            spender: spender.to_string(),
            amount,
        });
        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Transfer on behalf of `from`, spending the caller's allowance
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: &str,
        to: &str,
        amount: u128,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.check_transfer(from, to, amount)?;

        let current_allowance = self.allowance(from, &ctx.caller);
        if current_allowance < amount {
            return Err(LedgerError::InsufficientAllowance {
                have: current_allowance,
                need: amount,
            });
        }

        if let Some(allowance) = self
            .allowances
            .get_mut(from)
            .and_then(|spenders| spenders.get_mut(&ctx.caller))
        {
            *allowance -= amount;
        }

        let receipt = self.move_balance(from, to, amount);
        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Null destination is rejected before anything else, balance after
    fn check_transfer(&self, from: &str, to: &str, amount: u128) -> Result<(), LedgerError> {
        if is_null(to) {
            return Err(LedgerError::BurningDisallowed);
        }

        if amount == 0 {
            return Err(LedgerError::InvalidAmount);
        }

        let from_balance = self.balance_of(from);
        if from_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }

        Ok(())
    }

    fn move_balance(&mut self, from: &str, to: &str, amount: u128) -> Receipt<LedgerEvent> {
        *self.balances.entry(from.to_string()).or_insert(0) -= amount;
        *self.balances.entry(to.to_string()).or_insert(0) += amount;

        let mut receipt = Receipt::new();
        receipt.push(LedgerEvent::Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        });
        receipt
    }

    // =========================================================================
    // Governance
    // =========================================================================

    /// Propose or second adding `candidate` to the admin roster
    pub fn add_mint_admin(
        &mut self,
        ctx: &CallContext,
        candidate: &str,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.roster_change(ctx, RosterAction::Add, candidate)
    }

    /// Propose or second removing `admin` from the roster
    pub fn remove_mint_admin(
        &mut self,
        ctx: &CallContext,
        admin: &str,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        self.roster_change(ctx, RosterAction::Remove, admin)
    }

    fn roster_change(
        &mut self,
        ctx: &CallContext,
        action: RosterAction,
        candidate: &str,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        let mut receipt = Receipt::new();
        self.governance
            .propose_roster_change(action, &ctx.caller, candidate, ctx.now, &mut receipt)?;
        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Back `value` as the new daily quota
    pub fn propose_tmax(
        &mut self,
        ctx: &CallContext,
        value: u128,
    ) -> Result<Receipt<LedgerEvent>, LedgerError> {
        let mut receipt = Receipt::new();
        self.governance
            .propose_quota(&ctx.caller, value, &mut receipt)?;
        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    fn commit(&mut self, receipt: &Receipt<LedgerEvent>, at: DateTime<Utc>) {
        append_to_log(&mut self.log, receipt, at);
    }
}

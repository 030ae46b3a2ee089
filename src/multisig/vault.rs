//! Threshold transaction vault
//!
//! Owners submit transfers, co-sign them, and the vault disburses the
//! value once the confirmation threshold is reached. Each call either
//! commits completely or leaves the vault and the bank untouched.

use crate::core::{append_to_log, CallContext, Logged, NativeBank, Receipt};
use crate::multisig::transaction::{TxStatus, VaultTransaction};
use crate::multisig::wallet::{VaultConfig, VaultError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit events emitted by the vault
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum VaultEvent {
    /// Native value received
    Deposit { sender: String, value: u128 },
    /// A transaction was recorded
    Submission { transaction_id: u64, sender: String },
    /// An owner approved a transaction
    Confirmation { sender: String, transaction_id: u64 },
    /// A transaction's value was disbursed
    Execution { transaction_id: u64, executor: String },
    /// Threshold reached but the vault could not cover the value
    NotEnoughBalance {
        transaction_id: u64,
        balance: u128,
        value: u128,
    },
}

/// An n-of-m vault holding native value in a [`NativeBank`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThresholdVault {
    /// Address the vault's funds are held under
    address: String,
    config: VaultConfig,
    /// Transactions, indexed by ID
    transactions: Vec<VaultTransaction>,
    /// Append-only audit log
    log: Vec<Logged<VaultEvent>>,
    created_at: DateTime<Utc>,
}

impl ThresholdVault {
    /// Create a vault from a validated configuration
    pub fn new(config: VaultConfig, created_at: DateTime<Utc>) -> Self {
        let address = config.derive_address();

        log::info!("Vault created: {} ({})", address, config.description());

        Self {
            address,
            config,
            transactions: Vec::new(),
            log: Vec::new(),
            created_at,
        }
    }

    // =========================================================================
    // Mutating operations
    // =========================================================================

    /// Receive the value attached to `ctx`
    pub fn deposit(
        &mut self,
        ctx: &CallContext,
        bank: &mut NativeBank,
    ) -> Result<Receipt<VaultEvent>, VaultError> {
        let mut receipt = Receipt::new();
        if ctx.value == 0 {
            return Ok(receipt);
        }

        bank.transfer(&ctx.caller, &self.address, ctx.value)?;
        receipt.push(VaultEvent::Deposit {
            sender: ctx.caller.clone(),
            value: ctx.value,
        });

        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Record a new transaction, confirmed by its submitter
    ///
    /// With a threshold of 1 the submission also executes it.
    /// Returns the new transaction ID.
    pub fn submit_transaction(
        &mut self,
        ctx: &CallContext,
        bank: &mut NativeBank,
        destination: &str,
        value: u128,
        data: Option<Vec<u8>>,
    ) -> Result<(u64, Receipt<VaultEvent>), VaultError> {
        self.ensure_owner(&ctx.caller)?;

        let id = self.transactions.len() as u64;
        let mut tx = VaultTransaction::new(
            id,
            destination.to_string(),
            value,
            data.unwrap_or_default(),
            ctx.caller.clone(),
            ctx.now,
        );
        tx.confirm(&ctx.caller);
        self.transactions.push(tx);

        let mut receipt = Receipt::new();
        receipt.push(VaultEvent::Submission {
            transaction_id: id,
            sender: ctx.caller.clone(),
        });
        receipt.push(VaultEvent::Confirmation {
            sender: ctx.caller.clone(),
            transaction_id: id,
        });

        if let Err(e) = self.execute_if_confirmed(id, ctx, bank, &mut receipt) {
            self.transactions.pop();
            return Err(e);
        }

        log::debug!("Transaction {} submitted by {}", id, ctx.caller);

        self.commit(&receipt, ctx.now);
        Ok((id, receipt))
    }

    /// Add the caller's confirmation, executing once the threshold is met
    pub fn confirm_transaction(
        &mut self,
        ctx: &CallContext,
        bank: &mut NativeBank,
        id: u64,
    ) -> Result<Receipt<VaultEvent>, VaultError> {
        self.ensure_owner(&ctx.caller)?;

        let tx = self.transaction_ref(id)?;
        if tx.is_confirmed_by(&ctx.caller) {
            return Err(VaultError::AlreadyConfirmed {
                id,
                owner: ctx.caller.clone(),
            });
        }
        if tx.executed {
            return Err(VaultError::AlreadyExecuted(id));
        }

        let snapshot = tx.clone();
        self.transactions[id as usize].confirm(&ctx.caller);

        let mut receipt = Receipt::new();
        receipt.push(VaultEvent::Confirmation {
            sender: ctx.caller.clone(),
            transaction_id: id,
        });

        if let Err(e) = self.execute_if_confirmed(id, ctx, bank, &mut receipt) {
            self.transactions[id as usize] = snapshot;
            return Err(e);
        }

        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    /// Execute a fully confirmed transaction. Anyone may call this,
    /// typically to retry after the vault has been topped up.
    pub fn execute_transaction(
        &mut self,
        ctx: &CallContext,
        bank: &mut NativeBank,
        id: u64,
    ) -> Result<Receipt<VaultEvent>, VaultError> {
        let tx = self.transaction_ref(id)?;
        if tx.executed {
            return Err(VaultError::AlreadyExecuted(id));
        }

        let rule = self.config.rule();
        let owner_count = self.config.owner_count();
        if !tx.meets(&rule, owner_count) {
            return Err(VaultError::NotConfirmed {
                id,
                have: tx.confirmation_count(),
                need: rule.required(owner_count),
            });
        }

        let mut receipt = Receipt::new();
        self.try_execute(id, ctx, bank, &mut receipt)?;

        self.commit(&receipt, ctx.now);
        Ok(receipt)
    }

    fn execute_if_confirmed(
        &mut self,
        id: u64,
        ctx: &CallContext,
        bank: &mut NativeBank,
        receipt: &mut Receipt<VaultEvent>,
    ) -> Result<(), VaultError> {
        let rule = self.config.rule();
        let tx = &self.transactions[id as usize];
        if tx.executed || !tx.meets(&rule, self.config.owner_count()) {
            return Ok(());
        }
        self.try_execute(id, ctx, bank, receipt)
    }

    /// Disburse the value if the vault can cover it. A shortfall is
    /// reported as an event and leaves the transaction eligible for retry.
    fn try_execute(
        &mut self,
        id: u64,
        ctx: &CallContext,
        bank: &mut NativeBank,
        receipt: &mut Receipt<VaultEvent>,
    ) -> Result<(), VaultError> {
        let tx = &mut self.transactions[id as usize];
        let balance = bank.balance_of(&self.address);

        if balance < tx.value {
            log::warn!(
                "Vault {} cannot cover transaction {}: balance {}, value {}",
                self.address,
                id,
                balance,
                tx.value
            );
            receipt.push(VaultEvent::NotEnoughBalance {
                transaction_id: id,
                balance,
                value: tx.value,
            });
            return Ok(());
        }

        bank.transfer(&self.address, &tx.destination, tx.value)?;
        tx.mark_executed(ctx.now);

        log::info!(
            "Transaction {} executed: {} -> {} ({})",
            id,
            self.address,
            tx.destination,
            tx.value
        );

        receipt.push(VaultEvent::Execution {
            transaction_id: id,
            executor: ctx.caller.clone(),
        });
        Ok(())
    }

    fn commit(&mut self, receipt: &Receipt<VaultEvent>, at: DateTime<Utc>) {
        append_to_log(&mut self.log, receipt, at);
    }

    fn ensure_owner(&self, caller: &str) -> Result<(), VaultError> {
        if !self.config.is_owner(caller) {
            return Err(VaultError::NotOwner(caller.to_string()));
        }
        Ok(())
    }

    fn transaction_ref(&self, id: u64) -> Result<&VaultTransaction, VaultError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.transactions.get(index))
            .ok_or(VaultError::UnknownTransaction(id))
    }

    // =========================================================================
    // Read-only accessors
    // =========================================================================

    /// Owners who confirmed a transaction, in confirmation order
    pub fn get_owners_who_signed_tx(&self, id: u64) -> Result<&[String], VaultError> {
        Ok(self.transaction_ref(id)?.confirmed_by())
    }

    /// Number of confirmations a transaction has
    pub fn get_signature_count(&self, id: u64) -> Result<usize, VaultError> {
        Ok(self.transaction_ref(id)?.confirmation_count())
    }

    /// Whether a transaction has reached the threshold
    pub fn is_confirmed(&self, id: u64) -> Result<bool, VaultError> {
        let tx = self.transaction_ref(id)?;
        Ok(tx.meets(&self.config.rule(), self.config.owner_count()))
    }

    pub fn status(&self, id: u64) -> Result<TxStatus, VaultError> {
        let tx = self.transaction_ref(id)?;
        Ok(tx.status(&self.config.rule(), self.config.owner_count()))
    }

    pub fn transaction(&self, id: u64) -> Option<&VaultTransaction> {
        self.transaction_ref(id).ok()
    }

    /// Number of transactions ever submitted
    pub fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    /// IDs of transactions not yet executed
    pub fn pending_ids(&self) -> Vec<u64> {
        self.transactions
            .iter()
            .filter(|tx| !tx.executed)
            .map(|tx| tx.id)
            .collect()
    }

    pub fn owners(&self) -> &[String] {
        self.config.owners().members()
    }

    /// Owner at a registration index
    pub fn owner(&self, index: usize) -> Option<&str> {
        self.config.owners().get(index)
    }

    pub fn is_owner(&self, address: &str) -> bool {
        self.config.is_owner(address)
    }

    pub fn required(&self) -> usize {
        self.config.required()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Native balance available to the vault
    pub fn balance(&self, bank: &NativeBank) -> u128 {
        bank.balance_of(&self.address)
    }

    /// Full audit log
    pub fn events(&self) -> &[Logged<VaultEvent>] {
        &self.log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{derive_address, Clock, ManualClock};

    struct Fixture {
        vault: ThresholdVault,
        bank: NativeBank,
        clock: ManualClock,
        owners: Vec<String>,
        recipient: String,
    }

    fn fixture(required: usize, owner_count: usize, funding: u128) -> Fixture {
        let owners: Vec<String> = (0..owner_count)
            .map(|i| derive_address(&format!("owner-{}", i)))
            .collect();
        let config = VaultConfig::new(required, owners.clone(), None).unwrap();
        let clock = ManualClock::default();
        let mut vault = ThresholdVault::new(config, clock.now());

        let mut bank = NativeBank::new();
        bank.credit(&owners[0], funding).unwrap();
        if funding > 0 {
            vault
                .deposit(&clock.call(&owners[0]).with_value(funding), &mut bank)
                .unwrap();
        }

        Fixture {
            vault,
            bank,
            clock,
            owners,
            recipient: derive_address("recipient"),
        }
    }

    fn executed(receipt: &Receipt<VaultEvent>) -> bool {
        receipt.contains(|e| matches!(e, VaultEvent::Execution { .. }))
    }

    #[test]
    fn test_deposit() {
        let f = fixture(2, 3, 1_000);

        assert_eq!(f.vault.balance(&f.bank), 1_000);
        assert_eq!(f.bank.balance_of(&f.owners[0]), 0);
        assert!(matches!(
            f.vault.events()[0].event,
            VaultEvent::Deposit { value: 1_000, .. }
        ));
    }

    #[test]
    fn test_deposit_without_funds_fails() {
        let mut f = fixture(2, 3, 0);
        let ctx = f.clock.call(&f.owners[1]).with_value(5);

        let result = f.vault.deposit(&ctx, &mut f.bank);
        assert!(matches!(result, Err(VaultError::Bank(_))));
        assert!(f.vault.events().is_empty());
    }

    #[test]
    fn test_submit_records_confirmation() {
        let mut f = fixture(2, 3, 1_000);
        let ctx = f.clock.call(&f.owners[0]);

        let (id, receipt) = f
            .vault
            .submit_transaction(&ctx, &mut f.bank, &f.recipient, 100, None)
            .unwrap();

        assert_eq!(id, 0);
        assert_eq!(
            receipt.events,
            vec![
                VaultEvent::Submission {
                    transaction_id: 0,
                    sender: f.owners[0].clone()
                },
                VaultEvent::Confirmation {
                    sender: f.owners[0].clone(),
                    transaction_id: 0
                },
            ]
        );
        assert_eq!(f.vault.get_signature_count(0).unwrap(), 1);
        assert_eq!(f.vault.transaction_count(), 1);
        assert_eq!(f.vault.status(0).unwrap(), TxStatus::Submitted);
    }

    #[test]
    fn test_submit_by_non_owner_rejected() {
        let mut f = fixture(2, 3, 1_000);
        let ctx = f.clock.call("stranger");

        let result = f
            .vault
            .submit_transaction(&ctx, &mut f.bank, &f.recipient, 100, None);
        assert_eq!(result, Err(VaultError::NotOwner("stranger".to_string())));
        assert_eq!(f.vault.transaction_count(), 0);
    }

    #[test]
    fn test_threshold_one_executes_on_submit() {
        let mut f = fixture(1, 2, 1_000);
        let ctx = f.clock.call(&f.owners[1]);

        let (_, receipt) = f
            .vault
            .submit_transaction(&ctx, &mut f.bank, &f.recipient, 300, Some(vec![0xde, 0xad]))
            .unwrap();

        assert!(executed(&receipt));
        assert_eq!(f.bank.balance_of(&f.recipient), 300);
        assert_eq!(f.vault.transaction(0).unwrap().data, vec![0xde, 0xad]);
    }

    #[test]
    fn test_confirm_executes_at_threshold() {
        let mut f = fixture(2, 3, 1_000);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 400, None)
            .unwrap();

        let receipt = f
            .vault
            .confirm_transaction(&f.clock.call(&f.owners[2]), &mut f.bank, id)
            .unwrap();

        assert!(executed(&receipt));
        assert_eq!(f.vault.status(id).unwrap(), TxStatus::Executed);
        assert_eq!(f.bank.balance_of(&f.recipient), 400);
        assert_eq!(f.vault.balance(&f.bank), 600);
        assert_eq!(
            f.vault.get_owners_who_signed_tx(id).unwrap(),
            &[f.owners[0].clone(), f.owners[2].clone()]
        );
    }

    #[test]
    fn test_confirm_errors() {
        let mut f = fixture(3, 4, 1_000);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 10, None)
            .unwrap();

        let result = f
            .vault
            .confirm_transaction(&f.clock.call("stranger"), &mut f.bank, id);
        assert!(matches!(result, Err(VaultError::NotOwner(_))));

        let result = f
            .vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, 7);
        assert_eq!(result, Err(VaultError::UnknownTransaction(7)));

        let result = f
            .vault
            .confirm_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, id);
        assert!(matches!(result, Err(VaultError::AlreadyConfirmed { .. })));

        assert_eq!(f.vault.get_signature_count(id).unwrap(), 1);
    }

    #[test]
    fn test_confirm_after_execution_rejected() {
        let mut f = fixture(2, 3, 1_000);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 10, None)
            .unwrap();
        f.vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, id)
            .unwrap();

        let result = f
            .vault
            .confirm_transaction(&f.clock.call(&f.owners[2]), &mut f.bank, id);
        assert_eq!(result, Err(VaultError::AlreadyExecuted(id)));
        assert_eq!(f.vault.get_signature_count(id).unwrap(), 2);
    }

    #[test]
    fn test_execute_below_threshold_rejected() {
        let mut f = fixture(2, 3, 1_000);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 10, None)
            .unwrap();

        let result = f
            .vault
            .execute_transaction(&f.clock.call("anyone"), &mut f.bank, id);
        assert_eq!(
            result,
            Err(VaultError::NotConfirmed {
                id,
                have: 1,
                need: 2
            })
        );
        assert_eq!(f.bank.balance_of(&f.recipient), 0);
    }

    #[test]
    fn test_replay_rejected() {
        let mut f = fixture(2, 3, 1_000);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 250, None)
            .unwrap();
        f.vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, id)
            .unwrap();

        for _ in 0..3 {
            let result = f
                .vault
                .execute_transaction(&f.clock.call(&f.owners[2]), &mut f.bank, id);
            assert_eq!(result, Err(VaultError::AlreadyExecuted(id)));
        }

        assert_eq!(f.bank.balance_of(&f.recipient), 250);
        assert_eq!(f.vault.balance(&f.bank), 750);
    }

    #[test]
    fn test_not_enough_balance_then_retry() {
        let mut f = fixture(2, 3, 100);
        let (id, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 500, None)
            .unwrap();

        let receipt = f
            .vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, id)
            .unwrap();

        assert!(receipt.contains(|e| matches!(
            e,
            VaultEvent::NotEnoughBalance {
                balance: 100,
                value: 500,
                ..
            }
        )));
        assert!(!executed(&receipt));
        assert_eq!(f.vault.status(id).unwrap(), TxStatus::ExecutionEligible);
        assert_eq!(f.vault.get_signature_count(id).unwrap(), 2);

        // Top up and retry from a non-owner
        f.bank.credit("donor", 400).unwrap();
        f.vault
            .deposit(&f.clock.call("donor").with_value(400), &mut f.bank)
            .unwrap();

        let receipt = f
            .vault
            .execute_transaction(&f.clock.call("donor"), &mut f.bank, id)
            .unwrap();
        assert!(executed(&receipt));
        assert_eq!(f.bank.balance_of(&f.recipient), 500);
        assert_eq!(f.vault.balance(&f.bank), 0);
    }

    #[test]
    fn test_shortfall_does_not_retry_other_transactions() {
        let mut f = fixture(2, 3, 100);
        let (big, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 500, None)
            .unwrap();
        f.vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, big)
            .unwrap();

        f.bank.credit("donor", 1_000).unwrap();
        f.vault
            .deposit(&f.clock.call("donor").with_value(1_000), &mut f.bank)
            .unwrap();

        let (small, _) = f
            .vault
            .submit_transaction(&f.clock.call(&f.owners[0]), &mut f.bank, &f.recipient, 10, None)
            .unwrap();
        f.vault
            .confirm_transaction(&f.clock.call(&f.owners[1]), &mut f.bank, small)
            .unwrap();

        assert_eq!(f.vault.status(big).unwrap(), TxStatus::ExecutionEligible);
        assert_eq!(f.vault.pending_ids(), vec![big]);
        assert_eq!(f.bank.balance_of(&f.recipient), 10);
    }

    #[test]
    fn test_accessors() {
        let f = fixture(2, 3, 0);

        assert_eq!(f.vault.owners(), f.owners.as_slice());
        assert_eq!(f.vault.owner(1), Some(f.owners[1].as_str()));
        assert_eq!(f.vault.owner(3), None);
        assert_eq!(f.vault.required(), 2);
        assert!(f.vault.address().starts_with('3'));
        assert_eq!(
            f.vault.get_owners_who_signed_tx(0),
            Err(VaultError::UnknownTransaction(0))
        );
        assert_eq!(f.vault.is_confirmed(0), Err(VaultError::UnknownTransaction(0)));
    }

    #[test]
    fn test_events_are_stamped() {
        let mut f = fixture(2, 3, 1_000);
        f.clock.advance(chrono::Duration::minutes(5));
        let ctx = f.clock.call(&f.owners[0]);

        f.vault
            .submit_transaction(&ctx, &mut f.bank, &f.recipient, 1, None)
            .unwrap();

        let last = f.vault.events().last().unwrap();
        assert_eq!(last.at, ctx.now);
        assert_eq!(f.vault.events().len(), 3);
    }
}

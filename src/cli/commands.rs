//! CLI commands
//!
//! Scripted scenarios that drive the vault and the ledger through their
//! lifecycles and print the resulting event trace.

use crate::config::{LedgerSettings, Settings, VaultSettings};
use crate::core::{
    derive_address, Clock, ManualClock, NativeBank, Receipt, SystemClock, NULL_ADDRESS,
};
use crate::multisig::{VaultError, VaultEvent};
use crate::token::LedgerEvent;
use chrono::{Duration, Utc};
use std::path::Path;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Load settings from `path`, or the defaults
pub fn load_settings(path: Option<&Path>) -> CliResult<Settings> {
    match path {
        Some(path) => {
            println!("📂 Loading settings from {:?}", path);
            Ok(Settings::from_file(path)?)
        }
        None => Ok(Settings::default()),
    }
}

/// Print the effective settings
pub fn cmd_show_config(settings: &Settings) -> CliResult<()> {
    println!("{}", settings.to_json()?);
    Ok(())
}

/// Fund a vault, push a transfer through the threshold, attempt a replay,
/// then submit a transfer the vault cannot cover
pub fn cmd_vault(settings: &VaultSettings, funding: u128, value: u128) -> CliResult<()> {
    let clock = SystemClock;
    let mut bank = NativeBank::new();
    let mut vault = settings.build(clock.now())?;
    let owners = vault.owners().to_vec();
    let recipient = derive_address("recipient");

    println!("🔐 Vault {} ({})", vault.address(), vault.config().description());

    bank.credit(&owners[0], funding)?;
    vault.deposit(&clock.call(&owners[0]).with_value(funding), &mut bank)?;
    println!("   💰 Funded with {}", vault.balance(&bank));

    let (id, receipt) =
        vault.submit_transaction(&clock.call(&owners[0]), &mut bank, &recipient, value, None)?;
    print_vault_events(&receipt.events);

    for owner in owners.iter().skip(1).take(vault.required().saturating_sub(1)) {
        let receipt = vault.confirm_transaction(&clock.call(owner), &mut bank, id)?;
        print_vault_events(&receipt.events);
    }

    println!(
        "   ├─ Signatures: {} of {}",
        vault.get_signature_count(id)?,
        vault.required()
    );
    println!("   ├─ Recipient balance: {}", bank.balance_of(&recipient));
    println!("   └─ Vault balance: {}", vault.balance(&bank));

    let retry = vault.execute_transaction(&clock.call(&recipient), &mut bank, id);
    println!("{}", retry_message(id, retry)?);

    let oversized = vault.balance(&bank) + 1;
    let (id, receipt) = vault.submit_transaction(
        &clock.call(&owners[0]),
        &mut bank,
        &recipient,
        oversized,
        None,
    )?;
    print_vault_events(&receipt.events);
    for owner in owners.iter().skip(1).take(vault.required().saturating_sub(1)) {
        let receipt = vault.confirm_transaction(&clock.call(owner), &mut bank, id)?;
        print_vault_events(&receipt.events);
    }

    println!("\n📋 Signers of transaction {}:", id);
    for owner in vault.get_owners_who_signed_tx(id)? {
        println!("   └─ {}", owner);
    }

    Ok(())
}

/// Mint up to the quota, cross a day boundary, vote in a new admin and a
/// new quota, and show that burning is refused
pub fn cmd_token(settings: &LedgerSettings) -> CliResult<()> {
    let clock = ManualClock::new(Utc::now());
    let mut ledger = settings.build(clock.now())?;
    let admins = ledger.get_minting_admins().to_vec();
    let holder = derive_address("holder");
    let quota = ledger.tmax();

    println!(
        "🪙 {} ({}), max supply {}, daily quota {}",
        ledger.name(),
        ledger.symbol(),
        ledger.max_supply(),
        quota
    );

    let receipt = ledger.mint(&clock.call(&admins[0]), &holder, quota)?;
    print_ledger_events(&receipt.events);

    if let Err(e) = ledger.mint(&clock.call(&admins[0]), &holder, 1) {
        println!("   ⛔ {}", e);
    }

    clock.advance(Duration::hours(24));
    println!("   ⏰ 24 hours later");
    let receipt = ledger.mint(&clock.call(&admins[0]), &holder, 1)?;
    print_ledger_events(&receipt.events);

    let candidate = derive_address("candidate");
    for admin in admins.iter().take(2) {
        let receipt = ledger.add_mint_admin(&clock.call(admin), &candidate)?;
        print_ledger_events(&receipt.events);
    }

    let new_quota = quota * 2;
    for admin in ledger.get_minting_admins().to_vec() {
        if ledger.tmax() == new_quota {
            break;
        }
        let receipt = ledger.propose_tmax(&clock.call(&admin), new_quota)?;
        print_ledger_events(&receipt.events);
    }

    if let Err(e) = ledger.transfer(&clock.call(&holder), NULL_ADDRESS, 1) {
        println!("   ⛔ {}", e);
    }

    println!("\n📊 Summary");
    println!("   ├─ Admins: {}", ledger.get_minting_admins().len());
    println!("   ├─ Daily quota: {}", ledger.tmax());
    println!("   ├─ Holders: {}", ledger.holders().len());
    println!("   ├─ Total supply: {}", ledger.total_supply());
    println!("   └─ Holder balance: {}", ledger.balance_of(&holder));

    Ok(())
}

/// Describe a second `execute_transaction` on the same transaction
fn retry_message(
    id: u64,
    result: Result<Receipt<VaultEvent>, VaultError>,
) -> Result<String, VaultError> {
    match result {
        Err(VaultError::AlreadyExecuted(_)) => {
            Ok(format!("🛡️  Replay of transaction {} rejected", id))
        }
        Err(e) => Err(e),
        Ok(receipt) if receipt.contains(|e| matches!(e, VaultEvent::Execution { .. })) => {
            Ok(format!("⚠️  Replay of transaction {} was accepted", id))
        }
        Ok(_) => Ok(format!(
            "⏳ Transaction {} is still waiting for the vault to be funded",
            id
        )),
    }
}

fn print_vault_events(events: &[VaultEvent]) {
    for event in events {
        match event {
            VaultEvent::Deposit { sender, value } => {
                println!("   📥 Deposit of {} from {}", value, sender)
            }
            VaultEvent::Submission {
                transaction_id,
                sender,
            } => println!("   📝 Submission #{} by {}", transaction_id, sender),
            VaultEvent::Confirmation {
                sender,
                transaction_id,
            } => println!("   ✍️  Confirmation #{} by {}", transaction_id, sender),
            VaultEvent::Execution {
                transaction_id,
                executor,
            } => println!("   ✅ Execution #{} by {}", transaction_id, executor),
            VaultEvent::NotEnoughBalance {
                transaction_id,
                balance,
                value,
            } => println!(
                "   ⚠️  NotEnoughBalance #{}: balance {}, value {}",
                transaction_id, balance, value
            ),
        }
    }
}

fn print_ledger_events(events: &[LedgerEvent]) {
    for event in events {
        match event {
            LedgerEvent::Mint { minter, to, amount } => {
                println!("   🪙 Mint {} to {} by {}", amount, to, minter)
            }
            LedgerEvent::Transfer { from, to, amount } => {
                println!("   ➡️  Transfer {} from {} to {}", amount, from, to)
            }
            LedgerEvent::Approval {
                owner,
                spender,
                amount,
            } => println!("   👍 Approval of {} for {} by {}", amount, spender, owner),
            LedgerEvent::AdminProposed {
                action,
                candidate,
                proposer,
            } => println!("   🗳️  {:?} admin {} proposed by {}", action, candidate, proposer),
            LedgerEvent::AdminAdded { admin, approvers } => {
                println!("   ➕ Admin {} added by {:?}", admin, approvers)
            }
            LedgerEvent::AdminRemoved { admin, approvers } => {
                println!("   ➖ Admin {} removed by {:?}", admin, approvers)
            }
            LedgerEvent::QuotaProposed {
                proposer,
                value,
                votes,
            } => println!("   🗳️  Quota {} proposed by {} ({} votes)", value, proposer, votes),
            LedgerEvent::QuotaChanged { old, new } => {
                println!("   🔧 Quota changed {} -> {}", old, new)
            }
        }
    }
}

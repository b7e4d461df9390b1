//! Operation results
//!
//! Typed success payloads of the ledger operations.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{AccountSummary, Balance, LedgerEntry};

/// Result of a successful account creation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountCreated {
    pub account_id: i64,
    pub name: String,
    pub message: String,
}

/// All accounts of a tenant with derived balances, ordered by name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountList {
    pub accounts: Vec<AccountSummary>,
}

/// Balance of one account, also returned after deposits and withdrawals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceReport {
    pub account_id: i64,
    pub name: String,
    pub balance: Balance,
}

/// Most recent entries of one account, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionHistory {
    pub account_id: i64,
    pub name: String,
    pub transactions: Vec<LedgerEntry>,
    pub count: usize,
}

/// Result of a successful transfer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceipt {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub debit_entry_id: i64,
    pub credit_entry_id: i64,
    pub message: String,
}

/// Result of a successful account removal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountRemoved {
    pub account_id: i64,
    pub name: String,
    pub transactions_removed: u64,
    pub message: String,
}

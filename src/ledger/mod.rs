//! Ledger engine
//!
//! Account lifecycle, balance computation and money movement. Every
//! operation takes the store handle and the caller's tenant explicitly;
//! every statement is scoped to that tenant.

mod accounts;
mod lookup;
mod movements;
mod queries;
mod results;
mod transfer;

pub use accounts::{create_account, list_accounts, remove_account};
pub use movements::{add_money, withdraw_money};
pub use queries::{get_balance, get_transactions, DEFAULT_HISTORY_LIMIT, MAX_HISTORY_LIMIT};
pub use results::{
    AccountCreated, AccountList, AccountRemoved, BalanceReport, TransactionHistory,
    TransferReceipt,
};
pub use transfer::transfer_money;

//! Domain module
//!
//! Core domain types of the ledger: money, accounts, errors.

pub mod account;
pub mod amount;
pub mod context;
pub mod error;

pub use account::{
    normalize_account_name, Account, AccountName, AccountRef, AccountSummary, LedgerEntry,
    TenantId,
};
pub use amount::{Amount, AmountError, Balance};
pub use context::RequestContext;
pub use error::LedgerError;

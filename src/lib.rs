//! piggy_bank Library
//!
//! Multi-tenant piggy bank ledger: accounts with derived balances, an
//! append-only transaction log and a tool endpoint for agents.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod ledger;
pub mod store;
pub mod tenant;
pub mod tools;

mod error;

pub use config::{Config, LogFormat};
pub use domain::{AccountRef, Amount, AmountError, Balance, LedgerError, RequestContext, TenantId};
pub use error::{AppError, AppResult};
pub use store::{Store, UnitOfWork};

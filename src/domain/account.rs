//! Accounts and ledger entries
//!
//! Tenant-scoped identifiers, account name normalization and the read
//! models returned by the ledger engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Balance, LedgerError};

/// Canonical spellings applied after lowercasing
const NAME_ALIASES: &[(&str, &str)] = &[("victor", "viktor")];

/// Identity boundary: every ledger row belongs to exactly one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(i64);

impl TenantId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized account name.
///
/// Names are trimmed, lowercased and passed through the alias table, so
/// `" Victor "` and `"viktor"` are the same account.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountName(String);

impl AccountName {
    /// Normalize a raw name.
    ///
    /// Names that are empty after trimming are rejected, and so are names
    /// that read as an integer, since [`AccountRef::parse`] takes those as ids.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let name = normalize_account_name(raw);
        if name.is_empty() || name.parse::<i64>().is_ok() {
            return Err(LedgerError::InvalidAccountName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalize account names for consistent lookup and creation.
pub fn normalize_account_name(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    NAME_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(name)
}

/// How a caller points at an account.
///
/// The id is authoritative; names are resolved after normalization.
/// On the wire a JSON integer is an id and a JSON string is a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountRef {
    Id(i64),
    Name(String),
}

impl AccountRef {
    pub fn id(id: i64) -> Self {
        Self::Id(id)
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Parse a path segment: integers are ids, anything else is a name.
    pub fn parse(segment: &str) -> Self {
        match segment.trim().parse::<i64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::Name(segment.to_string()),
        }
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountRef::Id(id) => write!(f, "#{}", id),
            AccountRef::Name(name) => f.write_str(&normalize_account_name(name)),
        }
    }
}

/// Account row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub tenant_id: TenantId,
}

/// Account with its derived balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: i64,
    pub name: String,
    pub balance: Balance,
}

/// Immutable ledger entry as shown in account history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: i64,
    /// Signed amount: positive is a credit, negative a debit
    pub amount: rust_decimal::Decimal,
    pub reason: String,
    /// Short human-readable date, e.g. `Mar, 07`
    pub date: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(id: i64, amount_minor: i64, reason: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: Balance::from_minor_units(amount_minor).value(),
            reason,
            date: created_at.format("%b, %d").to_string(),
            created_at,
        }
    }
}

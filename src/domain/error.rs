//! Ledger Error Types
//!
//! Errors returned by ledger engine operations.

use rust_decimal::Decimal;
use thiserror::Error;

use super::TenantId;

/// Errors returned by the ledger engine.
///
/// Every variant except `Store` is a business outcome: the operation was
/// refused and persisted state is unchanged. `Store` means the database
/// itself failed and no invariant can be vouched for.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Either side of a transfer is missing
    #[error("One or both accounts not found: {from} -> {to}")]
    AccountsNotFound { from: String, to: String },

    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    /// Account still holds money (or debt) and cannot be removed
    #[error("Account balance is not zero: {balance}")]
    NonZeroBalance { balance: Decimal },

    /// Unexpected failure inside the transfer unit; nothing was written
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    #[error("Account name must not be empty or numeric")]
    InvalidAccountName,

    #[error("Subscription not found: {0}")]
    TenantNotFound(TenantId),

    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl LedgerError {
    pub fn insufficient_funds(requested: Decimal, available: Decimal) -> Self {
        Self::InsufficientFunds {
            requested,
            available,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "account_not_found",
            Self::AccountsNotFound { .. } => "accounts_not_found",
            Self::DuplicateAccount(_) => "duplicate_account",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::NonZeroBalance { .. } => "non_zero_balance",
            Self::TransferFailed(_) => "transfer_failed",
            Self::SameAccountTransfer => "same_account_transfer",
            Self::InvalidAccountName => "invalid_account_name",
            Self::TenantNotFound(_) => "tenant_not_found",
            Self::Store(_) => "store_error",
        }
    }

    /// Check if this is the caller's fault (bad reference or refused operation)
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::TransferFailed(_))
    }
}

impl PartialEq for LedgerError {
    /// Store errors never compare equal; everything else compares by value.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AccountNotFound(a), Self::AccountNotFound(b)) => a == b,
            (
                Self::AccountsNotFound { from: f1, to: t1 },
                Self::AccountsNotFound { from: f2, to: t2 },
            ) => f1 == f2 && t1 == t2,
            (Self::DuplicateAccount(a), Self::DuplicateAccount(b)) => a == b,
            (
                Self::InsufficientFunds {
                    requested: r1,
                    available: a1,
                },
                Self::InsufficientFunds {
                    requested: r2,
                    available: a2,
                },
            ) => r1 == r2 && a1 == a2,
            (Self::NonZeroBalance { balance: a }, Self::NonZeroBalance { balance: b }) => a == b,
            (Self::TransferFailed(a), Self::TransferFailed(b)) => a == b,
            (Self::SameAccountTransfer, Self::SameAccountTransfer) => true,
            (Self::InvalidAccountName, Self::InvalidAccountName) => true,
            (Self::TenantNotFound(a), Self::TenantNotFound(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_error() {
        let err = LedgerError::insufficient_funds(Decimal::new(10000, 2), Decimal::new(5000, 2));

        assert!(err.is_client_error());
        assert_eq!(err.code(), "insufficient_funds");
        assert!(err.to_string().contains("100.00"));
        assert!(err.to_string().contains("50.00"));
    }

    #[test]
    fn test_non_zero_balance_carries_balance() {
        let err = LedgerError::NonZeroBalance {
            balance: Decimal::new(-150, 2),
        };
        assert_eq!(err.to_string(), "Account balance is not zero: -1.50");
    }

    #[test]
    fn test_store_error_is_hard_failure() {
        let err = LedgerError::from(sqlx::Error::PoolTimedOut);

        assert!(!err.is_client_error());
        assert_ne!(err, LedgerError::from(sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn test_transfer_failed_is_not_client_error() {
        let err = LedgerError::TransferFailed("disk full".to_string());
        assert!(!err.is_client_error());
        assert_eq!(err.code(), "transfer_failed");
    }
}

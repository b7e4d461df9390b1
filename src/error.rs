//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{AmountError, LedgerError};
use crate::tenant::TenantError;
use crate::tools::DispatchError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid bearer token")]
    InvalidToken,

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),

    // Ledger and adapter errors
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Tenant(#[from] TenantError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, Option<String>) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }
            AppError::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "invalid_amount", None),

            // 401 Unauthorized
            AppError::MissingToken => (StatusCode::UNAUTHORIZED, "missing_token", None),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", None),

            AppError::Ledger(err) => ledger_parts(err),

            AppError::Dispatch(DispatchError::UnknownOperation(name)) => (
                StatusCode::BAD_REQUEST,
                "unknown_operation",
                Some(name.clone()),
            ),
            AppError::Dispatch(DispatchError::Store(e)) => {
                tracing::error!("Store error during dispatch: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "store_error", None)
            }
            AppError::Dispatch(DispatchError::Serialization(e)) => {
                tracing::error!("Serialization error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }

            AppError::Tenant(TenantError::InvalidName) => {
                (StatusCode::BAD_REQUEST, "invalid_request", None)
            }
            AppError::Tenant(TenantError::Database(e)) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
        }
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        self.parts().0
    }

    /// Message shown to the client; server errors stay generic
    fn public_message(&self, status: StatusCode) -> String {
        if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }
}

fn ledger_parts(err: &LedgerError) -> (StatusCode, &'static str, Option<String>) {
    if !err.is_client_error() {
        tracing::error!("Ledger failure: {}", err);
    }

    let status = match err {
        LedgerError::AccountNotFound(_)
        | LedgerError::AccountsNotFound { .. }
        | LedgerError::TenantNotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::DuplicateAccount(_) | LedgerError::NonZeroBalance { .. } => {
            StatusCode::CONFLICT
        }
        LedgerError::InsufficientFunds { .. }
        | LedgerError::SameAccountTransfer
        | LedgerError::InvalidAccountName => StatusCode::BAD_REQUEST,
        LedgerError::TransferFailed(_) | LedgerError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.code(), None)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = self.parts();

        let body = ErrorResponse {
            error: self.public_message(status),
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ledger_status_mapping() {
        let cases = [
            (LedgerError::AccountNotFound("bob".into()), StatusCode::NOT_FOUND),
            (LedgerError::DuplicateAccount("bob".into()), StatusCode::CONFLICT),
            (
                LedgerError::NonZeroBalance { balance: dec!(5) },
                StatusCode::CONFLICT,
            ),
            (
                LedgerError::insufficient_funds(dec!(10), dec!(5)),
                StatusCode::BAD_REQUEST,
            ),
            (
                LedgerError::TransferFailed("disk I/O error".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(AppError::from(err).status(), status);
        }
    }

    #[test]
    fn test_auth_and_dispatch_mapping() {
        assert_eq!(AppError::MissingToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::from(DispatchError::UnknownOperation("nope".into())).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_errors_hide_store_text() {
        let err = AppError::from(LedgerError::TransferFailed("disk I/O error".into()));
        let status = err.status();
        assert_eq!(err.public_message(status), "Internal server error");

        let err = AppError::from(LedgerError::from(sqlx::Error::PoolTimedOut));
        let status = err.status();
        assert!(!err.public_message(status).contains("pool"));

        let err = AppError::from(LedgerError::AccountNotFound("bob".into()));
        let status = err.status();
        assert_eq!(err.public_message(status), "Account not found: bob");
    }

    #[test]
    fn test_error_code_follows_ledger_code() {
        let err = AppError::from(LedgerError::SameAccountTransfer);
        let (_, code, _) = err.parts();
        assert_eq!(code, "same_account_transfer");
    }
}

//! Read-side queries
//!
//! Balance and history reads. Both run inside a read transaction so the
//! account lookup and the aggregate see the same snapshot.

use chrono::NaiveDateTime;

use crate::domain::{AccountRef, LedgerEntry, LedgerError, TenantId};
use crate::store::Store;

use super::lookup::{balance_of, resolve_account};
use super::results::{BalanceReport, TransactionHistory};

/// History length when the caller does not ask for one
pub const DEFAULT_HISTORY_LIMIT: u32 = 5;

/// Upper bound on a single history page
pub const MAX_HISTORY_LIMIT: u32 = 100;

const RECENT_ENTRIES: &str = r#"
    SELECT t.id, t.amount, t.reason, t.created_at
    FROM transactions t
    JOIN accounts a ON a.id = t.account_id
    WHERE t.account_id = ? AND a.subscription_id = ?
    ORDER BY t.created_at DESC, t.id DESC
    LIMIT ?
"#;

/// Current balance of one account
#[tracing::instrument(level = "debug", skip(store))]
pub async fn get_balance(
    store: &Store,
    tenant: TenantId,
    account: &AccountRef,
) -> Result<BalanceReport, LedgerError> {
    let mut tx = store.pool().begin().await?;

    let found = resolve_account(&mut *tx, tenant, account)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;
    let balance = balance_of(&mut *tx, tenant, found.id).await?;

    tx.commit().await?;

    Ok(BalanceReport {
        account_id: found.id,
        name: found.name,
        balance,
    })
}

/// Up to `limit` most recent entries of one account, newest first.
///
/// `limit` defaults to [`DEFAULT_HISTORY_LIMIT`] and is clamped to
/// `1..=MAX_HISTORY_LIMIT`.
#[tracing::instrument(level = "debug", skip(store))]
pub async fn get_transactions(
    store: &Store,
    tenant: TenantId,
    account: &AccountRef,
    limit: Option<u32>,
) -> Result<TransactionHistory, LedgerError> {
    let limit = limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT);

    let mut tx = store.pool().begin().await?;

    let found = resolve_account(&mut *tx, tenant, account)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;

    let rows: Vec<(i64, i64, String, NaiveDateTime)> = sqlx::query_as(RECENT_ENTRIES)
        .bind(found.id)
        .bind(tenant.get())
        .bind(i64::from(limit))
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;

    let transactions: Vec<LedgerEntry> = rows
        .into_iter()
        .map(|(id, amount, reason, created_at)| {
            LedgerEntry::new(id, amount, reason, created_at.and_utc())
        })
        .collect();

    Ok(TransactionHistory {
        account_id: found.id,
        name: found.name,
        count: transactions.len(),
        transactions,
    })
}

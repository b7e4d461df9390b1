//! Money movements on a single account
//!
//! Deposits append a credit, withdrawals a debit. The balance check and the
//! insert happen inside one unit of work, so concurrent withdrawals cannot
//! both pass the check against the same balance.

use crate::domain::{AccountRef, Amount, LedgerError, TenantId};
use crate::store::Store;

use super::lookup::{balance_of, insert_entry, resolve_account};
use super::results::BalanceReport;

/// Credit `amount` to an account and return the new balance
#[tracing::instrument(level = "debug", skip(store))]
pub async fn add_money(
    store: &Store,
    tenant: TenantId,
    account: &AccountRef,
    amount: Amount,
    reason: &str,
) -> Result<BalanceReport, LedgerError> {
    let mut uow = store.begin().await?;

    let found = resolve_account(uow.conn(), tenant, account)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;

    insert_entry(uow.conn(), found.id, amount.minor_units(), reason).await?;
    let balance = balance_of(uow.conn(), tenant, found.id).await?;

    uow.commit().await?;

    Ok(BalanceReport {
        account_id: found.id,
        name: found.name,
        balance,
    })
}

/// Debit `amount` from an account if its balance covers it
#[tracing::instrument(level = "debug", skip(store))]
pub async fn withdraw_money(
    store: &Store,
    tenant: TenantId,
    account: &AccountRef,
    amount: Amount,
    reason: &str,
) -> Result<BalanceReport, LedgerError> {
    let mut uow = store.begin().await?;

    let found = resolve_account(uow.conn(), tenant, account)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;

    let available = balance_of(uow.conn(), tenant, found.id).await?;
    if !available.covers(&amount) {
        return Err(LedgerError::insufficient_funds(
            amount.value(),
            available.value(),
        ));
    }

    insert_entry(uow.conn(), found.id, -amount.minor_units(), reason).await?;
    let balance = balance_of(uow.conn(), tenant, found.id).await?;

    uow.commit().await?;

    Ok(BalanceReport {
        account_id: found.id,
        name: found.name,
        balance,
    })
}

//! Transfers between two accounts of the same tenant
//!
//! Both legs are written in one unit of work: either the debit and the
//! matching credit are committed together, or neither is.

use crate::domain::{AccountRef, Amount, LedgerError, TenantId};
use crate::store::{Store, UnitOfWork};

use super::lookup::{balance_of, insert_entry, resolve_account};
use super::results::TransferReceipt;

/// Move `amount` from one account to another
#[tracing::instrument(level = "debug", skip(store))]
pub async fn transfer_money(
    store: &Store,
    tenant: TenantId,
    from: &AccountRef,
    to: &AccountRef,
    amount: Amount,
    reason: &str,
) -> Result<TransferReceipt, LedgerError> {
    let mut uow = store.begin().await?;

    let receipt = apply_transfer(&mut uow, tenant, from, to, amount, reason)
        .await
        .map_err(into_transfer_failure)?;

    uow.commit()
        .await
        .map_err(|e| LedgerError::TransferFailed(e.to_string()))?;

    Ok(receipt)
}

async fn apply_transfer(
    uow: &mut UnitOfWork,
    tenant: TenantId,
    from: &AccountRef,
    to: &AccountRef,
    amount: Amount,
    reason: &str,
) -> Result<TransferReceipt, LedgerError> {
    let source = resolve_account(uow.conn(), tenant, from).await?;
    let target = resolve_account(uow.conn(), tenant, to).await?;

    let (source, target) = match (source, target) {
        (Some(source), Some(target)) => (source, target),
        _ => {
            return Err(LedgerError::AccountsNotFound {
                from: from.to_string(),
                to: to.to_string(),
            })
        }
    };

    if source.id == target.id {
        return Err(LedgerError::SameAccountTransfer);
    }

    let available = balance_of(uow.conn(), tenant, source.id).await?;
    if !available.covers(&amount) {
        return Err(LedgerError::insufficient_funds(
            amount.value(),
            available.value(),
        ));
    }

    let debit_entry_id = insert_entry(
        uow.conn(),
        source.id,
        -amount.minor_units(),
        &format!("Transfer to {}: {}", target.name, reason),
    )
    .await?;

    let credit_entry_id = insert_entry(
        uow.conn(),
        target.id,
        amount.minor_units(),
        &format!("Transfer from {}: {}", source.name, reason),
    )
    .await?;

    Ok(TransferReceipt {
        message: format!(
            "Transferred {} from {} to {}",
            amount, source.name, target.name
        ),
        from: source.name,
        to: target.name,
        amount: amount.value(),
        debit_entry_id,
        credit_entry_id,
    })
}

/// Store failures inside the unit surface as a failed transfer; business
/// refusals pass through unchanged.
fn into_transfer_failure(err: LedgerError) -> LedgerError {
    match err {
        LedgerError::Store(e) => LedgerError::TransferFailed(e.to_string()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_become_transfer_failures() {
        let err = into_transfer_failure(LedgerError::Store(sqlx::Error::PoolTimedOut));
        assert!(matches!(err, LedgerError::TransferFailed(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_refusals_pass_through() {
        let err = into_transfer_failure(LedgerError::SameAccountTransfer);
        assert_eq!(err, LedgerError::SameAccountTransfer);
    }
}

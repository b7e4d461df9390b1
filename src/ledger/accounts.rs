//! Account lifecycle
//!
//! Creating, listing and removing accounts.

use crate::domain::{AccountName, AccountRef, AccountSummary, Balance, LedgerError, TenantId};
use crate::store::Store;

use super::lookup::{balance_of, resolve_account};
use super::results::{AccountCreated, AccountList, AccountRemoved};

/// Create an account with a zero balance
#[tracing::instrument(level = "debug", skip(store))]
pub async fn create_account(
    store: &Store,
    tenant: TenantId,
    name: &str,
) -> Result<AccountCreated, LedgerError> {
    let name = AccountName::parse(name)?;

    let mut uow = store.begin().await?;

    let inserted = sqlx::query("INSERT INTO accounts (name, subscription_id) VALUES (?, ?)")
        .bind(name.as_str())
        .bind(tenant.get())
        .execute(uow.conn())
        .await;

    let account_id = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(LedgerError::DuplicateAccount(name.into_string()));
        }
        Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
            return Err(LedgerError::TenantNotFound(tenant));
        }
        Err(e) => return Err(e.into()),
    };

    uow.commit().await?;

    Ok(AccountCreated {
        account_id,
        message: format!("Account \"{}\" created with balance of 0", name),
        name: name.into_string(),
    })
}

/// List all accounts of the tenant with their derived balances
#[tracing::instrument(level = "debug", skip(store))]
pub async fn list_accounts(store: &Store, tenant: TenantId) -> Result<AccountList, LedgerError> {
    let rows: Vec<(i64, String, i64)> = sqlx::query_as(
        r#"
        SELECT a.id, a.name, COALESCE(SUM(t.amount), 0) AS balance
        FROM accounts a
        LEFT JOIN transactions t ON t.account_id = a.id
        WHERE a.subscription_id = ?
        GROUP BY a.id, a.name
        ORDER BY a.name
        "#,
    )
    .bind(tenant.get())
    .fetch_all(store.pool())
    .await?;

    let accounts = rows
        .into_iter()
        .map(|(id, name, balance)| AccountSummary {
            id,
            name,
            balance: Balance::from_minor_units(balance),
        })
        .collect();

    Ok(AccountList { accounts })
}

/// Remove an account whose balance is exactly zero, with all its entries
#[tracing::instrument(level = "debug", skip(store))]
pub async fn remove_account(
    store: &Store,
    tenant: TenantId,
    account: &AccountRef,
) -> Result<AccountRemoved, LedgerError> {
    let mut uow = store.begin().await?;

    let found = resolve_account(uow.conn(), tenant, account)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(account.to_string()))?;

    let balance = balance_of(uow.conn(), tenant, found.id).await?;
    if !balance.is_zero() {
        uow.rollback().await?;
        return Err(LedgerError::NonZeroBalance {
            balance: balance.value(),
        });
    }

    let transactions_removed = sqlx::query("DELETE FROM transactions WHERE account_id = ?")
        .bind(found.id)
        .execute(uow.conn())
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM accounts WHERE id = ? AND subscription_id = ?")
        .bind(found.id)
        .bind(tenant.get())
        .execute(uow.conn())
        .await?;

    uow.commit().await?;

    Ok(AccountRemoved {
        account_id: found.id,
        message: format!(
            "Account \"{}\" removed with {} transactions",
            found.name, transactions_removed
        ),
        name: found.name,
        transactions_removed,
    })
}

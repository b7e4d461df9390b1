//! Tenant-scoped lookups shared by ledger operations
//!
//! Every statement filters on the subscription id, including those keyed by
//! a raw account id. A foreign account is indistinguishable from a missing one.

use sqlx::SqliteConnection;

use crate::domain::{normalize_account_name, Account, AccountRef, Balance, TenantId};

const ACCOUNT_BY_ID: &str = r#"
    SELECT id, name, subscription_id FROM accounts
    WHERE id = ? AND subscription_id = ?
"#;

const ACCOUNT_BY_NAME: &str = r#"
    SELECT id, name, subscription_id FROM accounts
    WHERE name = ? AND subscription_id = ?
"#;

const BALANCE_OF: &str = r#"
    SELECT COALESCE(SUM(t.amount), 0)
    FROM transactions t
    JOIN accounts a ON a.id = t.account_id
    WHERE t.account_id = ? AND a.subscription_id = ?
"#;

/// Resolve an account reference within a tenant
pub(crate) async fn resolve_account(
    conn: &mut SqliteConnection,
    tenant: TenantId,
    account: &AccountRef,
) -> Result<Option<Account>, sqlx::Error> {
    let row: Option<(i64, String, i64)> = match account {
        AccountRef::Id(id) => {
            sqlx::query_as(ACCOUNT_BY_ID)
                .bind(*id)
                .bind(tenant.get())
                .fetch_optional(&mut *conn)
                .await?
        }
        AccountRef::Name(name) => {
            sqlx::query_as(ACCOUNT_BY_NAME)
                .bind(normalize_account_name(name))
                .bind(tenant.get())
                .fetch_optional(&mut *conn)
                .await?
        }
    };

    Ok(row.map(|(id, name, tenant_id)| Account {
        id,
        name,
        tenant_id: TenantId::new(tenant_id),
    }))
}

/// Aggregate an account's entries
pub(crate) async fn balance_of(
    conn: &mut SqliteConnection,
    tenant: TenantId,
    account_id: i64,
) -> Result<Balance, sqlx::Error> {
    let sum: i64 = sqlx::query_scalar(BALANCE_OF)
        .bind(account_id)
        .bind(tenant.get())
        .fetch_one(&mut *conn)
        .await?;

    Ok(Balance::from_minor_units(sum))
}

/// Append one entry to the log, returning its id
pub(crate) async fn insert_entry(
    conn: &mut SqliteConnection,
    account_id: i64,
    amount_minor: i64,
    reason: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO transactions (account_id, amount, reason) VALUES (?, ?, ?)")
        .bind(account_id)
        .bind(amount_minor)
        .bind(reason)
        .execute(&mut *conn)
        .await?;

    Ok(result.last_insert_rowid())
}

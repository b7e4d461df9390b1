//! Common test utilities

#![allow(dead_code)]

use piggy_bank::tenant::{self, ProvisionedTenant};
use piggy_bank::{db, Store, TenantId};
use tempfile::TempDir;

/// Store on a fresh SQLite file; the directory lives as long as the value
pub struct TestDb {
    pub store: Store,
    _dir: TempDir,
}

/// Setup test database - new file, schema applied
pub async fn setup_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("piggy_bank.db").display());

    let store = Store::connect(&url, 5)
        .await
        .expect("Failed to open test database");
    db::init_schema(store.pool())
        .await
        .expect("Failed to create schema");

    TestDb { store, _dir: dir }
}

/// Provision a subscription, returning the tenant id and its token
pub async fn add_tenant(store: &Store, name: &str) -> ProvisionedTenant {
    tenant::create_tenant(store, name)
        .await
        .expect("Failed to create subscription")
}

pub async fn add_tenant_id(store: &Store, name: &str) -> TenantId {
    add_tenant(store, name).await.tenant.id
}

/// Number of ledger entries of an account, read directly from the table
pub async fn entry_count(store: &Store, account_id: i64) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM transactions WHERE account_id = ?")
        .bind(account_id)
        .fetch_one(store.pool())
        .await
        .expect("Failed to count entries")
}

/// Sum of all entries for a tenant, read directly from the table
pub async fn tenant_total(store: &Store, tenant: TenantId) -> i64 {
    sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(t.amount), 0)
        FROM transactions t
        JOIN accounts a ON a.id = t.account_id
        WHERE a.subscription_id = ?
        "#,
    )
    .bind(tenant.get())
    .fetch_one(store.pool())
    .await
    .expect("Failed to sum entries")
}

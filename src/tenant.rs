//! Tenant provisioning and authentication
//!
//! Subscriptions are created out of band by the admin CLI. Each one gets an
//! opaque bearer token; only its SHA-256 digest is stored.

use chrono::{DateTime, NaiveDateTime, Utc};
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::TenantId;
use crate::store::Store;

/// Random bytes per token (256 bits)
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum TenantError {
    #[error("Subscription name must not be empty")]
    InvalidName,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// A subscription as listed by the admin CLI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tenant {
    pub id: TenantId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A freshly created subscription with its plaintext token.
///
/// The token cannot be recovered later.
#[derive(Debug, Clone)]
pub struct ProvisionedTenant {
    pub tenant: Tenant,
    pub token: String,
}

/// Generate a new hex-encoded bearer token
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest under which a token is stored
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Create a subscription and issue its token
#[tracing::instrument(level = "debug", skip(store))]
pub async fn create_tenant(store: &Store, name: &str) -> Result<ProvisionedTenant, TenantError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TenantError::InvalidName);
    }

    let token = generate_token();

    let mut uow = store.begin().await?;

    let (id, created_at): (i64, NaiveDateTime) = sqlx::query_as(
        r#"
        INSERT INTO subscriptions (name, auth_token_hash)
        VALUES (?, ?)
        RETURNING id, created_at
        "#,
    )
    .bind(name)
    .bind(hash_token(&token))
    .fetch_one(uow.conn())
    .await?;

    uow.commit().await?;

    tracing::info!(tenant_id = id, "Subscription created");

    Ok(ProvisionedTenant {
        tenant: Tenant {
            id: TenantId::new(id),
            name: name.to_string(),
            created_at: created_at.and_utc(),
        },
        token,
    })
}

/// All subscriptions, oldest first
pub async fn list_tenants(store: &Store) -> Result<Vec<Tenant>, TenantError> {
    let rows: Vec<(i64, String, NaiveDateTime)> =
        sqlx::query_as("SELECT id, name, created_at FROM subscriptions ORDER BY id")
            .fetch_all(store.pool())
            .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name, created_at)| Tenant {
            id: TenantId::new(id),
            name,
            created_at: created_at.and_utc(),
        })
        .collect())
}

/// Resolve a bearer token to its tenant
pub async fn authenticate(store: &Store, token: &str) -> Result<Option<TenantId>, TenantError> {
    let id: Option<i64> =
        sqlx::query_scalar("SELECT id FROM subscriptions WHERE auth_token_hash = ?")
            .bind(hash_token(token))
            .fetch_optional(store.pool())
            .await?;

    Ok(id.map(TenantId::new))
}

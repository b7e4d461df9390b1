//! Unit of Work
//!
//! A database transaction plus the store's write permit.

use sqlx::{Sqlite, SqliteConnection, Transaction};
use tokio::sync::OwnedMutexGuard;

/// Scoped atomic unit over the ledger tables.
///
/// Nothing becomes visible until [`UnitOfWork::commit`]. Dropping the unit
/// without committing rolls the transaction back, so an early `?` return
/// can never leave partial writes behind.
pub struct UnitOfWork {
    // Field order matters: the transaction is released before the permit.
    tx: Transaction<'static, Sqlite>,
    _permit: OwnedMutexGuard<()>,
}

impl UnitOfWork {
    pub(super) fn new(tx: Transaction<'static, Sqlite>, permit: OwnedMutexGuard<()>) -> Self {
        Self {
            tx,
            _permit: permit,
        }
    }

    /// Connection to run statements inside the unit
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    pub async fn rollback(self) -> Result<(), sqlx::Error> {
        self.tx.rollback().await
    }
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork").finish_non_exhaustive()
    }
}

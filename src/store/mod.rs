//! Store module
//!
//! Connection pool and explicit units of work over the SQLite database.

mod unit_of_work;

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tokio::sync::Mutex;

pub use unit_of_work::UnitOfWork;

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the ledger database.
///
/// Cloning is cheap; all clones share the pool and the write permit.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
    write_permit: Arc<Mutex<()>>,
}

impl Store {
    /// Wrap an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            write_permit: Arc::new(Mutex::new(())),
        }
    }

    /// Open (creating if missing) the database at `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Pool for auto-commit reads
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a unit of work.
    ///
    /// Units of work are serialized: the returned unit holds the write
    /// permit until it is committed, rolled back or dropped.
    pub async fn begin(&self) -> Result<UnitOfWork, sqlx::Error> {
        let permit = self.write_permit.clone().lock_owned().await;
        let tx = self.pool.begin().await?;
        Ok(UnitOfWork::new(tx, permit))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

//! SoundKit Storage
//!
//! `SQLite` persistence layer for the SoundKit client.
//!
//! The client keeps its durable state (settings, downloads, recently played,
//! playback history, favorites, playlists) as JSON documents in a single
//! key-value table, one document per `soundkit_*` key. [`SqliteStore`]
//! implements [`PersistenceStore`](soundkit_core::PersistenceStore) on top of
//! it for the playback engine.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each kind of record owns its module and queries
//! - **Transactions**: read-modify-write (and changes spanning two keys, such
//!   as removing a download together with its favorite entry) run in one
//!   transaction
//!
//! # Example
//!
//! ```rust,no_run
//! use soundkit_storage::{create_pool, run_migrations, SqliteStore};
//! use soundkit_core::PersistenceStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://soundkit.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteStore::new(pool);
//! let settings = store.settings().await?;
//! println!("streaming at {}", settings.audio_quality);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

pub mod kv;

// Vertical slices
pub mod downloads;
pub mod favorites;
pub mod history;
pub mod playlists;
pub mod settings;

pub use context::SqliteStore;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://soundkit.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> std::result::Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    debug!(url = database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!("SQLite pool ready");
    Ok(pool)
}

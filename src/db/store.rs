use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::models::BmiRecord;

#[cfg(not(target_family = "wasm"))]
pub use self::sqlite::SqliteStore;

/// Append-only history of computed BMI values. The screen and the CLI are
/// written against this trait only, so a platform without SQLite simply gets
/// a [`NullStore`].
pub trait RecordStore {
    /// Make sure backing storage exists. Safe to call any number of times.
    fn initialize(&self) -> Result<()>;

    /// Record one computation. The store stamps the insertion time itself.
    fn append(&self, bmi: &str, weight: &str, height: &str) -> Result<BmiRecord>;

    /// Every record, most recent first, dated at day precision.
    fn list_all(&self) -> Result<Vec<BmiRecord>>;

    /// Emit the raw table contents to the debug log.
    fn dump(&self) -> Result<()> {
        Ok(())
    }

    /// False for stores that never keep anything.
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Inert store for environments without embedded database support. Writes
/// succeed and vanish; listings are always empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStore;

impl RecordStore for NullStore {
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn append(&self, bmi: &str, weight: &str, height: &str) -> Result<BmiRecord> {
        debug!(bmi, weight, height, "storage disabled, dropping BMI record");
        Ok(BmiRecord {
            id: 0,
            bmi: bmi.to_string(),
            weight: weight.to_string(),
            height: height.to_string(),
            recorded_on: String::new(),
        })
    }

    fn list_all(&self) -> Result<Vec<BmiRecord>> {
        Ok(Vec::new())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

#[cfg(not(target_family = "wasm"))]
mod sqlite {
    use std::path::Path;

    use anyhow::{Context, Result};
    use rusqlite::Connection;
    use tracing::{warn, Level};

    use crate::db::{dump_records, ensure_schema, fetch_records, insert_record, open_database};
    use crate::models::BmiRecord;

    use super::RecordStore;

    /// SQLite-backed store owning the single process-wide connection.
    pub struct SqliteStore {
        pub(super) conn: Connection,
    }

    impl SqliteStore {
        /// Open the database file, creating it and the table when missing.
        pub fn open(path: &Path) -> Result<Self> {
            Ok(Self {
                conn: open_database(path)?,
            })
        }

        /// Fresh in-memory database, mostly for tests.
        pub fn open_in_memory() -> Result<Self> {
            let store = Self::from_connection(
                Connection::open_in_memory().context("failed to open in-memory database")?,
            );
            store.initialize()?;
            Ok(store)
        }

        /// Wrap an existing connection. Call [`RecordStore::initialize`] before use
        /// if the schema may be missing.
        pub fn from_connection(conn: Connection) -> Self {
            Self { conn }
        }
    }

    impl RecordStore for SqliteStore {
        fn initialize(&self) -> Result<()> {
            ensure_schema(&self.conn)
        }

        fn append(&self, bmi: &str, weight: &str, height: &str) -> Result<BmiRecord> {
            let record = insert_record(&self.conn, bmi, weight, height)?;
            // The row is committed; a failed dump must not turn that into an error.
            if tracing::enabled!(Level::DEBUG) {
                if let Err(err) = self.dump() {
                    warn!(error = %format!("{err:#}"), "failed to dump BMI table");
                }
            }
            Ok(record)
        }

        fn list_all(&self) -> Result<Vec<BmiRecord>> {
            fetch_records(&self.conn)
        }

        fn dump(&self) -> Result<()> {
            dump_records(&self.conn)
        }
    }
}

/// Whether this build target can host the embedded SQLite engine.
pub fn storage_supported() -> bool {
    !cfg!(target_family = "wasm")
}

/// Pick the store implementation once at start-up. `path` of `None` means
/// storage was switched off in configuration.
pub fn open_store(path: Option<&Path>) -> Result<Box<dyn RecordStore>> {
    match path {
        Some(path) if storage_supported() => open_sqlite(path),
        _ => {
            info!("BMI history storage disabled, using no-op store");
            Ok(Box::new(NullStore))
        }
    }
}

#[cfg(not(target_family = "wasm"))]
fn open_sqlite(path: &Path) -> Result<Box<dyn RecordStore>> {
    let store = SqliteStore::open(path)?;
    store.initialize()?;
    Ok(Box::new(store))
}

#[cfg(target_family = "wasm")]
fn open_sqlite(_path: &Path) -> Result<Box<dyn RecordStore>> {
    Ok(Box::new(NullStore))
}

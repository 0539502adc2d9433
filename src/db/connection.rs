use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Open (or create) the SQLite file at `path` and make sure the `BMI` table
/// exists. Parent directories are created on demand so a fresh install works
/// without any manual setup.
pub fn open_database(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    info!("opening BMI database at {}", path.display());
    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the history table if it is missing. Running this on every start-up
/// is harmless: existing rows are never touched.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS BMI (
            id INTEGER PRIMARY KEY NOT NULL,
            bmi TEXT,
            weight TEXT,
            height TEXT,
            itemDate REAL
        )",
        [],
    )
    .context("failed to create BMI table")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_database_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bmi.sqlite");

        let conn = open_database(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM BMI", [], |row| row.get(0))
            .unwrap();

        assert_eq!(count, 0);
        assert!(path.exists());
    }

    #[test]
    fn ensure_schema_twice_is_fine() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }
}

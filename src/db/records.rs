use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::debug;

use crate::models::BmiRecord;

/// Shared projection: `itemDate` is reduced to a calendar date for display.
const RECORD_COLUMNS: &str = "id, bmi, weight, height, date(itemDate)";

/// Append a history row stamped with SQLite's current Julian day and echo the
/// stored row back, so callers see exactly what a later listing will show.
pub fn insert_record(
    conn: &Connection,
    bmi: &str,
    weight: &str,
    height: &str,
) -> Result<BmiRecord> {
    conn.execute(
        "INSERT INTO BMI (bmi, weight, height, itemDate) VALUES (?1, ?2, ?3, julianday('now'))",
        params![bmi, weight, height],
    )
    .context("failed to insert BMI record")?;

    let id = conn.last_insert_rowid();
    debug!(id, bmi, weight, height, "inserted BMI record");
    fetch_record(conn, id)?.ok_or_else(|| anyhow!("BMI record {id} missing after insert"))
}

/// Look up a single row by id.
pub fn fetch_record(conn: &Connection, id: i64) -> Result<Option<BmiRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM BMI WHERE id = ?1");
    conn.query_row(&sql, [id], record_from_row)
        .optional()
        .context("failed to load BMI record")
}

/// Every row, newest first. Rows sharing a timestamp keep insertion order.
/// The sort uses the raw Julian day rather than the projected date so that
/// records from the same day still come back newest first.
pub fn fetch_records(conn: &Connection) -> Result<Vec<BmiRecord>> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM BMI ORDER BY BMI.itemDate DESC, BMI.id ASC");
    let mut stmt = conn
        .prepare(&sql)
        .context("failed to prepare BMI history query")?;

    let records = stmt
        .query_map([], record_from_row)
        .context("failed to load BMI history")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect BMI history")?;

    Ok(records)
}

/// Diagnostic dump of the whole table in storage order. Only feeds the debug
/// log; nothing user-visible depends on it.
pub fn dump_records(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("SELECT id, bmi, weight, height, itemDate FROM BMI")
        .context("failed to prepare BMI dump query")?;
    let mut rows = stmt.query([]).context("failed to execute BMI dump query")?;

    while let Some(row) = rows.next().context("failed to fetch BMI dump row")? {
        let id: i64 = row.get(0).context("failed to read id")?;
        let bmi: Option<String> = row.get(1).context("failed to read bmi")?;
        let weight: Option<String> = row.get(2).context("failed to read weight")?;
        let height: Option<String> = row.get(3).context("failed to read height")?;
        let item_date: Option<f64> = row.get(4).context("failed to read itemDate")?;
        debug!(id, ?bmi, ?weight, ?height, ?item_date, "BMI row");
    }

    Ok(())
}

/// Columns are nullable in the schema; missing values surface as empty text.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<BmiRecord> {
    Ok(BmiRecord {
        id: row.get(0)?,
        bmi: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
        weight: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        height: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        recorded_on: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn memory_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    /// Insert with a caller-chosen Julian day so ordering tests do not depend
    /// on the wall clock.
    fn insert_at(conn: &Connection, bmi: &str, julian_day: f64) -> i64 {
        conn.execute(
            "INSERT INTO BMI (bmi, weight, height, itemDate) VALUES (?1, '150', '70', ?2)",
            params![bmi, julian_day],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn insert_echoes_stored_row() {
        let conn = memory_db();
        let record = insert_record(&conn, "21.5", "150", "70").unwrap();

        assert_eq!(record.bmi, "21.5");
        assert_eq!(record.weight, "150");
        assert_eq!(record.height, "70");
        assert_eq!(record.recorded_on.len(), "YYYY-MM-DD".len());
        assert_eq!(fetch_records(&conn).unwrap(), vec![record]);
    }

    #[test]
    fn raw_text_is_preserved() {
        let conn = memory_db();
        let record = insert_record(&conn, "NaN", " heavy ", "5ft").unwrap();
        assert_eq!(record.weight, " heavy ");
        assert_eq!(record.height, "5ft");
        assert_eq!(record.bmi, "NaN");
    }

    #[test]
    fn history_is_newest_first() {
        let conn = memory_db();
        insert_at(&conn, "20.0", 2_461_000.25);
        insert_at(&conn, "38.0", 2_461_002.5);
        insert_at(&conn, "21.5", 2_461_001.75);

        let bmis: Vec<_> = fetch_records(&conn)
            .unwrap()
            .into_iter()
            .map(|record| record.bmi)
            .collect();
        assert_eq!(bmis, ["38.0", "21.5", "20.0"]);
    }

    #[test]
    fn same_day_entries_sort_by_time_not_date() {
        let conn = memory_db();
        insert_at(&conn, "early", 2_461_000.6);
        insert_at(&conn, "late", 2_461_000.9);

        let records = fetch_records(&conn).unwrap();
        assert_eq!(records[0].bmi, "late");
        assert_eq!(records[0].recorded_on, records[1].recorded_on);
    }

    #[test]
    fn timestamp_ties_fall_back_to_insertion_order() {
        let conn = memory_db();
        let first = insert_at(&conn, "first", 2_461_000.5);
        let second = insert_at(&conn, "second", 2_461_000.5);

        let ids: Vec<_> = fetch_records(&conn)
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn date_projection_uses_calendar_date() {
        let conn = memory_db();
        // Julian day 2461000.5 is midnight UTC on 2025-11-21.
        insert_at(&conn, "21.5", 2_461_000.5);
        assert_eq!(fetch_records(&conn).unwrap()[0].recorded_on, "2025-11-21");
    }

    #[test]
    fn empty_table_lists_nothing() {
        let conn = memory_db();
        assert!(fetch_records(&conn).unwrap().is_empty());
        assert!(fetch_record(&conn, 1).unwrap().is_none());
        dump_records(&conn).unwrap();
    }

    #[test]
    fn missing_table_is_an_error() {
        let conn = Connection::open_in_memory().unwrap();
        let err = fetch_records(&conn).unwrap_err();
        assert!(err.to_string().contains("BMI history"));
    }
}

//! Station metadata.

use anyhow::{Context, Result};
use rusqlite::Connection;
use serde::Serialize;

/// A station as exposed by the API: its code and numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRecord {
    pub station: String,
    pub id: i64,
}

/// All stations in table order.
pub fn list_stations(conn: &Connection) -> Result<Vec<StationRecord>> {
    let mut stmt = conn.prepare("SELECT station, id FROM station")?;

    let rows = stmt.query_map([], |row| {
        Ok(StationRecord {
            station: row.get(0)?,
            id: row.get(1)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read stations")
}

pub fn count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM station", [], |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

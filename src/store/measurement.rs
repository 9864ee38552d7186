//! Queries over the `measurement` table.
//!
//! Dates are stored as fixed-width `YYYY-MM-DD` text, so SQL range filters on
//! the raw column order the same way the calendar does.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

/// One day of precipitation at one station. `prcp` is nullable in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecipitationRecord {
    pub date: NaiveDate,
    pub precipitation: Option<f64>,
}

/// One temperature observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TobsRecord {
    pub date: NaiveDate,
    pub tobs: f64,
}

/// Min/avg/max of `tobs` over a date range. All `None` when no row matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TemperatureStats {
    pub min_temp: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
}

/// A station code and how many measurements it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationActivity {
    pub station: String,
    pub observations: u64,
}

/// Latest observation date, or `None` if the table is empty.
pub fn latest_date(conn: &Connection) -> Result<Option<NaiveDate>> {
    conn.query_row("SELECT MAX(date) FROM measurement", [], |row| row.get(0))
        .context("failed to query latest measurement date")
}

/// Earliest and latest observation dates, or `None` if the table is empty.
pub fn date_bounds(conn: &Connection) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let (earliest, latest): (Option<NaiveDate>, Option<NaiveDate>) = conn
        .query_row("SELECT MIN(date), MAX(date) FROM measurement", [], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })
        .context("failed to query measurement date bounds")?;

    Ok(earliest.zip(latest))
}

/// Every precipitation reading dated on or after `since`, ordered by date and
/// then station.
pub fn precipitation_since(conn: &Connection, since: NaiveDate) -> Result<Vec<PrecipitationRecord>> {
    let mut stmt = conn.prepare(
        "SELECT date, prcp FROM measurement
         WHERE date >= ?1
         ORDER BY date, station",
    )?;

    let rows = stmt.query_map(params![since], |row| {
        Ok(PrecipitationRecord {
            date: row.get(0)?,
            precipitation: row.get(1)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read precipitation rows")
}

/// The station with the most measurements overall.
///
/// Ties go to the lexicographically smallest station code so the answer does
/// not depend on SQLite's row order.
pub fn most_active_station(conn: &Connection) -> Result<Option<StationActivity>> {
    let activity = conn
        .query_row(
            "SELECT station, COUNT(*) AS observations FROM measurement
             GROUP BY station
             ORDER BY observations DESC, station ASC
             LIMIT 1",
            [],
            |row| {
                let observations: i64 = row.get(1)?;
                Ok(StationActivity {
                    station: row.get(0)?,
                    observations: observations.max(0) as u64,
                })
            },
        )
        .optional()
        .context("failed to query most active station")?;

    Ok(activity)
}

/// Temperature observations for `station` dated on or after `since`.
pub fn tobs_since(conn: &Connection, station: &str, since: NaiveDate) -> Result<Vec<TobsRecord>> {
    let mut stmt = conn.prepare(
        "SELECT date, tobs FROM measurement
         WHERE station = ?1 AND date >= ?2
         ORDER BY date",
    )?;

    let rows = stmt.query_map(params![station, since], |row| {
        Ok(TobsRecord {
            date: row.get(0)?,
            tobs: row.get(1)?,
        })
    })?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| format!("failed to read temperature observations for {station}"))
}

/// Aggregate `tobs` over `start..=end`.
pub fn temperature_stats(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<TemperatureStats> {
    conn.query_row(
        "SELECT MIN(tobs), AVG(tobs), MAX(tobs) FROM measurement
         WHERE date >= ?1 AND date <= ?2",
        params![start, end],
        |row| {
            Ok(TemperatureStats {
                min_temp: row.get(0)?,
                avg_temp: row.get(1)?,
                max_temp: row.get(2)?,
            })
        },
    )
    .context("failed to aggregate temperature observations")
}

pub fn count(conn: &Connection) -> Result<u64> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM measurement", [], |row| row.get(0))?;
    Ok(n.max(0) as u64)
}

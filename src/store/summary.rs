//! One-shot overview of the dataset, printed by `climate-api inspect`.

use super::{measurement, station, StationActivity};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    pub station_count: u64,
    pub measurement_count: u64,
    pub most_active: Option<StationActivity>,
}

pub fn summary(conn: &Connection) -> Result<DatasetSummary> {
    let bounds = measurement::date_bounds(conn)?;

    Ok(DatasetSummary {
        earliest_date: bounds.map(|(earliest, _)| earliest),
        latest_date: bounds.map(|(_, latest)| latest),
        station_count: station::count(conn)?,
        measurement_count: measurement::count(conn)?,
        most_active: measurement::most_active_station(conn)?,
    })
}

//! JSON route handlers under `/api/v1.0`.

use super::{ApiError, AppState};
use crate::climate::{self, DateRange};
use crate::store::{
    measurement, station, PrecipitationRecord, StationRecord, TemperatureStats, TobsRecord,
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

/// GET /health
pub async fn handle_health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /api/v1.0/precipitation: every reading in the trailing year.
pub async fn handle_precipitation(
    State(state): State<AppState>,
) -> Result<Json<Vec<PrecipitationRecord>>, ApiError> {
    let records = state
        .query(|conn| {
            let latest = measurement::latest_date(conn)?.ok_or(ApiError::DataUnavailable)?;
            let since = climate::lookback_start(latest);
            tracing::debug!("precipitation window {since}..={latest}");
            Ok(measurement::precipitation_since(conn, since)?)
        })
        .await?;

    Ok(Json(records))
}

/// GET /api/v1.0/stations
pub async fn handle_stations(
    State(state): State<AppState>,
) -> Result<Json<Vec<StationRecord>>, ApiError> {
    let stations = state
        .query(|conn| Ok(station::list_stations(conn)?))
        .await?;

    Ok(Json(stations))
}

/// GET /api/v1.0/tobs: trailing-year observations of the busiest station.
pub async fn handle_tobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<TobsRecord>>, ApiError> {
    let records = state
        .query(|conn| {
            let latest = measurement::latest_date(conn)?.ok_or(ApiError::DataUnavailable)?;
            let active =
                measurement::most_active_station(conn)?.ok_or(ApiError::DataUnavailable)?;
            let since = climate::lookback_start(latest);
            tracing::debug!(
                "tobs for {} ({} rows) over {since}..={latest}",
                active.station,
                active.observations
            );
            Ok(measurement::tobs_since(conn, &active.station, since)?)
        })
        .await?;

    Ok(Json(records))
}

/// GET /api/v1.0/{start}
pub async fn handle_temperature_from(
    State(state): State<AppState>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    temperature_range(state, &start, None).await
}

/// GET /api/v1.0/{start}/{end}
pub async fn handle_temperature_between(
    State(state): State<AppState>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    temperature_range(state, &start, Some(&end)).await
}

async fn temperature_range(
    state: AppState,
    start: &str,
    end: Option<&str>,
) -> Result<Json<Vec<TemperatureStats>>, ApiError> {
    let start = parse_param("start", start)?;
    let end = end.map(|e| parse_param("end", e)).transpose()?;

    let stats = state
        .query(move |conn| {
            let (earliest, latest) =
                measurement::date_bounds(conn)?.ok_or(ApiError::DataUnavailable)?;
            let range = DateRange::clamped(start, end, earliest, latest);
            tracing::debug!("temperature stats over {}..={}", range.start, range.end);

            if range.is_empty() {
                return Ok(TemperatureStats::default());
            }
            Ok(measurement::temperature_stats(conn, range.start, range.end)?)
        })
        .await?;

    Ok(Json(vec![stats]))
}

fn parse_param(field: &'static str, value: &str) -> Result<NaiveDate, ApiError> {
    climate::parse_date(value).map_err(|e| ApiError::InvalidDateFormat {
        field,
        value: e.value,
    })
}

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    Json,
};
use log::debug;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{AppError, AppState, Precipitation, Station, TemperatureObservation, TemperatureStats};

/// Precipitation keyed by date. Readings from several stations on the same date
/// collapse into one entry, the last one returned by the store wins.
pub type PrecipitationByDate = BTreeMap<String, Option<f64>>;

pub fn precipitation_by_date(readings: Vec<Precipitation>) -> PrecipitationByDate {
    readings
        .into_iter()
        .map(|reading| (reading.date, reading.prcp))
        .collect()
}

/// `[station, name]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StationRow(pub String, pub String);

impl From<Station> for StationRow {
    fn from(value: Station) -> Self {
        StationRow(value.station, value.name)
    }
}

/// `[date, tobs]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureObservationRow(pub String, pub f64);

impl From<TemperatureObservation> for TemperatureObservationRow {
    fn from(value: TemperatureObservation) -> Self {
        TemperatureObservationRow(value.date, value.tobs)
    }
}

/// `[date, min, avg, max]`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemperatureStatsRow(pub String, pub f64, pub f64, pub f64);

impl From<TemperatureStats> for TemperatureStatsRow {
    fn from(value: TemperatureStats) -> Self {
        TemperatureStatsRow(value.date, value.min, value.avg, value.max)
    }
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Successfully retrieved precipitation keyed by date", body = BTreeMap<String, Option<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve precipitation data")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrecipitationByDate>, AppError> {
    let readings = state
        .climate_db
        .precipitation_since(&state.cutoff_date)
        .await?;
    let total = readings.len();
    let by_date = precipitation_by_date(readings);
    if by_date.len() < total {
        debug!(
            "{} precipitation readings collapsed into {} dates",
            total,
            by_date.len()
        );
    }

    Ok(Json(by_date))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "Successfully retrieved weather stations", body = Vec<StationRow>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve weather stations")
    ))]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StationRow>>, AppError> {
    let stations = state.climate_db.stations().await?;
    Ok(Json(stations.into_iter().map(StationRow::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Successfully retrieved temperature observations", body = Vec<TemperatureObservationRow>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve temperature observations")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservationRow>>, AppError> {
    let observations = state
        .climate_db
        .temperature_observations_since(&state.cutoff_date)
        .await?;

    Ok(Json(
        observations
            .into_iter()
            .map(TemperatureObservationRow::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD")
    ),
    responses(
        (status = OK, description = "Successfully retrieved daily temperature stats", body = Vec<TemperatureStatsRow>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve temperature stats")
    ))]
pub async fn temperature_stats_from(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStatsRow>>, AppError> {
    let stats = state.climate_db.temperature_stats_from(&start).await?;
    Ok(Json(stats.into_iter().map(TemperatureStatsRow::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "First date to include, YYYY-MM-DD"),
        ("end" = String, Path, description = "Last date to include, YYYY-MM-DD")
    ),
    responses(
        (status = OK, description = "Successfully retrieved daily temperature stats", body = Vec<TemperatureStatsRow>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to retrieve temperature stats")
    ))]
pub async fn temperature_stats_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStatsRow>>, AppError> {
    let stats = state
        .climate_db
        .temperature_stats_range(&start, &end)
        .await?;
    Ok(Json(stats.into_iter().map(TemperatureStatsRow::from).collect()))
}

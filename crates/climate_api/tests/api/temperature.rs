use std::sync::Arc;

use crate::helpers::{get, spawn_app, spawn_app_with_store, MockClimateAccess, TestStore};
use axum::http::StatusCode;
use climate_api::{TemperatureObservationRow, TemperatureStats, TemperatureStatsRow};
use serde_json::from_slice;

#[tokio::test]
async fn tobs_lists_observations_since_cutoff() {
    let store = TestStore::hawaii();
    let test_app = spawn_app_with_store(&store);

    let (status, _, body) = get(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
    let rows: Vec<TemperatureObservationRow> = from_slice(&body).unwrap();
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0].0, "2016-08-23");
    assert_eq!(rows[8], TemperatureObservationRow(String::from("2017-08-23"), 82.0));
}

#[tokio::test]
async fn stats_from_start_date() {
    let store = TestStore::hawaii();
    let test_app = spawn_app_with_store(&store);

    let (status, _, body) = get(&test_app.app, "/api/v1.0/2017-03-14").await;

    assert_eq!(status, StatusCode::OK);
    let rows: Vec<TemperatureStatsRow> = from_slice(&body).unwrap();
    assert_eq!(
        rows,
        vec![
            TemperatureStatsRow(String::from("2017-03-14"), 66.0, 69.0, 72.0),
            TemperatureStatsRow(String::from("2017-03-15"), 74.0, 74.0, 74.0),
            TemperatureStatsRow(String::from("2017-03-28"), 69.0, 69.0, 69.0),
            TemperatureStatsRow(String::from("2017-08-23"), 81.0, 81.5, 82.0),
        ]
    );
}

#[tokio::test]
async fn stats_between_start_and_end_dates() {
    let store = TestStore::hawaii();
    let test_app = spawn_app_with_store(&store);

    let (status, _, body) = get(&test_app.app, "/api/v1.0/2017-03-14/2017-03-15").await;

    assert_eq!(status, StatusCode::OK);
    let rows: Vec<TemperatureStatsRow> = from_slice(&body).unwrap();
    let dates: Vec<&str> = rows.iter().map(|row| row.0.as_str()).collect();
    assert_eq!(dates, vec!["2017-03-14", "2017-03-15"]);
}

#[tokio::test]
async fn reversed_range_is_empty_not_an_error() {
    let store = TestStore::hawaii();
    let test_app = spawn_app_with_store(&store);

    let (status, _, body) = get(&test_app.app, "/api/v1.0/2017-08-23/2017-03-14").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"[]");
}

#[tokio::test]
async fn path_segments_are_passed_through_unvalidated() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_stats_range()
        .withf(|start, end| start.to_string() == "yesterday" && end.to_string() == "2017-13-45")
        .times(1)
        .returning(|_, _| {
            Ok(vec![TemperatureStats {
                date: String::from("2017-03-14"),
                min: 60.0,
                avg: 65.0,
                max: 70.0,
            }])
        });
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, _, body) = get(&test_app.app, "/api/v1.0/yesterday/2017-13-45").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        std::str::from_utf8(&body).unwrap(),
        r#"[["2017-03-14",60.0,65.0,70.0]]"#
    );
}

#[tokio::test]
async fn fixed_routes_are_not_read_as_start_dates() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_temperature_observations_since()
        .times(1)
        .returning(|_| Ok(vec![]));
    climate_db.expect_temperature_stats_from().never();
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, _, _) = get(&test_app.app, "/api/v1.0/tobs").await;

    assert_eq!(status, StatusCode::OK);
}

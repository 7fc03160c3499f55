use std::{collections::BTreeMap, sync::Arc};

use crate::helpers::{
    get, spawn_app, spawn_app_with_store, MockClimateAccess, TestStore, DEFAULT_CUTOFF,
};
use axum::http::StatusCode;
use climate_api::{precipitation_by_date, Precipitation, PrecipitationByDate};
use serde_json::{from_slice, to_vec};

#[tokio::test]
async fn precipitation_covers_last_year_keyed_by_date() {
    let store = TestStore::hawaii();
    let test_app = spawn_app_with_store(&store);

    let (status, headers, body) = get(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json");
    let res: PrecipitationByDate = from_slice(&body).unwrap();
    let expected: PrecipitationByDate = BTreeMap::from([
        // both stations report on these dates, the later row wins
        (String::from("2016-08-23"), Some(0.15)),
        (String::from("2017-03-13"), None),
        (String::from("2017-03-14"), None),
        (String::from("2017-03-15"), Some(0.02)),
        (String::from("2017-03-28"), Some(0.5)),
        (String::from("2017-08-23"), Some(0.45)),
    ]);
    assert_eq!(res, expected);
    assert!(!res.contains_key("2016-08-22"));
}

#[tokio::test]
async fn precipitation_uses_configured_cutoff() {
    let mut climate_db = MockClimateAccess::new();
    climate_db
        .expect_precipitation_since()
        .withf(|since| since.to_string() == DEFAULT_CUTOFF)
        .times(1)
        .returning(|_| Ok(vec![]));
    let test_app = spawn_app(Arc::new(climate_db));

    let (status, _, body) = get(&test_app.app, "/api/v1.0/precipitation").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"{}");
}

#[test]
fn precipitation_map_survives_json_round_trip() {
    let by_date = precipitation_by_date(vec![
        Precipitation {
            date: String::from("2017-03-14"),
            prcp: Some(0.08),
        },
        Precipitation {
            date: String::from("2017-03-15"),
            prcp: None,
        },
    ]);

    let decoded: PrecipitationByDate = from_slice(&to_vec(&by_date).unwrap()).unwrap();

    assert_eq!(decoded, by_date);
}

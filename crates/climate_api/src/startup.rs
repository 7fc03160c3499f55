use crate::{
    get_stations, index_handler, precipitation, routes, temperature_stats_from,
    temperature_stats_range, tobs, ClimateAccess, ClimateData, Cli,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::Method;
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    /// First date served by the precipitation and tobs routes, YYYY-MM-DD
    pub cutoff_date: String,
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::get_stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temperature_stats_from,
        routes::climate::climate_routes::temperature_stats_range,
    ),
    components(
        schemas(
                routes::climate::climate_routes::StationRow,
                routes::climate::climate_routes::TemperatureObservationRow,
                routes::climate::climate_routes::TemperatureStatsRow,
        )
    ),
    tags(
        (name = "climate api", description = "a read-only api over precipitation and temperature observations from weather stations")
    )
)]
struct ApiDoc;

pub fn build_app_state(cli: &Cli) -> Result<AppState, anyhow::Error> {
    let cutoff_date = cli.cutoff_date()?;
    info!("precipitation and tobs routes start at {}", cutoff_date);

    let climate_db = Arc::new(
        ClimateAccess::new(&cli.db_path())
            .map_err(|e| anyhow!("error setting up climate data: {}", e))?,
    );

    Ok(AppState {
        cutoff_date,
        climate_db,
    })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        // read-only api, `GET` is all there is
        .allow_methods([Method::GET])
        // allow requests from any origin
        .allow_origin(Any);
    // fixed segments are matched before `{start}`, so `tobs` is never read as a date
    Router::new()
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temperature_stats_from))
        .route("/api/v1.0/{start}/{end}", get(temperature_stats_range))
        .layer(middleware::from_fn(log_request))
        .route("/", get(index_handler))
        .with_state(Arc::new(app_state))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default()
        .to_owned();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}

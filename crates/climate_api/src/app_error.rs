use crate::climate_data;
use axum::{
    response::{IntoResponse, Response},
    Json,
};
use hyper::StatusCode;
use log::error;
use serde_json::json;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Failed to get climate data: {0}")]
    ClimateData(#[from] climate_data::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("error handling request: {}", self);

        // store failures never leak their details to the caller
        let (status, error_message) = match self {
            AppError::ClimateData(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                String::from("internal error"),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));
        (status, body).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mowi_market_data::MarketDataError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed query parameter.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    MarketData(#[from] MarketDataError),
    /// Failure raised by the host rather than a handler, e.g. an elapsed timeout.
    #[error("{0}")]
    Internal(String),
}

/// Error envelope returned by every endpoint.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MarketData(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

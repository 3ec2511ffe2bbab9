use std::sync::Arc;

use axum::{
    error_handling::HandleErrorLayer, http::HeaderValue, routing::get, BoxError, Json, Router,
};
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{config::Config, error::ApiError, main_lib::AppState};

pub mod health;
pub mod mowi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        mowi::get_mowi_data,
        mowi::get_mowi_quote,
        mowi::get_mowi_history,
        mowi::get_mowi_actions,
        mowi::get_mowi_financials,
        mowi::get_mowi_recommendations
    ),
    tags((name = "mowi"))
)]
pub struct ApiDoc;

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<Elapsed>() {
        tracing::error!("Request timed out");
        ApiError::Internal("request timed out".to_string())
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        ApiError::Internal(err.to_string())
    }
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(mowi::router())
        .route("/openapi.json", get(|| async { Json(openapi) }));

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(config.request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
}

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use mowi_market_data::{to_json, to_records, HistoryInterval, StatementRecords};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{MowiData, QueryParams},
};

pub const DEFAULT_DAYS: u32 = 30;

const DAYS_ERROR: &str = "Parameter 'days' must be an integer.";
const INTERVAL_ERROR: &str = "Parameter 'interval' must be one of: daily, weekly, monthly.";

/// Parses a `days` value. Absent or empty means [`DEFAULT_DAYS`]; `None` means malformed.
///
/// Any run of digits is accepted. Values past `u32::MAX` saturate, since the
/// provider clamps the start of the range anyway.
fn parse_days(raw: Option<&str>) -> Option<u32> {
    let value = match raw {
        None | Some("") => return Some(DEFAULT_DAYS),
        Some(value) => value.trim(),
    };
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse().unwrap_or(u32::MAX))
}

fn days_or_default(raw: Option<&str>) -> u32 {
    parse_days(raw).unwrap_or(DEFAULT_DAYS)
}

fn days_strict(raw: Option<&str>) -> ApiResult<u32> {
    parse_days(raw).ok_or_else(|| ApiError::BadRequest(DAYS_ERROR.to_string()))
}

fn parse_interval(raw: Option<&str>) -> ApiResult<HistoryInterval> {
    match raw.map(str::trim) {
        None | Some("") => Ok(HistoryInterval::default()),
        Some(value) => value
            .parse()
            .map_err(|_| ApiError::BadRequest(INTERVAL_ERROR.to_string())),
    }
}

fn json_body<T: Serialize + ?Sized>(value: &T) -> ApiResult<Response> {
    let body = to_json(value)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

fn logged(endpoint: &'static str, result: ApiResult<Response>) -> ApiResult<Response> {
    if let Err(err) = &result {
        match err {
            ApiError::BadRequest(_) => warn!(endpoint, error = %err, "Rejected request"),
            ApiError::MarketData(e) if e.is_serialization() => {
                error!(endpoint, error = %err, "Failed to encode response")
            }
            _ => error!(endpoint, error = %err, "Request failed"),
        }
    }
    result
}

#[utoipa::path(
    get,
    path = "/api/GetMowiData",
    params(("days" = Option<String>, Query, description = "History window in days, 30 when missing or malformed")),
    responses(
        (status = 200, description = "Quote, history, actions, financials and recommendations"),
        (status = 500, description = "Upstream or serialization failure")
    )
)]
pub async fn get_mowi_data(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
) -> ApiResult<Response> {
    info!("GetMowiData called");
    logged("GetMowiData", async {
        let days = days_or_default(query.get("days"));
        let provider = &state.provider;

        let quote = provider.get_quote().await?;
        let history = provider
            .get_history(days, HistoryInterval::Daily)
            .await?;
        let actions = provider.get_actions().await?;
        let financials = provider.get_financials().await?;
        let recommendations = provider.get_recommendations().await?;

        json_body(&MowiData {
            quote,
            history: to_records(&history),
            actions: to_records(&actions),
            financials: StatementRecords::from(&financials),
            recommendations: to_records(&recommendations),
        })
    }
    .await)
}

#[utoipa::path(
    get,
    path = "/api/GetMowiQuote",
    responses(
        (status = 200, description = "Current market snapshot"),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn get_mowi_quote(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    info!("GetMowiQuote called");
    logged("GetMowiQuote", async {
        let quote = state.provider.get_quote().await?;
        json_body(&quote)
    }
    .await)
}

#[utoipa::path(
    get,
    path = "/api/GetMowiHistory",
    params(
        ("days" = Option<String>, Query, description = "History window in days, defaults to 30"),
        ("interval" = Option<String>, Query, description = "daily, weekly or monthly, defaults to daily")
    ),
    responses(
        (status = 200, description = "Price bars ordered by date"),
        (status = 400, description = "Malformed days or interval"),
        (status = 500, description = "Upstream or serialization failure")
    )
)]
pub async fn get_mowi_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QueryParams>,
) -> ApiResult<Response> {
    info!("GetMowiHistory called");
    logged("GetMowiHistory", async {
        let days = days_strict(query.get("days"))?;
        let interval = parse_interval(query.get("interval"))?;
        let history = state.provider.get_history(days, interval).await?;
        json_body(&to_records(&history))
    }
    .await)
}

#[utoipa::path(
    get,
    path = "/api/GetMowiActions",
    responses(
        (status = 200, description = "Dividends and stock splits"),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn get_mowi_actions(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    info!("GetMowiActions called");
    logged("GetMowiActions", async {
        let actions = state.provider.get_actions().await?;
        json_body(&to_records(&actions))
    }
    .await)
}

#[utoipa::path(
    get,
    path = "/api/GetMowiFinancials",
    responses(
        (status = 200, description = "Income statement, balance sheet and cashflow"),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn get_mowi_financials(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    info!("GetMowiFinancials called");
    logged("GetMowiFinancials", async {
        let financials = state.provider.get_financials().await?;
        json_body(&StatementRecords::from(&financials))
    }
    .await)
}

#[utoipa::path(
    get,
    path = "/api/GetMowiRecommendations",
    responses(
        (status = 200, description = "Analyst recommendation trend"),
        (status = 500, description = "Upstream failure")
    )
)]
pub async fn get_mowi_recommendations(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    info!("GetMowiRecommendations called");
    logged("GetMowiRecommendations", async {
        let recommendations = state.provider.get_recommendations().await?;
        json_body(&to_records(&recommendations))
    }
    .await)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/GetMowiData", get(get_mowi_data))
        .route("/GetMowiQuote", get(get_mowi_quote))
        .route("/GetMowiHistory", get(get_mowi_history))
        .route("/GetMowiActions", get(get_mowi_actions))
        .route("/GetMowiFinancials", get(get_mowi_financials))
        .route("/GetMowiRecommendations", get(get_mowi_recommendations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_defaults_when_missing_or_empty() {
        assert_eq!(parse_days(None), Some(30));
        assert_eq!(parse_days(Some("")), Some(30));
    }

    #[test]
    fn days_accepts_padded_integers() {
        assert_eq!(parse_days(Some("7")), Some(7));
        assert_eq!(parse_days(Some(" 90 ")), Some(90));
    }

    #[test]
    fn days_rejects_garbage_and_negatives() {
        assert_eq!(parse_days(Some("abc")), None);
        assert_eq!(parse_days(Some("-5")), None);
        assert_eq!(parse_days(Some("  ")), None);
        assert_eq!(parse_days(Some("7.5")), None);
        assert_eq!(parse_days(Some("+")), None);
    }

    #[test]
    fn days_saturates_large_integers() {
        assert_eq!(parse_days(Some("5000000000")), Some(u32::MAX));
        assert_eq!(
            parse_days(Some("123456789012345678901234567890")),
            Some(u32::MAX)
        );
        assert_eq!(parse_days(Some("+14")), Some(14));
    }

    #[test]
    fn lenient_days_falls_back() {
        assert_eq!(days_or_default(Some("abc")), 30);
        assert_eq!(days_or_default(Some("14")), 14);
    }

    #[test]
    fn strict_days_reports_message() {
        let err = days_strict(Some("abc")).unwrap_err();
        assert_eq!(err.to_string(), DAYS_ERROR);
        assert_eq!(days_strict(None).unwrap(), 30);
    }

    #[test]
    fn interval_parsing() {
        assert_eq!(parse_interval(None).unwrap(), HistoryInterval::Daily);
        assert_eq!(parse_interval(Some("")).unwrap(), HistoryInterval::Daily);
        assert_eq!(parse_interval(Some("weekly")).unwrap(), HistoryInterval::Weekly);
        assert_eq!(parse_interval(Some("1mo")).unwrap(), HistoryInterval::Monthly);
        let err = parse_interval(Some("hourly")).unwrap_err();
        assert_eq!(err.to_string(), INTERVAL_ERROR);
    }
}

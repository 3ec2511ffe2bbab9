use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{FixedOffset, TimeZone};
use mowi_market_data::{
    Cell, DateValue, FinancialStatementSet, HistoryInterval, MarketDataError, MarketDataProvider,
    Quote, TabularResult,
};
use mowi_server::{api::app_router, config::Config, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Canned provider that records the history arguments it was called with.
struct StubProvider {
    fail: bool,
    delay: Option<Duration>,
    history_rows: usize,
    financials: FinancialStatementSet,
    history_calls: Mutex<Vec<(u32, HistoryInterval)>>,
}

impl StubProvider {
    fn ok(history_rows: usize) -> Self {
        Self {
            fail: false,
            delay: None,
            history_rows,
            financials: FinancialStatementSet::default(),
            history_calls: Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::ok(0)
        }
    }

    fn check(&self) -> Result<(), MarketDataError> {
        if self.fail {
            Err(MarketDataError::provider("STUB", "upstream unavailable"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    fn id(&self) -> &'static str {
        "STUB"
    }

    fn symbol(&self) -> &str {
        "MOWI.OL"
    }

    async fn get_quote(&self) -> Result<Quote, MarketDataError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.check()?;
        Ok(Quote {
            symbol: Some("MOWI.OL".to_string()),
            last_price: Some(201.4),
            currency: Some("NOK".to_string()),
            ..Quote::default()
        })
    }

    async fn get_history(
        &self,
        days: u32,
        interval: HistoryInterval,
    ) -> Result<TabularResult, MarketDataError> {
        self.history_calls.lock().unwrap().push((days, interval));
        self.check()?;
        let oslo = FixedOffset::east_opt(3600).unwrap();
        let mut table = TabularResult::new(
            Some("Date"),
            ["Open", "High", "Low", "Close", "Volume", "Dividends", "Stock Splits"],
        );
        for day in 0..self.history_rows {
            let ts = oslo
                .with_ymd_and_hms(2024, 1, 2 + day as u32, 0, 0, 0)
                .unwrap();
            let base = 200.0 + day as f64;
            table.push_row(
                DateValue::Zoned(ts),
                vec![
                    Cell::from(base),
                    Cell::from(base + 2.0),
                    Cell::from(base - 1.0),
                    Cell::from(base + 1.0),
                    Cell::from(1_000_000_i64),
                    Cell::from(0.0),
                    Cell::from(0.0),
                ],
            )?;
        }
        Ok(table)
    }

    async fn get_actions(&self) -> Result<TabularResult, MarketDataError> {
        self.check()?;
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 22).unwrap();
        TabularResult::new(Some("Date"), ["Dividends", "Stock Splits"])
            .with_row(DateValue::Date(date), vec![Cell::from(1.5), Cell::from(0.0)])
    }

    async fn get_financials(&self) -> Result<FinancialStatementSet, MarketDataError> {
        self.check()?;
        Ok(self.financials.clone())
    }

    async fn get_recommendations(&self) -> Result<TabularResult, MarketDataError> {
        self.check()?;
        TabularResult::new(
            None,
            ["period", "strongBuy", "buy", "hold", "sell", "strongSell"],
        )
        .with_row(
            0_i64,
            vec![
                Cell::from("0m"),
                Cell::from(3_i64),
                Cell::from(5_i64),
                Cell::from(4_i64),
                Cell::from(1_i64),
                Cell::from(0_i64),
            ],
        )
    }
}

fn router_with(provider: Arc<StubProvider>) -> Router {
    app_router(AppState::new(provider), &Config::default())
}

async fn get(app: Router, uri: &str) -> (StatusCode, Option<String>, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, content_type, body)
}

#[tokio::test]
async fn history_returns_one_record_per_bar() {
    let provider = Arc::new(StubProvider::ok(5));
    let (status, content_type, body) =
        get(router_with(provider.clone()), "/api/GetMowiHistory?days=7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 5);
    for record in records {
        for key in ["Date", "Open", "High", "Low", "Close", "Volume"] {
            assert!(record.get(key).is_some(), "missing {key}");
        }
    }
    assert_eq!(records[0]["Date"], json!("2024-01-02T00:00:00+01:00"));
    assert_eq!(records[4]["Date"], json!("2024-01-06T00:00:00+01:00"));
    assert_eq!(records[0]["Close"], json!(201.0));
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(7, HistoryInterval::Daily)]
    );
}

#[tokio::test]
async fn history_passes_interval_through() {
    let provider = Arc::new(StubProvider::ok(1));
    let (status, _, _) = get(
        router_with(provider.clone()),
        "/api/GetMowiHistory?days=365&interval=weekly",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(365, HistoryInterval::Weekly)]
    );
}

#[tokio::test]
async fn history_defaults_to_thirty_days() {
    let provider = Arc::new(StubProvider::ok(0));
    let (status, _, body) = get(router_with(provider.clone()), "/api/GetMowiHistory").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(30, HistoryInterval::Daily)]
    );
}

#[tokio::test]
async fn history_rejects_non_integer_days() {
    let provider = Arc::new(StubProvider::ok(5));
    let (status, _, body) =
        get(router_with(provider.clone()), "/api/GetMowiHistory?days=abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Parameter 'days' must be an integer."}));
    assert!(provider.history_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn history_uses_last_repeated_days() {
    let provider = Arc::new(StubProvider::ok(1));
    let (status, _, _) = get(
        router_with(provider.clone()),
        "/api/GetMowiHistory?days=7&days=8",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(8, HistoryInterval::Daily)]
    );
}

#[tokio::test]
async fn history_accepts_days_beyond_u32() {
    let provider = Arc::new(StubProvider::ok(1));
    let (status, _, _) = get(
        router_with(provider.clone()),
        "/api/GetMowiHistory?days=5000000000",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(u32::MAX, HistoryInterval::Daily)]
    );
}

#[tokio::test]
async fn history_rejects_unknown_interval() {
    let provider = Arc::new(StubProvider::ok(5));
    let (status, _, body) = get(
        router_with(provider),
        "/api/GetMowiHistory?days=7&interval=hourly",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Parameter 'interval' must be one of: daily, weekly, monthly."})
    );
}

#[tokio::test]
async fn data_falls_back_to_thirty_days() {
    let provider = Arc::new(StubProvider::ok(2));
    let (status, _, body) = get(router_with(provider.clone()), "/api/GetMowiData?days=abc").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(30, HistoryInterval::Daily)]
    );

    assert_eq!(body["quote"]["symbol"], json!("MOWI.OL"));
    assert_eq!(body["quote"]["volume"], Value::Null);
    assert_eq!(body["history"].as_array().unwrap().len(), 2);
    assert_eq!(body["actions"][0]["Date"], json!("2024-05-22"));
    assert_eq!(body["actions"][0]["Dividends"], json!(1.5));
    assert_eq!(body["financials"]["income_statement"], json!([]));
    assert_eq!(body["recommendations"][0]["index"], json!(0));
    assert_eq!(body["recommendations"][0]["strongBuy"], json!(3));
}

#[tokio::test]
async fn data_tolerates_repeated_days() {
    let provider = Arc::new(StubProvider::ok(1));
    let (status, content_type, _) =
        get(router_with(provider.clone()), "/api/GetMowiData?days=7&days=8").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(
        provider.history_calls.lock().unwrap().as_slice(),
        &[(8, HistoryInterval::Daily)]
    );
}

#[tokio::test]
async fn slow_provider_times_out_with_error_envelope() {
    let provider = Arc::new(StubProvider {
        delay: Some(Duration::from_millis(500)),
        ..StubProvider::ok(0)
    });
    let config = Config {
        request_timeout: Duration::from_millis(20),
        ..Config::default()
    };
    let app = app_router(AppState::new(provider), &config);

    let (status, content_type, body) = get(app, "/api/GetMowiQuote").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(content_type.as_deref(), Some("application/json"));
    assert_eq!(body, json!({"error": "request timed out"}));
}

#[tokio::test]
async fn financials_with_empty_statements() {
    let provider = Arc::new(StubProvider::ok(0));
    let (status, _, body) = get(router_with(provider), "/api/GetMowiFinancials").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"income_statement": [], "balance_sheet": [], "cashflow": []})
    );
}

#[tokio::test]
async fn financial_statement_columns_are_iso_dates() {
    let period = chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let income = TabularResult::new(None, [DateValue::Date(period)])
        .with_row("totalRevenue", vec![Cell::from(5_500_000_000_i64)])
        .unwrap();
    let provider = Arc::new(StubProvider {
        financials: FinancialStatementSet {
            income_statement: income,
            ..FinancialStatementSet::default()
        },
        ..StubProvider::ok(0)
    });

    let (status, _, body) = get(router_with(provider), "/api/GetMowiFinancials").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["income_statement"],
        json!([{"index": "totalRevenue", "2023-12-31": 5_500_000_000_i64}])
    );
}

#[tokio::test]
async fn quote_and_recommendations_serialize() {
    let provider = Arc::new(StubProvider::ok(0));
    let (status, _, quote) = get(router_with(provider.clone()), "/api/GetMowiQuote").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["last_price"], json!(201.4));
    assert_eq!(quote["currency"], json!("NOK"));
    assert_eq!(quote["market_cap"], Value::Null);

    let (status, _, recs) = get(router_with(provider), "/api/GetMowiRecommendations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(recs[0]["period"], json!("0m"));
}

#[tokio::test]
async fn actions_are_keyed_by_event_date() {
    let provider = Arc::new(StubProvider::ok(0));
    let (status, _, body) = get(router_with(provider), "/api/GetMowiActions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"Date": "2024-05-22", "Dividends": 1.5, "Stock Splits": 0.0}])
    );
}

#[tokio::test]
async fn provider_failure_is_a_server_error_everywhere() {
    let provider = Arc::new(StubProvider::failing());
    for uri in [
        "/api/GetMowiData",
        "/api/GetMowiQuote",
        "/api/GetMowiHistory?days=7",
        "/api/GetMowiActions",
        "/api/GetMowiFinancials",
        "/api/GetMowiRecommendations",
    ] {
        let (status, content_type, body) = get(router_with(provider.clone()), uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(content_type.as_deref(), Some("application/json"), "{uri}");
        assert_eq!(
            body,
            json!({"error": "Provider error: STUB - upstream unavailable"}),
            "{uri}"
        );
    }
}

#[tokio::test]
async fn health_endpoints_respond() {
    let provider = Arc::new(StubProvider::ok(0));
    for uri in ["/api/healthz", "/api/readyz"] {
        let response = router_with(provider.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }
}

#[tokio::test]
async fn openapi_document_lists_endpoints() {
    let provider = Arc::new(StubProvider::ok(0));
    let (status, _, doc) = get(router_with(provider), "/api/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/GetMowiData"));
    assert!(paths.contains_key("/api/GetMowiHistory"));
    assert!(paths.contains_key("/api/healthz"));
}

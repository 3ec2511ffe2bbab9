//! Yahoo Finance API response models.
//!
//! These models are used for parsing the quoteSummary API responses, which
//! carry the quote snapshot, financial statements and recommendation trend.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container. `result` is null when `error` is set.
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    pub error: Option<YahooApiError>,
}

/// Error object returned in place of a result
#[derive(Debug, Deserialize)]
pub struct YahooApiError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API. Only requested modules are present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
    pub summary_detail: Option<YahooSummaryDetail>,
    pub income_statement_history: Option<YahooIncomeStatementHistory>,
    pub balance_sheet_history: Option<YahooBalanceSheetHistory>,
    pub cashflow_statement_history: Option<YahooCashflowStatementHistory>,
    pub recommendation_trend: Option<YahooRecommendationTrend>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
}

/// Price detail with raw and formatted values
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
    // Note: fmt field exists but we only use raw values
}

/// Summary detail data (session figures).
/// Yahoo returns these as nested objects like {"raw": 123.45, "fmt": "123.45"}
/// or empty objects {} when no data is available.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    pub previous_close: Option<YahooPriceDetail>,
    pub open: Option<YahooPriceDetail>,
    pub day_high: Option<YahooPriceDetail>,
    pub day_low: Option<YahooPriceDetail>,
    pub volume: Option<YahooPriceDetail>,
    pub market_cap: Option<YahooPriceDetail>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooIncomeStatementHistory {
    #[serde(default)]
    pub income_statement_history: Vec<YahooStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooBalanceSheetHistory {
    #[serde(default)]
    pub balance_sheet_statements: Vec<YahooStatement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooCashflowStatementHistory {
    #[serde(default)]
    pub cashflow_statements: Vec<YahooStatement>,
}

/// One fiscal period of a statement.
///
/// Line items are kept as raw JSON because their set differs per statement
/// and per company; `maxAge` bookkeeping ends up in `items` too.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooStatement {
    pub end_date: Option<YahooPriceDetail>,
    #[serde(flatten)]
    pub items: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct YahooRecommendationTrend {
    #[serde(default)]
    pub trend: Vec<YahooTrendEntry>,
}

/// Analyst counts for one period ("0m" = current month, "-1m" = previous, ...)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooTrendEntry {
    pub period: Option<String>,
    pub strong_buy: Option<i64>,
    pub buy: Option<i64>,
    pub hold: Option<i64>,
    pub sell: Option<i64>,
    pub strong_sell: Option<i64>,
}

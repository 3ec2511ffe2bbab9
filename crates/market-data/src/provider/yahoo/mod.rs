//! Yahoo Finance market data provider.
//!
//! Price history and corporate actions come from the chart API (through the
//! `yahoo_finance_api` connector). The quote snapshot, financial statements
//! and recommendation trend come from the quoteSummary API, which needs a
//! cookie/crumb pair.

mod models;

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::header;
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{
    Cell, DateValue, FinancialStatementSet, HistoryInterval, Label, Quote, TabularResult,
};
use crate::provider::MarketDataProvider;

use models::{
    YahooPriceDetail, YahooQuoteSummaryResponse, YahooQuoteSummaryResult, YahooStatement,
    YahooTrendEntry,
};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

const HISTORY_COLUMNS: [&str; 7] = [
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

const ACTION_COLUMNS: [&str; 2] = ["Dividends", "Stock Splits"];

const RECOMMENDATION_COLUMNS: [&str; 6] =
    ["period", "strongBuy", "buy", "hold", "sell", "strongSell"];

/// Index name for history and actions tables.
const DATE_INDEX: &str = "Date";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Yahoo authentication data for quoteSummary requests
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider for one ticker.
pub struct YahooProvider {
    symbol: String,
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
    /// Auth session for quoteSummary; cleared when Yahoo answers 401.
    crumb: RwLock<Option<CrumbData>>,
}

impl YahooProvider {
    /// Create a Yahoo Finance provider bound to `symbol` (e.g. "MOWI.OL").
    pub fn new(symbol: impl Into<String>) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            symbol: symbol.into(),
            connector,
            client,
            crumb: RwLock::new(None),
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = self.crumb.read().await.as_ref() {
            return Ok(crumb.clone());
        }

        let crumb = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(crumb.clone());
        Ok(crumb)
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e))
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e))
            })?
            .text()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e))
            })?;

        Ok(CrumbData { cookie, crumb })
    }

    async fn clear_crumb(&self) {
        *self.crumb.write().await = None;
    }

    // ========================================================================
    // Request Helpers
    // ========================================================================

    /// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
    fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(dt.timestamp())
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    fn map_yahoo_error(&self, e: yahoo::YahooError) -> MarketDataError {
        if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
            MarketDataError::SymbolNotFound(self.symbol.clone())
        } else {
            MarketDataError::provider(PROVIDER_ID, e.to_string())
        }
    }

    /// Query the chart API. `Ok(None)` means Yahoo had no bars in the range.
    async fn fetch_chart(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        interval: &str,
    ) -> Result<Option<yahoo::YResponse>, MarketDataError> {
        let result = self
            .connector
            .get_quote_history_interval(
                &self.symbol,
                Self::chrono_to_offset_datetime(start),
                Self::chrono_to_offset_datetime(end),
                interval,
            )
            .await;

        match result {
            Ok(response) => Ok(Some(response)),
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No quotes returned for '{}' between {} and {}",
                    self.symbol,
                    start.format("%Y-%m-%d"),
                    end.format("%Y-%m-%d")
                );
                Ok(None)
            }
            Err(e) => Err(self.map_yahoo_error(e)),
        }
    }

    /// Fetch the given quoteSummary modules for the configured symbol.
    async fn fetch_quote_summary(
        &self,
        modules: &[&str],
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "{}/{}?modules={}&crumb={}",
            QUOTE_SUMMARY_URL,
            encode(&self.symbol),
            modules.join(","),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("quoteSummary request failed: {}", e))
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb().await;
            return Err(MarketDataError::provider(
                PROVIDER_ID,
                "Yahoo authentication expired",
            ));
        }

        let status = response.status();
        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to parse quoteSummary response ({}): {}", status, e),
            )
        })?;

        if let Some(error) = data.quote_summary.error {
            return Err(match error.code.as_deref() {
                Some("Not Found") => MarketDataError::SymbolNotFound(self.symbol.clone()),
                _ => MarketDataError::provider(
                    PROVIDER_ID,
                    error
                        .description
                        .unwrap_or_else(|| format!("quoteSummary failed with {}", status)),
                ),
            });
        }

        data.quote_summary
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::SymbolNotFound(self.symbol.clone()))
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    async fn get_quote(&self) -> Result<Quote, MarketDataError> {
        debug!("Fetching quote for {} from Yahoo", self.symbol);

        let result = self.fetch_quote_summary(&["price", "summaryDetail"]).await?;
        Ok(map_quote(&result))
    }

    async fn get_history(
        &self,
        days: u32,
        interval: HistoryInterval,
    ) -> Result<TabularResult, MarketDataError> {
        let end = Utc::now();
        let start = end
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or_default();

        debug!(
            "Fetching {} history for {} from {} to {} from Yahoo",
            interval,
            self.symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let Some(response) = self.fetch_chart(start, end, interval.yahoo_code()).await? else {
            return Ok(TabularResult::new(Some(DATE_INDEX), HISTORY_COLUMNS));
        };

        let bars = match response.quotes() {
            Ok(quotes) => quotes
                .into_iter()
                .map(|q| Bar {
                    timestamp: q.timestamp as i64,
                    open: q.open as f64,
                    high: q.high as f64,
                    low: q.low as f64,
                    close: q.close as f64,
                    volume: q.volume as u64,
                })
                .collect(),
            Err(yahoo::YahooError::NoQuotes) => Vec::new(),
            Err(e) => return Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        };

        history_table(bars, &CorporateEvents::from_response(&response))
    }

    async fn get_actions(&self) -> Result<TabularResult, MarketDataError> {
        debug!("Fetching dividends and splits for {} from Yahoo", self.symbol);

        match self
            .fetch_chart(DateTime::<Utc>::default(), Utc::now(), "1d")
            .await?
        {
            Some(response) => CorporateEvents::from_response(&response).into_table(),
            None => Ok(TabularResult::new(Some(DATE_INDEX), ACTION_COLUMNS)),
        }
    }

    async fn get_financials(&self) -> Result<FinancialStatementSet, MarketDataError> {
        debug!("Fetching financial statements for {} from Yahoo", self.symbol);

        let result = self
            .fetch_quote_summary(&[
                "incomeStatementHistory",
                "balanceSheetHistory",
                "cashflowStatementHistory",
            ])
            .await?;

        Ok(FinancialStatementSet {
            income_statement: statement_table(
                result
                    .income_statement_history
                    .as_ref()
                    .map(|h| h.income_statement_history.as_slice())
                    .unwrap_or_default(),
            )?,
            balance_sheet: statement_table(
                result
                    .balance_sheet_history
                    .as_ref()
                    .map(|h| h.balance_sheet_statements.as_slice())
                    .unwrap_or_default(),
            )?,
            cashflow: statement_table(
                result
                    .cashflow_statement_history
                    .as_ref()
                    .map(|h| h.cashflow_statements.as_slice())
                    .unwrap_or_default(),
            )?,
        })
    }

    async fn get_recommendations(&self) -> Result<TabularResult, MarketDataError> {
        debug!("Fetching recommendation trend for {} from Yahoo", self.symbol);

        let result = self.fetch_quote_summary(&["recommendationTrend"]).await?;
        recommendation_table(
            result
                .recommendation_trend
                .as_ref()
                .map(|t| t.trend.as_slice())
                .unwrap_or_default(),
        )
    }
}

// ============================================================================
// Table Builders
// ============================================================================

/// One OHLCV bar from the chart API.
#[derive(Debug, Clone, Copy)]
struct Bar {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Dividends and split ratios keyed by event date.
#[derive(Debug, Default)]
struct CorporateEvents {
    dividends: BTreeMap<NaiveDate, f64>,
    splits: BTreeMap<NaiveDate, f64>,
}

impl CorporateEvents {
    /// `dividends` are `(timestamp, amount)`, `splits` are `(timestamp, ratio)`.
    fn new(
        dividends: impl IntoIterator<Item = (i64, f64)>,
        splits: impl IntoIterator<Item = (i64, f64)>,
    ) -> Self {
        fn by_date(events: impl IntoIterator<Item = (i64, f64)>) -> BTreeMap<NaiveDate, f64> {
            events
                .into_iter()
                .filter_map(|(ts, value)| Some((DateValue::from_timestamp(ts)?.date(), value)))
                .collect()
        }

        Self {
            dividends: by_date(dividends),
            splits: by_date(splits),
        }
    }

    fn from_response(response: &yahoo::YResponse) -> Self {
        let dividends = response.dividends().unwrap_or_default();
        let splits = response.splits().unwrap_or_default();
        Self::new(
            dividends.iter().map(|d| (d.date as i64, d.amount as f64)),
            splits.iter().filter_map(|s| {
                let denominator = s.denominator as f64;
                (denominator != 0.0).then(|| (s.date as i64, s.numerator as f64 / denominator))
            }),
        )
    }

    fn dividend_on(&self, date: NaiveDate) -> f64 {
        self.dividends.get(&date).copied().unwrap_or(0.0)
    }

    fn split_on(&self, date: NaiveDate) -> f64 {
        self.splits.get(&date).copied().unwrap_or(0.0)
    }

    /// One row per distinct event date, ascending.
    fn into_table(self) -> Result<TabularResult, MarketDataError> {
        let dates: BTreeSet<NaiveDate> = self
            .dividends
            .keys()
            .chain(self.splits.keys())
            .copied()
            .collect();

        let mut table = TabularResult::new(Some(DATE_INDEX), ACTION_COLUMNS);
        for date in dates {
            table.push_row(
                DateValue::Date(date),
                vec![
                    Cell::from(self.dividend_on(date)),
                    Cell::from(self.split_on(date)),
                ],
            )?;
        }
        Ok(table)
    }
}

fn history_table(
    mut bars: Vec<Bar>,
    events: &CorporateEvents,
) -> Result<TabularResult, MarketDataError> {
    bars.sort_by_key(|bar| bar.timestamp);

    let mut table = TabularResult::new(Some(DATE_INDEX), HISTORY_COLUMNS);
    for bar in bars {
        let date = DateValue::from_timestamp(bar.timestamp).ok_or_else(|| {
            MarketDataError::MalformedData(format!("Invalid timestamp: {}", bar.timestamp))
        })?;
        table.push_row(
            date,
            vec![
                Cell::from(bar.open),
                Cell::from(bar.high),
                Cell::from(bar.low),
                Cell::from(bar.close),
                Cell::from(bar.volume),
                Cell::from(events.dividend_on(date.date())),
                Cell::from(events.split_on(date.date())),
            ],
        )?;
    }
    Ok(table)
}

/// Lays a statement out with line items as rows and fiscal period end dates
/// as columns, newest period first as Yahoo returns them.
fn statement_table(statements: &[YahooStatement]) -> Result<TabularResult, MarketDataError> {
    let periods: Vec<(NaiveDate, &YahooStatement)> = statements
        .iter()
        .filter_map(|s| {
            let ts = raw(&s.end_date)? as i64;
            Some((DateValue::from_timestamp(ts)?.date(), s))
        })
        .collect();

    let line_items: BTreeSet<&str> = periods
        .iter()
        .flat_map(|(_, s)| s.items.keys().map(String::as_str))
        .filter(|key| *key != "maxAge")
        .collect();

    let mut table = TabularResult::new(None, periods.iter().map(|(date, _)| Label::from(*date)));
    for item in line_items {
        let values = periods
            .iter()
            .map(|(_, s)| Cell::from(s.items.get(item).and_then(raw_number)))
            .collect();
        table.push_row(item, values)?;
    }
    Ok(table)
}

fn recommendation_table(trend: &[YahooTrendEntry]) -> Result<TabularResult, MarketDataError> {
    let mut table = TabularResult::new(None, RECOMMENDATION_COLUMNS);
    for (position, entry) in trend.iter().enumerate() {
        table.push_row(
            position,
            vec![
                Cell::from(entry.period.clone()),
                Cell::from(entry.strong_buy),
                Cell::from(entry.buy),
                Cell::from(entry.hold),
                Cell::from(entry.sell),
                Cell::from(entry.strong_sell),
            ],
        )?;
    }
    Ok(table)
}

fn map_quote(result: &YahooQuoteSummaryResult) -> Quote {
    let price = result.price.as_ref();
    let detail = result.summary_detail.as_ref();

    Quote {
        symbol: price.and_then(|p| p.symbol.clone()),
        last_price: price.and_then(|p| raw(&p.regular_market_price)),
        previous_close: detail.and_then(|d| raw(&d.previous_close)),
        open: detail.and_then(|d| raw(&d.open)),
        day_high: detail.and_then(|d| raw(&d.day_high)),
        day_low: detail.and_then(|d| raw(&d.day_low)),
        volume: detail.and_then(|d| raw(&d.volume)).and_then(as_count),
        market_cap: detail.and_then(|d| raw(&d.market_cap)).and_then(as_count),
        currency: price.and_then(|p| p.currency.clone()),
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn raw(detail: &Option<YahooPriceDetail>) -> Option<f64> {
    detail.as_ref().and_then(|d| d.raw)
}

/// Numeric value of a statement line item: `{"raw": n, ...}` or a bare number.
fn raw_number(value: &Value) -> Option<f64> {
    value
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64())
}

fn as_count(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.round() as u64)
}

// ============================================================================
// Tests
// ============================================================================

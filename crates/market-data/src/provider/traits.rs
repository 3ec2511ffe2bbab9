//! Market data provider trait definitions.
//!
//! This module defines the `MarketDataProvider` trait, the client contract
//! for fetching data about one security.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{FinancialStatementSet, HistoryInterval, Quote, TabularResult};

/// Trait for market data providers.
///
/// A provider is bound to a single ticker when it is constructed; every
/// method fetches data for that ticker. Implementations issue network
/// requests on each call and keep no data between calls.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use mowi_market_data::MarketDataProvider;
///
/// struct MyProvider {
///     symbol: String,
/// }
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn symbol(&self) -> &str {
///         &self.symbol
///     }
///
///     // ... implement the fetch methods
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider, e.g. "YAHOO".
    fn id(&self) -> &'static str;

    /// Ticker this provider was constructed for.
    fn symbol(&self) -> &str;

    /// Fetch the current market snapshot.
    async fn get_quote(&self) -> Result<Quote, MarketDataError>;

    /// Fetch price history for the last `days` days up to today.
    ///
    /// The table is indexed by `Date` and ordered by timestamp ascending.
    /// A range without trading data yields an empty table.
    async fn get_history(
        &self,
        days: u32,
        interval: HistoryInterval,
    ) -> Result<TabularResult, MarketDataError>;

    /// Fetch dividends and stock splits, indexed by event date.
    async fn get_actions(&self) -> Result<TabularResult, MarketDataError>;

    /// Fetch the income statement, balance sheet and cashflow statement.
    async fn get_financials(&self) -> Result<FinancialStatementSet, MarketDataError>;

    /// Fetch the analyst recommendation trend.
    async fn get_recommendations(&self) -> Result<TabularResult, MarketDataError>;
}

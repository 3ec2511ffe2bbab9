use serde::{Deserialize, Serialize};

/// Market snapshot for the configured ticker.
///
/// Every field is optional: a value missing upstream is reported as `null`
/// instead of failing the whole quote.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Ticker as echoed by the provider (e.g., "MOWI.OL")
    pub symbol: Option<String>,

    /// Regular market price
    pub last_price: Option<f64>,

    /// Previous session close
    pub previous_close: Option<f64>,

    /// Session open
    pub open: Option<f64>,

    /// Session high
    pub day_high: Option<f64>,

    /// Session low
    pub day_low: Option<f64>,

    /// Session volume
    pub volume: Option<u64>,

    /// Market capitalization in quote currency
    pub market_cap: Option<u64>,

    /// Quote currency (ISO 4217)
    pub currency: Option<String>,
}

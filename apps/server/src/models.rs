use mowi_market_data::{Quote, Record, StatementRecords};
use serde::{Deserialize, Serialize};

/// Combined payload of `GetMowiData`.
#[derive(Debug, Serialize)]
pub struct MowiData {
    pub quote: Quote,
    pub history: Vec<Record>,
    pub actions: Vec<Record>,
    pub financials: StatementRecords,
    pub recommendations: Vec<Record>,
}

/// Raw query string pairs.
///
/// Values stay strings so each endpoint can apply its own parsing policy, and
/// extraction never rejects a request. A repeated key resolves to its last value.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

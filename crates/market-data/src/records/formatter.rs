use serde::Serialize;

use crate::errors::MarketDataError;

/// Encodes a payload as JSON text.
///
/// Every [`DateValue`](crate::DateValue) in the payload, whether a map key or
/// a value, is written as its ISO-8601 string. Fails with
/// [`MarketDataError::Serialization`] when the payload has no JSON form.
pub fn to_json<T>(value: &T) -> Result<String, MarketDataError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(MarketDataError::from)
}

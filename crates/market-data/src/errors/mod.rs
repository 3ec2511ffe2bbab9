//! Error types for the market data crate.
//!
//! [`MarketDataError`] covers two failure classes:
//! - provider failures (network, unknown symbol, malformed upstream data)
//! - serialization failures raised while encoding records as JSON

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload could not be shaped into a table.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A value could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketDataError {
    /// Shorthand for a [`MarketDataError::ProviderError`].
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Returns true when the failure happened while encoding output rather
    /// than while talking to the provider.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }
}

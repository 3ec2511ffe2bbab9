//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `quote` - Market snapshot for one ticker (Quote)
//! - `table` - Tabular provider results (TabularResult, Cell, Label, DateValue)
//! - `financials` - The three financial statement tables (FinancialStatementSet)
//! - `types` - Request parameters (HistoryInterval)

mod financials;
mod quote;
mod table;
mod types;

pub use financials::FinancialStatementSet;
pub use quote::Quote;
pub use table::{Cell, DateValue, Label, TabularResult};
pub use types::{HistoryInterval, UnknownInterval};

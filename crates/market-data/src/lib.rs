//! Mowi Market Data Crate
//!
//! This crate fetches market data for a single security and reshapes it
//! into JSON-ready records.
//!
//! # Overview
//!
//! The crate supports:
//! - A provider-agnostic client contract ([`MarketDataProvider`]) with a Yahoo Finance
//!   implementation ([`YahooProvider`]) bound to one ticker at construction
//! - Tabular results with an explicit date variant ([`DateValue`]) for every date-like value
//! - Row normalization into ordered [`Record`]s and JSON encoding with ISO-8601 dates
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |    Provider      | --> |  TabularResult   |  (row index + labelled columns)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |   to_records     |  (index promotion, label renaming)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |     to_json      |  (ISO-8601 for every DateValue)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Quote`] - Market snapshot for the configured ticker
//! - [`TabularResult`] - Row-indexed, column-labelled provider data
//! - [`FinancialStatementSet`] - Income statement, balance sheet and cashflow tables
//! - [`Record`] - One flattened row, ready for JSON encoding

pub mod errors;
pub mod models;
pub mod provider;
pub mod records;

pub use errors::MarketDataError;

pub use models::{
    Cell, DateValue, FinancialStatementSet, HistoryInterval, Label, Quote, TabularResult,
    UnknownInterval,
};

pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;

pub use records::{to_json, to_records, Record, StatementRecords, DEFAULT_INDEX_LABEL};

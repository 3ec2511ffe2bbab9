//! Record normalization and JSON encoding.
//!
//! - [`to_records`] flattens a [`TabularResult`](crate::TabularResult) into ordered records
//! - [`to_json`] encodes any serializable payload, dates included, as JSON text

mod formatter;
mod normalizer;

pub use formatter::to_json;
pub use normalizer::{to_records, Record, StatementRecords, DEFAULT_INDEX_LABEL};

//! Tabular provider results.
//!
//! A [`TabularResult`] is a row index plus an ordered list of column labels,
//! holding one [`Cell`] per (row, column). Date-like values, whether they show
//! up as index values, cells or column labels, are always a [`DateValue`].

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

use crate::errors::MarketDataError;

// ============================================================================
// DateValue
// ============================================================================

/// A date-like value.
///
/// All date and datetime representations funnel through this type so that
/// there is exactly one ISO-8601 conversion ([`DateValue::to_iso8601`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateValue {
    /// Calendar date, rendered as `YYYY-MM-DD`
    Date(NaiveDate),
    /// Datetime without offset, rendered as `YYYY-MM-DDTHH:MM:SS`
    DateTime(NaiveDateTime),
    /// Datetime with offset, rendered as `YYYY-MM-DDTHH:MM:SS+HH:MM`
    Zoned(DateTime<FixedOffset>),
}

impl DateValue {
    /// Builds a UTC datetime from a unix timestamp in seconds.
    pub fn from_timestamp(secs: i64) -> Option<Self> {
        DateTime::from_timestamp(secs, 0).map(|dt| Self::Zoned(dt.fixed_offset()))
    }

    /// ISO-8601 form. Fractional seconds are only printed when non-zero.
    pub fn to_iso8601(&self) -> String {
        match self {
            Self::Date(date) => date.format("%Y-%m-%d").to_string(),
            Self::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
            Self::Zoned(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f%:z").to_string(),
        }
    }

    /// Calendar date part, ignoring any time of day.
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Date(date) => *date,
            Self::DateTime(dt) => dt.date(),
            Self::Zoned(dt) => dt.date_naive(),
        }
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(dt: NaiveDateTime) -> Self {
        Self::DateTime(dt)
    }
}

impl From<DateTime<FixedOffset>> for DateValue {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Self::Zoned(dt)
    }
}

// ============================================================================
// Cell
// ============================================================================

/// One value in a table, either in the row index or in a column.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    /// Non-finite numbers are emitted as `null`.
    Number(f64),
    Text(String),
    Date(DateValue),
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_unit(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            Cell::Number(_) => serializer.serialize_unit(),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Date(d) => d.serialize(serializer),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<u64> for Cell {
    fn from(u: u64) -> Self {
        i64::try_from(u)
            .map(Cell::Int)
            .unwrap_or(Cell::Number(u as f64))
    }
}

impl From<usize> for Cell {
    fn from(u: usize) -> Self {
        Cell::from(u as u64)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<DateValue> for Cell {
    fn from(d: DateValue) -> Self {
        Cell::Date(d)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Null)
    }
}

// ============================================================================
// Label
// ============================================================================

/// A column label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Label {
    Text(String),
    Int(i64),
    Date(DateValue),
}

impl Label {
    /// Field name used for this column in a record: ISO-8601 for dates,
    /// the plain string form otherwise.
    pub fn render(&self) -> String {
        match self {
            Label::Text(s) => s.clone(),
            Label::Int(i) => i.to_string(),
            Label::Date(d) => d.to_iso8601(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl From<i64> for Label {
    fn from(i: i64) -> Self {
        Label::Int(i)
    }
}

impl From<DateValue> for Label {
    fn from(d: DateValue) -> Self {
        Label::Date(d)
    }
}

impl From<NaiveDate> for Label {
    fn from(date: NaiveDate) -> Self {
        Label::Date(DateValue::Date(date))
    }
}

// ============================================================================
// TabularResult
// ============================================================================

/// Row-indexed, column-labelled data returned by a provider.
///
/// Rows are stored in insertion order and every row has exactly one cell per
/// column. Once handed out by a provider the table is only read.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TabularResult {
    index_name: Option<String>,
    columns: Vec<Label>,
    index: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
}

impl TabularResult {
    /// Creates an empty table with the given index name and columns.
    pub fn new<I, L>(index_name: Option<&str>, columns: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self {
            index_name: index_name.map(str::to_string),
            columns: columns.into_iter().map(Into::into).collect(),
            index: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Fails when the row width differs from the column count.
    pub fn push_row(
        &mut self,
        index: impl Into<Cell>,
        values: Vec<Cell>,
    ) -> Result<(), MarketDataError> {
        if values.len() != self.columns.len() {
            return Err(MarketDataError::MalformedData(format!(
                "row has {} cells, expected {}",
                values.len(),
                self.columns.len()
            )));
        }
        self.index.push(index.into());
        self.rows.push(values);
        Ok(())
    }

    /// Builder form of [`push_row`](Self::push_row).
    pub fn with_row(
        mut self,
        index: impl Into<Cell>,
        values: Vec<Cell>,
    ) -> Result<Self, MarketDataError> {
        self.push_row(index, values)?;
        Ok(self)
    }

    pub fn index_name(&self) -> Option<&str> {
        self.index_name.as_deref()
    }

    pub fn columns(&self) -> &[Label] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates `(index value, row cells)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (&Cell, &[Cell])> {
        self.index
            .iter()
            .zip(self.rows.iter().map(Vec::as_slice))
    }
}

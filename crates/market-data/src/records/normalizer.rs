use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::{Cell, FinancialStatementSet, Label, TabularResult};

/// Field name given to an unnamed row index.
pub const DEFAULT_INDEX_LABEL: &str = "index";

/// Fallback when an unnamed index would clash with an existing `index` column.
const FALLBACK_INDEX_LABEL: &str = "level_0";

/// One flattened table row.
///
/// Keys keep insertion order. Inserting a key that is already present
/// replaces its value in place, so colliding labels resolve to the last write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Cell)>,
}

impl Record {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Cell) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Cell> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Flattens a table into one [`Record`] per row, in row order.
///
/// The row index becomes the first field, named after the index or
/// [`DEFAULT_INDEX_LABEL`] when unnamed. Column labels become field names:
/// dates in ISO-8601, everything else in plain string form.
pub fn to_records(table: &TabularResult) -> Vec<Record> {
    let labels: Vec<String> = table.columns().iter().map(Label::render).collect();
    let index_label = match table.index_name() {
        Some(name) => name.to_string(),
        None if labels.iter().any(|l| l == DEFAULT_INDEX_LABEL) => {
            FALLBACK_INDEX_LABEL.to_string()
        }
        None => DEFAULT_INDEX_LABEL.to_string(),
    };

    table
        .rows()
        .map(|(index, cells)| {
            let mut record = Record::with_capacity(labels.len() + 1);
            record.insert(index_label.clone(), index.clone());
            for (label, cell) in labels.iter().zip(cells) {
                record.insert(label.clone(), cell.clone());
            }
            record
        })
        .collect()
}

/// Normalized financial statements, serialized as
/// `{ "income_statement": [...], "balance_sheet": [...], "cashflow": [...] }`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StatementRecords {
    pub income_statement: Vec<Record>,
    pub balance_sheet: Vec<Record>,
    pub cashflow: Vec<Record>,
}

impl From<&FinancialStatementSet> for StatementRecords {
    fn from(set: &FinancialStatementSet) -> Self {
        Self {
            income_statement: to_records(&set.income_statement),
            balance_sheet: to_records(&set.balance_sheet),
            cashflow: to_records(&set.cashflow),
        }
    }
}

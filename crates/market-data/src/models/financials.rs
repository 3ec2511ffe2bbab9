use super::table::TabularResult;

/// Annual income statement, balance sheet and cashflow for a security.
///
/// Each table has one row per line item and one column per fiscal period,
/// labelled by the period end date.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FinancialStatementSet {
    pub income_statement: TabularResult,
    pub balance_sheet: TabularResult,
    pub cashflow: TabularResult,
}

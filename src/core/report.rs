//! Report generation business logic.
//!
//! Builds the summary rows that head the exported report and formats amounts
//! for display. Serialising the rows and raw lists to CSV is left to the
//! export collaborator; this module only decides what goes in them.

use crate::core::{dashboard::Snapshot, metrics};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One `Metric, Value` line of the report summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    /// Metric label
    pub metric: String,
    /// Formatted value
    pub value: String,
}

impl SummaryRow {
    fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

/// Builds the summary rows for a snapshot.
///
/// Amounts use two decimals and the metric labels carry the currency symbol,
/// e.g. `Total Received (₹)`.
#[must_use]
pub fn summary_rows(
    snapshot: &Snapshot,
    currency_symbol: &str,
    generated_at: NaiveDateTime,
) -> Vec<SummaryRow> {
    let total_received = metrics::sum_amounts(&snapshot.payments);
    let total_expenses = metrics::sum_amounts(&snapshot.expenses);
    let net = metrics::net_balance(total_received, total_expenses);

    vec![
        SummaryRow::new("Total Students", snapshot.students.len().to_string()),
        SummaryRow::new(
            format!("Total Received ({currency_symbol})"),
            format!("{total_received:.2}"),
        ),
        SummaryRow::new(
            format!("Total Expenses ({currency_symbol})"),
            format!("{total_expenses:.2}"),
        ),
        SummaryRow::new(
            format!("Net Profit/Loss ({currency_symbol})"),
            format!("{net:.2}"),
        ),
        SummaryRow::new(
            "Report Generated On",
            generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    ]
}

/// File name offered for a report downloaded on `date`.
#[must_use]
pub fn report_file_name(date: NaiveDate) -> String {
    format!("Library_Report_{}.csv", date.format("%Y-%m-%d"))
}

/// Formats an amount with the currency symbol and two decimals.
///
/// Negative amounts put the sign before the symbol: `-₹20.00`.
#[must_use]
pub fn format_amount(amount: f64, currency_symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{currency_symbol}{:.2}", amount.abs())
    } else {
        format!("{currency_symbol}{amount:.2}")
    }
}

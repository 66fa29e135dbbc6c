//! Ingestion boundary for loosely typed records.
//!
//! Rows exported from the hosted backend arrive as JSON where numbers may be
//! strings, fields may be missing and labels may be anything. This module
//! accepts all of that and produces strict [`Student`], [`Payment`] and
//! [`Expense`] values. Numeric garbage becomes `0.0`; only a document that is
//! not a JSON array is an error.

use crate::{
    errors::{Error, Result},
    models::{Expense, ExpenseCategory, Payment, PaymentMethod, Student, StudentStatus},
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

/// A student row exactly as the backend returned it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawStudent {
    /// Row id
    pub id: Value,
    /// Display name
    pub full_name: Value,
    /// Contact email
    pub email: Value,
    /// Contact phone
    pub phone: Value,
    /// Signed balance
    pub balance: Value,
    /// Outstanding dues
    pub due_amount: Value,
    /// Status label
    pub status: Value,
    /// Registration date
    pub registration_date: Value,
    /// Last visit date
    pub last_visit: Value,
}

/// A payment row exactly as the backend returned it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawPayment {
    /// Row id
    pub id: Value,
    /// Amount received
    pub amount: Value,
    /// Method label
    pub payment_method: Value,
    /// Student identifier text
    pub student_id: Value,
    /// Student name text
    pub student_name: Value,
    /// Free-text description
    pub description: Value,
    /// Display-only status
    pub status: Value,
    /// Creation timestamp
    pub created_at: Value,
}

/// An expense row exactly as the backend returned it.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawExpense {
    /// Row id
    pub id: Value,
    /// Amount spent
    pub amount: Value,
    /// Category label
    pub category: Value,
    /// Description
    pub description: Value,
    /// Notes
    pub notes: Value,
    /// Creation timestamp
    pub created_at: Value,
}

/// Best-effort numeric coercion: numbers pass through, numeric strings are
/// parsed, everything else (including NaN and infinities) is `0.0`.
///
/// Numbers keep their source text until here, so a literal too large for
/// `f64` zeroes only its own field.
#[must_use]
pub fn coerce_amount(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Text fields accept strings and numbers; anything else is absent.
#[must_use]
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Ids accept integers and integer strings.
#[must_use]
pub fn coerce_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (taken as UTC) and
/// bare `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn coerce_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let Value::String(text) = value else {
        return None;
    };
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parses a calendar date, accepting full timestamps too.
#[must_use]
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    let bare = match value {
        Value::String(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok(),
        _ => None,
    };
    bare.or_else(|| coerce_timestamp(value).map(|ts| ts.date_naive()))
}

impl From<RawStudent> for Student {
    fn from(raw: RawStudent) -> Self {
        Self {
            id: coerce_id(&raw.id),
            full_name: coerce_text(&raw.full_name).unwrap_or_default(),
            email: coerce_text(&raw.email).unwrap_or_default(),
            phone: coerce_text(&raw.phone).unwrap_or_default(),
            balance: coerce_amount(&raw.balance),
            due_amount: coerce_amount(&raw.due_amount),
            status: coerce_text(&raw.status).and_then(|s| StudentStatus::parse(&s)),
            registration_date: coerce_date(&raw.registration_date),
            last_visit: coerce_date(&raw.last_visit),
        }
    }
}

impl From<RawPayment> for Payment {
    fn from(raw: RawPayment) -> Self {
        Self {
            id: coerce_id(&raw.id),
            amount: coerce_amount(&raw.amount),
            method: PaymentMethod::parse(&coerce_text(&raw.payment_method).unwrap_or_default()),
            student_ref: coerce_text(&raw.student_id).unwrap_or_default(),
            student_name: coerce_text(&raw.student_name).unwrap_or_default(),
            description: coerce_text(&raw.description).unwrap_or_default(),
            status: coerce_text(&raw.status).unwrap_or_default(),
            created_at: coerce_timestamp(&raw.created_at),
        }
    }
}

impl From<RawExpense> for Expense {
    fn from(raw: RawExpense) -> Self {
        Self {
            id: coerce_id(&raw.id),
            amount: coerce_amount(&raw.amount),
            category: ExpenseCategory::from_label(coerce_text(&raw.category).as_deref()),
            description: coerce_text(&raw.description).unwrap_or_default(),
            notes: coerce_text(&raw.notes).unwrap_or_default(),
            created_at: coerce_timestamp(&raw.created_at),
        }
    }
}

fn ingest_array<R, T>(json: &str, kind: &'static str) -> Result<Vec<T>>
where
    R: DeserializeOwned,
    T: From<R>,
{
    let document: Value = serde_json::from_str(json).map_err(|e| Error::Ingest {
        message: format!("Failed to parse {kind} document: {e}"),
    })?;

    let Value::Array(items) = document else {
        return Err(Error::Ingest {
            message: format!("Expected a JSON array of {kind}"),
        });
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<R>(item) {
            Ok(raw) => Some(T::from(raw)),
            Err(e) => {
                warn!(index, error = %e, "Skipping malformed {} record", kind);
                None
            }
        })
        .collect();

    debug!("Ingested {} of {} {} records", records.len(), total, kind);
    Ok(records)
}

/// Parses a JSON array of student rows.
///
/// # Errors
/// Returns [`Error::Ingest`] if `json` is not a JSON array.
pub fn ingest_students(json: &str) -> Result<Vec<Student>> {
    ingest_array::<RawStudent, Student>(json, "students")
}

/// Parses a JSON array of payment rows.
///
/// # Errors
/// Returns [`Error::Ingest`] if `json` is not a JSON array.
pub fn ingest_payments(json: &str) -> Result<Vec<Payment>> {
    ingest_array::<RawPayment, Payment>(json, "payments")
}

/// Parses a JSON array of expense rows.
///
/// # Errors
/// Returns [`Error::Ingest`] if `json` is not a JSON array.
pub fn ingest_expenses(json: &str) -> Result<Vec<Expense>> {
    ingest_array::<RawExpense, Expense>(json, "expenses")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_amount() {
        assert_eq!(coerce_amount(&json!(12.5)), 12.5);
        assert_eq!(coerce_amount(&json!(" 40 ")), 40.0);
        assert_eq!(coerce_amount(&json!("bad")), 0.0);
        assert_eq!(coerce_amount(&json!("NaN")), 0.0);
        assert_eq!(coerce_amount(&json!("inf")), 0.0);
        assert_eq!(coerce_amount(&Value::Null), 0.0);
        assert_eq!(coerce_amount(&json!(true)), 0.0);
        assert_eq!(coerce_amount(&json!({"amount": 5})), 0.0);
    }

    #[test]
    fn test_coerce_timestamp_formats() {
        let rfc = coerce_timestamp(&json!("2025-03-01T10:00:00.123456+05:30")).unwrap();
        assert_eq!(rfc.to_rfc3339(), "2025-03-01T04:30:00.123456+00:00");

        let naive = coerce_timestamp(&json!("2025-03-01T10:00:00")).unwrap();
        assert_eq!(naive.to_rfc3339(), "2025-03-01T10:00:00+00:00");

        let date_only = coerce_timestamp(&json!("2025-03-01")).unwrap();
        assert_eq!(date_only.to_rfc3339(), "2025-03-01T00:00:00+00:00");

        assert!(coerce_timestamp(&json!("yesterday")).is_none());
        assert!(coerce_timestamp(&json!(1_700_000_000)).is_none());
    }

    #[test]
    fn test_coerce_date_accepts_timestamps() {
        assert_eq!(
            coerce_date(&json!("2025-01-05")),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(
            coerce_date(&json!("2025-01-05T23:00:00Z")),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
        assert_eq!(coerce_date(&Value::Null), None);
    }

    #[test]
    fn test_ingest_students_coerces_fields() {
        let students = ingest_students(
            r#"[
                {"id": 1, "full_name": "Asha", "email": "a@x.in", "phone": 98765,
                 "balance": "-250.5", "due_amount": "250.5", "status": "Active",
                 "registration_date": "2025-01-05"},
                {"id": "2", "full_name": "Ravi", "balance": null, "status": "Paused"}
            ]"#,
        )
        .unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].id, Some(1));
        assert_eq!(students[0].phone, "98765");
        assert_eq!(students[0].balance, -250.5);
        assert_eq!(students[0].due_amount, 250.5);
        assert_eq!(students[0].status, Some(StudentStatus::Active));
        assert!(students[0].has_dues());

        assert_eq!(students[1].id, Some(2));
        assert_eq!(students[1].balance, 0.0);
        assert_eq!(students[1].due_amount, 0.0);
        assert_eq!(students[1].status, None);
    }

    #[test]
    fn test_ingest_payments_keeps_unknown_methods() {
        let payments = ingest_payments(
            r#"[{"amount": "100", "payment_method": "Cash", "student_name": "Asha",
                 "created_at": "2025-03-02T08:00:00Z"},
                {"amount": 20, "payment_method": "UPI"}]"#,
        )
        .unwrap();

        assert_eq!(payments[0].method, PaymentMethod::Cash);
        assert_eq!(payments[0].amount, 100.0);
        assert!(payments[0].created_at.is_some());
        assert_eq!(payments[1].method, PaymentMethod::Other("UPI".to_string()));
        assert!(payments[1].created_at.is_none());
    }

    #[test]
    fn test_ingest_skips_non_object_elements() {
        let expenses =
            ingest_expenses(r#"[{"amount": 5, "category": "Rent"}, 42, "junk", null]"#).unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].category, ExpenseCategory::Rent);
    }

    #[test]
    fn test_ingest_out_of_range_number_only_zeroes_its_field() {
        let payments = ingest_payments(
            r#"[{"amount": 1e999, "payment_method": "Cash"},
                {"amount": 5, "payment_method": "Cash"},
                {"amount": -1e400, "payment_method": "Online"}]"#,
        )
        .unwrap();

        assert_eq!(payments.len(), 3);
        assert_eq!(payments[0].amount, 0.0);
        assert_eq!(payments[1].amount, 5.0);
        assert_eq!(payments[2].amount, 0.0);
    }

    #[test]
    fn test_ingest_keeps_unknown_expense_categories() {
        let expenses =
            ingest_expenses(r#"[{"amount": 5, "category": "Snacks"}, {"amount": 2, "category": ""}]"#)
                .unwrap();
        assert_eq!(
            expenses[0].category,
            ExpenseCategory::Custom("Snacks".to_string())
        );
        assert_eq!(expenses[1].category, ExpenseCategory::Other);
    }

    #[test]
    fn test_ingest_rejects_non_array_documents() {
        assert!(matches!(
            ingest_payments(r#"{"amount": 5}"#),
            Err(Error::Ingest { .. })
        ));
        assert!(matches!(ingest_payments("not json"), Err(Error::Ingest { .. })));
    }

    #[test]
    fn test_ingest_empty_array() {
        assert!(ingest_students("[]").unwrap().is_empty());
    }
}

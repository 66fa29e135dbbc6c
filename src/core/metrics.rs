//! Financial aggregation engine.
//!
//! Pure reducers over snapshots of students, payments and expenses. Nothing in
//! this module touches the database or keeps state between calls, and no
//! function here can fail: non-finite amounts count as zero and empty inputs
//! produce zeroed results.

use crate::models::{
    Expense, ExpenseCategory, Payment, PaymentMethod, Student, StudentStatus, finite_or_zero,
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Serialize, Serializer, ser::SerializeMap};
use std::borrow::Borrow;

/// A record carrying a monetary amount.
pub trait Amounted {
    /// The record's amount
    fn amount(&self) -> f64;
}

/// A record carrying a creation timestamp.
pub trait Dated {
    /// When the record was created, if known
    fn created_at(&self) -> Option<DateTime<Utc>>;
}

impl<T: Amounted + ?Sized> Amounted for &T {
    fn amount(&self) -> f64 {
        (**self).amount()
    }
}

impl<T: Dated + ?Sized> Dated for &T {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        (**self).created_at()
    }
}

impl Amounted for Payment {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Dated for Payment {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

impl Dated for Expense {
    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Head counts shown on the students panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StudentCounts {
    /// Every student in the snapshot
    pub total: usize,
    /// Students whose status is exactly `Active`
    pub active: usize,
    /// Students whose status is exactly `Inactive`
    pub inactive: usize,
    /// Students with a negative balance
    pub with_dues: usize,
}

/// Payment totals split by method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MethodBreakdown {
    /// Sum of `Cash` payments
    pub cash: f64,
    /// Sum of `Online` payments
    pub online: f64,
    /// Sum of payments with any other method; not part of either bucket
    pub unclassified: f64,
}

impl MethodBreakdown {
    /// Sum across all three buckets
    #[must_use]
    pub fn total(&self) -> f64 {
        self.cash + self.online + self.unclassified
    }
}

/// Expense totals per category, in order of first appearance.
///
/// Serializes as a `label -> amount` map in the same order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown {
    entries: Vec<(ExpenseCategory, f64)>,
}

impl CategoryBreakdown {
    /// Summed amount for `category`, or `None` if no expense used it
    #[must_use]
    pub fn get(&self, category: &ExpenseCategory) -> Option<f64> {
        self.entries
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, amount)| *amount)
    }

    /// Iterates `(category, amount)` pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&ExpenseCategory, f64)> + '_ {
        self.entries.iter().map(|(category, amount)| (category, *amount))
    }

    /// Number of distinct categories seen
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no expenses were aggregated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn add(&mut self, category: &ExpenseCategory, amount: f64) {
        if let Some((_, total)) = self.entries.iter_mut().find(|(c, _)| c == category) {
            *total += amount;
        } else {
            self.entries.push((category.clone(), amount));
        }
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (category, amount) in &self.entries {
            map.serialize_entry(category.as_str(), amount)?;
        }
        map.end()
    }
}

/// Counts students by status and by outstanding dues.
#[must_use]
pub fn compute_student_counts(students: &[Student]) -> StudentCounts {
    students
        .iter()
        .fold(StudentCounts::default(), |mut counts, student| {
            counts.total += 1;
            match student.status {
                Some(StudentStatus::Active) => counts.active += 1,
                Some(StudentStatus::Inactive) => counts.inactive += 1,
                None => {}
            }
            if student.has_dues() {
                counts.with_dues += 1;
            }
            counts
        })
}

/// Sums amounts left to right. Non-finite amounts contribute nothing.
#[must_use]
pub fn sum_amounts<T: Amounted>(records: &[T]) -> f64 {
    records
        .iter()
        .fold(0.0, |total, record| total + finite_or_zero(record.amount()))
}

/// Sums every student's `due_amount`.
#[must_use]
pub fn compute_total_dues(students: &[Student]) -> f64 {
    students
        .iter()
        .fold(0.0, |total, student| total + finite_or_zero(student.due_amount))
}

/// Splits payment totals into cash and online buckets.
///
/// Payments with any other method are kept out of both buckets and reported
/// in [`MethodBreakdown::unclassified`].
#[must_use]
pub fn breakdown_by_method<P: Borrow<Payment>>(payments: &[P]) -> MethodBreakdown {
    payments
        .iter()
        .fold(MethodBreakdown::default(), |mut breakdown, payment| {
            let payment = payment.borrow();
            let amount = finite_or_zero(payment.amount);
            match payment.method {
                PaymentMethod::Cash => breakdown.cash += amount,
                PaymentMethod::Online => breakdown.online += amount,
                PaymentMethod::Other(_) => breakdown.unclassified += amount,
            }
            breakdown
        })
}

/// Groups expense totals by category.
#[must_use]
pub fn breakdown_by_category<E: Borrow<Expense>>(expenses: &[E]) -> CategoryBreakdown {
    expenses
        .iter()
        .fold(CategoryBreakdown::default(), |mut breakdown, expense| {
            let expense = expense.borrow();
            breakdown.add(&expense.category, finite_or_zero(expense.amount));
            breakdown
        })
}

/// Keeps records created in the same calendar month as `reference`.
///
/// Each timestamp is viewed in the reference's time zone before comparing
/// year and month, so pass `Local::now()` for the admin's local calendar.
/// Records without a timestamp never match.
#[must_use]
pub fn filter_by_month<'a, T: Dated, Tz: TimeZone>(
    records: &'a [T],
    reference: &DateTime<Tz>,
) -> Vec<&'a T> {
    let zone = reference.timezone();
    records
        .iter()
        .filter(|record| {
            record.created_at().is_some_and(|created| {
                let local = created.with_timezone(&zone);
                local.year() == reference.year() && local.month() == reference.month()
            })
        })
        .collect()
}

/// Income minus expenses. May be negative.
#[must_use]
pub fn net_balance(total_income: f64, total_expenses: f64) -> f64 {
    total_income - total_expenses
}

/// Money received minus money spent. May be negative.
#[must_use]
pub fn available_balance(total_received: f64, total_expenses: f64) -> f64 {
    total_received - total_expenses
}

/// Mean amount per transaction, or zero when there are no transactions.
#[must_use]
pub fn average_per_transaction(total: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }

    // Record counts stay far below 2^52.
    #[allow(clippy::cast_precision_loss)]
    let count = count as f64;
    total / count
}

//! Snapshot loading and the summaries shown on each admin panel.
//!
//! A [`Snapshot`] is the three record lists fetched together for one owner.
//! The summary types are thin compositions of [`crate::core::metrics`] and
//! are recomputed from scratch for every snapshot.

use crate::{
    core::{
        expense, payment,
        metrics::{
            self, Amounted, CategoryBreakdown, Dated, MethodBreakdown, StudentCounts,
        },
        student,
    },
    errors::Result,
    models::{Expense, Payment, Student},
};
use chrono::{DateTime, TimeZone};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::borrow::Borrow;
use tracing::{error, info, instrument};

/// Identifies one of the lists in a [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapshotList {
    /// The students list
    Students,
    /// The payments list
    Payments,
    /// The expenses list
    Expenses,
}

/// Students, payments and expenses fetched together for one owner.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Students, ordered by id
    pub students: Vec<Student>,
    /// Payments, newest first
    pub payments: Vec<Payment>,
    /// Expenses, newest first
    pub expenses: Vec<Expense>,
    /// Lists that failed to load and were replaced with empty lists
    pub failed: Vec<SnapshotList>,
}

impl Snapshot {
    /// True when every list loaded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

fn settle<M, T: From<M>>(
    list: SnapshotList,
    fetched: Result<Vec<M>>,
    failed: &mut Vec<SnapshotList>,
) -> Vec<T> {
    match fetched {
        Ok(rows) => rows.into_iter().map(T::from).collect(),
        Err(e) => {
            error!(?list, error = %e, "Failed to fetch list, treating it as empty");
            failed.push(list);
            Vec::new()
        }
    }
}

/// Fetches all three lists for `owner_id` concurrently.
///
/// A list that fails to load is logged and replaced with an empty list, so
/// this never fails; check [`Snapshot::failed`] to tell the user.
#[instrument(skip(db))]
pub async fn load_snapshot(db: &DatabaseConnection, owner_id: &str) -> Snapshot {
    let (students, payments, expenses) = tokio::join!(
        student::list_students(db, owner_id),
        payment::list_payments(db, owner_id, None),
        expense::list_expenses(db, owner_id, None),
    );

    let mut failed = Vec::new();
    let snapshot = Snapshot {
        students: settle(SnapshotList::Students, students, &mut failed),
        payments: settle(SnapshotList::Payments, payments, &mut failed),
        expenses: settle(SnapshotList::Expenses, expenses, &mut failed),
        failed,
    };

    info!(
        students = snapshot.students.len(),
        payments = snapshot.payments.len(),
        expenses = snapshot.expenses.len(),
        "Loaded snapshot"
    );
    snapshot
}

/// Figures shown on the overview tab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Student head counts
    pub students: StudentCounts,
    /// Sum of every student's dues
    pub total_dues: f64,
    /// Sum of every payment
    pub total_received: f64,
    /// Same as `total_received`; labelled as income on the overview
    pub total_income: f64,
    /// Sum of every expense
    pub total_expenses: f64,
    /// Received minus expenses
    pub available_balance: f64,
    /// Income minus expenses
    pub net_balance: f64,
}

impl DashboardSummary {
    /// Computes the overview figures for a snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let total_received = metrics::sum_amounts(&snapshot.payments);
        let total_income = total_received;
        let total_expenses = metrics::sum_amounts(&snapshot.expenses);

        Self {
            students: metrics::compute_student_counts(&snapshot.students),
            total_dues: metrics::compute_total_dues(&snapshot.students),
            total_received,
            total_income,
            total_expenses,
            available_balance: metrics::available_balance(total_received, total_expenses),
            net_balance: metrics::net_balance(total_income, total_expenses),
        }
    }
}

/// Cards on the payments tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PaymentsSummary {
    /// Sum of the listed payments
    pub total: f64,
    /// Sum of the listed cash payments
    pub cash: f64,
    /// Sum of the listed online payments
    pub online: f64,
    /// Number of listed payments
    pub transactions: usize,
}

impl PaymentsSummary {
    /// Summarizes the payments currently listed (after search and filter).
    #[must_use]
    pub fn compute<P: Borrow<Payment> + Amounted>(payments: &[P]) -> Self {
        let MethodBreakdown { cash, online, .. } = metrics::breakdown_by_method(payments);
        Self {
            total: metrics::sum_amounts(payments),
            cash,
            online,
            transactions: payments.len(),
        }
    }
}

/// Cards on the expenses tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ExpensesSummary {
    /// Sum of the listed expenses
    pub total: f64,
    /// Sum of the listed expenses created in the reference month
    pub this_month: f64,
    /// Number of listed expenses
    pub transactions: usize,
    /// Average listed expense, zero when nothing is listed
    pub average: f64,
}

impl ExpensesSummary {
    /// Summarizes the expenses currently listed, using `reference` to pick
    /// the current calendar month.
    #[must_use]
    pub fn compute<E, Tz>(expenses: &[E], reference: &DateTime<Tz>) -> Self
    where
        E: Amounted + Dated,
        Tz: TimeZone,
    {
        let total = metrics::sum_amounts(expenses);
        let this_month = metrics::sum_amounts(&metrics::filter_by_month(expenses, reference));
        Self {
            total,
            this_month,
            transactions: expenses.len(),
            average: metrics::average_per_transaction(total, expenses.len()),
        }
    }
}

/// Figures on the reports tab.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetrics {
    /// Sum of every payment
    pub total_income: f64,
    /// Sum of every expense
    pub total_expenses: f64,
    /// Income minus expenses
    pub net_profit_loss: f64,
    /// Number of payments
    pub transactions: usize,
    /// Payment totals by method
    pub by_method: MethodBreakdown,
    /// Expense totals by category
    pub by_category: CategoryBreakdown,
}

impl ReportMetrics {
    /// Computes report figures from full payment and expense lists.
    #[must_use]
    pub fn compute(payments: &[Payment], expenses: &[Expense]) -> Self {
        let total_income = metrics::sum_amounts(payments);
        let total_expenses = metrics::sum_amounts(expenses);
        Self {
            total_income,
            total_expenses,
            net_profit_loss: metrics::net_balance(total_income, total_expenses),
            transactions: payments.len(),
            by_method: metrics::breakdown_by_method(payments),
            by_category: metrics::breakdown_by_category(expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{
        core::{ingest, payment::search_payments},
        models::{ExpenseCategory, PaymentMethod},
        test_utils::*,
    };
    use chrono::{FixedOffset, Utc};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};

    fn sample_snapshot() -> Snapshot {
        Snapshot {
            students: ingest::ingest_students(
                r#"[{"full_name":"Asha","status":"Active","balance":5,"due_amount":0},
                    {"full_name":"Ravi","status":"Inactive","balance":-3,"due_amount":3},
                    {"full_name":"Meera","status":"Active","balance":-1,"due_amount":"1"}]"#,
            )
            .unwrap(),
            payments: ingest::ingest_payments(
                r#"[{"amount":100,"payment_method":"Cash","student_name":"Asha"},
                    {"amount":"50","payment_method":"Online","student_name":"Ravi"},
                    {"amount":20,"payment_method":"Cash","student_name":"Meera"}]"#,
            )
            .unwrap(),
            expenses: ingest::ingest_expenses(
                r#"[{"amount":30,"category":"Rent","created_at":"2025-03-02T10:00:00Z"},
                    {"amount":20,"category":"Rent","created_at":"2025-02-20T10:00:00Z"},
                    {"amount":10,"created_at":"2025-03-15T10:00:00Z"}]"#,
            )
            .unwrap(),
            failed: Vec::new(),
        }
    }

    #[test]
    fn test_dashboard_summary_from_snapshot() {
        let summary = DashboardSummary::from_snapshot(&sample_snapshot());

        assert_eq!(summary.students.total, 3);
        assert_eq!(summary.students.active, 2);
        assert_eq!(summary.students.inactive, 1);
        assert_eq!(summary.students.with_dues, 2);
        assert_eq!(summary.total_dues, 4.0);
        assert_eq!(summary.total_received, 170.0);
        assert_eq!(summary.total_income, 170.0);
        assert_eq!(summary.total_expenses, 60.0);
        assert_eq!(summary.available_balance, 110.0);
        assert_eq!(summary.net_balance, 110.0);
    }

    #[test]
    fn test_dashboard_summary_empty_snapshot() {
        let summary = DashboardSummary::from_snapshot(&Snapshot::default());
        assert_eq!(summary.students, StudentCounts::default());
        assert_eq!(summary.total_received, 0.0);
        assert_eq!(summary.net_balance, 0.0);
    }

    #[test]
    fn test_payments_summary_over_search_results() {
        let snapshot = sample_snapshot();

        let all = PaymentsSummary::compute(&snapshot.payments);
        assert_eq!(all.total, 170.0);
        assert_eq!(all.cash, 120.0);
        assert_eq!(all.online, 50.0);
        assert_eq!(all.transactions, 3);

        let listed = search_payments(&snapshot.payments, "", Some(&PaymentMethod::Cash));
        let cash_only = PaymentsSummary::compute(&listed);
        assert_eq!(cash_only.total, 120.0);
        assert_eq!(cash_only.online, 0.0);
        assert_eq!(cash_only.transactions, 2);
    }

    #[test]
    fn test_expenses_summary_this_month() {
        let snapshot = sample_snapshot();
        let reference = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 20, 12, 0, 0)
            .unwrap();

        let summary = ExpensesSummary::compute(&snapshot.expenses, &reference);
        assert_eq!(summary.total, 60.0);
        assert_eq!(summary.this_month, 40.0);
        assert_eq!(summary.transactions, 3);
        assert_eq!(summary.average, 20.0);
    }

    #[test]
    fn test_expenses_summary_empty() {
        let expenses: Vec<Expense> = Vec::new();
        let summary = ExpensesSummary::compute(&expenses, &Utc::now());
        assert_eq!(summary, ExpensesSummary::default());
    }

    #[test]
    fn test_report_metrics() {
        let snapshot = sample_snapshot();
        let report = ReportMetrics::compute(&snapshot.payments, &snapshot.expenses);

        assert_eq!(report.total_income, 170.0);
        assert_eq!(report.total_expenses, 60.0);
        assert_eq!(report.net_profit_loss, 110.0);
        assert_eq!(report.transactions, 3);
        assert_eq!(report.by_method.cash, 120.0);
        assert_eq!(report.by_method.online, 50.0);
        assert_eq!(report.by_category.get(&ExpenseCategory::Rent), Some(50.0));
        assert_eq!(report.by_category.get(&ExpenseCategory::Other), Some(10.0));
    }

    #[tokio::test]
    async fn test_load_snapshot_integration() -> Result<()> {
        let db = setup_test_db().await?;

        create_test_student(&db, TEST_OWNER, "Asha", 200.0).await?;
        create_test_payment(&db, TEST_OWNER, 100.0, PaymentMethod::Cash).await?;
        create_test_payment(&db, TEST_OWNER, 40.0, PaymentMethod::Online).await?;
        create_test_expense(&db, TEST_OWNER, 25.0, ExpenseCategory::Supplies).await?;
        create_test_expense(&db, "someone_else", 999.0, ExpenseCategory::Rent).await?;

        let snapshot = load_snapshot(&db, TEST_OWNER).await;
        assert!(snapshot.is_complete());
        assert_eq!(snapshot.students.len(), 1);
        assert_eq!(snapshot.payments.len(), 2);
        assert_eq!(snapshot.expenses.len(), 1);

        let summary = DashboardSummary::from_snapshot(&snapshot);
        assert_eq!(summary.students.active, 1);
        assert_eq!(summary.total_received, 140.0);
        assert_eq!(summary.available_balance, 115.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_load_snapshot_treats_failed_lists_as_empty() {
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_errors([
                DbErr::Custom("permission denied".to_string()),
                DbErr::Custom("permission denied".to_string()),
                DbErr::Custom("permission denied".to_string()),
            ])
            .into_connection();

        let snapshot = load_snapshot(&db, TEST_OWNER).await;
        assert!(!snapshot.is_complete());
        assert_eq!(snapshot.failed.len(), 3);
        assert!(snapshot.failed.contains(&SnapshotList::Students));
        assert!(snapshot.students.is_empty());
        assert!(snapshot.payments.is_empty());
        assert!(snapshot.expenses.is_empty());

        let summary = DashboardSummary::from_snapshot(&snapshot);
        assert_eq!(summary.total_received, 0.0);
    }
}

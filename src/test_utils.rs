//! Shared test utilities for the library ledger.
//!
//! This module provides helpers for setting up an in-memory database and
//! creating records with sensible defaults.

use crate::{
    core::{
        expense::{self, NewExpense},
        payment::{self, NewPayment},
        student::{self, NewStudent},
    },
    entities,
    errors::Result,
    models::{ExpenseCategory, PaymentMethod},
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;

/// Owner id used by tests that do not care about scoping
pub const TEST_OWNER: &str = "test_owner";

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Registers a test student.
///
/// # Defaults
/// * `email`: `<name>@example.com`
/// * `phone`: `"9876543210"`
/// * `registration_date`: 2025-01-01
pub async fn create_test_student(
    db: &DatabaseConnection,
    owner_id: &str,
    name: &str,
    deposit: f64,
) -> Result<entities::student::Model> {
    student::create_student(
        db,
        NewStudent {
            owner_id: owner_id.to_string(),
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "9876543210".to_string(),
            emergency_contact: None,
            address: None,
            registration_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            initial_deposit: deposit,
        },
    )
    .await
}

/// Records a test payment from student `S-001` ("Test Student").
pub async fn create_test_payment(
    db: &DatabaseConnection,
    owner_id: &str,
    amount: f64,
    method: PaymentMethod,
) -> Result<entities::payment::Model> {
    payment::create_payment(
        db,
        NewPayment {
            owner_id: owner_id.to_string(),
            student_ref: "S-001".to_string(),
            student_name: "Test Student".to_string(),
            amount,
            method,
            description: "Test payment".to_string(),
        },
    )
    .await
}

/// Records a test expense.
pub async fn create_test_expense(
    db: &DatabaseConnection,
    owner_id: &str,
    amount: f64,
    category: ExpenseCategory,
) -> Result<entities::expense::Model> {
    expense::create_expense(
        db,
        NewExpense {
            owner_id: owner_id.to_string(),
            description: "Test expense".to_string(),
            amount,
            category,
            notes: String::new(),
        },
    )
    .await
}

//! Student business logic - registration, edits, removal and list filtering.
//!
//! Every query is scoped to the owning admin. Balances follow one rule:
//! `balance = paid - due`, with `due_amount` holding the owed part.

use crate::{
    entities::{Student, student},
    errors::{Error, Result},
    models::{self, StudentStatus},
};
use chrono::{Local, NaiveDate};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Fields collected when registering a student.
#[derive(Debug, Clone)]
pub struct NewStudent {
    /// Admin identity that will own the row
    pub owner_id: String,
    /// Display name (required)
    pub full_name: String,
    /// Contact email (required)
    pub email: String,
    /// Contact phone (required)
    pub phone: String,
    /// Optional emergency contact
    pub emergency_contact: Option<String>,
    /// Optional address
    pub address: Option<String>,
    /// Date of registration
    pub registration_date: NaiveDate,
    /// Deposit taken at registration; becomes the opening balance
    pub initial_deposit: f64,
}

/// Fields editable after registration.
#[derive(Debug, Clone)]
pub struct StudentUpdate {
    /// Display name (required)
    pub full_name: String,
    /// Contact email (required)
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Emergency contact
    pub emergency_contact: Option<String>,
    /// Amount paid ahead
    pub paid: f64,
    /// Amount owed
    pub due: f64,
    /// Membership status
    pub status: StudentStatus,
}

/// Which students a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentFilter {
    /// Everyone
    #[default]
    All,
    /// Status is `Active`
    Active,
    /// Status is `Inactive`
    Inactive,
    /// Balance below zero
    WithDues,
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn require_non_negative(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Registers a new student.
///
/// The opening balance equals the initial deposit, nothing is due, the last
/// visit is today and the student starts `Active`.
///
/// # Errors
/// Returns an error if:
/// - name, email or phone is empty after trimming
/// - the deposit is negative or not finite
/// - the database insert fails
#[instrument(skip(db, new), fields(owner_id = %new.owner_id))]
pub async fn create_student(db: &DatabaseConnection, new: NewStudent) -> Result<student::Model> {
    let full_name = require_text("full_name", &new.full_name)?;
    let email = require_text("email", &new.email)?;
    let phone = require_text("phone", &new.phone)?;
    let deposit = require_non_negative(new.initial_deposit)?;

    let student = student::ActiveModel {
        owner_id: Set(new.owner_id),
        full_name: Set(full_name),
        email: Set(email),
        phone: Set(phone),
        emergency_contact: Set(optional_text(new.emergency_contact)),
        address: Set(optional_text(new.address)),
        registration_date: Set(new.registration_date),
        initial_deposit: Set(deposit),
        balance: Set(deposit),
        due_amount: Set(0.0),
        last_visit: Set(Some(Local::now().date_naive())),
        status: Set(StudentStatus::Active.as_str().to_string()),
        ..Default::default()
    };

    let result = student.insert(db).await?;
    info!(student_id = result.id, "Registered student {}", result.full_name);
    Ok(result)
}

/// Lists all of an owner's students, oldest registration id first.
#[instrument(skip(db))]
pub async fn list_students(db: &DatabaseConnection, owner_id: &str) -> Result<Vec<student::Model>> {
    let students = Student::find()
        .filter(student::Column::OwnerId.eq(owner_id))
        .order_by_asc(student::Column::Id)
        .all(db)
        .await?;
    debug!("Fetched {} students", students.len());
    Ok(students)
}

/// Finds one of an owner's students by id.
pub async fn get_student_by_id(
    db: &DatabaseConnection,
    owner_id: &str,
    student_id: i64,
) -> Result<Option<student::Model>> {
    Student::find_by_id(student_id)
        .filter(student::Column::OwnerId.eq(owner_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Applies an edit to a student, recomputing the balance from paid and due.
///
/// # Errors
/// Returns an error if:
/// - name or email is empty after trimming
/// - paid or due is negative or not finite
/// - the student does not exist for this owner
/// - the database update fails
#[instrument(skip(db, update))]
pub async fn update_student(
    db: &DatabaseConnection,
    owner_id: &str,
    student_id: i64,
    update: StudentUpdate,
) -> Result<student::Model> {
    let full_name = require_text("full_name", &update.full_name)?;
    let email = require_text("email", &update.email)?;
    let paid = require_non_negative(update.paid)?;
    let due = require_non_negative(update.due)?;

    let existing = get_student_by_id(db, owner_id, student_id)
        .await?
        .ok_or(Error::StudentNotFound { id: student_id })?;

    let mut active_model: student::ActiveModel = existing.into();
    active_model.full_name = Set(full_name);
    active_model.email = Set(email);
    active_model.phone = Set(update.phone.trim().to_string());
    active_model.emergency_contact = Set(optional_text(update.emergency_contact));
    active_model.balance = Set(paid - due);
    active_model.due_amount = Set(due);
    active_model.status = Set(update.status.as_str().to_string());

    let result = active_model.update(db).await?;
    info!(student_id, balance = result.balance, "Updated student");
    Ok(result)
}

/// Deletes one of an owner's students.
///
/// # Errors
/// Returns [`Error::StudentNotFound`] if no such student exists for this owner.
#[instrument(skip(db))]
pub async fn delete_student(db: &DatabaseConnection, owner_id: &str, student_id: i64) -> Result<()> {
    let result = Student::delete_many()
        .filter(student::Column::Id.eq(student_id))
        .filter(student::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::StudentNotFound { id: student_id });
    }
    info!(student_id, "Deleted student");
    Ok(())
}

/// Applies a list filter and a search term to a student snapshot.
///
/// The term matches name or email case-insensitively, or appears verbatim in
/// the phone number. An empty term matches everyone.
#[must_use]
pub fn filter_students<'a>(
    students: &'a [models::Student],
    filter: StudentFilter,
    search: &str,
) -> Vec<&'a models::Student> {
    let term = search.trim().to_lowercase();
    students
        .iter()
        .filter(|s| {
            s.full_name.to_lowercase().contains(&term)
                || s.email.to_lowercase().contains(&term)
                || s.phone.contains(&term)
        })
        .filter(|s| match filter {
            StudentFilter::All => true,
            StudentFilter::Active => s.status == Some(StudentStatus::Active),
            StudentFilter::Inactive => s.status == Some(StudentStatus::Inactive),
            StudentFilter::WithDues => s.has_dues(),
        })
        .collect()
}

//! Payment business logic - recording, listing, deleting and searching payments.

use crate::{
    core::student::require_text,
    entities::{Payment, payment},
    errors::{Error, Result},
    models::{self, PaymentMethod},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Status label given to newly recorded payments
pub const DEFAULT_PAYMENT_STATUS: &str = "Completed";

/// Fields collected when recording a payment.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Admin identity that will own the row
    pub owner_id: String,
    /// Student identifier as typed on the form (required)
    pub student_ref: String,
    /// Student name as typed on the form (required)
    pub student_name: String,
    /// Amount received; must be positive
    pub amount: f64,
    /// `Cash` or `Online`
    pub method: PaymentMethod,
    /// Optional description
    pub description: String,
}

/// Records a payment.
///
/// # Errors
/// Returns an error if:
/// - the student name or id is empty after trimming
/// - the amount is zero, negative or not finite
/// - the method is neither `Cash` nor `Online`
/// - the database insert fails
#[instrument(skip(db, new), fields(owner_id = %new.owner_id))]
pub async fn create_payment(db: &DatabaseConnection, new: NewPayment) -> Result<payment::Model> {
    let student_name = require_text("student_name", &new.student_name)?;
    let student_ref = require_text("student_ref", &new.student_ref)?;

    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    if let PaymentMethod::Other(label) = &new.method {
        return Err(Error::validation(
            "payment_method",
            format!("unsupported method {label:?}"),
        ));
    }

    let payment = payment::ActiveModel {
        owner_id: Set(new.owner_id),
        student_ref: Set(student_ref),
        student_name: Set(student_name),
        amount: Set(new.amount),
        payment_method: Set(new.method.as_str().to_string()),
        description: Set(new.description.trim().to_string()),
        status: Set(DEFAULT_PAYMENT_STATUS.to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = payment.insert(db).await?;
    info!(
        payment_id = result.id,
        amount = result.amount,
        method = %result.payment_method,
        "Recorded payment"
    );
    Ok(result)
}

/// Lists an owner's payments, newest first, optionally restricted to one method.
#[instrument(skip(db))]
pub async fn list_payments(
    db: &DatabaseConnection,
    owner_id: &str,
    method: Option<&PaymentMethod>,
) -> Result<Vec<payment::Model>> {
    let mut query = Payment::find().filter(payment::Column::OwnerId.eq(owner_id));
    if let Some(method) = method {
        query = query.filter(payment::Column::PaymentMethod.eq(method.as_str()));
    }

    let payments = query
        .order_by_desc(payment::Column::CreatedAt)
        .all(db)
        .await?;
    debug!("Fetched {} payments", payments.len());
    Ok(payments)
}

/// Deletes one of an owner's payments.
///
/// # Errors
/// Returns [`Error::PaymentNotFound`] if no such payment exists for this owner.
#[instrument(skip(db))]
pub async fn delete_payment(db: &DatabaseConnection, owner_id: &str, payment_id: i64) -> Result<()> {
    let result = Payment::delete_many()
        .filter(payment::Column::Id.eq(payment_id))
        .filter(payment::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::PaymentNotFound { id: payment_id });
    }
    info!(payment_id, "Deleted payment");
    Ok(())
}

/// Searches a payment snapshot by student name, student id or description
/// (case-insensitive), optionally restricted to one method.
#[must_use]
pub fn search_payments<'a>(
    payments: &'a [models::Payment],
    search: &str,
    method: Option<&PaymentMethod>,
) -> Vec<&'a models::Payment> {
    let term = search.trim().to_lowercase();
    payments
        .iter()
        .filter(|p| {
            p.student_name.to_lowercase().contains(&term)
                || p.student_ref.to_lowercase().contains(&term)
                || p.description.to_lowercase().contains(&term)
        })
        .filter(|p| method.is_none_or(|m| p.method == *m))
        .collect()
}

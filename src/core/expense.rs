//! Expense business logic - recording, listing, deleting and searching expenses.

use crate::{
    core::student::require_text,
    entities::{Expense, expense},
    errors::{Error, Result},
    models::{self, ExpenseCategory},
};
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Fields collected when recording an expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Admin identity that will own the row
    pub owner_id: String,
    /// What the money was spent on (required)
    pub description: String,
    /// Amount spent; must be positive
    pub amount: f64,
    /// Expense category
    pub category: ExpenseCategory,
    /// Optional notes
    pub notes: String,
}

/// Records an expense.
///
/// # Errors
/// Returns an error if the description is empty, the amount is not a positive
/// finite number, the category is not one of the form's categories, or the
/// database insert fails.
#[instrument(skip(db, new), fields(owner_id = %new.owner_id))]
pub async fn create_expense(db: &DatabaseConnection, new: NewExpense) -> Result<expense::Model> {
    let description = require_text("description", &new.description)?;

    if !new.amount.is_finite() || new.amount <= 0.0 {
        return Err(Error::InvalidAmount { amount: new.amount });
    }

    if !new.category.is_standard() {
        return Err(Error::validation(
            "category",
            format!("unsupported category {:?}", new.category.as_str()),
        ));
    }

    let expense = expense::ActiveModel {
        owner_id: Set(new.owner_id),
        description: Set(description),
        amount: Set(new.amount),
        category: Set(new.category.as_str().to_string()),
        notes: Set(new.notes.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = expense.insert(db).await?;
    info!(
        expense_id = result.id,
        amount = result.amount,
        category = %result.category,
        "Recorded expense"
    );
    Ok(result)
}

/// Lists an owner's expenses, newest first, optionally restricted to one category.
#[instrument(skip(db))]
pub async fn list_expenses(
    db: &DatabaseConnection,
    owner_id: &str,
    category: Option<&ExpenseCategory>,
) -> Result<Vec<expense::Model>> {
    let mut query = Expense::find().filter(expense::Column::OwnerId.eq(owner_id));
    if let Some(category) = category {
        query = query.filter(expense::Column::Category.eq(category.as_str()));
    }

    let expenses = query
        .order_by_desc(expense::Column::CreatedAt)
        .all(db)
        .await?;
    debug!("Fetched {} expenses", expenses.len());
    Ok(expenses)
}

/// Deletes one of an owner's expenses.
///
/// # Errors
/// Returns [`Error::ExpenseNotFound`] if no such expense exists for this owner.
#[instrument(skip(db))]
pub async fn delete_expense(db: &DatabaseConnection, owner_id: &str, expense_id: i64) -> Result<()> {
    let result = Expense::delete_many()
        .filter(expense::Column::Id.eq(expense_id))
        .filter(expense::Column::OwnerId.eq(owner_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(Error::ExpenseNotFound { id: expense_id });
    }
    info!(expense_id, "Deleted expense");
    Ok(())
}

/// Searches an expense snapshot by description or notes (case-insensitive),
/// optionally restricted to one category.
#[must_use]
pub fn search_expenses<'a>(
    expenses: &'a [models::Expense],
    search: &str,
    category: Option<&ExpenseCategory>,
) -> Vec<&'a models::Expense> {
    let term = search.trim().to_lowercase();
    expenses
        .iter()
        .filter(|e| {
            e.description.to_lowercase().contains(&term) || e.notes.to_lowercase().contains(&term)
        })
        .filter(|e| category.is_none_or(|c| &e.category == c))
        .collect()
}

//! Expense entity - Money spent running the library.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier for the expense
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Admin identity that owns this row
    pub owner_id: String,
    /// What the money was spent on
    pub description: String,
    /// Amount spent, always positive
    pub amount: f64,
    /// One of the fixed expense category labels (e.g. `"Rent"`)
    pub category: String,
    /// Optional additional notes
    pub notes: String,
    /// When the expense was recorded
    pub created_at: DateTimeUtc,
}

/// Expenses have no relationships tracked by the database
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! Payment entity - Money received from a student.
//!
//! The student reference is free text entered by the admin (`student_ref` and
//! `student_name`), so there is no foreign key to `students`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    /// Unique identifier for the payment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Admin identity that owns this row
    pub owner_id: String,
    /// Student identifier as entered on the payment form
    pub student_ref: String,
    /// Student name as entered on the payment form
    pub student_name: String,
    /// Amount received, always positive
    pub amount: f64,
    /// `"Cash"` or `"Online"`
    pub payment_method: String,
    /// Optional free-text description
    pub description: String,
    /// Display-only status label
    pub status: String,
    /// When the payment was recorded
    pub created_at: DateTimeUtc,
}

/// Payments have no relationships tracked by the database
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

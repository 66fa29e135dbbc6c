//! Student entity - Represents a registered library member.
//!
//! Mirrors the hosted backend's `students` table. `balance` is signed: a
//! non-negative value is credit paid ahead, a negative value is the amount owed.
//! Writers keep `balance = paid - due_amount`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Student database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    /// Unique identifier for the student
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Admin identity that owns this row
    pub owner_id: String,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone number
    pub phone: String,
    /// Optional emergency contact number
    pub emergency_contact: Option<String>,
    /// Optional postal address
    pub address: Option<String>,
    /// Date the student registered
    pub registration_date: Date,
    /// Deposit taken at registration
    pub initial_deposit: f64,
    /// Signed balance (negative means the student owes money)
    pub balance: f64,
    /// Outstanding amount owed, always non-negative
    pub due_amount: f64,
    /// Last recorded visit
    pub last_visit: Option<Date>,
    /// `"Active"` or `"Inactive"`
    pub status: String,
}

/// Students have no relationships tracked by the database
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

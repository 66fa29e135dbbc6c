//! Strict domain records consumed by the aggregation engine.
//!
//! Every amount here is a finite `f64`. Loose records coming from outside the
//! crate are coerced into these types by [`crate::core::ingest`]; rows loaded
//! through sea-orm convert with `From`.

use crate::entities::{expense, payment, student};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Membership status of a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudentStatus {
    /// Currently using the library
    Active,
    /// Registered but not currently using the library
    Inactive,
}

impl StudentStatus {
    /// Parses the stored label. Matching is exact, so `"active"` is not `Active`.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Label as stored in the database
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a payment was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Paid in cash at the desk
    Cash,
    /// Paid through an online transfer
    Online,
    /// Any other label found in the data store
    Other(String),
}

impl PaymentMethod {
    /// Parses a stored label; unknown labels are kept verbatim in `Other`.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        match label {
            "Cash" => Self::Cash,
            "Online" => Self::Online,
            other => Self::Other(other.to_string()),
        }
    }

    /// Label as stored in the database
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cash => "Cash",
            Self::Online => "Online",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Expense categories offered by the form, plus any other label found in the
/// data store.
///
/// Serializes as the display label, so `EquipmentAndFurniture` is
/// `"Equipment & Furniture"` and unknown labels stay as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Electricity, water, internet
    Utilities,
    /// Staff pay
    Salaries,
    /// Premises rent
    Rent,
    /// Consumables
    Supplies,
    /// Shown as "Equipment & Furniture"
    #[serde(rename = "Equipment & Furniture")]
    EquipmentAndFurniture,
    /// Repairs and upkeep
    Maintenance,
    /// Advertising and promotion
    Marketing,
    /// Everything else, including a missing label
    Other,
    /// A label outside the fixed set, kept verbatim
    #[serde(untagged)]
    Custom(String),
}

impl ExpenseCategory {
    /// The fixed categories in display order
    pub const ALL: [Self; 8] = [
        Self::Utilities,
        Self::Salaries,
        Self::Rent,
        Self::Supplies,
        Self::EquipmentAndFurniture,
        Self::Maintenance,
        Self::Marketing,
        Self::Other,
    ];

    /// Parses a display label exactly; returns `None` for text outside the
    /// fixed set.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Maps an optional label to a category. Missing or blank labels are
    /// [`ExpenseCategory::Other`]; unknown labels become
    /// [`ExpenseCategory::Custom`].
    #[must_use]
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None => Self::Other,
            Some(label) if label.trim().is_empty() => Self::Other,
            Some(label) => Self::parse(label).unwrap_or_else(|| Self::Custom(label.to_string())),
        }
    }

    /// True for the eight categories the expense form offers
    #[must_use]
    pub const fn is_standard(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Display label, also used as the stored value
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Utilities => "Utilities",
            Self::Salaries => "Salaries",
            Self::Rent => "Rent",
            Self::Supplies => "Supplies",
            Self::EquipmentAndFurniture => "Equipment & Furniture",
            Self::Maintenance => "Maintenance",
            Self::Marketing => "Marketing",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A student as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Data-store id, if one was supplied
    pub id: Option<i64>,
    /// Display name
    pub full_name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: String,
    /// Signed balance; negative means money is owed
    pub balance: f64,
    /// Outstanding amount owed
    pub due_amount: f64,
    /// `None` when the stored label is missing or unrecognized
    pub status: Option<StudentStatus>,
    /// Date of registration, if known
    pub registration_date: Option<NaiveDate>,
    /// Date of last visit, if known
    pub last_visit: Option<NaiveDate>,
}

impl Student {
    /// A student has dues when the balance is below zero.
    #[must_use]
    pub fn has_dues(&self) -> bool {
        self.balance < 0.0
    }
}

/// A payment as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Data-store id, if one was supplied
    pub id: Option<i64>,
    /// Amount received
    pub amount: f64,
    /// Payment method
    pub method: PaymentMethod,
    /// Student identifier text
    pub student_ref: String,
    /// Student name text
    pub student_name: String,
    /// Free-text description
    pub description: String,
    /// Display-only status
    pub status: String,
    /// When the payment was recorded
    pub created_at: Option<DateTime<Utc>>,
}

/// An expense as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Data-store id, if one was supplied
    pub id: Option<i64>,
    /// Amount spent
    pub amount: f64,
    /// Expense category
    pub category: ExpenseCategory,
    /// What the money was spent on
    pub description: String,
    /// Additional notes
    pub notes: String,
    /// When the expense was recorded
    pub created_at: Option<DateTime<Utc>>,
}

/// Replaces NaN and infinities with `0.0`.
pub(crate) const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

impl From<student::Model> for Student {
    fn from(model: student::Model) -> Self {
        Self {
            id: Some(model.id),
            status: StudentStatus::parse(&model.status),
            full_name: model.full_name,
            email: model.email,
            phone: model.phone,
            balance: finite_or_zero(model.balance),
            due_amount: finite_or_zero(model.due_amount),
            registration_date: Some(model.registration_date),
            last_visit: model.last_visit,
        }
    }
}

impl From<payment::Model> for Payment {
    fn from(model: payment::Model) -> Self {
        Self {
            id: Some(model.id),
            amount: finite_or_zero(model.amount),
            method: PaymentMethod::parse(&model.payment_method),
            student_ref: model.student_ref,
            student_name: model.student_name,
            description: model.description,
            status: model.status,
            created_at: Some(model.created_at),
        }
    }
}

impl From<expense::Model> for Expense {
    fn from(model: expense::Model) -> Self {
        Self {
            id: Some(model.id),
            amount: finite_or_zero(model.amount),
            category: ExpenseCategory::from_label(Some(&model.category)),
            description: model.description,
            notes: model.notes,
            created_at: Some(model.created_at),
        }
    }
}

//! Entity module - sea-orm definitions mirroring the hosted backend's tables.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod expense;
pub mod payment;
pub mod student;

// Re-export specific types to avoid conflicts
pub use expense::{Column as ExpenseColumn, Entity as Expense, Model as ExpenseModel};
pub use payment::{Column as PaymentColumn, Entity as Payment, Model as PaymentModel};
pub use student::{Column as StudentColumn, Entity as Student, Model as StudentModel};

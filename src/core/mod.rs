//! Core business logic - framework-agnostic aggregation, ingestion and data-store operations.

pub mod dashboard;
pub mod expense;
pub mod ingest;
pub mod metrics;
pub mod payment;
pub mod report;
pub mod student;

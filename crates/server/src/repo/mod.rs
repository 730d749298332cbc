//! Database access, one module per table.
//!
//! Reads take the pool. Writes take a `&mut PgConnection` so callers can
//! run them inside a transaction (`&mut *tx`).

pub mod audit;
pub mod blotter;
pub mod incident_log;
pub mod lupon;
pub mod notification;
pub mod report;
pub mod schedule;
pub mod user;

pub mod config;
pub mod error;
pub mod models;

// Barangay case management domain
pub mod audit;
pub mod blotter;
pub mod incident_log;
pub mod lupon;
pub mod notification;
pub mod report;
pub mod schedule;
pub mod workflow;

pub use config::*;
pub use error::*;
pub use models::*;

pub use audit::*;
pub use blotter::*;
pub use incident_log::*;
pub use lupon::*;
pub use notification::*;
pub use report::*;
pub use schedule::*;
pub use workflow::*;

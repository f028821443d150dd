//! Storage Layer
//!
//! In-memory persistence for campaign data points and dashboard users,
//! plus the bearer-token session table used by the API.

mod model;
mod repository;
mod session;

pub use model::{DataPoint, NewDataPoint, NewUser, User};
pub use repository::Repository;
pub use session::{SessionStore, DEFAULT_SESSION_TTL};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock error: {0}")]
    Lock(String),
    #[error("Record not found")]
    NotFound,
    #[error("Conflict: {0}")]
    Conflict(String),
}

pub mod advisory;
pub mod baby_service;
pub mod localization;
pub mod models;
pub mod record_service;
pub mod summary;

use thiserror::Error;

/// Errors the REST layer turns into client-facing status codes. Anything
/// else bubbling out of a service is treated as a store failure.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("baby not found: {0}")]
    BabyNotFound(String),
    #[error("record not found: {0}")]
    RecordNotFound(String),
    #[error("{0}")]
    InvalidInput(String),
}

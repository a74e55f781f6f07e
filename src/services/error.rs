use thiserror::Error;

/// Failures surfaced by service-layer calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Project not found: {0}")]
    NotFound(String),

    /// The backing store rejected or failed the call
    #[error("Backend error: {0}")]
    Backend(String),
}

use thiserror::Error;

/// Programmer mistakes in how a listing is configured. Empty results and
/// out-of-range pages are normal values, not errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("page size must be greater than zero, got {0}")]
    InvalidPageSize(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeadError {
    #[error("name is required")]
    MissingName,
    #[error("email address {0:?} is not valid")]
    InvalidEmail(String),
    #[error("message is required")]
    MissingMessage,
    #[error("phone number {0:?} contains invalid characters")]
    InvalidPhone(String),
    #[error("unknown farm {0:?}")]
    UnknownFarm(String),
}

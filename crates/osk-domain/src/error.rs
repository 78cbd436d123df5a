use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid calendar date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid time of day `{0}` (expected HH:MM)")]
    InvalidTime(String),
    #[error("unknown course category `{0}` (expected A, B, C or D)")]
    InvalidCategory(String),
}

use chrono::NaiveDate;
use osk_domain::DomainError;
use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// User-facing validation failure; the message is shown verbatim.
    #[error("{0}")]
    Validation(String),
    #[error("Ten dzień jest już zarezerwowany.")]
    DateTaken(NaiveDate),
    #[error("Nie znaleziono kursu: {0}")]
    CourseNotFound(String),
    #[error("Nie znaleziono rezerwacji: {0}")]
    ReservationNotFound(String),
    #[error("Nie znaleziono instruktora: {0}")]
    InstructorNotFound(String),
    #[error("Nie znaleziono wpisu w grafiku: {0}")]
    EntryNotFound(String),
    #[error("{0}")]
    Extraction(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }

    /// True for failures caused by user input rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CoreError::Validation(_)
                | CoreError::DateTaken(_)
                | CoreError::CourseNotFound(_)
                | CoreError::ReservationNotFound(_)
                | CoreError::InstructorNotFound(_)
                | CoreError::EntryNotFound(_)
                | CoreError::Domain(_)
        )
    }
}

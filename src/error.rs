//! Error types for the card sorting engine

use pyo3::exceptions::{PyIndexError, PyRuntimeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Main error type for the card sorting engine
///
/// These are caller contract violations. The session never commits a
/// mutation before its preconditions pass, so every variant leaves the
/// session exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CardSortError {
    #[error("Invalid choice: index {index} is outside 0..{available}")]
    InvalidChoice { index: usize, available: usize },

    #[error("Session already finished")]
    SessionAlreadyFinished,

    #[error("Session not started")]
    SessionNotStarted,

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<CardSortError> for PyErr {
    fn from(err: CardSortError) -> PyErr {
        let msg = err.to_string();
        match err {
            CardSortError::InvalidChoice { .. } => PyIndexError::new_err(msg),
            CardSortError::SessionAlreadyFinished | CardSortError::SessionNotStarted => {
                PyRuntimeError::new_err(msg)
            }
            CardSortError::InvalidConfiguration(_) | CardSortError::DeserializationError(_) => {
                PyValueError::new_err(msg)
            }
        }
    }
}

impl From<serde_json::Error> for CardSortError {
    fn from(err: serde_json::Error) -> Self {
        CardSortError::DeserializationError(err.to_string())
    }
}

/// Result type alias for the card sorting engine
pub type Result<T> = std::result::Result<T, CardSortError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_choice_message() {
        let err = CardSortError::InvalidChoice {
            index: 99,
            available: 4,
        };
        assert_eq!(err.to_string(), "Invalid choice: index 99 is outside 0..4");
    }

    #[test]
    fn test_json_error_converts_to_deserialization() {
        let err: CardSortError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, CardSortError::DeserializationError(_)));
    }
}

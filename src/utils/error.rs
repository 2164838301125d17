use crate::domain::model::ReservationStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Reservation not found: {id}")]
    NotFound { id: String },

    /// A lifecycle guard rejected the operation. Displays the guard message verbatim.
    #[error("{message}")]
    InvalidTransition {
        status: ReservationStatus,
        message: &'static str,
    },

    #[error("Validation error on '{field}': {message}")]
    ValidationError { field: String, message: String },

    #[error("Unauthenticated: {reason}")]
    Unauthenticated { reason: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Domain,
    Input,
    Auth,
    Infrastructure,
}

impl ReservationError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn unauthenticated(reason: impl Into<String>) -> Self {
        Self::Unauthenticated {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } | Self::InvalidTransition { .. } => ErrorCategory::Domain,
            Self::ValidationError { .. } => ErrorCategory::Input,
            Self::Unauthenticated { .. } => ErrorCategory::Auth,
            Self::StorageError { .. }
            | Self::ConfigError { .. }
            | Self::IoError(_)
            | Self::SerializationError(_) => ErrorCategory::Infrastructure,
        }
    }

    /// HTTP-style status a transport should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::InvalidTransition { .. } | Self::ValidationError { .. } => 400,
            Self::Unauthenticated { .. } => 401,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "Reservation not found".to_string(),
            Self::InvalidTransition { message, .. } => message.to_string(),
            Self::ValidationError { field, message } => format!("Invalid {}: {}", field, message),
            Self::Unauthenticated { reason } => reason.clone(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            _ => "Internal error, check the logs for details".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReservationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_contract() {
        let not_found = ReservationError::NotFound {
            id: "abc".to_string(),
        };
        assert_eq!(not_found.status_code(), 404);

        let transition = ReservationError::InvalidTransition {
            status: ReservationStatus::Cancelled,
            message: "cannot confirm a cancelled reservation",
        };
        assert_eq!(transition.status_code(), 400);
        assert_eq!(transition.to_string(), "cannot confirm a cancelled reservation");

        assert_eq!(ReservationError::unauthenticated("nope").status_code(), 401);
        assert_eq!(ReservationError::validation("duration_minutes", "zero").status_code(), 400);
    }

    #[test]
    fn test_category() {
        let storage = ReservationError::StorageError {
            message: "disk full".to_string(),
        };
        assert_eq!(storage.category(), ErrorCategory::Infrastructure);
        assert_eq!(storage.status_code(), 500);
        assert_eq!(
            ReservationError::unauthenticated("x").category(),
            ErrorCategory::Auth
        );
    }
}

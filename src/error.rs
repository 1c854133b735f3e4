//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for failures the API layer should report to the client
    /// (bad input, unknown id) rather than as an internal error.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Invalid(_) | AppError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("config error"));
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn not_found_is_client_error() {
        assert!(AppError::NotFound("document 42".into()).is_client_error());
        assert!(AppError::Invalid("empty name".into()).is_client_error());
        assert!(!AppError::Storage("disk full".into()).is_client_error());
    }

    #[test]
    fn storage_error_display() {
        let e = AppError::Storage("catalog: insert level: locked".into());
        assert!(e.to_string().contains("catalog: insert level"));
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let e: AppError = io_err.into();
        assert!(e.to_string().contains("io error"));
        // satisfies std::error::Error trait
        let _: &dyn Error = &e;
    }
}

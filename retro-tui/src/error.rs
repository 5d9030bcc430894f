//! Error types for retro-tui

use thiserror::Error;

/// TUI-specific errors
#[derive(Error, Debug)]
pub enum TuiError {
    /// Service layer error
    #[error("Service error: {0}")]
    Service(#[from] libretroscroll::RetroScrollError),

    /// Terminal/IO error
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    /// Application state error
    #[error("Application error: {0}")]
    Application(String),
}

/// Result type for TUI operations
pub type Result<T> = std::result::Result<T, TuiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use libretroscroll::RetroScrollError;

    #[test]
    fn test_service_error_wraps_message() {
        let err: TuiError = RetroScrollError::InvalidInput("bad".to_string()).into();
        assert!(err.to_string().starts_with("Service error:"));
        assert!(err.to_string().contains("bad"));
    }
}

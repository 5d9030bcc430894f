//! Error types for RetroScroll

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RetroScrollError>;

#[derive(Error, Debug)]
pub enum RetroScrollError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Game error: {0}")]
    Game(#[from] GameError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl RetroScrollError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RetroScrollError::InvalidInput(_) => 3,
            RetroScrollError::Config(_) => 1,
            RetroScrollError::Storage(_) => 1,
            RetroScrollError::Game(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug, Clone)]
pub enum GameError {
    #[error("Unknown game: {0}")]
    UnknownGame(String),

    #[error("Failed to mount {game}: {reason}")]
    Mount { game: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = RetroScrollError::InvalidInput("Negative XP award".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_storage_error() {
        let storage_error = StorageError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only",
        ));
        let error = RetroScrollError::Storage(storage_error);
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_game_error() {
        let error = RetroScrollError::Game(GameError::UnknownGame("tetris".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_invalid_input() {
        let error = RetroScrollError::InvalidInput("XP award must be non-negative".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid input: XP award must be non-negative"
        );
    }

    #[test]
    fn test_error_message_formatting_config() {
        let config_error = ConfigError::InvalidValue {
            field: "feed.batch_size".to_string(),
            reason: "must be greater than zero".to_string(),
        };
        let error = RetroScrollError::Config(config_error);
        assert_eq!(
            format!("{}", error),
            "Configuration error: Invalid value for feed.batch_size: must be greater than zero"
        );
    }

    #[test]
    fn test_error_message_formatting_mount() {
        let error = GameError::Mount {
            game: "pacMan".to_string(),
            reason: "surface too small".to_string(),
        };
        assert_eq!(format!("{}", error), "Failed to mount pacMan: surface too small");
    }

    #[test]
    fn test_error_conversion_from_game_error() {
        let game_error = GameError::UnknownGame("test".to_string());
        let error: RetroScrollError = game_error.into();

        match error {
            RetroScrollError::Game(_) => {}
            _ => panic!("Expected RetroScrollError::Game"),
        }
    }

    #[test]
    fn test_error_conversion_from_storage_error() {
        let storage_error = StorageError::InvalidKey("".to_string());
        let error: RetroScrollError = storage_error.into();

        match error {
            RetroScrollError::Storage(_) => {}
            _ => panic!("Expected RetroScrollError::Storage"),
        }
    }
}

//! Centralized error types for tagpick.
//!
//! Library code returns `ConfigError` where it can fail; the binary folds
//! everything into [`AppError`] so it can show a readable message before
//! exiting. The selection core itself never fails: stale or unknown
//! operations are no-ops.

use thiserror::Error;

use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration or candidate file errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal setup or teardown failed.
    #[error("Terminal error: {0}")]
    Terminal(String),
}

impl AppError {
    /// Create a terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        AppError::Terminal(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read file. Please check it exists and is readable.".to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError { path, .. } => {
                    format!("'{}' is invalid. Please check the file format.", path)
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
                ConfigError::UnsupportedFormat(what) => {
                    format!("'{}' is not a TOML or JSON file.", what)
                }
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Terminal(msg) => format!("Terminal error: {}", msg),
        }
    }

    /// Check if this error should stop the program.
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            AppError::Config(ConfigError::ParseError { .. })
                | AppError::Config(ConfigError::ValidationError(_))
                | AppError::Config(ConfigError::UnsupportedFormat(_))
                | AppError::Config(ConfigError::ReadError(_))
                | AppError::Terminal(_)
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::UnsupportedFormat(_)) => {
                Some("Pass a candidate file ending in .toml or .json.")
            }
            AppError::Config(ConfigError::ParseError { .. }) => {
                Some("Candidate files list entries under [[items]] with key and text fields.")
            }
            AppError::Terminal(_) => Some("Run tagpick from an interactive terminal."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_app_error_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let app_err: AppError = io.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(!app_err.is_critical());
    }

    #[test]
    fn test_user_message_parse_error_names_file() {
        let err = AppError::Config(ConfigError::ParseError {
            path: "teams.toml".to_string(),
            message: "expected `]`".to_string(),
        });
        assert!(err.user_message().contains("teams.toml"));
        assert!(err.is_critical());
    }

    #[test]
    fn test_user_message_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "duplicate candidate key 'a'".to_string(),
        ));
        assert!(err.user_message().contains("duplicate candidate key"));
    }

    #[test]
    fn test_unsupported_format_has_suggestion() {
        let err = AppError::Config(ConfigError::UnsupportedFormat("teams.csv".to_string()));
        assert!(err.user_message().contains("teams.csv"));
        assert!(err.suggested_action().unwrap().contains(".json"));
    }

    #[test]
    fn test_no_config_dir_is_not_critical() {
        let err = AppError::Config(ConfigError::NoConfigDir);
        assert!(!err.is_critical());
        assert!(err.suggested_action().is_none());
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("not a tty");
        assert!(err.is_critical());
        assert_eq!(err.user_message(), "Terminal error: not a tty");
    }
}

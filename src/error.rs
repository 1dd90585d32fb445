//! Error types for IoT Forge
//!
//! Every fallible operation returns [`AppError`]. The UI shows
//! `user_message()` in the error banner and `title()` as its heading.

use thiserror::Error;

/// Main error type for IoT Forge operations
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid generation parameters or settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// File I/O error
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),

    /// Value cannot be represented in the target format
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Statistics or plots requested on zero rows
    #[error("Dataset is empty or has no rows")]
    EmptyDataset,

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Chart drawing failed
    #[error("Render error: {0}")]
    Render(String),

    /// System clipboard unavailable
    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Result type alias for IoT Forge operations
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => {
                AppError::Io(std::io::Error::other(err.to_string()))
            }
            _ => AppError::Serialization(err.to_string()),
        }
    }
}

impl From<arboard::Error> for AppError {
    fn from(err: arboard::Error) -> Self {
        AppError::Clipboard(err.to_string())
    }
}

/// UI-friendly error message formatting
impl AppError {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    /// Shorthand for a render error from any displayable backend error
    pub fn render(err: impl std::fmt::Display) -> Self {
        AppError::Render(err.to_string())
    }

    /// Get a user-friendly error message suitable for displaying in UI
    pub fn user_message(&self) -> String {
        match self {
            AppError::Configuration(msg) => format!("Invalid settings: {}", msg),
            AppError::Io(e) => format!("File error: {}", e),
            AppError::Serialization(msg) => format!("Cannot serialize data: {}", msg),
            AppError::EmptyDataset => {
                "No data available. Please generate IoT data first.".to_string()
            }
            AppError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            AppError::Polars(e) => format!("Data error: {}", e),
            AppError::Render(msg) => format!("Error drawing plot: {}", msg),
            AppError::Clipboard(msg) => format!("Clipboard unavailable: {}", msg),
        }
    }

    /// Get a short title for the error (for the error banner)
    pub fn title(&self) -> &'static str {
        match self {
            AppError::Configuration(_) => "Configuration Error",
            AppError::Io(_) => "File Error",
            AppError::Serialization(_) => "Serialization Error",
            AppError::EmptyDataset => "Empty Dataset",
            AppError::UnsupportedFormat { .. } => "Unsupported Format",
            AppError::Polars(_) => "Data Error",
            AppError::Render(_) => "Plot Error",
            AppError::Clipboard(_) => "Clipboard Error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AppError::UnsupportedFormat {
            extension: "xlsx".to_string(),
        };
        assert_eq!(err.user_message(), "Unsupported file format: '.xlsx'");
        assert_eq!(err.title(), "Unsupported Format");

        let err = AppError::config("user count must be positive");
        assert_eq!(err.user_message(), "Invalid settings: user count must be positive");
        assert_eq!(err.title(), "Configuration Error");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));

        let json_err = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let app_err: AppError = json_err.into();
        assert!(matches!(app_err, AppError::Serialization(_)));
    }
}

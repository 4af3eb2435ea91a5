use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::{describe_error_code, ErrorCode};

/// The unified error type for the trip planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Trip document error: {message}")]
    Document {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Validation error: {message}")]
    Validation {
        code: u16,
        message: String,
        field: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PlannerError {
    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a storage error with specific code and path
    pub fn storage_with_code(
        code: u16,
        message: impl Into<String>,
        path: Option<PathBuf>,
    ) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a trip document error with specific code
    pub fn document_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Document {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a validation error with specific code and field
    pub fn validation_with_code(
        code: u16,
        message: impl Into<String>,
        field: Option<String>,
    ) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            field,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Config { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Document { source: src, .. }
            | Self::Validation { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Add context to the error message
    pub fn with_context(mut self, context: impl Display) -> Self {
        match &mut self {
            Self::Config { message, .. }
            | Self::Storage { message, .. }
            | Self::Document { message, .. }
            | Self::Validation { message, .. } => {
                *message = format!("{}: {}", message, context);
            }
        }
        self
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => 2,
            Self::Storage { .. } => 4,
            Self::Document { .. } => 5,
            Self::Validation { .. } => 8,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Config { code, .. }
            | Self::Storage { code, .. }
            | Self::Document { code, .. }
            | Self::Validation { code, .. } => *code,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Storage { message, path, .. } => {
                if let Some(p) = path {
                    format!("Storage error at {}: {}", p.display(), message)
                } else {
                    format!("Storage error: {}", message)
                }
            }
            Self::Document { message, .. } => format!("Could not read trip: {}", message),
            Self::Validation { message, field, .. } => {
                if let Some(f) = field {
                    format!("Invalid value for '{}': {}", f, message)
                } else {
                    format!("Invalid value: {}", message)
                }
            }
        }
    }

    /// Check whether the error came from a failed persistence write or read
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}

/// Type alias for Results using PlannerError
pub type Result<T> = std::result::Result<T, PlannerError>;

impl From<std::io::Error> for PlannerError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let (code, message) = match err.kind() {
            ErrorKind::NotFound => (ErrorCode::STORAGE_NOT_FOUND, "File or directory not found"),
            ErrorKind::PermissionDenied => {
                (ErrorCode::STORAGE_PERMISSION_DENIED, "Permission denied")
            }
            ErrorKind::AlreadyExists => (ErrorCode::STORAGE_ALREADY_EXISTS, "Already exists"),
            ErrorKind::InvalidInput => (ErrorCode::VALIDATION_INVALID_INPUT, "Invalid input"),
            ErrorKind::InvalidData => (ErrorCode::VALIDATION_INVALID_DATA, "Invalid data"),
            _ => (ErrorCode::STORAGE_IO_ERROR, "IO operation failed"),
        };

        PlannerError::storage_with_code(code, message, None).with_source(err)
    }
}

impl From<serde_json::Error> for PlannerError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let code = match err.classify() {
            Category::Data => ErrorCode::DOCUMENT_INVALID_STRUCTURE,
            _ => ErrorCode::DOCUMENT_INVALID_JSON,
        };
        PlannerError::document_with_code(code, "Trip document could not be parsed")
            .with_source(err)
    }
}

impl From<toml::de::Error> for PlannerError {
    fn from(err: toml::de::Error) -> Self {
        PlannerError::config_with_code(ErrorCode::CONFIG_INVALID_TOML, "Invalid TOML syntax")
            .with_source(err)
    }
}

impl From<crate::storage::error::StorageError> for PlannerError {
    fn from(err: crate::storage::error::StorageError) -> Self {
        use crate::storage::error::StorageError;

        match err {
            StorageError::Io { path, source } => {
                let mut converted = PlannerError::from(source);
                if let Self::Storage { path: p, .. } = &mut converted {
                    *p = Some(path);
                }
                converted
            }
            StorageError::Serialization(source) => PlannerError::storage_with_code(
                ErrorCode::STORAGE_SERIALIZATION_ERROR,
                "Failed to serialize trip",
                None,
            )
            .with_source(source),
            StorageError::Corrupted { path, source } => PlannerError::storage_with_code(
                ErrorCode::STORAGE_CORRUPTED,
                "Stored trip is not a valid trip document",
                Some(path),
            )
            .with_source(source),
            StorageError::WriteRejected(msg) => {
                PlannerError::storage_with_code(ErrorCode::STORAGE_WRITE_FAILED, msg, None)
            }
        }
    }
}

//! Error types for remoteapp-core

use thiserror::Error;

/// Failure of a start request, shaped for the error dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartingError {
    /// Display name of the application that failed to start
    pub app_name: String,
    /// HTTP status code, or empty when the backend was unreachable
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for StartingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.code.is_empty() {
            write!(f, "Error when starting {}: {}", self.app_name, self.message)
        } else {
            write!(
                f,
                "Error when starting {}: [{}] {}",
                self.app_name, self.code, self.message
            )
        }
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Backend error: {0}")]
    Client(#[from] remoteapp_client::ClientError),

    #[error("{0}")]
    StartFailed(StartingError),

    #[error("Invalid selection: index {index} out of range for {len} applications")]
    InvalidSelection { index: usize, len: usize },

    #[error("No application selected")]
    NoSelection,

    #[error("Application '{0}' is already starting")]
    AlreadyStarting(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Application '{0}' is no longer listed")]
    UnknownApplication(String),

    #[error("Unknown configurable '{tag}' for application '{app}'")]
    UnknownConfigurable { app: String, tag: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;

use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};
use vfxwindow_config::ConfigError;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("No display available to place the window")]
    NoDisplayAvailable,

    #[error("Window instance was already torn down")]
    StaleInstanceTeardown,

    #[error("No live window registered as {identity}")]
    NotRegistered { identity: String },

    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),

    #[error("Toolkit error in {operation}: {reason}")]
    Toolkit {
        operation: &'static str,
        reason: String,
    },
}

impl WindowError {
    pub fn toolkit(operation: &'static str, error: impl fmt::Display) -> Self {
        WindowError::Toolkit {
            operation,
            reason: error.to_string(),
        }
    }
}

pub type Result<T, E = WindowError> = std::result::Result<T, E>;

/// Log and ignore errors (for cleanup operations)
pub fn log_and_ignore<T, E: fmt::Display>(result: std::result::Result<T, E>, operation: &str) {
    if let Err(e) = result {
        debug!("Ignoring error in {}: {}", operation, e);
    }
}

/// Log warning for non-critical errors
pub fn log_warn<T, E: fmt::Display>(result: std::result::Result<T, E>, operation: &str) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            warn!("Warning in {}: {}", operation, e);
            None
        }
    }
}

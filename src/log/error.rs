//! Log-sink error type.

use thiserror::Error;

/// Errors a [`super::LogSink`] can raise while recording or exporting
/// (§6 "Log records").
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to record log entry: {message}")]
    Record { message: String },

    #[error("failed to export log history: {message}")]
    Export { message: String },
}

impl LogError {
    pub fn record(message: impl Into<String>) -> Self {
        Self::Record {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

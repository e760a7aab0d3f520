use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("timestamp formatting failed: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl ReportError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        ReportError::Parse {
            line,
            message: message.into(),
        }
    }
}

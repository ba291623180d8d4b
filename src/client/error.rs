// File: ./src/client/error.rs
use crate::model::SyllabusError;
use std::path::PathBuf;
use thiserror::Error;

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";

/// Why one file could not be turned into a syllabus record.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Unsupported file type (accepted: {accepted})")]
    UnsupportedFileType { accepted: String },

    #[error("Could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,

    /// Non-2xx response; `message` is the best-effort text pulled from the body.
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected backend response: {0}")]
    InvalidResponse(String),

    #[error("Backend returned an unusable syllabus: {0}")]
    InvalidSyllabus(#[from] SyllabusError),
}

impl ExtractError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ExtractError::RateLimited)
    }

    /// Rejected locally, before any network traffic.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ExtractError::UnsupportedFileType { .. } | ExtractError::Io { .. }
        )
    }
}

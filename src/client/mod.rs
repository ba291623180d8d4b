// File: ./src/client/mod.rs
pub mod core;
pub mod error;
pub mod file_type;

pub use crate::client::core::{BackendClient, EXTRACT_ENDPOINT, backend_error_message};
pub use crate::client::error::{ExtractError, RATE_LIMIT_MESSAGE};
pub use crate::client::file_type::SupportedFileType;

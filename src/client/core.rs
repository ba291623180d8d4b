// File: src/client/core.rs
use crate::client::error::ExtractError;
use crate::client::file_type::SupportedFileType;
use crate::config::Config;
use crate::model::{ParsedSyllabus, parse_analyzed, validate};

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

pub const EXTRACT_ENDPOINT: &str = "/extract-text";

/// Success body of `POST /extract-text`.
#[derive(Debug, Deserialize)]
struct ExtractResponse {
    /// JSON-encoded syllabus; tolerated as an already-decoded object too.
    analyzed: Value,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    chars_extracted: Option<u64>,
}

/// Best-effort message for a failed request: the JSON `error` field, then a
/// plain-text body, then the status line.
pub fn backend_error_message(status: StatusCode, body: &str) -> String {
    let status_line = || {
        format!(
            "Backend error: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or_default()
        )
        .trim_end()
        .to_string()
    };

    match serde_json::from_str::<Value>(body) {
        Ok(json) => json
            .get("error")
            .and_then(Value::as_str)
            .filter(|e| !e.trim().is_empty())
            .map(str::to_string)
            .unwrap_or_else(status_line),
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status_line(),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// HTTP client for the syllabus extraction backend.
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Result<Self, ExtractError> {
        let http = reqwest::Client::builder()
            .user_agent(format!("syllabai/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ExtractError> {
        Self::new(&config.backend_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, EXTRACT_ENDPOINT)
    }

    /// Uploads one file and returns its validated syllabus record.
    /// Unsupported extensions are rejected before any request is made.
    pub async fn extract_file(&self, path: &Path) -> Result<ParsedSyllabus, ExtractError> {
        let file_type =
            SupportedFileType::from_path(path).ok_or_else(|| ExtractError::UnsupportedFileType {
                accepted: SupportedFileType::accepted_list(),
            })?;
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ExtractError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        self.extract_bytes(&file_name_of(path), file_type, bytes)
            .await
    }

    pub async fn extract_bytes(
        &self,
        file_name: &str,
        file_type: SupportedFileType,
        bytes: Vec<u8>,
    ) -> Result<ParsedSyllabus, ExtractError> {
        log::debug!("Using backend URL: {}", self.base_url);
        log::info!("Uploading {} ({} bytes, {})", file_name, bytes.len(), file_type);

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(file_type.mime())?;
        let form = Form::new().part("file", part);

        let response = self.http.post(self.endpoint()).multipart(form).send().await?;
        let status = response.status();
        log::debug!("Received response with status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ExtractError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractError::Backend {
                status: status.as_u16(),
                message: backend_error_message(status, &body),
            });
        }

        let body: ExtractResponse = response
            .json()
            .await
            .map_err(|e| ExtractError::InvalidResponse(e.to_string()))?;
        if let Some(chars) = body.chars_extracted {
            log::debug!(
                "Backend extracted {} characters from {}",
                chars,
                body.filename.as_deref().unwrap_or(file_name)
            );
        }

        let parsed = match body.analyzed {
            Value::String(raw) => parse_analyzed(&raw)?,
            obj @ Value::Object(_) => validate::from_value(obj)?,
            other => {
                return Err(ExtractError::InvalidResponse(format!(
                    "'analyzed' should be a JSON string, got {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::calendar::DateNormalizer;
use crate::color_utils::{CourseColor, CoursePalette, default_course_colors};
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_OUTPUT_FILE: &str = "syllabus-comparison.pdf";

/// Environment variables that override `backend_url`, highest priority first.
pub const BACKEND_URL_ENV_VARS: [&str; 2] = ["SYLLABAI_BACKEND_URL", "BACKEND_API_URL"];

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}
fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}
fn default_max_concurrent_uploads() -> usize {
    1
}
fn default_page_margin_mm() -> f32 {
    10.0
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// 1 processes uploads one at a time.
    #[serde(default = "default_max_concurrent_uploads")]
    pub max_concurrent_uploads: usize,

    /// Week-1 date for entries that only carry a week number.
    /// Defaults to the second Monday of January of the reference year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester_anchor: Option<NaiveDate>,

    #[serde(default = "default_page_margin_mm")]
    pub page_margin_mm: f32,

    // Array of tables; keep last so the TOML output stays valid.
    #[serde(default = "default_course_colors")]
    pub course_palette: Vec<CourseColor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            output_file: default_output_file(),
            max_concurrent_uploads: default_max_concurrent_uploads(),
            semester_anchor: None,
            page_margin_mm: default_page_margin_mm(),
            course_palette: default_course_colors(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Applies environment overrides through `lookup` (normally `std::env::var`).
    /// Resolved once at startup; the result is passed around as a plain value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = BACKEND_URL_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|v| !v.trim().is_empty())
        {
            self.backend_url = url.trim().to_string();
        }
    }

    pub fn with_process_env(mut self) -> Self {
        self.apply_env_overrides(|key| std::env::var(key).ok());
        self
    }

    pub fn upload_concurrency(&self) -> usize {
        self.max_concurrent_uploads.max(1)
    }

    pub fn palette(&self) -> CoursePalette {
        CoursePalette::from_config(&self.course_palette)
    }

    pub fn date_normalizer(&self, year: i32) -> DateNormalizer {
        match self.semester_anchor {
            Some(anchor) => DateNormalizer::with_anchor(year, anchor),
            None => DateNormalizer::new(year),
        }
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

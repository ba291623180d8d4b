// File: ./src/session.rs
//! In-memory state for one comparison session: uploaded files, their parse
//! outcome, and which sections the user picked. Nothing here is persisted.
use crate::client::{BackendClient, ExtractError};
use crate::model::{NamedSyllabus, ParsedSyllabus, Section, parse_analyzed};
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const RATE_LIMIT_BANNER: &str =
    "Usage limit reached! You've reached your usage limit. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Parsed(ParsedSyllabus),
    /// `local` marks files rejected before any request was sent.
    Failed {
        message: String,
        rate_limited: bool,
        local: bool,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub path: PathBuf,
    pub outcome: UploadOutcome,
}

impl UploadedFile {
    pub fn parsed(&self) -> Option<&ParsedSyllabus> {
        match &self.outcome {
            UploadOutcome::Parsed(p) => Some(p),
            UploadOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            UploadOutcome::Parsed(_) => None,
            UploadOutcome::Failed { message, .. } => Some(message),
        }
    }

    /// Failed without ever reaching the backend (bad type, unreadable, bad JSON).
    pub fn is_local_failure(&self) -> bool {
        matches!(self.outcome, UploadOutcome::Failed { local: true, .. })
    }

    fn from_result(path: PathBuf, result: Result<ParsedSyllabus, ExtractError>) -> Self {
        let name = display_name(&path);
        let outcome = match result {
            Ok(parsed) => UploadOutcome::Parsed(parsed),
            Err(e) => {
                log::error!("Text extraction error for {}: {}", name, e);
                UploadOutcome::Failed {
                    message: format!("Failed to extract text from {}: {}", name, e),
                    rate_limited: e.is_rate_limited(),
                    local: e.is_local(),
                }
            }
        };
        Self {
            name,
            path,
            outcome,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub parsed: usize,
    pub failed: usize,
    pub rate_limited: bool,
}

/// Files in upload order. A file name appears at most once.
#[derive(Debug, Clone, Default)]
pub struct UploadSession {
    files: Vec<UploadedFile>,
    rate_limited: bool,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends every path to the backend, at most `concurrency` at a time.
    ///
    /// Results keep input order. A failing file is recorded with its error and
    /// never stops the others. The rate-limit banner reflects this batch only.
    pub async fn upload(
        &mut self,
        client: &BackendClient,
        paths: &[PathBuf],
        concurrency: usize,
    ) -> UploadSummary {
        self.rate_limited = false;

        let results: Vec<UploadedFile> = stream::iter(paths.iter().cloned())
            .map(|path| async move {
                let result = client.extract_file(&path).await;
                UploadedFile::from_result(path, result)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut summary = UploadSummary::default();
        for file in results {
            match &file.outcome {
                UploadOutcome::Parsed(_) => summary.parsed += 1,
                UploadOutcome::Failed { rate_limited, .. } => {
                    summary.failed += 1;
                    summary.rate_limited |= *rate_limited;
                }
            }
            self.insert(file);
        }
        self.rate_limited = summary.rate_limited;
        summary
    }

    /// Reads already-analyzed JSON records from disk instead of uploading.
    pub async fn load_analyzed(&mut self, paths: &[PathBuf]) -> UploadSummary {
        self.rate_limited = false;
        let mut summary = UploadSummary::default();
        for path in paths {
            let parsed = match tokio::fs::read_to_string(path).await {
                Ok(raw) => parse_analyzed(&raw).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match parsed {
                Ok(parsed) => {
                    summary.parsed += 1;
                    self.add_parsed(path.clone(), parsed);
                }
                Err(reason) => {
                    summary.failed += 1;
                    let message = format!(
                        "Failed to extract text from {}: {}",
                        display_name(path),
                        reason
                    );
                    log::error!("{}", message);
                    self.add_failed(path.clone(), message);
                }
            }
        }
        summary
    }

    /// Adds an already-parsed record.
    pub fn add_parsed(&mut self, path: PathBuf, parsed: ParsedSyllabus) {
        self.insert(UploadedFile::from_result(path, Ok(parsed)));
    }

    /// Records a file that failed before reaching the backend.
    pub fn add_failed(&mut self, path: PathBuf, message: String) {
        let name = display_name(&path);
        self.insert(UploadedFile {
            name,
            path,
            outcome: UploadOutcome::Failed {
                message,
                rate_limited: false,
                local: true,
            },
        });
    }

    fn insert(&mut self, file: UploadedFile) {
        match self.files.iter_mut().find(|f| f.name == file.name) {
            Some(existing) => *existing = file,
            None => self.files.push(file),
        }
    }

    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    pub fn reset(&mut self) {
        self.files.clear();
        self.rate_limited = false;
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn is_rate_limited(&self) -> bool {
        self.rate_limited
    }

    /// Successfully parsed files, in upload order.
    pub fn syllabuses(&self) -> Vec<NamedSyllabus> {
        self.files
            .iter()
            .filter_map(|f| f.parsed().map(|p| NamedSyllabus::new(f.name.clone(), p.clone())))
            .collect()
    }
}

/// Per-file record of which sections each syllabus has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllabusSelections {
    rows: Vec<(String, Vec<Section>)>,
}

impl SyllabusSelections {
    pub fn from_syllabuses(syllabuses: &[NamedSyllabus]) -> Self {
        let rows = syllabuses
            .iter()
            .map(|s| (s.file_name.clone(), Section::present_in(&s.parsed)))
            .collect();
        Self { rows }
    }

    pub fn has(&self, file_name: &str, section: &Section) -> bool {
        self.rows
            .iter()
            .any(|(name, sections)| name == file_name && sections.contains(section))
    }

    /// Sections every file has, in the first file's order.
    pub fn common_sections(&self) -> Vec<Section> {
        let Some((_, first)) = self.rows.first() else {
            return Vec::new();
        };
        first
            .iter()
            .filter(|section| self.rows.iter().all(|(_, s)| s.contains(section)))
            .cloned()
            .collect()
    }

    /// `{ fileName: { sectionKey: bool } }` over every section any file has.
    pub fn to_matrix(&self) -> BTreeMap<String, BTreeMap<String, bool>> {
        let mut all: Vec<&Section> = self.rows.iter().flat_map(|(_, s)| s).collect();
        all.sort();
        all.dedup();
        self.rows
            .iter()
            .map(|(name, sections)| {
                let row = all
                    .iter()
                    .map(|s| (s.key().to_string(), sections.contains(s)))
                    .collect();
                (name.clone(), row)
            })
            .collect()
    }
}

/// The user's ordered choice of sections to compare.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionSelection {
    chosen: Vec<Section>,
}

impl SectionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sections<I: IntoIterator<Item = Section>>(sections: I) -> Self {
        let mut selection = Self::new();
        for s in sections {
            selection.set(s, true);
        }
        selection
    }

    /// Checking appends (once); unchecking removes.
    pub fn set(&mut self, section: Section, checked: bool) {
        if checked {
            if !self.chosen.contains(&section) {
                self.chosen.push(section);
            }
        } else {
            self.chosen.retain(|s| *s != section);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn chosen(&self) -> &[Section] {
        &self.chosen
    }

    /// Selection order, except the schedule always goes last.
    pub fn ordered(&self) -> Vec<Section> {
        let mut sections = self.chosen.clone();
        sections.sort_by_key(Section::is_schedule);
        sections
    }

    /// Chosen sections that not every file has.
    pub fn missing_from(&self, common: &[Section]) -> Vec<Section> {
        self.chosen
            .iter()
            .filter(|s| !common.contains(s))
            .cloned()
            .collect()
    }
}

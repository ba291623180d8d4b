// File: ./src/model/section.rs
use crate::model::ParsedSyllabus;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Top-level keys that carry bookkeeping rather than comparable content.
const NON_SECTION_KEYS: [&str; 2] = ["rawContent", "pageRanges"];

/// A named sub-part of a syllabus record that can be selected for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    CourseInfo,
    GradeDistribution,
    Policies,
    InstructorInfo,
    Materials,
    Schedule,
    /// Any extra top-level key the backend returned.
    Other(String),
}

impl Section {
    /// Known sections, in the order the extraction backend emits them.
    pub const KNOWN: [Section; 6] = [
        Section::CourseInfo,
        Section::GradeDistribution,
        Section::Policies,
        Section::InstructorInfo,
        Section::Materials,
        Section::Schedule,
    ];

    pub fn key(&self) -> &str {
        match self {
            Section::CourseInfo => "courseInfo",
            Section::GradeDistribution => "gradeDistribution",
            Section::Policies => "policies",
            Section::InstructorInfo => "instructorInfo",
            Section::Materials => "materials",
            Section::Schedule => "schedule",
            Section::Other(key) => key,
        }
    }

    pub fn is_schedule(&self) -> bool {
        matches!(self, Section::Schedule)
    }

    /// "gradeDistribution" -> "Grade Distribution".
    pub fn display_name(&self) -> String {
        let mut words: Vec<String> = Vec::new();
        let mut current = String::new();
        for ch in self.key().chars() {
            if ch.is_uppercase() && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.push(ch);
        }
        if !current.is_empty() {
            words.push(current);
        }
        words
            .iter()
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether `syllabus` carries data for this section.
    pub fn is_present_in(&self, syllabus: &ParsedSyllabus) -> bool {
        match self {
            Section::CourseInfo => true,
            Section::GradeDistribution => syllabus.grade_distribution.is_some(),
            Section::Policies => syllabus.policies.is_some(),
            Section::InstructorInfo => syllabus.instructor_info.is_some(),
            Section::Materials => syllabus.materials.is_some(),
            Section::Schedule => syllabus.schedule.is_some(),
            Section::Other(key) => syllabus.extra.get(key).is_some_and(|v| !v.is_null()),
        }
    }

    /// All sections present in `syllabus`: known ones first, then extras by key.
    pub fn present_in(syllabus: &ParsedSyllabus) -> Vec<Section> {
        let mut sections: Vec<Section> = Self::KNOWN
            .iter()
            .filter(|s| s.is_present_in(syllabus))
            .cloned()
            .collect();
        sections.extend(
            syllabus
                .extra
                .iter()
                .filter(|(k, v)| !v.is_null() && !NON_SECTION_KEYS.contains(&k.as_str()))
                .map(|(k, _)| Section::Other(k.clone())),
        );
        sections
    }

    /// Raw JSON payload for this section, used by the generic formatter.
    pub fn payload(&self, syllabus: &ParsedSyllabus) -> Option<Value> {
        let value = match self {
            Section::CourseInfo => serde_json::to_value(&syllabus.course_info).ok(),
            Section::GradeDistribution => syllabus
                .grade_distribution
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
            Section::Policies => syllabus
                .policies
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
            Section::InstructorInfo => syllabus
                .instructor_info
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
            Section::Materials => syllabus
                .materials
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
            Section::Schedule => syllabus
                .schedule
                .as_ref()
                .and_then(|v| serde_json::to_value(v).ok()),
            Section::Other(key) => syllabus.extra.get(key).cloned(),
        };
        value.filter(|v| !v.is_null())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Section {
    type Err = std::convert::Infallible;

    /// Accepts the camelCase key, case-insensitively; unknown names become `Other`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let known = Self::KNOWN
            .iter()
            .find(|k| k.key().eq_ignore_ascii_case(trimmed))
            .cloned();
        Ok(known.unwrap_or_else(|| Section::Other(trimmed.to_string())))
    }
}

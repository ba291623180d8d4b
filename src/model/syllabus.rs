// File: ./src/model/syllabus.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Marker the extraction backend uses for dates it could not pin down.
pub const UNRESOLVED_DATE: &str = "TBD";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInfo {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeachingAssistant {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub office_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InstructorInfo {
    #[serde(default)]
    pub instructors: Vec<Instructor>,
    #[serde(default)]
    pub tas: Vec<TeachingAssistant>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeWeight {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeCutoff {
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub minimum: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GradeDistribution {
    #[serde(default)]
    pub weights: Vec<GradeWeight>,
    #[serde(default)]
    pub scale: Vec<GradeCutoff>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyNote {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePolicies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_work: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment_drops: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homework_format: Option<String>,
    #[serde(default)]
    pub other: Vec<PolicyNote>,
}

/// One row of a course schedule.
///
/// When both `date` and `week` are present the explicit date wins, unless it
/// is the unresolved marker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScheduleEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub week: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignments: Option<String>,
}

impl ScheduleEntry {
    /// The explicit date token, if one exists and is not the unresolved marker.
    pub fn date_token(&self) -> Option<&str> {
        self.date
            .as_deref()
            .filter(|d| !d.eq_ignore_ascii_case(UNRESOLVED_DATE))
    }

    /// Case-insensitive "exam" match on the topic or the assignments text.
    pub fn is_exam(&self) -> bool {
        let has_exam = |s: &str| s.to_lowercase().contains("exam");
        has_exam(&self.topic) || self.assignments.as_deref().is_some_and(has_exam)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CourseSchedule {
    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

/// Structured representation of one parsed course document.
///
/// Produced once per uploaded file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSyllabus {
    pub course_info: CourseInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_info: Option<InstructorInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_distribution: Option<GradeDistribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<CoursePolicies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<CourseSchedule>,
    #[serde(default)]
    pub raw_content: String,
    #[serde(default)]
    pub page_ranges: BTreeMap<String, PageRange>,
    /// Top-level keys the backend returned that this model has no field for.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ParsedSyllabus {
    /// Title to show for this course, falling back to the uploaded file name.
    pub fn display_title<'a>(&'a self, file_name: &'a str) -> &'a str {
        let title = self.course_info.title.trim();
        if title.is_empty() { file_name } else { title }
    }

    pub fn schedule_entries(&self) -> &[ScheduleEntry] {
        self.schedule
            .as_ref()
            .map(|s| s.entries.as_slice())
            .unwrap_or_default()
    }
}

/// A parsed syllabus paired with the file it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSyllabus {
    pub file_name: String,
    pub parsed: ParsedSyllabus,
}

impl NamedSyllabus {
    pub fn new(file_name: impl Into<String>, parsed: ParsedSyllabus) -> Self {
        Self {
            file_name: file_name.into(),
            parsed,
        }
    }

    pub fn title(&self) -> &str {
        self.parsed.display_title(&self.file_name)
    }
}

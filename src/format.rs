// File: ./src/format.rs
//! Flat display text for syllabus sections.
//!
//! Each known section has a fixed template. Absent fields are skipped and
//! unknown sections fall back to a pretty-printed JSON dump, so formatting
//! never fails.
use crate::model::{
    CoursePolicies, CourseSchedule, GradeDistribution, InstructorInfo, NamedSyllabus, Section,
};
use serde_json::Value;
use std::fmt::Write;

pub const NO_DATA: &str = "No data available";

/// Collapses all whitespace runs (including newlines and tabs) to single spaces.
/// The text comparison applies it line by line.
pub fn sanitize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `30.0` -> "30", `12.5` -> "12.5".
fn number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

pub fn format_grade_distribution(data: &GradeDistribution) -> String {
    let mut text = String::from("Grade Weights:\n");
    for w in &data.weights {
        let _ = writeln!(text, "{}: {}%", w.category, number(w.percentage));
    }
    text.push_str("\nGrade Scale:\n");
    for s in &data.scale {
        let _ = writeln!(text, "{}: {}%+", s.grade, number(s.minimum));
    }
    text
}

pub fn format_policies(data: &CoursePolicies) -> String {
    let mut text = String::new();
    let labelled = [
        ("Attendance", &data.attendance),
        ("Late Work", &data.late_work),
        ("Assignment Drops", &data.assignment_drops),
        ("Exam Format", &data.exam_format),
        ("Homework Format", &data.homework_format),
    ];
    for (label, value) in labelled {
        if let Some(v) = value {
            let _ = write!(text, "{}: {}\n\n", label, v);
        }
    }
    for p in &data.other {
        let _ = write!(text, "{}:\n{}\n\n", p.title, p.content);
    }
    text
}

fn with_email(name: &str, email: Option<&str>) -> String {
    match email {
        Some(e) if !e.is_empty() => format!("{} ({})", name, e),
        _ => name.to_string(),
    }
}

pub fn format_instructor_info(data: &InstructorInfo) -> String {
    let mut text = String::from("Instructors:\n");
    for i in &data.instructors {
        let _ = writeln!(text, "{}", with_email(&i.name, i.email.as_deref()));
        if let Some(office) = &i.office {
            let _ = writeln!(text, "Office: {}", office);
        }
        if let Some(hours) = &i.office_hours {
            let _ = writeln!(text, "Hours: {}", hours);
        }
        text.push('\n');
    }

    if !data.tas.is_empty() {
        text.push_str("Teaching Assistants:\n");
        for ta in &data.tas {
            let _ = writeln!(text, "{}", with_email(&ta.name, ta.email.as_deref()));
            if let Some(hours) = &ta.office_hours {
                let _ = writeln!(text, "Hours: {}", hours);
            }
            text.push('\n');
        }
    }
    text
}

pub fn format_materials(data: &[String]) -> String {
    if data.is_empty() {
        return "No materials listed".to_string();
    }
    data.iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_schedule(data: &CourseSchedule) -> String {
    if data.entries.is_empty() {
        return "No schedule available".to_string();
    }
    data.entries
        .iter()
        .map(|entry| {
            let mut parts = Vec::new();
            if let Some(week) = entry.week {
                parts.push(format!("Week {}", week));
            }
            if let Some(date) = &entry.date {
                parts.push(date.clone());
            }
            parts.push(format!("\nTopic: {}", entry.topic));
            if let Some(a) = &entry.assignments {
                parts.push(format!("\nAssignments: {}", a));
            }
            parts.join(" ") + "\n"
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn dump(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Formats an untyped section payload.
///
/// Known sections are decoded into their typed form first; a payload that
/// does not fit its type, or a section with no template, is dumped as JSON.
pub fn format_section_content(data: &Value, section: &Section) -> String {
    if data.is_null() {
        return NO_DATA.to_string();
    }
    let typed = match section {
        Section::GradeDistribution => serde_json::from_value(data.clone())
            .ok()
            .map(|d| format_grade_distribution(&d)),
        Section::Policies => serde_json::from_value(data.clone())
            .ok()
            .map(|d| format_policies(&d)),
        Section::InstructorInfo => serde_json::from_value(data.clone())
            .ok()
            .map(|d| format_instructor_info(&d)),
        Section::Materials => serde_json::from_value::<Vec<String>>(data.clone())
            .ok()
            .map(|d| format_materials(&d)),
        Section::Schedule => serde_json::from_value(data.clone())
            .ok()
            .map(|d| format_schedule(&d)),
        Section::CourseInfo | Section::Other(_) => None,
    };
    typed.unwrap_or_else(|| dump(data))
}

/// Formats one section of one syllabus.
pub fn format_section(syllabus: &NamedSyllabus, section: &Section) -> String {
    let payload = section.payload(&syllabus.parsed).unwrap_or(Value::Null);
    format_section_content(&payload, section)
}

/// Plain-text side-by-side comparison: one block per section, one entry per course.
pub fn render_text_comparison(syllabuses: &[NamedSyllabus], sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        let header = section.display_name().to_uppercase();
        let _ = writeln!(out, "{}", header);
        let _ = writeln!(out, "{}", "=".repeat(header.chars().count()));
        for syllabus in syllabuses {
            let title = syllabus.title();
            let _ = writeln!(out, "\n{}", title);
            let _ = writeln!(out, "{}", "-".repeat(title.chars().count()));
            let body = format_section(syllabus, section);
            let body: Vec<String> = body.lines().map(sanitize_text).collect();
            let _ = writeln!(out, "{}", body.join("\n").trim_end());
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GradeCutoff, GradeWeight, Instructor, ParsedSyllabus, ScheduleEntry};
    use serde_json::json;

    #[test]
    fn test_grade_distribution_template() {
        let data = GradeDistribution {
            weights: vec![GradeWeight {
                category: "Exams".into(),
                percentage: 40.0,
            }],
            scale: vec![GradeCutoff {
                grade: "A".into(),
                minimum: 92.5,
            }],
        };
        assert_eq!(
            format_grade_distribution(&data),
            "Grade Weights:\nExams: 40%\n\nGrade Scale:\nA: 92.5%+\n"
        );
    }

    #[test]
    fn test_policies_skip_absent_fields_in_order() {
        let data = CoursePolicies {
            late_work: Some("10% per day".into()),
            attendance: Some("Required".into()),
            ..Default::default()
        };
        assert_eq!(
            format_policies(&data),
            "Attendance: Required\n\nLate Work: 10% per day\n\n"
        );
    }

    #[test]
    fn test_instructor_info_template() {
        let data = InstructorInfo {
            instructors: vec![Instructor {
                name: "Dr. Lee".into(),
                email: Some("lee@uni.edu".into()),
                office: None,
                office_hours: Some("Mon 2-4".into()),
            }],
            tas: vec![],
        };
        assert_eq!(
            format_instructor_info(&data),
            "Instructors:\nDr. Lee (lee@uni.edu)\nHours: Mon 2-4\n\n"
        );
    }

    #[test]
    fn test_schedule_and_materials_templates() {
        let schedule = CourseSchedule {
            entries: vec![ScheduleEntry {
                week: Some(2),
                date: Some("1/15".into()),
                topic: "Recursion".into(),
                assignments: Some("HW1".into()),
            }],
        };
        assert_eq!(
            format_schedule(&schedule),
            "Week 2 1/15 \nTopic: Recursion \nAssignments: HW1\n"
        );
        assert_eq!(
            format_materials(&["Book".to_string(), "Laptop".to_string()]),
            "1. Book\n2. Laptop"
        );
        assert_eq!(format_materials(&[]), "No materials listed");
        assert_eq!(
            format_schedule(&CourseSchedule::default()),
            "No schedule available"
        );
    }

    #[test]
    fn test_unknown_or_malformed_payloads_fall_back_to_dump() {
        let payload = json!({"room": "B12"});
        assert_eq!(
            format_section_content(&payload, &Section::Other("labInfo".into())),
            "{\n  \"room\": \"B12\"\n}"
        );
        // A materials payload that is not a list of strings is dumped, not rejected.
        assert_eq!(format_section_content(&json!(42), &Section::Materials), "42");
        assert_eq!(format_section_content(&Value::Null, &Section::Policies), NO_DATA);
    }

    #[test]
    fn test_format_section_missing_data() {
        let s = NamedSyllabus::new("a.pdf", ParsedSyllabus::default());
        assert_eq!(format_section(&s, &Section::Policies), NO_DATA);
    }

    #[test]
    fn test_sanitize_text_collapses_whitespace() {
        assert_eq!(sanitize_text(" a\n\tb   c\r\n"), "a b c");
    }

    #[test]
    fn test_format_section_matches_typed_template() {
        let parsed = ParsedSyllabus {
            materials: Some(vec!["Book".into()]),
            ..Default::default()
        };
        let s = NamedSyllabus::new("a.pdf", parsed);
        assert_eq!(format_section(&s, &Section::Materials), "1. Book");
        assert!(format_section(&s, &Section::CourseInfo).contains("\"title\": \"\""));
    }

    #[test]
    fn test_text_comparison_sanitizes_each_line() {
        let parsed = ParsedSyllabus {
            policies: Some(CoursePolicies {
                late_work: Some("10%\t per   day".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let s = NamedSyllabus::new("a.pdf", parsed);
        let text = render_text_comparison(&[s], &[Section::Policies]);
        assert_eq!(text, "POLICIES\n========\n\na.pdf\n-----\nLate Work: 10% per day\n\n");
    }
}

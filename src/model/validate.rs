// File: ./src/model/validate.rs
//! Boundary between the extraction backend's loosely structured JSON and the
//! typed syllabus model. Nothing past this module sees unvalidated data.
use crate::model::{ParsedSyllabus, ScheduleEntry, UNRESOLVED_DATE};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyllabusError {
    #[error("analysis is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("analysis has an unexpected shape: {0}")]
    Shape(#[source] serde_json::Error),
    #[error("analysis must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error("analysis has no courseInfo")]
    MissingCourseInfo,
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Removes markdown code fences the language model sometimes wraps around its answer.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = rest.strip_prefix("json").unwrap_or(rest);
    }
    if let Some(rest) = s.trim_end().strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// Parses the `analyzed` string returned by the backend into a `ParsedSyllabus`.
pub fn parse_analyzed(raw: &str) -> Result<ParsedSyllabus, SyllabusError> {
    let value: Value = serde_json::from_str(strip_code_fences(raw))?;
    from_value(value)
}

/// Validates an already-decoded JSON document (used for `--from-json` inputs too).
pub fn from_value(value: Value) -> Result<ParsedSyllabus, SyllabusError> {
    let Value::Object(mut map) = value else {
        return Err(SyllabusError::NotAnObject(kind_of(&value)));
    };

    // Null means "absent" at any depth; serde would otherwise reject it.
    map.values_mut().for_each(drop_nulls);
    map.retain(|_, v| !v.is_null());
    if !map.contains_key("courseInfo") {
        return Err(SyllabusError::MissingCourseInfo);
    }
    if let Some(Value::Object(schedule)) = map.get_mut("schedule")
        && let Some(Value::Array(entries)) = schedule.get_mut("entries")
    {
        for entry in entries.iter_mut() {
            if let Value::Object(fields) = entry {
                coerce_week(fields);
            }
        }
    }
    if let Some(Value::Object(grades)) = map.get_mut("gradeDistribution") {
        for (list, field) in [("weights", "percentage"), ("scale", "minimum")] {
            if let Some(Value::Array(rows)) = grades.get_mut(list) {
                for row in rows.iter_mut() {
                    if let Value::Object(fields) = row {
                        coerce_number(fields, field);
                    }
                }
            }
        }
    }

    let mut parsed: ParsedSyllabus =
        serde_json::from_value(Value::Object(map)).map_err(SyllabusError::Shape)?;
    normalize(&mut parsed);
    Ok(parsed)
}

/// Removes null object members and array items, recursively.
fn drop_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(drop_nulls);
        }
        Value::Array(items) => {
            items.retain(|v| !v.is_null());
            items.iter_mut().for_each(drop_nulls);
        }
        _ => {}
    }
}

/// Accepts `"30%"` or `" 12.5 "` for a numeric field; anything else is dropped.
fn coerce_number(fields: &mut serde_json::Map<String, Value>, key: &str) {
    let Some(value) = fields.get(key) else {
        return;
    };
    let coerced = match value {
        Value::Number(_) => return,
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim_end()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite()),
        _ => None,
    };
    match coerced.and_then(serde_json::Number::from_f64) {
        Some(n) => {
            fields.insert(key.into(), Value::Number(n));
        }
        None => {
            log::warn!("Dropping unusable {} value {}", key, value);
            fields.remove(key);
        }
    }
}

/// Accepts `"3"` or `3.0` for a week number; anything else is dropped.
fn coerce_week(fields: &mut serde_json::Map<String, Value>) {
    let Some(week) = fields.get("week") else {
        return;
    };
    let coerced = match week {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f > 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match coerced.and_then(|w| u32::try_from(w).ok()) {
        Some(w) => {
            fields.insert("week".into(), Value::from(w));
        }
        None => {
            log::warn!("Dropping unusable week value {}", week);
            fields.remove("week");
        }
    }
}

fn normalize_opt(field: &mut Option<String>) {
    if let Some(s) = field {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            *field = None;
        } else if trimmed.len() != s.len() {
            *field = Some(trimmed.to_string());
        }
    }
}

fn normalize_entry(entry: &mut ScheduleEntry) {
    entry.topic = entry.topic.trim().to_string();
    normalize_opt(&mut entry.assignments);
    normalize_opt(&mut entry.date);
    if entry
        .date
        .as_deref()
        .is_some_and(|d| d.eq_ignore_ascii_case(UNRESOLVED_DATE))
    {
        entry.date = Some(UNRESOLVED_DATE.to_string());
    }
    if entry.week == Some(0) {
        entry.week = None;
    }
}

fn normalize(parsed: &mut ParsedSyllabus) {
    parsed.course_info.title = parsed.course_info.title.trim().to_string();
    normalize_opt(&mut parsed.course_info.course_code);

    if let Some(policies) = parsed.policies.as_mut() {
        normalize_opt(&mut policies.attendance);
        normalize_opt(&mut policies.late_work);
        normalize_opt(&mut policies.assignment_drops);
        normalize_opt(&mut policies.exam_format);
        normalize_opt(&mut policies.homework_format);
    }

    if let Some(materials) = parsed.materials.as_mut() {
        materials.retain(|m| !m.trim().is_empty());
    }

    if let Some(schedule) = parsed.schedule.as_mut() {
        for entry in schedule.entries.iter_mut() {
            normalize_entry(entry);
        }
        schedule
            .entries
            .retain(|e| !e.topic.is_empty() || e.assignments.is_some());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {} "), "{}");
    }

    #[test]
    fn test_parse_analyzed_normalizes_schedule() {
        let raw = r#"```json
        {
            "courseInfo": {"title": "  CS 101 ", "description": "Intro"},
            "schedule": {"entries": [
                {"week": null, "date": "tbd", "topic": "Review"},
                {"week": "3", "date": "", "topic": "Loops"},
                {"week": 0, "date": "2/4", "topic": " Arrays "},
                {"topic": "", "assignments": ""}
            ]},
            "materials": ["Textbook", "  "],
            "pageRanges": null
        }
        ```"#;
        let parsed = parse_analyzed(raw).expect("valid analysis");
        assert_eq!(parsed.course_info.title, "CS 101");

        let entries = parsed.schedule_entries();
        assert_eq!(entries.len(), 3, "empty entry should be dropped");
        assert_eq!(entries[0].date.as_deref(), Some("TBD"));
        assert_eq!(entries[0].date_token(), None);
        assert_eq!(entries[1].week, Some(3));
        assert_eq!(entries[1].date, None);
        assert_eq!(entries[2].week, None);
        assert_eq!(entries[2].topic, "Arrays");
        assert_eq!(parsed.materials, Some(vec!["Textbook".to_string()]));
    }

    #[test]
    fn test_rejects_non_object_and_missing_course_info() {
        assert!(matches!(
            parse_analyzed("[1, 2]"),
            Err(SyllabusError::NotAnObject("an array"))
        ));
        assert!(matches!(
            parse_analyzed(r#"{"policies": {}}"#),
            Err(SyllabusError::MissingCourseInfo)
        ));
        assert!(matches!(parse_analyzed("not json"), Err(SyllabusError::Json(_))));
    }

    #[test]
    fn test_loosely_typed_nested_fields_do_not_reject_the_record() {
        let raw = r#"{
            "courseInfo": {"title": null, "description": "Survey", "courseCode": null},
            "instructorInfo": {
                "instructors": [{"name": null, "email": "prof@uni.edu"}, null],
                "tas": null
            },
            "gradeDistribution": {
                "weights": [
                    {"category": "Exams", "percentage": null},
                    {"category": "Labs", "percentage": "30%"},
                    {"category": "Quizzes", "percentage": " 12.5 "},
                    {"category": "Bonus", "percentage": "some"}
                ],
                "scale": [{"grade": "A", "minimum": "90"}]
            },
            "policies": {"attendance": null, "other": [{"title": "Phones", "content": null}]},
            "materials": ["Book", null]
        }"#;
        let parsed = parse_analyzed(raw).expect("nested nulls are absent fields");
        assert_eq!(parsed.course_info.title, "");
        assert_eq!(parsed.course_info.course_code, None);

        let instructors = parsed.instructor_info.unwrap();
        assert_eq!(instructors.instructors.len(), 1);
        assert_eq!(instructors.instructors[0].name, "");
        assert!(instructors.tas.is_empty());

        let grades = parsed.grade_distribution.unwrap();
        let percentages: Vec<f64> = grades.weights.iter().map(|w| w.percentage).collect();
        assert_eq!(percentages, vec![0.0, 30.0, 12.5, 0.0]);
        assert_eq!(grades.scale[0].minimum, 90.0);

        let policies = parsed.policies.unwrap();
        assert_eq!(policies.attendance, None);
        assert_eq!(policies.other[0].content, "");
        assert_eq!(parsed.materials, Some(vec!["Book".to_string()]));
    }

    #[test]
    fn test_type_mismatch_is_a_shape_error() {
        let err = parse_analyzed(r#"{"courseInfo": {"title": ["not", "a", "string"]}}"#)
            .unwrap_err();
        assert!(matches!(err, SyllabusError::Shape(_)));
        assert!(err.to_string().starts_with("analysis has an unexpected shape"));
    }

    #[test]
    fn test_unknown_keys_are_kept_as_extras() {
        let parsed =
            parse_analyzed(r#"{"courseInfo": {"title": "X"}, "labs": ["Lab A"]}"#).unwrap();
        assert_eq!(parsed.extra.get("labs"), Some(&serde_json::json!(["Lab A"])));
    }
}

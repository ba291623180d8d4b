// End-to-end export: page plan, calendar content and the written PDF.
use chrono::NaiveDate;
use syllabai::calendar::{DateNormalizer, compose};
use syllabai::color_utils::{CoursePalette, EXAM_SWATCH};
use syllabai::config::Config;
use syllabai::context::TestContext;
use syllabai::export::{ExportOptions, PageKind, export_to_file, plan_pages};
use syllabai::format::render_text_comparison;
use syllabai::model::{NamedSyllabus, Section, parse_analyzed};
use syllabai::session::{SectionSelection, SyllabusSelections};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn syllabuses() -> Vec<NamedSyllabus> {
    let calc = parse_analyzed(
        r#"{
            "courseInfo": {"title": "Calculus I", "description": "Limits"},
            "gradeDistribution": {
                "weights": [{"category": "Exams", "percentage": 60}],
                "scale": [{"grade": "A", "minimum": 90}]
            },
            "schedule": {"entries": [
                {"date": "1/15", "topic": "Midterm Exam"}
            ]}
        }"#,
    )
    .unwrap();
    let bio = parse_analyzed(
        r#"{
            "courseInfo": {"title": "Biology", "description": ""},
            "gradeDistribution": {"weights": [], "scale": []},
            "schedule": {"entries": [
                {"week": 2, "topic": "Lecture", "assignments": "Problem set 1"},
                {"date": "2/20", "topic": "Cells"}
            ]}
        }"#,
    )
    .unwrap();
    vec![
        NamedSyllabus::new("calc.pdf", calc),
        NamedSyllabus::new("bio.docx", bio),
    ]
}

fn options() -> ExportOptions {
    ExportOptions::from_config(&Config::default(), 2025)
}

#[test]
fn test_exam_and_week_entries_are_coloured_per_course() {
    let syllabuses = syllabuses();
    let view = compose(&syllabuses, &DateNormalizer::new(2025));
    let january = view.month(2025, 1).unwrap();
    let palette = CoursePalette::default();

    let exam_day = january.cell(ymd(2025, 1, 15)).unwrap();
    assert_eq!(exam_day.events.len(), 1);
    let exam = &exam_day.events[0];
    assert!(exam.is_exam);
    assert_eq!(palette.event(exam.color_index, exam.is_exam), EXAM_SWATCH);

    // Week 2 bucket: the Monday falling on the 2nd..8th.
    let lecture_day = january.cell(ymd(2025, 1, 6)).unwrap();
    let lecture = &lecture_day.events[0];
    assert_eq!(lecture.topic, "Lecture");
    assert!(!lecture.is_exam);
    assert_eq!(lecture.source_course_title, "Biology");
    assert_eq!(
        palette.event(lecture.color_index, lecture.is_exam),
        palette.course(2)
    );
    assert_ne!(palette.course(2), EXAM_SWATCH);
}

#[test]
fn test_plan_puts_sections_first_then_legend_and_months() {
    let syllabuses = syllabuses();
    let common = SyllabusSelections::from_syllabuses(&syllabuses).common_sections();
    assert_eq!(
        common,
        vec![
            Section::CourseInfo,
            Section::GradeDistribution,
            Section::Schedule
        ]
    );

    let selection =
        SectionSelection::from_sections([Section::Schedule, Section::GradeDistribution]);
    let plan = plan_pages(&syllabuses, &selection, &options()).unwrap();

    let months: Vec<String> = plan
        .iter()
        .filter_map(|p| match p {
            PageKind::Month { title } => Some(title.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(
        plan[0],
        PageKind::Section {
            section: Section::GradeDistribution,
            part: 1
        }
    );
    assert_eq!(plan[1], PageKind::Legend);
    // Week 2 resolves to Jan 20, so the range is Jan 15 - Feb 20.
    assert_eq!(months, vec!["January 2025", "February 2025"]);
    assert_eq!(plan.len(), 4);
}

#[test]
fn test_export_writes_a_pdf_with_one_page_per_planned_page() {
    let ctx = TestContext::new();
    let path = ctx.root.join("comparison.pdf");
    let syllabuses = syllabuses();
    let selection = SectionSelection::from_sections([
        Section::CourseInfo,
        Section::GradeDistribution,
        Section::Schedule,
    ]);

    export_to_file(&path, &syllabuses, &selection, &options()).unwrap();
    let plan = plan_pages(&syllabuses, &selection, &options()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), plan.len());
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn test_text_comparison_lists_each_course_under_each_header() {
    let syllabuses = syllabuses();
    let selection =
        SectionSelection::from_sections([Section::Schedule, Section::GradeDistribution]);
    let text = render_text_comparison(&syllabuses, &selection.ordered());

    let grades = text.find("GRADE DISTRIBUTION").unwrap();
    let schedule = text.find("SCHEDULE").unwrap();
    assert!(grades < schedule);
    assert!(text.contains("Exams: 60%"));
    assert!(text.contains("Biology"));
}

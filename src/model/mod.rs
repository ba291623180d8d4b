// File: ./src/model/mod.rs
pub mod section;
pub mod syllabus;
pub mod validate;

pub use section::Section;
pub use syllabus::{
    CourseInfo, CoursePolicies, CourseSchedule, GradeCutoff, GradeDistribution, GradeWeight,
    Instructor, InstructorInfo, NamedSyllabus, PageRange, ParsedSyllabus, PolicyNote,
    ScheduleEntry, TeachingAssistant, UNRESOLVED_DATE,
};
pub use validate::{SyllabusError, parse_analyzed};

use serde::{Deserialize, Serialize};

pub const UNKNOWN_COURSE: &str = "Unknown Course";
pub const DEFAULT_PROGRAM: &str = "General Education";

/// Raw section row as returned by the grades gateway. Every field except the
/// identifier is optional on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSection {
    pub id: String,
    pub section: Option<String>,
    pub units: Option<f64>,
    pub status: Option<String>,
    pub enrolled_count: Option<u32>,
    pub graded_count: Option<u32>,
    pub semester: Option<String>,
    pub school_year: Option<String>,
    pub schedules: Option<Vec<RawSchedule>>,
}

/// One meeting of a section. A section has many meetings but at most one
/// grade-relevant course; the first schedule carrying a course wins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSchedule {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub room: Option<String>,
    pub course: Option<RawCourse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCourse {
    pub code: Option<String>,
    pub name: Option<String>,
    pub program: Option<String>,
}

/// A semester+year grouping used to filter sections. Derived from raw
/// section data, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcademicPeriod {
    pub label: String,
    pub year: i32,
    pub semester_rank: u8,
}

impl AcademicPeriod {
    pub fn from_parts(semester: &str, school_year: &str) -> Self {
        let semester = semester.trim();
        let school_year = school_year.trim();
        let label = if semester.is_empty() {
            school_year.to_string()
        } else if school_year.is_empty() {
            semester.to_string()
        } else {
            format!("{} {}", semester, school_year)
        };

        Self {
            label,
            year: school_year.parse().unwrap_or(0),
            semester_rank: semester_rank(semester),
        }
    }

    /// Sort key: year descending, then semester rank descending.
    pub fn sort_key(&self) -> (i32, u8) {
        (self.year, self.semester_rank)
    }
}

pub fn semester_rank(semester: &str) -> u8 {
    let normalized = semester.trim().to_lowercase();
    if normalized.starts_with("1st") {
        1
    } else if normalized.starts_with("2nd") {
        2
    } else if normalized.starts_with("summer") {
        3
    } else {
        0
    }
}

/// One course section assigned to the faculty member, projected from raw
/// gateway data at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectionSummary {
    pub section_id: String,
    pub course_name: String,
    pub course_code: Option<String>,
    pub section_label: String,
    pub units: f64,
    pub program: String,
    pub period: String,
    pub status: String,
    pub enrolled_count: u32,
    pub graded_count: u32,
}

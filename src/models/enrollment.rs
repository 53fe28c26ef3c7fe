use serde::{Deserialize, Serialize};

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_PROGRAM: &str = "Unknown Program";

/// Final disposition of an enrollment's grade.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Remark {
    Incomplete,
    Pass,
    Fail,
}

impl Default for Remark {
    fn default() -> Self {
        Remark::Incomplete
    }
}

impl Remark {
    pub fn as_str(self) -> &'static str {
        match self {
            Remark::Incomplete => "INCOMPLETE",
            Remark::Pass => "PASS",
            Remark::Fail => "FAIL",
        }
    }

    /// Unrecognized labels normalize to INCOMPLETE, the documented default.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "PASS" => Remark::Pass,
            "FAIL" => Remark::Fail,
            _ => Remark::Incomplete,
        }
    }
}

/// Raw student/enrollment row as returned by the grades gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStudent {
    pub enrollment_id: Option<String>,
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub year_level: Option<String>,
    pub program: Option<String>,
    pub midterm_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub overall_grade: Option<f64>,
    pub remark: Option<String>,
}

/// One student enrolled in a specific section. `enrollment_id` is the
/// authoritative key for edit tracking; a student id may repeat across
/// enrollments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentRecord {
    pub enrollment_id: String,
    pub student_id: String,
    pub display_name: String,
    pub email: String,
    pub year_level: Option<String>,
    pub program: String,
    pub midterm_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub weighted_average: Option<f64>,
    pub remark: Remark,
}

impl EnrollmentRecord {
    /// Normalizes a raw gateway row. Returns `None` when the row lacks an
    /// enrollment identifier; callers log and drop those.
    pub fn from_raw(raw: RawStudent) -> Option<Self> {
        let enrollment_id = raw.enrollment_id.filter(|id| !id.trim().is_empty())?;

        let first = non_empty(raw.first_name).unwrap_or_else(|| UNKNOWN_NAME.to_string());
        let last = non_empty(raw.last_name).unwrap_or_else(|| UNKNOWN_NAME.to_string());

        Some(Self {
            enrollment_id,
            student_id: non_empty(raw.student_id).unwrap_or_default(),
            display_name: format!("{} {}", first, last),
            email: non_empty(raw.email).unwrap_or_default(),
            year_level: non_empty(raw.year_level),
            program: non_empty(raw.program).unwrap_or_else(|| UNKNOWN_PROGRAM.to_string()),
            midterm_grade: raw.midterm_grade,
            final_grade: raw.final_grade,
            // Taken as-is from the gateway's overall grade; recomputation
            // only ever happens in the edit tracker.
            weighted_average: raw.overall_grade,
            remark: raw
                .remark
                .as_deref()
                .map(Remark::from_label)
                .unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

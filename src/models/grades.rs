use serde::{Deserialize, Serialize};

use crate::models::enrollment::Remark;

/// Which grade field an edit touches.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradeField {
    Midterm,
    Final,
    Remark,
}

/// Composite key for pending edits. A student can hold several enrollments,
/// so the enrollment id (not the student id) anchors the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EditKey {
    pub enrollment_id: String,
    pub section_id: String,
}

impl EditKey {
    pub fn new(enrollment_id: impl Into<String>, section_id: impl Into<String>) -> Self {
        Self {
            enrollment_id: enrollment_id.into(),
            section_id: section_id.into(),
        }
    }
}

/// An unsaved grade change for one enrollment in one section.
///
/// Numeric fields are double-optional: the outer `None` means the field was
/// never touched in this session, `Some(None)` means it was explicitly
/// cleared. Untouched fields fall back to the roster baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingEdit {
    pub enrollment_id: String,
    pub student_id: String,
    pub section_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midterm_grade: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_grade: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remark: Option<Remark>,
    pub weighted_average: Option<f64>,
    pub has_changes: bool,
}

impl PendingEdit {
    /// Merges this edit's values into a roster record. Untouched fields keep
    /// the record's value; the weighted average always comes from the edit,
    /// which is the only place it is ever recomputed.
    pub fn apply_to(&self, record: &mut crate::models::enrollment::EnrollmentRecord) {
        if let Some(midterm) = self.midterm_grade {
            record.midterm_grade = midterm;
        }
        if let Some(final_grade) = self.final_grade {
            record.final_grade = final_grade;
        }
        if let Some(remark) = self.remark {
            record.remark = remark;
        }
        record.weighted_average = self.weighted_average;
    }
}

/// Payload persisted through the gateway's update-grades operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpdatePayload {
    pub midterm_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub overall_grade: Option<f64>,
    pub remark: Remark,
}

/// Aggregate outcome of flushing a section's pending edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveReport {
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<SaveFailure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFailure {
    pub enrollment_id: String,
    pub reason: String,
}

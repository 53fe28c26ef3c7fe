use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;

use crate::models::enrollment::{EnrollmentRecord, Remark};
use crate::models::grades::{EditKey, GradeField, PendingEdit};

/// In-memory store of unsaved grade edits, keyed by (enrollment, section).
///
/// The store is global for the whole session: switching the academic period
/// or the selected section never discards edits made against other sections.
/// Entries are removed only after the gateway confirms the save.
#[derive(Default)]
pub struct GradeEditTracker {
    edits: RwLock<HashMap<EditKey, PendingEdit>>,
}

impl GradeEditTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one field change against an enrollment and returns the merged
    /// pending edit.
    ///
    /// Numeric raw input: empty or absent maps to a cleared grade, as does
    /// unparsable input. The weighted average is recomputed on every call,
    /// resolving each numeric field from the pending edit when it has been
    /// touched and from the baseline record otherwise; it is defined only
    /// when both resolve to a value.
    pub fn record_edit(
        &self,
        enrollment_id: &str,
        section_id: &str,
        field: GradeField,
        raw_value: Option<&str>,
        baseline: &EnrollmentRecord,
    ) -> PendingEdit {
        let key = EditKey::new(enrollment_id, section_id);
        let mut edits = self.edits.write().expect("edit store lock poisoned");

        let entry = edits.entry(key).or_insert_with(|| PendingEdit {
            enrollment_id: enrollment_id.to_string(),
            student_id: baseline.student_id.clone(),
            section_id: section_id.to_string(),
            midterm_grade: None,
            final_grade: None,
            remark: None,
            weighted_average: None,
            has_changes: false,
        });

        match field {
            GradeField::Midterm => entry.midterm_grade = Some(parse_grade_input(raw_value)),
            GradeField::Final => entry.final_grade = Some(parse_grade_input(raw_value)),
            GradeField::Remark => {
                entry.remark = Some(
                    raw_value
                        .map(Remark::from_label)
                        .unwrap_or_default(),
                )
            }
        }

        let midterm = entry.midterm_grade.unwrap_or(baseline.midterm_grade);
        let final_grade = entry.final_grade.unwrap_or(baseline.final_grade);
        entry.weighted_average = match (midterm, final_grade) {
            (Some(midterm), Some(final_grade)) => Some((midterm + final_grade) / 2.0),
            _ => None,
        };
        entry.has_changes = true;

        debug!(
            target: "app::grades",
            enrollment_id,
            section_id,
            field = ?field,
            weighted_average = ?entry.weighted_average,
            "recorded grade edit"
        );

        entry.clone()
    }

    /// All unsaved edits belonging to one section, the scope of a save batch.
    pub fn edits_for_section(&self, section_id: &str) -> Vec<PendingEdit> {
        self.edits
            .read()
            .expect("edit store lock poisoned")
            .values()
            .filter(|edit| edit.has_changes && edit.section_id == section_id)
            .cloned()
            .collect()
    }

    pub fn pending_count_for_section(&self, section_id: &str) -> usize {
        self.edits
            .read()
            .expect("edit store lock poisoned")
            .values()
            .filter(|edit| edit.has_changes && edit.section_id == section_id)
            .count()
    }

    pub fn has_edits_for_section(&self, section_id: &str) -> bool {
        self.pending_count_for_section(section_id) > 0
    }

    /// Overlay source for the roster view; absent means the baseline record
    /// is authoritative.
    pub fn lookup(&self, enrollment_id: &str, section_id: &str) -> Option<PendingEdit> {
        self.edits
            .read()
            .expect("edit store lock poisoned")
            .get(&EditKey::new(enrollment_id, section_id))
            .cloned()
    }

    /// Removes exactly one entry after its save was confirmed.
    pub fn clear(&self, enrollment_id: &str, section_id: &str) {
        self.edits
            .write()
            .expect("edit store lock poisoned")
            .remove(&EditKey::new(enrollment_id, section_id));
    }

    /// Removes the entry only if it still matches the given snapshot.
    ///
    /// Commands run on multiple threads, so the user may record a fresh edit
    /// for the same key while a save batch is awaiting the gateway. A stale
    /// unconditional clear would silently discard that new edit; comparing
    /// under the write lock keeps it pending instead. Returns whether the
    /// entry was removed.
    pub fn clear_if_unchanged(&self, snapshot: &PendingEdit) -> bool {
        let mut edits = self.edits.write().expect("edit store lock poisoned");
        let key = EditKey::new(&snapshot.enrollment_id, &snapshot.section_id);
        match edits.get(&key) {
            Some(current) if current == snapshot => {
                edits.remove(&key);
                true
            }
            _ => false,
        }
    }
}

fn parse_grade_input(raw: Option<&str>) -> Option<f64> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok()
}

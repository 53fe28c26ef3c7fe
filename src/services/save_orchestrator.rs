use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::enrollment::EnrollmentRecord;
use crate::models::grades::{GradeUpdatePayload, PendingEdit, SaveFailure, SaveReport};
use crate::services::edit_tracker::GradeEditTracker;
use crate::services::gateway::GradesGateway;
use crate::services::roster::RosterService;

/// Persists a section's pending edits against the gateway, one at a time,
/// and reconciles the tracker and roster afterwards.
///
/// Failed items never abort the batch and stay in the tracker untouched, so
/// the next flush for the section retries them. Only one flush may run at a
/// time; the UI is expected to disable the save trigger on rejection.
pub struct SaveOrchestrator {
    gateway: Arc<dyn GradesGateway>,
    tracker: Arc<GradeEditTracker>,
    roster: Arc<RosterService>,
    in_flight: AtomicBool,
}

impl SaveOrchestrator {
    pub fn new(
        gateway: Arc<dyn GradesGateway>,
        tracker: Arc<GradeEditTracker>,
        roster: Arc<RosterService>,
    ) -> Self {
        Self {
            gateway,
            tracker,
            roster,
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn flush(&self, section_id: &str) -> AppResult<SaveReport> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return Err(AppError::validation("a save is already in progress"));
        }

        let report = self.flush_section(section_id).await;
        self.in_flight.store(false, Ordering::Release);
        report
    }

    async fn flush_section(&self, section_id: &str) -> AppResult<SaveReport> {
        let edits = self.tracker.edits_for_section(section_id);
        if edits.is_empty() {
            return Ok(SaveReport::default());
        }

        info!(
            target: "app::grades",
            section_id,
            edits = edits.len(),
            "flushing pending grade edits"
        );

        let mut report = SaveReport::default();
        let mut confirmed: Vec<PendingEdit> = Vec::new();

        for edit in edits {
            // Stale edits referencing enrollments outside the loaded roster
            // are counted as failures without touching the gateway.
            let Some(record) = self.roster.get_record(section_id, &edit.enrollment_id) else {
                warn!(
                    target: "app::grades",
                    section_id,
                    enrollment_id = %edit.enrollment_id,
                    "skipping edit for enrollment missing from the loaded roster"
                );
                report.failed += 1;
                report.failures.push(SaveFailure {
                    enrollment_id: edit.enrollment_id.clone(),
                    reason: "enrollment is not part of the currently loaded roster".to_string(),
                });
                continue;
            };

            let payload = build_payload(&edit, &record);
            match self.gateway.update_grades(&edit.enrollment_id, &payload).await {
                Ok(()) => {
                    report.succeeded += 1;
                    confirmed.push(edit);
                }
                Err(err) => {
                    report.failed += 1;
                    report.failures.push(SaveFailure {
                        enrollment_id: edit.enrollment_id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        // Reconcile confirmed saves only; failed edits keep their pending
        // state so the user can retry. An edit re-recorded while the batch
        // was awaiting the gateway no longer matches the flushed snapshot
        // and must stay pending.
        for edit in &confirmed {
            if self.tracker.clear_if_unchanged(edit) {
                self.roster.apply_confirmed_edit(section_id, edit);
            } else {
                warn!(
                    target: "app::grades",
                    section_id,
                    enrollment_id = %edit.enrollment_id,
                    "edit changed during the save; keeping it pending"
                );
            }
        }

        info!(
            target: "app::grades",
            section_id,
            succeeded = report.succeeded,
            failed = report.failed,
            "grade flush finished"
        );

        Ok(report)
    }
}

fn build_payload(edit: &PendingEdit, record: &EnrollmentRecord) -> GradeUpdatePayload {
    GradeUpdatePayload {
        midterm_grade: edit.midterm_grade.unwrap_or(record.midterm_grade),
        final_grade: edit.final_grade.unwrap_or(record.final_grade),
        overall_grade: edit.weighted_average,
        // Absent remark persists as INCOMPLETE, not as the stored remark.
        remark: edit.remark.unwrap_or_default(),
    }
}

use serde::{Deserialize, Serialize};
use tauri::State;

use crate::error::AppError;
use crate::models::grades::{GradeField, PendingEdit, SaveReport};

use super::{AppState, CommandError, CommandResult};

/// How long the UI should keep a fully successful save banner on screen.
pub const SAVE_BANNER_DISMISS_MS: u64 = 3_000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEditInput {
    pub enrollment_id: String,
    pub section_id: String,
    pub field: GradeField,
    pub value: Option<String>,
}

#[tauri::command]
pub fn grades_record_edit(
    state: State<'_, AppState>,
    payload: RecordEditInput,
) -> CommandResult<PendingEdit> {
    let baseline = state
        .roster()
        .get_record(&payload.section_id, &payload.enrollment_id)
        .ok_or_else(|| {
            CommandError::from(AppError::validation(
                "enrollment is not part of the currently loaded roster",
            ))
        })?;

    Ok(state.tracker().record_edit(
        &payload.enrollment_id,
        &payload.section_id,
        payload.field,
        payload.value.as_deref(),
        &baseline,
    ))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSummary {
    pub count: usize,
    pub edits: Vec<PendingEdit>,
}

#[tauri::command]
pub fn grades_pending(
    state: State<'_, AppState>,
    section_id: String,
) -> CommandResult<PendingSummary> {
    let edits = state.tracker().edits_for_section(&section_id);
    Ok(PendingSummary {
        count: edits.len(),
        edits,
    })
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveSeverity {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOutcome {
    pub report: SaveReport,
    pub severity: SaveSeverity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_dismiss_ms: Option<u64>,
}

/// Flushes all pending edits for a section and composes the outcome message.
/// Presentation (toast, banner) is the frontend's concern.
#[tauri::command]
pub async fn grades_save(
    state: State<'_, AppState>,
    section_id: String,
) -> CommandResult<SaveOutcome> {
    let report = state.save().flush(&section_id).await?;
    Ok(compose_outcome(report))
}

fn compose_outcome(report: SaveReport) -> SaveOutcome {
    let (severity, message, auto_dismiss_ms) = if report.failed == 0 {
        let message = if report.succeeded == 0 {
            "No pending changes to save.".to_string()
        } else {
            format!(
                "Saved {} grade update{}.",
                report.succeeded,
                plural(report.succeeded)
            )
        };
        (SaveSeverity::Success, message, Some(SAVE_BANNER_DISMISS_MS))
    } else if report.succeeded > 0 {
        (
            SaveSeverity::Warning,
            format!(
                "Saved {} grade update{}; {} failed and remain{} pending.",
                report.succeeded,
                plural(report.succeeded),
                report.failed,
                if report.failed == 1 { "s" } else { "" }
            ),
            None,
        )
    } else {
        (
            SaveSeverity::Error,
            format!(
                "Failed to save {} grade update{}. The edits remain pending.",
                report.failed,
                plural(report.failed)
            ),
            None,
        )
    };

    SaveOutcome {
        report,
        severity,
        message,
        auto_dismiss_ms,
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::SaveFailure;

    #[test]
    fn full_success_auto_dismisses() {
        let outcome = compose_outcome(SaveReport {
            succeeded: 2,
            failed: 0,
            failures: Vec::new(),
        });

        assert_eq!(outcome.severity, SaveSeverity::Success);
        assert_eq!(outcome.auto_dismiss_ms, Some(SAVE_BANNER_DISMISS_MS));
        assert_eq!(outcome.message, "Saved 2 grade updates.");
    }

    #[test]
    fn partial_success_is_a_sticky_warning() {
        let outcome = compose_outcome(SaveReport {
            succeeded: 1,
            failed: 1,
            failures: vec![SaveFailure {
                enrollment_id: "E2".into(),
                reason: "backend rejected".into(),
            }],
        });

        assert_eq!(outcome.severity, SaveSeverity::Warning);
        assert_eq!(outcome.auto_dismiss_ms, None);
    }

    #[test]
    fn total_failure_is_blocking() {
        let outcome = compose_outcome(SaveReport {
            succeeded: 0,
            failed: 3,
            failures: Vec::new(),
        });

        assert_eq!(outcome.severity, SaveSeverity::Error);
        assert_eq!(outcome.auto_dismiss_ms, None);
    }
}

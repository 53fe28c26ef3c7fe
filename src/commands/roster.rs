use serde::Serialize;
use tauri::State;

use crate::error::AppError;
use crate::models::enrollment::EnrollmentRecord;

use super::{AppState, CommandResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterRow {
    #[serde(flatten)]
    pub record: EnrollmentRecord,
    pub has_pending_changes: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub students: Vec<RosterRow>,
    pub pending_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Loads the roster for a section, overlaying unsaved edits atop confirmed
/// values. An unavailable roster leaves the section selectable with zero
/// students and a user message instead of an error screen.
#[tauri::command]
pub async fn roster_load(
    state: State<'_, AppState>,
    section_id: String,
) -> CommandResult<RosterResponse> {
    if state.session().current().is_none() {
        return Ok(RosterResponse {
            students: Vec::new(),
            pending_count: 0,
            message: Some(AppError::identity_unavailable().to_string()),
        });
    }

    let records = match state.roster().load_roster(&section_id).await {
        Ok(records) => records,
        Err(err) => {
            return Ok(RosterResponse {
                students: Vec::new(),
                pending_count: state.tracker().pending_count_for_section(&section_id),
                message: Some(err.to_string()),
            });
        }
    };

    let tracker = state.tracker();
    let students = records
        .into_iter()
        .map(|mut record| {
            match tracker.lookup(&record.enrollment_id, &section_id) {
                Some(edit) => {
                    edit.apply_to(&mut record);
                    RosterRow {
                        record,
                        has_pending_changes: true,
                    }
                }
                None => RosterRow {
                    record,
                    has_pending_changes: false,
                },
            }
        })
        .collect();

    Ok(RosterResponse {
        students,
        pending_count: tracker.pending_count_for_section(&section_id),
        message: None,
    })
}

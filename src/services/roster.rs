use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{info, warn};

use crate::error::{AppError, AppResult};
use crate::models::enrollment::{EnrollmentRecord, RawStudent};
use crate::models::grades::PendingEdit;
use crate::services::gateway::GradesGateway;

/// Loads and owns the normalized student rosters, one list per section.
///
/// A reload replaces a section's list wholesale; confirmed saves patch single
/// records in place. Nothing here is persisted locally.
pub struct RosterService {
    gateway: Arc<dyn GradesGateway>,
    rosters: RwLock<HashMap<String, Vec<EnrollmentRecord>>>,
}

impl RosterService {
    pub fn new(gateway: Arc<dyn GradesGateway>) -> Self {
        Self {
            gateway,
            rosters: RwLock::new(HashMap::new()),
        }
    }

    /// Fetches and normalizes the roster for a section. Any gateway failure
    /// (including a malformed payload) surfaces as `RosterUnavailable`; the
    /// command boundary turns that into an empty list plus a user message so
    /// the section stays selectable.
    pub async fn load_roster(&self, section_id: &str) -> AppResult<Vec<EnrollmentRecord>> {
        let raw = self
            .gateway
            .section_students(section_id)
            .await
            .map_err(|err| AppError::roster_unavailable(err.to_string()))?;

        let total = raw.len();
        let records = normalize_roster(raw);

        info!(
            target: "app::roster",
            section_id,
            students = records.len(),
            dropped = total - records.len(),
            "roster loaded"
        );

        let mut rosters = self.rosters.write().expect("roster lock poisoned");
        rosters.insert(section_id.to_string(), records.clone());

        Ok(records)
    }

    pub fn current(&self, section_id: &str) -> Vec<EnrollmentRecord> {
        self.rosters
            .read()
            .expect("roster lock poisoned")
            .get(section_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn get_record(&self, section_id: &str, enrollment_id: &str) -> Option<EnrollmentRecord> {
        self.rosters
            .read()
            .expect("roster lock poisoned")
            .get(section_id)?
            .iter()
            .find(|record| record.enrollment_id == enrollment_id)
            .cloned()
    }

    /// Patches one stored record with the values of a confirmed save.
    pub fn apply_confirmed_edit(&self, section_id: &str, edit: &PendingEdit) {
        let mut rosters = self.rosters.write().expect("roster lock poisoned");
        let Some(records) = rosters.get_mut(section_id) else {
            return;
        };
        let Some(record) = records
            .iter_mut()
            .find(|record| record.enrollment_id == edit.enrollment_id)
        else {
            return;
        };

        edit.apply_to(record);
    }
}

/// Drops raw entries without an enrollment identifier (logged as a
/// data-integrity concern, not an error) and applies display defaults to the
/// rest.
pub fn normalize_roster(raw: Vec<RawStudent>) -> Vec<EnrollmentRecord> {
    raw.into_iter()
        .filter_map(|entry| {
            let student_id = entry.student_id.clone();
            match EnrollmentRecord::from_raw(entry) {
                Some(record) => Some(record),
                None => {
                    warn!(
                        target: "app::roster",
                        student_id = ?student_id,
                        "dropping student entry without an enrollment identifier"
                    );
                    None
                }
            }
        })
        .collect()
}

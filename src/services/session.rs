use std::sync::RwLock;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::identity::FacultyIdentity;

/// Holds the current faculty identity for the session. The authentication
/// protocol itself is handled outside this crate; the UI hands the resolved
/// identity over after a successful login.
#[derive(Default)]
pub struct SessionService {
    identity: RwLock<Option<FacultyIdentity>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: FacultyIdentity) {
        info!(
            target: "app::session",
            faculty_id = %identity.id,
            faculty = %identity.display_name(),
            "faculty signed in"
        );
        let mut guard = self.identity.write().expect("session lock poisoned");
        *guard = Some(identity);
    }

    pub fn sign_out(&self) {
        let mut guard = self.identity.write().expect("session lock poisoned");
        if let Some(identity) = guard.take() {
            info!(
                target: "app::session",
                faculty_id = %identity.id,
                "faculty signed out"
            );
        }
    }

    pub fn current(&self) -> Option<FacultyIdentity> {
        self.identity
            .read()
            .expect("session lock poisoned")
            .clone()
    }

    pub fn require_identity(&self) -> AppResult<FacultyIdentity> {
        self.current().ok_or_else(AppError::identity_unavailable)
    }
}

pub mod grades;
pub mod roster;
pub mod sections;
pub mod session;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::error;

use crate::error::{AppError, AppResult};
use crate::services::catalog::CatalogService;
use crate::services::edit_tracker::GradeEditTracker;
use crate::services::gateway::{GatewayConfig, GradesGateway, HttpGradesGateway};
use crate::services::roster::RosterService;
use crate::services::save_orchestrator::SaveOrchestrator;
use crate::services::session::SessionService;

#[derive(Clone)]
pub struct AppState {
    session: Arc<SessionService>,
    tracker: Arc<GradeEditTracker>,
    catalog: Arc<CatalogService>,
    roster: Arc<RosterService>,
    save: Arc<SaveOrchestrator>,
}

impl AppState {
    pub fn new() -> AppResult<Self> {
        let gateway: Arc<dyn GradesGateway> =
            Arc::new(HttpGradesGateway::try_new(&GatewayConfig::from_env())?);
        Ok(Self::with_gateway(gateway))
    }

    pub fn with_gateway(gateway: Arc<dyn GradesGateway>) -> Self {
        let session = Arc::new(SessionService::new());
        let tracker = Arc::new(GradeEditTracker::new());
        let catalog = Arc::new(CatalogService::new(
            Arc::clone(&gateway),
            Arc::clone(&session),
        ));
        let roster = Arc::new(RosterService::new(Arc::clone(&gateway)));
        let save = Arc::new(SaveOrchestrator::new(
            gateway,
            Arc::clone(&tracker),
            Arc::clone(&roster),
        ));

        Self {
            session,
            tracker,
            catalog,
            roster,
            save,
        }
    }

    pub fn session(&self) -> Arc<SessionService> {
        Arc::clone(&self.session)
    }

    pub fn tracker(&self) -> Arc<GradeEditTracker> {
        Arc::clone(&self.tracker)
    }

    pub fn catalog(&self) -> Arc<CatalogService> {
        Arc::clone(&self.catalog)
    }

    pub fn roster(&self) -> Arc<RosterService> {
        Arc::clone(&self.roster)
    }

    pub fn save(&self) -> Arc<SaveOrchestrator> {
        Arc::clone(&self.save)
    }
}

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::IdentityUnavailable => CommandError::new(
                "IDENTITY_UNAVAILABLE",
                "faculty information is not available",
                None,
            ),
            AppError::Gateway {
                code,
                message,
                correlation_id,
            } => {
                let details = correlation_id
                    .map(|id| serde_json::json!({ "correlationId": id }));
                CommandError::new(code.as_str(), message, details)
            }
            AppError::RosterUnavailable { message } => {
                CommandError::new("ROSTER_UNAVAILABLE", message, None)
            }
            AppError::Validation { message } => {
                CommandError::new("VALIDATION_ERROR", message, None)
            }
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new("UNKNOWN", "serialization failed", None)
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("UNKNOWN", "filesystem access failed", None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

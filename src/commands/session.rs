use serde::Deserialize;
use tauri::State;

use crate::models::identity::FacultyIdentity;

use super::{AppState, CommandResult};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInInput {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

#[tauri::command]
pub fn session_sign_in(
    state: State<'_, AppState>,
    payload: SignInInput,
) -> CommandResult<FacultyIdentity> {
    let identity = FacultyIdentity {
        id: payload.id,
        first_name: payload.first_name,
        last_name: payload.last_name,
    };
    state.session().sign_in(identity.clone());
    Ok(identity)
}

#[tauri::command]
pub fn session_sign_out(state: State<'_, AppState>) -> CommandResult<()> {
    state.session().sign_out();
    Ok(())
}

#[tauri::command]
pub fn session_current(state: State<'_, AppState>) -> CommandResult<Option<FacultyIdentity>> {
    Ok(state.session().current())
}

use serde::Serialize;
use tauri::State;
use tracing::debug;

use crate::models::section::SectionSummary;
use crate::services::catalog;

use super::{AppState, CommandResult};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogResponse {
    pub periods: Vec<String>,
    pub sections: Vec<SectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Loads the faculty member's section catalog. Read failures come back as an
/// empty catalog plus a user message, never as a fault.
#[tauri::command]
pub async fn sections_load(state: State<'_, AppState>) -> CommandResult<CatalogResponse> {
    let catalog = state.catalog();

    match catalog.load().await {
        Ok(projection) => Ok(CatalogResponse {
            periods: projection.periods,
            sections: projection.summaries,
            message: None,
        }),
        Err(err) => Ok(CatalogResponse {
            periods: Vec::new(),
            sections: Vec::new(),
            message: Some(err.to_string()),
        }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionFilterResponse {
    pub sections: Vec<SectionSummary>,
    pub selected_section: Option<String>,
}

/// Filters the loaded catalog by academic period and resolves the section
/// selection. A selected section that drops out of the filter keeps its
/// selection while it still has unsaved edits.
#[tauri::command]
pub fn sections_filter(
    state: State<'_, AppState>,
    period: Option<String>,
    selected_section: Option<String>,
) -> CommandResult<SectionFilterResponse> {
    let summaries = state
        .catalog()
        .current()
        .map(|projection| projection.summaries)
        .unwrap_or_default();

    let sections = catalog::filter_by_period(&summaries, period.as_deref());
    let selected_section = catalog::resolve_selection(
        selected_section.as_deref(),
        &sections,
        &state.tracker(),
    );

    debug!(
        target: "app::command",
        period = ?period,
        visible = sections.len(),
        selected = ?selected_section,
        "sections_filter"
    );

    Ok(SectionFilterResponse {
        sections,
        selected_section,
    })
}

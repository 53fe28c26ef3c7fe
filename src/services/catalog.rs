use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::section::{
    AcademicPeriod, RawCourse, RawSection, SectionSummary, DEFAULT_PROGRAM, UNKNOWN_COURSE,
};
use crate::services::edit_tracker::GradeEditTracker;
use crate::services::gateway::GradesGateway;
use crate::services::session::SessionService;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProjection {
    pub periods: Vec<String>,
    pub summaries: Vec<SectionSummary>,
}

/// Loads the signed-in faculty member's sections and projects them into
/// selectable academic periods and section summaries. Keeps the latest
/// projection so period filters do not refetch.
pub struct CatalogService {
    gateway: Arc<dyn GradesGateway>,
    session: Arc<SessionService>,
    projection: RwLock<Option<CatalogProjection>>,
}

impl CatalogService {
    pub fn new(gateway: Arc<dyn GradesGateway>, session: Arc<SessionService>) -> Self {
        Self {
            gateway,
            session,
            projection: RwLock::new(None),
        }
    }

    pub async fn load(&self) -> AppResult<CatalogProjection> {
        let identity = self.session.require_identity()?;
        let raw_sections = self.gateway.sections_by_faculty(&identity.id).await?;

        let projection = project(&raw_sections);
        info!(
            target: "app::catalog",
            faculty_id = %identity.id,
            sections = projection.summaries.len(),
            periods = projection.periods.len(),
            "catalog loaded"
        );

        let mut guard = self.projection.write().expect("catalog lock poisoned");
        *guard = Some(projection.clone());

        Ok(projection)
    }

    pub fn current(&self) -> Option<CatalogProjection> {
        self.projection
            .read()
            .expect("catalog lock poisoned")
            .clone()
    }
}

/// Projects raw gateway sections into period labels and section summaries.
pub fn project(raw_sections: &[RawSection]) -> CatalogProjection {
    let mut periods: Vec<AcademicPeriod> = Vec::new();
    let mut summaries = Vec::with_capacity(raw_sections.len());

    for raw in raw_sections {
        let period = AcademicPeriod::from_parts(
            raw.semester.as_deref().unwrap_or(""),
            raw.school_year.as_deref().unwrap_or(""),
        );
        if !periods.iter().any(|known| known.label == period.label) {
            periods.push(period.clone());
        }

        summaries.push(summarize(raw, &period));
    }

    // Year descending, then semester rank descending.
    periods.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));

    CatalogProjection {
        periods: periods.into_iter().map(|period| period.label).collect(),
        summaries,
    }
}

fn summarize(raw: &RawSection, period: &AcademicPeriod) -> SectionSummary {
    // A section meets many times but carries exactly one grade-relevant
    // course: the first schedule entry that has one attached.
    let course = raw
        .schedules
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .find_map(|schedule| schedule.course.as_ref());

    let (course_name, course_code, program) = match course {
        Some(course) => (
            non_empty(course.name.as_deref()).unwrap_or(UNKNOWN_COURSE).to_string(),
            non_empty(course.code.as_deref()).map(str::to_string),
            resolve_program(course),
        ),
        None => {
            debug!(
                target: "app::catalog",
                section_id = %raw.id,
                "section has no schedule with an attached course"
            );
            (UNKNOWN_COURSE.to_string(), None, DEFAULT_PROGRAM.to_string())
        }
    };

    SectionSummary {
        section_id: raw.id.clone(),
        course_name,
        course_code,
        section_label: raw.section.clone().unwrap_or_else(|| raw.id.clone()),
        units: raw.units.unwrap_or(0.0),
        program,
        period: period.label.clone(),
        status: raw.status.clone().unwrap_or_else(|| "ACTIVE".to_string()),
        enrolled_count: raw.enrolled_count.unwrap_or(0),
        graded_count: raw.graded_count.unwrap_or(0),
    }
}

/// Explicit program on the course, else the leading uppercase prefix of the
/// course code, else the general-education bucket.
fn resolve_program(course: &RawCourse) -> String {
    if let Some(program) = non_empty(course.program.as_deref()) {
        return program.to_string();
    }

    if let Some(code) = non_empty(course.code.as_deref()) {
        let prefix: String = code.chars().take_while(char::is_ascii_uppercase).collect();
        if !prefix.is_empty() {
            return prefix;
        }
    }

    DEFAULT_PROGRAM.to_string()
}

/// Exact period-label filter; no period selected means all summaries.
pub fn filter_by_period(summaries: &[SectionSummary], period: Option<&str>) -> Vec<SectionSummary> {
    match period {
        Some(period) => summaries
            .iter()
            .filter(|summary| summary.period == period)
            .cloned()
            .collect(),
        None => summaries.to_vec(),
    }
}

/// Keeps the current section selection across a period filter change.
///
/// A selection that fell out of the filtered list is cleared unless the
/// section still has unsaved edits; in-progress work is never silently
/// deselected.
pub fn resolve_selection(
    selected: Option<&str>,
    filtered: &[SectionSummary],
    tracker: &GradeEditTracker,
) -> Option<String> {
    let selected = selected?;
    let visible = filtered
        .iter()
        .any(|summary| summary.section_id == selected);

    if visible || tracker.has_edits_for_section(selected) {
        Some(selected.to_string())
    } else {
        None
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::section::RawSchedule;

    fn raw_section(id: &str, semester: &str, year: &str, course: Option<RawCourse>) -> RawSection {
        RawSection {
            id: id.into(),
            section: Some(format!("{id}-A")),
            units: Some(3.0),
            status: Some("ACTIVE".into()),
            enrolled_count: Some(30),
            graded_count: Some(0),
            semester: Some(semester.into()),
            school_year: Some(year.into()),
            schedules: Some(vec![
                RawSchedule {
                    day: Some("Mon".into()),
                    course: None,
                    ..RawSchedule::default()
                },
                RawSchedule {
                    day: Some("Thu".into()),
                    course,
                    ..RawSchedule::default()
                },
            ]),
        }
    }

    #[test]
    fn periods_sort_year_then_semester_rank_descending() {
        let sections = vec![
            raw_section("s1", "1st Semester", "2023", None),
            raw_section("s2", "2nd Semester", "2024", None),
            raw_section("s3", "Summer", "2024", None),
            raw_section("s4", "1st Semester", "2024", None),
        ];

        let projection = project(&sections);
        assert_eq!(
            projection.periods,
            vec![
                "Summer 2024",
                "2nd Semester 2024",
                "1st Semester 2024",
                "1st Semester 2023"
            ]
        );
    }

    #[test]
    fn course_comes_from_first_schedule_with_one_attached() {
        let course = RawCourse {
            code: Some("BSCS101".into()),
            name: Some("Data Structures".into()),
            program: None,
        };
        let projection = project(&[raw_section("s1", "1st Semester", "2024", Some(course))]);

        let summary = &projection.summaries[0];
        assert_eq!(summary.course_name, "Data Structures");
        assert_eq!(summary.program, "BSCS");
    }

    #[test]
    fn section_without_any_course_falls_back_to_defaults() {
        let projection = project(&[raw_section("s1", "1st Semester", "2024", None)]);

        let summary = &projection.summaries[0];
        assert_eq!(summary.course_name, UNKNOWN_COURSE);
        assert_eq!(summary.program, DEFAULT_PROGRAM);
    }

    #[test]
    fn program_code_without_uppercase_prefix_defaults_to_general_education() {
        let course = RawCourse {
            code: Some("101-ged".into()),
            name: Some("Life Skills".into()),
            program: None,
        };
        let projection = project(&[raw_section("s1", "Summer", "2024", Some(course))]);

        assert_eq!(projection.summaries[0].program, DEFAULT_PROGRAM);
    }

    #[test]
    fn missing_period_filter_returns_all_summaries() {
        let projection = project(&[
            raw_section("s1", "1st Semester", "2024", None),
            raw_section("s2", "2nd Semester", "2024", None),
        ]);

        let filtered = filter_by_period(&projection.summaries, None);
        assert_eq!(filtered.len(), 2);

        let filtered = filter_by_period(&projection.summaries, Some("2nd Semester 2024"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].section_id, "s2");
    }
}

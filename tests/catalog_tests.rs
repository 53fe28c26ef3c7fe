use gradeport_app_lib::models::enrollment::{EnrollmentRecord, Remark};
use gradeport_app_lib::models::grades::GradeField;
use gradeport_app_lib::models::section::{RawCourse, RawSchedule, RawSection};
use gradeport_app_lib::services::catalog::{filter_by_period, project, resolve_selection};
use gradeport_app_lib::services::edit_tracker::GradeEditTracker;

fn raw_section(id: &str, semester: &str, year: &str) -> RawSection {
    RawSection {
        id: id.to_string(),
        section: Some(format!("{id}-A")),
        units: Some(3.0),
        status: Some("ACTIVE".to_string()),
        enrolled_count: Some(25),
        graded_count: Some(10),
        semester: Some(semester.to_string()),
        school_year: Some(year.to_string()),
        schedules: Some(vec![RawSchedule {
            day: Some("Mon".to_string()),
            course: Some(RawCourse {
                code: Some("CS101".to_string()),
                name: Some("Intro to Computing".to_string()),
                program: Some("BS Computer Science".to_string()),
            }),
            ..RawSchedule::default()
        }]),
    }
}

fn baseline(enrollment_id: &str) -> EnrollmentRecord {
    EnrollmentRecord {
        enrollment_id: enrollment_id.to_string(),
        student_id: "S1".to_string(),
        display_name: "Maria Clara".to_string(),
        email: String::new(),
        year_level: None,
        program: "BSCS".to_string(),
        midterm_grade: None,
        final_grade: None,
        weighted_average: None,
        remark: Remark::Incomplete,
    }
}

#[test]
fn explicit_program_wins_over_code_prefix() {
    let projection = project(&[raw_section("s1", "1st Semester", "2024")]);
    assert_eq!(projection.summaries[0].program, "BS Computer Science");
}

#[test]
fn duplicate_periods_are_emitted_once() {
    let projection = project(&[
        raw_section("s1", "1st Semester", "2024"),
        raw_section("s2", "1st Semester", "2024"),
        raw_section("s3", "2nd Semester", "2024"),
    ]);

    assert_eq!(
        projection.periods,
        vec!["2nd Semester 2024", "1st Semester 2024"]
    );
}

#[test]
fn unknown_semester_ranks_below_known_ones() {
    let projection = project(&[
        raw_section("s1", "Midyear", "2024"),
        raw_section("s2", "1st Semester", "2024"),
    ]);

    assert_eq!(projection.periods, vec!["1st Semester 2024", "Midyear 2024"]);
}

#[test]
fn period_filter_matches_labels_exactly() {
    let projection = project(&[
        raw_section("s1", "1st Semester", "2024"),
        raw_section("s2", "2nd Semester", "2024"),
    ]);

    let filtered = filter_by_period(&projection.summaries, Some("1st Semester 2024"));
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].section_id, "s1");

    assert!(filter_by_period(&projection.summaries, Some("1st Semester")).is_empty());
}

#[test]
fn filtered_out_selection_without_edits_is_cleared() {
    let tracker = GradeEditTracker::new();
    let projection = project(&[
        raw_section("s1", "1st Semester", "2024"),
        raw_section("s2", "2nd Semester", "2024"),
    ]);

    let filtered = filter_by_period(&projection.summaries, Some("2nd Semester 2024"));
    let selection = resolve_selection(Some("s1"), &filtered, &tracker);

    assert_eq!(selection, None);
}

#[test]
fn filtered_out_selection_with_pending_edits_survives() {
    let tracker = GradeEditTracker::new();
    tracker.record_edit("E1", "s1", GradeField::Midterm, Some("1.00"), &baseline("E1"));

    let projection = project(&[
        raw_section("s1", "1st Semester", "2024"),
        raw_section("s2", "2nd Semester", "2024"),
    ]);

    let filtered = filter_by_period(&projection.summaries, Some("2nd Semester 2024"));
    let selection = resolve_selection(Some("s1"), &filtered, &tracker);

    assert_eq!(selection, Some("s1".to_string()));
}

#[test]
fn visible_selection_is_kept_as_is() {
    let tracker = GradeEditTracker::new();
    let projection = project(&[raw_section("s1", "1st Semester", "2024")]);

    let filtered = filter_by_period(&projection.summaries, None);
    let selection = resolve_selection(Some("s1"), &filtered, &tracker);

    assert_eq!(selection, Some("s1".to_string()));
}

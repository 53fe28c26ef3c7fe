use std::sync::Arc;
use std::time::Duration;

use gradeport_app_lib::commands::AppState;
use gradeport_app_lib::error::AppError;
use gradeport_app_lib::models::grades::GradeField;
use gradeport_app_lib::models::identity::FacultyIdentity;
use gradeport_app_lib::services::gateway::{GatewayConfig, GradesGateway, HttpGradesGateway};
use httpmock::prelude::*;
use serde_json::json;

fn app_state(base_url: &str) -> AppState {
    let config = GatewayConfig::for_base_url(base_url, Duration::from_secs(2));
    let gateway: Arc<dyn GradesGateway> =
        Arc::new(HttpGradesGateway::try_new(&config).expect("gateway builds"));
    AppState::with_gateway(gateway)
}

fn faculty() -> FacultyIdentity {
    FacultyIdentity {
        id: "F100".to_string(),
        first_name: "Maria".to_string(),
        last_name: "Santos".to_string(),
    }
}

async fn mock_backend(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/faculty/F100/sections");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {
                        "id": "SEC-BSCS-3A",
                        "section": "BSCS-3A",
                        "units": 3.0,
                        "status": "ACTIVE",
                        "enrolledCount": 2,
                        "gradedCount": 1,
                        "semester": "1st Semester",
                        "schoolYear": "2024",
                        "schedules": [
                            { "day": "Tue", "room": "301" },
                            {
                                "day": "Fri",
                                "room": "301",
                                "course": {
                                    "code": "CS301",
                                    "name": "Software Engineering",
                                    "program": "BS Computer Science"
                                }
                            }
                        ]
                    }
                ]));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/sections/SEC-BSCS-3A/students");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    { "enrollmentId": "E1", "studentId": "S1",
                      "firstName": "Ana", "lastName": "Reyes" },
                    { "enrollmentId": "E2", "studentId": "S2",
                      "firstName": "Ben", "lastName": "Cruz",
                      "midtermGrade": 1.25, "finalGrade": 1.5,
                      "overallGrade": 1.375, "remark": "PASS" }
                ]));
        })
        .await;
}

#[tokio::test]
async fn catalog_load_requires_an_identity() {
    let server = MockServer::start_async().await;
    mock_backend(&server).await;

    let state = app_state(&server.base_url());
    let error = state
        .catalog()
        .load()
        .await
        .expect_err("no identity, no catalog");

    assert!(matches!(error, AppError::IdentityUnavailable));
}

#[tokio::test]
async fn full_grading_flow_from_login_to_confirmed_save() {
    let server = MockServer::start_async().await;
    mock_backend(&server).await;

    // The backend must receive the fully resolved payload for E1.
    let update = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/api/enrollments/E1/grades")
                .json_body(json!({
                    "midtermGrade": 1.0,
                    "finalGrade": 1.5,
                    "overallGrade": 1.25,
                    "remark": "INCOMPLETE"
                }));
            then.status(200);
        })
        .await;

    let state = app_state(&server.base_url());
    state.session().sign_in(faculty());

    let projection = state.catalog().load().await.expect("catalog loads");
    assert_eq!(projection.periods, vec!["1st Semester 2024"]);
    assert_eq!(projection.summaries.len(), 1);

    let summary = &projection.summaries[0];
    assert_eq!(summary.section_id, "SEC-BSCS-3A");
    assert_eq!(summary.course_name, "Software Engineering");
    assert_eq!(summary.program, "BS Computer Science");

    let section_id = summary.section_id.clone();
    let records = state
        .roster()
        .load_roster(&section_id)
        .await
        .expect("roster loads");
    assert_eq!(records.len(), 2);

    let e1 = records.iter().find(|r| r.enrollment_id == "E1").unwrap();

    // First edit: only the midterm resolves, so no weighted average yet.
    let edit = state
        .tracker()
        .record_edit("E1", &section_id, GradeField::Midterm, Some("1.00"), e1);
    assert_eq!(edit.weighted_average, None);
    assert!(edit.has_changes);

    // Second edit: both grades resolve.
    let edit = state
        .tracker()
        .record_edit("E1", &section_id, GradeField::Final, Some("1.50"), e1);
    assert_eq!(edit.weighted_average, Some(1.25));

    let report = state.save().flush(&section_id).await.expect("flush runs");
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(update.hits_async().await, 1);

    // Tracker entry removed, roster patched in place.
    assert!(state.tracker().lookup("E1", &section_id).is_none());
    let saved = state.roster().get_record(&section_id, "E1").unwrap();
    assert_eq!(saved.midterm_grade, Some(1.0));
    assert_eq!(saved.final_grade, Some(1.5));
    assert_eq!(saved.weighted_average, Some(1.25));

    // The other student is untouched.
    let untouched = state.roster().get_record(&section_id, "E2").unwrap();
    assert_eq!(untouched.midterm_grade, Some(1.25));
    assert_eq!(untouched.weighted_average, Some(1.375));
}

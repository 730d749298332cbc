use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{count, get, post_json, seed_blotter, test_app, token_for, RESIDENT_ID, SECRETARY_ID, TANOD_ID};

/// Move a seeded case to Mediation and return the new schedule's id.
async fn schedule_mediation(app: &axum::Router, blotter_id: &str) -> String {
    let body = serde_json::json!({
        "status": "Mediation",
        "appearance_date": "2025-03-14",
        "appearance_time": "09:30:00"
    });
    let (status, resp) = post_json(
        app,
        &format!("/api/blotters/{}/status", blotter_id),
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    resp["schedule"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn outcome_is_logged_without_changing_status() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;
    let schedule_id = schedule_mediation(&app, "Brgy.250001").await;

    let body = serde_json::json!({ "remarks": "Respondent did not appear", "result": "Unsettled" });
    let (status, log) = post_json(
        &app,
        &format!("/api/schedules/{}/outcome", schedule_id),
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(log["case_title"], "Mediation Hearing");
    assert_eq!(log["log_type"], "Hearing");
    assert_eq!(log["status"], "Mediation");
    assert_eq!(log["result"], "Unsettled");
    assert_eq!(log["blotter_id"], "Brgy.250001");

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM blotters WHERE status = 'Mediation'").await, 1);
    // Only the scheduling notice, none for the outcome.
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications").await, 1);

    let (_, logs) = get(&app, "/api/blotters/Brgy.250001/logs", Some(&token_for(TANOD_ID))).await;
    assert_eq!(logs.as_array().unwrap().len(), 1);

    let (_, summary) = get(&app, "/api/blotters/Brgy.250001/logs/summary", Some(&token_for(TANOD_ID))).await;
    assert_eq!(summary["final_result"], "Unsettled");
}

#[tokio::test]
async fn outcome_requires_remarks_and_known_result() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;
    let schedule_id = schedule_mediation(&app, "Brgy.250001").await;
    let uri = format!("/api/schedules/{}/outcome", schedule_id);
    let token = token_for(SECRETARY_ID);

    let (status, _) = post_json(&app, &uri, &serde_json::json!({ "result": "Settled" }), Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body = serde_json::json!({ "remarks": "Heard", "result": "Maybe" });
    let (status, resp) = post_json(&app, &uri, &body, Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["result"].is_string());

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 0);
}

#[tokio::test]
async fn unknown_schedule_is_404() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let (status, _) = post_json(
        &app,
        "/api/schedules/00000000-0000-0000-0000-000000000000/outcome",
        &serde_json::json!({ "remarks": "Heard" }),
        Some(&token_for(SECRETARY_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn week_board_groups_hearings_by_day() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;
    schedule_mediation(&app, "Brgy.250001").await;
    let token = token_for(TANOD_ID);

    let (status, days) = get(&app, "/api/schedules/week?start=2025-03-10&days=7", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let days = days.as_array().unwrap();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0]["weekday"], "Monday");
    assert_eq!(days[4]["date"], "2025-03-14");
    assert_eq!(days[4]["schedules"].as_array().unwrap().len(), 1);
    assert!(days[0]["schedules"].as_array().unwrap().is_empty());

    let (status, _) = get(&app, "/api/schedules/week?days=40", Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = get(&app, "/api/schedules/week", Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use shared_types::FeatureFlags;

use crate::common::{
    count, get, post_json, seed_blotter, test_app, test_app_with_features, token_for, OFFICIAL_ID,
    RESIDENT_ID, SECRETARY_ID,
};

async fn status_of(pool: &sqlx::Pool<sqlx::Postgres>, blotter_id: &str) -> String {
    let (status,): (String,) = sqlx::query_as("SELECT status FROM blotters WHERE blotter_id = $1")
        .bind(blotter_id)
        .fetch_one(pool)
        .await
        .unwrap();
    status
}

#[tokio::test]
async fn new_case_to_mediation_books_one_hearing_and_one_notification() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;

    let body = serde_json::json!({
        "status": "Mediation",
        "appearance_date": "2025-03-14",
        "appearance_time": "09:30:00"
    });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["blotter"]["status"], "Mediation");
    assert_eq!(resp["schedule"]["schedule_type"], "Mediation");
    assert_eq!(resp["schedule"]["appearance_date"], "2025-03-14");
    assert_eq!(resp["schedule"]["appearance_time"], "09:30");
    assert_eq!(resp["schedule"]["created_by"], SECRETARY_ID);
    assert!(resp.get("incident_log").is_none());
    assert_eq!(resp["notification"]["recipient_id"], RESIDENT_ID);
    assert_eq!(
        resp["notification"]["message"],
        "A 'Mediation' has been scheduled for your case Brgy.250001 on March 14, 2025 at 09:30 AM."
    );
    assert_eq!(resp["email"]["state"], "skipped");

    assert_eq!(status_of(&pool, "Brgy.250001").await, "Mediation");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM schedules").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications WHERE recipient_id = 1").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 0);
}

#[tokio::test]
async fn hearing_remarks_reach_the_complainant() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;

    let body = serde_json::json!({
        "status": "Mediation",
        "appearance_date": "2025-03-14",
        "appearance_time": "09:30:00",
        "remarks": "  Bring the receipts  "
    });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp["notification"]["message"],
        "A 'Mediation' has been scheduled for your case Brgy.250001 on March 14, 2025 at 09:30 AM. Remarks: Bring the receipts"
    );
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications WHERE message LIKE '%Remarks: Bring the receipts'").await, 1);
}

#[tokio::test]
async fn hearing_without_date_is_rejected_and_case_unchanged() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;

    let body = serde_json::json!({ "status": "Summon" });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["appearance_date"].is_string());
    assert_eq!(status_of(&pool, "Brgy.250001").await, "New");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM schedules").await, 0);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications").await, 0);
}

#[tokio::test]
async fn closing_without_remarks_is_rejected() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "Mediation").await;

    let body = serde_json::json!({ "status": "Dismiss", "remarks": "  " });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["field_errors"]["remarks"], "Remarks are required for this action.");
    assert_eq!(status_of(&pool, "Brgy.250001").await, "Mediation");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 0);
}

#[tokio::test]
async fn closing_with_remarks_logs_exactly_once() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "Mediation").await;

    let body = serde_json::json!({ "status": "Dismiss", "remarks": "Complainant failed to appear twice" });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(OFFICIAL_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["blotter"]["status"], "Dismiss");
    assert_eq!(resp["incident_log"]["case_title"], "Status changed to Dismiss");
    assert_eq!(resp["incident_log"]["log_type"], "Status Update");
    assert_eq!(resp["incident_log"]["processed_by"], OFFICIAL_ID);
    assert_eq!(resp["incident_log"]["remarks"], "Complainant failed to appear twice");
    assert_eq!(
        resp["notification"]["message"],
        "An update on your case Brgy.250001: The status is now 'Dismiss'."
    );
    assert_eq!(resp["email"]["state"], "skipped");

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM schedules").await, 0);
}

#[tokio::test]
async fn failed_email_is_reported_but_status_change_stands() {
    let Some((app, pool, _guard)) = test_app_with_features(FeatureFlags { mailgun: true }).await else {
        return;
    };
    std::env::remove_var("MAILGUN_DOMAIN");
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "Mediation").await;

    let body = serde_json::json!({ "status": "Dismiss", "remarks": "Complainant failed to appear twice" });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(OFFICIAL_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["blotter"]["status"], "Dismiss");
    assert_eq!(resp["email"]["state"], "failed");
    assert_eq!(resp["email"]["reason"], "MAILGUN_DOMAIN is not configured");

    assert_eq!(status_of(&pool, "Brgy.250001").await, "Dismiss");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 1);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM notifications").await, 1);
}

#[tokio::test]
async fn summarize_logs_but_keeps_case_open() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;
    let token = token_for(SECRETARY_ID);

    let body = serde_json::json!({ "status": "Summarize" });
    let (status, _) = post_json(&app, "/api/blotters/Brgy.250001/status", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body = serde_json::json!({ "status": "Summarize", "remarks": "Forwarded for summary" });
    let (status, _) = post_json(&app, "/api/blotters/Brgy.250001/status", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM incident_logs").await, 1);

    let body = serde_json::json!({
        "status": "Summon",
        "appearance_date": "2025-03-17",
        "appearance_time": "14:00:00"
    });
    let (status, _) = post_json(&app, "/api/blotters/Brgy.250001/status", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(status_of(&pool, "Brgy.250001").await, "Summon");
}

#[tokio::test]
async fn closed_case_cannot_be_reopened() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "Certified").await;

    let body = serde_json::json!({
        "status": "Mediation",
        "appearance_date": "2025-03-14",
        "appearance_time": "09:30:00"
    });
    let (status, resp) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(resp["message"], "Cannot change status from 'Certified' to 'Mediation'");
    assert_eq!(status_of(&pool, "Brgy.250001").await, "Certified");
}

#[tokio::test]
async fn new_case_cannot_be_certified_directly() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;

    let body = serde_json::json!({ "status": "Certified", "remarks": "Done" });
    let (status, _) = post_json(
        &app,
        "/api/blotters/Brgy.250001/status",
        &body,
        Some(&token_for(SECRETARY_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn hearings_can_repeat_before_closing() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    seed_blotter(&pool, "Brgy.250001", RESIDENT_ID, "New").await;
    let token = token_for(SECRETARY_ID);

    for (kind, date) in [("Summon", "2025-03-10"), ("Mediation", "2025-03-12"), ("Mediation", "2025-03-19")] {
        let body = serde_json::json!({ "status": kind, "appearance_date": date, "appearance_time": "10:00:00" });
        let (status, _) = post_json(&app, "/api/blotters/Brgy.250001/status", &body, Some(&token)).await;
        assert_eq!(status, StatusCode::OK, "{kind} on {date}");
    }

    let (_, schedules) = get(&app, "/api/blotters/Brgy.250001/schedules", Some(&token_for(RESIDENT_ID))).await;
    let dates: Vec<&str> = schedules
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["appearance_date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-03-10", "2025-03-12", "2025-03-19"]);
}

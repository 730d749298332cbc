use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{
    count, get, post_json, test_app, token_for, OTHER_RESIDENT_ID, RESIDENT_ID, SECRETARY_ID, TANOD_ID,
};

fn report_body() -> serde_json::Value {
    serde_json::json!({
        "complainant_first_name": "Juan",
        "complainant_last_name": "Dela Cruz",
        "complainant_address": "Purok 3",
        "complainant_contact_number": "09171234567",
        "date_of_incident": "2025-03-02",
        "location_of_incident": "Basketball court",
        "report_details": "Streetlight near the basketball court has been out for a week"
    })
}

async fn file_report(app: &axum::Router) -> String {
    let (status, body) = post_json(app, "/api/reports", &report_body(), Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn filing_a_report_confirms_to_informant() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let (status, body) = post_json(&app, "/api/reports", &report_body(), Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "New");
    assert_eq!(body["informant_id"], RESIDENT_ID);
    assert_eq!(body["complainant_name"], "Juan Dela Cruz");
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM notifications WHERE recipient_id = 1 AND report_id IS NOT NULL").await,
        1
    );
}

#[tokio::test]
async fn report_requires_details() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let mut body = report_body();
    body["report_details"] = serde_json::json!("");

    let (status, resp) = post_json(&app, "/api/reports", &body, Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["report_details"].is_string());
}

#[tokio::test]
async fn only_informant_or_staff_can_view() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let id = file_report(&app).await;
    let uri = format!("/api/reports/{}", id);

    let (status, _) = get(&app, &uri, Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &uri, Some(&token_for(TANOD_ID))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(&app, &uri, Some(&token_for(OTHER_RESIDENT_ID))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn status_update_records_action_and_notifies() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let id = file_report(&app).await;
    let uri = format!("/api/reports/{}/status", id);

    let body = serde_json::json!({ "status": "Action Taken", "action_taken": "Reported to the electric cooperative" });
    let (status, resp) = post_json(&app, &uri, &body, Some(&token_for(SECRETARY_ID))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["report"]["status"], "Action Taken");
    assert_eq!(resp["report"]["action_taken"], "Reported to the electric cooperative");
    assert_eq!(resp["notification"]["recipient_id"], RESIDENT_ID);
    assert_eq!(
        resp["notification"]["message"],
        "The status of your report ('Streetlight near the basketbal...') has been updated to 'Action Taken'."
    );
    assert_eq!(resp["email"]["state"], "skipped");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'UPDATED REPORT'").await, 1);
}

#[tokio::test]
async fn status_update_validation() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let id = file_report(&app).await;
    let uri = format!("/api/reports/{}/status", id);
    let token = token_for(SECRETARY_ID);

    let (status, resp) = post_json(&app, &uri, &serde_json::json!({ "status": "Resolved" }), Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp["field_errors"]["action_taken"], "Action taken is required.");

    let body = serde_json::json!({ "status": "Closed", "action_taken": "n/a" });
    let (status, _) = post_json(&app, &uri, &body, Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body = serde_json::json!({ "status": "Resolved", "action_taken": "Fixed" });
    let (status, _) = post_json(&app, &uri, &body, Some(&token_for(TANOD_ID))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post_json(
        &app,
        "/api/reports/00000000-0000-0000-0000-000000000000/status",
        &body,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

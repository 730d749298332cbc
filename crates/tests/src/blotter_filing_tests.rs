use axum::http::StatusCode;
use chrono::{Datelike, Utc};
use pretty_assertions::assert_eq;

use crate::common::{
    blotter_body, count, post_json, seed_blotter, test_app, token_for, RESIDENT_ID, SECRETARY_ID,
    TANOD_ID,
};

fn year_prefix() -> String {
    format!("Brgy.{:02}", Utc::now().year() % 100)
}

#[tokio::test]
async fn first_filing_of_the_year_gets_sequence_one() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let (status, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blotter_id"], format!("{}0001", year_prefix()));
    assert_eq!(body["status"], "New");
    assert_eq!(body["complainant_id"], RESIDENT_ID);
    assert_eq!(body["complainant_name"], "Juan Dela Cruz");
    assert_eq!(body["incident_type_label"], "Theft / Pagnanakaw");
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM blotters").await, 1);
}

#[tokio::test]
async fn identifiers_increase_within_a_year() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let token = token_for(RESIDENT_ID);

    let mut ids = Vec::new();
    for _ in 0..3 {
        let (status, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token)).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["blotter_id"].as_str().unwrap().to_string());
    }

    let prefix = year_prefix();
    assert_eq!(
        ids,
        vec![
            format!("{}0001", prefix),
            format!("{}0002", prefix),
            format!("{}0003", prefix),
        ]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_filings_get_distinct_sequential_ids() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let token = token_for(RESIDENT_ID);

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let app = app.clone();
            let token = token.clone();
            tokio::spawn(async move {
                post_json(&app, "/api/blotters", &blotter_body(), Some(&token)).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED, "{body}");
        ids.push(body["blotter_id"].as_str().unwrap().to_string());
    }
    ids.sort();

    let prefix = year_prefix();
    let expected: Vec<String> = (1..=5).map(|n| format!("{}{:04}", prefix, n)).collect();
    assert_eq!(ids, expected);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM blotters").await, 5);
}

#[tokio::test]
async fn sequence_continues_from_highest_existing() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let prefix = year_prefix();
    seed_blotter(&pool, &format!("{}0007", prefix), RESIDENT_ID, "New").await;
    seed_blotter(&pool, &format!("{}0041", prefix), RESIDENT_ID, "Dismiss").await;
    // Other years never affect the sequence.
    seed_blotter(&pool, "Brgy.990500", RESIDENT_ID, "New").await;

    let (status, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["blotter_id"], format!("{}0042", prefix));
}

#[tokio::test]
async fn sequence_grows_past_four_digits() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let prefix = year_prefix();
    seed_blotter(&pool, &format!("{}9999", prefix), RESIDENT_ID, "New").await;

    let (_, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(body["blotter_id"], format!("{}10000", prefix));

    let (_, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token_for(RESIDENT_ID))).await;
    assert_eq!(body["blotter_id"], format!("{}10001", prefix));
}

#[tokio::test]
async fn filing_notifies_complainant_and_secretary() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let (_, body) = post_json(&app, "/api/blotters", &blotter_body(), Some(&token_for(RESIDENT_ID))).await;
    let blotter_id = body["blotter_id"].as_str().unwrap();

    let (message,): (String,) = sqlx::query_as("SELECT message FROM notifications WHERE recipient_id = $1")
        .bind(RESIDENT_ID)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(
        message,
        format!("Your blotter case (ID: {}) has been successfully filed and is awaiting review.", blotter_id)
    );

    let (message,): (String,) = sqlx::query_as("SELECT message FROM notifications WHERE recipient_id = $1")
        .bind(SECRETARY_ID)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(message, format!("New Blotter Case Filed: {} by Juan Dela Cruz.", blotter_id));

    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'CREATED BLOTTER'").await,
        1
    );
}

#[tokio::test]
async fn tanod_files_on_behalf_of_resident() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let mut body = blotter_body();
    body["complainant_id"] = serde_json::json!(RESIDENT_ID);
    let (status, resp) = post_json(&app, "/api/blotters", &body, Some(&token_for(TANOD_ID))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(resp["complainant_id"], RESIDENT_ID);
}

#[tokio::test]
async fn resident_cannot_file_for_someone_else() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let mut body = blotter_body();
    body["complainant_id"] = serde_json::json!(TANOD_ID);
    let (status, _) = post_json(&app, "/api/blotters", &body, Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM blotters").await, 0);
}

#[tokio::test]
async fn missing_respondent_is_rejected() {
    let Some((app, pool, _guard)) = test_app().await else { return };

    let mut body = blotter_body();
    body["respondent_last_name"] = serde_json::json!("");
    let (status, resp) = post_json(&app, "/api/blotters", &body, Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["respondent_last_name"].is_string());
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM blotters").await, 0);
}

#[tokio::test]
async fn unknown_incident_type_is_rejected() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let mut body = blotter_body();
    body["incident_type"] = serde_json::json!("Jaywalking");
    let (status, resp) = post_json(&app, "/api/blotters", &body, Some(&token_for(RESIDENT_ID))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["incident_type"].is_string());
}

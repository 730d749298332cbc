use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::{
    count, get, patch_json, post_json, put_json, test_app, token_for, ADMIN_ID, SECRETARY_ID, TANOD_ID,
};

async fn add_member(app: &axum::Router, name: &str, active: bool) -> String {
    let body = serde_json::json!({ "full_name": name, "is_active": active });
    let (status, resp) = post_json(app, "/api/lupon/members", &body, Some(&token_for(ADMIN_ID))).await;
    assert_eq!(status, StatusCode::CREATED);
    resp["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn roster_defaults_to_unavailable_and_hides_inactive() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    add_member(&app, "Lourdes Villanueva", true).await;
    add_member(&app, "Ramon Aquino", false).await;

    let (status, members) = get(&app, "/api/lupon/members", Some(&token_for(TANOD_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(members.as_array().unwrap().len(), 2);
    assert_eq!(members[0]["position"], "Lupong Tagapamayapa");

    let (status, matrix) = get(&app, "/api/lupon/availability", Some(&token_for(TANOD_ID))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matrix["days"][0], "Monday");
    assert_eq!(matrix["members"].as_array().unwrap().len(), 1);
    assert_eq!(matrix["members"][0]["full_name"], "Lourdes Villanueva");
    assert_eq!(matrix["members"][0]["days"], serde_json::json!([false, false, false, false, false]));

    assert_eq!(count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE action = 'UPDATED LUPON ROSTER'").await, 2);
}

#[tokio::test]
async fn setting_a_cell_twice_keeps_one_row() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let id = add_member(&app, "Lourdes Villanueva", true).await;
    let token = token_for(ADMIN_ID);

    let body = serde_json::json!({ "member_id": id, "day_of_week": 2, "is_available": true });
    let (status, _) = put_json(&app, "/api/lupon/availability", &body, &token).await;
    assert_eq!(status, StatusCode::OK);

    let (_, matrix) = get(&app, "/api/lupon/availability", Some(&token)).await;
    assert_eq!(matrix["members"][0]["days"], serde_json::json!([false, false, true, false, false]));

    let body = serde_json::json!({ "member_id": id, "day_of_week": 2, "is_available": false });
    put_json(&app, "/api/lupon/availability", &body, &token).await;

    let (_, matrix) = get(&app, "/api/lupon/availability", Some(&token)).await;
    assert_eq!(matrix["members"][0]["days"][2], false);
    assert_eq!(count(&pool, "SELECT COUNT(*) FROM lupon_availability").await, 1);
}

#[tokio::test]
async fn availability_rejects_weekends_and_unknown_members() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let id = add_member(&app, "Lourdes Villanueva", true).await;
    let token = token_for(ADMIN_ID);

    let body = serde_json::json!({ "member_id": id, "day_of_week": 5, "is_available": true });
    let (status, resp) = put_json(&app, "/api/lupon/availability", &body, &token).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp["field_errors"]["day_of_week"].is_string());

    let body = serde_json::json!({
        "member_id": "00000000-0000-0000-0000-000000000000",
        "day_of_week": 1,
        "is_available": true
    });
    let (status, _) = put_json(&app, "/api/lupon/availability", &body, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn roster_changes_are_admin_only() {
    let Some((app, _pool, _guard)) = test_app().await else { return };

    let body = serde_json::json!({ "full_name": "Lourdes Villanueva" });
    let (status, _) = post_json(&app, "/api/lupon/members", &body, Some(&token_for(TANOD_ID))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = post_json(&app, "/api/lupon/members", &body, Some(&token_for(SECRETARY_ID))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post_json(
        &app,
        "/api/lupon/members",
        &serde_json::json!({ "full_name": "" }),
        Some(&token_for(ADMIN_ID)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn deactivated_member_leaves_the_roster() {
    let Some((app, pool, _guard)) = test_app().await else { return };
    let id = add_member(&app, "Lourdes Villanueva", true).await;
    add_member(&app, "Ramon Aquino", true).await;
    let token = token_for(ADMIN_ID);
    let uri = format!("/api/lupon/members/{}", id);

    let body = serde_json::json!({ "member_id": id, "day_of_week": 0, "is_available": true });
    put_json(&app, "/api/lupon/availability", &body, &token).await;

    let (status, member) = patch_json(&app, &uri, &serde_json::json!({ "is_active": false }), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(member["is_active"], false);

    let (_, matrix) = get(&app, "/api/lupon/availability", Some(&token)).await;
    let names: Vec<&str> = matrix["members"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["full_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ramon Aquino"]);

    let (_, members) = get(&app, "/api/lupon/members", Some(&token)).await;
    assert_eq!(members.as_array().unwrap().len(), 2);
    assert_eq!(
        count(&pool, "SELECT COUNT(*) FROM audit_logs WHERE details LIKE 'Deactivated member%'").await,
        1
    );

    let (status, _) = patch_json(&app, &uri, &serde_json::json!({ "is_active": true }), &token).await;
    assert_eq!(status, StatusCode::OK);
    let (_, matrix) = get(&app, "/api/lupon/availability", Some(&token)).await;
    assert_eq!(matrix["members"].as_array().unwrap().len(), 2);
    assert_eq!(matrix["members"][0]["full_name"], "Lourdes Villanueva");
    assert_eq!(matrix["members"][0]["days"][0], true);
}

#[tokio::test]
async fn member_update_is_admin_only_and_needs_a_known_member() {
    let Some((app, _pool, _guard)) = test_app().await else { return };
    let id = add_member(&app, "Lourdes Villanueva", true).await;
    let body = serde_json::json!({ "is_active": false });

    let (status, _) = patch_json(&app, &format!("/api/lupon/members/{}", id), &body, &token_for(SECRETARY_ID)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = patch_json(
        &app,
        "/api/lupon/members/00000000-0000-0000-0000-000000000000",
        &body,
        &token_for(ADMIN_ID),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

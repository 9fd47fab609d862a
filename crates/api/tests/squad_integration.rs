//! Integration tests for squad selection.
//!
//! These tests require a running PostgreSQL instance.
//! Set TEST_DATABASE_URL environment variable or use the default.

mod common;

use axum::http::{Method, StatusCode};
use common::{
    create_test_event, delete_request_with_auth, get_request_with_auth, json_request_with_auth,
    parse_response_body, setup, squad_size, TestUser,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

async fn upsert(app: &axum::Router, event_id: Uuid, admin: &TestUser, body: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/events/{}/squad", event_id),
            body,
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    parse_response_body(response).await
}

#[tokio::test]
async fn test_repeated_add_is_idempotent() {
    let (pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let (u1, u2) = (Uuid::new_v4(), Uuid::new_v4());
    let event_id = create_test_event(&app, &admin, &[u1, u2]).await;

    let change = upsert(&app, event_id, &admin, json!({ "add_user_ids": [u1, u2] })).await;
    assert_eq!(change["added_count"], 2);
    assert_eq!(change["total_count"], 2);
    assert_eq!(change["did_change"], true);

    let change = upsert(&app, event_id, &admin, json!({ "add_user_ids": [u1] })).await;
    assert_eq!(change["added_count"], 0);
    assert_eq!(change["removed_count"], 0);
    assert_eq!(change["total_count"], 2);
    assert_eq!(change["did_change"], false);

    assert_eq!(squad_size(&pool, event_id).await, 2);
}

#[tokio::test]
async fn test_duplicate_ids_in_one_add_count_once() {
    let (pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let player = Uuid::new_v4();
    let event_id = create_test_event(&app, &admin, &[player]).await;

    let change = upsert(
        &app,
        event_id,
        &admin,
        json!({ "add_user_ids": [player, player] }),
    )
    .await;
    assert_eq!(change["added_count"], 1);
    assert_eq!(change["total_count"], 1);
    assert_eq!(change["did_change"], true);

    assert_eq!(squad_size(&pool, event_id).await, 1);
}

#[tokio::test]
async fn test_remove_then_add_in_one_request() {
    let (_pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let (u1, u2, u3) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let event_id = create_test_event(&app, &admin, &[u1, u2, u3]).await;

    upsert(&app, event_id, &admin, json!({ "add_user_ids": [u1, u2] })).await;

    let change = upsert(
        &app,
        event_id,
        &admin,
        json!({ "add_user_ids": [u3, u2], "remove_user_ids": [u1, u2], "note": "Bring boots" }),
    )
    .await;
    assert_eq!(change["removed_count"], 2);
    assert_eq!(change["added_count"], 2);
    assert_eq!(change["total_count"], 2);

    let response = app
        .oneshot(get_request_with_auth(
            &format!("/api/v1/events/{}/squad", event_id),
            &admin.token,
        ))
        .await
        .unwrap();
    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 2);
    let selected: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["user_id"].as_str())
        .collect();
    assert!(!selected.contains(&u1.to_string().as_str()));
    assert!(body["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["selection_notes"] == "Bring boots"));
}

#[tokio::test]
async fn test_clear_squad_returns_to_no_decision() {
    let (pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let player = TestUser::new();
    let event_id = create_test_event(&app, &admin, &[player.id]).await;

    upsert(&app, event_id, &admin, json!({ "add_user_ids": [player.id] })).await;

    let response = app
        .clone()
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/events/{}/squad", event_id),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(squad_size(&pool, event_id).await, 0);

    let response = app
        .oneshot(get_request_with_auth(
            &format!("/api/v1/events/{}/me", event_id),
            &player.token,
        ))
        .await
        .unwrap();
    let card = parse_response_body(response).await;
    assert_eq!(card["selection"], "no_decision");
    assert_eq!(card["shows_rsvp_controls"], true);
}

#[tokio::test]
async fn test_squad_changes_require_admin() {
    let (pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let player = TestUser::new();
    let event_id = create_test_event(&app, &admin, &[player.id]).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/events/{}/squad", event_id),
            json!({ "add_user_ids": [player.id] }),
            &player.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(delete_request_with_auth(
            &format!("/api/v1/events/{}/squad", event_id),
            &player.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(squad_size(&pool, event_id).await, 0);
}

#[tokio::test]
async fn test_update_squad_entry_details() {
    let (_pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let player = Uuid::new_v4();
    let event_id = create_test_event(&app, &admin, &[player]).await;
    let uri = format!("/api/v1/events/{}/squad/{}", event_id, player);

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "position": "GK" }),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    upsert(&app, event_id, &admin, json!({ "add_user_ids": [player] })).await;

    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "position": "GK", "squad_role": "Captain" }),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let entry = parse_response_body(response).await;
    assert_eq!(entry["position"], "GK");
    assert_eq!(entry["squad_role"], "Captain");

    // Omitted fields keep their stored value
    let response = app
        .clone()
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "position": "CB" }),
            &admin.token,
        ))
        .await
        .unwrap();
    let entry = parse_response_body(response).await;
    assert_eq!(entry["position"], "CB");
    assert_eq!(entry["squad_role"], "Captain");

    let response = app
        .oneshot(json_request_with_auth(
            Method::PATCH,
            &uri,
            json!({ "position": "!!" }),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_oversized_batch_is_rejected() {
    let (_pool, app, _notifier) = setup().await;
    let admin = TestUser::new();
    let event_id = create_test_event(&app, &admin, &[Uuid::new_v4()]).await;
    let too_many: Vec<Uuid> = (0..201).map(|_| Uuid::new_v4()).collect();

    let response = app
        .oneshot(json_request_with_auth(
            Method::PUT,
            &format!("/api/v1/events/{}/squad", event_id),
            json!({ "add_user_ids": too_many }),
            &admin.token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

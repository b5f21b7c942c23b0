mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

async fn create_category(
    app: &axum::Router,
    cookie: &str,
    label: &str,
) -> Result<String> {
    let response = common::send_json(
        app,
        "POST",
        "/api/categories",
        Some(cookie),
        Some(json!({"label": label})),
    )
    .await?;
    anyhow::ensure!(
        response.status() == StatusCode::CREATED,
        "category creation failed: {}",
        response.status()
    );

    // Creation returns no payload; fetch the id from the list
    let response = common::send_json(app, "GET", "/api/categories", Some(cookie), None).await?;
    let body = common::body_json(response).await?;
    let id = body["data"]
        .as_array()
        .and_then(|categories| {
            categories
                .iter()
                .find(|c| c["label"] == label.to_lowercase())
        })
        .and_then(|c| c["id"].as_str())
        .map(|id| id.to_string());
    id.ok_or_else(|| anyhow::anyhow!("created category not listed"))
}

#[tokio::test]
async fn create_and_list_categories() -> Result<()> {
    let app = common::test_app();
    let cookie = common::register_user(&app, "alice", "a@x.com").await?;

    create_category(&app, &cookie, "Work").await?;

    let response = common::send_json(&app, "GET", "/api/categories", Some(&cookie), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await?;
    assert_eq!(body["data"][0]["label"], "work");
    assert!(body["data"][0].get("owner").is_none());
    Ok(())
}

#[tokio::test]
async fn empty_category_list_is_not_found() -> Result<()> {
    let app = common::test_app();
    let cookie = common::register_user(&app, "alice", "a@x.com").await?;

    let response = common::send_json(&app, "GET", "/api/categories", Some(&cookie), None).await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn create_rejects_a_blank_label() -> Result<()> {
    let app = common::test_app();
    let cookie = common::register_user(&app, "alice", "a@x.com").await?;

    let response = common::send_json(
        &app,
        "POST",
        "/api/categories",
        Some(&cookie),
        Some(json!({"label": "  "})),
    )
    .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await?;
    assert_eq!(body["title"], "ValidationFailed");
    Ok(())
}

#[tokio::test]
async fn label_update_applies() -> Result<()> {
    let app = common::test_app();
    let cookie = common::register_user(&app, "alice", "a@x.com").await?;
    let category_id = create_category(&app, &cookie, "work").await?;

    let response = common::send_json(
        &app,
        "PATCH",
        &format!("/api/categories/{}", category_id),
        Some(&cookie),
        Some(json!({"newLabel": "play"})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::send_json(&app, "GET", "/api/categories", Some(&cookie), None).await?;
    let body = common::body_json(response).await?;
    assert_eq!(body["data"][0]["label"], "play");
    Ok(())
}

#[tokio::test]
async fn label_update_distinguishes_bad_missing_and_foreign_ids() -> Result<()> {
    let app = common::test_app();
    let alice = common::register_user(&app, "alice", "a@x.com").await?;
    let bob = common::register_user(&app, "bob", "b@x.com").await?;
    let category_id = create_category(&app, &alice, "work").await?;

    // Malformed id: 400, regardless of what the store holds
    let response = common::send_json(
        &app,
        "PATCH",
        "/api/categories/not-a-key",
        Some(&alice),
        Some(json!({"newLabel": "play"})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await?;
    assert_eq!(body["title"], "InvalidIdentifier");

    // Well-formed but absent: 404
    let response = common::send_json(
        &app,
        "PATCH",
        &format!("/api/categories/{}", Uuid::new_v4()),
        Some(&alice),
        Some(json!({"newLabel": "play"})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Someone else's: 403
    let response = common::send_json(
        &app,
        "PATCH",
        &format!("/api/categories/{}", category_id),
        Some(&bob),
        Some(json!({"newLabel": "mine"})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = common::body_json(response).await?;
    assert_eq!(body["title"], "Unauthorized");
    Ok(())
}

#[tokio::test]
async fn delete_detaches_the_category_from_notes() -> Result<()> {
    let app = common::test_app();
    let cookie = common::register_user(&app, "alice", "a@x.com").await?;
    let category_id = create_category(&app, &cookie, "work").await?;

    let response = common::send_json(
        &app,
        "POST",
        "/api/notes",
        Some(&cookie),
        Some(json!({"title": "draft", "categoryId": category_id})),
    )
    .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = common::send_json(
        &app,
        "DELETE",
        &format!("/api/categories/{}", category_id),
        Some(&cookie),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await?;
    assert_eq!(body["message"], "Category deleted successfully");

    // No note still references the deleted category
    let response = common::send_json(&app, "GET", "/api/notes", Some(&cookie), None).await?;
    let body = common::body_json(response).await?;
    for note in body["data"].as_array().expect("notes array") {
        assert!(note["category"].is_null());
    }
    Ok(())
}

#[tokio::test]
async fn delete_refuses_a_foreign_category() -> Result<()> {
    let app = common::test_app();
    let alice = common::register_user(&app, "alice", "a@x.com").await?;
    let bob = common::register_user(&app, "bob", "b@x.com").await?;
    let category_id = create_category(&app, &alice, "work").await?;

    let response = common::send_json(
        &app,
        "DELETE",
        &format!("/api/categories/{}", category_id),
        Some(&bob),
        None,
    )
    .await?;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Still listed for the owner
    let response = common::send_json(&app, "GET", "/api/categories", Some(&alice), None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

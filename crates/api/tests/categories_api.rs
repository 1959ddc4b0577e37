//! End-to-end tests for the `/categories` routes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{assert_not_found, body_json, build_test_app, delete, get, post_json, put_json};

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/categories",
        json!({ "name": "Beaches", "icon": "🏖" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Beaches");
    assert_eq!(created["icon"], "🏖");

    let fetched = body_json(get(app, &format!("/categories/{id}")).await).await;
    assert_eq!(fetched["id"], id);
    assert_eq!(fetched["name"], "Beaches");
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let app = build_test_app();

    let response = post_json(app.clone(), "/categories", json!({ "name": "Museums" })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json(app, "/categories", json!({ "name": "Museums" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Category with this name already exists");
}

#[tokio::test]
async fn missing_name_reports_errors() {
    let app = build_test_app();

    let response = post_json(app, "/categories", json!({ "icon": "❓" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .any(|e| e == "Name is required and must be a non-empty string"));
}

#[tokio::test]
async fn unknown_category_returns_not_found() {
    let app = build_test_app();

    assert_not_found(get(app.clone(), "/categories/42").await, "Category not found").await;
    assert_not_found(
        put_json(app.clone(), "/categories/42", json!({ "name": "Ghost" })).await,
        "Category not found",
    )
    .await;
    assert_not_found(delete(app, "/categories/42").await, "Category not found").await;
}

#[tokio::test]
async fn rename_onto_existing_name_is_rejected() {
    let app = build_test_app();

    let first = body_json(post_json(app.clone(), "/categories", json!({ "name": "Parks" })).await).await;
    body_json(post_json(app.clone(), "/categories", json!({ "name": "Trails" })).await).await;

    let id = first["id"].as_i64().expect("numeric id");
    let response = put_json(app.clone(), &format!("/categories/{id}"), json!({ "name": "Trails" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Re-submitting the category's own name is not a conflict.
    let response = put_json(app, &format!("/categories/{id}"), json!({ "name": "Parks" })).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn get_embeds_places_by_default() {
    let app = build_test_app();

    let category =
        body_json(post_json(app.clone(), "/categories", json!({ "name": "Lakes" })).await).await;
    let category_id = category["id"].as_i64().expect("numeric id");

    let response = post_json(
        app.clone(),
        "/places",
        json!({
            "name": "Mirror Lake",
            "location": "North Valley",
            "rating": 5,
            "description": "Still water",
            "categoryId": category_id
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let fetched = body_json(get(app.clone(), &format!("/categories/{category_id}")).await).await;
    let places = fetched["places"].as_array().expect("places array");
    assert_eq!(places.len(), 1);
    assert_eq!(places[0]["name"], "Mirror Lake");

    let bare = body_json(
        get(app, &format!("/categories/{category_id}?includePlaces=false")).await,
    )
    .await;
    assert!(bare.get("places").is_none());
}

#[tokio::test]
async fn list_embeds_places_only_when_asked() {
    let app = build_test_app();

    body_json(post_json(app.clone(), "/categories", json!({ "name": "Cafes" })).await).await;

    let plain = body_json(get(app.clone(), "/categories").await).await;
    assert!(plain[0].get("places").is_none());

    let embedded = body_json(get(app, "/categories?includePlaces=true").await).await;
    assert!(embedded[0]["places"].is_array());
}

#[tokio::test]
async fn deleting_a_category_detaches_its_places() {
    let app = build_test_app();

    let category =
        body_json(post_json(app.clone(), "/categories", json!({ "name": "Ruins" })).await).await;
    let category_id = category["id"].as_i64().expect("numeric id");

    let place = body_json(
        post_json(
            app.clone(),
            "/places",
            json!({
                "name": "Old Fort",
                "location": "Hilltop",
                "rating": 4,
                "description": "Crumbling walls",
                "categoryId": category_id
            }),
        )
        .await,
    )
    .await;
    let place_id = place["id"].as_i64().expect("numeric id");

    let response = delete(app.clone(), &format!("/categories/{category_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Category deleted successfully");
    assert_eq!(body["deletedCategory"]["id"], category_id);

    let fetched = body_json(get(app, &format!("/places/{place_id}")).await).await;
    assert!(fetched["categoryId"].is_null());
}

//! End-to-end tests for the `/places` routes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{assert_not_found, body_json, build_seeded_app, build_test_app, delete, get, post_json, put_json};

fn test_place() -> serde_json::Value {
    json!({
        "name": "Test Place",
        "location": "Test Location",
        "rating": 4,
        "description": "Test Description"
    })
}

#[tokio::test]
async fn create_then_get_round_trips() {
    let app = build_test_app();

    let response = post_json(app.clone(), "/places", test_place()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    let id = created["id"].as_i64().expect("numeric id");
    assert_eq!(created["name"], "Test Place");
    assert_eq!(created["location"], "Test Location");
    assert_eq!(created["rating"], 4);
    assert_eq!(created["description"], "Test Description");

    let response = get(app, &format!("/places/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn create_with_optional_fields() {
    let app = build_test_app();

    let response = post_json(
        app,
        "/places",
        json!({
            "name": "Full Place",
            "location": "Somewhere",
            "rating": 5,
            "description": "All fields set",
            "videoUrl": "https://example.com/clip.mp4",
            "categoryId": null
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let created = body_json(response).await;
    assert_eq!(created["videoUrl"], "https://example.com/clip.mp4");
    assert!(created["categoryId"].is_null());
}

#[tokio::test]
async fn create_with_missing_fields_returns_errors() {
    let app = build_test_app();

    let response = post_json(app, "/places", json!({ "name": "Invalid Place" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    let errors = body["errors"].as_array().expect("errors array");
    assert!(!errors.is_empty());
    assert!(errors
        .iter()
        .any(|e| e == "Location is required and must be a non-empty string"));
    assert!(errors
        .iter()
        .any(|e| e == "Rating is required and must be an integer between 1 and 5"));
}

#[tokio::test]
async fn name_without_letters_is_rejected() {
    let app = build_test_app();

    let mut place = test_place();
    place["name"] = json!("12345");
    let response = post_json(app, "/places", place).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .any(|e| e == "Name must contain at least one letter"));
}

#[tokio::test]
async fn wrongly_typed_fields_are_validation_errors_not_rejections() {
    let app = build_test_app();

    // A string rating reaches the validator, not an extractor rejection.
    let mut place = test_place();
    place["rating"] = json!("4");
    let response = post_json(app.clone(), "/places", place).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .any(|e| e == "Rating is required and must be an integer between 1 and 5"));

    // Same for a numeric name, on PUT as well as POST.
    let created = body_json(post_json(app.clone(), "/places", test_place()).await).await;
    let id = created["id"].as_i64().expect("numeric id");
    let mut place = test_place();
    place["name"] = json!(123);
    let response = put_json(app, &format!("/places/{id}"), place).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .any(|e| e == "Name is required and must be a non-empty string"));
}

#[tokio::test]
async fn out_of_range_and_fractional_ratings_are_rejected() {
    let app = build_test_app();

    for rating in [json!(0), json!(6), json!(3.5)] {
        let mut place = test_place();
        place["rating"] = rating;
        let response = post_json(app.clone(), "/places", place).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["errors"]
            .as_array()
            .expect("errors array")
            .iter()
            .any(|e| e == "Rating is required and must be an integer between 1 and 5"));
    }
}

#[tokio::test]
async fn unknown_place_returns_not_found_on_every_verb() {
    let app = build_test_app();

    assert_not_found(get(app.clone(), "/places/9999").await, "Place not found").await;
    assert_not_found(
        put_json(app.clone(), "/places/9999", test_place()).await,
        "Place not found",
    )
    .await;
    assert_not_found(delete(app, "/places/9999").await, "Place not found").await;
}

#[tokio::test]
async fn non_numeric_id_is_a_client_error() {
    let app = build_test_app();

    let response = get(app, "/places/not-a-number").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_replaces_all_fields() {
    let app = build_test_app();

    let created = body_json(post_json(app.clone(), "/places", test_place()).await).await;
    let id = created["id"].as_i64().expect("numeric id");

    let replacement = json!({
        "name": "Renamed Place",
        "location": "New Location",
        "rating": 2,
        "description": "Rewritten"
    });
    let response = put_json(app.clone(), &format!("/places/{id}"), replacement.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["id"], id);
    assert_eq!(updated["name"], "Renamed Place");
    assert_eq!(updated["rating"], 2);

    // Applying the same update again yields the same result.
    let response = put_json(app.clone(), &format!("/places/{id}"), replacement).await;
    assert_eq!(response.status(), StatusCode::OK);
    let again = body_json(response).await;
    assert_eq!(again, updated);

    let fetched = body_json(get(app, &format!("/places/{id}")).await).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_with_invalid_body_reports_errors() {
    let app = build_test_app();

    let created = body_json(post_json(app.clone(), "/places", test_place()).await).await;
    let id = created["id"].as_i64().expect("numeric id");

    let response = put_json(app, &format!("/places/{id}"), json!({ "rating": 3 })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(!body["errors"].as_array().expect("errors array").is_empty());
}

#[tokio::test]
async fn delete_removes_the_place() {
    let app = build_test_app();

    let created = body_json(post_json(app.clone(), "/places", test_place()).await).await;
    let id = created["id"].as_i64().expect("numeric id");

    let response = delete(app.clone(), &format!("/places/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Place deleted successfully");
    assert_eq!(body["deletedPlace"]["id"], id);

    assert_not_found(get(app, &format!("/places/{id}")).await, "Place not found").await;
}

#[tokio::test]
async fn seeded_catalog_lists_demo_places() {
    let app = build_seeded_app();

    let response = get(app, "/places").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().expect("array").len(), 6);
}

#[tokio::test]
async fn list_supports_search_and_rating_filters() {
    let app = build_test_app();

    for (name, rating) in [("Quiet Harbor", 5), ("Harbor Market", 3), ("Hill Trail", 4)] {
        let response = post_json(
            app.clone(),
            "/places",
            json!({
                "name": name,
                "location": "Coast",
                "rating": rating,
                "description": "filter fixture"
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body = body_json(get(app.clone(), "/places?search=harbor").await).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let body = body_json(get(app.clone(), "/places?minRating=4").await).await;
    assert_eq!(body.as_array().expect("array").len(), 2);

    let body = body_json(get(app, "/places?sortBy=rating&sortOrder=desc").await).await;
    let ratings: Vec<i64> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["rating"].as_i64().expect("rating"))
        .collect();
    assert_eq!(ratings, vec![5, 4, 3]);
}

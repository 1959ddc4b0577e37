//! Handlers for the `/categories` resource.
//!
//! Category names are unique; duplicates are rejected with a 400 `{error}`
//! response. Deleting a category detaches its places rather than deleting
//! them.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use placemark_core::types::DbId;
use placemark_core::validation::validate_category;
use placemark_db::models::{Category, PlaceListParams, PlaceSummary};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const DUPLICATE_NAME: &str = "Category with this name already exists";

/// Query parameters controlling whether place summaries are embedded.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncludePlacesParams {
    pub include_places: Option<bool>,
}

/// GET /categories?includePlaces
///
/// List all categories, name ascending, optionally embedding a summary of
/// each category's places.
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<IncludePlacesParams>,
) -> ApiResult<impl IntoResponse> {
    let categories = state.store.list_categories().await?;

    if !params.include_places.unwrap_or(false) {
        return Ok(Json(json!(categories)));
    }

    let mut shaped = Vec::with_capacity(categories.len());
    for category in &categories {
        shaped.push(with_places(&state, category).await?);
    }

    Ok(Json(json!(shaped)))
}

/// POST /categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let data = validate_category(&body).map_err(ApiError::Validation)?;

    if state
        .store
        .find_category_by_name(&data.name)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict(DUPLICATE_NAME.to_string()));
    }

    let category = state.store.create_category(data).await?;

    tracing::info!(category_id = category.id, name = %category.name, "Category created");

    Ok(Json(category))
}

/// GET /categories/{id}?includePlaces
///
/// Unlike the list endpoint, places are embedded by default here.
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<IncludePlacesParams>,
) -> ApiResult<impl IntoResponse> {
    let category = state
        .store
        .get_category(id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    if !params.include_places.unwrap_or(true) {
        return Ok(Json(json!(category)));
    }

    Ok(Json(with_places(&state, &category).await?))
}

/// PUT /categories/{id}
///
/// Full replace; renaming onto an existing category's name is rejected.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .store
        .get_category(id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    let data = validate_category(&body).map_err(ApiError::Validation)?;

    if data.name != existing.name
        && state
            .store
            .find_category_by_name(&data.name)
            .await?
            .is_some()
    {
        return Err(ApiError::Conflict(DUPLICATE_NAME.to_string()));
    }

    let category = state
        .store
        .update_category(id, data)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    tracing::info!(category_id = id, "Category updated");

    Ok(Json(category))
}

/// DELETE /categories/{id}
///
/// Nulls out `categoryId` on referencing places, then removes the category.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .store
        .delete_category(id)
        .await?
        .ok_or(ApiError::NotFound("Category"))?;

    tracing::info!(category_id = id, "Category deleted");

    Ok(Json(json!({
        "message": "Category deleted successfully",
        "deletedCategory": deleted,
    })))
}

/// Shape a category with its embedded place summaries.
async fn with_places(state: &AppState, category: &Category) -> ApiResult<serde_json::Value> {
    let params = PlaceListParams {
        category_id: Some(category.id),
        ..Default::default()
    };
    let places: Vec<PlaceSummary> = state
        .store
        .list_places(&params)
        .await?
        .iter()
        .map(PlaceSummary::from)
        .collect();

    let mut value = json!(category);
    value["places"] = json!(places);
    Ok(value)
}

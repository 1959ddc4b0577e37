//! Handlers for the `/places` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use placemark_core::types::DbId;
use placemark_core::validation::validate_place;
use placemark_db::models::PlaceListParams;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /places
///
/// List places, optionally filtered by category, minimum rating, and a
/// case-insensitive substring search; sortable by name/rating/location/
/// createdAt, ascending by default.
pub async fn list_places(
    State(state): State<AppState>,
    Query(params): Query<PlaceListParams>,
) -> ApiResult<impl IntoResponse> {
    let places = state.store.list_places(&params).await?;

    Ok(Json(places))
}

/// POST /places
///
/// Validate and create a place with a server-assigned id. The body comes in
/// as raw JSON so wrongly-typed fields surface as validation messages, not
/// as an extractor rejection.
pub async fn create_place(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let data = validate_place(&body).map_err(ApiError::Validation)?;

    let place = state.store.create_place(data).await?;

    tracing::info!(place_id = place.id, name = %place.name, "Place created");

    Ok(Json(place))
}

/// GET /places/{id}
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<impl IntoResponse> {
    let place = state
        .store
        .get_place(id)
        .await?
        .ok_or(ApiError::NotFound("Place"))?;

    Ok(Json(place))
}

/// PUT /places/{id}
///
/// Full replace of all mutable fields; the id (and createdAt) are preserved.
/// Existence is checked before the body is validated, so an unknown id is a
/// 404 even with an invalid payload.
pub async fn update_place(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    if state.store.get_place(id).await?.is_none() {
        return Err(ApiError::NotFound("Place"));
    }

    let data = validate_place(&body).map_err(ApiError::Validation)?;

    // The place may have been deleted between the check and the write;
    // whichever request finishes its round-trip first wins.
    let place = state
        .store
        .update_place(id, data)
        .await?
        .ok_or(ApiError::NotFound("Place"))?;

    tracing::info!(place_id = id, "Place updated");

    Ok(Json(place))
}

/// DELETE /places/{id}
///
/// Physical, immediate removal; the deleted entity is echoed back.
pub async fn delete_place(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .store
        .delete_place(id)
        .await?
        .ok_or(ApiError::NotFound("Place"))?;

    tracing::info!(place_id = id, "Place deleted");

    Ok(Json(json!({
        "message": "Place deleted successfully",
        "deletedPlace": deleted,
    })))
}

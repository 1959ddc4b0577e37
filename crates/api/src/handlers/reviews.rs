//! Handlers for the `/reviews` resource.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use placemark_core::types::DbId;
use placemark_core::validation::{validate_review, validate_review_update, NewReview};
use placemark_db::models::ReviewListParams;
use serde_json::{json, Value};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /reviews?placeId&minRating
///
/// List reviews, newest first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListParams>,
) -> ApiResult<impl IntoResponse> {
    let reviews = state.store.list_reviews(&params).await?;

    Ok(Json(reviews))
}

/// POST /reviews
///
/// A review cannot reference a nonexistent place; the place is checked after
/// validation and a missing one is a 404.
pub async fn create_review(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let data = validate_review(&body).map_err(ApiError::Validation)?;

    if state.store.get_place(data.place_id).await?.is_none() {
        return Err(ApiError::NotFound("Place"));
    }

    let review = state.store.create_review(data).await?;

    tracing::info!(review_id = review.id, place_id = review.place_id, "Review created");

    Ok(Json(review))
}

/// GET /reviews/{id}
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<impl IntoResponse> {
    let review = state
        .store
        .get_review(id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    Ok(Json(review))
}

/// PUT /reviews/{id}
///
/// Replaces content/rating/author; the review stays attached to its
/// original place even if the payload carries a different `placeId`.
pub async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<Value>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .store
        .get_review(id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    let update = validate_review_update(&body).map_err(ApiError::Validation)?;

    let review = state
        .store
        .update_review(
            id,
            NewReview {
                content: update.content,
                rating: update.rating,
                author: update.author,
                place_id: existing.place_id,
            },
        )
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    tracing::info!(review_id = id, "Review updated");

    Ok(Json(review))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> ApiResult<impl IntoResponse> {
    let deleted = state
        .store
        .delete_review(id)
        .await?
        .ok_or(ApiError::NotFound("Review"))?;

    tracing::info!(review_id = id, "Review deleted");

    Ok(Json(json!({
        "message": "Review deleted successfully",
        "deletedReview": deleted,
    })))
}

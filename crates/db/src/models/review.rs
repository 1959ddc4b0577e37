use placemark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `reviews` table. A review always references an existing
/// place; deleting the place removes its reviews.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: DbId,
    pub content: String,
    pub rating: i32,
    pub author: String,
    pub place_id: DbId,
    pub created_at: Timestamp,
}

/// Query parameters for `GET /reviews`. Results are newest-first.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub place_id: Option<DbId>,
    pub min_rating: Option<i32>,
}

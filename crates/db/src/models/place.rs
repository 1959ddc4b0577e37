use placemark_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `places` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub rating: i32,
    pub description: String,
    pub video_url: Option<String>,
    pub category_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// Lightweight place summary embedded in category responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub rating: i32,
}

impl From<&Place> for PlaceSummary {
    fn from(place: &Place) -> Self {
        Self {
            id: place.id,
            name: place.name.clone(),
            location: place.location.clone(),
            rating: place.rating,
        }
    }
}

/// Query parameters for `GET /places`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceListParams {
    pub category_id: Option<DbId>,
    pub min_rating: Option<i32>,
    /// Case-insensitive substring match over name, location, and description.
    pub search: Option<String>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

/// Sortable place fields. Default listing order is by id (insertion order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Rating,
    Location,
    CreatedAt,
}

impl SortField {
    /// The whitelisted column name for ORDER BY clauses.
    pub fn column(self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Rating => "rating",
            SortField::Location => "location",
            SortField::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn keyword(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

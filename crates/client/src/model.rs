//! Client-side view of the catalog's JSON wire types.

use chrono::{DateTime, Utc};
use placemark_core::types::DbId;
use serde::{Deserialize, Serialize};

/// A place as returned by the server.
///
/// `createdAt` is optional because relay `add` payloads from other clients
/// may carry a place that has not round-tripped through the server yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: DbId,
    pub name: String,
    pub location: String,
    pub rating: i32,
    pub description: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The mutable fields of a place, used as the create/update request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceDraft {
    pub name: String,
    pub location: String,
    pub rating: i32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<DbId>,
}

impl PlaceDraft {
    /// Materialize a draft as a local place with the given id.
    pub fn into_place(self, id: DbId) -> Place {
        Place {
            id,
            name: self.name,
            location: self.location,
            rating: self.rating,
            description: self.description,
            video_url: self.video_url,
            category_id: self.category_id,
            created_at: None,
        }
    }
}

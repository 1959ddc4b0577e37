//! The swappable storage seam.
//!
//! [`CatalogStore`] is the single contract both backends implement; route
//! handlers hold an `Arc<dyn CatalogStore>` and never know which adapter is
//! behind it. Validation happens before any store call, so implementations
//! may assume payloads are well-formed. Not-found outcomes are `Ok(None)`
//! (or `Ok` of an empty/`None` value for deletes), never errors.

mod memory;
mod sql;

pub use memory::MemoryStore;
pub use sql::SqlStore;

use async_trait::async_trait;
use placemark_core::types::DbId;
use placemark_core::validation::{NewCategory, NewPlace, NewReview};

use crate::models::{Category, Place, PlaceListParams, Review, ReviewListParams};

/// Storage failure. Handlers map this to a generic 500; the detail is only
/// logged server-side.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD storage for places, categories, and reviews.
///
/// Mutating operations are not serialized against each other: two interleaved
/// requests on the same id race, and the last write wins.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // --- Places ---

    /// List places, filtered and sorted per `params`. Substring search is
    /// case-insensitive; default order is by id ascending.
    async fn list_places(&self, params: &PlaceListParams) -> StoreResult<Vec<Place>>;

    async fn get_place(&self, id: DbId) -> StoreResult<Option<Place>>;

    /// Insert a place with a server-assigned id.
    async fn create_place(&self, data: NewPlace) -> StoreResult<Place>;

    /// Full overwrite of all mutable fields; id and createdAt are preserved.
    async fn update_place(&self, id: DbId, data: NewPlace) -> StoreResult<Option<Place>>;

    /// Physically remove a place (and its reviews). Returns the removed row.
    async fn delete_place(&self, id: DbId) -> StoreResult<Option<Place>>;

    // --- Categories ---

    /// List all categories, name ascending.
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;

    async fn get_category(&self, id: DbId) -> StoreResult<Option<Category>>;

    /// Lookup by exact name; used for the unique-name check.
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;

    async fn create_category(&self, data: NewCategory) -> StoreResult<Category>;

    async fn update_category(&self, id: DbId, data: NewCategory) -> StoreResult<Option<Category>>;

    /// Remove a category, nulling `categoryId` on referencing places.
    async fn delete_category(&self, id: DbId) -> StoreResult<Option<Category>>;

    // --- Reviews ---

    /// List reviews, newest first, optionally filtered by place / min rating.
    async fn list_reviews(&self, params: &ReviewListParams) -> StoreResult<Vec<Review>>;

    async fn get_review(&self, id: DbId) -> StoreResult<Option<Review>>;

    /// Insert a review. The caller has already verified the place exists.
    async fn create_review(&self, data: NewReview) -> StoreResult<Review>;

    async fn update_review(&self, id: DbId, data: NewReview) -> StoreResult<Option<Review>>;

    async fn delete_review(&self, id: DbId) -> StoreResult<Option<Review>>;
}

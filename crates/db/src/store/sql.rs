//! PostgreSQL store adapter.
//!
//! Runtime-checked queries with `$n` binds; optional filters are bound as
//! NULLs so one statement covers every filter combination. ORDER BY columns
//! come from the [`SortField`] whitelist, never from user input.

use async_trait::async_trait;
use placemark_core::types::DbId;
use placemark_core::validation::{NewCategory, NewPlace, NewReview};

use crate::models::{
    Category, Place, PlaceListParams, Review, ReviewListParams, SortOrder,
};
use crate::DbPool;

use super::{CatalogStore, StoreResult};

/// Column list for `places` queries.
const PLACE_COLUMNS: &str =
    "id, name, location, rating, description, video_url, category_id, created_at";

/// Column list for `categories` queries.
const CATEGORY_COLUMNS: &str = "id, name, icon";

/// Column list for `reviews` queries.
const REVIEW_COLUMNS: &str = "id, content, rating, author, place_id, created_at";

/// PostgreSQL-backed [`CatalogStore`] adapter.
pub struct SqlStore {
    pool: DbPool,
}

impl SqlStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for SqlStore {
    // --- Places ---

    async fn list_places(&self, params: &PlaceListParams) -> StoreResult<Vec<Place>> {
        let order_by = params
            .sort_by
            .map_or("id", |field| field.column());
        let direction = params.sort_order.unwrap_or(SortOrder::Asc).keyword();

        let query = format!(
            "SELECT {PLACE_COLUMNS} FROM places \
             WHERE ($1::bigint IS NULL OR category_id = $1) \
               AND ($2::int IS NULL OR rating >= $2) \
               AND ($3::text IS NULL OR name ILIKE '%' || $3 || '%' \
                    OR location ILIKE '%' || $3 || '%' \
                    OR description ILIKE '%' || $3 || '%') \
             ORDER BY {order_by} {direction}"
        );
        let places = sqlx::query_as::<_, Place>(&query)
            .bind(params.category_id)
            .bind(params.min_rating)
            .bind(params.search.as_deref())
            .fetch_all(&self.pool)
            .await?;
        Ok(places)
    }

    async fn get_place(&self, id: DbId) -> StoreResult<Option<Place>> {
        let query = format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = $1");
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_place(&self, data: NewPlace) -> StoreResult<Place> {
        let query = format!(
            "INSERT INTO places (name, location, rating, description, video_url, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {PLACE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(&data.name)
            .bind(&data.location)
            .bind(data.rating)
            .bind(&data.description)
            .bind(data.video_url.as_deref())
            .bind(data.category_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_place(&self, id: DbId, data: NewPlace) -> StoreResult<Option<Place>> {
        let query = format!(
            "UPDATE places \
             SET name = $2, location = $3, rating = $4, description = $5, \
                 video_url = $6, category_id = $7 \
             WHERE id = $1 \
             RETURNING {PLACE_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(&data.location)
            .bind(data.rating)
            .bind(&data.description)
            .bind(data.video_url.as_deref())
            .bind(data.category_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_place(&self, id: DbId) -> StoreResult<Option<Place>> {
        // Reviews cascade via the FK.
        let query = format!("DELETE FROM places WHERE id = $1 RETURNING {PLACE_COLUMNS}");
        Ok(sqlx::query_as::<_, Place>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Categories ---

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name");
        Ok(sqlx::query_as::<_, Category>(&query)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE name = $1");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_category(&self, data: NewCategory) -> StoreResult<Category> {
        let query = format!(
            "INSERT INTO categories (name, icon) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(&data.name)
            .bind(data.icon.as_deref())
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_category(&self, id: DbId, data: NewCategory) -> StoreResult<Option<Category>> {
        let query = format!(
            "UPDATE categories SET name = $2, icon = $3 WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&data.name)
            .bind(data.icon.as_deref())
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        // Referencing places are nulled via ON DELETE SET NULL.
        let query = format!("DELETE FROM categories WHERE id = $1 RETURNING {CATEGORY_COLUMNS}");
        Ok(sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    // --- Reviews ---

    async fn list_reviews(&self, params: &ReviewListParams) -> StoreResult<Vec<Review>> {
        let query = format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews \
             WHERE ($1::bigint IS NULL OR place_id = $1) \
               AND ($2::int IS NULL OR rating >= $2) \
             ORDER BY created_at DESC, id DESC"
        );
        Ok(sqlx::query_as::<_, Review>(&query)
            .bind(params.place_id)
            .bind(params.min_rating)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_review(&self, id: DbId) -> StoreResult<Option<Review>> {
        let query = format!("SELECT {REVIEW_COLUMNS} FROM reviews WHERE id = $1");
        Ok(sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn create_review(&self, data: NewReview) -> StoreResult<Review> {
        let query = format!(
            "INSERT INTO reviews (content, rating, author, place_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REVIEW_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Review>(&query)
            .bind(&data.content)
            .bind(data.rating)
            .bind(&data.author)
            .bind(data.place_id)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_review(&self, id: DbId, data: NewReview) -> StoreResult<Option<Review>> {
        let query = format!(
            "UPDATE reviews SET content = $2, rating = $3, author = $4, place_id = $5 \
             WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(&data.content)
            .bind(data.rating)
            .bind(&data.author)
            .bind(data.place_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn delete_review(&self, id: DbId) -> StoreResult<Option<Review>> {
        let query = format!("DELETE FROM reviews WHERE id = $1 RETURNING {REVIEW_COLUMNS}");
        Ok(sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

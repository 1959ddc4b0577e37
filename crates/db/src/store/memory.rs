//! In-memory store adapter.
//!
//! A `RwLock`-guarded map per entity, with monotonically increasing id
//! counters seeded above the highest existing id. Used as the default
//! backend for local development and for every test; behaviorally
//! interchangeable with [`SqlStore`](super::SqlStore).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use placemark_core::types::DbId;
use placemark_core::validation::{NewCategory, NewPlace, NewReview};
use tokio::sync::RwLock;

use crate::models::{
    Category, Place, PlaceListParams, Review, ReviewListParams, SortField, SortOrder,
};

use super::{CatalogStore, StoreResult};

#[derive(Default)]
struct Inner {
    places: HashMap<DbId, Place>,
    categories: HashMap<DbId, Category>,
    reviews: HashMap<DbId, Review>,
    next_place_id: DbId,
    next_category_id: DbId,
    next_review_id: DbId,
}

/// In-memory [`CatalogStore`] adapter.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_place_id: 1,
                next_category_id: 1,
                next_review_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Create a store pre-loaded with the six demo places.
    pub fn with_demo_places() -> Self {
        let store = Self::new();
        {
            let mut inner = store
                .inner
                .try_write()
                .expect("store is not shared during construction");
            for (name, location, rating, description) in DEMO_PLACES {
                let id = inner.next_place_id;
                inner.next_place_id += 1;
                inner.places.insert(
                    id,
                    Place {
                        id,
                        name: name.to_string(),
                        location: location.to_string(),
                        rating: *rating,
                        description: description.to_string(),
                        video_url: None,
                        category_id: None,
                        created_at: Utc::now(),
                    },
                );
            }
        }
        store
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    // --- Places ---

    async fn list_places(&self, params: &PlaceListParams) -> StoreResult<Vec<Place>> {
        let inner = self.inner.read().await;
        let mut places: Vec<Place> = inner
            .places
            .values()
            .filter(|p| matches_filter(p, params))
            .cloned()
            .collect();
        sort_places(&mut places, params);
        Ok(places)
    }

    async fn get_place(&self, id: DbId) -> StoreResult<Option<Place>> {
        Ok(self.inner.read().await.places.get(&id).cloned())
    }

    async fn create_place(&self, data: NewPlace) -> StoreResult<Place> {
        let mut inner = self.inner.write().await;
        let id = inner.next_place_id;
        inner.next_place_id += 1;
        let place = Place {
            id,
            name: data.name,
            location: data.location,
            rating: data.rating,
            description: data.description,
            video_url: data.video_url,
            category_id: data.category_id,
            created_at: Utc::now(),
        };
        inner.places.insert(id, place.clone());
        Ok(place)
    }

    async fn update_place(&self, id: DbId, data: NewPlace) -> StoreResult<Option<Place>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.places.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = data.name;
        existing.location = data.location;
        existing.rating = data.rating;
        existing.description = data.description;
        existing.video_url = data.video_url;
        existing.category_id = data.category_id;
        Ok(Some(existing.clone()))
    }

    async fn delete_place(&self, id: DbId) -> StoreResult<Option<Place>> {
        let mut inner = self.inner.write().await;
        let removed = inner.places.remove(&id);
        if removed.is_some() {
            inner.reviews.retain(|_, r| r.place_id != id);
        }
        Ok(removed)
    }

    // --- Categories ---

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let inner = self.inner.read().await;
        let mut categories: Vec<Category> = inner.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn get_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        Ok(self.inner.read().await.categories.get(&id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .values()
            .find(|c| c.name == name)
            .cloned())
    }

    async fn create_category(&self, data: NewCategory) -> StoreResult<Category> {
        let mut inner = self.inner.write().await;
        let id = inner.next_category_id;
        inner.next_category_id += 1;
        let category = Category {
            id,
            name: data.name,
            icon: data.icon,
        };
        inner.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: DbId, data: NewCategory) -> StoreResult<Option<Category>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.categories.get_mut(&id) else {
            return Ok(None);
        };
        existing.name = data.name;
        existing.icon = data.icon;
        Ok(Some(existing.clone()))
    }

    async fn delete_category(&self, id: DbId) -> StoreResult<Option<Category>> {
        let mut inner = self.inner.write().await;
        let removed = inner.categories.remove(&id);
        if removed.is_some() {
            for place in inner.places.values_mut() {
                if place.category_id == Some(id) {
                    place.category_id = None;
                }
            }
        }
        Ok(removed)
    }

    // --- Reviews ---

    async fn list_reviews(&self, params: &ReviewListParams) -> StoreResult<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<Review> = inner
            .reviews
            .values()
            .filter(|r| {
                params.place_id.is_none_or(|pid| r.place_id == pid)
                    && params.min_rating.is_none_or(|min| r.rating >= min)
            })
            .cloned()
            .collect();
        // Newest first; id breaks ties for reviews created in the same instant.
        reviews.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(reviews)
    }

    async fn get_review(&self, id: DbId) -> StoreResult<Option<Review>> {
        Ok(self.inner.read().await.reviews.get(&id).cloned())
    }

    async fn create_review(&self, data: NewReview) -> StoreResult<Review> {
        let mut inner = self.inner.write().await;
        let id = inner.next_review_id;
        inner.next_review_id += 1;
        let review = Review {
            id,
            content: data.content,
            rating: data.rating,
            author: data.author,
            place_id: data.place_id,
            created_at: Utc::now(),
        };
        inner.reviews.insert(id, review.clone());
        Ok(review)
    }

    async fn update_review(&self, id: DbId, data: NewReview) -> StoreResult<Option<Review>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.reviews.get_mut(&id) else {
            return Ok(None);
        };
        existing.content = data.content;
        existing.rating = data.rating;
        existing.author = data.author;
        existing.place_id = data.place_id;
        Ok(Some(existing.clone()))
    }

    async fn delete_review(&self, id: DbId) -> StoreResult<Option<Review>> {
        Ok(self.inner.write().await.reviews.remove(&id))
    }
}

fn matches_filter(place: &Place, params: &PlaceListParams) -> bool {
    if let Some(cid) = params.category_id {
        if place.category_id != Some(cid) {
            return false;
        }
    }
    if let Some(min) = params.min_rating {
        if place.rating < min {
            return false;
        }
    }
    if let Some(search) = &params.search {
        let needle = search.to_lowercase();
        let hit = place.name.to_lowercase().contains(&needle)
            || place.location.to_lowercase().contains(&needle)
            || place.description.to_lowercase().contains(&needle);
        if !hit {
            return false;
        }
    }
    true
}

fn sort_places(places: &mut [Place], params: &PlaceListParams) {
    let order = params.sort_order.unwrap_or_default();
    match params.sort_by {
        None => places.sort_by_key(|p| p.id),
        Some(SortField::Name) => places.sort_by(|a, b| a.name.cmp(&b.name)),
        Some(SortField::Rating) => places.sort_by_key(|p| p.rating),
        Some(SortField::Location) => places.sort_by(|a, b| a.location.cmp(&b.location)),
        Some(SortField::CreatedAt) => places.sort_by_key(|p| p.created_at),
    }
    if order == SortOrder::Desc {
        places.reverse();
    }
}

/// The canonical demo catalog, loaded when a fresh store starts empty.
const DEMO_PLACES: &[(&str, &str, i32, &str)] = &[
    (
        "South Beach",
        "Miami, Florida",
        5,
        "Beautiful sandy beach with crystal clear waters. Perfect for swimming, sunbathing, and people watching. The vibrant atmosphere and nearby restaurants make it a must-visit destination.",
    ),
    (
        "Rocky Mountain National Park",
        "Colorado",
        4,
        "Stunning mountain views with diverse wildlife and hiking trails for all skill levels. The park offers breathtaking scenery, alpine lakes, and opportunities to see elk, moose, and other wildlife in their natural habitat.",
    ),
    (
        "Cancun Resort & Spa",
        "Cancun, Mexico",
        4,
        "Luxury all-inclusive resort with pristine beaches, multiple swimming pools, and world-class dining options. Enjoy water sports, spa treatments, and evening entertainment in this tropical paradise.",
    ),
    (
        "Lake Michigan",
        "Michigan",
        3,
        "Peaceful lake perfect for fishing, boating, and water sports. The surrounding forests and small towns offer charming accommodations and local cuisine. Great for family vacations and outdoor enthusiasts.",
    ),
    (
        "Manhattan Experience",
        "New York City",
        2,
        "Exciting city break with world-famous attractions including Times Square, Central Park, and Broadway shows. Shop on Fifth Avenue, visit museums, and experience the diverse culinary scene that makes NYC a global destination.",
    ),
    (
        "Roman Colosseum",
        "Rome, Italy",
        5,
        "Ancient amphitheater dating back to 70-80 AD. This iconic symbol of Imperial Rome offers a glimpse into the past with its impressive architecture and historical significance. Guided tours available to learn about gladiatorial contests and public spectacles.",
    ),
];

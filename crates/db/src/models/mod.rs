//! Entity models and list query parameters.
//!
//! Entities serialize with camelCase field names to match the JSON wire
//! format (`videoUrl`, `categoryId`, `placeId`, `createdAt`).

mod category;
mod place;
mod review;

pub use category::Category;
pub use place::{Place, PlaceListParams, PlaceSummary, SortField, SortOrder};
pub use review::{Review, ReviewListParams};

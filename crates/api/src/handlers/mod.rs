//! HTTP resource handlers.
//!
//! Every handler follows the same order: parse the path id, validate the
//! body, check existence for GET-by-id/PUT/DELETE, perform the store
//! operation, shape the JSON response.

pub mod categories;
pub mod places;
pub mod reviews;

//! Route wiring.

pub mod health;

use axum::routing::get;
use axum::Router;

use crate::handlers::{categories, places, reviews};
use crate::relay;
use crate::state::AppState;

/// All resource routes plus the relay endpoint.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/places",
            get(places::list_places).post(places::create_place),
        )
        .route(
            "/places/{id}",
            get(places::get_place)
                .put(places::update_place)
                .delete(places::delete_place),
        )
        .route(
            "/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/categories/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route(
            "/reviews",
            get(reviews::list_reviews).post(reviews::create_review),
        )
        .route(
            "/reviews/{id}",
            get(reviews::get_review)
                .put(reviews::update_review)
                .delete(reviews::delete_review),
        )
        .route("/ws", get(relay::ws_handler))
}

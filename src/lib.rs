pub mod config;
pub mod models;
pub mod routes;
pub mod services;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use routes::{
    books::{get_books_by_genre, get_schedule_genre, submit_pickup_schedule, SharedService},
    health::health_check,
};

pub fn build_app(service: SharedService) -> Router {
    Router::new()
        .route("/status", get(health_check))
        .route(
            "/books/schedule",
            get(get_schedule_genre).post(submit_pickup_schedule),
        )
        .route("/books/:genre", get(get_books_by_genre))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

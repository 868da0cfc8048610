// src/routes.rs

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{config::AppState, handlers};

pub fn router(app_state: AppState) -> Router {
    let uploads = ServeDir::new(app_state.uploads.dir());
    let body_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/items", get(handlers::items::list_items))
        .route("/items/", get(handlers::items::list_items))
        .route(
            "/points",
            get(handlers::points::list_points).post(handlers::points::create_point),
        )
        .route(
            "/points/",
            get(handlers::points::list_points).post(handlers::points::create_point),
        )
        .route("/points/{id}", get(handlers::points::show_point))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

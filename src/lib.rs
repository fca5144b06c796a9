// src/lib.rs

use axum::{
    routing::{get, patch, post},
    Router,
};
use sqlx::{Pool, Postgres};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod config;
pub mod coverage;
pub mod db;
pub mod models;
pub mod routes;

use coverage::GapDetection;
use db::CoverKind;

#[derive(Clone)]
pub struct AppState {
    pub pool: Pool<Postgres>,
    pub gap_detection: GapDetection,
}

pub fn build_router(state: AppState) -> Router {
    // Very permissive CORS for local dev (tighten for prod)
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health
        .route("/health", get(routes::health::health))
        // absences
        .route(
            "/api/v1/absences",
            post(routes::absences::create_absence).get(routes::absences::list_absences),
        )
        .route(
            "/api/v1/absences/:id",
            get(routes::absences::get_absence)
                .patch(routes::absences::patch_absence)
                .delete(routes::absences::delete_absence),
        )
        // staff
        .route(
            "/api/v1/staff",
            post(routes::staff::create_staff).get(routes::staff::list_staff),
        )
        .route(
            "/api/v1/staff/:id",
            get(routes::staff::get_staff)
                .patch(routes::staff::patch_staff)
                .delete(routes::staff::delete_staff),
        )
        .route("/api/v1/staff/:id/absences", get(routes::absences::list_porter_absences))
        .route("/api/v1/staff/:id/shift-type", get(routes::staff::get_shift_type))
        // settings
        .route(
            "/api/v1/settings/shift-defaults",
            post(routes::settings::create_shift_default).get(routes::settings::list_shift_defaults),
        )
        .route(
            "/api/v1/settings/shift-defaults/:id",
            patch(routes::settings::patch_shift_default)
                .delete(routes::settings::delete_shift_default),
        )
        // area / service cover
        .nest("/api/v1/area-cover", routes::cover::router(CoverKind::Area))
        .nest("/api/v1/service-cover", routes::cover::router(CoverKind::Service))
        // ad-hoc analysis
        .route("/api/v1/coverage/analyze", post(routes::analyze::analyze))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

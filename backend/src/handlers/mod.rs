use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use diesel::prelude::*;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::state::AppState;
use crate::uploads::{MAX_IMAGES_PER_REQUEST, MAX_IMAGE_BYTES};

pub mod admin;
pub mod favorites;
pub mod properties;
pub mod users;

/// Welcome/health probe with a database round trip, mirroring the route
/// the frontend pings on startup.
async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get()?;
    let probe: i32 = diesel::select(diesel::dsl::sql::<diesel::sql_types::Integer>("1"))
        .get_result(&mut conn)
        .map_err(ApiError::from)?;
    Ok(Json(json!({
        "message": "Estate API running.",
        "dbConnection": if probe == 1 { "ok" } else { "unexpected" },
    })))
}

pub fn api_router(state: AppState) -> Router {
    // Multipart property forms carry up to 10 images of 5 MiB each.
    let body_limit = MAX_IMAGES_PER_REQUEST * MAX_IMAGE_BYTES + 1024 * 1024;

    Router::new()
        .route("/api", get(health))
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
        .route(
            "/api/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/api/users", get(users::list_users))
        .route(
            "/api/properties",
            get(properties::list_properties).post(properties::create_property),
        )
        .route("/api/properties/my-properties", get(properties::my_properties))
        .route(
            "/api/properties/:id",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route("/api/properties/:id/sell", post(properties::sell_property))
        .route(
            "/api/favorites",
            get(favorites::list_favorites).post(favorites::add_favorite),
        )
        .route("/api/favorites/:property_id", delete(favorites::remove_favorite))
        .route("/api/admin/stats", get(admin::dashboard_stats))
        .route("/api/admin/users/role", put(admin::manage_user_role))
        .route("/api/admin/logs", get(admin::property_logs))
        .nest_service("/uploads", ServeDir::new(&state.config.upload_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

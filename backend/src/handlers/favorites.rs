use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Favorite, Property};
use crate::policy::{self, Action, Actor};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub property_id: Uuid,
}

pub async fn list_favorites(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<Property>>, ApiError> {
    policy::enforce(Action::ListOwnFavorites, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;
    Ok(Json(Favorite::list_properties(&mut conn, actor.id)?))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(body): Json<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    policy::enforce(Action::AddFavorite, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;

    if Property::find_by_id(&mut conn, body.property_id)?.is_none() {
        return Err(ApiError::NotFound("Property not found.".to_string()));
    }
    if Favorite::exists(&mut conn, actor.id, body.property_id)? {
        return Err(ApiError::Conflict(
            "This property is already in your favorites.".to_string(),
        ));
    }

    let favorite = Favorite::add(&mut conn, actor.id, body.property_id)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Property added to favorites.", "favorite": favorite })),
    ))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(property_id): Path<Uuid>,
    actor: AuthUser,
) -> Result<Json<Value>, ApiError> {
    policy::enforce(Action::RemoveFavorite, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;

    let removed = Favorite::remove(&mut conn, actor.id, property_id)?;
    if removed == 0 {
        return Err(ApiError::NotFound("Favorite not found.".to_string()));
    }
    Ok(Json(json!({ "message": "Property removed from favorites." })))
}

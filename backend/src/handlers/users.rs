use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{self, AuthUser};
use crate::error::ApiError;
use crate::models::{NewUser, Role, User};
use crate::policy::{self, Action, Actor};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub phone: Option<String>,
}

/// The address form used for both the duplicate check and the stored row.
fn normalize_email(raw: &str) -> &str {
    raw.trim()
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let email = normalize_email(&body.email);
    if body.full_name.trim().is_empty() || email.is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "Full name, email and password are required.".to_string(),
        ));
    }

    let mut conn = state.pool.get()?;

    if User::find_by_email(&mut conn, email)?.is_some() {
        return Err(ApiError::Conflict("Email address already in use.".to_string()));
    }

    let password_hash = auth::hash_password(&body.password)?;
    let user = User::create(
        &mut conn,
        &NewUser {
            full_name: body.full_name.trim(),
            email,
            password_hash: &password_hash,
            role: Role::Customer,
            phone: body.phone.as_deref(),
        },
    )?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User registered successfully.", "user": user })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation("Email and password are required.".to_string()));
    }

    let mut conn = state.pool.get()?;
    let user = User::find_by_email(&mut conn, &body.email)?.ok_or(ApiError::InvalidCredentials)?;

    if !auth::verify_password(&body.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = auth::create_token(user.id, user.role, &user.email, &state.config.jwt_secret)?;

    Ok(Json(json!({
        "message": "Login successful.",
        "token": token,
        "user": {
            "id": user.id,
            "fullName": user.full_name,
            "email": user.email,
            "role": user.role,
        },
    })))
}

pub async fn get_profile(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<User>, ApiError> {
    let mut conn = state.pool.get()?;
    let user = User::find_by_id(&mut conn, actor.id)?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
    Ok(Json(user))
}

pub async fn update_profile(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    if body.full_name.is_none() && body.phone.is_none() {
        return Err(ApiError::Validation("No fields provided to update.".to_string()));
    }

    let mut conn = state.pool.get()?;
    let user = User::update_profile(
        &mut conn,
        actor.id,
        body.full_name.as_deref(),
        body.phone.as_deref(),
    )?
    .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(json!({ "message": "Profile updated successfully.", "user": user })))
}

pub async fn list_users(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    policy::enforce(Action::ListAllUsers, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;
    Ok(Json(User::list_all(&mut conn)?))
}

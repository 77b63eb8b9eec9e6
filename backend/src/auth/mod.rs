use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Role;
use crate::state::AppState;

/// Session tokens are short-lived; a login is good for one hour.
const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: Role,
    pub email: String,
    pub exp: usize,
}

pub fn create_token(
    user_id: Uuid,
    role: Role,
    email: &str,
    jwt_secret: &str,
) -> Result<String, ApiError> {
    let expiration = Utc::now() + Duration::hours(TOKEN_TTL_HOURS);
    let claims = Claims {
        sub: user_id,
        role,
        email: email.to_string(),
        exp: expiration.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|err| ApiError::Internal(format!("token creation failed: {}", err)))
}

/// Verifies a bearer token. Malformed, expired and forged tokens all come
/// back as the same `Authentication` error; the caller learns nothing
/// about which check failed.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Authentication)
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, bcrypt::BcryptError> {
    bcrypt::verify(password, password_hash)
}

/// The authenticated actor, extracted from the `Authorization: Bearer`
/// header. Handlers that take this parameter are token-gated; identity and
/// role always come from the verified claims, never from request bodies.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Authentication)?;
        let token = header.strip_prefix("Bearer ").ok_or(ApiError::Authentication)?;
        let claims = validate_token(token, &state.config.jwt_secret)?;
        Ok(AuthUser {
            id: claims.sub,
            role: claims.role,
            email: claims.email,
        })
    }
}

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{Property, PropertyLog, Role, User};
use crate::policy::{self, Action, Actor, Target};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: i64,
    pub total_properties: i64,
    pub total_sales: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageRoleRequest {
    pub user_id: Uuid,
    pub role: String,
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<DashboardStats>, ApiError> {
    policy::enforce(Action::ViewDashboardStats, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;

    let total_users = User::count(&mut conn)?;
    let total_properties = Property::count(&mut conn)?;
    let sold_prices = Property::sold_prices(&mut conn)?;

    Ok(Json(DashboardStats {
        total_users,
        total_properties,
        total_sales: sold_prices.len() as i64,
        total_revenue: sold_prices.iter().sum(),
    }))
}

pub async fn manage_user_role(
    State(state): State<AppState>,
    actor: AuthUser,
    Json(body): Json<ManageRoleRequest>,
) -> Result<Json<Value>, ApiError> {
    let role: Role = body.role.parse().map_err(|_| {
        ApiError::Validation("Invalid role. Must be: customer, agent or admin.".to_string())
    })?;
    policy::enforce(
        Action::ManageUserRole,
        &Actor::from(&actor),
        Some(&Target::User { id: body.user_id }),
    )?;

    let mut conn = state.pool.get()?;
    let user = User::update_role(&mut conn, body.user_id, role)?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;

    Ok(Json(json!({ "message": "User role updated successfully.", "user": user })))
}

pub async fn property_logs(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<PropertyLog>>, ApiError> {
    policy::enforce(Action::ViewAuditLog, &Actor::from(&actor), None)?;
    let mut conn = state.pool.get()?;
    Ok(Json(PropertyLog::list_all(&mut conn)?))
}

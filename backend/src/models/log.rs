use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::models::LogAction;
use crate::schema::property_logs;

/// One audit entry per property mutation. Append-only: the application
/// never updates or deletes rows here, and `property_id` is deliberately
/// not a foreign key so entries outlive the property they describe.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = property_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct PropertyLog {
    pub id: Uuid,
    pub property_id: Uuid,
    pub property_title: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub action_type: LogAction,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = property_logs)]
pub struct NewPropertyLog {
    pub property_id: Uuid,
    pub property_title: String,
    pub user_id: Uuid,
    pub user_email: String,
    pub action_type: LogAction,
    pub details: Option<String>,
}

impl PropertyLog {
    pub fn create(conn: &mut PgConnection, entry: &NewPropertyLog) -> QueryResult<usize> {
        diesel::insert_into(property_logs::table)
            .values(entry)
            .execute(conn)
    }

    /// Full audit history, newest first, for the admin log screen.
    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<PropertyLog>> {
        property_logs::table
            .order(property_logs::created_at.desc())
            .select(PropertyLog::as_select())
            .load(conn)
    }
}

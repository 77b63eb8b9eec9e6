use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Property;
use crate::schema::{favorites, properties};

#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = favorites)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: Uuid,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Favorite {
    /// Inserts the (user, property) pair. The unique constraint on the pair
    /// makes a duplicate insert fail with a unique violation, which the
    /// error layer reports as a conflict rather than storing a second row.
    pub fn add(conn: &mut PgConnection, user_id: Uuid, property_id: Uuid) -> QueryResult<Favorite> {
        diesel::insert_into(favorites::table)
            .values((
                favorites::user_id.eq(user_id),
                favorites::property_id.eq(property_id),
            ))
            .returning(Favorite::as_returning())
            .get_result(conn)
    }

    pub fn remove(conn: &mut PgConnection, user_id: Uuid, property_id: Uuid) -> QueryResult<usize> {
        diesel::delete(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::property_id.eq(property_id)),
        )
        .execute(conn)
    }

    pub fn exists(conn: &mut PgConnection, user_id: Uuid, property_id: Uuid) -> QueryResult<bool> {
        use diesel::dsl::{exists, select};
        select(exists(
            favorites::table
                .filter(favorites::user_id.eq(user_id))
                .filter(favorites::property_id.eq(property_id)),
        ))
        .get_result(conn)
    }

    /// The actor's favorited properties, full property rows.
    pub fn list_properties(conn: &mut PgConnection, user_id: Uuid) -> QueryResult<Vec<Property>> {
        favorites::table
            .inner_join(properties::table)
            .filter(favorites::user_id.eq(user_id))
            .order(favorites::created_at.desc())
            .select(Property::as_select())
            .load(conn)
    }
}

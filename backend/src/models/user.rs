use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Role;
use crate::schema::users;

/// Hash-free projection of a user row. This is the only shape that ever
/// reaches a response body.
#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Full row including the password hash. Loaded only for login and for
/// the re-authentication step of marking a property sold.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserWithSecret {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: Role,
    pub phone: Option<&'a str>,
}

#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = users)]
struct ProfileChanges<'a> {
    full_name: Option<&'a str>,
    phone: Option<&'a str>,
    updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn create(conn: &mut PgConnection, new_user: &NewUser<'_>) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(new_user)
            .returning(User::as_returning())
            .get_result(conn)
    }

    pub fn find_by_email(
        conn: &mut PgConnection,
        email: &str,
    ) -> QueryResult<Option<UserWithSecret>> {
        users::table
            .filter(users::email.eq(email))
            .select(UserWithSecret::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<User>> {
        users::table
            .find(id)
            .select(User::as_select())
            .first(conn)
            .optional()
    }

    pub fn find_with_secret_by_id(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> QueryResult<Option<UserWithSecret>> {
        users::table
            .find(id)
            .select(UserWithSecret::as_select())
            .first(conn)
            .optional()
    }

    pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
        users::table.count().get_result(conn)
    }

    pub fn list_all(conn: &mut PgConnection) -> QueryResult<Vec<User>> {
        users::table
            .order(users::created_at.desc())
            .select(User::as_select())
            .load(conn)
    }

    pub fn update_role(
        conn: &mut PgConnection,
        user_id: Uuid,
        role: Role,
    ) -> QueryResult<Option<User>> {
        diesel::update(users::table.find(user_id))
            .set((users::role.eq(role), users::updated_at.eq(Utc::now())))
            .returning(User::as_returning())
            .get_result(conn)
            .optional()
    }

    /// Display name and phone are the only fields mutable through the
    /// profile path. Email, role and the password hash have their own
    /// dedicated flows.
    pub fn update_profile(
        conn: &mut PgConnection,
        user_id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
    ) -> QueryResult<Option<User>> {
        diesel::update(users::table.find(user_id))
            .set(ProfileChanges {
                full_name,
                phone,
                updated_at: Some(Utc::now()),
            })
            .returning(User::as_returning())
            .get_result(conn)
            .optional()
    }
}

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PropertyStatus, PropertyType};
use crate::schema::{properties, users};

#[derive(Debug, Clone, Serialize, Queryable, Selectable)]
#[diesel(table_name = properties)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub agent_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub price: i64,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area: Option<i64>,
    #[serde(rename = "type")]
    pub kind: PropertyType,
    pub image_urls: Vec<String>,
    pub status: PropertyStatus,
    pub buyer_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Detail view: the property plus the owning agent's contact data,
/// denormalized for the public detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyWithAgent {
    #[serde(flatten)]
    pub property: Property,
    pub agent_name: String,
    pub agent_phone: Option<String>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = properties)]
pub struct NewProperty<'a> {
    pub agent_id: Uuid,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub address: &'a str,
    pub city: &'a str,
    pub country: &'a str,
    pub price: i64,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area: Option<i64>,
    pub kind: PropertyType,
    pub image_urls: &'a [String],
    pub status: PropertyStatus,
}

/// Partial update: `None` fields are left untouched. Status and buyer name
/// are deliberately absent, they only move through the sale transition.
#[derive(Debug, Default, AsChangeset)]
#[diesel(table_name = properties)]
pub struct PropertyChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub price: Option<i64>,
    pub bedrooms: Option<i16>,
    pub bathrooms: Option<i16>,
    pub area: Option<i64>,
    pub kind: Option<PropertyType>,
    pub image_urls: Option<Vec<String>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Query-string filters for the public listing, e.g.
/// `?city=lima&minPrice=50000&limit=3`.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyFilters {
    #[serde(rename = "type")]
    pub kind: Option<PropertyType>,
    pub city: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<i64>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i64>,
    pub bedrooms: Option<i16>,
    pub limit: Option<i64>,
}

impl Property {
    pub fn create(conn: &mut PgConnection, new_property: &NewProperty<'_>) -> QueryResult<Property> {
        diesel::insert_into(properties::table)
            .values(new_property)
            .returning(Property::as_returning())
            .get_result(conn)
    }

    /// Public browse query: only for-sale/for-rent listings, newest first.
    pub fn list_public(
        conn: &mut PgConnection,
        filters: &PropertyFilters,
    ) -> QueryResult<Vec<Property>> {
        let mut query = properties::table
            .filter(properties::status.eq_any(PropertyStatus::PUBLIC))
            .select(Property::as_select())
            .order(properties::created_at.desc())
            .into_boxed();

        if let Some(kind) = filters.kind {
            query = query.filter(properties::kind.eq(kind));
        }
        if let Some(city) = &filters.city {
            query = query.filter(properties::city.ilike(format!("%{}%", city)));
        }
        if let Some(min_price) = filters.min_price {
            query = query.filter(properties::price.ge(min_price));
        }
        if let Some(max_price) = filters.max_price {
            query = query.filter(properties::price.le(max_price));
        }
        if let Some(bedrooms) = filters.bedrooms {
            query = query.filter(properties::bedrooms.ge(bedrooms));
        }
        if let Some(limit) = filters.limit {
            query = query.limit(limit);
        }

        query.load(conn)
    }

    pub fn find_by_id(conn: &mut PgConnection, id: Uuid) -> QueryResult<Option<Property>> {
        properties::table
            .find(id)
            .select(Property::as_select())
            .first(conn)
            .optional()
    }

    /// Detail fetch with the owning agent's name and phone joined in.
    /// Returns sold/rented properties too.
    pub fn find_with_agent(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> QueryResult<Option<PropertyWithAgent>> {
        let row: Option<(Property, String, Option<String>)> = properties::table
            .inner_join(users::table)
            .filter(properties::id.eq(id))
            .select((Property::as_select(), users::full_name, users::phone))
            .first(conn)
            .optional()?;

        Ok(row.map(|(property, agent_name, agent_phone)| PropertyWithAgent {
            property,
            agent_name,
            agent_phone,
        }))
    }

    pub fn list_by_agent(conn: &mut PgConnection, agent_id: Uuid) -> QueryResult<Vec<Property>> {
        properties::table
            .filter(properties::agent_id.eq(agent_id))
            .order(properties::created_at.desc())
            .select(Property::as_select())
            .load(conn)
    }

    pub fn update(
        conn: &mut PgConnection,
        id: Uuid,
        changes: &PropertyChanges,
    ) -> QueryResult<Option<Property>> {
        diesel::update(properties::table.find(id))
            .set(changes)
            .returning(Property::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn mark_sold(
        conn: &mut PgConnection,
        id: Uuid,
        buyer_name: &str,
    ) -> QueryResult<Option<Property>> {
        diesel::update(properties::table.find(id))
            .set((
                properties::status.eq(PropertyStatus::Sold),
                properties::buyer_name.eq(buyer_name),
                properties::updated_at.eq(Utc::now()),
            ))
            .returning(Property::as_returning())
            .get_result(conn)
            .optional()
    }

    pub fn delete(conn: &mut PgConnection, id: Uuid) -> QueryResult<usize> {
        diesel::delete(properties::table.find(id)).execute(conn)
    }

    pub fn count(conn: &mut PgConnection) -> QueryResult<i64> {
        properties::table.count().get_result(conn)
    }

    /// Prices of every sold property, for the dashboard's sales totals.
    pub fn sold_prices(conn: &mut PgConnection) -> QueryResult<Vec<i64>> {
        properties::table
            .filter(properties::status.eq(PropertyStatus::Sold))
            .select(properties::price)
            .load(conn)
    }
}

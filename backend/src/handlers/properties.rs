use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::lifecycle::{self, ListingPatch, NewListing};
use crate::models::{Property, PropertyFilters, PropertyStatus, PropertyType, PropertyWithAgent};
use crate::uploads::{self, ImageStore, MAX_IMAGES_PER_REQUEST, MAX_IMAGE_BYTES};
use crate::state::AppState;

/// Fields collected from a multipart property form. Image payloads are
/// held in memory until the request is known to be otherwise valid, so a
/// rejected request writes nothing to disk.
#[derive(Default)]
struct PropertyForm {
    title: Option<String>,
    description: Option<String>,
    address: Option<String>,
    city: Option<String>,
    country: Option<String>,
    price: Option<i64>,
    bedrooms: Option<i16>,
    bathrooms: Option<i16>,
    area: Option<i64>,
    kind: Option<PropertyType>,
    status: Option<PropertyStatus>,
    images_to_delete: Vec<String>,
    new_images: Vec<(String, Bytes)>,
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, ApiError> {
    value
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation(format!("Field '{}' must be a number.", field)))
}

async fn read_property_form(mut multipart: Multipart) -> Result<PropertyForm, ApiError> {
    let mut form = PropertyForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        if name == "images" {
            if form.new_images.len() >= MAX_IMAGES_PER_REQUEST {
                return Err(ApiError::Validation(format!(
                    "At most {} images per request.",
                    MAX_IMAGES_PER_REQUEST
                )));
            }
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await?;
            if data.len() > MAX_IMAGE_BYTES {
                return Err(ApiError::Validation(
                    "Images are limited to 5 MiB each.".to_string(),
                ));
            }
            let filename = uploads::generate_filename(&original_name, content_type.as_deref())?;
            form.new_images.push((filename, data));
            continue;
        }

        let value = field.text().await?;
        match name.as_str() {
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "address" => form.address = Some(value),
            "city" => form.city = Some(value),
            "country" => form.country = Some(value),
            "price" => form.price = Some(parse_number("price", &value)?),
            "bedrooms" => form.bedrooms = Some(parse_number("bedrooms", &value)?),
            "bathrooms" => form.bathrooms = Some(parse_number("bathrooms", &value)?),
            "area" => form.area = Some(parse_number("area", &value)?),
            "type" => {
                form.kind = Some(value.parse().map_err(|_| {
                    ApiError::Validation(
                        "Field 'type' must be one of: house, apartment, land, commercial."
                            .to_string(),
                    )
                })?)
            }
            "status" => {
                form.status = Some(value.parse().map_err(|_| {
                    ApiError::Validation(
                        "Field 'status' must be one of: for_sale, for_rent.".to_string(),
                    )
                })?)
            }
            // JSON-encoded list of existing filenames to drop, as the edit
            // form submits it alongside the replacement uploads.
            "imagesToDelete" => {
                form.images_to_delete = serde_json::from_str(&value).map_err(|_| {
                    ApiError::Validation(
                        "Field 'imagesToDelete' must be a JSON array of filenames.".to_string(),
                    )
                })?
            }
            _ => {}
        }
    }

    Ok(form)
}

fn save_images(store: &dyn ImageStore, images: &[(String, Bytes)]) -> Result<Vec<String>, ApiError> {
    let mut saved = Vec::with_capacity(images.len());
    for (filename, data) in images {
        store.save(filename, data)?;
        saved.push(filename.clone());
    }
    Ok(saved)
}

fn discard_images(store: &dyn ImageStore, filenames: &[String]) {
    for filename in filenames {
        if let Err(err) = store.remove(filename) {
            log::warn!("failed to discard image {}: {}", filename, err);
        }
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ApiError> {
    value.ok_or_else(|| ApiError::Validation(format!("Field '{}' is required.", field)))
}

pub async fn list_properties(
    State(state): State<AppState>,
    Query(filters): Query<PropertyFilters>,
) -> Result<Json<Vec<Property>>, ApiError> {
    if let Some(limit) = filters.limit {
        if limit < 0 {
            return Err(ApiError::Validation(
                "Field 'limit' must not be negative.".to_string(),
            ));
        }
    }
    let mut conn = state.pool.get()?;
    Ok(Json(Property::list_public(&mut conn, &filters)?))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PropertyWithAgent>, ApiError> {
    let mut conn = state.pool.get()?;
    let property = Property::find_with_agent(&mut conn, id)?
        .ok_or_else(|| ApiError::NotFound("Property not found.".to_string()))?;
    Ok(Json(property))
}

pub async fn my_properties(
    State(state): State<AppState>,
    actor: AuthUser,
) -> Result<Json<Vec<Property>>, ApiError> {
    let mut conn = state.pool.get()?;
    Ok(Json(Property::list_by_agent(&mut conn, actor.id)?))
}

pub async fn create_property(
    State(state): State<AppState>,
    actor: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let form = read_property_form(multipart).await?;

    // Required fields are checked before anything touches disk.
    let price = required(form.price, "price")?;
    let bedrooms = required(form.bedrooms, "bedrooms")?;
    let bathrooms = required(form.bathrooms, "bathrooms")?;
    let kind = required(form.kind, "type")?;

    let saved = save_images(&*state.images, &form.new_images)?;
    let listing = NewListing {
        title: form.title.unwrap_or_default(),
        description: form.description,
        address: form.address.unwrap_or_default(),
        city: form.city.unwrap_or_default(),
        country: form.country.unwrap_or_default(),
        price,
        bedrooms,
        bathrooms,
        area: form.area,
        kind,
        status: form.status.unwrap_or(PropertyStatus::ForSale),
        image_urls: saved.clone(),
    };

    let mut conn = state.pool.get()?;
    match lifecycle::create_listing(&mut *conn, &*state.audit, &actor, &listing) {
        Ok(property) => Ok((
            StatusCode::CREATED,
            Json(json!({ "message": "Property created successfully.", "property": property })),
        )),
        Err(err) => {
            discard_images(&*state.images, &saved);
            Err(err)
        }
    }
}

pub async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: AuthUser,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_property_form(multipart).await?;

    let saved = save_images(&*state.images, &form.new_images)?;
    let patch = ListingPatch {
        title: form.title,
        description: form.description,
        address: form.address,
        city: form.city,
        country: form.country,
        price: form.price,
        bedrooms: form.bedrooms,
        bathrooms: form.bathrooms,
        area: form.area,
        kind: form.kind,
        add_images: saved.clone(),
        remove_images: form.images_to_delete,
    };

    let mut conn = state.pool.get()?;
    match lifecycle::update_listing(&mut *conn, &*state.images, &*state.audit, &actor, id, patch) {
        Ok(property) => Ok(Json(
            json!({ "message": "Property updated successfully.", "property": property }),
        )),
        Err(err) => {
            discard_images(&*state.images, &saved);
            Err(err)
        }
    }
}

pub async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get()?;
    lifecycle::delete_listing(&mut *conn, &*state.images, &*state.audit, &actor, id)?;
    Ok(Json(json!({ "message": "Property deleted successfully." })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellRequest {
    pub buyer_name: String,
    pub password: String,
}

pub async fn sell_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    actor: AuthUser,
    Json(body): Json<SellRequest>,
) -> Result<Json<Value>, ApiError> {
    let mut conn = state.pool.get()?;
    let property = lifecycle::sell_listing(
        &mut *conn,
        &*state.audit,
        &actor,
        id,
        &body.buyer_name,
        &body.password,
    )?;
    Ok(Json(
        json!({ "message": "Property marked as sold.", "property": property }),
    ))
}

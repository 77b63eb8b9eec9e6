//! Property lifecycle: every mutation of a listing goes through here.
//! Each operation checks policy first, then performs the transition, then
//! hands exactly one entry to the audit sink. Sell and delete wrap their
//! read/write sequences in an explicit transaction so a failed check never
//! leaves a partial write behind.

use diesel::prelude::*;
use uuid::Uuid;

use crate::audit::{record_best_effort, AuditSink};
use crate::auth::{verify_password, AuthUser};
use crate::error::ApiError;
use crate::models::{
    LogAction, NewProperty, NewPropertyLog, Property, PropertyChanges, PropertyStatus,
    PropertyType, User, UserWithSecret,
};
use crate::policy::{self, Action, Actor, Target};
use crate::uploads::ImageStore;

/// Data access needed by the lifecycle operations. `PgConnection` is the
/// production implementation; the seam lets the orchestration run against
/// an in-memory store under test.
pub trait ListingStore {
    fn insert_property(&mut self, new: &NewProperty<'_>) -> Result<Property, ApiError>;
    fn property(&mut self, id: Uuid) -> Result<Option<Property>, ApiError>;
    fn apply_changes(
        &mut self,
        id: Uuid,
        changes: &PropertyChanges,
    ) -> Result<Option<Property>, ApiError>;
    fn record_sale(&mut self, id: Uuid, buyer_name: &str) -> Result<Option<Property>, ApiError>;
    fn remove_property(&mut self, id: Uuid) -> Result<(), ApiError>;
    fn seller_credentials(&mut self, id: Uuid) -> Result<Option<UserWithSecret>, ApiError>;
    fn transaction<T, F>(&mut self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Self) -> Result<T, ApiError>;
}

impl ListingStore for PgConnection {
    fn insert_property(&mut self, new: &NewProperty<'_>) -> Result<Property, ApiError> {
        Ok(Property::create(self, new)?)
    }

    fn property(&mut self, id: Uuid) -> Result<Option<Property>, ApiError> {
        Ok(Property::find_by_id(self, id)?)
    }

    fn apply_changes(
        &mut self,
        id: Uuid,
        changes: &PropertyChanges,
    ) -> Result<Option<Property>, ApiError> {
        Ok(Property::update(self, id, changes)?)
    }

    fn record_sale(&mut self, id: Uuid, buyer_name: &str) -> Result<Option<Property>, ApiError> {
        Ok(Property::mark_sold(self, id, buyer_name)?)
    }

    fn remove_property(&mut self, id: Uuid) -> Result<(), ApiError> {
        Property::delete(self, id)?;
        Ok(())
    }

    fn seller_credentials(&mut self, id: Uuid) -> Result<Option<UserWithSecret>, ApiError> {
        Ok(User::find_with_secret_by_id(self, id)?)
    }

    fn transaction<T, F>(&mut self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Self) -> Result<T, ApiError>,
    {
        Connection::transaction(self, f)
    }
}

/// Input for creating a listing, already parsed out of the multipart form.
#[derive(Debug)]
pub struct NewListing {
    pub title: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub country: String,
    pub price: i64,
    pub bedrooms: i16,
    pub bathrooms: i16,
    pub area: Option<i64>,
    pub kind: PropertyType,
    pub status: PropertyStatus,
    pub image_urls: Vec<String>,
}

impl NewListing {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.title.trim().is_empty()
            || self.address.trim().is_empty()
            || self.city.trim().is_empty()
            || self.country.trim().is_empty()
        {
            return Err(ApiError::Validation(
                "Title, address, city and country are required.".to_string(),
            ));
        }
        if self.price < 0 {
            return Err(ApiError::Validation("Price must not be negative.".to_string()));
        }
        if self.image_urls.is_empty() {
            return Err(ApiError::Validation("At least one image is required.".to_string()));
        }
        match self.status {
            PropertyStatus::ForSale | PropertyStatus::ForRent => Ok(()),
            PropertyStatus::Sold | PropertyStatus::Rented => Err(ApiError::Validation(
                "A new listing must start as for_sale or for_rent.".to_string(),
            )),
        }
    }
}

/// Partial edit of the descriptive fields plus image list changes. Only
/// supplied fields are touched; status and buyer name never move here.
#[derive(Debug, Default)]
pub struct ListingPatch {
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
    pub add_images: Vec<String>,
    pub remove_images: Vec<String>,
}

fn property_not_found() -> ApiError {
    ApiError::NotFound("Property not found.".to_string())
}

fn audit_entry(
    property_id: Uuid,
    property_title: &str,
    actor: &AuthUser,
    action: LogAction,
    details: String,
) -> NewPropertyLog {
    NewPropertyLog {
        property_id,
        property_title: property_title.to_string(),
        user_id: actor.id,
        user_email: actor.email.clone(),
        action_type: action,
        details: Some(details),
    }
}

/// No prior state -> `for_sale` (or a caller-chosen initial listing state).
pub fn create_listing<S: ListingStore>(
    store: &mut S,
    audit: &dyn AuditSink,
    actor: &AuthUser,
    listing: &NewListing,
) -> Result<Property, ApiError> {
    policy::enforce(Action::CreateProperty, &Actor::from(actor), None)?;
    listing.validate()?;

    let property = store.insert_property(&NewProperty {
        agent_id: actor.id,
        title: &listing.title,
        description: listing.description.as_deref(),
        address: &listing.address,
        city: &listing.city,
        country: &listing.country,
        price: listing.price,
        bedrooms: listing.bedrooms,
        bathrooms: listing.bathrooms,
        area: listing.area,
        kind: listing.kind,
        image_urls: &listing.image_urls,
        status: listing.status,
    })?;

    record_best_effort(
        audit,
        audit_entry(
            property.id,
            &property.title,
            actor,
            LogAction::Create,
            "Property created.".to_string(),
        ),
    );
    Ok(property)
}

/// Combines the current image list with additions and removals from one
/// edit call. Returns the merged list and the filenames whose underlying
/// resources must be released. Duplicates never enter the list.
pub fn merge_images(
    current: &[String],
    add: &[String],
    remove: &[String],
) -> (Vec<String>, Vec<String>) {
    let released: Vec<String> = current
        .iter()
        .filter(|name| remove.contains(name))
        .cloned()
        .collect();

    let mut merged: Vec<String> = current
        .iter()
        .filter(|name| !remove.contains(name))
        .cloned()
        .collect();
    for name in add {
        if !merged.contains(name) {
            merged.push(name.clone());
        }
    }
    (merged, released)
}

/// Descriptive-field mutation; the status never changes here. Removed
/// images are released only after the row update succeeds.
pub fn update_listing<S: ListingStore>(
    store: &mut S,
    images: &dyn ImageStore,
    audit: &dyn AuditSink,
    actor: &AuthUser,
    property_id: Uuid,
    patch: ListingPatch,
) -> Result<Property, ApiError> {
    let property = store.property(property_id)?.ok_or_else(property_not_found)?;
    policy::enforce(
        Action::UpdateProperty,
        &Actor::from(actor),
        Some(&Target::Property {
            agent_id: property.agent_id,
        }),
    )?;

    let (merged, released) = merge_images(
        &property.image_urls,
        &patch.add_images,
        &patch.remove_images,
    );

    let changes = PropertyChanges {
        title: patch.title,
        description: patch.description,
        address: patch.address,
        city: patch.city,
        country: patch.country,
        price: patch.price,
        bedrooms: patch.bedrooms,
        bathrooms: patch.bathrooms,
        area: patch.area,
        kind: patch.kind,
        image_urls: Some(merged),
        updated_at: Some(chrono::Utc::now()),
    };

    let updated = store
        .apply_changes(property_id, &changes)?
        .ok_or_else(property_not_found)?;

    for filename in &released {
        if let Err(err) = images.remove(filename) {
            log::warn!("failed to release image {}: {}", filename, err);
        }
    }

    record_best_effort(
        audit,
        audit_entry(
            updated.id,
            &updated.title,
            actor,
            LogAction::Edit,
            format!("Property updated by {} ({}).", actor.email, actor.role),
        ),
    );
    Ok(updated)
}

/// Checks that a sale is legal from the current status. Sold and rented
/// are terminal with respect to the sale action.
pub fn sale_transition(status: PropertyStatus) -> Result<PropertyStatus, ApiError> {
    match status {
        PropertyStatus::ForSale | PropertyStatus::ForRent => Ok(PropertyStatus::Sold),
        PropertyStatus::Sold | PropertyStatus::Rented => Err(ApiError::Conflict(
            "Property has already been sold or rented.".to_string(),
        )),
    }
}

/// `for_sale`/`for_rent` -> `sold`. Ownership is mandatory (no admin
/// override) and the owner re-proves their password against the stored
/// hash before anything moves. Runs as one transaction.
pub fn sell_listing<S: ListingStore>(
    store: &mut S,
    audit: &dyn AuditSink,
    actor: &AuthUser,
    property_id: Uuid,
    buyer_name: &str,
    password: &str,
) -> Result<Property, ApiError> {
    let buyer_name = buyer_name.trim();
    if buyer_name.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Buyer name and your password are required.".to_string(),
        ));
    }

    let sold = store.transaction(|store| {
        let agent = store
            .seller_credentials(actor.id)?
            .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
        if !verify_password(password, &agent.password_hash)? {
            return Err(ApiError::IncorrectPassword);
        }

        let property = store.property(property_id)?.ok_or_else(property_not_found)?;
        policy::enforce(
            Action::MarkSold,
            &Actor::from(actor),
            Some(&Target::Property {
                agent_id: property.agent_id,
            }),
        )?;
        sale_transition(property.status)?;

        store
            .record_sale(property_id, buyer_name)?
            .ok_or_else(property_not_found)
    })?;

    record_best_effort(
        audit,
        audit_entry(
            sold.id,
            &sold.title,
            actor,
            LogAction::Sold,
            format!("Sold to {}.", buyer_name),
        ),
    );
    Ok(sold)
}

/// Any state -> removed. The row goes away inside a transaction; image
/// files are released after commit, so a crash in between can orphan a
/// file but never a dangling row.
pub fn delete_listing<S: ListingStore>(
    store: &mut S,
    images: &dyn ImageStore,
    audit: &dyn AuditSink,
    actor: &AuthUser,
    property_id: Uuid,
) -> Result<(), ApiError> {
    let property = store.transaction(|store| {
        let property = store.property(property_id)?.ok_or_else(property_not_found)?;
        policy::enforce(
            Action::DeleteProperty,
            &Actor::from(actor),
            Some(&Target::Property {
                agent_id: property.agent_id,
            }),
        )?;
        store.remove_property(property_id)?;
        Ok(property)
    })?;

    for filename in &property.image_urls {
        if let Err(err) = images.remove(filename) {
            log::warn!("failed to release image {}: {}", filename, err);
        }
    }

    // Title captured before deletion; the log entry outlives the property.
    record_best_effort(
        audit,
        audit_entry(
            property.id,
            &property.title,
            actor,
            LogAction::Delete,
            format!("Property deleted by {} ({}).", actor.email, actor.role),
        ),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;

    use chrono::Utc;

    use super::*;
    use crate::audit::test_support::{FailingSink, RecordingSink};
    use crate::models::Role;

    /// HashMap-backed store. `transaction` just runs the closure; these
    /// tests only drive committed paths.
    #[derive(Default)]
    struct MemoryStore {
        properties: HashMap<Uuid, Property>,
        sellers: HashMap<Uuid, UserWithSecret>,
    }

    impl ListingStore for MemoryStore {
        fn insert_property(&mut self, new: &NewProperty<'_>) -> Result<Property, ApiError> {
            let now = Utc::now();
            let property = Property {
                id: Uuid::new_v4(),
                agent_id: new.agent_id,
                title: new.title.to_string(),
                description: new.description.map(str::to_string),
                address: new.address.to_string(),
                city: new.city.to_string(),
                country: new.country.to_string(),
                price: new.price,
                bedrooms: new.bedrooms,
                bathrooms: new.bathrooms,
                area: new.area,
                kind: new.kind,
                image_urls: new.image_urls.to_vec(),
                status: new.status,
                buyer_name: None,
                created_at: now,
                updated_at: now,
            };
            self.properties.insert(property.id, property.clone());
            Ok(property)
        }

        fn property(&mut self, id: Uuid) -> Result<Option<Property>, ApiError> {
            Ok(self.properties.get(&id).cloned())
        }

        fn apply_changes(
            &mut self,
            id: Uuid,
            changes: &PropertyChanges,
        ) -> Result<Option<Property>, ApiError> {
            let property = match self.properties.get_mut(&id) {
                Some(property) => property,
                None => return Ok(None),
            };
            if let Some(title) = &changes.title {
                property.title = title.clone();
            }
            if let Some(description) = &changes.description {
                property.description = Some(description.clone());
            }
            if let Some(address) = &changes.address {
                property.address = address.clone();
            }
            if let Some(city) = &changes.city {
                property.city = city.clone();
            }
            if let Some(country) = &changes.country {
                property.country = country.clone();
            }
            if let Some(price) = changes.price {
                property.price = price;
            }
            if let Some(bedrooms) = changes.bedrooms {
                property.bedrooms = bedrooms;
            }
            if let Some(bathrooms) = changes.bathrooms {
                property.bathrooms = bathrooms;
            }
            if let Some(area) = changes.area {
                property.area = Some(area);
            }
            if let Some(kind) = changes.kind {
                property.kind = kind;
            }
            if let Some(image_urls) = &changes.image_urls {
                property.image_urls = image_urls.clone();
            }
            if let Some(updated_at) = changes.updated_at {
                property.updated_at = updated_at;
            }
            Ok(Some(property.clone()))
        }

        fn record_sale(
            &mut self,
            id: Uuid,
            buyer_name: &str,
        ) -> Result<Option<Property>, ApiError> {
            let property = match self.properties.get_mut(&id) {
                Some(property) => property,
                None => return Ok(None),
            };
            property.status = PropertyStatus::Sold;
            property.buyer_name = Some(buyer_name.to_string());
            property.updated_at = Utc::now();
            Ok(Some(property.clone()))
        }

        fn remove_property(&mut self, id: Uuid) -> Result<(), ApiError> {
            self.properties.remove(&id);
            Ok(())
        }

        fn seller_credentials(&mut self, id: Uuid) -> Result<Option<UserWithSecret>, ApiError> {
            Ok(self.sellers.get(&id).cloned())
        }

        fn transaction<T, F>(&mut self, f: F) -> Result<T, ApiError>
        where
            F: FnOnce(&mut Self) -> Result<T, ApiError>,
        {
            f(self)
        }
    }

    struct NullImages;

    impl ImageStore for NullImages {
        fn save(&self, _filename: &str, _bytes: &[u8]) -> io::Result<()> {
            Ok(())
        }

        fn remove(&self, _filename: &str) -> io::Result<()> {
            Ok(())
        }
    }

    fn agent() -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            role: Role::Agent,
            email: "ana@example.com".to_string(),
        }
    }

    fn listing(images: Vec<String>, status: PropertyStatus) -> NewListing {
        NewListing {
            title: "Sunny flat".to_string(),
            description: None,
            address: "12 Main St".to_string(),
            city: "Lima".to_string(),
            country: "Peru".to_string(),
            price: 120_000,
            bedrooms: 2,
            bathrooms: 1,
            area: Some(80),
            kind: PropertyType::Apartment,
            status,
            image_urls: images,
        }
    }

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn stored(store: &mut MemoryStore, agent_id: Uuid, status: PropertyStatus) -> Uuid {
        let now = Utc::now();
        let property = Property {
            id: Uuid::new_v4(),
            agent_id,
            title: "Sunny flat".to_string(),
            description: None,
            address: "12 Main St".to_string(),
            city: "Lima".to_string(),
            country: "Peru".to_string(),
            price: 120_000,
            bedrooms: 2,
            bathrooms: 1,
            area: Some(80),
            kind: PropertyType::Apartment,
            image_urls: names(&["a.jpg"]),
            status,
            buyer_name: None,
            created_at: now,
            updated_at: now,
        };
        let id = property.id;
        store.properties.insert(id, property);
        id
    }

    fn seed_seller(store: &mut MemoryStore, actor: &AuthUser, password: &str) {
        let now = Utc::now();
        store.sellers.insert(
            actor.id,
            UserWithSecret {
                id: actor.id,
                full_name: "Ana Agent".to_string(),
                email: actor.email.clone(),
                password_hash: bcrypt::hash(password, 4).unwrap(),
                role: actor.role,
                phone: None,
                created_at: now,
                updated_at: now,
            },
        );
    }

    #[test]
    fn creation_without_images_is_rejected() {
        let err = listing(vec![], PropertyStatus::ForSale).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn creation_with_an_image_passes_validation() {
        assert!(listing(names(&["a.jpg"]), PropertyStatus::ForSale)
            .validate()
            .is_ok());
        assert!(listing(names(&["a.jpg"]), PropertyStatus::ForRent)
            .validate()
            .is_ok());
    }

    #[test]
    fn creation_cannot_start_in_a_terminal_state() {
        for status in [PropertyStatus::Sold, PropertyStatus::Rented] {
            assert!(listing(names(&["a.jpg"]), status).validate().is_err());
        }
    }

    #[test]
    fn blank_required_fields_fail_validation() {
        let mut bad = listing(names(&["a.jpg"]), PropertyStatus::ForSale);
        bad.title = "   ".to_string();
        assert!(bad.validate().is_err());
    }

    #[test]
    fn negative_price_fails_validation() {
        let mut bad = listing(names(&["a.jpg"]), PropertyStatus::ForSale);
        bad.price = -1;
        assert!(bad.validate().is_err());
    }

    #[test]
    fn merge_removes_and_appends_in_one_call() {
        let current = names(&["a.jpg", "b.jpg", "c.jpg"]);
        let (merged, released) = merge_images(&current, &names(&["d.jpg"]), &names(&["b.jpg"]));
        assert_eq!(merged, names(&["a.jpg", "c.jpg", "d.jpg"]));
        assert_eq!(released, names(&["b.jpg"]));
    }

    #[test]
    fn merge_only_releases_images_actually_present() {
        let current = names(&["a.jpg"]);
        let (merged, released) = merge_images(&current, &[], &names(&["ghost.jpg"]));
        assert_eq!(merged, names(&["a.jpg"]));
        assert!(released.is_empty());
    }

    #[test]
    fn merge_never_duplicates_a_filename() {
        let current = names(&["a.jpg"]);
        let (merged, _) = merge_images(&current, &names(&["a.jpg", "b.jpg"]), &[]);
        assert_eq!(merged, names(&["a.jpg", "b.jpg"]));
    }

    #[test]
    fn sale_is_legal_from_listing_states_only() {
        assert_eq!(
            sale_transition(PropertyStatus::ForSale).unwrap(),
            PropertyStatus::Sold
        );
        assert_eq!(
            sale_transition(PropertyStatus::ForRent).unwrap(),
            PropertyStatus::Sold
        );
        assert!(matches!(
            sale_transition(PropertyStatus::Sold),
            Err(ApiError::Conflict(_))
        ));
        assert!(matches!(
            sale_transition(PropertyStatus::Rented),
            Err(ApiError::Conflict(_))
        ));
    }

    #[test]
    fn creation_writes_exactly_one_audit_entry() {
        let mut store = MemoryStore::default();
        let sink = RecordingSink::default();
        let actor = agent();

        let created = create_listing(
            &mut store,
            &sink,
            &actor,
            &listing(names(&["a.jpg"]), PropertyStatus::ForSale),
        )
        .unwrap();

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action_type, LogAction::Create);
        assert_eq!(entries[0].property_id, created.id);
        assert_eq!(entries[0].property_title, "Sunny flat");
        assert_eq!(entries[0].user_id, actor.id);
        assert_eq!(entries[0].user_email, actor.email);
    }

    #[test]
    fn creation_succeeds_through_an_audit_outage() {
        let mut store = MemoryStore::default();
        let actor = agent();

        let created = create_listing(
            &mut store,
            &FailingSink,
            &actor,
            &listing(names(&["a.jpg"]), PropertyStatus::ForSale),
        )
        .unwrap();

        assert!(store.properties.contains_key(&created.id));
    }

    #[test]
    fn edit_writes_exactly_one_audit_entry() {
        let mut store = MemoryStore::default();
        let sink = RecordingSink::default();
        let actor = agent();
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        let patch = ListingPatch {
            price: Some(99_000),
            ..ListingPatch::default()
        };
        update_listing(&mut store, &NullImages, &sink, &actor, id, patch).unwrap();

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action_type, LogAction::Edit);
        assert_eq!(entries[0].property_id, id);
        assert_eq!(store.properties[&id].price, 99_000);
    }

    #[test]
    fn edit_succeeds_through_an_audit_outage() {
        let mut store = MemoryStore::default();
        let actor = agent();
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        let patch = ListingPatch {
            title: Some("Renamed flat".to_string()),
            ..ListingPatch::default()
        };
        update_listing(&mut store, &NullImages, &FailingSink, &actor, id, patch).unwrap();

        assert_eq!(store.properties[&id].title, "Renamed flat");
    }

    #[test]
    fn sale_writes_exactly_one_audit_entry() {
        let mut store = MemoryStore::default();
        let sink = RecordingSink::default();
        let actor = agent();
        seed_seller(&mut store, &actor, "hunter2");
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        let sold = sell_listing(&mut store, &sink, &actor, id, "Maria Buyer", "hunter2").unwrap();
        assert_eq!(sold.status, PropertyStatus::Sold);
        assert_eq!(sold.buyer_name.as_deref(), Some("Maria Buyer"));

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action_type, LogAction::Sold);
        assert_eq!(entries[0].details.as_deref(), Some("Sold to Maria Buyer."));
    }

    #[test]
    fn sale_succeeds_through_an_audit_outage() {
        let mut store = MemoryStore::default();
        let actor = agent();
        seed_seller(&mut store, &actor, "hunter2");
        let id = stored(&mut store, actor.id, PropertyStatus::ForRent);

        sell_listing(&mut store, &FailingSink, &actor, id, "Maria Buyer", "hunter2").unwrap();
        assert_eq!(store.properties[&id].status, PropertyStatus::Sold);
    }

    #[test]
    fn sale_with_a_wrong_password_writes_no_audit_entry() {
        let mut store = MemoryStore::default();
        let sink = RecordingSink::default();
        let actor = agent();
        seed_seller(&mut store, &actor, "hunter2");
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        let err =
            sell_listing(&mut store, &sink, &actor, id, "Maria Buyer", "hunter3").unwrap_err();
        assert!(matches!(err, ApiError::IncorrectPassword));
        assert!(sink.entries.lock().unwrap().is_empty());
        assert_eq!(store.properties[&id].status, PropertyStatus::ForSale);
    }

    #[test]
    fn deletion_writes_exactly_one_audit_entry() {
        let mut store = MemoryStore::default();
        let sink = RecordingSink::default();
        let actor = agent();
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        delete_listing(&mut store, &NullImages, &sink, &actor, id).unwrap();
        assert!(!store.properties.contains_key(&id));

        let entries = sink.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action_type, LogAction::Delete);
        assert_eq!(entries[0].property_title, "Sunny flat");
    }

    #[test]
    fn deletion_succeeds_through_an_audit_outage() {
        let mut store = MemoryStore::default();
        let actor = agent();
        let id = stored(&mut store, actor.id, PropertyStatus::ForSale);

        delete_listing(&mut store, &NullImages, &FailingSink, &actor, id).unwrap();
        assert!(!store.properties.contains_key(&id));
    }
}

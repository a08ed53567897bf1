use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::cafe::{Cafe, CafeId, NewCafe};
use crate::error::{CafeScoutError, Result};
use crate::geo::{DEFAULT_LOCATION, GeoPoint};
use crate::repository::{SharedStore, load_json_list, save_json};
use crate::storage::keys;

/// Random offset, in degrees, applied to cafés added without coordinates.
const PLACEMENT_JITTER_DEG: f64 = 0.01;

/// Catalog cafés plus the ones users added.
#[derive(Debug)]
pub struct CafeRepository {
    store: SharedStore,
    catalog: Vec<Cafe>,
    user_cafes: Vec<Cafe>,
    default_location: GeoPoint,
}

impl CafeRepository {
    /// Load user cafés from `store`. Records with unusable coordinates are dropped.
    pub fn load(store: SharedStore, catalog: Vec<Cafe>) -> Result<Self> {
        let stored: Vec<Cafe> = load_json_list(store.as_ref(), keys::USER_CAFES)?;
        let user_cafes = stored.into_iter().filter_map(sanitize).collect();

        Ok(CafeRepository {
            store,
            catalog,
            user_cafes,
            default_location: DEFAULT_LOCATION,
        })
    }

    /// Anchor used to place cafés submitted without coordinates.
    pub fn with_default_location(mut self, location: GeoPoint) -> Self {
        self.default_location = location;
        self
    }

    /// Catalog first, then user cafés in submission order.
    pub fn all(&self) -> Vec<Cafe> {
        self.catalog
            .iter()
            .chain(self.user_cafes.iter())
            .cloned()
            .collect()
    }

    pub fn get(&self, id: CafeId) -> Option<&Cafe> {
        self.catalog
            .iter()
            .chain(self.user_cafes.iter())
            .find(|cafe| cafe.id == id)
    }

    pub fn user_cafes(&self) -> &[Cafe] {
        &self.user_cafes
    }

    pub fn len(&self) -> usize {
        self.catalog.len() + self.user_cafes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate and persist a submitted café.
    ///
    /// The id is the current time in milliseconds, bumped past any id
    /// already in use. New cafés start unrated.
    pub fn add(&mut self, new_cafe: NewCafe) -> Result<Cafe> {
        let name = new_cafe.name.trim();
        let address = new_cafe.address.trim();
        if name.is_empty() || address.is_empty() {
            return Err(CafeScoutError::validation("name and address are required"));
        }

        let location = match new_cafe.location {
            Some(point) => GeoPoint::checked(point.lat, point.lng)?,
            None => self.jittered_default(),
        };

        let mut tags: Vec<String> = Vec::new();
        for tag in new_cafe.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_string());
            }
        }

        let mut cafe = Cafe::new(self.next_id().0, name, location.lat, location.lng)
            .with_address(address)
            .with_price_range(new_cafe.price_range)
            .with_tags(tags);
        cafe.description = new_cafe.description.trim().to_string();
        cafe.phone = new_cafe.phone.trim().to_string();
        cafe.hours = new_cafe.hours.trim().to_string();

        self.user_cafes.push(cafe.clone());
        if let Err(e) = save_json(self.store.as_ref(), keys::USER_CAFES, &self.user_cafes) {
            self.user_cafes.pop();
            return Err(e);
        }

        info!("added café {} ({})", cafe.name, cafe.id);
        Ok(cafe)
    }

    fn next_id(&self) -> CafeId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        let max_existing = self
            .catalog
            .iter()
            .chain(self.user_cafes.iter())
            .map(|cafe| cafe.id.0)
            .max()
            .unwrap_or(0);
        CafeId(now.max(max_existing + 1))
    }

    fn jittered_default(&self) -> GeoPoint {
        let mut rng = rand::rng();
        GeoPoint::new(
            self.default_location.lat + rng.random::<f64>() * PLACEMENT_JITTER_DEG,
            self.default_location.lng + rng.random::<f64>() * PLACEMENT_JITTER_DEG,
        )
    }
}

/// Repair or reject a stored café record.
fn sanitize(mut cafe: Cafe) -> Option<Cafe> {
    if GeoPoint::checked(cafe.lat, cafe.lng).is_err() {
        warn!("dropping stored café {} with invalid coordinates", cafe.id);
        return None;
    }
    if cafe.name.trim().is_empty() {
        warn!("dropping stored café {} without a name", cafe.id);
        return None;
    }
    if !cafe.rating.is_finite() || !(0.0..=5.0).contains(&cafe.rating) {
        warn!("resetting out-of-range rating on stored café {}", cafe.id);
        cafe.rating = if cafe.rating.is_finite() {
            cafe.rating.clamp(0.0, 5.0)
        } else {
            0.0
        };
    }
    cafe.distance = None;
    Some(cafe)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cafe::PriceRange;
    use crate::storage::KeyValueStore;
    use crate::storage::memory::MemoryStore;

    fn catalog() -> Vec<Cafe> {
        vec![
            Cafe::new(1, "Catalog One", 21.03, 105.85),
            Cafe::new(2, "Catalog Two", 21.02, 105.84),
        ]
    }

    fn form(name: &str, address: &str) -> NewCafe {
        NewCafe {
            name: name.to_string(),
            address: address.to_string(),
            ..NewCafe::default()
        }
    }

    #[test]
    fn test_add_and_reload() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut repo = CafeRepository::load(store.clone(), catalog()).unwrap();

        let mut new_cafe = form("  Corner Brew ", " 12 Hàng Bạc ");
        new_cafe.price_range = PriceRange::Cheap;
        new_cafe.tags = vec!["Wi-Fi".into(), " ".into(), "Wi-Fi".into(), "静か".into()];
        let added = repo.add(new_cafe).unwrap();

        assert_eq!(added.name, "Corner Brew");
        assert_eq!(added.address, "12 Hàng Bạc");
        assert_eq!(added.rating, 0.0);
        assert_eq!(added.tags, vec!["Wi-Fi", "静か"]);
        assert!(added.id.0 > 2);

        let reloaded = CafeRepository::load(store, catalog()).unwrap();
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded.all().last().unwrap().id, added.id);
        assert_eq!(reloaded.all()[0].id, CafeId(1));
    }

    #[test]
    fn test_add_requires_name_and_address() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut repo = CafeRepository::load(store.clone(), catalog()).unwrap();
        assert!(matches!(repo.add(form("  ", "somewhere")), Err(CafeScoutError::Validation(_))));
        assert!(matches!(repo.add(form("Name", "")), Err(CafeScoutError::Validation(_))));
        assert!(store.get(keys::USER_CAFES).unwrap().is_none());
    }

    #[test]
    fn test_default_placement_is_near_anchor() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let anchor = GeoPoint::new(35.0, 139.0);
        let mut repo = CafeRepository::load(store, Vec::new())
            .unwrap()
            .with_default_location(anchor);
        let added = repo.add(form("Placed", "Somewhere")).unwrap();
        assert!(added.lat >= 35.0 && added.lat < 35.0 + PLACEMENT_JITTER_DEG);
        assert!(added.lng >= 139.0 && added.lng < 139.0 + PLACEMENT_JITTER_DEG);
    }

    #[test]
    fn test_explicit_coordinates_are_checked() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut repo = CafeRepository::load(store, Vec::new()).unwrap();
        let mut new_cafe = form("Bad", "Nowhere");
        new_cafe.location = Some(GeoPoint::new(91.0, 0.0));
        assert!(repo.add(new_cafe).is_err());
    }

    #[test]
    fn test_ids_increase() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut repo = CafeRepository::load(store, Vec::new()).unwrap();
        let first = repo.add(form("First", "A")).unwrap();
        let second = repo.add(form("Second", "B")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_malformed_records_are_dropped() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        store
            .set(
                keys::USER_CAFES,
                r#"[
                    {"id": 100, "name": "Good", "lat": 21.0, "lng": 105.0, "rating": 9.0},
                    {"id": 101, "name": "No coords"},
                    {"id": 102, "name": "Bad lat", "lat": 120.0, "lng": 105.0},
                    "garbage"
                ]"#,
            )
            .unwrap();
        let repo = CafeRepository::load(store, Vec::new()).unwrap();
        assert_eq!(repo.user_cafes().len(), 1);
        assert_eq!(repo.user_cafes()[0].rating, 5.0);
    }
}

use std::collections::BTreeSet;
use std::str::FromStr;

use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;
use crate::recommend::{MaxDistance, UserPreferences};
use crate::repository::{SharedStore, load_json, save_json};
use crate::storage::keys;

/// Stored preferences as written by any past version, before validation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawPreferences {
    cafe_types: Vec<String>,
    price_range: Vec<String>,
    max_distance: Option<Value>,
    amenities: Vec<String>,
}

impl RawPreferences {
    fn into_preferences(self) -> UserPreferences {
        UserPreferences {
            cafe_types: parse_known("cafe type", self.cafe_types),
            price_range: parse_known("price range", self.price_range),
            max_distance: parse_max_distance(self.max_distance),
            amenities: parse_known("amenity", self.amenities),
        }
    }
}

fn parse_known<T: FromStr + Ord>(what: &str, values: Vec<String>) -> BTreeSet<T> {
    values
        .into_iter()
        .filter_map(|value| match value.parse::<T>() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("ignoring unknown {what} {value:?} in stored preferences");
                None
            }
        })
        .collect()
}

fn parse_max_distance(value: Option<Value>) -> MaxDistance {
    let parsed = match &value {
        None | Some(Value::Null) => return MaxDistance::default(),
        Some(Value::String(text)) => text.parse().ok(),
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|km| km.is_finite() && *km >= 0.0)
            .map(MaxDistance::Km),
        Some(_) => None,
    };
    parsed.unwrap_or_else(|| {
        warn!("ignoring invalid maxDistance {value:?} in stored preferences");
        MaxDistance::default()
    })
}

/// The user's saved recommendation preferences.
#[derive(Debug)]
pub struct PreferenceStore {
    store: SharedStore,
    current: Option<UserPreferences>,
}

impl PreferenceStore {
    pub fn load(store: SharedStore) -> Result<Self> {
        let raw: Option<Option<RawPreferences>> =
            load_json(store.as_ref(), keys::USER_PREFERENCES)?;
        let current = raw.flatten().map(RawPreferences::into_preferences);
        Ok(PreferenceStore { store, current })
    }

    /// Saved preferences, `None` if the user never saved any.
    pub fn get(&self) -> Option<&UserPreferences> {
        self.current.as_ref()
    }

    pub fn save(&mut self, preferences: UserPreferences) -> Result<()> {
        save_json(self.store.as_ref(), keys::USER_PREFERENCES, &preferences)?;
        info!("saved preferences");
        self.current = Some(preferences);
        Ok(())
    }

    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(keys::USER_PREFERENCES)?;
        self.current = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cafe::PriceRange;
    use crate::recommend::{Amenity, CafeType};
    use crate::storage::KeyValueStore;
    use crate::storage::memory::MemoryStore;

    fn store_with(json: &str) -> SharedStore {
        let store = MemoryStore::new();
        store.set(keys::USER_PREFERENCES, json).unwrap();
        Arc::new(store)
    }

    #[test]
    fn test_nothing_saved() {
        let prefs = PreferenceStore::load(Arc::new(MemoryStore::new())).unwrap();
        assert!(prefs.get().is_none());
        let prefs = PreferenceStore::load(store_with("null")).unwrap();
        assert!(prefs.get().is_none());
    }

    #[test]
    fn test_lenient_load() {
        let prefs = PreferenceStore::load(store_with(
            r#"{"cafeTypes": ["dog", "hamster"], "priceRange": ["cheap", "luxury"],
                "maxDistance": "3", "amenities": ["wifi", "pool"]}"#,
        ))
        .unwrap();
        let saved = prefs.get().unwrap();
        assert_eq!(saved.cafe_types.iter().copied().collect::<Vec<_>>(), vec![CafeType::Dog]);
        assert_eq!(saved.price_range.iter().copied().collect::<Vec<_>>(), vec![PriceRange::Cheap]);
        assert_eq!(saved.max_distance, MaxDistance::Km(3.0));
        assert_eq!(saved.amenities.iter().copied().collect::<Vec<_>>(), vec![Amenity::Wifi]);
    }

    #[test]
    fn test_max_distance_forms() {
        let any = PreferenceStore::load(store_with(r#"{"maxDistance": "any"}"#)).unwrap();
        assert_eq!(any.get().unwrap().max_distance, MaxDistance::Any);

        let number = PreferenceStore::load(store_with(r#"{"maxDistance": 10}"#)).unwrap();
        assert_eq!(number.get().unwrap().max_distance, MaxDistance::Km(10.0));

        let junk = PreferenceStore::load(store_with(r#"{"maxDistance": "far"}"#)).unwrap();
        assert_eq!(junk.get().unwrap().max_distance, MaxDistance::Km(5.0));

        let negative = PreferenceStore::load(store_with(r#"{"maxDistance": -1}"#)).unwrap();
        assert_eq!(negative.get().unwrap().max_distance, MaxDistance::Km(5.0));
    }

    #[test]
    fn test_save_and_clear() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let mut prefs = PreferenceStore::load(store.clone()).unwrap();

        let mut wanted = UserPreferences::default();
        wanted.cafe_types.insert(CafeType::Quiet);
        wanted.max_distance = MaxDistance::Any;
        prefs.save(wanted.clone()).unwrap();

        let reloaded = PreferenceStore::load(store.clone()).unwrap();
        assert_eq!(reloaded.get(), Some(&wanted));

        prefs.clear().unwrap();
        assert!(PreferenceStore::load(store).unwrap().get().is_none());
    }
}

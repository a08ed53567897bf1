//! Typed repositories over a [`KeyValueStore`].
//!
//! Each repository owns one or two storage keys, decodes them leniently
//! on load (bad records are logged and dropped) and writes its whole
//! state back after every change.

use std::sync::Arc;

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::storage::KeyValueStore;

pub mod cafes;
pub mod favorites;
pub mod preferences;
pub mod profile;
pub mod reviews;

pub use cafes::CafeRepository;
pub use favorites::FavoritesStore;
pub use preferences::PreferenceStore;
pub use profile::{ProfileStore, UserProfile};
pub use reviews::ReviewStore;

/// Shared handle to the backing store.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Decode the JSON under `key`.
///
/// A missing key yields `None`. Undecodable content is logged and also
/// yields `None`, so one corrupted entry never blocks startup.
pub(crate) fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!("ignoring unreadable {key} entry: {e}");
            Ok(None)
        }
    }
}

/// Decode a JSON array under `key` element by element, dropping bad elements.
pub(crate) fn load_json_list<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Vec<T>> {
    let values: Vec<serde_json::Value> = load_json(store, key)?.unwrap_or_default();
    let mut items = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value(value) {
            Ok(item) => items.push(item),
            Err(e) => warn!("dropping malformed {key} record: {e}"),
        }
    }
    Ok(items)
}

pub(crate) fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}

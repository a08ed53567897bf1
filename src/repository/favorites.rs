use log::debug;

use crate::cafe::{Cafe, CafeId};
use crate::error::Result;
use crate::repository::{SharedStore, load_json_list, save_json};
use crate::storage::keys;

/// The set of favorited café ids, in the order they were added.
#[derive(Debug)]
pub struct FavoritesStore {
    store: SharedStore,
    ids: Vec<CafeId>,
}

impl FavoritesStore {
    pub fn load(store: SharedStore) -> Result<Self> {
        let mut ids: Vec<CafeId> = Vec::new();
        for id in load_json_list::<CafeId>(store.as_ref(), keys::FAVORITES)? {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Ok(FavoritesStore { store, ids })
    }

    pub fn contains(&self, id: CafeId) -> bool {
        self.ids.contains(&id)
    }

    /// Add or remove `id`. Returns whether the café is now a favorite.
    pub fn toggle(&mut self, id: CafeId) -> Result<bool> {
        let previous = self.ids.clone();
        let now_favorite = match self.ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };
        if let Err(e) = save_json(self.store.as_ref(), keys::FAVORITES, &self.ids) {
            self.ids = previous;
            return Err(e);
        }
        debug!("café {id} favorite={now_favorite}");
        Ok(now_favorite)
    }

    pub fn ids(&self) -> &[CafeId] {
        &self.ids
    }

    /// The favorited cafés among `cafes`, in `cafes` order.
    pub fn favorite_cafes(&self, cafes: &[Cafe]) -> Vec<Cafe> {
        cafes
            .iter()
            .filter(|cafe| self.contains(cafe.id))
            .cloned()
            .collect()
    }
}

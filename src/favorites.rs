//! Favorites persisted under the `favoritosPokemon` storage key.
//!
//! The whole list is read and written on every mutation. When the backing
//! storage stops accepting writes the store switches to an in-memory copy
//! and keeps working for the rest of the session.

use tracing::warn;

use crate::error::StorageError;
use crate::state::{FavoriteEntry, Theme};
use crate::storage::{FAVORITES_KEY, MemoryStorage, Storage, THEME_KEY};

pub struct FavoritesStore {
    storage: Box<dyn Storage>,
    fallback: Option<Vec<FavoriteEntry>>,
}

impl FavoritesStore {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            fallback: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    /// Whether writes have failed and the store runs from memory.
    pub fn is_degraded(&self) -> bool {
        self.fallback.is_some()
    }

    pub fn list(&self) -> Vec<FavoriteEntry> {
        if let Some(entries) = &self.fallback {
            return entries.clone();
        }
        match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => parse_favorites(&raw),
            Ok(None) => Vec::new(),
            Err(error) => {
                warn!(%error, "favorites unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.list().iter().any(|entry| entry.id == id)
    }

    /// Removes the entry with `id` if present, appends it otherwise, and
    /// writes the full list back before returning it.
    pub fn toggle(&mut self, id: u32, name: &str, image_url: &str) -> Vec<FavoriteEntry> {
        let mut entries = self.list();
        if let Some(position) = entries.iter().position(|entry| entry.id == id) {
            entries.remove(position);
        } else {
            entries.push(FavoriteEntry {
                id,
                name: name.to_string(),
                image_url: image_url.to_string(),
            });
        }
        self.persist(&entries);
        entries
    }

    pub fn theme(&self) -> Theme {
        match self.storage.get(THEME_KEY) {
            Ok(Some(value)) => Theme::from_stored(&value),
            Ok(None) => Theme::default(),
            Err(error) => {
                warn!(%error, "theme unreadable, using default");
                Theme::default()
            }
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if let Err(error) = self.storage.set(THEME_KEY, theme.as_str()) {
            warn!(%error, "theme not saved");
        }
    }

    fn persist(&mut self, entries: &[FavoriteEntry]) {
        if self.fallback.is_some() {
            self.fallback = Some(entries.to_vec());
            return;
        }
        let result = serde_json::to_string(entries)
            .map_err(StorageError::from)
            .and_then(|raw| self.storage.set(FAVORITES_KEY, &raw));
        if let Err(error) = result {
            warn!(%error, "favorites storage unavailable, keeping favorites in memory");
            self.fallback = Some(entries.to_vec());
        }
    }
}

/// Malformed documents read as empty. Duplicate ids keep their first entry.
fn parse_favorites(raw: &str) -> Vec<FavoriteEntry> {
    let entries: Vec<FavoriteEntry> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(%error, "favorites document malformed, treating as empty");
            return Vec::new();
        }
    };
    let mut unique: Vec<FavoriteEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.iter().any(|existing| existing.id == entry.id) {
            unique.push(entry);
        }
    }
    unique
}

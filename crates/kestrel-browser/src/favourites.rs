//! Favourite locations.

use std::cell::RefCell;
use std::rc::Rc;

use kestrel_common::Location;
use serde::{Deserialize, Serialize};

/// Storage for favourite locations.
pub trait FavouritesStore {
    /// Add `location`. Returns `false` if it was already present.
    fn add(&mut self, location: &Location) -> bool;
    /// Remove `location`. Returns `false` if it was not present.
    fn remove(&mut self, location: &Location) -> bool;
    /// True if `location` is a favourite.
    fn contains(&self, location: &Location) -> bool;
    /// Every favourite in insertion order.
    fn locations(&self) -> Vec<Location>;
}

/// A favourites store shared between sessions and handlers.
pub type SharedFavourites = Rc<RefCell<dyn FavouritesStore>>;

/// In-memory favourites, serializable for whoever persists settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favourites {
    entries: Vec<Location>,
}

impl Favourites {
    /// Empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Wrap a store for sharing.
    #[must_use]
    pub fn shared(self) -> SharedFavourites {
        Rc::new(RefCell::new(self))
    }
}

impl FavouritesStore for Favourites {
    fn add(&mut self, location: &Location) -> bool {
        if self.contains(location) {
            return false;
        }
        self.entries.push(location.clone());
        true
    }

    fn remove(&mut self, location: &Location) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry != location);
        self.entries.len() != before
    }

    fn contains(&self, location: &Location) -> bool {
        self.entries.contains(location)
    }

    fn locations(&self) -> Vec<Location> {
        self.entries.clone()
    }
}

//! Which cities are currently shown
//!
//! The selection lives beside the trip, not inside it, and is never
//! persisted. It is not validated against the trip: an id for a city that
//! no longer exists simply never matches anything.

use std::collections::HashSet;

use super::types::{City, CityId, Trip};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<CityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selection holding every city of `trip`
    pub fn all_of(trip: &Trip) -> Self {
        let mut selection = Self::new();
        selection.select_all(trip);
        selection
    }

    pub fn select(&mut self, id: &CityId) {
        self.ids.insert(id.clone());
    }

    pub fn deselect(&mut self, id: &CityId) {
        self.ids.remove(id);
    }

    /// Flip membership, returning whether `id` is now selected
    pub fn toggle(&mut self, id: &CityId) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.clone());
            true
        }
    }

    /// Replace the selection with every city currently in `trip`
    pub fn select_all(&mut self, trip: &Trip) {
        self.ids = trip.cities.iter().map(|c| c.id.clone()).collect();
    }

    pub fn select_none(&mut self) {
        self.ids.clear();
    }

    pub fn is_selected(&self, id: &CityId) -> bool {
        self.ids.contains(id)
    }

    /// Selected cities of `trip`, in trip order
    pub fn selected_cities<'a>(&self, trip: &'a Trip) -> Vec<&'a City> {
        trip.cities
            .iter()
            .filter(|c| self.is_selected(&c.id))
            .collect()
    }

    /// Number of ids held, including ones the trip no longer has
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Trip document types
//!
//! The trip is a strict ownership tree: a [`Trip`] owns its cities, a
//! [`City`] owns its days and a [`Day`] owns its events. The serialized form
//! is the document that is persisted, imported and exported verbatim.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::dates::CalendarDate;
use super::factory::clamp_nights;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Mint a fresh random identifier
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier of a [`City`]
    CityId
);
entity_id!(
    /// Identifier of a [`Day`]. Not stable across reconciliation.
    DayId
);
entity_id!(
    /// Identifier of an [`Event`]
    EventId
);

/// Keys a document carries that this model does not know about. Kept so
/// they are written back unchanged.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;

/// Root itinerary document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub name: String,
    pub start_date: CalendarDate,
    #[serde(default)]
    pub cities: Vec<City>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A stop on the trip, staying `nights` nights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: CityId,
    pub name: String,
    /// Any number is accepted from a document and clamped to `1..=MAX_NIGHTS`
    #[serde(default = "one_night", deserialize_with = "lenient_nights")]
    pub nights: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hotel: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    /// Overrides the derived kind of the first day, e.g. `full`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_day_type: Option<String>,
    /// Overrides the derived kind of the last day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_day_type: Option<String>,
    #[serde(default)]
    pub days: Vec<Day>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// One calendar day spent in a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub id: DayId,
    pub date: CalendarDate,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// A planned activity on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(rename = "type", default = "EventType::unspecified")]
    pub event_type: EventType,
    /// Free-form display text such as `10:00` or `afternoon`
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub ticket_required: bool,
    #[serde(default)]
    pub ticket_bought: bool,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

/// Display color for cities created without one
pub const DEFAULT_CITY_COLOR: &str = "#5b8def";

fn default_color() -> String {
    DEFAULT_CITY_COLOR.to_string()
}

fn one_night() -> u32 {
    1
}

/// Nights as written by any producer: negative, zero, fractional or huge
/// values are clamped instead of rejecting the whole document
fn lenient_nights<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    // `as` saturates and maps NaN to 0
    Ok(clamp_nights(raw as i64))
}

/// Event category. The known categories drive icons and pickers; anything
/// else is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    Walk,
    Museum,
    Ticket,
    Food,
    Architecture,
    Neighborhood,
    Culture,
    Art,
    Design,
    Music,
    Logistics,
    Hotel,
    Transport,
    Shopping,
    Nature,
    Beach,
    Nightlife,
    Photo,
    Viewpoint,
    Religious,
    Market,
    Cafe,
    Bar,
    Show,
    Tour,
    Other(String),
}

impl EventType {
    /// Every known category, in picker order
    pub const KNOWN: [EventType; 25] = [
        EventType::Walk,
        EventType::Museum,
        EventType::Ticket,
        EventType::Food,
        EventType::Architecture,
        EventType::Neighborhood,
        EventType::Culture,
        EventType::Art,
        EventType::Design,
        EventType::Music,
        EventType::Logistics,
        EventType::Hotel,
        EventType::Transport,
        EventType::Shopping,
        EventType::Nature,
        EventType::Beach,
        EventType::Nightlife,
        EventType::Photo,
        EventType::Viewpoint,
        EventType::Religious,
        EventType::Market,
        EventType::Cafe,
        EventType::Bar,
        EventType::Show,
        EventType::Tour,
    ];

    /// Category used when a document carries none
    pub fn unspecified() -> Self {
        EventType::Other(String::new())
    }

    pub fn as_str(&self) -> &str {
        match self {
            EventType::Walk => "walk",
            EventType::Museum => "museum",
            EventType::Ticket => "ticket",
            EventType::Food => "food",
            EventType::Architecture => "architecture",
            EventType::Neighborhood => "neighborhood",
            EventType::Culture => "culture",
            EventType::Art => "art",
            EventType::Design => "design",
            EventType::Music => "music",
            EventType::Logistics => "logistics",
            EventType::Hotel => "hotel",
            EventType::Transport => "transport",
            EventType::Shopping => "shopping",
            EventType::Nature => "nature",
            EventType::Beach => "beach",
            EventType::Nightlife => "nightlife",
            EventType::Photo => "photo",
            EventType::Viewpoint => "viewpoint",
            EventType::Religious => "religious",
            EventType::Market => "market",
            EventType::Cafe => "cafe",
            EventType::Bar => "bar",
            EventType::Show => "show",
            EventType::Tour => "tour",
            EventType::Other(raw) => raw,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            EventType::Walk => "🚶",
            EventType::Museum => "🏛️",
            EventType::Ticket => "🎟️",
            EventType::Food => "🍽️",
            EventType::Architecture => "🏗️",
            EventType::Neighborhood => "🏘️",
            EventType::Culture => "🎭",
            EventType::Art => "🎨",
            EventType::Design => "✨",
            EventType::Music => "🎵",
            EventType::Logistics => "✈️",
            EventType::Hotel => "🏨",
            EventType::Transport => "🚌",
            EventType::Shopping => "🛍️",
            EventType::Nature => "🌳",
            EventType::Beach => "🏖️",
            EventType::Nightlife => "🌙",
            EventType::Photo => "📸",
            EventType::Viewpoint => "🔭",
            EventType::Religious => "⛪",
            EventType::Market => "🛒",
            EventType::Cafe => "☕",
            EventType::Bar => "🍷",
            EventType::Show => "🎪",
            EventType::Tour => "🗺️",
            EventType::Other(_) => "📍",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, EventType::Other(_))
    }
}

impl From<String> for EventType {
    fn from(raw: String) -> Self {
        let normalized = raw.trim().to_lowercase();
        EventType::KNOWN
            .iter()
            .find(|known| known.as_str() == normalized)
            .cloned()
            .unwrap_or(EventType::Other(raw))
    }
}

impl From<&str> for EventType {
    fn from(raw: &str) -> Self {
        EventType::from(raw.to_string())
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        match value {
            EventType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of an event inside a trip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLocation {
    pub city_index: usize,
    pub day_index: usize,
    pub event_index: usize,
}

impl Trip {
    /// Empty trip starting on `start_date`
    pub fn new(name: impl Into<String>, start_date: CalendarDate) -> Self {
        Self {
            name: name.into(),
            start_date,
            cities: Vec::new(),
            extra: ExtraFields::new(),
        }
    }

    pub fn city(&self, id: &CityId) -> Option<&City> {
        self.cities.iter().find(|c| &c.id == id)
    }

    pub fn city_mut(&mut self, id: &CityId) -> Option<&mut City> {
        self.cities.iter_mut().find(|c| &c.id == id)
    }

    /// Sum of nights over all cities
    pub fn total_nights(&self) -> u64 {
        self.cities.iter().map(|c| u64::from(c.nights)).sum()
    }

    pub fn event_count(&self) -> usize {
        self.cities
            .iter()
            .flat_map(|c| &c.days)
            .map(|d| d.events.len())
            .sum()
    }

    /// Locate an event anywhere in the trip
    pub fn locate_event(&self, id: &EventId) -> Option<EventLocation> {
        self.cities.iter().enumerate().find_map(|(city_index, city)| {
            city.days.iter().enumerate().find_map(|(day_index, day)| {
                day.events
                    .iter()
                    .position(|e| &e.id == id)
                    .map(|event_index| EventLocation {
                        city_index,
                        day_index,
                        event_index,
                    })
            })
        })
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        let loc = self.locate_event(id)?;
        Some(&self.cities[loc.city_index].days[loc.day_index].events[loc.event_index])
    }

    pub fn event_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        let loc = self.locate_event(id)?;
        Some(&mut self.cities[loc.city_index].days[loc.day_index].events[loc.event_index])
    }
}

impl City {
    pub fn day(&self, id: &DayId) -> Option<&Day> {
        self.days.iter().find(|d| &d.id == id)
    }

    pub fn day_mut(&mut self, id: &DayId) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| &d.id == id)
    }

    /// Day by its 1-based number within the stay
    pub fn day_number(&self, number: usize) -> Option<&Day> {
        number.checked_sub(1).and_then(|i| self.days.get(i))
    }
}

impl Event {
    /// Turning the requirement off also clears the purchase flag
    pub fn set_ticket_required(&mut self, required: bool) {
        self.ticket_required = required;
        if !required {
            self.ticket_bought = false;
        }
    }

    /// Purchase can only be recorded for events that require a ticket
    pub fn set_ticket_bought(&mut self, bought: bool) {
        self.ticket_bought = bought && self.ticket_required;
    }

    pub fn ticket_pending(&self) -> bool {
        self.ticket_required && !self.ticket_bought
    }
}

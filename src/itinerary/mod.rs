//! Itinerary core
//!
//! The trip document and the rules that keep it consistent:
//!
//! - [`dates`] - calendar arithmetic, the only source of day dates
//! - [`types`] - `Trip` / `City` / `Day` / `Event`
//! - [`factory`] - fresh entities with new identifiers and clamped input
//! - [`reconcile`] - rebuilds day sequences after structural edits
//! - [`moves`] - event moves and city reordering
//! - [`selection`] - which cities are currently shown
//! - [`summary`] - derived read views (range, tickets, timeline)
//! - [`demo`] - sample trip

pub mod dates;
pub mod demo;
pub mod factory;
pub mod moves;
pub mod reconcile;
pub mod selection;
pub mod summary;
pub mod types;

pub use dates::{add_days, CalendarDate};
pub use moves::{move_event, reorder_cities, DaySlot, MoveOutcome};
pub use reconcile::{reconcile, ReconcileReport};
pub use selection::Selection;
pub use types::{City, CityId, Day, DayId, Event, EventId, EventType, Trip};

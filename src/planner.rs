//! Application context for trip editing
//!
//! [`Planner`] owns the trip, the city selection and the store handle.
//! Every user command enters through it: input is clamped here, structural
//! edits are followed by reconciliation, and every mutation is followed by
//! a full save of the trip document.
//!
//! Lookups that miss (unknown city, day or event id) are reported through
//! [`Outcome`] / [`MoveOutcome`] and leave both the trip and the store
//! untouched. A failed save is returned as an error, but the in-memory
//! edit it followed stays applied.

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ErrorCode, PlannerError, Result};
use crate::itinerary::dates::CalendarDate;
use crate::itinerary::demo::demo_trip;
use crate::itinerary::factory::{clamp_nights, name_or, new_city, new_event, PLACEHOLDER_CITY_NAME};
use crate::itinerary::{
    move_event, reconcile, reorder_cities, City, CityId, DayId, DaySlot, EventId, EventType,
    MoveOutcome, ReconcileReport, Selection, Trip,
};
use crate::storage::TripStore;

/// Name given to a trip whose name is blank
pub const PLACEHOLDER_TRIP_NAME: &str = "Untitled trip";

/// Result of a command that targets an entity by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    NotFound,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Changes to a city. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct CityPatch {
    pub name: Option<String>,
    pub nights: Option<i64>,
    /// A blank hotel clears it
    pub hotel: Option<String>,
}

/// Fields for a new event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub event_type: EventType,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub link: Option<String>,
    pub ticket_required: bool,
}

impl Default for NewEvent {
    fn default() -> Self {
        Self {
            title: String::new(),
            event_type: EventType::Walk,
            start_time: None,
            end_time: None,
            link: None,
            ticket_required: false,
        }
    }
}

/// Changes to an event. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// A blank title keeps the current one
    pub title: Option<String>,
    pub event_type: Option<EventType>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// A blank link clears it
    pub link: Option<String>,
    pub notes: Option<String>,
    pub ticket_required: Option<bool>,
    pub ticket_bought: Option<bool>,
}

pub struct Planner<S: TripStore> {
    trip: Trip,
    selection: Selection,
    store: S,
    config: Config,
}

impl<S: TripStore> Planner<S> {
    /// Open the stored trip, or seed and save the demo trip if there is none
    pub fn open(store: S, config: Config) -> Result<Self> {
        Self::open_at(store, config, Local::now().date_naive())
    }

    /// Like [`Planner::open`], with an explicit "today" for the demo trip
    pub fn open_at(mut store: S, config: Config, today: CalendarDate) -> Result<Self> {
        let trip = match store.load()? {
            Some(mut stored) => {
                let report = normalize(&mut stored);
                debug!(?report, "Normalized stored trip");
                stored
            }
            None => {
                info!("No stored trip, starting from the demo itinerary");
                demo_trip(today, config.demo_start_offset_days)
            }
        };

        store.save(&trip)?;
        let selection = Selection::all_of(&trip);
        Ok(Self {
            trip,
            selection,
            store,
            config,
        })
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find a city by exact id or case-insensitive name
    pub fn find_city(&self, reference: &str) -> Option<&City> {
        let reference = reference.trim();
        self.trip
            .cities
            .iter()
            .find(|c| c.id.as_str() == reference)
            .or_else(|| {
                self.trip
                    .cities
                    .iter()
                    .find(|c| c.name.eq_ignore_ascii_case(reference))
            })
    }

    fn persist(&mut self) -> Result<()> {
        self.store.save(&self.trip).map_err(|e| {
            warn!(error = %e, "Failed to save trip");
            PlannerError::from(e)
        })
    }

    /// Apply a structural edit and rebuild the day sequence against the
    /// trip as it was before the edit
    fn restructure(&mut self, edit: impl FnOnce(&mut Trip)) -> ReconcileReport {
        let previous = self.trip.clone();
        edit(&mut self.trip);
        reconcile(&mut self.trip, &previous)
    }

    pub fn rename_trip(&mut self, name: &str) -> Result<()> {
        let fallback = name_or(&self.trip.name, PLACEHOLDER_TRIP_NAME);
        self.trip.name = name_or(name, &fallback);
        self.persist()
    }

    /// Change the start date, reconciling only when it actually moves
    pub fn set_start_date(&mut self, date: CalendarDate) -> Result<Option<ReconcileReport>> {
        let report = (date != self.trip.start_date)
            .then(|| self.restructure(|trip| trip.start_date = date));
        self.persist()?;
        Ok(report)
    }

    /// Append a city. The color comes from the configured palette and the
    /// new city is selected.
    pub fn add_city(
        &mut self,
        name: &str,
        nights: Option<i64>,
        hotel: Option<&str>,
    ) -> Result<CityId> {
        let nights = nights.unwrap_or(i64::from(self.config.default_nights));
        let color = self.config.color_for(self.trip.cities.len()).to_string();
        let city = new_city(name, nights, hotel, Some(&color));
        let id = city.id.clone();

        self.restructure(|trip| trip.cities.push(city));
        self.selection.select(&id);
        info!(city = %id, "Added city");

        self.persist()?;
        Ok(id)
    }

    /// Edit name, hotel and nights. Only a nights change reconciles.
    pub fn edit_city(&mut self, id: &CityId, patch: CityPatch) -> Result<Outcome> {
        let Some(city) = self.trip.city_mut(id) else {
            return Ok(Outcome::NotFound);
        };

        if let Some(name) = &patch.name {
            let fallback = name_or(&city.name, PLACEHOLDER_CITY_NAME);
            city.name = name_or(name, &fallback);
        }
        if let Some(hotel) = patch.hotel {
            let hotel = hotel.trim();
            city.hotel = (!hotel.is_empty()).then(|| hotel.to_string());
        }

        let nights = patch.nights.map(clamp_nights).filter(|n| *n != city.nights);
        if let Some(nights) = nights {
            let report = self.restructure(|trip| {
                if let Some(city) = trip.city_mut(id) {
                    city.nights = nights;
                }
            });
            if report.events_dropped > 0 {
                debug!(city = %id, dropped = report.events_dropped, "Nights change dropped events");
            }
        }

        self.persist()?;
        Ok(Outcome::Applied)
    }

    pub fn set_city_color(&mut self, id: &CityId, color: &str) -> Result<Outcome> {
        let Some(city) = self.trip.city_mut(id) else {
            return Ok(Outcome::NotFound);
        };
        let color = color.trim();
        if !color.is_empty() {
            city.color = color.to_string();
        }
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Remove a city and its events. The selection is left as is; the stale
    /// id just stops matching.
    pub fn remove_city(&mut self, id: &CityId) -> Result<Outcome> {
        if self.trip.city(id).is_none() {
            return Ok(Outcome::NotFound);
        }
        self.restructure(|trip| trip.cities.retain(|c| &c.id != id));
        info!(city = %id, "Removed city");
        self.persist()?;
        Ok(Outcome::Applied)
    }

    pub fn reorder_cities(&mut self, order: &[CityId]) -> Result<ReconcileReport> {
        let report = self.restructure(|trip| reorder_cities(trip, order));
        self.persist()?;
        Ok(report)
    }

    /// Append an event to a day. `None` when the city or day is unknown.
    pub fn add_event(
        &mut self,
        city_id: &CityId,
        day_id: &DayId,
        spec: NewEvent,
    ) -> Result<Option<EventId>> {
        let Some(day) = self
            .trip
            .city_mut(city_id)
            .and_then(|city| city.day_mut(day_id))
        else {
            return Ok(None);
        };

        let event = new_event(
            &spec.title,
            spec.event_type,
            spec.start_time.as_deref(),
            spec.end_time.as_deref(),
            spec.link.as_deref(),
            spec.ticket_required,
        );
        let id = event.id.clone();
        day.events.push(event);

        self.persist()?;
        Ok(Some(id))
    }

    pub fn edit_event(&mut self, id: &EventId, patch: EventPatch) -> Result<Outcome> {
        let Some(event) = self.trip.event_mut(id) else {
            return Ok(Outcome::NotFound);
        };

        if let Some(title) = &patch.title {
            let current = event.title.clone();
            event.title = name_or(title, &current);
        }
        if let Some(event_type) = patch.event_type {
            event.event_type = event_type;
        }
        if let Some(start) = &patch.start_time {
            event.start_time = start.trim().to_string();
        }
        if let Some(end) = &patch.end_time {
            event.end_time = end.trim().to_string();
        }
        if let Some(link) = &patch.link {
            let link = link.trim();
            event.link = (!link.is_empty()).then(|| link.to_string());
        }
        if let Some(notes) = patch.notes {
            event.notes = notes;
        }
        if let Some(required) = patch.ticket_required {
            event.set_ticket_required(required);
        }
        if let Some(bought) = patch.ticket_bought {
            event.set_ticket_bought(bought);
        }
        // Re-assert in case only the purchase flag was patched
        let required = event.ticket_required;
        event.set_ticket_required(required);

        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Record a ticket purchase. Has no effect on events that do not
    /// require a ticket.
    pub fn set_ticket_bought(&mut self, id: &EventId, bought: bool) -> Result<Outcome> {
        let Some(event) = self.trip.event_mut(id) else {
            return Ok(Outcome::NotFound);
        };
        event.set_ticket_bought(bought);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Delete an event wherever it is in the trip
    pub fn remove_event(&mut self, id: &EventId) -> Result<Outcome> {
        let Some(loc) = self.trip.locate_event(id) else {
            return Ok(Outcome::NotFound);
        };
        self.trip.cities[loc.city_index].days[loc.day_index]
            .events
            .remove(loc.event_index);
        self.persist()?;
        Ok(Outcome::Applied)
    }

    /// Move an event between (or within) days. No reconciliation.
    pub fn move_event(
        &mut self,
        from: &DaySlot,
        to: &DaySlot,
        event_id: &EventId,
        to_index: usize,
    ) -> Result<MoveOutcome> {
        let outcome = move_event(&mut self.trip, from, to, event_id, to_index);
        if outcome.is_moved() {
            self.persist()?;
        }
        Ok(outcome)
    }

    pub fn select(&mut self, id: &CityId) {
        self.selection.select(id);
    }

    pub fn deselect(&mut self, id: &CityId) {
        self.selection.deselect(id);
    }

    pub fn toggle_selection(&mut self, id: &CityId) -> bool {
        self.selection.toggle(id)
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.trip);
    }

    pub fn select_none(&mut self) {
        self.selection.select_none();
    }

    /// Replace the trip with an imported document. A document that does not
    /// parse leaves everything untouched.
    pub fn import_json(&mut self, text: &str) -> Result<ReconcileReport> {
        let mut imported: Trip = serde_json::from_str(text)
            .map_err(|e| PlannerError::from(e).with_context("import aborted"))?;
        let report = normalize(&mut imported);

        self.trip = imported;
        self.selection.select_all(&self.trip);
        info!(cities = self.trip.cities.len(), "Imported trip");

        self.persist()?;
        Ok(report)
    }

    /// The trip document exactly as it is stored
    pub fn export_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.trip).map_err(|e| {
            PlannerError::storage_with_code(
                ErrorCode::STORAGE_SERIALIZATION_ERROR,
                "Failed to serialize trip",
                None,
            )
            .with_source(e)
        })
    }

    /// Suggested file name for an export, e.g. `Italy_2025.json`
    pub fn export_file_name(&self) -> String {
        let name = name_or(&self.trip.name, "trip");
        format!("{}.json", name.split_whitespace().collect::<Vec<_>>().join("_"))
    }

    pub fn reset_to_demo(&mut self) -> Result<()> {
        self.reset_to_demo_at(Local::now().date_naive())
    }

    pub fn reset_to_demo_at(&mut self, today: CalendarDate) -> Result<()> {
        self.trip = demo_trip(today, self.config.demo_start_offset_days);
        self.selection.select_all(&self.trip);
        info!("Reset to demo trip");
        self.persist()
    }
}

/// Bring a loaded or imported trip into shape: clamp nights to
/// `1..=MAX_NIGHTS` and rebuild the days against the document itself
fn normalize(trip: &mut Trip) -> ReconcileReport {
    for city in &mut trip.cities {
        let nights = clamp_nights(i64::from(city.nights));
        if nights != city.nights {
            debug!(city = %city.id, from = city.nights, to = nights, "Clamped nights");
            city.nights = nights;
        }
    }
    let snapshot = trip.clone();
    reconcile(trip, &snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::add_days;
    use crate::itinerary::factory::MAX_NIGHTS;
    use crate::storage::MemoryStore;
    use chrono::NaiveDate;

    fn today() -> CalendarDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
    }

    fn fresh() -> Planner<MemoryStore> {
        Planner::open_at(MemoryStore::new(), Config::default(), today()).unwrap()
    }

    fn two_city_planner() -> Planner<MemoryStore> {
        let doc = serde_json::json!({
            "name": "Two cities",
            "startDate": "2025-06-01",
            "cities": [
                { "id": "a", "name": "A", "nights": 3, "color": "#111111", "days": [
                    { "id": "a0", "date": "2025-06-01", "events": [
                        { "id": "e1", "title": "First", "type": "museum" },
                        { "id": "e2", "title": "Second", "type": "walk" }
                    ]},
                    { "id": "a1", "date": "2025-06-02", "events": [] },
                    { "id": "a2", "date": "2025-06-03", "events": [] }
                ]},
                { "id": "b", "name": "B", "nights": 2, "color": "#222222", "days": [] }
            ]
        });
        Planner::open_at(
            MemoryStore::with_document(doc.to_string()),
            Config::default(),
            today(),
        )
        .unwrap()
    }

    fn event_ids(planner: &Planner<MemoryStore>, city: usize, day: usize) -> Vec<String> {
        planner.trip().cities[city].days[day]
            .events
            .iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    #[test]
    fn test_open_empty_store_seeds_demo() {
        let planner = fresh();
        assert_eq!(planner.trip().cities.len(), 3);
        assert_eq!(planner.trip().start_date, add_days(today(), 30));
        assert_eq!(planner.store().saves(), 1);
        assert!(planner
            .trip()
            .cities
            .iter()
            .all(|c| planner.selection().is_selected(&c.id)));
    }

    #[test]
    fn test_open_normalizes_stored_trip() {
        let planner = two_city_planner();
        let trip = planner.trip();

        assert_eq!(trip.cities[1].days.len(), 2);
        assert_eq!(
            trip.cities[1].days[0].date,
            NaiveDate::from_ymd_opt(2025, 6, 4).unwrap()
        );
        assert_eq!(event_ids(&planner, 0, 0), vec!["e1", "e2"]);
    }

    #[test]
    fn test_open_corrupted_store_fails() {
        let result = Planner::open_at(
            MemoryStore::with_document("[1, 2"),
            Config::default(),
            today(),
        );
        let err = result.err().expect("corrupted store must not open");
        assert_eq!(err.code(), ErrorCode::STORAGE_CORRUPTED);
    }

    #[test]
    fn test_open_floors_zero_nights() {
        let doc = serde_json::json!({
            "name": "Z",
            "startDate": "2025-01-01",
            "cities": [{ "id": "z", "name": "Z", "nights": 0 }]
        });
        let store = MemoryStore::with_document(doc.to_string());
        let planner = Planner::open_at(store, Config::default(), today()).unwrap();
        assert_eq!(planner.trip().cities[0].nights, 1);
        assert_eq!(planner.trip().cities[0].days.len(), 1);
    }

    fn nights_document(nights: serde_json::Value) -> String {
        serde_json::json!({
            "name": "Bounds",
            "startDate": "2025-01-01",
            "cities": [
                { "id": "x", "name": "X", "nights": nights },
                { "id": "y", "name": "Y", "nights": 2 }
            ]
        })
        .to_string()
    }

    #[test]
    fn test_open_clamps_out_of_range_nights() {
        for (raw, expected) in [
            (serde_json::json!(-2), 1),
            (serde_json::json!(4_000_000_000u64), MAX_NIGHTS),
        ] {
            let store = MemoryStore::with_document(nights_document(raw));
            let planner = Planner::open_at(store, Config::default(), today()).unwrap();
            let trip = planner.trip();
            assert_eq!(trip.cities[0].nights, expected);
            assert_eq!(trip.cities[0].days.len(), expected as usize);
            assert_eq!(
                trip.cities[1].days[0].date,
                add_days(trip.start_date, i64::from(expected))
            );
        }
    }

    #[test]
    fn test_import_clamps_out_of_range_nights() {
        let mut planner = two_city_planner();

        planner
            .import_json(&nights_document(serde_json::json!(-2)))
            .unwrap();
        assert_eq!(planner.trip().name, "Bounds");
        assert_eq!(planner.trip().cities[0].nights, 1);

        let report = planner
            .import_json(&nights_document(serde_json::json!(u64::MAX)))
            .unwrap();
        assert_eq!(planner.trip().cities[0].nights, MAX_NIGHTS);
        assert_eq!(report.days_built, MAX_NIGHTS as usize + 2);
    }

    #[test]
    fn test_huge_nights_are_capped_on_add_and_edit() {
        let mut planner = two_city_planner();
        let id = planner.add_city("Huge", Some(4_000_000_000), None).unwrap();
        assert_eq!(planner.trip().city(&id).unwrap().nights, MAX_NIGHTS);
        assert_eq!(
            planner.trip().city(&id).unwrap().days.len(),
            MAX_NIGHTS as usize
        );

        planner
            .edit_city(
                &CityId::from("a"),
                CityPatch {
                    nights: Some(i64::MAX),
                    ..CityPatch::default()
                },
            )
            .unwrap();
        let trip = planner.trip();
        assert_eq!(trip.cities[0].nights, MAX_NIGHTS);

        let dates: Vec<_> = trip
            .cities
            .iter()
            .flat_map(|c| &c.days)
            .map(|d| d.date)
            .collect();
        assert!(dates.windows(2).all(|w| add_days(w[0], 1) == w[1]));
    }

    #[test]
    fn test_unchanged_edit_keeps_events() {
        let mut planner = two_city_planner();
        let outcome = planner
            .edit_city(
                &CityId::from("a"),
                CityPatch {
                    nights: Some(3),
                    ..CityPatch::default()
                },
            )
            .unwrap();

        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(event_ids(&planner, 0, 0), vec!["e1", "e2"]);
        assert!(planner.trip().cities[1]
            .days
            .iter()
            .all(|d| d.events.is_empty()));
    }

    #[test]
    fn test_nights_reduction_is_destructive() {
        let mut planner = two_city_planner();
        let a = CityId::from("a");
        let b = CityId::from("b");
        let from = DaySlot::new(a.clone(), planner.trip().cities[0].days[0].id.clone());
        let to = DaySlot::new(a.clone(), planner.trip().cities[0].days[2].id.clone());
        planner
            .move_event(&from, &to, &EventId::from("e2"), 0)
            .unwrap();

        planner
            .edit_city(
                &a,
                CityPatch {
                    nights: Some(2),
                    ..CityPatch::default()
                },
            )
            .unwrap();

        assert_eq!(planner.trip().cities[0].days.len(), 2);
        assert_eq!(planner.trip().event_count(), 1);
        assert_eq!(
            planner.trip().city(&b).unwrap().days[0].date,
            NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()
        );
    }

    #[test]
    fn test_edit_city_clamps_and_falls_back() {
        let mut planner = two_city_planner();
        let a = CityId::from("a");
        planner
            .edit_city(
                &a,
                CityPatch {
                    name: Some("   ".to_string()),
                    nights: Some(-4),
                    hotel: Some("Hotel Roma".to_string()),
                },
            )
            .unwrap();

        let city = planner.trip().city(&a).unwrap();
        assert_eq!(city.name, "A");
        assert_eq!(city.nights, 1);
        assert_eq!(city.hotel.as_deref(), Some("Hotel Roma"));
        assert_eq!(city.days.len(), 1);
    }

    #[test]
    fn test_not_found_commands_do_not_save() {
        let mut planner = two_city_planner();
        let saves = planner.store().saves();
        let before = planner.trip().clone();
        let ghost = CityId::from("ghost");

        assert_eq!(
            planner.edit_city(&ghost, CityPatch::default()).unwrap(),
            Outcome::NotFound
        );
        assert_eq!(planner.remove_city(&ghost).unwrap(), Outcome::NotFound);
        assert_eq!(
            planner.set_city_color(&ghost, "#fff").unwrap(),
            Outcome::NotFound
        );
        assert_eq!(
            planner.remove_event(&EventId::from("nope")).unwrap(),
            Outcome::NotFound
        );
        assert!(planner
            .add_event(&ghost, &DayId::from("x"), NewEvent::default())
            .unwrap()
            .is_none());

        assert_eq!(planner.trip(), &before);
        assert_eq!(planner.store().saves(), saves);
    }

    #[test]
    fn test_add_city_appends_selects_and_colors() {
        let mut planner = two_city_planner();
        let id = planner.add_city("Lyon", None, Some("  ")).unwrap();

        let city = planner.trip().city(&id).unwrap();
        assert_eq!(city.nights, 2);
        assert_eq!(city.hotel, None);
        assert_eq!(city.color, planner.config().color_for(2));
        assert_eq!(
            city.days[0].date,
            NaiveDate::from_ymd_opt(2025, 6, 6).unwrap()
        );
        assert!(planner.selection().is_selected(&id));
    }

    #[test]
    fn test_remove_city_leaves_stale_selection_harmless() {
        let mut planner = two_city_planner();
        let a = CityId::from("a");
        planner.remove_city(&a).unwrap();

        assert!(planner.trip().city(&a).is_none());
        assert_eq!(planner.trip().cities[0].days[0].date, planner.trip().start_date);
        assert!(!planner
            .selection()
            .selected_cities(planner.trip())
            .iter()
            .any(|c| c.id == a));
        assert_eq!(planner.trip().event_count(), 0);
    }

    #[test]
    fn test_reorder_then_dates_follow_new_order() {
        let mut planner = two_city_planner();
        let start = planner.trip().start_date;
        planner
            .reorder_cities(&[CityId::from("b"), CityId::from("a")])
            .unwrap();

        let trip = planner.trip();
        assert_eq!(trip.cities[0].id, CityId::from("b"));
        assert_eq!(trip.cities[0].days[0].date, start);
        assert_eq!(trip.cities[1].days[0].date, add_days(start, 2));
        assert_eq!(event_ids(&planner, 1, 0), vec!["e1", "e2"]);
    }

    #[test]
    fn test_start_date_change() {
        let mut planner = two_city_planner();
        let new_start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();

        let report = planner.set_start_date(new_start).unwrap().unwrap();
        assert_eq!(report.events_kept, 2);
        assert_eq!(planner.trip().cities[1].days[1].date, add_days(new_start, 4));

        assert!(planner.set_start_date(new_start).unwrap().is_none());
    }

    #[test]
    fn test_move_event_across_cities() {
        let mut planner = two_city_planner();
        let from = DaySlot::new(
            CityId::from("a"),
            planner.trip().cities[0].days[0].id.clone(),
        );
        let to = DaySlot::new(
            CityId::from("b"),
            planner.trip().cities[1].days[1].id.clone(),
        );

        let outcome = planner
            .move_event(&from, &to, &EventId::from("e1"), 0)
            .unwrap();

        assert!(outcome.is_moved());
        assert_eq!(event_ids(&planner, 0, 0), vec!["e2"]);
        assert_eq!(event_ids(&planner, 1, 1), vec!["e1"]);
        assert_eq!(planner.trip().event_count(), 2);
    }

    #[test]
    fn test_ticket_required_off_clears_bought() {
        let mut planner = two_city_planner();
        let e1 = EventId::from("e1");
        planner
            .edit_event(
                &e1,
                EventPatch {
                    ticket_required: Some(true),
                    ticket_bought: Some(true),
                    ..EventPatch::default()
                },
            )
            .unwrap();
        assert!(planner.trip().event(&e1).unwrap().ticket_bought);

        planner
            .edit_event(
                &e1,
                EventPatch {
                    ticket_required: Some(false),
                    ..EventPatch::default()
                },
            )
            .unwrap();
        assert!(!planner.trip().event(&e1).unwrap().ticket_bought);

        planner.set_ticket_bought(&e1, true).unwrap();
        assert!(!planner.trip().event(&e1).unwrap().ticket_bought);
    }

    #[test]
    fn test_edit_event_fields() {
        let mut planner = two_city_planner();
        let e2 = EventId::from("e2");
        planner
            .edit_event(
                &e2,
                EventPatch {
                    title: Some(" ".to_string()),
                    event_type: Some(EventType::Food),
                    start_time: Some(" 19:30 ".to_string()),
                    link: Some("https://example.org".to_string()),
                    notes: Some("book ahead".to_string()),
                    ..EventPatch::default()
                },
            )
            .unwrap();

        let event = planner.trip().event(&e2).unwrap();
        assert_eq!(event.title, "Second");
        assert_eq!(event.event_type, EventType::Food);
        assert_eq!(event.start_time, "19:30");
        assert_eq!(event.link.as_deref(), Some("https://example.org"));
        assert_eq!(event.notes, "book ahead");
    }

    #[test]
    fn test_add_and_remove_event() {
        let mut planner = two_city_planner();
        let b = CityId::from("b");
        let day = planner.trip().cities[1].days[0].id.clone();

        let id = planner
            .add_event(&b, &day, NewEvent::default())
            .unwrap()
            .unwrap();
        let event = planner.trip().event(&id).unwrap();
        assert_eq!(event.title, "New event");
        assert_eq!(event.event_type, EventType::Walk);

        assert_eq!(planner.remove_event(&id).unwrap(), Outcome::Applied);
        assert!(planner.trip().event(&id).is_none());
    }

    #[test]
    fn test_save_failure_keeps_mutation() {
        let mut planner = two_city_planner();
        planner.store.fail_writes(true);

        let err = planner.rename_trip("Offline").unwrap_err();
        assert!(err.is_storage());
        assert_eq!(err.code(), ErrorCode::STORAGE_WRITE_FAILED);
        assert_eq!(planner.trip().name, "Offline");

        planner.store.fail_writes(false);
        planner.rename_trip("Online").unwrap();
        let stored = planner.store().load().unwrap().unwrap();
        assert_eq!(stored.name, "Online");
    }

    #[test]
    fn test_rename_blank_keeps_name() {
        let mut planner = two_city_planner();
        planner.rename_trip("  ").unwrap();
        assert_eq!(planner.trip().name, "Two cities");
        assert_eq!(planner.export_file_name(), "Two_cities.json");
    }

    #[test]
    fn test_import_malformed_leaves_state() {
        let mut planner = two_city_planner();
        let before = planner.trip().clone();
        let saves = planner.store().saves();

        let err = planner.import_json("{\"name\": 42}").unwrap_err();
        assert_eq!(err.exit_code(), 5);
        assert!(err.to_string().contains("import aborted"));
        assert_eq!(planner.trip(), &before);
        assert_eq!(planner.store().saves(), saves);
    }

    #[test]
    fn test_import_export_round_trip_resets_selection() {
        let mut source = fresh();
        let exported = source.export_json().unwrap();
        source.select_none();

        let mut planner = two_city_planner();
        planner.select_none();
        planner.import_json(&exported).unwrap();

        assert_eq!(planner.trip().name, source.trip().name);
        assert_eq!(planner.trip().event_count(), source.trip().event_count());
        assert_eq!(
            planner.selection().selected_cities(planner.trip()).len(),
            3
        );
    }

    #[test]
    fn test_selection_commands() {
        let mut planner = two_city_planner();
        let a = CityId::from("a");

        planner.deselect(&a);
        assert!(!planner.selection().is_selected(&a));
        assert!(planner.toggle_selection(&a));
        planner.select_none();
        assert!(planner.selection().is_empty());
        planner.select(&CityId::from("ghost"));
        planner.select_all();
        assert_eq!(planner.selection().len(), 2);
    }

    #[test]
    fn test_find_city_by_id_or_name() {
        let planner = two_city_planner();
        assert_eq!(planner.find_city("a").unwrap().name, "A");
        assert_eq!(planner.find_city(" b ").unwrap().id, CityId::from("b"));
        assert!(planner.find_city("nowhere").is_none());
    }

    #[test]
    fn test_reset_to_demo() {
        let mut planner = two_city_planner();
        planner.reset_to_demo_at(today()).unwrap();
        assert_eq!(planner.trip().name, "Italy 2025");
        assert_eq!(planner.selection().len(), 3);
    }
}

//! Event relocation and city reordering
//!
//! Moving an event never touches the day structure, so it bypasses
//! reconciliation. Reordering cities does change every later date; callers
//! must reconcile afterwards.

use tracing::debug;

use super::types::{CityId, DayId, EventId, Trip};

/// Result of [`move_event`]. Anything but `Moved` left the trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { index: usize },
    CityNotFound,
    DayNotFound,
    EventNotFound,
}

impl MoveOutcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, MoveOutcome::Moved { .. })
    }
}

/// Source or destination of an event move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot {
    pub city_id: CityId,
    pub day_id: DayId,
}

impl DaySlot {
    pub fn new(city_id: CityId, day_id: DayId) -> Self {
        Self { city_id, day_id }
    }

    fn resolve(&self, trip: &Trip) -> Result<(usize, usize), MoveOutcome> {
        let city_index = trip
            .cities
            .iter()
            .position(|c| c.id == self.city_id)
            .ok_or(MoveOutcome::CityNotFound)?;
        let day_index = trip.cities[city_index]
            .days
            .iter()
            .position(|d| d.id == self.day_id)
            .ok_or(MoveOutcome::DayNotFound)?;
        Ok((city_index, day_index))
    }
}

/// Take `event_id` out of `from` and insert it into `to` at `to_index`,
/// clamped to the destination length after removal. A same-day reorder is
/// `from == to`.
pub fn move_event(
    trip: &mut Trip,
    from: &DaySlot,
    to: &DaySlot,
    event_id: &EventId,
    to_index: usize,
) -> MoveOutcome {
    let ((from_city, from_day), (to_city, to_day)) = match (from.resolve(trip), to.resolve(trip))
    {
        (Ok(src), Ok(dst)) => (src, dst),
        (Err(outcome), _) | (_, Err(outcome)) => {
            debug!(event = %event_id, ?outcome, "Event move skipped");
            return outcome;
        }
    };

    let source = &mut trip.cities[from_city].days[from_day].events;
    let Some(position) = source.iter().position(|e| &e.id == event_id) else {
        debug!(event = %event_id, "Event move skipped: not in source day");
        return MoveOutcome::EventNotFound;
    };
    let event = source.remove(position);

    let destination = &mut trip.cities[to_city].days[to_day].events;
    let index = to_index.min(destination.len());
    destination.insert(index, event);

    debug!(event = %event_id, to_city = %to.city_id, index, "Moved event");
    MoveOutcome::Moved { index }
}

/// Sort `trip.cities` to follow `order`. Unknown ids are ignored; cities not
/// named keep their relative order after the named ones.
pub fn reorder_cities(trip: &mut Trip, order: &[CityId]) {
    let rank = |id: &CityId| order.iter().position(|o| o == id).unwrap_or(order.len());
    // sort_by_key is stable, which keeps unnamed cities in relative order
    trip.cities.sort_by_key(|c| rank(&c.id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::itinerary::dates::add_days;
    use crate::itinerary::factory::{new_city, new_event};
    use crate::itinerary::reconcile::reconcile;
    use crate::itinerary::types::EventType;
    use chrono::NaiveDate;

    fn sample() -> Trip {
        let mut trip = Trip {
            cities: vec![
                new_city("A", 2, None, None),
                new_city("B", 2, None, None),
                new_city("C", 1, None, None),
            ],
            ..Trip::new("Moves", NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
        };
        let empty = trip.clone();
        reconcile(&mut trip, &empty);
        for title in ["a0-first", "a0-second", "a0-third"] {
            trip.cities[0].days[0]
                .events
                .push(new_event(title, EventType::Walk, None, None, None, false));
        }
        trip
    }

    fn slot(trip: &Trip, city: usize, day: usize) -> DaySlot {
        DaySlot::new(
            trip.cities[city].id.clone(),
            trip.cities[city].days[day].id.clone(),
        )
    }

    fn titles(trip: &Trip, city: usize, day: usize) -> Vec<&str> {
        trip.cities[city].days[day]
            .events
            .iter()
            .map(|e| e.title.as_str())
            .collect()
    }

    #[test]
    fn test_move_across_cities() {
        let mut trip = sample();
        let before = trip.event_count();
        let id = trip.cities[0].days[0].events[0].id.clone();
        let (from, to) = (slot(&trip, 0, 0), slot(&trip, 1, 1));

        let outcome = move_event(&mut trip, &from, &to, &id, 0);

        assert_eq!(outcome, MoveOutcome::Moved { index: 0 });
        assert!(trip.cities[0].days[0].events.iter().all(|e| e.id != id));
        assert_eq!(trip.cities[1].days[1].events[0].id, id);
        assert_eq!(trip.event_count(), before);
    }

    #[test]
    fn test_same_day_reorder() {
        let mut trip = sample();
        let id = trip.cities[0].days[0].events[0].id.clone();
        let here = slot(&trip, 0, 0);

        move_event(&mut trip, &here, &here, &id, 2);

        assert_eq!(
            titles(&trip, 0, 0),
            vec!["a0-second", "a0-third", "a0-first"]
        );
    }

    #[test]
    fn test_index_is_clamped() {
        let mut trip = sample();
        let id = trip.cities[0].days[0].events[1].id.clone();
        let (from, to) = (slot(&trip, 0, 0), slot(&trip, 2, 0));

        let outcome = move_event(&mut trip, &from, &to, &id, 99);

        assert_eq!(outcome, MoveOutcome::Moved { index: 0 });
        assert_eq!(titles(&trip, 2, 0), vec!["a0-second"]);
    }

    #[test]
    fn test_not_found_is_noop() {
        let mut trip = sample();
        let before = trip.clone();
        let id = trip.cities[0].days[0].events[0].id.clone();
        let from = slot(&trip, 0, 0);
        let to = slot(&trip, 1, 0);

        let missing_city = DaySlot::new(CityId::from("nope"), to.day_id.clone());
        assert_eq!(
            move_event(&mut trip, &from, &missing_city, &id, 0),
            MoveOutcome::CityNotFound
        );

        let missing_day = DaySlot::new(to.city_id.clone(), DayId::from("nope"));
        assert_eq!(
            move_event(&mut trip, &missing_day, &to, &id, 0),
            MoveOutcome::DayNotFound
        );

        // event lives in A day 0, not in B day 0
        assert_eq!(
            move_event(&mut trip, &to, &from, &id, 0),
            MoveOutcome::EventNotFound
        );

        assert_eq!(trip, before);
    }

    #[test]
    fn test_reorder_cities_then_reconcile() {
        let mut trip = sample();
        let start = trip.start_date;
        let (a, b) = (trip.cities[0].id.clone(), trip.cities[1].id.clone());

        let previous = trip.clone();
        reorder_cities(&mut trip, &[b.clone(), a.clone()]);
        reconcile(&mut trip, &previous);

        let names: Vec<&str> = trip.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(trip.cities[0].days[0].date, start);
        assert_eq!(trip.cities[1].days[0].date, add_days(start, 2));
        assert_eq!(trip.cities[1].days[0].events.len(), 3);
    }

    #[test]
    fn test_reorder_ignores_unknown_ids() {
        let mut trip = sample();
        let c = trip.cities[2].id.clone();

        reorder_cities(&mut trip, &[CityId::from("ghost"), c]);

        let names: Vec<&str> = trip.cities.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}

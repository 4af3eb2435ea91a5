//! Day-sequence reconciliation
//!
//! After any structural edit (start date, nights, city order or city
//! membership) the day list of every city is rebuilt from scratch:
//!
//! 1. Prior events are indexed by city id, one list per prior day.
//! 2. Cities are walked in their current order with a running date that
//!    starts at the trip start date.
//! 3. Each city gets exactly `nights` fresh days; day `i` receives the
//!    events of the city's prior day `i`, if it had one.
//!
//! Days are correlated by index, never by date. Prior days past the new
//! nights count are dropped together with their events, and cities missing
//! from the trip contribute nothing. Day identifiers are re-minted on every
//! pass.

use std::collections::HashMap;
use tracing::{debug, trace};

use super::dates::add_days;
use super::factory::new_day;
use super::types::{CityId, Event, Trip};

/// What a reconciliation pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Days constructed across all cities
    pub days_built: usize,
    /// Prior events reattached to a new day
    pub events_kept: usize,
    /// Prior events that had no day to go to
    pub events_dropped: usize,
}

/// Rebuild every city's days in `trip`, carrying events over from
/// `previous` by (city id, day index). `previous` is only read.
pub fn reconcile(trip: &mut Trip, previous: &Trip) -> ReconcileReport {
    let prior: HashMap<&CityId, Vec<&[Event]>> = previous
        .cities
        .iter()
        .map(|city| {
            let per_day = city.days.iter().map(|d| d.events.as_slice()).collect();
            (&city.id, per_day)
        })
        .collect();

    let mut report = ReconcileReport::default();
    let mut running_date = trip.start_date;

    for city in &mut trip.cities {
        let prior_days = prior.get(&city.id).map(Vec::as_slice).unwrap_or_default();
        let nights = city.nights as usize;

        city.days = (0..nights)
            .map(|i| {
                let mut day = new_day(running_date);
                if let Some(events) = prior_days.get(i) {
                    day.events = events.to_vec();
                    report.events_kept += events.len();
                }
                running_date = add_days(running_date, 1);
                day
            })
            .collect();
        report.days_built += city.days.len();

        trace!(
            city = %city.id,
            nights,
            first_day = ?city.days.first().map(|d| d.date),
            "Rebuilt city days"
        );
    }

    report.events_dropped = previous.event_count().saturating_sub(report.events_kept);

    debug!(
        days = report.days_built,
        kept = report.events_kept,
        dropped = report.events_dropped,
        "Reconciled trip days"
    );

    report
}

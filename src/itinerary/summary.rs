//! Read-only views derived from a trip and the current selection

use serde::Serialize;

use super::dates::{add_days, CalendarDate};
use super::selection::Selection;
use super::types::{City, Day, Event, Trip};

/// First and last calendar day of the trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TripRange {
    pub first: CalendarDate,
    pub last: CalendarDate,
}

/// `None` when the trip has no nights at all
pub fn trip_range(trip: &Trip) -> Option<TripRange> {
    let nights = i64::try_from(trip.total_nights()).ok()?;
    if nights == 0 {
        return None;
    }
    Some(TripRange {
        first: trip.start_date,
        last: add_days(trip.start_date, nights - 1),
    })
}

/// A ticketed event with the date it happens on
#[derive(Debug, Clone, Serialize)]
pub struct TicketEntry<'a> {
    pub date: CalendarDate,
    pub event: &'a Event,
}

#[derive(Debug, Clone, Serialize)]
pub struct CityTickets<'a> {
    pub city: &'a City,
    pub tickets: Vec<TicketEntry<'a>>,
}

/// Events that require a ticket, grouped by selected city. Cities without
/// ticketed events are left out.
pub fn ticket_list<'a>(trip: &'a Trip, selection: &Selection) -> Vec<CityTickets<'a>> {
    selection
        .selected_cities(trip)
        .into_iter()
        .map(|city| CityTickets {
            city,
            tickets: city
                .days
                .iter()
                .flat_map(|day| {
                    day.events
                        .iter()
                        .filter(|e| e.ticket_required)
                        .map(move |event| TicketEntry {
                            date: day.date,
                            event,
                        })
                })
                .collect(),
        })
        .filter(|group| !group.tickets.is_empty())
        .collect()
}

/// Role of a day within a city stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Arrival,
    Departure,
    Full,
}

impl DayKind {
    /// Index 0 is the arrival, the last index the departure. A single-day
    /// stay counts as an arrival.
    pub fn of(day_index: usize, day_count: usize) -> Self {
        if day_index == 0 {
            DayKind::Arrival
        } else if day_index + 1 == day_count {
            DayKind::Departure
        } else {
            DayKind::Full
        }
    }

    /// Kind of day `day_index` of `city`, honouring the city's
    /// `firstDayType` / `lastDayType` overrides when they name a known kind
    pub fn for_day(city: &City, day_index: usize) -> Self {
        let count = city.days.len();
        let first = (day_index == 0)
            .then(|| city.first_day_type.as_deref().and_then(Self::parse))
            .flatten();
        let last = (day_index + 1 == count)
            .then(|| city.last_day_type.as_deref().and_then(Self::parse))
            .flatten();
        first
            .or(last)
            .unwrap_or_else(|| Self::of(day_index, count))
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "arrival" => Some(DayKind::Arrival),
            "departure" => Some(DayKind::Departure),
            "full" => Some(DayKind::Full),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DayKind::Arrival => "arrival",
            DayKind::Departure => "departure",
            DayKind::Full => "full day",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry<'a> {
    /// 1-based position among the listed days
    pub number: usize,
    pub city: &'a City,
    pub day: &'a Day,
    pub kind: DayKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimelineTotals {
    pub days: usize,
    pub events: usize,
    pub pending_tickets: usize,
    pub cities: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Timeline<'a> {
    pub entries: Vec<TimelineEntry<'a>>,
    pub totals: TimelineTotals,
}

/// Continuous day-by-day listing of the selected cities
pub fn timeline<'a>(trip: &'a Trip, selection: &Selection) -> Timeline<'a> {
    let cities = selection.selected_cities(trip);
    let entries: Vec<TimelineEntry<'a>> = cities
        .iter()
        .copied()
        .flat_map(|city| {
            city.days.iter().enumerate().map(move |(i, day)| (city, i, day))
        })
        .enumerate()
        .map(|(n, (city, i, day))| TimelineEntry {
            number: n + 1,
            city,
            day,
            kind: DayKind::for_day(city, i),
        })
        .collect();

    let totals = TimelineTotals {
        days: entries.len(),
        events: entries.iter().map(|e| e.day.events.len()).sum(),
        pending_tickets: entries
            .iter()
            .flat_map(|e| &e.day.events)
            .filter(|e| e.ticket_pending())
            .count(),
        cities: cities.len(),
    };

    Timeline { entries, totals }
}

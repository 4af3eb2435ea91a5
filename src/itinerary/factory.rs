//! Constructors for fresh trip entities
//!
//! Every record built here gets a newly minted identifier and the default
//! field values the planner relies on. Input clamping for user-supplied
//! values (nights, blank names) also lives here so the reconciliation
//! engine can assume well-formed input.

use super::dates::CalendarDate;
use super::types::{
    City, CityId, Day, DayId, Event, EventId, EventType, ExtraFields, DEFAULT_CITY_COLOR,
};

/// Name used for a city created or renamed with a blank name
pub const PLACEHOLDER_CITY_NAME: &str = "New city";

/// Title used for an event created with a blank title
pub const PLACEHOLDER_EVENT_TITLE: &str = "New event";

/// Longest stay a single city can have
pub const MAX_NIGHTS: u32 = 365;

/// Clamp a nights count to `1..=MAX_NIGHTS`
#[must_use]
pub fn clamp_nights(nights: i64) -> u32 {
    let clamped = nights.clamp(1, i64::from(MAX_NIGHTS));
    u32::try_from(clamped).unwrap_or(MAX_NIGHTS)
}

/// Trimmed `candidate`, or `fallback` when the candidate is blank
#[must_use]
pub fn name_or(candidate: &str, fallback: &str) -> String {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Build a city with no days; reconciliation fills them in
#[must_use]
pub fn new_city(name: &str, nights: i64, hotel: Option<&str>, color: Option<&str>) -> City {
    City {
        id: CityId::generate(),
        name: name_or(name, PLACEHOLDER_CITY_NAME),
        nights: clamp_nights(nights),
        hotel: non_blank(hotel),
        color: non_blank(color).unwrap_or_else(|| DEFAULT_CITY_COLOR.to_string()),
        first_day_type: None,
        last_day_type: None,
        days: Vec::new(),
        extra: ExtraFields::new(),
    }
}

#[must_use]
pub fn new_day(date: CalendarDate) -> Day {
    Day {
        id: DayId::generate(),
        date,
        events: Vec::new(),
        extra: ExtraFields::new(),
    }
}

/// Build an event. `ticket_bought` always starts out false.
#[must_use]
pub fn new_event(
    title: &str,
    event_type: EventType,
    start: Option<&str>,
    end: Option<&str>,
    link: Option<&str>,
    ticket_required: bool,
) -> Event {
    Event {
        id: EventId::generate(),
        title: name_or(title, PLACEHOLDER_EVENT_TITLE),
        event_type,
        start_time: start.map(str::trim).unwrap_or_default().to_string(),
        end_time: end.map(str::trim).unwrap_or_default().to_string(),
        link: non_blank(link),
        notes: String::new(),
        ticket_required,
        ticket_bought: false,
        extra: ExtraFields::new(),
    }
}

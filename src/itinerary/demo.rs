//! Sample trip used on first run and on reset

use super::dates::{add_days, CalendarDate};
use super::factory::{new_city, new_day, new_event};
use super::reconcile::reconcile;
use super::types::{Event, EventType, Trip};

fn ev(
    title: &str,
    event_type: EventType,
    start: &str,
    end: &str,
    link: &str,
    ticket_required: bool,
) -> Event {
    new_event(
        title,
        event_type,
        Some(start),
        Some(end),
        Some(link),
        ticket_required,
    )
}

/// Three-city Italy trip starting `offset_days` after `today`
pub fn demo_trip(today: CalendarDate, offset_days: i64) -> Trip {
    use EventType::*;

    let plan: [(&str, i64, &str, &str, Vec<Vec<Event>>); 3] = [
        (
            "Rome",
            4,
            "Hotel Artemide",
            "#e74c3c",
            vec![
                vec![
                    ev("Colosseum", Museum, "10:00", "13:00", "https://colosseum.it", true),
                    ev("Trastevere", Neighborhood, "afternoon", "", "", false),
                ],
                vec![
                    ev("Vatican Museums", Museum, "09:00", "14:00", "https://vatican.va", true),
                    ev("Dinner in Testaccio", Food, "20:00", "", "", false),
                ],
                vec![
                    ev("Pantheon", Architecture, "morning", "", "", false),
                    ev("Piazza Navona", Walk, "", "", "", false),
                ],
                vec![ev("Galleria Borghese", Art, "10:00", "12:00", "", true)],
            ],
        ),
        (
            "Florence",
            3,
            "Hotel Davanzati",
            "#9b59b6",
            vec![
                vec![
                    ev("Duomo", Architecture, "morning", "", "", false),
                    ev("San Lorenzo Market", Market, "noon", "", "", false),
                ],
                vec![
                    ev("Uffizi", Museum, "09:00", "13:00", "", true),
                    ev("Ponte Vecchio", Walk, "afternoon", "", "", false),
                ],
                vec![ev("San Gimignano", Tour, "all day", "", "", false)],
            ],
        ),
        (
            "Venice",
            2,
            "Ca' Pisani",
            "#3498db",
            vec![
                vec![
                    ev("St Mark's Square", Architecture, "morning", "", "", false),
                    ev("Gondola ride", Tour, "afternoon", "", "https://gondola.it", true),
                ],
                vec![ev("Murano and Burano", Tour, "all day", "", "", false)],
            ],
        ),
    ];

    let mut seed = Trip::new("Italy 2025", add_days(today, offset_days));

    for (name, nights, hotel, color, days) in plan {
        let mut city = new_city(name, nights, Some(hotel), Some(color));
        for events in days {
            let mut day = new_day(seed.start_date);
            day.events = events;
            city.days.push(day);
        }
        seed.cities.push(city);
    }

    // Seeded days carry placeholder dates; reconciling derives the real ones
    let snapshot = seed.clone();
    reconcile(&mut seed, &snapshot);
    seed
}

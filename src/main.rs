use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

use trip_planner::config::Config;
use trip_planner::error::{describe_error_code, PlannerError};
use trip_planner::itinerary::dates::{format_date, format_date_long, parse_date};
use trip_planner::itinerary::summary::{ticket_list, timeline, trip_range};
use trip_planner::itinerary::{CityId, DaySlot, Event, EventId, EventType, MoveOutcome};
use trip_planner::planner::{CityPatch, EventPatch, NewEvent, Outcome, Planner};
use trip_planner::storage::JsonFileStore;

/// Plan multi-city trips day by day
#[derive(Parser)]
#[command(name = "trip-planner")]
#[command(about = "Plan multi-city trips day by day", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the trip document
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CityFilter {
    /// Only show these cities (id or name, repeatable)
    #[arg(long)]
    city: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show cities, days and events
    Show {
        #[command(flatten)]
        filter: CityFilter,
    },
    /// Continuous day-by-day listing with totals
    Timeline {
        #[command(flatten)]
        filter: CityFilter,
    },
    /// Events that need a ticket, grouped by city
    Tickets {
        #[command(flatten)]
        filter: CityFilter,
    },
    /// Rename the trip
    Rename { name: String },
    /// Set the trip start date (YYYY-MM-DD)
    Start { date: String },
    /// Manage cities
    City {
        #[command(subcommand)]
        command: CityCommands,
    },
    /// Manage events
    Event {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Write the trip document to a file, or stdout
    Export { path: Option<PathBuf> },
    /// Replace the trip with a JSON document
    Import { path: PathBuf },
    /// Replace the trip with the demo itinerary
    Reset,
}

#[derive(Subcommand)]
enum CityCommands {
    /// Append a city to the trip
    Add {
        name: String,
        #[arg(long, allow_negative_numbers = true)]
        nights: Option<i64>,
        #[arg(long)]
        hotel: Option<String>,
    },
    /// Change a city's name, nights or hotel
    Edit {
        city: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        nights: Option<i64>,
        /// Empty string clears the hotel
        #[arg(long)]
        hotel: Option<String>,
    },
    /// Remove a city and all its events
    Remove { city: String },
    /// Change a city's display color
    Color { city: String, color: String },
    /// Put cities in the given order; unnamed cities follow
    Reorder {
        #[arg(required = true)]
        cities: Vec<String>,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Add an event to a day (1-based day number within the city)
    Add {
        city: String,
        day: usize,
        title: String,
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        link: Option<String>,
        /// The event needs a ticket
        #[arg(long)]
        ticket: bool,
    },
    /// Change an event
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long = "type")]
        event_type: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Empty string clears the link
        #[arg(long)]
        link: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        ticket_required: Option<bool>,
    },
    /// Delete an event
    Remove { id: String },
    /// Move an event to another day, or reorder within a day
    Move {
        id: String,
        /// Destination city (id or name)
        #[arg(long)]
        to_city: String,
        /// Destination day number within the city
        #[arg(long)]
        to_day: usize,
        /// Position within the destination day (default: last)
        #[arg(long)]
        index: Option<usize>,
    },
    /// Record whether the ticket has been bought
    Ticket {
        id: String,
        #[arg(long, conflicts_with = "not_bought")]
        bought: bool,
        #[arg(long)]
        not_bought: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            std::process::exit(e.exit_code());
        }
    };

    let log_level = match cli.verbose {
        0 => config.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("trip-planner started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli.command, config) {
        error!("Fatal error: {:#}", e);
        let code = match e.downcast_ref::<PlannerError>() {
            Some(planner_error) => {
                debug!(
                    code = planner_error.code(),
                    kind = describe_error_code(planner_error.code()),
                    "Command failed"
                );
                eprintln!("Error: {}", planner_error.user_message());
                planner_error.exit_code()
            }
            None => {
                eprintln!("Error: {e:#}");
                1
            }
        };
        std::process::exit(code);
    }
}

fn load_config(cli: &Cli) -> trip_planner::Result<Config> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    Ok(config)
}

fn run(command: Commands, config: Config) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&config.data_dir, config.document_file.clone());
    let mut planner = Planner::open(store, config)?;

    match command {
        Commands::Show { filter } => {
            if apply_filter(&mut planner, &filter) {
                print_show(&planner);
            }
        }
        Commands::Timeline { filter } => {
            if apply_filter(&mut planner, &filter) {
                print_timeline(&planner);
            }
        }
        Commands::Tickets { filter } => {
            if apply_filter(&mut planner, &filter) {
                print_tickets(&planner);
            }
        }
        Commands::Rename { name } => {
            planner.rename_trip(&name)?;
            println!("Trip renamed to '{}'", planner.trip().name);
        }
        Commands::Start { date } => {
            let date = parse_date(&date)?;
            planner.set_start_date(date)?;
            println!("Trip starts {}", format_date_long(date));
        }
        Commands::City { command } => run_city_command(&mut planner, command)?,
        Commands::Event { command } => run_event_command(&mut planner, command)?,
        Commands::Export { path } => {
            let json = planner.export_json()?;
            match path {
                Some(path) => {
                    let path = if path.is_dir() {
                        path.join(planner.export_file_name())
                    } else {
                        path
                    };
                    fs::write(&path, json)
                        .map_err(|e| PlannerError::from(e).with_context(path.display()))?;
                    println!("Exported trip to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Import { path } => {
            let text = fs::read_to_string(&path)
                .map_err(|e| PlannerError::from(e).with_context(path.display()))?;
            let report = planner.import_json(&text)?;
            println!(
                "Imported '{}': {} cities, {} days",
                planner.trip().name,
                planner.trip().cities.len(),
                report.days_built
            );
        }
        Commands::Reset => {
            planner.reset_to_demo()?;
            println!("Trip reset to '{}'", planner.trip().name);
        }
    }

    Ok(())
}

fn run_city_command(
    planner: &mut Planner<JsonFileStore>,
    command: CityCommands,
) -> anyhow::Result<()> {
    match command {
        CityCommands::Add {
            name,
            nights,
            hotel,
        } => {
            let id = planner.add_city(&name, nights, hotel.as_deref())?;
            if let Some(city) = planner.trip().city(&id) {
                println!("Added {} ({} nights) [{}]", city.name, city.nights, city.id);
            }
        }
        CityCommands::Edit {
            city,
            name,
            nights,
            hotel,
        } => {
            let Some(id) = city_id(planner, &city) else {
                return Ok(());
            };
            let outcome = planner.edit_city(
                &id,
                CityPatch {
                    name,
                    nights,
                    hotel,
                },
            )?;
            report_outcome(outcome, "city", &city, "Updated city");
        }
        CityCommands::Remove { city } => {
            let Some(id) = city_id(planner, &city) else {
                return Ok(());
            };
            let outcome = planner.remove_city(&id)?;
            report_outcome(outcome, "city", &city, "Removed city");
        }
        CityCommands::Color { city, color } => {
            let Some(id) = city_id(planner, &city) else {
                return Ok(());
            };
            let outcome = planner.set_city_color(&id, &color)?;
            report_outcome(outcome, "city", &city, "Updated color");
        }
        CityCommands::Reorder { cities } => {
            let mut order = Vec::with_capacity(cities.len());
            for reference in &cities {
                match city_id(planner, reference) {
                    Some(id) => order.push(id),
                    None => return Ok(()),
                }
            }
            planner.reorder_cities(&order)?;
            let names: Vec<&str> = planner.trip().cities.iter().map(|c| c.name.as_str()).collect();
            println!("City order: {}", names.join(" -> "));
        }
    }
    Ok(())
}

fn run_event_command(
    planner: &mut Planner<JsonFileStore>,
    command: EventCommands,
) -> anyhow::Result<()> {
    match command {
        EventCommands::Add {
            city,
            day,
            title,
            event_type,
            start,
            end,
            link,
            ticket,
        } => {
            let Some(slot) = day_slot(planner, &city, day) else {
                return Ok(());
            };
            let spec = NewEvent {
                title,
                event_type: event_type.map(EventType::from).unwrap_or(EventType::Walk),
                start_time: start,
                end_time: end,
                link,
                ticket_required: ticket,
            };
            match planner.add_event(&slot.city_id, &slot.day_id, spec)? {
                Some(id) => println!("Added event [{id}]"),
                None => println!("No day {day} in '{city}'"),
            }
        }
        EventCommands::Edit {
            id,
            title,
            event_type,
            start,
            end,
            link,
            notes,
            ticket_required,
        } => {
            let patch = EventPatch {
                title,
                event_type: event_type.map(EventType::from),
                start_time: start,
                end_time: end,
                link,
                notes,
                ticket_required,
                ticket_bought: None,
            };
            let outcome = planner.edit_event(&EventId::from(id.as_str()), patch)?;
            report_outcome(outcome, "event", &id, "Updated event");
        }
        EventCommands::Remove { id } => {
            let outcome = planner.remove_event(&EventId::from(id.as_str()))?;
            report_outcome(outcome, "event", &id, "Removed event");
        }
        EventCommands::Move {
            id,
            to_city,
            to_day,
            index,
        } => {
            let event_id = EventId::from(id.as_str());
            let Some(loc) = planner.trip().locate_event(&event_id) else {
                println!("No event matches '{id}'");
                return Ok(());
            };
            let from = {
                let city = &planner.trip().cities[loc.city_index];
                DaySlot::new(city.id.clone(), city.days[loc.day_index].id.clone())
            };
            let Some(to) = day_slot(planner, &to_city, to_day) else {
                return Ok(());
            };

            match planner.move_event(&from, &to, &event_id, index.unwrap_or(usize::MAX))? {
                MoveOutcome::Moved { index } => {
                    println!("Moved event to day {to_day} of {to_city} at position {}", index + 1)
                }
                outcome => println!("Event not moved: {outcome:?}"),
            }
        }
        EventCommands::Ticket {
            id,
            bought,
            not_bought,
        } => {
            let event_id = EventId::from(id.as_str());
            let bought = bought && !not_bought;
            let outcome = planner.set_ticket_bought(&event_id, bought)?;
            if outcome.is_applied() {
                match planner.trip().event(&event_id) {
                    Some(event) if !event.ticket_required => {
                        println!("'{}' does not require a ticket", event.title)
                    }
                    Some(event) => println!(
                        "Ticket for '{}' marked as {}",
                        event.title,
                        if event.ticket_bought { "bought" } else { "not bought" }
                    ),
                    None => {}
                }
            } else {
                println!("No event matches '{id}'");
            }
        }
    }
    Ok(())
}

fn report_outcome(outcome: Outcome, kind: &str, reference: &str, done: &str) {
    match outcome {
        Outcome::Applied => println!("{done}"),
        Outcome::NotFound => println!("No {kind} matches '{reference}'"),
    }
}

fn city_id(planner: &Planner<JsonFileStore>, reference: &str) -> Option<CityId> {
    let id = planner.find_city(reference).map(|c| c.id.clone());
    if id.is_none() {
        println!("No city matches '{reference}'");
    }
    id
}

fn day_slot(planner: &Planner<JsonFileStore>, city: &str, day: usize) -> Option<DaySlot> {
    let found = city_id(planner, city)?;
    let slot = planner
        .trip()
        .city(&found)
        .and_then(|c| c.day_number(day))
        .map(|d| DaySlot::new(found.clone(), d.id.clone()));
    if slot.is_none() {
        println!("No day {day} in '{city}'");
    }
    slot
}

/// Narrow the selection to the named cities. Returns false when one of
/// them does not exist.
fn apply_filter(planner: &mut Planner<JsonFileStore>, filter: &CityFilter) -> bool {
    if filter.city.is_empty() {
        return true;
    }
    let mut ids = Vec::with_capacity(filter.city.len());
    for reference in &filter.city {
        match city_id(planner, reference) {
            Some(id) => ids.push(id),
            None => return false,
        }
    }
    planner.select_none();
    for id in &ids {
        planner.select(id);
    }
    true
}

fn event_line(event: &Event) -> String {
    let time = match (event.start_time.is_empty(), event.end_time.is_empty()) {
        (false, false) => format!("{}-{} ", event.start_time, event.end_time),
        (false, true) => format!("{} ", event.start_time),
        _ => String::new(),
    };
    let ticket = match (event.ticket_required, event.ticket_bought) {
        (true, true) => " (ticket bought)",
        (true, false) => " (ticket needed)",
        _ => "",
    };
    format!(
        "{} {}{}{} [{}]",
        event.event_type.icon(),
        time,
        event.title,
        ticket,
        event.id
    )
}

fn print_show(planner: &Planner<JsonFileStore>) {
    let trip = planner.trip();
    match trip_range(trip) {
        Some(range) => println!(
            "{} ({} to {}, {} nights)",
            trip.name,
            format_date(range.first),
            format_date(range.last),
            trip.total_nights()
        ),
        None => println!("{} (no nights planned)", trip.name),
    }

    for city in planner.selection().selected_cities(trip) {
        let hotel = city
            .hotel
            .as_deref()
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(|h| format!(", {h}"))
            .unwrap_or_default();
        println!();
        println!("{} - {} nights{} [{}]", city.name, city.nights, hotel, city.id);
        for (i, day) in city.days.iter().enumerate() {
            println!("  Day {}  {}", i + 1, format_date_long(day.date));
            for event in &day.events {
                println!("    {}", event_line(event));
                if !event.notes.is_empty() {
                    println!("      {}", event.notes);
                }
            }
        }
    }
}

fn print_timeline(planner: &Planner<JsonFileStore>) {
    let view = timeline(planner.trip(), planner.selection());
    for entry in &view.entries {
        println!(
            "{:>3}  {}  {} ({})",
            entry.number,
            format_date_long(entry.day.date),
            entry.city.name,
            entry.kind.label()
        );
        for event in &entry.day.events {
            println!("       {}", event_line(event));
        }
    }
    let totals = &view.totals;
    println!(
        "{} days, {} events, {} tickets to buy, {} cities",
        totals.days, totals.events, totals.pending_tickets, totals.cities
    );
}

fn print_tickets(planner: &Planner<JsonFileStore>) {
    let groups = ticket_list(planner.trip(), planner.selection());
    if groups.is_empty() {
        println!("No tickets required");
        return;
    }
    for group in groups {
        println!("{}", group.city.name);
        for entry in group.tickets {
            let mark = if entry.event.ticket_bought { "x" } else { " " };
            println!(
                "  [{}] {}  {} [{}]",
                mark,
                format_date(entry.date),
                entry.event.title,
                entry.event.id
            );
        }
    }
}

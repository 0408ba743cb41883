//! `slotbook` CLI — browse availability, book slots and manage opening hours.
//!
//! ## Usage
//!
//! ```sh
//! # Services and their default weekly hours
//! slotbook services
//!
//! # Slot counts for Monday..Saturday over the next 4 weeks
//! slotbook grid --service pt_private
//!
//! # One day's slots, suggested times first
//! slotbook slots --service pt_private --date 2026-03-16
//!
//! # Book 09:00 and repeat it weekly where still free
//! slotbook book --service pt_private --date 2026-03-16 --start 09:00 --repeat-weeks 4
//!
//! # Administrator overrides and blackout dates
//! slotbook override set --service pt_private --weekday sat --window 09:00-12:00
//! slotbook override set --service pt_local --weekday mon --closed
//! slotbook blackout add 2026-04-03
//! ```
//!
//! State lives in `--data-dir` (default `.slotbook`). `--now` pins the clock
//! used for lead-time checks; `--json` switches every command to JSON output.

mod store;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use slot_engine::calendar::{
    clock_to_minutes, date_key, minutes_to_clock, parse_date_key, weekday_index, WEEKDAY_LABELS,
};
use slot_engine::planner::DEFAULT_WEEKS;
use slot_engine::{
    commit_bookings, AvailabilitySnapshot, Booking, BookingRepository, DayOverride, Service,
    ServiceCatalog, Slot, Window,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::store::JsonStore;

#[derive(Parser)]
#[command(
    name = "slotbook",
    version,
    about = "Browse availability, book slots and manage opening hours"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding bookings, overrides and blackout dates
    #[arg(long, global = true, env = "SLOTBOOK_DATA_DIR", default_value = ".slotbook")]
    data_dir: PathBuf,

    /// Service catalog JSON file (the built-in studio services if omitted)
    #[arg(long, global = true, env = "SLOTBOOK_CATALOG")]
    catalog: Option<PathBuf>,

    /// Local time to treat as now, e.g. 2026-03-16T06:30 (defaults to the system clock)
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List services and their default weekly hours
    Services,
    /// Show available-slot counts for Monday..Saturday of the coming weeks
    Grid {
        #[arg(short, long)]
        service: String,
        /// Number of weeks, starting with the current one
        #[arg(long, default_value_t = DEFAULT_WEEKS)]
        weeks: u32,
    },
    /// List one day's free slots, suggested times first
    Slots {
        #[arg(short, long)]
        service: String,
        /// Day to inspect (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date_key)]
        date: NaiveDate,
    },
    /// Book a slot, optionally repeating it on the same weekday
    Book {
        #[arg(short, long)]
        service: String,
        #[arg(short, long, value_parser = parse_date_key)]
        date: NaiveDate,
        /// Start time (HH:MM); must be one of the day's free slots
        #[arg(long, value_parser = clock_to_minutes)]
        start: u32,
        /// Total weeks to book, this one included; weeks that are no longer free are skipped
        #[arg(long, default_value_t = 1)]
        repeat_weeks: u32,
    },
    /// Remove a booking
    Cancel {
        #[arg(short, long)]
        service: String,
        #[arg(short, long, value_parser = parse_date_key)]
        date: NaiveDate,
        #[arg(long, value_parser = clock_to_minutes)]
        start: u32,
    },
    /// List stored bookings
    Bookings {
        #[arg(short, long)]
        service: Option<String>,
        #[arg(short, long, value_parser = parse_date_key)]
        date: Option<NaiveDate>,
    },
    /// Manage per-weekday opening-hour overrides
    Override {
        #[command(subcommand)]
        action: OverrideAction,
    },
    /// Manage blackout dates (closed for every service)
    Blackout {
        #[command(subcommand)]
        action: BlackoutAction,
    },
}

#[derive(Subcommand)]
enum OverrideAction {
    /// Replace a weekday's hours with a single window, or close the weekday
    Set {
        #[arg(short, long)]
        service: String,
        /// Weekday: 0..6 (0=Sunday) or a name such as "mon"
        #[arg(long, value_parser = parse_weekday)]
        weekday: u8,
        /// Opening window, e.g. 09:00-17:00
        #[arg(long, value_parser = parse_window, required_unless_present = "closed")]
        window: Option<Window>,
        /// Close the weekday entirely
        #[arg(long, conflicts_with = "window")]
        closed: bool,
    },
    /// Revert a weekday to the service defaults
    Clear {
        #[arg(short, long)]
        service: String,
        #[arg(long, value_parser = parse_weekday)]
        weekday: u8,
    },
    /// Show overrides
    List {
        #[arg(short, long)]
        service: Option<String>,
    },
}

#[derive(Subcommand)]
enum BlackoutAction {
    /// Black out a date
    Add {
        #[arg(value_parser = parse_date_key)]
        date: NaiveDate,
    },
    /// Re-open a blacked-out date
    Remove {
        #[arg(value_parser = parse_date_key)]
        date: NaiveDate,
    },
    /// List blackout dates
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(cli.catalog.as_deref())?;
    let mut store = JsonStore::open(&cli.data_dir)
        .with_context(|| format!("Failed to open data directory: {}", cli.data_dir.display()))?;
    info!(dir = %store.base_dir().display(), "opened data directory");
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());
    let json = cli.json;

    match cli.command {
        Commands::Services => services(&catalog, json),
        Commands::Grid { service, weeks } => {
            grid(&store, catalog.require(&service)?, weeks, now, json)
        }
        Commands::Slots { service, date } => {
            slots(&store, catalog.require(&service)?, date, now, json)
        }
        Commands::Book {
            service,
            date,
            start,
            repeat_weeks,
        } => book(&mut store, catalog.require(&service)?, date, start, repeat_weeks, now, json),
        Commands::Cancel {
            service,
            date,
            start,
        } => cancel(&mut store, catalog.require(&service)?, date, start, json),
        Commands::Bookings { service, date } => {
            if let Some(id) = &service {
                catalog.require(id)?;
            }
            list_bookings(&store, service.as_deref(), date, json)
        }
        Commands::Override { action } => override_command(&store, &catalog, action, json),
        Commands::Blackout { action } => blackout_command(&store, action, json),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<ServiceCatalog> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog: {}", path.display()))?;
            let catalog = ServiceCatalog::from_json(&json)
                .with_context(|| format!("Invalid catalog: {}", path.display()))?;
            info!(services = catalog.services().len(), path = %path.display(), "loaded catalog");
            Ok(catalog)
        }
        None => Ok(ServiceCatalog::builtin()),
    }
}

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

fn services(catalog: &ServiceCatalog, json: bool) -> Result<()> {
    if json {
        return print_json(&catalog.services());
    }
    for svc in catalog.services() {
        println!(
            "{}  {}  {} min (grid {}, lead time {})",
            svc.id, svc.name, svc.duration_min, svc.slot_grid_min, svc.lead_time_min
        );
        for (weekday, windows) in svc.weekly_windows() {
            let hours: Vec<String> = windows.iter().map(format_window).collect();
            println!("  {} {}", WEEKDAY_LABELS[*weekday as usize], hours.join(", "));
        }
    }
    Ok(())
}

fn grid(store: &JsonStore, service: &Service, weeks: u32, now: NaiveDateTime, json: bool) -> Result<()> {
    let state = State::load(store)?;
    let grid = state.snapshot().booking_grid(service, now.date(), weeks, now);

    if json {
        return print_json(&grid);
    }
    println!("{}: next {} weeks, Monday to Saturday", service.name, weeks);
    for day in &grid {
        let status = match day.available {
            0 => "No availability".to_string(),
            1 => "1 slot available".to_string(),
            n => format!("{} slots available", n),
        };
        let past = if day.past { "  (past)" } else { "" };
        println!("{} {}  {}{}", day.weekday, date_key(day.date), status, past);
    }
    Ok(())
}

fn slots(store: &JsonStore, service: &Service, date: NaiveDate, now: NaiveDateTime, json: bool) -> Result<()> {
    let state = State::load(store)?;
    let day = state.snapshot().recommended_for_day(service, date, now);

    if json {
        return print_json(&day);
    }
    println!("{}: {} {}", service.name, WEEKDAY_LABELS[weekday_index(date) as usize], date_key(date));
    if day.total() == 0 {
        println!("No free slots on this day.");
        return Ok(());
    }
    if !day.recommended.is_empty() {
        println!("Suggested times:");
        for slot in &day.recommended {
            println!("  {}", format_slot(slot));
        }
    }
    if !day.other.is_empty() {
        println!("Other times available:");
        for slot in &day.other {
            println!("  {}", format_slot(slot));
        }
    }
    Ok(())
}

fn list_bookings(store: &JsonStore, service: Option<&str>, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let bookings: Vec<Booking> = store
        .load_bookings()?
        .into_iter()
        .filter(|b| service.is_none_or(|id| b.service_id == id))
        .filter(|b| date.is_none_or(|d| b.date == d))
        .collect();

    if json {
        return print_json(&bookings);
    }
    if bookings.is_empty() {
        println!("No bookings.");
    }
    for b in &bookings {
        println!("{}", format_booking(b));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

fn book(
    store: &mut JsonStore,
    service: &Service,
    date: NaiveDate,
    start: u32,
    repeat_weeks: u32,
    now: NaiveDateTime,
    json: bool,
) -> Result<()> {
    let state = State::load(store)?;
    let snapshot = state.snapshot();

    let chosen = snapshot
        .slots_for_day(service, date, now)
        .into_iter()
        .find(|s| s.start_minute() == start)
        .ok_or_else(|| {
            anyhow!(
                "{} {} is not available for {}",
                date_key(date),
                minutes_to_clock(start),
                service.id
            )
        })?;

    let slots = snapshot.expand_recurring(service, &chosen, repeat_weeks, now);
    let proposed: Vec<Booking> = slots.iter().map(|s| Booking::from_slot(&service.id, s)).collect();

    let outcome = commit_bookings(store, &proposed).context("Failed to save bookings")?;
    if outcome.accepted.is_empty() {
        bail!(
            "{} {} was taken before it could be booked",
            date_key(date),
            minutes_to_clock(start)
        );
    }

    if json {
        let rejected: Vec<&Booking> = outcome.rejected.iter().map(|c| &c.proposed).collect();
        return print_json(&json!({
            "booked": outcome.accepted,
            "rejected": rejected,
            "requestedWeeks": repeat_weeks.max(1),
        }));
    }
    for b in &outcome.accepted {
        println!("Booked {}", format_booking(b));
    }
    for c in &outcome.rejected {
        println!(
            "Skipped {} (overlaps {})",
            format_booking(&c.proposed),
            format_booking(&c.existing)
        );
    }
    if repeat_weeks > 1 {
        println!("{} of {} weeks booked", outcome.accepted.len(), repeat_weeks);
    }
    Ok(())
}

fn cancel(store: &mut JsonStore, service: &Service, date: NaiveDate, start: u32, json: bool) -> Result<()> {
    let mut bookings = store.load_bookings()?;
    let index = bookings
        .iter()
        .position(|b| b.service_id == service.id && b.date == date && b.start == start)
        .ok_or_else(|| {
            anyhow!(
                "no {} booking at {} {}",
                service.id,
                date_key(date),
                minutes_to_clock(start)
            )
        })?;

    let removed = bookings.remove(index);
    store.save_bookings(&bookings)?;

    if json {
        return print_json(&json!({ "cancelled": removed }));
    }
    println!("Cancelled {}", format_booking(&removed));
    Ok(())
}

fn override_command(store: &JsonStore, catalog: &ServiceCatalog, action: OverrideAction, json: bool) -> Result<()> {
    let mut overrides = store.load_overrides()?;

    match action {
        OverrideAction::Set {
            service,
            weekday,
            window,
            closed,
        } => {
            let service = catalog.require(&service)?;
            let value = match (window, closed) {
                (Some(w), false) => DayOverride::Open(w),
                (None, true) => DayOverride::Closed,
                _ => bail!("pass either --window or --closed"),
            };
            overrides.set(&service.id, weekday, value)?;
            store.save_overrides(&overrides)?;
            if json {
                return print_json(&json!({ "serviceId": service.id, "weekday": weekday, "override": value }));
            }
            println!("{} {}: {}", service.id, WEEKDAY_LABELS[weekday as usize], format_override(value));
        }
        OverrideAction::Clear { service, weekday } => {
            let service = catalog.require(&service)?;
            let removed = overrides.clear(&service.id, weekday);
            if removed.is_some() {
                store.save_overrides(&overrides)?;
            }
            if json {
                return print_json(&json!({ "serviceId": service.id, "weekday": weekday, "cleared": removed.is_some() }));
            }
            match removed {
                Some(_) => println!("{} {}: default hours restored", service.id, WEEKDAY_LABELS[weekday as usize]),
                None => println!("{} {}: no override set", service.id, WEEKDAY_LABELS[weekday as usize]),
            }
        }
        OverrideAction::List { service } => {
            let selected: Vec<&Service> = match &service {
                Some(id) => vec![catalog.require(id)?],
                None => catalog.services().iter().collect(),
            };
            if json {
                return print_json(&overrides);
            }
            let mut any = false;
            for svc in selected {
                for (weekday, value) in overrides.for_service(&svc.id) {
                    any = true;
                    println!("{} {}: {}", svc.id, WEEKDAY_LABELS[weekday as usize], format_override(value));
                }
            }
            if !any {
                println!("No overrides; default hours apply.");
            }
        }
    }
    Ok(())
}

fn blackout_command(store: &JsonStore, action: BlackoutAction, json: bool) -> Result<()> {
    let mut blackouts = store.load_blackouts()?;

    match action {
        BlackoutAction::Add { date } => {
            let added = blackouts.insert(date);
            if added {
                store.save_blackouts(&blackouts)?;
            }
            if json {
                return print_json(&json!({ "date": date, "added": added }));
            }
            if added {
                println!("Blacked out {}", date_key(date));
            } else {
                println!("{} is already blacked out", date_key(date));
            }
        }
        BlackoutAction::Remove { date } => {
            let removed = blackouts.remove(date);
            if removed {
                store.save_blackouts(&blackouts)?;
            }
            if json {
                return print_json(&json!({ "date": date, "removed": removed }));
            }
            if removed {
                println!("Re-opened {}", date_key(date));
            } else {
                println!("{} was not blacked out", date_key(date));
            }
        }
        BlackoutAction::List => {
            if json {
                return print_json(&blackouts);
            }
            if blackouts.is_empty() {
                println!("No blackout days.");
            }
            for date in blackouts.iter() {
                println!("{} {}", WEEKDAY_LABELS[weekday_index(date) as usize], date_key(date));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Overrides, blackouts and bookings read once per command.
struct State {
    overrides: slot_engine::OverrideSet,
    blackouts: slot_engine::BlackoutSet,
    bookings: Vec<Booking>,
}

impl State {
    fn load(store: &JsonStore) -> Result<Self> {
        Ok(Self {
            overrides: store.load_overrides()?,
            blackouts: store.load_blackouts()?,
            bookings: store.load_bookings()?,
        })
    }

    fn snapshot(&self) -> AvailabilitySnapshot<'_> {
        AvailabilitySnapshot::new(&self.overrides, &self.blackouts, &self.bookings)
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn format_window(w: &Window) -> String {
    format!("{}-{}", minutes_to_clock(w.start()), minutes_to_clock(w.end()))
}

fn format_slot(slot: &Slot) -> String {
    format!("{}-{}", slot.start.format("%H:%M"), slot.end.format("%H:%M"))
}

fn format_booking(b: &Booking) -> String {
    format!(
        "{} {} {}-{} {}",
        WEEKDAY_LABELS[weekday_index(b.date) as usize],
        date_key(b.date),
        minutes_to_clock(b.start),
        minutes_to_clock(b.end),
        b.service_id
    )
}

fn format_override(value: DayOverride) -> String {
    match value {
        DayOverride::Open(w) => format_window(&w),
        DayOverride::Closed => "closed".to_string(),
    }
}

fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| format!("'{}' is not a local datetime like 2026-03-16T06:30", s))
}

/// Accept `0`..`6` (0=Sunday) or a weekday name of at least three letters.
fn parse_weekday(s: &str) -> Result<u8, String> {
    const NAMES: [&str; 7] = [
        "sunday", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
    ];
    if let Ok(n) = s.parse::<u8>() {
        return if n <= 6 {
            Ok(n)
        } else {
            Err(format!("weekday {} is outside 0..=6", n))
        };
    }
    let lower = s.to_ascii_lowercase();
    NAMES
        .iter()
        .position(|name| lower.len() >= 3 && name.starts_with(&lower))
        .map(|i| i as u8)
        .ok_or_else(|| format!("'{}' is not a weekday", s))
}

fn parse_window(s: &str) -> Result<Window, String> {
    let (start, end) = s
        .split_once('-')
        .ok_or_else(|| format!("'{}' is not a window like 09:00-17:00", s))?;
    Window::parse(start.trim(), end.trim()).map_err(|e| e.to_string())
}

//! `salon` CLI — resolve availability and manage reservations from JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Calendar cells for a month (today pinned for reproducible output)
//! salon month --rules rules.json --month 2026-10 --today 2026-10-19
//!
//! # Free slots for a day, two-hour spacing, skipping existing reservations
//! salon slots --rules rules.json --date 2026-10-20 --reservations reservations.json --step 120
//!
//! # Book a slot, checking it is still offered, and write the updated list
//! salon book --reservations reservations.json --rules rules.json \
//!     --id r42 --date 2026-10-20 --time 11:00 --client "Ana" -o reservations.json
//!
//! # Complete or cancel a pending reservation
//! salon complete --reservations reservations.json --id r42 --price 350
//! salon cancel --reservations reservations.json --id r42
//!
//! # Pending appointments in agenda order, client directory, low-stock alert
//! salon agenda --reservations reservations.json
//! salon clients --users users.json --reservations reservations.json
//! salon stock --inventory inventory.json
//! ```
//!
//! Any file flag accepts `-` to read from stdin. Diagnostics go to stderr and
//! are controlled with `RUST_LOG`.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use salon_engine::calendar::CalendarView;
use salon_engine::clients::{clients_from_json, directory_report};
use salon_engine::inventory::{products_from_json, stock_report};
use salon_engine::{
    effective_hours, resolve_day_slots, slot_grid, AvailabilityRules, DaySlots, Reservation,
    ReservationBook, TimeSlot,
};
use serde::Serialize;
use std::io::{self, Read};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "salon", version, about = "Salon availability and booking CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

/// How "today" is determined for past-date exclusion.
#[derive(Args)]
struct TodayArgs {
    /// Reference date (YYYY-MM-DD); defaults to the current date in --timezone
    #[arg(long)]
    today: Option<NaiveDate>,
    /// IANA timezone of the salon, used when --today is omitted
    #[arg(long, env = "SALON_TIMEZONE", default_value = "UTC")]
    timezone: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve which days of a month can be booked
    Month {
        /// Availability rules document
        #[arg(short, long)]
        rules: String,
        /// Month to resolve (YYYY-MM)
        #[arg(long)]
        month: String,
        #[command(flatten)]
        today: TodayArgs,
    },
    /// List the free time slots for a date
    Slots {
        /// Availability rules document
        #[arg(short, long)]
        rules: String,
        /// Date to resolve (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Existing reservations (none if omitted)
        #[arg(long)]
        reservations: Option<String>,
        /// Minutes between slot starts
        #[arg(long, env = "SALON_SLOT_STEP", default_value_t = 60)]
        step: u32,
        /// Also print every slot with its availability flag
        #[arg(long)]
        grid: bool,
        #[command(flatten)]
        today: TodayArgs,
    },
    /// Add a pending reservation if its slot is free
    Book {
        /// Existing reservations
        #[arg(long)]
        reservations: String,
        /// When given, the slot must also be offered by these rules
        #[arg(short, long)]
        rules: Option<String>,
        #[arg(long)]
        id: String,
        #[arg(long)]
        date: NaiveDate,
        /// Slot label (HH:MM)
        #[arg(long)]
        time: String,
        /// Client display name
        #[arg(long)]
        client: Option<String>,
        /// Client account id
        #[arg(long)]
        user_id: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        service: Option<String>,
        #[arg(long, env = "SALON_SLOT_STEP", default_value_t = 60)]
        step: u32,
        #[command(flatten)]
        today: TodayArgs,
    },
    /// Mark a pending reservation as completed with the amount charged
    Complete {
        #[arg(long)]
        reservations: String,
        #[arg(long)]
        id: String,
        #[arg(long)]
        price: f64,
    },
    /// Cancel a pending reservation, freeing its slot
    Cancel {
        #[arg(long)]
        reservations: String,
        #[arg(long)]
        id: String,
    },
    /// Pending reservations ordered by date and time
    Agenda {
        /// Reservations (reads from stdin if omitted)
        #[arg(long)]
        reservations: Option<String>,
    },
    /// Client accounts ordered by name
    Clients {
        /// Users collection (reads from stdin if omitted)
        #[arg(short, long)]
        users: Option<String>,
        /// Reservations used to fill in missing phone numbers
        #[arg(long)]
        reservations: Option<String>,
    },
    /// Products that are running out of stock
    Stock {
        /// Inventory listing (reads from stdin if omitted)
        #[arg(short, long)]
        inventory: Option<String>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotsOutput {
    date: NaiveDate,
    step_minutes: u32,
    status: &'static str,
    slots: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    grid: Option<Vec<TimeSlot>>,
}

#[derive(Serialize)]
struct AgendaOutput<'a> {
    count: usize,
    pending: Vec<&'a Reservation>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let output = cli.output.as_deref();

    match cli.command {
        Commands::Month {
            rules,
            month,
            today,
        } => {
            let rules = load_rules(&rules)?;
            let today = resolve_today(&today)?;
            let (year, month) = parse_month(&month)?;
            let view = CalendarView::new(year, month).context("Invalid --month")?;
            tracing::debug!(%today, year, month, "resolving month");
            write_json(output, &view.grid(&rules, today))?;
        }
        Commands::Slots {
            rules,
            date,
            reservations,
            step,
            grid,
            today,
        } => {
            let rules = load_rules(&rules)?;
            let book = match reservations {
                Some(path) => load_reservations(&path)?,
                None => ReservationBook::new(),
            };
            let today = resolve_today(&today)?;

            let resolved = resolve_day_slots(date, &rules, step, book.as_slice(), today);
            let grid = if grid && resolved != DaySlots::Closed {
                effective_hours(date, rules.weekly_schedule.as_ref(), &rules.overrides).map(|hours| {
                    slot_grid(date, hours.start, hours.end, step, &book.booked_times(date))
                })
            } else {
                None
            };

            write_json(
                output,
                &SlotsOutput {
                    date,
                    step_minutes: step,
                    status: resolved.status(),
                    slots: resolved.slots().to_vec(),
                    grid,
                },
            )?;
        }
        Commands::Book {
            reservations,
            rules,
            id,
            date,
            time,
            client,
            user_id,
            phone,
            service,
            step,
            today,
        } => {
            let mut book = load_reservations(&reservations)?;

            if let Some(path) = rules {
                let rules = load_rules(&path)?;
                let today = resolve_today(&today)?;
                let mut view = CalendarView::containing(date);
                view.select_date(date, &rules, today)?;
                let offered = resolve_day_slots(date, &rules, step, book.as_slice(), today);
                view.select_time(&time, offered.slots())?;
            }

            let mut reservation = Reservation::new(id, date, &time);
            reservation.user_name = client;
            reservation.user_id = user_id;
            reservation.phone = phone;
            reservation.service = service;
            let stored = book.book(reservation)?;
            tracing::info!(id = %stored.id, date = %stored.date, time = %stored.time, "reservation booked");
            write_json(output, &book)?;
        }
        Commands::Complete {
            reservations,
            id,
            price,
        } => {
            let mut book = load_reservations(&reservations)?;
            book.complete(&id, price, Utc::now())?;
            write_json(output, &book)?;
        }
        Commands::Cancel { reservations, id } => {
            let mut book = load_reservations(&reservations)?;
            book.cancel(&id, Utc::now())?;
            write_json(output, &book)?;
        }
        Commands::Agenda { reservations } => {
            let book = load_reservations(reservations.as_deref().unwrap_or("-"))?;
            let pending = book.pending_agenda();
            write_json(
                output,
                &AgendaOutput {
                    count: pending.len(),
                    pending,
                },
            )?;
        }
        Commands::Clients {
            users,
            reservations,
        } => {
            let json = read_input(users.as_deref())?;
            let users = clients_from_json(&json).context("Failed to parse users")?;
            let book = match reservations {
                Some(path) => load_reservations(&path)?,
                None => ReservationBook::new(),
            };
            write_json(output, &directory_report(&users, book.as_slice()))?;
        }
        Commands::Stock { inventory } => {
            let json = read_input(inventory.as_deref())?;
            let products = products_from_json(&json).context("Failed to parse inventory")?;
            let report = stock_report(&products);
            if report.count > 0 {
                tracing::warn!(count = report.count, "products with low stock");
            }
            write_json(output, &report)?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("salon_cli=warn,salon_engine=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// The reference date: `--today` if given, else the current date in `--timezone`.
fn resolve_today(args: &TodayArgs) -> Result<NaiveDate> {
    if let Some(today) = args.today {
        return Ok(today);
    }
    let tz: chrono_tz::Tz = args
        .timezone
        .parse()
        .map_err(|_| anyhow::anyhow!("Unknown timezone: '{}'", args.timezone))?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// Parse `YYYY-MM`.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .trim()
        .split_once('-')
        .with_context(|| format!("Expected YYYY-MM, got '{}'", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{}'", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{}'", raw))?;
    Ok((year, month))
}

fn load_rules(path: &str) -> Result<AvailabilityRules> {
    let json = read_input(Some(path))?;
    AvailabilityRules::from_json(&json).context("Failed to parse availability rules")
}

fn load_reservations(path: &str) -> Result<ReservationBook> {
    let json = read_input(Some(path))?;
    ReservationBook::from_json(&json).context("Failed to parse reservations")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rollcall_core::{
    default_store_path, AttendanceRecord, EventOutcome, Ledger, Store, SLOT_COUNT,
};

#[derive(Parser)]
#[command(name = "rollcall", about = "Attendance ledger CLI")]
struct Cli {
    /// Attendance store path (falls back to $ROLLCALL_STORE_PATH, then the
    /// user data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the attendance store if it does not exist
    Init,
    /// Mark a sighting of a person right now
    Mark {
        /// Identity label (upper-cased, the way the recognizer reports it)
        name: String,
    },
    /// Show who was present on a day
    Day {
        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show all recorded days for a person
    History { name: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let store_path = cli
        .store
        .or_else(|| std::env::var("ROLLCALL_STORE_PATH").map(PathBuf::from).ok())
        .unwrap_or_else(default_store_path);
    let ledger = Ledger::new(Store::new(&store_path));

    match cli.command {
        Commands::Init => {
            ledger.init()?;
            println!("store ready at {}", store_path.display());
        }
        Commands::Mark { name } => {
            let label = name.trim().to_uppercase();
            if label.is_empty() {
                bail!("identity label is empty");
            }
            match ledger.record_event(&label)? {
                EventOutcome::FirstSighting => {
                    println!("{label}: first sighting today, checked in");
                }
                EventOutcome::CheckedIn { slot } => {
                    println!("{label}: checked in (session {slot})");
                }
                EventOutcome::CheckedOut { slot } => {
                    println!("{label}: checked out (session {slot})");
                }
                EventOutcome::SlotsExhausted => {
                    println!("{label}: all sessions used today, event dropped");
                }
            }
        }
        Commands::Day { date } => {
            let date = match date {
                Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .context("date must be YYYY-MM-DD")?,
                None => chrono::Local::now().date_naive(),
            };
            let rows = ledger.attendance_for(date);
            if rows.is_empty() {
                println!("no attendance recorded for {date}");
            } else {
                for row in &rows {
                    println!("{:<24} {}  total {}", row.name, sessions(row), total(row));
                }
            }
        }
        Commands::History { name } => {
            let label = name.trim().to_uppercase();
            let rows = ledger.history_for(&label);
            if rows.is_empty() {
                println!("no attendance recorded for {label}");
            } else {
                for row in &rows {
                    println!("{}  {}  total {}", row.date, sessions(row), total(row));
                }
            }
        }
    }

    Ok(())
}

/// Compact `in-out` rendering of a record's filled sessions; an open
/// session renders with a dangling dash.
fn sessions(row: &AttendanceRecord) -> String {
    let mut parts = Vec::new();
    for idx in 0..SLOT_COUNT {
        let (in_time, out_time) = row.slot(idx);
        if in_time.is_empty() {
            break;
        }
        if out_time.is_empty() {
            parts.push(format!("{in_time}-"));
        } else {
            parts.push(format!("{in_time}-{out_time}"));
        }
    }
    parts.join("  ")
}

fn total(row: &AttendanceRecord) -> &str {
    if row.total_hours.is_empty() {
        "0:00:00"
    } else {
        &row.total_hours
    }
}

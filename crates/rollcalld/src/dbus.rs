//! D-Bus interface for the rollcall daemon.
//!
//! Bus name: org.rollcall.Rollcall1
//! Object path: /org/rollcall/Rollcall1
//!
//! The recognition pipeline calls `Observe` once per recognized identity;
//! request-serving layers read `Roster` and `History`. Replies are JSON
//! strings so the schema can grow without breaking the bus signature.

use chrono::NaiveDate;
use zbus::fdo;
use zbus::interface;

use crate::worker::{LedgerHandle, WorkerError};

pub const BUS_NAME: &str = "org.rollcall.Rollcall1";
pub const OBJECT_PATH: &str = "/org/rollcall/Rollcall1";

pub struct RollcallService {
    handle: LedgerHandle,
    store_path: String,
}

impl RollcallService {
    pub fn new(handle: LedgerHandle, store_path: String) -> Self {
        Self { handle, store_path }
    }
}

#[interface(name = "org.rollcall.Rollcall1")]
impl RollcallService {
    /// Record a sighting of a recognized identity label.
    ///
    /// Returns a JSON object describing what the event did — recorded with
    /// a slot outcome, or suppressed by the cooldown gate. A store failure
    /// maps to a D-Bus error so the caller knows the event was lost and
    /// may retry it.
    async fn observe(&self, name: &str) -> fdo::Result<String> {
        let label = normalize_label(name)
            .ok_or_else(|| fdo::Error::InvalidArgs("empty identity label".into()))?;
        tracing::info!(name = %label, "observe requested");

        let observation = self.handle.observe(label).await.map_err(to_fdo)?;
        to_json(&observation)
    }

    /// Distinct names present on a date, given as `YYYY-MM-DD`.
    /// An empty or missing store yields an empty array, never an error.
    async fn roster(&self, date: &str) -> fdo::Result<String> {
        let date = parse_iso_date(date)
            .ok_or_else(|| fdo::Error::InvalidArgs("date must be YYYY-MM-DD".into()))?;
        let names = self.handle.roster(date).await.map_err(to_fdo)?;
        to_json(&names)
    }

    /// Every recorded row for a person, as a JSON array keyed by the
    /// store's column names.
    async fn history(&self, name: &str) -> fdo::Result<String> {
        let label = normalize_label(name)
            .ok_or_else(|| fdo::Error::InvalidArgs("empty identity label".into()))?;
        let rows = self.handle.history(label).await.map_err(to_fdo)?;
        to_json(&rows)
    }

    /// Daemon status information.
    async fn status(&self) -> fdo::Result<String> {
        let rows = self.handle.row_count().await.map_err(to_fdo)?;
        Ok(serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "store": self.store_path,
            "rows": rows,
        })
        .to_string())
    }
}

/// Trim and upper-case an identity label; `None` when nothing remains.
/// Upper-casing mirrors what the recognition pipeline feeds the ledger, so
/// manual bus calls land on the same rows.
fn normalize_label(name: &str) -> Option<String> {
    let label = name.trim().to_uppercase();
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

fn parse_iso_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

fn to_fdo(err: WorkerError) -> fdo::Error {
    fdo::Error::Failed(err.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> fdo::Result<String> {
    serde_json::to_string(value).map_err(|e| fdo::Error::Failed(e.to_string()))
}

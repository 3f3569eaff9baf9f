//! The attendance ledger — slot assignment policy and read-side queries.
//!
//! Stateless between calls: every event is a full load → locate/mutate →
//! rewrite cycle over the store, so the process can restart at any point
//! without a separate session tracker. The trade-off is that a missed
//! check-out is indistinguishable from a fresh arrival later the same day;
//! the scan policy below is the documented behavior, not inference.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use thiserror::Error;

use crate::clock::{Clock, SystemClock};
use crate::record::{AttendanceRecord, SLOT_COUNT};
use crate::store::{Store, StoreError};
use crate::time::{DATE_FORMAT, TIME_FORMAT};

#[derive(Error, Debug)]
pub enum LedgerError {
    /// The store could not be read or written. The event was not applied;
    /// the caller may retry with the same event.
    #[error("store unavailable, event not recorded: {0}")]
    StoreUnavailable(#[from] StoreError),
}

/// What a recorded event did to the person's row for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum EventOutcome {
    /// First sighting of the day — a new row with slot 1 opened.
    FirstSighting,
    /// Opened session `slot` (1-based) on an existing row.
    CheckedIn { slot: usize },
    /// Closed session `slot` (1-based) and recomputed durations.
    CheckedOut { slot: usize },
    /// All three sessions already closed — the event was dropped.
    SlotsExhausted,
}

/// Per-person, per-day session ledger over a shared CSV store.
///
/// Construct one at process start with the store location and clock, and
/// pass it by reference to every call site — there is no global instance.
/// Concurrent writers must be serialized externally; the daemon funnels
/// everything through a single worker thread.
pub struct Ledger<C = SystemClock> {
    store: Store,
    clock: C,
}

impl Ledger<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> Ledger<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create the backing store if it does not exist yet.
    pub fn init(&self) -> Result<(), LedgerError> {
        self.store.ensure_exists().map_err(Into::into)
    }

    /// Record a sighting of `name` at the current wall-clock time.
    pub fn record_event(&self, name: &str) -> Result<EventOutcome, LedgerError> {
        self.record_event_at(name, self.clock.now())
    }

    /// Record a sighting at an explicit timestamp.
    ///
    /// Load failure leaves the store untouched; save failure loses the
    /// in-memory mutation. Both surface as [`LedgerError::StoreUnavailable`]
    /// — the event must not be assumed durable unless this returns `Ok`.
    pub fn record_event_at(
        &self,
        name: &str,
        observed_at: NaiveDateTime,
    ) -> Result<EventOutcome, LedgerError> {
        let mut records = self.store.load()?;

        let date = observed_at.format(DATE_FORMAT).to_string();
        let time = observed_at.format(TIME_FORMAT).to_string();
        let outcome = apply_event(&mut records, name, &date, &time);

        self.store.save(&records)?;

        match outcome {
            EventOutcome::SlotsExhausted => {
                tracing::debug!(name, date = %date, "all sessions closed, event dropped")
            }
            _ => {
                tracing::info!(name, date = %date, time = %time, outcome = ?outcome, "event recorded")
            }
        }
        Ok(outcome)
    }

    /// Rows for a calendar day, in store order.
    ///
    /// Read failures degrade to an empty result with a diagnostic — the
    /// query side never hard-fails, a deliberate asymmetry from the write
    /// path.
    pub fn attendance_for(&self, date: NaiveDate) -> Vec<AttendanceRecord> {
        let date = date.format(DATE_FORMAT).to_string();
        self.load_or_empty()
            .into_iter()
            .filter(|record| record.date == date)
            .collect()
    }

    /// Every row for a person, across all days, in store order.
    pub fn history_for(&self, name: &str) -> Vec<AttendanceRecord> {
        self.load_or_empty()
            .into_iter()
            .filter(|record| record.name == name)
            .collect()
    }

    /// Distinct person names present on a day, in first-seen store order.
    pub fn present_on(&self, date: NaiveDate) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for record in self.attendance_for(date) {
            if !names.iter().any(|known| *known == record.name) {
                names.push(record.name);
            }
        }
        names
    }

    fn load_or_empty(&self) -> Vec<AttendanceRecord> {
        match self.store.load() {
            Ok(records) => records,
            Err(err) => {
                tracing::warn!(
                    path = %self.store.path().display(),
                    error = %err,
                    "store read failed, returning no rows"
                );
                Vec::new()
            }
        }
    }
}

/// Walk the slots of the person's row for `date` and apply the event.
///
/// Policy, in order: no row → new row with slot 1 opened; first slot with
/// an empty in-time → open it; first open slot (in set, out empty) → close
/// it and recompute durations; all slots closed → drop the event.
fn apply_event(
    records: &mut Vec<AttendanceRecord>,
    name: &str,
    date: &str,
    time: &str,
) -> EventOutcome {
    // Last match wins if duplicate (name, date) rows ever appear; creation
    // below never appends a second row for a pair that already exists.
    let Some(idx) = records
        .iter()
        .rposition(|record| record.name == name && record.date == date)
    else {
        records.push(AttendanceRecord::first_sighting(name, date, time));
        return EventOutcome::FirstSighting;
    };

    let record = &mut records[idx];
    for slot in 0..SLOT_COUNT {
        let (in_time, out_time) = record.slot(slot);
        let in_set = !in_time.is_empty();
        let out_set = !out_time.is_empty();

        if !in_set {
            record.set_in_time(slot, time);
            return EventOutcome::CheckedIn { slot: slot + 1 };
        }
        if !out_set {
            record.set_out_time(slot, time);
            record.recompute_durations();
            return EventOutcome::CheckedOut { slot: slot + 1 };
        }
    }
    EventOutcome::SlotsExhausted
}

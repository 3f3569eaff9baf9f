//! rollcall-core — Attendance ledger over a flat CSV store.
//!
//! Turns a stream of "person observed now" events into per-person, per-day
//! check-in/check-out sessions with derived durations. Face recognition is
//! an external collaborator: something else maps a camera frame to identity
//! labels, this crate decides which session slot each sighting fills and
//! persists the result.

pub mod clock;
pub mod gate;
pub mod ledger;
pub mod record;
pub mod store;
pub mod time;

pub use clock::{Clock, SystemClock};
pub use gate::SightingGate;
pub use ledger::{EventOutcome, Ledger, LedgerError};
pub use record::{AttendanceRecord, SLOT_COUNT};
pub use store::{default_store_path, Store, StoreError};
pub use time::{duration_between, WorkDuration};

//! Wall-clock abstraction so event timestamps can be injected in tests.

use chrono::NaiveDateTime;

/// Source of "now" for recorded events.
pub trait Clock: Send {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock — the production time source. Attendance is a local
/// phenomenon, so naive local time matches what the store columns carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

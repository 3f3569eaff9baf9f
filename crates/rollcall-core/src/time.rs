//! Time-of-day parsing and worked-duration arithmetic.
//!
//! All times live in the store as text. Parsing is deliberately forgiving:
//! a malformed value degrades to a zero duration with a diagnostic instead
//! of failing the whole record.

use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use chrono::{NaiveTime, TimeDelta};

/// Storage format for time-of-day columns.
pub const TIME_FORMAT: &str = "%H:%M:%S";
/// Storage format for the date column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Accepted on read for rows written without seconds.
const TIME_FORMAT_NO_SECONDS: &str = "%H:%M";

/// Elapsed worked time.
///
/// Renders as `H:MM:SS` — sign-less, hours unpadded and unbounded, minutes
/// and seconds zero-padded. This rendering is what the duration and total
/// columns store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkDuration {
    seconds: i64,
}

impl WorkDuration {
    pub const ZERO: WorkDuration = WorkDuration { seconds: 0 };

    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds }
    }

    pub fn as_seconds(&self) -> i64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.seconds / 3600;
        let minutes = (self.seconds % 3600) / 60;
        let seconds = self.seconds % 60;
        write!(f, "{hours}:{minutes:02}:{seconds:02}")
    }
}

impl Add for WorkDuration {
    type Output = WorkDuration;

    fn add(self, rhs: WorkDuration) -> WorkDuration {
        WorkDuration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sum for WorkDuration {
    fn sum<I: Iterator<Item = WorkDuration>>(iter: I) -> WorkDuration {
        iter.fold(WorkDuration::ZERO, Add::add)
    }
}

/// Elapsed time between two stored time-of-day values.
///
/// An empty value on either side yields zero. Both values must parse under
/// the same format (`HH:MM:SS`, then `HH:MM`); a pair that matches neither
/// is reported and counted as zero rather than failing the record. An
/// out-time numerically earlier than the in-time is taken to roll past
/// midnight into the next day, so the result is never negative.
pub fn duration_between(in_time: &str, out_time: &str) -> WorkDuration {
    let in_time = in_time.trim();
    let out_time = out_time.trim();

    if in_time.is_empty() || out_time.is_empty() {
        return WorkDuration::ZERO;
    }

    for format in [TIME_FORMAT, TIME_FORMAT_NO_SECONDS] {
        let (Ok(start), Ok(end)) = (
            NaiveTime::parse_from_str(in_time, format),
            NaiveTime::parse_from_str(out_time, format),
        ) else {
            continue;
        };

        let elapsed = end - start;
        let elapsed = if elapsed < TimeDelta::zero() {
            // Overnight session: the out-time belongs to the next day.
            elapsed + TimeDelta::days(1)
        } else {
            elapsed
        };
        return WorkDuration::from_seconds(elapsed.num_seconds());
    }

    tracing::warn!(in_time, out_time, "unparseable time pair, counting zero");
    WorkDuration::ZERO
}

//! Attendance record schema — one row per person per calendar day.

use serde::{Deserialize, Serialize};

use crate::time::{duration_between, WorkDuration};

/// Check-in/check-out session slots per record. A fourth sighting after
/// all slots close is dropped by the ledger.
pub const SLOT_COUNT: usize = 3;

/// Canonical column order of the persisted store.
pub const COLUMNS: [&str; 12] = [
    "Name",
    "Date",
    "In Time 1",
    "Out Time 1",
    "In Time 2",
    "Out Time 2",
    "In Time 3",
    "Out Time 3",
    "Session 1 Duration",
    "Session 2 Duration",
    "Session 3 Duration",
    "Total Hours",
];

/// One ledger row: a person's sessions for a single calendar day.
///
/// Every column is text — times as `HH:MM:SS`, the date as `dd/mm/yyyy`,
/// durations as `H:MM:SS`. An empty cell means "not yet set", never zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "In Time 1")]
    pub in_time_1: String,
    #[serde(rename = "Out Time 1")]
    pub out_time_1: String,
    #[serde(rename = "In Time 2")]
    pub in_time_2: String,
    #[serde(rename = "Out Time 2")]
    pub out_time_2: String,
    #[serde(rename = "In Time 3")]
    pub in_time_3: String,
    #[serde(rename = "Out Time 3")]
    pub out_time_3: String,
    #[serde(rename = "Session 1 Duration")]
    pub session_1_duration: String,
    #[serde(rename = "Session 2 Duration")]
    pub session_2_duration: String,
    #[serde(rename = "Session 3 Duration")]
    pub session_3_duration: String,
    #[serde(rename = "Total Hours")]
    pub total_hours: String,
}

impl AttendanceRecord {
    /// First sighting of the day: slot 1 opens, everything else stays empty
    /// until later events (durations are only written on check-out).
    pub fn first_sighting(name: &str, date: &str, time: &str) -> Self {
        Self {
            name: name.to_string(),
            date: date.to_string(),
            in_time_1: time.to_string(),
            ..Self::default()
        }
    }

    /// The (in, out) time pair for a slot, 0-based.
    pub fn slot(&self, idx: usize) -> (&str, &str) {
        debug_assert!(idx < SLOT_COUNT);
        match idx {
            0 => (&self.in_time_1, &self.out_time_1),
            1 => (&self.in_time_2, &self.out_time_2),
            _ => (&self.in_time_3, &self.out_time_3),
        }
    }

    pub(crate) fn set_in_time(&mut self, idx: usize, value: &str) {
        debug_assert!(idx < SLOT_COUNT);
        match idx {
            0 => self.in_time_1 = value.to_string(),
            1 => self.in_time_2 = value.to_string(),
            _ => self.in_time_3 = value.to_string(),
        }
    }

    pub(crate) fn set_out_time(&mut self, idx: usize, value: &str) {
        debug_assert!(idx < SLOT_COUNT);
        match idx {
            0 => self.out_time_1 = value.to_string(),
            1 => self.out_time_2 = value.to_string(),
            _ => self.out_time_3 = value.to_string(),
        }
    }

    fn set_session_duration(&mut self, idx: usize, value: String) {
        debug_assert!(idx < SLOT_COUNT);
        match idx {
            0 => self.session_1_duration = value,
            1 => self.session_2_duration = value,
            _ => self.session_3_duration = value,
        }
    }

    /// Recompute the three session durations and the total.
    ///
    /// Only closed slots (in-time and out-time both set) count toward the
    /// total; an open slot's partial elapsed time is never included. Open
    /// and untouched slots get a `0:00:00` duration cell.
    pub fn recompute_durations(&mut self) {
        let mut total = WorkDuration::ZERO;
        for idx in 0..SLOT_COUNT {
            let (in_time, out_time) = self.slot(idx);
            let closed = !in_time.is_empty() && !out_time.is_empty();
            let elapsed = duration_between(in_time, out_time);
            if closed {
                total = total + elapsed;
            }
            self.set_session_duration(idx, elapsed.to_string());
        }
        self.total_hours = total.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_sighting_opens_slot_one_only() {
        let record = AttendanceRecord::first_sighting("JOHN DOE", "10/01/2024", "09:00:00");
        assert_eq!(record.name, "JOHN DOE");
        assert_eq!(record.date, "10/01/2024");
        assert_eq!(record.in_time_1, "09:00:00");
        assert_eq!(record.out_time_1, "");
        assert_eq!(record.in_time_2, "");
        assert_eq!(record.total_hours, "");
    }

    #[test]
    fn open_slot_contributes_nothing_to_total() {
        let mut record = AttendanceRecord::first_sighting("ALICE", "10/01/2024", "09:00:00");
        record.out_time_1 = "12:00:00".to_string();
        record.in_time_2 = "13:00:00".to_string();
        record.recompute_durations();

        assert_eq!(record.session_1_duration, "3:00:00");
        assert_eq!(record.session_2_duration, "0:00:00");
        assert_eq!(record.session_3_duration, "0:00:00");
        assert_eq!(record.total_hours, "3:00:00", "open slot 2 must not count");
    }

    #[test]
    fn total_sums_all_closed_slots() {
        let mut record = AttendanceRecord::first_sighting("ALICE", "10/01/2024", "08:00:00");
        record.out_time_1 = "10:00:00".to_string();
        record.in_time_2 = "11:00:00".to_string();
        record.out_time_2 = "11:45:30".to_string();
        record.recompute_durations();

        assert_eq!(record.session_1_duration, "2:00:00");
        assert_eq!(record.session_2_duration, "0:45:30");
        assert_eq!(record.total_hours, "2:45:30");
    }

    #[test]
    fn recompute_with_only_an_open_slot_is_all_zero() {
        let mut record = AttendanceRecord::first_sighting("BOB", "10/01/2024", "09:00:00");
        record.recompute_durations();
        assert_eq!(record.session_1_duration, "0:00:00");
        assert_eq!(record.total_hours, "0:00:00");
    }
}

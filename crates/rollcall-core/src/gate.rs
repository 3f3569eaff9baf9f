//! Sighting cooldown gate — the upstream deduplication contract.
//!
//! A recognizer emits the same identity many times per second while a
//! person stands in frame. The gate admits a label at most once per
//! cooldown window; the ledger itself never debounces.

use std::collections::HashMap;

use chrono::{NaiveDateTime, TimeDelta};

pub struct SightingGate {
    cooldown: TimeDelta,
    last_admitted: HashMap<String, NaiveDateTime>,
}

impl SightingGate {
    pub fn new(cooldown: TimeDelta) -> Self {
        Self {
            cooldown,
            last_admitted: HashMap::new(),
        }
    }

    /// Admit `name` unless it was already admitted within the cooldown
    /// window. The admission time is recorded only when admitting, so a
    /// person lingering in frame is re-admitted one window after their
    /// last admission, not after they leave the frame.
    pub fn admit(&mut self, name: &str, at: NaiveDateTime) -> bool {
        match self.last_admitted.get(name) {
            Some(last) if at - *last <= self.cooldown => false,
            _ => {
                self.last_admitted.insert(name.to_string(), at);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + TimeDelta::seconds(secs)
    }

    #[test]
    fn first_sighting_is_admitted() {
        let mut gate = SightingGate::new(TimeDelta::seconds(30));
        assert!(gate.admit("ALICE", at(0)));
    }

    #[test]
    fn repeat_within_window_is_suppressed() {
        let mut gate = SightingGate::new(TimeDelta::seconds(30));
        assert!(gate.admit("ALICE", at(0)));
        assert!(!gate.admit("ALICE", at(10)));
        assert!(!gate.admit("ALICE", at(30)), "window boundary is inclusive");
    }

    #[test]
    fn admitted_again_after_the_window() {
        let mut gate = SightingGate::new(TimeDelta::seconds(30));
        assert!(gate.admit("ALICE", at(0)));
        assert!(gate.admit("ALICE", at(31)));
    }

    #[test]
    fn suppressed_sightings_do_not_extend_the_window() {
        let mut gate = SightingGate::new(TimeDelta::seconds(30));
        assert!(gate.admit("ALICE", at(0)));
        assert!(!gate.admit("ALICE", at(15)));
        assert!(!gate.admit("ALICE", at(29)));
        // Measured from the admission at t=0, not the last sighting.
        assert!(gate.admit("ALICE", at(31)));
    }

    #[test]
    fn people_are_tracked_independently() {
        let mut gate = SightingGate::new(TimeDelta::seconds(30));
        assert!(gate.admit("ALICE", at(0)));
        assert!(gate.admit("BOB", at(1)));
        assert!(!gate.admit("ALICE", at(2)));
    }
}

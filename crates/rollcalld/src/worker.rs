//! Ledger worker thread — the single-process write queue.
//!
//! Every ledger call is a full read-modify-write over the CSV, so writes
//! must be serialized. D-Bus handlers send requests over a channel to one
//! dedicated thread that owns the ledger and the sighting gate; replies
//! come back over oneshot channels.

use std::path::Path;

use chrono::{NaiveDate, TimeDelta};
use rollcall_core::{
    AttendanceRecord, Clock, EventOutcome, Ledger, LedgerError, SightingGate, Store, SystemClock,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("ledger thread exited")]
    ChannelClosed,
}

/// Reply to an observation: either applied to the ledger, or suppressed by
/// the cooldown gate before reaching it.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Observation {
    Recorded {
        #[serde(flatten)]
        outcome: EventOutcome,
    },
    Cooldown,
}

/// Messages sent from D-Bus handlers to the ledger thread.
enum Request {
    Observe {
        name: String,
        reply: oneshot::Sender<Result<Observation, LedgerError>>,
    },
    Roster {
        date: NaiveDate,
        reply: oneshot::Sender<Vec<String>>,
    },
    History {
        name: String,
        reply: oneshot::Sender<Vec<AttendanceRecord>>,
    },
    RowCount {
        reply: oneshot::Sender<usize>,
    },
}

/// Clone-safe handle to the ledger thread.
#[derive(Clone)]
pub struct LedgerHandle {
    tx: mpsc::Sender<Request>,
}

impl LedgerHandle {
    /// Run a sighting through the gate and, if admitted, the ledger.
    pub async fn observe(&self, name: String) -> Result<Observation, WorkerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Observe {
                name,
                reply: reply_tx,
            })
            .await
            .map_err(|_| WorkerError::ChannelClosed)?;
        let result = reply_rx.await.map_err(|_| WorkerError::ChannelClosed)?;
        result.map_err(WorkerError::from)
    }

    /// Distinct names present on a day.
    pub async fn roster(&self, date: NaiveDate) -> Result<Vec<String>, WorkerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Roster {
                date,
                reply: reply_tx,
            })
            .await
            .map_err(|_| WorkerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| WorkerError::ChannelClosed)
    }

    /// All rows ever recorded for a person.
    pub async fn history(&self, name: String) -> Result<Vec<AttendanceRecord>, WorkerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::History {
                name,
                reply: reply_tx,
            })
            .await
            .map_err(|_| WorkerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| WorkerError::ChannelClosed)
    }

    /// Row count across the whole store, for status reporting.
    pub async fn row_count(&self) -> Result<usize, WorkerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::RowCount { reply: reply_tx })
            .await
            .map_err(|_| WorkerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| WorkerError::ChannelClosed)
    }
}

/// Spawn the ledger worker on a dedicated OS thread.
///
/// Ensures the store exists up front (fail-fast at startup), then serves
/// requests until every handle is dropped. A store failure on one request
/// is returned to that caller; the thread keeps serving.
pub fn spawn_worker(store_path: &Path, cooldown_secs: i64) -> Result<LedgerHandle, LedgerError> {
    let store = Store::new(store_path);
    store.ensure_exists()?;
    tracing::info!(path = %store_path.display(), "attendance store ready");

    let ledger = Ledger::new(store);
    let mut gate = SightingGate::new(TimeDelta::seconds(cooldown_secs));

    let (tx, mut rx) = mpsc::channel::<Request>(16);

    std::thread::Builder::new()
        .name("rollcall-ledger".into())
        .spawn(move || {
            tracing::info!("ledger thread started");
            while let Some(request) = rx.blocking_recv() {
                match request {
                    Request::Observe { name, reply } => {
                        let _ = reply.send(handle_observe(&ledger, &mut gate, &name));
                    }
                    Request::Roster { date, reply } => {
                        let _ = reply.send(ledger.present_on(date));
                    }
                    Request::History { name, reply } => {
                        let _ = reply.send(ledger.history_for(&name));
                    }
                    Request::RowCount { reply } => {
                        let rows = ledger.store().load().map(|r| r.len()).unwrap_or(0);
                        let _ = reply.send(rows);
                    }
                }
            }
            tracing::info!("ledger thread exiting");
        })
        .expect("failed to spawn ledger thread");

    Ok(LedgerHandle { tx })
}

fn handle_observe(
    ledger: &Ledger,
    gate: &mut SightingGate,
    name: &str,
) -> Result<Observation, LedgerError> {
    let now = SystemClock.now();
    if !gate.admit(name, now) {
        tracing::debug!(name, "sighting within cooldown window, suppressed");
        return Ok(Observation::Cooldown);
    }
    let outcome = ledger.record_event_at(name, now)?;
    Ok(Observation::Recorded { outcome })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn observe_records_then_cooldown_suppresses() {
        let dir = tempdir().unwrap();
        let handle = spawn_worker(&dir.path().join("attendance.csv"), 3600).unwrap();

        let first = handle.observe("ALICE".into()).await.unwrap();
        assert!(matches!(
            first,
            Observation::Recorded {
                outcome: EventOutcome::FirstSighting
            }
        ));

        let second = handle.observe("ALICE".into()).await.unwrap();
        assert!(matches!(second, Observation::Cooldown));
    }

    #[tokio::test]
    async fn queries_reflect_recorded_events() {
        let dir = tempdir().unwrap();
        let handle = spawn_worker(&dir.path().join("attendance.csv"), 3600).unwrap();

        handle.observe("ALICE".into()).await.unwrap();
        handle.observe("BOB".into()).await.unwrap();

        let today = chrono::Local::now().date_naive();
        assert_eq!(handle.roster(today).await.unwrap(), vec!["ALICE", "BOB"]);
        assert_eq!(handle.history("ALICE".into()).await.unwrap().len(), 1);
        assert_eq!(handle.row_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn spawn_fails_fast_when_store_cannot_be_created() {
        let dir = tempdir().unwrap();
        // A file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let result = spawn_worker(&blocker.join("attendance.csv"), 30);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn store_failure_on_one_request_does_not_kill_the_thread() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("attendance.csv");
        let handle = spawn_worker(&store_path, 0).unwrap();

        handle.observe("ALICE".into()).await.unwrap();
        std::fs::remove_file(&store_path).unwrap();

        // Write path reports the failure...
        let result = handle.observe("BOB".into()).await;
        assert!(matches!(
            result,
            Err(WorkerError::Ledger(LedgerError::StoreUnavailable(_)))
        ));

        // ...read path degrades to empty, and the thread still answers.
        let today = chrono::Local::now().date_naive();
        assert!(handle.roster(today).await.unwrap().is_empty());
        assert_eq!(handle.row_count().await.unwrap(), 0);
    }

    #[test]
    fn observation_json_shape() {
        let recorded = Observation::Recorded {
            outcome: EventOutcome::CheckedIn { slot: 2 },
        };
        assert_eq!(
            serde_json::to_string(&recorded).unwrap(),
            "{\"status\":\"recorded\",\"action\":\"checked_in\",\"slot\":2}"
        );
        assert_eq!(
            serde_json::to_string(&Observation::Cooldown).unwrap(),
            "{\"status\":\"cooldown\"}"
        );
    }
}

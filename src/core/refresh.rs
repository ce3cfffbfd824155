//! Refresh controller: Running/Paused polling schedule
//!
//! The controller never performs I/O. It hands out [`FetchTicket`]s when a
//! fetch is due and decides which completions may replace the stored
//! snapshot. Transport lives behind [`SnapshotSource`].

use super::snapshot::{parse, ParseError, Snapshot};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(6000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshState {
    Running,
    Paused,
}

/// Identifies one fetch request
///
/// `generation` changes on every resume, `seq` increases on every request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub seq: u64,
}

/// Live polling schedule; dropping it out of the controller cancels polling
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleHandle {
    generation: u64,
    next_due: f64,
}

impl ScheduleHandle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Clock time (seconds) of the next scheduled fetch
    pub fn next_due(&self) -> f64 {
        self.next_due
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Response(#[from] ParseError),
}

/// Finished fetch as reported by a [`SnapshotSource`]
#[derive(Debug)]
pub struct Completion {
    pub ticket: FetchTicket,
    /// Response body on success
    pub outcome: Result<String, FetchError>,
}

/// Asynchronous snapshot transport
pub trait SnapshotSource {
    /// Start fetching; the result shows up in a later [`drain`](Self::drain)
    fn request(&mut self, ticket: FetchTicket);
    /// Completions that arrived since the last call
    fn drain(&mut self) -> Vec<Completion>;
}

#[derive(Debug)]
pub struct RefreshController {
    interval: Duration,
    schedule: Option<ScheduleHandle>,
    generation: u64,
    next_seq: u64,
    applied_seq: Option<u64>,
}

impl RefreshController {
    /// Paused controller; call [`start`](Self::start) to begin polling
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            schedule: None,
            generation: 0,
            next_seq: 0,
            applied_seq: None,
        }
    }

    pub fn state(&self) -> RefreshState {
        if self.schedule.is_some() {
            RefreshState::Running
        } else {
            RefreshState::Paused
        }
    }

    pub fn schedule(&self) -> Option<&ScheduleHandle> {
        self.schedule.as_ref()
    }

    /// Enter Running: returns the ticket for the immediate fetch
    ///
    /// No-op while already running.
    pub fn start(&mut self, now: f64) -> Option<FetchTicket> {
        if self.schedule.is_some() {
            return None;
        }
        self.generation += 1;
        self.schedule = Some(ScheduleHandle {
            generation: self.generation,
            next_due: now + self.interval.as_secs_f64(),
        });
        info!(
            generation = self.generation,
            interval_ms = self.interval.as_millis() as u64,
            "Auto-refresh started"
        );
        Some(self.issue())
    }

    /// Enter Paused: cancels the schedule; in-flight results will be dropped
    pub fn pause(&mut self) -> Option<ScheduleHandle> {
        let handle = self.schedule.take();
        if let Some(handle) = &handle {
            info!(generation = handle.generation, "Auto-refresh paused");
        }
        handle
    }

    pub fn toggle(&mut self, now: f64) -> Option<FetchTicket> {
        match self.state() {
            RefreshState::Running => {
                self.pause();
                None
            }
            RefreshState::Paused => self.start(now),
        }
    }

    /// Ticket for the scheduled fetch, if one is due at `now`
    pub fn poll(&mut self, now: f64) -> Option<FetchTicket> {
        let interval = self.interval.as_secs_f64();
        let schedule = self.schedule.as_mut()?;
        if now < schedule.next_due {
            return None;
        }
        schedule.next_due += interval;
        if schedule.next_due <= now {
            // Clock jumped (suspend, stalled frame): skip missed ticks
            schedule.next_due = now + interval;
        }
        Some(self.issue())
    }

    /// Decide what a completion does to the stored snapshot
    ///
    /// Returns `None` when the completion must be discarded: issued before the
    /// last pause, or older than a completion already applied. Failures come
    /// back as the empty snapshot.
    pub fn accept(&mut self, completion: Completion) -> Option<Snapshot> {
        let Completion { ticket, outcome } = completion;
        let live = self
            .schedule
            .as_ref()
            .is_some_and(|s| s.generation == ticket.generation);
        if !live {
            debug!(?ticket, "Discarding fetch result from cancelled schedule");
            return None;
        }
        if self.applied_seq.is_some_and(|applied| ticket.seq <= applied) {
            debug!(?ticket, "Discarding out-of-order fetch result");
            return None;
        }
        self.applied_seq = Some(ticket.seq);

        let snapshot = outcome
            .and_then(|body| parse(&body).map_err(FetchError::from))
            .unwrap_or_else(|e| {
                warn!(seq = ticket.seq, error = %e, "Fetch failed, showing empty snapshot");
                Snapshot::empty()
            });
        Some(snapshot)
    }

    fn issue(&mut self) -> FetchTicket {
        let ticket = FetchTicket {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        ticket
    }
}

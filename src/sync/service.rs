// ABOUTME: Clock service owning the server time offset
// ABOUTME: Single writer (the synchronizer), many readers (window validation)

use crate::sync::clock::{millis_to_datetime, Clock, SystemClock};
use crate::sync::probe::ProbeSource;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct OffsetState {
    offset_ms: i64,
    attempted: bool,
    last_synced_at: Option<DateTime<Utc>>,
    source: Option<ProbeSource>,
}

/// Point-in-time view of the synchronization state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    /// Current offset (`server - client`) in milliseconds
    pub offset_ms: i64,
    /// Whether a synchronization attempt has been made this session
    pub attempted: bool,
    /// Local time of the last successful probe
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Which probe produced the current offset
    pub source: Option<ProbeSource>,
}

/// Local clock plus the estimated offset to server time
///
/// Construct one per process and share it behind an `Arc`. Only the
/// synchronizer writes to it; readers get a cheap snapshot.
#[derive(Debug)]
pub struct ClockService {
    clock: Arc<dyn Clock>,
    state: RwLock<OffsetState>,
}

impl ClockService {
    /// Create a service over the given local clock, with a zero offset
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(OffsetState::default()),
        }
    }

    /// Create a service over the operating system clock
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    /// The underlying local clock
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Raw local time in milliseconds
    #[inline]
    pub fn local_now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Raw local time
    pub fn local_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Current offset in milliseconds
    #[inline]
    pub fn offset_ms(&self) -> i64 {
        self.state.read().offset_ms
    }

    /// Local time corrected by the offset, in milliseconds
    pub fn adjusted_now_millis(&self) -> i64 {
        self.local_now_millis().saturating_add(self.offset_ms())
    }

    /// Local time corrected by the offset
    pub fn adjusted_now(&self) -> DateTime<Utc> {
        millis_to_datetime(self.adjusted_now_millis())
    }

    /// Whether a synchronization attempt has been made
    pub fn has_attempted(&self) -> bool {
        self.state.read().attempted
    }

    /// Snapshot of the whole synchronization state
    pub fn status(&self) -> SyncStatus {
        let state = self.state.read();
        SyncStatus {
            offset_ms: state.offset_ms,
            attempted: state.attempted,
            last_synced_at: state.last_synced_at,
            source: state.source,
        }
    }

    /// Record that a synchronization attempt has started
    pub(crate) fn mark_attempted(&self) {
        self.state.write().attempted = true;
    }

    /// Apply a successful probe and return the new offset
    ///
    /// `t0`/`t1` are local milliseconds before and after the request;
    /// the server is assumed to have answered halfway through.
    pub(crate) fn record_probe(
        &self,
        t0: i64,
        t1: i64,
        server_ms: i64,
        source: ProbeSource,
    ) -> i64 {
        let offset = estimate_offset(t0, t1, server_ms);
        let mut state = self.state.write();
        state.offset_ms = offset;
        state.last_synced_at = Some(millis_to_datetime(t1));
        state.source = Some(source);
        offset
    }

    /// Fall back to local time after every probe failed
    ///
    /// A non-zero offset from an earlier successful sync is kept; otherwise
    /// the offset is reset to zero.
    pub(crate) fn apply_fallback(&self) {
        let mut state = self.state.write();
        if state.attempted && state.offset_ms != 0 {
            log::debug!(
                "Keeping previous clock offset of {}ms after failed sync",
                state.offset_ms
            );
            return;
        }
        log::info!("Using fallback time synchronization (local clock)");
        state.offset_ms = 0;
    }
}

impl Default for ClockService {
    fn default() -> Self {
        Self::system()
    }
}

/// `server - (t0 + floor((t1 - t0) / 2))`
pub(crate) fn estimate_offset(t0: i64, t1: i64, server_ms: i64) -> i64 {
    let latency = t1.saturating_sub(t0).div_euclid(2);
    server_ms.saturating_sub(t0.saturating_add(latency))
}

// ABOUTME: Server time synchronizer
// ABOUTME: Probes local then remote time endpoints and updates the clock service offset

use crate::config::ClientConfig;
use crate::sync::clock::Clock;
use crate::sync::probe::{ProbeError, ProbeTarget, TimeProbe};
use crate::sync::service::ClockService;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Estimates the offset between the local clock and server time
///
/// Probes the local time endpoint first, then the remote service if one is
/// configured. When every probe fails the clock service falls back to local
/// time. Calls are serialized internally, so concurrent callers never race
/// on the offset.
#[derive(Debug)]
pub struct TimeSynchronizer {
    clock: Arc<ClockService>,
    probe: TimeProbe,
    local: Option<ProbeTarget>,
    remote: Option<ProbeTarget>,
    sync_timeout: Duration,
    guard: Mutex<()>,
}

impl TimeSynchronizer {
    /// Create a synchronizer with its own HTTP client
    pub fn new(config: ClientConfig, clock: Arc<ClockService>) -> crate::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self::with_http(config, clock, http))
    }

    /// Create a synchronizer that shares an existing HTTP client
    pub fn with_http(config: ClientConfig, clock: Arc<ClockService>, http: reqwest::Client) -> Self {
        Self {
            local: config.local_time_url().map(ProbeTarget::local),
            remote: config.configured_api_url().map(ProbeTarget::remote),
            probe: TimeProbe::new(http, config.probe_timeout),
            sync_timeout: config.sync_timeout,
            clock,
            guard: Mutex::new(()),
        }
    }

    /// The clock service this synchronizer writes to
    pub fn clock(&self) -> &Arc<ClockService> {
        &self.clock
    }

    /// Whether any probe target is configured
    pub fn has_targets(&self) -> bool {
        self.local.is_some() || self.remote.is_some()
    }

    /// Run one synchronization attempt, bounded only by the probe timeouts
    ///
    /// Returns `true` if a probe succeeded and the offset was updated.
    pub async fn synchronize(&self) -> bool {
        let _guard = self.guard.lock().await;
        self.attempt(&CancellationToken::new()).await
    }

    /// Run one synchronization attempt bounded by `limit`
    ///
    /// When the limit expires the in-flight probe is cancelled, the fallback
    /// runs and the attempt reports failure.
    pub async fn synchronize_within(&self, limit: Duration) -> bool {
        let _guard = self.guard.lock().await;
        self.attempt_within(limit).await
    }

    /// Startup synchronization: runs at most once per clock service
    ///
    /// Returns `None` if an attempt was already made, otherwise the result of
    /// a [`synchronize_within`](Self::synchronize_within) bounded by the
    /// configured sync timeout.
    pub async fn synchronize_once(&self) -> Option<bool> {
        let _guard = self.guard.lock().await;
        if self.clock.has_attempted() {
            log::debug!("Time sync already attempted, skipping");
            return None;
        }
        Some(self.attempt_within(self.sync_timeout).await)
    }

    async fn attempt_within(&self, limit: Duration) -> bool {
        let cancel = CancellationToken::new();
        let attempt = self.attempt(&cancel);
        tokio::pin!(attempt);

        tokio::select! {
            synced = &mut attempt => synced,
            _ = tokio::time::sleep(limit) => {
                log::error!("Time sync timed out after {:?}", limit);
                // The in-flight probe returns Cancelled, so the attempt skips
                // any remaining target and runs the fallback itself.
                cancel.cancel();
                attempt.await
            }
        }
    }

    async fn attempt(&self, cancel: &CancellationToken) -> bool {
        if !self.has_targets() {
            log::warn!("No time endpoint configured, skipping time sync");
            return false;
        }

        self.clock.mark_attempted();
        let clock: &dyn Clock = &**self.clock.clock();

        for target in [&self.local, &self.remote].into_iter().flatten() {
            match self.probe.probe(target, clock, cancel).await {
                Ok(sample) => {
                    let offset =
                        self.clock
                            .record_probe(sample.t0, sample.t1, sample.server_ms, target.source);
                    log::info!(
                        "Clock synchronized with {} time endpoint. Offset: {}ms",
                        target.source,
                        offset
                    );
                    return true;
                }
                Err(ProbeError::Cancelled) => {
                    log::warn!("Time sync cancelled");
                    break;
                }
                Err(e) => {
                    log::warn!("{} time sync via {} failed: {}", target.source, target.url, e);
                }
            }
        }

        if self.remote.is_none() {
            log::warn!("No API URL configured, remote time sync unavailable");
        }

        self.clock.apply_fallback();
        false
    }
}

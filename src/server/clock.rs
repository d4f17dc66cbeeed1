// ABOUTME: Server-side wall clock for the time endpoint
// ABOUTME: Produces authoritative timestamps in Unix milliseconds, RFC 3339 and zone name

use crate::protocol::messages::TimeResponse;
use crate::sync::{Clock, SystemClock};
use chrono::SecondsFormat;
use std::sync::Arc;

/// Server clock for generating time responses
///
/// Wraps a [`Clock`] so tests can pin the time the endpoint reports.
#[derive(Debug, Clone)]
pub struct ServerClock {
    /// Underlying wall clock
    clock: Arc<dyn Clock>,
    /// Reported timezone name
    timezone: String,
}

impl ServerClock {
    /// Create a server clock over the system clock
    pub fn new(timezone: impl Into<String>) -> Self {
        Self::with_clock(Arc::new(SystemClock), timezone)
    }

    /// Create a server clock over an arbitrary clock
    pub fn with_clock(clock: Arc<dyn Clock>, timezone: impl Into<String>) -> Self {
        Self {
            clock,
            timezone: timezone.into(),
        }
    }

    /// Get current server time in Unix milliseconds
    #[inline]
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Reported timezone name
    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    /// Build the endpoint response for the current instant
    pub fn time_response(&self) -> TimeResponse {
        let now = self.clock.now();
        TimeResponse {
            timestamp: now.timestamp_millis(),
            iso8601: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            timezone: Some(self.timezone.clone()),
        }
    }
}

impl Default for ServerClock {
    fn default() -> Self {
        Self::new("UTC")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::ManualClock;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_clock_advances() {
        let clock = ServerClock::default();
        let t1 = clock.now_millis();
        sleep(Duration::from_millis(10));
        let t2 = clock.now_millis();

        assert!(t2 >= t1 + 10, "At least 10ms should have passed");
    }

    #[test]
    fn test_time_response_fields_agree() {
        let clock = ServerClock::with_clock(Arc::new(ManualClock::new(1_735_732_800_123)), "Europe/Oslo");
        let response = clock.time_response();

        assert_eq!(response.timestamp, 1_735_732_800_123);
        assert_eq!(response.iso8601.as_deref(), Some("2025-01-01T12:00:00.123Z"));
        assert_eq!(response.timezone.as_deref(), Some("Europe/Oslo"));
    }
}

// ABOUTME: Reservation window validation
// ABOUTME: Future start (with tolerance), end after start, and duration bounds against adjusted time

use crate::sync::ClockService;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;
use thiserror::Error;

/// Grace period allowing a start slightly in the past to count as future
pub const FUTURE_TOLERANCE: Duration = Duration::from_secs(5 * 60);
/// Shortest bookable reservation (inclusive)
pub const MIN_DURATION: Duration = Duration::from_secs(30 * 60);
/// Longest bookable reservation (inclusive)
pub const MAX_DURATION: Duration = Duration::from_secs(24 * 60 * 60);

fn delta(duration: Duration) -> TimeDelta {
    TimeDelta::milliseconds(duration.as_millis() as i64)
}

/// Why a reservation window was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Start is more than the tolerance before adjusted now
    #[error("Start time must be in the future")]
    NotInFuture,
    /// End is not strictly after start
    #[error("End time must be after start time")]
    EndBeforeStart,
    /// Length is outside the bookable range
    #[error("Reservation duration must be between 30 minutes and 24 hours")]
    InvalidDuration,
}

/// Whether `instant` is after adjusted now minus [`FUTURE_TOLERANCE`]
///
/// If the cutoff falls before the earliest representable instant, every
/// instant counts as future.
pub fn is_in_future(clock: &ClockService, instant: DateTime<Utc>) -> bool {
    match clock
        .adjusted_now()
        .checked_sub_signed(delta(FUTURE_TOLERANCE))
    {
        Some(cutoff) => instant > cutoff,
        None => true,
    }
}

/// Whether `end` is strictly after `start`
pub fn is_end_after_start(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    end > start
}

/// Whether `end - start` lies within [`MIN_DURATION`, `MAX_DURATION`]
pub fn is_duration_valid(start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let length = end - start;
    length >= delta(MIN_DURATION) && length <= delta(MAX_DURATION)
}

/// A candidate reservation interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationWindow {
    /// Requested start
    pub start: DateTime<Utc>,
    /// Requested end
    pub end: DateTime<Utc>,
}

impl ReservationWindow {
    /// Create a window
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Length of the window (negative if end precedes start)
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Check the window, reporting the first failed rule
    ///
    /// Rules are checked in order: future start, ordering, duration.
    pub fn validate(&self, clock: &ClockService) -> Result<(), ValidationError> {
        match self.violations(clock).first() {
            Some(err) => Err(*err),
            None => Ok(()),
        }
    }

    /// Every rule the window breaks, in check order
    pub fn violations(&self, clock: &ClockService) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !is_in_future(clock, self.start) {
            errors.push(ValidationError::NotInFuture);
        }
        if !is_end_after_start(self.start, self.end) {
            errors.push(ValidationError::EndBeforeStart);
        }
        if !is_duration_valid(self.start, self.end) {
            errors.push(ValidationError::InvalidDuration);
        }
        errors
    }
}

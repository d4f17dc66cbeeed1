// ABOUTME: Reservation module
// ABOUTME: Validation of reservation windows against server-adjusted time

mod window;

pub use window::{
    is_duration_valid, is_end_after_start, is_in_future, ReservationWindow, ValidationError,
    FUTURE_TOLERANCE, MAX_DURATION, MIN_DURATION,
};

// ABOUTME: Reservation service API module
// ABOUTME: Typed REST client and error message extraction

mod client;
mod errors;

pub use client::ApiClient;
pub use errors::{error_message, reservation_error_message};

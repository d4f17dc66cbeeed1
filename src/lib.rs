// ABOUTME: Main library entry point for parkreserve
// ABOUTME: Exports clock synchronization, reservation window validation, API client and time server

//! # parkreserve
//!
//! Client-side core of a parking reservation product.
//!
//! The remote reservation service is authoritative for everything it stores,
//! but a client still has to decide locally whether a reservation window is
//! worth submitting. This crate estimates the offset between the local clock
//! and server time, and validates reservation windows against the corrected
//! ("adjusted") time so a client with a skewed system clock does not reject
//! or accept the wrong intervals.
//!
//! ## Features
//!
//! - **Sync**: best-effort server clock synchronization with local and remote probes
//! - **Reservation**: window validation (future start, ordering, duration bounds)
//! - **API**: typed client for the reservation REST service
//! - **Server**: same-origin time endpoint used as the local probe target
//!
//! ## Example: Synchronize and validate
//!
//! ```no_run
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use parkreserve::{ClientConfig, ClockService, ReservationWindow, TimeSynchronizer};
//!
//! #[tokio::main]
//! async fn main() {
//!     let clock = Arc::new(ClockService::system());
//!     let sync = TimeSynchronizer::new(ClientConfig::default(), clock.clone()).unwrap();
//!     sync.synchronize_once().await;
//!
//!     let start = Utc::now() + Duration::minutes(10);
//!     let window = ReservationWindow::new(start, start + Duration::hours(1));
//!     assert!(window.validate(&clock).is_ok());
//! }
//! ```

#![warn(missing_docs)]

/// REST client for the reservation service
pub mod api;
/// Shared command-line arguments
pub mod cli;
/// Client configuration
pub mod config;
/// Wire types shared with the reservation service and the time endpoint
pub mod protocol;
/// Reservation window validation
pub mod reservation;
/// Time endpoint server
pub mod server;
/// Clock synchronization utilities
pub mod sync;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use reservation::{ReservationWindow, ValidationError};
pub use server::{TimeServer, TimeServerConfig};
pub use sync::{Clock, ClockService, SystemClock, TimeSynchronizer};

/// Result type for parkreserve operations
pub type Result<T> = std::result::Result<T, error::Error>;

/// Error types for parkreserve
pub mod error {
    use crate::reservation::ValidationError;
    use crate::sync::ProbeError;
    use thiserror::Error;

    /// Error types for parkreserve operations
    #[derive(Error, Debug)]
    pub enum Error {
        /// Transport-level HTTP failure
        #[error("HTTP error: {0}")]
        Http(#[from] reqwest::Error),

        /// Non-2xx response from the reservation service
        #[error("{message}")]
        Api {
            /// HTTP status code
            status: u16,
            /// User-facing message extracted from the response
            message: String,
        },

        /// Reservation window rejected before submission
        #[error(transparent)]
        Validation(#[from] ValidationError),

        /// Time probe failure
        #[error("Time probe error: {0}")]
        Probe(#[from] ProbeError),

        /// Invalid configuration
        #[error("Configuration error: {0}")]
        Config(String),

        /// I/O error (binding, serving)
        #[error("I/O error: {0}")]
        Io(#[from] std::io::Error),
    }

    impl Error {
        /// HTTP status of an API error, if any
        pub fn status(&self) -> Option<u16> {
            match self {
                Error::Api { status, .. } => Some(*status),
                Error::Http(e) => e.status().map(|s| s.as_u16()),
                _ => None,
            }
        }
    }
}

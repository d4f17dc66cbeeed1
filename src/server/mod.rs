// ABOUTME: Server module for the time endpoint
// ABOUTME: Provides the HTTP server, its clock and its configuration

mod clock;
mod config;
mod server;

pub use clock::ServerClock;
pub use config::{default_timezone, TimeServerConfig};
pub use server::{AppState, TimeServer};

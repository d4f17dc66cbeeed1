// ABOUTME: Time server configuration
// ABOUTME: Bind address, endpoint paths and reported timezone

use std::net::SocketAddr;

/// Time server configuration
#[derive(Clone, Debug)]
pub struct TimeServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Same-origin time endpoint path
    pub time_path: String,
    /// Timezone name reported in responses
    pub timezone: String,
}

impl TimeServerConfig {
    /// Create a configuration bound to the given address
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set the time endpoint path
    pub fn time_path(mut self, path: impl Into<String>) -> Self {
        self.time_path = path.into();
        self
    }

    /// Set the reported timezone
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Path of the endpoint that mirrors the reservation service's time route
    pub fn server_time_path(&self) -> String {
        format!("{}/server-time", self.time_path.trim_end_matches('/'))
    }
}

impl Default for TimeServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            time_path: "/api/time".to_string(),
            timezone: default_timezone(),
        }
    }
}

/// `TZ` from the environment, or UTC
pub fn default_timezone() -> String {
    std::env::var("TZ")
        .ok()
        .map(|tz| tz.trim().to_string())
        .filter(|tz| !tz.is_empty())
        .unwrap_or_else(|| "UTC".to_string())
}

// ABOUTME: Client configuration
// ABOUTME: Time endpoint, reservation service URL and synchronization timeouts

use std::time::Duration;

/// Environment variable naming the reservation service base URL
pub const API_URL_ENV: &str = "PARKRESERVE_API_URL";
/// Environment variable naming the local time endpoint
pub const TIME_URL_ENV: &str = "PARKRESERVE_TIME_URL";

/// Reservation service URL used when none is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Local time endpoint used when none is configured
pub const DEFAULT_TIME_URL: &str = "http://localhost:3000/api/time";

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Explicitly configured reservation service base URL
    pub api_url: Option<String>,
    /// Local (same-origin) time endpoint
    pub time_url: Option<String>,
    /// Timeout for a single time probe
    pub probe_timeout: Duration,
    /// Timeout for a whole synchronization attempt
    pub sync_timeout: Duration,
}

impl ClientConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(url) = lookup(API_URL_ENV) {
            config = config.api_url(url);
        }
        if let Some(url) = lookup(TIME_URL_ENV) {
            config = config.time_url(url);
        }
        config
    }

    /// Set the reservation service base URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Set the local time endpoint
    pub fn time_url(mut self, url: impl Into<String>) -> Self {
        self.time_url = Some(url.into());
        self
    }

    /// Disable the local time probe
    pub fn no_local_time_url(mut self) -> Self {
        self.time_url = None;
        self
    }

    /// Set the single-probe timeout
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the whole-attempt timeout
    pub fn sync_timeout(mut self, timeout: Duration) -> Self {
        self.sync_timeout = timeout;
        self
    }

    /// The API URL, only if one was explicitly configured and is non-blank
    pub fn configured_api_url(&self) -> Option<&str> {
        non_blank(self.api_url.as_deref())
    }

    /// The API URL to send requests to, falling back to the default
    pub fn api_base_url(&self) -> &str {
        self.configured_api_url().unwrap_or(DEFAULT_API_URL)
    }

    /// The local time endpoint, if any
    pub fn local_time_url(&self) -> Option<&str> {
        non_blank(self.time_url.as_deref())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            time_url: Some(DEFAULT_TIME_URL.to_string()),
            probe_timeout: Duration::from_secs(3),
            sync_timeout: Duration::from_secs(5),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

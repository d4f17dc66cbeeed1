// ABOUTME: Shared CLI argument parsing and config builder utilities
// ABOUTME: Consolidates common code between the client and time server binaries

use crate::config::ClientConfig;
use crate::server::TimeServerConfig;
use clap::Args;
use std::net::SocketAddr;
use std::time::Duration;

/// Initialize tracing based on verbosity flag
///
/// `RUST_LOG` takes precedence when set. Library code logs through the `log`
/// facade, which the subscriber picks up.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "parkreserve=debug"
    } else {
        "parkreserve=info"
    }
}

/// Client arguments shared by every `parkreserve` subcommand
///
/// Use with `#[command(flatten)]` in the binary's Args struct.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// Reservation service base URL (also enables the remote time probe)
    #[arg(long, env = "PARKRESERVE_API_URL")]
    pub api_url: Option<String>,

    /// Local time endpoint URL
    #[arg(long, env = "PARKRESERVE_TIME_URL", default_value = "http://localhost:3000/api/time")]
    pub time_url: String,

    /// Skip the local time endpoint and only probe the reservation service
    #[arg(long)]
    pub no_local_time: bool,

    /// Timeout for a single time probe in milliseconds
    #[arg(long, default_value = "3000")]
    pub probe_timeout_ms: u64,

    /// Timeout for the whole time sync in milliseconds
    #[arg(long, default_value = "5000")]
    pub sync_timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl ClientArgs {
    /// Initialize tracing based on verbosity flag
    pub fn init_tracing(&self) {
        init_tracing(self.verbose);
    }

    /// Build ClientConfig from these args
    pub fn build_config(&self) -> ClientConfig {
        let mut config = ClientConfig::default()
            .time_url(self.time_url.clone())
            .probe_timeout(Duration::from_millis(self.probe_timeout_ms))
            .sync_timeout(Duration::from_millis(self.sync_timeout_ms));
        if let Some(url) = &self.api_url {
            config = config.api_url(url.clone());
        }
        if self.no_local_time {
            config = config.no_local_time_url();
        }
        config
    }
}

/// Time server arguments
#[derive(Args, Debug, Clone)]
pub struct TimeServerArgs {
    /// Address to bind the server to
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Time endpoint path (`<path>/server-time` is served too)
    #[arg(long, default_value = "/api/time")]
    pub path: String,

    /// Timezone name reported to clients (defaults to $TZ, then UTC)
    #[arg(long)]
    pub timezone: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl TimeServerArgs {
    /// Initialize tracing based on verbosity flag
    pub fn init_tracing(&self) {
        init_tracing(self.verbose);
    }

    /// Log startup information
    pub fn log_startup_info(&self) {
        tracing::info!("Parkreserve time server v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("Bind: {}", self.bind);
        tracing::info!("Endpoint: http://{}{}", self.bind, self.path);
    }

    /// Build TimeServerConfig from these args
    pub fn build_config(&self) -> TimeServerConfig {
        let config = TimeServerConfig::new(self.bind).time_path(self.path.clone());
        match &self.timezone {
            Some(tz) => config.timezone(tz.clone()),
            None => config,
        }
    }
}

// ABOUTME: Parkreserve time server binary
// ABOUTME: Standalone HTTP server exposing authoritative time for client clock sync

use clap::Parser;
use parkreserve::cli::TimeServerArgs;
use parkreserve::TimeServer;

#[derive(Parser, Debug)]
#[command(name = "parkreserve-time-server")]
#[command(author, version, about = "Parkreserve server time endpoint", long_about = None)]
struct Args {
    #[command(flatten)]
    server: TimeServerArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize tracing
    args.server.init_tracing();

    // Log startup info
    args.server.log_startup_info();

    // Create and run server
    let server = TimeServer::with_config(args.server.build_config());
    tracing::info!("Timezone: {}", server.config().timezone);
    tracing::info!("Press Ctrl+C to stop");

    server.run().await?;
    Ok(())
}

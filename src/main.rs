// ABOUTME: Parkreserve client binary
// ABOUTME: Synchronizes with server time, validates windows and manages reservations

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use parkreserve::cli::ClientArgs;
use parkreserve::protocol::ReservationDto;
use parkreserve::{ApiClient, ClockService, ReservationWindow, TimeSynchronizer};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "parkreserve")]
#[command(author, version, about = "Parking reservation client", long_about = None)]
struct Args {
    #[command(flatten)]
    client: ClientArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synchronize with server time and print the offset
    Sync,
    /// Check a reservation window against server time
    Check {
        /// Start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// End (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,
    },
    /// Create a reservation
    Reserve {
        /// Bearer token
        #[arg(long, env = "PARKRESERVE_TOKEN")]
        token: String,
        /// Vehicle to reserve for
        #[arg(long)]
        vehicle_id: i64,
        /// Parking space to reserve
        #[arg(long)]
        space_id: i64,
        /// Start (RFC 3339)
        #[arg(long)]
        start: DateTime<Utc>,
        /// End (RFC 3339)
        #[arg(long)]
        end: DateTime<Utc>,
        /// Notes for the reservation
        #[arg(long)]
        notes: Option<String>,
    },
    /// List reservations
    Reservations {
        /// Bearer token
        #[arg(long, env = "PARKRESERVE_TOKEN")]
        token: String,
        /// Only active reservations
        #[arg(long)]
        active: bool,
    },
    /// Cancel a reservation
    Cancel {
        /// Bearer token
        #[arg(long, env = "PARKRESERVE_TOKEN")]
        token: String,
        /// Reservation id
        #[arg(long)]
        id: i64,
    },
}

fn print_reservation(r: &ReservationDto) {
    println!(
        "#{} {} {} -> {} space={} vehicle={} {}",
        r.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string()),
        r.reservation_code.as_deref().unwrap_or(""),
        r.start_time.to_rfc3339(),
        r.end_time.to_rfc3339(),
        r.space_number
            .clone()
            .unwrap_or_else(|| r.parking_space_id.to_string()),
        r.vehicle_id,
        r.status.as_deref().unwrap_or("")
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Initialize tracing
    args.client.init_tracing();

    let config = args.client.build_config();
    let clock = Arc::new(ClockService::system());
    let synchronizer = TimeSynchronizer::new(config.clone(), clock.clone())?;
    let api = ApiClient::new(&config)?;

    match args.command {
        Command::Sync => {
            let synced = synchronizer.synchronize_once().await.unwrap_or(false);
            let status = clock.status();
            if synced {
                println!(
                    "Synchronized via {} endpoint, offset {}ms",
                    status.source.map(|s| s.as_str()).unwrap_or("unknown"),
                    status.offset_ms
                );
            } else {
                println!("Time sync failed, using local clock (offset {}ms)", status.offset_ms);
            }
            println!("Adjusted time: {}", clock.adjusted_now().to_rfc3339());
        }
        Command::Check { start, end } => {
            synchronizer.synchronize_once().await;
            let violations = ReservationWindow::new(start, end).violations(&clock);
            if violations.is_empty() {
                println!("Reservation window is valid");
            } else {
                for violation in &violations {
                    println!("{violation}");
                }
                return Err("Reservation window is invalid".into());
            }
        }
        Command::Reserve {
            token,
            vehicle_id,
            space_id,
            start,
            end,
            notes,
        } => {
            synchronizer.synchronize_once().await;
            let mut request = ReservationDto::new(vehicle_id, space_id, start, end);
            request.notes = notes;

            let created = api
                .with_token(token)
                .create_reservation(&clock, &request)
                .await?;
            println!("Reservation created:");
            print_reservation(&created);
        }
        Command::Reservations { token, active } => {
            let api = api.with_token(token);
            let reservations = if active {
                api.active_reservations().await?
            } else {
                api.reservations().await?
            };
            if reservations.is_empty() {
                println!("No reservations");
            }
            for reservation in &reservations {
                print_reservation(reservation);
            }
        }
        Command::Cancel { token, id } => {
            let cancelled = api.with_token(token).cancel_reservation(id).await?;
            println!("Reservation cancelled:");
            print_reservation(&cancelled);
        }
    }

    Ok(())
}

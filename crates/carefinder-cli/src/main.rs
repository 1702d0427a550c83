mod geocode;
mod location;
mod render;
mod search;

use carefinder_core::{distance_miles, round_tenth, Environment, EventBus};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::location::LocationCommands;

#[derive(Debug, Parser)]
#[command(name = "carefinder")]
#[command(about = "Find therapists near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for providers near a location
    Find {
        /// Latitude to search around (defaults to the cached location)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude to search around
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Address or place name to search around
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        location: Option<String>,
        /// Specialty filter; "all" searches every specialty
        #[arg(long, default_value = "all")]
        specialty: String,
        /// Use the standard search instead of the enhanced one
        #[arg(long)]
        standard: bool,
        /// Provider id to select and show in detail
        #[arg(long)]
        select: Option<String>,
        /// Show generated sample providers when nothing is found
        #[arg(long)]
        sample_fallback: bool,
    },
    /// Search the filterable legacy endpoint
    Legacy {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Maximum distance in miles
        #[arg(long, default_value = "10")]
        distance: f64,
        #[arg(long, default_value = "all")]
        specialty: String,
        #[arg(long, default_value = "all")]
        insurance: String,
        #[arg(long, default_value = "any")]
        availability: String,
        #[arg(long, default_value = "distance")]
        sort: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Inspect or change the cached location
    Location {
        #[command(subcommand)]
        command: LocationCommands,
    },
    /// Great-circle distance in miles between two points
    Distance {
        #[arg(allow_hyphen_values = true)]
        lat1: f64,
        #[arg(allow_hyphen_values = true)]
        lon1: f64,
        #[arg(allow_hyphen_values = true)]
        lat2: f64,
        #[arg(allow_hyphen_values = true)]
        lon2: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = carefinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    let decorated = decorated_logs(&config.env);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(decorated)
        .with_target(decorated)
        .init();

    let bus = EventBus::new();
    spawn_event_log(&bus);

    match cli.command {
        Some(Commands::Find {
            lat,
            lng,
            location,
            specialty,
            standard,
            select,
            sample_fallback,
        }) => {
            let args = search::FindArgs {
                position: lat.zip(lng),
                location,
                specialty,
                standard,
                select,
                sample_fallback,
            };
            search::run_find(&config, &bus, args).await?;
        }
        Some(Commands::Legacy {
            lat,
            lng,
            distance,
            specialty,
            insurance,
            availability,
            sort,
            limit,
        }) => {
            let args = search::LegacyArgs {
                lat,
                lng,
                distance,
                specialty,
                insurance,
                availability,
                sort,
                limit,
            };
            search::run_legacy(&config, &bus, args).await?;
        }
        Some(Commands::Location { command }) => {
            location::run(&config, &bus, command).await?;
        }
        Some(Commands::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        }) => {
            let miles = distance_miles(lat1, lon1, lat2, lon2);
            println!("{:.1} miles", round_tenth(miles));
        }
        None => println!("carefinder: pass --help for available commands"),
    }

    Ok(())
}

/// Colour and module targets in log lines; production logs stay plain.
fn decorated_logs(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}

/// Mirrors every bus notification into the log at debug level.
fn spawn_event_log(bus: &EventBus) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(notification) => {
                    tracing::debug!(event = notification.name(), ?notification, "notification");
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "event log lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

//! `carefinder location …` handlers.

use anyhow::Context;
use carefinder_core::{AppConfig, Coordinate, EventBus, Fix};
use carefinder_locate::{
    DeviceLocator, FileStore, FixedLocator, LocateOptions, LocationCache, LocationProvider,
};
use clap::Subcommand;

/// Accuracy recorded for manually entered coordinates, in metres.
const MANUAL_ACCURACY_M: f64 = 100.0;

#[derive(Debug, Subcommand)]
pub enum LocationCommands {
    /// Print the cached location if it is still fresh
    Show,
    /// Forget the cached location
    Clear,
    /// Store a location directly
    Set {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Accuracy in metres
        #[arg(long, default_value_t = MANUAL_ACCURACY_M)]
        accuracy: f64,
    },
    /// Resolve the current location through the location provider
    Locate {
        /// Position reported by the locator; without it only the cache is consulted
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Ignore the cached location
        #[arg(long)]
        fresh: bool,
    },
}

pub(crate) fn locate_options(config: &AppConfig) -> LocateOptions {
    LocateOptions {
        max_age_ms: config.location_max_age_ms,
        timeout_ms: config.location_timeout_ms,
        ..LocateOptions::default()
    }
}

/// Resolves a fix from `position` when given, otherwise from the cache only.
pub(crate) async fn resolve(
    config: &AppConfig,
    bus: &EventBus,
    position: Option<(f64, f64)>,
    fresh: bool,
) -> anyhow::Result<Fix> {
    let store = FileStore::new(config.location_store_path.clone());
    let options = LocateOptions {
        force_fresh: fresh,
        ..locate_options(config)
    };

    match position {
        Some((lat, lng)) => {
            let coordinate = Coordinate::new(lat, lng)?;
            let locator = FixedLocator::new(coordinate, MANUAL_ACCURACY_M);
            // Manual coordinates always win over whatever is cached.
            let options = LocateOptions {
                force_fresh: true,
                ..options
            };
            locate_with(locator, store, bus, &options).await
        }
        // No device on a terminal: a cache miss ends in PositionUnavailable.
        None => locate_with(FixedLocator::unavailable(), store, bus, &options)
            .await
            .context("no fresh cached location; pass --lat and --lng"),
    }
}

async fn locate_with<D: DeviceLocator>(
    device: D,
    store: FileStore,
    bus: &EventBus,
    options: &LocateOptions,
) -> anyhow::Result<Fix> {
    let provider = LocationProvider::new(device, store, bus.clone());
    Ok(provider.get_location(options).await?)
}

pub(crate) async fn run(
    config: &AppConfig,
    bus: &EventBus,
    command: LocationCommands,
) -> anyhow::Result<()> {
    let cache = LocationCache::new(FileStore::new(config.location_store_path.clone()), bus.clone());

    match command {
        LocationCommands::Show => match cache.read(config.location_max_age_ms) {
            Some(fix) => print_fix(&fix),
            None => println!("no fresh cached location"),
        },
        LocationCommands::Clear => {
            cache.clear();
            println!("cached location cleared");
        }
        LocationCommands::Set { lat, lng, accuracy } => {
            let coordinate = Coordinate::new(lat, lng)?;
            let fix = Fix {
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
                accuracy,
                timestamp: chrono::Utc::now().timestamp_millis(),
            };
            cache.save(&fix);
            print_fix(&fix);
        }
        LocationCommands::Locate { lat, lng, fresh } => {
            let fix = resolve(config, bus, lat.zip(lng), fresh).await?;
            print_fix(&fix);
        }
    }
    Ok(())
}

fn print_fix(fix: &Fix) {
    let when = chrono::DateTime::from_timestamp_millis(fix.timestamp)
        .map_or_else(|| fix.timestamp.to_string(), |t| t.to_rfc3339());
    println!(
        "{:.5}, {:.5} (±{:.0} m) at {when}",
        fix.latitude, fix.longitude, fix.accuracy
    );
}

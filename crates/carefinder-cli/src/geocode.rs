//! Gazetteer-backed geocoding for `find --location`.

use std::path::Path;

use anyhow::Context;
use carefinder_core::{AppConfig, Coordinate, CoordinateError};
use carefinder_view::MemoryGeocoder;
use serde::Deserialize;

/// One entry of the gazetteer file, a JSON array of these.
#[derive(Debug, Deserialize)]
struct Place {
    address: String,
    lat: f64,
    lng: f64,
}

/// Builds the geocoder from the configured gazetteer. Without one every
/// address lookup comes back not found.
pub(crate) fn load_geocoder(config: &AppConfig) -> anyhow::Result<MemoryGeocoder> {
    let Some(path) = config.gazetteer_path.as_deref() else {
        tracing::debug!("no gazetteer configured");
        return Ok(MemoryGeocoder::new());
    };
    let geocoder = read_gazetteer(path)?;
    tracing::debug!(path = %path.display(), places = geocoder.len(), "gazetteer loaded");
    Ok(geocoder)
}

fn read_gazetteer(path: &Path) -> anyhow::Result<MemoryGeocoder> {
    let body = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read gazetteer {}", path.display()))?;
    parse_gazetteer(&body).with_context(|| format!("invalid gazetteer {}", path.display()))
}

fn parse_gazetteer(body: &str) -> anyhow::Result<MemoryGeocoder> {
    let places: Vec<Place> = serde_json::from_str(body)?;
    let geocoder = places
        .into_iter()
        .map(|p| Coordinate::new(p.lat, p.lng).map(|position| (p.address, position)))
        .collect::<Result<MemoryGeocoder, CoordinateError>>()?;
    Ok(geocoder)
}

//! `carefinder find` and `carefinder legacy` handlers.

use anyhow::Context;
use carefinder_core::{AppConfig, Coordinate, EventBus, SearchQuery};
use carefinder_search::{
    LegacyQuery, SearchClient, SearchOptions, SearchOrchestrator, SearchOutcome,
    DEFAULT_SAMPLE_COUNT,
};
use carefinder_view::{
    GeocodeError, Geocoder, MemoryList, MemoryMap, MountOptions, ViewSession,
};

use crate::geocode;
use crate::location;
use crate::render;

#[derive(Debug)]
pub(crate) struct FindArgs {
    pub position: Option<(f64, f64)>,
    pub location: Option<String>,
    pub specialty: String,
    pub standard: bool,
    pub select: Option<String>,
    pub sample_fallback: bool,
}

#[derive(Debug)]
pub(crate) struct LegacyArgs {
    pub lat: f64,
    pub lng: f64,
    pub distance: f64,
    pub specialty: String,
    pub insurance: String,
    pub availability: String,
    pub sort: String,
    pub limit: u32,
}

type TerminalSession = ViewSession<MemoryMap, MemoryList>;

fn orchestrator(
    config: &AppConfig,
    bus: &EventBus,
    sample_fallback: bool,
) -> anyhow::Result<SearchOrchestrator> {
    let client = SearchClient::from_config(config).context("failed to build search client")?;
    let mut options = SearchOptions::from_config(config);
    options.sample_fallback |= sample_fallback;
    Ok(SearchOrchestrator::new(client, bus.clone(), options))
}

fn blank_session() -> TerminalSession {
    ViewSession::new(MemoryMap::new(), MemoryList::new(), MountOptions::default())
}

fn new_session(origin: Coordinate) -> TerminalSession {
    let mut session = blank_session();
    session.set_user_location(origin);
    session
}

/// Search origin and the address to show for it.
///
/// A typed address is geocoded and shown as entered. Otherwise the location
/// provider supplies the origin and its address is looked up in reverse.
async fn resolve_origin<G: Geocoder>(
    config: &AppConfig,
    bus: &EventBus,
    geocoder: &G,
    args: &FindArgs,
) -> anyhow::Result<(Coordinate, Option<String>)> {
    if let Some(address) = args.location.as_deref() {
        return match geocoder.geocode(address).await {
            Ok(origin) => Ok((origin, Some(address.trim().to_string()))),
            Err(e) => {
                let mut session = blank_session();
                match &e {
                    GeocodeError::NotFound { .. } => session.show_location_not_found(),
                    other => session.show_error(&other.to_string()),
                }
                render::print_session(&session, false);
                Err(e.into())
            }
        };
    }

    let origin = location::resolve(config, bus, args.position, false)
        .await?
        .coordinate();
    let address = match geocoder.reverse_geocode(origin).await {
        Ok(address) => Some(address),
        Err(e) => {
            tracing::debug!(error = %e, "no address for search origin");
            None
        }
    };
    Ok((origin, address))
}

/// Runs one search and renders the result list.
///
/// A failed search is rendered as an error notice and then returned, so the
/// process exits non-zero.
pub(crate) async fn run_find(
    config: &AppConfig,
    bus: &EventBus,
    args: FindArgs,
) -> anyhow::Result<()> {
    let geocoder = geocode::load_geocoder(config)?;
    let (origin, address) = resolve_origin(config, bus, &geocoder, &args).await?;
    let enhanced = config.enhanced_search && !args.standard;
    let query = SearchQuery::new(origin, &args.specialty, enhanced);

    let search = orchestrator(config, bus, args.sample_fallback)?;
    let mut session = new_session(origin);
    if let Some(address) = address {
        session.set_user_address(address);
    }
    session.show_loading();

    let mut fallback = false;
    match search.search(&query).await {
        Ok(SearchOutcome::Found(records)) => session.populate(&records),
        Ok(SearchOutcome::Fallback(records)) => {
            fallback = true;
            session.populate(&records);
        }
        Ok(SearchOutcome::Empty) => {
            match search.sample_fallback(&query, DEFAULT_SAMPLE_COUNT) {
                Some(samples) => {
                    fallback = true;
                    session.populate(&samples);
                }
                None => session.show_empty(),
            }
        }
        Err(e) => {
            session.show_error(&format!("There was an error finding therapists: {e}"));
            render::print_session(&session, false);
            return Err(e.into());
        }
    }

    if let Some(id) = args.select.as_deref() {
        session.select(id)?;
    }
    render::print_session(&session, fallback);
    Ok(())
}

pub(crate) async fn run_legacy(
    config: &AppConfig,
    bus: &EventBus,
    args: LegacyArgs,
) -> anyhow::Result<()> {
    let origin = Coordinate::new(args.lat, args.lng)?;
    let query = LegacyQuery {
        max_distance_miles: args.distance,
        specialty: args.specialty,
        insurance: args.insurance,
        availability: args.availability,
        sort_by: args.sort,
        limit: args.limit,
        ..LegacyQuery::new(origin)
    };

    let search = orchestrator(config, bus, false)?;
    let mut session = new_session(origin);
    session.show_loading();

    match search.legacy_search(&query).await {
        Ok(records) => session.populate(&records),
        Err(e) => {
            session.show_error(&format!("There was an error finding therapists: {e}"));
            render::print_session(&session, false);
            return Err(e.into());
        }
    }
    render::print_session(&session, false);
    Ok(())
}

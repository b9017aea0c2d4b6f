//! Globe demo: a headless visualization pass over synthetic flight data
//!
//! Usage: `globe_demo [config.toml | config.ron]`

use rand::prelude::*;
use rand::rngs::StdRng;
use route_globe::config::ConfigError;
use route_globe::foundation::logging;
use route_globe::prelude::*;
use std::collections::VecDeque;
use thiserror::Error;

// Synthetic data
const NUM_AIRPORTS: usize = 400;
const NUM_ROUTES: usize = 5000;
const UNKNOWN_ROUTE_RATIO: f64 = 0.02;
const RNG_SEED: u64 = 0x6c6f_6e67;

// Fade-out policy: routes shown for longer than this many ticks are released
const FADE_TICKS: usize = 40;
const RELEASES_PER_TICK: usize = 8;

// Camera sits above this point, slightly off the surface
const EYE_LATITUDE: f32 = 48.0;
const EYE_LONGITUDE: f32 = 10.0;
const EYE_ALTITUDE_FACTOR: f32 = 1.1;

#[derive(Debug, Error)]
enum DemoError {
    #[error("Failed to load configuration from {path}: {source}")]
    LoadConfig {
        path: String,
        source: ConfigError,
    },

    #[error(transparent)]
    Globe(#[from] RouteGlobeError),
}

impl From<ConfigError> for DemoError {
    fn from(err: ConfigError) -> Self {
        Self::Globe(err.into())
    }
}

fn main() {
    if let Err(err) = run() {
        log::error!("{}", err);
        eprintln!("globe_demo: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), DemoError> {
    let config = load_config()?;
    logging::init_with_level(&config.logging.log_level);
    config.validate()?;

    let visualizer = &config.visualizer;
    log::info!(
        "Globe demo: {} airports, {} routes, cull distance {}, chunk size {}, ceiling {}",
        NUM_AIRPORTS, NUM_ROUTES, visualizer.cull_distance, visualizer.chunk_size, visualizer.max_active
    );

    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let source = synthetic_source(&mut rng);

    let index = PositionIndex::from_source(&source, visualizer.sphere_radius)?;
    let routes = source.routes()?;

    let mut ctx = VisualizationContext::from_config(visualizer, HeadlessRouteRenderer::new, ReferenceFrame(1));
    let eye = lat_lon_to_sphere(EYE_LATITUDE, EYE_LONGITUDE, visualizer.sphere_radius) * EYE_ALTITUDE_FACTOR;
    let mut scheduler = VisibilityScheduler::new(visualizer, &index, &routes, eye)?;

    // Activation tick for each active route, oldest first
    let mut shown_at: VecDeque<usize> = VecDeque::new();
    let mut tick = 0usize;
    let mut faded = 0usize;

    let stats = scheduler.drive(&mut ctx, |ctx, outcome| {
        tick += 1;

        // Keep the bookkeeping in step with routes activated this tick
        while shown_at.len() < ctx.active_count() {
            shown_at.push_back(tick);
        }

        let blocked = matches!(outcome, StepOutcome::Blocked { .. });
        let mut released = 0;
        while released < RELEASES_PER_TICK {
            let expired = shown_at.front().is_some_and(|&at| tick - at >= FADE_TICKS);
            if !(expired || blocked) || ctx.release_oldest().is_none() {
                break;
            }
            shown_at.pop_front();
            released += 1;
        }
        faded += released;

        if let StepOutcome::Chunk { index, start, end } = *outcome {
            log::trace!("Chunk {} [{}, {}) done, {} active", index, start, end, ctx.active_count());
        }
    });

    let pool = ctx.pool().stats();
    log::info!(
        "Pass done after {} ticks: {} visible, {} culled, {} missing endpoint, {} faded out, {} still shown",
        tick, stats.visible, stats.culled, stats.missing_endpoint, faded, ctx.active_count()
    );
    log::info!(
        "Pool: {} renderers ({} grown), peak {} checked out, {} acquisitions",
        ctx.pool().len(), pool.grown, pool.peak_checked_out, pool.acquisitions
    );

    ctx.release_all();
    Ok(())
}

fn load_config() -> Result<GlobeConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => GlobeConfig::load_from_file(&path).map_err(|source| DemoError::LoadConfig { path, source }),
        None => Ok(GlobeConfig::default()),
    }
}

/// Random airports over the whole globe and routes between them
///
/// A small share of routes points at airport ids that do not exist, the way
/// real route tables reference closed or unlisted airports.
fn synthetic_source(rng: &mut StdRng) -> InMemoryDataSource {
    let airports: Vec<AirportRecord> = (0..NUM_AIRPORTS)
        .map(|i| {
            // Uniform over the sphere, not over the lat/lon rectangle
            let latitude = rng.gen_range(-1.0f32..=1.0).asin().to_degrees();
            let longitude = rng.gen_range(-180.0f32..180.0);
            AirportRecord::new(format!("AP{i:04}"), latitude, longitude)
        })
        .collect();

    let routes = (0..NUM_ROUTES)
        .map(|_| {
            let source = rng.gen_range(0..NUM_AIRPORTS);
            let destination = if rng.gen_bool(UNKNOWN_ROUTE_RATIO) {
                "UNKNOWN".to_string()
            } else {
                format!("AP{:04}", rng.gen_range(0..NUM_AIRPORTS))
            };
            Route::new(format!("AP{source:04}"), destination)
        })
        .collect();

    InMemoryDataSource::new(airports, routes)
}

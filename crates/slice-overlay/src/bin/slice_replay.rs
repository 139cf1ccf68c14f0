//! Headless replay driver.
//!
//! Builds a seeded random scene around a stationary player, drives the
//! overlay through the same event path a live host would, and prints the
//! frame counters as JSON.
//!
//! ```text
//! slice-replay [config.json] [frames] [seed]
//! ```
//!
//! A missing config file falls back to defaults. Set `RUST_LOG=debug` to see
//! markers being tracked and pruned.

use std::time::{Duration, Instant};

use anyhow::Context;
use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::Serialize;
use slice_host::events::{EventRegistry, HostEvent};
use slice_host::object::ObjectKind;
use slice_host::testing::{
    event_object, FlatProjector, RecordingRegistry, RecordingSurface, SceneHost,
};
use slice_overlay::config::{ConfigError, OverlayConfig};
use slice_overlay::controller::{Frame, FrameReport, OverlayController};
use slice_overlay::hazard::HazardShape;

const DISPLAY: Vec2 = Vec2::new(1920.0, 1080.0);
const PIXELS_PER_YALM: f32 = 20.0;
const FRAME_STEP: Duration = Duration::from_micros(16_667);
const DEFAULT_FRAMES: u64 = 600;
const DEFAULT_SEED: u64 = 0x5EED;

/// Objects alive at any time.
const POPULATION: usize = 24;
/// Chance per frame that one object despawns and a new one takes its place.
const CHURN_PER_FRAME: f64 = 0.02;

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

struct Scene {
    host: SceneHost,
    rng: Pcg64,
    next_entity: u32,
    live: Vec<usize>,
    spread: f32,
}

impl Scene {
    fn new(seed: u64, spread: f32) -> Self {
        let mut host = SceneHost::new();
        host.insert_player(Vec3::ZERO);
        let mut scene = Self {
            host,
            rng: Pcg64::seed_from_u64(seed),
            next_entity: 0x4000_0000,
            live: Vec::with_capacity(POPULATION),
            spread,
        };
        for _ in 0..POPULATION {
            scene.spawn();
        }
        scene
    }

    fn spawn(&mut self) {
        self.next_entity += 1;
        let position = Vec3::new(
            self.rng.gen_range(-self.spread..=self.spread),
            0.0,
            self.rng.gen_range(-self.spread..=self.spread),
        );
        let rotation = self.rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);

        // Half the population are hazards; the rest are props and NPCs.
        let mut object = if self.rng.gen_bool(0.5) {
            let shape = HazardShape::ALL[self.rng.gen_range(0..HazardShape::ALL.len())];
            event_object(self.next_entity, shape.model_id(), position, rotation)
        } else {
            let mut object = event_object(self.next_entity, self.rng.gen_range(1..2_000_000), position, rotation);
            if self.rng.gen_bool(0.5) {
                object.kind = ObjectKind::BattleNpc;
            }
            object
        };
        object.name = format!("Object {:X}", self.next_entity);
        let index = self.host.insert(object);
        self.live.push(index);
    }

    fn churn(&mut self) {
        if self.live.is_empty() || !self.rng.gen_bool(CHURN_PER_FRAME) {
            return;
        }
        let victim = self.rng.gen_range(0..self.live.len());
        let index = self.live.swap_remove(victim);
        self.host.remove(index);
        self.spawn();
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize)]
struct Totals {
    frames: u64,
    rendered_markers: usize,
    suppressed_markers: usize,
    pruned_markers: usize,
    polygons: usize,
    points: usize,
    labels: usize,
}

impl Totals {
    fn add(&mut self, report: &FrameReport) {
        self.frames += 1;
        self.rendered_markers += report.rendered;
        self.suppressed_markers += report.suppressed;
        self.pruned_markers += report.pruned;
        self.polygons += report.polygons;
        self.points += report.points;
        self.labels += report.labels;
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    totals: Totals,
    last_frame: FrameReport,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn load_config(path: Option<&str>) -> anyhow::Result<OverlayConfig> {
    let Some(path) = path else {
        return Ok(OverlayConfig::default());
    };
    match OverlayConfig::load(path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io { path, source }) => {
            tracing::warn!(path = %path.display(), error = %source, "using default config");
            Ok(OverlayConfig::default())
        }
        Err(e) => Err(e).context("loading overlay config"),
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let frames = match args.get(1) {
        Some(arg) => arg.parse().with_context(|| format!("frame count {arg:?}"))?,
        None => DEFAULT_FRAMES,
    };
    let seed = match args.get(2) {
        Some(arg) => arg.parse().with_context(|| format!("seed {arg:?}"))?,
        None => DEFAULT_SEED,
    };

    let mut registry = RecordingRegistry::in_territory(config.designated_territory);
    let mut scene = Scene::new(seed, config.max_distance * 1.5);
    let mut overlay = OverlayController::new(config)?;
    overlay.start(&mut registry)?;
    tracing::info!(frames, seed, territory = registry.current_territory(), "replay started");

    let camera = FlatProjector::centered(Vec3::ZERO, DISPLAY / 2.0, PIXELS_PER_YALM);
    let mut surface = RecordingSurface::new(DISPLAY);
    let start = Instant::now();
    let mut totals = Totals::default();

    for n in 0..frames {
        scene.churn();
        surface.clear();
        let now = start + FRAME_STEP * u32::try_from(n).context("frame count too large")?;
        let mut frame = Frame::new(&scene.host, &camera, &mut surface, now);
        overlay.dispatch(HostEvent::Draw, &mut frame);
        totals.add(overlay.last_report());
    }

    overlay.stop(&mut registry);
    tracing::info!(
        rendered = totals.rendered_markers,
        polygons = totals.polygons,
        "replay finished"
    );

    let summary = Summary {
        seed,
        last_frame: *overlay.last_report(),
        totals,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

//! Headless smoke simulation driver
//!
//! Usage: smoke-sim [preset] [seconds] [catalog.toml]
//!
//! Runs the named preset at a fixed 60 fps step and logs occupancy once per
//! simulated second.

use anyhow::{Context, Result};
use smoke_engine::scene::{FrameClock, SceneCatalog, SmokeLayer};

const FRAME_STEP: f32 = 1.0 / 60.0;
const IDENTITY: [f64; 16] = [
    1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info,smoke_engine=debug"))
        .format_timestamp_millis()
        .init();

    let mut args = std::env::args().skip(1);
    let preset_name = args.next().unwrap_or_else(|| "default".to_string());
    let seconds: f32 = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("invalid duration '{}'", raw))?,
        None => 10.0,
    };

    let catalog = match args.next() {
        Some(path) => SceneCatalog::load(&path).with_context(|| format!("loading scenes from {}", path))?,
        None => SceneCatalog::builtin().context("parsing built-in scenes")?,
    };

    let preset = catalog
        .get(&preset_name)
        .with_context(|| format!("available scenes: {}", catalog.names().collect::<Vec<_>>().join(", ")))?;

    log::info!(
        "Running '{}' for {:.1}s at ({:.5}, {:.5})",
        preset_name,
        seconds,
        preset.anchor.origin[0],
        preset.anchor.origin[1]
    );

    let mut layer = SmokeLayer::from_preset(preset, true).with_clock(FrameClock::fixed(FRAME_STEP));
    if layer.smoke().is_none() {
        log::warn!("Scene '{}' has smoke disabled; nothing to simulate", preset_name);
        return Ok(());
    }

    let frames = (seconds / FRAME_STEP).round() as u64;
    let mut peak = 0;
    for frame in 1..=frames {
        let drawn = layer
            .render_frame(&IDENTITY)
            .smoke
            .map(|handle| handle.opacities().filter(|&o| o > 0.0).count())
            .unwrap_or(0);

        let Some(smoke) = layer.smoke() else { break };
        let stats = smoke.stats();
        peak = peak.max(stats.active_particles);

        if frame % 60 == 0 {
            log::info!(
                "t={:>5.1}s active={:>4} visible={:>4} used={:>5.1}% total={}",
                frame as f32 * FRAME_STEP,
                stats.active_particles,
                drawn,
                stats.capacity_used * 100.0,
                stats.total_spawned
            );
        }
    }

    if let Some(smoke) = layer.smoke() {
        log::info!(
            "Done: {} particles emitted, peak {} of {} slots",
            smoke.stats().total_spawned,
            peak,
            smoke.pool().capacity()
        );
    }

    layer.dispose();
    Ok(())
}

//! Headless smart-home viewer
//!
//! Loads a viewer configuration (default `assets/viewer.toml`), the house
//! snapshot it points at, and runs a scripted session against the scene
//! engine.
//!
//! ```text
//! home_viewer [CONFIG]
//! ```

mod config;
mod session;

use std::path::{Path, PathBuf};

use home_scene::config::Config;
use home_scene::domain::HouseSnapshot;

use crate::config::ViewerConfig;

const DEFAULT_CONFIG: &str = "assets/viewer.toml";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting home viewer");

    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);

    let config = if config_path.exists() {
        ViewerConfig::load_from_file(&config_path)?
    } else {
        log::warn!("{} not found, using defaults", config_path.display());
        ViewerConfig::default()
    };

    let house_path = resolve_relative(&config_path, &config.house.path);
    log::info!("Loading house from {}", house_path.display());
    let house = HouseSnapshot::load_from_file(&house_path)?;

    let report = session::run(&config, &house)?;

    log::info!("Rendered {} frames", report.frames_rendered);
    for (id, kind) in &report.clicks {
        log::info!("Click resolved to {kind} '{id}'");
    }
    for event in &report.events {
        log::info!("Event: {} {:?}", event.event_type(), event);
    }
    log::info!(
        "Released {} of {} geometries",
        report.geometries_acquired - report.geometries_leaked,
        report.geometries_acquired
    );

    Ok(())
}

fn resolve_relative(config_path: &Path, target: &Path) -> PathBuf {
    if target.is_absolute() {
        return target.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| target.to_path_buf(), |dir| dir.join(target))
}

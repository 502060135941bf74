//! Viewer configuration

use std::path::PathBuf;

use home_scene::config::{Config, EngineConfig};
use serde::{Deserialize, Serialize};

/// Top-level viewer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// House snapshot to load (`.ron` or `.toml`)
    pub house: HouseSource,

    /// Virtual container size
    pub viewport: ViewportConfig,

    /// Scripted session parameters
    pub session: SessionConfig,

    /// Engine configuration
    pub engine: EngineConfig,
}

impl Config for ViewerConfig {}

/// Where the house snapshot comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseSource {
    /// Path of the snapshot, relative to the configuration file
    pub path: PathBuf,
}

impl Default for HouseSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("house.ron"),
        }
    }
}

/// Virtual container size in pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Scripted session parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Frames to run after the scene is built
    pub frames: u32,

    /// Frame at which the overload flag is raised, if ever
    pub overload_at: Option<u32>,

    /// Seed for the flicker random source; entropy when unset
    pub seed: Option<u64>,

    /// Device kind dropped onto the first room at the end of the session
    pub drop_device: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            overload_at: Some(60),
            seed: None,
            drop_device: Some("light".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use home_scene::config::ConfigFormat;

    #[test]
    fn test_bundled_config_parses() {
        let config = ViewerConfig::from_str_with_format(
            include_str!("../assets/viewer.toml"),
            ConfigFormat::Toml,
        )
        .unwrap();

        assert_eq!(config.house.path, PathBuf::from("house.ron"));
        assert_eq!(config.session.frames, 180);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.engine.layout.room_spacing, 4.5);
        assert_eq!(config.engine.palette, Default::default());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = ViewerConfig::from_str_with_format("", ConfigFormat::Toml).unwrap();
        assert_eq!(config.viewport.width, 1280.0);
        assert_eq!(config.session.overload_at, Some(60));
    }
}

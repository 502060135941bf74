//! Engine configuration: camera, palette, animation and room layout

use super::Config;
use crate::render::Color;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Viewpoint parameters
    pub camera: CameraConfig,

    /// Colors and intensities for every constructed object
    pub palette: PaletteConfig,

    /// Per-frame animation constants
    pub animation: AnimationConfig,

    /// Room placement used when building from a house snapshot
    pub layout: LayoutConfig,
}

impl Config for EngineConfig {}

/// Perspective camera parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,

    /// Near clipping plane distance
    pub near: f32,

    /// Far clipping plane distance
    pub far: f32,

    /// Camera position in world space
    pub position: [f32; 3],

    /// Point the camera looks at
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            position: [0.0, 5.0, 10.0],
            // Straight down -Z from the camera position
            target: [0.0, 5.0, 0.0],
        }
    }
}

/// Color and intensity of a scene-wide light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSetting {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
}

/// Shadow-casting directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLightSetting {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Light position (the light shines toward the origin)
    pub position: [f32; 3],
    /// Square shadow map resolution
    pub shadow_map_size: u32,
}

/// Local point light attached to a lit bulb
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLightSetting {
    /// Light color
    pub color: Color,
    /// Light intensity
    pub intensity: f32,
    /// Falloff distance
    pub range: f32,
}

/// Presentation palette
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Scene clear color
    pub background: Color,
    /// Ambient fill light
    pub ambient_light: LightSetting,
    /// Main shadow-casting light
    pub directional_light: DirectionalLightSetting,
    /// Opacity of room volumes
    pub room_opacity: f32,
    /// Floor plane color
    pub floor: Color,
    /// Static light fixture base
    pub light_base: Color,
    /// Bulb color when the light is on
    pub bulb_on: Color,
    /// Bulb color when the light is off
    pub bulb_off: Color,
    /// Bulb emissive color when the light is on
    pub bulb_emissive: Color,
    /// Bulb emissive intensity when the light is on
    pub bulb_emissive_intensity: f32,
    /// Point light attached to a lit bulb
    pub bulb_glow: PointLightSetting,
    /// Fan base color
    pub fan_base: Color,
    /// Fan blade color
    pub fan_blade: Color,
    /// Room color while it is a drag target
    pub highlight: Color,
    /// Room opacity while it is a drag target
    pub highlight_opacity: f32,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            background: Color::from_hex(0xf0f0f0),
            ambient_light: LightSetting {
                color: Color::WHITE,
                intensity: 0.5,
            },
            directional_light: DirectionalLightSetting {
                color: Color::WHITE,
                intensity: 0.5,
                position: [5.0, 5.0, 5.0],
                shadow_map_size: 1024,
            },
            room_opacity: 0.7,
            floor: Color::from_hex(0xeeeeee),
            light_base: Color::from_hex(0x333333),
            bulb_on: Color::from_hex(0xffff00),
            bulb_off: Color::from_hex(0x888888),
            bulb_emissive: Color::from_hex(0xffff00),
            bulb_emissive_intensity: 0.5,
            bulb_glow: PointLightSetting {
                color: Color::from_hex(0xffffcc),
                intensity: 0.8,
                range: 5.0,
            },
            fan_base: Color::from_hex(0x444444),
            fan_blade: Color::from_hex(0x0000ff),
            highlight: Color::from_hex(0x66ff66),
            highlight_opacity: 0.8,
        }
    }
}

/// Per-frame animation constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Blade rotation added per frame while a fan is on (radians)
    pub fan_rotation_step: f32,

    /// Chance per lit bulb per frame of a flicker while overloaded
    pub flicker_probability: f32,

    /// Upper bound (exclusive) of a flickered emissive intensity
    pub flicker_max_intensity: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            fan_rotation_step: 0.1,
            flicker_probability: 0.3,
            flicker_max_intensity: 0.5,
        }
    }
}

/// Room volume colors by room kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomColors {
    /// Living room
    pub living: Color,
    /// Bedroom
    pub bedroom: Color,
    /// Kitchen
    pub kitchen: Color,
    /// Bathroom
    pub bathroom: Color,
}

impl Default for RoomColors {
    fn default() -> Self {
        Self {
            living: Color::from_hex(0xa0c4ff),
            bedroom: Color::from_hex(0xffc6ff),
            kitchen: Color::from_hex(0xfdffb6),
            bathroom: Color::from_hex(0x9bf6ff),
        }
    }
}

/// Placement of rooms built from a house snapshot
///
/// Rooms are laid out left to right along X, centered on the origin, with
/// their floor resting on `y = 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Room volume size (width, height, depth)
    pub room_dimensions: [f32; 3],

    /// Distance between neighbouring room centers along X
    pub room_spacing: f32,

    /// Room colors by kind
    pub colors: RoomColors,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            room_dimensions: [4.0, 3.0, 4.0],
            room_spacing: 4.5,
            colors: RoomColors::default(),
        }
    }
}

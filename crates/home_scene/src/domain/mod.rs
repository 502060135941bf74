//! Read-only domain records consumed by the scene
//!
//! The engine never mutates these. They arrive as a [`HouseSnapshot`] and
//! drive construction; later changes are pushed through the manager's
//! update calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Kind of smart device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// Ceiling light
    Light,
    /// Ceiling fan
    Fan,
    /// Thermostat (not drawn)
    Thermostat,
    /// Power socket (not drawn)
    Socket,
}

impl DeviceKind {
    /// Lowercase wire name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Fan => "fan",
            Self::Thermostat => "thermostat",
            Self::Socket => "socket",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized device kind name
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown device kind '{0}'")]
pub struct UnknownDeviceKind(pub String);

impl FromStr for DeviceKind {
    type Err = UnknownDeviceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "fan" => Ok(Self::Fan),
            "thermostat" => Ok(Self::Thermostat),
            "socket" => Ok(Self::Socket),
            other => Err(UnknownDeviceKind(other.to_string())),
        }
    }
}

/// Kind of room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    /// Living room
    #[default]
    Living,
    /// Bedroom
    Bedroom,
    /// Kitchen
    Kitchen,
    /// Bathroom
    Bathroom,
}

/// A smart device
///
/// One record for every kind; fields that only make sense for some kinds are
/// optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Device kind
    pub kind: DeviceKind,
    /// Owning room id
    #[serde(default)]
    pub room_id: String,
    /// Power state
    #[serde(default)]
    pub is_on: bool,
    /// Rated power draw in watts
    #[serde(default)]
    pub power: f32,
    /// Light brightness, 0 to 100
    #[serde(default)]
    pub brightness: Option<u8>,
    /// Light color as `#rrggbb`
    #[serde(default)]
    pub color: Option<String>,
    /// Fan speed, 0 to 100
    #[serde(default)]
    pub speed: Option<u8>,
    /// Measured temperature in °C (thermostat)
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Target temperature in °C (thermostat)
    #[serde(default)]
    pub target_temperature: Option<f32>,
}

impl Device {
    /// Minimal device record of the given kind
    pub fn new(id: impl Into<String>, kind: DeviceKind, is_on: bool) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            room_id: String::new(),
            is_on,
            power: 0.0,
            brightness: None,
            color: None,
            speed: None,
            temperature: None,
            target_temperature: None,
        }
    }

    /// Light device
    pub fn light(id: impl Into<String>, is_on: bool) -> Self {
        Self::new(id, DeviceKind::Light, is_on)
    }

    /// Fan device
    pub fn fan(id: impl Into<String>, is_on: bool) -> Self {
        Self::new(id, DeviceKind::Fan, is_on)
    }

    /// Set the display name (builder style)
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the rated power (builder style)
    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }
}

/// A room and the devices it contains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique room id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Room kind
    #[serde(default)]
    pub kind: RoomKind,
    /// Devices in display order
    #[serde(default)]
    pub devices: Vec<Device>,
    /// Ambient temperature in °C
    #[serde(default)]
    pub temperature: f32,
    /// Relative humidity in percent
    #[serde(default)]
    pub humidity: f32,
}

impl Room {
    /// Empty room of the given kind
    pub fn new(id: impl Into<String>, kind: RoomKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            kind,
            devices: Vec::new(),
            temperature: 0.0,
            humidity: 0.0,
        }
    }

    /// Add a device, assigning it to this room (builder style)
    pub fn with_device(mut self, mut device: Device) -> Self {
        device.room_id.clone_from(&self.id);
        self.devices.push(device);
        self
    }
}

/// Full house state used to build the scene
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseSnapshot {
    /// Rooms in layout order
    pub rooms: Vec<Room>,
}

impl Config for HouseSnapshot {}

impl HouseSnapshot {
    /// Every device across every room
    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.rooms.iter().flat_map(|room| room.devices.iter())
    }
}

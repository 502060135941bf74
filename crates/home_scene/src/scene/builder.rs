//! Construction of visual objects from domain records
//!
//! The builder borrows the scene, index and resource registry for the span
//! of one construction call. Malformed input never panics: it is logged and
//! the call leaves the scene untouched.

use std::f32::consts::{FRAC_PI_2, TAU};

use super::graph::SceneGraph;
use super::index::{ObjectKind, VisualObjectIndex};
use super::node::{LightData, LightKind, NodeKey, RenderFlags, SceneNode};
use super::presentation::apply_light_state;
use crate::config::PaletteConfig;
use crate::domain::{Device, DeviceKind, Room};
use crate::foundation::math::{Transform, Vec3};
use crate::geometry::Shape;
use crate::render::{Color, Material, ResourceRegistry};

/// Inset of the floor plane relative to the room volume
const FLOOR_INSET: f32 = 0.1;
/// Lift of the floor above the volume's bottom face
const FLOOR_LIFT: f32 = 0.01;
/// Light fixture distance below the ceiling
const LIGHT_CEILING_DROP: f32 = 0.3;
/// Fan distance below the ceiling
const FAN_CEILING_DROP: f32 = 0.4;

const LIGHT_BASE: Shape = Shape::Cylinder { radius: 0.1, height: 0.1 };
const BULB: Shape = Shape::Sphere { radius: 0.15 };
const BULB_DROP: f32 = 0.15;

const FAN_BASE: Shape = Shape::Cylinder { radius: 0.1, height: 0.3 };
const FAN_BLADE: Shape = Shape::Box { width: 0.05, height: 0.01, depth: 0.25 };
const FAN_BLADE_COUNT: u8 = 3;
const FAN_BLADE_HEIGHT: f32 = 0.2;

/// Label of a fan's rotating blade group
pub const FAN_BLADES_LABEL: &str = "fan-blades";

/// Builds rooms, lights and fans into a scene
pub struct SceneBuilder<'a> {
    graph: &'a mut SceneGraph,
    index: &'a mut VisualObjectIndex,
    resources: &'a mut ResourceRegistry,
    palette: &'a PaletteConfig,
}

impl<'a> SceneBuilder<'a> {
    /// Borrow the scene state for construction
    pub fn new(
        graph: &'a mut SceneGraph,
        index: &'a mut VisualObjectIndex,
        resources: &'a mut ResourceRegistry,
        palette: &'a PaletteConfig,
    ) -> Self {
        Self {
            graph,
            index,
            resources,
            palette,
        }
    }

    /// Scene background plus the ambient and shadow-casting directional lights
    pub fn setup_lights(&mut self) {
        let palette = self.palette;
        self.graph.set_background(palette.background);

        let ambient = LightData {
            kind: LightKind::Ambient,
            color: palette.ambient_light.color,
            intensity: palette.ambient_light.intensity,
        };
        self.graph
            .add_root(SceneNode::light("ambient-light", ambient, Transform::identity()));

        let sun = palette.directional_light;
        let directional = LightData {
            kind: LightKind::Directional {
                shadow_map_size: sun.shadow_map_size,
            },
            color: sun.color,
            intensity: sun.intensity,
        };
        self.graph.add_root(SceneNode::light(
            "directional-light",
            directional,
            Transform::from_position(Vec3::from(sun.position)),
        ));

        log::debug!("Scene lighting ready");
    }

    /// Build a room volume with its floor, then the room's lights and fans
    pub fn create_room(&mut self, room: &Room, position: Vec3, dimensions: Vec3, color: Color) {
        let volume = Shape::Box {
            width: dimensions.x,
            height: dimensions.y,
            depth: dimensions.z,
        };
        let floor = Shape::Plane {
            width: dimensions.x - FLOOR_INSET,
            height: dimensions.z - FLOOR_INSET,
        };

        if !volume.is_valid() || !floor.is_valid() {
            log::warn!("Room '{}' has invalid dimensions {:?}; skipped", room.id, dimensions);
            return;
        }
        if self.index.contains(&room.id) {
            log::warn!("Room '{}' is already in the scene; skipped", room.id);
            return;
        }

        let geometry = self.resources.acquire_geometry(volume);
        let material = self
            .resources
            .acquire_material(Material::phong(color).with_opacity(self.palette.room_opacity));
        let room_node = self.graph.add_root(SceneNode::mesh(
            "room",
            geometry,
            material,
            RenderFlags::CAST_SHADOW | RenderFlags::RECEIVE_SHADOW | RenderFlags::TRANSPARENT,
            Transform::from_position(position),
        ));

        let floor_geometry = self.resources.acquire_geometry(floor);
        let floor_material = self
            .resources
            .acquire_material(Material::phong(self.palette.floor).double_sided());
        let floor_transform =
            Transform::from_position(Vec3::new(0.0, -dimensions.y / 2.0 + FLOOR_LIFT, 0.0))
                .with_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        self.graph.add_child(
            room_node,
            SceneNode::mesh(
                "floor",
                floor_geometry,
                floor_material,
                RenderFlags::RECEIVE_SHADOW | RenderFlags::DOUBLE_SIDED,
                floor_transform,
            ),
        );

        self.tag(&room.id, ObjectKind::Room, room_node);
        log::debug!("Created room '{}' at {:?}", room.id, position);

        for device in &room.devices {
            match device.kind {
                DeviceKind::Light => self.create_light(
                    device,
                    position + Vec3::new(0.0, dimensions.y / 2.0 - LIGHT_CEILING_DROP, 0.0),
                ),
                DeviceKind::Fan => self.create_fan(
                    device,
                    position
                        + Vec3::new(
                            0.0,
                            dimensions.y / 2.0 - FAN_CEILING_DROP,
                            dimensions.z / 3.0,
                        ),
                ),
                DeviceKind::Thermostat | DeviceKind::Socket => {
                    log::trace!("Device '{}' ({}) has no visual", device.id, device.kind);
                }
            }
        }
    }

    /// Build a ceiling light fixture: a static base and a bulb below it
    pub fn create_light(&mut self, light: &Device, position: Vec3) {
        if self.index.contains(&light.id) {
            log::warn!("Light '{}' is already in the scene; skipped", light.id);
            return;
        }

        let base_geometry = self.resources.acquire_geometry(LIGHT_BASE);
        let base_material = self
            .resources
            .acquire_material(Material::phong(self.palette.light_base));
        self.graph.add_root(SceneNode::mesh(
            "light-base",
            base_geometry,
            base_material,
            RenderFlags::CAST_SHADOW,
            Transform::from_position(position),
        ));

        let bulb_geometry = self.resources.acquire_geometry(BULB);
        let bulb_material = self
            .resources
            .acquire_material(Material::standard(self.palette.bulb_off));
        let bulb = self.graph.add_root(SceneNode::mesh(
            "bulb",
            bulb_geometry,
            bulb_material,
            RenderFlags::CAST_SHADOW,
            Transform::from_position(position - Vec3::new(0.0, BULB_DROP, 0.0)),
        ));
        apply_light_state(self.graph, self.resources, bulb, light.is_on, self.palette);

        self.tag(&light.id, ObjectKind::Light, bulb);
        log::debug!("Created light '{}' (on: {})", light.id, light.is_on);
    }

    /// Build a fan: a group holding a base and a rotating blade group
    pub fn create_fan(&mut self, fan: &Device, position: Vec3) {
        if self.index.contains(&fan.id) {
            log::warn!("Fan '{}' is already in the scene; skipped", fan.id);
            return;
        }

        let mut group = SceneNode::group("fan", Transform::from_position(position));
        group.spinning = fan.is_on;
        let fan_node = self.graph.add_root(group);

        let base_geometry = self.resources.acquire_geometry(FAN_BASE);
        let base_material = self
            .resources
            .acquire_material(Material::phong(self.palette.fan_base));
        self.graph.add_child(
            fan_node,
            SceneNode::mesh(
                "fan-base",
                base_geometry,
                base_material,
                RenderFlags::CAST_SHADOW,
                Transform::identity(),
            ),
        );

        let blades = self.graph.add_child(
            fan_node,
            SceneNode::group(
                FAN_BLADES_LABEL,
                Transform::from_position(Vec3::new(0.0, FAN_BLADE_HEIGHT, 0.0)),
            ),
        );

        if let Some(blades) = blades {
            // One geometry and one material shared by every blade
            let blade_geometry = self.resources.acquire_geometry(FAN_BLADE);
            let blade_material = self
                .resources
                .acquire_material(Material::phong(self.palette.fan_blade));

            for i in 0..FAN_BLADE_COUNT {
                let angle = TAU / f32::from(FAN_BLADE_COUNT) * f32::from(i);
                self.graph.add_child(
                    blades,
                    SceneNode::mesh(
                        "fan-blade",
                        blade_geometry,
                        blade_material,
                        RenderFlags::CAST_SHADOW,
                        Transform::identity().with_rotation(Vec3::new(0.0, angle, 0.0)),
                    ),
                );
            }
        }

        self.tag(&fan.id, ObjectKind::Fan, fan_node);
        log::debug!("Created fan '{}' (on: {})", fan.id, fan.is_on);
    }

    fn tag(&mut self, domain_id: &str, kind: ObjectKind, node: NodeKey) {
        if let Err(err) = self.index.register(domain_id, kind, node) {
            log::warn!("Could not index {kind} '{domain_id}': {err}");
        }
    }
}

/// Blade group of a fan node
pub fn fan_blades(graph: &SceneGraph, fan: NodeKey) -> Option<NodeKey> {
    graph
        .children(fan)
        .iter()
        .copied()
        .find(|child| graph.node(*child).is_some_and(|node| node.label == FAN_BLADES_LABEL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RoomKind;
    use crate::scene::presentation::glow_count;
    use crate::scene::NodeKind;
    use approx::assert_relative_eq;

    struct Fixture {
        graph: SceneGraph,
        index: VisualObjectIndex,
        resources: ResourceRegistry,
        palette: PaletteConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                graph: SceneGraph::default(),
                index: VisualObjectIndex::new(),
                resources: ResourceRegistry::new(),
                palette: PaletteConfig::default(),
            }
        }

        fn builder(&mut self) -> SceneBuilder<'_> {
            SceneBuilder::new(&mut self.graph, &mut self.index, &mut self.resources, &self.palette)
        }
    }

    fn living_room() -> Room {
        Room::new("living-room", RoomKind::Living)
            .with_device(Device::light("light-1", true))
            .with_device(Device::fan("fan-1", false))
            .with_device(Device::new("thermo-1", DeviceKind::Thermostat, true))
    }

    #[test]
    fn test_create_room_with_devices() {
        let mut fixture = Fixture::new();
        fixture.builder().create_room(
            &living_room(),
            Vec3::new(0.0, 1.5, 0.0),
            Vec3::new(4.0, 3.0, 4.0),
            Color::from_hex(0xa0c4ff),
        );

        assert_eq!(fixture.index.len(), 3);
        let room = fixture.index.lookup_kind("living-room", ObjectKind::Room).unwrap();
        let floor = fixture.graph.children(room)[0];
        assert_eq!(fixture.graph.node(floor).unwrap().label, "floor");
        assert!(fixture.index.identity_of(floor).is_none());

        let room_material = fixture.graph.node(room).and_then(SceneNode::material).unwrap();
        let room_material = fixture.resources.material(room_material).unwrap();
        assert!(room_material.transparent);
        assert_relative_eq!(room_material.opacity, 0.7);

        let bulb = fixture.index.lookup_kind("light-1", ObjectKind::Light).unwrap();
        let bulb_origin = fixture.graph.node(bulb).unwrap().transform.position;
        assert_relative_eq!(bulb_origin, Vec3::new(0.0, 1.5 + 1.5 - 0.3 - 0.15, 0.0), epsilon = 1e-5);
        assert_eq!(glow_count(&fixture.graph, bulb), 1);

        let fan = fixture.index.lookup_kind("fan-1", ObjectKind::Fan).unwrap();
        let fan_node = fixture.graph.node(fan).unwrap();
        assert!(!fan_node.spinning);
        assert_relative_eq!(fan_node.transform.position, Vec3::new(0.0, 2.6, 4.0 / 3.0), epsilon = 1e-5);
        assert!(fixture.index.lookup("thermo-1").is_none());
    }

    #[test]
    fn test_fan_blades_share_resources() {
        let mut fixture = Fixture::new();
        fixture.builder().create_fan(&Device::fan("fan-1", true), Vec3::zeros());

        let fan = fixture.index.lookup("fan-1").unwrap();
        assert!(fixture.graph.node(fan).unwrap().spinning);
        let blades = fan_blades(&fixture.graph, fan).unwrap();
        let blade_nodes = fixture.graph.children(blades);
        assert_eq!(blade_nodes.len(), 3);

        let shared: Vec<_> = blade_nodes
            .iter()
            .map(|blade| fixture.graph.node(*blade).unwrap().kind.clone())
            .collect();
        assert!(shared.windows(2).all(|pair| match (&pair[0], &pair[1]) {
            (
                NodeKind::Mesh { geometry: g0, material: m0, .. },
                NodeKind::Mesh { geometry: g1, material: m1, .. },
            ) => g0 == g1 && m0 == m1,
            _ => false,
        }));

        // base + blade: two geometries and two materials
        assert_eq!(fixture.resources.live_geometries(), 2);
        assert_eq!(fixture.resources.live_materials(), 2);

        let third = fixture.graph.node(blade_nodes[2]).unwrap();
        assert_relative_eq!(third.transform.rotation.y, TAU * 2.0 / 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_invalid_dimensions_have_no_effect() {
        let mut fixture = Fixture::new();
        fixture.builder().create_room(
            &living_room(),
            Vec3::zeros(),
            Vec3::new(4.0, 0.0, 4.0),
            Color::WHITE,
        );
        // Thinner than the floor inset
        fixture.builder().create_room(
            &living_room(),
            Vec3::zeros(),
            Vec3::new(0.05, 3.0, 4.0),
            Color::WHITE,
        );

        assert!(fixture.graph.is_empty());
        assert!(fixture.index.is_empty());
        assert_eq!(fixture.resources.live_geometries(), 0);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut fixture = Fixture::new();
        let room = living_room();
        fixture.builder().create_room(&room, Vec3::zeros(), Vec3::new(4.0, 3.0, 4.0), Color::WHITE);
        let nodes = fixture.graph.len();

        fixture.builder().create_room(&room, Vec3::new(10.0, 0.0, 0.0), Vec3::new(4.0, 3.0, 4.0), Color::WHITE);
        fixture.builder().create_light(&Device::light("light-1", false), Vec3::zeros());

        assert_eq!(fixture.graph.len(), nodes);
        assert_eq!(fixture.index.len(), 3);
    }

    #[test]
    fn test_setup_lights() {
        let mut fixture = Fixture::new();
        fixture.builder().setup_lights();

        assert_eq!(fixture.graph.background(), Color::from_hex(0xf0f0f0));
        let kinds: Vec<_> = fixture
            .graph
            .iter()
            .filter_map(|(_, node)| match node.kind {
                NodeKind::Light(light) => Some(light.kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds.len(), 2);
        assert!(kinds.contains(&LightKind::Ambient));
        assert!(kinds.contains(&LightKind::Directional { shadow_map_size: 1024 }));
    }
}

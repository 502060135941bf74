//! State-driven presentation of constructed objects
//!
//! Bulb presentation is a pure function of the on/off state, so applying it
//! twice is the same as applying it once.

use super::graph::SceneGraph;
use super::node::{LightData, LightKind, NodeKey, SceneNode};
use crate::config::PaletteConfig;
use crate::foundation::math::Transform;
use crate::render::{Color, ResourceRegistry};

/// Label of the point light attached to a lit bulb
pub const BULB_GLOW_LABEL: &str = "bulb-glow";

/// Re-derive a bulb's material and point light child from `is_on`
///
/// Returns `false` if the node is not a mesh bulb.
pub fn apply_light_state(
    graph: &mut SceneGraph,
    resources: &mut ResourceRegistry,
    bulb: NodeKey,
    is_on: bool,
    palette: &PaletteConfig,
) -> bool {
    let Some(material_key) = graph.node(bulb).and_then(SceneNode::material) else {
        return false;
    };
    let Some(material) = resources.material_mut(material_key) else {
        log::warn!("Bulb {:?} references a released material", bulb);
        return false;
    };

    if is_on {
        material.color = palette.bulb_on;
        material.emissive = palette.bulb_emissive;
        material.emissive_intensity = palette.bulb_emissive_intensity;
    } else {
        material.color = palette.bulb_off;
        material.emissive = Color::BLACK;
        material.emissive_intensity = 0.0;
    }

    let glow_children: Vec<NodeKey> = graph
        .children(bulb)
        .iter()
        .copied()
        .filter(|child| graph.node(*child).is_some_and(SceneNode::is_point_light))
        .collect();

    if is_on {
        if glow_children.is_empty() {
            let glow = LightData {
                kind: LightKind::Point {
                    range: palette.bulb_glow.range,
                },
                color: palette.bulb_glow.color,
                intensity: palette.bulb_glow.intensity,
            };
            graph.add_child(bulb, SceneNode::light(BULB_GLOW_LABEL, glow, Transform::identity()));
        }
    } else {
        for child in glow_children {
            graph.remove_subtree(child);
        }
    }

    true
}

/// Number of point lights attached directly to a node
pub fn glow_count(graph: &SceneGraph, node: NodeKey) -> usize {
    graph
        .children(node)
        .iter()
        .filter(|child| graph.node(**child).is_some_and(SceneNode::is_point_light))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Shape;
    use crate::render::Material;
    use crate::scene::RenderFlags;
    use approx::assert_relative_eq;

    fn bulb_scene() -> (SceneGraph, ResourceRegistry, NodeKey) {
        let mut graph = SceneGraph::default();
        let mut resources = ResourceRegistry::new();
        let geometry = resources.acquire_geometry(Shape::Sphere { radius: 0.15 });
        let material = resources.acquire_material(Material::standard(Color::WHITE));
        let bulb = graph.add_root(SceneNode::mesh(
            "bulb",
            geometry,
            material,
            RenderFlags::CAST_SHADOW,
            Transform::identity(),
        ));
        (graph, resources, bulb)
    }

    #[test]
    fn test_light_on_off_is_idempotent() {
        let palette = PaletteConfig::default();
        let (mut graph, mut resources, bulb) = bulb_scene();
        let material = graph.node(bulb).and_then(SceneNode::material).unwrap();

        for _ in 0..2 {
            assert!(apply_light_state(&mut graph, &mut resources, bulb, true, &palette));
            assert_eq!(glow_count(&graph, bulb), 1);
            assert_relative_eq!(resources.material(material).unwrap().emissive_intensity, 0.5);
        }

        for _ in 0..2 {
            assert!(apply_light_state(&mut graph, &mut resources, bulb, false, &palette));
            assert_eq!(glow_count(&graph, bulb), 0);
            let bulb_material = resources.material(material).unwrap();
            assert_eq!(bulb_material.color, palette.bulb_off);
            assert_eq!(bulb_material.emissive, Color::BLACK);
            assert_relative_eq!(bulb_material.emissive_intensity, 0.0);
        }
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_non_mesh_is_rejected() {
        let palette = PaletteConfig::default();
        let mut graph = SceneGraph::default();
        let mut resources = ResourceRegistry::new();
        let group = graph.add_root(SceneNode::group("group", Transform::identity()));

        assert!(!apply_light_state(&mut graph, &mut resources, group, true, &palette));
        assert_eq!(graph.len(), 1);
    }
}

//! Drag target resolution and room highlight bookkeeping
//!
//! At most one room is highlighted at a time in practice, but the saved
//! originals are keyed by room id so a clear always restores every room
//! that was touched.

use std::collections::BTreeMap;

use super::picking::{raycast, resolve, PickPolicy};
use crate::config::PaletteConfig;
use crate::geometry::Ray;
use crate::render::{Color, ResourceRegistry};
use crate::scene::{ObjectKind, SceneGraph, SceneNode, VisualObjectIndex};

/// Room presentation captured before highlighting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedPresentation {
    /// Original base color
    pub color: Color,
    /// Original opacity
    pub opacity: f32,
}

/// Room-only picking plus highlight state
#[derive(Debug, Default)]
pub struct DragTargetResolver {
    saved: BTreeMap<String, SavedPresentation>,
}

impl DragTargetResolver {
    /// Create a resolver with nothing highlighted
    pub fn new() -> Self {
        Self::default()
    }

    /// Room under a world-space ray
    pub fn room_at(
        &self,
        ray: &Ray,
        graph: &SceneGraph,
        resources: &ResourceRegistry,
        index: &VisualObjectIndex,
    ) -> Option<String> {
        let hits = raycast(graph, resources, ray);
        resolve(&hits, graph, index, PickPolicy::RoomsOnly).map(|identity| identity.domain_id)
    }

    /// Apply the highlight presentation to a room
    ///
    /// The room's current presentation is saved first unless an original is
    /// already saved, so repeated highlights keep the true original.
    pub fn highlight_room(
        &mut self,
        room_id: &str,
        graph: &SceneGraph,
        resources: &mut ResourceRegistry,
        index: &VisualObjectIndex,
        palette: &PaletteConfig,
    ) -> bool {
        let Some(material_key) = index
            .lookup_kind(room_id, ObjectKind::Room)
            .and_then(|node| graph.node(node))
            .and_then(SceneNode::material)
        else {
            log::trace!("No room '{room_id}' to highlight");
            return false;
        };
        let Some(material) = resources.material_mut(material_key) else {
            return false;
        };

        self.saved
            .entry(room_id.to_string())
            .or_insert(SavedPresentation {
                color: material.color,
                opacity: material.opacity,
            });

        material.color = palette.highlight;
        material.opacity = palette.highlight_opacity;
        true
    }

    /// Restore every highlighted room and forget the saved originals
    pub fn clear(&mut self, graph: &SceneGraph, resources: &mut ResourceRegistry, index: &VisualObjectIndex) {
        for (room_id, original) in std::mem::take(&mut self.saved) {
            let key = index
                .lookup_kind(&room_id, ObjectKind::Room)
                .and_then(|node| graph.node(node))
                .and_then(SceneNode::material);

            let material = match key {
                Some(key) => resources.material_mut(key),
                None => None,
            };

            match material {
                Some(material) => {
                    material.color = original.color;
                    material.opacity = original.opacity;
                }
                None => log::trace!("Highlighted room '{room_id}' is gone"),
            }
        }
    }

    /// Whether a room currently carries the highlight
    pub fn is_highlighted(&self, room_id: &str) -> bool {
        self.saved.contains_key(room_id)
    }

    /// Ids of highlighted rooms
    pub fn highlighted_rooms(&self) -> impl Iterator<Item = &str> {
        self.saved.keys().map(String::as_str)
    }

    /// Saved original of a highlighted room
    pub fn saved_original(&self, room_id: &str) -> Option<&SavedPresentation> {
        self.saved.get(room_id)
    }

    /// Forget saved originals without restoring them
    pub fn reset(&mut self) {
        self.saved.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Room, RoomKind};
    use crate::foundation::math::Vec3;
    use crate::scene::SceneBuilder;
    use approx::assert_relative_eq;

    fn room_scene() -> (SceneGraph, ResourceRegistry, VisualObjectIndex, PaletteConfig) {
        let mut graph = SceneGraph::default();
        let mut resources = ResourceRegistry::new();
        let mut index = VisualObjectIndex::new();
        let palette = PaletteConfig::default();
        SceneBuilder::new(&mut graph, &mut index, &mut resources, &palette).create_room(
            &Room::new("kitchen", RoomKind::Kitchen),
            Vec3::zeros(),
            Vec3::new(4.0, 3.0, 4.0),
            Color::from_hex(0xfdffb6),
        );
        (graph, resources, index, palette)
    }

    fn room_material(graph: &SceneGraph, resources: &ResourceRegistry, index: &VisualObjectIndex) -> (Color, f32) {
        let key = index
            .lookup("kitchen")
            .and_then(|node| graph.node(node))
            .and_then(SceneNode::material)
            .unwrap();
        let material = resources.material(key).unwrap();
        (material.color, material.opacity)
    }

    #[test]
    fn test_room_at_ray() {
        let (graph, resources, index, _) = room_scene();
        let resolver = DragTargetResolver::new();

        let hit = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let miss = Ray::new(Vec3::new(9.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(resolver.room_at(&hit, &graph, &resources, &index), Some("kitchen".to_string()));
        assert_eq!(resolver.room_at(&miss, &graph, &resources, &index), None);
    }

    #[test]
    fn test_double_highlight_keeps_true_original() {
        let (graph, mut resources, index, palette) = room_scene();
        let mut resolver = DragTargetResolver::new();

        assert!(resolver.highlight_room("kitchen", &graph, &mut resources, &index, &palette));
        assert!(resolver.highlight_room("kitchen", &graph, &mut resources, &index, &palette));

        let saved = resolver.saved_original("kitchen").unwrap();
        assert_eq!(saved.color, Color::from_hex(0xfdffb6));
        assert_relative_eq!(saved.opacity, 0.7);

        let (color, opacity) = room_material(&graph, &resources, &index);
        assert_eq!(color, palette.highlight);
        assert_relative_eq!(opacity, 0.8);

        resolver.clear(&graph, &mut resources, &index);
        let (color, opacity) = room_material(&graph, &resources, &index);
        assert_eq!(color, Color::from_hex(0xfdffb6));
        assert_relative_eq!(opacity, 0.7);
        assert_eq!(resolver.highlighted_rooms().count(), 0);
    }

    #[test]
    fn test_clear_without_highlight_is_noop() {
        let (graph, mut resources, index, _) = room_scene();
        let mut resolver = DragTargetResolver::new();
        let before = room_material(&graph, &resources, &index);

        resolver.clear(&graph, &mut resources, &index);
        assert_eq!(room_material(&graph, &resources, &index), before);
    }

    #[test]
    fn test_unknown_room_is_ignored() {
        let (graph, mut resources, index, palette) = room_scene();
        let mut resolver = DragTargetResolver::new();

        assert!(!resolver.highlight_room("attic", &graph, &mut resources, &index, &palette));
        assert!(!resolver.is_highlighted("attic"));
    }
}

//! Scene graph: a slotmap-backed forest of nodes

use slotmap::SlotMap;

use super::node::{NodeKey, SceneNode};
use crate::foundation::math::Mat4;
use crate::render::Color;

/// Hierarchy of every object in the scene
///
/// Nodes are owned by the graph and referenced by [`NodeKey`]. Removing a
/// node removes its whole subtree.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    roots: Vec<NodeKey>,
    background: Color,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

impl SceneGraph {
    /// Create an empty scene with the given clear color
    pub fn new(background: Color) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            background,
        }
    }

    /// Scene clear color
    pub fn background(&self) -> Color {
        self.background
    }

    /// Change the scene clear color
    pub fn set_background(&mut self, background: Color) {
        self.background = background;
    }

    /// Insert a top-level node
    pub fn add_root(&mut self, mut node: SceneNode) -> NodeKey {
        node.parent = None;
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Insert a node under `parent`
    ///
    /// Returns `None` (and inserts nothing) if the parent does not exist.
    pub fn add_child(&mut self, parent: NodeKey, mut node: SceneNode) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            log::warn!("Cannot attach '{}' to missing parent {:?}", node.label, parent);
            return None;
        }
        node.parent = Some(parent);
        let key = self.nodes.insert(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(key);
        }
        Some(key)
    }

    /// Node behind a key
    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Mutable node behind a key
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Parent of a node
    pub fn parent(&self, key: NodeKey) -> Option<NodeKey> {
        self.nodes.get(key).and_then(|node| node.parent)
    }

    /// Children of a node (empty for missing nodes)
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Top-level nodes in insertion order
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Remove a node and all of its descendants, returning the removed nodes
    pub fn remove_subtree(&mut self, key: NodeKey) -> Vec<SceneNode> {
        let Some(parent) = self.nodes.get(key).map(|node| node.parent) else {
            return Vec::new();
        };

        match parent {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(parent) {
                    parent_node.children.retain(|child| *child != key);
                }
            }
            None => self.roots.retain(|root| *root != key),
        }

        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children.iter().copied());
                removed.push(node);
            }
        }
        removed
    }

    /// Model-to-world matrix of a node (parent chain applied)
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let mut node = self.nodes.get(key)?;
        let mut matrix = node.transform.to_matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            matrix = node.transform.to_matrix() * matrix;
        }
        Some(matrix)
    }

    /// All nodes in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &SceneNode)> {
        self.nodes.iter()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene holds no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }
}

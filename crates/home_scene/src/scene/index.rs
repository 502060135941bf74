//! Visual object index
//!
//! Maps domain ids to the scene node that represents them and back. The
//! scene never owns domain entities; a node is tied to a device or room only
//! through this index.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

use super::node::NodeKey;

/// Kind of domain entity a tagged node represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    /// Room volume
    Room,
    /// Light bulb
    Light,
    /// Fan group
    Fan,
}

impl ObjectKind {
    /// Lowercase name used in events and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Light => "light",
            Self::Fan => "fan",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain identity carried by a tagged node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectIdentity {
    /// Id of the room or device
    pub domain_id: String,
    /// What the id refers to
    pub kind: ObjectKind,
}

/// Index registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// The domain id already has a visual object
    #[error("domain id '{0}' is already registered")]
    DuplicateId(String),

    /// The node already carries another identity
    #[error("node {0:?} is already bound to a domain id")]
    NodeAlreadyBound(NodeKey),
}

/// Injective domain id ↔ node mapping
#[derive(Debug, Default)]
pub struct VisualObjectIndex {
    by_id: BTreeMap<String, (NodeKey, ObjectKind)>,
    by_node: HashMap<NodeKey, ObjectIdentity>,
}

impl VisualObjectIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a domain id to a node
    pub fn register(
        &mut self,
        domain_id: impl Into<String>,
        kind: ObjectKind,
        node: NodeKey,
    ) -> Result<(), IndexError> {
        let domain_id = domain_id.into();
        if self.by_id.contains_key(&domain_id) {
            return Err(IndexError::DuplicateId(domain_id));
        }
        if self.by_node.contains_key(&node) {
            return Err(IndexError::NodeAlreadyBound(node));
        }

        self.by_id.insert(domain_id.clone(), (node, kind));
        self.by_node.insert(node, ObjectIdentity { domain_id, kind });
        Ok(())
    }

    /// Whether a domain id is registered
    pub fn contains(&self, domain_id: &str) -> bool {
        self.by_id.contains_key(domain_id)
    }

    /// Node representing a domain id
    pub fn lookup(&self, domain_id: &str) -> Option<NodeKey> {
        self.by_id.get(domain_id).map(|(node, _)| *node)
    }

    /// Node representing a domain id, only if it has the expected kind
    pub fn lookup_kind(&self, domain_id: &str, kind: ObjectKind) -> Option<NodeKey> {
        self.by_id
            .get(domain_id)
            .filter(|(_, registered)| *registered == kind)
            .map(|(node, _)| *node)
    }

    /// Identity carried by a node
    pub fn identity_of(&self, node: NodeKey) -> Option<&ObjectIdentity> {
        self.by_node.get(&node)
    }

    /// All `(domain id, node)` pairs of one kind, ordered by id
    pub fn nodes_of_kind(&self, kind: ObjectKind) -> impl Iterator<Item = (&str, NodeKey)> {
        self.by_id
            .iter()
            .filter(move |(_, (_, registered))| *registered == kind)
            .map(|(id, (node, _))| (id.as_str(), *node))
    }

    /// Number of tagged objects
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether nothing is tagged
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Forget every binding
    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_node.clear();
    }
}

//! A minimal scene graph of named, transformable nodes.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

/// Index of a node within its [`SceneGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Local transform: translation, rotation, uniform-free scale.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Local transform matrix (scale, then rotate, then translate).
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// One node in the graph.
#[derive(Debug)]
pub struct Node {
    /// Name nodes are looked up by. Unique within a graph.
    pub name: String,
    /// Local transform relative to the parent.
    pub transform: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    /// Ids of this node's direct children.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Id of this node's parent, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Flat-storage scene graph with name lookup.
///
/// Nodes are never removed during a session, so ids stay valid for the graph's
/// lifetime.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
    by_name: HashMap<String, NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node. Returns `None` if the name is already taken.
    pub fn add_root(&mut self, name: &str) -> Option<NodeId> {
        self.insert(name, None)
    }

    /// Add a child of `parent`. Returns `None` if the name is already taken.
    pub fn add_child(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        let id = self.insert(name, Some(parent))?;
        self.nodes[parent.0].children.push(id);
        Some(id)
    }

    fn insert(&mut self, name: &str, parent: Option<NodeId>) -> Option<NodeId> {
        if self.by_name.contains_key(name) {
            return None;
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            transform: Transform::default(),
            parent,
            children: Vec::new(),
        });
        self.by_name.insert(name.to_string(), id);
        Some(id)
    }

    /// Look up a node by name.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// World transform: the product of local matrices from the root down.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id.0];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

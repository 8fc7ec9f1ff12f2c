//! Scene store: placed objects, their node hierarchy, and anchor commits.
//!
//! Ownership of every [`PlacedObject`] lives here. The controller and
//! session refer to objects by [`ObjectId`]; a stale id simply resolves to
//! `None`, which is the weak-reference behavior interaction code relies on.

use std::collections::HashMap;

use arplace_object::PlacedObject;
use glam::Mat4;
use tracing::debug;

/// Index of a placed object in the scene store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Index of a node in the scene hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A recorded anchor commit for an object: its transform at commit time and
/// how many times it has been (re)committed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorCommit {
    /// Object world transform at the last commit.
    pub transform: Mat4,
    /// Number of commits so far.
    pub count: u32,
}

struct Node {
    parent: Option<NodeId>,
    object: Option<ObjectId>,
}

/// Arena of placed objects plus the minimal node hierarchy picking needs.
#[derive(Default)]
pub struct Scene {
    nodes: Vec<Node>,
    objects: Vec<PlacedObject>,
    commits: HashMap<ObjectId, AnchorCommit>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, creating its root node. Returns the object id and the
    /// root node id.
    pub fn add_object(&mut self, object: PlacedObject) -> (ObjectId, NodeId) {
        let object_id = ObjectId(self.objects.len());
        self.objects.push(object);
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            object: Some(object_id),
        });
        debug!(?object_id, "added placed object to scene");
        (object_id, node_id)
    }

    /// Add a plain child node under `parent` (e.g. part of an object's
    /// visual subtree).
    pub fn add_child_node(&mut self, parent: NodeId) -> NodeId {
        let node_id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            object: None,
        });
        node_id
    }

    /// Look up an object. Stale ids return `None`.
    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.objects.get(id.0)
    }

    /// Mutable object lookup. Stale ids return `None`.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut PlacedObject> {
        self.objects.get_mut(id.0)
    }

    /// Iterate over all object ids.
    pub fn object_ids(&self) -> impl Iterator<Item = ObjectId> {
        (0..self.objects.len()).map(ObjectId)
    }

    /// Number of objects in the scene.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Closest ancestor of `node` (including itself) that carries a placed
    /// object. An explicit parent-pointer walk, never recursion.
    pub fn placed_object_ancestor(&self, node: NodeId) -> Option<ObjectId> {
        let mut current = Some(node);
        while let Some(id) = current {
            let node = self.nodes.get(id.0)?;
            if let Some(object) = node.object {
                return Some(object);
            }
            current = node.parent;
        }
        None
    }

    /// Record (or refresh) the anchor for an object at its current
    /// transform. Returns `false` for stale ids.
    pub fn commit_anchor(&mut self, id: ObjectId) -> bool {
        let Some(object) = self.objects.get(id.0) else {
            return false;
        };
        let transform = object.transform();
        self.commits
            .entry(id)
            .and_modify(|commit| {
                commit.transform = transform;
                commit.count += 1;
            })
            .or_insert(AnchorCommit {
                transform,
                count: 1,
            });
        debug!(?id, "committed object anchor");
        true
    }

    /// The last anchor commit for an object, if one was ever made.
    pub fn committed_anchor(&self, id: ObjectId) -> Option<&AnchorCommit> {
        self.commits.get(&id)
    }
}

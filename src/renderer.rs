use std::collections::HashMap;

use crate::detected_points::{Point3D, PointIdentifier};

/// Scene-side consumer of tracked points. The renderer owns the association
/// between identifiers and drawables; the manager only tracks membership.
pub trait NodeRenderer {
    /// Drops the drawable for `id`, if any.
    fn remove_node(&mut self, id: PointIdentifier);

    /// Creates the drawable on first sighting, moves it otherwise.
    fn upsert_node(&mut self, id: PointIdentifier, position: Point3D);

    /// Drops every drawable.
    fn clear_nodes(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointNode {
    pub position: Point3D,
    pub created_at_frame: u64,
    pub updates: u32,
}

/// In-memory renderer keeping one [`PointNode`] per identifier.
#[derive(Debug, Clone, Default)]
pub struct SceneNodes {
    nodes: HashMap<PointIdentifier, PointNode>,
    frame: u64,
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl SceneNodes {
    pub fn new() -> SceneNodes {
        SceneNodes::default()
    }

    /// Frame counter stamped into newly created nodes.
    pub fn set_frame(&mut self, frame: u64) {
        self.frame = frame;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: PointIdentifier) -> Option<&PointNode> {
        self.nodes.get(&id)
    }

    /// Identifiers with a live drawable, ascending.
    pub fn identifiers(&self) -> Vec<PointIdentifier> {
        let mut ids: Vec<_> = self.nodes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl NodeRenderer for SceneNodes {
    fn remove_node(&mut self, id: PointIdentifier) {
        if self.nodes.remove(&id).is_some() {
            self.removed += 1;
        } else {
            log::warn!("no node to remove for feature point {}", id);
        }
    }

    fn upsert_node(&mut self, id: PointIdentifier, position: Point3D) {
        let frame = self.frame;
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.position = position;
                node.updates += 1;
                self.updated += 1;
            }
            None => {
                self.nodes.insert(
                    id,
                    PointNode {
                        position,
                        created_at_frame: frame,
                        updates: 0,
                    },
                );
                self.created += 1;
            }
        }
    }

    fn clear_nodes(&mut self) {
        self.removed += self.nodes.len();
        self.nodes.clear();
    }
}

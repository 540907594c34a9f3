use stanza_traits::LayoutProvider;

use crate::{Document, Position};

impl Document {
    /// Resolve a viewport point into a caret position.
    ///
    /// Atomic components split at their horizontal midpoint: the left half
    /// resolves to the position before them, the right half to the position
    /// after. Returns `None` when the layout's point query comes up empty or
    /// hits content outside the editor root; hosts may then apply their own
    /// fallback.
    pub fn position_from_point<L: LayoutProvider>(
        &self,
        layout: &L,
        x: f64,
        y: f64,
    ) -> Option<Position> {
        let hit = layout.caret_from_point(x, y)?;
        let node = self.get_node(hit.node_id)?;
        if !self.is_in_editor_root(hit.node_id) {
            return None;
        }

        // Anything inside an atomic resolves to the atomic itself.
        if let Some(atomic) = self.atomic_self_or_ancestor(hit.node_id) {
            return Some(Position::new(atomic, self.side_of_center(layout, atomic, x)));
        }

        if node.is_text_node() {
            if node.is_addressable_leaf() {
                return Some(Position::new(hit.node_id, hit.offset.min(node.text_len())));
            }
            return self.normalize(hit.node_id, hit.offset as isize);
        }

        // An element candidate: the offset is a child index. Descend to the
        // first addressable leaf at or under the addressed child.
        let children = &node.children;
        let child = children
            .get(hit.offset)
            .or_else(|| children.last())
            .copied();
        let Some(child) = child else {
            // Childless container: fall back to the nearest addressable
            // content the algebra can find.
            return self.normalize(hit.node_id, hit.offset as isize);
        };
        let leaf = self.first_addressable_leaf_inclusive(child)?;
        let leaf_node = &self.nodes[leaf];
        if leaf_node.is_atomic() {
            return Some(Position::new(leaf, self.side_of_center(layout, leaf, x)));
        }

        // A text leaf found through a container hit: re-query the point
        // service for a precise offset on it, else land at its start.
        if let Some(second) = layout.caret_from_point(x, y) {
            if second.node_id == leaf {
                return Some(Position::new(leaf, second.offset.min(leaf_node.text_len())));
            }
        }
        Some(Position::new(leaf, 0))
    }

    fn first_addressable_leaf_inclusive(&self, node_id: usize) -> Option<usize> {
        if self.nodes[node_id].is_addressable_leaf() {
            Some(node_id)
        } else {
            self.first_addressable_leaf(node_id)
        }
    }

    /// The node itself, or its nearest ancestor below the editor root, that
    /// is atomic.
    pub(crate) fn atomic_self_or_ancestor(&self, node_id: usize) -> Option<usize> {
        let root = self.editor_root();
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == root {
                return None;
            }
            let node = self.get_node(id)?;
            if node.is_atomic() {
                return Some(id);
            }
            current = node.parent;
        }
        None
    }

    /// 0 when the point is left of the element's horizontal midpoint, else 1.
    fn side_of_center<L: LayoutProvider>(&self, layout: &L, node_id: usize, x: f64) -> usize {
        match layout.element_rect(node_id) {
            Some(rect) => {
                if x < rect.center().x {
                    0
                } else {
                    1
                }
            }
            None => 0,
        }
    }
}

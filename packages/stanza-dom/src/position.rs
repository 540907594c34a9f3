use std::cmp::Ordering;

use stanza_traits::Direction;

use crate::traversal::LeafWalker;
use crate::{Document, NodeData};

/// A caret position: an addressable leaf plus an offset into it.
///
/// For text leaves the offset is a gap between codepoints, in
/// `0..=text_len`. For atomic leaves the offset is 0 (immediately before) or
/// 1 (immediately after). Positions are immutable values; they are produced
/// normalized and stay valid until the host mutates the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub node_id: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(node_id: usize, offset: usize) -> Self {
        Self { node_id, offset }
    }
}

impl Document {
    /// Whether the position is valid as-is: an addressable leaf inside the
    /// editor root with an in-range offset.
    pub fn is_valid_position(&self, pos: Position) -> bool {
        let Some(node) = self.get_node(pos.node_id) else {
            return false;
        };
        if !self.is_in_editor_root(pos.node_id) {
            return false;
        }
        match &node.data {
            NodeData::Text(data) => {
                !data.content.is_empty() && pos.offset <= node.text_len()
            }
            NodeData::Element(el) => el.is_atomic() && pos.offset <= 1,
            _ => false,
        }
    }

    /// The offset addressing the trailing edge of a leaf: `text_len` for
    /// text, 1 for atomics.
    pub(crate) fn leaf_end_offset(&self, node_id: usize) -> usize {
        let node = &self.nodes[node_id];
        if node.is_text_node() {
            node.text_len()
        } else {
            1
        }
    }

    /// Normalize an arbitrary `(node, offset)` pair into a valid position.
    ///
    /// Out-of-range text offsets walk leaf to leaf, consuming the offset
    /// budget in codepoints (a block boundary between adjacent leaves costs
    /// one unit). Container positions resolve to the addressed child and
    /// recurse. Atomic offsets clamp to `{0, 1}`.
    ///
    /// Returns `None` only when the node is unknown, outside the editor
    /// root, or the document has no addressable leaf to land on.
    pub fn normalize(&self, node_id: usize, offset: isize) -> Option<Position> {
        let root = self.editor_root();
        if !self.is_in_editor_root(node_id) {
            return None;
        }

        let mut node_id = node_id;
        let mut offset = offset;
        loop {
            let node = self.get_node(node_id)?;
            match &node.data {
                NodeData::Text(data) if !data.content.is_empty() => {
                    let len = node.text_len() as isize;
                    if offset < 0 {
                        let Some(prev) =
                            LeafWalker::new(self, root, node_id, Direction::Backward).next()
                        else {
                            offset = 0;
                            continue;
                        };
                        if self.nodes[prev].is_atomic() {
                            return Some(Position::new(prev, 1));
                        }
                        offset += self.nodes[prev].text_len() as isize
                            + self.boundary_cost(prev, node_id);
                        node_id = prev;
                    } else if offset > len {
                        let Some(next) =
                            LeafWalker::new(self, root, node_id, Direction::Forward).next()
                        else {
                            offset = len;
                            continue;
                        };
                        if self.nodes[next].is_atomic() {
                            return Some(Position::new(next, 0));
                        }
                        offset -= len + self.boundary_cost(node_id, next);
                        node_id = next;
                    } else {
                        return Some(self.canonicalize_leaf_end(Position::new(
                            node_id,
                            offset as usize,
                        )));
                    }
                }
                NodeData::Element(el) if el.is_atomic() => {
                    return Some(Position::new(node_id, offset.clamp(0, 1) as usize));
                }
                // Containers (and empty text nodes, comments, the document
                // node): resolve to the addressed child, or to the nearest
                // addressable content.
                _ => {
                    if offset < 0 {
                        offset = 0;
                    }
                    let children = &node.children;
                    if (offset as usize) < children.len() {
                        node_id = children[offset as usize];
                        offset = 0;
                    } else if let Some(leaf) = self.last_addressable_leaf(node_id) {
                        return Some(Position::new(leaf, self.leaf_end_offset(leaf)));
                    } else if let Some(next) =
                        LeafWalker::new(self, root, node_id, Direction::Forward).next()
                    {
                        return Some(Position::new(next, 0));
                    } else if let Some(prev) =
                        LeafWalker::new(self, root, node_id, Direction::Backward).next()
                    {
                        return Some(Position::new(prev, self.leaf_end_offset(prev)));
                    } else {
                        return None;
                    }
                }
            }
        }
    }

    /// Convenience wrapper over [`Self::normalize`] for in-range inputs.
    pub fn normalize_position(&self, pos: Position) -> Option<Position> {
        self.normalize(pos.node_id, pos.offset as isize)
    }

    /// One extra unit of offset budget is consumed when stepping between
    /// leaves that do not share an inline flow: the block transition itself
    /// is a caret stop.
    fn boundary_cost(&self, earlier_leaf: usize, later_leaf: usize) -> isize {
        if self.same_inline_flow(earlier_leaf, later_leaf) {
            0
        } else {
            1
        }
    }

    /// Two leaves share an inline flow when they sit under the same nearest
    /// block ancestor.
    pub(crate) fn same_inline_flow(&self, a: usize, b: usize) -> bool {
        self.nearest_block_ancestor(a) == self.nearest_block_ancestor(b)
    }

    /// Whether a leaf's direct parent is an inline formatting wrapper
    /// (`<b>`, `<i>`, `<span>`, ...) rather than its block container.
    fn is_inline_wrapped(&self, leaf_id: usize) -> bool {
        let Some(parent) = self.nodes[leaf_id].parent else {
            return false;
        };
        parent != self.editor_root() && self.nodes[parent].is_inline()
    }

    /// Boundary-adjacency canonicalization: a text position exactly at the
    /// end of its leaf may have a canonical twin at the start of the next
    /// leaf. Applies only within one inline flow; block-separated ends stay
    /// put.
    fn canonicalize_leaf_end(&self, pos: Position) -> Position {
        let node = &self.nodes[pos.node_id];
        if !node.is_text_node() || pos.offset != node.text_len() {
            return pos;
        }
        let root = self.editor_root();
        let Some(next) = LeafWalker::new(self, root, pos.node_id, Direction::Forward).next()
        else {
            return pos;
        };
        if !self.same_inline_flow(pos.node_id, next) {
            return pos;
        }
        let next_node = &self.nodes[next];
        if next_node.is_atomic() {
            // An adjacent inline atomic owns the boundary; never canonicalize
            // onto a br though, character movement treats those as air.
            if next_node.is_inline() && !next_node.is_br() {
                return Position::new(next, 0);
            }
            return pos;
        }
        match (
            self.is_inline_wrapped(pos.node_id),
            self.is_inline_wrapped(next),
        ) {
            // Mark-to-mark boundary: stay on the left side
            (true, true) => pos,
            // Entering a styled run from plain text lands inside it
            (false, true) => Position::new(next, 0),
            _ => pos,
        }
    }

    /// Total order over valid positions: document order of leaves, ties
    /// broken by offset.
    pub fn compare_positions(&self, a: Position, b: Position) -> Ordering {
        if a.node_id == b.node_id {
            return a.offset.cmp(&b.offset);
        }
        self.compare_document_order(a.node_id, b.node_id)
    }
}

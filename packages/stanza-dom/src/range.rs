use kurbo::Rect;
use stanza_traits::{Direction, LayoutProvider};

use crate::rects::same_visual_line;
use crate::traversal::LeafWalker;
use crate::{Document, Position};

/// A concrete range over the tree, the shape renderers consume: both
/// endpoints are `(node, offset)` pairs in document order, with atomic
/// endpoints translated to parent-indexed offsets (`(atomic, 1)` becomes
/// "after the atomic's index in its parent").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeRange {
    pub start_node: usize,
    pub start_offset: usize,
    pub end_node: usize,
    pub end_offset: usize,
}

impl NodeRange {
    pub fn is_collapsed(&self) -> bool {
        self.start_node == self.end_node && self.start_offset == self.end_offset
    }
}

impl Document {
    /// Materialize the current selection as a [`NodeRange`].
    pub fn materialize_range(&self) -> Option<NodeRange> {
        let selection = self.selection?;
        let (start, end) = self.selection_bounds_of(&selection);
        let (start_node, start_offset) = self.range_endpoint(start);
        let (end_node, end_offset) = self.range_endpoint(end);
        Some(NodeRange {
            start_node,
            start_offset,
            end_node,
            end_offset,
        })
    }

    /// Text endpoints pass through; atomic endpoints address their parent.
    fn range_endpoint(&self, pos: Position) -> (usize, usize) {
        let node = &self.nodes[pos.node_id];
        if node.is_atomic() {
            if let (Some(parent), Some(index)) = (node.parent, self.child_index(pos.node_id)) {
                return (parent, index + pos.offset);
            }
        }
        (pos.node_id, pos.offset)
    }

    /// The plain text between the selection endpoints: text leaf slices,
    /// with `br`s, block transitions, and intervening block-level atomics
    /// contributing a newline. Inline atomics contribute nothing.
    pub fn selected_text(&self) -> String {
        let Some(selection) = self.selection else {
            return String::new();
        };
        if selection.is_collapsed() {
            return String::new();
        }
        let (start, end) = self.selection_bounds_of(&selection);

        let root = self.editor_root();
        let mut out = String::new();
        let mut last_text: Option<usize> = None;
        let mut block_break = false;
        let leaves = std::iter::once(start.node_id)
            .chain(LeafWalker::new(self, root, start.node_id, Direction::Forward));
        for leaf in leaves {
            let is_start = leaf == start.node_id;
            let is_end = leaf == end.node_id;
            let node = &self.nodes[leaf];
            if let Some(data) = node.text_data() {
                let from = if is_start { start.offset } else { 0 };
                let to = if is_end { end.offset } else { node.text_len() };
                if to > from {
                    let flow_changed = last_text
                        .is_some_and(|prev| !self.same_inline_flow(prev, leaf));
                    if last_text.is_some() && (flow_changed || block_break) {
                        out.push('\n');
                    }
                    out.extend(data.content.chars().skip(from).take(to - from));
                    last_text = Some(leaf);
                    block_break = false;
                }
            } else if node.is_br() {
                let included = (!is_start || start.offset == 0) && (!is_end || end.offset == 1);
                if included {
                    out.push('\n');
                    last_text = None;
                    block_break = false;
                }
            } else if node.is_block() {
                // A block atomic (rule, table) between text runs reads as a
                // line break even though it contributes no text itself.
                block_break = true;
            }
            if is_end {
                break;
            }
        }
        out
    }

    /// Highlight rectangles for the current selection, in document order,
    /// one per visual line fragment. A collapsed selection yields its caret
    /// rect(s).
    pub fn rects_for_selection<L: LayoutProvider>(&self, layout: &L) -> Vec<Rect> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        if selection.is_collapsed() {
            return self.rects_for_position(layout, selection.focus);
        }
        let (start, end) = self.selection_bounds_of(&selection);

        let mut raw: Vec<Rect> = Vec::new();
        if start.node_id == end.node_id {
            let node = &self.nodes[start.node_id];
            if node.is_text_node() {
                raw = layout.text_rects(start.node_id, start.offset..end.offset);
            } else if (start.offset, end.offset) == (0, 1) {
                raw.extend(layout.element_rect(start.node_id));
            }
        } else {
            let root = self.editor_root();
            let leaves = std::iter::once(start.node_id)
                .chain(LeafWalker::new(self, root, start.node_id, Direction::Forward));
            for leaf in leaves {
                let is_start = leaf == start.node_id;
                let is_end = leaf == end.node_id;
                let node = &self.nodes[leaf];
                if node.is_text_node() {
                    let from = if is_start { start.offset } else { 0 };
                    let to = if is_end { end.offset } else { node.text_len() };
                    if to > from {
                        raw.extend(layout.text_rects(leaf, from..to));
                    }
                } else {
                    // An atomic is highlighted only when fully inside the
                    // selection.
                    let included = (!is_start || start.offset == 0) && (!is_end || end.offset == 1);
                    if included {
                        raw.extend(layout.element_rect(leaf));
                    }
                }
                if is_end {
                    break;
                }
            }
        }

        // Stitch per-leaf rects into one rect per visual line fragment.
        let mut fragments: Vec<Rect> = Vec::new();
        let mut current: Option<Rect> = None;
        for rect in raw.into_iter().filter(|rect| rect.height() > 0.0) {
            current = Some(match current {
                None => rect,
                Some(open) if same_visual_line(open, rect) => open.union(rect),
                Some(open) => {
                    fragments.push(open);
                    rect
                }
            });
        }
        fragments.extend(current);
        fragments
    }
}

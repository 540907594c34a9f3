use std::collections::VecDeque;

use kurbo::Rect;
use smallvec::SmallVec;
use stanza_traits::{Direction, LayoutProvider};

use crate::traversal::LeafWalker;
use crate::{Document, Position};

/// Rects whose vertical overlap ratio is at least this share a visual line.
pub(crate) const LINE_OVERLAP_THRESHOLD: f64 = 0.5;

/// `overlap_height / min(h1, h2)`: the criterion for "same visual line".
pub(crate) fn vertical_overlap_ratio(a: Rect, b: Rect) -> f64 {
    let overlap = (a.y1.min(b.y1) - a.y0.max(b.y0)).max(0.0);
    let min_height = a.height().min(b.height());
    if min_height <= 0.0 {
        0.0
    } else {
        overlap / min_height
    }
}

pub(crate) fn same_visual_line(a: Rect, b: Rect) -> bool {
    vertical_overlap_ratio(a, b) >= LINE_OVERLAP_THRESHOLD
}

impl Document {
    /// The caret rectangle(s) for a position, in viewport coordinates.
    ///
    /// Text positions yield the collapsed-range client rects (one, or two at
    /// a soft-wrap boundary). Atomic positions yield one zero-width rect at
    /// the element's leading or trailing edge, expanded vertically to the
    /// configured minimum caret height when the element is shorter.
    pub fn rects_for_position<L: LayoutProvider>(&self, layout: &L, pos: Position) -> Vec<Rect> {
        if !self.is_valid_position(pos) {
            return Vec::new();
        }
        let node = &self.nodes[pos.node_id];
        if node.is_text_node() {
            return layout.text_rects(pos.node_id, pos.offset..pos.offset);
        }
        let Some(rect) = layout.element_rect(pos.node_id) else {
            return Vec::new();
        };
        let rect = ensure_min_height(rect, self.config.min_caret_height);
        let x = if pos.offset == 0 { rect.x0 } else { rect.x1 };
        vec![Rect::new(x, rect.y0, x, rect.y1)]
    }
}

/// Expand a rect symmetrically in the vertical axis up to `min_height`.
pub(crate) fn ensure_min_height(rect: Rect, min_height: f64) -> Rect {
    if rect.height() >= min_height {
        return rect;
    }
    let mid_y = (rect.y0 + rect.y1) / 2.0;
    Rect::new(
        rect.x0,
        mid_y - min_height / 2.0,
        rect.x1,
        mid_y + min_height / 2.0,
    )
}

/// One record of the rect walker's stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStep {
    pub node_id: usize,
    pub rect: Rect,
    /// Visual line index relative to the starting line: 0, 1, 2, ... going
    /// forward; 0, -1, -2, ... going backward.
    pub line_offset: i32,
    /// Whether this rect anchored its visual line.
    pub at_line_start: bool,
}

/// Enumerates, in a direction from a starting position, the layout rects of
/// the addressable leaves, stitched into visual lines by vertical-overlap
/// analysis against a running line-anchor rect.
///
/// The starting leaf contributes the caret rect at the start offset (which
/// anchors line 0), then its partial tail (forward) or head (backward).
/// Subsequent leaves contribute their full rect lists. Zero-height rects are
/// dropped. Single-use; consumers apply `skip_while` / `take_while`.
pub struct RectWalker<'a, L: LayoutProvider> {
    doc: &'a Document,
    layout: &'a L,
    direction: Direction,
    leaves: LeafWalker<'a>,
    queue: VecDeque<(usize, Rect)>,
    leaves_done: bool,
    anchor: Option<Rect>,
    line_offset: i32,
}

impl<'a, L: LayoutProvider> RectWalker<'a, L> {
    pub fn new(doc: &'a Document, layout: &'a L, start: Position, direction: Direction) -> Self {
        let root = doc.editor_root();
        let leaves = LeafWalker::new(doc, root, start.node_id, direction);
        let mut queue = VecDeque::new();

        // The caret rect at the start offset anchors the starting line. At a
        // soft-wrap boundary the downstream rect is the anchor.
        let caret_rects = doc.rects_for_position(layout, start);
        if let Some(&rect) = caret_rects.last() {
            queue.push_back((start.node_id, rect));
        }

        // The partial remainder of the starting leaf.
        if let Some(node) = doc.get_node(start.node_id) {
            if node.is_text_node() {
                let len = node.text_len();
                // An empty range would read as a caret-rect query, so only
                // fetch the remainder when there is one.
                let tail = match direction {
                    Direction::Forward if start.offset < len => {
                        layout.text_rects(start.node_id, start.offset..len)
                    }
                    Direction::Backward if start.offset > 0 => {
                        let mut head = layout.text_rects(start.node_id, 0..start.offset);
                        head.reverse();
                        head
                    }
                    _ => Vec::new(),
                };
                queue.extend(tail.into_iter().map(|rect| (start.node_id, rect)));
            } else if node.is_atomic() {
                let include_box = match direction {
                    Direction::Forward => start.offset == 0,
                    Direction::Backward => start.offset == 1,
                };
                if include_box {
                    if let Some(rect) = layout.element_rect(start.node_id) {
                        queue.push_back((start.node_id, rect));
                    }
                }
            }
        }

        Self {
            doc,
            layout,
            direction,
            leaves,
            queue,
            leaves_done: false,
            anchor: None,
            line_offset: 0,
        }
    }

    fn refill(&mut self) -> bool {
        while self.queue.is_empty() {
            if self.leaves_done {
                return false;
            }
            let Some(leaf) = self.leaves.next() else {
                self.leaves_done = true;
                return false;
            };
            let node = &self.doc.nodes[leaf];
            let rects: SmallVec<[Rect; 2]> = if node.is_text_node() {
                let len = node.text_len();
                let mut rects = self.layout.text_rects(leaf, 0..len);
                if self.direction == Direction::Backward {
                    rects.reverse();
                }
                SmallVec::from_vec(rects)
            } else {
                self.layout.element_rect(leaf).into_iter().collect()
            };
            self.queue.extend(rects.into_iter().map(|rect| (leaf, rect)));
        }
        true
    }
}

impl<L: LayoutProvider> Iterator for RectWalker<'_, L> {
    type Item = RectStep;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.queue.is_empty() && !self.refill() {
                return None;
            }
            let (node_id, rect) = self.queue.pop_front()?;
            if rect.height() <= 0.0 {
                continue;
            }
            let Some(anchor) = self.anchor else {
                self.anchor = Some(rect);
                return Some(RectStep {
                    node_id,
                    rect,
                    line_offset: self.line_offset,
                    at_line_start: true,
                });
            };
            if same_visual_line(anchor, rect) {
                return Some(RectStep {
                    node_id,
                    rect,
                    line_offset: self.line_offset,
                    at_line_start: false,
                });
            }
            // A candidate for a new line; filter out regressions first
            // (e.g. leftover rects of the same soft-wrap line).
            let regressed = match self.direction {
                Direction::Forward => rect.y1 <= anchor.y1,
                Direction::Backward => rect.y0 >= anchor.y0,
            };
            if regressed {
                continue;
            }
            self.anchor = Some(rect);
            self.line_offset += match self.direction {
                Direction::Forward => 1,
                Direction::Backward => -1,
            };
            return Some(RectStep {
                node_id,
                rect,
                line_offset: self.line_offset,
                at_line_start: true,
            });
        }
    }
}

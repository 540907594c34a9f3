//! Test scaffolding: a deterministic monospace layout provider and a small
//! harness for driving the selection core against parsed markup.
//!
//! The grid layout places every codepoint on a `CHAR_W` x `LINE_H` cell:
//! blocks stack vertically, inline content flows left to right and soft-wraps
//! at the configured width, `<br>` forces a line break, atomic inline
//! elements occupy a two-cell box, and block atomics (`<hr>`, `<table>`)
//! get a full-width box of their own. That is enough real layout behavior to
//! exercise rect walking, goal-x steering, and hit testing without a browser.
#![allow(dead_code)]

use std::collections::HashMap;
use std::ops::Range;

use kurbo::Rect;
use stanza_dom::{
    CaretHit, Direction, Document, DocumentConfig, Granularity, LayoutProvider, LeafWalker,
    ModifyType, Position,
};
use stanza_html::parse_html_document;

pub const CHAR_W: f64 = 8.0;
pub const LINE_H: f64 = 16.0;
/// Width of an inline atomic box (mention chips etc.) in the grid.
pub const INLINE_BOX_W: f64 = 2.0 * CHAR_W;
/// Height of a block-level `<hr>` box.
pub const RULE_H: f64 = 2.0;

/// One soft-wrap fragment of a text leaf: codepoints `[start, end)` starting
/// at `(x, y)`.
#[derive(Debug, Clone, Copy)]
struct Fragment {
    start: usize,
    end: usize,
    x: f64,
    y: f64,
}

impl Fragment {
    fn rect(&self) -> Rect {
        let width = (self.end - self.start) as f64 * CHAR_W;
        Rect::new(self.x, self.y, self.x + width, self.y + LINE_H)
    }

    fn len(&self) -> usize {
        self.end - self.start
    }
}

#[derive(Default)]
pub struct GridLayout {
    text_frags: HashMap<usize, Vec<Fragment>>,
    atomic_boxes: HashMap<usize, Rect>,
    block_boxes: HashMap<usize, Rect>,
    max_width: f64,
}

struct FlowCursor {
    x0: f64,
    limit: f64,
    x: f64,
    y: f64,
}

impl FlowCursor {
    fn wrap(&mut self) {
        self.x = self.x0;
        self.y += LINE_H;
    }

    fn fits(&self, width: f64) -> bool {
        self.x + width <= self.limit || self.x == self.x0
    }
}

impl GridLayout {
    pub fn compute(doc: &Document, max_width: f64) -> Self {
        let mut layout = GridLayout {
            max_width,
            ..Default::default()
        };
        let root = doc.editor_root();
        layout.layout_children(doc, root, 0.0, 0.0);
        layout
    }

    /// Lay out a container's children: inline runs flow, block children
    /// stack. Returns the y coordinate below the laid-out content.
    fn layout_children(&mut self, doc: &Document, parent: usize, x0: f64, y0: f64) -> f64 {
        let mut y = y0;
        let mut flow: Option<FlowCursor> = None;

        for &child in &doc.nodes[parent].children {
            let node = &doc.nodes[child];
            if node.is_comment() {
                continue;
            }
            if node.is_block() {
                if let Some(cursor) = flow.take() {
                    y = cursor.y + LINE_H;
                }
                y = self.layout_block(doc, child, x0, y);
            } else {
                let cursor = flow.get_or_insert(FlowCursor {
                    x0,
                    limit: x0 + self.max_width,
                    x: x0,
                    y,
                });
                self.flow_inline(doc, child, cursor);
            }
        }
        if let Some(cursor) = flow {
            y = cursor.y + LINE_H;
        }
        y
    }

    fn layout_block(&mut self, doc: &Document, node_id: usize, x0: f64, y: f64) -> f64 {
        let node = &doc.nodes[node_id];
        if node.is_atomic() {
            let height = if node.is_br() {
                // Never happens for a well-formed UA table (br is inline),
                // but keep the arm total.
                LINE_H
            } else if node.element_data().map(|el| el.name.local.as_ref()) == Some("hr") {
                RULE_H
            } else {
                2.0 * LINE_H
            };
            let rect = Rect::new(x0, y, x0 + self.max_width, y + height);
            self.atomic_boxes.insert(node_id, rect);
            return y + height;
        }
        let bottom = self.layout_children(doc, node_id, x0, y);
        self.block_boxes
            .insert(node_id, Rect::new(x0, y, x0 + self.max_width, bottom));
        bottom
    }

    fn flow_inline(&mut self, doc: &Document, node_id: usize, cursor: &mut FlowCursor) {
        let node = &doc.nodes[node_id];
        if node.is_text_node() {
            let len = node.text_len();
            let mut frags = Vec::new();
            let mut frag_start = 0;
            let mut frag_x = cursor.x;
            for i in 0..len {
                if !cursor.fits(CHAR_W) {
                    if i > frag_start {
                        frags.push(Fragment {
                            start: frag_start,
                            end: i,
                            x: frag_x,
                            y: cursor.y,
                        });
                    }
                    cursor.wrap();
                    frag_start = i;
                    frag_x = cursor.x;
                }
                cursor.x += CHAR_W;
            }
            if len > frag_start {
                frags.push(Fragment {
                    start: frag_start,
                    end: len,
                    x: frag_x,
                    y: cursor.y,
                });
            }
            if !frags.is_empty() {
                self.text_frags.insert(node_id, frags);
            }
            return;
        }
        if node.is_br() {
            self.atomic_boxes.insert(
                node_id,
                Rect::new(cursor.x, cursor.y, cursor.x, cursor.y + LINE_H),
            );
            cursor.wrap();
            return;
        }
        if node.is_atomic() {
            if !cursor.fits(INLINE_BOX_W) {
                cursor.wrap();
            }
            self.atomic_boxes.insert(
                node_id,
                Rect::new(
                    cursor.x,
                    cursor.y,
                    cursor.x + INLINE_BOX_W,
                    cursor.y + LINE_H,
                ),
            );
            cursor.x += INLINE_BOX_W;
            return;
        }
        // An inline wrapper: flow through its children
        for &child in &doc.nodes[node_id].children {
            self.flow_inline(doc, child, cursor);
        }
    }

    fn fragment_at_offset(&self, node_id: usize, offset: usize) -> Vec<Rect> {
        let Some(frags) = self.text_frags.get(&node_id) else {
            return Vec::new();
        };
        frags
            .iter()
            .filter(|frag| frag.start <= offset && offset <= frag.end)
            .map(|frag| {
                let x = frag.x + (offset - frag.start) as f64 * CHAR_W;
                Rect::new(x, frag.y, x, frag.y + LINE_H)
            })
            .collect()
    }
}

impl LayoutProvider for GridLayout {
    fn text_rects(&self, node_id: usize, range: Range<usize>) -> Vec<Rect> {
        if range.start == range.end {
            return self.fragment_at_offset(node_id, range.start);
        }
        let Some(frags) = self.text_frags.get(&node_id) else {
            return Vec::new();
        };
        frags
            .iter()
            .filter_map(|frag| {
                let lo = range.start.max(frag.start);
                let hi = range.end.min(frag.end);
                (hi > lo).then(|| {
                    Rect::new(
                        frag.x + (lo - frag.start) as f64 * CHAR_W,
                        frag.y,
                        frag.x + (hi - frag.start) as f64 * CHAR_W,
                        frag.y + LINE_H,
                    )
                })
            })
            .collect()
    }

    fn element_rect(&self, node_id: usize) -> Option<Rect> {
        self.atomic_boxes
            .get(&node_id)
            .or_else(|| self.block_boxes.get(&node_id))
            .copied()
    }

    fn caret_from_point(&self, x: f64, y: f64) -> Option<CaretHit> {
        let in_band = |rect: Rect| rect.y0 <= y && y < rect.y1.max(rect.y0 + 1.0);

        // Deterministic iteration order: node id
        let mut text_ids: Vec<usize> = self.text_frags.keys().copied().collect();
        text_ids.sort_unstable();
        let mut atomic_ids: Vec<usize> = self.atomic_boxes.keys().copied().collect();
        atomic_ids.sort_unstable();

        // A direct hit on a text fragment gives a precise offset.
        for &node_id in &text_ids {
            for frag in &self.text_frags[&node_id] {
                let rect = frag.rect();
                if in_band(rect) && rect.x0 <= x && x <= rect.x1 {
                    let offset = ((x - rect.x0) / CHAR_W).round() as usize;
                    return Some(CaretHit {
                        node_id,
                        offset: frag.start + offset.min(frag.len()),
                    });
                }
            }
        }

        // A direct hit on an atomic box.
        for &node_id in &atomic_ids {
            let rect = self.atomic_boxes[&node_id];
            if in_band(rect) && rect.x0 <= x && x <= rect.x1 {
                return Some(CaretHit { node_id, offset: 0 });
            }
        }

        // Same line band, off to a side: snap to the nearest content edge.
        let mut best: Option<(f64, CaretHit)> = None;
        let mut consider = |distance: f64, hit: CaretHit| {
            if best.is_none() || distance < best.unwrap().0 {
                best = Some((distance, hit));
            }
        };
        for &node_id in &text_ids {
            for frag in &self.text_frags[&node_id] {
                let rect = frag.rect();
                if !in_band(rect) {
                    continue;
                }
                if x < rect.x0 {
                    consider(
                        rect.x0 - x,
                        CaretHit {
                            node_id,
                            offset: frag.start,
                        },
                    );
                } else if x > rect.x1 {
                    consider(
                        x - rect.x1,
                        CaretHit {
                            node_id,
                            offset: frag.end,
                        },
                    );
                }
            }
        }
        for &node_id in &atomic_ids {
            let rect = self.atomic_boxes[&node_id];
            if !in_band(rect) {
                continue;
            }
            let distance = if x < rect.x0 {
                rect.x0 - x
            } else {
                x - rect.x1
            };
            consider(distance, CaretHit { node_id, offset: 0 });
        }
        if let Some((_, hit)) = best {
            return Some(hit);
        }

        // A block box hit with no content on the line: report the element
        // with a child index past the end, as the platform services do.
        let mut deepest: Option<(f64, usize)> = None;
        for (&node_id, &rect) in &self.block_boxes {
            if rect.x0 <= x && x <= rect.x1 && rect.y0 <= y && y < rect.y1 {
                let area = rect.area();
                if deepest.is_none() || area < deepest.unwrap().0 {
                    deepest = Some((area, node_id));
                }
            }
        }
        deepest.map(|(_, node_id)| CaretHit {
            node_id,
            offset: usize::MAX,
        })
    }
}

/// Harness: parsed document + grid layout + assertion helpers that print the
/// offending position on failure.
pub struct TestDoc {
    pub doc: Document,
    pub layout: GridLayout,
}

#[allow(dead_code)]
impl TestDoc {
    pub fn parse(html: &str) -> Self {
        Self::with_width(html, 800.0)
    }

    /// Parse with a constrained content width (in px) to force soft wraps.
    pub fn with_width(html: &str, width: f64) -> Self {
        let doc = parse_html_document(html, DocumentConfig::default());
        let layout = GridLayout::compute(&doc, width);
        Self { doc, layout }
    }

    /// The id of the text leaf with exactly this content.
    #[track_caller]
    pub fn text(&self, content: &str) -> usize {
        self.doc
            .nodes
            .iter()
            .find(|(_, node)| {
                node.text_data()
                    .is_some_and(|data| data.content == content)
            })
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no text leaf with content {content:?}"))
    }

    /// The id of the first element with this tag name.
    #[track_caller]
    pub fn tag(&self, tag: &str) -> usize {
        self.doc
            .nodes
            .iter()
            .find(|(_, node)| {
                node.element_data()
                    .is_some_and(|el| el.name.local.as_ref() == tag)
            })
            .map(|(id, _)| id)
            .unwrap_or_else(|| panic!("no <{tag}> element"))
    }

    /// Collapse the selection at a position (normalization applies).
    #[track_caller]
    pub fn caret(&mut self, node_id: usize, offset: usize) {
        let ok = self
            .doc
            .set_selection(Position::new(node_id, offset), None);
        assert!(ok, "could not set caret to ({node_id}, {offset})");
    }

    pub fn modify(&mut self, ty: ModifyType, direction: Direction, granularity: Granularity) -> bool {
        self.doc.modify(&self.layout, ty, direction, granularity)
    }

    pub fn move_caret(&mut self, direction: Direction, granularity: Granularity) -> bool {
        self.modify(ModifyType::Move, direction, granularity)
    }

    pub fn extend_caret(&mut self, direction: Direction, granularity: Granularity) -> bool {
        self.modify(ModifyType::Extend, direction, granularity)
    }

    pub fn focus(&self) -> Position {
        self.doc.selection().expect("a selection").focus
    }

    #[track_caller]
    pub fn assert_focus(&self, node_id: usize, offset: usize) {
        let focus = self.focus();
        assert_eq!(
            focus,
            Position::new(node_id, offset),
            "focus is on {:?}, expected {:?} at offset {offset}",
            self.describe(focus.node_id),
            self.describe(node_id),
        );
    }

    #[track_caller]
    pub fn assert_collapsed_at(&self, node_id: usize, offset: usize) {
        let selection = self.doc.selection().expect("a selection");
        assert!(
            selection.is_collapsed(),
            "selection is not collapsed: {selection:?}"
        );
        self.assert_focus(node_id, offset);
    }

    fn describe(&self, node_id: usize) -> String {
        self.doc
            .get_node(node_id)
            .map(|node| node.node_debug_str())
            .unwrap_or_else(|| format!("<unknown node {node_id}>"))
    }

    /// The border-box rect the grid layout assigned to an element.
    #[track_caller]
    pub fn layout_rect_of(&self, node_id: usize) -> Rect {
        self.layout
            .element_rect(node_id)
            .unwrap_or_else(|| panic!("node {node_id} has no layout box"))
    }

    /// All addressable leaves under the editor root, in document order.
    pub fn leaves(&self) -> Vec<usize> {
        let root = self.doc.editor_root();
        LeafWalker::new(&self.doc, root, root, Direction::Forward).collect()
    }
}

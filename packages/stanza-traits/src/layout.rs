use std::ops::Range;

use kurbo::Rect;

/// A caret candidate produced by the layout engine's point query.
///
/// `node_id` may refer to a text leaf (with `offset` a codepoint offset into
/// it) or to an element (with `offset` a child index). The core's resolver
/// turns either shape into a valid caret position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaretHit {
    pub node_id: usize,
    pub offset: usize,
}

/// The seam to the host layout engine.
///
/// All rectangles are in viewport coordinates. Calls may trigger synchronous
/// layout on the host side; the core treats them as pure (same document, same
/// layout, same answer) but potentially expensive.
pub trait LayoutProvider {
    /// Client rectangles for a codepoint sub-range of a text leaf, one per
    /// soft-wrap fragment, in visual order.
    ///
    /// An empty range requests the collapsed-caret rectangles at that offset:
    /// usually one zero-width rect, two when the offset sits exactly on a
    /// soft-wrap boundary (end of the upper line, then start of the lower).
    ///
    /// Returns an empty vec when the leaf has no layout (e.g. `display: none`
    /// subtree or detached node).
    fn text_rects(&self, node_id: usize, range: Range<usize>) -> Vec<Rect>;

    /// The border-box rectangle of an element, if it has one.
    fn element_rect(&self, node_id: usize) -> Option<Rect>;

    /// The caret candidate nearest to a viewport point, akin to the
    /// platform's caret-from-point service. `None` when the point hits
    /// nothing the layout knows about.
    fn caret_from_point(&self, x: f64, y: f64) -> Option<CaretHit>;
}

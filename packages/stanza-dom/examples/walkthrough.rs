//! Walks a caret through a small document, printing every stop.
//!
//! Character and document-boundary movement never consult layout, so this
//! runs with a no-op layout provider; line movement and hit testing need a
//! real one (see the grid layout in the test suite).

use std::ops::Range;

use kurbo::Rect;
use stanza_dom::{
    CaretHit, Direction, Granularity, LayoutProvider, ModifyType, Position,
};
use stanza_html::parse_html_document;

struct NoLayout;

impl LayoutProvider for NoLayout {
    fn text_rects(&self, _node_id: usize, _range: Range<usize>) -> Vec<Rect> {
        Vec::new()
    }

    fn element_rect(&self, _node_id: usize) -> Option<Rect> {
        None
    }

    fn caret_from_point(&self, _x: f64, _y: f64) -> Option<CaretHit> {
        None
    }
}

fn describe(doc: &stanza_dom::Document, pos: Position) -> String {
    let node = doc.get_node(pos.node_id).unwrap();
    format!("{} @ {}", node.node_debug_str(), pos.offset)
}

fn main() {
    let html = "<p>Hello <strong>World</strong></p><hr/><p>Line1<br/>Line2</p>";
    let mut doc = parse_html_document(html, Default::default());

    println!("document tree:");
    doc.print_subtree(doc.editor_root(), 0);
    println!();

    let layout = NoLayout;
    println!("caret stops, walking forward by character:");
    loop {
        let focus = doc.selection().unwrap().focus;
        println!("  {}", describe(&doc, focus));
        if !doc.modify(&layout, ModifyType::Move, Direction::Forward, Granularity::Character) {
            break;
        }
    }

    doc.modify(
        &layout,
        ModifyType::Move,
        Direction::Backward,
        Granularity::DocumentBoundary,
    );
    doc.modify(
        &layout,
        ModifyType::Extend,
        Direction::Forward,
        Granularity::DocumentBoundary,
    );
    println!();
    println!("select-all text: {:?}", doc.selected_text());
    println!("materialized range: {:?}", doc.materialize_range());
}

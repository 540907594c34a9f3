//! Point-to-position resolution and the universal invariants.

mod common;

use common::{CHAR_W, LINE_H, TestDoc};
use stanza_dom::{Direction, Granularity, ModifyType, Position};

#[test]
fn point_inside_text_resolves_to_the_nearest_gap() {
    let d = TestDoc::parse("<div>Hello World</div>");
    let text = d.text("Hello World");

    // Left half of a character cell snaps left, right half snaps right
    let pos = d.doc.position_from_point(&d.layout, 2.0 * CHAR_W + 2.0, 8.0);
    assert_eq!(pos, Some(Position::new(text, 2)));
    let pos = d.doc.position_from_point(&d.layout, 2.0 * CHAR_W + 6.0, 8.0);
    assert_eq!(pos, Some(Position::new(text, 3)));
}

#[test]
fn point_on_an_atomic_splits_at_its_midpoint() {
    let mut d = TestDoc::parse("<p>Hi <span class=\"atomic-component\">@bob</span> there</p>");
    let chip = d.leaves()[1];
    let rect = d.layout_rect_of(chip);
    let mid_y = (rect.y0 + rect.y1) / 2.0;

    let before = d.doc.position_from_point(&d.layout, rect.x0 + 1.0, mid_y);
    assert_eq!(before, Some(Position::new(chip, 0)));
    let after = d.doc.position_from_point(&d.layout, rect.x1 - 1.0, mid_y);
    assert_eq!(after, Some(Position::new(chip, 1)));

    // And the resolved positions are storable as-is
    assert!(d.doc.collapse(before.unwrap()));
    assert!(d.doc.is_valid_position(d.focus()));
}

#[test]
fn point_outside_everything_resolves_to_nothing() {
    let d = TestDoc::parse("<div>Hello</div>");
    assert_eq!(d.doc.position_from_point(&d.layout, 400.0, 4000.0), None);
}

#[test]
fn point_past_the_line_end_clamps_to_it() {
    let d = TestDoc::parse("<div>Hi</div><div>A much longer line</div>");
    let hi = d.text("Hi");

    // Far right of the short first line
    let pos = d.doc.position_from_point(&d.layout, 500.0, LINE_H / 2.0);
    assert_eq!(pos, Some(Position::new(hi, 2)));
}

#[test]
fn caret_rect_round_trips_through_the_resolver() {
    let d = TestDoc::parse("<p>Hello <strong>World</strong></p>");
    let mut checked = 0;
    for leaf in d.leaves() {
        let len = d.doc.nodes[leaf].text_len();
        for offset in 0..=len {
            let pos = Position::new(leaf, offset);
            let rects = d.doc.rects_for_position(&d.layout, pos);
            let Some(rect) = rects.first() else { continue };
            let center = rect.center();
            let resolved = d
                .doc
                .position_from_point(&d.layout, center.x, center.y)
                .expect("caret rect center resolves");
            // Equal modulo boundary-adjacency canonicalization
            let canonical_a = d.doc.normalize(pos.node_id, pos.offset as isize);
            let canonical_b = d.doc.normalize(resolved.node_id, resolved.offset as isize);
            assert_eq!(canonical_a, canonical_b, "round trip at {pos:?} via {rect:?}");
            checked += 1;
        }
    }
    assert!(checked > 10, "expected to exercise the whole document");
}

#[test]
fn every_operation_preserves_position_validity() {
    use Direction::*;
    use Granularity::*;
    use ModifyType::*;

    let mut d = TestDoc::parse(
        "<p>Alpha <strong>beta</strong></p><hr/><div>Gamma<br/>delta line</div>",
    );

    let script = [
        (Move, Forward, Character),
        (Extend, Forward, Character),
        (Extend, Forward, Line),
        (Move, Forward, LineBoundary),
        (Move, Forward, Character),
        (Move, Forward, Character),
        (Move, Forward, Line),
        (Extend, Backward, Character),
        (Move, Backward, DocumentBoundary),
        (Move, Forward, Line),
        (Extend, Forward, DocumentBoundary),
        (Move, Backward, Character),
        (Move, Backward, Line),
        (Move, Backward, LineBoundary),
        (Extend, Backward, Line),
        (Move, Backward, Character),
    ];
    for (i, &(ty, dir, gran)) in script.iter().enumerate() {
        d.modify(ty, dir, gran);
        let selection = d.doc.selection().expect("selection survives");
        assert!(
            d.doc.is_valid_position(selection.anchor),
            "invalid anchor after step {i}: {selection:?}"
        );
        assert!(
            d.doc.is_valid_position(selection.focus),
            "invalid focus after step {i}: {selection:?}"
        );
        // Atomic offsets stay in {0, 1} by construction of validity, and a
        // character move never rests on a br.
        if gran == Character {
            assert!(!d.doc.nodes[selection.focus.node_id].is_br());
        }
    }
}

#[test]
fn rects_for_an_atomic_position_respect_min_caret_height() {
    let d = TestDoc::parse("<span>Hello</span><hr/><span>World</span>");
    let hr = d.tag("hr");

    let rects = d.doc.rects_for_position(&d.layout, Position::new(hr, 0));
    assert_eq!(rects.len(), 1);
    let rect = rects[0];
    assert_eq!(rect.width(), 0.0);
    assert_eq!(rect.height(), d.doc.config().min_caret_height);

    // Offset 1 sits at the trailing edge
    let end_rects = d.doc.rects_for_position(&d.layout, Position::new(hr, 1));
    assert!(end_rects[0].x0 > rect.x0);
}

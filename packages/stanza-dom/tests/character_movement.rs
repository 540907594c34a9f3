//! Character-unit movement across text runs, inline marks, atomic
//! components, and block boundaries.

mod common;

use common::TestDoc;
use stanza_dom::{Direction, Granularity, ModifyType};

fn move_char(doc: &mut TestDoc, direction: Direction) -> bool {
    doc.modify(ModifyType::Move, direction, Granularity::Character)
}

#[test]
fn step_inside_a_text_leaf() {
    let mut d = TestDoc::parse("<span>Hello</span>");
    let hello = d.text("Hello");
    d.caret(hello, 0);
    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(hello, 1);
}

#[test]
fn stays_at_document_end() {
    let mut d = TestDoc::parse("<span>Hello</span>");
    let hello = d.text("Hello");
    d.caret(hello, 5);
    assert!(!move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(hello, 5);
}

#[test]
fn stays_at_document_start() {
    let mut d = TestDoc::parse("<span>Hello</span>");
    let hello = d.text("Hello");
    d.caret(hello, 0);
    assert!(!move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(hello, 0);
}

#[test]
fn entering_a_styled_run_lands_inside_it() {
    let mut d = TestDoc::parse("<p>Hello <strong>World</strong></p>");
    let hello = d.text("Hello ");
    let world = d.text("World");

    // The boundary itself canonicalizes into the styled run
    d.caret(hello, 6);
    d.assert_focus(world, 0);

    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(world, 1);
}

#[test]
fn mark_to_mark_boundary_stays_on_the_left_run() {
    let mut d = TestDoc::parse("<p><strong>First</strong><em>Second</em></p>");
    let first = d.text("First");
    let second = d.text("Second");

    d.caret(first, 5);
    d.assert_focus(first, 5);

    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(second, 1);
}

#[test]
fn crossing_an_atomic_takes_two_stops() {
    let mut d =
        TestDoc::parse("<span>Hello</span><hr class=\"atomic-component\"/><span>World</span>");
    let hello = d.text("Hello");
    let world = d.text("World");
    let hr = d.tag("hr");

    d.caret(hello, 5);
    d.assert_focus(hello, 5);

    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(hr, 0);

    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(hr, 1);

    // Exiting the atomic enters the next leaf at its start
    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(world, 0);
}

#[test]
fn crossing_an_atomic_backward_is_symmetric() {
    let mut d =
        TestDoc::parse("<span>Hello</span><hr class=\"atomic-component\"/><span>World</span>");
    let hello = d.text("Hello");
    let world = d.text("World");
    let hr = d.tag("hr");

    d.caret(world, 0);
    assert!(move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(hr, 1);

    assert!(move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(hr, 0);

    assert!(move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(hello, 5);
}

#[test]
fn backward_from_block_start_lands_at_previous_block_end() {
    let mut d = TestDoc::parse("<p>First</p><p>Second</p>");
    let first = d.text("First");
    let second = d.text("Second");

    d.caret(second, 0);
    assert!(move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(first, 5);
}

#[test]
fn forward_from_block_end_lands_at_next_block_start() {
    let mut d = TestDoc::parse("<p>First</p><p>Second</p>");
    let first = d.text("First");
    let second = d.text("Second");

    d.caret(first, 5);
    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(second, 0);
}

#[test]
fn br_is_transparent_to_character_movement() {
    let mut d = TestDoc::parse("<span>Line1<br/>Line2</span>");
    let line1 = d.text("Line1");
    let line2 = d.text("Line2");

    d.caret(line1, 5);
    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(line2, 0);

    assert!(move_char(&mut d, Direction::Backward));
    d.assert_collapsed_at(line1, 5);
}

#[test]
fn focus_never_rests_on_a_br() {
    let mut d = TestDoc::parse("<span>A<br/><br/>B</span>");
    let a = d.text("A");
    let b = d.text("B");

    d.caret(a, 0);
    for _ in 0..8 {
        if !move_char(&mut d, Direction::Forward) {
            break;
        }
        assert!(
            !d.doc.nodes[d.focus().node_id].is_br(),
            "focus rested on a br"
        );
    }
    d.assert_focus(b, 1);

    for _ in 0..8 {
        if !move_char(&mut d, Direction::Backward) {
            break;
        }
        assert!(
            !d.doc.nodes[d.focus().node_id].is_br(),
            "focus rested on a br"
        );
    }
    d.assert_focus(a, 0);
}

#[test]
fn adjacent_atomics_are_each_visited() {
    let mut d = TestDoc::parse("<span>A</span><hr/><hr/><span>B</span>");
    let a = d.text("A");
    let b = d.text("B");
    let leaves = d.leaves();
    let (hr1, hr2) = (leaves[1], leaves[2]);

    d.caret(a, 1);
    let mut stops = Vec::new();
    while move_char(&mut d, Direction::Forward) {
        stops.push((d.focus().node_id, d.focus().offset));
    }
    assert_eq!(
        stops,
        vec![(hr1, 0), (hr1, 1), (hr2, 0), (hr2, 1), (b, 0), (b, 1)]
    );
}

#[test]
fn inline_atomic_component_is_a_single_character() {
    let mut d = TestDoc::parse("<p>Hi <span class=\"atomic-component\">@bob</span> there</p>");
    let hi = d.text("Hi ");
    let there = d.text(" there");
    let chip = d.leaves()[1];

    // The boundary before the chip canonicalizes onto it
    d.caret(hi, 3);
    d.assert_focus(chip, 0);

    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(chip, 1);
    assert!(move_char(&mut d, Direction::Forward));
    d.assert_collapsed_at(there, 0);

    // The chip's contents are never addressed
    let atbob = d.text("@bob");
    assert!(!d.leaves().contains(&atbob));
}

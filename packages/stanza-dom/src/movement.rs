use kurbo::Rect;
use stanza_traits::{Direction, LayoutProvider};

use crate::rects::RectWalker;
use crate::traversal::LeafWalker;
use crate::{Document, Position};

/// The unit of a directional movement.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Granularity {
    Character,
    Line,
    LineBoundary,
    DocumentBoundary,
}

/// Computes the position the focus would move to, or `None` when no movement
/// is possible (already at a boundary for that unit, or layout gave us
/// nothing to work with). The second element of the result is the goal-x to
/// retain: set only by line movement.
pub fn next_position<L: LayoutProvider>(
    doc: &Document,
    layout: &L,
    from: Position,
    granularity: Granularity,
    direction: Direction,
    goal_x: Option<f64>,
) -> Option<(Position, Option<f64>)> {
    if !doc.is_valid_position(from) {
        tracing::warn!(node_id = from.node_id, "movement from an invalid position");
        return None;
    }
    match granularity {
        Granularity::Character => character(doc, from, direction).map(|pos| (pos, None)),
        Granularity::Line => line(doc, layout, from, direction, goal_x),
        Granularity::LineBoundary => {
            line_boundary(doc, layout, from, direction).map(|pos| (pos, None))
        }
        Granularity::DocumentBoundary => {
            document_boundary(doc, from, direction).map(|pos| (pos, None))
        }
    }
}

/// One caret stop left or right. `br` leaves are transparent: any step that
/// would rest on one keeps going in the same direction.
fn character(doc: &Document, from: Position, direction: Direction) -> Option<Position> {
    let mut pos = character_step(doc, from, direction)?;
    // Bounded by the number of leaves; each step strictly progresses.
    while doc.nodes[pos.node_id].is_br() {
        pos = character_step(doc, pos, direction)?;
    }
    Some(pos)
}

fn character_step(doc: &Document, from: Position, direction: Direction) -> Option<Position> {
    let node = &doc.nodes[from.node_id];
    if node.is_atomic() {
        return match direction {
            Direction::Forward if from.offset == 0 => Some(Position::new(from.node_id, 1)),
            Direction::Backward if from.offset == 1 => Some(Position::new(from.node_id, 0)),
            _ => cross_atomic(doc, from.node_id, direction),
        };
    }
    let delta = match direction {
        Direction::Forward => 1,
        Direction::Backward => -1,
    };
    let stepped = doc.normalize(from.node_id, from.offset as isize + delta)?;
    // At a document boundary normalization clamps back onto the input;
    // report that as "no movement".
    (stepped != from).then_some(stepped)
}

/// The position just past an atomic, entering the neighbor leaf at its near
/// edge. Bypasses end-of-leaf canonicalization: canonicalizing the landing
/// back onto the atomic would make the step a fixpoint.
fn cross_atomic(doc: &Document, atomic_id: usize, direction: Direction) -> Option<Position> {
    let root = doc.editor_root();
    let next = LeafWalker::new(doc, root, atomic_id, direction).next()?;
    let offset = match direction {
        Direction::Forward => 0,
        Direction::Backward => doc.leaf_end_offset(next),
    };
    Some(Position::new(next, offset))
}

/// Vertical movement to the nearest line, steered by the goal-x coordinate.
fn line<L: LayoutProvider>(
    doc: &Document,
    layout: &L,
    from: Position,
    direction: Direction,
    goal_x: Option<f64>,
) -> Option<(Position, Option<f64>)> {
    let goal_x = match goal_x {
        Some(x) => x,
        None => doc
            .rects_for_position(layout, from)
            .last()
            .map(|rect| rect.x0)?,
    };

    let target_line: Vec<Rect> = RectWalker::new(doc, layout, from, direction)
        .skip_while(|step| step.line_offset == 0)
        .take_while(|step| step.line_offset.abs() == 1)
        .map(|step| step.rect)
        .collect();
    if target_line.is_empty() {
        return None;
    }

    let chosen = target_line
        .iter()
        .copied()
        .min_by(|a, b| {
            horizontal_distance(*a, goal_x)
                .partial_cmp(&horizontal_distance(*b, goal_x))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("non-empty line");

    let mid_y = (chosen.y0 + chosen.y1) / 2.0;
    let pos = doc
        .position_from_point(layout, goal_x, mid_y)
        .or_else(|| doc.position_from_point(layout, chosen.center().x, mid_y))?;
    Some((pos, Some(goal_x)))
}

/// Horizontal steering distance: containment wins, otherwise distance to the
/// rect's center.
fn horizontal_distance(rect: Rect, goal_x: f64) -> f64 {
    if rect.x0 <= goal_x && goal_x <= rect.x1 {
        0.0
    } else {
        (rect.center().x - goal_x).abs()
    }
}

fn line_boundary<L: LayoutProvider>(
    doc: &Document,
    layout: &L,
    from: Position,
    direction: Direction,
) -> Option<Position> {
    let node = &doc.nodes[from.node_id];
    if node.is_atomic() {
        // Flipping the offset stays on the same line end.
        match (direction, from.offset) {
            (Direction::Forward, 0) => return Some(Position::new(from.node_id, 1)),
            (Direction::Backward, 1) => return Some(Position::new(from.node_id, 0)),
            _ => {}
        }
    }

    let last = RectWalker::new(doc, layout, from, direction)
        .take_while(|step| step.line_offset == 0)
        .last()?;
    let x = match direction {
        Direction::Forward => last.rect.x1,
        Direction::Backward => last.rect.x0,
    };
    let mid_y = (last.rect.y0 + last.rect.y1) / 2.0;
    let pos = doc.position_from_point(layout, x, mid_y)?;
    (pos != from).then_some(pos)
}

fn document_boundary(doc: &Document, from: Position, direction: Direction) -> Option<Position> {
    let root = doc.editor_root();
    let pos = match direction {
        Direction::Backward => Position::new(doc.first_addressable_leaf(root)?, 0),
        Direction::Forward => {
            let leaf = doc.last_addressable_leaf(root)?;
            Position::new(leaf, doc.leaf_end_offset(leaf))
        }
    };
    (pos != from).then_some(pos)
}

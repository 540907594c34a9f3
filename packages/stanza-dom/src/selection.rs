use stanza_traits::{Direction, LayoutProvider};

use crate::movement::{Granularity, next_position};
use crate::{Document, Position};

/// Whether `modify` moves the caret or extends the selection.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModifyType {
    Move,
    Extend,
}

/// The selection: an anchor (where it began), a focus (the active endpoint),
/// and the goal-x coordinate retained across consecutive line movements.
///
/// Selections are immutable values; every operation produces a new one and
/// the document replaces its copy wholesale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Selection {
    pub anchor: Position,
    pub focus: Position,
    pub(crate) goal_x: Option<f64>,
}

impl Selection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self {
            anchor,
            focus,
            goal_x: None,
        }
    }

    pub fn collapsed(pos: Position) -> Self {
        Self::new(pos, pos)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}

impl From<Position> for Selection {
    fn from(value: Position) -> Self {
        Self::collapsed(value)
    }
}

impl Document {
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Reset to a collapsed selection at the first addressable leaf, or no
    /// selection when the editor root has none.
    pub(crate) fn reset_selection(&mut self) {
        let root = self.editor_root();
        self.selection = self
            .first_addressable_leaf(root)
            .map(|leaf| Selection::collapsed(Position::new(leaf, 0)));
    }

    /// Replace the selection. Inputs are normalized; a missing focus
    /// collapses onto the anchor. Returns false (selection unchanged) when
    /// the anchor can't be resolved to a valid position.
    pub fn set_selection(&mut self, anchor: Position, focus: Option<Position>) -> bool {
        let Some(anchor) = self.normalize_position(anchor) else {
            tracing::warn!(node_id = anchor.node_id, "set_selection on unresolvable node");
            return false;
        };
        let focus = match focus {
            Some(focus) => match self.normalize_position(focus) {
                Some(focus) => focus,
                None => return false,
            },
            None => anchor,
        };
        self.selection = Some(Selection::new(anchor, focus));
        true
    }

    /// Collapse onto a position, discarding any anchor.
    pub fn collapse(&mut self, pos: Position) -> bool {
        let Some(pos) = self.normalize_position(pos) else {
            return false;
        };
        self.selection = Some(Selection::collapsed(pos));
        true
    }

    pub fn collapse_to_start(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let (start, _) = self.selection_bounds_of(&selection);
        self.selection = Some(Selection::collapsed(start));
        true
    }

    pub fn collapse_to_end(&mut self) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let (_, end) = self.selection_bounds_of(&selection);
        self.selection = Some(Selection::collapsed(end));
        true
    }

    /// Move the focus, keeping the anchor.
    pub fn extend(&mut self, pos: Position) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let Some(pos) = self.normalize_position(pos) else {
            return false;
        };
        self.selection = Some(Selection {
            anchor: selection.anchor,
            focus: pos,
            goal_x: None,
        });
        true
    }

    /// The selection's direction: `None` when collapsed.
    pub fn selection_direction(&self) -> Option<Direction> {
        let selection = self.selection?;
        match self.compare_positions(selection.anchor, selection.focus) {
            std::cmp::Ordering::Less => Some(Direction::Forward),
            std::cmp::Ordering::Greater => Some(Direction::Backward),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Document-order (start, end) endpoints.
    pub fn selection_bounds(&self) -> Option<(Position, Position)> {
        self.selection
            .map(|selection| self.selection_bounds_of(&selection))
    }

    pub(crate) fn selection_bounds_of(&self, selection: &Selection) -> (Position, Position) {
        match self.compare_positions(selection.anchor, selection.focus) {
            std::cmp::Ordering::Greater => (selection.focus, selection.anchor),
            _ => (selection.anchor, selection.focus),
        }
    }

    /// Whether the selection contains a position. A collapsed selection
    /// contains only its own focus.
    pub fn contains(&self, pos: Position) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let Some(pos) = self.normalize_position(pos) else {
            return false;
        };
        if selection.is_collapsed() {
            return pos == selection.focus;
        }
        let (start, end) = self.selection_bounds_of(&selection);
        self.compare_positions(start, pos) != std::cmp::Ordering::Greater
            && self.compare_positions(pos, end) != std::cmp::Ordering::Greater
    }

    /// Directional selection change: the single entry point behind the
    /// default key bindings.
    ///
    /// Computes the focus's next position for the unit; on `None` the
    /// selection is left untouched. `Move` collapses onto the new focus,
    /// `Extend` keeps the anchor. Goal-x survives exactly across consecutive
    /// line movements.
    pub fn modify<L: LayoutProvider>(
        &mut self,
        layout: &L,
        ty: ModifyType,
        direction: Direction,
        granularity: Granularity,
    ) -> bool {
        let Some(selection) = self.selection else {
            return false;
        };
        let goal_x = match granularity {
            Granularity::Line => selection.goal_x,
            _ => None,
        };
        let Some((focus, goal_x)) =
            next_position(self, layout, selection.focus, granularity, direction, goal_x)
        else {
            return false;
        };
        let new_selection = match ty {
            ModifyType::Move => Selection {
                anchor: focus,
                focus,
                goal_x,
            },
            ModifyType::Extend => Selection {
                anchor: selection.anchor,
                focus,
                goal_x,
            },
        };
        self.selection = Some(new_selection);
        true
    }
}

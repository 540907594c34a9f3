use keyboard_types::{Key, Modifiers};
use stanza_traits::{Direction, LayoutProvider};
use stanza_traits::events::StanzaKeyEvent;

use crate::movement::Granularity;
use crate::selection::ModifyType;
use crate::Document;

/// Apply the default navigation key bindings. Returns whether the event was
/// consumed.
pub fn apply_keypress_event<L: LayoutProvider>(
    doc: &mut Document,
    layout: &L,
    event: &StanzaKeyEvent,
) -> bool {
    // Do nothing if it is a keyup event
    if !event.state.is_pressed() {
        return false;
    }

    let mods = event.modifiers;
    let shift = mods.contains(Modifiers::SHIFT);
    let action_mod = {
        if cfg!(target_os = "macos") {
            mods.contains(Modifiers::META)
        } else {
            mods.contains(Modifiers::CONTROL)
        }
    };
    let ty = if shift {
        ModifyType::Extend
    } else {
        ModifyType::Move
    };

    match &event.key {
        Key::Character(c) if action_mod && c.eq_ignore_ascii_case("a") => {
            select_all(doc);
            true
        }
        Key::ArrowLeft | Key::ArrowRight => {
            let direction = if event.key == Key::ArrowRight {
                Direction::Forward
            } else {
                Direction::Backward
            };
            if action_mod {
                // Mod+Left / Mod+Right act as Home / End
                doc.modify(layout, ty, direction, Granularity::LineBoundary);
                return true;
            }
            // A plain arrow on a non-collapsed selection collapses to the
            // matching edge instead of moving the caret.
            let collapsed = doc.selection().is_some_and(|s| s.is_collapsed());
            if !shift && !collapsed {
                match direction {
                    Direction::Forward => doc.collapse_to_end(),
                    Direction::Backward => doc.collapse_to_start(),
                };
                return true;
            }
            doc.modify(layout, ty, direction, Granularity::Character);
            true
        }
        Key::ArrowUp | Key::ArrowDown => {
            let direction = if event.key == Key::ArrowDown {
                Direction::Forward
            } else {
                Direction::Backward
            };
            // Mod+Up / Mod+Down jump to the document boundaries
            let granularity = if action_mod {
                Granularity::DocumentBoundary
            } else {
                Granularity::Line
            };
            doc.modify(layout, ty, direction, granularity);
            true
        }
        Key::Home => {
            doc.modify(layout, ty, Direction::Backward, Granularity::LineBoundary);
            true
        }
        Key::End => {
            doc.modify(layout, ty, Direction::Forward, Granularity::LineBoundary);
            true
        }
        _ => false,
    }
}

/// Document-boundary selection from both ends.
fn select_all(doc: &mut Document) {
    let root = doc.editor_root();
    let (Some(first), Some(last)) = (
        doc.first_addressable_leaf(root),
        doc.last_addressable_leaf(root),
    ) else {
        return;
    };
    let end_offset = doc.leaf_end_offset(last);
    doc.set_selection(
        crate::Position::new(first, 0),
        Some(crate::Position::new(last, end_offset)),
    );
}

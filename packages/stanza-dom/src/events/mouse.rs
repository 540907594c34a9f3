use keyboard_types::Modifiers;
use stanza_traits::LayoutProvider;
use stanza_traits::events::StanzaMouseEvent;

use crate::Document;

/// A press collapses the selection at the hit position; shift-press extends
/// the existing selection to it instead. Returns whether the point resolved
/// to a position.
pub fn handle_mouse_down<L: LayoutProvider>(
    doc: &mut Document,
    layout: &L,
    event: &StanzaMouseEvent,
) -> bool {
    let Some(pos) = doc.position_from_point(layout, event.x, event.y) else {
        return false;
    };
    if event.mods.contains(Modifiers::SHIFT) && doc.selection().is_some() {
        doc.extend(pos)
    } else {
        doc.collapse(pos)
    }
}

/// Dragging with the button held extends the selection to the pointer.
pub fn handle_mouse_drag<L: LayoutProvider>(
    doc: &mut Document,
    layout: &L,
    event: &StanzaMouseEvent,
) -> bool {
    let Some(pos) = doc.position_from_point(layout, event.x, event.y) else {
        return false;
    };
    doc.extend(pos)
}

//! Default key and mouse bindings for the selection core.
//!
//! These are a convenience for hosts, not part of the core contract: the
//! host owns its event loop and may bind keys differently. Everything here
//! is expressible through the public selection operations.

mod keyboard;
mod mouse;

pub use keyboard::apply_keypress_event;
pub use mouse::{handle_mouse_down, handle_mouse_drag};

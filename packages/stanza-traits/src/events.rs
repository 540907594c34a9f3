use keyboard_types::{Code, Key, Location, Modifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyState {
    Pressed,
    Released,
}

impl KeyState {
    pub fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// A keyboard event as delivered by the host shell.
#[derive(Clone, Debug)]
pub struct StanzaKeyEvent {
    pub key: Key,
    pub code: Code,
    pub modifiers: Modifiers,
    pub location: Location,
    pub is_auto_repeating: bool,
    pub state: KeyState,
}

/// A mouse button event as delivered by the host shell, in viewport
/// coordinates.
#[derive(Clone, Debug)]
pub struct StanzaMouseEvent {
    pub x: f64,
    pub y: f64,
    pub mods: Modifiers,
}

//! Shared types and host-facing traits for the stanza selection core.
//!
//! The core crate (`stanza-dom`) owns the document tree and the selection
//! state, but it never computes layout. Everything it needs from the host
//! layout engine goes through [`LayoutProvider`], defined here so that hosts
//! can implement it without depending on the core.

pub mod events;

mod layout;
pub use layout::{CaretHit, LayoutProvider};

/// The direction of a walk or a movement operation, in document order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn is_forward(self) -> bool {
        matches!(self, Self::Forward)
    }

    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

//! stanza-dom
//!
//! The caret, selection, and intra-document navigation core of a rich-text
//! editor that does not use the platform's built-in editable region. The
//! crate owns a small arena-backed document tree and a selection over it;
//! the host owns layout and rendering and talks to the core through the
//! [`LayoutProvider`](stanza_traits::LayoutProvider) seam.
//!
//! Everything is synchronous and single-threaded. Operations are total:
//! out-of-range input positions are normalized, impossible movements return
//! `None`/`false` and leave the selection untouched.

/// The document tree.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

mod config;
mod debug;
/// Default key/mouse bindings over the selection operations.
pub mod events;
mod hit;
/// The movement engine behind `modify`.
mod movement;
mod mutator;
mod normalize;
mod position;
mod range;
mod rects;
mod selection;
mod traversal;

pub use config::DocumentConfig;
pub use document::Document;
pub use movement::Granularity;
pub use mutator::{AppendTextErr, DocumentMutator};
pub use node::{Attribute, DisplayOuter, ElementData, Node, NodeData, TextNodeData};
pub use position::Position;
pub use range::NodeRange;
pub use rects::{RectStep, RectWalker};
pub use selection::{ModifyType, Selection};
pub use stanza_traits::{CaretHit, Direction, LayoutProvider};
pub use traversal::{AncestorTraverser, LeafWalker, TreeTraverser};

pub use markup5ever::{
    LocalName, Namespace, Prefix, QualName, local_name, namespace_prefix, namespace_url, ns,
};

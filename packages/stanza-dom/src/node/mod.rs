mod attributes;
mod element;
#[allow(clippy::module_inception)]
mod node;

pub use attributes::Attribute;
pub use element::ElementData;
pub use node::{DisplayOuter, Node, NodeData, NodeFlags, NodeKind, TextNodeData};

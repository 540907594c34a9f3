use bitflags::bitflags;
use markup5ever::LocalName;
use std::fmt::Write;

use super::attributes::Attribute;
use super::element::ElementData;

/// Outer display mode of an element, as far as the selection core cares:
/// does it establish a block or participate in inline flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayOuter {
    Block,
    Inline,
    None,
}

bitflags! {
    #[derive(Clone, Copy, PartialEq)]
    pub struct NodeFlags: u32 {
        /// Whether the node is attached under the document node (reachable
        /// from the arena root). Detached nodes have no computed style.
        const IS_IN_DOCUMENT = 0b00000001;
    }
}

impl NodeFlags {
    #[inline(always)]
    pub fn is_in_document(&self) -> bool {
        self.contains(Self::IS_IN_DOCUMENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
}

/// The different kinds of nodes in the tree.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The document itself - the root node of the arena.
    Document,

    /// An element with attributes.
    Element(ElementData),

    /// A text node.
    Text(TextNodeData),

    /// A comment.
    Comment,
}

impl NodeData {
    pub fn downcast_element(&self) -> Option<&ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn downcast_element_mut(&mut self) -> Option<&mut ElementData> {
        match self {
            Self::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment => NodeKind::Comment,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextNodeData {
    /// The textual content of the text node
    pub content: String,
}

impl TextNodeData {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}

pub struct Node {
    /// Our Id
    pub id: usize,
    /// Our parent's ID
    pub parent: Option<usize>,
    /// What are our children?
    pub children: Vec<usize>,

    // Flags
    pub flags: NodeFlags,

    /// Node type (Element, Text, etc) specific data
    pub data: NodeData,

    /// The display mode the node was constructed with (UA tag default unless
    /// overridden through the mutator). Only meaningful for elements.
    pub display: DisplayOuter,
}

impl Node {
    pub(crate) fn new(id: usize, data: NodeData) -> Self {
        let display = match &data {
            NodeData::Element(el) => el.default_display(),
            _ => DisplayOuter::Inline,
        };
        Self {
            id,
            parent: None,
            children: vec![],
            flags: NodeFlags::empty(),
            data,
            display,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element { .. })
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text { .. })
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.data, NodeData::Comment)
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        self.data.downcast_element()
    }

    pub fn element_data_mut(&mut self) -> Option<&mut ElementData> {
        self.data.downcast_element_mut()
    }

    pub fn text_data(&self) -> Option<&TextNodeData> {
        match self.data {
            NodeData::Text(ref data) => Some(data),
            _ => None,
        }
    }

    pub fn text_data_mut(&mut self) -> Option<&mut TextNodeData> {
        match self.data {
            NodeData::Text(ref mut data) => Some(data),
            _ => None,
        }
    }

    pub fn attrs(&self) -> Option<&[Attribute]> {
        Some(self.element_data()?.attrs())
    }

    pub fn attr(&self, name: LocalName) -> Option<&str> {
        self.element_data()?.attr(name)
    }

    /// Length of the node's text in codepoints. Zero for non-text nodes.
    pub fn text_len(&self) -> usize {
        self.text_data()
            .map(|data| data.content.chars().count())
            .unwrap_or(0)
    }

    /// An atomic leaf: an opaque element addressed only at its edges.
    pub fn is_atomic(&self) -> bool {
        self.element_data().is_some_and(|el| el.is_atomic())
    }

    pub fn is_br(&self) -> bool {
        self.element_data().is_some_and(|el| el.is_br())
    }

    /// The node's computed display, or `None` when the node is detached
    /// (detached nodes have no computed style and classify as inline).
    pub fn computed_display(&self) -> Option<DisplayOuter> {
        if self.flags.is_in_document() {
            Some(self.display)
        } else {
            None
        }
    }

    /// Block classification consults computed style; unstyled nodes are
    /// treated as inline.
    pub fn is_block(&self) -> bool {
        self.is_element() && self.computed_display() == Some(DisplayOuter::Block)
    }

    pub fn is_inline(&self) -> bool {
        self.is_element() && !self.is_block()
    }

    /// Addressable leaves are what caret positions may refer to: non-empty
    /// text leaves and atomic leaves.
    pub fn is_addressable_leaf(&self) -> bool {
        match &self.data {
            NodeData::Text(data) => !data.content.is_empty(),
            NodeData::Element(el) => el.is_atomic(),
            _ => false,
        }
    }

    pub fn node_debug_str(&self) -> String {
        let mut s = String::new();

        match &self.data {
            NodeData::Document => write!(s, "DOCUMENT"),
            NodeData::Comment => write!(s, "COMMENT"),
            NodeData::Text(data) => {
                let text: String = data.content.chars().take(10).collect();
                write!(s, "TEXT {text:?}")
            }
            NodeData::Element(data) => {
                let name = &data.name;
                let class = data.attr(markup5ever::local_name!("class")).unwrap_or("");
                if !class.is_empty() {
                    write!(s, "<{} class=\"{}\"> ({:?})", name.local, class, self.display)
                } else {
                    write!(s, "<{}> ({:?})", name.local, self.display)
                }
            }
        }
        .unwrap();
        s
    }
}

/// Node identity is arena identity.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("display", &self.display)
            .field("data", &self.data)
            .finish()
    }
}

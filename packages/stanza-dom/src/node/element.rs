use markup5ever::{LocalName, QualName, local_name};

use super::attributes::{Attribute, find_attr};
use super::node::DisplayOuter;

macro_rules! local_names {
    ($($name:tt),+) => {
        [$(local_name!($name),)+]
    };
}

/// Tags that are always atomic leaves, independent of class and display.
fn is_atomic_tag(tag: &LocalName) -> bool {
    local_names!("br", "hr", "img", "table").contains(tag)
}

/// The class token that marks an arbitrary element as an atomic component.
const ATOMIC_CLASS: &str = "atomic-component";

/// An element node's data: tag name and attributes.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// The element's tag name, namespace and prefix
    pub name: QualName,

    /// The element's id attribute (if it has one)
    pub id: Option<String>,

    /// The element's attributes
    pub attrs: Vec<Attribute>,
}

impl ElementData {
    pub fn new(name: QualName, attrs: Vec<Attribute>) -> Self {
        let id = find_attr(&attrs, &local_name!("id")).map(|v| v.to_string());
        Self { name, id, attrs }
    }

    pub fn attrs(&self) -> &[Attribute] {
        &self.attrs
    }

    pub fn attr(&self, name: LocalName) -> Option<&str> {
        find_attr(&self.attrs, &name)
    }

    pub fn has_attr(&self, name: LocalName) -> bool {
        self.attr(name).is_some()
    }

    /// Whether the `class` attribute contains the given token.
    pub fn has_class_token(&self, token: &str) -> bool {
        self.attr(local_name!("class"))
            .map(|class| class.split_ascii_whitespace().any(|t| t == token))
            .unwrap_or(false)
    }

    /// An element is atomic iff its tag is in the atomic tag set or it
    /// carries the `atomic-component` class token.
    pub fn is_atomic(&self) -> bool {
        is_atomic_tag(&self.name.local) || self.has_class_token(ATOMIC_CLASS)
    }

    pub fn is_br(&self) -> bool {
        self.name.local == local_name!("br")
    }

    /// UA-default display for the element's tag. Overridable through the
    /// document mutator.
    pub fn default_display(&self) -> DisplayOuter {
        let block_tags = local_names!(
            "html",
            "body",
            "address",
            "article",
            "aside",
            "blockquote",
            "div",
            "dl",
            "dd",
            "dt",
            "fieldset",
            "figure",
            "figcaption",
            "footer",
            "form",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "header",
            "hr",
            "li",
            "main",
            "nav",
            "ol",
            "p",
            "pre",
            "section",
            "table",
            "ul"
        );
        if block_tags.contains(&self.name.local) {
            DisplayOuter::Block
        } else {
            DisplayOuter::Inline
        }
    }
}

use std::collections::HashMap;

use slab::Slab;

use crate::config::DocumentConfig;
use crate::node::{Node, NodeData, NodeFlags, TextNodeData};
use crate::selection::Selection;

/// The document tree the selection core operates on.
///
/// Nodes live in a slab arena and are addressed by their slab key. Ids are
/// stable for the lifetime of the document, which is what makes them usable
/// as the leaf identity inside caret positions.
pub struct Document {
    /// The node arena
    pub nodes: Box<Slab<Node>>,

    /// Nodes with an `id` attribute, by attribute value
    pub nodes_to_id: HashMap<String, usize>,

    /// The subtree the selection operates within (set by [`Self::attach`])
    pub(crate) editor_root: Option<usize>,

    /// The current selection, if the document has one
    pub(crate) selection: Option<Selection>,

    pub(crate) config: DocumentConfig,
}

impl Document {
    pub fn new(config: DocumentConfig) -> Self {
        let mut nodes = Box::new(Slab::new());
        let entry = nodes.vacant_entry();
        let id = entry.key();
        let mut document_node = Node::new(id, NodeData::Document);
        document_node.flags.insert(NodeFlags::IS_IN_DOCUMENT);
        entry.insert(document_node);

        Self {
            nodes,
            nodes_to_id: HashMap::new(),
            editor_root: None,
            selection: None,
            config,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn get_node(&self, node_id: usize) -> Option<&Node> {
        self.nodes.get(node_id)
    }

    pub fn get_node_mut(&mut self, node_id: usize) -> Option<&mut Node> {
        self.nodes.get_mut(node_id)
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[0]
    }

    /// The editor root set by [`Self::attach`], or the document node.
    pub fn editor_root(&self) -> usize {
        self.editor_root.unwrap_or(0)
    }

    /// Install the selection core on a subtree: run the one-shot whitespace
    /// normalization pass and initialize a collapsed selection at the first
    /// addressable leaf (no selection when the subtree has none).
    pub fn attach(&mut self, root_id: usize) {
        debug_assert!(self.nodes.contains(root_id));
        self.editor_root = Some(root_id);
        self.normalize_whitespace(root_id);
        self.reset_selection();
    }

    /// Drop the selection and the editor root. The tree itself is untouched.
    pub fn detach(&mut self) {
        self.editor_root = None;
        self.selection = None;
    }

    // ------------------------------------------------------------------------
    // Tree construction and mutation primitives
    // ------------------------------------------------------------------------

    pub fn create_node(&mut self, node_data: NodeData) -> usize {
        let entry = self.nodes.vacant_entry();
        let id = entry.key();
        entry.insert(Node::new(id, node_data));
        id
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        let data = NodeData::Text(TextNodeData::new(text.to_string()));
        self.create_node(data)
    }

    pub fn deep_clone_node(&mut self, node_id: usize) -> usize {
        let node = &self.nodes[node_id];
        let data = node.data.clone();
        let display = node.display;
        let children = node.children.clone();

        let new_node_id = self.create_node(data);
        self.nodes[new_node_id].display = display;

        let new_children: Vec<usize> = children
            .into_iter()
            .map(|child_id| self.deep_clone_node(child_id))
            .collect();
        for &child_id in &new_children {
            self.nodes[child_id].parent = Some(new_node_id);
        }
        self.nodes[new_node_id].children = new_children;

        new_node_id
    }

    /// Insert nodes into the tree before `node_id`, as siblings. The
    /// inserted nodes are detached from any previous parent first.
    pub fn insert_before(&mut self, node_id: usize, inserted_node_ids: &[usize]) {
        for &child_id in inserted_node_ids {
            self.remove_node(child_id);
        }
        let parent_id = match self.nodes[node_id].parent {
            Some(id) => id,
            None => return,
        };
        let node_child_idx = match self.child_index(node_id) {
            Some(idx) => idx,
            None => return,
        };

        let mut children = std::mem::take(&mut self.nodes[parent_id].children);
        children.splice(
            node_child_idx..node_child_idx,
            inserted_node_ids.iter().copied(),
        );
        self.nodes[parent_id].children = children;

        let in_document = self.nodes[parent_id].flags.is_in_document();
        for &child_id in inserted_node_ids {
            self.nodes[child_id].parent = Some(parent_id);
            self.set_in_document(child_id, in_document);
        }
    }

    /// Append nodes at the end of `parent_id`'s child list, detaching them
    /// from any previous parent.
    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        let in_document = self.nodes[parent_id].flags.is_in_document();
        for &child_id in child_ids {
            self.remove_node(child_id);
            self.nodes[parent_id].children.push(child_id);
            self.nodes[child_id].parent = Some(parent_id);
            self.set_in_document(child_id, in_document);
        }
    }

    /// Remove the node from its parent but don't drop it.
    pub fn remove_node(&mut self, node_id: usize) {
        let node = &mut self.nodes[node_id];
        if let Some(parent_id) = node.parent.take() {
            let parent = &mut self.nodes[parent_id];
            parent.children.retain(|id| *id != node_id);
        }
        self.set_in_document(node_id, false);
    }

    /// Remove the node from its parent and drop it and its whole subtree
    /// from the arena.
    pub fn remove_and_drop_node(&mut self, node_id: usize) -> Option<Node> {
        fn remove_node_ignoring_parent(doc: &mut Document, node_id: usize) -> Option<Node> {
            let node = doc.nodes.try_remove(node_id);
            if let Some(node) = &node {
                if let Some(el) = node.element_data() {
                    if let Some(id_attr) = &el.id {
                        doc.nodes_to_id.remove(id_attr);
                    }
                }
                for &child in &node.children {
                    remove_node_ignoring_parent(doc, child);
                }
            }
            node
        }

        let node = remove_node_ignoring_parent(self, node_id);

        if let Some(parent_id) = node.as_ref().and_then(|node| node.parent) {
            let parent = &mut self.nodes[parent_id];
            parent.children.retain(|id| *id != node_id);
        }

        node
    }

    /// Propagate the in-document flag through a subtree.
    pub(crate) fn set_in_document(&mut self, node_id: usize, in_document: bool) {
        let mut stack = vec![node_id];
        while let Some(id) = stack.pop() {
            let node = &mut self.nodes[id];
            node.flags.set(NodeFlags::IS_IN_DOCUMENT, in_document);
            stack.extend(node.children.iter().copied());
        }
    }

    // ------------------------------------------------------------------------
    // Structure queries
    // ------------------------------------------------------------------------

    /// The index of the node in its parent's child list.
    pub fn child_index(&self, node_id: usize) -> Option<usize> {
        let parent_id = self.nodes.get(node_id)?.parent?;
        self.nodes[parent_id]
            .children
            .iter()
            .position(|id| *id == node_id)
    }

    pub fn previous_sibling(&self, node_id: usize) -> Option<usize> {
        let parent_id = self.nodes.get(node_id)?.parent?;
        let idx = self.child_index(node_id)?;
        if idx == 0 {
            return None;
        }
        self.nodes[parent_id].children.get(idx - 1).copied()
    }

    pub fn next_sibling(&self, node_id: usize) -> Option<usize> {
        let parent_id = self.nodes.get(node_id)?.parent?;
        let idx = self.child_index(node_id)?;
        self.nodes[parent_id].children.get(idx + 1).copied()
    }

    /// Whether `node_id` lies inside the editor root's subtree (the editor
    /// root itself counts).
    pub fn is_in_editor_root(&self, node_id: usize) -> bool {
        let root = self.editor_root();
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == root {
                return true;
            }
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        false
    }

    /// Invalidate the selection after external mutation: any retained
    /// position whose leaf vanished or left the editor root resets the
    /// selection to the document start.
    pub(crate) fn validate_selection(&mut self) {
        let Some(selection) = self.selection else {
            return;
        };
        let endpoint_ok = |node_id: usize| {
            self.nodes
                .get(node_id)
                .is_some_and(|node| node.is_addressable_leaf())
                && self.is_in_editor_root(node_id)
        };
        if !endpoint_ok(selection.anchor.node_id) || !endpoint_ok(selection.focus.node_id) {
            tracing::debug!("selection endpoints invalidated by mutation; resetting");
            self.reset_selection();
        }
    }
}

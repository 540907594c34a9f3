use markup5ever::{QualName, local_name};

use crate::node::{DisplayOuter, ElementData};
use crate::{Attribute, Document, NodeData};

#[derive(Debug, Clone)]
pub enum AppendTextErr {
    /// The node is not a text node
    NotTextNode,
}

/// A facade over [`Document`] for building and amending the tree.
///
/// External mutation invalidates retained caret positions: when the mutator
/// is dropped it re-validates the document's selection, resetting it if an
/// endpoint's leaf vanished or left the editor root.
pub struct DocumentMutator<'doc> {
    /// Document is public as an escape hatch, but users of this API should
    /// ideally avoid using it and prefer exposing additional functionality
    /// in DocumentMutator.
    pub doc: &'doc mut Document,
}

impl Drop for DocumentMutator<'_> {
    fn drop(&mut self) {
        self.flush();
    }
}

impl Document {
    pub fn mutate(&mut self) -> DocumentMutator<'_> {
        DocumentMutator::new(self)
    }
}

impl DocumentMutator<'_> {
    pub fn new(doc: &mut Document) -> DocumentMutator<'_> {
        DocumentMutator { doc }
    }

    pub fn node_has_parent(&self, node_id: usize) -> bool {
        self.doc.nodes[node_id].parent.is_some()
    }

    pub fn previous_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.previous_sibling(node_id)
    }

    pub fn next_sibling_id(&self, node_id: usize) -> Option<usize> {
        self.doc.next_sibling(node_id)
    }

    pub fn last_child_id(&self, node_id: usize) -> Option<usize> {
        self.doc.nodes[node_id].children.last().copied()
    }

    pub fn child_ids(&self, node_id: usize) -> Vec<usize> {
        self.doc.nodes[node_id].children.clone()
    }

    pub fn element_name(&self, node_id: usize) -> Option<&QualName> {
        self.doc.nodes[node_id].element_data().map(|el| &el.name)
    }

    pub fn create_comment_node(&mut self) -> usize {
        self.doc.create_node(NodeData::Comment)
    }

    pub fn create_text_node(&mut self, text: &str) -> usize {
        self.doc.create_text_node(text)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> usize {
        let data = ElementData::new(name, attrs);
        let id = self.doc.create_node(NodeData::Element(data));

        // If the node has an "id" attribute, store it in the ID map.
        let node = &self.doc.nodes[id];
        if let Some(id_attr) = node.attr(local_name!("id")) {
            let id_attr = id_attr.to_string();
            self.doc.nodes_to_id.insert(id_attr, id);
        }

        id
    }

    /// Override the display mode an element was constructed with (the UA tag
    /// default). This is how hosts feed computed style into classification.
    pub fn set_display(&mut self, node_id: usize, display: DisplayOuter) {
        self.doc.nodes[node_id].display = display;
    }

    /// Remove all of the children from old_parent_id and append them to
    /// new_parent_id.
    pub fn reparent_children(&mut self, old_parent_id: usize, new_parent_id: usize) {
        let child_ids = self.doc.nodes[old_parent_id].children.clone();
        self.append_children(new_parent_id, &child_ids);
    }

    pub fn append_children(&mut self, parent_id: usize, child_ids: &[usize]) {
        self.doc.append_children(parent_id, child_ids);
    }

    pub fn insert_nodes_before(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        self.doc.insert_before(anchor_node_id, new_node_ids);
    }

    pub fn insert_nodes_after(&mut self, anchor_node_id: usize, new_node_ids: &[usize]) {
        match self.doc.next_sibling(anchor_node_id) {
            Some(sibling_id) => self.doc.insert_before(sibling_id, new_node_ids),
            None => {
                if let Some(parent_id) = self.doc.nodes[anchor_node_id].parent {
                    self.doc.append_children(parent_id, new_node_ids);
                }
            }
        }
    }

    pub fn remove_node(&mut self, node_id: usize) {
        self.doc.remove_node(node_id);
    }

    pub fn remove_node_if_unparented(&mut self, node_id: usize) {
        if let Some(node) = self.doc.get_node(node_id) {
            if node.parent.is_none() {
                self.doc.remove_and_drop_node(node_id);
            }
        }
    }

    pub fn append_text_to_node(&mut self, node_id: usize, text: &str) -> Result<(), AppendTextErr> {
        match self.doc.nodes[node_id].text_data_mut() {
            Some(data) => {
                data.content += text;
                Ok(())
            }
            None => Err(AppendTextErr::NotTextNode),
        }
    }

    pub fn set_node_text(&mut self, node_id: usize, value: &str) {
        if let Some(text) = self.doc.nodes[node_id].text_data_mut() {
            text.content.clear();
            text.content.push_str(value);
        }
    }

    pub fn deep_clone_node(&mut self, node_id: usize) -> usize {
        self.doc.deep_clone_node(node_id)
    }

    pub fn add_attrs_if_missing(&mut self, node_id: usize, attrs: Vec<Attribute>) {
        let element_data = self.doc.nodes[node_id]
            .element_data_mut()
            .expect("Not an element");

        let existing_names: Vec<QualName> = element_data
            .attrs
            .iter()
            .map(|attr| attr.name.clone())
            .collect();

        for attr in attrs
            .into_iter()
            .filter(|attr| !existing_names.contains(&attr.name))
        {
            self.set_attribute(node_id, attr.name, &attr.value);
        }
    }

    pub fn set_attribute(&mut self, node_id: usize, name: QualName, value: &str) {
        let is_id_attr = name.local == local_name!("id");
        let Some(element) = self.doc.nodes[node_id].element_data_mut() else {
            return;
        };

        let existing_attr = element.attrs.iter_mut().find(|attr| attr.name == name);
        if let Some(existing_attr) = existing_attr {
            existing_attr.value.clear();
            existing_attr.value.push_str(value);
        } else {
            element.attrs.push(Attribute {
                name: name.clone(),
                value: value.to_string(),
            });
        }

        if is_id_attr {
            element.id = Some(value.to_string());
            self.doc.nodes_to_id.insert(value.to_string(), node_id);
        }
    }

    pub fn clear_attribute(&mut self, node_id: usize, name: QualName) {
        let mut removed_id = None;
        if let Some(element) = self.doc.nodes[node_id].element_data_mut() {
            if name.local == local_name!("id") {
                removed_id = element.id.take();
            }
            element.attrs.retain(|attr| attr.name.local != name.local);
        }
        if let Some(old) = removed_id {
            self.doc.nodes_to_id.remove(&old);
        }
    }

    pub fn flush(&mut self) {
        self.doc.validate_selection();
    }
}

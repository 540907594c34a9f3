use std::cmp::Ordering;

use stanza_traits::Direction;

use crate::{Document, Node};

/// A pre-order tree traverser for a [`Document`].
#[derive(Clone)]
pub struct TreeTraverser<'a> {
    doc: &'a Document,
    stack: Vec<usize>,
}

impl<'a> TreeTraverser<'a> {
    /// Creates a new tree traverser which starts at the given node.
    pub fn new(doc: &'a Document, root: usize) -> Self {
        let mut stack = Vec::with_capacity(32);
        stack.push(root);
        TreeTraverser { doc, stack }
    }
}

impl Iterator for TreeTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.doc.get_node(id)?;
        self.stack.extend(node.children.iter().rev());
        Some(id)
    }
}

/// An ancestor traverser for a [`Document`]. Yields the parent chain,
/// starting with the node's own parent.
#[derive(Clone)]
pub struct AncestorTraverser<'a> {
    doc: &'a Document,
    current: usize,
}

impl<'a> AncestorTraverser<'a> {
    pub fn new(doc: &'a Document, node_id: usize) -> Self {
        AncestorTraverser {
            doc,
            current: node_id,
        }
    }
}

impl Iterator for AncestorTraverser<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        let current_node = self.doc.get_node(self.current)?;
        self.current = current_node.parent?;
        Some(self.current)
    }
}

/// A directional stream of addressable leaves (§ caret positions): non-empty
/// text leaves and atomic leaves, in document order or reverse document
/// order, strictly after/before the starting node.
///
/// Containers are stepped through and never yielded; atomic leaves are never
/// descended into. The walk is bounded by `root`, which itself is never
/// yielded. Single-use: instantiate one per operation.
#[derive(Clone)]
pub struct LeafWalker<'a> {
    doc: &'a Document,
    root: usize,
    current: usize,
    direction: Direction,
}

impl<'a> LeafWalker<'a> {
    pub fn new(doc: &'a Document, root: usize, start: usize, direction: Direction) -> Self {
        LeafWalker {
            doc,
            root,
            current: start,
            direction,
        }
    }
}

impl Iterator for LeafWalker<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let next = match self.direction {
                Direction::Forward => next_in_tree(self.doc, self.root, self.current)?,
                Direction::Backward => prev_in_tree(self.doc, self.root, self.current)?,
            };
            self.current = next;
            if next == self.root {
                return None;
            }
            let node = self.doc.get_node(next)?;
            if node.is_addressable_leaf() {
                return Some(next);
            }
        }
    }
}

/// The next node in pre-order, not descending into atomics, bounded by root.
fn next_in_tree(doc: &Document, root: usize, id: usize) -> Option<usize> {
    let node = doc.get_node(id)?;
    let may_descend = id == root || !(node.is_atomic() || node.is_text_node());
    if may_descend {
        if let Some(&first) = node.children.first() {
            return Some(first);
        }
    }
    let mut cur = id;
    while cur != root {
        if let Some(sibling) = doc.next_sibling(cur) {
            return Some(sibling);
        }
        cur = doc.get_node(cur)?.parent?;
    }
    None
}

/// The previous node in pre-order (i.e. the next node in reverse document
/// order), not descending into atomics, bounded by root.
fn prev_in_tree(doc: &Document, root: usize, id: usize) -> Option<usize> {
    if id == root {
        let last = deepest_last(doc, root);
        return (last != root).then_some(last);
    }
    if let Some(sibling) = doc.previous_sibling(id) {
        return Some(deepest_last(doc, sibling));
    }
    doc.get_node(id)?.parent
}

/// Descend along last children to the deepest descendant, stopping at text
/// and atomic leaves.
fn deepest_last(doc: &Document, id: usize) -> usize {
    let mut cur = id;
    loop {
        let node = &doc.nodes[cur];
        if node.is_atomic() || node.is_text_node() {
            return cur;
        }
        match node.children.last() {
            Some(&last) => cur = last,
            None => return cur,
        }
    }
}

impl Document {
    /// The first addressable leaf under `root` in document order.
    pub fn first_addressable_leaf(&self, root: usize) -> Option<usize> {
        LeafWalker::new(self, root, root, Direction::Forward).next()
    }

    /// The last addressable leaf under `root` in document order.
    pub fn last_addressable_leaf(&self, root: usize) -> Option<usize> {
        LeafWalker::new(self, root, root, Direction::Backward).next()
    }

    /// The nearest self-or-ancestor with block display, capped at the editor
    /// root. This is what "same line flow" is measured against.
    pub(crate) fn nearest_block_ancestor(&self, node_id: usize) -> usize {
        let root = self.editor_root();
        let mut current = node_id;
        loop {
            if current == root {
                return root;
            }
            let node = &self.nodes[current];
            if node.is_block() {
                return current;
            }
            match node.parent {
                Some(parent) => current = parent,
                None => return current,
            }
        }
    }

    /// Collect the node and its element ancestors into a chain.
    pub fn node_chain(&self, node_id: usize) -> Vec<usize> {
        let mut chain = Vec::with_capacity(16);
        chain.push(node_id);
        chain.extend(
            AncestorTraverser::new(self, node_id).filter(|id| self.nodes[*id].is_element()),
        );
        chain
    }

    pub fn visit<F>(&self, mut visit: F)
    where
        F: FnMut(usize, &Node),
    {
        TreeTraverser::new(self, 0).for_each(|node_id| visit(node_id, &self.nodes[node_id]));
    }

    /// Compare the document order of two nodes.
    /// Returns `Ordering::Less` if `node_a` comes before `node_b` in document
    /// order, `Ordering::Greater` if it comes after, and `Ordering::Equal`
    /// for the same node.
    pub fn compare_document_order(&self, node_a: usize, node_b: usize) -> Ordering {
        if node_a == node_b {
            return Ordering::Equal;
        }

        let chain_a = self.ancestor_chain_from_root(node_a);
        let chain_b = self.ancestor_chain_from_root(node_b);

        // Find where the chains diverge
        let mut common_depth = 0;
        for (a, b) in chain_a.iter().zip(chain_b.iter()) {
            if a != b {
                break;
            }
            common_depth += 1;
        }

        // If one is an ancestor of the other
        if common_depth == chain_a.len() {
            return Ordering::Less;
        }
        if common_depth == chain_b.len() {
            return Ordering::Greater;
        }
        if common_depth == 0 {
            // Disconnected nodes (different trees); fall back to id order so
            // the comparison stays total.
            return node_a.cmp(&node_b);
        }

        // Compare position among siblings at the divergence point
        let divergent_a = chain_a[common_depth];
        let divergent_b = chain_b[common_depth];
        let parent_id = chain_a[common_depth - 1];
        let parent = &self.nodes[parent_id];

        for &child_id in &parent.children {
            if child_id == divergent_a {
                return Ordering::Less;
            }
            if child_id == divergent_b {
                return Ordering::Greater;
            }
        }

        Ordering::Equal
    }

    /// Build ancestor chain from root to node (inclusive), ordered
    /// `[root, ..., node]`.
    fn ancestor_chain_from_root(&self, node_id: usize) -> Vec<usize> {
        let mut ancestors = Vec::with_capacity(16);
        let mut current = Some(node_id);
        while let Some(id) = current {
            ancestors.push(id);
            current = self.nodes.get(id).and_then(|node| node.parent);
        }
        ancestors.reverse();
        ancestors
    }
}

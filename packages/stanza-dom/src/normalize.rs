use crate::Document;

impl Document {
    /// One-shot whitespace normalization, run when the core attaches to its
    /// editor root:
    ///
    /// 1. collapse every run of ascii whitespace inside text nodes to a
    ///    single space;
    /// 2. merge directly adjacent text siblings;
    /// 3. trim text at block boundaries (leftmost/rightmost descendant chain
    ///    of a block, and next to block siblings);
    /// 4. drop text nodes the above emptied out.
    ///
    /// Idempotent; afterwards text node boundaries are stable for the
    /// session.
    pub(crate) fn normalize_whitespace(&mut self, root: usize) {
        let mut collapsed = 0usize;
        let mut merged = 0usize;
        let mut dropped = 0usize;

        // 1. Collapse whitespace runs.
        let text_ids: Vec<usize> = self
            .non_atomic_subtree(root)
            .into_iter()
            .filter(|id| self.nodes[*id].is_text_node())
            .collect();
        for &id in &text_ids {
            let content = &self.nodes[id].text_data().unwrap().content;
            let new_content = collapse_whitespace(content);
            if new_content != *content {
                self.nodes[id].text_data_mut().unwrap().content = new_content;
                collapsed += 1;
            }
        }

        // 2. Merge adjacent text siblings.
        let parent_ids: Vec<usize> = self
            .non_atomic_subtree(root)
            .into_iter()
            .filter(|id| self.nodes[*id].children.len() > 1 && !self.nodes[*id].is_atomic())
            .collect();
        for parent in parent_ids {
            let children = self.nodes[parent].children.clone();
            let mut head: Option<usize> = None;
            for child in children {
                if self.nodes[child].is_text_node() {
                    match head {
                        None => head = Some(child),
                        Some(head_id) => {
                            let tail = self.nodes[child].text_data().unwrap().content.clone();
                            self.nodes[head_id]
                                .text_data_mut()
                                .unwrap()
                                .content
                                .push_str(&tail);
                            self.remove_and_drop_node(child);
                            merged += 1;
                        }
                    }
                } else {
                    head = None;
                }
            }
        }

        // 3. Trim at block boundaries.
        let text_ids: Vec<usize> = self
            .non_atomic_subtree(root)
            .into_iter()
            .filter(|id| self.nodes[*id].is_text_node())
            .collect();
        for &id in &text_ids {
            let trim_start = self.at_block_boundary(root, id, Side::Leading);
            let trim_end = self.at_block_boundary(root, id, Side::Trailing);
            if !trim_start && !trim_end {
                continue;
            }
            let content = self.nodes[id].text_data().unwrap().content.clone();
            let mut trimmed = content.as_str();
            if trim_start {
                trimmed = trimmed.trim_start_matches(' ');
            }
            if trim_end {
                trimmed = trimmed.trim_end_matches(' ');
            }
            if trimmed.len() != content.len() {
                self.nodes[id].text_data_mut().unwrap().content = trimmed.to_string();
            }
        }

        // 4. Drop emptied text nodes.
        for &id in &text_ids {
            if self.nodes.contains(id) && self.nodes[id].text_len() == 0 {
                self.remove_and_drop_node(id);
                dropped += 1;
            }
        }

        tracing::debug!(collapsed, merged, dropped, "normalized whitespace");
    }

    /// Pre-order ids of the subtree, not descending into atomic components:
    /// their content belongs to the host, normalization leaves it alone.
    fn non_atomic_subtree(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            out.push(id);
            if id == root || !node.is_atomic() {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Whether the given side of a text node sits against a block boundary:
    /// the node is the first/last flow child along an inline-only ancestor
    /// chain up to a block (or the normalization root), or its flow sibling
    /// on that side is a block element.
    fn at_block_boundary(&self, root: usize, text_id: usize, side: Side) -> bool {
        let mut current = text_id;
        loop {
            let Some(parent) = self.nodes[current].parent else {
                return false;
            };
            match self.flow_sibling(current, side) {
                Some(sibling) => return self.nodes[sibling].is_block(),
                None => {
                    if parent == root || self.nodes[parent].is_block() || !self.nodes[parent].is_element() {
                        return true;
                    }
                    // An inline wrapper: the boundary question moves up.
                    current = parent;
                }
            }
        }
    }

    /// The nearest sibling on a side that participates in flow: comments and
    /// whitespace-only text nodes (which normalization is about to drop)
    /// don't count.
    fn flow_sibling(&self, node_id: usize, side: Side) -> Option<usize> {
        let mut current = node_id;
        loop {
            let sibling = match side {
                Side::Leading => self.previous_sibling(current)?,
                Side::Trailing => self.next_sibling(current)?,
            };
            let node = &self.nodes[sibling];
            let transparent = node.is_comment()
                || node
                    .text_data()
                    .is_some_and(|data| data.content.trim_matches(' ').is_empty());
            if !transparent {
                return Some(sibling);
            }
            current = sibling;
        }
    }
}

#[derive(Copy, Clone, PartialEq)]
enum Side {
    Leading,
    Trailing,
}

/// Collapse runs of ascii whitespace to single spaces. Non-breaking spaces
/// are content, not whitespace.
fn collapse_whitespace(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_run = false;
    for ch in content.chars() {
        if ch.is_ascii_whitespace() {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(ch);
            in_run = false;
        }
    }
    out
}

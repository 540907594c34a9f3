use crate::Document;

impl Document {
    pub fn print_tree(&self) {
        self.print_subtree(0, 0);
    }

    pub fn print_subtree(&self, node_id: usize, level: usize) {
        let node = &self.nodes[node_id];
        println!(
            "{} {} {:?} {} {:?}",
            "  ".repeat(level),
            node.id,
            node.parent,
            node.node_debug_str().replace('\n', ""),
            node.children
        );
        for child_id in node.children.iter() {
            self.print_subtree(*child_id, level + 1);
        }
    }
}

//! Owned, ordered content tree handed to callers

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;

use crate::domain::entities::{ContentEntry, EntryId, FieldEntry, RowSnapshot};

/// One content entry with its ordered children and attached fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub entry: ContentEntry,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
}

// Children are released from an explicit stack so deep trees drop without
// exhausting the call stack.
impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Node {
    pub fn new(entry: ContentEntry) -> Self {
        Self {
            entry,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.entry.id
    }

    pub fn child_ids(&self) -> Vec<&EntryId> {
        self.children.iter().map(Node::id).collect()
    }

    /// Pre-order, left-to-right traversal of this subtree.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Number of levels in this subtree, counting this node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Identifiers of nodes without children, left to right.
    pub fn leaf_ids(&self) -> Vec<&EntryId> {
        self.iter()
            .filter(|node| node.children.is_empty())
            .map(Node::id)
            .collect()
    }

    pub fn find(&self, id: &EntryId) -> Option<&Node> {
        self.iter().find(|node| node.id() == id)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

pub struct NodeIter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Result of a materialization: exactly one node, or none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Root(Option<Node>);

impl Root {
    pub fn new(node: Node) -> Self {
        Self(Some(node))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn node(&self) -> Option<&Node> {
        self.0.as_ref()
    }

    pub fn into_node(self) -> Option<Node> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn node_count(&self) -> usize {
        self.node().map_or(0, Node::node_count)
    }

    pub fn find(&self, id: &EntryId) -> Option<&Node> {
        self.node().and_then(|node| node.find(id))
    }

    /// Converts the tree back into flat rows.
    ///
    /// Parent, first-child, next-sibling and prev-sibling pointers are
    /// rewritten to describe the tree exactly as it is ordered; the root keeps
    /// its own parent pointer. Rows come out in pre-order.
    pub fn flatten(&self) -> RowSnapshot {
        let mut snapshot = RowSnapshot::default();
        let Some(root) = self.node() else {
            return snapshot;
        };

        let mut stack: Vec<(&Node, ContentEntry)> = vec![(root, root.entry.clone())];
        while let Some((node, mut entry)) = stack.pop() {
            let child_ids = node.children.iter().map(|c| c.id().clone()).collect_vec();
            entry.first_child_id = child_ids.first().cloned();
            snapshot.fields.extend(node.fields.iter().cloned());

            for (pos, child) in node.children.iter().enumerate().rev() {
                let mut child_entry = child.entry.clone();
                child_entry.parent_id = Some(node.id().clone());
                child_entry.prev_sibling_id = pos.checked_sub(1).map(|p| child_ids[p].clone());
                child_entry.next_sibling_id = child_ids.get(pos + 1).cloned();
                stack.push((child, child_entry));
            }
            snapshot.entries.push(entry);
        }
        snapshot
    }
}

/// Renders a tree for terminal display.
pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for Node {
    fn to_tree_string(&self) -> Tree<String> {
        let label = match &self.entry.meta.label {
            Some(label) => format!("{} [{}] {}", self.id(), self.entry.kind, label),
            None => format!("{} [{}]", self.id(), self.entry.kind),
        };

        let fields = self
            .fields
            .iter()
            .map(|field| Tree::new(format!("{} = {:?}", field.kind, field.value)));
        let children = self.children.iter().map(|child| child.to_tree_string());

        Tree::new(label).with_leaves(fields.chain(children))
    }
}

impl TreeDisplay for Root {
    fn to_tree_string(&self) -> Tree<String> {
        match self.node() {
            Some(node) => node.to_tree_string(),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EntryKind;

    // r
    // ├── a
    // │   └── a1
    // └── b
    fn sample() -> Root {
        let mut a = Node::new(ContentEntry::new("a", EntryKind::Section));
        a.children.push(Node::new(ContentEntry::new("a1", "text")));
        a.fields.push(FieldEntry::new("fa", "a", "heading", "Intro"));
        let b = Node::new(ContentEntry::new("b", EntryKind::Section));
        let mut r = Node::new(ContentEntry::new("r", EntryKind::Root));
        r.children = vec![a, b];
        Root::new(r)
    }

    #[test]
    fn given_tree_when_iterating_then_visits_pre_order() {
        let root = sample();

        let ids: Vec<_> = root.node().unwrap().iter().map(|n| n.id().to_string()).collect();

        assert_eq!(ids, vec!["r", "a", "a1", "b"]);
        assert_eq!(root.node_count(), 4);
    }

    #[test]
    fn given_tree_when_measuring_then_reports_depth_and_leaves() {
        let root = sample();
        let node = root.node().unwrap();

        assert_eq!(node.depth(), 3);
        let leaves: Vec<_> = node.leaf_ids().iter().map(|id| id.to_string()).collect();
        assert_eq!(leaves, vec!["a1", "b"]);
        assert!(root.find(&"a1".into()).is_some());
        assert!(root.find(&"zz".into()).is_none());
    }

    #[test]
    fn given_tree_when_flattening_then_rewrites_pointers() {
        let root = sample();

        let snapshot = root.flatten();

        let by_id = |id: &str| {
            snapshot
                .entries
                .iter()
                .find(|e| e.id.as_str() == id)
                .unwrap()
                .clone()
        };
        assert_eq!(snapshot.entries.len(), 4);
        assert_eq!(by_id("r").first_child_id, Some("a".into()));
        assert_eq!(by_id("a").next_sibling_id, Some("b".into()));
        assert_eq!(by_id("a").prev_sibling_id, None);
        assert_eq!(by_id("b").prev_sibling_id, Some("a".into()));
        assert_eq!(by_id("b").next_sibling_id, None);
        assert_eq!(by_id("a1").parent_id, Some("a".into()));
        assert_eq!(by_id("a").first_child_id, Some("a1".into()));
        assert_eq!(snapshot.fields.len(), 1);
    }

    #[test]
    fn given_empty_root_when_flattening_then_returns_no_rows() {
        let snapshot = Root::empty().flatten();

        assert!(snapshot.entries.is_empty());
        assert!(snapshot.fields.is_empty());
    }

    #[test]
    fn given_tree_when_displaying_then_renders_fields_and_children() {
        let rendered = sample().to_tree_string().to_string();

        assert!(rendered.starts_with("r [root]"));
        assert!(rendered.contains("heading = \"Intro\""));
        assert!(rendered.contains("a1 [text]"));
    }

    #[test]
    fn given_tree_when_serializing_then_round_trips_through_json() {
        let root = sample();

        let json = serde_json::to_string(&root).unwrap();
        let back: Root = serde_json::from_str(&json).unwrap();

        assert_eq!(back, root);
        assert_eq!(serde_json::to_string(&Root::empty()).unwrap(), "null");
    }
}

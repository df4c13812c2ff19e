use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{ContentEntry, EntryId, FieldEntry};
use crate::domain::tree::Node;

/// Node under construction, addressed by arena index.
#[derive(Debug)]
pub struct IndexedNode {
    /// Source row for this node
    pub entry: ContentEntry,
    /// Ordered child indices, filled in by the assembler
    pub children: Vec<Index>,
    /// Attached leaf values
    pub fields: Vec<FieldEntry>,
}

impl IndexedNode {
    fn new(entry: ContentEntry) -> Self {
        Self {
            entry,
            children: Vec::new(),
            fields: Vec::new(),
        }
    }
}

/// Arena-backed lookup from entry identifier to node.
///
/// Built in one pass over the supplied rows. Input order is remembered so
/// that anything derived from iteration stays deterministic.
#[derive(Debug, Default)]
pub struct RowIndex {
    arena: Arena<IndexedNode>,
    by_id: HashMap<EntryId, Index>,
    order: Vec<Index>,
}

impl RowIndex {
    /// One node per unique identifier; a repeated identifier replaces the
    /// earlier row (last write wins).
    #[instrument(level = "trace", skip(entries))]
    pub fn build(entries: impl IntoIterator<Item = ContentEntry>) -> Self {
        let entries = entries.into_iter();
        let (lower, _) = entries.size_hint();
        let mut index = Self {
            arena: Arena::new(),
            by_id: HashMap::with_capacity(lower),
            order: Vec::with_capacity(lower),
        };
        for entry in entries {
            index.insert(entry);
        }
        index
    }

    fn insert(&mut self, entry: ContentEntry) -> Index {
        let id = entry.id.clone();
        let idx = self.arena.insert(IndexedNode::new(entry));
        if let Some(previous) = self.by_id.insert(id, idx) {
            self.arena.remove(previous);
            self.order.retain(|&i| i != previous);
        }
        self.order.push(idx);
        idx
    }

    pub fn get(&self, id: &EntryId) -> Option<Index> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn node(&self, idx: Index) -> Option<&IndexedNode> {
        self.arena.get(idx)
    }

    pub fn node_mut(&mut self, idx: Index) -> Option<&mut IndexedNode> {
        self.arena.get_mut(idx)
    }

    /// Number of unique identifiers indexed.
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Arena indices in input order.
    pub fn indices(&self) -> impl Iterator<Item = Index> + '_ {
        self.order.iter().copied()
    }

    /// Nodes still held by the arena, in input order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &IndexedNode)> + '_ {
        self.order
            .iter()
            .filter_map(move |&idx| self.arena.get(idx).map(|node| (idx, node)))
    }

    /// Moves the subtree below `root` out of the arena into an owned tree.
    ///
    /// Every node leaves the arena at most once, so a child index listed
    /// twice or an index pointing back up cannot duplicate a node. Nodes not
    /// reachable from `root` stay behind and can be inspected via `iter`.
    #[instrument(level = "trace", skip(self))]
    pub fn detach_tree(&mut self, root: Index) -> Option<Node> {
        let mut stack = vec![Frame::new(self.arena.remove(root)?)];

        while let Some(top) = stack.last_mut() {
            match top.pending.next() {
                Some(child) => {
                    if let Some(node) = self.arena.remove(child) {
                        stack.push(Frame::new(node));
                    }
                }
                None => {
                    let finished = stack.pop()?.into_node();
                    match stack.last_mut() {
                        Some(parent) => parent.built.push(finished),
                        None => return Some(finished),
                    }
                }
            }
        }
        None
    }
}

/// Work item for the iterative arena-to-tree conversion.
struct Frame {
    entry: ContentEntry,
    fields: Vec<FieldEntry>,
    pending: std::vec::IntoIter<Index>,
    built: Vec<Node>,
}

impl Frame {
    fn new(node: IndexedNode) -> Self {
        let built = Vec::with_capacity(node.children.len());
        Self {
            entry: node.entry,
            fields: node.fields,
            pending: node.children.into_iter(),
            built,
        }
    }

    fn into_node(self) -> Node {
        Node {
            entry: self.entry,
            children: self.built,
            fields: self.fields,
        }
    }
}

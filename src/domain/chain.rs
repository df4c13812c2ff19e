//! Sibling chain walking over next-sibling pointers

use std::collections::HashSet;

use generational_arena::Index;
use tracing::trace;

use crate::domain::arena::RowIndex;
use crate::domain::entities::EntryId;

/// Outcome of following next-sibling pointers from a first-child pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainWalk {
    /// No starting pointer, so no order information.
    Empty,
    /// Chain ended on an entry without a next-sibling pointer.
    Complete(Vec<Index>),
    /// Chain hit an identifier that is not in the index.
    Partial { nodes: Vec<Index>, missing: EntryId },
    /// Chain revisited an identifier; nothing of it can be trusted.
    Cycle { at: EntryId },
}

impl ChainWalk {
    /// The best-effort order, or `None` when no order is available.
    pub fn into_order(self) -> Option<Vec<Index>> {
        match self {
            ChainWalk::Empty | ChainWalk::Cycle { .. } => None,
            ChainWalk::Complete(nodes) | ChainWalk::Partial { nodes, .. } => Some(nodes),
        }
    }
}

/// Follows next-sibling pointers starting at `start`.
///
/// Terminates on any input: every identifier is visited at most once.
pub fn walk_sibling_chain(start: Option<&EntryId>, index: &RowIndex) -> ChainWalk {
    let Some(start) = start.filter(|id| !id.is_empty()) else {
        return ChainWalk::Empty;
    };

    let mut visited: HashSet<&EntryId> = HashSet::new();
    let mut nodes = Vec::new();
    let mut current = start;

    loop {
        let Some(idx) = index.get(current) else {
            trace!(missing = %current, walked = nodes.len(), "chain stops at unknown entry");
            return ChainWalk::Partial {
                nodes,
                missing: current.clone(),
            };
        };
        if !visited.insert(current) {
            trace!(at = %current, "chain revisits entry");
            return ChainWalk::Cycle {
                at: current.clone(),
            };
        }
        nodes.push(idx);

        match index.node(idx).and_then(|node| node.entry.next_sibling()) {
            Some(next) => current = next,
            None => return ChainWalk::Complete(nodes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ContentEntry, EntryKind};

    fn section(id: &str, next: Option<&str>) -> ContentEntry {
        let entry = ContentEntry::new(id, EntryKind::Section).with_parent("r");
        match next {
            Some(next) => entry.with_next_sibling(next),
            None => entry,
        }
    }

    fn ids(index: &RowIndex, nodes: &[Index]) -> Vec<String> {
        nodes
            .iter()
            .map(|&idx| index.node(idx).unwrap().entry.id.to_string())
            .collect()
    }

    #[test]
    fn given_no_start_when_walking_then_returns_empty() {
        let index = RowIndex::build(vec![section("a", None)]);

        assert_eq!(walk_sibling_chain(None, &index), ChainWalk::Empty);
        assert_eq!(
            walk_sibling_chain(Some(&EntryId::from("")), &index),
            ChainWalk::Empty
        );
    }

    #[test]
    fn given_single_node_when_walking_then_returns_one_element() {
        let index = RowIndex::build(vec![section("a", None)]);

        let walk = walk_sibling_chain(Some(&"a".into()), &index);

        let order = walk.into_order().unwrap();
        assert_eq!(ids(&index, &order), vec!["a"]);
    }

    #[test]
    fn given_complete_chain_when_walking_then_follows_next_pointers() {
        let index = RowIndex::build(vec![
            section("a", Some("b")),
            section("b", None),
            section("c", Some("a")),
        ]);

        let walk = walk_sibling_chain(Some(&"c".into()), &index);

        match walk {
            ChainWalk::Complete(nodes) => assert_eq!(ids(&index, &nodes), vec!["c", "a", "b"]),
            other => panic!("expected complete chain, got {:?}", other),
        }
    }

    #[test]
    fn given_dangling_pointer_when_walking_then_returns_prefix() {
        let index = RowIndex::build(vec![section("c", Some("a")), section("a", Some("missing"))]);

        let walk = walk_sibling_chain(Some(&"c".into()), &index);

        match walk {
            ChainWalk::Partial { nodes, missing } => {
                assert_eq!(ids(&index, &nodes), vec!["c", "a"]);
                assert_eq!(missing, EntryId::from("missing"));
            }
            other => panic!("expected partial chain, got {:?}", other),
        }
    }

    #[test]
    fn given_cycle_when_walking_then_returns_no_order() {
        let index = RowIndex::build(vec![section("a", Some("b")), section("b", Some("a"))]);

        let walk = walk_sibling_chain(Some(&"a".into()), &index);

        assert_eq!(walk, ChainWalk::Cycle { at: "a".into() });
        assert_eq!(walk.into_order(), None);
    }

    #[test]
    fn given_self_loop_when_walking_then_detects_cycle() {
        let index = RowIndex::build(vec![section("a", Some("a"))]);

        let walk = walk_sibling_chain(Some(&"a".into()), &index);

        assert!(matches!(walk, ChainWalk::Cycle { .. }));
    }
}

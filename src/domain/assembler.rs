//! Tree assembly: flat rows in, one ordered tree out.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::RowIndex;
use crate::domain::chain::{walk_sibling_chain, ChainWalk};
use crate::domain::diagnostics::{Anomaly, DiagnosticSink};
use crate::domain::entities::{ContentEntry, FieldEntry};
use crate::domain::error::{DomainError, TreeResult};
use crate::domain::fields::attach_fields;
use crate::domain::order::merge_order;
use crate::domain::tree::Root;

/// Knobs for a single materialization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaterializeOptions {
    /// Report entries left out of the tree because their parent does not
    /// resolve (or because they cannot be reached from the root).
    pub report_orphan_entries: bool,
}

/// Builds the ordered tree for one snapshot of rows.
///
/// The only error is a snapshot without a root entry. Broken sibling links,
/// unknown field owners and similar problems are reported to `diagnostics`
/// and the best tree that can be built is returned.
#[instrument(level = "debug", skip_all)]
pub fn assemble_tree(
    diagnostics: &dyn DiagnosticSink,
    entries: impl IntoIterator<Item = ContentEntry>,
    fields: impl IntoIterator<Item = FieldEntry>,
    options: MaterializeOptions,
) -> TreeResult<Root> {
    let mut index = RowIndex::build(entries);
    debug!(entries = index.len(), "row index built");

    let root = find_root(&index, diagnostics).ok_or(DomainError::MissingRoot {
        entries: index.len(),
    })?;

    let mut children = authoritative_children(&index, root, diagnostics);
    let parents: Vec<Index> = index.indices().filter(|idx| children.contains_key(idx)).collect();
    for parent in parents {
        let Some(kids) = children.remove(&parent) else {
            continue;
        };
        let ordered = order_children(&index, parent, &kids, diagnostics);
        if let Some(node) = index.node_mut(parent) {
            node.children = ordered;
        }
    }

    attach_fields(fields, &mut index, diagnostics);

    let tree = index.detach_tree(root).map(Root::new).unwrap_or_default();
    if options.report_orphan_entries {
        report_unreachable(&index, diagnostics);
    }
    debug!(nodes = tree.node_count(), "tree assembled");
    Ok(tree)
}

/// First root-tagged entry in input order; further ones are reported.
fn find_root(index: &RowIndex, diagnostics: &dyn DiagnosticSink) -> Option<Index> {
    let mut roots = index.iter().filter(|(_, node)| node.entry.kind.is_root());
    let (root, root_node) = roots.next()?;
    for (_, extra) in roots {
        diagnostics.warn(
            "find_root",
            &Anomaly::ExtraRoot {
                root: root_node.entry.id.clone(),
                extra: extra.entry.id.clone(),
            },
        );
    }
    Some(root)
}

/// Children per parent, derived from parent pointers alone, in input order.
///
/// The root never becomes a child and no entry becomes its own child, so the
/// part of the graph reachable from the root is a tree.
fn authoritative_children(
    index: &RowIndex,
    root: Index,
    diagnostics: &dyn DiagnosticSink,
) -> HashMap<Index, Vec<Index>> {
    let mut children: HashMap<Index, Vec<Index>> = HashMap::new();

    for (idx, node) in index.iter() {
        let Some(parent_id) = node.entry.parent() else {
            continue;
        };
        let Some(parent) = index.get(parent_id) else {
            continue;
        };
        if idx == root {
            diagnostics.warn(
                "authoritative_children",
                &Anomaly::RootWithParent {
                    root: node.entry.id.clone(),
                    parent: parent_id.clone(),
                },
            );
            continue;
        }
        if parent == idx {
            diagnostics.warn(
                "authoritative_children",
                &Anomaly::SelfParent(node.entry.id.clone()),
            );
            continue;
        }
        children.entry(parent).or_default().push(idx);
    }
    children
}

fn order_children(
    index: &RowIndex,
    parent: Index,
    kids: &[Index],
    diagnostics: &dyn DiagnosticSink,
) -> Vec<Index> {
    let Some(parent_node) = index.node(parent) else {
        return kids.to_vec();
    };
    let parent_id = &parent_node.entry.id;

    let walk = walk_sibling_chain(parent_node.entry.first_child(), index);
    match &walk {
        ChainWalk::Partial { missing, .. } => diagnostics.warn(
            "order_children",
            &Anomaly::DanglingSibling {
                parent: parent_id.clone(),
                missing: missing.clone(),
            },
        ),
        ChainWalk::Cycle { at } => diagnostics.warn(
            "order_children",
            &Anomaly::SiblingCycle {
                parent: parent_id.clone(),
                at: at.clone(),
            },
        ),
        ChainWalk::Empty | ChainWalk::Complete(_) => {}
    }

    merge_order(walk.into_order().as_deref(), kids)
}

/// Reports every entry that stayed behind in the index after detaching.
fn report_unreachable(index: &RowIndex, diagnostics: &dyn DiagnosticSink) {
    for (_, node) in index.iter() {
        let anomaly = match node.entry.parent() {
            Some(parent) if !index.contains(parent) => Anomaly::OrphanedEntry {
                entry: node.entry.id.clone(),
                parent: parent.clone(),
            },
            _ => Anomaly::DetachedEntry(node.entry.id.clone()),
        };
        diagnostics.warn("report_unreachable", &anomaly);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{EntryId, EntryKind};
    use crate::util::testing::RecordingDiagnostics;

    fn child_ids(root: &Root) -> Vec<String> {
        root.node()
            .unwrap()
            .child_ids()
            .iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test]
    fn given_no_root_when_assembling_then_errors() {
        let diagnostics = RecordingDiagnostics::default();

        let result = assemble_tree(
            &diagnostics,
            vec![ContentEntry::new("a", EntryKind::Section)],
            vec![],
            MaterializeOptions::default(),
        );

        assert_eq!(result, Err(DomainError::MissingRoot { entries: 1 }));
    }

    #[test]
    fn given_root_only_when_assembling_then_returns_single_node() {
        let diagnostics = RecordingDiagnostics::default();

        let root = assemble_tree(
            &diagnostics,
            vec![ContentEntry::new("r", EntryKind::Root).with_first_child("gone")],
            vec![],
            MaterializeOptions::default(),
        )
        .unwrap();

        assert_eq!(root.node_count(), 1);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn given_two_roots_when_assembling_then_first_wins_and_second_reported() {
        let diagnostics = RecordingDiagnostics::default();

        let root = assemble_tree(
            &diagnostics,
            vec![
                ContentEntry::new("r1", EntryKind::Root),
                ContentEntry::new("r2", EntryKind::Root),
            ],
            vec![],
            MaterializeOptions::default(),
        )
        .unwrap();

        assert_eq!(root.node().unwrap().id(), &EntryId::from("r1"));
        assert_eq!(diagnostics.codes(), vec!["extra_root"]);
    }

    #[test]
    fn given_root_parented_by_descendant_when_assembling_then_terminates() {
        let diagnostics = RecordingDiagnostics::default();

        let root = assemble_tree(
            &diagnostics,
            vec![
                ContentEntry::new("r", EntryKind::Root).with_parent("a"),
                ContentEntry::new("a", EntryKind::Section).with_parent("r"),
                ContentEntry::new("s", EntryKind::Section).with_parent("s"),
            ],
            vec![],
            MaterializeOptions::default(),
        )
        .unwrap();

        assert_eq!(child_ids(&root), vec!["a"]);
        assert_eq!(root.node_count(), 2);
        assert_eq!(diagnostics.codes(), vec!["root_with_parent", "self_parent"]);
    }

    #[test]
    fn given_orphans_and_reporting_enabled_when_assembling_then_reports_them() {
        let diagnostics = RecordingDiagnostics::default();
        let options = MaterializeOptions {
            report_orphan_entries: true,
        };

        let root = assemble_tree(
            &diagnostics,
            vec![
                ContentEntry::new("r", EntryKind::Root),
                ContentEntry::new("a", EntryKind::Section).with_parent("nowhere"),
                ContentEntry::new("b", EntryKind::Section),
                ContentEntry::new("c", EntryKind::Section).with_parent("r"),
            ],
            vec![],
            options,
        )
        .unwrap();

        assert_eq!(child_ids(&root), vec!["c"]);
        assert_eq!(
            diagnostics.anomalies(),
            vec![
                Anomaly::OrphanedEntry {
                    entry: "a".into(),
                    parent: "nowhere".into()
                },
                Anomaly::DetachedEntry("b".into()),
            ]
        );
    }

    #[test]
    fn given_unreachable_extra_root_and_reporting_enabled_when_assembling_then_reports_detached() {
        let diagnostics = RecordingDiagnostics::default();
        let options = MaterializeOptions {
            report_orphan_entries: true,
        };

        let root = assemble_tree(
            &diagnostics,
            vec![
                ContentEntry::new("r1", EntryKind::Root),
                ContentEntry::new("r2", EntryKind::Root),
            ],
            vec![],
            options,
        )
        .unwrap();

        assert_eq!(root.node_count(), 1);
        assert_eq!(
            diagnostics.anomalies(),
            vec![
                Anomaly::ExtraRoot {
                    root: "r1".into(),
                    extra: "r2".into()
                },
                Anomaly::DetachedEntry("r2".into()),
            ]
        );
    }

    #[test]
    fn given_orphans_and_reporting_disabled_when_assembling_then_stays_silent() {
        let diagnostics = RecordingDiagnostics::default();

        assemble_tree(
            &diagnostics,
            vec![
                ContentEntry::new("r", EntryKind::Root),
                ContentEntry::new("a", EntryKind::Section).with_parent("nowhere"),
            ],
            vec![],
            MaterializeOptions::default(),
        )
        .unwrap();

        assert!(diagnostics.is_empty());
    }
}

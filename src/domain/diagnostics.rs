//! Non-fatal findings raised while materializing a tree

use thiserror::Error;

use crate::domain::entities::EntryId;

/// Something wrong with the input that was worked around.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    #[error("sibling chain under {parent} points to unknown entry {missing}")]
    DanglingSibling { parent: EntryId, missing: EntryId },

    #[error("sibling chain under {parent} revisits {at}, using input order")]
    SiblingCycle { parent: EntryId, at: EntryId },

    #[error("field {field} references unknown entry {owner}, dropped")]
    OrphanedField { field: String, owner: EntryId },

    #[error("field {field} supplied more than once, keeping the first")]
    DuplicateField { field: String },

    #[error("entry {entry} references unknown parent {parent}")]
    OrphanedEntry { entry: EntryId, parent: EntryId },

    #[error("entry {0} is not reachable from the root")]
    DetachedEntry(EntryId),

    #[error("entry {0} names itself as parent")]
    SelfParent(EntryId),

    #[error("root entry {root} claims parent {parent}, ignored")]
    RootWithParent { root: EntryId, parent: EntryId },

    #[error("additional root entry {extra} treated as content, root is {root}")]
    ExtraRoot { root: EntryId, extra: EntryId },
}

impl Anomaly {
    /// Short stable name, used as a structured log field.
    pub fn code(&self) -> &'static str {
        match self {
            Anomaly::DanglingSibling { .. } => "dangling_sibling",
            Anomaly::SiblingCycle { .. } => "sibling_cycle",
            Anomaly::OrphanedField { .. } => "orphaned_field",
            Anomaly::DuplicateField { .. } => "duplicate_field",
            Anomaly::OrphanedEntry { .. } => "orphaned_entry",
            Anomaly::DetachedEntry(_) => "detached_entry",
            Anomaly::SelfParent(_) => "self_parent",
            Anomaly::RootWithParent { .. } => "root_with_parent",
            Anomaly::ExtraRoot { .. } => "extra_root",
        }
    }
}

/// Injected capability for reporting anomalies.
///
/// Shared across concurrent materializations, hence `Send + Sync`.
pub trait DiagnosticSink: Send + Sync {
    /// Report a non-fatal anomaly together with where it was found.
    fn warn(&self, context: &str, anomaly: &Anomaly);
}

/// Sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentDiagnostics;

impl DiagnosticSink for SilentDiagnostics {
    fn warn(&self, _context: &str, _anomaly: &Anomaly) {}
}

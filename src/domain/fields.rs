//! Attaching leaf field rows to their owning nodes

use std::collections::HashSet;

use tracing::debug;

use crate::domain::arena::RowIndex;
use crate::domain::diagnostics::{Anomaly, DiagnosticSink};
use crate::domain::entities::FieldEntry;

/// Appends every field to the node named by its parent reference.
///
/// Fields whose owner is not indexed are dropped and reported; a field id
/// seen twice is attached once. Returns the number of fields attached.
pub fn attach_fields(
    fields: impl IntoIterator<Item = FieldEntry>,
    index: &mut RowIndex,
    diagnostics: &dyn DiagnosticSink,
) -> usize {
    let mut seen: HashSet<String> = HashSet::new();
    let mut attached = 0;

    for field in fields {
        let Some(owner) = index.get(&field.parent_id) else {
            diagnostics.warn(
                "attach_fields",
                &Anomaly::OrphanedField {
                    field: field.id,
                    owner: field.parent_id,
                },
            );
            continue;
        };
        if !seen.insert(field.id.clone()) {
            diagnostics.warn("attach_fields", &Anomaly::DuplicateField { field: field.id });
            continue;
        }
        if let Some(node) = index.node_mut(owner) {
            node.fields.push(field);
            attached += 1;
        }
    }

    debug!(attached, "fields attached");
    attached
}

//! Domain entities: flat content rows as supplied by the persistence layer

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Serialized spelling of [`EntryKind::Root`].
pub const ROOT_TAG: &str = "root";

/// Opaque identifier of a content entry.
///
/// Pointers between entries are stored as plain identifiers and only ever
/// resolved through a [`RowIndex`](crate::domain::RowIndex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Empty identifiers are what the store hands out for "no pointer".
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Type tag of a content entry.
///
/// Stored as a plain string; `"root"` marks the synthetic root of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EntryKind {
    Root,
    Page,
    Section,
    Other(String),
}

impl EntryKind {
    pub fn as_str(&self) -> &str {
        match self {
            EntryKind::Root => ROOT_TAG,
            EntryKind::Page => "page",
            EntryKind::Section => "section",
            EntryKind::Other(tag) => tag,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, EntryKind::Root)
    }
}

impl From<&str> for EntryKind {
    fn from(tag: &str) -> Self {
        match tag {
            ROOT_TAG => EntryKind::Root,
            "page" => EntryKind::Page,
            "section" => EntryKind::Section,
            other => EntryKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EntryKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            ROOT_TAG | "page" | "section" => EntryKind::from(tag.as_str()),
            _ => EntryKind::Other(tag),
        }
    }
}

impl From<EntryKind> for String {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive payload carried along with an entry; never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One structural row: a page, section or other container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub id: EntryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_child_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_sibling_id: Option<EntryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_sibling_id: Option<EntryId>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub meta: EntryMeta,
}

impl ContentEntry {
    pub fn new(id: impl Into<EntryId>, kind: impl Into<EntryKind>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            first_child_id: None,
            next_sibling_id: None,
            prev_sibling_id: None,
            kind: kind.into(),
            meta: EntryMeta::default(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<EntryId>) -> Self {
        self.parent_id = Some(parent.into());
        self
    }

    pub fn with_first_child(mut self, child: impl Into<EntryId>) -> Self {
        self.first_child_id = Some(child.into());
        self
    }

    pub fn with_next_sibling(mut self, next: impl Into<EntryId>) -> Self {
        self.next_sibling_id = Some(next.into());
        self
    }

    pub fn with_prev_sibling(mut self, prev: impl Into<EntryId>) -> Self {
        self.prev_sibling_id = Some(prev.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.meta.label = Some(label.into());
        self
    }

    /// Parent pointer, with empty identifiers read as absent.
    pub fn parent(&self) -> Option<&EntryId> {
        present(self.parent_id.as_ref())
    }

    pub fn first_child(&self) -> Option<&EntryId> {
        present(self.first_child_id.as_ref())
    }

    pub fn next_sibling(&self) -> Option<&EntryId> {
        present(self.next_sibling_id.as_ref())
    }

    pub fn prev_sibling(&self) -> Option<&EntryId> {
        present(self.prev_sibling_id.as_ref())
    }
}

fn present(id: Option<&EntryId>) -> Option<&EntryId> {
    id.filter(|id| !id.is_empty())
}

/// One leaf value owned by a content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    pub id: String,
    /// Identifier of the owning [`ContentEntry`].
    pub parent_id: EntryId,
    #[serde(default)]
    pub value: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl FieldEntry {
    pub fn new(
        id: impl Into<String>,
        parent_id: impl Into<EntryId>,
        kind: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            parent_id: parent_id.into(),
            value: value.into(),
            kind: kind.into(),
        }
    }
}

/// The flat input of one materialization: the result of the two range
/// queries (entries by route, fields by parent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowSnapshot {
    pub entries: Vec<ContentEntry>,
    pub fields: Vec<FieldEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_root_tag_when_parsing_kind_then_yields_root_variant() {
        assert_eq!(EntryKind::from("root"), EntryKind::Root);
        assert_eq!(EntryKind::from("section".to_string()), EntryKind::Section);
        assert_eq!(
            EntryKind::from("hero".to_string()),
            EntryKind::Other("hero".into())
        );
        assert_eq!(String::from(EntryKind::Root), "root");
    }

    #[test]
    fn given_empty_pointer_when_reading_then_treated_as_absent() {
        let entry = ContentEntry::new("a", EntryKind::Section)
            .with_parent("")
            .with_next_sibling("")
            .with_prev_sibling("  ")
            .with_first_child("b");

        assert_eq!(entry.parent(), None);
        assert_eq!(entry.next_sibling(), None);
        assert_eq!(entry.prev_sibling(), Some(&EntryId::from("  ")));
        assert_eq!(entry.first_child(), Some(&EntryId::from("b")));
    }

    #[test]
    fn given_json_row_when_deserializing_then_reads_type_tag() {
        let json = r#"{"id":"r","type":"root","first_child_id":"a","meta":{"label":"Home"}}"#;
        let entry: ContentEntry = serde_json::from_str(json).unwrap();

        assert!(entry.kind.is_root());
        assert_eq!(entry.first_child(), Some(&EntryId::from("a")));
        assert_eq!(entry.meta.label.as_deref(), Some("Home"));
    }
}

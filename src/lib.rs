//! pagetree: materializes flat content rows into ordered page trees.
//!
//! Content entries arrive as flat rows carrying a parent pointer and optional
//! first-child / next-sibling / prev-sibling pointers. [`domain::assemble_tree`]
//! turns one snapshot of such rows into a single rooted [`domain::Root`],
//! recovering sibling order from the pointer chain where it can be trusted and
//! falling back to input order where it cannot.
//!
//! ```
//! use pagetree::domain::SilentDiagnostics;
//! use pagetree::{assemble_tree, ContentEntry, EntryKind, FieldEntry, MaterializeOptions};
//!
//! let entries = vec![
//!     ContentEntry::new("home", EntryKind::Root).with_first_child("b"),
//!     ContentEntry::new("a", EntryKind::Section).with_parent("home"),
//!     ContentEntry::new("b", EntryKind::Section).with_parent("home").with_next_sibling("a"),
//! ];
//! let fields = vec![FieldEntry::new("title", "b", "text", "Hello")];
//!
//! let root = assemble_tree(&SilentDiagnostics, entries, fields, MaterializeOptions::default())?;
//! let order: Vec<_> = root.node().unwrap().child_ids().iter().map(|id| id.to_string()).collect();
//! assert_eq!(order, ["b", "a"]);
//! # Ok::<(), pagetree::DomainError>(())
//! ```
//!
//! Layers:
//! - `domain`: entities and the materialization engine (pure, no I/O)
//! - `application`: services and use cases
//! - `infrastructure`: I/O implementations and DI container
//! - `cli`: the `pagetree` inspection binary

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    assemble_tree, Anomaly, ContentEntry, DiagnosticSink, DomainError, EntryId, EntryKind,
    FieldEntry, MaterializeOptions, Node, Root, RowSnapshot,
};

//! Domain layer: entities and tree materialization
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod assembler;
pub mod chain;
pub mod diagnostics;
pub mod entities;
pub mod error;
pub mod fields;
pub mod order;
pub mod tree;

pub use arena::{IndexedNode, RowIndex};
pub use assembler::{assemble_tree, MaterializeOptions};
pub use chain::{walk_sibling_chain, ChainWalk};
pub use diagnostics::{Anomaly, DiagnosticSink, SilentDiagnostics};
pub use entities::*;
pub use error::{DomainError, TreeResult};
pub use fields::attach_fields;
pub use order::merge_order;
pub use tree::{Node, NodeIter, Root, TreeDisplay};

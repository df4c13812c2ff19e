//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are reserved for input the engine cannot turn into a tree.
///
/// Everything short of that is reported as an
/// [`Anomaly`](crate::domain::Anomaly) and degrades the result instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("page has no content: no root entry among {entries} content entries")]
    MissingRoot { entries: usize },
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

//! Content tree service
//!
//! Materializes row snapshots into trees and renders them for API responses.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{assemble_tree, ContentEntry, DiagnosticSink, FieldEntry, Root, RowSnapshot};
use crate::infrastructure::traits::FileSystem;

/// Service turning flat content rows into ordered trees.
pub struct TreeService {
    settings: Arc<Settings>,
    diagnostics: Arc<dyn DiagnosticSink>,
    fs: Arc<dyn FileSystem>,
}

impl TreeService {
    /// Create a new tree service.
    pub fn new(
        settings: Arc<Settings>,
        diagnostics: Arc<dyn DiagnosticSink>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            settings,
            diagnostics,
            fs,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Build the tree for one set of rows.
    ///
    /// Fails only when no entry is tagged as root.
    #[instrument(level = "debug", skip_all)]
    pub fn materialize(
        &self,
        entries: impl IntoIterator<Item = ContentEntry>,
        fields: impl IntoIterator<Item = FieldEntry>,
    ) -> ApplicationResult<Root> {
        let root = assemble_tree(
            self.diagnostics.as_ref(),
            entries,
            fields,
            self.settings.materialize_options(),
        )?;
        Ok(root)
    }

    pub fn materialize_snapshot(&self, snapshot: &RowSnapshot) -> ApplicationResult<Root> {
        self.materialize(
            snapshot.entries.iter().cloned(),
            snapshot.fields.iter().cloned(),
        )
    }

    /// Materialize independent snapshots in parallel, results in input order.
    pub fn materialize_batch(&self, snapshots: &[RowSnapshot]) -> Vec<ApplicationResult<Root>> {
        debug!("materialize_batch: {} snapshots", snapshots.len());
        snapshots
            .par_iter()
            .map(|snapshot| self.materialize_snapshot(snapshot))
            .collect()
    }

    /// Parse a JSON row snapshot (`{"entries": [...], "fields": [...]}`).
    pub fn parse_snapshot(&self, json: &str) -> ApplicationResult<RowSnapshot> {
        serde_json::from_str(json).map_err(|e| ApplicationError::Snapshot {
            message: e.to_string(),
            source: Some(e),
        })
    }

    /// Read and parse a JSON row snapshot from disk.
    pub fn load_snapshot(&self, path: &Path) -> ApplicationResult<RowSnapshot> {
        debug!("load_snapshot: path={}", path.display());
        if !self.fs.exists(path) {
            return Err(ApplicationError::Snapshot {
                message: format!("file not found: {}", path.display()),
                source: None,
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read snapshot", path)?;
        self.parse_snapshot(&content)
    }

    /// Render a tree as a JSON document, pretty-printed per settings.
    pub fn render_json(&self, root: &Root) -> ApplicationResult<String> {
        self.to_json(root)
    }

    /// Render flat rows as a JSON document, pretty-printed per settings.
    pub fn render_snapshot_json(&self, snapshot: &RowSnapshot) -> ApplicationResult<String> {
        self.to_json(snapshot)
    }

    fn to_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> ApplicationResult<String> {
        let rendered = if self.settings.pretty_json {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.map_err(ApplicationError::Render)
    }
}

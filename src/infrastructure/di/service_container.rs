//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::TreeService;
use crate::config::Settings;
use crate::domain::DiagnosticSink;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, TracingDiagnostics};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Where non-fatal anomalies go
    pub diagnostics: Arc<dyn DiagnosticSink>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(TracingDiagnostics),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            diagnostics,
        }
    }

    pub fn tree_service(&self) -> TreeService {
        TreeService::new(
            Arc::clone(&self.settings),
            Arc::clone(&self.diagnostics),
            Arc::clone(&self.fs),
        )
    }
}

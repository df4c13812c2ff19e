use std::env;
use std::sync::{Mutex, Once};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Anomaly, DiagnosticSink};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "pagetree=trace");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Arena internals are not interesting in test output
    let noisy_modules = ["generational_arena"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Diagnostic sink that keeps every report for later assertions.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<(String, Anomaly)>>,
}

impl RecordingDiagnostics {
    pub fn anomalies(&self) -> Vec<Anomaly> {
        self.lock().iter().map(|(_, anomaly)| anomaly.clone()).collect()
    }

    pub fn contexts(&self) -> Vec<String> {
        self.lock().iter().map(|(context, _)| context.clone()).collect()
    }

    pub fn codes(&self) -> Vec<&'static str> {
        self.lock().iter().map(|(_, anomaly)| anomaly.code()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(String, Anomaly)>> {
        // a panicking test must not hide the reports of the others
        self.reports.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn warn(&self, context: &str, anomaly: &Anomaly) {
        self.lock().push((context.to_string(), anomaly.clone()));
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn given_reports_when_recording_then_keeps_them_in_order() {
        let sink = RecordingDiagnostics::default();

        sink.warn("first", &Anomaly::SelfParent("a".into()));
        sink.warn("second", &Anomaly::DuplicateField { field: "f".into() });

        assert_eq!(sink.contexts(), vec!["first", "second"]);
        assert_eq!(sink.codes(), vec!["self_parent", "duplicate_field"]);
    }
}

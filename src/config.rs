//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: explicit path, e.g. `pagetree.toml`
//! 3. Environment variables: `PAGETREE_*` prefix

use std::collections::HashMap;
use std::path::Path;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::MaterializeOptions;

/// Prefix of environment variables overriding settings.
pub const ENV_PREFIX: &str = "PAGETREE";

/// Unified configuration for pagetree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Report entries that cannot be placed under the root (default: false)
    pub report_orphan_entries: bool,
    /// Indent rendered JSON (default: true)
    pub pretty_json: bool,
    /// Log filter directive used by the CLI when no -d flag is given
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            report_orphan_entries: false,
            pretty_json: true,
            log_filter: "warn".into(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub report_orphan_entries: Option<bool>,
    pub pretty_json: Option<bool>,
    pub log_filter: Option<String>,
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Options handed to every materialization.
    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            report_orphan_entries: self.report_orphan_entries,
        }
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            report_orphan_entries: overlay
                .report_orphan_entries
                .unwrap_or(self.report_orphan_entries),
            pretty_json: overlay.pretty_json.unwrap_or(self.pretty_json),
            log_filter: overlay
                .log_filter
                .clone()
                .unwrap_or_else(|| self.log_filter.clone()),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional TOML file; it must exist when given
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(config_file, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        config_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        Self::apply_env_overrides(current, env)
    }

    /// Apply PAGETREE_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env);
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_bool("report_orphan_entries") {
            settings.report_orphan_entries = val;
        }
        if let Ok(val) = config.get_bool("pretty_json") {
            settings.pretty_json = val;
        }
        if let Ok(val) = config.get_string("log_filter") {
            settings.log_filter = val;
        }

        Ok(settings)
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented template for a new config file.
    pub fn template() -> String {
        r#"# pagetree configuration
# Environment variables override this file: PAGETREE_<KEY>, e.g. PAGETREE_PRETTY_JSON=false

# Report entries whose parent is unknown or that cannot be reached from the root
report_orphan_entries = false

# Indent rendered JSON
pretty_json = true

# Log filter used when no -d flag is given (tracing EnvFilter syntax)
log_filter = "warn"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

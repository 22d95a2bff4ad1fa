//! JSON configuration: activity templates and the export column spec.

use crate::error::{CliError, CliResult};
use crate::export::ColumnFilter;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "conf/configuration.json";

/// One entry of a template: the blueprint of a single activity, reused
/// across many calendar days. Besides `type` and `time_of_day`, any field
/// accepted by the creation API may appear and is passed through as-is.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ActivityDefinition {
    #[serde(rename = "type")]
    pub activity_type: String,
    /// Plain wall-clock time, `HH:MM`, independent of any calendar date.
    pub time_of_day: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One export column: raw field name, display label, default value used
/// when the raw field is absent or falsy, and an optional named transform.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ColumnSpec {
    pub field: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub default: String,
    #[serde(default)]
    pub filter: Option<ColumnFilter>,
}

impl ColumnSpec {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }
}

/// Columns are an ordered array, not an object keyed by field name: the
/// projector must emit columns in a deterministic order and JSON object
/// ordering is not contractual.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ExportSpec {
    pub columns: Vec<ColumnSpec>,
    #[serde(default = "default_column_separator")]
    pub column_separator: String,
    #[serde(default = "default_row_separator")]
    pub row_separator: String,
}

fn default_column_separator() -> String {
    ";".into()
}

fn default_row_separator() -> String {
    "\n".into()
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Configuration {
    pub templates: HashMap<String, Vec<ActivityDefinition>>,
    pub activities_export: ExportSpec,
}

impl Configuration {
    /// Testable helper that parses a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> CliResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CliError::Config(format!("configuration file not set properly: {e}")))
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    pub fn template(&self, name: &str) -> Option<&[ActivityDefinition]> {
        self.templates.get(name).map(Vec::as_slice)
    }

    /// Template names, sorted for stable display.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Configuration file location, overridable via `STRAVA_BULK_CONFIG`.
pub fn config_path() -> PathBuf {
    std::env::var("STRAVA_BULK_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

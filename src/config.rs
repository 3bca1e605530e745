//! Migration configuration.
//!
//! Every fixed constant of the original migration (path separator, content
//! base path, recognized URL field names, artifact file names) is a
//! serde-defaulted field here, so a `treegraft.toml` can override any of
//! them without code changes.

use crate::error::MigrateError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Names of the three link-index source artifacts inside a target
/// directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFiles {
    /// Primary reference source (the authoritative link extraction).
    #[serde(default = "default_primary_file")]
    pub primary: String,

    /// Secondary cache source, consulted by the fidelity fallback rule.
    #[serde(default = "default_secondary_file")]
    pub secondary: String,

    /// Target (derived) source under validation.
    #[serde(default = "default_target_file")]
    pub target: String,
}

fn default_primary_file() -> String {
    "source-links.json".to_string()
}

fn default_secondary_file() -> String {
    "cache-links.json".to_string()
}

fn default_target_file() -> String {
    "migrated-links.json".to_string()
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            primary: default_primary_file(),
            secondary: default_secondary_file(),
            target: default_target_file(),
        }
    }
}

/// Migration constants and ambient settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Breadcrumb separator used in `path` fields.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Single-character separator accepted in legacy flat rows.
    #[serde(default = "default_legacy_separator")]
    pub legacy_separator: String,

    /// Base content path prefixed to derived fragment URLs.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    /// Delimiter in fragment directory names that stands for a path slash.
    #[serde(default = "default_fragment_delimiter")]
    pub fragment_delimiter: String,

    /// Suffix tried as the second candidate URL during fragment matching.
    #[serde(default = "default_page_suffix")]
    pub page_suffix: String,

    /// Field names whose string values are treated as URL references.
    #[serde(default = "default_url_keys")]
    pub url_keys: Vec<String>,

    /// Placeholder value treated as noise and never indexed.
    #[serde(default = "default_noise_placeholder")]
    pub noise_placeholder: String,

    /// Tree artifact file name inside each fragment directory.
    #[serde(default = "default_fragment_tree_file")]
    pub fragment_tree_file: String,

    /// Link-index artifact names inside each reconcile target directory.
    #[serde(default)]
    pub sources: SourceFiles,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_separator() -> String {
    ">>>".to_string()
}

fn default_legacy_separator() -> String {
    ">".to_string()
}

fn default_base_path() -> String {
    "/content/share/us/en/".to_string()
}

fn default_fragment_delimiter() -> String {
    "__".to_string()
}

fn default_page_suffix() -> String {
    ".html".to_string()
}

fn default_url_keys() -> Vec<String> {
    ["linkURL", "url", "href", "imageUrl", "link"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_noise_placeholder() -> String {
    "hh".to_string()
}

fn default_fragment_tree_file() -> String {
    "hierarchy.json".to_string()
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            legacy_separator: default_legacy_separator(),
            base_path: default_base_path(),
            fragment_delimiter: default_fragment_delimiter(),
            page_suffix: default_page_suffix(),
            url_keys: default_url_keys(),
            noise_placeholder: default_noise_placeholder(),
            fragment_tree_file: default_fragment_tree_file(),
            sources: SourceFiles::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration: explicit file if given, else `treegraft.toml`
    /// in the working directory if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<MigrationConfig, MigrateError> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        let local = Path::new("treegraft.toml");
        if local.is_file() {
            return Self::load_from_file(local);
        }
        Ok(MigrationConfig::default())
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<MigrationConfig, MigrateError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            MigrateError::Config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            MigrateError::Config(format!("invalid config {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_migration_constants() {
        let config = MigrationConfig::default();
        assert_eq!(config.separator, ">>>");
        assert_eq!(config.legacy_separator, ">");
        assert_eq!(config.base_path, "/content/share/us/en/");
        assert_eq!(config.fragment_delimiter, "__");
        assert_eq!(config.page_suffix, ".html");
        assert_eq!(config.noise_placeholder, "hh");
        assert!(config.url_keys.iter().any(|k| k == "linkURL"));
        assert_eq!(config.sources.primary, "source-links.json");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: MigrationConfig = toml::from_str(
            r#"
            separator = "||"

            [sources]
            target = "out-links.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.separator, "||");
        assert_eq!(config.legacy_separator, ">");
        assert_eq!(config.sources.target, "out-links.json");
        assert_eq!(config.sources.primary, "source-links.json");
    }

    #[test]
    fn load_without_explicit_file_uses_defaults() {
        let config = ConfigLoader::load(None).unwrap();
        assert_eq!(config.fragment_tree_file, "hierarchy.json");
    }

    #[test]
    fn load_from_file_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "separator = [not toml").unwrap();
        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}

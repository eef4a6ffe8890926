//! Effective loader configuration with provenance
//!
//! The effective config captures the merged loader configuration plus
//! where each contributing layer came from.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use atlas_meta::Settings;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// Origin of a configuration source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    File,
    Cli,
}

/// A contributing config source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 of the raw file bytes (None for builtin/cli)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Filesystem contract and process-wide defaults used by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoaderConfig {
    pub ignore_suffix: String,
    pub folder_meta_filename: String,
    pub register_parent_filename: String,
    pub folder_parent_filename: String,
    pub asset_meta_suffix: String,
    pub meta_extension: String,
    pub supported_formats: Vec<String>,

    /// Extra glob patterns, matched against paths relative to the root
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Unit used when `load` is not given one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<f64>,

    /// Process-wide default settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_settings: Option<Settings>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let builtin = BuiltinDefaults::default();
        Self {
            ignore_suffix: builtin.ignore_suffix,
            folder_meta_filename: builtin.folder_meta_filename,
            register_parent_filename: builtin.register_parent_filename,
            folder_parent_filename: builtin.folder_parent_filename,
            asset_meta_suffix: builtin.asset_meta_suffix,
            meta_extension: builtin.meta_extension,
            supported_formats: builtin.supported_formats,
            ignore_patterns: Vec::new(),
            unit: None,
            default_settings: None,
        }
    }
}

impl LoaderConfig {
    /// Whether `extension` is an asset format (case-insensitive).
    pub fn is_supported(&self, extension: &str) -> bool {
        self.supported_formats
            .iter()
            .any(|f| f.eq_ignore_ascii_case(extension))
    }

    /// File name of the meta document that belongs to `asset`.
    pub fn asset_meta_filename(&self, asset: &str) -> String {
        format!("{}{}.{}", asset, self.asset_meta_suffix, self.meta_extension)
    }

    fn validate(&self) -> Result<(), ConfigFileError> {
        let required = [
            ("ignore_suffix", &self.ignore_suffix),
            ("folder_meta_filename", &self.folder_meta_filename),
            ("register_parent_filename", &self.register_parent_filename),
            ("folder_parent_filename", &self.folder_parent_filename),
            ("asset_meta_suffix", &self.asset_meta_suffix),
            ("meta_extension", &self.meta_extension),
        ];
        if let Some((key, _)) = required.iter().find(|(_, v)| v.is_empty()) {
            return Err(ConfigFileError::ValidationError(format!(
                "{} must not be empty",
                key
            )));
        }

        if self.supported_formats.is_empty() {
            return Err(ConfigFileError::ValidationError(
                "supported_formats must list at least one format".to_string(),
            ));
        }

        if let Some(unit) = self.unit {
            if !unit.is_finite() || unit <= 0.0 {
                return Err(ConfigFileError::ValidationError(format!(
                    "unit must be a positive number, got {}",
                    unit
                )));
            }
        }

        for pattern in &self.ignore_patterns {
            globset::Glob::new(pattern).map_err(|e| {
                ConfigFileError::ValidationError(format!(
                    "invalid ignore pattern '{}': {}",
                    pattern, e
                ))
            })?;
        }

        Ok(())
    }
}

/// Effective loader configuration with provenance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub loader: LoaderConfig,

    /// Contributing sources in precedence order
    pub sources: Vec<ConfigSource>,
}

impl EffectiveConfig {
    /// Build the effective config from layers
    pub fn build(
        config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigFileError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
            digest: None,
        }];

        if let Some(path) = config_path {
            let (value, digest) = Self::load_toml_file(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
                digest: None,
            });
        }

        let merged = merge_layers(layers);
        let loader: LoaderConfig = serde_json::from_value(merged)
            .map_err(|e| ConfigFileError::ParseError(e.to_string()))?;
        loader.validate()?;

        Ok(Self { loader, sources })
    }

    /// Load and parse a TOML file, returning the value and digest
    fn load_toml_file(path: &Path) -> Result<(Value, String), ConfigFileError> {
        let bytes = fs::read(path)
            .map_err(|e| ConfigFileError::IoError(format!("{}: {}", path.display(), e)))?;

        let digest = hex::encode(Sha256::digest(&bytes));

        let contents = String::from_utf8(bytes)
            .map_err(|e| ConfigFileError::ParseError(format!("Invalid UTF-8: {}", e)))?;
        let value: Value = toml::from_str(&contents)
            .map_err(|e| ConfigFileError::ParseError(format!("TOML parse error: {}", e)))?;

        Ok((value, digest))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Loader configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

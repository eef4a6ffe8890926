//! Built-in loader defaults (layer 1)

use serde::{Deserialize, Serialize};

/// File formats the loader treats as assets, matched case-insensitively.
pub const SUPPORTED_FORMATS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "lbm", "pbm", "pgm", "ppm", "pcx", "pnm", "svg", "tga",
    "tiff", "webp", "xpm",
];

/// Built-in filesystem contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Path segments ending with this suffix are skipped with their subtree
    pub ignore_suffix: String,

    /// Folder-level meta document
    pub folder_meta_filename: String,

    /// Marker whose content registers the folder under a parent ID
    pub register_parent_filename: String,

    /// Marker whose content names the parent ID this folder merges into
    pub folder_parent_filename: String,

    /// `<asset><suffix>.<ext>` is the asset's own meta document
    pub asset_meta_suffix: String,

    pub meta_extension: String,

    pub supported_formats: Vec<String>,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            ignore_suffix: "_ignore".to_string(),
            folder_meta_filename: "folder_meta.toml".to_string(),
            register_parent_filename: "register_parent.meta".to_string(),
            folder_parent_filename: "folder_parent.meta".to_string(),
            asset_meta_suffix: "_meta".to_string(),
            meta_extension: "toml".to_string(),
            supported_formats: SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl BuiltinDefaults {
    /// Convert to a JSON value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "ignore_suffix": self.ignore_suffix,
            "folder_meta_filename": self.folder_meta_filename,
            "register_parent_filename": self.register_parent_filename,
            "folder_parent_filename": self.folder_parent_filename,
            "asset_meta_suffix": self.asset_meta_suffix,
            "meta_extension": self.meta_extension,
            "supported_formats": self.supported_formats,
            "ignore_patterns": [],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let defaults = BuiltinDefaults::default();
        assert_eq!(defaults.ignore_suffix, "_ignore");
        assert_eq!(defaults.folder_meta_filename, "folder_meta.toml");
        assert_eq!(defaults.register_parent_filename, "register_parent.meta");
        assert_eq!(defaults.folder_parent_filename, "folder_parent.meta");
        assert!(defaults.supported_formats.iter().any(|f| f == "webp"));
    }

    #[test]
    fn test_to_value() {
        let value = BuiltinDefaults::default().to_value();
        assert_eq!(value["asset_meta_suffix"], "_meta");
        assert_eq!(value["supported_formats"].as_array().unwrap().len(), 16);
        assert!(value.get("unit").is_none());
    }
}

//! Settings cascade
//!
//! Precedence, highest first:
//! 1. asset meta (`settings`, then `default_settings`)
//! 2. the folder's `children_settings` entry for the asset
//! 3. the folder default (folder meta `default_settings`, else `settings`)
//! 4. the process-wide default
//! 5. the built-in base (`alpha = true`, `smoothscale = false`)

use std::collections::HashSet;

use atlas_meta::{ChildrenSettings, MetaOutput, Settings, SheetSettings};

/// Folder-level cascade state shared by every asset of one folder.
#[derive(Debug, Clone)]
pub struct FolderCascade {
    default: Settings,
    children: ChildrenSettings,
    used: HashSet<String>,
}

impl FolderCascade {
    pub fn new(process_default: &Settings, folder_meta: Option<MetaOutput>) -> Self {
        let (meta_default, children) = match folder_meta {
            Some(meta) => (
                meta.default_settings.or(meta.settings),
                meta.children_settings.unwrap_or_default(),
            ),
            None => (None, ChildrenSettings::new()),
        };

        let default = match meta_default {
            Some(settings) => settings.merge_default(process_default),
            None => process_default.clone(),
        };

        Self {
            default,
            children,
            used: HashSet::new(),
        }
    }

    pub fn folder_default(&self) -> &Settings {
        &self.default
    }

    /// Settings an asset starts from before its own meta is applied.
    pub fn settings_for(&mut self, asset: &str) -> Settings {
        match self.children.get(asset) {
            Some(child) => {
                self.used.insert(asset.to_string());
                child.clone().merge_default(&self.default)
            }
            None => self.default.clone(),
        }
    }

    /// `children_settings` names that matched no asset, in declaration order.
    pub fn unused_children(&self) -> Vec<String> {
        self.children
            .names()
            .filter(|name| !self.used.contains(*name))
            .map(str::to_string)
            .collect()
    }
}

/// Final settings for one asset, and its sheet layout if it is a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPlan {
    pub settings: Settings,
    pub sheet: Option<SheetSettings>,
}

/// Apply an asset's own meta on top of `current` and fill the rest from the
/// built-in base. Sheet coordinate overrides are resolved against the
/// result.
pub fn resolve_asset(current: Settings, asset_meta: Option<MetaOutput>) -> AssetPlan {
    let Some(meta) = asset_meta else {
        return AssetPlan {
            settings: current.merge_default(&Settings::base()),
            sheet: None,
        };
    };

    let mut settings = match meta.default_settings {
        Some(defaults) => defaults.merge_default(&current),
        None => current,
    };
    if let Some(explicit) = meta.settings {
        settings = explicit.merge_default(&settings);
    }
    let settings = settings.merge_default(&Settings::base());

    let sheet = meta.sheet_settings.map(|mut sheet| {
        sheet.resolve_overrides(&settings);
        sheet
    });

    AssetPlan { settings, sheet }
}

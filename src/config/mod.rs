//! Configuration
//!
//! Two concerns live here:
//! - the loader configuration, built from layers (built-in defaults,
//!   optional TOML file, CLI overrides) with provenance
//! - the settings cascade that resolves the final [`Settings`] of an asset
//!
//! [`Settings`]: atlas_meta::Settings

mod cascade;
mod defaults;
mod effective;
mod merge;

pub use cascade::{resolve_asset, AssetPlan, FolderCascade};
pub use defaults::BuiltinDefaults;
pub use effective::{ConfigFileError, ConfigOrigin, ConfigSource, EffectiveConfig, LoaderConfig};
pub use merge::{deep_merge, merge_layers};

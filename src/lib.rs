//! Atlas Loader - image asset loading with declarative settings
//!
//! Walks a directory tree of images, resolves per-asset settings through a
//! folder/asset cascade, slices sprite sheets into addressable cells and
//! keeps the results in a registry whose handles survive reloads.

pub mod backend;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod registry;
pub mod sheet;

pub use atlas_meta::{
    ChildrenSettings, ColorKey, Coord, MetaContext, MetaError, Scale, Settings, SheetSettings,
};
pub use backend::{ImageBackend, RasterBackend, RasterSurface};
pub use config::{EffectiveConfig, LoaderConfig};
pub use error::{ConfigError, ErrorKind, GeometryError, LoadError, LookupError, SetupError};
pub use hierarchy::{AssetDescriptor, FolderDescriptor, HierarchyBuilder, IgnoreRules};
pub use registry::{Image, LoadReport, Registry};

//! Artifact registry.
//!
//! Owns the built images, keyed by qualified name (`folder/asset`, or
//! `folder/asset(column,row)` for sheet cells), together with folder and
//! sheet membership. Handles returned by lookups stay valid across
//! `load`, `reload` and `refresh`.

mod build;
mod image;
mod lookup;
mod report;

pub use image::{Image, ImageData};
pub use report::{Advisory, AdvisoryKind, LoadReport};

use std::path::{Path, PathBuf};

use atlas_meta::{Coord, Settings};

use crate::backend::{ImageBackend, RasterBackend};
use crate::config::{ConfigFileError, LoaderConfig};
use crate::error::{LoadError, SetupError};
use crate::hierarchy::{FolderDescriptor, HierarchyBuilder, IgnoreRules};
use build::{BuildPass, Store};

/// `folder/asset`
pub fn qualified_name(folder: &str, asset: &str) -> String {
    format!("{}/{}", folder, asset)
}

/// `folder/asset(column,row)`
pub fn cell_name(sheet: &str, coord: Coord) -> String {
    format!("{}({},{})", sheet, coord.0, coord.1)
}

type RefreshCallback = Box<dyn FnMut()>;

/// Loaded images and the state needed to rebuild them.
pub struct Registry<B: ImageBackend = RasterBackend> {
    backend: B,
    config: LoaderConfig,
    ignore: IgnoreRules,
    unit: Option<f64>,
    default_settings: Settings,
    root: Option<PathBuf>,
    folders: Vec<FolderDescriptor>,
    store: Store<B::Surface>,
    refresh_callbacks: Vec<RefreshCallback>,
}

impl Registry<RasterBackend> {
    pub fn new() -> Self {
        Self::with_backend(RasterBackend)
    }
}

impl Default for Registry<RasterBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ImageBackend> Registry<B> {
    pub fn with_backend(backend: B) -> Self {
        let config = LoaderConfig::default();
        let ignore = IgnoreRules::new(&config.ignore_suffix);
        Self {
            backend,
            config,
            ignore,
            unit: None,
            default_settings: Settings::default(),
            root: None,
            folders: Vec::new(),
            store: Store::default(),
            refresh_callbacks: Vec::new(),
        }
    }

    /// Registry using `config` for discovery, the default unit and the
    /// process-wide default settings.
    pub fn with_config(backend: B, config: LoaderConfig) -> Result<Self, ConfigFileError> {
        let ignore = IgnoreRules::new(&config.ignore_suffix)
            .with_patterns(&config.ignore_patterns)
            .map_err(|e| ConfigFileError::ValidationError(e.to_string()))?;
        let mut registry = Self::with_backend(backend);
        registry.unit = config.unit;
        registry.default_settings = config.default_settings.clone().unwrap_or_default();
        registry.ignore = ignore;
        registry.config = config;
        Ok(registry)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_unit(&mut self, unit: f64) {
        self.unit = Some(unit);
    }

    pub fn unit(&self) -> Result<f64, SetupError> {
        self.unit.ok_or(SetupError::UnitNotSet)
    }

    /// Replace the process-wide default settings used below folder defaults.
    pub fn set_default_settings(&mut self, settings: Settings) {
        self.default_settings = settings;
    }

    pub fn default_settings(&self) -> &Settings {
        &self.default_settings
    }

    /// Run `callback` at the end of every `reload` and `refresh`, after
    /// the callbacks registered before it.
    pub fn register_refresh<F>(&mut self, callback: F)
    where
        F: FnMut() + 'static,
    {
        self.refresh_callbacks.push(Box::new(callback));
    }

    /// Walk `folder`, then build every asset found.
    pub fn load(&mut self, folder: impl AsRef<Path>, unit: Option<f64>) -> Result<LoadReport, LoadError> {
        if let Some(unit) = unit {
            self.set_unit(unit);
        }
        let unit = self.unit()?;
        let folder = folder.as_ref();
        if !folder.exists() {
            return Err(SetupError::MissingFolder(folder.to_path_buf()).into());
        }
        self.root = Some(folder.to_path_buf());

        let folders = HierarchyBuilder::new(&self.config, &self.ignore).build(folder)?;
        log::debug!("discovered {} folder(s) under {}", folders.len(), folder.display());
        self.folders = folders;

        let report = self.build(folder, unit)?;
        log::info!("loaded {}: {}", folder.display(), report.human_summary());
        Ok(report)
    }

    /// `load` the remembered root again, then run the refresh callbacks.
    pub fn reload(&mut self, unit: Option<f64>) -> Result<LoadReport, LoadError> {
        if let Some(unit) = unit {
            self.set_unit(unit);
        }
        let root = self.root.clone().ok_or(SetupError::NotLoaded)?;
        let report = self.load(&root, None)?;
        self.run_callbacks();
        Ok(report)
    }

    /// Rebuild the known folders without walking the tree again, then run
    /// the refresh callbacks. New or removed folders are not noticed.
    pub fn refresh(&mut self, unit: Option<f64>) -> Result<LoadReport, LoadError> {
        if let Some(unit) = unit {
            self.set_unit(unit);
        }
        let unit = self.unit()?;
        let root = self.root.clone().ok_or(SetupError::NotLoaded)?;

        let report = self.build(&root, unit)?;
        log::info!("refreshed {}: {}", root.display(), report.human_summary());
        self.run_callbacks();
        Ok(report)
    }

    /// Root given to the last `load`.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Folder descriptors from the last walk.
    pub fn descriptors(&self) -> &[FolderDescriptor] {
        &self.folders
    }

    /// Folder names in the order they were first built.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.store.folder_order.iter().map(String::as_str)
    }

    /// Asset names of `folder` in discovery order. Empty for an unknown folder.
    pub fn images_in(&self, folder: &str) -> impl Iterator<Item = &str> {
        self.store
            .folder_images
            .get(folder)
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.store.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.images.is_empty()
    }

    fn build(&mut self, root: &Path, unit: f64) -> Result<LoadReport, LoadError> {
        let pass = BuildPass {
            backend: &self.backend,
            config: &self.config,
            unit,
            default_settings: &self.default_settings,
        };
        pass.run(root, &self.folders, &mut self.store)
    }

    fn run_callbacks(&mut self) {
        for callback in self.refresh_callbacks.iter_mut() {
            callback();
        }
    }
}

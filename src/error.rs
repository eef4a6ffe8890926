//! Error taxonomy for loading and lookup.

use std::path::PathBuf;

use atlas_meta::MetaError;

use crate::backend::BackendError;

/// Broad category of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or contradictory folder/asset configuration
    Config,
    /// Loader used before it was set up
    Setup,
    /// Sheet layout does not fit the image
    Geometry,
    /// The image backend failed
    Backend,
    /// Filesystem access failed
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Config => "CONFIG",
            ErrorKind::Setup => "SETUP",
            ErrorKind::Geometry => "GEOMETRY",
            ErrorKind::Backend => "BACKEND",
            ErrorKind::Io => "IO",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Configuration found on disk is malformed or contradictory.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Illegal character in parent ID '{ch}', allowed characters are '{allowed}'")]
    IllegalParentIdChar { ch: char, allowed: &'static str },

    #[error("Parent ID '{id}' was already registered by folder '{owner}'")]
    DuplicateParentId { id: String, owner: PathBuf },

    #[error(
        "Folder '{folder}' can't have parent with ID '{id}' as it does not exist. \
         Did you register the ID in a subfolder of this one?"
    )]
    UnknownParentId { id: String, folder: PathBuf },

    #[error(
        "Folder '{0}' which declares a parent ID can't have a folder meta as it's handled by the parent folder"
    )]
    MetaWithParent(PathBuf),

    #[error("Folder name '{name}' is used by both '{first}' and '{second}'")]
    DuplicateFolderName {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Asset name '{name}' in folder '{folder}' is used by both '{first}' and '{second}'")]
    DuplicateAssetName {
        folder: String,
        name: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Meta '{path}': {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: MetaError,
    },
}

/// The loader was used before it had what it needs.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("Unit was not set")]
    UnitNotSet,

    #[error("Folder '{0}' does not exist")]
    MissingFolder(PathBuf),

    #[error("Cannot reload without loading once")]
    NotLoaded,
}

/// A sheet layout does not fit the image it slices.
#[derive(Debug, thiserror::Error)]
#[error(
    "Sheet '{sheet}' layout has too many rows or columns compared to pixels \
     ({rows} rows, {columns} columns for a {width}x{height} image)"
)]
pub struct GeometryError {
    pub sheet: String,
    pub rows: u32,
    pub columns: u32,
    pub width: u32,
    pub height: u32,
}

/// A lookup missed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Image '{0}' does not exist")]
    Image(String),

    #[error("Folder '{0}' does not exist")]
    Folder(String),

    #[error("Sheet '{0}' does not exist")]
    Sheet(String),
}

/// Errors raised by `load`, `reload` and `refresh`.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("IO error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Config(_) => ErrorKind::Config,
            LoadError::Setup(_) => ErrorKind::Setup,
            LoadError::Geometry(_) => ErrorKind::Geometry,
            LoadError::Backend(_) => ErrorKind::Backend,
            LoadError::Io { .. } | LoadError::Walk(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            source,
        }
    }
}

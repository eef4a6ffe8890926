//! Folder hierarchy discovery.
//!
//! Walks an asset tree top-down and produces one [`FolderDescriptor`] per
//! folder that ends up holding assets. Folders that name a parent through a
//! marker file hand their assets to that parent and disappear from the
//! result.

mod ignore;
mod markers;

pub use ignore::{IgnoreError, IgnoreRules};
pub use markers::{read_marker, validate_parent_id, ParentRegistry, ALLOWED_ID_CHARS};

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::LoaderConfig;
use crate::error::{ConfigError, LoadError};

/// One image file and where it is registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDescriptor {
    pub path: PathBuf,
    /// File stem, the second half of the qualified name
    pub name: String,
    /// Folder the asset is registered under (the parent after merging)
    pub folder: String,
    pub has_sibling_meta: bool,
}

impl AssetDescriptor {
    /// The asset's own meta document, next to the image file.
    pub fn meta_path(&self, config: &LoaderConfig) -> PathBuf {
        self.path.with_file_name(config.asset_meta_filename(&self.name))
    }
}

impl fmt::Display for AssetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Asset(path={}, name={}, folder={}{})",
            self.path.display(),
            self.name,
            self.folder,
            if self.has_sibling_meta { ", has meta" } else { "" }
        )
    }
}

/// A discovered folder and the assets registered under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderDescriptor {
    pub path: PathBuf,
    pub name: String,
    pub has_folder_meta: bool,
    pub assets: Vec<AssetDescriptor>,
}

impl FolderDescriptor {
    pub fn meta_path(&self, config: &LoaderConfig) -> PathBuf {
        self.path.join(&config.folder_meta_filename)
    }
}

impl fmt::Display for FolderDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Folder(path={}, name={}{}) {{",
            self.path.display(),
            self.name,
            if self.has_folder_meta { ", has meta" } else { "" }
        )?;
        for asset in &self.assets {
            writeln!(f, "\t{}", asset)?;
        }
        write!(f, "}}")
    }
}

/// Last path segment, used as the folder's registry name.
pub fn folder_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
    }
}

/// What one directory contributes before merging.
struct Visit {
    has_folder_meta: bool,
    registered_id: Option<String>,
    parent_id: Option<String>,
    assets: Vec<AssetDescriptor>,
}

/// Builds the folder list for one asset root.
pub struct HierarchyBuilder<'a> {
    config: &'a LoaderConfig,
    ignore: &'a IgnoreRules,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(config: &'a LoaderConfig, ignore: &'a IgnoreRules) -> Self {
        Self { config, ignore }
    }

    /// Walk `root` and return every folder that holds at least one asset.
    pub fn build(&self, root: &Path) -> Result<Vec<FolderDescriptor>, LoadError> {
        let mut pending: Vec<FolderDescriptor> = Vec::new();
        let mut parents = ParentRegistry::new();

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
                let skip = if entry.depth() == 0 {
                    self.ignore.is_ignored_name(entry.file_name())
                } else {
                    self.ignore.is_ignored(rel)
                };
                if skip {
                    log::debug!("ignoring {}", entry.path().display());
                }
                !skip
            });

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_dir() {
                continue;
            }
            let dir = entry.path();
            let visit = self.visit(root, dir)?;

            if visit.has_folder_meta && visit.parent_id.is_some() {
                return Err(ConfigError::MetaWithParent(dir.to_path_buf()).into());
            }

            let target = match &visit.parent_id {
                Some(id) => {
                    let index = parents.resolve(id, dir)?;
                    let parent = &mut pending[index];
                    log::debug!(
                        "merging {} asset(s) from {} into {}",
                        visit.assets.len(),
                        dir.display(),
                        parent.path.display()
                    );
                    for mut asset in visit.assets {
                        asset.folder = parent.name.clone();
                        parent.assets.push(asset);
                    }
                    index
                }
                None => {
                    let name = folder_name(dir);
                    let assets = visit
                        .assets
                        .into_iter()
                        .map(|asset| AssetDescriptor {
                            folder: name.clone(),
                            ..asset
                        })
                        .collect();
                    pending.push(FolderDescriptor {
                        path: dir.to_path_buf(),
                        name,
                        has_folder_meta: visit.has_folder_meta,
                        assets,
                    });
                    pending.len() - 1
                }
            };

            // A child that registers an ID aliases its parent.
            if let Some(id) = visit.registered_id {
                parents.register(id, target, dir)?;
            }
        }

        let folders: Vec<FolderDescriptor> =
            pending.into_iter().filter(|f| !f.assets.is_empty()).collect();

        let mut seen: HashMap<&str, &Path> = HashMap::new();
        for folder in &folders {
            if let Some(first) = seen.insert(&folder.name, &folder.path) {
                return Err(ConfigError::DuplicateFolderName {
                    name: folder.name.clone(),
                    first: first.to_path_buf(),
                    second: folder.path.clone(),
                }
                .into());
            }
        }

        for folder in &folders {
            let mut seen: HashMap<&str, &Path> = HashMap::new();
            for asset in &folder.assets {
                if let Some(first) = seen.insert(&asset.name, &asset.path) {
                    return Err(ConfigError::DuplicateAssetName {
                        folder: folder.name.clone(),
                        name: asset.name.clone(),
                        first: first.to_path_buf(),
                        second: asset.path.clone(),
                    }
                    .into());
                }
            }
        }

        Ok(folders)
    }

    /// Classify the files of one directory.
    fn visit(&self, root: &Path, dir: &Path) -> Result<Visit, LoadError> {
        let config = self.config;
        let mut visit = Visit {
            has_folder_meta: false,
            registered_id: None,
            parent_id: None,
            assets: Vec::new(),
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| LoadError::io(dir, e))? {
            let entry = entry.map_err(|e| LoadError::io(dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| LoadError::io(entry.path(), e))?
                .is_file();
            if is_file {
                files.push(entry.path());
            }
        }
        files.sort();

        for path in files {
            let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
                continue;
            };

            if file_name == config.folder_meta_filename {
                visit.has_folder_meta = true;
            } else if file_name == config.register_parent_filename {
                visit.registered_id = Some(read_marker(&path)?);
            } else if file_name == config.folder_parent_filename {
                visit.parent_id = Some(read_marker(&path)?);
            } else {
                let rel = path.strip_prefix(root).unwrap_or(&path);
                if self.ignore.is_ignored(rel) {
                    continue;
                }
                if let Some(asset) = self.classify_asset(&path) {
                    visit.assets.push(asset);
                }
            }
        }

        Ok(visit)
    }

    fn classify_asset(&self, path: &Path) -> Option<AssetDescriptor> {
        let config = self.config;
        let stem = path.file_stem()?.to_string_lossy().into_owned();
        let extension = path.extension()?.to_string_lossy().into_owned();

        if stem.ends_with(config.ignore_suffix.as_str()) {
            return None;
        }
        if extension.eq_ignore_ascii_case(&config.meta_extension)
            && stem.ends_with(config.asset_meta_suffix.as_str())
        {
            return None;
        }
        if !config.is_supported(&extension) {
            return None;
        }

        let has_sibling_meta = path
            .with_file_name(config.asset_meta_filename(&stem))
            .is_file();
        Some(AssetDescriptor {
            path: path.to_path_buf(),
            name: stem,
            folder: String::new(),
            has_sibling_meta,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn build(root: &Path) -> Result<Vec<FolderDescriptor>, LoadError> {
        let config = LoaderConfig::default();
        let ignore = IgnoreRules::new(&config.ignore_suffix);
        HierarchyBuilder::new(&config, &ignore).build(root)
    }

    fn asset_names(folder: &FolderDescriptor) -> Vec<&str> {
        folder.assets.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_classifies_files() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "ui/button.PNG", "");
        touch(&root, "ui/button_meta.toml", "[settings]\n");
        touch(&root, "ui/notes.txt", "");
        touch(&root, "ui/draft_ignore.png", "");
        touch(&root, "ui/folder_meta.toml", "");
        touch(&root, "ui/icon.webp", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders.len(), 1);

        let ui = &folders[0];
        assert_eq!(ui.name, "ui");
        assert!(ui.has_folder_meta);
        assert_eq!(asset_names(ui), vec!["button", "icon"]);
        assert!(ui.assets[0].has_sibling_meta);
        assert!(!ui.assets[1].has_sibling_meta);
        assert_eq!(ui.assets[0].folder, "ui");
    }

    #[test]
    fn test_ignored_subtree() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "tiles/grass.png", "");
        touch(&root, "cache_ignore/hero.png", "");
        touch(&root, "cache_ignore/nested/other.png", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "tiles");
    }

    #[test]
    fn test_parent_merge() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "A/register_parent.meta", "x");
        touch(&root, "A/a1.png", "");
        touch(&root, "A/B/folder_parent.meta", "x\n");
        touch(&root, "A/B/b1.png", "");
        touch(&root, "A/B/b2.png", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders.len(), 1);
        let a = &folders[0];
        assert_eq!(a.name, "A");
        assert_eq!(asset_names(a), vec!["a1", "b1", "b2"]);
        assert!(a.assets.iter().all(|asset| asset.folder == "A"));
        assert!(a.assets[1].path.ends_with("A/B/b1.png"));
    }

    #[test]
    fn test_child_registration_aliases_parent() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "A/register_parent.meta", "x");
        touch(&root, "A/a.png", "");
        touch(&root, "A/B/folder_parent.meta", "x");
        touch(&root, "A/B/register_parent.meta", "y");
        touch(&root, "A/B/C/folder_parent.meta", "y");
        touch(&root, "A/B/C/c.png", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(asset_names(&folders[0]), vec!["a", "c"]);
    }

    #[test]
    fn test_unregistered_parent() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "B/folder_parent.meta", "x");
        touch(&root, "B/b.png", "");

        let err = build(&root).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::UnknownParentId { ref id, .. }) if id == "x"
        ));
    }

    #[test]
    fn test_parent_registered_later_is_unknown() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        // "a" is visited before "b"
        touch(&root, "a/folder_parent.meta", "x");
        touch(&root, "a/one.png", "");
        touch(&root, "b/register_parent.meta", "x");
        touch(&root, "b/two.png", "");

        assert!(matches!(
            build(&root),
            Err(LoadError::Config(ConfigError::UnknownParentId { .. }))
        ));
    }

    #[test]
    fn test_duplicate_parent_id() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "a/register_parent.meta", "x");
        touch(&root, "b/register_parent.meta", "x");

        let err = build(&root).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Config(ConfigError::DuplicateParentId { .. })
        ));
        assert!(err.to_string().contains("assets/a"));
    }

    #[test]
    fn test_meta_with_parent() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "a/register_parent.meta", "x");
        touch(&root, "a/b/folder_parent.meta", "x");
        touch(&root, "a/b/folder_meta.toml", "");

        assert!(matches!(
            build(&root),
            Err(LoadError::Config(ConfigError::MetaWithParent(_)))
        ));
    }

    #[test]
    fn test_illegal_marker_character() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "a/register_parent.meta", "x y");

        let err = build(&root).unwrap_err();
        assert!(err.to_string().contains("Illegal character in parent ID ' '"));
    }

    #[test]
    fn test_empty_folders_dropped() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "empty/readme.md", "");
        touch(&root, "full/x.png", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "full");
    }

    #[test]
    fn test_duplicate_folder_names() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "a/icons/x.png", "");
        touch(&root, "b/icons/y.png", "");

        assert!(matches!(
            build(&root),
            Err(LoadError::Config(ConfigError::DuplicateFolderName { .. }))
        ));
    }

    #[test]
    fn test_duplicate_asset_stem() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "ui/hero.bmp", "");
        touch(&root, "ui/hero.png", "");

        match build(&root) {
            Err(LoadError::Config(ConfigError::DuplicateAssetName {
                folder,
                name,
                first,
                second,
            })) => {
                assert_eq!(folder, "ui");
                assert_eq!(name, "hero");
                assert!(first.ends_with("ui/hero.bmp"));
                assert!(second.ends_with("ui/hero.png"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_asset_from_child() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets");
        touch(&root, "A/register_parent.meta", "x");
        touch(&root, "A/x.png", "");
        touch(&root, "A/B/folder_parent.meta", "x");
        touch(&root, "A/B/x.png", "");

        let err = build(&root).unwrap_err();
        match &err {
            LoadError::Config(ConfigError::DuplicateAssetName { folder, first, second, .. }) => {
                assert_eq!(folder, "A");
                assert!(first.ends_with("A/x.png"));
                assert!(second.ends_with("A/B/x.png"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(err.to_string().starts_with("Asset name 'x' in folder 'A'"));
    }

    #[test]
    fn test_ignored_root() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("assets_ignore");
        touch(&root, "logo.png", "");
        touch(&root, "ui/button.png", "");

        assert!(build(&root).unwrap().is_empty());
    }

    #[test]
    fn test_root_assets_use_root_name() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("sprites");
        touch(&root, "logo.png", "");

        let folders = build(&root).unwrap();
        assert_eq!(folders[0].name, "sprites");
        assert_eq!(folders[0].assets[0].folder, "sprites");
    }

    #[test]
    fn test_display() {
        let folder = FolderDescriptor {
            path: PathBuf::from("assets/ui"),
            name: "ui".to_string(),
            has_folder_meta: true,
            assets: vec![AssetDescriptor {
                path: PathBuf::from("assets/ui/button.png"),
                name: "button".to_string(),
                folder: "ui".to_string(),
                has_sibling_meta: false,
            }],
        };
        let text = folder.to_string();
        assert!(text.starts_with("Folder(path=assets/ui, name=ui, has meta) {"));
        assert!(text.contains("\tAsset(path=assets/ui/button.png, name=button, folder=ui)"));
    }
}

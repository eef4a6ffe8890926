//! One build pass: meta evaluation, cascade and materialization for a
//! known folder list.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::Utc;

use atlas_meta::{evaluate, Coord, MetaContext, MetaOutput, Settings, SheetSettings};

use super::image::{Image, ImageData};
use super::report::{Advisory, AdvisoryKind, LoadReport};
use super::{cell_name, qualified_name};
use crate::backend::{decode_raw, render, ImageBackend};
use crate::config::{resolve_asset, FolderCascade, LoaderConfig};
use crate::error::{ConfigError, LoadError};
use crate::hierarchy::{AssetDescriptor, FolderDescriptor};
use crate::sheet::slice;

/// Artifacts and membership kept across passes.
pub(crate) struct Store<S> {
    pub images: HashMap<String, Image<S>>,
    pub folder_images: HashMap<String, Vec<String>>,
    pub folder_order: Vec<String>,
    pub sheets: HashMap<String, Vec<Coord>>,
}

impl<S> Default for Store<S> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            folder_images: HashMap::new(),
            folder_order: Vec::new(),
            sheets: HashMap::new(),
        }
    }
}

impl<S> Store<S> {
    /// Refresh the handle for `name` in place, or create it.
    fn put(&mut self, name: &str, data: ImageData<S>) {
        match self.images.get(name) {
            Some(image) => image.replace(data),
            None => {
                self.images.insert(name.to_string(), Image::new(data));
            }
        }
    }

    fn set_members(&mut self, folder: &str, members: Vec<String>) {
        if !self.folder_images.contains_key(folder) {
            self.folder_order.push(folder.to_string());
        }
        self.folder_images.insert(folder.to_string(), members);
    }
}

fn read_meta(path: &Path, context: MetaContext) -> Result<MetaOutput, LoadError> {
    let source = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    evaluate(&source, context).map_err(|source| {
        LoadError::from(ConfigError::Meta {
            path: path.to_path_buf(),
            source,
        })
    })
}

pub(crate) struct BuildPass<'a, B: ImageBackend> {
    pub backend: &'a B,
    pub config: &'a LoaderConfig,
    pub unit: f64,
    pub default_settings: &'a Settings,
}

impl<'a, B: ImageBackend> BuildPass<'a, B> {
    pub fn run(
        &self,
        root: &Path,
        folders: &[FolderDescriptor],
        store: &mut Store<B::Surface>,
    ) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::new(root.to_path_buf());
        let mut touched = HashSet::new();

        for folder in folders {
            self.build_folder(folder, store, &mut touched, &mut report)?;
        }

        let mut stale: Vec<String> = store
            .images
            .keys()
            .filter(|name| !touched.contains(*name))
            .cloned()
            .collect();
        stale.sort();

        report.stale = stale;
        report.images = touched.len();
        report.loaded_at = Utc::now();
        Ok(report)
    }

    fn build_folder(
        &self,
        folder: &FolderDescriptor,
        store: &mut Store<B::Surface>,
        touched: &mut HashSet<String>,
        report: &mut LoadReport,
    ) -> Result<(), LoadError> {
        let folder_meta = if folder.has_folder_meta {
            Some(read_meta(&folder.meta_path(self.config), MetaContext::Folder)?)
        } else {
            None
        };
        let mut cascade = FolderCascade::new(self.default_settings, folder_meta);

        let mut members = Vec::with_capacity(folder.assets.len());
        for asset in &folder.assets {
            let current = cascade.settings_for(&asset.name);
            let asset_meta = if asset.has_sibling_meta {
                Some(read_meta(&asset.meta_path(self.config), MetaContext::Asset)?)
            } else {
                None
            };
            let plan = resolve_asset(current, asset_meta);
            let name = qualified_name(&folder.name, &asset.name);

            match plan.sheet {
                Some(sheet) => {
                    for (column, row) in sheet.outside_grid() {
                        let advisory = Advisory {
                            kind: AdvisoryKind::OutsideGrid {
                                column,
                                row,
                                columns: sheet.columns,
                                rows: sheet.rows,
                            },
                            folder: folder.name.clone(),
                            folder_path: folder.path.clone(),
                            asset: asset.name.clone(),
                        };
                        log::warn!("{}", advisory);
                        report.advisories.push(advisory);
                    }
                    self.build_sheet(asset, &name, &sheet, &plan.settings, store, touched)?;
                    report.sheets.push(name);
                }
                None => self.build_plain(asset, &name, plan.settings, store, touched)?,
            }
            members.push(asset.name.clone());
        }
        store.set_members(&folder.name, members);

        for unused in cascade.unused_children() {
            let advisory = Advisory {
                kind: AdvisoryKind::UnknownChild,
                folder: folder.name.clone(),
                folder_path: folder.path.clone(),
                asset: unused,
            };
            log::warn!("{}", advisory);
            report.advisories.push(advisory);
        }

        report.folders.push(folder.name.clone());
        Ok(())
    }

    fn build_plain(
        &self,
        asset: &AssetDescriptor,
        name: &str,
        settings: Settings,
        store: &mut Store<B::Surface>,
        touched: &mut HashSet<String>,
    ) -> Result<(), LoadError> {
        let raw = decode_raw(self.backend, &asset.path, &settings)?;
        let surface = render(self.backend, raw.clone(), &settings, self.unit);
        let data = ImageData::new(self.backend, raw, surface, settings);
        log::debug!("built {} ({}x{})", name, data.width, data.height);

        store.put(name, data);
        // No longer sliced if it was a sheet before.
        store.sheets.remove(name);
        touched.insert(name.to_string());
        Ok(())
    }

    fn build_sheet(
        &self,
        asset: &AssetDescriptor,
        name: &str,
        sheet: &SheetSettings,
        settings: &Settings,
        store: &mut Store<B::Surface>,
        touched: &mut HashSet<String>,
    ) -> Result<(), LoadError> {
        let raw = decode_raw(self.backend, &asset.path, settings)?;
        let (width, height) = self.backend.dimensions(&raw);
        let cells = slice(name, width, height, sheet, settings)?;

        let mut coords = Vec::with_capacity(cells.len());
        for cell in cells {
            let cell_raw = self.backend.subregion(&raw, cell.region);
            let surface = render(self.backend, cell_raw.clone(), cell.settings, self.unit);
            let qualified = cell_name(name, cell.coord);

            store.put(
                &qualified,
                ImageData::new(self.backend, cell_raw, surface, cell.settings.clone()),
            );
            touched.insert(qualified);
            coords.push(cell.coord);
        }
        log::debug!(
            "sliced {} into {}x{} cells",
            name,
            sheet.columns,
            sheet.rows
        );

        store.sheets.insert(name.to_string(), coords);
        Ok(())
    }
}

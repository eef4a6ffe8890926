//! Lookup by qualified name, folder membership and sheet membership.
//!
//! Every `get*` call reports a miss as a [`LookupError`]; the matching
//! `find*` call returns `None` so the caller can substitute its own value.

use atlas_meta::Coord;

use super::image::Image;
use super::{cell_name, qualified_name, Registry};
use crate::backend::ImageBackend;
use crate::error::LookupError;

impl<B: ImageBackend> Registry<B> {
    pub fn find(&self, name: &str) -> Option<Image<B::Surface>> {
        self.store.images.get(name).cloned()
    }

    pub fn get(&self, name: &str) -> Result<Image<B::Surface>, LookupError> {
        self.find(name)
            .ok_or_else(|| LookupError::Image(name.to_string()))
    }

    /// Several images at once; fails on the first miss.
    pub fn gets<I, S>(&self, names: I) -> Result<Vec<Image<B::Surface>>, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| self.get(name.as_ref())).collect()
    }

    pub fn find_each<I, S>(&self, names: I) -> Vec<Option<Image<B::Surface>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names.into_iter().map(|name| self.find(name.as_ref())).collect()
    }

    /// Images of `folder` by asset name.
    pub fn get_from<I, S>(&self, folder: &str, names: I) -> Result<Vec<Image<B::Surface>>, LookupError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.get(&qualified_name(folder, name.as_ref())))
            .collect()
    }

    pub fn find_from<I, S>(&self, folder: &str, names: I) -> Vec<Option<Image<B::Surface>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.find(&qualified_name(folder, name.as_ref())))
            .collect()
    }

    /// Every image of `folder` in membership order. A sheet contributes
    /// its cells in enumeration order.
    pub fn get_all(&self, folder: &str) -> Result<Vec<Image<B::Surface>>, LookupError> {
        let members = self
            .member_names(folder)
            .ok_or_else(|| LookupError::Folder(folder.to_string()))?;
        members.iter().map(|name| self.get(name)).collect()
    }

    pub fn find_all(&self, folder: &str) -> Option<Vec<Image<B::Surface>>> {
        let members = self.member_names(folder)?;
        Some(members.iter().filter_map(|name| self.find(name)).collect())
    }

    /// Cells of `sheet` paired with their (column, row) coordinate, row-major.
    pub fn get_sheet(&self, sheet: &str) -> Result<Vec<(Coord, Image<B::Surface>)>, LookupError> {
        let coords = self
            .store
            .sheets
            .get(sheet)
            .ok_or_else(|| LookupError::Sheet(sheet.to_string()))?;
        coords
            .iter()
            .map(|&coord| self.get(&cell_name(sheet, coord)).map(|image| (coord, image)))
            .collect()
    }

    pub fn find_sheet(&self, sheet: &str) -> Option<Vec<(Coord, Image<B::Surface>)>> {
        let coords = self.store.sheets.get(sheet)?;
        Some(
            coords
                .iter()
                .filter_map(|&coord| Some((coord, self.find(&cell_name(sheet, coord))?)))
                .collect(),
        )
    }

    pub fn exists<I, S>(&self, names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .all(|name| self.store.images.contains_key(name.as_ref()))
    }

    pub fn exists_folder<I, S>(&self, folders: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        folders
            .into_iter()
            .all(|folder| self.store.folder_images.contains_key(folder.as_ref()))
    }

    pub fn exists_sheet<I, S>(&self, sheets: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        sheets
            .into_iter()
            .all(|sheet| self.store.sheets.contains_key(sheet.as_ref()))
    }

    /// Whether `sheet` exists and holds every coordinate in `coords`.
    pub fn sheet_has<I>(&self, sheet: &str, coords: I) -> bool
    where
        I: IntoIterator<Item = Coord>,
    {
        match self.store.sheets.get(sheet) {
            Some(known) => coords.into_iter().all(|coord| known.contains(&coord)),
            None => false,
        }
    }

    fn member_names(&self, folder: &str) -> Option<Vec<String>> {
        let members = self.store.folder_images.get(folder)?;
        let mut names = Vec::with_capacity(members.len());
        for asset in members {
            let name = qualified_name(folder, asset);
            match self.store.sheets.get(&name) {
                Some(coords) => names.extend(coords.iter().map(|&coord| cell_name(&name, coord))),
                None => names.push(name),
            }
        }
        Some(names)
    }
}

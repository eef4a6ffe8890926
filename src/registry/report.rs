//! Load report returned by `load`, `reload` and `refresh`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// What an [`Advisory`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryKind {
    /// A `children_settings` entry named no asset of its folder
    UnknownChild,
    /// A sheet coordinate override lies outside the sheet's grid
    OutsideGrid {
        column: u32,
        row: u32,
        columns: u32,
        rows: u32,
    },
}

/// Settings that were accepted but never applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub kind: AdvisoryKind,
    pub folder: String,
    pub folder_path: PathBuf,
    pub asset: String,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AdvisoryKind::UnknownChild => write!(
                f,
                "Children settings in '{}' specifies settings for the asset '{}' which does not exist",
                self.folder_path.display(),
                self.asset
            ),
            AdvisoryKind::OutsideGrid {
                column,
                row,
                columns,
                rows,
            } => write!(
                f,
                "Sheet '{}/{}' has settings for coordinate ({}, {}) outside its {}x{} grid",
                self.folder, self.asset, column, row, columns, rows
            ),
        }
    }
}

/// What one build pass produced.
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub root: PathBuf,

    /// When the pass finished
    pub loaded_at: DateTime<Utc>,

    /// Folders built, in traversal order
    pub folders: Vec<String>,

    /// Number of images built or refreshed, sheet cells included
    pub images: usize,

    /// Qualified names of the sheets built
    pub sheets: Vec<String>,

    pub advisories: Vec<Advisory>,

    /// Qualified names held from an earlier pass that this pass did not
    /// rebuild. They stay in the registry with their last content.
    pub stale: Vec<String>,
}

impl LoadReport {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            loaded_at: Utc::now(),
            folders: Vec::new(),
            images: 0,
            sheets: Vec::new(),
            advisories: Vec::new(),
            stale: Vec::new(),
        }
    }

    pub fn human_summary(&self) -> String {
        let mut summary = format!(
            "{} image(s) in {} folder(s), {} sheet(s)",
            self.images,
            self.folders.len(),
            self.sheets.len()
        );
        if !self.advisories.is_empty() {
            summary.push_str(&format!(", {} advisory(ies)", self.advisories.len()));
        }
        if !self.stale.is_empty() {
            summary.push_str(&format!(", {} stale", self.stale.len()));
        }
        summary
    }
}

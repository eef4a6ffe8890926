//! Declarative meta documents for image assets.
//!
//! A meta document registers at most one value in each of four slots
//! (`settings`, `default_settings`, `sheet_settings`, `children_settings`).
//! Folder and asset documents are evaluated in different contexts, and each
//! context forbids one of the slots.

mod capture;
mod children;
mod document;
mod error;
mod settings;
mod sheet;

pub use capture::{MetaCapture, MetaOutput, Slot};
pub use children::ChildrenSettings;
pub use document::evaluate;
pub use error::MetaError;
pub use settings::{ColorKey, Scale, Settings};
pub use sheet::{Coord, SheetSettings};

/// Where a meta document lives, which decides the slots it may fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaContext {
    Folder,
    Asset,
}

impl std::fmt::Display for MetaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetaContext::Folder => write!(f, "folder"),
            MetaContext::Asset => write!(f, "asset"),
        }
    }
}

//! Parent marker files.
//!
//! A folder holding a register marker can be named as a parent by folders
//! visited after it; a folder holding a parent marker forwards its assets
//! into that parent.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, LoadError};

/// Characters allowed in parent IDs.
pub const ALLOWED_ID_CHARS: &str =
    "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

pub fn validate_parent_id(id: &str) -> Result<(), ConfigError> {
    match id.chars().find(|c| !ALLOWED_ID_CHARS.contains(*c)) {
        Some(ch) => Err(ConfigError::IllegalParentIdChar {
            ch,
            allowed: ALLOWED_ID_CHARS,
        }),
        None => Ok(()),
    }
}

/// Read a marker file and return its validated ID.
pub fn read_marker(path: &Path) -> Result<String, LoadError> {
    let content = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let id = content.trim().to_string();
    validate_parent_id(&id)?;
    Ok(id)
}

#[derive(Debug, Clone)]
struct Registration {
    folder: usize,
    owner: PathBuf,
}

/// Parent IDs registered so far during one traversal.
#[derive(Debug, Default)]
pub struct ParentRegistry {
    ids: HashMap<String, Registration>,
}

impl ParentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` for the folder at index `folder`, owned by `owner`.
    pub fn register(&mut self, id: String, folder: usize, owner: &Path) -> Result<(), ConfigError> {
        if let Some(existing) = self.ids.get(&id) {
            return Err(ConfigError::DuplicateParentId {
                id,
                owner: existing.owner.clone(),
            });
        }
        self.ids.insert(
            id,
            Registration {
                folder,
                owner: owner.to_path_buf(),
            },
        );
        Ok(())
    }

    /// Index of the folder registered under `id`.
    pub fn resolve(&self, id: &str, requester: &Path) -> Result<usize, ConfigError> {
        self.ids
            .get(id)
            .map(|r| r.folder)
            .ok_or_else(|| ConfigError::UnknownParentId {
                id: id.to_string(),
                folder: requester.to_path_buf(),
            })
    }
}

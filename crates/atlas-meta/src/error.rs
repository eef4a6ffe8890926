//! Meta document errors.

use crate::{MetaContext, Slot};

/// Errors raised while reading or validating a meta document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetaError {
    #[error("Invalid meta document: {0}")]
    Parse(String),

    #[error("Unknown meta entry '{0}'")]
    UnknownEntry(String),

    #[error("Invalid {entry}: {message}")]
    InvalidEntry { entry: Slot, message: String },

    #[error("{context} meta cannot call {slot}")]
    Forbidden { slot: Slot, context: MetaContext },

    #[error("Asset meta must call settings/default_settings or sheet_settings or both")]
    MissingRegistration,

    #[error("sheet_settings rows and columns must be >= 1 (got {rows} rows, {columns} columns)")]
    InvalidSheetLayout { rows: i64, columns: i64 },

    #[error("sheet_settings padding must be >= 0 (got {0})")]
    InvalidPadding(i64),
}

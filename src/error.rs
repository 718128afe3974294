use std::path::{Path, PathBuf};

use thiserror::Error;

/// Everything that can go wrong while making badges or sheets.
///
/// Some of these stop the run (a template we can't read, a spreadsheet
/// without the expected columns), others only cost us one card or one
/// sheet. See `is_recoverable`.
#[derive(Debug, Error)]
pub enum BadgeError {
    #[error("could not load {what} from {path}: {reason}")]
    SourceLoad {
        what: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("missing column(s) in spreadsheet: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    #[error("no photo found for identifier {identifier}")]
    AssetMissing { identifier: String },

    #[error("row {row}: empty {field}")]
    IncompleteRecord { row: usize, field: &'static str },

    #[error("could not render {item}: {reason}")]
    RenderFailure { item: String, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BadgeError {
    pub fn source_load(what: &'static str, path: &Path, reason: impl ToString) -> Self {
        BadgeError::SourceLoad {
            what,
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn render(item: impl Into<String>, reason: impl ToString) -> Self {
        BadgeError::RenderFailure {
            item: item.into(),
            reason: reason.to_string(),
        }
    }

    /// Recoverable errors skip a single card or sheet, the batch goes on.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            BadgeError::AssetMissing { .. }
            | BadgeError::IncompleteRecord { .. }
            | BadgeError::RenderFailure { .. } => true,
            BadgeError::SourceLoad { .. }
            | BadgeError::SchemaMismatch { .. }
            | BadgeError::InvalidConfig(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, BadgeError>;

#[test]
fn recoverable_errors() {
    assert!(BadgeError::AssetMissing { identifier: "P123".to_string() }.is_recoverable());
    assert!(BadgeError::render("Ali", "disk full").is_recoverable());
    assert!(BadgeError::IncompleteRecord { row: 3, field: "name" }.is_recoverable());
    assert!(!BadgeError::SchemaMismatch { missing: vec!["الاسم".to_string()] }.is_recoverable());
    assert!(!BadgeError::source_load("font", Path::new("font.ttf"), "not found").is_recoverable());
    assert!(!BadgeError::InvalidConfig("columns".to_string()).is_recoverable());
}

#[test]
fn schema_mismatch_lists_columns() {
    let err = BadgeError::SchemaMismatch {
        missing: vec!["name".to_string(), "passport".to_string()],
    };
    assert_eq!(err.to_string(), "missing column(s) in spreadsheet: name, passport");
}

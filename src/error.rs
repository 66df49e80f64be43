use std::path::PathBuf;

use thiserror::Error;

use crate::layout::LayoutError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("army list doesn't match the expected format: {0}")]
    InvalidList(String),

    #[error("no PDF index found for army '{0}'")]
    ArmyNotFound(String),

    #[error("invalid PDF index {}: {reason}", path.display())]
    InvalidIndex { path: PathBuf, reason: String },

    #[error("several army rules detected: {0:?}")]
    SeveralArmyRules(Vec<String>),

    #[error("no army rule found in the loaded indexes")]
    NoArmyRule,

    #[error("requested detachment '{name}' not found, known detachments are {available:?}")]
    DetachmentNotFound { name: String, available: Vec<String> },

    #[error("no datasheet found for '{unit}', loaded datasheets are {available:?}")]
    DatasheetNotFound { unit: String, available: Vec<String> },

    #[error("PDF error in {}: {reason}", path.display())]
    Pdf { path: PathBuf, reason: String },

    #[error("page {page} requested from {} which has {count} pages", path.display())]
    PageOutOfRange { path: PathBuf, page: u32, count: u32 },

    #[error("invalid color '{0}' (expected #rrggbb or #rgb)")]
    InvalidColor(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("annotation layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("nothing to print: every section of the playbook is disabled or empty")]
    EmptyPlaybook,
}

impl Error {
    pub(crate) fn pdf(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Pdf {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

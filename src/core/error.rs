use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GovGraphError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Referential integrity error: {0}")]
    ReferentialIntegrityError(String),
    #[error("Duplicate id: {0}")]
    DuplicateIdError(String),
    #[error("Namespace format error: {0}")]
    NamespaceFormatError(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

//! Whole-document persistence for the catalog.
//!
//! # Responsibility
//! - Load and save the entire catalog as one unit.
//! - Keep file format details out of the service layer.
//!
//! # Invariants
//! - `load` never returns a document that fails `Catalog::validate()`.
//! - `save` always writes the full document; there are no partial updates.
//! - A missing or blank backing file is initialized to an empty document.

use crate::model::catalog::{Catalog, CatalogValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::string::FromUtf8Error;

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    Encoding(FromUtf8Error),
    InvalidData(CatalogValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json(err) => write!(f, "malformed catalog document: {err}"),
            Self::Encoding(err) => write!(f, "catalog document is not UTF-8: {err}"),
            Self::InvalidData(err) => write!(f, "invalid persisted catalog data: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            Self::Encoding(err) => Some(err),
            Self::InvalidData(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<FromUtf8Error> for StoreError {
    fn from(value: FromUtf8Error) -> Self {
        Self::Encoding(value)
    }
}

impl From<CatalogValidationError> for StoreError {
    fn from(value: CatalogValidationError) -> Self {
        Self::InvalidData(value)
    }
}

/// Storage contract used by `CatalogService`.
pub trait CatalogStore {
    fn load(&self) -> StoreResult<Catalog>;
    fn save(&self, catalog: &Catalog) -> StoreResult<()>;
}

impl<S: CatalogStore + ?Sized> CatalogStore for &S {
    fn load(&self) -> StoreResult<Catalog> {
        (**self).load()
    }

    fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        (**self).save(catalog)
    }
}

/// Serializes a catalog the way it is written to disk (4-space indent).
pub fn to_document_string(catalog: &Catalog) -> StoreResult<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(catalog, &mut serializer)?;
    buffer.push(b'\n');
    Ok(String::from_utf8(buffer)?)
}

/// Parses and validates a catalog document. Blank input yields `None`.
pub fn parse_document(text: &str) -> StoreResult<Option<Catalog>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let catalog: Catalog = serde_json::from_str(text)?;
    catalog.validate()?;
    Ok(Some(catalog))
}

//! JSON file backing for the catalog.
//!
//! # Invariants
//! - The file is read fully before parsing and overwritten fully on save.
//! - No locking and no atomic rename: one process, one writer.

use super::{parse_document, to_document_string, CatalogStore, StoreError, StoreResult};
use crate::model::catalog::Catalog;
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Catalog store reading and writing one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_text(&self) -> StoreResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write_text(&self, text: &str) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CatalogStore for JsonFileStore {
    /// Loads the catalog, creating an empty one on disk when the file is
    /// missing or blank.
    ///
    /// # Side effects
    /// - May write the initial empty document.
    /// - Emits `store_load` logging events with duration and status.
    fn load(&self) -> StoreResult<Catalog> {
        let started_at = Instant::now();

        let parsed = self
            .read_text()
            .and_then(|text| text.as_deref().map_or(Ok(None), parse_document));
        let catalog = match parsed {
            Ok(Some(catalog)) => catalog,
            Ok(None) => {
                info!("event=store_init module=store status=ok reason=missing_or_blank");
                let catalog = Catalog::empty();
                self.save(&catalog)?;
                catalog
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err);
            }
        };

        info!(
            "event=store_load module=store status=ok duration_ms={} books={} members={}",
            started_at.elapsed().as_millis(),
            catalog.books.len(),
            catalog.members.len()
        );
        Ok(catalog)
    }

    /// Serializes the full catalog and overwrites the file.
    fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        let started_at = Instant::now();
        let result = to_document_string(catalog).and_then(|text| self.write_text(&text));

        match &result {
            Ok(()) => info!(
                "event=store_save module=store status=ok duration_ms={} books={} members={}",
                started_at.elapsed().as_millis(),
                catalog.books.len(),
                catalog.members.len()
            ),
            Err(err) => error!(
                "event=store_save module=store status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }
}

//! In-process catalog store.
//!
//! Keeps the serialized document rather than the struct so that every
//! load/save goes through the same encode/validate path as the file store.

use super::{parse_document, to_document_string, CatalogStore, StoreResult};
use crate::model::catalog::Catalog;
use std::cell::RefCell;

/// Catalog store without a backing file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already populated catalog.
    pub fn with_catalog(catalog: &Catalog) -> StoreResult<Self> {
        let store = Self::new();
        store.save(catalog)?;
        Ok(store)
    }

    /// Raw document text as it would appear on disk.
    pub fn document(&self) -> Option<String> {
        self.document.borrow().clone()
    }
}

impl CatalogStore for MemoryStore {
    fn load(&self) -> StoreResult<Catalog> {
        let parsed = match self.document.borrow().as_deref() {
            Some(text) => parse_document(text)?,
            None => None,
        };
        match parsed {
            Some(catalog) => Ok(catalog),
            None => {
                let catalog = Catalog::empty();
                self.save(&catalog)?;
                Ok(catalog)
            }
        }
    }

    fn save(&self, catalog: &Catalog) -> StoreResult<()> {
        let text = to_document_string(catalog)?;
        *self.document.borrow_mut() = Some(text);
        Ok(())
    }
}

//! Core catalog logic for Shelfkeep.
//! This crate is the single source of truth for lending invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookValidationError};
pub use model::catalog::{
    Catalog, CatalogSummary, CatalogValidationError, LedgerIssue, ReturnSelector, ReturnedLoan,
    TransitionError,
};
pub use model::id::{gen_id, is_valid_id, BookId, IdPrefix, MemberId};
pub use model::member::{BorrowRecord, Member};
pub use service::catalog_service::{CatalogError, CatalogResult, CatalogService};
pub use service::input::{copies_from_i64, parse_copies, parse_position};
pub use store::{CatalogStore, JsonFileStore, MemoryStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Opens the file-backed service used by both front ends.
pub fn open_catalog(path: impl Into<std::path::PathBuf>) -> CatalogService<JsonFileStore> {
    CatalogService::new(JsonFileStore::new(path))
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

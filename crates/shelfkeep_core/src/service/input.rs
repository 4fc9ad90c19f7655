//! Text input parsing shared by the front ends.
//!
//! Parse failures map to `CatalogError::InvalidInput` so callers can stop
//! before touching the catalog.

use crate::model::catalog::ReturnSelector;
use crate::service::catalog_service::{CatalogError, CatalogResult};

/// Parses a positive copy count.
pub fn parse_copies(raw: &str) -> CatalogResult<u32> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(0) => Err(CatalogError::InvalidInput(
            "number of copies must be at least 1".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(_) => Err(CatalogError::InvalidInput(format!(
            "`{trimmed}` is not a whole number of copies"
        ))),
    }
}

/// Converts a copy count coming from a numeric form field.
pub fn copies_from_i64(value: i64) -> CatalogResult<u32> {
    u32::try_from(value)
        .ok()
        .filter(|copies| *copies > 0)
        .ok_or_else(|| {
            CatalogError::InvalidInput(format!("{value} is not a positive number of copies"))
        })
}

/// Parses a 1-based list position into a return selector.
pub fn parse_position(raw: &str) -> CatalogResult<ReturnSelector> {
    let trimmed = raw.trim();
    match trimmed.parse::<usize>() {
        Ok(0) | Err(_) => Err(CatalogError::InvalidInput(format!(
            "`{trimmed}` is not a list number"
        ))),
        Ok(position) => Ok(ReturnSelector::Position(position)),
    }
}

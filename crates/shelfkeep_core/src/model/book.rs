//! Book inventory record.
//!
//! # Invariants
//! - `total_copies` is positive and never changes after creation.
//! - `available_copies` stays within `[0, total_copies]`.

use crate::model::id::{is_valid_id, BookId, IdPrefix};
use crate::model::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One catalog title with its copy counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    /// Older catalog files spell this field `avaliable_copies`.
    #[serde(alias = "avaliable_copies")]
    pub available_copies: u32,
    #[serde(with = "timestamp::serde_format")]
    pub added_on: NaiveDateTime,
}

/// Per-record validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    InvalidId(String),
    ZeroTotalCopies(BookId),
    AvailableExceedsTotal {
        id: BookId,
        available: u32,
        total: u32,
    },
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(id) => write!(f, "invalid book id `{id}`"),
            Self::ZeroTotalCopies(id) => write!(f, "book {id} has zero total copies"),
            Self::AvailableExceedsTotal {
                id,
                available,
                total,
            } => write!(
                f,
                "book {id} has {available} available copies but only {total} in total"
            ),
        }
    }
}

impl Error for BookValidationError {}

impl Book {
    /// Creates a book with every copy on the shelf.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        copies: u32,
        added_on: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            total_copies: copies,
            available_copies: copies,
            added_on,
        }
    }

    /// Copies currently held by members.
    pub fn outstanding_copies(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    pub fn has_available_copy(&self) -> bool {
        self.available_copies > 0
    }

    /// Checks id shape and copy bounds.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if !is_valid_id(IdPrefix::Book, &self.id) {
            return Err(BookValidationError::InvalidId(self.id.clone()));
        }
        if self.total_copies == 0 {
            return Err(BookValidationError::ZeroTotalCopies(self.id.clone()));
        }
        if self.available_copies > self.total_copies {
            return Err(BookValidationError::AvailableExceedsTotal {
                id: self.id.clone(),
                available: self.available_copies,
                total: self.total_copies,
            });
        }
        Ok(())
    }
}

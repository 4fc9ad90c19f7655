//! Member record and its embedded borrow records.

use crate::model::id::{is_valid_id, BookId, IdPrefix, MemberId};
use crate::model::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Evidence that a member currently holds one copy of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowRecord {
    /// Weak reference; may dangle if the catalog file was edited by hand.
    pub book_id: BookId,
    /// Title snapshot taken at borrow time.
    pub title: String,
    #[serde(with = "timestamp::serde_format")]
    pub borrow_on: NaiveDateTime,
}

/// Library member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    /// Kept in borrow order.
    #[serde(default)]
    pub borrowed: Vec<BorrowRecord>,
}

impl Member {
    /// Creates a member holding no books.
    pub fn new(id: MemberId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            borrowed: Vec::new(),
        }
    }

    /// Returns whether this member holds a copy of `book_id`.
    pub fn holds(&self, book_id: &str) -> bool {
        self.borrowed.iter().any(|record| record.book_id == book_id)
    }

    pub fn borrowed_count(&self) -> usize {
        self.borrowed.len()
    }

    pub fn has_valid_id(&self) -> bool {
        is_valid_id(IdPrefix::Member, &self.id)
    }
}

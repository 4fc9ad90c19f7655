//! The catalog document and its borrow/return transitions.
//!
//! # Responsibility
//! - Hold every book and member as one persisted unit.
//! - Apply borrow/return as pure in-memory transitions.
//! - Report ledger drift between copy counters and borrow records.
//!
//! # Invariants
//! - A transition either fully applies or leaves the document untouched.
//! - `available_copies` never goes below zero nor above `total_copies`.
//! - A member never holds two records for the same book.

use crate::model::book::{Book, BookValidationError};
use crate::model::id::{BookId, MemberId};
use crate::model::member::{BorrowRecord, Member};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Entire persisted catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub members: Vec<Member>,
}

/// How a return picks the borrow record to close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnSelector {
    /// Record whose `book_id` matches.
    BookId(BookId),
    /// 1-based position in the member's borrowed list.
    Position(usize),
}

impl Display for ReturnSelector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BookId(book_id) => write!(f, "book {book_id}"),
            Self::Position(position) => write!(f, "position {position}"),
        }
    }
}

/// Outcome of a successful return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnedLoan {
    pub record: BorrowRecord,
    /// `false` when the referenced book no longer resolves.
    pub restocked: bool,
}

/// Rejected borrow/return transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    MemberNotFound(MemberId),
    BookNotFound(BookId),
    BorrowRecordNotFound {
        member_id: MemberId,
        selector: ReturnSelector,
    },
    AlreadyBorrowed {
        member_id: MemberId,
        book_id: BookId,
    },
    NoCopiesAvailable(BookId),
}

impl Display for TransitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MemberNotFound(id) => write!(f, "member not found: {id}"),
            Self::BookNotFound(id) => write!(f, "book not found: {id}"),
            Self::BorrowRecordNotFound {
                member_id,
                selector,
            } => write!(f, "member {member_id} has no borrowed book at {selector}"),
            Self::AlreadyBorrowed { member_id, book_id } => {
                write!(f, "member {member_id} already borrowed book {book_id}")
            }
            Self::NoCopiesAvailable(id) => write!(f, "no copies available for book {id}"),
        }
    }
}

impl Error for TransitionError {}

/// Document-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogValidationError {
    Book(BookValidationError),
    InvalidMemberId(String),
}

impl Display for CatalogValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book(err) => write!(f, "{err}"),
            Self::InvalidMemberId(id) => write!(f, "invalid member id `{id}`"),
        }
    }
}

impl Error for CatalogValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Book(err) => Some(err),
            Self::InvalidMemberId(_) => None,
        }
    }
}

impl From<BookValidationError> for CatalogValidationError {
    fn from(value: BookValidationError) -> Self {
        Self::Book(value)
    }
}

/// Ledger drift found by [`Catalog::audit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerIssue {
    /// `total - available` differs from the number of open records.
    CopyMismatch {
        book_id: BookId,
        outstanding_copies: u32,
        open_records: usize,
    },
    /// A borrow record points at a book that does not exist.
    DanglingRecord { member_id: MemberId, book_id: BookId },
    /// A member holds more than one record for the same book.
    DuplicateHold { member_id: MemberId, book_id: BookId },
}

impl Display for LedgerIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CopyMismatch {
                book_id,
                outstanding_copies,
                open_records,
            } => write!(
                f,
                "book {book_id}: {outstanding_copies} copies out but {open_records} borrow records"
            ),
            Self::DanglingRecord { member_id, book_id } => {
                write!(f, "member {member_id} holds unknown book {book_id}")
            }
            Self::DuplicateHold { member_id, book_id } => {
                write!(f, "member {member_id} holds book {book_id} more than once")
            }
        }
    }
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogSummary {
    pub book_count: usize,
    pub member_count: usize,
    pub total_copies: u64,
    pub available_copies: u64,
    pub active_borrows: usize,
}

impl Catalog {
    /// Empty document written when no catalog file exists yet.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.iter().find(|member| member.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.book(id).is_some() || self.member(id).is_some()
    }

    /// Checks per-record invariants of every book and member.
    pub fn validate(&self) -> Result<(), CatalogValidationError> {
        for book in &self.books {
            book.validate()?;
        }
        if let Some(member) = self.members.iter().find(|member| !member.has_valid_id()) {
            return Err(CatalogValidationError::InvalidMemberId(member.id.clone()));
        }
        Ok(())
    }

    /// Lends one copy of `book_id` to `member_id`.
    ///
    /// # Errors
    /// - `MemberNotFound` / `BookNotFound` when an id does not resolve.
    /// - `AlreadyBorrowed` when the member already holds this book.
    /// - `NoCopiesAvailable` when every copy is out.
    pub fn borrow(
        &mut self,
        member_id: &str,
        book_id: &str,
        borrow_on: NaiveDateTime,
    ) -> Result<BorrowRecord, TransitionError> {
        let member_index = self
            .members
            .iter()
            .position(|member| member.id == member_id)
            .ok_or_else(|| TransitionError::MemberNotFound(member_id.to_string()))?;
        let book_index = self
            .books
            .iter()
            .position(|book| book.id == book_id)
            .ok_or_else(|| TransitionError::BookNotFound(book_id.to_string()))?;

        let member = &mut self.members[member_index];
        let book = &mut self.books[book_index];
        if member.holds(book_id) {
            return Err(TransitionError::AlreadyBorrowed {
                member_id: member.id.clone(),
                book_id: book.id.clone(),
            });
        }
        if !book.has_available_copy() {
            return Err(TransitionError::NoCopiesAvailable(book.id.clone()));
        }

        let record = BorrowRecord {
            book_id: book.id.clone(),
            title: book.title.clone(),
            borrow_on,
        };
        book.available_copies -= 1;
        member.borrowed.push(record.clone());
        Ok(record)
    }

    /// Closes one borrow record of `member_id` and puts the copy back.
    ///
    /// A record whose book no longer resolves is still removed; the counter
    /// update is skipped and reported through `ReturnedLoan::restocked`.
    pub fn return_book(
        &mut self,
        member_id: &str,
        selector: &ReturnSelector,
    ) -> Result<ReturnedLoan, TransitionError> {
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == member_id)
            .ok_or_else(|| TransitionError::MemberNotFound(member_id.to_string()))?;

        let record_index = match selector {
            ReturnSelector::BookId(book_id) => member
                .borrowed
                .iter()
                .position(|record| &record.book_id == book_id),
            ReturnSelector::Position(position) => position
                .checked_sub(1)
                .filter(|index| *index < member.borrowed.len()),
        }
        .ok_or_else(|| TransitionError::BorrowRecordNotFound {
            member_id: member.id.clone(),
            selector: selector.clone(),
        })?;

        let record = member.borrowed.remove(record_index);
        let restocked = match self.books.iter_mut().find(|book| book.id == record.book_id) {
            Some(book) => {
                if book.available_copies < book.total_copies {
                    book.available_copies += 1;
                }
                true
            }
            None => false,
        };

        Ok(ReturnedLoan { record, restocked })
    }

    /// Counters shown on the dashboard.
    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            book_count: self.books.len(),
            member_count: self.members.len(),
            total_copies: self.books.iter().map(|b| u64::from(b.total_copies)).sum(),
            available_copies: self
                .books
                .iter()
                .map(|b| u64::from(b.available_copies))
                .sum(),
            active_borrows: self.members.iter().map(Member::borrowed_count).sum(),
        }
    }

    /// Newest books first; ties keep insertion order.
    pub fn recent_books(&self, limit: usize) -> Vec<Book> {
        let mut books = self.books.clone();
        books.sort_by(|left, right| right.added_on.cmp(&left.added_on));
        books.truncate(limit);
        books
    }

    /// Cross-checks copy counters against open borrow records.
    pub fn audit(&self) -> Vec<LedgerIssue> {
        let mut open_records: HashMap<&str, usize> = HashMap::new();
        let mut issues = Vec::new();

        for member in &self.members {
            for (index, record) in member.borrowed.iter().enumerate() {
                *open_records.entry(record.book_id.as_str()).or_insert(0) += 1;
                if self.book(&record.book_id).is_none() {
                    issues.push(LedgerIssue::DanglingRecord {
                        member_id: member.id.clone(),
                        book_id: record.book_id.clone(),
                    });
                }
                let seen_before = member.borrowed[..index]
                    .iter()
                    .any(|earlier| earlier.book_id == record.book_id);
                if seen_before {
                    issues.push(LedgerIssue::DuplicateHold {
                        member_id: member.id.clone(),
                        book_id: record.book_id.clone(),
                    });
                }
            }
        }

        for book in &self.books {
            let records = open_records.get(book.id.as_str()).copied().unwrap_or(0);
            let outstanding = book.outstanding_copies();
            if usize::try_from(outstanding).map_or(true, |value| value != records) {
                issues.push(LedgerIssue::CopyMismatch {
                    book_id: book.id.clone(),
                    outstanding_copies: outstanding,
                    open_records: records,
                });
            }
        }

        issues
    }
}

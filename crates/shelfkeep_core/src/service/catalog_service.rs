//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide the one validated operation set both front ends call.
//! - Run every mutation as load -> transition -> save on the full document.
//! - Emit metadata-only `event=` log lines for each use-case.
//!
//! # Invariants
//! - Failed operations persist nothing.
//! - Created ids never collide with an id already in the catalog.
//! - `available_copies` is re-checked at commit time on every borrow.

use crate::model::book::Book;
use crate::model::catalog::{
    Catalog, CatalogSummary, LedgerIssue, ReturnSelector, ReturnedLoan, TransitionError,
};
use crate::model::id::{gen_id, BookId, IdPrefix, MemberId};
use crate::model::member::{BorrowRecord, Member};
use crate::model::timestamp;
use crate::store::{CatalogStore, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const MAX_ID_ATTEMPTS: usize = 32;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Malformed user input, rejected before any mutation.
    InvalidInput(String),
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
    /// Id generation kept hitting existing ids.
    IdSpaceExhausted(IdPrefix),
    Store(StoreError),
}

impl CatalogError {
    /// Whether the error means "the thing asked for does not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MemberNotFound(_) | Self::BookNotFound(_) | Self::BorrowRecordNotFound { .. }
        )
    }

    /// Stable short code used in log lines and UI envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::MemberNotFound(_) | Self::BookNotFound(_) | Self::BorrowRecordNotFound { .. } => {
                "not_found"
            }
            Self::AlreadyBorrowed { .. } => "already_borrowed",
            Self::NoCopiesAvailable(_) => "no_copies_available",
            Self::IdSpaceExhausted(_) => "id_space_exhausted",
            Self::Store(_) => "store_failed",
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
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
            Self::IdSpaceExhausted(prefix) => write!(
                f,
                "could not generate a free {}- id after {MAX_ID_ATTEMPTS} attempts",
                prefix.as_str()
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<TransitionError> for CatalogError {
    fn from(value: TransitionError) -> Self {
        match value {
            TransitionError::MemberNotFound(id) => Self::MemberNotFound(id),
            TransitionError::BookNotFound(id) => Self::BookNotFound(id),
            TransitionError::BorrowRecordNotFound {
                member_id,
                selector,
            } => Self::BorrowRecordNotFound {
                member_id,
                selector,
            },
            TransitionError::AlreadyBorrowed { member_id, book_id } => {
                Self::AlreadyBorrowed { member_id, book_id }
            }
            TransitionError::NoCopiesAvailable(id) => Self::NoCopiesAvailable(id),
        }
    }
}

/// Catalog service facade over a store implementation.
pub struct CatalogService<S: CatalogStore> {
    store: S,
}

impl<S: CatalogStore> CatalogService<S> {
    /// Creates a service using the provided store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads the current document.
    pub fn catalog(&self) -> CatalogResult<Catalog> {
        Ok(self.store.load()?)
    }

    /// Adds a book with every copy available.
    ///
    /// # Errors
    /// - `InvalidInput` when `copies` is zero.
    pub fn add_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        copies: u32,
    ) -> CatalogResult<Book> {
        if copies == 0 {
            return Err(CatalogError::InvalidInput(
                "number of copies must be a positive integer".to_string(),
            ));
        }

        let mut catalog = self.store.load()?;
        let id = fresh_id(&catalog, IdPrefix::Book)?;
        let book = Book::new(id, title, author, copies, timestamp::now());
        catalog.books.push(book.clone());
        self.store.save(&catalog)?;

        info!(
            "event=book_add module=service status=ok book_id={} copies={}",
            book.id, copies
        );
        Ok(book)
    }

    /// Registers a member with no borrowed books.
    pub fn add_member(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> CatalogResult<Member> {
        let mut catalog = self.store.load()?;
        let id = fresh_id(&catalog, IdPrefix::Member)?;
        let member = Member::new(id, name, email);
        catalog.members.push(member.clone());
        self.store.save(&catalog)?;

        info!(
            "event=member_add module=service status=ok member_id={}",
            member.id
        );
        Ok(member)
    }

    /// Books in insertion order.
    pub fn list_books(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.store.load()?.books)
    }

    /// Members in insertion order.
    pub fn list_members(&self) -> CatalogResult<Vec<Member>> {
        Ok(self.store.load()?.members)
    }

    pub fn get_book(&self, book_id: &str) -> CatalogResult<Option<Book>> {
        Ok(self.store.load()?.book(book_id).cloned())
    }

    pub fn get_member(&self, member_id: &str) -> CatalogResult<Option<Member>> {
        Ok(self.store.load()?.member(member_id).cloned())
    }

    /// Books with at least one copy on the shelf.
    pub fn borrowable_books(&self) -> CatalogResult<Vec<Book>> {
        let catalog = self.store.load()?;
        Ok(catalog
            .books
            .into_iter()
            .filter(Book::has_available_copy)
            .collect())
    }

    /// Members currently holding at least one book.
    pub fn members_with_loans(&self) -> CatalogResult<Vec<Member>> {
        let catalog = self.store.load()?;
        Ok(catalog
            .members
            .into_iter()
            .filter(|member| !member.borrowed.is_empty())
            .collect())
    }

    pub fn summary(&self) -> CatalogResult<CatalogSummary> {
        Ok(self.store.load()?.summary())
    }

    /// Newest books first, at most `limit`.
    pub fn recent_books(&self, limit: usize) -> CatalogResult<Vec<Book>> {
        Ok(self.store.load()?.recent_books(limit))
    }

    /// Lends one copy of a book to a member and persists the change.
    pub fn borrow(&self, member_id: &str, book_id: &str) -> CatalogResult<BorrowRecord> {
        let mut catalog = self.store.load()?;
        let record = match catalog.borrow(member_id, book_id, timestamp::now()) {
            Ok(record) => record,
            Err(err) => {
                let err = CatalogError::from(err);
                warn!(
                    "event=borrow module=service status=rejected member_id={} book_id={} error_code={}",
                    member_id,
                    book_id,
                    err.code()
                );
                return Err(err);
            }
        };
        self.store.save(&catalog)?;

        info!(
            "event=borrow module=service status=ok member_id={} book_id={}",
            member_id, record.book_id
        );
        Ok(record)
    }

    /// Closes one of a member's borrow records and persists the change.
    pub fn return_book(
        &self,
        member_id: &str,
        selector: &ReturnSelector,
    ) -> CatalogResult<ReturnedLoan> {
        let mut catalog = self.store.load()?;
        let returned = match catalog.return_book(member_id, selector) {
            Ok(returned) => returned,
            Err(err) => {
                let err = CatalogError::from(err);
                warn!(
                    "event=return module=service status=rejected member_id={} selector=\"{}\" error_code={}",
                    member_id,
                    selector,
                    err.code()
                );
                return Err(err);
            }
        };
        self.store.save(&catalog)?;

        if !returned.restocked {
            warn!(
                "event=return module=service status=ok member_id={} book_id={} restocked=false",
                member_id, returned.record.book_id
            );
        } else {
            info!(
                "event=return module=service status=ok member_id={} book_id={}",
                member_id, returned.record.book_id
            );
        }
        Ok(returned)
    }

    /// Ledger drift between copy counters and borrow records.
    pub fn audit(&self) -> CatalogResult<Vec<LedgerIssue>> {
        let issues = self.store.load()?.audit();
        if !issues.is_empty() {
            warn!(
                "event=audit module=service status=drift issues={}",
                issues.len()
            );
        }
        Ok(issues)
    }
}

fn fresh_id(catalog: &Catalog, prefix: IdPrefix) -> CatalogResult<String> {
    (0..MAX_ID_ATTEMPTS)
        .map(|_| gen_id(prefix))
        .find(|candidate| !catalog.contains_id(candidate))
        .ok_or(CatalogError::IdSpaceExhausted(prefix))
}

//! FFI use-case API for the form UI.
//!
//! # Responsibility
//! - Expose one call per sidebar page/action to Dart via FRB.
//! - Return ready-to-render view models: metrics, table rows, select
//!   options and an inline banner.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures surface as `BannerKind::Error` banners, never as exceptions.
//! - Borrow options only offer books with a copy on the shelf; the core
//!   still re-checks at commit time.

use log::warn;
use shelfkeep_core::config::resolve_data_file;
use shelfkeep_core::model::timestamp;
use shelfkeep_core::{
    copies_from_i64, core_version as core_version_inner, init_logging as init_logging_inner,
    open_catalog, Book, CatalogError, CatalogResult, CatalogService, JsonFileStore, Member,
    ReturnSelector,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const RECENT_BOOKS_LIMIT: usize = 10;
static DATA_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Sidebar entries in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPage {
    Dashboard,
    AddBook,
    ListBooks,
    AddMember,
    ListMembers,
    BorrowBook,
    ReturnBook,
}

impl FormPage {
    const ALL: [FormPage; 7] = [
        Self::Dashboard,
        Self::AddBook,
        Self::ListBooks,
        Self::AddMember,
        Self::ListMembers,
        Self::BorrowBook,
        Self::ReturnBook,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::AddBook => "Add Book",
            Self::ListBooks => "List Books",
            Self::AddMember => "Add Member",
            Self::ListMembers => "List Members",
            Self::BorrowBook => "Borrow Book",
            Self::ReturnBook => "Return Book",
        }
    }
}

/// Inline message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
    Info,
    Warning,
}

/// Inline message shown above a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    fn new(kind: BannerKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result envelope for add/borrow/return buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or affected record.
    pub record_id: Option<String>,
    pub banner: Banner,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: String) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            banner: Banner::new(BannerKind::Success, message),
        }
    }

    fn failure(action: &str, err: &CatalogError) -> Self {
        warn!(
            "event=form_action module=ffi status=error action={} error_code={}",
            action,
            err.code()
        );
        Self {
            ok: false,
            record_id: None,
            banner: Banner::new(BannerKind::Error, user_message(err)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    pub total_copies: u32,
    pub available_copies: u32,
    pub added_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentBookRow {
    pub id: String,
    pub title: String,
    pub author: String,
    /// `available/total`, e.g. `1/2`.
    pub availability: String,
    pub added_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub borrowed_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRow {
    pub book_id: String,
    pub title: String,
    pub borrow_on: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub total_copies: u64,
    pub available_copies: u64,
    pub total_members: u64,
    pub recent_books: Vec<RecentBookRow>,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooksView {
    pub rows: Vec<BookRow>,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersView {
    pub rows: Vec<MemberRow>,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorrowOptionsView {
    pub member_ids: Vec<String>,
    /// Only books with at least one available copy.
    pub book_ids: Vec<String>,
    pub banner: Option<Banner>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnOptionsView {
    /// Members holding at least one book.
    pub member_ids: Vec<String>,
    /// Requested member if it has loans, else the first one offered.
    pub selected_member_id: Option<String>,
    pub loans: Vec<LoanRow>,
    pub banner: Option<Banner>,
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `log_dir` must be absolute.
/// - Safe to call repeatedly with the same arguments.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), Path::new(log_dir.trim())) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sidebar labels in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn form_page_labels() -> Vec<String> {
    FormPage::ALL
        .iter()
        .map(|page| page.label().to_string())
        .collect()
}

/// Dashboard metrics and the ten most recently added books.
#[flutter_rust_bridge::frb(sync)]
pub fn dashboard() -> DashboardView {
    dashboard_at(&resolve_data_path())
}

/// Creates a book; `copies` comes from a numeric field.
#[flutter_rust_bridge::frb(sync)]
pub fn add_book(title: String, author: String, copies: i64) -> ActionResponse {
    add_book_at(&resolve_data_path(), &title, &author, copies)
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_books() -> BooksView {
    list_books_at(&resolve_data_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn add_member(name: String, email: String) -> ActionResponse {
    add_member_at(&resolve_data_path(), &name, &email)
}

#[flutter_rust_bridge::frb(sync)]
pub fn list_members() -> MembersView {
    list_members_at(&resolve_data_path())
}

/// Select options for the Borrow Book page.
#[flutter_rust_bridge::frb(sync)]
pub fn borrow_options() -> BorrowOptionsView {
    borrow_options_at(&resolve_data_path())
}

#[flutter_rust_bridge::frb(sync)]
pub fn borrow_book(member_id: String, book_id: String) -> ActionResponse {
    borrow_book_at(&resolve_data_path(), &member_id, &book_id)
}

/// Select options for the Return Book page.
#[flutter_rust_bridge::frb(sync)]
pub fn return_options(member_id: Option<String>) -> ReturnOptionsView {
    return_options_at(&resolve_data_path(), member_id.as_deref())
}

/// Returns the member's loan of `book_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn return_book(member_id: String, book_id: String) -> ActionResponse {
    return_book_at(&resolve_data_path(), &member_id, &book_id)
}

fn dashboard_at(path: &Path) -> DashboardView {
    let service = open_catalog(path);
    let loaded = service.summary().and_then(|summary| {
        let recent = service.recent_books(RECENT_BOOKS_LIMIT)?;
        Ok((summary, recent))
    });

    match loaded {
        Ok((summary, recent)) => {
            let banner = recent
                .is_empty()
                .then(|| Banner::new(BannerKind::Info, "No books yet."));
            DashboardView {
                total_copies: summary.total_copies,
                available_copies: summary.available_copies,
                total_members: summary.member_count as u64,
                recent_books: recent.iter().map(to_recent_book_row).collect(),
                banner,
            }
        }
        Err(err) => DashboardView {
            total_copies: 0,
            available_copies: 0,
            total_members: 0,
            recent_books: Vec::new(),
            banner: Some(error_banner(&err)),
        },
    }
}

fn add_book_at(path: &Path, title: &str, author: &str, copies: i64) -> ActionResponse {
    let created = copies_from_i64(copies)
        .and_then(|copies| open_catalog(path).add_book(title.trim(), author.trim(), copies));
    match created {
        Ok(book) => ActionResponse::success("Book added successfully!", book.id),
        Err(err) => ActionResponse::failure("add_book", &err),
    }
}

fn list_books_at(path: &Path) -> BooksView {
    match open_catalog(path).list_books() {
        Ok(books) => BooksView {
            banner: books
                .is_empty()
                .then(|| Banner::new(BannerKind::Info, "No books available.")),
            rows: books.iter().map(to_book_row).collect(),
        },
        Err(err) => BooksView {
            rows: Vec::new(),
            banner: Some(error_banner(&err)),
        },
    }
}

fn add_member_at(path: &Path, name: &str, email: &str) -> ActionResponse {
    match open_catalog(path).add_member(name.trim(), email.trim()) {
        Ok(member) => ActionResponse::success("Member added successfully!", member.id),
        Err(err) => ActionResponse::failure("add_member", &err),
    }
}

fn list_members_at(path: &Path) -> MembersView {
    match open_catalog(path).list_members() {
        Ok(members) => MembersView {
            banner: members
                .is_empty()
                .then(|| Banner::new(BannerKind::Info, "No members found.")),
            rows: members.iter().map(to_member_row).collect(),
        },
        Err(err) => MembersView {
            rows: Vec::new(),
            banner: Some(error_banner(&err)),
        },
    }
}

fn borrow_options_at(path: &Path) -> BorrowOptionsView {
    let service = open_catalog(path);
    let loaded: CatalogResult<(Vec<Member>, Vec<Book>)> = service
        .list_members()
        .and_then(|members| Ok((members, service.borrowable_books()?)));

    match loaded {
        Ok((members, books)) => {
            let member_ids = members.into_iter().map(|member| member.id).collect::<Vec<_>>();
            let book_ids = books.into_iter().map(|book| book.id).collect::<Vec<_>>();
            let banner = (member_ids.is_empty() || book_ids.is_empty()).then(|| {
                Banner::new(BannerKind::Warning, "Members or available books not found.")
            });
            BorrowOptionsView {
                member_ids,
                book_ids,
                banner,
            }
        }
        Err(err) => BorrowOptionsView {
            member_ids: Vec::new(),
            book_ids: Vec::new(),
            banner: Some(error_banner(&err)),
        },
    }
}

fn borrow_book_at(path: &Path, member_id: &str, book_id: &str) -> ActionResponse {
    match open_catalog(path).borrow(member_id.trim(), book_id.trim()) {
        Ok(record) => ActionResponse::success("Book borrowed successfully!", record.book_id),
        Err(err) => ActionResponse::failure("borrow_book", &err),
    }
}

fn return_options_at(path: &Path, member_id: Option<&str>) -> ReturnOptionsView {
    let service: CatalogService<JsonFileStore> = open_catalog(path);
    let members = match service.members_with_loans() {
        Ok(members) => members,
        Err(err) => {
            return ReturnOptionsView {
                member_ids: Vec::new(),
                selected_member_id: None,
                loans: Vec::new(),
                banner: Some(error_banner(&err)),
            }
        }
    };

    let selected = member_id
        .and_then(|wanted| members.iter().find(|member| member.id == wanted.trim()))
        .or_else(|| members.first());
    let loans: Vec<LoanRow> = selected
        .map(|member| member.borrowed.iter().map(to_loan_row).collect())
        .unwrap_or_default();
    let banner = members
        .is_empty()
        .then(|| Banner::new(BannerKind::Info, "No borrowed books found."));

    ReturnOptionsView {
        selected_member_id: selected.map(|member| member.id.clone()),
        member_ids: members.iter().map(|member| member.id.clone()).collect(),
        loans,
        banner,
    }
}

fn return_book_at(path: &Path, member_id: &str, book_id: &str) -> ActionResponse {
    let selector = ReturnSelector::BookId(book_id.trim().to_string());
    match open_catalog(path).return_book(member_id.trim(), &selector) {
        Ok(returned) => {
            ActionResponse::success("Book returned successfully!", returned.record.book_id)
        }
        Err(err) => ActionResponse::failure("return_book", &err),
    }
}

fn resolve_data_path() -> PathBuf {
    DATA_PATH.get_or_init(|| resolve_data_file(None)).clone()
}

fn user_message(err: &CatalogError) -> String {
    match err {
        CatalogError::InvalidInput(detail) => format!("Invalid input: {detail}"),
        CatalogError::MemberNotFound(_) => "Member not found.".to_string(),
        CatalogError::BookNotFound(_) => "Book not found.".to_string(),
        CatalogError::BorrowRecordNotFound { .. } => {
            "This member has not borrowed that book.".to_string()
        }
        CatalogError::AlreadyBorrowed { .. } => {
            "This member already borrowed this book.".to_string()
        }
        CatalogError::NoCopiesAvailable(_) => "No copies available for this book.".to_string(),
        CatalogError::IdSpaceExhausted(_) | CatalogError::Store(_) => {
            format!("Catalog error: {err}")
        }
    }
}

fn error_banner(err: &CatalogError) -> Banner {
    warn!(
        "event=form_view module=ffi status=error error_code={}",
        err.code()
    );
    Banner::new(BannerKind::Error, user_message(err))
}

fn to_book_row(book: &Book) -> BookRow {
    BookRow {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        total_copies: book.total_copies,
        available_copies: book.available_copies,
        added_on: timestamp::format(&book.added_on),
    }
}

fn to_recent_book_row(book: &Book) -> RecentBookRow {
    RecentBookRow {
        id: book.id.clone(),
        title: book.title.clone(),
        author: book.author.clone(),
        availability: format!("{}/{}", book.available_copies, book.total_copies),
        added_on: timestamp::format(&book.added_on),
    }
}

fn to_member_row(member: &Member) -> MemberRow {
    MemberRow {
        id: member.id.clone(),
        name: member.name.clone(),
        email: member.email.clone(),
        borrowed_count: u32::try_from(member.borrowed_count()).unwrap_or(u32::MAX),
    }
}

fn to_loan_row(record: &shelfkeep_core::BorrowRecord) -> LoanRow {
    LoanRow {
        book_id: record.book_id.clone(),
        title: record.title.clone(),
        borrow_on: timestamp::format(&record.borrow_on),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        add_book_at, add_member_at, borrow_book_at, borrow_options_at, core_version,
        dashboard_at, form_page_labels, init_logging, list_books_at, list_members_at,
        return_book_at, return_options_at, BannerKind,
    };
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn catalog_path() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("library.json");
        (dir, path)
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_relative_dir_and_bad_level() {
        assert!(!init_logging("info".to_string(), "tmp/logs".to_string()).is_empty());
        assert!(!init_logging("verbose".to_string(), "/tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn sidebar_lists_seven_pages_starting_with_dashboard() {
        let labels = form_page_labels();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[0], "Dashboard");
        assert_eq!(labels[6], "Return Book");
    }

    #[test]
    fn empty_catalog_pages_show_info_banners() {
        let (_dir, path) = catalog_path();

        let dashboard = dashboard_at(&path);
        assert_eq!(dashboard.total_copies, 0);
        assert_eq!(dashboard.banner.expect("banner").kind, BannerKind::Info);
        assert_eq!(
            list_books_at(&path).banner.expect("banner").message,
            "No books available."
        );
        assert_eq!(
            list_members_at(&path).banner.expect("banner").message,
            "No members found."
        );
        assert_eq!(
            borrow_options_at(&path).banner.expect("banner").kind,
            BannerKind::Warning
        );
        assert!(path.exists());
    }

    #[test]
    fn add_book_rejects_non_positive_copies() {
        let (_dir, path) = catalog_path();

        let response = add_book_at(&path, "Dune", "Herbert", 0);
        assert!(!response.ok);
        assert_eq!(response.banner.kind, BannerKind::Error);
        assert!(list_books_at(&path).rows.is_empty());
    }

    #[test]
    fn borrow_and_return_flow_updates_views() {
        let (_dir, path) = catalog_path();
        let book_id = add_book_at(&path, "Dune", "Herbert", 1)
            .record_id
            .expect("book id");
        let member_id = add_member_at(&path, "Alice", "a@x.com")
            .record_id
            .expect("member id");

        let options = borrow_options_at(&path);
        assert_eq!(options.book_ids, vec![book_id.clone()]);
        assert!(options.banner.is_none());

        let borrowed = borrow_book_at(&path, &member_id, &book_id);
        assert!(borrowed.ok, "{}", borrowed.banner.message);
        assert!(borrow_options_at(&path).book_ids.is_empty());

        let dashboard = dashboard_at(&path);
        assert_eq!(dashboard.available_copies, 0);
        assert_eq!(dashboard.recent_books[0].availability, "0/1");

        let returns = return_options_at(&path, None);
        assert_eq!(returns.selected_member_id.as_deref(), Some(member_id.as_str()));
        assert_eq!(returns.loans.len(), 1);
        assert_eq!(returns.loans[0].title, "Dune");

        let returned = return_book_at(&path, &member_id, &book_id);
        assert!(returned.ok, "{}", returned.banner.message);
        assert_eq!(list_books_at(&path).rows[0].available_copies, 1);
        assert_eq!(list_members_at(&path).rows[0].borrowed_count, 0);
        assert!(return_options_at(&path, Some(&member_id)).loans.is_empty());
    }

    #[test]
    fn duplicate_borrow_shows_error_banner() {
        let (_dir, path) = catalog_path();
        let book_id = add_book_at(&path, "Dune", "Herbert", 3)
            .record_id
            .expect("book id");
        let member_id = add_member_at(&path, "Alice", "a@x.com")
            .record_id
            .expect("member id");

        assert!(borrow_book_at(&path, &member_id, &book_id).ok);
        let second = borrow_book_at(&path, &member_id, &book_id);
        assert!(!second.ok);
        assert_eq!(second.banner.message, "This member already borrowed this book.");
        assert_eq!(list_books_at(&path).rows[0].available_copies, 2);
    }

    #[test]
    fn corrupt_file_becomes_error_banner() {
        let (_dir, path) = catalog_path();
        std::fs::write(&path, "[1, 2").expect("write corrupt file");

        let view = list_books_at(&path);
        assert!(view.rows.is_empty());
        let banner = view.banner.expect("banner");
        assert_eq!(banner.kind, BannerKind::Error);
        assert!(banner.message.starts_with("Catalog error:"));
    }
}

//! Interactive console session over a catalog service.
//!
//! # Responsibility
//! - Prompt for field values and forward them to `CatalogService`.
//! - Turn domain errors into the short messages users see.
//!
//! # Invariants
//! - Input parsing failures are reported before the service is called.
//! - Store failures end the session; every other error is recoverable.
//! - End of input ends the session like an explicit exit.

use crate::menu::{render_menu, MenuChoice};
use shelfkeep_core::model::timestamp;
use shelfkeep_core::{
    parse_copies, parse_position, CatalogError, CatalogService, CatalogStore, ReturnSelector,
    StoreError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const ID_WIDTH: usize = 12;
const TITLE_WIDTH: usize = 25;
const AUTHOR_WIDTH: usize = 20;
const NAME_WIDTH: usize = 25;
const EMAIL_WIDTH: usize = 30;

/// Failure that ends the console session.
#[derive(Debug)]
pub enum ConsoleError {
    Io(io::Error),
    Store(StoreError),
    Catalog(CatalogError),
}

impl Display for ConsoleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "console I/O failed: {err}"),
            Self::Store(err) => write!(f, "catalog storage failed: {err}"),
            Self::Catalog(err) => write!(f, "catalog request failed: {err}"),
        }
    }
}

impl Error for ConsoleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Catalog(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Console front end bound to one service and one pair of streams.
pub struct Console<'svc, S: CatalogStore, R: BufRead, W: Write> {
    service: &'svc CatalogService<S>,
    input: R,
    output: W,
}

impl<'svc, S: CatalogStore, R: BufRead, W: Write> Console<'svc, S, R, W> {
    pub fn new(service: &'svc CatalogService<S>, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
        }
    }

    /// Runs the menu loop until `0`, end of input, or a fatal error.
    pub fn run(&mut self) -> ConsoleResult<()> {
        loop {
            render_menu(&mut self.output)?;
            let Some(line) = self.prompt("What task you want to do? ")? else {
                break;
            };

            let flow = match MenuChoice::parse(&line) {
                Some(MenuChoice::AddBook) => self.add_book()?,
                Some(MenuChoice::ListBooks) => self.list_books()?,
                Some(MenuChoice::AddMember) => self.add_member()?,
                Some(MenuChoice::ListMembers) => self.list_members()?,
                Some(MenuChoice::Borrow) => self.borrow()?,
                Some(MenuChoice::Return) => self.return_book()?,
                Some(MenuChoice::Exit) => Flow::Stop,
                None => {
                    writeln!(
                        self.output,
                        "Unknown choice `{}`; enter a number from 0 to 6.",
                        line.trim()
                    )?;
                    Flow::Continue
                }
            };
            if flow == Flow::Stop {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn add_book(&mut self) -> ConsoleResult<Flow> {
        let Some(title) = self.prompt("Enter Book Title: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(author) = self.prompt("Enter book author: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(raw_copies) = self.prompt("How many copies: ")? else {
            return Ok(Flow::Stop);
        };

        let added = parse_copies(&raw_copies)
            .and_then(|copies| self.service.add_book(title.trim(), author.trim(), copies));
        match added {
            Ok(book) => writeln!(self.output, "Book added successfully! ({})", book.id)?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn list_books(&mut self) -> ConsoleResult<Flow> {
        let books = self.service.list_books().map_err(fatal)?;
        if books.is_empty() {
            writeln!(self.output, "No books available in the library.")?;
            return Ok(Flow::Continue);
        }
        for book in books {
            writeln!(
                self.output,
                "{} {} {} {:>3}/{}",
                fit(&book.id, ID_WIDTH),
                fit(&book.title, TITLE_WIDTH),
                fit(&book.author, AUTHOR_WIDTH),
                book.available_copies,
                book.total_copies
            )?;
        }
        writeln!(self.output)?;
        Ok(Flow::Continue)
    }

    fn add_member(&mut self) -> ConsoleResult<Flow> {
        let Some(name) = self.prompt("Enter the name: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(email) = self.prompt("Enter the email: ")? else {
            return Ok(Flow::Stop);
        };

        match self.service.add_member(name.trim(), email.trim()) {
            Ok(member) => writeln!(self.output, "Member added successfully! ({})", member.id)?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn list_members(&mut self) -> ConsoleResult<Flow> {
        let members = self.service.list_members().map_err(fatal)?;
        if members.is_empty() {
            writeln!(self.output, "No members in the library.")?;
            return Ok(Flow::Continue);
        }
        for member in members {
            writeln!(
                self.output,
                "{} {} {} Borrowed Books: {}",
                fit(&member.id, ID_WIDTH),
                fit(&member.name, NAME_WIDTH),
                fit(&member.email, EMAIL_WIDTH),
                member.borrowed_count()
            )?;
        }
        writeln!(self.output)?;
        Ok(Flow::Continue)
    }

    fn borrow(&mut self) -> ConsoleResult<Flow> {
        let Some(member_id) = self.prompt("Enter member id: ")? else {
            return Ok(Flow::Stop);
        };
        let member_id = member_id.trim().to_string();
        if self.service.get_member(&member_id).map_err(fatal)?.is_none() {
            writeln!(self.output, "Member not found!")?;
            return Ok(Flow::Continue);
        }

        let Some(book_id) = self.prompt("Enter book id: ")? else {
            return Ok(Flow::Stop);
        };
        match self.service.borrow(&member_id, book_id.trim()) {
            Ok(_) => writeln!(self.output, "Book borrowed successfully!")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    fn return_book(&mut self) -> ConsoleResult<Flow> {
        let Some(member_id) = self.prompt("Enter member id: ")? else {
            return Ok(Flow::Stop);
        };
        let Some(member) = self.service.get_member(member_id.trim()).map_err(fatal)? else {
            writeln!(self.output, "Member not found!")?;
            return Ok(Flow::Continue);
        };
        if member.borrowed.is_empty() {
            writeln!(self.output, "This member has not borrowed any books.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "Borrowed Books:")?;
        for (index, record) in member.borrowed.iter().enumerate() {
            writeln!(
                self.output,
                "{}. {} {} Borrowed on: {}",
                index + 1,
                fit(&record.book_id, ID_WIDTH),
                fit(&record.title, TITLE_WIDTH),
                timestamp::format(&record.borrow_on)
            )?;
        }

        let Some(raw_choice) = self.prompt("Enter number to return: ")? else {
            return Ok(Flow::Stop);
        };
        let returned = parse_position(&raw_choice)
            .and_then(|selector| self.service.return_book(&member.id, &selector));
        match returned {
            Ok(_) => writeln!(self.output, "Book returned successfully!")?,
            Err(err) => self.report(err)?,
        }
        Ok(Flow::Continue)
    }

    /// Prints a recoverable error, or escalates a store failure.
    fn report(&mut self, err: CatalogError) -> ConsoleResult<()> {
        if let CatalogError::Store(store_err) = err {
            return Err(ConsoleError::Store(store_err));
        }
        let message = match &err {
            CatalogError::InvalidInput(detail) => format!("Invalid input: {detail}"),
            CatalogError::BorrowRecordNotFound {
                selector: ReturnSelector::BookId(_),
                ..
            } => "That book is not borrowed by this member.".to_string(),
            CatalogError::BorrowRecordNotFound { .. } => "Invalid choice!".to_string(),
            CatalogError::MemberNotFound(_) => "Member not found!".to_string(),
            CatalogError::BookNotFound(_) => "Book not found!".to_string(),
            CatalogError::AlreadyBorrowed { .. } => {
                "This member already borrowed this book.".to_string()
            }
            CatalogError::NoCopiesAvailable(_) => "No copies available for borrowing.".to_string(),
            CatalogError::IdSpaceExhausted(_) | CatalogError::Store(_) => {
                format!("Could not save record: {err}")
            }
        };
        writeln!(self.output, "{message}")?;
        Ok(())
    }

    /// Writes `label` and reads one line; `None` on end of input.
    fn prompt(&mut self, label: &str) -> ConsoleResult<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

fn fatal(err: CatalogError) -> ConsoleError {
    match err {
        CatalogError::Store(err) => ConsoleError::Store(err),
        other => ConsoleError::Catalog(other),
    }
}

/// Truncates to `width - 1` chars and pads to `width`.
fn fit(value: &str, width: usize) -> String {
    let shown = value.chars().take(width.saturating_sub(1)).collect::<String>();
    format!("{shown:width$}")
}

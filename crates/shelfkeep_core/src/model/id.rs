//! Short prefixed identifiers for books and members.
//!
//! # Responsibility
//! - Generate display-friendly ids such as `B-7QX2K` / `M-0A9ZZ`.
//! - Check whether a persisted id has the expected shape.
//!
//! # Invariants
//! - Suffix is exactly `ID_SUFFIX_LEN` chars drawn from `A-Z0-9`.
//! - Ids are lookup keys by equality only; nothing orders or indexes them.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

/// Book identifier (`B-XXXXX`).
pub type BookId = String;
/// Member identifier (`M-XXXXX`).
pub type MemberId = String;

const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_SUFFIX_LEN: usize = 5;

static BOOK_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^B-[A-Z0-9]{5}$").expect("valid book id regex"));
static MEMBER_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^M-[A-Z0-9]{5}$").expect("valid member id regex"));

/// Kind of record an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Book,
    Member,
}

impl IdPrefix {
    /// Leading letter written before the dash.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Book => "B",
            Self::Member => "M",
        }
    }
}

/// Generates a new random id for `prefix`.
///
/// No uniqueness check is done here; callers that care compare against
/// existing ids.
pub fn gen_id(prefix: IdPrefix) -> String {
    gen_id_with(prefix, &mut rand::thread_rng())
}

/// Returns whether `value` is a well-formed id of kind `prefix`.
pub fn is_valid_id(prefix: IdPrefix, value: &str) -> bool {
    match prefix {
        IdPrefix::Book => BOOK_ID_RE.is_match(value),
        IdPrefix::Member => MEMBER_ID_RE.is_match(value),
    }
}

fn gen_id_with<R: Rng + ?Sized>(prefix: IdPrefix, rng: &mut R) -> String {
    let suffix = (0..ID_SUFFIX_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())]))
        .collect::<String>();
    format!("{}-{suffix}", prefix.as_str())
}

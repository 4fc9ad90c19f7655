//! Catalog domain model.
//!
//! # Responsibility
//! - Define the persisted shape of books, members and borrow records.
//! - Apply borrow/return transitions in memory, independent of storage.
//!
//! # Invariants
//! - Books and members are append-only; nothing edits or deletes them.
//! - Borrow records exist only between a borrow and its return.

pub mod book;
pub mod catalog;
pub mod id;
pub mod member;
pub mod timestamp;

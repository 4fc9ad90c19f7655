//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and model transitions into use-case APIs.
//! - Keep console/FFI layers decoupled from storage details.

pub mod catalog_service;
pub mod input;

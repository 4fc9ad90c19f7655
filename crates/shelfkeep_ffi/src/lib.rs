//! Flutter-facing bindings for the Shelfkeep form UI.

pub mod api;

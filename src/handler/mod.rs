//! Request handling module
//!
//! Per-request pipeline: redirect normalization first, then method checks
//! and route dispatch to page and asset handlers.

pub mod pages;
pub mod router;
pub mod static_files;

pub use router::{handle_request, ListenerRole};

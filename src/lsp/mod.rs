//! LSP Protocol Implementation
//!
//! Editor surface over the audit engine: diagnostics, quick fixes, hover
//! and a document outline.

pub mod backend;
pub mod document;
pub mod handlers;
pub mod server;

pub use backend::Backend;

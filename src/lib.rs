//! Resolution Auditor
//!
//! Structural audit of legal resolutions: numbering sequences, hierarchical
//! punctuation, marker formatting and per-authority templates, reported as
//! offset-exact diagnostics with suggested fixes.
//!
//! This library provides:
//! - Marker scanning and structural parsing
//! - The audit engine and its rules
//! - Per-authority profiles loaded from TOML
//! - HTML and text rendering
//! - LSP protocol implementation

pub mod config;
pub mod core;
pub mod lsp;
pub mod parser;
pub mod profile;
pub mod render;
pub mod validation;

pub use config::Config;
pub use crate::core::{Diagnostic, Document, Severity, Span, SuggestedFix};
pub use profile::{DocumentType, ProfileRegistry};
pub use validation::{AuditResult, Auditor, RuleSummary, audit};

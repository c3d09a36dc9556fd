//! Core Data Model
//!
//! Documents, regions, spans and diagnostic assembly.

pub mod diagnostics;
pub mod document;
pub mod span;

pub use diagnostics::{Diagnostic, Finding, RegionFindings, Severity, SuggestedFix, assemble};
pub use document::{Document, Region, RegionName, Regions, normalize_line_breaks, split_regions};
pub use span::Span;

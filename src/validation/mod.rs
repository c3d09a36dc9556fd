//! Validation Engine
//!
//! Rules over parsed regions, separated from parsing and LSP concerns.

pub mod catalog;
pub mod engine;
pub mod punctuation;
pub mod result;
pub mod rules;
pub mod sequence;
pub mod structure;

pub use engine::{AuditResult, Auditor, RuleSummary, audit, run};
pub use punctuation::{Requirement, validate_punctuation};
pub use result::{RuleResult, Status};
pub use rules::{Check, RegionContext, Rule, RuleSet};
pub use sequence::validate_sequence;

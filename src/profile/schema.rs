//! Profile Schema Types
//!
//! Shapes of `*.profile.toml` files as written on disk. Patterns are kept as
//! strings here and compiled when the file becomes a [`Profile`].
//!
//! [`Profile`]: super::Profile

use serde::Deserialize;

/// Root profile file structure (matches TOML)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProfileFile {
    pub profile: ProfileMeta,
    #[serde(default)]
    pub header: Vec<HeaderLineDef>,
    pub epigraph: Option<EpigraphDef>,
    pub ementa: Option<EmentaDef>,
    pub preamble: Option<PreambleDef>,
    pub closing: Option<ClosingDef>,
    pub signature: Option<SignatureDef>,
}

/// Profile metadata
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProfileMeta {
    /// `unknown`, `ceg`, `condel`, `cnrh` or `coaride`
    pub document_type: String,
    /// Short label used in rule names, e.g. `CEG`
    pub name: String,
    pub description: Option<String>,
    /// Substrings that identify the document type in its first lines
    #[serde(default)]
    pub detect: Vec<String>,
}

/// How a header line is compared with its accepted values
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Equals,
    Contains,
}

/// One expected header line, counted among non-empty lines from 1
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HeaderLineDef {
    pub line: usize,
    pub accepted: Vec<String>,
    #[serde(default)]
    pub mode: MatchMode,
}

/// Text that must appear in the located block, with the message to show
/// when it does not
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RequiredTermDef {
    pub text: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EpigraphDef {
    pub pattern: String,
    #[serde(default)]
    pub require_uppercase: bool,
    #[serde(default)]
    pub required: Vec<RequiredTermDef>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmentaDef {
    pub verbs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PreambleDef {
    /// Must define an `authority` capture group
    pub locator: String,
    #[serde(default)]
    pub accepted: Vec<String>,
    #[serde(default)]
    pub require_uppercase: bool,
    #[serde(default)]
    pub required: Vec<RequiredTermDef>,
    /// Phrases of which one must close the preamble, e.g. `resolve:`
    #[serde(default)]
    pub closing_phrases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClosingDef {
    /// Any one of these validity clauses satisfies the rule
    pub patterns: Vec<String>,
    pub expected: String,
}

fn default_signature_lines() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SignatureDef {
    #[serde(default = "default_signature_lines")]
    pub last_lines: usize,
    #[serde(default)]
    pub require_role: bool,
}

//! Document Profiles
//!
//! Per-authority rule tables: expected header lines, epigraph and preamble
//! patterns, accepted ementa verbs, validity clause and signature layout.
//! Profiles are data; the checks that consume them live in
//! [`crate::validation::catalog`].

pub mod registry;
pub mod schema;

pub use registry::{LoadedProfile, ProfileRegistry, ProfileSource};
pub use schema::{MatchMode, ProfileFile};

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde::Serialize;

/// Closed set of document templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    #[default]
    Unknown,
    Ceg,
    Condel,
    Cnrh,
    Coaride,
}

impl DocumentType {
    pub const ALL: [DocumentType; 5] = [
        DocumentType::Unknown,
        DocumentType::Ceg,
        DocumentType::Condel,
        DocumentType::Cnrh,
        DocumentType::Coaride,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            DocumentType::Unknown => "unknown",
            DocumentType::Ceg => "ceg",
            DocumentType::Condel => "condel",
            DocumentType::Cnrh => "cnrh",
            DocumentType::Coaride => "coaride",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentType::Unknown => f.write_str("DESCONHECIDO"),
            other => f.write_str(&other.tag().to_uppercase()),
        }
    }
}

impl FromStr for DocumentType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_lowercase();
        match lowered.as_str() {
            "unknown" | "desconhecido" | "geral" => Ok(DocumentType::Unknown),
            "ceg" => Ok(DocumentType::Ceg),
            "condel" => Ok(DocumentType::Condel),
            "cnrh" => Ok(DocumentType::Cnrh),
            "coaride" => Ok(DocumentType::Coaride),
            _ => Err(anyhow!("unknown document type '{}'", s)),
        }
    }
}

/// Expected header line, compiled
#[derive(Debug, Clone)]
pub struct HeaderLine {
    /// 1-based position among non-empty lines
    pub line: usize,
    pub accepted: Vec<String>,
    pub mode: MatchMode,
}

/// Text a located block must contain (compared case-insensitively)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredTerm {
    pub text: String,
    pub message: String,
}

impl From<schema::RequiredTermDef> for RequiredTerm {
    fn from(def: schema::RequiredTermDef) -> Self {
        Self {
            text: def.text,
            message: def.message,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Epigraph {
    pub pattern: Regex,
    pub require_uppercase: bool,
    pub required: Vec<RequiredTerm>,
}

#[derive(Debug, Clone)]
pub struct Ementa {
    pub verbs: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Preamble {
    pub locator: Regex,
    pub accepted: Vec<String>,
    pub require_uppercase: bool,
    pub required: Vec<RequiredTerm>,
    pub closing_phrases: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Closing {
    pub patterns: Vec<Regex>,
    pub expected: String,
}

#[derive(Debug, Clone)]
pub struct Signature {
    pub last_lines: usize,
    pub require_role: bool,
}

/// Runtime profile with compiled patterns
///
/// Sections left out of a profile file are `None`; the rule set falls back
/// to the base profile for those.
#[derive(Debug, Clone)]
pub struct Profile {
    pub document_type: DocumentType,
    pub name: String,
    pub description: Option<String>,
    pub detect: Vec<String>,
    pub header: Vec<HeaderLine>,
    pub epigraph: Option<Epigraph>,
    pub ementa: Option<Ementa>,
    pub preamble: Option<Preamble>,
    pub closing: Option<Closing>,
    pub signature: Option<Signature>,
}

fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Invalid {} pattern: {}", what, pattern))
}

impl TryFrom<ProfileFile> for Profile {
    type Error = anyhow::Error;

    fn try_from(file: ProfileFile) -> Result<Self> {
        let document_type: DocumentType = file.profile.document_type.parse()?;

        let epigraph = file
            .epigraph
            .map(|def| -> Result<Epigraph> {
                Ok(Epigraph {
                    pattern: compile(&def.pattern, "epigraph")?,
                    require_uppercase: def.require_uppercase,
                    required: def.required.into_iter().map(RequiredTerm::from).collect(),
                })
            })
            .transpose()?;

        let preamble = file
            .preamble
            .map(|def| -> Result<Preamble> {
                let locator = compile(&def.locator, "preamble locator")?;
                if !locator.capture_names().flatten().any(|name| name == "authority") {
                    bail!("Preamble locator must define an 'authority' group");
                }
                Ok(Preamble {
                    locator,
                    accepted: def.accepted,
                    require_uppercase: def.require_uppercase,
                    required: def.required.into_iter().map(RequiredTerm::from).collect(),
                    closing_phrases: def.closing_phrases,
                })
            })
            .transpose()?;

        let closing = file
            .closing
            .map(|def| -> Result<Closing> {
                let patterns = def
                    .patterns
                    .iter()
                    .map(|p| compile(p, "closing"))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Closing {
                    patterns,
                    expected: def.expected,
                })
            })
            .transpose()?;

        let header = file
            .header
            .into_iter()
            .map(|def| {
                if def.line == 0 {
                    bail!("Header line numbers start at 1");
                }
                Ok(HeaderLine {
                    line: def.line,
                    accepted: def.accepted,
                    mode: def.mode,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            document_type,
            name: file.profile.name,
            description: file.profile.description,
            detect: file.profile.detect,
            header,
            epigraph,
            ementa: file.ementa.map(|def| Ementa { verbs: def.verbs }),
            preamble,
            closing,
            signature: file.signature.map(|def| Signature {
                last_lines: def.last_lines,
                require_role: def.require_role,
            }),
        })
    }
}

impl Profile {
    /// Parse and compile a profile from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: ProfileFile = toml::from_str(content).context("Failed to parse profile TOML")?;
        Profile::try_from(file)
    }

    /// Structural checks only; used when no profile file could be loaded
    pub fn minimal(document_type: DocumentType) -> Self {
        Self {
            document_type,
            name: document_type.to_string(),
            description: Some("Perfil mínimo (somente regras estruturais)".to_string()),
            detect: Vec::new(),
            header: Vec::new(),
            epigraph: None,
            ementa: None,
            preamble: None,
            closing: None,
            signature: None,
        }
    }

    /// Fill the sections this profile leaves out from `base`
    pub fn merged_over(&self, base: &Profile) -> Profile {
        Profile {
            document_type: self.document_type,
            name: self.name.clone(),
            description: self.description.clone(),
            detect: self.detect.clone(),
            header: if self.header.is_empty() {
                base.header.clone()
            } else {
                self.header.clone()
            },
            epigraph: self.epigraph.clone().or_else(|| base.epigraph.clone()),
            ementa: self.ementa.clone().or_else(|| base.ementa.clone()),
            preamble: self.preamble.clone().or_else(|| base.preamble.clone()),
            closing: self.closing.clone().or_else(|| base.closing.clone()),
            signature: self.signature.clone().or_else(|| base.signature.clone()),
        }
    }
}

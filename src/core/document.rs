//! Document and Regions
//!
//! The audited text is normalised once and never trimmed: every diagnostic
//! offset is defined against it. A document splits into a body region and an
//! optional annex region at the first line that is exactly `ANEXO`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::core::span::Span;

static ANNEX_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*ANEXO[ \t]*$").expect("valid annex marker regex"));

/// Normalise all line-break variants to `\n`
pub fn normalize_line_breaks(raw: &str) -> String {
    if !raw.contains('\r') {
        return raw.to_string();
    }
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

/// Name of a document region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionName {
    Body,
    Annex,
}

impl RegionName {
    /// Label shown to users next to each finding
    pub fn label(self) -> &'static str {
        match self {
            RegionName::Body => "Resolução",
            RegionName::Annex => "Anexo",
        }
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A contiguous slice of the document analysed under one rule set
#[derive(Debug, Clone, PartialEq)]
pub struct Region<'a> {
    pub name: RegionName,
    pub text: &'a str,
    pub offset_in_document: usize,
}

/// The result of splitting a document at its annex marker
#[derive(Debug, Clone, PartialEq)]
pub struct Regions<'a> {
    pub body: Region<'a>,
    /// Span of the literal marker line, including its line break
    pub marker: Option<Span>,
    pub annex: Option<Region<'a>>,
}

impl<'a> Regions<'a> {
    pub fn has_annex(&self) -> bool {
        self.annex.is_some()
    }

    /// Regions in document order
    pub fn iter(&self) -> impl Iterator<Item = &Region<'a>> {
        std::iter::once(&self.body).chain(self.annex.as_ref())
    }
}

/// Immutable audited text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(raw: &str) -> Self {
        Self {
            text: normalize_line_breaks(raw),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Empty or whitespace-only documents are not audited
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn regions(&self) -> Regions<'_> {
        split_regions(&self.text)
    }
}

/// Split `text` at the first line consisting solely of `ANEXO`
///
/// `body.text + marker + annex.text` reconstructs `text`.
pub fn split_regions(text: &str) -> Regions<'_> {
    let Some(found) = ANNEX_MARKER.find(text) else {
        return Regions {
            body: Region {
                name: RegionName::Body,
                text,
                offset_in_document: 0,
            },
            marker: None,
            annex: None,
        };
    };

    let annex_start = if text[found.end()..].starts_with('\n') {
        found.end() + 1
    } else {
        found.end()
    };

    Regions {
        body: Region {
            name: RegionName::Body,
            text: &text[..found.start()],
            offset_in_document: 0,
        },
        marker: Some(Span::new(found.start(), annex_start)),
        annex: Some(Region {
            name: RegionName::Annex,
            text: &text[annex_start..],
            offset_in_document: annex_start,
        }),
    }
}

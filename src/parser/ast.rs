//! Structural Items
//!
//! Plain data describing the markers found in a text. No validation logic
//! lives here.

use std::fmt;

use serde::Serialize;

use crate::core::span::Span;
use crate::parser::numeral::{int_to_roman, ordinal_to_letter};

/// Kind of structural marker, from the highest level to the lowest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Chapter,
    Section,
    Article,
    Paragraph,
    Inciso,
    Alinea,
}

/// How a kind writes its ordinals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Numbering {
    Roman,
    Arabic,
    Letter,
}

impl ItemKind {
    /// 0 is the highest level
    pub fn rank(self) -> u8 {
        match self {
            ItemKind::Chapter => 0,
            ItemKind::Section => 1,
            ItemKind::Article => 2,
            ItemKind::Paragraph => 3,
            ItemKind::Inciso => 4,
            ItemKind::Alinea => 5,
        }
    }

    pub fn is_higher_than(self, other: ItemKind) -> bool {
        self.rank() < other.rank()
    }

    pub fn numbering(self) -> Numbering {
        match self {
            ItemKind::Chapter | ItemKind::Section | ItemKind::Inciso => Numbering::Roman,
            ItemKind::Article | ItemKind::Paragraph => Numbering::Arabic,
            ItemKind::Alinea => Numbering::Letter,
        }
    }

    /// Kinds whose appearance starts a new numbering scope for `self`
    ///
    /// Articles are numbered continuously across chapters and sections.
    pub fn scope_parents(self) -> &'static [ItemKind] {
        match self {
            ItemKind::Chapter | ItemKind::Article => &[],
            ItemKind::Section => &[ItemKind::Chapter],
            ItemKind::Paragraph => &[ItemKind::Chapter, ItemKind::Section, ItemKind::Article],
            ItemKind::Inciso => &[
                ItemKind::Chapter,
                ItemKind::Section,
                ItemKind::Article,
                ItemKind::Paragraph,
            ],
            ItemKind::Alinea => &[
                ItemKind::Chapter,
                ItemKind::Section,
                ItemKind::Article,
                ItemKind::Paragraph,
                ItemKind::Inciso,
            ],
        }
    }

    /// Singular Portuguese name
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Chapter => "Capítulo",
            ItemKind::Section => "Seção",
            ItemKind::Article => "Artigo",
            ItemKind::Paragraph => "Parágrafo",
            ItemKind::Inciso => "Inciso",
            ItemKind::Alinea => "Alínea",
        }
    }

    /// Plural Portuguese name
    pub fn plural(self) -> &'static str {
        match self {
            ItemKind::Chapter => "Capítulos",
            ItemKind::Section => "Seções",
            ItemKind::Article => "Artigos",
            ItemKind::Paragraph => "Parágrafos",
            ItemKind::Inciso => "Incisos",
            ItemKind::Alinea => "Alíneas",
        }
    }

    /// Render an ordinal the way this kind writes it
    pub fn format_ordinal(self, value: u32) -> String {
        match self.numbering() {
            Numbering::Roman => int_to_roman(value),
            Numbering::Arabic => value.to_string(),
            Numbering::Letter => ordinal_to_letter(value)
                .map(|c| c.to_string())
                .unwrap_or_else(|| value.to_string()),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A structural marker located in a text
///
/// All spans are byte offsets into the text that was scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralItem {
    pub kind: ItemKind,
    /// Ordinal as written (`"IV"`, `"12"`, `"c"`, `"único"`)
    pub ordinal_raw: String,
    /// Decoded ordinal; `None` for `Parágrafo único`
    pub ordinal_value: Option<u32>,
    /// Offset of the first byte of the marker's line
    pub line_start: usize,
    /// Marker plus the punctuation and spacing cluster that follows it
    pub marker_span: Span,
    /// The trailing cluster (ordinal glyphs, periods, dashes, spaces)
    pub cluster: String,
    /// Marker start to the last non-whitespace byte of the line
    pub line_span: Span,
    /// The item's own text: `line_span` extended over wrapped continuation
    /// lines, stopping before the next marker
    pub text_span: Span,
    /// End of marker to the next item of equal or higher rank
    pub body_span: Span,
    /// Index of the nearest preceding item of higher rank
    pub parent: Option<usize>,
}

impl StructuralItem {
    pub fn marker_text<'a>(&self, text: &'a str) -> &'a str {
        self.marker_span.slice(text).unwrap_or_default()
    }

    /// Marker span without trailing whitespace
    pub fn label_span(&self, text: &str) -> Span {
        let trimmed = self.marker_text(text).trim_end();
        Span::new(self.marker_span.start, self.marker_span.start + trimmed.len())
    }

    /// The item's own line, from the marker to the last visible character
    pub fn line_text<'a>(&self, text: &'a str) -> &'a str {
        self.line_span.slice(text).unwrap_or_default()
    }

    /// The item's own text, including wrapped lines
    pub fn own_text<'a>(&self, text: &'a str) -> &'a str {
        self.text_span.slice(text).unwrap_or_default()
    }

    pub fn body_text<'a>(&self, text: &'a str) -> &'a str {
        self.body_span.slice(text).unwrap_or_default()
    }

    /// Short human label, e.g. `Art. 3`, `Inciso IV`, `alínea b)`
    pub fn display_name(&self) -> String {
        match self.kind {
            ItemKind::Chapter => format!("CAPÍTULO {}", self.ordinal_raw),
            ItemKind::Section => format!("Seção {}", self.ordinal_raw),
            ItemKind::Article => format!("Art. {}", self.ordinal_raw),
            ItemKind::Paragraph if self.ordinal_value.is_none() => "Parágrafo único".to_string(),
            ItemKind::Paragraph => format!("§ {}", self.ordinal_raw),
            ItemKind::Inciso => format!("Inciso {}", self.ordinal_raw),
            ItemKind::Alinea => format!("alínea {})", self.ordinal_raw),
        }
    }
}

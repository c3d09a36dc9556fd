//! Marker Lexer
//!
//! Recognises structural markers at the start of a line. Matching is
//! anchored so that citations inside a sentence ("conforme o art. 5º") are
//! never taken for markers.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::ast::ItemKind;
use crate::parser::numeral::{letter_to_ordinal, roman_to_int};

/// One row of a [`KindSpec`]
///
/// The pattern must be anchored with `^` and define a `marker` group; an
/// `ord` group (the ordinal) and a `cluster` group (trailing punctuation and
/// spacing, which belongs to the marker) are optional.
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    pub kind: ItemKind,
    pub regex: Regex,
}

/// A marker matched on a single line, with offsets relative to that line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMarker {
    pub kind: ItemKind,
    pub ordinal_raw: String,
    pub ordinal_value: Option<u32>,
    pub start: usize,
    pub end: usize,
    pub cluster: String,
}

/// Ordered table of marker patterns; the first matching row wins
#[derive(Debug, Clone)]
pub struct KindSpec {
    patterns: Vec<MarkerPattern>,
}

static STANDARD_PATTERNS: LazyLock<Vec<MarkerPattern>> = LazyLock::new(|| {
    let rows: [(ItemKind, &str); 7] = [
        (
            ItemKind::Chapter,
            r"^[ \t]*(?P<marker>CAPÍTULO[ \t]+(?P<ord>[IVXLCDM]+)\b(?P<cluster>[ \t]*))",
        ),
        (
            ItemKind::Section,
            r"^[ \t]*(?P<marker>(?:Seção|SEÇÃO)[ \t]+(?P<ord>[IVXLCDM]+)\b(?P<cluster>[ \t]*))",
        ),
        (
            ItemKind::Article,
            r"^[ \t]*(?P<marker>Art\.[ \t]*(?P<ord>\d+)(?P<cluster>[.ºª°ᵒ \t]*))",
        ),
        (
            ItemKind::Paragraph,
            r"^[ \t]*(?P<marker>§[ \t]*(?P<ord>\d+)(?P<cluster>[.ºª°ᵒ \t]*))",
        ),
        (
            ItemKind::Paragraph,
            r"^[ \t]*(?P<marker>(?i:parágrafo)[ \t]+(?i:único)(?P<cluster>[.: \t]*))",
        ),
        (
            ItemKind::Inciso,
            r"^[ \t]*(?P<marker>(?P<ord>[IVXLCDM]+)(?P<cluster>[ \t]*[-–—][ \t]*))",
        ),
        (
            ItemKind::Alinea,
            r"^[ \t]*(?P<marker>(?P<ord>[a-z])\)(?P<cluster>[ \t]*))",
        ),
    ];

    rows.into_iter()
        .map(|(kind, pattern)| MarkerPattern {
            kind,
            regex: Regex::new(pattern).expect("valid marker regex"),
        })
        .collect()
});

impl Default for KindSpec {
    fn default() -> Self {
        Self::standard()
    }
}

impl KindSpec {
    pub fn new(patterns: Vec<MarkerPattern>) -> Self {
        Self { patterns }
    }

    /// Chapters, sections, articles, paragraphs, incisos and alíneas
    pub fn standard() -> Self {
        Self::new(STANDARD_PATTERNS.clone())
    }

    /// Keep only the rows for the given kinds
    pub fn restricted_to(&self, kinds: &[ItemKind]) -> Self {
        Self::new(
            self.patterns
                .iter()
                .filter(|p| kinds.contains(&p.kind))
                .cloned()
                .collect(),
        )
    }

    pub fn patterns(&self) -> &[MarkerPattern] {
        &self.patterns
    }

    /// Match a marker at the start of `line` (no line break included)
    pub fn match_line(&self, line: &str) -> Option<LineMarker> {
        self.patterns
            .iter()
            .find_map(|pattern| match_pattern(pattern, line))
    }
}

fn match_pattern(pattern: &MarkerPattern, line: &str) -> Option<LineMarker> {
    let caps = pattern.regex.captures(line)?;
    let marker = caps.name("marker")?;
    let ordinal_raw = caps.name("ord").map(|m| m.as_str().to_string());
    let cluster = caps
        .name("cluster")
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let (ordinal_raw, ordinal_value) = match ordinal_raw {
        Some(raw) => {
            let value = decode_ordinal(pattern.kind, &raw)?;
            (raw, Some(value))
        }
        None => ("único".to_string(), None),
    };

    Some(LineMarker {
        kind: pattern.kind,
        ordinal_raw,
        ordinal_value,
        start: marker.start(),
        end: marker.end(),
        cluster,
    })
}

fn decode_ordinal(kind: ItemKind, raw: &str) -> Option<u32> {
    match kind {
        ItemKind::Chapter | ItemKind::Section | ItemKind::Inciso => roman_to_int(raw),
        ItemKind::Article | ItemKind::Paragraph => raw.parse().ok(),
        ItemKind::Alinea => raw.chars().next().and_then(letter_to_ordinal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_patterns_compile() {
        assert_eq!(STANDARD_PATTERNS.len(), 7);
        assert_eq!(KindSpec::standard().patterns().len(), 7);
    }

    fn kind_of(line: &str) -> Option<ItemKind> {
        KindSpec::standard().match_line(line).map(|m| m.kind)
    }

    #[test]
    fn test_match_each_kind() {
        assert_eq!(kind_of("CAPÍTULO II"), Some(ItemKind::Chapter));
        assert_eq!(kind_of("Seção III"), Some(ItemKind::Section));
        assert_eq!(kind_of("Art. 1º  Aprova."), Some(ItemKind::Article));
        assert_eq!(kind_of("§ 2º  Texto."), Some(ItemKind::Paragraph));
        assert_eq!(kind_of("Parágrafo único.  Texto."), Some(ItemKind::Paragraph));
        assert_eq!(kind_of("IV – texto;"), Some(ItemKind::Inciso));
        assert_eq!(kind_of("  b) texto;"), Some(ItemKind::Alinea));
    }

    #[test]
    fn test_citations_mid_sentence_are_not_markers() {
        assert_eq!(kind_of("conforme o Art. 5º da Lei"), None);
        assert_eq!(kind_of("nos termos do inciso II - do art. 3º"), None);
        assert_eq!(kind_of("MINISTÉRIO DA INTEGRAÇÃO"), None);
        assert_eq!(kind_of("CAPÍTULOS"), None);
    }

    #[test]
    fn test_cluster_is_part_of_marker() {
        let line = "Art. 2. Revoga o anterior.";
        let marker = KindSpec::standard().match_line(line).unwrap();
        assert_eq!(marker.ordinal_value, Some(2));
        assert_eq!(marker.cluster, ". ");
        assert_eq!(&line[marker.start..marker.end], "Art. 2. ");
    }

    #[test]
    fn test_marker_offsets_skip_indentation() {
        let line = "\t  III — terceiro.";
        let marker = KindSpec::standard().match_line(line).unwrap();
        assert_eq!(marker.kind, ItemKind::Inciso);
        assert_eq!(marker.ordinal_value, Some(3));
        assert_eq!(&line[marker.start..marker.end], "III — ");
    }

    #[test]
    fn test_paragrafo_unico_has_no_value() {
        let marker = KindSpec::standard()
            .match_line("Parágrafo único. Texto.")
            .unwrap();
        assert_eq!(marker.ordinal_value, None);
        assert_eq!(marker.ordinal_raw, "único");
        assert_eq!(marker.cluster, ". ");
    }

    #[test]
    fn test_restricted_spec() {
        let spec = KindSpec::standard().restricted_to(&[ItemKind::Article]);
        assert!(spec.match_line("I - texto").is_none());
        assert!(spec.match_line("Art. 10.  Texto.").is_some());
    }
}

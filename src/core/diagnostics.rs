//! Diagnostic Assembly
//!
//! Rules report [`Finding`]s against the region they analysed. The assembler
//! rebases them onto the original document, orders them and decides which
//! ones get highlighted so that highlight ranges never overlap.

use serde::Serialize;

use crate::core::document::RegionName;
use crate::core::span::Span;

/// Severity of a diagnostic message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A replacement for an exact range of text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedFix {
    pub span: Span,
    pub original: String,
    pub replacement: String,
}

impl SuggestedFix {
    /// Replace `text[span]` with `replacement`
    pub fn replace(text: &str, span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            original: span.slice(text).unwrap_or_default().to_string(),
            replacement: replacement.into(),
        }
    }

    pub fn shifted(self, offset: usize) -> Self {
        Self {
            span: self.span.shifted(offset),
            ..self
        }
    }
}

/// A single problem reported by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub message: String,
    /// Text the finding refers to; equals `text[span]` when anchored
    pub matched_text: String,
    /// `None` for unanchored findings, which are listed but never highlighted
    pub span: Option<Span>,
    pub suggested_fix: Option<SuggestedFix>,
}

impl Finding {
    /// A finding anchored at `span` within `text`
    pub fn at(text: &str, span: Span, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            matched_text: span.slice(text).unwrap_or_default().to_string(),
            span: Some(span),
            suggested_fix: None,
        }
    }

    /// A finding with no position in the text
    pub fn unanchored(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            matched_text: String::new(),
            span: None,
            suggested_fix: None,
        }
    }

    pub fn with_fix(mut self, fix: SuggestedFix) -> Self {
        self.suggested_fix = Some(fix);
        self
    }

    pub fn is_anchored(&self) -> bool {
        self.span.is_some()
    }
}

/// Findings of one rule over one region, still in region coordinates
#[derive(Debug, Clone)]
pub struct RegionFindings {
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub region: RegionName,
    pub offset_in_document: usize,
    pub findings: Vec<Finding>,
}

/// Rendering-ready form of a finding, in document coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Highlight anchor (`erro_N`), present only when highlighted
    pub id: Option<String>,
    pub rule_id: String,
    pub rule_name: String,
    pub severity: Severity,
    pub message: String,
    pub matched_text: String,
    pub region: RegionName,
    pub span: Option<Span>,
    pub highlighted: bool,
    pub suggested_fix: Option<SuggestedFix>,
}

/// Merge region findings into a sorted diagnostic list over `document_text`
///
/// Spanned diagnostics come first, ordered by start offset; a diagnostic
/// whose span starts before the end of the previous highlight stays in the
/// list with `highlighted == false`. Unanchored diagnostics follow in the
/// order they were reported.
pub fn assemble(region_results: Vec<RegionFindings>, document_text: &str) -> Vec<Diagnostic> {
    let mut spanned = Vec::new();
    let mut unanchored = Vec::new();

    for result in region_results {
        let offset = result.offset_in_document;
        for finding in result.findings {
            let span = finding
                .span
                .map(|span| span.shifted(offset))
                .filter(|span| span.slice(document_text).is_some());
            let suggested_fix = finding
                .suggested_fix
                .map(|fix| fix.shifted(offset))
                .filter(|fix| fix.span.slice(document_text).is_some());

            if finding.span.is_some() && span.is_none() {
                log::debug!(
                    "Dropping out-of-range span for rule '{}': {:?}",
                    result.rule_id,
                    finding.span
                );
            }

            let diagnostic = Diagnostic {
                id: None,
                rule_id: result.rule_id.clone(),
                rule_name: result.rule_name.clone(),
                severity: result.severity,
                message: finding.message,
                matched_text: finding.matched_text,
                region: result.region,
                span,
                highlighted: false,
                suggested_fix,
            };

            if diagnostic.span.is_some() {
                spanned.push(diagnostic);
            } else {
                unanchored.push(diagnostic);
            }
        }
    }

    spanned.sort_by_key(|d| d.span.map(|s| (s.start, s.end)));

    let mut cursor = 0;
    let mut counter = 0;
    for diagnostic in &mut spanned {
        let Some(span) = diagnostic.span else {
            continue;
        };
        if span.is_empty() || span.start < cursor {
            continue;
        }
        cursor = span.end;
        counter += 1;
        diagnostic.highlighted = true;
        diagnostic.id = Some(format!("erro_{}", counter));
    }

    spanned.extend(unanchored);
    spanned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(region: RegionName, offset: usize, findings: Vec<Finding>) -> RegionFindings {
        RegionFindings {
            rule_id: "teste".to_string(),
            rule_name: "Teste".to_string(),
            severity: Severity::Error,
            region,
            offset_in_document: offset,
            findings,
        }
    }

    #[test]
    fn test_overlapping_spans_are_listed_but_not_highlighted() {
        let text = "abcdefghij";
        let diagnostics = assemble(
            vec![findings(
                RegionName::Body,
                0,
                vec![
                    Finding::at(text, Span::new(4, 8), "second"),
                    Finding::at(text, Span::new(0, 5), "first"),
                    Finding::at(text, Span::new(8, 10), "third"),
                ],
            )],
            text,
        );

        let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert!(diagnostics[0].highlighted);
        assert!(!diagnostics[1].highlighted);
        assert!(diagnostics[2].highlighted);
        assert_eq!(diagnostics[0].id.as_deref(), Some("erro_1"));
        assert_eq!(diagnostics[1].id, None);
        assert_eq!(diagnostics[2].id.as_deref(), Some("erro_2"));
    }

    #[test]
    fn test_annex_spans_are_rebased() {
        let document = "body\nANEXO\nXYZ";
        let annex_text = &document[11..];
        let diagnostics = assemble(
            vec![findings(
                RegionName::Annex,
                11,
                vec![Finding::at(annex_text, Span::new(0, 3), "annex")],
            )],
            document,
        );

        let span = diagnostics[0].span.unwrap();
        assert_eq!(span, Span::new(11, 14));
        assert_eq!(&document[span.start..span.end], diagnostics[0].matched_text);
    }

    #[test]
    fn test_unanchored_findings_follow_spanned_ones() {
        let text = "abc";
        let diagnostics = assemble(
            vec![findings(
                RegionName::Body,
                0,
                vec![
                    Finding::unanchored("listed only"),
                    Finding::at(text, Span::new(1, 2), "spanned"),
                ],
            )],
            text,
        );
        assert_eq!(diagnostics[0].message, "spanned");
        assert_eq!(diagnostics[1].message, "listed only");
        assert!(!diagnostics[1].highlighted);
    }

    #[test]
    fn test_out_of_range_span_becomes_unanchored() {
        let text = "abc";
        let mut finding = Finding::unanchored("broken");
        finding.span = Some(Span::new(2, 40));
        let diagnostics = assemble(vec![findings(RegionName::Body, 0, vec![finding])], text);
        assert_eq!(diagnostics[0].span, None);
        assert!(!diagnostics[0].highlighted);
    }
}

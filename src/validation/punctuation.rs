//! Punctuation Hierarchy Validator
//!
//! The terminator an item needs depends on what follows it: an item that
//! opens a sub-list ends with `:`, an item continuing a list ends with `;`,
//! `; e` or `; ou`, and the item closing a list ends with `.`.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::diagnostics::{Finding, SuggestedFix};
use crate::core::span::Span;
use crate::parser::{ItemKind, StructuralItem};

static TRAILING_TERMINATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:;[ \t]*(?:e|ou)|[.;:,]+)$").expect("valid terminator regex")
});

/// Terminator an item must carry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Opens a list of incisos or alíneas
    Colon(ItemKind),
    /// Continues a list at the same level
    ListContinues,
    /// Closes the item; `colon_tolerated` for articles and paragraphs
    Period { colon_tolerated: bool },
}

impl Requirement {
    fn accepts(self, terminator: &str) -> bool {
        match self {
            Requirement::Colon(_) => terminator == ":",
            Requirement::ListContinues => is_list_terminator(terminator),
            Requirement::Period { colon_tolerated } => {
                terminator == "." || (colon_tolerated && terminator == ":")
            }
        }
    }

    /// Replacement terminator, when there is exactly one
    fn replacement(self) -> Option<&'static str> {
        match self {
            Requirement::Colon(_) => Some(":"),
            Requirement::ListContinues => None,
            Requirement::Period { .. } => Some("."),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Colon(child) => write!(
                f,
                "deve terminar com ':' pois introduz {}",
                child.plural().to_lowercase()
            ),
            Requirement::ListContinues => f.write_str(
                "deve terminar com ';', '; e' ou '; ou' pois a enumeração continua",
            ),
            Requirement::Period {
                colon_tolerated: true,
            } => f.write_str("deve terminar com '.'"),
            Requirement::Period {
                colon_tolerated: false,
            } => f.write_str("deve terminar com '.' pois encerra a enumeração"),
        }
    }
}

fn is_list_terminator(terminator: &str) -> bool {
    if terminator == ";" {
        return true;
    }
    terminator
        .strip_prefix(';')
        .map(str::trim_start)
        .is_some_and(|rest| rest == "e" || rest == "ou")
}

/// Decide the terminator `item` needs given the item right after it
pub fn requirement_for(item: &StructuralItem, next: Option<&StructuralItem>) -> Option<Requirement> {
    let next_kind = next.map(|n| n.kind);
    let requirement = match (item.kind, next_kind) {
        (ItemKind::Chapter | ItemKind::Section, _) => return None,
        (ItemKind::Article | ItemKind::Paragraph, Some(ItemKind::Inciso)) => {
            Requirement::Colon(ItemKind::Inciso)
        }
        (ItemKind::Article | ItemKind::Paragraph, _) => Requirement::Period {
            colon_tolerated: true,
        },
        (ItemKind::Inciso, Some(ItemKind::Alinea)) => Requirement::Colon(ItemKind::Alinea),
        (ItemKind::Inciso, Some(ItemKind::Inciso))
        | (ItemKind::Alinea, Some(ItemKind::Alinea | ItemKind::Inciso)) => {
            Requirement::ListContinues
        }
        (ItemKind::Inciso | ItemKind::Alinea, _) => Requirement::Period {
            colon_tolerated: false,
        },
    };
    Some(requirement)
}

/// Span of the trailing terminator cluster of `item`'s own text
///
/// Empty (at the end of the text) when the item has no terminator.
pub fn terminator_span(text: &str, item: &StructuralItem) -> Span {
    let own = item.own_text(text);
    match TRAILING_TERMINATOR.find(own) {
        Some(found) => Span::new(
            item.text_span.start + found.start(),
            item.text_span.start + found.end(),
        ),
        None => Span::new(item.text_span.end, item.text_span.end),
    }
}

/// Check the terminator of every article, paragraph, inciso and alínea
pub fn validate_punctuation(text: &str, items: &[StructuralItem]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Some(requirement) = requirement_for(item, items.get(index + 1)) else {
            continue;
        };

        let cluster = terminator_span(text, item);
        let terminator = cluster.slice(text).unwrap_or_default();
        if requirement.accepts(terminator) {
            continue;
        }

        let mut finding = Finding::at(
            text,
            item.text_span,
            format!("Pontuação incorreta: {} {}.", item.display_name(), requirement),
        );
        if let Some(replacement) = requirement.replacement() {
            finding = finding.with_fix(SuggestedFix::replace(text, cluster, replacement));
        }
        findings.push(finding);
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{KindSpec, scan};

    fn check(text: &str) -> Vec<Finding> {
        let items = scan(text, &KindSpec::standard());
        validate_punctuation(text, &items)
    }

    #[test]
    fn test_well_punctuated_article() {
        let text = "Art. 1º  Compete ao Conselho:\n\
I – aprovar o plano;\n\
II – deliberar sobre:\n\
a) programas; e\n\
b) projetos;\n\
III – fiscalizar.\n\
§ 1º  O Conselho reúne-se mensalmente.\n\
Art. 2º  Esta Resolução entra em vigor na data de sua publicação.\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_article_opening_incisos_requires_colon() {
        let text = "Art. 1º  Compete ao Conselho.\nI – aprovar;\nII – deliberar.\n";
        let findings = check(text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched_text, "Art. 1º  Compete ao Conselho.");

        let fix = findings[0].suggested_fix.as_ref().unwrap();
        assert_eq!(fix.original, ".");
        assert_eq!(fix.replacement, ":");
        assert_eq!(&text[fix.span.start..fix.span.end], ".");
    }

    #[test]
    fn test_article_colon_tolerated_without_sublist() {
        assert!(check("Art. 1º  Fica aprovado o seguinte texto:\nArt. 2º  Revoga.\n").is_empty());
    }

    #[test]
    fn test_closing_inciso_needs_period() {
        let findings = check("Art. 1º  Compete:\nI – aprovar;\nII – deliberar;\n");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("Inciso II"));
        let fix = findings[0].suggested_fix.as_ref().unwrap();
        assert_eq!(fix.original, ";");
        assert_eq!(fix.replacement, ".");
    }

    #[test]
    fn test_continuing_inciso_has_no_fix() {
        let findings = check("Art. 1º  Compete:\nI – aprovar.\nII – deliberar.\n");
        assert_eq!(findings.len(), 1);
        assert!(findings[0].suggested_fix.is_none());
    }

    #[test]
    fn test_chapter_forces_closing_branch() {
        let text = "Art. 1º  Compete:\nI – aprovar;\nCAPÍTULO II\nArt. 2º  Revoga.\n";
        let findings = check(text);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.contains("encerra"));
    }

    #[test]
    fn test_missing_terminator_gets_insertion_fix() {
        let text = "Art. 1º  Aprova o regimento\n";
        let findings = check(text);
        let fix = findings[0].suggested_fix.as_ref().unwrap();
        assert!(fix.span.is_empty());
        assert_eq!(fix.span.start, text.trim_end().len());
        assert_eq!(fix.replacement, ".");
    }

    #[test]
    fn test_wrapped_incisos_read_their_last_line() {
        let text = "Art. 1º  Compete ao Conselho:\n\
I – aprovar o plano anual de\n\
investimentos do Fundo;\n\
II – deliberar sobre\n\
programas.\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_wrapped_article_opening_incisos() {
        let text = "Art. 1º  Compete ao Conselho, nos termos da lei,\n\
e do seu regimento:\n\
I – aprovar;\n\
II – deliberar.\n";
        assert!(check(text).is_empty());
    }

    #[test]
    fn test_wrapped_inciso_fix_points_at_last_line() {
        let text = "Art. 1º  Compete:\nI – aprovar o plano anual de\ninvestimentos do Fundo.\nII – deliberar;\n";
        let findings = check(text);
        assert_eq!(findings.len(), 2);
        assert_eq!(
            findings[0].matched_text,
            "I – aprovar o plano anual de\ninvestimentos do Fundo."
        );
        assert!(findings[0].suggested_fix.is_none());

        let fix = findings[1].suggested_fix.as_ref().unwrap();
        assert_eq!(fix.span.start, text.rfind(';').unwrap());
        assert_eq!(fix.replacement, ".");
    }

    #[test]
    fn test_terminator_pattern_compiles() {
        assert_eq!(
            TRAILING_TERMINATOR.find("aprovar; ou").map(|m| m.as_str()),
            Some("; ou")
        );
    }

    #[test]
    fn test_list_terminators() {
        assert!(is_list_terminator(";"));
        assert!(is_list_terminator("; e"));
        assert!(is_list_terminator("; ou"));
        assert!(!is_list_terminator(","));
        assert!(!is_list_terminator(";;"));
    }
}

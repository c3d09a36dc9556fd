//! Catalog Checks
//!
//! Header, epigraph, ementa, preamble, validity clause and signature checks
//! driven by the tables of a [`Profile`](crate::profile::Profile).

use regex::Regex;

use crate::core::diagnostics::{Finding, SuggestedFix};
use crate::core::span::Span;
use crate::parser::lines_with_offsets;
use crate::profile::{
    Closing, Ementa, Epigraph, HeaderLine, MatchMode, Preamble, RequiredTerm, Signature,
};
use crate::validation::result::RuleResult;

const DRAFT_BANNER: &str = "MINUTA DE DOCUMENTO";

/// A trimmed, non-empty line with its span in the region
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    span: Span,
    text: &'a str,
}

fn non_empty_lines(text: &str) -> Vec<Line<'_>> {
    lines_with_offsets(text)
        .filter_map(|(start, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                return None;
            }
            let leading = line.len() - line.trim_start().len();
            Some(Line {
                span: Span::new(start + leading, start + leading + trimmed.len()),
                text: trimmed,
            })
        })
        .collect()
}

/// True when no character has a distinct uppercase form
pub fn is_all_uppercase(text: &str) -> bool {
    text.chars()
        .all(|c| c.to_uppercase().eq(std::iter::once(c)))
}

/// Letters and digits only, upper-cased, for content comparisons
pub fn alphanumeric_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Span of a regex match with surrounding whitespace trimmed
fn trimmed_span(text: &str, start: usize, end: usize) -> Span {
    let slice = &text[start..end];
    let leading = slice.len() - slice.trim_start().len();
    let visible = slice.trim().len();
    Span::new(start + leading, start + leading + visible)
}

fn missing_terms(
    text: &str,
    span: Span,
    block: &str,
    terms: &[RequiredTerm],
) -> Vec<Finding> {
    let upper = block.to_uppercase();
    terms
        .iter()
        .filter(|term| !upper.contains(&term.text.to_uppercase()))
        .map(|term| Finding::at(text, span, term.message.clone()))
        .collect()
}

/// Expected lines at the top of the document
///
/// The draft banner (`MINUTA DE DOCUMENTO`) is not counted.
pub fn check_header(text: &str, lines: &[HeaderLine]) -> RuleResult {
    let content: Vec<Line<'_>> = non_empty_lines(text)
        .into_iter()
        .filter(|line| !line.text.to_uppercase().contains(DRAFT_BANNER))
        .collect();

    let mut findings = Vec::new();
    for expected in lines {
        let Some(first_accepted) = expected.accepted.first() else {
            continue;
        };
        let Some(line) = content.get(expected.line - 1) else {
            findings.push(Finding::unanchored(format!(
                "Cabeçalho incompleto: linha {} ausente. Esperado: '{}'.",
                expected.line, first_accepted
            )));
            continue;
        };

        let upper = line.text.to_uppercase();
        let accepted = expected.accepted.iter().any(|value| match expected.mode {
            MatchMode::Equals => line.text == value,
            MatchMode::Contains => upper.contains(&value.to_uppercase()),
        });
        if accepted {
            continue;
        }

        let mut finding = Finding::at(
            text,
            line.span,
            format!(
                "Linha {} do cabeçalho incorreta. Esperado: '{}'. Encontrado: '{}'.",
                expected.line, first_accepted, line.text
            ),
        );
        if expected.mode == MatchMode::Equals && expected.accepted.len() == 1 {
            finding = finding.with_fix(SuggestedFix::replace(text, line.span, first_accepted));
        }
        findings.push(finding);
    }

    if findings.is_empty() {
        RuleResult::ok_with_detail("Cabeçalho OK.")
    } else {
        RuleResult::fail(findings)
    }
}

/// Title line of the resolution (`RESOLUÇÃO ... Nº ..., DE ...`)
pub fn check_epigraph(text: &str, epigraph: &Epigraph) -> RuleResult {
    let Some(found) = epigraph.pattern.find(text) else {
        return RuleResult::warn(vec![Finding::unanchored(
            "Epígrafe não encontrada no padrão esperado.",
        )]);
    };

    let span = trimmed_span(text, found.start(), found.end());
    let matched = span.slice(text).unwrap_or_default();

    let mut findings = missing_terms(text, span, matched, &epigraph.required);
    if epigraph.require_uppercase && !is_all_uppercase(matched) {
        findings.push(
            Finding::at(text, span, "A epígrafe deve estar totalmente em MAIÚSCULAS.")
                .with_fix(SuggestedFix::replace(text, span, matched.to_uppercase())),
        );
    }

    if findings.is_empty() {
        RuleResult::ok_with_detail("Epígrafe correta.")
    } else {
        RuleResult::fail(findings)
    }
}

/// The ementa is the first non-empty line after the epigraph and starts with
/// an action verb
pub fn check_ementa(text: &str, ementa: &Ementa, epigraph: Option<&Regex>) -> RuleResult {
    let Some(found) = epigraph.and_then(|pattern| pattern.find(text)) else {
        return RuleResult::warn(vec![Finding::unanchored(
            "Não foi possível localizar a ementa pois a epígrafe não foi encontrada.",
        )]);
    };

    let after = found.end();
    let Some(line) = non_empty_lines(&text[after..]).first().copied() else {
        return RuleResult::fail(vec![Finding::unanchored(
            "Não foi possível encontrar o texto da ementa após a epígrafe.",
        )]);
    };

    let word = line
        .text
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .trim_end_matches(|c: char| !c.is_alphanumeric());
    if ementa.verbs.iter().any(|verb| verb == word) {
        return RuleResult::ok_with_detail(format!(
            "A ementa inicia corretamente com o verbo '{}'.",
            word
        ));
    }

    let start = after + line.span.start;
    let span = Span::new(start, start + word.len());
    let mut finding = Finding::at(
        text,
        span,
        format!(
            "A ementa deve começar com um verbo de ação (ex.: {}), mas começou com '{}'.",
            ementa.verbs.iter().take(2).cloned().collect::<Vec<_>>().join(", "),
            word
        ),
    );
    if let Some(verb) = ementa
        .verbs
        .iter()
        .find(|verb| verb.to_lowercase() == word.to_lowercase())
    {
        finding = finding.with_fix(SuggestedFix::replace(text, span, verb.clone()));
    }
    RuleResult::fail(vec![finding])
}

/// Authority declaration preceding the articles
///
/// `preamble_end` bounds the search for the closing phrase; it is normally
/// the start of the first article.
pub fn check_preamble(text: &str, preamble: &Preamble, preamble_end: usize) -> RuleResult {
    let Some(authority) = preamble
        .locator
        .captures(text)
        .and_then(|caps| caps.name("authority"))
    else {
        return RuleResult::warn(vec![Finding::unanchored(
            "Início do preâmbulo (autoridade) não encontrado.",
        )]);
    };

    let span = trimmed_span(text, authority.start(), authority.end());
    let found = span.slice(text).unwrap_or_default();
    let mut findings = Vec::new();

    let mut content_ok = true;
    if !preamble.accepted.is_empty() {
        let key = alphanumeric_key(found);
        match preamble
            .accepted
            .iter()
            .find(|accepted| alphanumeric_key(accepted) == key)
        {
            Some(accepted) if accepted != found && is_all_uppercase(found) => {
                findings.push(
                    Finding::at(
                        text,
                        span,
                        format!(
                            "Formatação da autoridade difere do padrão oficial: '{}'.",
                            accepted
                        ),
                    )
                    .with_fix(SuggestedFix::replace(text, span, accepted.clone())),
                );
            }
            Some(_) => {}
            None => {
                content_ok = false;
                let mut finding = Finding::at(
                    text,
                    span,
                    format!(
                        "Autoridade incorreta ou incompleta. Esperado: '{}'.",
                        preamble.accepted.join("' ou '")
                    ),
                );
                if let [only] = preamble.accepted.as_slice() {
                    finding = finding.with_fix(SuggestedFix::replace(text, span, only.clone()));
                }
                findings.push(finding);
            }
        }
    }

    findings.extend(missing_terms(text, span, found, &preamble.required));

    if content_ok && preamble.require_uppercase && !is_all_uppercase(found) {
        findings.push(
            Finding::at(text, span, "O preâmbulo deve estar totalmente em MAIÚSCULAS.")
                .with_fix(SuggestedFix::replace(text, span, found.to_uppercase())),
        );
    }

    if !preamble.closing_phrases.is_empty() {
        let end = preamble_end.clamp(span.end, text.len());
        let tail = text.get(span.end..end).unwrap_or_default().to_lowercase();
        let closed = preamble
            .closing_phrases
            .iter()
            .any(|phrase| tail.contains(&phrase.to_lowercase()));
        if !closed {
            findings.push(Finding::unanchored(format!(
                "O preâmbulo deve terminar com '{}'.",
                preamble.closing_phrases.join("' ou '")
            )));
        }
    }

    if findings.is_empty() {
        RuleResult::ok_with_detail("Preâmbulo correto.")
    } else {
        RuleResult::fail(findings)
    }
}

/// Standard validity clause (`Esta Resolução entra em vigor ...`)
pub fn check_closing(text: &str, closing: &Closing) -> RuleResult {
    if closing.patterns.iter().any(|pattern| pattern.is_match(text)) {
        RuleResult::ok_with_detail("Cláusula de vigência encontrada.")
    } else {
        RuleResult::fail(vec![Finding::unanchored(format!(
            "A cláusula padrão '{}' não foi encontrada.",
            closing.expected
        ))])
    }
}

fn looks_like_signer(line: &str) -> bool {
    line.split_whitespace().count() > 1
        && line.chars().any(char::is_alphabetic)
        && is_all_uppercase(line)
        && !line.starts_with("Art.")
        && !line.starts_with("ART.")
}

/// Signer name in capitals, followed by the role in mixed case
pub fn check_signature(text: &str, signature: &Signature) -> RuleResult {
    let lines = non_empty_lines(text);
    if lines.len() < 2 {
        return RuleResult::fail(vec![Finding::unanchored(
            "Não foi possível encontrar um bloco de assinatura no final do documento.",
        )]);
    }

    let tail = &lines[lines.len().saturating_sub(signature.last_lines)..];
    let Some(position) = tail.iter().position(|line| looks_like_signer(line.text)) else {
        return RuleResult::fail(vec![Finding::unanchored(
            "Nome do signatário em letras maiúsculas não encontrado no final do documento.",
        )]);
    };

    if signature.require_role {
        let name = tail[position];
        let role_ok = tail
            .get(position + 1)
            .is_some_and(|role| !is_all_uppercase(role.text));
        if !role_ok {
            return RuleResult::fail(vec![Finding::at(
                text,
                name.span,
                format!(
                    "Cargo abaixo do nome '{}' não encontrado ou está incorretamente em maiúsculas.",
                    name.text
                ),
            )]);
        }
    }

    RuleResult::ok_with_detail("Bloco de assinatura no formato correto.")
}

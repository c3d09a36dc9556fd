//! Structural Checks
//!
//! Checks shared by every profile and by both regions: marker formatting of
//! articles and paragraphs, acronym definitions, dates and the annex marker.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::diagnostics::{Finding, SuggestedFix};
use crate::core::span::Span;
use crate::parser::{ItemKind, KindSpec, StructuralItem, lines_with_offsets, roman_to_int};

const ORDINAL_GLYPHS: [char; 4] = ['º', 'ª', '°', 'ᵒ'];
const SPACING_REASON: &str = "espaçamento incorreto (esperado 2 espaços após o símbolo)";

static PARENTHESIZED_ACRONYM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([A-ZÀ-Ú]{2,})\)").expect("valid acronym regex")
});

static HYPHENATED_ACRONYM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]-[ \t]*([A-ZÀ-Ú]{2,})\b").expect("valid acronym regex")
});

static LEADING_ZERO_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(0[1-9])([ \t]+de[ \t]+(?:janeiro|fevereiro|março|abril|maio|junho|julho|agosto|setembro|outubro|novembro|dezembro)[ \t]+de[ \t]+\d{4})\b",
    )
    .expect("valid date regex")
});

static ANNEX_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[ \t]*anexo\b").expect("valid annex heading regex"));

static INCISO_ONLY: LazyLock<KindSpec> =
    LazyLock::new(|| KindSpec::standard().restricted_to(&[ItemKind::Inciso]));

/// Parts of a marker cluster: visible symbols, inner spacing, trailing spaces
struct Cluster<'a> {
    symbols: String,
    inner_space: bool,
    trailing: &'a str,
}

impl<'a> Cluster<'a> {
    fn parse(cluster: &'a str) -> Self {
        let visible = cluster.trim_end();
        Self {
            symbols: visible.chars().filter(|c| !c.is_whitespace()).collect(),
            inner_space: visible.chars().any(char::is_whitespace),
            trailing: &cluster[visible.len()..],
        }
    }

    fn has_glyph(&self) -> bool {
        self.symbols.chars().any(|c| ORDINAL_GLYPHS.contains(&c))
    }
}

/// Reasons why a numbered marker's cluster is wrong, in reading order
fn cluster_reasons(value: u32, cluster: &Cluster<'_>) -> Vec<&'static str> {
    let mut reasons = Vec::new();

    if value <= 9 {
        match cluster.symbols.as_str() {
            "º" => {}
            "" => reasons.push("ausência de indicador ordinal"),
            "." => reasons.push("uso de ponto final (use 'º')"),
            _ => reasons.push("símbolo incorreto (use 'º')"),
        }
    } else {
        match cluster.symbols.as_str() {
            "." => {}
            "" => reasons.push("ausência de ponto final"),
            _ if cluster.has_glyph() => reasons.push("uso de ordinal (use ponto final)"),
            _ => reasons.push("símbolo incorreto (use ponto final)"),
        }
    }

    if cluster.inner_space || cluster.trailing != "  " {
        reasons.push(SPACING_REASON);
    }
    reasons
}

fn canonical_marker(prefix: &str, value: u32) -> String {
    if value <= 9 {
        format!("{} {}º  ", prefix, value)
    } else {
        format!("{} {}.  ", prefix, value)
    }
}

fn capitalize(reason: &str) -> String {
    let mut chars = reason.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn marker_finding(
    text: &str,
    item: &StructuralItem,
    label: &str,
    reasons: &[&str],
    canonical: String,
) -> Finding {
    let message = format!("No '{}': {}.", label, capitalize(&reasons.join("; ")));
    Finding::at(text, item.marker_span, message).with_fix(SuggestedFix::replace(
        text,
        item.marker_span,
        canonical,
    ))
}

/// `Art. Nº  ` for 1–9, `Art. N.  ` from 10 on
pub fn check_article_format(text: &str, items: &[StructuralItem]) -> Vec<Finding> {
    items
        .iter()
        .filter(|item| item.kind == ItemKind::Article)
        .filter_map(|item| {
            let value = item.ordinal_value?;
            let canonical = canonical_marker("Art.", value);
            let marker = item.marker_text(text);
            if marker == canonical {
                return None;
            }

            let mut reasons = cluster_reasons(value, &Cluster::parse(&item.cluster));
            let head_ok = marker.starts_with("Art. ")
                && marker[5..].starts_with(|c: char| c.is_ascii_digit());
            if !head_ok && !reasons.contains(&SPACING_REASON) {
                reasons.push("espaçamento incorreto entre 'Art.' e o número");
            }
            if reasons.is_empty() {
                reasons.push("formato incorreto");
            }

            let label = format!("Art. {}", item.ordinal_raw);
            Some(marker_finding(text, item, &label, &reasons, canonical))
        })
        .collect()
}

/// `§ Nº  ` / `§ N.  ` and `Parágrafo único.  `
pub fn check_paragraph_format(text: &str, items: &[StructuralItem]) -> Vec<Finding> {
    const UNICO: &str = "Parágrafo único.  ";

    items
        .iter()
        .filter(|item| item.kind == ItemKind::Paragraph)
        .filter_map(|item| {
            let marker = item.marker_text(text);

            let Some(value) = item.ordinal_value else {
                if marker == UNICO {
                    return None;
                }
                let cluster = Cluster::parse(&item.cluster);
                let mut reasons = Vec::new();
                if !marker.starts_with("Parágrafo único") {
                    reasons.push("grafia incorreta (use 'Parágrafo único')");
                }
                match cluster.symbols.as_str() {
                    "." => {}
                    "" => reasons.push("ausência de ponto final"),
                    _ => reasons.push("símbolo incorreto (use ponto final)"),
                }
                if cluster.inner_space || cluster.trailing != "  " {
                    reasons.push(SPACING_REASON);
                }
                return Some(marker_finding(
                    text,
                    item,
                    "Parágrafo único",
                    &reasons,
                    UNICO.to_string(),
                ));
            };

            let canonical = canonical_marker("§", value);
            if marker == canonical {
                return None;
            }
            let mut reasons = cluster_reasons(value, &Cluster::parse(&item.cluster));
            if !marker.starts_with("§ ") && !reasons.contains(&SPACING_REASON) {
                reasons.push("espaçamento incorreto entre '§' e o número");
            }
            if reasons.is_empty() {
                reasons.push("formato incorreto");
            }
            let label = format!("§ {}", item.ordinal_raw);
            Some(marker_finding(text, item, &label, &reasons, canonical))
        })
        .collect()
}

fn is_roman_numeral(acronym: &str) -> bool {
    roman_to_int(acronym).is_some()
}

/// Acronyms must be introduced with a dash (`Fundo — FDCO`), not with
/// parentheses or a hyphen
pub fn check_acronyms(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (line_start, line) in lines_with_offsets(text) {
        // The dash after an inciso numeral is not an acronym separator
        let skip = INCISO_ONLY
            .match_line(line)
            .map(|marker| marker.end)
            .unwrap_or(0);

        for caps in PARENTHESIZED_ACRONYM.captures_iter(line) {
            let (Some(whole), Some(acronym)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() < skip || is_roman_numeral(acronym.as_str()) {
                continue;
            }
            let span = Span::new(line_start + whole.start(), line_start + whole.end());
            findings.push(
                Finding::at(
                    text,
                    span,
                    format!(
                        "A sigla '{}' não deve estar entre parênteses. Use travessão (—).",
                        whole.as_str()
                    ),
                )
                .with_fix(SuggestedFix::replace(
                    text,
                    span,
                    format!("— {}", acronym.as_str()),
                )),
            );
        }

        for caps in HYPHENATED_ACRONYM.captures_iter(line) {
            let (Some(whole), Some(acronym)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if whole.start() < skip || is_roman_numeral(acronym.as_str()) {
                continue;
            }
            // Leave the leading blank out of the highlighted range
            let span = Span::new(line_start + whole.start() + 1, line_start + whole.end());
            findings.push(
                Finding::at(
                    text,
                    span,
                    format!(
                        "A sigla '{}' deve ser precedida de travessão (—), não de hífen.",
                        acronym.as_str()
                    ),
                )
                .with_fix(SuggestedFix::replace(
                    text,
                    span,
                    format!("— {}", acronym.as_str()),
                )),
            );
        }
    }

    findings
}

/// Days are written without a leading zero (`5 de março de 2024`)
pub fn check_leading_zero_dates(text: &str) -> Vec<Finding> {
    LEADING_ZERO_DATE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let day = caps.get(1)?;
            let rest = caps.get(2)?;
            let corrected = format!("{}{}", &day.as_str()[1..], rest.as_str());
            let span = Span::new(whole.start(), whole.end());
            let day_span = Span::new(day.start(), day.end());
            Some(
                Finding::at(
                    text,
                    span,
                    format!(
                        "Data com dia formatado incorretamente (zero à esquerda): '{}'. O correto seria: '{}'.",
                        whole.as_str(),
                        corrected
                    ),
                )
                .with_fix(SuggestedFix::replace(text, day_span, &day.as_str()[1..])),
            )
        })
        .collect()
}

/// Heading-like lines that look like an annex marker but are not `ANEXO`
pub fn check_annex_marker(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (line_start, line) in lines_with_offsets(text) {
        if !ANNEX_LIKE.is_match(line) {
            continue;
        }
        let trimmed = line.trim();
        if trimmed == "ANEXO" || trimmed.ends_with(['.', ';', ':', ',']) {
            continue;
        }

        let leading = line.len() - line.trim_start().len();
        let span = Span::new(line_start + leading, line_start + leading + trimmed.len());
        let mut finding = Finding::at(
            text,
            span,
            format!(
                "Formato de 'Anexo' incorreto. Encontrado: '{}'. Esperado: 'ANEXO' (exatamente, em maiúsculas e sozinho na linha).",
                trimmed
            ),
        );
        if trimmed.eq_ignore_ascii_case("anexo") {
            finding = finding.with_fix(SuggestedFix::replace(text, span, "ANEXO"));
        }
        findings.push(finding);
    }

    findings
}

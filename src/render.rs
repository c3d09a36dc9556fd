//! Rendering
//!
//! Turns an [`AuditResult`] into something a person reads: the document with
//! highlighted spans, a full HTML report, or plain text for terminals.
//! Offsets are always taken on the raw text; escaping applies to the text
//! between highlights only.

use std::fmt::Write as _;

use crate::core::diagnostics::{Diagnostic, Severity};
use crate::validation::{AuditResult, Status};

/// Escape text for inclusion in HTML content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// The document text with every highlighted diagnostic wrapped in `<mark>`
///
/// Highlighted spans never overlap, so a single left-to-right pass is
/// enough. Non-highlighted diagnostics are ignored here.
pub fn render_html(text: &str, diagnostics: &[Diagnostic]) -> String {
    let mut marks: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.highlighted)
        .filter_map(|d| Some((d.span?, d)))
        .collect();
    marks.sort_by_key(|(span, _)| span.start);

    let mut out = String::with_capacity(text.len() + marks.len() * 64);
    let mut cursor = 0;
    for (span, diagnostic) in marks {
        let (Some(before), Some(inner)) = (text.get(cursor..span.start), span.slice(text)) else {
            continue;
        };
        out.push_str(&escape_html(before));
        let _ = write!(
            out,
            r#"<mark id="{}" class="erro-highlight" title="{}">{}</mark>"#,
            diagnostic.id.as_deref().unwrap_or_default(),
            escape_html(&diagnostic.rule_name),
            escape_html(inner)
        );
        cursor = span.end;
    }
    out.push_str(&escape_html(text.get(cursor..).unwrap_or_default()));
    out
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Ok => "OK",
        Status::Fail => "FALHA",
        Status::Warn => "AVISO",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "erro",
        Severity::Warning => "aviso",
        Severity::Info => "info",
    }
}

/// Standalone HTML page: rule checklist, findings panel and highlighted text
pub fn render_report_html(text: &str, result: &AuditResult) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Auditoria de Resolução</title>\n<style>\n");
    out.push_str(".erro-highlight { background: #ffd6d6; }\n");
    out.push_str(".status-ok { color: #1a7f37; } .status-fail { color: #cf222e; } .status-warn { color: #9a6700; }\n");
    out.push_str("pre.documento { white-space: pre-wrap; }\n</style>\n</head>\n<body>\n");

    let _ = writeln!(
        out,
        "<h1>Tipo de documento: {}</h1>",
        escape_html(&result.document_type.to_string())
    );

    out.push_str("<h2>Verificações</h2>\n<ul class=\"regras\">\n");
    for rule in &result.rules {
        let class = match rule.status {
            Status::Ok => "status-ok",
            Status::Fail => "status-fail",
            Status::Warn => "status-warn",
        };
        let _ = write!(
            out,
            "<li class=\"{}\">[{}] {} ({})",
            class,
            status_label(rule.status),
            escape_html(&rule.rule_name),
            rule.region.label()
        );
        if let Some(detail) = &rule.detail {
            let _ = write!(out, " <small>{}</small>", escape_html(detail));
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");

    out.push_str("<h2>Apontamentos</h2>\n<ol class=\"apontamentos\">\n");
    for diagnostic in &result.diagnostics {
        let anchor = match &diagnostic.id {
            Some(id) => format!("<a href=\"#{}\">{}</a> ", id, id),
            None => String::new(),
        };
        let _ = writeln!(
            out,
            "<li>{}<strong>{}</strong> [{}] {}</li>",
            anchor,
            escape_html(&diagnostic.rule_name),
            severity_label(diagnostic.severity),
            escape_html(&diagnostic.message)
        );
    }
    out.push_str("</ol>\n");

    let _ = writeln!(
        out,
        "<pre class=\"documento\">{}</pre>",
        render_html(text, &result.diagnostics)
    );
    out.push_str("</body>\n</html>\n");
    out
}

/// 1-based line and column (in characters) of a byte offset
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let before = text.get(..offset).unwrap_or(text);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// Terminal-friendly listing of the findings and failed rules
pub fn render_text(text: &str, result: &AuditResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Tipo de documento: {}", result.document_type);

    for rule in result.failed_rules() {
        let _ = writeln!(
            out,
            "[{}] {} ({})",
            status_label(rule.status),
            rule.rule_name,
            rule.region.label()
        );
    }

    if result.diagnostics.is_empty() {
        out.push_str("Nenhum apontamento.\n");
        return out;
    }

    for diagnostic in &result.diagnostics {
        let position = match diagnostic.span {
            Some(span) => {
                let (line, column) = line_col(text, span.start);
                format!("{}:{}", line, column)
            }
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{} {}: {} [{}]",
            position,
            severity_label(diagnostic.severity),
            diagnostic.message,
            diagnostic.rule_id
        );
        if let Some(fix) = &diagnostic.suggested_fix {
            let _ = writeln!(out, "    sugestão: '{}' -> '{}'", fix.original, fix.replacement);
        }
    }
    out
}

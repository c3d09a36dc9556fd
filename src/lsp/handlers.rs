use std::collections::HashMap;

use tower_lsp::jsonrpc::Result as LspResult;
use tower_lsp::lsp_types::*;

use crate::core::diagnostics::{self, Severity};
use crate::core::document::{RegionName, normalize_line_breaks, split_regions};
use crate::core::span::Span;
use crate::lsp::backend::Backend;
use crate::lsp::document::{DocumentState, LineIndex};
use crate::parser::{ItemKind, KindSpec, StructuralItem, scan};

/// Source name attached to every published diagnostic
pub const DIAGNOSTIC_SOURCE: &str = "resolucao-ls";

/// Trait for handling hover requests
#[tower_lsp::async_trait]
pub trait HandleHover {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>>;
}

/// Trait for handling code action requests
#[tower_lsp::async_trait]
pub trait HandleCodeAction {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>>;
}

/// Trait for handling document symbols
#[tower_lsp::async_trait]
pub trait HandleDocumentSymbol {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>>;
}

/// Trait for handling diagnostics
#[tower_lsp::async_trait]
pub trait HandleDiagnostics {
    async fn create_document_state(&self, content: String) -> DocumentState;
    async fn publish_diagnostics(&self, uri: Url);
}

/// Convert an audit diagnostic into its LSP form
///
/// Unanchored diagnostics are reported on the first line.
pub fn create_lsp_diagnostic(
    state: &DocumentState,
    diagnostic: &diagnostics::Diagnostic,
) -> tower_lsp::lsp_types::Diagnostic {
    let severity = match diagnostic.severity {
        Severity::Error => DiagnosticSeverity::ERROR,
        Severity::Warning => DiagnosticSeverity::WARNING,
        Severity::Info => DiagnosticSeverity::INFORMATION,
    };

    let range = diagnostic
        .span
        .map(|span| state.range(span))
        .unwrap_or_default();

    tower_lsp::lsp_types::Diagnostic::new(
        range,
        Some(severity),
        Some(NumberOrString::String(diagnostic.rule_id.clone())),
        Some(DIAGNOSTIC_SOURCE.to_string()),
        format!("{} ({})", diagnostic.message, diagnostic.region.label()),
        None,
        None,
    )
}

/// Markdown for the diagnostics whose span contains `offset`
pub fn hover_markdown(state: &DocumentState, offset: usize) -> Option<(String, Span)> {
    let hits: Vec<_> = state
        .result
        .diagnostics
        .iter()
        .filter_map(|d| d.span.map(|span| (span, d)))
        .filter(|(span, _)| span.contains(offset))
        .collect();

    let (first_span, _) = hits.first()?;
    let mut text = String::new();
    for (_, diagnostic) in &hits {
        if !text.is_empty() {
            text.push_str("\n\n---\n\n");
        }
        text.push_str(&format!("**{}**\n\n{}", diagnostic.rule_name, diagnostic.message));
        if let Some(fix) = &diagnostic.suggested_fix {
            text.push_str(&format!("\n\nSugestão: `{}`", fix.replacement.trim_end()));
        }
    }
    Some((text, *first_span))
}

/// Quick fixes for the diagnostics that intersect `range`
pub fn code_actions(uri: &Url, state: &DocumentState, range: Range) -> Vec<CodeActionOrCommand> {
    let start = state.offset(range.start);
    let end = state.offset(range.end);
    let requested = Span::new(start, end.max(start));

    state
        .result
        .diagnostics
        .iter()
        .filter(|d| d.span.is_some_and(|span| span.intersects(&requested) || span.contains(start)))
        .filter_map(|diagnostic| {
            let fix = diagnostic.suggested_fix.as_ref()?;
            let edit = TextEdit::new(state.range(fix.span), fix.replacement.clone());
            let title = if fix.original.is_empty() {
                format!("Inserir '{}'", fix.replacement.trim_end())
            } else {
                format!(
                    "Substituir '{}' por '{}'",
                    fix.original.trim_end(),
                    fix.replacement.trim_end()
                )
            };

            Some(CodeActionOrCommand::CodeAction(CodeAction {
                title,
                kind: Some(CodeActionKind::QUICKFIX),
                diagnostics: Some(vec![create_lsp_diagnostic(state, diagnostic)]),
                edit: Some(WorkspaceEdit {
                    changes: Some(HashMap::from([(uri.clone(), vec![edit])])),
                    ..Default::default()
                }),
                is_preferred: Some(true),
                ..Default::default()
            }))
        })
        .collect()
}

fn symbol_kind(kind: ItemKind) -> SymbolKind {
    match kind {
        ItemKind::Chapter => SymbolKind::MODULE,
        ItemKind::Section => SymbolKind::NAMESPACE,
        _ => SymbolKind::FUNCTION,
    }
}

#[allow(deprecated)]
fn symbol(name: String, detail: Option<String>, kind: SymbolKind, range: Range, selection_range: Range) -> DocumentSymbol {
    DocumentSymbol {
        name,
        detail,
        kind,
        tags: None,
        deprecated: None,
        range,
        selection_range,
        children: None,
    }
}

fn item_symbol(
    text: &str,
    index: &LineIndex,
    offset: usize,
    items: &[StructuralItem],
    children: &[Vec<usize>],
    at: usize,
) -> DocumentSymbol {
    let item = &items[at];
    let range = index.range(text, Span::new(item.line_start, item.body_span.end).shifted(offset));
    let selection_range = index.range(text, item.line_span.shifted(offset));
    let detail = text
        .get(item.marker_span.end + offset..item.line_span.end + offset)
        .map(str::trim)
        .filter(|rest| !rest.is_empty())
        .map(str::to_string);

    let mut node = symbol(item.display_name(), detail, symbol_kind(item.kind), range, selection_range);
    let nested: Vec<_> = children[at]
        .iter()
        .map(|&child| item_symbol(text, index, offset, items, children, child))
        .collect();
    if !nested.is_empty() {
        node.children = Some(nested);
    }
    node
}

/// Chapters, sections and articles nested by hierarchy; annex items sit
/// under an `ANEXO` node
pub fn outline(text: &str, index: &LineIndex) -> Vec<DocumentSymbol> {
    let spec = KindSpec::standard().restricted_to(&[ItemKind::Chapter, ItemKind::Section, ItemKind::Article]);
    let regions = split_regions(text);
    let mut symbols = Vec::new();

    for region in regions.iter() {
        let items = scan(region.text, &spec);
        let mut children = vec![Vec::new(); items.len()];
        let mut roots = Vec::new();
        for (i, item) in items.iter().enumerate() {
            match item.parent {
                Some(parent) => children[parent].push(i),
                None => roots.push(i),
            }
        }

        let nodes: Vec<_> = roots
            .into_iter()
            .map(|root| item_symbol(text, index, region.offset_in_document, &items, &children, root))
            .collect();

        match regions.marker.filter(|_| region.name == RegionName::Annex) {
            Some(marker) => {
                let range = index.range(text, Span::new(marker.start, text.len()));
                let selection_range = index.range(text, marker);
                let mut annex = symbol("ANEXO".to_string(), None, SymbolKind::PACKAGE, range, selection_range);
                if !nodes.is_empty() {
                    annex.children = Some(nodes);
                }
                symbols.push(annex);
            }
            None => symbols.extend(nodes),
        }
    }
    symbols
}

#[tower_lsp::async_trait]
impl HandleHover for Backend {
    async fn handle_hover(&self, params: HoverParams) -> LspResult<Option<Hover>> {
        let tdpp = params.text_document_position_params;

        let docs = self.documents.lock().await;
        let Some(state) = docs.get(&tdpp.text_document.uri) else {
            return Ok(None);
        };

        let offset = state.offset(tdpp.position);
        Ok(hover_markdown(state, offset).map(|(value, span)| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value,
            }),
            range: Some(state.range(span)),
        }))
    }
}

#[tower_lsp::async_trait]
impl HandleCodeAction for Backend {
    async fn handle_code_action(
        &self,
        params: CodeActionParams,
    ) -> LspResult<Option<CodeActionResponse>> {
        let uri = params.text_document.uri;

        let docs = self.documents.lock().await;
        let Some(state) = docs.get(&uri) else {
            return Ok(None);
        };

        let actions = code_actions(&uri, state, params.range);
        Ok((!actions.is_empty()).then_some(actions))
    }
}

#[tower_lsp::async_trait]
impl HandleDiagnostics for Backend {
    /// Normalise line breaks and audit the new content
    async fn create_document_state(&self, content: String) -> DocumentState {
        let content = normalize_line_breaks(&content);
        let result = self.auditor.audit(&content);
        DocumentState::new(content, result)
    }

    /// Publish diagnostics for a document
    async fn publish_diagnostics(&self, uri: Url) {
        let docs = self.documents.lock().await;
        let Some(state) = docs.get(&uri) else {
            return;
        };

        let diagnostics: Vec<_> = state
            .result
            .diagnostics
            .iter()
            .map(|d| create_lsp_diagnostic(state, d))
            .collect();
        let summary = format!(
            "{}: {} audited as {}, {} finding(s)",
            DIAGNOSTIC_SOURCE,
            uri,
            state.result.document_type,
            diagnostics.len()
        );
        drop(docs);

        log::debug!("{}", summary);
        self.client.log_message(MessageType::LOG, summary).await;
        self.client.publish_diagnostics(uri, diagnostics, None).await;
    }
}

#[tower_lsp::async_trait]
impl HandleDocumentSymbol for Backend {
    async fn handle_document_symbol(
        &self,
        params: DocumentSymbolParams,
    ) -> LspResult<Option<DocumentSymbolResponse>> {
        let docs = self.documents.lock().await;
        let Some(state) = docs.get(&params.text_document.uri) else {
            return Ok(None);
        };

        Ok(Some(DocumentSymbolResponse::Nested(outline(
            &state.content,
            &state.line_index,
        ))))
    }
}

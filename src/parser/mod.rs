//! Marker Scanner
//!
//! Line-anchored scanning of structural markers. Produces a flat, ordered
//! list of [`StructuralItem`]s with marker, line and body spans.

pub mod ast;
pub mod lexer;
pub mod numeral;

pub use ast::{ItemKind, Numbering, StructuralItem};
pub use lexer::{KindSpec, LineMarker, MarkerPattern};
pub use numeral::{int_to_roman, letter_to_ordinal, ordinal_to_letter, roman_to_int};

use crate::core::span::Span;

/// Iterate over the lines of `text` with their starting byte offsets
///
/// Yielded lines exclude the trailing `\n`.
pub fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0, |offset, raw| {
        let start = *offset;
        *offset += raw.len();
        Some((start, raw.strip_suffix('\n').unwrap_or(raw)))
    })
}

/// Scan `text` for structural markers, in document order
pub fn scan(text: &str, spec: &KindSpec) -> Vec<StructuralItem> {
    let mut items: Vec<StructuralItem> = Vec::new();

    for (line_start, line) in lines_with_offsets(text) {
        let Some(marker) = spec.match_line(line) else {
            continue;
        };

        let marker_span = Span::new(line_start + marker.start, line_start + marker.end);
        let visible_end = line_start + line.trim_end().len();
        let line_span = Span::new(marker_span.start, visible_end.max(marker_span.start));
        let parent = items
            .iter()
            .rposition(|previous| previous.kind.is_higher_than(marker.kind));

        items.push(StructuralItem {
            kind: marker.kind,
            ordinal_raw: marker.ordinal_raw,
            ordinal_value: marker.ordinal_value,
            line_start,
            marker_span,
            cluster: marker.cluster,
            line_span,
            // Extended and closed below once the following items are known
            text_span: line_span,
            // Closed below once the following items are known
            body_span: Span::new(marker_span.end, text.len()),
            parent,
        });
    }

    close_bodies(&mut items, text.len());
    extend_wrapped_text(&mut items, text);
    items
}

/// Whether `text` already ends the way an item can end
fn has_terminator(text: &str) -> bool {
    let text = text.trim_end();
    if text.ends_with(['.', ';', ':']) {
        return true;
    }
    ["e", "ou"].iter().any(|word| {
        text.strip_suffix(word)
            .filter(|rest| rest.ends_with([' ', '\t']))
            .is_some_and(|rest| rest.trim_end().ends_with(';'))
    })
}

/// Upper-case lines (signatures, titles) are never continuations
fn is_heading_like(line: &str) -> bool {
    line.chars().any(char::is_alphabetic) && line.to_uppercase() == line
}

/// Extend each item's text over the lines wrapped from its marker line
///
/// A following line continues the item while the text so far has no
/// terminator, up to the next marker, a blank line or an upper-case line.
fn extend_wrapped_text(items: &mut [StructuralItem], text: &str) {
    for index in 0..items.len() {
        let limit = items
            .get(index + 1)
            .map(|next| next.line_start)
            .unwrap_or(text.len());
        let mut end = items[index].line_span.end;
        let mut cursor = text[end..limit].find('\n').map(|n| end + n + 1);

        while let Some(line_start) = cursor.filter(|&start| start < limit) {
            let start = items[index].marker_span.start;
            if has_terminator(&text[start..end]) {
                break;
            }
            let line_end = text[line_start..limit]
                .find('\n')
                .map_or(limit, |n| line_start + n);
            let line = text[line_start..line_end].trim_end();
            if line.trim_start().is_empty() || is_heading_like(line.trim_start()) {
                break;
            }
            end = line_start + line.len();
            cursor = (line_end < limit).then_some(line_end + 1);
        }

        let start = items[index].marker_span.start;
        items[index].text_span = Span::new(start, end.max(start));
    }
}

/// End each body before the next item of equal or higher rank
fn close_bodies(items: &mut [StructuralItem], text_len: usize) {
    for index in 0..items.len() {
        let rank = items[index].kind.rank();
        let end = items[index + 1..]
            .iter()
            .find(|next| next.kind.rank() <= rank)
            .map(|next| next.line_start)
            .unwrap_or(text_len);
        let start = items[index].marker_span.end;
        items[index].body_span = Span::new(start, end.max(start));
    }
}

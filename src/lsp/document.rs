use tower_lsp::lsp_types::{Position, Range};

use crate::core::span::Span;
use crate::validation::AuditResult;

/// State for each open document
#[derive(Debug)]
pub struct DocumentState {
    pub content: String,
    pub line_index: LineIndex,
    /// Result of the last audit of `content`
    pub result: AuditResult,
}

impl DocumentState {
    pub fn new(content: String, result: AuditResult) -> Self {
        Self {
            line_index: LineIndex::new(&content),
            content,
            result,
        }
    }

    pub fn range(&self, span: Span) -> Range {
        self.line_index.range(&self.content, span)
    }

    pub fn offset(&self, position: Position) -> usize {
        self.line_index.offset(&self.content, position)
    }
}

/// Maps byte offsets to LSP positions (UTF-16 code units) and back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Position of a byte offset; offsets inside a character snap back to
    /// its start
    pub fn position(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let character = text[self.line_starts[line]..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    pub fn range(&self, text: &str, span: Span) -> Range {
        Range::new(self.position(text, span.start), self.position(text, span.end))
    }

    /// Byte offset of a position, clamped to the end of its line
    pub fn offset(&self, text: &str, position: Position) -> usize {
        let Some(&line_start) = self.line_starts.get(position.line as usize) else {
            return text.len();
        };
        let line_end = self
            .line_starts
            .get(position.line as usize + 1)
            .map(|next| next - 1)
            .unwrap_or(text.len());

        let mut units = 0;
        for (i, c) in text[line_start..line_end].char_indices() {
            if units >= position.character as usize {
                return line_start + i;
            }
            units += c.len_utf16();
        }
        line_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_counts_utf16_units() {
        let text = "Art. 1º  Ação\n§ 2º  x";
        let index = LineIndex::new(text);
        assert_eq!(index.line_count(), 2);

        let offset = text.find("Ação").unwrap();
        assert_eq!(index.position(text, offset), Position::new(0, 9));

        let x = text.rfind('x').unwrap();
        assert_eq!(index.position(text, x), Position::new(1, 6));
    }

    #[test]
    fn test_offset_round_trips_positions() {
        let text = "Seção I\nInciso — é\n";
        let index = LineIndex::new(text);
        for offset in [0, 2, 8, 10, text.find('é').unwrap(), text.len()] {
            let position = index.position(text, offset);
            assert_eq!(index.offset(text, position), offset);
        }
    }

    #[test]
    fn test_offset_clamps_past_line_end() {
        let text = "abc\ndef";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(text, Position::new(0, 99)), 3);
        assert_eq!(index.offset(text, Position::new(9, 0)), text.len());
    }

    #[test]
    fn test_position_inside_multibyte_char_snaps_back() {
        let text = "º";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, 1), Position::new(0, 0));
    }
}

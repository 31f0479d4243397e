//! Line and column lookup for byte offsets.

use vex_ir::Span;

/// Byte offset of every line start in a script, for O(log L) lookups.
///
/// ```
/// use vex_diagnostic::span_utils::LineOffsetTable;
///
/// let source = "x = 1;\ny = x + 2;";
/// let table = LineOffsetTable::build(source);
/// assert_eq!(table.offset_to_line_col(source, 0), (1, 1));
/// assert_eq!(table.offset_to_line_col(source, 11), (2, 5));
/// ```
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[i]` is where line `i + 1` starts.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let index = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        index as u32 + 1
    }

    /// 1-based (line, column); the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let start = self.line_start(line);
        let end = (offset as usize).min(source.len());
        let column = source
            .get(start..end)
            .map_or(end.saturating_sub(start), |text| text.chars().count());
        (line, column as u32 + 1)
    }

    /// Text of 1-based `line`, without its newline.
    pub fn line_text<'s>(&self, source: &'s str, line: u32) -> &'s str {
        let start = self.line_start(line).min(source.len());
        let end = self
            .offsets
            .get(line as usize)
            .map_or(source.len(), |&next| (next as usize).saturating_sub(1))
            .max(start);
        source.get(start..end).unwrap_or("").trim_end_matches('\r')
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }

    fn line_start(&self, line: u32) -> usize {
        let index = line.saturating_sub(1) as usize;
        self.offsets.get(index).copied().unwrap_or(0) as usize
    }
}

/// 1-based (line, column) of a span's start, building a one-off table.
pub fn span_to_line_col(source: &str, span: Span) -> (u32, u32) {
    LineOffsetTable::build(source).offset_to_line_col(source, span.start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_line() {
        let source = "x > 0 ? 1 : -1";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_count(), 1);
        assert_eq!(table.offset_to_line_col(source, 8), (1, 9));
        assert_eq!(table.line_text(source, 1), source);
    }

    #[test]
    fn test_multiple_lines() {
        let source = "a = 1;\nb = 2;\nc = a + b;";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_count(), 3);
        assert_eq!(table.offset_to_line_col(source, 7), (2, 1));
        assert_eq!(table.offset_to_line_col(source, 18), (3, 5));
        assert_eq!(table.line_text(source, 2), "b = 2;");
        assert_eq!(table.line_text(source, 3), "c = a + b;");
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let source = "x";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.offset_to_line_col(source, 40), (1, 2));
    }

    #[test]
    fn test_multibyte_columns_count_chars() {
        let source = "θ = 1";
        let table = LineOffsetTable::build(source);
        // 'θ' is two bytes; '=' starts at byte 3 but is the third character.
        assert_eq!(table.offset_to_line_col(source, 3), (1, 3));
    }

    #[test]
    fn test_crlf_line_text() {
        let source = "a;\r\nb;";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_text(source, 1), "a;");
        assert_eq!(span_to_line_col(source, Span::new(4, 5)), (2, 1));
    }
}

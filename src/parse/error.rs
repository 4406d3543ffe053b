use crate::types::Location;

/// Maps byte offsets in a source string to 1-based lines and 0-based columns.
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn locate(&self, offset: usize) -> Location {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line - 1];
        Location::new(line as u32, (offset - start) as u32)
    }
}

/// Format a lexical/syntactic issue the way the orchestrator accumulates
/// them: `line:<L>,col:<C>  <message>`.
pub(crate) fn issue(loc: Location, message: &str) -> String {
    format!("line:{},col:{}  {}", loc.line, loc.col, message)
}

/// Whether a character can appear anywhere in well-formed policy text.
/// A failure positioned on a character outside this set is a lexical error
/// rather than a grammar error.
pub(crate) fn is_legal_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c.is_ascii_whitespace()
        || matches!(c, '_' | ':' | '(' | ')' | ',' | '.' | '-' | '"' | '%' | '/')
}

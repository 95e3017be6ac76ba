//! Single-pass placeholder scanner.
//!
//! The scanner splits text into literal runs and `{{key}}` placeholders in
//! one left-to-right pass. Concatenating the raw text of every segment gives
//! back the input exactly, so a caller that writes literals and unresolved
//! placeholders back verbatim reproduces the original text.

/// Opening delimiter.
pub const OPEN: &str = "{{";
/// Closing delimiter.
pub const CLOSE: &str = "}}";

/// A piece of scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any placeholder, including unterminated openers.
    Literal(&'a str),
    /// A complete `{{key}}` span.
    Placeholder {
        /// The text between the delimiters, untrimmed.
        key: &'a str,
        /// The whole span including both delimiters.
        raw: &'a str,
    },
}

impl<'a> Segment<'a> {
    /// Returns the source text this segment covers.
    pub fn raw(&self) -> &'a str {
        match self {
            Segment::Literal(text) => text,
            Segment::Placeholder { raw, .. } => raw,
        }
    }
}

/// Iterator over the [`Segment`]s of a text.
///
/// Rules:
/// - `{{` opens a placeholder; in a run of three or more `{` only the last
///   two form the opener.
/// - The first `}}` after the opener closes it.
/// - If another `{{` appears before that `}}`, everything up to the innermost
///   opener is literal.
/// - An opener with no closing `}}` before the end is literal.
///
/// # Example
///
/// ```rust
/// use slidefill::template::{Scanner, Segment};
///
/// let segments: Vec<_> = Scanner::new("Dear {{client_name}},").collect();
/// assert_eq!(
///     segments,
///     vec![
///         Segment::Literal("Dear "),
///         Segment::Placeholder { key: "client_name", raw: "{{client_name}}" },
///         Segment::Literal(","),
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn take_literal(&mut self, len: usize) -> Segment<'a> {
        let start = self.pos;
        self.pos += len;
        Segment::Literal(&self.text[start..self.pos])
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        if rest.is_empty() {
            return None;
        }

        let Some(mut open) = rest.find(OPEN) else {
            return Some(self.take_literal(rest.len()));
        };
        let bytes = rest.as_bytes();
        while bytes.get(open + OPEN.len()) == Some(&b'{') {
            open += 1;
        }
        if open > 0 {
            return Some(self.take_literal(open));
        }

        let body = &rest[OPEN.len()..];
        let Some(close) = body.find(CLOSE) else {
            return Some(self.take_literal(rest.len()));
        };
        let key = &body[..close];
        if let Some(inner) = key.rfind(OPEN) {
            return Some(self.take_literal(OPEN.len() + inner));
        }

        let raw_len = OPEN.len() + close + CLOSE.len();
        let raw = &rest[..raw_len];
        self.pos += raw_len;
        Some(Segment::Placeholder { key, raw })
    }
}

/// Returns the placeholder keys of `text` in order of appearance, repeats included.
pub fn placeholder_keys(text: &str) -> impl Iterator<Item = &str> {
    Scanner::new(text).filter_map(|segment| match segment {
        Segment::Placeholder { key, .. } => Some(key),
        Segment::Literal(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> Vec<Segment<'_>> {
        Scanner::new(text).collect()
    }

    fn ph<'a>(key: &'a str, raw: &'a str) -> Segment<'a> {
        Segment::Placeholder { key, raw }
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(scan("no markers here"), vec![Segment::Literal("no markers here")]);
        assert!(scan("").is_empty());
    }

    #[test]
    fn test_adjacent_placeholders() {
        assert_eq!(
            scan("{{a}}{{b}}"),
            vec![ph("a", "{{a}}"), ph("b", "{{b}}")]
        );
    }

    #[test]
    fn test_empty_key() {
        assert_eq!(scan("x{{}}y"), vec![
            Segment::Literal("x"),
            ph("", "{{}}"),
            Segment::Literal("y"),
        ]);
    }

    #[test]
    fn test_unterminated_opener_is_literal() {
        assert_eq!(scan("Hello {{name"), vec![
            Segment::Literal("Hello "),
            Segment::Literal("{{name"),
        ]);
    }

    #[test]
    fn test_triple_brace_uses_last_two() {
        assert_eq!(scan("{{{a}}}"), vec![
            Segment::Literal("{"),
            ph("a", "{{a}}"),
            Segment::Literal("}"),
        ]);
    }

    #[test]
    fn test_reopened_placeholder_restarts() {
        assert_eq!(scan("{{a {{b}}"), vec![
            Segment::Literal("{{a "),
            ph("b", "{{b}}"),
        ]);
    }

    #[test]
    fn test_key_with_markup_is_still_a_placeholder() {
        let text = "{{client</a:t></a:r><a:r><a:t>_name}}";
        assert_eq!(scan(text), vec![ph("client</a:t></a:r><a:r><a:t>_name", text)]);
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(scan("Ügyfél: {{név}} ✓"), vec![
            Segment::Literal("Ügyfél: "),
            ph("név", "{{név}}"),
            Segment::Literal(" ✓"),
        ]);
    }

    #[test]
    fn test_placeholder_keys() {
        let keys: Vec<_> = placeholder_keys("{{a}} {{b}} {{a}} {{c").collect();
        assert_eq!(keys, vec!["a", "b", "a"]);
    }

    #[test]
    fn test_segments_reassemble_input() {
        for text in ["{{", "}}", "{{{{", "a}}b{{c", "{{x}}}}{{", "{ {{y} }}"] {
            let joined: String = Scanner::new(text).map(|s| s.raw()).collect();
            assert_eq!(joined, text);
        }
    }
}

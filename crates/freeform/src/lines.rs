//! Line splitting and whitespace cleanup.
//!
//! Pasted text arrives with every kind of whitespace: CRLF endings, tabs,
//! non-breaking spaces from web pages, runs of blank lines. The parser works
//! on trimmed, non-empty lines whose inner whitespace is collapsed to single
//! spaces.
//!
//! ```rust
//! use freeform::{collapse_whitespace, split_lines};
//!
//! assert_eq!(collapse_whitespace("  2 \u{a0} eggs\t"), "2 eggs");
//! assert_eq!(split_lines("a\r\n\n  b  \n"), vec!["a", "b"]);
//! ```

/// Collapses runs of Unicode whitespace into single ASCII spaces and trims
/// both ends.
pub fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !collapsed.is_empty() {
            collapsed.push(' ');
        }
        collapsed.push_str(segment);
    }
    collapsed
}

/// Splits on `\n`, `\r\n` and `\r`, collapses whitespace in every line and
/// drops lines left empty.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split(['\n', '\r'])
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Cuts `text` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_at_boundary(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let mut end = max_bytes;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_handles_mixed_whitespace() {
        let cases = [
            ("  Hello\n\n   world\t ", "Hello world"),
            ("\n", ""),
            ("emoji \u{1f600}  test ", "emoji \u{1f600} test"),
        ];
        for (input, expected) in cases {
            assert_eq!(collapse_whitespace(input), expected);
        }
    }

    #[test]
    fn split_handles_all_line_endings() {
        assert_eq!(
            split_lines("one\r\ntwo\rthree\n\n\n four "),
            vec!["one", "two", "three", "four"]
        );
        assert!(split_lines("").is_empty());
        assert!(split_lines(" \n\t\n").is_empty());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ab\u{00e9}cd";
        assert_eq!(truncate_at_boundary(text, 3), "ab");
        assert_eq!(truncate_at_boundary(text, 4), "ab\u{00e9}");
        assert_eq!(truncate_at_boundary(text, 100), text);
        assert_eq!(truncate_at_boundary(text, 0), "");
    }
}

//! Plain-text excerpts derived from rich post content.

/// Default excerpt length in characters, excluding the ellipsis.
pub const EXCERPT_MAX_CHARS: usize = 150;
/// Appended when the plain text had to be truncated.
pub const ELLIPSIS: &str = "...";

/// Remove markup tags (`<...>`) from rich content.
///
/// A `<` with no closing `>` after it is kept as text, as is everything
/// following it.
pub fn strip_markup(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find('<') {
        let Some(close) = rest[open..].find('>') else {
            break;
        };
        text.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }

    text.push_str(rest);
    text
}

/// Derive an excerpt of at most `max_chars` characters of plain text, plus
/// [`ELLIPSIS`] when the plain text was longer.
///
/// Applying this to its own output returns the output unchanged.
pub fn derive_excerpt(content: &str, max_chars: usize) -> String {
    let text = strip_markup(content);
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_markup_removes_tags() {
        assert_eq!(
            strip_markup("<h1>Title</h1><p>Body <strong>bold</strong></p>"),
            "TitleBody bold"
        );
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("x > y <br> z"), "x > y  z");
    }

    #[test]
    fn short_content_is_returned_verbatim() {
        let content = "<p>Short and sweet.</p>";
        assert_eq!(derive_excerpt(content, EXCERPT_MAX_CHARS), "Short and sweet.");
    }

    #[test]
    fn exactly_max_chars_is_not_truncated() {
        let text = "a".repeat(EXCERPT_MAX_CHARS);
        assert_eq!(derive_excerpt(&text, EXCERPT_MAX_CHARS), text);
    }

    #[test]
    fn long_content_is_truncated_with_ellipsis() {
        let text = "b".repeat(EXCERPT_MAX_CHARS + 1);
        let excerpt = derive_excerpt(&format!("<p>{text}</p>"), EXCERPT_MAX_CHARS);
        assert_eq!(excerpt.chars().count(), EXCERPT_MAX_CHARS + ELLIPSIS.len());
        assert!(excerpt.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(200);
        let excerpt = derive_excerpt(&text, EXCERPT_MAX_CHARS);
        assert_eq!(excerpt.chars().count(), 153);
    }

    #[test]
    fn derive_excerpt_is_idempotent() {
        let samples = [
            String::new(),
            "<p>tiny</p>".to_string(),
            format!("<div>{}</div>", "word ".repeat(80)),
            "x".repeat(EXCERPT_MAX_CHARS),
            format!("{}...", "y".repeat(EXCERPT_MAX_CHARS)),
            "dangling < bracket and > close".to_string(),
        ];

        for sample in samples {
            let once = derive_excerpt(&sample, EXCERPT_MAX_CHARS);
            let twice = derive_excerpt(&once, EXCERPT_MAX_CHARS);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
        }
    }
}

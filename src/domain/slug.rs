//! Deterministic URL slugs derived from post titles.
//!
//! ASCII word characters survive, whitespace and hyphen runs fold into a
//! single hyphen, and everything else is dropped without splitting the
//! surrounding word. The output never starts or ends with a hyphen. An
//! empty slug means "not derivable yet", never a usable key.

/// Derive a slug from the provided title.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for ch in title.chars().flat_map(char::to_lowercase) {
        if is_word_char(ch) {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(ch);
        } else if ch == '-' || ch.is_whitespace() {
            pending_separator = true;
        }
    }

    slug
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

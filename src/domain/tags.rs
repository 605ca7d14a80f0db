//! Comma-separated tag input.

/// Split the editor's tag input on commas, trim, drop empties and repeats.
///
/// First occurrence wins; order is otherwise kept.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',').map(str::trim).filter(|tag| !tag.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Render stored tags back into the editable comma-separated form.
pub fn format_tag_input(tags: &[String]) -> String {
    tags.join(", ")
}

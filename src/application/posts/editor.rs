use penman_api_types::{PostPayload, PostRecord, PostType};

use crate::domain::error::DomainError;
use crate::domain::excerpt::{EXCERPT_MAX_CHARS, derive_excerpt};
use crate::domain::field::DerivedField;
use crate::domain::slug::derive_slug;
use crate::domain::tags::{format_tag_input, parse_tag_input};

/// Form state of a post being written or edited.
///
/// Slug and excerpt follow title and content while they are derived. A
/// post loaded with its own slug or excerpt starts with that field manual.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostEditor {
    title: String,
    slug: DerivedField,
    kind: PostType,
    content: String,
    excerpt: DerivedField,
    tags_input: String,
}

impl PostEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &PostRecord) -> Self {
        let slug = match non_blank(record.slug.as_deref()) {
            Some(slug) => DerivedField::manual(slug),
            None => DerivedField::derived(derive_slug(&record.title)),
        };
        let excerpt = match non_blank(record.excerpt.as_deref()) {
            Some(excerpt) => DerivedField::manual(excerpt),
            None => DerivedField::derived(derive_excerpt(&record.content, EXCERPT_MAX_CHARS)),
        };

        Self {
            title: record.title.clone(),
            slug,
            kind: record.kind,
            content: record.content.clone(),
            excerpt,
            tags_input: format_tag_input(&record.tags),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &DerivedField {
        &self.slug
    }

    pub fn kind(&self) -> PostType {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn excerpt(&self) -> &DerivedField {
        &self.excerpt
    }

    pub fn tags_input(&self) -> &str {
        &self.tags_input
    }

    pub fn tags(&self) -> Vec<String> {
        parse_tag_input(&self.tags_input)
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.slug.follow(|| derive_slug(&self.title));
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.excerpt
            .follow(|| derive_excerpt(&self.content, EXCERPT_MAX_CHARS));
    }

    pub fn set_kind(&mut self, kind: PostType) {
        self.kind = kind;
    }

    pub fn set_tags_input(&mut self, input: impl Into<String>) {
        self.tags_input = input.into();
    }

    pub fn edit_slug(&mut self, slug: impl Into<String>) {
        self.slug.edit(slug);
    }

    pub fn edit_excerpt(&mut self, excerpt: impl Into<String>) {
        self.excerpt.edit(excerpt);
    }

    pub fn enable_slug_derivation(&mut self) {
        self.slug.rederive(|| derive_slug(&self.title));
    }

    pub fn enable_excerpt_derivation(&mut self) {
        self.excerpt
            .rederive(|| derive_excerpt(&self.content, EXCERPT_MAX_CHARS));
    }

    /// Build the request body. Empty optionals are omitted, never sent blank.
    pub fn submission(&self, published: bool) -> Result<PostPayload, DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::required("title"));
        }

        let tags = self.tags();
        Ok(PostPayload {
            title: self.title.clone(),
            slug: self.slug.submitted(),
            kind: self.kind,
            content: self.content.clone(),
            excerpt: self.excerpt.submitted(),
            tags: (!tags.is_empty()).then_some(tags),
            published,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::domain::field::FieldMode;

    fn record(slug: Option<&str>, excerpt: Option<&str>) -> PostRecord {
        PostRecord {
            id: Uuid::new_v4(),
            profile_id: None,
            kind: PostType::Page,
            title: "About Us".into(),
            content: "<p>Who we are</p>".into(),
            created_at: None,
            updated_at: None,
            tags: vec!["meta".into(), "team".into()],
            published: false,
            slug: slug.map(Into::into),
            excerpt: excerpt.map(Into::into),
            view_count: 0,
        }
    }

    #[test]
    fn title_drives_slug_until_slug_is_edited() {
        let mut editor = PostEditor::new();
        editor.set_title("Hello World!");
        assert_eq!(editor.slug().value(), "hello-world");

        editor.edit_slug("custom");
        editor.set_title("Another Title");
        assert_eq!(editor.slug().value(), "custom");
        assert_eq!(editor.slug().mode(), FieldMode::Manual);

        editor.enable_slug_derivation();
        assert_eq!(editor.slug().value(), "another-title");
    }

    #[test]
    fn content_drives_excerpt_until_excerpt_is_edited() {
        let mut editor = PostEditor::new();
        editor.set_content("<p>Short <em>body</em></p>");
        assert_eq!(editor.excerpt().value(), "Short body");

        editor.edit_excerpt("Hand written");
        editor.set_content("<p>Changed</p>");
        assert_eq!(editor.excerpt().value(), "Hand written");
    }

    #[test]
    fn loaded_slug_and_excerpt_start_manual() {
        let editor = PostEditor::from_record(&record(Some("about"), Some("Team page")));
        assert_eq!(editor.slug().mode(), FieldMode::Manual);
        assert_eq!(editor.excerpt().mode(), FieldMode::Manual);
        assert_eq!(editor.tags_input(), "meta, team");
        assert_eq!(editor.kind(), PostType::Page);

        let editor = PostEditor::from_record(&record(None, Some("  ")));
        assert!(editor.slug().is_derived());
        assert_eq!(editor.slug().value(), "about-us");
        assert_eq!(editor.excerpt().value(), "Who we are");
    }

    #[test]
    fn submission_requires_title() {
        let mut editor = PostEditor::new();
        editor.set_title("   ");
        assert_eq!(
            editor.submission(false),
            Err(DomainError::required("title"))
        );
    }

    #[test]
    fn submission_omits_empty_optionals() {
        let mut editor = PostEditor::new();
        editor.set_title("!!!");
        editor.set_tags_input(" , ,");

        let payload = editor.submission(false).expect("payload");
        assert_eq!(payload.slug, None);
        assert_eq!(payload.excerpt, None);
        assert_eq!(payload.tags, None);
        assert!(!payload.published);
    }

    #[test]
    fn submission_normalizes_tags() {
        let mut editor = PostEditor::new();
        editor.set_title("Tagged");
        editor.set_tags_input("rust, , async ,rust");

        let payload = editor.submission(true).expect("payload");
        assert_eq!(payload.tags, Some(vec!["rust".into(), "async".into()]));
        assert!(payload.published);
    }
}

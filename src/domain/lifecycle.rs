//! Post lifecycle state machine.
//!
//! ```text
//! Unsaved --create--> Draft --publish--> Published
//!                     Draft <--unpublish-- Published
//! Draft | Published --update--> (same state)
//! Draft | Published --delete--> Deleted (terminal)
//! ```

use std::fmt;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostState {
    /// Only exists in the editor; nothing persisted yet.
    Unsaved,
    Draft,
    Published,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostAction {
    Create,
    Update,
    Publish,
    Unpublish,
    Delete,
}

impl PostState {
    /// State of a persisted post given its server-side publish flag.
    pub fn persisted(published: bool) -> Self {
        if published {
            PostState::Published
        } else {
            PostState::Draft
        }
    }

    pub fn is_persisted(self) -> bool {
        matches!(self, PostState::Draft | PostState::Published)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostState::Unsaved => "unsaved",
            PostState::Draft => "draft",
            PostState::Published => "published",
            PostState::Deleted => "deleted",
        }
    }

    /// Target state of `action`, or an error when the action is not allowed.
    pub fn transition(self, action: PostAction) -> Result<PostState, DomainError> {
        use PostAction as A;
        use PostState as S;

        match (self, action) {
            (S::Unsaved, A::Create) => Ok(S::Draft),
            (S::Draft, A::Update) => Ok(S::Draft),
            (S::Published, A::Update) => Ok(S::Published),
            (S::Draft, A::Publish) => Ok(S::Published),
            (S::Published, A::Unpublish) => Ok(S::Draft),
            (S::Draft | S::Published, A::Delete) => Ok(S::Deleted),
            (state, action) => Err(DomainError::invalid_transition(state, action)),
        }
    }
}

impl PostAction {
    pub fn as_str(self) -> &'static str {
        match self {
            PostAction::Create => "create",
            PostAction::Update => "update",
            PostAction::Publish => "publish",
            PostAction::Unpublish => "unpublish",
            PostAction::Delete => "delete",
        }
    }
}

impl fmt::Display for PostState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The author's answer to "delete this post? This cannot be undone."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

impl Confirmation {
    pub fn from_flag(confirmed: bool) -> Self {
        if confirmed {
            Confirmation::Confirmed
        } else {
            Confirmation::Declined
        }
    }
}

use thiserror::Error;

use super::lifecycle::{PostAction, PostState};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("{field} is required")]
    Required { field: &'static str },
    #[error("cannot {action} a post that is {state}")]
    InvalidTransition {
        state: PostState,
        action: PostAction,
    },
    #[error("the post has not been loaded")]
    NotLoaded,
}

impl DomainError {
    pub fn required(field: &'static str) -> Self {
        Self::Required { field }
    }

    pub fn invalid_transition(state: PostState, action: PostAction) -> Self {
        Self::InvalidTransition { state, action }
    }
}

use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::lifecycle::PostAction;

/// Identifies one submit-able action: the action plus the post it targets
/// (`None` for creates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub action: PostAction,
    pub post_id: Option<Uuid>,
}

impl ActionKey {
    pub fn new(action: PostAction, post_id: Option<Uuid>) -> Self {
        Self { action, post_id }
    }
}

#[derive(Debug, Error)]
pub enum InFlightError {
    #[error("{action} already in progress")]
    AlreadyRunning {
        action: PostAction,
        post_id: Option<Uuid>,
    },
}

/// Tracks actions that currently have a request outstanding, so a second
/// submission of the same action is refused instead of sent.
#[derive(Debug, Default, Clone)]
pub struct InFlightActions {
    actions: Arc<DashMap<ActionKey, ()>>,
}

impl InFlightActions {
    pub fn new() -> Self {
        Self {
            actions: Arc::new(DashMap::new()),
        }
    }

    pub fn acquire(&self, key: ActionKey) -> Result<ActionGuard, InFlightError> {
        use dashmap::mapref::entry::Entry;

        match self.actions.entry(key) {
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(ActionGuard {
                    key,
                    actions: Arc::clone(&self.actions),
                })
            }
            Entry::Occupied(_) => Err(InFlightError::AlreadyRunning {
                action: key.action,
                post_id: key.post_id,
            }),
        }
    }

    pub fn is_running(&self, key: &ActionKey) -> bool {
        self.actions.contains_key(key)
    }
}

/// Releases its action when dropped.
#[derive(Debug)]
pub struct ActionGuard {
    key: ActionKey,
    actions: Arc<DashMap<ActionKey, ()>>,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        self.actions.remove(&self.key);
    }
}

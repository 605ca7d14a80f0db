use tracing::{debug, warn};
use uuid::Uuid;

use penman_api_types::PostRecord;

use crate::application::error::AppError;
use crate::application::ports::PostApi;
use crate::domain::error::DomainError;
use crate::domain::lifecycle::{Confirmation, PostAction, PostState};

use super::{DeleteOutcome, PostCommands, PostEditor};

/// One post moving through unsaved, draft, published and deleted.
///
/// After every successful mutation the post is fetched again and the
/// editor is rebuilt from that copy. Edits made locally before the
/// mutation completed are discarded: the server copy wins.
pub struct PostLifecycle<A: ?Sized> {
    commands: PostCommands<A>,
    state: PostState,
    record: Option<PostRecord>,
    editor: PostEditor,
}

impl<A> PostLifecycle<A>
where
    A: PostApi + ?Sized,
{
    /// A fresh, unsaved post.
    pub fn new(commands: PostCommands<A>) -> Self {
        Self {
            commands,
            state: PostState::Unsaved,
            record: None,
            editor: PostEditor::new(),
        }
    }

    /// Load an existing post for editing.
    pub async fn open(commands: PostCommands<A>, id: Uuid) -> Result<Self, AppError> {
        let record = commands.get(id).await?;
        let mut lifecycle = Self::new(commands);
        lifecycle.adopt(record);
        Ok(lifecycle)
    }

    pub fn state(&self) -> PostState {
        self.state
    }

    pub fn record(&self) -> Option<&PostRecord> {
        self.record.as_ref()
    }

    pub fn id(&self) -> Option<Uuid> {
        self.record.as_ref().map(|record| record.id)
    }

    pub fn editor(&self) -> &PostEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut PostEditor {
        &mut self.editor
    }

    /// Whether `action` currently has a request outstanding for this post.
    pub fn is_busy(&self, action: PostAction) -> bool {
        let post_id = match action {
            PostAction::Create => None,
            _ => self.id(),
        };
        self.commands.is_running(action, post_id)
    }

    /// Create the post when unsaved, otherwise update it in place.
    ///
    /// The title is validated before anything is sent. Updates keep the
    /// server's publish flag.
    pub async fn save(&mut self) -> Result<PostState, AppError> {
        let record = match self.state {
            PostState::Unsaved => {
                self.state.transition(PostAction::Create)?;
                let payload = self.editor.submission(false)?;
                self.commands.create(&payload).await?
            }
            state => {
                state.transition(PostAction::Update)?;
                let id = self.loaded_id()?;
                let published = self.record.as_ref().is_some_and(|record| record.published);
                let payload = self.editor.submission(published)?;
                self.commands.update(id, &payload).await?
            }
        };

        self.settle(record).await
    }

    pub async fn publish(&mut self) -> Result<PostState, AppError> {
        self.toggle(PostAction::Publish).await
    }

    pub async fn unpublish(&mut self) -> Result<PostState, AppError> {
        self.toggle(PostAction::Unpublish).await
    }

    /// Delete the post. Nothing is sent unless `confirmation` is
    /// [`Confirmation::Confirmed`].
    pub async fn delete(&mut self, confirmation: Confirmation) -> Result<DeleteOutcome, AppError> {
        self.state.transition(PostAction::Delete)?;
        let id = self.loaded_id()?;

        let outcome = self.commands.delete(id, confirmation).await?;
        if outcome == DeleteOutcome::Deleted {
            self.state = PostState::Deleted;
            self.record = None;
        }
        Ok(outcome)
    }

    async fn toggle(&mut self, action: PostAction) -> Result<PostState, AppError> {
        self.state.transition(action)?;
        let id = self.loaded_id()?;
        let record = self
            .commands
            .set_published(id, action == PostAction::Publish)
            .await?;
        self.settle(record).await
    }

    /// Adopt a mutation response, then replace it with a fresh server copy.
    async fn settle(&mut self, record: PostRecord) -> Result<PostState, AppError> {
        let id = record.id;
        self.adopt(record);

        match self.commands.get(id).await {
            Ok(fresh) => {
                debug!(post_id = %id, "post reloaded after mutation");
                self.adopt(fresh);
                Ok(self.state)
            }
            Err(err) => {
                warn!(post_id = %id, error = %err, "post reload after mutation failed");
                Err(err)
            }
        }
    }

    fn adopt(&mut self, record: PostRecord) {
        self.state = PostState::persisted(record.published);
        self.editor = PostEditor::from_record(&record);
        self.record = Some(record);
    }

    fn loaded_id(&self) -> Result<Uuid, AppError> {
        self.id().ok_or(AppError::Domain(DomainError::NotLoaded))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use penman_api_types::PostPayload;

    use super::*;
    use crate::application::error::ErrorKind;
    use crate::application::ports::{
        ApiError, AuthExchange, AuthExchangeError, AuthGrant, Credentials, ListRequest, PostPage,
    };
    use crate::application::session::SessionStore;
    use crate::infra::storage::MemorySessionStorage;

    struct Offline;

    fn offline() -> ApiError {
        ApiError::Transport("offline".into())
    }

    #[async_trait]
    impl PostApi for Offline {
        async fn list(&self, _request: ListRequest) -> Result<PostPage, ApiError> {
            Err(offline())
        }

        async fn get(&self, _id: Uuid) -> Result<PostRecord, ApiError> {
            Err(offline())
        }

        async fn create(&self, _payload: &PostPayload) -> Result<PostRecord, ApiError> {
            Err(offline())
        }

        async fn update(&self, _id: Uuid, _payload: &PostPayload) -> Result<PostRecord, ApiError> {
            Err(offline())
        }

        async fn set_published(&self, _id: Uuid, _published: bool) -> Result<PostRecord, ApiError> {
            Err(offline())
        }

        async fn delete(&self, _id: Uuid) -> Result<(), ApiError> {
            Err(offline())
        }
    }

    #[async_trait]
    impl AuthExchange for Offline {
        async fn exchange(&self, _credentials: &Credentials) -> Result<AuthGrant, AuthExchangeError> {
            Err(AuthExchangeError::Transport("offline".into()))
        }
    }

    fn lifecycle() -> PostLifecycle<Offline> {
        let session = SessionStore::new(Arc::new(MemorySessionStorage::new()), Arc::new(Offline));
        PostLifecycle::new(PostCommands::new(Arc::new(Offline), session))
    }

    #[test]
    fn missing_record_is_a_local_error() {
        let mut lifecycle = lifecycle();
        lifecycle.state = PostState::Draft;

        let err = lifecycle.loaded_id().expect_err("no record");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(matches!(err, AppError::Domain(DomainError::NotLoaded)));
    }
}

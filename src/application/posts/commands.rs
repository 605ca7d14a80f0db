use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use penman_api_types::{PostPayload, PostRecord};

use crate::application::error::AppError;
use crate::application::inflight::{ActionKey, InFlightActions};
use crate::application::ports::{ApiError, ListRequest, PostApi, PostPage};
use crate::application::session::SessionStore;
use crate::domain::lifecycle::{Confirmation, PostAction};

use super::DeleteOutcome;

/// Every authenticated Post-API call goes through here.
///
/// Mutations hold an in-flight guard for their action and post, so a
/// repeated submit fails fast with [`AppError::Busy`] instead of sending a
/// duplicate request. Rejected tokens invalidate the shared session.
pub struct PostCommands<A: ?Sized> {
    api: Arc<A>,
    session: SessionStore,
    inflight: InFlightActions,
}

impl<A: ?Sized> Clone for PostCommands<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            session: self.session.clone(),
            inflight: self.inflight.clone(),
        }
    }
}

impl<A> PostCommands<A>
where
    A: PostApi + ?Sized,
{
    pub fn new(api: Arc<A>, session: SessionStore) -> Self {
        Self {
            api,
            session,
            inflight: InFlightActions::new(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn is_running(&self, action: PostAction, post_id: Option<Uuid>) -> bool {
        self.inflight.is_running(&ActionKey::new(action, post_id))
    }

    pub async fn list(&self, request: ListRequest) -> Result<PostPage, AppError> {
        debug!(
            filter = %request.filter,
            page = request.page,
            page_size = request.page_size,
            "listing posts"
        );
        let result = self.api.list(request).await;
        self.settle(result)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, AppError> {
        let result = self.api.get(id).await;
        self.settle(result)
    }

    pub async fn create(&self, payload: &PostPayload) -> Result<PostRecord, AppError> {
        let _guard = self.inflight.acquire(ActionKey::new(PostAction::Create, None))?;
        let result = self.api.create(payload).await;
        let record = self.settle(result)?;
        info!(post_id = %record.id, title = %record.title, "post created");
        Ok(record)
    }

    pub async fn update(&self, id: Uuid, payload: &PostPayload) -> Result<PostRecord, AppError> {
        let _guard = self
            .inflight
            .acquire(ActionKey::new(PostAction::Update, Some(id)))?;
        let result = self.api.update(id, payload).await;
        let record = self.settle(result)?;
        info!(post_id = %id, "post updated");
        Ok(record)
    }

    pub async fn set_published(&self, id: Uuid, published: bool) -> Result<PostRecord, AppError> {
        let action = if published {
            PostAction::Publish
        } else {
            PostAction::Unpublish
        };
        let _guard = self.inflight.acquire(ActionKey::new(action, Some(id)))?;
        let result = self.api.set_published(id, published).await;
        let record = self.settle(result)?;
        info!(post_id = %id, published, "post publish state changed");
        Ok(record)
    }

    /// Delete `id` once the author confirmed. A declined confirmation sends
    /// nothing.
    pub async fn delete(
        &self,
        id: Uuid,
        confirmation: Confirmation,
    ) -> Result<DeleteOutcome, AppError> {
        if confirmation == Confirmation::Declined {
            debug!(post_id = %id, "delete cancelled by author");
            return Ok(DeleteOutcome::Cancelled);
        }

        let _guard = self
            .inflight
            .acquire(ActionKey::new(PostAction::Delete, Some(id)))?;
        let result = self.api.delete(id).await;
        self.settle(result)?;
        info!(post_id = %id, "post deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, AppError> {
        match result {
            Ok(value) => {
                self.session.confirm();
                Ok(value)
            }
            Err(err) => {
                warn!(error = %err, "post api call failed");
                Err(self.session.screen(err))
            }
        }
    }
}

use async_trait::async_trait;
use reqwest::Method;
use uuid::Uuid;

use penman_api_types::{Envelope, PostPayload, PostRecord};

use crate::application::ports::{ApiError, ListRequest, PostApi, PostPage};
use crate::application::session::SessionStore;

use super::ApiClient;

/// Post-API over HTTP, scoped to the signed-in author's posts.
///
/// The bearer token is read from the [`SessionStore`] as each request is
/// built, so a logout or rejection applies to the very next call.
#[derive(Clone, Debug)]
pub struct HttpPostApi {
    client: ApiClient,
    session: SessionStore,
}

impl HttpPostApi {
    pub fn new(client: ApiClient, session: SessionStore) -> Self {
        Self { client, session }
    }

    fn bearer(&self) -> Option<String> {
        self.session.current_token()
    }

    async fn single(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<PostRecord, ApiError> {
        let envelope: Envelope<PostRecord> = self
            .client
            .request(method, path, &[], body, self.bearer().as_deref())
            .await?;
        Ok(envelope.data)
    }
}

fn list_path(request: &ListRequest) -> String {
    match request.filter.published() {
        Some(published) => format!("posts/my-posts/published/{published}"),
        None => "posts/my-posts".to_string(),
    }
}

fn payload_json(payload: &PostPayload) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(payload).map_err(|err| ApiError::Decode(err.to_string()))
}

#[async_trait]
impl PostApi for HttpPostApi {
    async fn list(&self, request: ListRequest) -> Result<PostPage, ApiError> {
        let query = [
            ("page", request.page.to_string()),
            ("per_page", request.page_size.to_string()),
        ];
        let envelope: Envelope<Vec<PostRecord>> = self
            .client
            .request(
                Method::GET,
                &list_path(&request),
                &query,
                None,
                self.bearer().as_deref(),
            )
            .await?;

        Ok(match envelope.pagination {
            Some(meta) => PostPage {
                items: envelope.data,
                current_page: meta.current_page.max(1),
                total_pages: meta.total_pages,
                total_items: meta.total_items,
            },
            None => {
                let total_items = envelope.data.len() as u64;
                PostPage {
                    current_page: request.page,
                    total_pages: u32::from(total_items > 0),
                    total_items,
                    items: envelope.data,
                }
            }
        })
    }

    async fn get(&self, id: Uuid) -> Result<PostRecord, ApiError> {
        self.single(Method::GET, &format!("posts/{id}"), None).await
    }

    async fn create(&self, payload: &PostPayload) -> Result<PostRecord, ApiError> {
        self.single(Method::POST, "posts", Some(payload_json(payload)?))
            .await
    }

    async fn update(&self, id: Uuid, payload: &PostPayload) -> Result<PostRecord, ApiError> {
        self.single(
            Method::PUT,
            &format!("posts/{id}"),
            Some(payload_json(payload)?),
        )
        .await
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<PostRecord, ApiError> {
        let action = if published { "publish" } else { "unpublish" };
        self.single(Method::PUT, &format!("posts/{id}/{action}"), None)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.client
            .request_unit(
                Method::DELETE,
                &format!("posts/{id}"),
                &[],
                self.bearer().as_deref(),
            )
            .await
    }
}

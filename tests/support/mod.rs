#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use penman::application::ports::{
    ApiError, AuthExchange, AuthExchangeError, AuthGrant, Credentials, ListRequest, PostApi,
    PostPage,
};
use penman::application::posts::PostCommands;
use penman::application::session::SessionStore;
use penman::domain::session::{Session, UserIdentity};
use penman::domain::slug::derive_slug;
use penman::infra::storage::MemorySessionStorage;
use penman_api_types::{PostPayload, PostRecord, PostType};
use time::macros::datetime;
use tokio::sync::{Mutex, Notify};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListRequest),
    Get(Uuid),
    Create(PostPayload),
    Update(Uuid, PostPayload),
    SetPublished(Uuid, bool),
    Delete(Uuid),
}

/// Post-API over an in-memory table; newest posts first.
#[derive(Default)]
pub struct FakePostApi {
    posts: Mutex<Vec<PostRecord>>,
    calls: Mutex<Vec<Call>>,
    reject: AtomicBool,
    reported_page: AtomicU32,
    hold_next: AtomicBool,
    release: Notify,
}

impl FakePostApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn seed(&self, title: &str, published: bool) -> Uuid {
        let record = record(title, published);
        let id = record.id;
        self.posts.lock().await.insert(0, record);
        id
    }

    /// Answer every following call with 401.
    pub fn reject_tokens(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// Report `page` as the current page of every following listing,
    /// whatever was asked for.
    pub fn report_page(&self, page: u32) {
        self.reported_page.store(page, Ordering::SeqCst);
    }

    /// Park the next call after it is recorded, until [`Self::release`].
    pub fn hold_next_call(&self) {
        self.hold_next.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn mutations(&self) -> Vec<Call> {
        self.calls()
            .await
            .into_iter()
            .filter(|call| !matches!(call, Call::List(_) | Call::Get(_)))
            .collect()
    }

    pub async fn stored(&self, id: Uuid) -> Option<PostRecord> {
        self.posts
            .lock()
            .await
            .iter()
            .find(|post| post.id == id)
            .cloned()
    }

    async fn enter(&self, call: Call) -> Result<(), ApiError> {
        self.calls.lock().await.push(call);
        if self.hold_next.swap(false, Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.reject.load(Ordering::SeqCst) {
            return Err(ApiError::Unauthorized);
        }
        Ok(())
    }
}

fn record(title: &str, published: bool) -> PostRecord {
    PostRecord {
        id: Uuid::new_v4(),
        profile_id: None,
        kind: PostType::Post,
        title: title.to_string(),
        content: format!("<p>{title}</p>"),
        created_at: Some(datetime!(2024-03-01 09:30)),
        updated_at: Some(datetime!(2024-03-01 09:30)),
        tags: Vec::new(),
        published,
        slug: Some(derive_slug(title)),
        excerpt: None,
        view_count: 0,
    }
}

fn not_found() -> ApiError {
    ApiError::status(404, "Post not found")
}

fn apply(record: &mut PostRecord, payload: &PostPayload) {
    record.title = payload.title.clone();
    record.kind = payload.kind;
    record.content = payload.content.clone();
    record.slug = Some(
        payload
            .slug
            .clone()
            .unwrap_or_else(|| derive_slug(&payload.title)),
    );
    record.excerpt = payload.excerpt.clone();
    record.tags = payload.tags.clone().unwrap_or_default();
    record.published = payload.published;
    record.updated_at = Some(datetime!(2024-03-02 10:00));
}

#[async_trait]
impl PostApi for FakePostApi {
    async fn list(&self, request: ListRequest) -> Result<PostPage, ApiError> {
        self.enter(Call::List(request)).await?;
        let posts = self.posts.lock().await;
        let matching: Vec<&PostRecord> = posts
            .iter()
            .filter(|post| {
                request
                    .filter
                    .published()
                    .is_none_or(|published| post.published == published)
            })
            .collect();

        let size = request.page_size.max(1) as usize;
        let total_items = matching.len() as u64;
        let total_pages = u32::try_from(matching.len().div_ceil(size)).unwrap_or(u32::MAX);
        let skip = (request.page.max(1) as usize - 1) * size;

        Ok(PostPage {
            items: matching
                .into_iter()
                .skip(skip)
                .take(size)
                .cloned()
                .collect(),
            current_page: match self.reported_page.load(Ordering::SeqCst) {
                0 => request.page,
                page => page,
            },
            total_pages,
            total_items,
        })
    }

    async fn get(&self, id: Uuid) -> Result<PostRecord, ApiError> {
        self.enter(Call::Get(id)).await?;
        self.stored(id).await.ok_or_else(not_found)
    }

    async fn create(&self, payload: &PostPayload) -> Result<PostRecord, ApiError> {
        self.enter(Call::Create(payload.clone())).await?;
        let mut created = record(&payload.title, payload.published);
        apply(&mut created, payload);
        self.posts.lock().await.insert(0, created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, payload: &PostPayload) -> Result<PostRecord, ApiError> {
        self.enter(Call::Update(id, payload.clone())).await?;
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(not_found)?;
        apply(post, payload);
        Ok(post.clone())
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<PostRecord, ApiError> {
        self.enter(Call::SetPublished(id, published)).await?;
        let mut posts = self.posts.lock().await;
        let post = posts
            .iter_mut()
            .find(|post| post.id == id)
            .ok_or_else(not_found)?;
        post.published = published;
        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        self.enter(Call::Delete(id)).await?;
        let mut posts = self.posts.lock().await;
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}

/// Accepts `ada` / `secret` only.
#[derive(Default)]
pub struct FakeAuth {
    exchanges: AtomicUsize,
}

impl FakeAuth {
    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthExchange for FakeAuth {
    async fn exchange(&self, credentials: &Credentials) -> Result<AuthGrant, AuthExchangeError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if credentials.username == "ada" && credentials.password == "secret" {
            Ok(AuthGrant {
                token: "tok-ada".into(),
                user: ada(),
            })
        } else {
            Err(AuthExchangeError::Rejected("Invalid credentials".into()))
        }
    }
}

pub fn ada() -> UserIdentity {
    UserIdentity {
        id: Some("p-1".into()),
        username: Some("ada".into()),
        email: Some("ada@example.com".into()),
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
    }
}

/// A session restored from storage, plus commands bound to `api`.
pub fn signed_in(api: Arc<FakePostApi>) -> (SessionStore, PostCommands<FakePostApi>) {
    let storage = Arc::new(MemorySessionStorage::with_session(Session::new(
        "tok-ada",
        ada(),
    )));
    let session = SessionStore::new(storage, Arc::new(FakeAuth::default()));
    session.rehydrate();
    let commands = PostCommands::new(api, session.clone());
    (session, commands)
}

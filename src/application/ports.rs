//! Collaborator traits consumed by the application layer.
//!
//! Adapters live under `infra`; tests provide in-memory versions.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use penman_api_types::{PostPayload, PostRecord};

use crate::domain::error::DomainError;
use crate::domain::session::{Session, UserIdentity};
use crate::domain::types::ListingFilter;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server rejected the bearer credential (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,
    /// Any other non-success status; `message` is the server's own wording.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("network error: {0}")]
    Transport(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthExchangeError {
    #[error("{0}")]
    Rejected(String),
    #[error("network error: {0}")]
    Transport(String),
    /// The server answered with a 5xx; the message is its own.
    #[error("{0}")]
    Server(String),
    #[error("{0}")]
    Decode(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is corrupt: {0}")]
    Corrupt(String),
}

/// One page of the editor's own posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListRequest {
    pub filter: ListingFilter,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostPage {
    pub items: Vec<PostRecord>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_items: u64,
}

/// Post-API scoped to the authenticated editor's own posts.
#[async_trait]
pub trait PostApi: Send + Sync {
    async fn list(&self, request: ListRequest) -> Result<PostPage, ApiError>;

    async fn get(&self, id: Uuid) -> Result<PostRecord, ApiError>;

    async fn create(&self, payload: &PostPayload) -> Result<PostRecord, ApiError>;

    async fn update(&self, id: Uuid, payload: &PostPayload) -> Result<PostRecord, ApiError>;

    async fn set_published(&self, id: Uuid, published: bool) -> Result<PostRecord, ApiError>;

    async fn delete(&self, id: Uuid) -> Result<(), ApiError>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be filled in before the exchange is attempted.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.username.trim().is_empty() {
            return Err(DomainError::required("username"));
        }
        if self.password.is_empty() {
            return Err(DomainError::required("password"));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Token and identity issued by a successful login exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserIdentity,
}

impl std::fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[async_trait]
pub trait AuthExchange: Send + Sync {
    async fn exchange(&self, credentials: &Credentials) -> Result<AuthGrant, AuthExchangeError>;
}

/// Durable key/value home of the session across process restarts.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Session>, StorageError>;

    fn save(&self, session: &Session) -> Result<(), StorageError>;

    fn clear(&self) -> Result<(), StorageError>;
}

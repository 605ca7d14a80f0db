//! Editor session values.

use serde::{Deserialize, Serialize};

/// Identity returned by the login exchange. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl UserIdentity {
    /// Best available human-readable name.
    pub fn display_name(&self) -> Option<String> {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !full.is_empty() {
            return Some(full);
        }
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .filter(|name| !name.trim().is_empty())
    }
}

/// Credential plus identity, as held in memory and in persisted storage.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<UserIdentity>,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserIdentity) -> Self {
        Self {
            token: Some(token.into()),
            user: Some(user),
        }
    }

    /// True iff a non-empty token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }

    /// User identity, only meaningful while authenticated.
    pub fn user(&self) -> Option<&UserIdentity> {
        if self.is_authenticated() {
            self.user.as_ref()
        } else {
            None
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

//! Access decisions for protected views.

use uuid::Uuid;

use super::session::SessionStore;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const CREATE_POST_PATH: &str = "/posts/create";

pub fn edit_post_path(id: Uuid) -> String {
    format!("/posts/edit/{id}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Session state is still resolving; render a neutral placeholder.
    Pending,
    Allow,
    Redirect {
        to: String,
        return_path: Option<String>,
    },
}

/// Decide whether a protected view at `requested` may render.
pub fn authorize(is_authenticated: bool, is_loading: bool, requested: &str) -> GateDecision {
    if is_loading {
        GateDecision::Pending
    } else if is_authenticated {
        GateDecision::Allow
    } else {
        GateDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            return_path: Some(requested.to_string()),
        }
    }
}

/// The login view is only for signed-out editors.
pub fn authorize_login_view(is_authenticated: bool, is_loading: bool) -> GateDecision {
    if is_loading {
        GateDecision::Pending
    } else if is_authenticated {
        GateDecision::Redirect {
            to: HOME_PATH.to_string(),
            return_path: None,
        }
    } else {
        GateDecision::Allow
    }
}

/// Where to go once sign-in succeeds. Only local paths are honoured.
pub fn destination_after_login(return_path: Option<&str>) -> String {
    match return_path.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && path != LOGIN_PATH => {
            path.to_string()
        }
        _ => HOME_PATH.to_string(),
    }
}

/// [`authorize`] bound to a live [`SessionStore`].
#[derive(Debug, Clone)]
pub struct SessionGate {
    session: SessionStore,
}

impl SessionGate {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    pub fn authorize(&self, requested: &str) -> GateDecision {
        let snapshot = self.session.snapshot();
        let decision = authorize(snapshot.authenticated, snapshot.loading, requested);
        if decision == GateDecision::Allow {
            self.session.remember_location(requested);
        }
        decision
    }

    pub fn authorize_login_view(&self) -> GateDecision {
        let snapshot = self.session.snapshot();
        authorize_login_view(snapshot.authenticated, snapshot.loading)
    }

    /// Redirect issued after a request was rejected mid-view.
    pub fn after_rejection(&self) -> GateDecision {
        GateDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            return_path: self.session.location(),
        }
    }
}

//! Process-wide editor session.
//!
//! [`SessionStore`] is a cheap, cloneable handle: every component that issues
//! authenticated calls holds one and reads the token at call time, so a
//! logout or rejection is visible to the very next request.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{info, warn};

use crate::domain::session::{Session, UserIdentity};

use super::error::AppError;
use super::ports::{ApiError, AuthExchange, Credentials, SessionStorage};

pub(crate) const SESSION_REJECTED_TOTAL: &str = "penman_session_rejected_total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Persisted storage has not been read yet.
    Pending,
    /// No session.
    Anonymous,
    /// Token came from persisted storage and no server call has accepted it yet.
    Restored,
    /// Token issued in this process, or a restored token the server accepted.
    Confirmed,
}

/// Read-only view of the session for gates and views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub authenticated: bool,
    pub loading: bool,
    pub user: Option<UserIdentity>,
    pub last_error: Option<String>,
}

#[derive(Debug)]
struct SessionState {
    session: Session,
    phase: SessionPhase,
    logins_in_flight: u32,
    last_error: Option<String>,
    location: Option<String>,
}

#[derive(Clone)]
pub struct SessionStore {
    state: Arc<RwLock<SessionState>>,
    storage: Arc<dyn SessionStorage>,
    auth: Arc<dyn AuthExchange>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>, auth: Arc<dyn AuthExchange>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                session: Session::default(),
                phase: SessionPhase::Pending,
                logins_in_flight: 0,
                last_error: None,
                location: None,
            })),
            storage,
            auth,
        }
    }

    /// Load the persisted session, leaving the `Pending` phase.
    pub fn rehydrate(&self) -> SessionPhase {
        let loaded = self.storage.load();
        let mut state = self.write();

        match loaded {
            Ok(Some(session)) if session.is_authenticated() => {
                state.session = session;
                state.phase = SessionPhase::Restored;
            }
            Ok(_) => {
                state.session = Session::default();
                state.phase = SessionPhase::Anonymous;
            }
            Err(err) => {
                warn!(error = %err, "persisted session could not be read; starting signed out");
                state.session = Session::default();
                state.phase = SessionPhase::Anonymous;
                state.last_error = Some(err.to_string());
            }
        }

        state.phase
    }

    /// Exchange credentials for a session.
    ///
    /// On failure the previous session is left as it was and the error text
    /// is kept in [`SessionSnapshot::last_error`].
    pub async fn login(&self, credentials: &Credentials) -> Result<UserIdentity, AppError> {
        if let Err(err) = credentials.validate() {
            let err = AppError::from(err);
            self.write().last_error = Some(err.notice());
            return Err(err);
        }

        let in_flight = LoginInFlight::start(&self.state);
        let outcome = self.auth.exchange(credentials).await;
        drop(in_flight);

        let mut state = self.write();

        let grant = match outcome {
            Ok(grant) if grant.token.is_empty() => {
                let err = AppError::Authentication("login response did not include a token".into());
                state.last_error = Some(err.notice());
                return Err(err);
            }
            Ok(grant) => grant,
            Err(err) => {
                let err = AppError::from(err);
                warn!(username = %credentials.username, error = %err, "sign-in failed");
                state.last_error = Some(err.notice());
                return Err(err);
            }
        };

        let session = Session::new(grant.token, grant.user.clone());
        if let Err(err) = self.storage.save(&session) {
            warn!(error = %err, "failed to persist session");
            state.last_error = Some(err.to_string());
            return Err(err.into());
        }

        state.session = session;
        state.phase = SessionPhase::Confirmed;
        info!(
            username = %credentials.username,
            user_id = grant.user.id.as_deref().unwrap_or("-"),
            "editor signed in"
        );
        Ok(grant.user)
    }

    /// Clear the session everywhere. Safe to call when already signed out.
    pub fn logout(&self) {
        let mut state = self.write();
        let was_authenticated = state.session.is_authenticated();
        state.session = Session::default();
        state.phase = SessionPhase::Anonymous;
        state.last_error = None;
        state.location = None;
        drop(state);

        self.clear_storage();
        if was_authenticated {
            info!("editor signed out");
        }
    }

    /// Clear the session after the server rejected its token. The last
    /// visited location is kept so sign-in can return there.
    pub fn invalidate(&self) {
        let mut state = self.write();
        let was_authenticated = state.session.is_authenticated();
        state.session = Session::default();
        state.phase = SessionPhase::Anonymous;
        state.last_error = Some(AppError::SessionExpired.notice());
        let location = state.location.clone();
        drop(state);

        self.clear_storage();
        if was_authenticated {
            metrics::counter!(SESSION_REJECTED_TOTAL).increment(1);
            warn!(
                location = location.as_deref().unwrap_or("-"),
                "session token rejected; signed out"
            );
        }
    }

    /// Convert a collaborator error, invalidating the session on rejection.
    pub fn screen(&self, error: ApiError) -> AppError {
        match error {
            ApiError::Unauthorized => {
                self.invalidate();
                AppError::SessionExpired
            }
            other => AppError::from(other),
        }
    }

    /// Record that the server accepted the current token.
    pub fn confirm(&self) {
        let mut state = self.write();
        if state.phase == SessionPhase::Restored && state.session.is_authenticated() {
            state.phase = SessionPhase::Confirmed;
        }
    }

    pub fn current_token(&self) -> Option<String> {
        self.read()
            .session
            .token
            .clone()
            .filter(|token| !token.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_authenticated()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read();
        SessionSnapshot {
            phase: state.phase,
            authenticated: state.session.is_authenticated(),
            loading: state.phase == SessionPhase::Pending || state.logins_in_flight > 0,
            user: state.session.user().cloned(),
            last_error: state.last_error.clone(),
        }
    }

    pub fn dismiss_error(&self) {
        self.write().last_error = None;
    }

    pub(crate) fn remember_location(&self, path: &str) {
        self.write().location = Some(path.to_string());
    }

    pub fn location(&self) -> Option<String> {
        self.read().location.clone()
    }

    fn clear_storage(&self) {
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "failed to clear persisted session");
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks a login as in flight until dropped, so a cancelled login does not
/// leave the session loading.
struct LoginInFlight {
    state: Arc<RwLock<SessionState>>,
}

impl LoginInFlight {
    fn start(state: &Arc<RwLock<SessionState>>) -> Self {
        {
            let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
            guard.logins_in_flight = guard.logins_in_flight.saturating_add(1);
            guard.last_error = None;
        }
        Self {
            state: Arc::clone(state),
        }
    }
}

impl Drop for LoginInFlight {
    fn drop(&mut self) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.logins_in_flight = guard.logins_in_flight.saturating_sub(1);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}

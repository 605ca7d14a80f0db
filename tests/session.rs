mod support;

use std::future::pending;
use std::sync::Arc;

use async_trait::async_trait;

use penman::application::error::ErrorKind;
use penman::application::gate::{
    CREATE_POST_PATH, GateDecision, LOGIN_PATH, SessionGate, destination_after_login,
};
use penman::application::ports::{
    AuthExchange, AuthExchangeError, AuthGrant, Credentials, SessionStorage,
};
use penman::application::session::{SessionPhase, SessionStore};
use penman::domain::session::Session;
use penman::infra::storage::{FileSessionStorage, MemorySessionStorage};
use tempfile::TempDir;

use support::{FakeAuth, ada};

fn store(storage: Arc<dyn SessionStorage>) -> (SessionStore, Arc<FakeAuth>) {
    let auth = Arc::new(FakeAuth::default());
    (SessionStore::new(storage, auth.clone()), auth)
}

#[tokio::test]
async fn sign_in_returns_to_the_requested_view() {
    let (session, _auth) = store(Arc::new(MemorySessionStorage::new()));
    let gate = SessionGate::new(session.clone());

    assert_eq!(gate.authorize(CREATE_POST_PATH), GateDecision::Pending);

    assert_eq!(session.rehydrate(), SessionPhase::Anonymous);
    let GateDecision::Redirect { to, return_path } = gate.authorize(CREATE_POST_PATH) else {
        panic!("signed-out editor must be redirected");
    };
    assert_eq!(to, LOGIN_PATH);
    assert_eq!(gate.authorize_login_view(), GateDecision::Allow);

    let user = session
        .login(&Credentials::new("ada", "secret"))
        .await
        .expect("login");
    assert_eq!(user, ada());
    assert_eq!(session.snapshot().phase, SessionPhase::Confirmed);

    let destination = destination_after_login(return_path.as_deref());
    assert_eq!(destination, CREATE_POST_PATH);
    assert_eq!(gate.authorize(&destination), GateDecision::Allow);
    assert!(matches!(
        gate.authorize_login_view(),
        GateDecision::Redirect { return_path: None, .. }
    ));
}

#[tokio::test]
async fn session_survives_a_restart() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("nested").join("session.json");

    let (first, _auth) = store(Arc::new(FileSessionStorage::new(&path)));
    first.rehydrate();
    first
        .login(&Credentials::new("ada", "secret"))
        .await
        .expect("login");
    assert!(path.exists());

    let (second, _auth) = store(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(second.rehydrate(), SessionPhase::Restored);
    assert!(second.is_authenticated());
    assert_eq!(second.current_token().as_deref(), Some("tok-ada"));
    assert_eq!(second.snapshot().user, Some(ada()));

    second.confirm();
    assert_eq!(second.snapshot().phase, SessionPhase::Confirmed);
}

#[tokio::test]
async fn logout_clears_storage_and_can_repeat() {
    let storage = Arc::new(MemorySessionStorage::with_session(Session::new(
        "tok-ada",
        ada(),
    )));
    let (session, _auth) = store(storage.clone());
    session.rehydrate();
    assert!(session.is_authenticated());

    session.logout();
    assert!(!session.is_authenticated());
    assert_eq!(session.snapshot().phase, SessionPhase::Anonymous);
    assert!(storage.load().expect("load").is_none());

    session.logout();
    assert!(!session.is_authenticated());
    assert!(session.current_token().is_none());
}

#[tokio::test]
async fn rejected_login_keeps_the_previous_session() {
    let storage = Arc::new(MemorySessionStorage::with_session(Session::new(
        "tok-old",
        ada(),
    )));
    let (session, auth) = store(storage.clone());
    session.rehydrate();

    let err = session
        .login(&Credentials::new("ada", "wrong"))
        .await
        .expect_err("rejected");

    assert_eq!(err.kind(), ErrorKind::Authentication);
    assert_eq!(auth.exchanges(), 1);
    assert_eq!(session.current_token().as_deref(), Some("tok-old"));
    let stored = storage.load().expect("load").expect("still stored");
    assert_eq!(stored.token.as_deref(), Some("tok-old"));

    let snapshot = session.snapshot();
    assert!(!snapshot.loading);
    assert!(
        snapshot
            .last_error
            .as_deref()
            .is_some_and(|message| message.contains("Invalid credentials"))
    );

    session.dismiss_error();
    assert!(session.snapshot().last_error.is_none());
}

#[tokio::test]
async fn blank_credentials_are_refused_before_the_exchange() {
    let (session, auth) = store(Arc::new(MemorySessionStorage::new()));
    session.rehydrate();

    for credentials in [
        Credentials::new("ada", ""),
        Credentials::new("   ", "secret"),
    ] {
        let err = session.login(&credentials).await.expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert_eq!(auth.exchanges(), 0);
    assert!(!session.is_authenticated());
    assert!(session.snapshot().last_error.is_some());
}

#[tokio::test]
async fn corrupt_session_file_starts_signed_out() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("session.json");
    std::fs::write(&path, "{not json").expect("write");

    let (session, _auth) = store(Arc::new(FileSessionStorage::new(&path)));
    assert_eq!(session.rehydrate(), SessionPhase::Anonymous);
    assert!(!session.is_authenticated());
    assert!(session.snapshot().last_error.is_some());
}

/// An auth server that never answers.
struct SilentAuth;

#[async_trait]
impl AuthExchange for SilentAuth {
    async fn exchange(&self, _credentials: &Credentials) -> Result<AuthGrant, AuthExchangeError> {
        pending().await
    }
}

#[tokio::test]
async fn abandoned_login_stops_loading() {
    let session = SessionStore::new(Arc::new(MemorySessionStorage::new()), Arc::new(SilentAuth));
    session.rehydrate();
    let gate = SessionGate::new(session.clone());

    let credentials = Credentials::new("ada", "secret");
    {
        let mut login = std::pin::pin!(session.login(&credentials));
        tokio::select! {
            biased;
            _ = &mut login => panic!("silent auth cannot answer"),
            () = std::future::ready(()) => {}
        }
        assert!(session.snapshot().loading);
        assert_eq!(gate.authorize(CREATE_POST_PATH), GateDecision::Pending);
    }

    let snapshot = session.snapshot();
    assert!(!snapshot.loading);
    assert!(!snapshot.authenticated);
    assert!(matches!(
        gate.authorize(CREATE_POST_PATH),
        GateDecision::Redirect { .. }
    ));
}

#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use penman::application::error::AppError;
use penman::application::gate::{GateDecision, HOME_PATH, SessionGate};
use penman::application::ports::SessionStorage;
use penman::application::posts::PostCommands;
use penman::application::session::SessionStore;
use penman::config::{self, LoadError, Settings};
use penman::infra::error::InfraError;
use penman::infra::http::{ApiClient, HttpAuthExchange, HttpPostApi};
use penman::infra::storage::FileSessionStorage;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("password is required (use --password-file or PENMAN_PASSWORD)")]
    MissingPassword,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("sign in required to open {return_path} (run `penman-cli login --return-to {return_path}`)")]
    SignInRequired { return_path: String },
    #[error("session is still loading")]
    SessionPending,
    #[error("{0}")]
    App(#[from] AppError),
    #[error("failed to render output: {0}")]
    Output(String),
}

/// Wired services for one command invocation.
pub struct Ctx {
    pub settings: Settings,
    pub session: SessionStore,
    pub gate: SessionGate,
    pub posts: PostCommands<HttpPostApi>,
}

impl Ctx {
    pub fn new(settings: Settings, storage: Arc<dyn SessionStorage>) -> Result<Self, CliError> {
        let client = ApiClient::new(&settings.api)?;
        let auth = Arc::new(HttpAuthExchange::new(client.clone()));
        let session = SessionStore::new(storage, auth);
        session.rehydrate();

        let api = Arc::new(HttpPostApi::new(client, session.clone()));
        let posts = PostCommands::new(api, session.clone());
        let gate = SessionGate::new(session.clone());

        Ok(Self {
            settings,
            session,
            gate,
            posts,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.settings.listing.page_size.get()
    }

    /// Admit the command only for a signed-in editor.
    pub fn require_session(&self, path: &str) -> Result<(), CliError> {
        match self.gate.authorize(path) {
            GateDecision::Allow => Ok(()),
            GateDecision::Pending => Err(CliError::SessionPending),
            GateDecision::Redirect { return_path, .. } => Err(CliError::SignInRequired {
                return_path: return_path.unwrap_or_else(|| HOME_PATH.to_string()),
            }),
        }
    }

    /// Map a service error; an expired session becomes a sign-in prompt
    /// pointing back at the view that was open.
    pub fn fail(&self, err: AppError) -> CliError {
        if !matches!(err, AppError::SessionExpired) {
            return CliError::App(err);
        }
        match self.gate.after_rejection() {
            GateDecision::Redirect {
                return_path: Some(return_path),
                ..
            } => CliError::SignInRequired { return_path },
            _ => CliError::App(err),
        }
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(cli.config_file.as_deref(), &cli.overrides)?)
}

pub fn ctx_from_settings(settings: Settings) -> Result<Ctx, CliError> {
    let storage = Arc::new(FileSessionStorage::new(settings.session.file.clone()));
    Ctx::new(settings, storage)
}

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use penman_api_types::{LoginRequest, LoginResponse, ProfileRecord};

use crate::application::ports::{ApiError, AuthExchange, AuthExchangeError, AuthGrant, Credentials};
use crate::domain::session::UserIdentity;

use super::ApiClient;
use super::client::error_message;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_LOGIN_RESPONSE: &str = "Invalid response format from login API";

/// `POST profiles/login`.
#[derive(Clone, Debug)]
pub struct HttpAuthExchange {
    client: ApiClient,
}

impl HttpAuthExchange {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthExchange for HttpAuthExchange {
    async fn exchange(&self, credentials: &Credentials) -> Result<AuthGrant, AuthExchangeError> {
        let body = serde_json::to_value(LoginRequest {
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
        .map_err(|err| AuthExchangeError::Decode(err.to_string()))?;

        let (status, text) = self
            .client
            .request_anonymous(Method::POST, "profiles/login", body)
            .await
            .map_err(|err| match err {
                ApiError::Transport(message) => AuthExchangeError::Transport(message),
                other => AuthExchangeError::Decode(other.to_string()),
            })?;

        if status.is_client_error() {
            let message = if text.trim().is_empty() {
                INVALID_CREDENTIALS.to_string()
            } else {
                error_message(status, &text)
            };
            debug!(status = status.as_u16(), "login rejected");
            return Err(AuthExchangeError::Rejected(message));
        }
        if !status.is_success() {
            debug!(status = status.as_u16(), "login failed on the server");
            return Err(AuthExchangeError::Server(error_message(status, &text)));
        }

        let response: LoginResponse = serde_json::from_str(&text)
            .map_err(|_| AuthExchangeError::Decode(INVALID_LOGIN_RESPONSE.to_string()))?;
        if response.token.trim().is_empty() {
            return Err(AuthExchangeError::Decode(INVALID_LOGIN_RESPONSE.to_string()));
        }

        Ok(AuthGrant {
            token: response.token,
            user: identity(response.profile),
        })
    }
}

fn identity(profile: ProfileRecord) -> UserIdentity {
    UserIdentity {
        id: profile.id,
        username: profile.username,
        email: profile.email,
        first_name: profile.first_name,
        last_name: profile.last_name,
    }
}

use reqwest::{Client, Method, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use penman_api_types::ErrorBody;

use crate::application::ports::ApiError;
use crate::config::ApiSettings;
use crate::infra::error::InfraError;

use super::API_REQUESTS_TOTAL;

/// Shared HTTP plumbing for the Post-API and login endpoints.
///
/// Holds no credential; callers pass the bearer token per request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(settings.timeout)
            .build()
            .map_err(|err| InfraError::http_client(err.to_string()))?;

        Ok(Self {
            client,
            base: directory_url(&settings.base_url),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("penman/", env!("CARGO_PKG_VERSION"))
    }

    pub fn url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self
            .base
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::Transport(format!("invalid request url: {err}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Request whose success body is JSON.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, path, query, body, bearer).await?;
        serde_json::from_str(&text).map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Request whose success body is ignored.
    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        bearer: Option<&str>,
    ) -> Result<(), ApiError> {
        self.send(method, path, query, None, bearer)
            .await
            .map(|_| ())
    }

    /// Request without a bearer credential whose status is left to the
    /// caller.
    pub(crate) async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: serde_json::Value,
    ) -> Result<(StatusCode, String), ApiError> {
        let url = self.url(path, &[])?;
        let response = self
            .client
            .request(method.clone(), url)
            .json(&body)
            .send()
            .await
            .map_err(|err| transport(&method, &err))?;
        let status = response.status();
        let text = read_body(response).await?;
        record(&method, status);
        debug!(method = %method, path, status = status.as_u16(), "api request");
        Ok((status, text))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        bearer: Option<&str>,
    ) -> Result<String, ApiError> {
        let url = self.url(path, query)?;
        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|err| transport(&method, &err))?;
        let status = response.status();
        let text = read_body(response).await?;
        record(&method, status);
        debug!(method = %method, path, status = status.as_u16(), "api request");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::status(status.as_u16(), error_message(status, &text)));
        }
        Ok(text)
    }
}

/// Server wording for a failed response: the `message` field when the body
/// is an error object, the raw body otherwise, the status reason as a last
/// resort.
pub(crate) fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body)
        && let Some(message) = parsed.into_message()
    {
        return message;
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    status.canonical_reason().map_or_else(
        || format!("request failed with status {}", status.as_u16()),
        ToString::to_string,
    )
}

fn directory_url(base: &Url) -> Url {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

async fn read_body(response: Response) -> Result<String, ApiError> {
    response
        .text()
        .await
        .map_err(|err| ApiError::Transport(err.to_string()))
}

fn transport(method: &Method, err: &reqwest::Error) -> ApiError {
    metrics::counter!(API_REQUESTS_TOTAL, "method" => method.to_string(), "outcome" => "transport")
        .increment(1);
    ApiError::Transport(err.to_string())
}

fn record(method: &Method, status: StatusCode) {
    let outcome = if status.is_success() {
        "success"
    } else if status == StatusCode::UNAUTHORIZED {
        "unauthorized"
    } else {
        "error"
    };
    metrics::counter!(API_REQUESTS_TOTAL, "method" => method.to_string(), "outcome" => outcome)
        .increment(1);
}

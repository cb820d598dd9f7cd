//! HTTP plumbing shared by the backend operations.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{BackendError, Session, SupabaseConfig};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for one backend project, optionally bound to a signed-in
/// session.
///
/// Cloning is cheap; the HTTP connection pool is shared.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    config: SupabaseConfig,
    session: Option<Session>,
}

impl SupabaseClient {
    /// Creates an anonymous client.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Http`] if the HTTP client cannot be built.
    pub fn new(config: SupabaseConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            config,
            session: None,
        })
    }

    /// Creates an anonymous client from `SUPABASE_URL` and
    /// `SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if a variable is missing or the HTTP client
    /// cannot be built.
    pub fn from_env() -> Result<Self, BackendError> {
        Self::new(SupabaseConfig::from_env()?)
    }

    /// Returns a client that acts as the session's user.
    #[must_use]
    pub fn with_session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    #[must_use]
    pub const fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    pub(crate) fn require_session(&self) -> Result<&Session, BackendError> {
        self.session.as_ref().ok_or(BackendError::NotSignedIn)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let token = self
            .session
            .as_ref()
            .map_or(self.config.anon_key.as_str(), |s| s.access_token.as_str());

        self.http
            .request(method, format!("{}/{path}", self.config.url))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }

    /// A `PostgREST` request against `table` (or `rpc/<function>`).
    pub(crate) fn rest(&self, method: Method, table: &str) -> RequestBuilder {
        self.request(method, &format!("rest/v1/{table}"))
    }

    /// A request against the auth service.
    pub(crate) fn auth(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, &format!("auth/v1/{path}"))
    }

    /// Calls a database function and returns its JSON result (`null` for
    /// functions that return nothing).
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] if the request fails or the backend rejects
    /// it.
    pub async fn call_rpc(
        &self,
        function: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value, BackendError> {
        let resp = self
            .rest(Method::POST, &format!("rpc/{function}"))
            .json(args)
            .send()
            .await?;
        read_json(resp).await
    }
}

/// Reads a response body as JSON, turning non-success statuses into
/// [`BackendError::Rejected`]. An empty body reads as `null`.
pub(crate) async fn read_json<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        return Err(rejection(status, &body));
    }

    let body = if body.trim().is_empty() { "null" } else { &body };
    Ok(serde_json::from_str(body)?)
}

/// Like [`read_json`] for responses whose body is not needed.
pub(crate) async fn expect_success(resp: reqwest::Response) -> Result<(), BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(());
    }
    let body = resp.text().await?;
    Err(rejection(status, &body))
}

/// Builds a rejection from an error response, preferring the backend's own
/// message. `PostgREST` uses `message`, the auth service `msg` or
/// `error_description`.
pub(crate) fn rejection(status: StatusCode, body: &str) -> BackendError {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| json[*key].as_str().map(ToString::to_string))
        });

    let message = from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("HTTP {status}"));

    log::debug!("Backend rejected request ({status}): {message}");
    BackendError::Rejected {
        status: status.as_u16(),
        message,
    }
}

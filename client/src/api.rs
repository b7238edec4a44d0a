//! High-level API client
//!
//! Wraps `reqwest` with bearer-token attachment and a single retry on
//! 401: the first rejection triggers one shared renewal through the
//! [`SessionGuard`], the request is re-sent once with the new token,
//! and a second rejection is surfaced as-is. The refresh endpoint
//! itself never goes through this path, so renewal cannot recurse.

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::ClientError;
use crate::session::SessionGuard;
use crate::transport::{RefreshTransport, SessionTokens};

use async_trait::async_trait;

/// Refresh transport backed by the real rotation endpoint
pub struct HttpRefreshTransport {
    http: reqwest::Client,
    refresh_url: String,
}

#[async_trait]
impl RefreshTransport for HttpRefreshTransport {
    async fn refresh(&self, refresh_token: &str) -> Result<SessionTokens, ClientError> {
        let response = self
            .http
            .post(&self.refresh_url)
            .json(&json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(ClientError::SessionExpired);
        }
        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }
        parse_token_pair(&body)
    }
}

/// Client for the Inkwell HTTP API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionGuard<HttpRefreshTransport>,
}

impl ApiClient {
    /// Create a client for the API at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::new();
        let transport = HttpRefreshTransport {
            http: http.clone(),
            refresh_url: format!("{base_url}/api/v1/auth/refresh"),
        };
        Self {
            http,
            base_url,
            session: SessionGuard::new(transport),
        }
    }

    /// Authenticate and start a session
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .post(format!("{}/api/v1/auth/login", self.base_url))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            return Err(rejection(status.as_u16(), &body));
        }

        self.session.install(parse_token_pair(&body)?).await;
        debug!("session established");
        Ok(())
    }

    /// End the session on the server and locally
    ///
    /// The local session is dropped even when the server call fails;
    /// logout never leaves the client half signed in.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .authorized_request(Method::POST, "/api/v1/auth/logout", None)
            .await;
        self.session.clear().await;
        result.map(|_| ())
    }

    /// Whether the client currently holds a session
    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// Authorized GET returning the JSON body
    pub async fn get_json(&self, path: &str) -> Result<Value, ClientError> {
        self.authorized_request(Method::GET, path, None).await
    }

    /// Authorized POST with a JSON body, returning the JSON body
    pub async fn post_json(&self, path: &str, body: Value) -> Result<Value, ClientError> {
        self.authorized_request(Method::POST, path, Some(body)).await
    }

    /// Send a bearer-authorized request, renewing the token once on 401
    async fn authorized_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        let (token, version) = self
            .session
            .access_token()
            .await
            .ok_or(ClientError::SessionExpired)?;

        let response = self.send(method.clone(), path, body.as_ref(), &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return into_json(response).await;
        }

        debug!(path, "access token rejected, renewing");
        let token = self.session.fresh_access_token(version).await?;
        let response = self.send(method, path, body.as_ref(), &token).await?;
        into_json(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        token: &str,
    ) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }
}

async fn into_json(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let body: Value = response
        .json()
        .await
        .map_err(|e| ClientError::Protocol(e.to_string()))?;
    if !status.is_success() {
        return Err(rejection(status.as_u16(), &body));
    }
    Ok(body)
}

/// Extract the token pair from an authentication response body
fn parse_token_pair(body: &Value) -> Result<SessionTokens, ClientError> {
    let access = body["accessToken"]
        .as_str()
        .ok_or_else(|| ClientError::Protocol("missing accessToken".to_string()))?;
    let refresh = body["refreshToken"]
        .as_str()
        .ok_or_else(|| ClientError::Protocol("missing refreshToken".to_string()))?;
    Ok(SessionTokens::new(access, refresh))
}

/// Build a rejection error from an error envelope
fn rejection(status: u16, body: &Value) -> ClientError {
    let message = body["errors"][0]
        .as_str()
        .or_else(|| body["message"].as_str())
        .unwrap_or("request failed")
        .to_string();
    ClientError::Rejected { status, message }
}

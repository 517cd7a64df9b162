use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::SESSION_COOKIE;
use crate::config::ClientConfig;
use crate::error::{error_message, ApiError};
use crate::types::StatusReply;

/// Per-request options beyond method and endpoint
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }
}

/// HTTP/JSON client for the admin backend.
///
/// With `with_credentials` set, the `token` cookie returned by the backend is
/// kept and sent back on every request.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session_token: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        // validate early so every later join is known-good
        Url::parse(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            http,
            config,
            session_token: RwLock::new(None),
        })
    }

    pub fn with_session_token(self, token: Option<String>) -> Self {
        self.set_session_token(token);
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session_token(&self) -> Option<String> {
        self.session_token.read().ok().and_then(|guard| guard.clone())
    }

    pub fn set_session_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.session_token.write() {
            *guard = token;
        }
    }

    /// Absolute URL for an endpoint, keeping any path prefix of the base URL
    pub fn url(&self, endpoint: &str) -> Result<Url, ApiError> {
        let base = self.config.base_url.trim_end_matches('/');
        let url = if endpoint.starts_with('/') {
            format!("{}{}", base, endpoint)
        } else {
            format!("{}/{}", base, endpoint)
        };
        Ok(Url::parse(&url)?)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let url = self.url(endpoint)?;
        tracing::debug!("{} {}", method, url);

        let mut builder = self.http.request(method, url);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if self.config.with_credentials {
            if let Some(token) = self.session_token() {
                builder = builder.header(COOKIE, format!("{}={}", SESSION_COOKIE, token));
            }
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();

        if self.config.with_credentials {
            self.capture_session_cookie(response.headers());
        }

        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(self.error_from_response(status, &text));
        }

        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, RequestOptions::new()).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        self.request(Method::POST, endpoint, RequestOptions::new().json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(&self, endpoint: &str, body: &B) -> Result<T, ApiError> {
        self.request(Method::PUT, endpoint, RequestOptions::new().json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::DELETE, endpoint, RequestOptions::new()).await
    }

    /// `Authorization: Bearer <session token>` for endpoints that want it
    pub fn bearer_options(&self) -> RequestOptions {
        match self.session_token() {
            Some(token) => RequestOptions::new().header(AUTHORIZATION.as_str(), format!("Bearer {}", token)),
            None => RequestOptions::new(),
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.timeout_ms)
        } else {
            err.into()
        }
    }

    fn error_from_response(&self, status: StatusCode, text: &str) -> ApiError {
        let body: Option<Value> = serde_json::from_str(text).ok();
        tracing::debug!("Error response from backend ({}): {}", status, text);

        let message = error_message(status.as_u16(), status.canonical_reason().unwrap_or(""), body.as_ref());
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected the session: {}", message);
        }
        ApiError::from_status(status.as_u16(), message)
    }

    fn capture_session_cookie(&self, headers: &HeaderMap) {
        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            let pair = raw.split(';').next().unwrap_or("");
            if let Some((name, token)) = pair.split_once('=') {
                if name.trim() == SESSION_COOKIE {
                    let token = token.trim();
                    tracing::debug!("Session cookie {}", if token.is_empty() { "cleared" } else { "received" });
                    self.set_session_token((!token.is_empty()).then(|| token.to_string()));
                }
            }
        }
    }
}

/// Turn a `{ success, message }` reply into a result
pub fn ensure_success(reply: StatusReply, fallback: &str) -> Result<String, ApiError> {
    if reply.success {
        Ok(reply.message)
    } else if reply.message.is_empty() {
        Err(ApiError::Rejected(fallback.to_string()))
    } else {
        Err(ApiError::Rejected(reply.message))
    }
}

use actix_web::http::StatusCode;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use crate::auth::FormFields;
use crate::config::UpstreamConfig;
use crate::error::{AppError, UpstreamError};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const TOKEN_PATH: &str = "users/token/";
const SIGNUP_PATH: &str = "users/signup/";
const ME_PATH: &str = "users/me/";
const API_KEY_HEADER: &str = "api_key";

/// Status and body of an upstream reply, kept only long enough to branch on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: None,
            body: body.into(),
        }
    }

    /// Shorthand for a JSON reply, mostly useful in tests
    pub fn json_body(status: StatusCode, body: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: Some("application/json".to_string()),
            body: body.to_string().into_bytes(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// POST the login form to `/users/token/`
    async fn request_token(&self, form: &FormFields) -> Result<UpstreamResponse, AppError>;

    /// POST the registration form to `/users/signup/`
    async fn signup(&self, form: &FormFields) -> Result<UpstreamResponse, AppError>;

    /// GET `/users/me/` on behalf of the bearer of `token`
    async fn current_user(&self, token: &str) -> Result<UpstreamResponse, AppError>;
}

pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, AppError> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        // join() replaces the last segment unless the base ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::InvalidUrl(format!("{}: {}", path, e)).into())
    }

    async fn read(response: reqwest::Response) -> Result<UpstreamResponse, AppError> {
        let status = StatusCode::from_u16(response.status().as_u16())
            .map_err(|e| UpstreamError::MalformedBody(e.to_string()))?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await?.to_vec();

        debug!("Upstream replied {} with {} bytes", status, body.len());

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<UpstreamResponse, AppError> {
        let response = request
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| {
                error!("Upstream request failed: {}", e);
                AppError::from(e)
            })?;

        Self::read(response).await
    }
}

#[async_trait]
impl AuthApi for UpstreamClient {
    async fn request_token(&self, form: &FormFields) -> Result<UpstreamResponse, AppError> {
        let url = self.endpoint(TOKEN_PATH)?;
        self.send(self.http.post(url).form(form)).await
    }

    async fn signup(&self, form: &FormFields) -> Result<UpstreamResponse, AppError> {
        let url = self.endpoint(SIGNUP_PATH)?;
        self.send(self.http.post(url).form(form)).await
    }

    async fn current_user(&self, token: &str) -> Result<UpstreamResponse, AppError> {
        let url = self.endpoint(ME_PATH)?;
        self.send(self.http.get(url).bearer_auth(token)).await
    }
}

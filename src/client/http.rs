//! reqwest-backed backend client

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use super::error::{error_message, ClientError, ClientResult};
use super::{Backend, Credentials, LoginResponse};
use crate::config::BackendConfig;

/// HTTP client for the hotel backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

/// Turn a non-success response into an error, reading the body verbatim
async fn failure(response: reqwest::Response) -> ClientError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ClientError::Api {
        status,
        message: error_message(status, &body),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> ClientResult<LoginResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(credentials)
            .send()
            .await?;

        // A 401 here means bad credentials, not an expired session
        if !response.status().is_success() {
            return Err(failure(response).await);
        }

        response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn fetch(&self, endpoint: &str, token: Option<&str>) -> ClientResult<serde_json::Value> {
        let mut request = self.client.get(self.url(endpoint));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        match response.status() {
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string())),
            StatusCode::UNAUTHORIZED => {
                tracing::debug!(endpoint = %endpoint, "Backend rejected session token");
                Err(ClientError::Unauthorized)
            }
            _ => Err(failure(response).await),
        }
    }
}

//! HTTP adapter for the test appliance.
//!
//! Thin `ResultSource` implementation over the appliance's REST API.
//! Maps transport failures onto the domain error kinds and never retries;
//! retry/backoff policy belongs to the calling layer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::errors::{AnalyzerError, AnalyzerResult};
use crate::domain::models::{ApplianceConfig, RawResult, RunIdentity};
use crate::domain::ports::ResultSource;

#[derive(Debug, Deserialize)]
struct SessionResponse {
    token: String,
}

/// Client for one appliance instance.
pub struct ApplianceClient {
    base_url: String,
    username: String,
    password: String,
    client: Client,
    token: RwLock<Option<String>>,
}

impl ApplianceClient {
    pub fn new(config: &ApplianceConfig) -> AnalyzerResult<Self> {
        if config.host.trim().is_empty() {
            return Err(AnalyzerError::Validation(
                "appliance host is not configured".into(),
            ));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AnalyzerError::Network {
                endpoint: config.host.clone(),
                message: format!("cannot build http client: {e}"),
            })?;

        Ok(Self {
            base_url: format!("https://{}/api/v1", config.host),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
            token: RwLock::new(None),
        })
    }

    /// Log in and remember the session token.
    pub async fn login(&self) -> AnalyzerResult<()> {
        let url = format!("{}/auth/session", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": self.username,
                "password": self.password,
            }))
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, "login", 30, &e))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(AnalyzerError::Auth("invalid username or password".into()));
        }
        let response = response
            .error_for_status()
            .map_err(|e| Self::transport_error(&url, "login", 30, &e))?;

        let session: SessionResponse = response
            .json()
            .await
            .map_err(|e| Self::transport_error(&url, "login", 30, &e))?;
        *self.token.write().await = Some(session.token);
        info!(endpoint = %self.base_url, "logged in to appliance");
        Ok(())
    }

    /// Log in if no session token is held yet. Concurrent callers may
    /// both log in; the appliance treats sessions as idempotent.
    async fn ensure_session(&self) -> AnalyzerResult<()> {
        if self.token.read().await.is_none() {
            self.login().await?;
        }
        Ok(())
    }

    async fn get_json(
        &self,
        path: &str,
        operation: &str,
        timeout: Duration,
    ) -> AnalyzerResult<serde_json::Value> {
        self.ensure_session().await?;
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.get(&url).timeout(timeout);
        if let Some(token) = self.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }

        debug!(%url, operation, "appliance request");
        let response = request
            .send()
            .await
            .map_err(|e| Self::transport_error(&url, operation, timeout.as_secs(), &e))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(AnalyzerError::Auth(format!(
                    "appliance rejected credentials for {operation}"
                )))
            }
            status if !status.is_success() => Err(AnalyzerError::Network {
                endpoint: url,
                message: format!("{operation} failed with status {status}"),
            }),
            _ => response
                .json()
                .await
                .map_err(|e| Self::transport_error(&url, operation, timeout.as_secs(), &e)),
        }
    }

    fn transport_error(
        url: &str,
        operation: &str,
        timeout_secs: u64,
        err: &reqwest::Error,
    ) -> AnalyzerError {
        if err.is_timeout() {
            AnalyzerError::Timeout {
                operation: operation.to_string(),
                seconds: timeout_secs,
            }
        } else {
            AnalyzerError::Network {
                endpoint: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ResultSource for ApplianceClient {
    fn name(&self) -> &str {
        "appliance"
    }

    async fn fetch_raw_result(
        &self,
        identity: &RunIdentity,
        timeout: Duration,
    ) -> AnalyzerResult<RawResult> {
        let path = format!(
            "/tests/{}/runs/{}/results",
            identity.test_id, identity.run_id
        );
        let value = self.get_json(&path, "fetch raw result", timeout).await?;
        Ok(RawResult::new(value))
    }

    async fn fetch_run_status(&self, identity: &RunIdentity) -> AnalyzerResult<String> {
        let path = format!("/tests/{}/runs/{}/status", identity.test_id, identity.run_id);
        let value = self
            .get_json(&path, "fetch run status", Duration::from_secs(30))
            .await?;
        value
            .get("status")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| AnalyzerError::Validation("status response missing 'status'".into()))
    }
}

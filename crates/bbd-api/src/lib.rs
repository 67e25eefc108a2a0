//! Baby Buddy REST client.
//!
//! Thin typed wrapper over the Baby Buddy v1 API: list endpoints returning
//! the standard page envelope, timer creation/deletion, and entry creation
//! from a stopped timer. Every request carries `Authorization: Token <key>`
//! and the configured timeout.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bbd_core::{
    Child, DiaperChange, Feeding, Height, Note, Pumping, Sleep, Temperature, Timer, TummyTime,
    Weight,
};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// REST client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The client configuration was unusable.
    #[error("invalid client config: {reason}")]
    InvalidConfig { reason: &'static str },
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Transport-level failure (connect, timeout, ...).
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with a non-2xx status.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },
    /// The response body did not decode as expected.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Client configuration, injected at construction.
#[derive(Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// The collection envelope every list endpoint returns.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Optional query filters for list endpoints.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    start_min: Option<String>,
    start_max: Option<String>,
    date_min: Option<String>,
    date_max: Option<String>,
    limit: Option<u32>,
    ordering: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn start_min(mut self, value: impl Into<String>) -> Self {
        self.start_min = Some(value.into());
        self
    }

    #[must_use]
    pub fn start_max(mut self, value: impl Into<String>) -> Self {
        self.start_max = Some(value.into());
        self
    }

    #[must_use]
    pub fn date_min(mut self, value: impl Into<String>) -> Self {
        self.date_min = Some(value.into());
        self
    }

    #[must_use]
    pub fn date_max(mut self, value: impl Into<String>) -> Self {
        self.date_max = Some(value.into());
        self
    }

    #[must_use]
    pub const fn limit(mut self, value: u32) -> Self {
        self.limit = Some(value);
        self
    }

    #[must_use]
    pub fn ordering(mut self, value: impl Into<String>) -> Self {
        self.ordering = Some(value.into());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(v) = &self.start_min {
            params.push(("start_min", v.clone()));
        }
        if let Some(v) = &self.start_max {
            params.push(("start_max", v.clone()));
        }
        if let Some(v) = &self.date_min {
            params.push(("date_min", v.clone()));
        }
        if let Some(v) = &self.date_max {
            params.push(("date_max", v.clone()));
        }
        if let Some(v) = self.limit {
            params.push(("limit", v.to_string()));
        }
        if let Some(v) = &self.ordering {
            params.push(("ordering", v.clone()));
        }
        params
    }
}

/// Fields for a feeding logged from a stopped timer. The server takes
/// start/end from the timer and consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct NewFeeding {
    pub timer: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields for a sleep entry logged from a stopped timer.
#[derive(Debug, Clone, Serialize)]
pub struct NewSleep {
    pub timer: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Fields for a tummy-time entry logged from a stopped timer.
#[derive(Debug, Clone, Serialize)]
pub struct NewTummyTime {
    pub timer: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewTimer<'a> {
    child: i64,
    name: &'a str,
}

/// Baby Buddy API client.
///
/// Safe to clone and share; clones reuse the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or API key is empty, or if the
    /// HTTP client fails to build.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.trim().is_empty() {
            return Err(ApiError::InvalidConfig {
                reason: "base URL cannot be empty",
            });
        }
        if config.api_key.trim().is_empty() {
            return Err(ApiError::InvalidConfig {
                reason: "API key cannot be empty",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/{endpoint}", self.base_url)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_key)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Result<Page<T>, ApiError> {
        let response = self
            .http
            .get(self.url(endpoint))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .query(&query.params())
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .http
            .post(self.url(endpoint))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    pub async fn children(&self) -> Result<Page<Child>, ApiError> {
        self.get_page("children/", &ListQuery::new()).await
    }

    pub async fn feedings(&self, query: &ListQuery) -> Result<Page<Feeding>, ApiError> {
        self.get_page("feedings/", query).await
    }

    pub async fn sleep(&self, query: &ListQuery) -> Result<Page<Sleep>, ApiError> {
        self.get_page("sleep/", query).await
    }

    pub async fn changes(&self, query: &ListQuery) -> Result<Page<DiaperChange>, ApiError> {
        self.get_page("changes/", query).await
    }

    pub async fn tummy_times(&self, query: &ListQuery) -> Result<Page<TummyTime>, ApiError> {
        self.get_page("tummy-times/", query).await
    }

    pub async fn temperature(&self, query: &ListQuery) -> Result<Page<Temperature>, ApiError> {
        self.get_page("temperature/", query).await
    }

    pub async fn weight(&self, query: &ListQuery) -> Result<Page<Weight>, ApiError> {
        self.get_page("weight/", query).await
    }

    pub async fn height(&self, query: &ListQuery) -> Result<Page<Height>, ApiError> {
        self.get_page("height/", query).await
    }

    pub async fn pumping(&self, query: &ListQuery) -> Result<Page<Pumping>, ApiError> {
        self.get_page("pumping/", query).await
    }

    pub async fn notes(&self, query: &ListQuery) -> Result<Page<Note>, ApiError> {
        self.get_page("notes/", query).await
    }

    pub async fn timers(&self) -> Result<Page<Timer>, ApiError> {
        self.get_page("timers/", &ListQuery::new()).await
    }

    /// Starts a server-side timer for the given child.
    pub async fn create_timer(&self, child: i64, name: &str) -> Result<Timer, ApiError> {
        self.post_json("timers/", &NewTimer { child, name }).await
    }

    /// Deletes a server-side timer. The server answers 204 with no body.
    pub async fn delete_timer(&self, id: i64) -> Result<(), ApiError> {
        let response = self
            .http
            .delete(self.url(&format!("timers/{id}/")))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    /// Logs a feeding against a stopped timer; the server consumes the timer.
    pub async fn create_feeding(&self, new: &NewFeeding) -> Result<Feeding, ApiError> {
        self.post_json("feedings/", new).await
    }

    /// Logs a sleep entry against a stopped timer.
    pub async fn create_sleep(&self, new: &NewSleep) -> Result<Sleep, ApiError> {
        self.post_json("sleep/", new).await
    }

    /// Logs a tummy-time entry against a stopped timer.
    pub async fn create_tummy_time(&self, new: &NewTummyTime) -> Result<TummyTime, ApiError> {
        self.post_json("tummy-times/", new).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_rejects_empty_base_url() {
        let config = ApiConfig::new("", "key");
        assert!(matches!(
            ApiClient::new(config),
            Err(ApiError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn client_rejects_empty_api_key() {
        let config = ApiConfig::new("https://baby.example.com", "   ");
        assert!(matches!(
            ApiClient::new(config),
            Err(ApiError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn client_strips_trailing_slash_from_base_url() {
        let client = ApiClient::new(ApiConfig::new("https://baby.example.com/", "key")).unwrap();
        assert_eq!(
            client.url("feedings/"),
            "https://baby.example.com/api/feedings/"
        );
    }

    #[test]
    fn debug_redacts_api_key() {
        let client = ApiClient::new(ApiConfig::new("https://baby.example.com", "secret")).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("[REDACTED]"));

        let config = ApiConfig::new("https://baby.example.com", "secret");
        let debug = format!("{config:?}");
        assert!(!debug.contains("secret"));
    }

    #[test]
    fn list_query_emits_only_set_params() {
        let query = ListQuery::new()
            .start_min("2024-01-01T00:00:00")
            .limit(100)
            .ordering("-start");
        let params = query.params();
        assert_eq!(
            params,
            vec![
                ("start_min", "2024-01-01T00:00:00".to_string()),
                ("limit", "100".to_string()),
                ("ordering", "-start".to_string()),
            ]
        );
        assert!(ListQuery::new().params().is_empty());
    }

    #[test]
    fn new_feeding_serializes_type_field() {
        let new = NewFeeding {
            timer: 12,
            kind: "breast milk".to_string(),
            method: "bottle".to_string(),
            amount: Some(120.0),
            notes: None,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["type"], "breast milk");
        assert_eq!(json["timer"], 12);
        assert!(json.get("notes").is_none());
    }
}

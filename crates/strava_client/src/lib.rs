//! Minimal `StravaClient` trait and shared types for the Strava v3 API.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod config;
pub mod http_client;
pub mod pagination;

#[derive(Debug, Error)]
pub enum StravaError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("api error (status {status}): {body}")]
    Api { status: u16, body: String },
}

impl StravaError {
    pub fn from_status(status: u16, body: String) -> Self {
        StravaError::Api { status, body }
    }
}

/// Opaque activity record as returned by the listing API. Only the keys
/// named by an export column spec are retained downstream.
pub type RemoteActivity = serde_json::Map<String, serde_json::Value>;

/// A concrete, dated activity-creation payload: the template entry's
/// fields plus a resolved `start_date_local`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActivityRequest {
    #[serde(rename = "type")]
    pub activity_type: String,
    /// ISO-8601 local timestamp with UTC offset, e.g. `2016-10-03T07:00:00+02:00`.
    pub start_date_local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Payload of a successful OAuth code-for-token exchange.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TokenResponse {
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub access_token: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_string")]
    pub refresh_token: Option<String>,
    pub athlete: Option<serde_json::Value>,
}

fn deserialize_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string().into()),
        Some(other) => Err(D::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

#[async_trait]
pub trait StravaClient: Send + Sync + 'static {
    /// Create one activity. The caller owns simulate-mode short-circuiting;
    /// reaching this method always hits the network.
    async fn create_activity(
        &self,
        request: &ActivityRequest,
    ) -> Result<RemoteActivity, StravaError>;

    /// Fetch one page of activities in `[after, before)` (Unix seconds,
    /// `after` inclusive, `before` exclusive).
    async fn list_activities(
        &self,
        after: i64,
        before: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteActivity>, StravaError>;

    /// Exchange an authorization code for a long-lived access token.
    async fn exchange_token(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<TokenResponse, StravaError>;
}

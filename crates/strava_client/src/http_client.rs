//! HTTP client implementation for the Strava v3 API.
//!
//! This module provides a reqwest-based implementation of the
//! [`StravaClient`](crate::StravaClient) trait.

use crate::{ActivityRequest, RemoteActivity, StravaClient, StravaError, TokenResponse};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Client for the Strava API using reqwest.
#[derive(Clone, Debug)]
pub struct ReqwestStravaClient {
    base_url: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl ReqwestStravaClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the Strava API (e.g., "https://www.strava.com")
    /// * `access_token` - The OAuth access token for authentication
    pub fn new(base_url: &str, access_token: SecretString) -> Self {
        let client = reqwest::Client::builder()
            .build()
            .expect("reqwest client build should not fail");
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            client,
        }
    }

    /// Build an authenticated GET request.
    fn get_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Build an authenticated POST request.
    fn post_request(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .bearer_auth(self.access_token.expose_secret())
    }

    /// Execute a request and expect a JSON response.
    async fn execute_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StravaError> {
        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.error_from_response(resp).await);
        }
        Ok(resp.json::<T>().await?)
    }

    /// Extract error information from a failed response.
    async fn error_from_response(&self, resp: reqwest::Response) -> StravaError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body_snippet: String = body.chars().take(256).collect();

        match status {
            404 => StravaError::NotFound(body_snippet),
            401 | 403 => StravaError::Auth(body_snippet),
            422 => StravaError::InvalidInput(body_snippet),
            _ => StravaError::from_status(status, body_snippet),
        }
    }
}

/// Render the browser URL for the manual OAuth authorization step.
pub fn authorize_url(base_url: &str, client_id: &str, redirect_uri: &str, scope: &str) -> String {
    format!(
        "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
        base_url.trim_end_matches('/'),
        client_id,
        redirect_uri,
        scope
    )
}

#[async_trait]
impl StravaClient for ReqwestStravaClient {
    async fn create_activity(
        &self,
        request: &ActivityRequest,
    ) -> Result<RemoteActivity, StravaError> {
        let url = format!("{}/api/v3/activities", self.base_url);
        self.execute_json(self.post_request(&url).json(request))
            .await
    }

    async fn list_activities(
        &self,
        after: i64,
        before: i64,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteActivity>, StravaError> {
        let url = format!("{}/api/v3/athlete/activities", self.base_url);
        let pairs: Vec<(&str, String)> = vec![
            ("after", after.to_string()),
            ("before", before.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        let qp: Vec<(&str, &str)> = pairs.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.execute_json(self.get_request(&url).query(&qp)).await
    }

    async fn exchange_token(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
    ) -> Result<TokenResponse, StravaError> {
        let url = format!("{}/oauth/token", self.base_url);
        let body = serde_json::json!({
            "client_id": client_id,
            "client_secret": client_secret,
            "code": code,
            "grant_type": "authorization_code",
        });
        // Token exchange is unauthenticated; the code is the credential.
        self.execute_json::<TokenResponse>(self.client.post(&url).json(&body))
            .await
    }
}

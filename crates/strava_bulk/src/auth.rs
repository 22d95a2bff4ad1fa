//! One-time OAuth setup flow (`--generate`).
//!
//! Prompts for the application credentials, prints the authorize URL for
//! the manual browser step, then exchanges the pasted code for a
//! long-lived access token and persists the whole credential set.

use crate::error::{CliError, CliResult};
use secrecy::SecretString;
use std::io::{BufRead, Write};
use std::path::Path;
use strava_client::config::Credentials;
use strava_client::{StravaClient, http_client};

pub const OAUTH_SCOPE: &str = "activity:write,activity:read_all";
const PLACEHOLDER_TOKEN: &str = "to define";
const REDIRECT_URI: &str = "http://localhost";

fn prompt(input: &mut impl BufRead, output: &mut impl Write, message: &str) -> CliResult<String> {
    write!(output, "{message} ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Drive the full setup conversation over the given reader/writer pair
/// (stdin/stdout in production, buffers in tests).
pub async fn run(
    client: &dyn StravaClient,
    base_url: &str,
    credentials_path: &Path,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> CliResult<()> {
    writeln!(
        output,
        "Before processing, fill your Strava application with the client id and secret from\n\
         https://www.strava.com/settings/api"
    )?;

    let client_id = prompt(input, output, "What is your Strava client id?")?;
    let client_secret = prompt(input, output, "What is your Strava client secret?")?;

    // Persist immediately so a failed exchange can be retried without
    // retyping the application credentials.
    let credentials = Credentials::new(
        client_id.clone(),
        SecretString::new(client_secret.clone().into()),
        SecretString::new(PLACEHOLDER_TOKEN.into()),
        REDIRECT_URI,
    );
    credentials.save(credentials_path)?;

    let url = http_client::authorize_url(base_url, &client_id, REDIRECT_URI, OAUTH_SCOPE);
    writeln!(output, "Connect to the following url and copy the code: {url}")?;

    let code = prompt(input, output, "Enter the code obtained from the Strava url:")?;
    let token = client
        .exchange_token(&client_id, &client_secret, &code)
        .await?;
    let access_token = token
        .access_token
        .ok_or_else(|| CliError::Auth(format!("no access token for the provided code: {code}")))?;

    Credentials::new(
        client_id,
        SecretString::new(client_secret.into()),
        SecretString::new(access_token.into()),
        REDIRECT_URI,
    )
    .save(credentials_path)?;

    writeln!(output, "Access token stored in {}", credentials_path.display())?;
    tracing::info!(path = %credentials_path.display(), "credentials saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use secrecy::ExposeSecret;
    use strava_client::{ActivityRequest, RemoteActivity, StravaError, TokenResponse};

    struct FakeExchange {
        token: Option<String>,
    }

    #[async_trait]
    impl StravaClient for FakeExchange {
        async fn create_activity(
            &self,
            _request: &ActivityRequest,
        ) -> Result<RemoteActivity, StravaError> {
            unimplemented!("not used by auth tests")
        }

        async fn list_activities(
            &self,
            _after: i64,
            _before: i64,
            _page: u32,
            _per_page: u32,
        ) -> Result<Vec<RemoteActivity>, StravaError> {
            unimplemented!("not used by auth tests")
        }

        async fn exchange_token(
            &self,
            client_id: &str,
            client_secret: &str,
            code: &str,
        ) -> Result<TokenResponse, StravaError> {
            assert_eq!(client_id, "123");
            assert_eq!(client_secret, "sekrit");
            assert_eq!(code, "the-code");
            Ok(TokenResponse {
                access_token: self.token.clone(),
                refresh_token: None,
                athlete: None,
            })
        }
    }

    #[tokio::test]
    async fn setup_flow_saves_exchanged_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strava_config");
        let mut input = std::io::Cursor::new("123\nsekrit\nthe-code\n");
        let mut output = Vec::new();

        let client = FakeExchange {
            token: Some("long-lived".into()),
        };
        run(
            &client,
            "https://www.strava.com",
            &path,
            &mut input,
            &mut output,
        )
        .await
        .expect("setup");

        let saved = Credentials::load(&path).expect("saved credentials");
        assert_eq!(saved.client_id, "123");
        assert_eq!(saved.access_token.expose_secret(), "long-lived");

        let transcript = String::from_utf8(output).unwrap();
        assert!(transcript.contains("oauth/authorize?client_id=123"));
        assert!(transcript.contains(&format!("scope={OAUTH_SCOPE}")));
    }

    #[tokio::test]
    async fn missing_access_token_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strava_config");
        let mut input = std::io::Cursor::new("123\nsekrit\nthe-code\n");
        let mut output = Vec::new();

        let client = FakeExchange { token: None };
        let res = run(
            &client,
            "https://www.strava.com",
            &path,
            &mut input,
            &mut output,
        )
        .await;
        assert!(matches!(res, Err(CliError::Auth(_))));

        // The application credentials were still persisted for a retry.
        let saved = Credentials::load(&path).expect("partial credentials");
        assert_eq!(saved.access_token.expose_secret(), "to define");
    }
}

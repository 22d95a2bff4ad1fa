use crate::StravaError;
use secrecy::{ExposeSecret, SecretString};
use std::path::Path;

/// OAuth application credentials, persisted as JSON (by default at
/// `data/strava_config`).
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: SecretString,
    pub access_token: SecretString,
    pub redirect_uri: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        access_token: SecretString,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            access_token,
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Testable helper that parses credentials from a JSON string. Keeps
    /// `load` small and lets tests avoid touching the filesystem.
    pub fn from_json_str(json: &str) -> Result<Self, StravaError> {
        serde_json::from_str(json)
            .map_err(|e| StravaError::Config(format!("invalid credentials file: {e}")))
    }

    pub fn load(path: &Path) -> Result<Self, StravaError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            StravaError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_json_str(&content)
    }

    /// Persist the credentials. `SecretString` deliberately does not
    /// serialize, so the JSON is assembled explicitly.
    pub fn save(&self, path: &Path) -> Result<(), StravaError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                StravaError::Config(format!("cannot create {}: {e}", dir.display()))
            })?;
        }
        let json = serde_json::json!({
            "client_id": self.client_id,
            "client_secret": self.client_secret.expose_secret(),
            "access_token": self.access_token.expose_secret(),
            "redirect_uri": self.redirect_uri,
        });
        std::fs::write(path, serde_json::to_string_pretty(&json).unwrap_or_default())
            .map_err(|e| StravaError::Config(format!("cannot write {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn from_json_str_reads_values() {
        let creds = Credentials::from_json_str(
            r#"{"client_id":"123","client_secret":"sekrit","access_token":"tok","redirect_uri":"http://localhost"}"#,
        )
        .expect("creds");
        assert_eq!(creds.client_id, "123");
        assert_eq!(creds.access_token.expose_secret(), "tok");
        assert_eq!(creds.redirect_uri, "http://localhost");
    }

    #[test]
    fn from_json_str_rejects_garbage() {
        let res = Credentials::from_json_str("not json");
        assert!(matches!(res, Err(StravaError::Config(_))));
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("strava_config");
        let creds = Credentials::new(
            "123",
            SecretString::new("sekrit".into()),
            SecretString::new("tok".into()),
            "http://localhost",
        );
        creds.save(&path).expect("save");
        let loaded = Credentials::load(&path).expect("load");
        assert_eq!(loaded.client_id, "123");
        assert_eq!(loaded.client_secret.expose_secret(), "sekrit");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let res = Credentials::load(Path::new("/nonexistent/strava_config"));
        assert!(matches!(res, Err(StravaError::Config(_))));
    }
}

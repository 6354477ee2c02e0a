use crate::config::CredentialSource;
use crate::error::TransferError;
use aws_sdk_s3::config::Credentials;
use serde::Deserialize;

/// Structured credential secret, e.g.
/// `{"access_key_id": "...", "secret_access_key": "...", "region": "eu-west-1"}`
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct ExplicitCredentials {
    #[serde(alias = "aws_access_key_id")]
    pub access_key_id: String,
    #[serde(alias = "aws_secret_access_key")]
    pub secret_access_key: String,
    #[serde(default, alias = "aws_session_token")]
    pub session_token: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl std::fmt::Debug for ExplicitCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplicitCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

impl ExplicitCredentials {
    pub fn parse(secret: &str) -> Result<Self, TransferError> {
        let creds: ExplicitCredentials = serde_json::from_str(secret).map_err(|e| {
            TransferError::Authorization(format!("Invalid credential secret: {}", e))
        })?;

        if creds.access_key_id.trim().is_empty() || creds.secret_access_key.trim().is_empty() {
            return Err(TransferError::Authorization(
                "Credential secret has an empty access key".to_string(),
            ));
        }

        Ok(creds)
    }

    /// Resolves an explicit source. Returns `None` for the ambient strategy.
    pub async fn resolve(source: &CredentialSource) -> Result<Option<Self>, TransferError> {
        match source {
            CredentialSource::Ambient => Ok(None),
            CredentialSource::Inline(secret) => Self::parse(secret).map(Some),
            CredentialSource::File(path) => {
                let secret = tokio::fs::read_to_string(path).await.map_err(|e| {
                    TransferError::Authorization(format!(
                        "Cannot read credential file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::parse(&secret).map(Some)
            }
        }
    }

    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            self.session_token.clone(),
            None,
            "explicit",
        )
    }
}

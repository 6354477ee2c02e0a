use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Maximum accepted upload: 200 MiB
pub const MAX_UPLOAD_SIZE: u64 = 200 * 1024 * 1024;

/// Where the authorization material for the object store comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// SDK default provider chain (environment, profile, instance metadata)
    Ambient,
    /// JSON credential secret supplied as text
    Inline(String),
    /// JSON credential secret read from a file at resolution time
    File(PathBuf),
}

/// Upload configuration, built once at startup and passed to the transfer service
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum payload size in bytes (fixed: 200 MiB)
    pub bucket_size_limit_bytes: u64,

    /// Content type attached to every stored object (fixed: "text/csv")
    pub content_type: String,

    /// Write a local copy before transferring (default: false)
    pub local_staging_enabled: bool,

    /// Root directory for local copies (default: "data")
    pub staging_root: PathBuf,

    /// Credential strategy (default: ambient)
    pub credentials: CredentialSource,

    /// Custom S3-compatible endpoint, e.g. MinIO
    pub endpoint_url: Option<String>,

    /// Region override
    pub region: Option<String>,

    /// Use path-style addressing (default: true when an endpoint is set)
    pub force_path_style: bool,

    /// Bucket prefilled in the upload form
    pub default_bucket: Option<String>,

    /// HTTP listen address (default: 127.0.0.1:3000)
    pub bind_addr: SocketAddr,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            bucket_size_limit_bytes: MAX_UPLOAD_SIZE,
            content_type: mime::TEXT_CSV.to_string(),
            local_staging_enabled: false,
            staging_root: PathBuf::from("data"),
            credentials: CredentialSource::Ambient,
            endpoint_url: None,
            region: None,
            force_path_style: false,
            default_bucket: None,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    /// The size ceiling and content type are never taken from the lookup.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let flag = |key: &str| {
            lookup(key).map(|v| {
                let v = v.trim().to_lowercase();
                v == "true" || v == "1"
            })
        };
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = if let Some(secret) = non_empty("STORAGE_CREDENTIALS_JSON") {
            CredentialSource::Inline(secret)
        } else if let Some(path) = non_empty("STORAGE_CREDENTIALS_FILE") {
            CredentialSource::File(PathBuf::from(path))
        } else {
            default.credentials
        };

        let endpoint_url = non_empty("S3_ENDPOINT");
        let force_path_style = flag("S3_FORCE_PATH_STYLE").unwrap_or(endpoint_url.is_some());

        Self {
            bucket_size_limit_bytes: default.bucket_size_limit_bytes,
            content_type: default.content_type,

            local_staging_enabled: flag("LOCAL_STAGING_ENABLED")
                .unwrap_or(default.local_staging_enabled),

            staging_root: non_empty("STAGING_ROOT")
                .map(PathBuf::from)
                .unwrap_or(default.staging_root),

            credentials,
            endpoint_url,
            region: non_empty("S3_REGION"),
            force_path_style,
            default_bucket: non_empty("DEFAULT_BUCKET"),

            bind_addr: lookup("BIND_ADDR")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.bind_addr),
        }
    }

    /// Create config for development (local MinIO, staging into ./data)
    pub fn development() -> Self {
        Self {
            local_staging_enabled: true,
            endpoint_url: Some("http://127.0.0.1:9000".to_string()),
            region: Some("us-east-1".to_string()),
            force_path_style: true,
            credentials: CredentialSource::Inline(
                r#"{"access_key_id":"minioadmin","secret_access_key":"minioadmin"}"#.to_string(),
            ),
            ..Self::default()
        }
    }

    pub fn limit_mb(&self) -> u64 {
        self.bucket_size_limit_bytes / 1024 / 1024
    }
}

use crate::config::{CredentialSource, UploadConfig};
use crate::services::storage::{S3Connector, StorageConnector};
use std::sync::Arc;
use tracing::info;

pub fn setup_storage(config: &UploadConfig) -> Arc<dyn StorageConnector> {
    let credentials = match &config.credentials {
        CredentialSource::Ambient => "ambient".to_string(),
        CredentialSource::Inline(_) => "explicit (inline secret)".to_string(),
        CredentialSource::File(path) => format!("explicit ({})", path.display()),
    };

    info!(
        "☁️  S3 Storage: {} (Credentials: {})",
        config.endpoint_url.as_deref().unwrap_or("AWS default endpoint"),
        credentials
    );

    if config.local_staging_enabled {
        info!("💾 Local staging enabled: {}", config.staging_root.display());
    }

    Arc::new(S3Connector::new(config))
}

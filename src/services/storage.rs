use crate::config::{CredentialSource, UploadConfig};
use crate::error::TransferError;
use crate::services::credentials::ExplicitCredentials;
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use std::sync::Arc;
use thiserror::Error;

/// S3 error codes that mean the caller is not allowed in
const AUTHORIZATION_ERROR_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
    "ExpiredToken",
    "InvalidAccessKeyId",
    "InvalidToken",
    "SignatureDoesNotMatch",
];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("{0}")]
    Authorization(String),
    #[error("{0}")]
    Transmission(String),
}

impl From<StorageError> for TransferError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Authorization(msg) => TransferError::Authorization(msg),
            StorageError::Transmission(msg) => TransferError::Transmission(msg),
        }
    }
}

/// Remote sink: one put-object operation
#[async_trait]
pub trait StorageService: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Resolves authorization material and hands out an authorized sink
#[async_trait]
pub trait StorageConnector: Send + Sync {
    async fn connect(&self) -> Result<Arc<dyn StorageService>, TransferError>;
}

pub struct S3StorageService {
    client: Client,
}

impl S3StorageService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let res = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await;

        if let Err(e) = res {
            tracing::error!(
                "S3 put_object failed: bucket={}, key={}, error={:?}",
                bucket,
                key,
                e
            );
            return Err(classify_put_error(e));
        }
        Ok(())
    }
}

fn classify_put_error(err: SdkError<PutObjectError>) -> StorageError {
    let code = err
        .as_service_error()
        .and_then(|e| e.code())
        .map(str::to_owned);
    let message = DisplayErrorContext(&err).to_string();

    if is_authorization_failure(code.as_deref(), &message) {
        StorageError::Authorization(message)
    } else {
        StorageError::Transmission(message)
    }
}

/// Service error codes are authoritative; without one, a client-side
/// credential loading failure is recognized by its message.
pub fn is_authorization_failure(code: Option<&str>, message: &str) -> bool {
    match code {
        Some(code) => AUTHORIZATION_ERROR_CODES.contains(&code),
        None => {
            let message = message.to_lowercase();
            message.contains("credentials") || message.contains("credential provider")
        }
    }
}

/// Builds an S3 client per transfer from the configured credential strategy
pub struct S3Connector {
    credentials: CredentialSource,
    endpoint_url: Option<String>,
    region: Option<String>,
    force_path_style: bool,
}

impl S3Connector {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            credentials: config.credentials.clone(),
            endpoint_url: config.endpoint_url.clone(),
            region: config.region.clone(),
            force_path_style: config.force_path_style,
        }
    }
}

#[async_trait]
impl StorageConnector for S3Connector {
    async fn connect(&self) -> Result<Arc<dyn StorageService>, TransferError> {
        let explicit = ExplicitCredentials::resolve(&self.credentials).await?;

        let endpoint_url = explicit
            .as_ref()
            .and_then(|c| c.endpoint_url.clone())
            .or_else(|| self.endpoint_url.clone());
        let region = explicit
            .as_ref()
            .and_then(|c| c.region.clone())
            .or_else(|| self.region.clone());

        let mut loader = aws_config::from_env();
        if let Some(endpoint_url) = &endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        } else if endpoint_url.is_some() {
            loader = loader.region(Region::new("us-east-1"));
        }
        if let Some(creds) = &explicit {
            loader = loader.credentials_provider(creds.to_credentials());
        }

        let aws_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
            .force_path_style(self.force_path_style)
            .build();

        tracing::debug!(
            "S3 client ready (credentials: {}, endpoint: {})",
            if explicit.is_some() { "explicit" } else { "ambient" },
            endpoint_url.as_deref().unwrap_or("default")
        );

        Ok(Arc::new(S3StorageService::new(Client::from_conf(s3_config))))
    }
}

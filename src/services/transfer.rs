use crate::config::UploadConfig;
use crate::error::{TransferError, TransferOutcome};
use crate::models::{Payload, TransferPhase, TransferReceipt, UploadRequest};
use crate::services::staging::LocalStager;
use crate::services::storage::StorageConnector;
use crate::utils::validation::{validate_destination, validate_file_size};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncSeek};
use tracing::{error, info};

/// Whether a local copy is written before the remote transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    TransferOnly,
    StageThenTransfer,
}

/// Validates, optionally stages, and sends one payload to the object store
pub struct TransferService {
    connector: Arc<dyn StorageConnector>,
    stager: Option<LocalStager>,
    config: UploadConfig,
}

impl TransferService {
    pub fn new(connector: Arc<dyn StorageConnector>, config: UploadConfig) -> Self {
        let stager = config
            .local_staging_enabled
            .then(|| LocalStager::new(config.staging_root.clone()));
        Self {
            connector,
            stager,
            config,
        }
    }

    pub fn mode(&self) -> TransferMode {
        if self.stager.is_some() {
            TransferMode::StageThenTransfer
        } else {
            TransferMode::TransferOnly
        }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Intake checks. All-or-nothing and free of side effects.
    pub fn validate<R>(&self, request: &UploadRequest<R>) -> Result<(), TransferError> {
        validate_file_size(request.payload.size, self.config.bucket_size_limit_bytes)?;
        validate_destination(&request.destination)?;
        Ok(())
    }

    /// Runs a full request: Validating → (Rejected | Staging? → Transferring) → (Succeeded | Failed)
    pub async fn upload<R>(&self, request: UploadRequest<R>) -> TransferOutcome
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        let object_name = request.payload.name.clone();

        log_phase(TransferPhase::Validating, &request.destination, &object_name);
        if let Err(e) = self.validate(&request) {
            log_phase(TransferPhase::Rejected, &request.destination, &object_name);
            return Err(e);
        }

        let UploadRequest {
            destination,
            mut payload,
        } = request;

        let local_copy = match &self.stager {
            Some(stager) => {
                log_phase(TransferPhase::Staging, &destination, &object_name);
                match stager.stage(&object_name, &mut payload).await {
                    Ok(path) => Some(path),
                    Err(e) => {
                        error!("❌ Staging failed for {}: {}", object_name, e);
                        log_phase(TransferPhase::Failed, &destination, &object_name);
                        return Err(e);
                    }
                }
            }
            None => None,
        };

        self.finish(&destination, &object_name, &mut payload, local_copy)
            .await
    }

    /// Transfer step on its own. Rewinds the payload first, so it can be repeated
    /// on the same payload. The size ceiling still applies.
    pub async fn transfer<R>(
        &self,
        bucket: &str,
        object_name: &str,
        payload: &mut Payload<R>,
    ) -> TransferOutcome
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        validate_file_size(payload.size, self.config.bucket_size_limit_bytes)?;
        self.finish(bucket, object_name, payload, None).await
    }

    async fn finish<R>(
        &self,
        bucket: &str,
        object_name: &str,
        payload: &mut Payload<R>,
        local_copy: Option<PathBuf>,
    ) -> TransferOutcome
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        log_phase(TransferPhase::Transferring, bucket, object_name);
        match self.send(bucket, object_name, payload).await {
            Ok(size) => {
                info!(
                    "✅ File {} uploaded successfully to bucket: {} ({} bytes)",
                    object_name, bucket, size
                );
                log_phase(TransferPhase::Succeeded, bucket, object_name);
                Ok(TransferReceipt {
                    bucket: bucket.to_string(),
                    object_name: object_name.to_string(),
                    size,
                    local_copy,
                })
            }
            Err(e) => {
                error!("❌ Upload of {} to {} failed: {}", object_name, bucket, e);
                log_phase(TransferPhase::Failed, bucket, object_name);
                Err(e)
            }
        }
    }

    async fn send<R>(
        &self,
        bucket: &str,
        object_name: &str,
        payload: &mut Payload<R>,
    ) -> Result<u64, TransferError>
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        payload
            .rewind()
            .await
            .map_err(|e| TransferError::Transmission(format!("Cannot rewind payload: {}", e)))?;

        let storage = self.connector.connect().await?;

        let data = payload
            .read_all()
            .await
            .map_err(|e| TransferError::Transmission(format!("Cannot read payload: {}", e)))?;
        let size = data.len() as u64;

        storage
            .put_object(bucket, object_name, data, &self.config.content_type)
            .await?;
        Ok(size)
    }
}

fn log_phase(phase: TransferPhase, bucket: &str, object_name: &str) {
    tracing::debug!(
        phase = %phase,
        terminal = phase.is_terminal(),
        bucket = %bucket,
        object = %object_name,
        "transfer phase"
    );
}

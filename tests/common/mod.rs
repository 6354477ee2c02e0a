#![allow(dead_code)]

use async_trait::async_trait;
use csv_bucket_upload::config::UploadConfig;
use csv_bucket_upload::error::TransferError;
use csv_bucket_upload::services::storage::{StorageConnector, StorageError, StorageService};
use csv_bucket_upload::services::transfer::TransferService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub data: Vec<u8>,
    pub content_type: String,
}

pub struct MockStorageService {
    objects: Mutex<Vec<StoredObject>>,
    calls: AtomicUsize,
    failure: Option<StorageError>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            failure: None,
        }
    }

    pub fn failing(failure: StorageError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        self.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            data,
            content_type: content_type.to_string(),
        });
        Ok(())
    }
}

pub struct MockConnector {
    storage: Arc<MockStorageService>,
    auth_failure: Option<String>,
    connects: AtomicUsize,
}

impl MockConnector {
    pub fn new(storage: Arc<MockStorageService>) -> Self {
        Self {
            storage,
            auth_failure: None,
            connects: AtomicUsize::new(0),
        }
    }

    pub fn unauthorized(storage: Arc<MockStorageService>, message: &str) -> Self {
        Self {
            auth_failure: Some(message.to_string()),
            ..Self::new(storage)
        }
    }

    pub fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageConnector for MockConnector {
    async fn connect(&self) -> Result<Arc<dyn StorageService>, TransferError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.auth_failure {
            return Err(TransferError::Authorization(message.clone()));
        }
        Ok(self.storage.clone())
    }
}

pub struct Harness {
    pub storage: Arc<MockStorageService>,
    pub connector: Arc<MockConnector>,
    pub service: Arc<TransferService>,
}

pub fn harness(config: UploadConfig) -> Harness {
    harness_with(Arc::new(MockStorageService::new()), config)
}

pub fn harness_with(storage: Arc<MockStorageService>, config: UploadConfig) -> Harness {
    let connector = Arc::new(MockConnector::new(storage.clone()));
    let service = Arc::new(TransferService::new(connector.clone(), config));
    Harness {
        storage,
        connector,
        service,
    }
}

pub fn staging_config(root: &std::path::Path) -> UploadConfig {
    UploadConfig {
        local_staging_enabled: true,
        staging_root: root.to_path_buf(),
        ..UploadConfig::default()
    }
}

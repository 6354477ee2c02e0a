use bytes::Bytes;
use serde::Serialize;
use std::fmt;
use std::io::{Cursor, SeekFrom};
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use utoipa::ToSchema;

/// An uploaded file: declared name, size and content type plus a seekable byte source
pub struct Payload<R> {
    pub name: String,
    pub content_type: Option<String>,
    pub size: u64,
    reader: R,
}

impl<R> Payload<R>
where
    R: AsyncRead + AsyncSeek + Unpin + Send,
{
    pub fn new(name: impl Into<String>, content_type: Option<String>, size: u64, reader: R) -> Self {
        Self {
            name: name.into(),
            content_type,
            size,
            reader,
        }
    }

    /// Moves the read cursor back to the first byte. Safe to call on a fresh cursor.
    pub async fn rewind(&mut self) -> std::io::Result<()> {
        self.reader.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// Reads the whole payload from its start and leaves the cursor rewound
    pub async fn read_all(&mut self) -> std::io::Result<Vec<u8>> {
        self.rewind().await?;
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data).await?;
        self.rewind().await?;
        Ok(data)
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    pub fn details(&self) -> FileDetails {
        FileDetails {
            filename: self.name.clone(),
            content_type: self.content_type.clone(),
            size_bytes: self.size,
            size_mb: format!("{:.2}", self.size as f64 / (1024.0 * 1024.0)),
        }
    }
}

impl Payload<Cursor<Bytes>> {
    /// In-memory payload; the declared size is the byte length
    pub fn from_bytes(name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        let size = data.len() as u64;
        Self::new(name, content_type, size, Cursor::new(data))
    }
}

impl<R> fmt::Debug for Payload<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Payload")
            .field("name", &self.name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// One user-triggered upload: the destination bucket and the file to send
#[derive(Debug)]
pub struct UploadRequest<R> {
    pub destination: String,
    pub payload: Payload<R>,
}

impl<R> UploadRequest<R> {
    /// Surrounding whitespace is dropped from the bucket name
    pub fn new(destination: impl Into<String>, payload: Payload<R>) -> Self {
        let destination: String = destination.into();
        Self {
            destination: destination.trim().to_string(),
            payload,
        }
    }
}

/// Successful transfer report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub bucket: String,
    pub object_name: String,
    pub size: u64,
    pub local_copy: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FileDetails {
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: u64,
    /// Size in MiB, two decimals
    pub size_mb: String,
}

/// Lifecycle of a single upload request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Validating,
    Rejected,
    Staging,
    Transferring,
    Succeeded,
    Failed,
}

impl TransferPhase {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TransferPhase::Rejected | TransferPhase::Succeeded | TransferPhase::Failed
        )
    }
}

impl fmt::Display for TransferPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransferPhase::Validating => "validating",
            TransferPhase::Rejected => "rejected",
            TransferPhase::Staging => "staging",
            TransferPhase::Transferring => "transferring",
            TransferPhase::Succeeded => "succeeded",
            TransferPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}

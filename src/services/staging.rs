use crate::error::TransferError;
use crate::models::Payload;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncRead, AsyncSeek, AsyncWriteExt};

/// Writes a local copy of each payload under a fixed root before it is transferred
#[derive(Debug, Clone)]
pub struct LocalStager {
    root: PathBuf,
}

impl LocalStager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Local copy location for an object name. Names that would leave the root are refused.
    pub fn path_for(&self, object_name: &str) -> Result<PathBuf, TransferError> {
        let relative = Path::new(object_name);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

        if object_name.is_empty() || escapes {
            return Err(TransferError::Staging(format!(
                "Refusing to stage '{}' outside of {}",
                object_name,
                self.root.display()
            )));
        }
        Ok(self.root.join(relative))
    }

    /// Copies the whole payload to `root/object_name`, creating missing directories.
    /// The payload cursor is rewound afterwards so the transfer sees every byte.
    pub async fn stage<R>(
        &self,
        object_name: &str,
        payload: &mut Payload<R>,
    ) -> Result<PathBuf, TransferError>
    where
        R: AsyncRead + AsyncSeek + Unpin + Send,
    {
        let path = self.path_for(object_name)?;
        let staging_err =
            |e: std::io::Error| TransferError::Staging(format!("{}: {}", path.display(), e));

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(staging_err)?;
        }

        payload.rewind().await.map_err(staging_err)?;
        let mut file = tokio::fs::File::create(&path).await.map_err(staging_err)?;
        let copied = async {
            let written = tokio::io::copy(payload.reader_mut(), &mut file).await?;
            file.flush().await?;
            Ok::<_, std::io::Error>(written)
        }
        .await;
        drop(file);

        let written = match copied {
            Ok(written) => written,
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        "Could not remove partial copy {}: {}",
                        path.display(),
                        remove_err
                    );
                }
                return Err(staging_err(e));
            }
        };
        payload.rewind().await.map_err(staging_err)?;

        tracing::info!("💾 Saved local copy: {} ({} bytes)", path.display(), written);
        Ok(path)
    }
}

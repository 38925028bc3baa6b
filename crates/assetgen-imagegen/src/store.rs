use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::{fs, io::AsyncWriteExt};

use crate::{error::StorageError, types::StoredArtifact};

/// Writes artifacts into a local directory served under a public prefix
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_path: PathBuf,
    public_prefix: String,
}

impl ArtifactStore {
    /// Create a store rooted at `base_path`
    ///
    /// A relative path is resolved against the current directory once, here.
    /// The directory itself is created lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined
    pub fn new(base_path: &Path, public_prefix: &str) -> std::io::Result<Self> {
        Ok(Self {
            base_path: std::path::absolute(base_path)?,
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a stored name to the path it is served under
    pub fn resolve_public_path(&self, name: &str) -> String {
        format!("{}/{name}", self.public_prefix)
    }

    /// Write `bytes` under `name`
    ///
    /// The payload lands in a hidden temporary sibling first and is renamed
    /// into place, so the final name never refers to a partial file. The
    /// temporary file is removed on failure.
    pub async fn persist(&self, name: &str, bytes: Bytes) -> Result<StoredArtifact, StorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: self.base_path.clone(),
                source,
            })?;

        let storage_path = self.base_path.join(name);
        let staging_path = self.base_path.join(format!(".{name}.partial"));

        if let Err(source) = write_synced(&staging_path, &bytes).await {
            discard(&staging_path).await;
            return Err(StorageError::Write {
                path: storage_path,
                source,
            });
        }

        if let Err(source) = fs::rename(&staging_path, &storage_path).await {
            discard(&staging_path).await;
            return Err(StorageError::Commit {
                path: storage_path,
                source,
            });
        }

        tracing::debug!(path = %storage_path.display(), bytes = bytes.len(), "artifact written");

        Ok(StoredArtifact {
            public_path: self.resolve_public_path(name),
            filename: name.to_string(),
            storage_path,
        })
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove partial artifact");
    }
}

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mime::Mime;
use tokio::fs;

use super::{File, Storage, StorageError};

/// Stores files in a local directory.
///
/// Files are named `file-<unix millis>-<sequence>.<ext>`, where the extension
/// comes from the MIME subtype. The directory is created on first use.
pub struct LocalStorage {
    dir: PathBuf,
    seq: AtomicU64,
}

impl LocalStorage {
    /// Creates a storage that writes into `dir`.
    #[inline]
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
            seq: AtomicU64::new(0),
        }
    }

    fn file_name(&self, extension: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("file-{millis}-{seq}.{extension}")
    }
}

fn extension(mime_type: &str) -> Result<String, StorageError> {
    let mime: Mime = mime_type.parse().map_err(|_| {
        StorageError::InvalidFile(format!("invalid MIME type: {mime_type}"))
    })?;
    // `svg+xml` is stored as `.svg`.
    let subtype = mime.subtype().as_str();
    Ok(subtype.split('+').next().unwrap_or(subtype).to_owned())
}

#[async_trait]
impl Storage for LocalStorage {
    async fn persist_file(&self, file: File) -> Result<String, StorageError> {
        file.validate()?;
        let extension = extension(&file.mime_type)?;
        let content = BASE64.decode(&file.base64_content).map_err(|err| {
            StorageError::InvalidFile(format!("invalid base64 content: {err}"))
        })?;

        fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(self.file_name(&extension));
        fs::write(&path, &content).await?;
        debug!("saved {} bytes to {}", content.len(), path.display());
        Ok(path.display().to_string())
    }
}

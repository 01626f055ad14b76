use crate::domain::ports::ObjectStorage;
use crate::utils::error::{GalleryError, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Object storage on the local filesystem: `{base_path}/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
    public_base_url: Option<String>,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self {
            base_path,
            public_base_url: None,
        }
    }

    /// Serve objects from `{url}/{bucket}/{path}` instead of a file path.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }

    fn object_path(&self, bucket: &str, path: &str) -> PathBuf {
        Path::new(&self.base_path).join(bucket).join(path)
    }
}

impl ObjectStorage for LocalStorage {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        _content_type: &str,
    ) -> Result<()> {
        let full_path = self.object_path(bucket, path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full_path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(GalleryError::StorageError {
                    message: format!("object already exists: {}/{}", bucket, path),
                });
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(data)?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}/{}", base, bucket, path),
            None => self.object_path(bucket, path).display().to_string(),
        }
    }
}

use crate::core::access::require_admin;
use crate::domain::model::{ImageUpload, UploadReceipt};
use crate::domain::ports::{ObjectStorage, RecordSource};
use crate::utils::error::{GalleryError, Result};
use crate::utils::validation::MAX_IMAGE_BYTES;
use chrono::Utc;

pub const DEFAULT_BUCKET: &str = "images";
pub const UPLOAD_PREFIX: &str = "palindromes";

/// Relays plate photos into object storage on behalf of admins.
pub struct UploadService<S: ObjectStorage, R: RecordSource> {
    storage: S,
    profiles: R,
    bucket: String,
}

impl<S: ObjectStorage, R: RecordSource> UploadService<S, R> {
    pub fn new(storage: S, profiles: R) -> Self {
        Self {
            storage,
            profiles,
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Checks that `user_id` belongs to an admin, validates the image, then
    /// stores it under `palindromes/{millis}-{sanitized name}`.
    pub async fn upload(&self, user_id: Option<&str>, upload: ImageUpload) -> Result<UploadReceipt> {
        let user_id = require_admin(&self.profiles, user_id).await?;
        check_image(&upload)?;

        let file_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_file_name(&upload.file_name)
        );
        let path = format!("{}/{}", UPLOAD_PREFIX, file_name);

        tracing::debug!(
            "Uploading {} bytes to {}/{}",
            upload.size(),
            self.bucket,
            path
        );
        if let Err(e) = self
            .storage
            .put_object(&self.bucket, &path, &upload.bytes, &upload.content_type)
            .await
        {
            tracing::error!("Upload of {} failed: {}", path, e);
            return Err(e);
        }

        tracing::info!("Stored {} for admin {}", path, user_id);
        Ok(UploadReceipt {
            public_url: self.storage.public_url(&self.bucket, &path),
            path,
            file_name,
            size: upload.size(),
            content_type: upload.content_type,
        })
    }
}

/// Replaces everything outside `[a-zA-Z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn check_image(upload: &ImageUpload) -> Result<()> {
    if upload.bytes.is_empty() {
        return Err(GalleryError::UploadRejected {
            reason: "No file provided".to_string(),
        });
    }
    if !upload.content_type.starts_with("image/") {
        return Err(GalleryError::UploadRejected {
            reason: "Invalid file type. Only images are allowed.".to_string(),
        });
    }
    if upload.size() > MAX_IMAGE_BYTES {
        return Err(GalleryError::UploadRejected {
            reason: "File too large. Maximum size is 5MB.".to_string(),
        });
    }
    Ok(())
}

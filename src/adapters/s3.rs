#[cfg(feature = "s3")]
use crate::domain::ports::ObjectStorage;
#[cfg(feature = "s3")]
use crate::utils::error::{GalleryError, Result};
#[cfg(feature = "s3")]
use aws_sdk_s3::error::ProvideErrorMetadata;
#[cfg(feature = "s3")]
use aws_sdk_s3::Client as S3Client;

/// S3-compatible object storage. The bucket name comes from each call.
#[cfg(feature = "s3")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    public_base_url: Option<String>,
}

#[cfg(feature = "s3")]
impl S3Storage {
    pub fn new(client: S3Client) -> Self {
        Self {
            client,
            public_base_url: None,
        }
    }

    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(S3Client::new(&config))
    }

    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = Some(url.into().trim_end_matches('/').to_string());
        self
    }
}

#[cfg(feature = "s3")]
impl ObjectStorage for S3Storage {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(path)
            .content_type(content_type)
            .cache_control("max-age=3600")
            // no upsert
            .if_none_match("*")
            .body(data.to_vec().into())
            .send()
            .await
            .map_err(|e| {
                let service_error = e.into_service_error();
                GalleryError::StorageError {
                    message: format!(
                        "Failed to write {}/{} to S3: {}",
                        bucket,
                        path,
                        service_error.message().unwrap_or("unknown error")
                    ),
                }
            })?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        match &self.public_base_url {
            Some(base) => format!("{}/{}/{}", base, bucket, path),
            None => format!("https://{}.s3.amazonaws.com/{}", bucket, path),
        }
    }
}

use crate::domain::model::{AdminProfile, NewCollector, NewFind, RawCollector, RawFind};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Access to the hosted `collectors`, `palindromes` and `user_profiles` tables.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>>;
    async fn fetch_finds(&self) -> Result<Vec<RawFind>>;
    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>>;
    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>>;

    /// Inserts a collector and returns the stored row, id and timestamps included.
    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector>;
    async fn insert_find(&self, find: &NewFind) -> Result<RawFind>;

    /// Fails with `NotFoundError` when no row has `id`.
    async fn delete_collector(&self, id: &str) -> Result<()>;
    async fn delete_find(&self, id: &str) -> Result<()>;
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Box<T> {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>> {
        (**self).fetch_collectors().await
    }

    async fn fetch_finds(&self) -> Result<Vec<RawFind>> {
        (**self).fetch_finds().await
    }

    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>> {
        (**self).fetch_admin_profiles().await
    }

    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>> {
        (**self).fetch_admin_profile(id).await
    }

    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector> {
        (**self).insert_collector(collector).await
    }

    async fn insert_find(&self, find: &NewFind) -> Result<RawFind> {
        (**self).insert_find(find).await
    }

    async fn delete_collector(&self, id: &str) -> Result<()> {
        (**self).delete_collector(id).await
    }

    async fn delete_find(&self, id: &str) -> Result<()> {
        (**self).delete_find(id).await
    }
}

#[async_trait]
impl<T: RecordSource + ?Sized> RecordSource for Arc<T> {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>> {
        (**self).fetch_collectors().await
    }

    async fn fetch_finds(&self) -> Result<Vec<RawFind>> {
        (**self).fetch_finds().await
    }

    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>> {
        (**self).fetch_admin_profiles().await
    }

    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>> {
        (**self).fetch_admin_profile(id).await
    }

    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector> {
        (**self).insert_collector(collector).await
    }

    async fn insert_find(&self, find: &NewFind) -> Result<RawFind> {
        (**self).insert_find(find).await
    }

    async fn delete_collector(&self, id: &str) -> Result<()> {
        (**self).delete_collector(id).await
    }

    async fn delete_find(&self, id: &str) -> Result<()> {
        (**self).delete_find(id).await
    }
}

/// Bucketed object store for plate photos.
pub trait ObjectStorage: Send + Sync {
    /// Writes a new object. Fails if `path` already exists in `bucket`.
    fn put_object(
        &self,
        bucket: &str,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

pub trait ConfigProvider: Send + Sync {
    fn api_url(&self) -> Option<&str>;
    fn api_key(&self) -> Option<&str>;
    /// When set, records are read from this JSON snapshot instead of the API.
    fn snapshot_path(&self) -> Option<&str>;
    /// `local` or `s3`.
    fn storage_backend(&self) -> &str;
    fn storage_path(&self) -> &str;
    fn bucket(&self) -> &str;
    fn public_base_url(&self) -> Option<&str>;
}

use crate::domain::model::{AdminProfile, NewCollector, NewFind, RawCollector, RawFind};
use crate::domain::ports::RecordSource;
use crate::utils::error::{GalleryError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

const PROFILE_COLUMNS: &str = "id,email,name,is_admin";

/// Reads tables through a PostgREST endpoint (`{base}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn get_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.table_url(table);
        tracing::debug!("Making API request to: {} {:?}", url, query);
        self.send(self.client.get(&url).query(query), url).await
    }

    /// `POST` one row and return the stored representation.
    async fn insert_row<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        table: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.table_url(table);
        tracing::debug!("Inserting into {}", url);

        let request = self
            .client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<T> = self.send(request, url.clone()).await?;

        rows.into_iter()
            .next()
            .ok_or_else(|| GalleryError::StorageError {
                message: format!("insert into {} returned no row", url),
            })
    }

    async fn delete_row(&self, table: &str, entity: &str, id: &str) -> Result<()> {
        let url = self.table_url(table);
        let filter = format!("eq.{}", id);
        tracing::debug!("Deleting {} from {}", id, url);

        let request = self
            .client
            .delete(&url)
            .query(&[("id", filter.as_str())])
            .header("Prefer", "return=representation");
        let rows: Vec<serde_json::Value> = self.send(request, url).await?;

        if rows.is_empty() {
            return Err(GalleryError::NotFoundError {
                entity: entity.to_string(),
                id: id.to_string(),
            });
        }
        Ok(())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: String,
    ) -> Result<Vec<T>> {
        let response = request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        tracing::debug!("API response status: {}", response.status());

        if !response.status().is_success() {
            return Err(GalleryError::HttpStatusError {
                status: response.status().as_u16(),
                url,
            });
        }

        Ok(response.json::<Vec<T>>().await?)
    }
}

#[async_trait]
impl RecordSource for RestSource {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>> {
        self.get_rows("collectors", &[("select", "*"), ("order", "name")])
            .await
    }

    async fn fetch_finds(&self) -> Result<Vec<RawFind>> {
        self.get_rows(
            "palindromes",
            &[("select", "*"), ("order", "created_at.desc")],
        )
        .await
    }

    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>> {
        self.get_rows("user_profiles", &[("select", PROFILE_COLUMNS)])
            .await
    }

    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>> {
        let filter = format!("eq.{}", id);
        let rows: Vec<AdminProfile> = self
            .get_rows(
                "user_profiles",
                &[("select", PROFILE_COLUMNS), ("id", filter.as_str())],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector> {
        self.insert_row("collectors", collector).await
    }

    async fn insert_find(&self, find: &NewFind) -> Result<RawFind> {
        self.insert_row("palindromes", find).await
    }

    async fn delete_collector(&self, id: &str) -> Result<()> {
        self.delete_row("collectors", "Collector", id).await
    }

    async fn delete_find(&self, id: &str) -> Result<()> {
        self.delete_row("palindromes", "Palindrome", id).await
    }
}

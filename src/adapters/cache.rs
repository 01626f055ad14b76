use crate::domain::model::{AdminProfile, NewCollector, NewFind, RawCollector, RawFind};
use crate::domain::ports::RecordSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Resource groups a write can make stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryTag {
    Collectors,
    Palindromes,
    Profiles,
}

impl QueryTag {
    /// Tags to invalidate after creating or deleting a palindrome.
    pub const AFTER_PALINDROME_WRITE: &'static [QueryTag] = &[QueryTag::Palindromes];
    /// Tags to invalidate after creating or deleting a collector.
    pub const AFTER_COLLECTOR_WRITE: &'static [QueryTag] = &[QueryTag::Collectors];
}

#[derive(Debug, Default)]
struct Entries {
    collectors: Option<Vec<RawCollector>>,
    palindromes: Option<Vec<RawFind>>,
    profiles: Option<Vec<AdminProfile>>,
}

/// Read-through cache in front of a [`RecordSource`]. Entries live until their
/// tag is invalidated. Single-profile lookups used for authorization always
/// go to the source. Writes pass straight through; the writer invalidates.
pub struct QueryCache<S: RecordSource> {
    source: S,
    entries: RwLock<Entries>,
}

impl<S: RecordSource> QueryCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: RwLock::new(Entries::default()),
        }
    }

    pub async fn invalidate(&self, tags: &[QueryTag]) {
        let mut entries = self.entries.write().await;
        for tag in tags {
            tracing::debug!("Invalidating {:?}", tag);
            match tag {
                QueryTag::Collectors => entries.collectors = None,
                QueryTag::Palindromes => entries.palindromes = None,
                QueryTag::Profiles => entries.profiles = None,
            }
        }
    }

    pub async fn invalidate_all(&self) {
        *self.entries.write().await = Entries::default();
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for QueryCache<S> {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>> {
        if let Some(rows) = &self.entries.read().await.collectors {
            return Ok(rows.clone());
        }
        let rows = self.source.fetch_collectors().await?;
        self.entries.write().await.collectors = Some(rows.clone());
        Ok(rows)
    }

    async fn fetch_finds(&self) -> Result<Vec<RawFind>> {
        if let Some(rows) = &self.entries.read().await.palindromes {
            return Ok(rows.clone());
        }
        let rows = self.source.fetch_finds().await?;
        self.entries.write().await.palindromes = Some(rows.clone());
        Ok(rows)
    }

    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>> {
        if let Some(rows) = &self.entries.read().await.profiles {
            return Ok(rows.clone());
        }
        let rows = self.source.fetch_admin_profiles().await?;
        self.entries.write().await.profiles = Some(rows.clone());
        Ok(rows)
    }

    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>> {
        self.source.fetch_admin_profile(id).await
    }

    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector> {
        self.source.insert_collector(collector).await
    }

    async fn insert_find(&self, find: &NewFind) -> Result<RawFind> {
        self.source.insert_find(find).await
    }

    async fn delete_collector(&self, id: &str) -> Result<()> {
        self.source.delete_collector(id).await
    }

    async fn delete_find(&self, id: &str) -> Result<()> {
        self.source.delete_find(id).await
    }
}

use crate::domain::model::{AdminProfile, NewCollector, NewFind, RawCollector, RawFind};
use crate::domain::ports::RecordSource;
use crate::utils::error::{GalleryError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// JSON dump of the `collectors`, `palindromes` and `user_profiles` tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub collectors: Vec<RawCollector>,
    pub palindromes: Vec<RawFind>,
    pub user_profiles: Vec<AdminProfile>,
}

/// In-memory record source. When loaded with [`SnapshotSource::from_file`],
/// every write is saved back to that file.
#[derive(Debug)]
pub struct SnapshotSource {
    snapshot: RwLock<Snapshot>,
    path: Option<PathBuf>,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
            path: None,
        }
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::info!(
            "Loaded snapshot {}: {} collectors, {} palindromes, {} profiles",
            path.as_ref().display(),
            snapshot.collectors.len(),
            snapshot.palindromes.len(),
            snapshot.user_profiles.len()
        );
        Ok(Self {
            snapshot: RwLock::new(snapshot),
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }

    async fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(path) = &self.path {
            let content = serde_json::to_string_pretty(snapshot)?;
            tokio::fs::write(path, content).await?;
            tracing::debug!("Saved snapshot to {}", path.display());
        }
        Ok(())
    }
}

/// Next `{prefix}-{n}` id not already taken.
fn next_id<'a>(prefix: &str, taken: impl Iterator<Item = Option<&'a String>> + Clone) -> String {
    let mut n = taken.clone().count() + 1;
    loop {
        let candidate = format!("{}-{}", prefix, n);
        if !taken.clone().any(|id| id == Some(&candidate)) {
            return candidate;
        }
        n += 1;
    }
}

#[async_trait]
impl RecordSource for SnapshotSource {
    async fn fetch_collectors(&self) -> Result<Vec<RawCollector>> {
        Ok(self.snapshot.read().await.collectors.clone())
    }

    async fn fetch_finds(&self) -> Result<Vec<RawFind>> {
        Ok(self.snapshot.read().await.palindromes.clone())
    }

    async fn fetch_admin_profiles(&self) -> Result<Vec<AdminProfile>> {
        Ok(self.snapshot.read().await.user_profiles.clone())
    }

    async fn fetch_admin_profile(&self, id: &str) -> Result<Option<AdminProfile>> {
        Ok(self
            .snapshot
            .read()
            .await
            .user_profiles
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn insert_collector(&self, collector: &NewCollector) -> Result<RawCollector> {
        let mut snapshot = self.snapshot.write().await;
        let now = Utc::now().to_rfc3339();
        let row = RawCollector {
            id: Some(next_id(
                "collector",
                snapshot.collectors.iter().map(|c| c.id.as_ref()),
            )),
            name: Some(collector.name.clone()),
            email: collector.email.clone(),
            location: collector.location.clone(),
            bio: collector.bio.clone(),
            notes: collector.notes.clone(),
            created_by_admin_id: collector.created_by_admin_id.clone(),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        snapshot.collectors.push(row.clone());
        self.persist(&snapshot).await?;
        Ok(row)
    }

    async fn insert_find(&self, find: &NewFind) -> Result<RawFind> {
        let mut snapshot = self.snapshot.write().await;
        let now = Utc::now().to_rfc3339();
        let row = RawFind {
            id: Some(next_id(
                "palindrome",
                snapshot.palindromes.iter().map(|p| p.id.as_ref()),
            )),
            collector_id: Some(find.collector_id.clone()),
            license_plate: Some(find.license_plate.clone()),
            date_found: find.date_found.clone(),
            location_found: find.location_found.clone(),
            car_type: find.car_type.clone(),
            image_url: Some(find.image_url.clone()),
            image_storage_path: Some(find.image_storage_path.clone()),
            additional_notes: find.additional_notes.clone(),
            uploaded_by_admin_id: Some(find.uploaded_by_admin_id.clone()),
            created_at: Some(now.clone()),
            updated_at: Some(now),
        };

        snapshot.palindromes.push(row.clone());
        self.persist(&snapshot).await?;
        Ok(row)
    }

    async fn delete_collector(&self, id: &str) -> Result<()> {
        let mut snapshot = self.snapshot.write().await;
        let before = snapshot.collectors.len();
        snapshot.collectors.retain(|c| c.id.as_deref() != Some(id));

        if snapshot.collectors.len() == before {
            return Err(GalleryError::NotFoundError {
                entity: "Collector".to_string(),
                id: id.to_string(),
            });
        }
        self.persist(&snapshot).await
    }

    async fn delete_find(&self, id: &str) -> Result<()> {
        let mut snapshot = self.snapshot.write().await;
        let before = snapshot.palindromes.len();
        snapshot.palindromes.retain(|p| p.id.as_deref() != Some(id));

        if snapshot.palindromes.len() == before {
            return Err(GalleryError::NotFoundError {
                entity: "Palindrome".to_string(),
                id: id.to_string(),
            });
        }
        self.persist(&snapshot).await
    }
}

use crate::adapters::cache::{QueryCache, QueryTag};
use crate::core::access::require_admin;
use crate::core::gallery::{filter_gallery, join_finds_with_collectors};
use crate::core::leaderboard::generate_leaderboard;
use crate::core::projection::{optional, project_all, project_collector, project_find};
use crate::core::stats::{stats_for_collector, summarize_collectors};
use crate::core::upload::UploadService;
use crate::domain::model::{
    Collector, CollectorForm, CollectorStats, CollectorSummary, Find, GalleryFilter, GalleryItem,
    LeaderboardEntry, NewCollector, NewFind, PalindromeForm,
};
use crate::domain::ports::{ObjectStorage, RecordSource};
use crate::utils::error::{GalleryError, Result};
use crate::utils::validation::{validate_collector_form, validate_palindrome_form, FormValidation};

/// Service facade: fetches rows through a [`QueryCache`], projects them, and
/// hands them to the engine. Admin writes invalidate the affected cache tags.
pub struct Catalog<S: RecordSource> {
    source: QueryCache<S>,
}

impl<S: RecordSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: QueryCache::new(source),
        }
    }

    pub async fn collectors(&self) -> Result<Vec<Collector>> {
        let rows = self.source.fetch_collectors().await?;
        tracing::debug!("Fetched {} collector rows", rows.len());
        Ok(project_all(&rows, project_collector))
    }

    pub async fn finds(&self) -> Result<Vec<Find>> {
        let rows = self.source.fetch_finds().await?;
        tracing::debug!("Fetched {} palindrome rows", rows.len());
        Ok(project_all(&rows, project_find))
    }

    pub async fn leaderboard(&self) -> Result<Vec<LeaderboardEntry>> {
        let (collectors, finds) = tokio::try_join!(self.collectors(), self.finds())?;
        let board = generate_leaderboard(&collectors, &finds);
        tracing::info!(
            "Leaderboard has {} ranked collectors out of {}",
            board.len(),
            collectors.len()
        );
        Ok(board)
    }

    pub async fn collector_stats(&self, collector_id: &str) -> Result<(Collector, CollectorStats)> {
        let (collectors, finds) = tokio::try_join!(self.collectors(), self.finds())?;
        let collector = collectors
            .into_iter()
            .find(|c| c.id == collector_id)
            .ok_or_else(|| GalleryError::NotFoundError {
                entity: "Collector".to_string(),
                id: collector_id.to_string(),
            })?;

        let stats = stats_for_collector(&collector.id, &finds);
        Ok((collector, stats))
    }

    /// Admin list, sorted by collector name ignoring case. Equal names keep
    /// the source order.
    pub async fn collector_summaries(&self) -> Result<Vec<CollectorSummary>> {
        let (mut collectors, finds) = tokio::try_join!(self.collectors(), self.finds())?;
        collectors.sort_by_cached_key(|c| c.name.to_lowercase());
        Ok(summarize_collectors(&collectors, &finds))
    }

    /// Gallery items, newest upload first.
    pub async fn gallery(&self, filter: &GalleryFilter) -> Result<Vec<GalleryItem>> {
        let (collectors, mut finds, admins) = tokio::try_join!(
            self.collectors(),
            self.finds(),
            self.source.fetch_admin_profiles()
        )?;
        finds.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let items = join_finds_with_collectors(&finds, &collectors, &admins);
        Ok(filter_gallery(&items, filter))
    }

    pub async fn create_collector(
        &self,
        admin_id: Option<&str>,
        form: &CollectorForm,
    ) -> Result<Collector> {
        let admin_id = require_admin(&self.source, admin_id).await?;
        reject_invalid("collector", validate_collector_form(form))?;

        let record = NewCollector {
            name: form.name.trim().to_string(),
            email: optional(&form.email),
            location: optional(&form.location),
            bio: optional(&form.bio),
            notes: optional(&form.notes),
            created_by_admin_id: Some(admin_id.clone()),
        };
        let row = self.source.insert_collector(&record).await?;
        self.source.invalidate(QueryTag::AFTER_COLLECTOR_WRITE).await;

        let collector = project_collector(&row)?;
        tracing::info!("Admin {} created collector {}", admin_id, collector.id);
        Ok(collector)
    }

    /// Validates the form, stores the photo through `uploads`, then inserts the
    /// palindrome row pointing at the stored object.
    pub async fn create_palindrome<St: ObjectStorage, R: RecordSource>(
        &self,
        uploads: &UploadService<St, R>,
        admin_id: Option<&str>,
        form: PalindromeForm,
    ) -> Result<Find> {
        let admin_id = require_admin(&self.source, admin_id).await?;
        reject_invalid("palindrome", validate_palindrome_form(&form))?;

        let image = form.image.clone().ok_or_else(|| GalleryError::UploadRejected {
            reason: "No file provided".to_string(),
        })?;
        let receipt = uploads.upload(Some(admin_id.as_str()), image).await?;

        let record = NewFind {
            collector_id: form.collector_id.trim().to_string(),
            license_plate: form.license_plate.trim().to_string(),
            image_url: receipt.public_url,
            image_storage_path: receipt.path,
            car_type: optional(&form.car_type),
            location_found: optional(&form.location_found),
            date_found: optional(&form.date_found),
            additional_notes: optional(&form.additional_notes),
            uploaded_by_admin_id: admin_id.clone(),
        };
        let row = self.source.insert_find(&record).await?;
        self.source.invalidate(QueryTag::AFTER_PALINDROME_WRITE).await;

        let find = project_find(&row)?;
        tracing::info!(
            "Admin {} added palindrome {} ({})",
            admin_id,
            find.id,
            find.license_plate
        );
        Ok(find)
    }

    pub async fn delete_collector(&self, admin_id: Option<&str>, id: &str) -> Result<()> {
        let admin_id = require_admin(&self.source, admin_id).await?;
        self.source.delete_collector(id).await?;
        self.source.invalidate(QueryTag::AFTER_COLLECTOR_WRITE).await;
        tracing::info!("Admin {} deleted collector {}", admin_id, id);
        Ok(())
    }

    pub async fn delete_palindrome(&self, admin_id: Option<&str>, id: &str) -> Result<()> {
        let admin_id = require_admin(&self.source, admin_id).await?;
        self.source.delete_find(id).await?;
        self.source.invalidate(QueryTag::AFTER_PALINDROME_WRITE).await;
        tracing::info!("Admin {} deleted palindrome {}", admin_id, id);
        Ok(())
    }
}

fn reject_invalid(form: &str, validation: FormValidation) -> Result<()> {
    if validation.is_valid() {
        return Ok(());
    }
    tracing::warn!("Rejected {} form: {:?}", form, validation.errors);
    Err(GalleryError::FormRejected {
        form: form.to_string(),
        errors: validation.errors,
    })
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A person credited with finding palindromic plates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collector {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Collector {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            location: None,
            bio: None,
            notes: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// One observed palindromic plate, linked to its collector and uploader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Find {
    pub id: String,
    pub collector_id: String,
    pub license_plate: String,
    pub date_found: Option<NaiveDate>,
    pub location_found: Option<String>,
    pub car_type: Option<String>,
    pub image_url: Option<String>,
    pub image_storage_path: Option<String>,
    pub additional_notes: Option<String>,
    pub uploaded_by_admin_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Find {
    pub fn new(
        collector_id: impl Into<String>,
        license_plate: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: String::new(),
            collector_id: collector_id.into(),
            license_plate: license_plate.into(),
            date_found: None,
            location_found: None,
            car_type: None,
            image_url: None,
            image_storage_path: None,
            additional_notes: None,
            uploaded_by_admin_id: None,
            created_at,
            updated_at: None,
        }
    }

    pub fn with_date_found(mut self, date: NaiveDate) -> Self {
        self.date_found = Some(date);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location_found = Some(location.into());
        self
    }

    pub fn with_car_type(mut self, car_type: impl Into<String>) -> Self {
        self.car_type = Some(car_type.into());
        self
    }
}

/// Site user profile. Only admins may upload images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Collector row as delivered by the store, before projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCollector {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub notes: Option<String>,
    pub created_by_admin_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Palindrome row as delivered by the store, before projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawFind {
    pub id: Option<String>,
    pub collector_id: Option<String>,
    pub license_plate: Option<String>,
    pub date_found: Option<String>,
    pub location_found: Option<String>,
    pub car_type: Option<String>,
    pub image_url: Option<String>,
    pub image_storage_path: Option<String>,
    pub additional_notes: Option<String>,
    pub uploaded_by_admin_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Aggregate statistics over one collector's finds, keyed on discovery date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorStats {
    pub total_finds: usize,
    pub earliest_find: Option<NaiveDate>,
    pub latest_find: Option<NaiveDate>,
    pub favorite_location: Option<String>,
    pub favorite_car_type: Option<String>,
    pub locations_count: usize,
    pub car_types_count: usize,
}

/// Ranked summary of one collector, keyed on upload time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub collector: Collector,
    pub total_finds: usize,
    pub earliest_find: DateTime<Utc>,
    pub latest_find: DateTime<Utc>,
}

/// Admin list row: every collector with a discovery-date range, zero finds included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectorSummary {
    pub collector: Collector,
    pub total_palindromes: usize,
    pub earliest_find: Option<NaiveDate>,
    pub latest_find: Option<NaiveDate>,
}

/// A find joined with its collector and uploading admin for gallery display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub find: Find,
    pub collector_name: String,
    pub collector_location: Option<String>,
    pub collector_bio: Option<String>,
    pub uploaded_by_admin_name: Option<String>,
    pub uploaded_by_admin_email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryFilter {
    pub search: Option<String>,
    pub collector_id: Option<String>,
    pub location: Option<String>,
    pub car_type: Option<String>,
}

/// Submitted "new palindrome" admin form.
#[derive(Debug, Clone, Default)]
pub struct PalindromeForm {
    pub license_plate: String,
    pub collector_id: String,
    pub image: Option<ImageUpload>,
    pub car_type: Option<String>,
    pub location_found: Option<String>,
    /// `YYYY-MM-DD`
    pub date_found: Option<String>,
    pub additional_notes: Option<String>,
}

/// Submitted "new collector" admin form.
#[derive(Debug, Clone, Default)]
pub struct CollectorForm {
    pub name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub notes: Option<String>,
}

/// Row written to the `collectors` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollector {
    pub name: String,
    pub email: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub notes: Option<String>,
    pub created_by_admin_id: Option<String>,
}

/// Row written to the `palindromes` table once the photo is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFind {
    pub collector_id: String,
    pub license_plate: String,
    pub image_url: String,
    pub image_storage_path: String,
    pub car_type: Option<String>,
    pub location_found: Option<String>,
    pub date_found: Option<String>,
    pub additional_notes: Option<String>,
    pub uploaded_by_admin_id: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub path: String,
    pub public_url: String,
    pub file_name: String,
    pub size: usize,
    pub content_type: String,
}

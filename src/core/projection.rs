//! Maps loosely typed store rows onto the typed entities the engine works on.

use crate::domain::model::{Collector, Find, RawCollector, RawFind};
use crate::utils::error::{GalleryError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

pub fn project_collector(raw: &RawCollector) -> Result<Collector> {
    let id = required("collector", "id", &raw.id)?;
    let name = required("collector", "name", &raw.name)?;

    Ok(Collector {
        id,
        name,
        email: optional(&raw.email),
        location: optional(&raw.location),
        bio: optional(&raw.bio),
        notes: optional(&raw.notes),
        created_at: optional_timestamp("collector", "created_at", &raw.created_at)?,
        updated_at: optional_timestamp("collector", "updated_at", &raw.updated_at)?,
    })
}

/// An unparsable `date_found` is treated as absent so the find still counts.
pub fn project_find(raw: &RawFind) -> Result<Find> {
    let collector_id = required("palindrome", "collector_id", &raw.collector_id)?;
    let license_plate = required("palindrome", "license_plate", &raw.license_plate)?;
    let created_at_raw = required("palindrome", "created_at", &raw.created_at)?;
    let created_at =
        parse_timestamp(&created_at_raw).ok_or_else(|| GalleryError::ProjectionError {
            record: "palindrome".to_string(),
            field: "created_at".to_string(),
            reason: format!("is not a timestamp: {}", created_at_raw),
        })?;

    let date_found = optional(&raw.date_found).and_then(|value| {
        let parsed = parse_date(&value);
        if parsed.is_none() {
            tracing::warn!(
                "Ignoring unparsable date_found '{}' on palindrome {}",
                value,
                raw.id.as_deref().unwrap_or("?")
            );
        }
        parsed
    });

    Ok(Find {
        id: raw.id.clone().unwrap_or_default(),
        collector_id,
        license_plate,
        date_found,
        location_found: optional(&raw.location_found),
        car_type: optional(&raw.car_type),
        image_url: optional(&raw.image_url),
        image_storage_path: optional(&raw.image_storage_path),
        additional_notes: optional(&raw.additional_notes),
        uploaded_by_admin_id: optional(&raw.uploaded_by_admin_id),
        created_at,
        updated_at: optional_timestamp("palindrome", "updated_at", &raw.updated_at)?,
    })
}

/// Projects a batch, skipping rows that fail instead of failing the whole read.
pub fn project_all<R, T>(rows: &[R], project: impl Fn(&R) -> Result<T>) -> Vec<T> {
    let mut projected = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        match project(row) {
            Ok(entity) => projected.push(entity),
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping row: {}", e);
            }
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} of {} rows", skipped, rows.len());
    }
    projected
}

/// Accepts `YYYY-MM-DD` or anything starting with it (e.g. an RFC 3339 timestamp).
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok().or_else(|| {
        value
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
    })
}

/// RFC 3339, or a zone-less ISO timestamp taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn required(record: &str, field: &str, value: &Option<String>) -> Result<String> {
    optional(value).ok_or_else(|| GalleryError::ProjectionError {
        record: record.to_string(),
        field: field.to_string(),
        reason: "is missing".to_string(),
    })
}

pub(crate) fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn optional_timestamp(
    record: &str,
    field: &str,
    value: &Option<String>,
) -> Result<Option<DateTime<Utc>>> {
    match optional(value) {
        None => Ok(None),
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| GalleryError::ProjectionError {
                record: record.to_string(),
                field: field.to_string(),
                reason: format!("is not a timestamp: {}", raw),
            }),
    }
}

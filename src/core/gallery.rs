use crate::domain::model::{AdminProfile, Collector, Find, GalleryFilter, GalleryItem};
use std::collections::HashMap;

pub const UNKNOWN_COLLECTOR: &str = "Unknown Collector";

/// Joins every find with its collector and uploader. Unlike the leaderboard,
/// the gallery keeps finds whose collector is missing.
pub fn join_finds_with_collectors(
    finds: &[Find],
    collectors: &[Collector],
    admins: &[AdminProfile],
) -> Vec<GalleryItem> {
    let collectors_by_id: HashMap<&str, &Collector> =
        collectors.iter().map(|c| (c.id.as_str(), c)).collect();
    let admins_by_id: HashMap<&str, &AdminProfile> =
        admins.iter().map(|a| (a.id.as_str(), a)).collect();

    finds
        .iter()
        .map(|find| {
            let collector = collectors_by_id.get(find.collector_id.as_str());
            let admin = find
                .uploaded_by_admin_id
                .as_deref()
                .and_then(|id| admins_by_id.get(id));

            GalleryItem {
                find: find.clone(),
                collector_name: collector
                    .map(|c| c.name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| UNKNOWN_COLLECTOR.to_string()),
                collector_location: collector.and_then(|c| c.location.clone()),
                collector_bio: collector.and_then(|c| c.bio.clone()),
                uploaded_by_admin_name: admin.and_then(|a| a.name.clone()),
                uploaded_by_admin_email: admin.map(|a| a.email.clone()),
            }
        })
        .collect()
}

pub fn filter_gallery(items: &[GalleryItem], filter: &GalleryFilter) -> Vec<GalleryItem> {
    items
        .iter()
        .filter(|item| matches_filter(item, filter))
        .cloned()
        .collect()
}

fn matches_filter(item: &GalleryItem, filter: &GalleryFilter) -> bool {
    if let Some(term) = active(&filter.search) {
        let haystack = [
            Some(item.find.license_plate.as_str()),
            item.find.location_found.as_deref(),
            item.find.car_type.as_deref(),
            Some(item.collector_name.as_str()),
        ]
        .into_iter()
        .map(|part| part.unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

        if !haystack.contains(&term.to_lowercase()) {
            return false;
        }
    }

    if let Some(collector_id) = active(&filter.collector_id) {
        if item.find.collector_id != collector_id {
            return false;
        }
    }
    if let Some(location) = active(&filter.location) {
        if item.find.location_found.as_deref() != Some(location) {
            return false;
        }
    }
    if let Some(car_type) = active(&filter.car_type) {
        if item.find.car_type.as_deref() != Some(car_type) {
            return false;
        }
    }

    true
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

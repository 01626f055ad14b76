use crate::domain::model::{CollectorSummary, LeaderboardEntry};
use crate::utils::error::{GalleryError, Result};

pub fn leaderboard_to_csv(entries: &[LeaderboardEntry]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "rank",
        "collector_id",
        "collector_name",
        "total_finds",
        "earliest_find",
        "latest_find",
    ])?;

    for entry in entries {
        writer.write_record([
            entry.rank.to_string(),
            entry.collector.id.clone(),
            entry.collector.name.clone(),
            entry.total_finds.to_string(),
            entry.earliest_find.to_rfc3339(),
            entry.latest_find.to_rfc3339(),
        ])?;
    }

    finish(writer)
}

pub fn summaries_to_csv(summaries: &[CollectorSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "collector_id",
        "name",
        "location",
        "total_palindromes",
        "earliest_find",
        "latest_find",
    ])?;

    for summary in summaries {
        writer.write_record([
            summary.collector.id.clone(),
            summary.collector.name.clone(),
            summary.collector.location.clone().unwrap_or_default(),
            summary.total_palindromes.to_string(),
            summary.earliest_find.map(|d| d.to_string()).unwrap_or_default(),
            summary.latest_find.map(|d| d.to_string()).unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| GalleryError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| GalleryError::ProjectionError {
        record: "csv".to_string(),
        field: "output".to_string(),
        reason: e.to_string(),
    })
}

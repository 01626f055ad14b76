use crate::domain::model::{Collector, Find, LeaderboardEntry};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Ranks collectors by number of finds, most first.
///
/// Date range is taken from `created_at` (upload time). Equal counts are
/// ordered by earliest upload, then by position in `collectors`. Collectors
/// without finds get no entry, and finds for unknown collectors are dropped.
pub fn generate_leaderboard(collectors: &[Collector], finds: &[Find]) -> Vec<LeaderboardEntry> {
    let mut uploads: HashMap<&str, Vec<DateTime<Utc>>> = HashMap::new();
    for find in finds {
        uploads
            .entry(find.collector_id.as_str())
            .or_default()
            .push(find.created_at);
    }

    let mut standings: Vec<(&Collector, usize, DateTime<Utc>, DateTime<Utc>)> = collectors
        .iter()
        .filter_map(|collector| {
            let times = uploads.get(collector.id.as_str())?;
            let earliest = times.iter().min()?;
            let latest = times.iter().max()?;
            Some((collector, times.len(), *earliest, *latest))
        })
        .collect();

    // stable: full ties keep collector order
    standings.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.2.cmp(&b.2)));

    standings
        .into_iter()
        .enumerate()
        .map(
            |(index, (collector, total_finds, earliest_find, latest_find))| LeaderboardEntry {
                rank: index + 1,
                collector: collector.clone(),
                total_finds,
                earliest_find,
                latest_find,
            },
        )
        .collect()
}

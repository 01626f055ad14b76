use crate::domain::model::{Collector, CollectorStats, CollectorSummary, Find};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};

/// Aggregates one collector's finds. Callers filter by collector first.
///
/// Dates come from `date_found` (discovery), not upload time. Finds without a
/// discovery date still count toward `total_finds`.
pub fn calculate_collector_stats(finds: &[Find]) -> CollectorStats {
    if finds.is_empty() {
        return CollectorStats::default();
    }

    let mut dates: Vec<NaiveDate> = finds.iter().filter_map(|f| f.date_found).collect();
    dates.sort_unstable();

    let locations = present_values(finds.iter().map(|f| f.location_found.as_deref()));
    let car_types = present_values(finds.iter().map(|f| f.car_type.as_deref()));

    CollectorStats {
        total_finds: finds.len(),
        earliest_find: dates.first().copied(),
        latest_find: dates.last().copied(),
        favorite_location: most_common(&locations).map(str::to_string),
        favorite_car_type: most_common(&car_types).map(str::to_string),
        locations_count: distinct_count(&locations),
        car_types_count: distinct_count(&car_types),
    }
}

/// One row per collector, in input order, including collectors with no finds.
/// Finds pointing at unknown collectors are ignored.
pub fn summarize_collectors(collectors: &[Collector], finds: &[Find]) -> Vec<CollectorSummary> {
    let by_collector = group_by_collector(finds);

    collectors
        .iter()
        .map(|collector| {
            let stats = by_collector
                .get(collector.id.as_str())
                .map(|group| calculate_collector_stats(group))
                .unwrap_or_default();

            CollectorSummary {
                collector: collector.clone(),
                total_palindromes: stats.total_finds,
                earliest_find: stats.earliest_find,
                latest_find: stats.latest_find,
            }
        })
        .collect()
}

/// Stats for a single collector id out of a mixed find list.
pub fn stats_for_collector(collector_id: &str, finds: &[Find]) -> CollectorStats {
    let owned: Vec<Find> = finds
        .iter()
        .filter(|f| f.collector_id == collector_id)
        .cloned()
        .collect();
    calculate_collector_stats(&owned)
}

fn group_by_collector(finds: &[Find]) -> HashMap<&str, Vec<Find>> {
    let mut groups: HashMap<&str, Vec<Find>> = HashMap::new();
    for find in finds {
        groups
            .entry(find.collector_id.as_str())
            .or_default()
            .push(find.clone());
    }
    groups
}

fn present_values<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<&'a str> {
    values.flatten().filter(|v| !v.is_empty()).collect()
}

/// Most frequent value. On a tie the value that reached the top count first,
/// scanning in input order, wins.
fn most_common<'a>(values: &[&'a str]) -> Option<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut leader: Option<(&'a str, usize)> = None;

    for &value in values {
        let count = counts.entry(value).or_insert(0);
        *count += 1;

        match leader {
            Some((_, top)) if *count <= top => {}
            _ => leader = Some((value, *count)),
        }
    }

    leader.map(|(value, _)| value)
}

fn distinct_count(values: &[&str]) -> usize {
    values.iter().collect::<HashSet<_>>().len()
}

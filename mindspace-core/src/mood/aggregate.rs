//! Chart-ready aggregates over the mood dataset.
//!
//! Windows are trailing: an entry is inside a window of `days` when its
//! timestamp is no older than `now - days`. Dates and labels are UTC.

use super::repo::MoodRepository;
use super::store::MoodStore;
use super::types::MoodEntry;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One point per entry, oldest first. Missing readings are gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoodTrend {
    /// Month/day labels, e.g. "5/1"
    pub labels: Vec<String>,
    pub before: Vec<Option<u8>>,
    pub after: Vec<Option<u8>>,
}

impl MoodTrend {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Before/after improvement over entries that have both ratings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ImprovementStats {
    pub average_improvement: f64,
    pub session_count: usize,
    /// After rating of the most recent paired entry
    pub last_rating: u8,
    pub last_improvement: i32,
}

/// Average before and after ratings, each over the entries that have one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MoodAverages {
    pub before: f64,
    pub after: f64,
    /// `after - before`
    pub improvement: f64,
    pub before_count: usize,
    pub after_count: usize,
}

/// Daily average ratings for each calendar day of a window, at most
/// [`MAX_DAILY_DAYS`] days long.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DailyTrend {
    pub dates: Vec<NaiveDate>,
    pub before: Vec<Option<f64>>,
    pub after: Vec<Option<f64>>,
}

/// Most calendar days a [`DailyTrend`] covers.
pub const MAX_DAILY_DAYS: u32 = 366;

/// Start of a trailing window of `days` ending at `now`.
///
/// Windows reaching past the earliest representable time cover everything.
pub fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Entries inside the trailing window, filtered by session type, oldest first.
pub fn window<'a>(
    entries: &'a [MoodEntry],
    now: DateTime<Utc>,
    days: u32,
    session_type: Option<&str>,
) -> Vec<&'a MoodEntry> {
    let cutoff = window_start(now, days);
    let mut selected: Vec<&MoodEntry> = entries
        .iter()
        .filter(|e| e.timestamp >= cutoff)
        .filter(|e| session_type.map_or(true, |t| e.session_type == t))
        .collect();
    // Stable: equal timestamps keep stored order
    selected.sort_by_key(|e| e.timestamp);
    selected
}

pub fn trend_at(
    entries: &[MoodEntry],
    now: DateTime<Utc>,
    days: u32,
    session_type: Option<&str>,
) -> MoodTrend {
    let mut trend = MoodTrend::default();
    for entry in window(entries, now, days, session_type) {
        trend.labels.push(format!(
            "{}/{}",
            entry.timestamp.month(),
            entry.timestamp.day()
        ));
        trend.before.push(entry.before.as_ref().map(|r| r.rating.value()));
        trend.after.push(entry.after.as_ref().map(|r| r.rating.value()));
    }
    trend
}

pub fn improvement_stats_at(
    entries: &[MoodEntry],
    now: DateTime<Utc>,
    days: u32,
    session_type: Option<&str>,
) -> ImprovementStats {
    let paired: Vec<(&MoodEntry, i32)> = window(entries, now, days, session_type)
        .into_iter()
        .filter_map(|e| e.improvement().map(|delta| (e, delta)))
        .collect();

    // Window is sorted oldest first, so the last paired entry is the most recent
    let Some(&(last, last_improvement)) = paired.last() else {
        return ImprovementStats::default();
    };

    let total: i32 = paired.iter().map(|(_, delta)| delta).sum();
    ImprovementStats {
        average_improvement: f64::from(total) / paired.len() as f64,
        session_count: paired.len(),
        last_rating: last.after.as_ref().map_or(0, |r| r.rating.value()),
        last_improvement,
    }
}

pub fn averages_at(
    entries: &[MoodEntry],
    now: DateTime<Utc>,
    days: u32,
    session_type: Option<&str>,
) -> MoodAverages {
    let selected = window(entries, now, days, session_type);
    let (before, before_count) = mean(
        selected
            .iter()
            .filter_map(|e| e.before.as_ref())
            .map(|r| r.rating.value()),
    );
    let (after, after_count) = mean(
        selected
            .iter()
            .filter_map(|e| e.after.as_ref())
            .map(|r| r.rating.value()),
    );

    MoodAverages {
        before,
        after,
        improvement: after - before,
        before_count,
        after_count,
    }
}

pub fn daily_trend_at(
    entries: &[MoodEntry],
    now: DateTime<Utc>,
    days: u32,
    session_type: Option<&str>,
) -> DailyTrend {
    if days == 0 {
        return DailyTrend::default();
    }
    let days = days.min(MAX_DAILY_DAYS);
    let today = now.date_naive();
    let first = today - Duration::days(i64::from(days) - 1);

    let mut buckets: BTreeMap<NaiveDate, (Vec<u8>, Vec<u8>)> = BTreeMap::new();
    for entry in entries
        .iter()
        .filter(|e| session_type.map_or(true, |t| e.session_type == t))
    {
        let date = entry.timestamp.date_naive();
        if date < first || date > today {
            continue;
        }
        let bucket = buckets.entry(date).or_default();
        if let Some(before) = &entry.before {
            bucket.0.push(before.rating.value());
        }
        if let Some(after) = &entry.after {
            bucket.1.push(after.rating.value());
        }
    }

    let mut trend = DailyTrend::default();
    for offset in 0..i64::from(days) {
        let date = first + Duration::days(offset);
        let (before, after) = buckets
            .get(&date)
            .map(|(b, a)| (mean_opt(b), mean_opt(a)))
            .unwrap_or((None, None));
        trend.dates.push(date);
        trend.before.push(before);
        trend.after.push(after);
    }
    trend
}

fn mean(values: impl Iterator<Item = u8>) -> (f64, usize) {
    let (sum, count) = values.fold((0u32, 0usize), |(s, c), v| (s + u32::from(v), c + 1));
    if count == 0 {
        (0.0, 0)
    } else {
        (f64::from(sum) / count as f64, count)
    }
}

fn mean_opt(values: &[u8]) -> Option<f64> {
    match mean(values.iter().copied()) {
        (_, 0) => None,
        (avg, _) => Some(avg),
    }
}

/// Aggregates computed on demand from a [`MoodStore`].
pub struct MoodAggregator<'a, R: MoodRepository> {
    store: &'a MoodStore<R>,
}

impl<'a, R: MoodRepository> MoodAggregator<'a, R> {
    pub fn new(store: &'a MoodStore<R>) -> Self {
        Self { store }
    }

    pub fn trend(&self, days: u32, session_type: Option<&str>) -> MoodTrend {
        trend_at(&self.store.get_all(), Utc::now(), days, session_type)
    }

    pub fn improvement_stats(&self, days: u32, session_type: Option<&str>) -> ImprovementStats {
        improvement_stats_at(&self.store.get_all(), Utc::now(), days, session_type)
    }

    pub fn averages(&self, days: u32, session_type: Option<&str>) -> MoodAverages {
        averages_at(&self.store.get_all(), Utc::now(), days, session_type)
    }

    pub fn daily_trend(&self, days: u32, session_type: Option<&str>) -> DailyTrend {
        daily_trend_at(&self.store.get_all(), Utc::now(), days, session_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::repo::MemoryRepository;
    use crate::mood::types::{MoodRating, MoodReading};

    fn now() -> DateTime<Utc> {
        "2024-05-10T12:00:00Z".parse().unwrap()
    }

    fn reading(v: u8) -> Option<MoodReading> {
        Some(MoodReading::new(MoodRating::new(v).unwrap()))
    }

    fn entry(days_ago: i64, kind: &str, before: Option<u8>, after: Option<u8>) -> MoodEntry {
        MoodEntry {
            id: format!("{}-{}", kind, days_ago),
            timestamp: now() - Duration::days(days_ago),
            session_type: kind.to_string(),
            before: before.and_then(reading),
            after: after.and_then(reading),
        }
    }

    #[test]
    fn test_empty_stats_are_zero() {
        let stats = improvement_stats_at(&[], now(), 7, None);
        assert_eq!(stats, ImprovementStats::default());
        assert_eq!(stats.average_improvement, 0.0);
        assert_eq!(stats.session_count, 0);
        assert_eq!(stats.last_rating, 0);
        assert_eq!(stats.last_improvement, 0);
    }

    #[test]
    fn test_single_paired_entry() {
        let entries = vec![entry(1, "meditation", Some(2), Some(4))];
        let stats = improvement_stats_at(&entries, now(), 7, None);
        assert_eq!(stats.average_improvement, 2.0);
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.last_rating, 4);
        assert_eq!(stats.last_improvement, 2);
    }

    #[test]
    fn test_stats_ignore_unpaired_and_old_entries() {
        // Stored order is not chronological on purpose
        let entries = vec![
            entry(1, "meditation", Some(3), Some(2)),
            entry(3, "meditation", Some(1), Some(4)),
            entry(2, "meditation", Some(2), None),
            entry(30, "meditation", Some(1), Some(5)),
        ];
        let stats = improvement_stats_at(&entries, now(), 7, None);
        assert_eq!(stats.session_count, 2);
        assert_eq!(stats.average_improvement, 1.0);
        // Most recent is the entry from one day ago
        assert_eq!(stats.last_rating, 2);
        assert_eq!(stats.last_improvement, -1);
    }

    #[test]
    fn test_stats_filter_by_session_type() {
        let entries = vec![
            entry(1, "meditation", Some(2), Some(4)),
            entry(1, "breathing", Some(2), Some(3)),
        ];
        let stats = improvement_stats_at(&entries, now(), 7, Some("breathing"));
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.last_improvement, 1);
    }

    #[test]
    fn test_trend_sorted_with_gaps() {
        let entries = vec![
            entry(0, "meditation", None, Some(4)),
            entry(2, "meditation", Some(3), None),
            entry(10, "meditation", Some(1), Some(1)),
        ];
        let trend = trend_at(&entries, now(), 7, None);
        assert_eq!(trend.labels, vec!["5/8", "5/10"]);
        assert_eq!(trend.before, vec![Some(3), None]);
        assert_eq!(trend.after, vec![None, Some(4)]);
    }

    #[test]
    fn test_trend_keeps_one_point_per_entry() {
        let entries = vec![
            entry(1, "meditation", Some(2), Some(3)),
            entry(1, "breathing", Some(4), Some(5)),
        ];
        let trend = trend_at(&entries, now(), 7, None);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend.labels, vec!["5/9", "5/9"]);
    }

    #[test]
    fn test_averages() {
        let entries = vec![
            entry(1, "meditation", Some(2), Some(4)),
            entry(2, "meditation", Some(3), None),
        ];
        let averages = averages_at(&entries, now(), 7, None);
        assert_eq!(averages.before, 2.5);
        assert_eq!(averages.after, 4.0);
        assert_eq!(averages.improvement, 1.5);
        assert_eq!(averages.before_count, 2);
        assert_eq!(averages.after_count, 1);

        assert_eq!(averages_at(&[], now(), 7, None), MoodAverages::default());
    }

    #[test]
    fn test_daily_trend_buckets_by_day() {
        let entries = vec![
            entry(0, "meditation", Some(2), Some(4)),
            entry(0, "breathing", Some(4), None),
            entry(2, "meditation", None, Some(5)),
            entry(9, "meditation", Some(1), Some(1)),
        ];
        let daily = daily_trend_at(&entries, now(), 3, None);
        let dates: Vec<String> = daily.dates.iter().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-05-08", "2024-05-09", "2024-05-10"]);
        assert_eq!(daily.before, vec![None, None, Some(3.0)]);
        assert_eq!(daily.after, vec![Some(5.0), None, Some(4.0)]);

        assert!(daily_trend_at(&entries, now(), 0, None).dates.is_empty());
    }

    #[test]
    fn test_huge_window_covers_everything() {
        let entries = vec![
            entry(1, "meditation", Some(2), Some(4)),
            entry(20_000, "meditation", Some(1), Some(4)),
        ];
        assert_eq!(window_start(now(), u32::MAX), DateTime::<Utc>::MIN_UTC);

        let stats = improvement_stats_at(&entries, now(), 200_000_000, None);
        assert_eq!(stats.session_count, 2);
        assert_eq!(stats.average_improvement, 2.5);
        assert_eq!(trend_at(&entries, now(), u32::MAX, None).len(), 2);
        assert_eq!(averages_at(&entries, now(), u32::MAX, None).before_count, 2);
    }

    #[test]
    fn test_daily_trend_is_capped() {
        let entries = vec![entry(0, "meditation", Some(3), None)];
        let daily = daily_trend_at(&entries, now(), 200_000_000, None);
        assert_eq!(daily.dates.len(), MAX_DAILY_DAYS as usize);
        assert_eq!(daily.dates.last().map(|d| d.to_string()).as_deref(), Some("2024-05-10"));
        assert_eq!(daily.before.last(), Some(&Some(3.0)));
    }

    #[test]
    fn test_aggregator_reads_store() {
        let store = MoodStore::new(MemoryRepository::new());
        store.add_entry("meditation", reading(2), reading(4));
        store.add_entry("meditation", reading(3), None);

        let aggregator = MoodAggregator::new(&store);
        let stats = aggregator.improvement_stats(7, Some("meditation"));
        assert_eq!(stats.session_count, 1);
        assert_eq!(stats.average_improvement, 2.0);
        assert_eq!(aggregator.trend(7, None).len(), 2);
        assert_eq!(aggregator.daily_trend(7, None).dates.len(), 7);
        assert_eq!(aggregator.averages(7, None).before_count, 2);
    }
}

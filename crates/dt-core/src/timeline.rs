//! Ordered collections of commits.

use chrono::NaiveDateTime;

use crate::commit::CommitRecord;

/// Commits in the order the source produced them.
///
/// No ordering is enforced here; use [`CommitTimeline::sorted_records`] when
/// chronological order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitTimeline {
    records: Vec<CommitRecord>,
}

impl CommitTimeline {
    pub const fn new(records: Vec<CommitRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CommitRecord> {
        self.records.iter()
    }

    pub fn first(&self) -> Option<&CommitRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&CommitRecord> {
        self.records.last()
    }

    /// Whether timestamps are non-decreasing.
    pub fn is_sorted(&self) -> bool {
        self.records.is_sorted_by_key(|record| record.timestamp)
    }

    /// Records ordered by timestamp ascending.
    ///
    /// The sort is stable: commits sharing a timestamp keep source order.
    pub fn sorted_records(&self) -> Vec<&CommitRecord> {
        let mut sorted: Vec<&CommitRecord> = self.records.iter().collect();
        sorted.sort_by_key(|record| record.timestamp);
        sorted
    }

    /// Returns a timeline holding only the records accepted by `filter`.
    #[must_use]
    pub fn filter(self, filter: &TimelineFilter) -> Self {
        if filter.is_empty() {
            return self;
        }
        let before = self.records.len();
        let records: Vec<_> = self
            .records
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        tracing::debug!(before, after = records.len(), "filtered commit timeline");
        Self { records }
    }
}

impl FromIterator<CommitRecord> for CommitTimeline {
    fn from_iter<I: IntoIterator<Item = CommitRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CommitTimeline {
    type Item = &'a CommitRecord;
    type IntoIter = std::slice::Iter<'a, CommitRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Restricts a timeline by time range and author.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineFilter {
    /// Inclusive lower bound.
    pub since: Option<NaiveDateTime>,
    /// Inclusive upper bound.
    pub until: Option<NaiveDateTime>,
    /// Case-insensitive substring of the author name.
    pub author: Option<String>,
}

impl TimelineFilter {
    pub const fn is_empty(&self) -> bool {
        self.since.is_none() && self.until.is_none() && self.author.is_none()
    }

    pub fn matches(&self, record: &CommitRecord) -> bool {
        if self.since.is_some_and(|since| record.timestamp < since) {
            return false;
        }
        if self.until.is_some_and(|until| record.timestamp > until) {
            return false;
        }
        self.author.as_deref().is_none_or(|needle| {
            record
                .author
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate};

    fn ts(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn commit(id: &str, minutes: i64, author: &str) -> CommitRecord {
        CommitRecord::new(id, ts(minutes), author, format!("commit {id}"))
    }

    #[test]
    fn test_first_last_and_len() {
        let timeline: CommitTimeline = vec![commit("a", 0, "Ada"), commit("b", 10, "Ada")]
            .into_iter()
            .collect();

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.first().unwrap().id, "a");
        assert_eq!(timeline.last().unwrap().id, "b");
        assert_eq!(
            timeline.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            ["a", "b"]
        );
    }

    #[test]
    fn test_empty_timeline() {
        let timeline = CommitTimeline::default();
        assert!(timeline.is_empty());
        assert!(timeline.first().is_none());
        assert!(timeline.is_sorted());
    }

    #[test]
    fn test_sorted_records_is_stable() {
        let timeline = CommitTimeline::new(vec![
            commit("late", 30, "Ada"),
            commit("tie-1", 10, "Ada"),
            commit("early", 0, "Ada"),
            commit("tie-2", 10, "Ada"),
        ]);

        assert!(!timeline.is_sorted());
        let ids: Vec<_> = timeline
            .sorted_records()
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, ["early", "tie-1", "tie-2", "late"]);
    }

    #[test]
    fn test_duplicate_timestamps_are_sorted() {
        let timeline = CommitTimeline::new(vec![commit("a", 5, "Ada"), commit("b", 5, "Ada")]);
        assert!(timeline.is_sorted());
    }

    #[test]
    fn test_filter_by_range_is_inclusive() {
        let timeline = CommitTimeline::new(vec![
            commit("a", 0, "Ada"),
            commit("b", 10, "Ada"),
            commit("c", 20, "Ada"),
            commit("d", 30, "Ada"),
        ]);
        let filter = TimelineFilter {
            since: Some(ts(10)),
            until: Some(ts(20)),
            author: None,
        };

        let ids: Vec<_> = timeline
            .filter(&filter)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_filter_by_author_ignores_case() {
        let timeline = CommitTimeline::new(vec![
            commit("a", 0, "Ada Lovelace"),
            commit("b", 10, "Grace Hopper"),
            commit("c", 20, "ada"),
        ]);
        let filter = TimelineFilter {
            author: Some("ADA".to_string()),
            ..Default::default()
        };

        let ids: Vec<_> = timeline
            .filter(&filter)
            .iter()
            .map(|c| c.id.clone())
            .collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let timeline = CommitTimeline::new(vec![commit("a", 0, "Ada"), commit("b", 10, "Bob")]);
        let filtered = timeline.clone().filter(&TimelineFilter::default());
        assert_eq!(filtered, timeline);
    }
}

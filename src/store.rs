use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{ActivityCounters, AwardSource, BadgeAward, CheckinEntry};

/// Persistence for one local user's raw engagement history.
///
/// Check-ins are keyed by week: writing an entry for a week that already has
/// one replaces it. Nothing here deletes entries.
pub trait RecordStore {
    /// All entries, newest first.
    async fn list_checkins(&self) -> anyhow::Result<Vec<CheckinEntry>>;

    async fn find_checkin_by_week(&self, week: NaiveDate) -> anyhow::Result<Option<CheckinEntry>>;

    /// Returns `true` when an entry for the same week was replaced.
    async fn upsert_checkin(&self, entry: &CheckinEntry) -> anyhow::Result<bool>;

    async fn counters(&self) -> anyhow::Result<ActivityCounters>;

    async fn record_pod_message(&self) -> anyhow::Result<ActivityCounters>;

    async fn record_ama_attended(&self) -> anyhow::Result<ActivityCounters>;

    async fn affirmations_scheduled(&self) -> anyhow::Result<bool>;

    async fn set_affirmations_scheduled(&self, scheduled: bool) -> anyhow::Result<()>;

    async fn badge_awards(&self) -> anyhow::Result<Vec<BadgeAward>>;

    /// Records first-earned times. Ids already in the ledger keep their
    /// original timestamp.
    async fn record_badge_awards(
        &self,
        badge_ids: &[String],
        source: AwardSource,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
}

#[cfg(test)]
pub(crate) use memory::MemoryStore;


#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::tests::entry_on;
    use chrono::{Duration, TimeZone};

    #[tokio::test]
    async fn upsert_replaces_the_same_week() {
        let store = MemoryStore::new();
        let monday = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
        let first = entry_on(monday);
        let mut second = entry_on(monday + Duration::days(2));
        second.notes = Some("resubmitted".to_string());

        assert!(!store.upsert_checkin(&first).await.unwrap());
        assert!(store.upsert_checkin(&second).await.unwrap());

        let entries = store.list_checkins().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, second.id);
        assert_eq!(
            store.find_checkin_by_week(first.week).await.unwrap(),
            Some(second)
        );
    }

    #[tokio::test]
    async fn checkins_are_listed_newest_first() {
        let store = MemoryStore::new();
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        for week in [3, 0, 9, 5, 1] {
            store
                .upsert_checkin(&entry_on(start + Duration::days(week * 7)))
                .await
                .unwrap();
        }

        let entries = store.list_checkins().await.unwrap();
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].date, start + Duration::days(63));
        assert!(entries.windows(2).all(|pair| pair[0].date > pair[1].date));
    }

    #[tokio::test]
    async fn counters_accumulate() {
        let store = MemoryStore::new();
        store.record_pod_message().await.unwrap();
        store.record_pod_message().await.unwrap();
        let counters = store.record_ama_attended().await.unwrap();
        assert_eq!(
            counters,
            ActivityCounters {
                pod_messages: 2,
                amas_attended: 1,
            }
        );
    }

    #[tokio::test]
    async fn award_ledger_keeps_first_timestamp() {
        let store = MemoryStore::new();
        let first = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let later = first + Duration::days(30);
        let ids = vec!["first-pod-post".to_string()];

        store
            .record_badge_awards(&ids, AwardSource::Rule, first)
            .await
            .unwrap();
        store
            .record_badge_awards(&ids, AwardSource::Rule, later)
            .await
            .unwrap();

        let awards = store.badge_awards().await.unwrap();
        assert_eq!(awards.len(), 1);
        assert_eq!(awards[0].earned_at, first);
    }
}

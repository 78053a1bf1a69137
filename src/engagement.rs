use chrono::{DateTime, Utc};
use tracing::info;

use crate::badges::{self, BadgeStatus};
use crate::models::{AwardSource, CheckinEntry, LeaderboardEntry, MetricTrend, UserStats};
use crate::store::RecordStore;
use crate::{checkin, leaderboard, scoring, trend};

/// Everything the dashboard shows, derived from one listing of the check-ins.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub stats: UserStats,
    pub affirmations_scheduled: bool,
    pub submitted_this_week: bool,
    pub badges: Vec<BadgeStatus>,
    pub leaderboard: Vec<LeaderboardEntry>,
    pub trends: Vec<MetricTrend>,
    pub latest: Option<CheckinEntry>,
}

/// Recomputes all derived engagement values. Badges earned for the first
/// time are written to the award ledger with `now` as their timestamp.
/// Trends only look at the newest `history_weeks` check-ins.
pub async fn snapshot<S: RecordStore>(
    store: &S,
    now: DateTime<Utc>,
    peers: &[LeaderboardEntry],
    history_weeks: usize,
) -> anyhow::Result<Snapshot> {
    let entries = store.list_checkins().await?;
    let counters = store.counters().await?;
    let affirmations_scheduled = store.affirmations_scheduled().await?;

    let mut stats = scoring::compute_stats(&entries, counters, now.date_naive());
    let evaluated = badges::evaluate_badges(&stats, affirmations_scheduled);

    let mut ledger = store.badge_awards().await?;
    let fresh = badges::new_awards(&evaluated, &ledger);
    if !fresh.is_empty() {
        info!(badges = ?fresh, "badges earned");
        store
            .record_badge_awards(&fresh, AwardSource::Rule, now)
            .await?;
        ledger = store.badge_awards().await?;
    }

    stats.badges = badges::merge_earned(&evaluated, &ledger);
    let badge_statuses = badges::statuses(&stats.badges, &ledger);
    let board = leaderboard::rank(peers, stats.total_points);

    let recent: Vec<CheckinEntry> = entries.iter().take(history_weeks).cloned().collect();
    let trends = trend::analyze(&recent);
    let this_week = checkin::week_key(now.date_naive());
    let submitted_this_week = entries.iter().any(|entry| entry.week == this_week);

    Ok(Snapshot {
        stats,
        affirmations_scheduled,
        submitted_this_week,
        badges: badge_statuses,
        leaderboard: board,
        trends,
        latest: entries.into_iter().next(),
    })
}

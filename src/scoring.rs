use chrono::NaiveDate;

use crate::models::{ActivityCounters, CheckinEntry, UserStats};
use crate::streak;

pub const POINTS_PER_CHECKIN: u32 = 10;
pub const POINTS_PER_POD_POST: u32 = 5;
pub const POINTS_PER_AMA: u32 = 15;
pub const POINTS_PER_LEVEL: u32 = 100;

pub fn total_points(checkins: u32, counters: ActivityCounters) -> u32 {
    checkins
        .saturating_mul(POINTS_PER_CHECKIN)
        .saturating_add(counters.pod_messages.saturating_mul(POINTS_PER_POD_POST))
        .saturating_add(counters.amas_attended.saturating_mul(POINTS_PER_AMA))
}

pub fn level_for(points: u32) -> u32 {
    points / POINTS_PER_LEVEL + 1
}

/// Fraction of the way from the current level to the next, in `[0, 1)`.
pub fn level_progress(points: u32) -> f64 {
    f64::from(points % POINTS_PER_LEVEL) / f64::from(POINTS_PER_LEVEL)
}

pub fn points_to_next_level(points: u32) -> u32 {
    POINTS_PER_LEVEL - points % POINTS_PER_LEVEL
}

/// Derives the stats block from raw history. `badges` is left empty; the
/// badge evaluator fills it from the result.
pub fn compute_stats(
    entries: &[CheckinEntry],
    counters: ActivityCounters,
    today: NaiveDate,
) -> UserStats {
    let checkins_completed = u32::try_from(entries.len()).unwrap_or(u32::MAX);
    let current_streak = streak::current_streak(entries, today);
    // The current streak tolerates a one-week slip that the longest run does
    // not, so the longest is floored at the current one.
    let longest_streak = streak::longest_streak(entries).max(current_streak);
    let total_points = total_points(checkins_completed, counters);

    UserStats {
        checkins_completed,
        current_streak,
        longest_streak,
        pod_messages: counters.pod_messages,
        amas_attended: counters.amas_attended,
        total_points,
        level: level_for(total_points),
        badges: Default::default(),
    }
}

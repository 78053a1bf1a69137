use chrono::{Duration, NaiveDate};

use crate::models::CheckinEntry;

const DAYS_PER_WEEK: i64 = 7;

/// Consecutive weeks with a check-in, counted back from `today`.
///
/// Expects at most one entry per week; callers upsert by week before
/// handing entries over.
pub fn current_streak(entries: &[CheckinEntry], today: NaiveDate) -> u32 {
    let mut dates: Vec<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
    dates.sort_by(|a, b| b.cmp(a));

    let mut streak = 0u32;
    for date in dates {
        let expected = today - Duration::days(i64::from(streak) * DAYS_PER_WEEK);
        let weeks_off = (expected - date).num_days().div_euclid(DAYS_PER_WEEK).abs();
        if weeks_off > 1 {
            break;
        }
        streak += 1;
    }

    streak
}

/// Longest run of check-ins where each follows the previous within a week.
pub fn longest_streak(entries: &[CheckinEntry]) -> u32 {
    if entries.is_empty() {
        return 0;
    }

    let mut dates: Vec<NaiveDate> = entries.iter().map(|entry| entry.date).collect();
    dates.sort();

    let mut longest = 0u32;
    let mut running = 1u32;
    for pair in dates.windows(2) {
        if (pair[1] - pair[0]).num_days() <= DAYS_PER_WEEK {
            running += 1;
        } else {
            longest = longest.max(running);
            running = 1;
        }
    }

    longest.max(running)
}

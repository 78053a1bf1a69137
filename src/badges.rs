use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::models::{BadgeAward, UserStats};

pub const STREAK_7: &str = "streak-7";
pub const FIRST_POD_POST: &str = "first-pod-post";
pub const AMAS_3: &str = "amas-3";
pub const AFFIRMATION_SCHEDULER: &str = "affirmation-scheduler";
pub const POINTS_500: &str = "points-500";
pub const COMMUNITY_SUPPORTER: &str = "community-supporter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeRule {
    CurrentStreakAtLeast(u32),
    PodMessagesAtLeast(u32),
    AmasAttendedAtLeast(u32),
    AffirmationsScheduled,
    TotalPointsAtLeast(u32),
}

impl BadgeRule {
    pub fn holds(&self, stats: &UserStats, affirmations_scheduled: bool) -> bool {
        match *self {
            BadgeRule::CurrentStreakAtLeast(weeks) => stats.current_streak >= weeks,
            BadgeRule::PodMessagesAtLeast(posts) => stats.pod_messages >= posts,
            BadgeRule::AmasAttendedAtLeast(sessions) => stats.amas_attended >= sessions,
            BadgeRule::AffirmationsScheduled => affirmations_scheduled,
            BadgeRule::TotalPointsAtLeast(points) => stats.total_points >= points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rule: BadgeRule,
}

pub static CATALOG: &[Badge] = &[
    Badge {
        id: STREAK_7,
        name: "7-Week Check-in Streak",
        description: "Completed weekly check-ins for 7 consecutive weeks",
        icon: "🔥",
        rule: BadgeRule::CurrentStreakAtLeast(7),
    },
    Badge {
        id: FIRST_POD_POST,
        name: "First Pod Post",
        description: "Made your first post in a support pod",
        icon: "💬",
        rule: BadgeRule::PodMessagesAtLeast(1),
    },
    Badge {
        id: AMAS_3,
        name: "3 AMAs Attended",
        description: "Attended 3 Ask Me Anything sessions with experts",
        icon: "🎓",
        rule: BadgeRule::AmasAttendedAtLeast(3),
    },
    Badge {
        id: AFFIRMATION_SCHEDULER,
        name: "Daily Affirmations",
        description: "Set up your daily affirmation schedule",
        icon: "✨",
        rule: BadgeRule::AffirmationsScheduled,
    },
    Badge {
        id: POINTS_500,
        name: "Wellness Champion",
        description: "Reached 500 total points",
        icon: "🏆",
        rule: BadgeRule::TotalPointsAtLeast(500),
    },
    Badge {
        id: COMMUNITY_SUPPORTER,
        name: "Community Supporter",
        description: "Made 10 supportive posts in pods",
        icon: "💝",
        rule: BadgeRule::PodMessagesAtLeast(10),
    },
];

pub fn find(id: &str) -> Option<&'static Badge> {
    CATALOG.iter().find(|badge| badge.id == id)
}

/// Re-runs every catalog rule against `stats`. Nothing is remembered between
/// calls: a badge whose condition stops holding is not returned.
pub fn evaluate_badges(stats: &UserStats, affirmations_scheduled: bool) -> BTreeSet<&'static str> {
    CATALOG
        .iter()
        .filter(|badge| badge.rule.holds(stats, affirmations_scheduled))
        .map(|badge| badge.id)
        .collect()
}

/// Ids evaluated as earned that the ledger has not recorded yet.
pub fn new_awards(evaluated: &BTreeSet<&'static str>, ledger: &[BadgeAward]) -> Vec<String> {
    evaluated
        .iter()
        .filter(|id| !ledger.iter().any(|award| award.badge_id == **id))
        .map(|id| id.to_string())
        .collect()
}

/// Union of currently-earned rule badges and every id in the ledger.
pub fn merge_earned(evaluated: &BTreeSet<&'static str>, ledger: &[BadgeAward]) -> BTreeSet<String> {
    evaluated
        .iter()
        .map(|id| id.to_string())
        .chain(ledger.iter().map(|award| award.badge_id.clone()))
        .collect()
}

const GRANT_ICON: &str = "🎖️";
const GRANT_DESCRIPTION: &str = "Awarded outside the badge catalog";

/// A badge as shown to the user. `badge` is `None` for grants whose id is
/// not in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeStatus {
    pub id: String,
    pub badge: Option<&'static Badge>,
    pub earned: bool,
    pub earned_at: Option<DateTime<Utc>>,
}

impl BadgeStatus {
    pub fn name(&self) -> &str {
        self.badge.map_or(self.id.as_str(), |badge| badge.name)
    }

    pub fn icon(&self) -> &str {
        self.badge.map_or(GRANT_ICON, |badge| badge.icon)
    }

    pub fn description(&self) -> &str {
        self.badge.map_or(GRANT_DESCRIPTION, |badge| badge.description)
    }
}

/// Every catalog badge with its earned flag, followed by ledger grants that
/// have no catalog entry.
pub fn statuses(earned: &BTreeSet<String>, ledger: &[BadgeAward]) -> Vec<BadgeStatus> {
    let earned_at = |id: &str| {
        ledger
            .iter()
            .find(|award| award.badge_id == id)
            .map(|award| award.earned_at)
    };

    let catalog = CATALOG.iter().map(|badge| BadgeStatus {
        id: badge.id.to_string(),
        badge: Some(badge),
        earned: earned.contains(badge.id),
        earned_at: earned_at(badge.id),
    });
    let grants = ledger
        .iter()
        .filter(|award| find(&award.badge_id).is_none())
        .map(|award| BadgeStatus {
            id: award.badge_id.clone(),
            badge: None,
            earned: true,
            earned_at: Some(award.earned_at),
        });

    catalog.chain(grants).collect()
}

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answers from the weekly symptom check-in screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomResponses {
    pub hot_flash_count: u8,
    pub hot_flash_severity: u8,
    pub sleep_quality: u8,
    pub mood: u8,
    pub adherence: bool,
}

/// Answers from the wellness trend screen. `stress` is lower-is-better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellnessResponses {
    pub mood: u8,
    pub energy: u8,
    pub sleep: u8,
    pub stress: u8,
    pub satisfaction: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Responses {
    Symptom(SymptomResponses),
    Wellness(WellnessResponses),
}

impl Responses {
    pub fn kind(&self) -> &'static str {
        match self {
            Responses::Symptom(_) => "symptom",
            Responses::Wellness(_) => "wellness",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    /// Sunday that starts the entry's week; at most one entry per week.
    pub week: NaiveDate,
    pub responses: Responses,
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityCounters {
    pub pod_messages: u32,
    pub amas_attended: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub checkins_completed: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub pod_messages: u32,
    pub amas_attended: u32,
    pub total_points: u32,
    pub level: u32,
    pub badges: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub points: u32,
    pub avatar_ref: String,
    pub is_local: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardSource {
    Rule,
    Grant,
}

impl AwardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            AwardSource::Rule => "rule",
            AwardSource::Grant => "grant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "rule" => Some(AwardSource::Rule),
            "grant" => Some(AwardSource::Grant),
            _ => None,
        }
    }
}

/// A persisted record of the first time a badge was earned or granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeAward {
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
    pub source: AwardSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Mood,
    Energy,
    Sleep,
    Stress,
    Satisfaction,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Mood,
        Metric::Energy,
        Metric::Sleep,
        Metric::Stress,
        Metric::Satisfaction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Mood => "Mood",
            Metric::Energy => "Energy",
            Metric::Sleep => "Sleep",
            Metric::Stress => "Stress",
            Metric::Satisfaction => "Life Satisfaction",
        }
    }

    pub fn lower_is_better(&self) -> bool {
        matches!(self, Metric::Stress)
    }

    /// Only the wellness shape carries trend metrics.
    pub fn value(&self, responses: &Responses) -> Option<u8> {
        let Responses::Wellness(wellness) = responses else {
            return None;
        };
        Some(match self {
            Metric::Mood => wellness.mood,
            Metric::Energy => wellness.energy,
            Metric::Sleep => wellness.sleep,
            Metric::Stress => wellness.stress,
            Metric::Satisfaction => wellness.satisfaction,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricTrend {
    pub metric: Metric,
    pub trend: Trend,
    pub latest_score: u8,
}

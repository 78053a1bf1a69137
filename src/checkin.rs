use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::{CheckinEntry, Responses, SymptomResponses, WellnessResponses};
use crate::store::RecordStore;

pub const MAX_HOT_FLASHES: i64 = 50;
pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("check-in is missing required answers: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SymptomDraft {
    pub hot_flash_count: Option<i64>,
    pub hot_flash_severity: Option<i64>,
    pub sleep_quality: Option<i64>,
    pub mood: Option<i64>,
    pub adherence: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WellnessDraft {
    pub mood: Option<i64>,
    pub energy: Option<i64>,
    pub sleep: Option<i64>,
    pub stress: Option<i64>,
    pub satisfaction: Option<i64>,
}

#[derive(Debug, Clone, Copy)]
pub enum ResponsesDraft {
    Symptom(SymptomDraft),
    Wellness(WellnessDraft),
}

#[derive(Debug, Clone)]
pub struct CheckinDraft {
    pub responses: ResponsesDraft,
    pub notes: Option<String>,
}

fn require<T>(value: Option<T>, field: &'static str, missing: &mut Vec<&'static str>) -> Option<T> {
    if value.is_none() {
        missing.push(field);
    }
    value
}

fn clamp_score(value: i64) -> u8 {
    value.clamp(MIN_SCORE, MAX_SCORE) as u8
}

/// Rejects a draft with any unanswered field and clamps every numeric
/// answer into its range.
pub fn validate(draft: &ResponsesDraft) -> Result<Responses, ValidationError> {
    let mut missing = Vec::new();

    match draft {
        ResponsesDraft::Symptom(draft) => {
            let answers = (
                require(draft.hot_flash_count, "hotFlashCount", &mut missing),
                require(draft.hot_flash_severity, "hotFlashSeverity", &mut missing),
                require(draft.sleep_quality, "sleepQuality", &mut missing),
                require(draft.mood, "mood", &mut missing),
                require(draft.adherence, "adherence", &mut missing),
            );
            match answers {
                (Some(count), Some(severity), Some(sleep_quality), Some(mood), Some(adherence)) => {
                    Ok(Responses::Symptom(SymptomResponses {
                        hot_flash_count: count.clamp(0, MAX_HOT_FLASHES) as u8,
                        hot_flash_severity: clamp_score(severity),
                        sleep_quality: clamp_score(sleep_quality),
                        mood: clamp_score(mood),
                        adherence,
                    }))
                }
                _ => Err(ValidationError::MissingFields(missing)),
            }
        }
        ResponsesDraft::Wellness(draft) => {
            let answers = (
                require(draft.mood, "mood", &mut missing),
                require(draft.energy, "energy", &mut missing),
                require(draft.sleep, "sleep", &mut missing),
                require(draft.stress, "stress", &mut missing),
                require(draft.satisfaction, "satisfaction", &mut missing),
            );
            match answers {
                (Some(mood), Some(energy), Some(sleep), Some(stress), Some(satisfaction)) => {
                    Ok(Responses::Wellness(WellnessResponses {
                        mood: clamp_score(mood),
                        energy: clamp_score(energy),
                        sleep: clamp_score(sleep),
                        stress: clamp_score(stress),
                        satisfaction: clamp_score(satisfaction),
                    }))
                }
                _ => Err(ValidationError::MissingFields(missing)),
            }
        }
    }
}

/// The Sunday on or before `date`.
pub fn week_key(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

fn clean_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|notes| notes.trim().to_string())
        .filter(|notes| !notes.is_empty())
}

pub fn build_entry(
    responses: Responses,
    notes: Option<String>,
    date: NaiveDate,
    timestamp: DateTime<Utc>,
) -> CheckinEntry {
    CheckinEntry {
        id: Uuid::new_v4(),
        date,
        week: week_key(date),
        responses,
        notes: clean_notes(notes),
        timestamp,
    }
}

#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub entry: CheckinEntry,
    pub replaced: bool,
}

/// Validates `draft` and stores it as this week's check-in, replacing any
/// earlier submission for the same week. The entry date and week key are
/// taken from the UTC date of `now`.
pub async fn submit<S: RecordStore>(
    store: &S,
    draft: CheckinDraft,
    now: DateTime<Utc>,
) -> anyhow::Result<SubmitOutcome> {
    let responses = validate(&draft.responses)?;
    let entry = build_entry(responses, draft.notes, now.date_naive(), now);
    let replaced = store.upsert_checkin(&entry).await?;

    info!(
        week = %entry.week,
        kind = entry.responses.kind(),
        replaced,
        "check-in saved"
    );

    Ok(SubmitOutcome { entry, replaced })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recap {
    pub wins: Vec<&'static str>,
    pub suggestion: &'static str,
}

const DEFAULT_WIN: &str = "You completed your weekly check-in - that's progress!";
const DEFAULT_SUGGESTION: &str = "Keep up the great work with your wellness journey";

pub fn weekly_recap(responses: &Responses) -> Recap {
    let mut wins = Vec::new();
    let mut suggestions = Vec::new();

    match responses {
        Responses::Symptom(answers) => {
            if answers.sleep_quality >= 4 {
                wins.push("Great sleep quality this week!");
            } else if answers.sleep_quality <= 2 {
                suggestions.push("Try a cool bedroom (65-68°F) and avoid screens before bed");
            }

            if answers.mood >= 4 {
                wins.push("Positive mood maintained");
            } else if answers.mood <= 2 {
                suggestions.push("Consider gentle exercise or connecting with friends");
            }

            if answers.hot_flash_count <= 5 {
                wins.push("Hot flashes were well-managed");
            } else if answers.hot_flash_count >= 20 {
                suggestions.push("Track triggers like spicy foods, stress, or caffeine");
            }

            if answers.adherence {
                wins.push("Excellent adherence to your wellness routine");
            } else {
                suggestions.push("Small consistent steps are better than perfect days");
            }
        }
        Responses::Wellness(answers) => {
            if answers.sleep >= 4 {
                wins.push("Great sleep quality this week!");
            } else if answers.sleep <= 2 {
                suggestions.push("Try a cool bedroom (65-68°F) and avoid screens before bed");
            }

            if answers.mood >= 4 {
                wins.push("Positive mood maintained");
            } else if answers.mood <= 2 {
                suggestions.push("Consider gentle exercise or connecting with friends");
            }

            if answers.energy >= 4 {
                wins.push("Energy levels stayed strong");
            } else if answers.energy <= 2 {
                suggestions.push("Short walks and regular meals can lift low energy");
            }

            if answers.stress <= 2 {
                wins.push("Stress kept in check");
            } else if answers.stress >= 4 {
                suggestions.push("Try a few minutes of slow breathing when stress builds");
            }

            if answers.satisfaction >= 4 {
                wins.push("Feeling good about life this week");
            }
        }
    }

    if wins.is_empty() {
        wins.push(DEFAULT_WIN);
    }

    Recap {
        wins,
        suggestion: suggestions.first().copied().unwrap_or(DEFAULT_SUGGESTION),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn full_symptom_draft() -> SymptomDraft {
        SymptomDraft {
            hot_flash_count: Some(3),
            hot_flash_severity: Some(2),
            sleep_quality: Some(4),
            mood: Some(4),
            adherence: Some(true),
        }
    }

    fn wellness_draft(mood: i64) -> CheckinDraft {
        CheckinDraft {
            responses: ResponsesDraft::Wellness(WellnessDraft {
                mood: Some(mood),
                energy: Some(3),
                sleep: Some(3),
                stress: Some(3),
                satisfaction: Some(3),
            }),
            notes: Some("  felt steadier  ".to_string()),
        }
    }

    #[test]
    fn week_key_is_the_preceding_sunday() {
        let wednesday = NaiveDate::from_ymd_opt(2026, 3, 18).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 15).unwrap();
        assert_eq!(week_key(wednesday), sunday);
        assert_eq!(week_key(sunday), sunday);
    }

    #[test]
    fn missing_answers_are_all_reported() {
        let draft = ResponsesDraft::Symptom(SymptomDraft {
            hot_flash_count: Some(2),
            mood: Some(3),
            ..SymptomDraft::default()
        });
        assert_eq!(
            validate(&draft),
            Err(ValidationError::MissingFields(vec![
                "hotFlashSeverity",
                "sleepQuality",
                "adherence",
            ]))
        );
    }

    #[test]
    fn out_of_range_answers_are_clamped() {
        let draft = ResponsesDraft::Symptom(SymptomDraft {
            hot_flash_count: Some(80),
            hot_flash_severity: Some(0),
            sleep_quality: Some(9),
            ..full_symptom_draft()
        });
        let Ok(Responses::Symptom(answers)) = validate(&draft) else {
            panic!("expected symptom responses");
        };
        assert_eq!(answers.hot_flash_count, 50);
        assert_eq!(answers.hot_flash_severity, 1);
        assert_eq!(answers.sleep_quality, 5);
    }

    #[test]
    fn negative_hot_flash_count_clamps_to_zero() {
        let draft = ResponsesDraft::Symptom(SymptomDraft {
            hot_flash_count: Some(-4),
            ..full_symptom_draft()
        });
        let Ok(Responses::Symptom(answers)) = validate(&draft) else {
            panic!("expected symptom responses");
        };
        assert_eq!(answers.hot_flash_count, 0);
    }

    #[tokio::test]
    async fn resubmitting_in_the_same_week_replaces_the_entry() {
        let store = MemoryStore::new();
        let monday = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
        let thursday = Utc.with_ymd_and_hms(2026, 3, 19, 21, 30, 0).unwrap();

        let first = submit(&store, wellness_draft(2), monday).await.unwrap();
        assert!(!first.replaced);
        assert_eq!(first.entry.notes.as_deref(), Some("felt steadier"));

        let second = submit(&store, wellness_draft(4), thursday).await.unwrap();
        assert!(second.replaced);
        assert_eq!(second.entry.week, first.entry.week);

        let entries = store.list_checkins().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, second.entry.id);
    }

    #[tokio::test]
    async fn week_boundary_follows_the_utc_date() {
        let store = MemoryStore::new();
        let saturday_night = Utc.with_ymd_and_hms(2026, 3, 21, 23, 30, 0).unwrap();
        let sunday_morning = Utc.with_ymd_and_hms(2026, 3, 22, 0, 30, 0).unwrap();

        let late = submit(&store, wellness_draft(3), saturday_night).await.unwrap();
        let early = submit(&store, wellness_draft(3), sunday_morning).await.unwrap();

        assert_eq!(late.entry.week, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
        assert_eq!(early.entry.week, NaiveDate::from_ymd_opt(2026, 3, 22).unwrap());
        assert!(!early.replaced);
        assert_eq!(store.list_checkins().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_drafts_never_reach_the_store() {
        let store = MemoryStore::new();
        let draft = CheckinDraft {
            responses: ResponsesDraft::Wellness(WellnessDraft::default()),
            notes: None,
        };
        let now = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();

        let err = submit(&store, draft, now).await.unwrap_err();
        assert!(err.downcast_ref::<ValidationError>().is_some());
        assert!(store.list_checkins().await.unwrap().is_empty());
    }

    #[test]
    fn recap_calls_out_wins_and_first_suggestion() {
        let responses = Responses::Symptom(SymptomResponses {
            hot_flash_count: 25,
            hot_flash_severity: 3,
            sleep_quality: 2,
            mood: 4,
            adherence: false,
        });
        let recap = weekly_recap(&responses);
        assert_eq!(recap.wins, vec!["Positive mood maintained"]);
        assert_eq!(
            recap.suggestion,
            "Try a cool bedroom (65-68°F) and avoid screens before bed"
        );
    }

    #[test]
    fn recap_always_has_a_win() {
        let responses = Responses::Wellness(WellnessResponses {
            mood: 3,
            energy: 3,
            sleep: 3,
            stress: 3,
            satisfaction: 3,
        });
        let recap = weekly_recap(&responses);
        assert_eq!(recap.wins, vec![DEFAULT_WIN]);
        assert_eq!(recap.suggestion, DEFAULT_SUGGESTION);
    }
}

use crate::models::{CheckinEntry, Metric, MetricTrend, Trend};

/// Entries per comparison window.
pub const WINDOW: usize = 3;
/// Minimum mean shift, in score points, before a metric counts as moving.
pub const THRESHOLD: f64 = 0.3;

fn mean(values: &[u8]) -> f64 {
    let total: u32 = values.iter().map(|value| u32::from(*value)).sum();
    f64::from(total) / values.len() as f64
}

fn metric_values(entries: &[CheckinEntry], metric: Metric) -> Vec<u8> {
    entries
        .iter()
        .filter_map(|entry| metric.value(&entry.responses))
        .collect()
}

/// Compares the newest three readings of `metric` against the three before
/// them. `entries` must be in ascending date order; entries that do not
/// carry the metric are skipped.
///
/// The sign convention is the same for every metric, including `Stress`.
pub fn classify_trend(entries: &[CheckinEntry], metric: Metric) -> Trend {
    let values = metric_values(entries, metric);
    if values.len() < 2 {
        return Trend::Stable;
    }

    let recent_start = values.len().saturating_sub(WINDOW);
    let prior_start = values.len().saturating_sub(WINDOW * 2);
    let recent = &values[recent_start..];
    let prior = &values[prior_start..recent_start];
    if prior.is_empty() {
        return Trend::Stable;
    }

    let diff = mean(recent) - mean(prior);
    if diff > THRESHOLD {
        Trend::Improving
    } else if diff < -THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Most recent reading of `metric`, or 0 when none exists.
pub fn latest_score(entries: &[CheckinEntry], metric: Metric) -> u8 {
    entries
        .iter()
        .rev()
        .find_map(|entry| metric.value(&entry.responses))
        .unwrap_or(0)
}

/// Trend and latest score for every tracked metric. Accepts entries in any
/// order.
pub fn analyze(entries: &[CheckinEntry]) -> Vec<MetricTrend> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date).then(a.timestamp.cmp(&b.timestamp)));

    Metric::ALL
        .iter()
        .map(|metric| MetricTrend {
            metric: *metric,
            trend: classify_trend(&sorted, *metric),
            latest_score: latest_score(&sorted, *metric),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Responses, SymptomResponses, WellnessResponses};
    use crate::streak::tests::entry_on;
    use chrono::{Duration, NaiveDate};

    fn series(moods: &[u8]) -> Vec<CheckinEntry> {
        let start = NaiveDate::from_ymd_opt(2026, 1, 4).unwrap();
        moods
            .iter()
            .enumerate()
            .map(|(week, mood)| {
                let mut entry = entry_on(start + Duration::days(week as i64 * 7));
                entry.responses = Responses::Wellness(WellnessResponses {
                    mood: *mood,
                    energy: 3,
                    sleep: 3,
                    stress: 6 - *mood,
                    satisfaction: 3,
                });
                entry
            })
            .collect()
    }

    #[test]
    fn empty_and_single_histories_are_stable() {
        assert_eq!(classify_trend(&[], Metric::Mood), Trend::Stable);
        assert_eq!(classify_trend(&series(&[5]), Metric::Mood), Trend::Stable);
        assert_eq!(latest_score(&[], Metric::Mood), 0);
    }

    #[test]
    fn no_prior_window_is_stable() {
        assert_eq!(classify_trend(&series(&[1, 3, 5]), Metric::Mood), Trend::Stable);
    }

    #[test]
    fn short_prior_window_still_compares() {
        assert_eq!(
            classify_trend(&series(&[1, 4, 4, 4]), Metric::Mood),
            Trend::Improving
        );
    }

    #[test]
    fn rising_mood_is_improving() {
        let entries = series(&[2, 2, 2, 5, 5, 5]);
        assert_eq!(classify_trend(&entries, Metric::Mood), Trend::Improving);
        assert_eq!(latest_score(&entries, Metric::Mood), 5);
    }

    #[test]
    fn falling_mood_is_declining() {
        let entries = series(&[4, 4, 4, 4, 3, 3, 3]);
        assert_eq!(classify_trend(&entries, Metric::Mood), Trend::Declining);
    }

    #[test]
    fn matching_window_means_are_stable() {
        let entries = series(&[2, 4, 3, 3, 3, 3]);
        assert_eq!(classify_trend(&entries, Metric::Mood), Trend::Stable);
    }

    #[test]
    fn only_the_last_six_readings_count() {
        let entries = series(&[5, 5, 5, 1, 1, 1, 1, 1, 1]);
        assert_eq!(classify_trend(&entries, Metric::Mood), Trend::Stable);
    }

    #[test]
    fn stress_is_not_inverted() {
        // Mood rises, so stress falls: reported as declining despite being
        // good news for a lower-is-better metric.
        let entries = series(&[2, 2, 2, 5, 5, 5]);
        assert_eq!(classify_trend(&entries, Metric::Stress), Trend::Declining);
    }

    #[test]
    fn symptom_entries_carry_no_trend_metrics() {
        let mut entries = series(&[2, 2, 2, 5, 5]);
        let mut symptom = entry_on(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        symptom.responses = Responses::Symptom(SymptomResponses {
            hot_flash_count: 4,
            hot_flash_severity: 2,
            sleep_quality: 1,
            mood: 1,
            adherence: true,
        });
        entries.push(symptom);

        assert_eq!(latest_score(&entries, Metric::Mood), 5);
        assert_eq!(classify_trend(&entries, Metric::Mood), Trend::Improving);
    }

    #[test]
    fn analyze_sorts_and_covers_every_metric() {
        let mut entries = series(&[2, 2, 2, 5, 5, 5]);
        entries.reverse();
        let trends = analyze(&entries);
        assert_eq!(trends.len(), Metric::ALL.len());
        assert_eq!(trends[0].metric, Metric::Mood);
        assert_eq!(trends[0].trend, Trend::Improving);
        assert_eq!(trends[0].latest_score, 5);
        assert_eq!(trends[1].trend, Trend::Stable);
    }

    #[test]
    fn empty_history_is_stable_everywhere() {
        assert!(analyze(&[])
            .iter()
            .all(|trend| trend.trend == Trend::Stable && trend.latest_score == 0));
    }
}

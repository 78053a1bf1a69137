use std::fmt::Write;

use chrono::NaiveDate;

use crate::checkin;
use crate::engagement::Snapshot;
use crate::models::Trend;
use crate::scoring;

fn trend_marker(trend: Trend) -> &'static str {
    match trend {
        Trend::Improving => "↑",
        Trend::Declining => "↓",
        Trend::Stable => "→",
    }
}

pub fn build_report(snapshot: &Snapshot, generated_on: NaiveDate) -> String {
    let stats = &snapshot.stats;
    let mut output = String::new();

    let _ = writeln!(output, "# Wellness Engagement Report");
    let _ = writeln!(output, "Generated on {}", generated_on);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Progress");
    let _ = writeln!(
        output,
        "- Level {} with {} points ({} to next level, {:.0}% there)",
        stats.level,
        stats.total_points,
        scoring::points_to_next_level(stats.total_points),
        scoring::level_progress(stats.total_points) * 100.0
    );
    let _ = writeln!(
        output,
        "- Check-ins: {} (current streak {} weeks, longest {} weeks)",
        stats.checkins_completed, stats.current_streak, stats.longest_streak
    );
    let _ = writeln!(
        output,
        "- This week's check-in: {}",
        if snapshot.submitted_this_week { "done" } else { "pending" }
    );
    let _ = writeln!(
        output,
        "- Community: {} pod posts, {} AMAs attended",
        stats.pod_messages, stats.amas_attended
    );
    let _ = writeln!(
        output,
        "- Daily affirmations: {}",
        if snapshot.affirmations_scheduled { "scheduled" } else { "not scheduled" }
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Badges");
    for status in snapshot.badges.iter() {
        let state = match (status.earned, status.earned_at) {
            (true, Some(at)) => format!("earned {}", at.date_naive()),
            (true, None) => "earned".to_string(),
            (false, _) => "locked".to_string(),
        };
        let _ = writeln!(
            output,
            "- {} {} ({}): {}",
            status.icon(),
            status.name(),
            state,
            status.description()
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Leaderboard");
    for entry in snapshot.leaderboard.iter() {
        let marker = if entry.is_local { " ←" } else { "" };
        let _ = writeln!(
            output,
            "{}. {} ({} points){}",
            entry.rank, entry.name, entry.points, marker
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Wellness Trends");
    if snapshot.trends.iter().all(|trend| trend.latest_score == 0) {
        let _ = writeln!(output, "No wellness check-ins recorded yet.");
    } else {
        for trend in snapshot.trends.iter() {
            let note = if trend.metric.lower_is_better() {
                " (lower is better)"
            } else {
                ""
            };
            let _ = writeln!(
                output,
                "- {}: latest {}/5, {} {}{}",
                trend.metric.label(),
                trend.latest_score,
                trend_marker(trend.trend),
                trend.trend,
                note
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Latest Check-in");
    match &snapshot.latest {
        None => {
            let _ = writeln!(output, "No check-ins recorded yet.");
        }
        Some(entry) => {
            let recap = checkin::weekly_recap(&entry.responses);
            let _ = writeln!(output, "Week of {} ({})", entry.week, entry.responses.kind());
            for win in recap.wins.iter() {
                let _ = writeln!(output, "- Win: {}", win);
            }
            let _ = writeln!(output, "- Suggestion: {}", recap.suggestion);
            if let Some(notes) = &entry.notes {
                let _ = writeln!(output, "- Notes: {}", notes);
            }
        }
    }

    output
}

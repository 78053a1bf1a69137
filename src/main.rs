use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use sqlx::postgres::PgPoolOptions;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod badges;
mod checkin;
mod config;
mod db;
mod engagement;
mod leaderboard;
mod models;
mod report;
mod scoring;
mod store;
mod streak;
mod trend;

use checkin::{CheckinDraft, ResponsesDraft, SymptomDraft, WellnessDraft};
use config::Config;
use db::PgStore;
use models::AwardSource;
use store::RecordStore;

#[derive(Parser)]
#[command(name = "wellness-engagement")]
#[command(about = "Weekly check-in streaks, points, badges and wellness trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum CheckinKind {
    Symptom,
    Wellness,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load eight weeks of demo check-ins
    Seed,
    /// Import historical check-ins from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Submit this week's check-in (replaces an earlier one from the same week)
    Checkin {
        #[arg(long, value_enum)]
        kind: CheckinKind,
        #[arg(long)]
        hot_flash_count: Option<i64>,
        #[arg(long)]
        hot_flash_severity: Option<i64>,
        #[arg(long)]
        sleep_quality: Option<i64>,
        #[arg(long)]
        adherence: Option<bool>,
        #[arg(long)]
        mood: Option<i64>,
        #[arg(long)]
        energy: Option<i64>,
        #[arg(long)]
        sleep: Option<i64>,
        #[arg(long)]
        stress: Option<i64>,
        #[arg(long)]
        satisfaction: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Count one community pod post
    LogPodPost,
    /// Count one attended AMA session
    LogAma,
    /// Mark the daily affirmation schedule as configured
    ScheduleAffirmations {
        #[arg(long)]
        off: bool,
    },
    /// Grant a badge outside the rule set
    GrantBadge { id: String },
    /// Show streaks, points, level and badges
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Show the peer leaderboard
    Leaderboard,
    /// Show per-metric wellness trends
    Trends,
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wellness_engagement=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;
    let store = PgStore::new(pool.clone());
    let peers = leaderboard::default_peers();

    match cli.command {
        Commands::InitDb => {
            db::init_db(&pool).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let count = db::seed(&store, Utc::now()).await?;
            println!("Seeded {count} weekly check-ins.");
        }
        Commands::Import { csv } => {
            let summary = db::import_csv(&store, &csv).await?;
            println!(
                "Imported {} new and {} replaced check-ins from {} ({} rejected).",
                summary.inserted,
                summary.replaced,
                csv.display(),
                summary.rejected
            );
        }
        Commands::Checkin {
            kind,
            hot_flash_count,
            hot_flash_severity,
            sleep_quality,
            adherence,
            mood,
            energy,
            sleep,
            stress,
            satisfaction,
            notes,
        } => {
            let responses = match kind {
                CheckinKind::Symptom => ResponsesDraft::Symptom(SymptomDraft {
                    hot_flash_count,
                    hot_flash_severity,
                    sleep_quality,
                    mood,
                    adherence,
                }),
                CheckinKind::Wellness => ResponsesDraft::Wellness(WellnessDraft {
                    mood,
                    energy,
                    sleep,
                    stress,
                    satisfaction,
                }),
            };
            let now = Utc::now();
            let previous = store
                .find_checkin_by_week(checkin::week_key(now.date_naive()))
                .await?;
            let outcome = checkin::submit(&store, CheckinDraft { responses, notes }, now).await?;
            let verb = if outcome.replaced { "updated" } else { "submitted" };
            println!("Check-in {verb} for the week of {}.", outcome.entry.week);
            if let Some(previous) = previous {
                println!(
                    "Replaced the {} check-in from {}.",
                    previous.responses.kind(),
                    previous.date
                );
            }

            let recap = checkin::weekly_recap(&outcome.entry.responses);
            for win in recap.wins.iter() {
                println!("- {win}");
            }
            println!("Next step: {}", recap.suggestion);
        }
        Commands::LogPodPost => {
            let counters = store.record_pod_message().await?;
            println!("Pod posts: {}.", counters.pod_messages);
        }
        Commands::LogAma => {
            let counters = store.record_ama_attended().await?;
            println!("AMAs attended: {}.", counters.amas_attended);
        }
        Commands::ScheduleAffirmations { off } => {
            store.set_affirmations_scheduled(!off).await?;
            let state = if off { "cleared" } else { "set" };
            println!("Daily affirmation schedule {state}.");
        }
        Commands::GrantBadge { id } => {
            if badges::find(&id).is_none() {
                warn!(badge = %id, "granting a badge outside the catalog");
            }
            store
                .record_badge_awards(std::slice::from_ref(&id), AwardSource::Grant, Utc::now())
                .await?;
            println!("Badge {id} granted.");
        }
        Commands::Stats { json } => {
            let snapshot =
                engagement::snapshot(&store, Utc::now(), &peers, config.trend_history_weeks)
                    .await?;
            let stats = &snapshot.stats;
            if json {
                println!("{}", serde_json::to_string_pretty(stats)?);
                return Ok(());
            }
            println!(
                "Level {} with {} points ({} to next level).",
                stats.level,
                stats.total_points,
                scoring::points_to_next_level(stats.total_points)
            );
            println!(
                "{} check-ins, current streak {} weeks, longest {} weeks.",
                stats.checkins_completed, stats.current_streak, stats.longest_streak
            );
            println!(
                "{} pod posts, {} AMAs attended.",
                stats.pod_messages, stats.amas_attended
            );
            let week = if snapshot.submitted_this_week { "done" } else { "pending" };
            println!("This week's check-in: {week}.");
            if let Some(rank) = leaderboard::local_rank(&snapshot.leaderboard) {
                println!("Leaderboard rank: {rank} of {}.", snapshot.leaderboard.len());
            }
            if snapshot.affirmations_scheduled {
                println!("Daily affirmations scheduled.");
            }
            for status in snapshot.badges.iter() {
                let mark = if status.earned { "x" } else { " " };
                println!("[{mark}] {} {}", status.icon(), status.name());
            }
        }
        Commands::Leaderboard => {
            let snapshot =
                engagement::snapshot(&store, Utc::now(), &peers, config.trend_history_weeks)
                    .await?;
            for entry in snapshot.leaderboard.iter() {
                let marker = if entry.is_local { " <- you" } else { "" };
                println!("{:>2}. {:<12} {:>5}{marker}", entry.rank, entry.name, entry.points);
            }
        }
        Commands::Trends => {
            let snapshot =
                engagement::snapshot(&store, Utc::now(), &peers, config.trend_history_weeks)
                    .await?;
            if snapshot.trends.iter().all(|trend| trend.latest_score == 0) {
                println!("No wellness check-ins recorded yet.");
                return Ok(());
            }
            for trend in snapshot.trends.iter() {
                println!(
                    "- {}: latest {}/5, {}",
                    trend.metric.label(),
                    trend.latest_score,
                    trend.trend
                );
            }
        }
        Commands::Report { out } => {
            let now = Utc::now();
            let snapshot =
                engagement::snapshot(&store, now, &peers, config.trend_history_weeks).await?;
            let report = report::build_report(&snapshot, now.date_naive());
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}

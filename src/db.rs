use std::io::Read;

use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::{debug, info, warn};

use crate::checkin::{self, ResponsesDraft, SymptomDraft, WellnessDraft};
use crate::models::{
    ActivityCounters, AwardSource, BadgeAward, CheckinEntry, Responses, WellnessResponses,
};
use crate::store::RecordStore;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Postgres-backed record store for a single local user.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CHECKIN_COLUMNS: &str =
    "id, entry_date, week, responses, notes, submitted_at FROM wellness_engagement.checkins";

fn checkin_from_row(row: &PgRow) -> anyhow::Result<CheckinEntry> {
    let Json(responses): Json<Responses> = row.try_get("responses")?;
    Ok(CheckinEntry {
        id: row.try_get("id")?,
        date: row.try_get("entry_date")?,
        week: row.try_get("week")?,
        responses,
        notes: row.try_get("notes")?,
        timestamp: row.try_get("submitted_at")?,
    })
}

fn counters_from_row(row: &PgRow) -> anyhow::Result<ActivityCounters> {
    let pod_messages: i32 = row.try_get("pod_messages")?;
    let amas_attended: i32 = row.try_get("amas_attended")?;
    Ok(ActivityCounters {
        pod_messages: u32::try_from(pod_messages).context("negative pod message count")?,
        amas_attended: u32::try_from(amas_attended).context("negative AMA count")?,
    })
}

impl RecordStore for PgStore {
    async fn list_checkins(&self) -> anyhow::Result<Vec<CheckinEntry>> {
        let query = format!("SELECT {CHECKIN_COLUMNS} ORDER BY entry_date DESC, submitted_at DESC");
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;
        rows.iter().map(checkin_from_row).collect()
    }

    async fn find_checkin_by_week(&self, week: NaiveDate) -> anyhow::Result<Option<CheckinEntry>> {
        let query = format!("SELECT {CHECKIN_COLUMNS} WHERE week = $1");
        let row = sqlx::query(&query)
            .bind(week)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(checkin_from_row).transpose()
    }

    async fn upsert_checkin(&self, entry: &CheckinEntry) -> anyhow::Result<bool> {
        // xmax is non-zero only for rows rewritten by the conflict branch.
        let row = sqlx::query(
            r#"
            INSERT INTO wellness_engagement.checkins
            (id, entry_date, week, kind, responses, notes, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (week) DO UPDATE
            SET id = EXCLUDED.id,
                entry_date = EXCLUDED.entry_date,
                kind = EXCLUDED.kind,
                responses = EXCLUDED.responses,
                notes = EXCLUDED.notes,
                submitted_at = EXCLUDED.submitted_at
            RETURNING (xmax::text <> '0') AS replaced
            "#,
        )
        .bind(entry.id)
        .bind(entry.date)
        .bind(entry.week)
        .bind(entry.responses.kind())
        .bind(Json(&entry.responses))
        .bind(entry.notes.as_deref())
        .bind(entry.timestamp)
        .fetch_one(&self.pool)
        .await?;

        let replaced: bool = row.try_get("replaced")?;
        debug!(week = %entry.week, replaced, "upserted check-in");
        Ok(replaced)
    }

    async fn counters(&self) -> anyhow::Result<ActivityCounters> {
        let row = sqlx::query(
            "SELECT pod_messages, amas_attended FROM wellness_engagement.activity WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        counters_from_row(&row)
    }

    async fn record_pod_message(&self) -> anyhow::Result<ActivityCounters> {
        let row = sqlx::query(
            r#"
            UPDATE wellness_engagement.activity
            SET pod_messages = pod_messages + 1
            WHERE id = 1
            RETURNING pod_messages, amas_attended
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        counters_from_row(&row)
    }

    async fn record_ama_attended(&self) -> anyhow::Result<ActivityCounters> {
        let row = sqlx::query(
            r#"
            UPDATE wellness_engagement.activity
            SET amas_attended = amas_attended + 1
            WHERE id = 1
            RETURNING pod_messages, amas_attended
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        counters_from_row(&row)
    }

    async fn affirmations_scheduled(&self) -> anyhow::Result<bool> {
        let row = sqlx::query(
            "SELECT affirmations_scheduled FROM wellness_engagement.activity WHERE id = 1",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.try_get("affirmations_scheduled")?)
    }

    async fn set_affirmations_scheduled(&self, scheduled: bool) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE wellness_engagement.activity SET affirmations_scheduled = $1 WHERE id = 1",
        )
        .bind(scheduled)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn badge_awards(&self) -> anyhow::Result<Vec<BadgeAward>> {
        let rows = sqlx::query(
            "SELECT badge_id, earned_at, source FROM wellness_engagement.badge_awards ORDER BY earned_at",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut awards = Vec::with_capacity(rows.len());
        for row in rows {
            let source: String = row.try_get("source")?;
            awards.push(BadgeAward {
                badge_id: row.try_get("badge_id")?,
                earned_at: row.try_get("earned_at")?,
                source: AwardSource::parse(&source)
                    .with_context(|| format!("unknown award source {source}"))?,
            });
        }
        Ok(awards)
    }

    async fn record_badge_awards(
        &self,
        badge_ids: &[String],
        source: AwardSource,
        at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        for badge_id in badge_ids {
            sqlx::query(
                r#"
                INSERT INTO wellness_engagement.badge_awards (badge_id, earned_at, source)
                VALUES ($1, $2, $3)
                ON CONFLICT (badge_id) DO NOTHING
                "#,
            )
            .bind(badge_id)
            .bind(at)
            .bind(source.as_str())
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

/// Loads eight weeks of wellness check-ins ending this week, plus some
/// community activity when the counters are still empty.
pub async fn seed<S: RecordStore>(store: &S, now: DateTime<Utc>) -> anyhow::Result<usize> {
    let moods = [2, 3, 2, 3, 3, 4, 4, 5];
    let today = now.date_naive();

    for (index, mood) in moods.iter().enumerate() {
        let weeks_ago = (moods.len() - 1 - index) as i64;
        let date = today - Duration::days(weeks_ago * 7);
        let responses = Responses::Wellness(WellnessResponses {
            mood: *mood,
            energy: (*mood).min(4),
            sleep: 3,
            stress: 6 - *mood,
            satisfaction: (*mood + 1).min(5),
        });
        let entry = checkin::build_entry(responses, None, date, noon_utc(date));
        store.upsert_checkin(&entry).await?;
    }

    if store.counters().await? == ActivityCounters::default() {
        for _ in 0..4 {
            store.record_pod_message().await?;
        }
        store.record_ama_attended().await?;
    }

    info!(checkins = moods.len(), "seed data loaded");
    Ok(moods.len())
}

fn noon_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
        .and_utc()
}

#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: NaiveDate,
    kind: String,
    hot_flash_count: Option<i64>,
    hot_flash_severity: Option<i64>,
    sleep_quality: Option<i64>,
    mood: Option<i64>,
    adherence: Option<bool>,
    energy: Option<i64>,
    sleep: Option<i64>,
    stress: Option<i64>,
    satisfaction: Option<i64>,
    notes: Option<String>,
}

impl CsvRow {
    fn draft(&self) -> anyhow::Result<ResponsesDraft> {
        match self.kind.trim() {
            "symptom" => Ok(ResponsesDraft::Symptom(SymptomDraft {
                hot_flash_count: self.hot_flash_count,
                hot_flash_severity: self.hot_flash_severity,
                sleep_quality: self.sleep_quality,
                mood: self.mood,
                adherence: self.adherence,
            })),
            "wellness" => Ok(ResponsesDraft::Wellness(WellnessDraft {
                mood: self.mood,
                energy: self.energy,
                sleep: self.sleep,
                stress: self.stress,
                satisfaction: self.satisfaction,
            })),
            other => anyhow::bail!("unknown check-in kind {other:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub replaced: usize,
    pub rejected: usize,
}

/// Upserts historical check-ins from CSV. Rows with missing answers are
/// skipped and counted; malformed CSV aborts the import.
pub async fn import_reader<R: Read, S: RecordStore>(
    store: &S,
    reader: R,
) -> anyhow::Result<ImportSummary> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut summary = ImportSummary::default();

    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("invalid CSV record {}", line + 1))?;
        let responses = match checkin::validate(&row.draft()?) {
            Ok(responses) => responses,
            Err(err) => {
                warn!(date = %row.date, %err, "skipping check-in row");
                summary.rejected += 1;
                continue;
            }
        };

        let entry = checkin::build_entry(responses, row.notes.clone(), row.date, noon_utc(row.date));
        if store.upsert_checkin(&entry).await? {
            summary.replaced += 1;
        } else {
            summary.inserted += 1;
        }
    }

    Ok(summary)
}

pub async fn import_csv<S: RecordStore>(
    store: &S,
    csv_path: &std::path::Path,
) -> anyhow::Result<ImportSummary> {
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;
    import_reader(store, file).await
}

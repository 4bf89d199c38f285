use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use uuid::Uuid;

use super::models::{ScoutReport, ScoutReportInput, User};
use super::{Datastore, Visibility};

/// Editable columns, in bind order of [`bind_fields`].
const FIELD_COLUMNS: [&str; 36] = [
    "player_id",
    "player_name",
    "player_wyscout_id",
    "match_context",
    "position_played",
    "overall_rating",
    "technique",
    "passing",
    "first_touch",
    "ball_control",
    "vision",
    "speed",
    "stamina",
    "strength",
    "jumping",
    "agility",
    "tactical_intelligence",
    "positioning",
    "concentration",
    "leadership",
    "teamwork",
    "notes",
    "strengths",
    "weaknesses",
    "recommendation",
    "contract_situation",
    "agent",
    "tags",
    "estimated_price",
    "observation_date",
    "viewing_type",
    "competition",
    "opponent",
    "result",
    "minutes_observed",
    "video_url",
];

const STAMP_COLUMNS: [&str; 7] = [
    "id",
    "created_by",
    "created_by_name",
    "created_by_email",
    "created_by_role",
    "club_id",
    "created_at",
];

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns = FIELD_COLUMNS
        .iter()
        .chain(STAMP_COLUMNS.iter())
        .copied()
        .collect::<Vec<_>>();
    let params = (1..=columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>();
    format!(
        "INSERT INTO scout_reports ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        params.join(", ")
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let n = FIELD_COLUMNS.len();
    let sets = FIELD_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = ${}", i + 1))
        .collect::<Vec<_>>();
    format!(
        "UPDATE scout_reports SET {}, updated_by = ${}, updated_by_name = ${}, updated_at = ${}
          WHERE id = ${} AND club_id IS NOT DISTINCT FROM ${}
          RETURNING *",
        sets.join(", "),
        n + 1,
        n + 2,
        n + 3,
        n + 4,
        n + 5
    )
});

// $1 = club, $2 = author; exactly one is non-null (see `Visibility::binds`).
const VISIBLE: &str = "($1::uuid IS NULL OR club_id = $1) AND ($2::uuid IS NULL OR created_by = $2)";

type ReportQuery<'q> = QueryAs<'q, Postgres, ScoutReport, PgArguments>;

fn bind_fields<'q>(q: ReportQuery<'q>, f: &ScoutReportInput) -> ReportQuery<'q> {
    q.bind(f.player_id.clone())
        .bind(f.player_name.clone())
        .bind(f.player_wyscout_id)
        .bind(f.match_context.clone())
        .bind(f.position_played.clone())
        .bind(f.overall_rating)
        .bind(f.technique)
        .bind(f.passing)
        .bind(f.first_touch)
        .bind(f.ball_control)
        .bind(f.vision)
        .bind(f.speed)
        .bind(f.stamina)
        .bind(f.strength)
        .bind(f.jumping)
        .bind(f.agility)
        .bind(f.tactical_intelligence)
        .bind(f.positioning)
        .bind(f.concentration)
        .bind(f.leadership)
        .bind(f.teamwork)
        .bind(f.notes.clone())
        .bind(f.strengths.clone())
        .bind(f.weaknesses.clone())
        .bind(f.recommendation.clone())
        .bind(f.contract_situation.clone())
        .bind(f.agent.clone())
        .bind(f.tags.clone())
        .bind(f.estimated_price)
        .bind(f.observation_date.clone())
        .bind(f.viewing_type.clone())
        .bind(f.competition.clone())
        .bind(f.opponent.clone())
        .bind(f.result.clone())
        .bind(f.minutes_observed)
        .bind(f.video_url.clone())
}

pub async fn insert(db: &Datastore, report: ScoutReport) -> Result<ScoutReport> {
    match db {
        Datastore::Postgres(pool) => {
            bind_fields(sqlx::query_as(&INSERT_SQL), &report.fields)
                .bind(report.id)
                .bind(report.created_by)
                .bind(report.created_by_name.clone())
                .bind(report.created_by_email.clone())
                .bind(report.created_by_role.clone())
                .bind(report.club_id)
                .bind(report.created_at)
                .fetch_one(pool)
                .await
                .context("inserting scout report")
        }
        Datastore::Memory(mem) => {
            mem.reports.insert(report.id, report.clone());
            Ok(report)
        }
    }
}

/// Extra narrowing on top of the visibility scope.
#[derive(Debug, Clone, Copy)]
enum ReportFilter<'a> {
    All,
    WyscoutId(i64),
    PlayerId(&'a str),
}

impl ReportFilter<'_> {
    fn sql(&self) -> &'static str {
        match self {
            ReportFilter::All => "",
            ReportFilter::WyscoutId(_) => " AND player_wyscout_id = $3",
            ReportFilter::PlayerId(_) => " AND player_id = $3",
        }
    }

    fn matches(&self, r: &ScoutReport) -> bool {
        match *self {
            ReportFilter::All => true,
            ReportFilter::WyscoutId(id) => r.fields.player_wyscout_id == Some(id),
            ReportFilter::PlayerId(id) => r.fields.player_id == id,
        }
    }
}

async fn select_visible(
    db: &Datastore,
    vis: Visibility,
    filter: ReportFilter<'_>,
) -> Result<Vec<ScoutReport>> {
    match db {
        Datastore::Postgres(pool) => {
            let sql = format!(
                "SELECT * FROM scout_reports WHERE {VISIBLE}{} ORDER BY created_at",
                filter.sql()
            );
            let (club, author) = vis.binds();
            let q: ReportQuery<'_> = sqlx::query_as(&sql).bind(club).bind(author);
            let q = match filter {
                ReportFilter::All => q,
                ReportFilter::WyscoutId(id) => q.bind(id),
                ReportFilter::PlayerId(id) => q.bind(id.to_string()),
            };
            q.fetch_all(pool).await.context("listing scout reports")
        }
        Datastore::Memory(mem) => {
            let mut out: Vec<ScoutReport> = mem
                .reports
                .iter()
                .filter(|r| vis.admits(r.club_id, r.created_by) && filter.matches(r))
                .map(|r| r.value().clone())
                .collect();
            out.sort_by_key(|r| r.created_at);
            Ok(out)
        }
    }
}

/// Every report the viewer may see, oldest first.
pub async fn list(db: &Datastore, vis: Visibility) -> Result<Vec<ScoutReport>> {
    select_visible(db, vis, ReportFilter::All).await
}

/// Visible reports about one provider player.
pub async fn by_wyscout_id(db: &Datastore, vis: Visibility, wyscout_id: i64) -> Result<Vec<ScoutReport>> {
    select_visible(db, vis, ReportFilter::WyscoutId(wyscout_id)).await
}

/// Visible reports keyed by the free-form player id they were filed under.
pub async fn by_player_id(db: &Datastore, vis: Visibility, player_id: &str) -> Result<Vec<ScoutReport>> {
    select_visible(db, vis, ReportFilter::PlayerId(player_id)).await
}

/// Replace the editable fields of a report inside `club_id`.
///
/// `None` when the report does not exist or belongs to another club.
pub async fn update(
    db: &Datastore,
    id: Uuid,
    club_id: Option<Uuid>,
    fields: ScoutReportInput,
    editor: &User,
) -> Result<Option<ScoutReport>> {
    let now = Utc::now();
    match db {
        Datastore::Postgres(pool) => bind_fields(sqlx::query_as(&UPDATE_SQL), &fields)
            .bind(editor.id)
            .bind(editor.name.clone())
            .bind(now)
            .bind(id)
            .bind(club_id)
            .fetch_optional(pool)
            .await
            .context("updating scout report"),
        Datastore::Memory(mem) => {
            let Some(mut report) = mem.reports.get_mut(&id) else {
                return Ok(None);
            };
            if report.club_id != club_id {
                return Ok(None);
            }
            report.fields = fields;
            report.updated_by = Some(editor.id);
            report.updated_by_name = Some(editor.name.clone());
            report.updated_at = Some(now);
            Ok(Some(report.value().clone()))
        }
    }
}

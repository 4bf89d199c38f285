use anyhow::{Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::QueryAs;
use uuid::Uuid;

use super::models::{PlayerProfile, PlayerProfileInput, User};
use super::{Datastore, Visibility};

/// Columns an edit may change; `wyscout_id` is fixed at creation.
const EDITABLE_COLUMNS: [&str; 17] = [
    "player_name",
    "position",
    "current_team",
    "age",
    "nationality",
    "height",
    "weight",
    "foot",
    "image_url",
    "position_analysis",
    "general_info",
    "strengths",
    "weaknesses",
    "agent_name",
    "agent_contact",
    "video_link",
    "transfermarkt_link",
];

static INSERT_SQL: Lazy<String> = Lazy::new(|| {
    let columns = EDITABLE_COLUMNS
        .iter()
        .copied()
        .chain([
            "wyscout_id",
            "id",
            "player_id",
            "club_id",
            "created_by",
            "created_by_name",
            "updated_by",
            "updated_by_name",
            "created_at",
            "updated_at",
        ])
        .collect::<Vec<_>>();
    let params = (1..=columns.len())
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>();
    format!(
        "INSERT INTO player_profiles ({}) VALUES ({}) RETURNING *",
        columns.join(", "),
        params.join(", ")
    )
});

static UPDATE_SQL: Lazy<String> = Lazy::new(|| {
    let n = EDITABLE_COLUMNS.len();
    let sets = EDITABLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{c} = ${}", i + 1))
        .collect::<Vec<_>>();
    format!(
        "UPDATE player_profiles SET {}, updated_by = ${}, updated_by_name = ${}, updated_at = ${}
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

type ProfileQuery<'q> = QueryAs<'q, Postgres, PlayerProfile, PgArguments>;

fn bind_editable<'q>(q: ProfileQuery<'q>, f: &PlayerProfileInput) -> ProfileQuery<'q> {
    q.bind(f.player_name.clone())
        .bind(f.position.clone())
        .bind(f.current_team.clone())
        .bind(f.age)
        .bind(f.nationality.clone())
        .bind(f.height)
        .bind(f.weight)
        .bind(f.foot.clone())
        .bind(f.image_url.clone())
        .bind(f.position_analysis.clone())
        .bind(f.general_info.clone())
        .bind(f.strengths.clone())
        .bind(f.weaknesses.clone())
        .bind(f.agent_name.clone())
        .bind(f.agent_contact.clone())
        .bind(f.video_link.clone())
        .bind(f.transfermarkt_link.clone())
}

/// Visible profiles, most recently edited first.
pub async fn list(db: &Datastore, vis: Visibility) -> Result<Vec<PlayerProfile>> {
    match db {
        Datastore::Postgres(pool) => {
            let (club, author) = vis.binds();
            sqlx::query_as::<_, PlayerProfile>(
                "SELECT * FROM player_profiles
                  WHERE ($1::uuid IS NULL OR club_id = $1)
                    AND ($2::uuid IS NULL OR created_by = $2)
                  ORDER BY updated_at DESC",
            )
            .bind(club)
            .bind(author)
            .fetch_all(pool)
            .await
            .context("listing player profiles")
        }
        Datastore::Memory(mem) => {
            let mut out: Vec<PlayerProfile> = mem
                .profiles
                .iter()
                .filter(|p| vis.admits(p.club_id, p.created_by))
                .map(|p| p.value().clone())
                .collect();
            out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(out)
        }
    }
}

pub async fn get(db: &Datastore, id: Uuid, club_id: Option<Uuid>) -> Result<Option<PlayerProfile>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, PlayerProfile>(
            "SELECT * FROM player_profiles WHERE id = $1 AND club_id IS NOT DISTINCT FROM $2",
        )
        .bind(id)
        .bind(club_id)
        .fetch_optional(pool)
        .await
        .context("fetching player profile"),
        Datastore::Memory(mem) => Ok(mem
            .profiles
            .get(&id)
            .filter(|p| p.club_id == club_id)
            .map(|p| p.value().clone())),
    }
}

pub async fn insert(db: &Datastore, profile: PlayerProfile) -> Result<PlayerProfile> {
    match db {
        Datastore::Postgres(pool) => bind_editable(sqlx::query_as(&INSERT_SQL), &profile.fields)
            .bind(profile.fields.wyscout_id)
            .bind(profile.id)
            .bind(profile.player_id)
            .bind(profile.club_id)
            .bind(profile.created_by)
            .bind(profile.created_by_name.clone())
            .bind(profile.updated_by)
            .bind(profile.updated_by_name.clone())
            .bind(profile.created_at)
            .bind(profile.updated_at)
            .fetch_one(pool)
            .await
            .context("inserting player profile"),
        Datastore::Memory(mem) => {
            mem.profiles.insert(profile.id, profile.clone());
            Ok(profile)
        }
    }
}

/// Overwrite the editable fields of a profile inside `club_id`.
pub async fn update(
    db: &Datastore,
    id: Uuid,
    club_id: Option<Uuid>,
    fields: PlayerProfileInput,
    editor: &User,
) -> Result<Option<PlayerProfile>> {
    let now = Utc::now();
    match db {
        Datastore::Postgres(pool) => bind_editable(sqlx::query_as(&UPDATE_SQL), &fields)
            .bind(editor.id)
            .bind(editor.name.clone())
            .bind(now)
            .bind(id)
            .bind(club_id)
            .fetch_optional(pool)
            .await
            .context("updating player profile"),
        Datastore::Memory(mem) => {
            let Some(mut profile) = mem.profiles.get_mut(&id) else {
                return Ok(None);
            };
            if profile.club_id != club_id {
                return Ok(None);
            }
            let wyscout_id = profile.fields.wyscout_id;
            profile.fields = PlayerProfileInput { wyscout_id, ..fields };
            profile.updated_by = editor.id;
            profile.updated_by_name = editor.name.clone();
            profile.updated_at = now;
            Ok(Some(profile.value().clone()))
        }
    }
}

/// `true` when a profile of `club_id` was removed.
pub async fn delete(db: &Datastore, id: Uuid, club_id: Option<Uuid>) -> Result<bool> {
    match db {
        Datastore::Postgres(pool) => {
            let res = sqlx::query(
                "DELETE FROM player_profiles WHERE id = $1 AND club_id IS NOT DISTINCT FROM $2",
            )
            .bind(id)
            .bind(club_id)
            .execute(pool)
            .await
            .context("deleting player profile")?;
            Ok(res.rows_affected() > 0)
        }
        Datastore::Memory(mem) => Ok(mem
            .profiles
            .remove_if(&id, |_, p| p.club_id == club_id)
            .is_some()),
    }
}

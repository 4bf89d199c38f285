use anyhow::{Context, Result};
use uuid::Uuid;

use super::models::ManualPlayer;
use super::Datastore;

pub async fn insert(db: &Datastore, player: ManualPlayer) -> Result<ManualPlayer> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, ManualPlayer>(
            "INSERT INTO players
                 (id, wyscout_id, first_name, last_name, name, birth_date, birth_area,
                  passport_area, age, height, weight, foot, position, current_team_name,
                  current_team_area, contract_expiration, market_value, agent, image_url,
                  notes, source, manually_created, organization_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                     $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)
             RETURNING *",
        )
        .bind(player.id)
        .bind(player.wyscout_id)
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.name)
        .bind(player.birth_date)
        .bind(&player.birth_area)
        .bind(&player.passport_area)
        .bind(player.age)
        .bind(player.height)
        .bind(player.weight)
        .bind(&player.foot)
        .bind(&player.position)
        .bind(&player.current_team_name)
        .bind(&player.current_team_area)
        .bind(&player.contract_expiration)
        .bind(player.market_value)
        .bind(&player.agent)
        .bind(&player.image_url)
        .bind(&player.notes)
        .bind(&player.source)
        .bind(player.manually_created)
        .bind(player.organization_id)
        .bind(player.created_at)
        .fetch_one(pool)
        .await
        .context("inserting manual player"),
        Datastore::Memory(mem) => {
            mem.players.insert(player.id, player.clone());
            Ok(player)
        }
    }
}

/// Manually created players, restricted to `organization` when given.
pub async fn list_manual(db: &Datastore, organization: Option<Uuid>) -> Result<Vec<ManualPlayer>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, ManualPlayer>(
            "SELECT * FROM players
              WHERE manually_created
                AND ($1::uuid IS NULL OR organization_id = $1)
              ORDER BY created_at DESC",
        )
        .bind(organization)
        .fetch_all(pool)
        .await
        .context("listing manual players"),
        Datastore::Memory(mem) => {
            let mut out: Vec<ManualPlayer> = mem
                .players
                .iter()
                .filter(|p| p.manually_created)
                .filter(|p| organization.is_none() || p.organization_id == organization)
                .map(|p| p.value().clone())
                .collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }
    }
}

/// Existing player row with exactly this name inside `organization`.
pub async fn find_by_name(
    db: &Datastore,
    name: &str,
    organization: Option<Uuid>,
) -> Result<Option<Uuid>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM players
              WHERE name = $1 AND organization_id IS NOT DISTINCT FROM $2
              ORDER BY created_at
              LIMIT 1",
        )
        .bind(name)
        .bind(organization)
        .fetch_optional(pool)
        .await
        .context("looking up player by name"),
        Datastore::Memory(mem) => Ok(mem
            .players
            .iter()
            .filter(|p| p.name == name && p.organization_id == organization)
            .min_by_key(|p| p.created_at)
            .map(|p| p.id)),
    }
}

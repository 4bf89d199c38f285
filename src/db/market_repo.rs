use anyhow::{Context, Result};
use uuid::Uuid;

use super::models::{Market, MarketPatch, MarketPlayer, MarketPlayerPatch};
use super::{Datastore, Visibility};

//////////////////////////////////////////////////
// Markets
//////////////////////////////////////////////////

/// Visible markets, newest first.
pub async fn list(db: &Datastore, vis: Visibility) -> Result<Vec<Market>> {
    match db {
        Datastore::Postgres(pool) => {
            let (club, author) = vis.binds();
            sqlx::query_as::<_, Market>(
                "SELECT * FROM markets
                  WHERE ($1::uuid IS NULL OR club_id = $1)
                    AND ($2::uuid IS NULL OR created_by = $2)
                  ORDER BY created_at DESC",
            )
            .bind(club)
            .bind(author)
            .fetch_all(pool)
            .await
            .context("listing markets")
        }
        Datastore::Memory(mem) => {
            let mut out: Vec<Market> = mem
                .markets
                .iter()
                .filter(|m| vis.admits(m.club_id, m.created_by))
                .map(|m| m.value().clone())
                .collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(out)
        }
    }
}

/// A market of `club_id` (`None` matches markets without a club).
pub async fn get(db: &Datastore, id: Uuid, club_id: Option<Uuid>) -> Result<Option<Market>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, Market>(
            "SELECT * FROM markets WHERE id = $1 AND club_id IS NOT DISTINCT FROM $2",
        )
        .bind(id)
        .bind(club_id)
        .fetch_optional(pool)
        .await
        .context("fetching market"),
        Datastore::Memory(mem) => Ok(mem
            .markets
            .get(&id)
            .filter(|m| m.club_id == club_id)
            .map(|m| m.value().clone())),
    }
}

pub async fn insert(db: &Datastore, market: Market) -> Result<Market> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, Market>(
            "INSERT INTO markets
                 (id, name, status, start_date, end_date, notes, club_id, created_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(market.id)
        .bind(&market.name)
        .bind(market.status)
        .bind(market.start_date)
        .bind(market.end_date)
        .bind(&market.notes)
        .bind(market.club_id)
        .bind(market.created_by)
        .bind(market.created_at)
        .fetch_one(pool)
        .await
        .context("inserting market"),
        Datastore::Memory(mem) => {
            mem.markets.insert(market.id, market.clone());
            Ok(market)
        }
    }
}

/// Apply a partial update; `None` when the market is not in `club_id`.
pub async fn update(
    db: &Datastore,
    id: Uuid,
    club_id: Option<Uuid>,
    patch: MarketPatch,
) -> Result<Option<Market>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, Market>(
            "UPDATE markets
                SET name       = COALESCE($3, name),
                    status     = COALESCE($4, status),
                    start_date = COALESCE($5, start_date),
                    end_date   = COALESCE($6, end_date),
                    notes      = COALESCE($7, notes)
              WHERE id = $1 AND club_id IS NOT DISTINCT FROM $2
              RETURNING *",
        )
        .bind(id)
        .bind(club_id)
        .bind(patch.name)
        .bind(patch.status)
        .bind(patch.start_date)
        .bind(patch.end_date)
        .bind(patch.notes)
        .fetch_optional(pool)
        .await
        .context("updating market"),
        Datastore::Memory(mem) => {
            let Some(mut market) = mem.markets.get_mut(&id) else {
                return Ok(None);
            };
            if market.club_id != club_id {
                return Ok(None);
            }
            market.apply(patch);
            Ok(Some(market.value().clone()))
        }
    }
}

//////////////////////////////////////////////////
// Market players
//////////////////////////////////////////////////

/// Players tracked in one market, most recently added first.
pub async fn players(db: &Datastore, market_id: Uuid) -> Result<Vec<MarketPlayer>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, MarketPlayer>(
            "SELECT * FROM market_players WHERE market_id = $1 ORDER BY added_date DESC",
        )
        .bind(market_id)
        .fetch_all(pool)
        .await
        .context("listing market players"),
        Datastore::Memory(mem) => {
            let mut out: Vec<MarketPlayer> = mem
                .market_players
                .iter()
                .filter(|p| p.market_id == market_id)
                .map(|p| p.value().clone())
                .collect();
            out.sort_by(|a, b| b.added_date.cmp(&a.added_date));
            Ok(out)
        }
    }
}

pub async fn add_player(db: &Datastore, player: MarketPlayer) -> Result<MarketPlayer> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, MarketPlayer>(
            "INSERT INTO market_players
                 (id, market_id, player_id, player_name, player_type, status, priority,
                  estimated_price, max_price, position, age, current_team, notes,
                  added_by, added_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING *",
        )
        .bind(player.id)
        .bind(player.market_id)
        .bind(&player.player_id)
        .bind(&player.player_name)
        .bind(player.player_type)
        .bind(player.status)
        .bind(player.priority)
        .bind(player.estimated_price)
        .bind(player.max_price)
        .bind(&player.position)
        .bind(player.age)
        .bind(&player.current_team)
        .bind(&player.notes)
        .bind(player.added_by)
        .bind(player.added_date)
        .fetch_one(pool)
        .await
        .context("adding market player"),
        Datastore::Memory(mem) => {
            mem.market_players.insert(player.id, player.clone());
            Ok(player)
        }
    }
}

/// Partial update of a tracked player whose market belongs to `club_id`.
pub async fn update_player(
    db: &Datastore,
    id: Uuid,
    club_id: Option<Uuid>,
    patch: MarketPlayerPatch,
) -> Result<Option<MarketPlayer>> {
    match db {
        Datastore::Postgres(pool) => sqlx::query_as::<_, MarketPlayer>(
            "UPDATE market_players mp
                SET status          = COALESCE($3, mp.status),
                    priority        = COALESCE($4, mp.priority),
                    estimated_price = COALESCE($5, mp.estimated_price),
                    max_price       = COALESCE($6, mp.max_price),
                    position        = COALESCE($7, mp.position),
                    current_team    = COALESCE($8, mp.current_team),
                    notes           = COALESCE($9, mp.notes)
               FROM markets m
              WHERE mp.id = $1
                AND m.id = mp.market_id
                AND m.club_id IS NOT DISTINCT FROM $2
              RETURNING mp.*",
        )
        .bind(id)
        .bind(club_id)
        .bind(patch.status)
        .bind(patch.priority)
        .bind(patch.estimated_price)
        .bind(patch.max_price)
        .bind(patch.position)
        .bind(patch.current_team)
        .bind(patch.notes)
        .fetch_optional(pool)
        .await
        .context("updating market player"),
        Datastore::Memory(mem) => {
            let market_id = match mem.market_players.get(&id) {
                Some(p) => p.market_id,
                None => return Ok(None),
            };
            let in_club = mem
                .markets
                .get(&market_id)
                .is_some_and(|m| m.club_id == club_id);
            if !in_club {
                return Ok(None);
            }
            Ok(mem.market_players.get_mut(&id).map(|mut p| {
                p.apply(patch);
                p.value().clone()
            }))
        }
    }
}

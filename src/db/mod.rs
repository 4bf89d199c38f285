//! Persistence: a Postgres pool, or an in-process store when no database is
//! configured (local runs and tests).

pub mod market_repo;
pub mod models;
pub mod player_repo;
pub mod profile_repo;
pub mod report_repo;
pub mod user_repo;

use std::sync::Arc;

use anyhow::{Context, Result};
use dashmap::DashMap;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Settings;
use models::{Market, MarketPlayer, ManualPlayer, PlayerProfile, ScoutReport, User};

/// Tables of the in-process store, keyed by row id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub users: DashMap<Uuid, User>,
    pub reports: DashMap<Uuid, ScoutReport>,
    pub markets: DashMap<Uuid, Market>,
    pub market_players: DashMap<Uuid, MarketPlayer>,
    pub players: DashMap<Uuid, ManualPlayer>,
    pub profiles: DashMap<Uuid, PlayerProfile>,
}

#[derive(Debug, Clone)]
pub enum Datastore {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Datastore {
    /// Connect and migrate when `DATABASE_URL` is set, otherwise fall back
    /// to the in-process store.
    pub async fn connect(settings: &Settings) -> Result<Self> {
        let Some(url) = settings.database_url.as_deref() else {
            log::warn!("DATABASE_URL not set; using the in-memory store (data is lost on restart)");
            return Ok(Self::memory());
        };

        let pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .connect(url)
            .await
            .context("connecting to Postgres")?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        log::info!("connected to Postgres");
        Ok(Datastore::Postgres(pool))
    }

    pub fn memory() -> Self {
        Datastore::Memory(Arc::new(MemoryStore::default()))
    }

    pub fn is_persistent(&self) -> bool {
        matches!(self, Datastore::Postgres(_))
    }

    /// Round-trip to the database; always succeeds for the memory store.
    pub async fn ping(&self) -> Result<()> {
        match self {
            Datastore::Postgres(pool) => {
                sqlx::query("SELECT 1")
                    .execute(pool)
                    .await
                    .context("pinging Postgres")?;
                Ok(())
            }
            Datastore::Memory(_) => Ok(()),
        }
    }
}

/// Which rows of the shared tables a user may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Everything belonging to the club.
    Club(Uuid),
    /// Only rows the user authored.
    Author(Uuid),
}

impl Visibility {
    pub fn for_user(user: &User) -> Self {
        match user.club_id {
            Some(club) if user.role().sees_whole_club() => Visibility::Club(club),
            _ => Visibility::Author(user.id),
        }
    }

    pub fn admits(&self, club_id: Option<Uuid>, author: Uuid) -> bool {
        match *self {
            Visibility::Club(club) => club_id == Some(club),
            Visibility::Author(user) => author == user,
        }
    }

    /// `(club, author)` bind pair: exactly one side is set.
    pub(crate) fn binds(&self) -> (Option<Uuid>, Option<Uuid>) {
        match *self {
            Visibility::Club(club) => (Some(club), None),
            Visibility::Author(user) => (None, Some(user)),
        }
    }
}

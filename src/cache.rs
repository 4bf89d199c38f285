//! In-memory competition-name cache.
//!
//! Maps provider competition ids to display names. Entries are written once
//! and live for the whole process: no TTL, no eviction, no size bound. Names
//! change rarely, but every distinct id seen adds an entry, so memory grows
//! with the number of ids requested ([`CompetitionNames::len`] exposes it).

use dashmap::DashMap;

use crate::metrics::COMPETITION_CACHE;
use crate::provider::normalize::UNKNOWN_COMPETITION;
use crate::provider::{ProviderClient, ProviderResult};

#[derive(Debug, Default)]
pub struct CompetitionNames {
    names: DashMap<i64, String>,
}

impl CompetitionNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached name for `id`, without touching the provider.
    pub fn get(&self, id: i64) -> Option<String> {
        self.names.get(&id).map(|e| e.value().clone())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a competition name, asking the provider only on a miss.
    ///
    /// Failed lookups are not cached so a later request can still fill the
    /// entry. Concurrent misses for one id may both fetch; the first stored
    /// name wins and is what every caller gets back afterwards.
    pub async fn resolve(&self, client: &ProviderClient, id: i64) -> ProviderResult<String> {
        if let Some(name) = self.get(id) {
            COMPETITION_CACHE.with_label_values(&["hit"]).inc();
            return Ok(name);
        }
        COMPETITION_CACHE.with_label_values(&["miss"]).inc();

        let competition = client.competition(id).await?;
        let name = competition
            .name
            .unwrap_or_else(|| UNKNOWN_COMPETITION.to_string());
        let stored = self.names.entry(id).or_insert(name).value().clone();
        log::info!("cached competition {id}: {stored}");
        Ok(stored)
    }
}

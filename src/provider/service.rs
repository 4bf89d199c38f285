//! Composite fetches that walk several provider resources for one response.
//!
//! These are the read paths that prefer a partial answer over a failure:
//! each sub-fetch is matched individually and replaced by a placeholder when
//! it fails, while the primary fetch (if any) still propagates its error.

use std::collections::HashMap;

use chrono::Utc;
use futures_util::join;
use serde::Deserialize;

use super::normalize::{self, UNKNOWN, UNKNOWN_COMPETITION, UNKNOWN_TEAM};
use super::types::{CareerEntry, PlayerProfileView, RecentMatch, SmartSearchResults, TeamProfileView};
use super::{ProviderClient, ProviderResult};
use crate::cache::CompetitionNames;
use crate::config::SeasonThresholds;

const SMART_SEARCH_TEAMS: usize = 5;
const SMART_SEARCH_PLAYERS: usize = 10;

async fn team_name(client: &ProviderClient, team_id: Option<i64>) -> String {
    let Some(id) = team_id else {
        return UNKNOWN_TEAM.to_string();
    };
    match client.team_name(id).await {
        Ok(Some(name)) => name,
        Ok(None) => UNKNOWN_TEAM.to_string(),
        Err(e) => {
            log::warn!("team {id} lookup failed: {e}");
            UNKNOWN_TEAM.to_string()
        }
    }
}

/// Cached competition name, or `fallback(id)` when the lookup fails.
async fn competition_name(
    client: &ProviderClient,
    cache: &CompetitionNames,
    competition_id: Option<i64>,
    missing: &str,
    fallback: impl Fn(i64) -> String,
) -> String {
    let Some(id) = competition_id.filter(|id| *id != 0) else {
        return missing.to_string();
    };
    match cache.resolve(client, id).await {
        Ok(name) => name,
        Err(e) => {
            log::warn!("competition {id} lookup failed: {e}");
            fallback(id)
        }
    }
}

/// Career timeline for a player, newest season first.
///
/// Fails only when the career resource itself cannot be fetched; team and
/// competition names degrade to sentinels per entry.
pub async fn career_timeline(
    client: &ProviderClient,
    cache: &CompetitionNames,
    player_id: i64,
    seasons: &SeasonThresholds,
) -> ProviderResult<Vec<CareerEntry>> {
    let raw = client.player_career(player_id).await?;

    let mut timeline = Vec::new();
    for entry in normalize::recent_played(&raw.career) {
        let (team, competition) = join!(
            team_name(client, entry.team_id),
            competition_name(client, cache, entry.competition_id, UNKNOWN_COMPETITION, |_| {
                UNKNOWN_COMPETITION.to_string()
            }),
        );
        timeline.push(normalize::career_entry(entry, team, competition, seasons));
    }

    normalize::sort_newest_first(&mut timeline);
    log::debug!("career for {player_id}: {} entries", timeline.len());
    Ok(timeline)
}

/// A player's most recent matches with decomposed labels.
pub async fn recent_matches(
    client: &ProviderClient,
    cache: &CompetitionNames,
    player_id: i64,
    limit: usize,
) -> ProviderResult<Vec<RecentMatch>> {
    let matches = client.player_matches_list(player_id).await?.into_matches();

    // One lookup per competition per call; failures are not cached upstream.
    let mut seen: HashMap<Option<i64>, String> = HashMap::new();
    let mut out = Vec::with_capacity(limit.min(matches.len()));
    for m in matches.iter().take(limit) {
        let competition = match seen.get(&m.competition_id) {
            Some(name) => name.clone(),
            None => {
                let name = competition_name(client, cache, m.competition_id, UNKNOWN, |id| {
                    format!("Competition {id}")
                })
                .await;
                seen.insert(m.competition_id, name.clone());
                name
            }
        };
        out.push(normalize::recent_match(m, competition));
    }
    Ok(out)
}

/// Full player dossier. Never fails: every section degrades independently.
pub async fn player_profile(
    client: &ProviderClient,
    cache: &CompetitionNames,
    player_id: i64,
    seasons: &SeasonThresholds,
) -> PlayerProfileView {
    let (basic, career, transfers) = join!(
        client.player(player_id, Some("currentTeam")),
        career_timeline(client, cache, player_id, seasons),
        client.player_transfers(player_id),
    );

    let basic_info = basic.unwrap_or_else(|e| {
        log::warn!("player {player_id} basic info unavailable: {e}");
        normalize::placeholder_player(player_id)
    });
    let career = career
        .map_err(|e| log::warn!("player {player_id} career unavailable: {e}"))
        .ok();
    let transfers = transfers
        .map_err(|e| log::warn!("player {player_id} transfers unavailable: {e}"))
        .ok();

    PlayerProfileView {
        contract_info: Some(normalize::contract_info(&basic_info)),
        basic_info,
        career,
        recent_matches: None,
        transfers,
    }
}

/// Team dossier; the team itself must load, squad and matches may not.
pub async fn team_profile(client: &ProviderClient, team_id: i64) -> ProviderResult<TeamProfileView> {
    let (team, squad, matches) = join!(
        client.team(team_id),
        client.team_squad_raw(team_id),
        client.team_matches(team_id),
    );
    Ok(TeamProfileView {
        basic_info: team?,
        squad: squad.ok(),
        recent_matches: matches.ok(),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Teams,
    Players,
}

impl SearchScope {
    fn teams(self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Teams)
    }

    fn players(self) -> bool {
        matches!(self, SearchScope::All | SearchScope::Players)
    }
}

/// Free-text search over teams and players; a failing branch comes back empty.
pub async fn smart_search(
    client: &ProviderClient,
    query: &str,
    scope: SearchScope,
) -> SmartSearchResults {
    let today = Utc::now().date_naive();
    let mut results = SmartSearchResults::default();

    if scope.teams() {
        match client.search_teams(query, None).await {
            Ok(teams) => {
                results.teams = teams
                    .into_iter()
                    .take(SMART_SEARCH_TEAMS)
                    .filter_map(normalize::team)
                    .collect();
            }
            Err(e) => log::warn!("team search for {query:?} failed: {e}"),
        }
    }

    if scope.players() {
        match client.search_players(query, None).await {
            Ok(players) => {
                results.players = players
                    .into_iter()
                    .take(SMART_SEARCH_PLAYERS)
                    .map(|p| normalize::search_player(p, today))
                    .collect();
            }
            Err(e) => log::warn!("player search for {query:?} failed: {e}"),
        }
    }

    results
}

//! Wire shapes returned by the provider's `/v3` REST API.
//!
//! The provider omits fields freely, so everything is optional or defaulted;
//! defaults and sentinels are applied later in [`super::normalize`].

use serde::Deserialize;

/// Any nested `{ "name": .., "wyId": .. }` reference (area, role, team...).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Named {
    #[serde(default)]
    pub wy_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Area {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub alpha2code: Option<String>,
    #[serde(default)]
    pub alpha3code: Option<String>,
}

/// `/v3/areas` answers either a bare list or `{ "areas": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AreasEnvelope {
    Bare(Vec<Area>),
    Wrapped {
        #[serde(default)]
        areas: Vec<Area>,
    },
}

impl AreasEnvelope {
    pub fn into_vec(self) -> Vec<Area> {
        match self {
            AreasEnvelope::Bare(v) | AreasEnvelope::Wrapped { areas: v } => v,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    #[serde(default)]
    pub wy_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub division_level: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompetitionsEnvelope {
    #[serde(default)]
    pub competitions: Vec<Competition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(default)]
    pub wy_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub area: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TeamsEnvelope {
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub wy_id: Option<i64>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub role: Option<Named>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub passport_area: Option<Named>,
    #[serde(default)]
    pub current_team: Option<Named>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SquadEnvelope {
    #[serde(default)]
    pub squad: Vec<Player>,
    #[serde(default)]
    pub team: Option<Named>,
}

/// `/v3/search` answers a bare list, or wraps hits under the object type
/// (`players` / `teams`) or a generic `data` key.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchEnvelope<T> {
    Bare(Vec<T>),
    Wrapped {
        players: Option<Vec<T>>,
        teams: Option<Vec<T>>,
        data: Option<Vec<T>>,
    },
}

impl<T> SearchEnvelope<T> {
    pub fn into_players(self) -> Vec<T> {
        match self {
            SearchEnvelope::Bare(v) => v,
            SearchEnvelope::Wrapped { players, data, .. } => {
                players.or(data).unwrap_or_default()
            }
        }
    }

    pub fn into_teams(self) -> Vec<T> {
        match self {
            SearchEnvelope::Bare(v) => v,
            SearchEnvelope::Wrapped { teams, data, .. } => teams.or(data).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub match_id: Option<i64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub competition_id: Option<i64>,
}

/// Match lists come wrapped (`{ "matches": [...] }`) or, from some player
/// endpoints, bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MatchesEnvelope {
    Bare(Vec<Match>),
    Wrapped {
        #[serde(default)]
        matches: Vec<Match>,
        #[serde(default)]
        competition: Option<Named>,
    },
}

impl MatchesEnvelope {
    pub fn competition_name(&self) -> Option<&str> {
        match self {
            MatchesEnvelope::Wrapped { competition, .. } => {
                competition.as_ref().and_then(|c| c.name.as_deref())
            }
            MatchesEnvelope::Bare(_) => None,
        }
    }

    pub fn into_matches(self) -> Vec<Match> {
        match self {
            MatchesEnvelope::Bare(matches) | MatchesEnvelope::Wrapped { matches, .. } => matches,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerEntry {
    #[serde(default)]
    pub team_id: Option<i64>,
    #[serde(default)]
    pub competition_id: Option<i64>,
    #[serde(default)]
    pub season_id: Option<i64>,
    #[serde(default)]
    pub appearances: i64,
    #[serde(default)]
    pub goal: i64,
    #[serde(default)]
    pub minutes_played: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CareerEnvelope {
    #[serde(default)]
    pub career: Vec<CareerEntry>,
}

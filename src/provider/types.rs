//! Flat response records served to API clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub alpha2_code: Option<String>,
    pub alpha3_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub id: i64,
    pub name: String,
    pub area_name: String,
    pub format: String,
    pub gender: String,
    pub division_level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub official_name: Option<String>,
    pub city: Option<String>,
    pub area_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSearchResult {
    /// Provider id rendered as a string (empty when the provider omitted it).
    pub id: String,
    pub name: String,
    pub position: String,
    pub team: String,
    pub wyscout_id: Option<i64>,
    pub age: Option<u32>,
    pub nationality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: i64,
    pub label: String,
    pub date: String,
    pub status: String,
    pub competition_name: Option<String>,
}

/// One row of a player's career timeline, newest season first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerEntry {
    pub period: String,
    pub season_year: i32,
    pub team_name: String,
    pub team_city: String,
    pub team_country: String,
    pub appearances: i64,
    pub goals: i64,
    pub minutes_played: i64,
    pub competition: String,
    pub avg_minutes_per_game: i64,
}

/// A player's match reshaped from the provider's combined label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentMatch {
    pub match_id: i64,
    pub date: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub result: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SmartSearchResults {
    pub teams: Vec<Team>,
    pub players: Vec<PlayerSearchResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub team: String,
    pub team_id: Option<i64>,
    pub contract_expires: Option<String>,
    pub market_value: Option<serde_json::Value>,
    pub jersey_number: Option<serde_json::Value>,
}

/// Composite player dossier; every section but `basic_info` may be null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerProfileView {
    pub basic_info: serde_json::Value,
    pub career: Option<Vec<CareerEntry>>,
    pub recent_matches: Option<Vec<RecentMatch>>,
    pub transfers: Option<serde_json::Value>,
    pub contract_info: Option<ContractInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamProfileView {
    pub basic_info: serde_json::Value,
    pub squad: Option<serde_json::Value>,
    pub recent_matches: Option<serde_json::Value>,
}

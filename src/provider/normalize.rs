//! Pure reshaping of provider payloads into flat response records.
//!
//! Nothing here performs I/O. Missing upstream fields degrade to sentinels
//! instead of errors; records that lack an identifier or a name entirely are
//! dropped because they cannot be addressed by clients.

use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use super::raw;
use super::types::{
    Area, CareerEntry, Competition, ContractInfo, MatchSummary, PlayerSearchResult, RecentMatch,
    Team,
};
use crate::config::SeasonThresholds;

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_TEAM: &str = "Unknown team";
pub const UNKNOWN_COMPETITION: &str = "Unknown competition";

fn or_unknown(v: Option<String>) -> String {
    v.unwrap_or_else(|| UNKNOWN.to_string())
}

fn name_of(n: Option<&raw::Named>) -> Option<String> {
    n.and_then(|n| n.name.clone())
}

//////////////////////////////////////////////////
// Hierarchy: areas → competitions → teams → players
//////////////////////////////////////////////////

/// Areas sorted by name (ascending, case-sensitive).
pub fn areas(raw: Vec<raw::Area>) -> Vec<Area> {
    let mut out: Vec<Area> = raw
        .into_iter()
        .filter_map(|a| {
            Some(Area {
                id: a.id?,
                name: a.name?,
                alpha2_code: a.alpha2code,
                alpha3_code: a.alpha3code,
            })
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Competitions of one area, sorted by name.
pub fn competitions(raw: Vec<raw::Competition>, area_name: &str) -> Vec<Competition> {
    let mut out: Vec<Competition> = raw
        .into_iter()
        .filter_map(|c| {
            Some(Competition {
                id: c.wy_id?,
                name: c.name?,
                area_name: area_name.to_string(),
                format: or_unknown(c.format),
                gender: or_unknown(c.gender),
                division_level: c.division_level.unwrap_or(0),
            })
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

pub fn team(raw: raw::Team) -> Option<Team> {
    Some(Team {
        id: raw.wy_id?,
        name: raw.name?,
        official_name: raw.official_name,
        city: raw.city,
        area_name: name_of(raw.area.as_ref()),
    })
}

/// Teams sorted by name.
pub fn teams(raw: Vec<raw::Team>) -> Vec<Team> {
    let mut out: Vec<Team> = raw.into_iter().filter_map(team).collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

fn player(raw: raw::Player, team: String, today: NaiveDate) -> PlayerSearchResult {
    PlayerSearchResult {
        id: raw.wy_id.map(|id| id.to_string()).unwrap_or_default(),
        name: or_unknown(raw.short_name),
        position: or_unknown(name_of(raw.role.as_ref())),
        team,
        wyscout_id: raw.wy_id,
        age: raw.birth_date.as_deref().and_then(|b| age_on(b, today)),
        nationality: Some(or_unknown(name_of(raw.passport_area.as_ref()))),
    }
}

/// A team's squad, sorted by position label.
pub fn squad(raw: raw::SquadEnvelope, today: NaiveDate) -> Vec<PlayerSearchResult> {
    let team = or_unknown(name_of(raw.team.as_ref()));
    let mut out: Vec<PlayerSearchResult> = raw
        .squad
        .into_iter()
        .map(|p| player(p, team.clone(), today))
        .collect();
    out.sort_by(|a, b| a.position.cmp(&b.position));
    out
}

/// A free-text search hit; the team comes from the player's current club.
pub fn search_player(raw: raw::Player, today: NaiveDate) -> PlayerSearchResult {
    let team = or_unknown(name_of(raw.current_team.as_ref()));
    player(raw, team, today)
}

/// First `limit` matches in upstream order, tagged with the competition name.
pub fn matches(raw: raw::MatchesEnvelope, limit: usize) -> Vec<MatchSummary> {
    let competition_name = raw.competition_name().map(str::to_string);
    raw.into_matches()
        .into_iter()
        .take(limit)
        .filter_map(|m| {
            Some(MatchSummary {
                id: m.match_id?,
                label: or_unknown(m.label),
                date: or_unknown(m.date),
                status: or_unknown(m.status),
                competition_name: competition_name.clone(),
            })
        })
        .collect()
}

//////////////////////////////////////////////////
// Derived fields
//////////////////////////////////////////////////

/// Age in whole years on `today` for a `YYYY-MM-DD` birth date.
///
/// Malformed dates and birth dates after `today` yield `None`.
pub fn age_on(birth_date: &str, today: NaiveDate) -> Option<u32> {
    let birth = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d").ok()?;
    years_between(birth, today)
}

/// Completed years from `birth` to `today`; `None` if `birth` is later.
pub fn years_between(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Date part of a provider timestamp (`"2024-05-01 18:00:00"` → `"2024-05-01"`).
pub fn match_date(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(d) if !d.is_empty() => d.split(' ').next().unwrap_or(d).to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Structured view of a `"<home> - <away>, <h>-<a>"` match label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchLabel {
    pub home: String,
    pub away: String,
    pub result: String,
    pub home_score: u32,
    pub away_score: u32,
}

impl MatchLabel {
    fn unknown() -> Self {
        MatchLabel {
            home: UNKNOWN.to_string(),
            away: UNKNOWN.to_string(),
            result: "0-0".to_string(),
            home_score: 0,
            away_score: 0,
        }
    }

    /// Lossy parse: any deviation from the expected shape yields the
    /// `Unknown`/`0-0` sentinel rather than an error.
    pub fn parse(label: &str) -> Self {
        Self::try_parse(label).unwrap_or_else(Self::unknown)
    }

    fn try_parse(label: &str) -> Option<Self> {
        let (teams, score) = label.split_once(", ")?;
        let (home, away) = teams.split_once(" - ")?;
        let (h, a) = score.trim().split_once('-')?;
        let home_score = h.trim().parse::<u32>().ok()?;
        let away_score = a.trim().parse::<u32>().ok()?;

        let (home, away) = (home.trim(), away.trim());
        if home.is_empty() || away.is_empty() {
            return None;
        }
        Some(MatchLabel {
            home: home.to_string(),
            away: away.to_string(),
            result: format!("{home_score}-{away_score}"),
            home_score,
            away_score,
        })
    }
}

/// Season label and starting year for a career entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonBucket {
    pub period: String,
    pub year: i32,
}

/// Bucket an opaque provider season id into one of three seasons.
///
/// This is a heuristic tied to the id range the thresholds were read from;
/// ids outside that range land in the oldest bucket.
pub fn season_bucket(season_id: Option<i64>, t: &SeasonThresholds) -> SeasonBucket {
    let year = match season_id {
        Some(id) if id > t.current => t.base_year,
        Some(id) if id > t.previous => t.base_year - 1,
        _ => t.base_year - 2,
    };
    SeasonBucket {
        period: format!("{}/{:02}", year, (year + 1).rem_euclid(100)),
        year,
    }
}

//////////////////////////////////////////////////
// Career timeline & recent matches
//////////////////////////////////////////////////

/// Raw career rows worth resolving: the last six entries with appearances.
pub fn recent_played(entries: &[raw::CareerEntry]) -> Vec<&raw::CareerEntry> {
    let start = entries.len().saturating_sub(6);
    entries[start..]
        .iter()
        .filter(|e| e.appearances > 0)
        .collect()
}

pub fn career_entry(
    raw: &raw::CareerEntry,
    team_name: String,
    competition: String,
    seasons: &SeasonThresholds,
) -> CareerEntry {
    let bucket = season_bucket(raw.season_id, seasons);
    let games = raw.appearances.max(1) as f64;
    CareerEntry {
        period: bucket.period,
        season_year: bucket.year,
        team_name,
        team_city: String::new(),
        team_country: String::new(),
        appearances: raw.appearances,
        goals: raw.goal,
        minutes_played: raw.minutes_played,
        competition,
        avg_minutes_per_game: (raw.minutes_played as f64 / games).round_ties_even() as i64,
    }
}

/// Newest season first; entries of the same season keep their order.
pub fn sort_newest_first(timeline: &mut [CareerEntry]) {
    timeline.sort_by(|a, b| b.season_year.cmp(&a.season_year));
}

pub fn recent_match(raw: &raw::Match, competition: String) -> RecentMatch {
    let label = MatchLabel::parse(raw.label.as_deref().unwrap_or_default());
    RecentMatch {
        match_id: raw.match_id.unwrap_or(0),
        date: match_date(raw.date.as_deref()),
        competition,
        description: format!("{} vs {} ({})", label.home, label.away, label.result),
        home_team: label.home,
        away_team: label.away,
        home_score: label.home_score,
        away_score: label.away_score,
        result: label.result,
    }
}

//////////////////////////////////////////////////
// Player dossier helpers
//////////////////////////////////////////////////

/// Stand-in `basic_info` when the provider cannot be reached.
pub fn placeholder_player(player_id: i64) -> Value {
    serde_json::json!({
        "wyId": player_id,
        "shortName": format!("Player {player_id}"),
    })
}

/// Contract summary lifted from a player's `basic_info` payload.
pub fn contract_info(basic: &Value) -> ContractInfo {
    let team = basic.get("currentTeam");
    let present = |v: Option<&Value>| v.filter(|v| !v.is_null()).cloned();
    ContractInfo {
        team: team
            .and_then(|t| t.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN)
            .to_string(),
        team_id: team.and_then(|t| t.get("wyId")).and_then(Value::as_i64),
        contract_expires: basic
            .get("contractExpirationDate")
            .and_then(Value::as_str)
            .map(str::to_string),
        market_value: present(basic.get("marketValue")),
        jersey_number: present(basic.get("jerseyNumber")),
    }
}

// tests/normalize_tests.rs

use chrono::NaiveDate;
use scouting_server::config::SeasonThresholds;
use scouting_server::provider::normalize::{
    self, age_on, match_date, season_bucket, MatchLabel, UNKNOWN,
};
use scouting_server::provider::raw;
use serde_json::json;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

//////////////////////////////////////////////////
// Age
//////////////////////////////////////////////////

#[test]
fn age_counts_completed_years() {
    let today = date(2024, 6, 15);
    assert_eq!(age_on("2000-06-15", today), Some(24));
    assert_eq!(age_on("2000-06-16", today), Some(23));
    assert_eq!(age_on("2000-01-01", today), Some(24));
    assert_eq!(age_on("2000-12-31", today), Some(23));
}

#[test]
fn age_rejects_malformed_and_future_dates() {
    let today = date(2024, 6, 15);
    assert_eq!(age_on("15/06/2000", today), None);
    assert_eq!(age_on("", today), None);
    assert_eq!(age_on("2000-13-01", today), None);
    assert_eq!(age_on("2030-01-01", today), None);
}

#[test]
fn leap_day_birthday_waits_for_march() {
    assert_eq!(age_on("2004-02-29", date(2023, 2, 28)), Some(18));
    assert_eq!(age_on("2004-02-29", date(2023, 3, 1)), Some(19));
}

//////////////////////////////////////////////////
// Match labels
//////////////////////////////////////////////////

#[test]
fn label_splits_teams_and_score() {
    let l = MatchLabel::parse("Real Madrid - Barcelona, 2-1");
    assert_eq!(l.home, "Real Madrid");
    assert_eq!(l.away, "Barcelona");
    assert_eq!((l.home_score, l.away_score), (2, 1));
    assert_eq!(l.result, "2-1");
}

#[test]
fn label_keeps_hyphenated_team_names_after_first_separator() {
    let l = MatchLabel::parse("Saint-Etienne - Paris Saint-Germain, 0-3");
    assert_eq!(l.home, "Saint-Etienne");
    assert_eq!(l.away, "Paris Saint-Germain");
    assert_eq!((l.home_score, l.away_score), (0, 3));
}

#[test]
fn malformed_labels_fall_back_to_unknown() {
    for label in [
        "",
        "Real Madrid vs Barcelona",
        "Real Madrid - Barcelona",
        "Real Madrid - Barcelona, x-1",
        "Real Madrid Barcelona, 2-1",
    ] {
        let l = MatchLabel::parse(label);
        assert_eq!(l.home, UNKNOWN, "label {label:?}");
        assert_eq!(l.away, UNKNOWN, "label {label:?}");
        assert_eq!(l.result, "0-0");
        assert_eq!((l.home_score, l.away_score), (0, 0));
    }
}

#[test]
fn match_date_keeps_day_part() {
    assert_eq!(match_date(Some("2024-05-01 18:00:00")), "2024-05-01");
    assert_eq!(match_date(Some("2024-05-01")), "2024-05-01");
    assert_eq!(match_date(Some("")), UNKNOWN);
    assert_eq!(match_date(None), UNKNOWN);
}

//////////////////////////////////////////////////
// Seasons & career
//////////////////////////////////////////////////

#[test]
fn season_ids_bucket_into_three_seasons() {
    let t = SeasonThresholds::default();
    let current = season_bucket(Some(190_001), &t);
    assert_eq!((current.period.as_str(), current.year), ("2024/25", 2024));

    let previous = season_bucket(Some(190_000), &t);
    assert_eq!((previous.period.as_str(), previous.year), ("2023/24", 2023));

    let older = season_bucket(Some(185_000), &t);
    assert_eq!((older.period.as_str(), older.year), ("2022/23", 2022));

    assert_eq!(season_bucket(None, &t).year, 2022);
}

#[test]
fn season_thresholds_are_configurable() {
    let t = SeasonThresholds {
        current: 500,
        previous: 400,
        base_year: 2099,
    };
    let b = season_bucket(Some(501), &t);
    assert_eq!(b.period, "2099/00");
    assert_eq!(b.year, 2099);
}

fn career(rows: serde_json::Value) -> Vec<raw::CareerEntry> {
    serde_json::from_value::<raw::CareerEnvelope>(json!({ "career": rows }))
        .unwrap()
        .career
}

#[test]
fn only_last_six_entries_with_appearances_count() {
    let rows = career(json!([
        { "teamId": 1, "appearances": 30 },
        { "teamId": 2, "appearances": 30 },
        { "teamId": 3, "appearances": 10 },
        { "teamId": 4, "appearances": 0 },
        { "teamId": 5, "appearances": 5 },
        { "teamId": 6, "appearances": 7 },
        { "teamId": 7, "appearances": 0 },
        { "teamId": 8, "appearances": 1 }
    ]));
    let picked: Vec<i64> = normalize::recent_played(&rows)
        .iter()
        .filter_map(|e| e.team_id)
        .collect();
    assert_eq!(picked, vec![3, 5, 6, 8]);
}

#[test]
fn career_entry_averages_minutes() {
    let t = SeasonThresholds::default();
    let rows = career(json!([
        { "seasonId": 191_000, "appearances": 3, "goal": 2, "minutesPlayed": 200 },
        { "seasonId": 191_000, "appearances": 0, "minutesPlayed": 0 }
    ]));

    let e = normalize::career_entry(&rows[0], "Team".into(), "League".into(), &t);
    assert_eq!(e.avg_minutes_per_game, 67);
    assert_eq!(e.goals, 2);
    assert_eq!(e.period, "2024/25");
    assert_eq!(e.team_city, "");

    let empty = normalize::career_entry(&rows[1], "Team".into(), "League".into(), &t);
    assert_eq!(empty.avg_minutes_per_game, 0);
}

#[test]
fn career_average_rounds_half_to_even() {
    let t = SeasonThresholds::default();
    let rows = career(json!([
        { "appearances": 2, "minutesPlayed": 45 },
        { "appearances": 2, "minutesPlayed": 47 }
    ]));
    let low = normalize::career_entry(&rows[0], "T".into(), "C".into(), &t);
    assert_eq!(low.avg_minutes_per_game, 22);
    let high = normalize::career_entry(&rows[1], "T".into(), "C".into(), &t);
    assert_eq!(high.avg_minutes_per_game, 24);
}

#[test]
fn career_sorts_newest_first_and_is_stable() {
    let t = SeasonThresholds::default();
    let rows = career(json!([
        { "seasonId": 180_000, "appearances": 1 },
        { "seasonId": 191_000, "appearances": 1 },
        { "seasonId": 186_000, "appearances": 1 },
        { "seasonId": 192_000, "appearances": 1 }
    ]));
    let mut timeline: Vec<_> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| normalize::career_entry(r, format!("T{i}"), "C".into(), &t))
        .collect();
    normalize::sort_newest_first(&mut timeline);

    let teams: Vec<&str> = timeline.iter().map(|e| e.team_name.as_str()).collect();
    assert_eq!(teams, vec!["T1", "T3", "T2", "T0"]);
}

//////////////////////////////////////////////////
// Hierarchy projections
//////////////////////////////////////////////////

#[test]
fn areas_sort_by_name_and_drop_unnamed() {
    let raw: Vec<raw::Area> = serde_json::from_value(json!([
        { "id": 3, "name": "Spain", "alpha3code": "ESP" },
        { "id": 1, "name": "Argentina", "alpha2code": "AR", "alpha3code": "ARG" },
        { "id": 2 },
        { "id": 4, "name": "England" }
    ]))
    .unwrap();
    let names: Vec<String> = normalize::areas(raw).into_iter().map(|a| a.name).collect();
    assert_eq!(names, vec!["Argentina", "England", "Spain"]);
}

#[test]
fn competitions_default_missing_fields() {
    let raw: Vec<raw::Competition> =
        serde_json::from_value(json!([{ "wyId": 795, "name": "LaLiga" }])).unwrap();
    let c = &normalize::competitions(raw, "Spain")[0];
    assert_eq!(c.area_name, "Spain");
    assert_eq!(c.format, UNKNOWN);
    assert_eq!(c.gender, UNKNOWN);
    assert_eq!(c.division_level, 0);
}

#[test]
fn squad_sorts_by_position_and_fills_team() {
    let raw: raw::SquadEnvelope = serde_json::from_value(json!({
        "team": { "wyId": 675, "name": "Real Madrid" },
        "squad": [
            { "wyId": 1, "shortName": "A", "role": { "name": "Midfielder" }, "birthDate": "2000-01-01" },
            { "wyId": 2, "shortName": "B", "role": { "name": "Defender" }, "passportArea": { "name": "Spain" } },
            { "wyId": 3 }
        ]
    }))
    .unwrap();

    let squad = normalize::squad(raw, date(2024, 6, 1));
    let positions: Vec<&str> = squad.iter().map(|p| p.position.as_str()).collect();
    assert_eq!(positions, vec!["Defender", "Midfielder", UNKNOWN]);
    assert!(squad.iter().all(|p| p.team == "Real Madrid"));
    assert_eq!(squad[0].nationality.as_deref(), Some("Spain"));
    assert_eq!(squad[1].age, Some(24));
    assert_eq!(squad[2].name, UNKNOWN);
    assert_eq!(squad[2].nationality.as_deref(), Some(UNKNOWN));
}

#[test]
fn matches_take_limit_in_upstream_order() {
    let raw: raw::MatchesEnvelope = serde_json::from_value(json!({
        "competition": { "name": "LaLiga" },
        "matches": [
            { "matchId": 3, "label": "A - B, 1-0", "date": "2024-05-01 18:00:00", "status": "Played" },
            { "matchId": 1 },
            { "matchId": 2 }
        ]
    }))
    .unwrap();
    let out = normalize::matches(raw, 2);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].id, 3);
    assert_eq!(out[0].competition_name.as_deref(), Some("LaLiga"));
    assert_eq!(out[1].label, UNKNOWN);
}

#[test]
fn bare_match_lists_parse_too() {
    let raw: raw::MatchesEnvelope =
        serde_json::from_value(json!([{ "matchId": 9, "label": "A - B, 0-0" }])).unwrap();
    assert_eq!(raw.competition_name(), None);
    assert_eq!(raw.into_matches().len(), 1);
}

#[test]
fn search_hits_parse_from_any_envelope() {
    let wrapped: raw::SearchEnvelope<raw::Player> =
        serde_json::from_value(json!({ "players": [{ "wyId": 7 }] })).unwrap();
    assert_eq!(wrapped.into_players().len(), 1);

    let generic: raw::SearchEnvelope<raw::Team> =
        serde_json::from_value(json!({ "data": [{ "wyId": 675 }, { "wyId": 676 }] })).unwrap();
    assert_eq!(generic.into_teams().len(), 2);

    let bare: raw::SearchEnvelope<raw::Team> =
        serde_json::from_value(json!([{ "wyId": 675 }])).unwrap();
    assert_eq!(bare.into_teams().len(), 1);

    let empty: raw::SearchEnvelope<raw::Team> = serde_json::from_value(json!({})).unwrap();
    assert!(empty.into_teams().is_empty());
}

#[test]
fn recent_match_builds_description() {
    let m: raw::Match = serde_json::from_value(json!({
        "matchId": 77,
        "label": "Getafe - Sevilla, 1-1",
        "date": "2024-03-10 21:00:00"
    }))
    .unwrap();
    let r = normalize::recent_match(&m, "LaLiga".into());
    assert_eq!(r.date, "2024-03-10");
    assert_eq!(r.description, "Getafe vs Sevilla (1-1)");
    assert_eq!(r.competition, "LaLiga");
}

#[test]
fn contract_info_reads_current_team() {
    let basic = json!({
        "wyId": 10,
        "currentTeam": { "wyId": 675, "name": "Real Madrid" },
        "contractExpirationDate": "2027-06-30",
        "marketValue": null
    });
    let c = normalize::contract_info(&basic);
    assert_eq!(c.team, "Real Madrid");
    assert_eq!(c.team_id, Some(675));
    assert_eq!(c.contract_expires.as_deref(), Some("2027-06-30"));
    assert_eq!(c.market_value, None);

    let placeholder = normalize::contract_info(&normalize::placeholder_player(10));
    assert_eq!(placeholder.team, UNKNOWN);
    assert_eq!(placeholder.contract_expires, None);
}

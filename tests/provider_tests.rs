// tests/provider_tests.rs

use mockito::{Matcher, Server, ServerGuard};
use scouting_server::cache::CompetitionNames;
use scouting_server::config::{ProviderSettings, SeasonThresholds};
use scouting_server::provider::service::{self, SearchScope};
use scouting_server::provider::{ProviderClient, ProviderError};
use serde_json::json;

fn client_for(server: &ServerGuard) -> ProviderClient {
    ProviderClient::new(&ProviderSettings {
        base_url: server.url(),
        username: "scout".into(),
        password: "secret".into(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_non_success_status_is_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/teams/9")
        .with_status(404)
        .with_body("no such team")
        .create_async()
        .await;

    let err = client_for(&server).team(9).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, ProviderError::Status { status: 404, .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreadable_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/areas")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let err = client_for(&server).areas().await.unwrap_err();
    assert!(matches!(err, ProviderError::Decode(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_areas_accept_bare_and_wrapped_payloads() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/areas")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "areas": [{ "id": 1, "name": "Spain" }] }).to_string())
        .create_async()
        .await;

    let areas = client_for(&server).areas().await.unwrap();
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].name.as_deref(), Some("Spain"));
}

#[tokio::test]
async fn test_requests_carry_basic_auth() {
    let mut server = Server::new_async().await;
    // "scout:secret"
    let mock = server
        .mock("GET", "/v3/areas")
        .match_header("authorization", "Basic c2NvdXQ6c2VjcmV0")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    assert!(client_for(&server).test_connection().await);
    mock.assert_async().await;
}

//////////////////////////////////////////////////
// Competition-name cache
//////////////////////////////////////////////////

#[tokio::test]
async fn test_competition_name_is_fetched_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/competitions/795")
        .with_status(200)
        .with_body(json!({ "wyId": 795, "name": "LaLiga" }).to_string())
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let cache = CompetitionNames::new();
    assert_eq!(cache.resolve(&client, 795).await.unwrap(), "LaLiga");
    assert_eq!(cache.resolve(&client, 795).await.unwrap(), "LaLiga");
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get(795).as_deref(), Some("LaLiga"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_failed_lookups_are_not_cached() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v3/competitions/1")
        .with_status(500)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);
    let cache = CompetitionNames::new();
    assert!(cache.resolve(&client, 1).await.is_err());
    assert!(cache.resolve(&client, 1).await.is_err());
    assert!(cache.is_empty());
    mock.assert_async().await;
}

//////////////////////////////////////////////////
// Composite fetches
//////////////////////////////////////////////////

#[tokio::test]
async fn test_career_timeline_resolves_names_and_sorts() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/players/10/career")
        .with_status(200)
        .with_body(
            json!({ "career": [
                { "teamId": 1, "competitionId": 100, "seasonId": 186_000, "appearances": 20, "goal": 3, "minutesPlayed": 1500 },
                { "teamId": 2, "competitionId": 200, "seasonId": 191_000, "appearances": 10, "goal": 1, "minutesPlayed": 900 },
                { "teamId": 2, "competitionId": 200, "seasonId": 191_000, "appearances": 0 }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/v3/teams/1")
        .with_status(200)
        .with_body(json!({ "wyId": 1, "name": "Getafe" }).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/v3/teams/2")
        .with_status(503)
        .create_async()
        .await;
    server
        .mock("GET", "/v3/competitions/100")
        .with_status(200)
        .with_body(json!({ "wyId": 100, "name": "LaLiga" }).to_string())
        .create_async()
        .await;
    server
        .mock("GET", "/v3/competitions/200")
        .with_status(200)
        .with_body(json!({ "wyId": 200, "name": "Premier League" }).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let cache = CompetitionNames::new();
    let timeline = service::career_timeline(&client, &cache, 10, &SeasonThresholds::default())
        .await
        .unwrap();

    assert_eq!(timeline.len(), 2);
    assert_eq!(timeline[0].team_name, "Unknown team");
    assert_eq!(timeline[0].competition, "Premier League");
    assert_eq!(timeline[0].period, "2024/25");
    assert_eq!(timeline[0].avg_minutes_per_game, 90);
    assert_eq!(timeline[1].team_name, "Getafe");
    assert_eq!(timeline[1].period, "2023/24");
    assert_eq!(cache.len(), 2);
}

#[tokio::test]
async fn test_career_timeline_fails_without_career() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/players/10/career")
        .with_status(500)
        .create_async()
        .await;

    let client = client_for(&server);
    let res = service::career_timeline(
        &client,
        &CompetitionNames::new(),
        10,
        &SeasonThresholds::default(),
    )
    .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn test_recent_matches_fall_back_to_competition_id() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/players/10/matches")
        .with_status(200)
        .with_body(
            json!({ "matches": [
                { "matchId": 1, "label": "Getafe - Sevilla, 2-0", "date": "2024-03-10 21:00:00", "competitionId": 795 },
                { "matchId": 2, "label": "garbled", "competitionId": 0 },
                { "matchId": 3, "label": "A - B, 0-0", "competitionId": 795 },
                { "matchId": 4, "label": "C - D, 1-1", "competitionId": 795 }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let lookup = server
        .mock("GET", "/v3/competitions/795")
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server);
    let matches = service::recent_matches(&client, &CompetitionNames::new(), 10, 50)
        .await
        .unwrap();

    assert_eq!(matches.len(), 4);
    assert_eq!(matches[0].competition, "Competition 795");
    assert_eq!(matches[3].competition, "Competition 795");
    assert_eq!(matches[0].home_team, "Getafe");
    assert_eq!(matches[0].result, "2-0");
    assert_eq!(matches[1].competition, "Unknown");
    assert_eq!(matches[1].home_team, "Unknown");
    lookup.assert_async().await;
}

#[tokio::test]
async fn test_recent_matches_honour_limit() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/players/10/matches")
        .with_status(200)
        .with_body(json!([{ "matchId": 1 }, { "matchId": 2 }, { "matchId": 3 }]).to_string())
        .create_async()
        .await;

    let client = client_for(&server);
    let matches = service::recent_matches(&client, &CompetitionNames::new(), 10, 2)
        .await
        .unwrap();
    let ids: Vec<i64> = matches.iter().map(|m| m.match_id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn test_player_profile_survives_upstream_outage() {
    let client = ProviderClient::new(&ProviderSettings {
        base_url: "http://127.0.0.1:1".into(),
        ..Default::default()
    })
    .unwrap();

    let profile = service::player_profile(
        &client,
        &CompetitionNames::new(),
        42,
        &SeasonThresholds::default(),
    )
    .await;

    assert_eq!(profile.basic_info["shortName"], "Player 42");
    assert!(profile.career.is_none());
    assert!(profile.transfers.is_none());
    assert!(profile.recent_matches.is_none());
    assert_eq!(profile.contract_info.unwrap().team, "Unknown");
}

#[tokio::test]
async fn test_team_profile_requires_the_team() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/teams/675")
        .with_status(404)
        .create_async()
        .await;
    server
        .mock("GET", "/v3/teams/675/squad")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;
    server
        .mock("GET", "/v3/teams/675/matches")
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let err = service::team_profile(&client_for(&server), 675)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_smart_search_isolates_failing_branch() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/v3/search")
        .match_query(Matcher::UrlEncoded("objType".into(), "team".into()))
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/v3/search")
        .match_query(Matcher::UrlEncoded("objType".into(), "player".into()))
        .with_status(200)
        .with_body(
            json!({ "players": [
                { "wyId": 7, "shortName": "Pedri", "role": { "name": "Midfielder" }, "currentTeam": { "name": "Barcelona" } }
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let results = service::smart_search(&client_for(&server), "pedri", SearchScope::All).await;
    assert!(results.teams.is_empty());
    assert_eq!(results.players.len(), 1);
    assert_eq!(results.players[0].id, "7");
    assert_eq!(results.players[0].team, "Barcelona");
}

#[tokio::test]
async fn test_smart_search_scope_skips_other_branch() {
    let mut server = Server::new_async().await;
    let teams = server
        .mock("GET", "/v3/search")
        .match_query(Matcher::UrlEncoded("objType".into(), "team".into()))
        .with_status(200)
        .with_body(json!([{ "wyId": 675, "name": "Real Madrid" }]).to_string())
        .expect(1)
        .create_async()
        .await;
    let players = server
        .mock("GET", "/v3/search")
        .match_query(Matcher::UrlEncoded("objType".into(), "player".into()))
        .expect(0)
        .create_async()
        .await;

    let results = service::smart_search(&client_for(&server), "madrid", SearchScope::Teams).await;
    assert_eq!(results.teams.len(), 1);
    assert_eq!(results.teams[0].name, "Real Madrid");
    assert!(results.players.is_empty());
    teams.assert_async().await;
    players.assert_async().await;
}

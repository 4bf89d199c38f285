use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::raw;
use crate::config::ProviderSettings;
use crate::metrics::UPSTREAM_REQUESTS;

pub type ProviderResult<T> = Result<T, ProviderError>;

#[derive(Error, Debug)]
pub enum ProviderError {
    /// Upstream answered with a non-2xx status.
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
    /// The request never completed (DNS, connect, timeout...).
    #[error("provider request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// Upstream answered 2xx with a body we could not read.
    #[error("malformed provider payload: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid provider configuration: {0}")]
    Config(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    fn outcome(&self) -> &'static str {
        match self {
            ProviderError::Status { .. } => "status",
            ProviderError::Transport(_) => "transport",
            ProviderError::Decode(_) => "decode",
            ProviderError::Config(_) => "config",
        }
    }
}

/// Authenticated client for the provider's `/v3` REST API.
///
/// Cloning is cheap: all clones share one connection pool, and a pooled
/// connection is handed back when the in-flight request future is dropped.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    timeout: Duration,
    lookup_timeout: Duration,
}

impl ProviderClient {
    pub fn new(cfg: &ProviderSettings) -> ProviderResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .default_headers(headers)
            .connect_timeout(cfg.timeout)
            .build()
            .map_err(|e| ProviderError::Config(e.to_string()))?;

        Ok(ProviderClient {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            timeout: cfg.timeout,
            lookup_timeout: cfg.lookup_timeout,
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> ProviderResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let res = self.fetch(&url, query, timeout).await;
        match &res {
            Ok(_) => UPSTREAM_REQUESTS.with_label_values(&["ok"]).inc(),
            Err(e) => {
                UPSTREAM_REQUESTS.with_label_values(&[e.outcome()]).inc();
                log::debug!("GET {url} failed: {e}");
            }
        }
        res
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> ProviderResult<T> {
        let mut req = self
            .http
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .timeout(timeout);
        if !query.is_empty() {
            req = req.query(query);
        }

        let resp = req.send().await.map_err(ProviderError::Transport)?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await.map_err(ProviderError::Transport)?;
        serde_json::from_slice(&bytes).map_err(ProviderError::Decode)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ProviderResult<T> {
        self.request(path, &[], self.timeout).await
    }

    async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> ProviderResult<T> {
        self.request(path, query, self.timeout).await
    }

    //////////////////////////////////////////////////
    // Areas & search
    //////////////////////////////////////////////////

    pub async fn areas(&self) -> ProviderResult<Vec<raw::Area>> {
        self.get::<raw::AreasEnvelope>("/v3/areas")
            .await
            .map(raw::AreasEnvelope::into_vec)
    }

    /// Raw `/v3/areas` payload, used by the sync endpoint.
    pub async fn areas_raw(&self) -> ProviderResult<Vec<Value>> {
        let v: Value = self.get("/v3/areas").await?;
        Ok(match v {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("areas") {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    pub async fn search_players(
        &self,
        query: &str,
        gender: Option<&str>,
    ) -> ProviderResult<Vec<raw::Player>> {
        let mut params = vec![("query", query), ("objType", "player")];
        if let Some(g) = gender {
            params.push(("gender", g));
        }
        self.get_with::<raw::SearchEnvelope<raw::Player>>("/v3/search", &params)
            .await
            .map(raw::SearchEnvelope::into_players)
    }

    pub async fn search_teams(
        &self,
        query: &str,
        gender: Option<&str>,
    ) -> ProviderResult<Vec<raw::Team>> {
        let mut params = vec![("query", query), ("objType", "team")];
        if let Some(g) = gender {
            params.push(("gender", g));
        }
        self.get_with::<raw::SearchEnvelope<raw::Team>>("/v3/search", &params)
            .await
            .map(raw::SearchEnvelope::into_teams)
    }

    //////////////////////////////////////////////////
    // Players
    //////////////////////////////////////////////////

    pub async fn player(&self, player_id: i64, details: Option<&str>) -> ProviderResult<Value> {
        let path = format!("/v3/players/{player_id}");
        match details {
            Some(d) => self.get_with(&path, &[("details", d)]).await,
            None => self.get(&path).await,
        }
    }

    pub async fn player_matches(&self, player_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/players/{player_id}/matches")).await
    }

    pub async fn player_matches_list(&self, player_id: i64) -> ProviderResult<raw::MatchesEnvelope> {
        self.get(&format!("/v3/players/{player_id}/matches")).await
    }

    pub async fn player_career(&self, player_id: i64) -> ProviderResult<raw::CareerEnvelope> {
        self.get(&format!("/v3/players/{player_id}/career")).await
    }

    pub async fn player_transfers(&self, player_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/players/{player_id}/transfers")).await
    }

    pub async fn player_advanced_stats(&self, player_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/players/{player_id}/advancedstats")).await
    }

    //////////////////////////////////////////////////
    // Competitions
    //////////////////////////////////////////////////

    /// Competitions of an area, addressed by its alpha-3 code.
    pub async fn competitions(&self, area_code: &str) -> ProviderResult<raw::CompetitionsEnvelope> {
        self.get_with("/v3/competitions", &[("areaId", area_code)])
            .await
    }

    /// Single competition; uses the short lookup timeout.
    pub async fn competition(&self, competition_id: i64) -> ProviderResult<raw::Competition> {
        self.request(
            &format!("/v3/competitions/{competition_id}"),
            &[],
            self.lookup_timeout,
        )
        .await
    }

    pub async fn competition_matches(
        &self,
        competition_id: i64,
    ) -> ProviderResult<raw::MatchesEnvelope> {
        self.get(&format!("/v3/competitions/{competition_id}/matches"))
            .await
    }

    pub async fn competition_teams(&self, competition_id: i64) -> ProviderResult<raw::TeamsEnvelope> {
        self.get(&format!("/v3/competitions/{competition_id}/teams"))
            .await
    }

    pub async fn competition_players(&self, competition_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/competitions/{competition_id}/players"))
            .await
    }

    //////////////////////////////////////////////////
    // Teams
    //////////////////////////////////////////////////

    pub async fn team(&self, team_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/teams/{team_id}")).await
    }

    /// Display name of a team; uses the short lookup timeout.
    pub async fn team_name(&self, team_id: i64) -> ProviderResult<Option<String>> {
        let team: raw::Team = self
            .request(&format!("/v3/teams/{team_id}"), &[], self.lookup_timeout)
            .await?;
        Ok(team.name)
    }

    pub async fn team_matches(&self, team_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/teams/{team_id}/matches")).await
    }

    pub async fn team_squad(&self, team_id: i64) -> ProviderResult<raw::SquadEnvelope> {
        self.get(&format!("/v3/teams/{team_id}/squad")).await
    }

    pub async fn team_squad_raw(&self, team_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/teams/{team_id}/squad")).await
    }

    pub async fn team_career(&self, team_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/teams/{team_id}/career")).await
    }

    pub async fn team_advanced_stats(&self, team_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/teams/{team_id}/advancedstats")).await
    }

    //////////////////////////////////////////////////
    // Matches & seasons
    //////////////////////////////////////////////////

    pub async fn match_detail(&self, match_id: i64, details: Option<&str>) -> ProviderResult<Value> {
        let path = format!("/v3/matches/{match_id}");
        match details {
            Some(d) => self.get_with(&path, &[("details", d)]).await,
            None => self.get(&path).await,
        }
    }

    pub async fn match_players(&self, match_id: i64) -> ProviderResult<Value> {
        self.match_detail(match_id, Some("players")).await
    }

    pub async fn match_formations(&self, match_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/matches/{match_id}/formations")).await
    }

    pub async fn match_advanced_stats(&self, match_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/matches/{match_id}/advancedstats"))
            .await
    }

    pub async fn season_matches(&self, season_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/seasons/{season_id}/matches")).await
    }

    pub async fn season_players(&self, season_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/seasons/{season_id}/players")).await
    }

    pub async fn season_teams(&self, season_id: i64) -> ProviderResult<Value> {
        self.get(&format!("/v3/seasons/{season_id}/teams")).await
    }

    /// `true` when the areas endpoint answers with readable JSON.
    pub async fn test_connection(&self) -> bool {
        match self.areas().await {
            Ok(_) => {
                log::info!("provider connection successful");
                true
            }
            Err(e) => {
                log::error!("provider connection failed: {e}");
                false
            }
        }
    }
}

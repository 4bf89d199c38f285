use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

//////////////////////////////////////////////////
// Users
//////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    HeadScout,
    Scout,
    Viewer,
}

impl Role {
    /// Unknown role strings get the least privileged role.
    pub fn parse(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            "head_scout" => Role::HeadScout,
            "scout" => Role::Scout,
            _ => Role::Viewer,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::HeadScout => "head_scout",
            Role::Scout => "scout",
            Role::Viewer => "viewer",
        }
    }

    /// Admins and head scouts see every row of their club.
    pub fn sees_whole_club(self) -> bool {
        matches!(self, Role::Admin | Role::HeadScout)
    }
}

/// A scout account (table `scouts`). The password hash never serialises.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub club_id: Option<Uuid>,
    pub organization: Option<String>,
    pub department: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Role {
        Role::parse(&self.role)
    }
}

//////////////////////////////////////////////////
// Scout reports
//////////////////////////////////////////////////

fn default_rating() -> i32 {
    7
}

fn default_minutes() -> Option<i32> {
    Some(90)
}

/// Editable body of a scout report. Ratings are nominally 1-10 but are
/// stored exactly as given.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoutReportInput {
    pub player_id: String,
    pub player_name: String,
    #[serde(default)]
    pub player_wyscout_id: Option<i64>,
    #[serde(default)]
    pub match_context: Option<String>,
    #[serde(default)]
    pub position_played: Option<String>,

    #[serde(default = "default_rating")]
    pub overall_rating: i32,

    // technical
    #[serde(default = "default_rating")]
    pub technique: i32,
    #[serde(default = "default_rating")]
    pub passing: i32,
    #[serde(default = "default_rating")]
    pub first_touch: i32,
    #[serde(default = "default_rating")]
    pub ball_control: i32,
    #[serde(default = "default_rating")]
    pub vision: i32,

    // physical
    #[serde(default = "default_rating")]
    pub speed: i32,
    #[serde(default = "default_rating")]
    pub stamina: i32,
    #[serde(default = "default_rating")]
    pub strength: i32,
    #[serde(default = "default_rating")]
    pub jumping: i32,
    #[serde(default = "default_rating")]
    pub agility: i32,

    // mental / tactical
    #[serde(default = "default_rating")]
    pub tactical_intelligence: i32,
    #[serde(default = "default_rating")]
    pub positioning: i32,
    #[serde(default = "default_rating")]
    pub concentration: i32,
    #[serde(default = "default_rating")]
    pub leadership: i32,
    #[serde(default = "default_rating")]
    pub teamwork: i32,

    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub weaknesses: Option<String>,

    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub contract_situation: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub estimated_price: Option<f64>,

    #[serde(default)]
    pub observation_date: Option<String>,
    #[serde(default)]
    pub viewing_type: Option<String>,
    #[serde(default)]
    pub competition: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default = "default_minutes")]
    pub minutes_observed: Option<i32>,
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScoutReport {
    pub id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: ScoutReportInput,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub created_by_email: String,
    pub created_by_role: String,
    pub club_id: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub updated_by_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ScoutReport {
    /// New report authored by `author`, stamped and scoped to their club.
    pub fn new(fields: ScoutReportInput, author: &User) -> Self {
        ScoutReport {
            id: Uuid::new_v4(),
            fields,
            created_by: author.id,
            created_by_name: author.name.clone(),
            created_by_email: author.email.clone(),
            created_by_role: author.role.clone(),
            club_id: author.club_id,
            updated_by: None,
            updated_by_name: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

//////////////////////////////////////////////////
// Markets
//////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "market_status", rename_all = "snake_case")]
pub enum MarketStatus {
    #[default]
    Active,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "market_player_status", rename_all = "snake_case")]
pub enum MarketPlayerStatus {
    #[default]
    #[serde(alias = "seguimiento")]
    Monitoring,
    #[serde(alias = "negociando")]
    Negotiating,
    #[serde(alias = "descartado")]
    Discarded,
    #[serde(alias = "fichado")]
    Signed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "market_priority", rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "alta")]
    High,
    #[default]
    #[serde(alias = "media")]
    Medium,
    #[serde(alias = "baja")]
    Low,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "player_source", rename_all = "snake_case")]
pub enum PlayerType {
    #[default]
    Wyscout,
    Manual,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Market {
    pub id: Uuid,
    pub name: String,
    pub status: MarketStatus,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub club_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMarket {
    pub name: String,
    #[serde(default)]
    pub status: MarketStatus,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial market update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketPatch {
    pub name: Option<String>,
    pub status: Option<MarketStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Market {
    pub fn new(input: NewMarket, author: &User) -> Self {
        Market {
            id: Uuid::new_v4(),
            name: input.name,
            status: input.status,
            start_date: input.start_date,
            end_date: input.end_date,
            notes: input.notes,
            club_id: author.club_id,
            created_by: author.id,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: MarketPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if patch.start_date.is_some() {
            self.start_date = patch.start_date;
        }
        if patch.end_date.is_some() {
            self.end_date = patch.end_date;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MarketPlayer {
    pub id: Uuid,
    pub market_id: Uuid,
    pub player_id: Option<String>,
    pub player_name: String,
    pub player_type: PlayerType,
    pub status: MarketPlayerStatus,
    pub priority: Priority,
    pub estimated_price: Option<f64>,
    pub max_price: Option<f64>,
    pub position: Option<String>,
    pub age: Option<i32>,
    pub current_team: Option<String>,
    pub notes: Option<String>,
    pub added_by: Uuid,
    pub added_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMarketPlayer {
    #[serde(default)]
    pub player_id: Option<String>,
    pub player_name: String,
    #[serde(default)]
    pub player_type: PlayerType,
    #[serde(default)]
    pub status: MarketPlayerStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub estimated_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub current_team: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketPlayerPatch {
    pub status: Option<MarketPlayerStatus>,
    pub priority: Option<Priority>,
    pub estimated_price: Option<f64>,
    pub max_price: Option<f64>,
    pub position: Option<String>,
    pub current_team: Option<String>,
    pub notes: Option<String>,
}

impl MarketPlayer {
    pub fn new(market_id: Uuid, input: NewMarketPlayer, added_by: Uuid) -> Self {
        MarketPlayer {
            id: Uuid::new_v4(),
            market_id,
            player_id: input.player_id,
            player_name: input.player_name,
            player_type: input.player_type,
            status: input.status,
            priority: input.priority,
            estimated_price: input.estimated_price,
            max_price: input.max_price,
            position: input.position,
            age: input.age,
            current_team: input.current_team,
            notes: input.notes,
            added_by,
            added_date: Utc::now(),
        }
    }

    pub fn apply(&mut self, patch: MarketPlayerPatch) {
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if patch.estimated_price.is_some() {
            self.estimated_price = patch.estimated_price;
        }
        if patch.max_price.is_some() {
            self.max_price = patch.max_price;
        }
        if patch.position.is_some() {
            self.position = patch.position;
        }
        if patch.current_team.is_some() {
            self.current_team = patch.current_team;
        }
        if patch.notes.is_some() {
            self.notes = patch.notes;
        }
    }
}

//////////////////////////////////////////////////
// Manual players
//////////////////////////////////////////////////

/// Locally created player (table `players`), without a provider id unless
/// one is linked later.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ManualPlayer {
    pub id: Uuid,
    pub wyscout_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_area: Option<String>,
    pub passport_area: Option<String>,
    pub age: Option<i32>,
    pub height: Option<i32>,
    pub weight: Option<i32>,
    pub foot: Option<String>,
    pub position: Option<String>,
    pub current_team_name: Option<String>,
    pub current_team_area: Option<String>,
    pub contract_expiration: Option<String>,
    pub market_value: Option<f64>,
    pub agent: Option<String>,
    pub image_url: Option<String>,
    pub notes: Option<String>,
    pub source: String,
    pub manually_created: bool,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl ManualPlayer {
    /// Bare row with only a name; callers fill the rest.
    pub fn named(name: String, organization_id: Option<Uuid>) -> Self {
        ManualPlayer {
            id: Uuid::new_v4(),
            wyscout_id: None,
            first_name: None,
            last_name: None,
            name,
            birth_date: None,
            birth_area: None,
            passport_area: None,
            age: None,
            height: None,
            weight: None,
            foot: None,
            position: None,
            current_team_name: None,
            current_team_area: None,
            contract_expiration: None,
            market_value: None,
            agent: None,
            image_url: None,
            notes: None,
            source: "manual".into(),
            manually_created: true,
            organization_id,
            created_at: Utc::now(),
        }
    }
}

fn default_foot() -> Option<String> {
    Some("right".into())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewManualPlayer {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub birth_area: String,
    #[serde(default)]
    pub passport_area: Option<String>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default = "default_foot")]
    pub foot: Option<String>,
    pub position: String,
    #[serde(default)]
    pub current_team_name: Option<String>,
    #[serde(default)]
    pub current_team_area: Option<String>,
    #[serde(default)]
    pub contract_expiration: Option<String>,
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Distinct values offered as list filters in the manual-player view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub teams: Vec<String>,
    pub countries: Vec<String>,
    pub positions: Vec<String>,
}

impl FilterOptions {
    pub fn from_players(players: &[ManualPlayer]) -> Self {
        use std::collections::BTreeSet;

        fn distinct<'a>(values: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
            values
                .flatten()
                .filter(|v| !v.is_empty())
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        }

        FilterOptions {
            teams: distinct(players.iter().map(|p| &p.current_team_name)),
            countries: distinct(players.iter().map(|p| &p.passport_area)),
            positions: distinct(players.iter().map(|p| &p.position)),
        }
    }
}

//////////////////////////////////////////////////
// Player profiles
//////////////////////////////////////////////////

/// Editable body of a player profile.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerProfileInput {
    #[serde(default)]
    pub wyscout_id: Option<i64>,
    pub player_name: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, alias = "currentTeam")]
    pub current_team: Option<String>,
    #[serde(default)]
    pub age: Option<i32>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub foot: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
    pub position_analysis: String,
    #[serde(default)]
    pub general_info: Option<String>,
    #[serde(default)]
    pub strengths: Option<String>,
    #[serde(default)]
    pub weaknesses: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub agent_contact: Option<String>,
    #[serde(default)]
    pub video_link: Option<String>,
    #[serde(default)]
    pub transfermarkt_link: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub id: Uuid,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub fields: PlayerProfileInput,
    /// Backing `players` row for manual players.
    pub player_id: Option<Uuid>,
    pub club_id: Option<Uuid>,
    pub created_by: Uuid,
    pub created_by_name: String,
    pub updated_by: Uuid,
    pub updated_by_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerProfile {
    pub fn new(fields: PlayerProfileInput, player_id: Option<Uuid>, author: &User) -> Self {
        let now = Utc::now();
        PlayerProfile {
            id: Uuid::new_v4(),
            fields,
            player_id,
            club_id: author.club_id,
            created_by: author.id,
            created_by_name: author.name.clone(),
            updated_by: author.id,
            updated_by_name: author.name.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

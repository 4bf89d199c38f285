pub mod auth;
pub mod error;
pub mod health;
pub mod hierarchy;
pub mod manual_players;
pub mod markets;
pub mod players;
pub mod profiles;
pub mod reports;
pub mod routes;
pub mod search;
pub mod stats;

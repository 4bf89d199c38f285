pub mod cache;
pub mod config;
pub mod db;
pub mod http;
pub mod metrics;
pub mod provider;

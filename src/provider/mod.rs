//! Sports-data provider integration: HTTP client, wire shapes, normalisation
//! into flat response records, and the composite fetches built on top.

pub mod client;
pub mod normalize;
pub mod raw;
pub mod service;
pub mod types;

pub use client::{ProviderClient, ProviderError, ProviderResult};

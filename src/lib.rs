//! rankrelay — caching HTTP proxy for competitive rank lookups.
//!
//! Fetches a player's competitive rank from a third-party stats API,
//! reshapes it into a compact display string, and caches payloads for a
//! few minutes to keep latency and upstream traffic down.

pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod rank;
pub mod region;
pub mod server;
pub mod upstream;

//! MCP tool implementations.
//!
//! This module contains all tools exposed by the mcp-webmention server.

pub mod cache;
pub mod discover;
pub mod send;

use std::sync::Arc;

use mention_client::{Discoverer, HttpClient, HttpConfig, Sender};
use mention_core::{AppConfig, EndpointCache, Error};

/// Shared state behind every tool call.
pub struct ServerState {
    pub config: AppConfig,
    pub cache: Arc<EndpointCache>,
    pub discoverer: Discoverer,
    pub sender: Sender,
}

impl ServerState {
    /// Build one HTTP client and endpoint cache from the configuration.
    pub fn new(config: AppConfig) -> Result<Self, Error> {
        let http = HttpClient::new(HttpConfig::from(&config))?;
        let cache = Arc::new(EndpointCache::from_config(&config));

        Ok(Self {
            discoverer: Discoverer::new(http.clone(), Arc::clone(&cache)),
            sender: Sender::new(http),
            cache,
            config,
        })
    }
}

/// Current time as an RFC 3339 timestamp with second precision.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

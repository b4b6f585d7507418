//! Core types and shared functionality for the webmention client.
//!
//! This crate provides:
//! - In-memory endpoint cache with TTL and capacity bounds
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheKey, CachedEndpoint, EndpointCache};
pub use config::{AppConfig, ConfigError};
pub use error::Error;

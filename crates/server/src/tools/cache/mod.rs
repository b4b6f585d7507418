//! Cache-related MCP tools.
//!
//! This module provides tools for maintaining the endpoint cache.

pub mod clear;

pub use clear::{CacheClearOutput, cache_clear_impl};

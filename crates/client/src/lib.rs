//! Client code for sending webmentions.
//!
//! This crate provides endpoint discovery, webmention sending, and the HTTP
//! transport they run on.

pub mod discover;
pub mod fetch;
pub mod send;

pub use discover::{DiscoverOptions, Discoverer, DiscoveryResult};
pub use fetch::{Fetcher, HttpClient, HttpConfig, HttpResponse, Poster};
pub use send::Sender;

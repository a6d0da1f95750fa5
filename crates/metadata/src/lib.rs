#![allow(clippy::type_complexity)]
pub mod cache;
pub mod fanart;
pub mod fetch;
pub mod kitsu;
pub mod metahub;
pub mod provider;
pub mod resolver;
pub mod select;
pub mod store;
pub mod tvdb;

use std::time::Duration;

use thiserror::Error;

pub use resolver::ArtworkResolver;

/// Request timeout applied to every outbound provider call.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
    #[error("cache error: {0}")]
    Cache(String),
    #[error("db error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::DeError),
}

/// Shared HTTP client for provider calls.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(concat!("animeart/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

//! Record source trait and implementations for the remote catalog.

pub mod mock;
pub mod pokeapi;

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::model::{DetailRecord, RecordPage, Species};

/// Boxed future returned by [`RecordSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Error type for remote fetches, distinguishing "absent" from failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Server answered 404.
    #[error("not found: {what}")]
    NotFound { what: String },
    /// Any other non-success status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response body: {0}")]
    Decode(String),
    /// A fan-out task panicked or was cancelled.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl SourceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }
}

impl From<tokio::task::JoinError> for SourceError {
    fn from(e: tokio::task::JoinError) -> Self {
        SourceError::Task(e.to_string())
    }
}

/// How a detail record is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailKey {
    /// Name-keyed endpoint; matched case-insensitively.
    Name(String),
    /// Numeric id endpoint.
    Id(u32),
    /// The `url` of a [`RecordRef`](crate::model::RecordRef), used verbatim.
    Url(String),
}

impl DetailKey {
    /// Parse user input: all digits means an id, anything else a name.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        match trimmed.parse::<u32>() {
            Ok(id) => DetailKey::Id(id),
            Err(_) => DetailKey::Name(trimmed.to_lowercase()),
        }
    }
}

impl fmt::Display for DetailKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailKey::Name(name) => write!(f, "{}", name),
            DetailKey::Id(id) => write!(f, "#{}", id),
            DetailKey::Url(url) => write!(f, "{}", url),
        }
    }
}

/// A paginated catalog that can also resolve single records.
pub trait RecordSource: Send + Sync {
    /// Short name used in logs (e.g. "PokeAPI").
    fn name(&self) -> &str;

    /// Fetch `limit` refs starting at `offset`, plus the catalog's total count.
    fn list_page(&self, limit: usize, offset: usize) -> SourceFuture<'_, RecordPage>;

    /// Fetch one full record. A missing record is [`SourceError::NotFound`].
    fn fetch_detail<'a>(&'a self, key: &'a DetailKey) -> SourceFuture<'a, DetailRecord>;

    /// Fetch the species record linked from a detail record.
    fn fetch_species<'a>(&'a self, url: &'a str) -> SourceFuture<'a, Species>;
}

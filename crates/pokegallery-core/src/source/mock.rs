//! In-memory record source for tests and offline demos.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::{DetailKey, RecordSource, SourceError, SourceFuture};
use crate::model::{DetailRecord, NamedResource, RecordPage, RecordRef, Species, TypeSlot};

const URL_PREFIX: &str = "mock://pokemon/";

/// A call observed by [`MockSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    List { limit: usize, offset: usize },
    Detail(String),
    Species(String),
}

/// A hand-rolled mock implementing [`RecordSource`].
///
/// Supports:
/// - A fixed, ordered catalog; ids are 1-based listing positions.
/// - Per-offset listing latency and per-name detail latency.
/// - Failure injection for the listing endpoint or individual details.
/// - Call recording via [`calls()`](MockSource::calls).
pub struct MockSource {
    catalog: Vec<RecordRef>,
    details: HashMap<String, DetailRecord>,
    species: HashMap<String, Species>,
    failing_details: HashSet<String>,
    fail_listing: bool,
    list_delays: HashMap<usize, Duration>,
    detail_delays: HashMap<String, Duration>,
    calls: Mutex<Vec<MockCall>>,
}

/// Build a minimal record with a single "normal" type.
pub fn mock_record(id: u32, name: &str) -> DetailRecord {
    DetailRecord {
        id,
        name: name.to_string(),
        height: id,
        weight: id * 10,
        base_experience: None,
        types: vec![TypeSlot {
            slot: 1,
            kind: NamedResource::new("normal"),
        }],
        abilities: vec![],
        stats: vec![],
        moves: vec![],
        sprites: Default::default(),
        species: Some(NamedResource {
            name: name.to_string(),
            url: format!("mock://species/{name}"),
        }),
    }
}

impl MockSource {
    /// Catalog of `names` in listing order.
    pub fn with_catalog(names: &[&str]) -> Self {
        let catalog: Vec<RecordRef> = names
            .iter()
            .map(|n| RecordRef {
                name: n.to_string(),
                url: format!("{URL_PREFIX}{n}"),
            })
            .collect();
        let details = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.to_string(), mock_record(i as u32 + 1, n)))
            .collect();
        Self {
            catalog,
            details,
            species: HashMap::new(),
            failing_details: HashSet::new(),
            fail_listing: false,
            list_delays: HashMap::new(),
            detail_delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Catalog of `n` generated names (`mon-1` .. `mon-n`).
    pub fn numbered(n: usize) -> Self {
        let names: Vec<String> = (1..=n).map(|i| format!("mon-{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        Self::with_catalog(&refs)
    }

    /// Replace the generated record for `record.name`.
    pub fn with_record(mut self, record: DetailRecord) -> Self {
        self.details.insert(record.name.clone(), record);
        self
    }

    pub fn with_species(mut self, name: &str, species: Species) -> Self {
        self.species.insert(name.to_string(), species);
        self
    }

    /// Make the detail fetch for `name` fail with a 500.
    pub fn failing_detail(mut self, name: &str) -> Self {
        self.failing_details.insert(name.to_string());
        self
    }

    /// Make every listing request fail.
    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Delay listing requests at `offset`.
    pub fn with_list_delay(mut self, offset: usize, delay: Duration) -> Self {
        self.list_delays.insert(offset, delay);
        self
    }

    /// Delay detail requests for `name`.
    pub fn with_detail_delay(mut self, name: &str, delay: Duration) -> Self {
        self.detail_delays.insert(name.to_string(), delay);
        self
    }

    /// Every call made so far, in call order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Only the listing calls, as `(limit, offset)`.
    pub fn list_calls(&self) -> Vec<(usize, usize)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                MockCall::List { limit, offset } => Some((limit, offset)),
                _ => None,
            })
            .collect()
    }

    pub fn detail_call_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::Detail(_)))
            .count()
    }

    fn record(&self, call: MockCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn resolve(&self, key: &DetailKey) -> Option<String> {
        match key {
            DetailKey::Name(name) => Some(name.to_lowercase()),
            DetailKey::Url(url) => url.strip_prefix(URL_PREFIX).map(str::to_string),
            DetailKey::Id(id) => self
                .details
                .values()
                .find(|d| d.id == *id)
                .map(|d| d.name.clone()),
        }
    }
}

impl RecordSource for MockSource {
    fn name(&self) -> &str {
        "Mock"
    }

    fn list_page(&self, limit: usize, offset: usize) -> SourceFuture<'_, RecordPage> {
        self.record(MockCall::List { limit, offset });
        let delay = self.list_delays.get(&offset).copied();

        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            if self.fail_listing {
                return Err(SourceError::Network("connection reset".into()));
            }
            let results = self
                .catalog
                .iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect();
            Ok(RecordPage {
                count: self.catalog.len(),
                results,
            })
        })
    }

    fn fetch_detail<'a>(&'a self, key: &'a DetailKey) -> SourceFuture<'a, DetailRecord> {
        let name = self.resolve(key);
        self.record(MockCall::Detail(
            name.clone().unwrap_or_else(|| key.to_string()),
        ));

        Box::pin(async move {
            let Some(name) = name else {
                return Err(SourceError::NotFound {
                    what: key.to_string(),
                });
            };
            if let Some(d) = self.detail_delays.get(&name) {
                tokio::time::sleep(*d).await;
            }
            if self.failing_details.contains(&name) {
                return Err(SourceError::Status {
                    status: 500,
                    url: format!("{URL_PREFIX}{name}"),
                });
            }
            self.details
                .get(&name)
                .cloned()
                .ok_or(SourceError::NotFound { what: name })
        })
    }

    fn fetch_species<'a>(&'a self, url: &'a str) -> SourceFuture<'a, Species> {
        self.record(MockCall::Species(url.to_string()));
        Box::pin(async move {
            let name = url.strip_prefix("mock://species/").unwrap_or(url);
            self.species
                .get(name)
                .cloned()
                .ok_or(SourceError::NotFound {
                    what: url.to_string(),
                })
        })
    }
}

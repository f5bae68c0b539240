use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{DetailKey, RecordSource, SourceError, SourceFuture};
use crate::model::{DetailRecord, RecordPage, Species};
use crate::{Config, CoreError};

/// [`RecordSource`] backed by the PokeAPI REST endpoints.
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl PokeApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CoreError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(CoreError::InvalidBaseUrl(base_url));
        }
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokegallery/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, CoreError> {
        Self::new(&config.base_url, config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn detail_url(&self, key: &DetailKey) -> String {
        match key {
            DetailKey::Name(name) => format!(
                "{}/pokemon/{}",
                self.base_url,
                urlencoding::encode(&name.to_lowercase())
            ),
            DetailKey::Id(id) => format!("{}/pokemon/{}", self.base_url, id),
            DetailKey::Url(url) => url.clone(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = resp.status();
        if status.as_u16() == 404 {
            return Err(SourceError::NotFound {
                what: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout
            } else {
                SourceError::Decode(e.to_string())
            }
        })
    }
}

impl RecordSource for PokeApi {
    fn name(&self) -> &str {
        "PokeAPI"
    }

    fn list_page(&self, limit: usize, offset: usize) -> SourceFuture<'_, RecordPage> {
        Box::pin(async move {
            let url = format!(
                "{}/pokemon?limit={}&offset={}",
                self.base_url, limit, offset
            );
            self.get_json(&url).await
        })
    }

    fn fetch_detail<'a>(&'a self, key: &'a DetailKey) -> SourceFuture<'a, DetailRecord> {
        Box::pin(async move {
            let url = self.detail_url(key);
            self.get_json(&url).await
        })
    }

    fn fetch_species<'a>(&'a self, url: &'a str) -> SourceFuture<'a, Species> {
        Box::pin(async move { self.get_json(url).await })
    }
}

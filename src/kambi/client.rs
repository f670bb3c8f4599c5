use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use futures_util::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::KambiError;
use crate::retry::{retry_async, CircuitBreaker};

use super::parse::{parse_event_detail, parse_events};
use super::types::{BetOfferResponse, EventDetail, EventSummary, ListViewResponse};
use super::OddsSource;

const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const SITE: &str = "https://www.rushbet.co";

const LIST_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_TIMEOUT: Duration = Duration::from_secs(15);
const MAX_RETRIES: u32 = 3;
const MAX_CONCURRENT_DETAILS: usize = 4;

struct CachedEvent {
    detail: EventDetail,
    fetched_at: Instant,
}

/// Client for the Kambi offering API behind Rushbet
pub struct KambiClient {
    client: Client,
    config: Config,
    breaker: CircuitBreaker,
    cache: DashMap<u64, CachedEvent>,
    cache_ttl: Duration,
}

impl KambiClient {
    pub fn new(config: Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(ORIGIN, HeaderValue::from_static(SITE));
        headers.insert(REFERER, HeaderValue::from_static("https://www.rushbet.co/"));

        let client = Client::builder()
            .default_headers(headers)
            .tcp_nodelay(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            cache_ttl: Duration::from_secs(config.event_cache_ttl_secs),
            config,
            breaker: CircuitBreaker::new(5, Duration::from_secs(60)),
            cache: DashMap::new(),
        })
    }

    fn query(&self, combined: bool) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("lang", self.config.kambi_lang.clone()),
            ("market", self.config.kambi_market.clone()),
            ("client_id", self.config.kambi_client_id.clone()),
            ("channel_id", self.config.kambi_channel_id.clone()),
            // cache buster
            ("nc_id", Utc::now().timestamp_millis().to_string()),
        ];
        if combined {
            params.push(("useCombined", "true".to_string()));
        }
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: Vec<(&'static str, String)>,
        timeout: Duration,
    ) -> Result<T> {
        if self.breaker.is_open() {
            return Err(KambiError::CircuitOpen(endpoint.to_string()).into());
        }

        let url = format!("{}/{}", self.config.offering_url(), endpoint);
        let client = &self.client;
        let url_ref = url.as_str();
        let params_ref = &params;

        let result = retry_async(endpoint, MAX_RETRIES, || async move {
            let response = client
                .get(url_ref)
                .query(params_ref)
                .timeout(timeout)
                .send()
                .await
                .context("Failed to reach Kambi")?;

            let status = response.status();
            if !status.is_success() {
                return Err(anyhow::Error::from(KambiError::BadStatus {
                    endpoint: url_ref.to_string(),
                    status: status.as_u16(),
                }));
            }

            response
                .json::<T>()
                .await
                .context("Failed to parse Kambi response")
        })
        .await;

        match &result {
            Ok(_) => self.breaker.record_success(),
            Err(e) => {
                self.breaker.record_failure();
                warn!("Kambi request {} failed: {}", endpoint, e);
            }
        }
        result
    }

    /// Upcoming football events, eSports removed
    pub async fn list_events(&self) -> Result<Vec<EventSummary>> {
        let response: ListViewResponse = self
            .get_json("listView/football.json", self.query(true), LIST_TIMEOUT)
            .await
            .context("Failed to fetch event list")?;

        let events = parse_events(response);
        info!("Fetched {} football events", events.len());
        Ok(events)
    }

    /// Every open market of one event, served from cache while fresh
    pub async fn event_detail(&self, event_id: u64) -> Result<EventDetail> {
        if let Some(cached) = self.cache.get(&event_id) {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                debug!("Event {} served from cache", event_id);
                return Ok(cached.detail.clone());
            }
        }

        let endpoint = format!("betoffer/event/{}.json", event_id);
        let response: BetOfferResponse = self
            .get_json(&endpoint, self.query(false), EVENT_TIMEOUT)
            .await
            .with_context(|| format!("Failed to fetch event {}", event_id))?;

        let detail = parse_event_detail(event_id, response)?;
        debug!("Event {} has {} markets", event_id, detail.market_count());

        self.cache.insert(
            event_id,
            CachedEvent {
                detail: detail.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(detail)
    }

    /// Fetch several events concurrently; order of results is not preserved
    pub async fn fetch_details(&self, event_ids: &[u64]) -> Vec<(u64, Result<EventDetail>)> {
        stream::iter(event_ids.iter().copied())
            .map(|id| async move { (id, self.event_detail(id).await) })
            .buffer_unordered(MAX_CONCURRENT_DETAILS)
            .collect()
            .await
    }

    /// Drop cache entries older than the TTL
    pub fn prune_cache(&self) -> usize {
        let before = self.cache.len();
        let ttl = self.cache_ttl;
        self.cache.retain(|_, entry| entry.fetched_at.elapsed() < ttl);
        before.saturating_sub(self.cache.len())
    }
}

#[async_trait]
impl OddsSource for KambiClient {
    async fn events(&self) -> Result<Vec<EventSummary>> {
        self.list_events().await
    }

    async fn event(&self, event_id: u64) -> Result<EventDetail> {
        self.event_detail(event_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let client = KambiClient::new(Config::default()).unwrap();

        let list = client.query(true);
        assert!(list.contains(&("lang", "es_ES".to_string())));
        assert!(list.contains(&("client_id", "200".to_string())));
        assert!(list.iter().any(|(k, v)| *k == "useCombined" && v == "true"));
        assert!(list.iter().any(|(k, _)| *k == "nc_id"));

        let event = client.query(false);
        assert!(!event.iter().any(|(k, _)| *k == "useCombined"));
    }

    #[tokio::test]
    async fn test_open_breaker_short_circuits() {
        let client = KambiClient::new(Config::default()).unwrap();
        for _ in 0..5 {
            client.breaker.record_failure();
        }
        let err = client.list_events().await.unwrap_err();
        assert!(err.chain().any(|c| c.to_string().contains("circuit breaker open")));
    }

    #[test]
    fn test_prune_cache() {
        let client = KambiClient::new(Config {
            event_cache_ttl_secs: 0,
            ..Config::default()
        })
        .unwrap();
        client.cache.insert(
            1,
            CachedEvent {
                detail: EventDetail {
                    event_id: 1,
                    name: "A - B".to_string(),
                    home_team: "A".to_string(),
                    away_team: "B".to_string(),
                    start: None,
                    state: "NOT_STARTED".to_string(),
                    categories: Vec::new(),
                },
                fetched_at: Instant::now(),
            },
        );
        assert_eq!(client.prune_cache(), 1);
        assert_eq!(client.prune_cache(), 0);
    }
}

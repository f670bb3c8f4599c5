//! Bookmaker odds from the Kambi offering API (Rushbet Colombia)

pub mod categorize;
pub mod client;
pub mod parse;
pub mod selection;
pub mod snapshot;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;

pub use categorize::{apply_order, categorize, market_order, redistribute};
pub use client::KambiClient;
pub use parse::{is_esports, parse_event_detail, parse_events};
pub use selection::candidates;
pub use snapshot::SnapshotFile;
pub use types::{CategoryMarkets, DisplayFormat, EventDetail, EventSummary, Market, MatchOdds, Outcome};

/// Anything that can hand out one-shot odds snapshots
#[async_trait]
pub trait OddsSource: Send + Sync {
    async fn events(&self) -> Result<Vec<EventSummary>>;
    async fn event(&self, event_id: u64) -> Result<EventDetail>;
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::error::KambiError;

use super::parse::{parse_event_detail, parse_events};
use super::types::{BetOfferResponse, EventDetail, EventSummary, ListViewResponse};
use super::OddsSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotBody {
    Event(BetOfferResponse),
    List(ListViewResponse),
}

/// Saved Kambi responses served as an odds source, for offline analysis
#[derive(Debug, Clone, Default)]
pub struct SnapshotFile {
    events: Vec<EventSummary>,
    details: HashMap<u64, EventDetail>,
}

impl SnapshotFile {
    /// Load any mix of `listView` and `betoffer/event` JSON dumps
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut snapshot = Self::default();
        for path in paths {
            let path = path.as_ref();
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
            snapshot
                .add_json(&text)
                .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        }
        info!(
            "Loaded snapshot: {} events, {} event details",
            snapshot.events.len(),
            snapshot.details.len()
        );
        Ok(snapshot)
    }

    pub fn add_json(&mut self, text: &str) -> Result<()> {
        match serde_json::from_str::<SnapshotBody>(text)? {
            // `{"events": []}` fits both shapes; it is an empty listing
            SnapshotBody::Event(response) if response.events.is_empty() && response.bet_offers.is_empty() => {}
            SnapshotBody::Event(response) => {
                let Some(event_id) = response.events.first().map(|e| e.id) else {
                    anyhow::bail!("betoffer snapshot has no event");
                };
                let detail = parse_event_detail(event_id, response)?;
                self.details.insert(event_id, detail);
            }
            SnapshotBody::List(response) => self.events.extend(parse_events(response)),
        }
        Ok(())
    }
}

#[async_trait]
impl OddsSource for SnapshotFile {
    async fn events(&self) -> Result<Vec<EventSummary>> {
        Ok(self.events.clone())
    }

    async fn event(&self, event_id: u64) -> Result<EventDetail> {
        self.details
            .get(&event_id)
            .cloned()
            .ok_or_else(|| KambiError::EventNotFound(event_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENT: &str = r#"{
        "events": [{"id": 42, "name": "Getafe - Real Betis", "homeName": "Getafe", "awayName": "Real Betis"}],
        "betOffers": [{"criterion": {"label": "Resultado Final"}, "outcomes": [
            {"label": "1", "odds": 2450, "type": "OT_ONE"},
            {"label": "X", "odds": 3100, "type": "OT_CROSS"},
            {"label": "2", "odds": 3000, "type": "OT_TWO"}
        ]}]
    }"#;

    const LIST: &str = r#"{"events": [{"event": {"id": 42, "name": "Getafe - Real Betis", "path": [{"name": "La Liga"}]}, "betOffers": []}]}"#;

    #[tokio::test]
    async fn test_snapshot_serves_both_shapes() {
        let mut snapshot = SnapshotFile::default();
        snapshot.add_json(EVENT).unwrap();
        snapshot.add_json(LIST).unwrap();

        let events = snapshot.events().await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].league, "La Liga");

        let detail = snapshot.event(42).await.unwrap();
        assert_eq!(detail.home_team, "Getafe");
        assert_eq!(detail.market_count(), 1);

        assert!(snapshot.event(7).await.is_err());
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let mut snapshot = SnapshotFile::default();
        snapshot.add_json(r#"{"events": []}"#).unwrap();
        assert!(snapshot.events().await.unwrap().is_empty());

        // offers without an event are still rejected
        assert!(snapshot.add_json(r#"{"events": [], "betOffers": [{"criterion": {"label": "x"}, "outcomes": []}]}"#).is_err());
    }

    #[test]
    fn test_rejects_garbage() {
        let mut snapshot = SnapshotFile::default();
        assert!(snapshot.add_json("[1, 2, 3]").is_err());
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::MarketCategory;

/// listView/football.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListViewResponse {
    #[serde(default)]
    pub events: Vec<ListViewEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListViewEntry {
    pub event: KambiEvent,
    #[serde(default)]
    pub bet_offers: Vec<BetOffer>,
}

/// betoffer/event/{id}.json
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOfferResponse {
    #[serde(default)]
    pub bet_offers: Vec<BetOffer>,
    #[serde(default)]
    pub events: Vec<KambiEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KambiEvent {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub home_name: Option<String>,
    #[serde(default)]
    pub away_name: Option<String>,
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub path: Vec<PathEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PathEntry {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOffer {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub criterion: Option<Criterion>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub outcomes: Vec<RawOutcome>,
    #[serde(default)]
    pub suspended: bool,
}

impl BetOffer {
    /// Criterion label, falling back to the offer's own label
    pub fn display_label(&self) -> &str {
        self.criterion
            .as_ref()
            .map(|c| c.label.as_str())
            .or(self.label.as_deref())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Criterion {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOutcome {
    #[serde(default)]
    pub label: String,
    /// Decimal odds × 1000
    #[serde(default)]
    pub odds: Option<u64>,
    /// Line × 1000
    #[serde(default)]
    pub line: Option<i64>,
    #[serde(default, rename = "type")]
    pub outcome_type: Option<String>,
    #[serde(default)]
    pub participant: Option<String>,
    #[serde(default)]
    pub participant_name: Option<String>,
}

/// Kambi prices are integers in thousandths
pub fn milli_to_decimal(value: i64) -> Decimal {
    Decimal::new(value, 3)
}

// ---------------------------------------------------------------------------
// Parsed shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOdds {
    pub home: Decimal,
    pub draw: Decimal,
    pub away: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub id: u64,
    pub name: String,
    pub league: String,
    pub start: Option<DateTime<Utc>>,
    pub home_team: String,
    pub away_team: String,
    pub odds: Option<MatchOdds>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub label: String,
    pub odds: Decimal,
    pub line: Option<Decimal>,
    pub outcome_type: Option<String>,
    pub participant: Option<String>,
}

impl Outcome {
    pub fn from_raw(raw: &RawOutcome) -> Self {
        Self {
            label: raw.label.clone(),
            odds: milli_to_decimal(raw.odds.unwrap_or(0) as i64),
            line: raw.line.map(milli_to_decimal),
            outcome_type: raw.outcome_type.clone(),
            participant: raw.participant.clone().or_else(|| raw.participant_name.clone()),
        }
    }
}

/// How a market is laid out on the event page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayFormat {
    Card,
    List,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Market {
    pub label: String,
    pub criterion_id: Option<u64>,
    pub outcomes: Vec<Outcome>,
    pub format: DisplayFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMarkets {
    pub category: MarketCategory,
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDetail {
    pub event_id: u64,
    pub name: String,
    pub home_team: String,
    pub away_team: String,
    pub start: Option<DateTime<Utc>>,
    pub state: String,
    /// One entry per category, in catalog order, empty categories included
    pub categories: Vec<CategoryMarkets>,
}

impl EventDetail {
    pub fn markets(&self, category: MarketCategory) -> &[Market] {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.markets.as_slice())
            .unwrap_or(&[])
    }

    pub fn market_count(&self) -> usize {
        self.categories.iter().map(|c| c.markets.len()).sum()
    }
}

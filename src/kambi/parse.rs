use std::collections::HashMap;

use crate::catalog::MarketCategory;
use crate::error::KambiError;

use super::categorize::{apply_order, categorize, redistribute};
use super::types::{
    milli_to_decimal, BetOffer, BetOfferResponse, CategoryMarkets, DisplayFormat, EventDetail,
    EventSummary, KambiEvent, ListViewResponse, Market, MatchOdds, Outcome,
};

/// Virtual and simulated football shows up in the same feed
pub const ESPORTS_PATTERNS: &[&str] = &[
    "esport", "iesport", "cyber", "battle", "batalla",
    "2x6min", "2x5min", "2x4min", "2x3min", "simulated",
];

pub fn is_esports(name: &str, league: &str) -> bool {
    let name = name.to_lowercase();
    let league = league.to_lowercase();
    ESPORTS_PATTERNS
        .iter()
        .any(|p| name.contains(p) || league.contains(p))
}

fn league_of(event: &KambiEvent) -> String {
    event
        .path
        .last()
        .map(|p| p.name.clone())
        .or_else(|| event.group.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Home/away names, falling back to splitting "Home - Away"
fn teams_of(event: &KambiEvent) -> (Option<String>, Option<String>) {
    let mut split = event.name.splitn(2, " - ").map(|s| s.trim().to_string());
    let home = event.home_name.clone().or_else(|| split.next());
    let away = event.away_name.clone().or_else(|| split.next());
    (home, away)
}

fn match_odds(offers: &[BetOffer], home: &str, away: &str) -> Option<MatchOdds> {
    let offer = offers
        .iter()
        .find(|o| !o.suspended && o.outcomes.len() == 3)?;

    let mut odds: HashMap<&str, _> = HashMap::new();
    for outcome in &offer.outcomes {
        let Some(price) = outcome.odds else { continue };
        let key = match outcome.label.as_str() {
            "1" => "1",
            "X" | "Empate" => "X",
            "2" => "2",
            l if l == home => "1",
            l if l == away => "2",
            _ => continue,
        };
        odds.insert(key, milli_to_decimal(price as i64));
    }

    Some(MatchOdds {
        home: *odds.get("1")?,
        draw: *odds.get("X")?,
        away: *odds.get("2")?,
    })
}

/// Event list with eSports removed
pub fn parse_events(response: ListViewResponse) -> Vec<EventSummary> {
    response
        .events
        .into_iter()
        .filter_map(|entry| {
            let event = entry.event;
            let league = league_of(&event);
            if is_esports(&event.name, &league) {
                return None;
            }
            let (home, away) = teams_of(&event);
            let home_team = home.unwrap_or_default();
            let away_team = away.unwrap_or_default();
            let odds = match_odds(&entry.bet_offers, &home_team, &away_team);

            Some(EventSummary {
                id: event.id,
                name: event.name,
                league,
                start: event.start,
                home_team,
                away_team,
                odds,
            })
        })
        .collect()
}

/// All open offers of one event, categorised, redistributed and ordered
pub fn parse_event_detail(event_id: u64, response: BetOfferResponse) -> Result<EventDetail, KambiError> {
    let event = response
        .events
        .iter()
        .find(|e| e.id == event_id)
        .or_else(|| response.events.first());

    if event.is_none() && response.bet_offers.is_empty() {
        return Err(KambiError::EventNotFound(event_id));
    }

    let (home, away) = event.map(teams_of).unwrap_or((None, None));
    let home_team = home.unwrap_or_else(|| "Local".to_string());
    let away_team = away.unwrap_or_else(|| "Visitante".to_string());

    let mut categories: Vec<CategoryMarkets> = MarketCategory::ALL
        .iter()
        .map(|&category| CategoryMarkets {
            category,
            markets: Vec::new(),
        })
        .collect();

    for offer in response.bet_offers.iter().filter(|o| !o.suspended) {
        let outcomes: Vec<Outcome> = offer
            .outcomes
            .iter()
            .filter(|o| o.odds.is_some())
            .map(Outcome::from_raw)
            .collect();
        if outcomes.is_empty() {
            continue;
        }

        let label = offer.display_label().to_string();
        let category = categorize(&label, &outcomes);
        if let Some(group) = categories.iter_mut().find(|c| c.category == category) {
            group.markets.push(Market {
                label,
                criterion_id: offer.criterion.as_ref().and_then(|c| c.id),
                outcomes,
                format: DisplayFormat::Card,
            });
        }
    }

    redistribute(&mut categories);
    apply_order(&mut categories, &home_team, &away_team);

    Ok(EventDetail {
        event_id,
        name: event
            .map(|e| e.name.clone())
            .unwrap_or_else(|| format!("{} - {}", home_team, away_team)),
        home_team,
        away_team,
        start: event.and_then(|e| e.start),
        state: event
            .and_then(|e| e.state.clone())
            .unwrap_or_else(|| "NOT_STARTED".to_string()),
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const LIST: &str = r#"{
        "events": [
            {
                "event": {
                    "id": 1001, "name": "Getafe - Real Betis",
                    "homeName": "Getafe", "awayName": "Real Betis",
                    "start": "2026-10-18T19:00:00Z",
                    "path": [{"id": 1, "name": "Fútbol"}, {"id": 2, "name": "España"}, {"id": 3, "name": "La Liga"}]
                },
                "betOffers": [{
                    "id": 5, "criterion": {"id": 1001159858, "label": "Tiempo reglamentario"},
                    "outcomes": [
                        {"label": "1", "odds": 2450, "type": "OT_ONE"},
                        {"label": "X", "odds": 3100, "type": "OT_CROSS"},
                        {"label": "2", "odds": 3000, "type": "OT_TWO"}
                    ]
                }]
            },
            {
                "event": {"id": 1002, "name": "Spain (Nick) - Italy (Luke) Esports Battle", "path": [{"name": "Esoccer Battle - 2x4min"}]},
                "betOffers": []
            },
            {
                "event": {"id": 1003, "name": "Millonarios - Santa Fe", "path": []},
                "betOffers": []
            }
        ]
    }"#;

    const DETAIL: &str = r#"{
        "events": [{"id": 1001, "name": "Getafe - Real Betis", "homeName": "Getafe", "awayName": "Real Betis", "state": "NOT_STARTED"}],
        "betOffers": [
            {"criterion": {"id": 1, "label": "Total de goles"}, "outcomes": [
                {"label": "Más de", "odds": 1950, "line": 2500, "type": "OT_OVER"},
                {"label": "Menos de", "odds": 1850, "line": 2500, "type": "OT_UNDER"}
            ]},
            {"criterion": {"id": 2, "label": "Resultado Final"}, "outcomes": [
                {"label": "1", "odds": 2450, "type": "OT_ONE"},
                {"label": "X", "odds": 3100, "type": "OT_CROSS"},
                {"label": "2", "odds": 3000, "type": "OT_TWO"}
            ]},
            {"criterion": {"id": 3, "label": "Total de tiros de esquina"}, "outcomes": [
                {"label": "Más de", "odds": 1800, "line": 9500, "type": "OT_OVER"},
                {"label": "Menos de", "odds": 1900, "line": 9500, "type": "OT_UNDER"}
            ]},
            {"criterion": {"id": 4, "label": "Ambos equipos marcarán"}, "suspended": true, "outcomes": [
                {"label": "Sí", "odds": 1900, "type": "OT_YES"}
            ]}
        ]
    }"#;

    #[test]
    fn test_is_esports() {
        assert!(is_esports("Spain (Nick) - Italy (Luke)", "Esoccer Battle - 2x4min"));
        assert!(is_esports("Cyber Live Arena", "Liga"));
        assert!(!is_esports("Getafe - Real Betis", "La Liga"));
    }

    #[test]
    fn test_parse_events() {
        let response: ListViewResponse = serde_json::from_str(LIST).unwrap();
        let events = parse_events(response);
        assert_eq!(events.len(), 2);

        let getafe = &events[0];
        assert_eq!(getafe.league, "La Liga");
        assert_eq!(getafe.home_team, "Getafe");
        let odds = getafe.odds.as_ref().unwrap();
        assert_eq!(odds.home, dec!(2.450));
        assert_eq!(odds.draw, dec!(3.1));

        let millos = &events[1];
        assert_eq!(millos.league, "Unknown");
        assert_eq!(millos.home_team, "Millonarios");
        assert_eq!(millos.away_team, "Santa Fe");
        assert!(millos.odds.is_none());
    }

    #[test]
    fn test_parse_event_detail() {
        let response: BetOfferResponse = serde_json::from_str(DETAIL).unwrap();
        let detail = parse_event_detail(1001, response).unwrap();

        assert_eq!(detail.categories.len(), MarketCategory::ALL.len());
        assert_eq!(detail.market_count(), 3);

        let full_time = detail.markets(MarketCategory::TiempoReglamentario);
        assert_eq!(full_time[0].label, "Resultado Final");
        assert_eq!(full_time[1].format, DisplayFormat::List);
        assert_eq!(full_time[1].outcomes[0].line, Some(dec!(2.5)));

        assert_eq!(detail.markets(MarketCategory::Corners).len(), 1);
        assert_eq!(detail.state, "NOT_STARTED");
    }

    #[test]
    fn test_detail_defaults_and_not_found() {
        assert!(matches!(
            parse_event_detail(7, BetOfferResponse::default()),
            Err(KambiError::EventNotFound(7))
        ));

        let response: BetOfferResponse = serde_json::from_str(
            r#"{"betOffers": [{"criterion": {"label": "1x2"}, "outcomes": [{"label": "1", "odds": 1500}]}]}"#,
        )
        .unwrap();
        let detail = parse_event_detail(7, response).unwrap();
        assert_eq!(detail.home_team, "Local");
        assert_eq!(detail.away_team, "Visitante");
        assert_eq!(detail.state, "NOT_STARTED");
    }
}

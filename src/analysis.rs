//! One analysis run: bookmaker event -> stored form -> predictions -> value bets

use anyhow::{Context, Result};
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::alerts::AlertClient;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::kambi::{candidates, OddsSource};
use crate::models::EloRatings;
use crate::predictions::corners::CornersPredictor;
use crate::predictions::{MatchInputs, MatchPredictor, MatchResultPredictor};
use crate::store::{Store, TeamAverages};
use crate::team_mapping::{resolve_team, TeamMatch};
use crate::value::{find_value_bets, ValueBet};

const ELO_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct EventAnalysis {
    pub run_id: Uuid,
    pub event_id: u64,
    pub event_name: String,
    pub home: TeamMatch,
    pub away: TeamMatch,
    pub home_xg: f64,
    pub away_xg: f64,
    pub priced_outcomes: usize,
    pub value_bets: Vec<ValueBet>,
}

/// Model inputs from last-N form of both teams plus ELO from the full history.
///
/// Goal averages become attack/defence strengths relative to the league average.
pub fn match_inputs(store: &Store, config: &Config, home: &str, away: &str) -> Result<Option<MatchInputs>> {
    let Some(h) = store.team_averages(home, config.last_n_games, true)? else {
        warn!("No history for {}", home);
        return Ok(None);
    };
    let Some(a) = store.team_averages(away, config.last_n_games, true)? else {
        warn!("No history for {}", away);
        return Ok(None);
    };

    let (home_xg, away_xg) = config.poisson_model().expected_goals(
        MatchResultPredictor::team_strength(h.goals_for, h.goals_against, config.league_avg_goals),
        MatchResultPredictor::team_strength(a.goals_for, a.goals_against, config.league_avg_goals),
    );

    let mut elo = EloRatings::default();
    elo.replay(&store.fixtures()?);
    let elo = (elo.ratings().contains_key(home) && elo.ratings().contains_key(away))
        .then(|| elo.predict(home, away));

    Ok(Some(MatchInputs {
        home_xg,
        away_xg,
        corners: corners_input(&h, &a),
        cards: match (h.cards, a.cards) {
            (Some(hc), Some(ac)) => Some((hc, ac, None)),
            _ => None,
        },
        elo,
        ..MatchInputs::default()
    }))
}

fn corners_input(h: &TeamAverages, a: &TeamAverages) -> Option<(f64, f64)> {
    let expected = CornersPredictor::expected_from_averages(
        h.corners_for?,
        h.corners_against?,
        a.corners_for?,
        a.corners_against?,
    );
    (expected.0 > 0.0 && expected.1 > 0.0).then_some(expected)
}

/// Analyse one event end to end. Returns `None` when either team cannot be
/// mapped or has no history.
pub async fn analyze_event(
    source: &dyn OddsSource,
    store: &mut Store,
    config: &Config,
    alerts: &AlertClient,
    event_id: u64,
) -> Result<Option<EventAnalysis>> {
    let detail = source
        .event(event_id)
        .await
        .with_context(|| format!("Failed to load event {}", event_id))?;
    info!("Analysing {} ({} markets)", detail.name, detail.market_count());

    let (Some(home), Some(away)) = (
        resolve_team(store, &detail.home_team)?,
        resolve_team(store, &detail.away_team)?,
    ) else {
        alerts
            .warning(&format!("Could not map teams for {}", detail.name))
            .await;
        return Ok(None);
    };

    let Some(inputs) = match_inputs(store, config, &home.team, &away.team)? else {
        return Ok(None);
    };

    let report = MatchPredictor::new(config.poisson_model(), ELO_WEIGHT)
        .predict(&inputs)
        .context("Prediction failed")?;

    let priced = candidates(&Catalog::builtin(), &detail, &report);
    let min_edge = config.min_edge.to_f64().unwrap_or(0.05);
    let value_bets = find_value_bets(&priced, min_edge);

    let run_id = Uuid::new_v4();
    store.record_value_bets(run_id, event_id, &detail.name, &value_bets)?;
    info!(
        "{}: {} priced outcomes, {} value bets (run {})",
        detail.name,
        priced.len(),
        value_bets.len(),
        run_id
    );
    alerts.value_bets_found(&detail.name, &value_bets).await;

    Ok(Some(EventAnalysis {
        run_id,
        event_id,
        event_name: detail.name,
        home,
        away,
        home_xg: inputs.home_xg,
        away_xg: inputs.away_xg,
        priced_outcomes: priced.len(),
        value_bets,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kambi::SnapshotFile;
    use crate::types::{Fixture, TeamMatchStats};
    use chrono::{Duration, TimeZone, Utc};

    fn history() -> Vec<Fixture> {
        let start = Utc.with_ymd_and_hms(2025, 8, 1, 18, 0, 0).unwrap();
        let stats = |corners| {
            Some(TeamMatchStats {
                corner_kicks: Some(corners),
                yellow_cards: Some(2),
                ..TeamMatchStats::default()
            })
        };
        (0..6)
            .map(|i| {
                let (home, away) = if i % 2 == 0 { ("Getafe", "Real Betis") } else { ("Real Betis", "Getafe") };
                Fixture {
                    id: i,
                    league: None,
                    season: None,
                    date: start + Duration::days(7 * i),
                    home_team: home.to_string(),
                    away_team: away.to_string(),
                    home_goals: Some(2),
                    away_goals: Some(1),
                    referee: None,
                    home_stats: stats(6),
                    away_stats: stats(4),
                }
            })
            .collect()
    }

    const EVENT: &str = r#"{
        "events": [{"id": 9, "name": "Getafe CF - Real Betis", "homeName": "Getafe CF", "awayName": "Real Betis"}],
        "betOffers": [
            {"criterion": {"label": "Resultado Final"}, "outcomes": [
                {"label": "1", "odds": 9000, "type": "OT_ONE"},
                {"label": "X", "odds": 1050, "type": "OT_CROSS"},
                {"label": "2", "odds": 1050, "type": "OT_TWO"}
            ]},
            {"criterion": {"label": "Total de goles"}, "outcomes": [
                {"label": "Más de", "odds": 1900, "line": 2500, "type": "OT_OVER"},
                {"label": "Menos de", "odds": 1900, "line": 2500, "type": "OT_UNDER"}
            ]}
        ]
    }"#;

    #[test]
    fn test_match_inputs_from_history() {
        let mut store = Store::in_memory().unwrap();
        store.import_fixtures(&history()).unwrap();

        let inputs = match_inputs(&store, &Config::default(), "Getafe", "Real Betis")
            .unwrap()
            .unwrap();
        assert!(inputs.home_xg > 0.0 && inputs.away_xg > 0.0);
        assert!(inputs.corners.is_some());
        assert!(inputs.cards.is_some());
        assert!(inputs.elo.is_some());

        assert!(match_inputs(&store, &Config::default(), "Getafe", "Nobody").unwrap().is_none());
    }

    #[test]
    fn test_league_average_scales_expected_goals() {
        let mut store = Store::in_memory().unwrap();
        store.import_fixtures(&history()).unwrap();

        let config = |league_avg_goals| Config {
            league_avg_goals,
            home_advantage: 1.0,
            ..Config::default()
        };
        let low = match_inputs(&store, &config(1.0), "Getafe", "Real Betis").unwrap().unwrap();
        let high = match_inputs(&store, &config(2.0), "Getafe", "Real Betis").unwrap().unwrap();

        // xG = scored * conceded / league average
        assert!((low.home_xg / high.home_xg - 2.0).abs() < 1e-9);
        assert!((low.away_xg / high.away_xg - 2.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_snapshot_event() {
        let mut store = Store::in_memory().unwrap();
        store.import_fixtures(&history()).unwrap();

        let mut snapshot = SnapshotFile::default();
        snapshot.add_json(EVENT).unwrap();

        let analysis = analyze_event(&snapshot, &mut store, &Config::default(), &AlertClient::new(None), 9)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(analysis.home.team, "Getafe");
        assert_eq!(analysis.priced_outcomes, 5);
        // 9.00 on the home side is far above any fair price
        assert!(analysis
            .value_bets
            .iter()
            .any(|b| b.selection == "Resultado Final - 1"));
        assert_eq!(store.value_bet_count(analysis.run_id).unwrap() as usize, analysis.value_bets.len());
    }
}

//! Value-bet detection: model probability against the bookmaker's price

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::MarketKind;
use crate::predictions::{MarketPrediction, Pick, Side};

/// 1 / odds, or `None` for odds that cannot be a real price
pub fn implied_probability(odds: Decimal) -> Option<f64> {
    if odds <= Decimal::ONE {
        return None;
    }
    odds.to_f64().map(|o| 1.0 / o)
}

/// Bookmaker margin: Σ 1/odds − 1 over a complete market
pub fn overround(odds: &[Decimal]) -> Option<f64> {
    let implied: Option<Vec<f64>> = odds.iter().map(|o| implied_probability(*o)).collect();
    implied.map(|p| p.iter().sum::<f64>() - 1.0)
}

/// Implied probabilities with the margin removed proportionally
pub fn fair_probabilities(odds: &[Decimal]) -> Option<Vec<f64>> {
    let implied: Vec<f64> = odds
        .iter()
        .map(|o| implied_probability(*o))
        .collect::<Option<_>>()?;
    let total: f64 = implied.iter().sum();
    if total <= 0.0 {
        return None;
    }
    Some(implied.iter().map(|p| p / total).collect())
}

/// A bookmaker price matched to a model prediction
#[derive(Debug, Clone)]
pub struct Candidate {
    pub prediction: MarketPrediction,
    /// Bookmaker's label for the selection, kept for display
    pub label: String,
    pub odds: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueBet {
    pub market: MarketKind,
    pub selection: String,
    pub pick: Pick,
    pub side: Option<Side>,
    pub line: Option<f64>,
    pub probability: f64,
    pub odds: Decimal,
    pub implied: f64,
    pub edge: f64,
    /// Full Kelly stake as a fraction of bankroll
    pub kelly: f64,
}

impl ValueBet {
    pub fn evaluate(candidate: &Candidate) -> Option<Self> {
        let implied = implied_probability(candidate.odds)?;
        let odds = candidate.odds.to_f64()?;
        let p = candidate.prediction.probability;
        let edge = p - implied;

        Some(Self {
            market: candidate.prediction.kind,
            selection: candidate.label.clone(),
            pick: candidate.prediction.pick.clone(),
            side: candidate.prediction.side,
            line: candidate.prediction.line,
            probability: p,
            odds: candidate.odds,
            implied,
            edge,
            kelly: edge / (odds - 1.0),
        })
    }

    /// Kelly scaled by `fraction` and capped at `cap`
    pub fn stake_fraction(&self, fraction: f64, cap: f64) -> f64 {
        (self.kelly * fraction).clamp(0.0, cap)
    }

    pub fn expected_value(&self) -> f64 {
        self.probability * self.odds.to_f64().unwrap_or(0.0) - 1.0
    }
}

/// Candidates whose edge is at least `min_edge`, best edge first
pub fn find_value_bets(candidates: &[Candidate], min_edge: f64) -> Vec<ValueBet> {
    let mut bets: Vec<ValueBet> = candidates
        .iter()
        .filter_map(ValueBet::evaluate)
        .filter(|bet| bet.edge >= min_edge)
        .collect();
    bets.sort_by(|a, b| b.edge.total_cmp(&a.edge));
    bets
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn candidate(kind: MarketKind, pick: Pick, p: f64, odds: Decimal) -> Candidate {
        Candidate {
            prediction: MarketPrediction {
                kind,
                pick,
                side: None,
                line: None,
                probability: p,
            },
            label: "x".to_string(),
            odds,
        }
    }

    #[test]
    fn test_implied_probability() {
        assert_eq!(implied_probability(dec!(2.0)), Some(0.5));
        assert_eq!(implied_probability(dec!(1.0)), None);
        assert_eq!(implied_probability(dec!(0.5)), None);
    }

    #[test]
    fn test_overround() {
        let margin = overround(&[dec!(1.90), dec!(1.90)]).unwrap();
        assert!((margin - (2.0 / 1.9 - 1.0)).abs() < 1e-12);
        assert!(overround(&[dec!(2.0), dec!(1.0)]).is_none());

        let fair = fair_probabilities(&[dec!(1.90), dec!(1.90)]).unwrap();
        assert!((fair[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_edge_and_kelly() {
        let bet = ValueBet::evaluate(&candidate(MarketKind::MatchResult, Pick::Home, 0.55, dec!(2.10))).unwrap();
        let implied = 1.0 / 2.1;
        assert!((bet.edge - (0.55 - implied)).abs() < 1e-12);
        assert!((bet.kelly - (0.55 - implied) / 1.1).abs() < 1e-12);
        assert!(bet.stake_fraction(0.25, 0.05) <= 0.05);
        assert!(bet.expected_value() > 0.0);
    }

    #[test]
    fn test_find_value_bets_filters_and_sorts() {
        let candidates = vec![
            candidate(MarketKind::MatchResult, Pick::Home, 0.50, dec!(2.50)),
            candidate(MarketKind::MatchResult, Pick::Draw, 0.20, dec!(3.40)),
            candidate(MarketKind::BothTeamsToScore, Pick::Yes, 0.62, dec!(1.85)),
            candidate(MarketKind::BothTeamsToScore, Pick::No, 0.38, dec!(1.00)),
        ];
        let bets = find_value_bets(&candidates, 0.05);
        assert_eq!(bets.len(), 2);
        assert_eq!(bets[0].pick, Pick::Home);
        assert!(bets[0].edge >= bets[1].edge);
    }
}

//! Per-market predictors and the combined match report
//!
//! Each predictor covers one family of markets. `MatchPredictor` runs them
//! all for one fixture and flattens the result into `MarketPrediction`s that
//! can be lined up against bookmaker prices.

pub mod cards;
pub mod corners;
pub mod exact_score;
pub mod goals;
pub mod goalscorer;
pub mod handicap;
pub mod match_result;

use serde::Serialize;

use crate::catalog::MarketKind;
use crate::error::ModelError;
use crate::models::{OverUnder, PoissonModel, ThreeWay};
use crate::types::PlayerProfile;

pub use cards::{CardsPrediction, CardsPredictor};
pub use corners::{CornersPrediction, CornersPredictor};
pub use exact_score::{ExactScorePrediction, ExactScorePredictor};
pub use goals::{GoalsPrediction, GoalsPredictor};
pub use goalscorer::{GoalscorerPrediction, GoalscorerPredictor};
pub use handicap::{HandicapPrediction, HandicapPredictor};
pub use match_result::{MatchResultPrediction, MatchResultPredictor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Side {
    Home,
    Away,
}

/// The outcome a price is offered on
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Pick {
    Home,
    Draw,
    Away,
    HomeOrDraw,
    HomeOrAway,
    DrawOrAway,
    Over,
    Under,
    Yes,
    No,
    Odd,
    Even,
    Player(String),
}

/// One priced selection with the model's probability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketPrediction {
    pub kind: MarketKind,
    pub pick: Pick,
    /// Team the market is about (team totals, handicaps, team corners)
    pub side: Option<Side>,
    pub line: Option<f64>,
    pub probability: f64,
}

impl MarketPrediction {
    fn new(kind: MarketKind, pick: Pick, probability: f64) -> Self {
        Self {
            kind,
            pick,
            side: None,
            line: None,
            probability,
        }
    }

    fn at(mut self, side: Option<Side>, line: Option<f64>) -> Self {
        self.side = side;
        self.line = line;
        self
    }

    /// Does this prediction price the same selection?
    pub fn matches(&self, kind: MarketKind, pick: &Pick, side: Option<Side>, line: Option<f64>) -> bool {
        self.kind == kind
            && &self.pick == pick
            && self.side == side
            && match (self.line, line) {
                (Some(a), Some(b)) => (a - b).abs() < 1e-9,
                (None, None) => true,
                _ => false,
            }
    }
}

/// Everything known about a fixture before kick-off
#[derive(Debug, Clone, Default)]
pub struct MatchInputs {
    pub home_xg: f64,
    pub away_xg: f64,
    /// Expected corners (home, away)
    pub corners: Option<(f64, f64)>,
    /// Cards per match (home, away) and the referee's average if known
    pub cards: Option<(f64, f64, Option<f64>)>,
    pub elo: Option<ThreeWay>,
    pub home_players: Vec<PlayerProfile>,
    pub away_players: Vec<PlayerProfile>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub match_result: MatchResultPrediction,
    pub goals: GoalsPrediction,
    pub handicap: HandicapPrediction,
    pub exact_score: ExactScorePrediction,
    pub corners: Option<CornersPrediction>,
    pub cards: Option<CardsPrediction>,
    pub goalscorers: Option<GoalscorerPrediction>,
}

#[derive(Debug, Clone, Copy)]
pub struct MatchPredictor {
    pub model: PoissonModel,
    pub elo_weight: f64,
}

impl Default for MatchPredictor {
    fn default() -> Self {
        Self {
            model: PoissonModel::default(),
            elo_weight: 0.3,
        }
    }
}

impl MatchPredictor {
    pub fn new(model: PoissonModel, elo_weight: f64) -> Self {
        Self { model, elo_weight }
    }

    pub fn predict(&self, inputs: &MatchInputs) -> Result<MatchReport, ModelError> {
        let (home_xg, away_xg) = (inputs.home_xg, inputs.away_xg);

        let result_predictor = MatchResultPredictor::new(self.model).with_elo_weight(self.elo_weight);
        let mut match_result = result_predictor.predict(home_xg, away_xg)?;
        if let Some(elo) = &inputs.elo {
            match_result = result_predictor.blend_elo(&match_result, elo);
        }

        let corners = match inputs.corners {
            Some((home, away)) => Some(CornersPredictor::default().predict(home, away)?),
            None => None,
        };
        let cards = match inputs.cards {
            Some((home, away, referee)) => Some(CardsPredictor.predict(home, away, referee)?),
            None => None,
        };
        let goalscorers = if inputs.home_players.is_empty() && inputs.away_players.is_empty() {
            None
        } else {
            Some(GoalscorerPredictor::default().predict_match(
                &inputs.home_players,
                &inputs.away_players,
                home_xg,
                away_xg,
            ))
        };

        Ok(MatchReport {
            match_result,
            goals: GoalsPredictor::new(self.model).predict(home_xg, away_xg)?,
            handicap: HandicapPredictor::new(self.model).predict(home_xg, away_xg)?,
            exact_score: ExactScorePredictor::new(self.model).predict(home_xg, away_xg)?,
            corners,
            cards,
            goalscorers,
        })
    }
}

fn over_under(out: &mut Vec<MarketPrediction>, kind: MarketKind, side: Option<Side>, lines: &[OverUnder]) {
    for ou in lines {
        out.push(MarketPrediction::new(kind, Pick::Over, ou.over).at(side, Some(ou.line)));
        out.push(MarketPrediction::new(kind, Pick::Under, ou.under).at(side, Some(ou.line)));
    }
}

fn three_way(out: &mut Vec<MarketPrediction>, kind: MarketKind, p: &ThreeWay) {
    out.push(MarketPrediction::new(kind, Pick::Home, p.home));
    out.push(MarketPrediction::new(kind, Pick::Draw, p.draw));
    out.push(MarketPrediction::new(kind, Pick::Away, p.away));
}

impl MatchReport {
    /// Flatten into priced selections
    pub fn selections(&self) -> Vec<MarketPrediction> {
        use MarketKind as K;
        let mut out = Vec::new();

        let mr = &self.match_result;
        three_way(&mut out, K::MatchResult, &mr.result);
        out.push(MarketPrediction::new(K::DoubleChance, Pick::HomeOrDraw, mr.double_chance.home_or_draw));
        out.push(MarketPrediction::new(K::DoubleChance, Pick::HomeOrAway, mr.double_chance.home_or_away));
        out.push(MarketPrediction::new(K::DoubleChance, Pick::DrawOrAway, mr.double_chance.draw_or_away));
        out.push(MarketPrediction::new(K::DrawNoBet, Pick::Home, mr.draw_no_bet.home));
        out.push(MarketPrediction::new(K::DrawNoBet, Pick::Away, mr.draw_no_bet.away));

        let g = &self.goals;
        over_under(&mut out, K::TotalGoals, None, &g.over_under);
        over_under(&mut out, K::TeamTotalGoals, Some(Side::Home), &g.home.lines);
        over_under(&mut out, K::TeamTotalGoals, Some(Side::Away), &g.away.lines);
        over_under(&mut out, K::FirstHalfGoals, None, &g.first_half.over_under);
        over_under(&mut out, K::SecondHalfGoals, None, &g.second_half.over_under);
        out.push(MarketPrediction::new(K::BothTeamsToScore, Pick::Yes, g.btts.yes));
        out.push(MarketPrediction::new(K::BothTeamsToScore, Pick::No, g.btts.no));
        out.push(MarketPrediction::new(K::OddEvenGoals, Pick::Odd, g.odd));
        out.push(MarketPrediction::new(K::OddEvenGoals, Pick::Even, g.even));

        for eh in &self.handicap.european {
            let line = Some(eh.line as f64);
            let side = Some(eh.side);
            let (win, lose) = match eh.side {
                Side::Home => (Pick::Home, Pick::Away),
                Side::Away => (Pick::Away, Pick::Home),
            };
            out.push(MarketPrediction::new(K::EuropeanHandicap, win, eh.win).at(side, line));
            out.push(MarketPrediction::new(K::EuropeanHandicap, Pick::Draw, eh.draw).at(side, line));
            out.push(MarketPrediction::new(K::EuropeanHandicap, lose, eh.lose).at(side, line));
        }
        for ah in &self.handicap.asian {
            let pick = match ah.side {
                Side::Home => Pick::Home,
                Side::Away => Pick::Away,
            };
            out.push(
                MarketPrediction::new(K::AsianHandicap, pick, ah.effective_probability())
                    .at(Some(ah.side), Some(ah.line)),
            );
        }

        if let Some(c) = &self.corners {
            over_under(&mut out, K::TotalCorners, None, &c.over_under);
            over_under(&mut out, K::TeamCorners, Some(Side::Home), &c.home_lines);
            over_under(&mut out, K::TeamCorners, Some(Side::Away), &c.away_lines);
            three_way(&mut out, K::MostCorners, &c.more_corners);
        }
        if let Some(c) = &self.cards {
            over_under(&mut out, K::TotalCards, None, &c.over_under);
            over_under(&mut out, K::TeamCards, Some(Side::Home), &c.home_lines);
            over_under(&mut out, K::TeamCards, Some(Side::Away), &c.away_lines);
        }
        if let Some(gs) = &self.goalscorers {
            for p in gs.home.iter().chain(&gs.away) {
                out.push(
                    MarketPrediction::new(K::AnytimeScorer, Pick::Player(p.name.clone()), p.anytime)
                        .at(Some(p.side), None),
                );
                out.push(
                    MarketPrediction::new(K::TwoOrMoreGoals, Pick::Player(p.name.clone()), p.two_or_more)
                        .at(Some(p.side), None),
                );
            }
            for f in &gs.first_scorer {
                out.push(MarketPrediction::new(K::FirstScorer, Pick::Player(f.name.clone()), f.probability));
            }
        }

        out
    }

    /// Probability for one selection, if the report prices it
    pub fn probability(&self, kind: MarketKind, pick: &Pick, side: Option<Side>, line: Option<f64>) -> Option<f64> {
        self.selections()
            .into_iter()
            .find(|p| p.matches(kind, pick, side, line))
            .map(|p| p.probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> MatchInputs {
        MatchInputs {
            home_xg: 1.6,
            away_xg: 1.0,
            corners: Some((5.8, 4.4)),
            cards: Some((2.1, 2.4, None)),
            ..MatchInputs::default()
        }
    }

    #[test]
    fn test_report_covers_optional_markets() {
        let report = MatchPredictor::default().predict(&inputs()).unwrap();
        assert!(report.corners.is_some());
        assert!(report.cards.is_some());
        assert!(report.goalscorers.is_none());

        let bare = MatchPredictor::default()
            .predict(&MatchInputs { home_xg: 1.0, away_xg: 1.0, ..MatchInputs::default() })
            .unwrap();
        assert!(bare.corners.is_none());
        assert!(!bare.selections().iter().any(|s| s.kind == MarketKind::TotalCorners));
    }

    #[test]
    fn test_selections_probabilities_in_range() {
        let report = MatchPredictor::default().predict(&inputs()).unwrap();
        for s in report.selections() {
            assert!((0.0..=1.0 + 1e-9).contains(&s.probability), "{:?}", s);
        }
    }

    #[test]
    fn test_lookup_by_line_and_side() {
        let report = MatchPredictor::default().predict(&inputs()).unwrap();
        let over = report
            .probability(MarketKind::TotalGoals, &Pick::Over, None, Some(2.5))
            .unwrap();
        assert_eq!(over, report.goals.over_under[2].over);

        let team = report.probability(MarketKind::TeamTotalGoals, &Pick::Over, Some(Side::Away), Some(0.5));
        assert_eq!(team, Some(report.goals.away.lines[0].over));
        assert!(report.probability(MarketKind::TotalGoals, &Pick::Over, None, Some(9.5)).is_none());
    }

    #[test]
    fn test_elo_is_blended() {
        let plain = MatchPredictor::default().predict(&inputs()).unwrap();
        let with_elo = MatchPredictor::default()
            .predict(&MatchInputs {
                elo: Some(ThreeWay { home: 0.1, draw: 0.2, away: 0.7 }),
                ..inputs()
            })
            .unwrap();
        assert!(with_elo.match_result.result.away > plain.match_result.result.away);
    }
}

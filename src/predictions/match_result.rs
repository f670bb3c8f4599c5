//! 1X2, double chance and draw no bet

use serde::Serialize;

use crate::error::ModelError;
use crate::models::{PoissonModel, ThreeWay, TeamStrength};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DoubleChance {
    pub home_or_draw: f64,
    pub home_or_away: f64,
    pub draw_or_away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawNoBet {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResultPrediction {
    pub home_xg: f64,
    pub away_xg: f64,
    pub result: ThreeWay,
    pub double_chance: DoubleChance,
    pub draw_no_bet: DrawNoBet,
}

impl MatchResultPrediction {
    pub fn from_result(home_xg: f64, away_xg: f64, result: ThreeWay) -> Self {
        let non_draw = result.home + result.away;
        let draw_no_bet = if non_draw > 0.0 {
            DrawNoBet {
                home: result.home / non_draw,
                away: result.away / non_draw,
            }
        } else {
            DrawNoBet { home: 0.5, away: 0.5 }
        };

        Self {
            home_xg,
            away_xg,
            result,
            double_chance: DoubleChance {
                home_or_draw: result.home + result.draw,
                home_or_away: non_draw,
                draw_or_away: result.draw + result.away,
            },
            draw_no_bet,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatchResultPredictor {
    model: PoissonModel,
    /// Share given to the ELO prediction when blending, 0 disables it
    elo_weight: f64,
}

impl Default for MatchResultPredictor {
    fn default() -> Self {
        Self::new(PoissonModel::default())
    }
}

impl MatchResultPredictor {
    pub fn new(model: PoissonModel) -> Self {
        Self {
            model,
            elo_weight: 0.0,
        }
    }

    pub fn with_elo_weight(mut self, weight: f64) -> Self {
        self.elo_weight = weight.clamp(0.0, 1.0);
        self
    }

    /// Attack/defence relative to the league average; 1.0 when the league average is unknown
    pub fn team_strength(goals_scored_avg: f64, goals_conceded_avg: f64, league_avg: f64) -> TeamStrength {
        if league_avg > 0.0 {
            TeamStrength {
                attack: goals_scored_avg / league_avg,
                defense: goals_conceded_avg / league_avg,
            }
        } else {
            TeamStrength { attack: 1.0, defense: 1.0 }
        }
    }

    pub fn predict(&self, home_xg: f64, away_xg: f64) -> Result<MatchResultPrediction, ModelError> {
        let matrix = self.model.score_matrix(home_xg, away_xg)?;
        Ok(MatchResultPrediction::from_result(
            matrix.home_xg,
            matrix.away_xg,
            matrix.match_result(),
        ))
    }

    /// Predict from per-team goal averages (scored/conceded per match)
    pub fn predict_from_averages(
        &self,
        home_scored: f64,
        home_conceded: f64,
        away_scored: f64,
        away_conceded: f64,
        league_avg: f64,
    ) -> Result<MatchResultPrediction, ModelError> {
        let home = Self::team_strength(home_scored, home_conceded, league_avg);
        let away = Self::team_strength(away_scored, away_conceded, league_avg);
        let (home_xg, away_xg) = self.model.expected_goals(home, away);
        self.predict(home_xg, away_xg)
    }

    /// Blend an ELO 1X2 into a Poisson prediction using the configured weight
    pub fn blend_elo(&self, prediction: &MatchResultPrediction, elo: &ThreeWay) -> MatchResultPrediction {
        if self.elo_weight == 0.0 {
            return prediction.clone();
        }
        let result = prediction.result.blend(elo, self.elo_weight);
        MatchResultPrediction::from_result(prediction.home_xg, prediction.away_xg, result)
    }
}

//! Correct score, victory margins and grouped scorelines from the score matrix

use serde::Serialize;

use crate::error::ModelError;
use crate::models::{PoissonModel, ScoreMatrix, Scoreline};

pub const TOP_SCORELINES: usize = 15;
pub const GROUP_SIZE: usize = 5;
/// Correct-score boards rarely go past 6-6
pub const MAX_GOALS: u32 = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VictoryMargins {
    pub home_1: f64,
    pub home_2: f64,
    pub home_3_plus: f64,
    pub draw_nil: f64,
    pub draw_with_goals: f64,
    pub away_1: f64,
    pub away_2: f64,
    pub away_3_plus: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreGroups {
    pub home_wins: Vec<Scoreline>,
    pub draws: Vec<Scoreline>,
    pub away_wins: Vec<Scoreline>,
    /// Four or more goals
    pub high_scoring: Vec<Scoreline>,
    /// Two goals or fewer
    pub low_scoring: Vec<Scoreline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExactScorePrediction {
    pub home_xg: f64,
    pub away_xg: f64,
    /// Every scoreline up to `MAX_GOALS` a side, most likely first
    pub scorelines: Vec<Scoreline>,
    pub margins: VictoryMargins,
}

impl ExactScorePrediction {
    pub fn top(&self) -> &[Scoreline] {
        &self.scorelines[..self.scorelines.len().min(TOP_SCORELINES)]
    }

    pub fn probability(&self, home: u32, away: u32) -> f64 {
        self.scorelines
            .iter()
            .find(|s| s.home == home && s.away == away)
            .map(|s| s.probability)
            .unwrap_or(0.0)
    }

    /// Top five scorelines in each group
    pub fn grouped(&self) -> ScoreGroups {
        let mut groups = ScoreGroups::default();
        // scorelines are already sorted, so pushing in order keeps each group sorted
        for s in &self.scorelines {
            let bucket = if s.home > s.away {
                &mut groups.home_wins
            } else if s.home == s.away {
                &mut groups.draws
            } else {
                &mut groups.away_wins
            };
            if bucket.len() < GROUP_SIZE {
                bucket.push(*s);
            }

            let total = s.home + s.away;
            let by_total = if total >= 4 {
                Some(&mut groups.high_scoring)
            } else if total <= 2 {
                Some(&mut groups.low_scoring)
            } else {
                None
            };
            if let Some(bucket) = by_total {
                if bucket.len() < GROUP_SIZE {
                    bucket.push(*s);
                }
            }
        }
        groups
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ExactScorePredictor {
    model: PoissonModel,
}

impl Default for ExactScorePredictor {
    fn default() -> Self {
        Self::new(PoissonModel::default())
    }
}

impl ExactScorePredictor {
    pub fn new(model: PoissonModel) -> Self {
        Self {
            model: PoissonModel {
                max_goals: MAX_GOALS,
                ..model
            },
        }
    }

    pub fn predict(&self, home_xg: f64, away_xg: f64) -> Result<ExactScorePrediction, ModelError> {
        let matrix = self.model.score_matrix(home_xg, away_xg)?;
        Ok(ExactScorePrediction {
            home_xg,
            away_xg,
            scorelines: matrix.correct_score(),
            margins: victory_margins(&matrix),
        })
    }
}

pub fn victory_margins(matrix: &ScoreMatrix) -> VictoryMargins {
    let mut m = VictoryMargins::default();
    for s in matrix.iter() {
        let diff = s.home as i64 - s.away as i64;
        let slot = match diff {
            0 if s.home == 0 => &mut m.draw_nil,
            0 => &mut m.draw_with_goals,
            1 => &mut m.home_1,
            2 => &mut m.home_2,
            d if d >= 3 => &mut m.home_3_plus,
            -1 => &mut m.away_1,
            -2 => &mut m.away_2,
            _ => &mut m.away_3_plus,
        };
        *slot += s.probability;
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorelines_sorted_and_top_fifteen() {
        let p = ExactScorePredictor::default().predict(1.5, 1.2).unwrap();
        assert_eq!(p.scorelines.len(), 49);
        assert_eq!(p.top().len(), 15);
        assert!(p.scorelines.windows(2).all(|w| w[0].probability >= w[1].probability));
        let total: f64 = p.scorelines.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_margins_partition() {
        let p = ExactScorePredictor::default().predict(1.5, 1.2).unwrap();
        let m = p.margins;
        let sum = m.home_1 + m.home_2 + m.home_3_plus + m.draw_nil + m.draw_with_goals
            + m.away_1 + m.away_2 + m.away_3_plus;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((m.draw_nil - p.probability(0, 0)).abs() < 1e-12);
        assert!(m.home_1 > m.home_2);
    }

    #[test]
    fn test_groups() {
        let p = ExactScorePredictor::default().predict(1.5, 1.2).unwrap();
        let g = p.grouped();
        assert_eq!(g.draws.len(), 5);
        assert!(g.home_wins.iter().all(|s| s.home > s.away));
        assert!(g.high_scoring.iter().all(|s| s.home + s.away >= 4));
        assert!(g.low_scoring.iter().all(|s| s.home + s.away <= 2));
        assert!(g.away_wins.windows(2).all(|w| w[0].probability >= w[1].probability));
    }
}

//! Goal markets: totals, BTTS, odd/even, exact totals, team totals, halves

use serde::Serialize;

use crate::error::ModelError;
use crate::models::poisson::{poisson_pmf, prob_over, validate_xg};
use crate::models::{OverUnder, PoissonModel, ScoreMatrix};

pub const TOTAL_LINES: [f64; 6] = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
pub const TEAM_LINES: [f64; 4] = [0.5, 1.5, 2.5, 3.5];
pub const HALF_LINES: [f64; 3] = [0.5, 1.5, 2.5];
pub const MAX_EXACT_TOTAL: u32 = 8;
/// About 45% of goals come before half time
pub const FIRST_HALF_SHARE: f64 = 0.45;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YesNo {
    pub yes: f64,
    pub no: f64,
}

impl YesNo {
    pub fn new(yes: f64) -> Self {
        Self { yes, no: 1.0 - yes }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamGoals {
    pub xg: f64,
    pub lines: Vec<OverUnder>,
    pub to_score: f64,
    pub no_goal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfGoals {
    pub home_xg: f64,
    pub away_xg: f64,
    pub over_under: Vec<OverUnder>,
    pub btts: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRanges {
    pub zero_to_one: f64,
    pub two_to_three: f64,
    pub four_to_five: f64,
    pub six_plus: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalsPrediction {
    pub home_xg: f64,
    pub away_xg: f64,
    pub total_xg: f64,
    pub over_under: Vec<OverUnder>,
    pub btts: YesNo,
    pub odd: f64,
    pub even: f64,
    /// Index = total goals, 0..=8
    pub exact_totals: Vec<f64>,
    pub home: TeamGoals,
    pub away: TeamGoals,
    pub first_half: HalfGoals,
    pub second_half: HalfGoals,
    pub score_ranges: ScoreRanges,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoalsPredictor {
    model: PoissonModel,
}

impl GoalsPredictor {
    pub fn new(model: PoissonModel) -> Self {
        Self { model }
    }

    pub fn predict(&self, home_xg: f64, away_xg: f64) -> Result<GoalsPrediction, ModelError> {
        let matrix = self.model.score_matrix(home_xg, away_xg)?;
        let (odd, even) = matrix.odd_even();

        Ok(GoalsPrediction {
            home_xg,
            away_xg,
            total_xg: home_xg + away_xg,
            over_under: matrix.total_goals(&TOTAL_LINES),
            btts: YesNo::new(matrix.btts()),
            odd,
            even,
            exact_totals: (0..=MAX_EXACT_TOTAL).map(|g| matrix.exact_total(g)).collect(),
            home: team_goals(home_xg),
            away: team_goals(away_xg),
            first_half: self.half(home_xg, away_xg, FIRST_HALF_SHARE)?,
            second_half: self.half(home_xg, away_xg, 1.0 - FIRST_HALF_SHARE)?,
            score_ranges: score_ranges(&matrix),
        })
    }

    /// Goals in one half, treating both sides as independent Poisson
    pub fn half(&self, home_xg: f64, away_xg: f64, share: f64) -> Result<HalfGoals, ModelError> {
        let plain = PoissonModel { rho: 0.0, ..self.model };
        let (h, a) = (validate_xg(home_xg)? * share, validate_xg(away_xg)? * share);
        let matrix = plain.score_matrix(h, a)?;
        Ok(HalfGoals {
            home_xg: h,
            away_xg: a,
            over_under: matrix.total_goals(&HALF_LINES),
            btts: matrix.btts(),
        })
    }
}

pub fn team_goals(xg: f64) -> TeamGoals {
    let no_goal = poisson_pmf(xg, 0);
    TeamGoals {
        xg,
        lines: TEAM_LINES
            .iter()
            .map(|&line| {
                let over = prob_over(line, xg);
                OverUnder { line, over, under: 1.0 - over }
            })
            .collect(),
        to_score: 1.0 - no_goal,
        no_goal,
    }
}

fn score_ranges(matrix: &ScoreMatrix) -> ScoreRanges {
    let dist = matrix.total_distribution();
    let band = |lo: usize, hi: usize| dist.iter().skip(lo).take(hi - lo + 1).sum::<f64>();
    let zero_to_one = band(0, 1);
    let two_to_three = band(2, 3);
    let four_to_five = band(4, 5);
    ScoreRanges {
        zero_to_one,
        two_to_three,
        four_to_five,
        six_plus: 1.0 - zero_to_one - two_to_three - four_to_five,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complements() {
        let p = GoalsPredictor::default().predict(1.5, 1.1).unwrap();
        for ou in p.over_under.iter().chain(&p.home.lines).chain(&p.first_half.over_under) {
            assert!((ou.over + ou.under - 1.0).abs() < 1e-9, "line {}", ou.line);
        }
        assert!((p.btts.yes + p.btts.no - 1.0).abs() < 1e-9);
        assert!((p.odd + p.even - 1.0).abs() < 1e-9);
        assert!((p.home.to_score + p.home.no_goal - 1.0).abs() < 1e-9);
        assert_eq!(p.exact_totals.len(), 9);
    }

    #[test]
    fn test_over_lines_decrease() {
        let p = GoalsPredictor::default().predict(1.5, 1.1).unwrap();
        assert!(p.over_under.windows(2).all(|w| w[0].over > w[1].over));
    }

    #[test]
    fn test_halves_split_xg() {
        let p = GoalsPredictor::default().predict(2.0, 1.0).unwrap();
        assert!((p.first_half.home_xg - 0.9).abs() < 1e-12);
        assert!((p.second_half.away_xg - 0.55).abs() < 1e-12);
        // more goals expected after the break
        assert!(p.second_half.over_under[0].over > p.first_half.over_under[0].over);
    }

    #[test]
    fn test_score_ranges_sum_to_one() {
        let p = GoalsPredictor::default().predict(1.8, 1.4).unwrap();
        let r = p.score_ranges;
        let sum = r.zero_to_one + r.two_to_three + r.four_to_five + r.six_plus;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(r.six_plus >= 0.0);
    }

    #[test]
    fn test_team_goals_zero_xg() {
        let t = team_goals(0.0);
        assert_eq!(t.no_goal, 1.0);
        assert_eq!(t.lines[0].over, 0.0);
    }
}

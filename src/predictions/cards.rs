//! Card markets: team discipline averages mixed with the referee's average

use serde::Serialize;

use crate::error::ModelError;
use crate::models::poisson::{prob_over, validate_xg};
use crate::models::OverUnder;

pub const TOTAL_LINES: [f64; 5] = [2.5, 3.5, 4.5, 5.5, 6.5];
pub const TEAM_LINES: [f64; 3] = [0.5, 1.5, 2.5];
pub const DEFAULT_REFEREE_AVG: f64 = 4.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardsPrediction {
    pub home_expected: f64,
    pub away_expected: f64,
    pub total_expected: f64,
    pub over_under: Vec<OverUnder>,
    pub home_lines: Vec<OverUnder>,
    pub away_lines: Vec<OverUnder>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CardsPredictor;

fn lines(lambda: f64, lines: &[f64]) -> Vec<OverUnder> {
    lines
        .iter()
        .map(|&line| {
            let over = prob_over(line, lambda);
            OverUnder { line, over, under: 1.0 - over }
        })
        .collect()
}

impl CardsPredictor {
    /// total = (home avg + away avg + referee avg) / 2, split by each team's share
    pub fn predict(
        &self,
        home_avg: f64,
        away_avg: f64,
        referee_avg: Option<f64>,
    ) -> Result<CardsPrediction, ModelError> {
        let home_avg = validate_xg(home_avg)?;
        let away_avg = validate_xg(away_avg)?;
        let referee_avg = validate_xg(referee_avg.unwrap_or(DEFAULT_REFEREE_AVG))?;

        let team_avg = home_avg + away_avg;
        let total_expected = (team_avg + referee_avg) / 2.0;
        let (home_expected, away_expected) = if team_avg > 0.0 {
            (
                total_expected * home_avg / team_avg,
                total_expected * away_avg / team_avg,
            )
        } else {
            (0.0, 0.0)
        };

        // sum of two Poissons is Poisson with the summed rate, which is the total
        Ok(CardsPrediction {
            home_expected,
            away_expected,
            total_expected,
            over_under: lines(total_expected, &TOTAL_LINES),
            home_lines: lines(home_expected, &TEAM_LINES),
            away_lines: lines(away_expected, &TEAM_LINES),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referee_pulls_total() {
        let p = CardsPredictor.predict(2.0, 3.0, Some(6.0)).unwrap();
        assert!((p.total_expected - 5.5).abs() < 1e-12);
        assert!((p.home_expected - 2.2).abs() < 1e-12);
        assert!((p.away_expected - 3.3).abs() < 1e-12);
    }

    #[test]
    fn test_default_referee() {
        let p = CardsPredictor.predict(2.0, 2.0, None).unwrap();
        assert!((p.total_expected - 4.25).abs() < 1e-12);
        for ou in &p.over_under {
            assert!((ou.over + ou.under - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_teams_without_cards() {
        // the referee average alone cannot be attributed to a side
        let p = CardsPredictor.predict(0.0, 0.0, Some(4.0)).unwrap();
        assert_eq!(p.home_expected, 0.0);
        assert_eq!(p.home_lines[0].over, 0.0);

        // totals are still priced from the referee's share
        assert!((p.total_expected - 2.0).abs() < 1e-12);
        let over = p.over_under.iter().find(|ou| ou.line == 2.5).unwrap();
        assert!((over.over - prob_over(2.5, 2.0)).abs() < 1e-12);
        assert!(over.over > 0.0);
    }

    #[test]
    fn test_negative_average_rejected() {
        assert!(CardsPredictor.predict(-1.0, 2.0, None).is_err());
    }
}

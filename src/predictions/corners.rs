//! Corner markets with a Normal approximation
//!
//! Corner counts average well above five per match, where a Normal with a
//! standard deviation of about 35% of the mean fits better than Poisson.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::error::ModelError;
use crate::models::{OverUnder, ThreeWay};

pub const TOTAL_LINES: [f64; 6] = [7.5, 8.5, 9.5, 10.5, 11.5, 12.5];
pub const TEAM_LINES: [f64; 4] = [3.5, 4.5, 5.5, 6.5];
pub const RACE_TARGETS: [u32; 4] = [3, 5, 7, 9];
pub const DEFAULT_STD_FACTOR: f64 = 0.35;
/// Typical share of matches where both sides take the same number of corners
pub const MORE_CORNERS_DRAW: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RaceTo {
    pub target: u32,
    pub home: f64,
    pub away: f64,
    pub neither: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CornersPrediction {
    pub home_avg: f64,
    pub away_avg: f64,
    pub total_avg: f64,
    pub total_std: f64,
    pub over_under: Vec<OverUnder>,
    pub more_corners: ThreeWay,
    pub home_lines: Vec<OverUnder>,
    pub away_lines: Vec<OverUnder>,
    pub race_to: Vec<RaceTo>,
}

#[derive(Debug, Clone, Copy)]
pub struct CornersPredictor {
    pub std_factor: f64,
}

impl Default for CornersPredictor {
    fn default() -> Self {
        Self {
            std_factor: DEFAULT_STD_FACTOR,
        }
    }
}

fn normal(mean: f64, std: f64) -> Result<Normal, ModelError> {
    if !(std > 0.0 && std.is_finite()) {
        return Err(ModelError::InvalidStdDev(std));
    }
    Normal::new(mean, std).map_err(|_| ModelError::InvalidStdDev(std))
}

fn lines(dist: &Normal, lines: &[f64]) -> Vec<OverUnder> {
    lines
        .iter()
        .map(|&line| {
            let over = 1.0 - dist.cdf(line);
            OverUnder { line, over, under: 1.0 - over }
        })
        .collect()
}

impl CornersPredictor {
    /// Expected corners per side from for/against averages of both teams
    pub fn expected_from_averages(
        home_for: f64,
        home_against: f64,
        away_for: f64,
        away_against: f64,
    ) -> (f64, f64) {
        ((home_for + away_against) / 2.0, (away_for + home_against) / 2.0)
    }

    pub fn predict(&self, home_avg: f64, away_avg: f64) -> Result<CornersPrediction, ModelError> {
        self.predict_with_std(home_avg, away_avg, None, None)
    }

    /// Per-team standard deviations default to `std_factor` times the mean
    pub fn predict_with_std(
        &self,
        home_avg: f64,
        away_avg: f64,
        home_std: Option<f64>,
        away_std: Option<f64>,
    ) -> Result<CornersPrediction, ModelError> {
        let home_std = home_std.unwrap_or(home_avg * self.std_factor);
        let away_std = away_std.unwrap_or(away_avg * self.std_factor);

        let total_avg = home_avg + away_avg;
        let total_std = (home_std.powi(2) + away_std.powi(2)).sqrt();
        let total = normal(total_avg, total_std)?;

        // P(home - away > 0), with the draw share carved out of both sides
        let diff = normal(home_avg - away_avg, total_std)?;
        let home_more = 1.0 - diff.cdf(0.0);
        let more_corners = ThreeWay {
            home: home_more * (1.0 - MORE_CORNERS_DRAW),
            draw: MORE_CORNERS_DRAW,
            away: (1.0 - home_more) * (1.0 - MORE_CORNERS_DRAW),
        };

        Ok(CornersPrediction {
            home_avg,
            away_avg,
            total_avg,
            total_std,
            over_under: lines(&total, &TOTAL_LINES),
            more_corners,
            home_lines: lines(&normal(home_avg, home_std)?, &TEAM_LINES),
            away_lines: lines(&normal(away_avg, away_std)?, &TEAM_LINES),
            race_to: self.race_to(home_avg, away_avg)?,
        })
    }

    /// Reach probability for the match total, split by each side's share of corners
    fn race_to(&self, home_avg: f64, away_avg: f64) -> Result<Vec<RaceTo>, ModelError> {
        let total_avg = home_avg + away_avg;
        let (home_ratio, away_ratio) = if total_avg > 0.0 {
            (home_avg / total_avg, away_avg / total_avg)
        } else {
            (0.5, 0.5)
        };
        let dist = normal(total_avg, total_avg * self.std_factor)?;

        Ok(RACE_TARGETS
            .iter()
            .map(|&target| {
                let reach = 1.0 - dist.cdf(target as f64 - 0.5);
                RaceTo {
                    target,
                    home: reach * home_ratio,
                    away: reach * away_ratio,
                    neither: 1.0 - reach,
                }
            })
            .collect())
    }

    /// Rescale the home mean by a lineup impact factor (1.1 = +10% corners)
    pub fn with_player_impact(
        &self,
        base: &CornersPrediction,
        impact: f64,
    ) -> Result<CornersPrediction, ModelError> {
        self.predict(base.home_avg * impact, base.away_avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_lines_complement_and_decrease() {
        let p = CornersPredictor::default().predict(5.5, 4.5).unwrap();
        assert!((p.total_avg - 10.0).abs() < 1e-12);
        for ou in &p.over_under {
            assert!((ou.over + ou.under - 1.0).abs() < 1e-9);
        }
        assert!(p.over_under.windows(2).all(|w| w[0].over > w[1].over));
        // 9.5 is just below the mean
        assert!(p.over_under[2].over > 0.5);
    }

    #[test]
    fn test_more_corners_has_fixed_draw() {
        let p = CornersPredictor::default().predict(6.0, 4.0).unwrap();
        assert_eq!(p.more_corners.draw, MORE_CORNERS_DRAW);
        assert!((p.more_corners.sum() - 1.0).abs() < 1e-9);
        assert!(p.more_corners.home > p.more_corners.away);

        let even = CornersPredictor::default().predict(5.0, 5.0).unwrap();
        assert!((even.more_corners.home - even.more_corners.away).abs() < 1e-9);
    }

    #[test]
    fn test_race_to_shares() {
        let p = CornersPredictor::default().predict(6.0, 4.0).unwrap();
        for race in &p.race_to {
            assert!((race.home + race.away + race.neither - 1.0).abs() < 1e-9);
            assert!((race.home / race.away - 1.5).abs() < 1e-9);
        }
        // higher targets are reached less often
        assert!(p.race_to[0].neither < p.race_to[3].neither);
    }

    #[test]
    fn test_zero_average_is_rejected() {
        assert!(matches!(
            CornersPredictor::default().predict(0.0, 0.0),
            Err(ModelError::InvalidStdDev(_))
        ));
    }

    #[test]
    fn test_player_impact_only_moves_home() {
        let predictor = CornersPredictor::default();
        let base = predictor.predict(5.0, 5.0).unwrap();
        let boosted = predictor.with_player_impact(&base, 1.2).unwrap();
        assert!((boosted.home_avg - 6.0).abs() < 1e-12);
        assert_eq!(boosted.away_avg, 5.0);
        assert!(boosted.more_corners.home > base.more_corners.home);
    }

    #[test]
    fn test_expected_from_averages() {
        let (h, a) = CornersPredictor::expected_from_averages(6.0, 4.0, 5.0, 5.0);
        assert_eq!((h, a), (5.5, 4.5));
    }
}

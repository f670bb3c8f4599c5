//! Goal and rating models shared by the market predictors

pub mod elo;
pub mod poisson;

use serde::Serialize;

pub use elo::{EloConfig, EloRatings};
pub use poisson::{
    dixon_coles_tau, expected_goals_from_averages, poisson_pmf, prob_at_least, prob_over,
    prob_under, PoissonModel, ScoreMatrix, Scoreline, TeamStrength,
};

/// Home / draw / away probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThreeWay {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

impl ThreeWay {
    pub fn sum(&self) -> f64 {
        self.home + self.draw + self.away
    }

    /// Weighted average of two predictions; `weight` applies to `other`
    pub fn blend(&self, other: &ThreeWay, weight: f64) -> ThreeWay {
        let w = weight.clamp(0.0, 1.0);
        ThreeWay {
            home: self.home * (1.0 - w) + other.home * w,
            draw: self.draw * (1.0 - w) + other.draw * w,
            away: self.away * (1.0 - w) + other.away * w,
        }
    }
}

/// Over/under probabilities for one line
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverUnder {
    pub line: f64,
    pub over: f64,
    pub under: f64,
}

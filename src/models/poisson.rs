//! Poisson goal model with Dixon-Coles low-score correction
//!
//! P(X = k) = λ^k · e^-λ / k!, with λ the expected goals of a side. The joint
//! scoreline matrix multiplies both marginals and applies the Dixon-Coles τ
//! factor to 0-0, 1-0, 0-1 and 1-1, then renormalises.

use serde::Serialize;

use super::{OverUnder, ThreeWay};
use crate::error::ModelError;

/// Attack and defence strength relative to the league average
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamStrength {
    pub attack: f64,
    pub defense: f64,
}

/// P(X = k). λ ≤ 0 puts all mass on zero.
pub fn poisson_pmf(lambda: f64, k: u32) -> f64 {
    if lambda <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    // Product form avoids overflowing k! for large k
    let mut p = (-lambda).exp();
    for i in 1..=k {
        p *= lambda / i as f64;
    }
    p
}

/// P(X ≤ k)
pub fn poisson_cdf(lambda: f64, k: u32) -> f64 {
    (0..=k).map(|i| poisson_pmf(lambda, i)).sum()
}

/// P(X > line). For 2.5 that is P(X ≥ 3).
pub fn prob_over(line: f64, lambda: f64) -> f64 {
    1.0 - prob_under(line, lambda)
}

/// P(X < line) for half lines; whole lines include the line itself.
pub fn prob_under(line: f64, lambda: f64) -> f64 {
    if line < 0.0 {
        return 0.0;
    }
    poisson_cdf(lambda, line.floor() as u32)
}

/// P(X ≥ goals)
pub fn prob_at_least(goals: u32, lambda: f64) -> f64 {
    if goals == 0 {
        return 1.0;
    }
    1.0 - poisson_cdf(lambda, goals - 1)
}

pub fn dixon_coles_tau(home_goals: u32, away_goals: u32, lambda_h: f64, lambda_a: f64, rho: f64) -> f64 {
    if rho == 0.0 {
        return 1.0;
    }
    let raw = match (home_goals, away_goals) {
        (0, 0) => 1.0 - lambda_h * lambda_a * rho,
        (1, 0) => 1.0 + lambda_a * rho,
        (0, 1) => 1.0 + lambda_h * rho,
        (1, 1) => 1.0 - rho,
        _ => 1.0,
    };
    raw.clamp(0.0, 2.0)
}

/// Expected goals from per-team scoring/conceding averages.
///
/// The home side gets `home_advantage` as a multiplier.
pub fn expected_goals_from_averages(
    home_attack: f64,
    home_defense: f64,
    away_attack: f64,
    away_defense: f64,
    home_advantage: f64,
) -> (f64, f64) {
    let home_xg = (home_attack + away_defense) / 2.0 * home_advantage;
    let away_xg = (away_attack + home_defense) / 2.0;
    (home_xg, away_xg)
}

pub(crate) fn validate_xg(xg: f64) -> Result<f64, ModelError> {
    if xg.is_finite() && xg >= 0.0 {
        Ok(xg)
    } else {
        Err(ModelError::InvalidExpectedGoals(xg))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoissonModel {
    pub league_avg_home: f64,
    pub league_avg_away: f64,
    pub rho: f64,
    pub max_goals: u32,
}

impl Default for PoissonModel {
    fn default() -> Self {
        Self {
            league_avg_home: 1.5,
            league_avg_away: 1.2,
            rho: 0.1,
            max_goals: 10,
        }
    }
}

impl PoissonModel {
    pub fn with_rho(rho: f64) -> Self {
        Self {
            rho,
            ..Self::default()
        }
    }

    /// xG_home = home attack × away defence × league home average, and the mirror for away
    pub fn expected_goals(&self, home: TeamStrength, away: TeamStrength) -> (f64, f64) {
        (
            home.attack * away.defense * self.league_avg_home,
            away.attack * home.defense * self.league_avg_away,
        )
    }

    pub fn score_matrix(&self, home_xg: f64, away_xg: f64) -> Result<ScoreMatrix, ModelError> {
        let home_xg = validate_xg(home_xg)?;
        let away_xg = validate_xg(away_xg)?;
        let n = self.max_goals as usize + 1;

        let home: Vec<f64> = (0..n as u32).map(|k| poisson_pmf(home_xg, k)).collect();
        let away: Vec<f64> = (0..n as u32).map(|k| poisson_pmf(away_xg, k)).collect();

        let mut probs = vec![0.0; n * n];
        for h in 0..n {
            for a in 0..n {
                let tau = dixon_coles_tau(h as u32, a as u32, home_xg, away_xg, self.rho);
                probs[h * n + a] = home[h] * away[a] * tau;
            }
        }

        let total: f64 = probs.iter().sum();
        if total > 0.0 {
            probs.iter_mut().for_each(|p| *p /= total);
        }

        Ok(ScoreMatrix {
            probs,
            size: n,
            home_xg,
            away_xg,
        })
    }
}

/// One scoreline and its probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scoreline {
    pub home: u32,
    pub away: u32,
    pub probability: f64,
}

impl Scoreline {
    pub fn label(&self) -> String {
        format!("{}-{}", self.home, self.away)
    }
}

/// Joint scoreline distribution, normalised to 1
#[derive(Debug, Clone)]
pub struct ScoreMatrix {
    probs: Vec<f64>,
    size: usize,
    pub home_xg: f64,
    pub away_xg: f64,
}

impl ScoreMatrix {
    pub fn max_goals(&self) -> u32 {
        self.size as u32 - 1
    }

    pub fn get(&self, home: u32, away: u32) -> f64 {
        let (h, a) = (home as usize, away as usize);
        if h >= self.size || a >= self.size {
            return 0.0;
        }
        self.probs[h * self.size + a]
    }

    pub fn iter(&self) -> impl Iterator<Item = Scoreline> + '_ {
        self.probs.iter().enumerate().map(move |(i, p)| Scoreline {
            home: (i / self.size) as u32,
            away: (i % self.size) as u32,
            probability: *p,
        })
    }

    fn sum_where(&self, pred: impl Fn(u32, u32) -> bool) -> f64 {
        self.iter()
            .filter(|s| pred(s.home, s.away))
            .map(|s| s.probability)
            .sum()
    }

    pub fn match_result(&self) -> ThreeWay {
        let home = self.sum_where(|h, a| h > a);
        let draw = self.sum_where(|h, a| h == a);
        ThreeWay {
            home,
            draw,
            away: 1.0 - home - draw,
        }
    }

    pub fn btts(&self) -> f64 {
        self.sum_where(|h, a| h > 0 && a > 0)
    }

    /// Distribution of total goals, index = total
    pub fn total_distribution(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.size * 2 - 1];
        for s in self.iter() {
            out[(s.home + s.away) as usize] += s.probability;
        }
        out
    }

    pub fn exact_total(&self, goals: u32) -> f64 {
        self.total_distribution()
            .get(goals as usize)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn total_goals(&self, lines: &[f64]) -> Vec<OverUnder> {
        let dist = self.total_distribution();
        lines
            .iter()
            .map(|&line| {
                let under: f64 = dist
                    .iter()
                    .enumerate()
                    .filter(|(total, _)| (*total as f64) <= line.floor())
                    .map(|(_, p)| p)
                    .sum();
                OverUnder {
                    line,
                    over: 1.0 - under,
                    under,
                }
            })
            .collect()
    }

    /// (odd, even)
    pub fn odd_even(&self) -> (f64, f64) {
        let even = self.sum_where(|h, a| (h + a) % 2 == 0);
        (1.0 - even, even)
    }

    /// All scorelines, most likely first
    pub fn correct_score(&self) -> Vec<Scoreline> {
        let mut scores: Vec<Scoreline> = self.iter().collect();
        scores.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmf_matches_closed_form() {
        // e^-1.5 · 1.5^2 / 2
        let expected = (-1.5f64).exp() * 2.25 / 2.0;
        assert!((poisson_pmf(1.5, 2) - expected).abs() < 1e-12);
        assert_eq!(poisson_pmf(0.0, 0), 1.0);
        assert_eq!(poisson_pmf(-1.0, 3), 0.0);
    }

    #[test]
    fn test_over_under_complement() {
        for line in [0.5, 1.5, 2.5, 3.5, 4.5] {
            let sum = prob_over(line, 2.7) + prob_under(line, 2.7);
            assert!((sum - 1.0).abs() < 1e-9);
        }
        // over 2.5 = P(X >= 3)
        assert!((prob_over(2.5, 2.7) - prob_at_least(3, 2.7)).abs() < 1e-12);
        assert_eq!(prob_at_least(0, 1.0), 1.0);
    }

    #[test]
    fn test_tau_values() {
        assert!((dixon_coles_tau(0, 0, 1.0, 1.0, 0.1) - 0.9).abs() < 1e-12);
        assert!((dixon_coles_tau(1, 0, 1.2, 0.8, 0.1) - 1.08).abs() < 1e-12);
        assert!((dixon_coles_tau(0, 1, 1.2, 0.8, 0.1) - 1.12).abs() < 1e-12);
        assert!((dixon_coles_tau(1, 1, 1.2, 0.8, 0.1) - 0.9).abs() < 1e-12);
        assert_eq!(dixon_coles_tau(2, 1, 1.2, 0.8, 0.1), 1.0);
        assert_eq!(dixon_coles_tau(0, 0, 5.0, 5.0, 0.0), 1.0);
        // clamped at zero
        assert_eq!(dixon_coles_tau(0, 0, 5.0, 5.0, 0.1), 0.0);
    }

    #[test]
    fn test_matrix_normalised_and_result_sums_to_one() {
        let matrix = PoissonModel::default().score_matrix(1.6, 1.1).unwrap();
        let total: f64 = matrix.iter().map(|s| s.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);

        let result = matrix.match_result();
        assert!((result.sum() - 1.0).abs() < 1e-9);
        assert!(result.home > result.away);
    }

    #[test]
    fn test_rho_raises_draws() {
        let plain = PoissonModel::with_rho(0.0).score_matrix(1.3, 1.3).unwrap();
        let dc = PoissonModel::with_rho(-0.1).score_matrix(1.3, 1.3).unwrap();
        // negative rho boosts 0-0 and 1-1
        assert!(dc.get(0, 0) > plain.get(0, 0));
        assert!(dc.match_result().draw > plain.match_result().draw);
    }

    #[test]
    fn test_rejects_bad_xg() {
        let model = PoissonModel::default();
        assert!(matches!(
            model.score_matrix(f64::NAN, 1.0),
            Err(ModelError::InvalidExpectedGoals(_))
        ));
        assert!(model.score_matrix(-0.5, 1.0).is_err());
    }

    #[test]
    fn test_derived_markets() {
        let matrix = PoissonModel::with_rho(0.0).score_matrix(1.4, 1.2).unwrap();
        let btts = (1.0 - poisson_pmf(1.4, 0)) * (1.0 - poisson_pmf(1.2, 0));
        assert!((matrix.btts() - btts).abs() < 1e-4);

        let (odd, even) = matrix.odd_even();
        assert!((odd + even - 1.0).abs() < 1e-9);

        let lines = matrix.total_goals(&[2.5]);
        assert!((lines[0].over + lines[0].under - 1.0).abs() < 1e-9);
        assert!((lines[0].under - (0..=2).map(|g| matrix.exact_total(g)).sum::<f64>()).abs() < 1e-9);

        let scores = matrix.correct_score();
        assert!(scores.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert_eq!(scores[0].label(), "1-1");
    }

    #[test]
    fn test_whole_line_totals_match_prob_under() {
        let m = PoissonModel::with_rho(0.0).score_matrix(1.4, 1.1).unwrap();
        let totals = m.total_goals(&[2.0, 2.5]);

        // two goals exactly counts as under on a whole line
        let up_to_two: f64 = m.iter().filter(|s| s.home + s.away <= 2).map(|s| s.probability).sum();
        assert!((totals[0].under - up_to_two).abs() < 1e-12);
        assert!((totals[0].under - totals[1].under).abs() < 1e-12);
        assert!((totals[0].under - prob_under(2.0, 2.5)).abs() < 1e-5);
    }

    #[test]
    fn test_expected_goals() {
        let model = PoissonModel::default();
        let (h, a) = model.expected_goals(
            TeamStrength { attack: 1.2, defense: 0.8 },
            TeamStrength { attack: 1.0, defense: 1.1 },
        );
        assert!((h - 1.2 * 1.1 * 1.5).abs() < 1e-12);
        assert!((a - 1.0 * 0.8 * 1.2).abs() < 1e-12);

        let (h, a) = expected_goals_from_averages(2.0, 1.0, 1.5, 1.2, 1.1);
        assert!((h - 1.6 * 1.1).abs() < 1e-12);
        assert!((a - 1.25).abs() < 1e-12);
    }
}

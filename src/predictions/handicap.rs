//! European (3-way) and Asian handicaps from the scoreline matrix
//!
//! A handicap is added to the backed side's score. Asian quarter lines
//! (±0.25, ±0.75, ...) split the stake across the two neighbouring lines.

use serde::Serialize;

use super::Side;
use crate::error::ModelError;
use crate::models::{PoissonModel, ScoreMatrix};

pub const EUROPEAN_LINES: [i32; 5] = [-2, -1, 0, 1, 2];
/// Quarter steps, so quarter lines are priced alongside whole and half lines
pub const ASIAN_LINES: [f64; 21] = [
    -2.5, -2.25, -2.0, -1.75, -1.5, -1.25, -1.0, -0.75, -0.5, -0.25, 0.0, 0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75,
    2.0, 2.25, 2.5,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EuropeanHandicap {
    pub side: Side,
    pub line: i32,
    pub win: f64,
    pub draw: f64,
    pub lose: f64,
}

/// Settlement probabilities for one Asian line. Half lines only use win/lose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AsianHandicap {
    pub side: Side,
    pub line: f64,
    pub win: f64,
    pub half_win: f64,
    pub push: f64,
    pub half_lose: f64,
    pub lose: f64,
}

impl AsianHandicap {
    /// Probability of a binary bet with the same expected return, ignoring pushes.
    ///
    /// Half wins and half losses count as half of a settled stake.
    pub fn effective_probability(&self) -> f64 {
        let won = self.win + self.half_win / 2.0;
        let lost = self.lose + self.half_lose / 2.0;
        if won + lost > 0.0 {
            won / (won + lost)
        } else {
            0.5
        }
    }

    pub fn is_quarter_line(&self) -> bool {
        is_quarter(self.line)
    }
}

fn is_quarter(line: f64) -> bool {
    let quarters = (line * 4.0).round() as i64;
    quarters % 2 != 0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandicapPrediction {
    pub home_xg: f64,
    pub away_xg: f64,
    pub european: Vec<EuropeanHandicap>,
    pub asian: Vec<AsianHandicap>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HandicapPredictor {
    model: PoissonModel,
}

#[derive(Clone, Copy)]
enum Leg {
    Win,
    Push,
    Lose,
}

impl HandicapPredictor {
    pub fn new(model: PoissonModel) -> Self {
        Self { model }
    }

    pub fn predict(&self, home_xg: f64, away_xg: f64) -> Result<HandicapPrediction, ModelError> {
        let matrix = self.model.score_matrix(home_xg, away_xg)?;

        let mut european = Vec::with_capacity(EUROPEAN_LINES.len() * 2);
        for &line in &EUROPEAN_LINES {
            european.push(european_handicap(&matrix, Side::Home, line));
            european.push(european_handicap(&matrix, Side::Away, line));
        }

        let mut asian = Vec::with_capacity(ASIAN_LINES.len() * 2);
        for &line in &ASIAN_LINES {
            asian.push(asian_handicap(&matrix, Side::Home, line)?);
            asian.push(asian_handicap(&matrix, Side::Away, line)?);
        }

        Ok(HandicapPrediction {
            home_xg,
            away_xg,
            european,
            asian,
        })
    }

    /// Any Asian line, including quarter lines
    pub fn asian(&self, home_xg: f64, away_xg: f64, side: Side, line: f64) -> Result<AsianHandicap, ModelError> {
        let matrix = self.model.score_matrix(home_xg, away_xg)?;
        asian_handicap(&matrix, side, line)
    }
}

/// Goal difference from the backed side's point of view
fn margin(side: Side, home: u32, away: u32) -> i64 {
    match side {
        Side::Home => home as i64 - away as i64,
        Side::Away => away as i64 - home as i64,
    }
}

pub fn european_handicap(matrix: &ScoreMatrix, side: Side, line: i32) -> EuropeanHandicap {
    let (mut win, mut draw, mut lose) = (0.0, 0.0, 0.0);
    for s in matrix.iter() {
        match (margin(side, s.home, s.away) + line as i64).signum() {
            1 => win += s.probability,
            0 => draw += s.probability,
            _ => lose += s.probability,
        }
    }
    EuropeanHandicap { side, line, win, draw, lose }
}

pub fn asian_handicap(matrix: &ScoreMatrix, side: Side, line: f64) -> Result<AsianHandicap, ModelError> {
    // lines come in quarter steps
    if !line.is_finite() || ((line * 4.0).round() - line * 4.0).abs() > 1e-9 {
        return Err(ModelError::InvalidLine(line));
    }

    let (low, high) = if is_quarter(line) {
        (line - 0.25, Some(line + 0.25))
    } else {
        (line, None)
    };

    let mut out = AsianHandicap {
        side,
        line,
        win: 0.0,
        half_win: 0.0,
        push: 0.0,
        half_lose: 0.0,
        lose: 0.0,
    };

    for s in matrix.iter() {
        let m = margin(side, s.home, s.away) as f64;
        let settle = |l: f64| {
            let d = m + l;
            if d.abs() < 1e-9 {
                Leg::Push
            } else if d > 0.0 {
                Leg::Win
            } else {
                Leg::Lose
            }
        };

        let bucket = match high {
            None => match settle(low) {
                Leg::Win => &mut out.win,
                Leg::Push => &mut out.push,
                Leg::Lose => &mut out.lose,
            },
            Some(high) => match (settle(low), settle(high)) {
                (Leg::Win, Leg::Win) => &mut out.win,
                (Leg::Push, Leg::Win) => &mut out.half_win,
                (Leg::Lose, Leg::Push) => &mut out.half_lose,
                (Leg::Lose, Leg::Lose) => &mut out.lose,
                // legs are 0.5 apart so other combinations cannot happen
                _ => &mut out.push,
            },
        };
        *bucket += s.probability;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ScoreMatrix {
        PoissonModel::default().score_matrix(1.6, 1.0).unwrap()
    }

    #[test]
    fn test_european_zero_is_match_result() {
        let m = matrix();
        let result = m.match_result();
        let eh = european_handicap(&m, Side::Home, 0);
        assert!((eh.win - result.home).abs() < 1e-12);
        assert!((eh.draw - result.draw).abs() < 1e-12);

        let away = european_handicap(&m, Side::Away, 0);
        assert!((away.win - result.away).abs() < 1e-12);
    }

    #[test]
    fn test_european_minus_one_needs_two_goal_win() {
        let m = matrix();
        let eh = european_handicap(&m, Side::Home, -1);
        let two_plus: f64 = m.iter().filter(|s| s.home >= s.away + 2).map(|s| s.probability).sum();
        assert!((eh.win - two_plus).abs() < 1e-12);
        assert!((eh.win + eh.draw + eh.lose - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_half_line_has_no_push() {
        let ah = asian_handicap(&matrix(), Side::Home, -0.5).unwrap();
        assert_eq!(ah.push, 0.0);
        assert!((ah.win + ah.lose - 1.0).abs() < 1e-9);
        // -0.5 is a plain home win
        assert!((ah.win - matrix().match_result().home).abs() < 1e-12);
    }

    #[test]
    fn test_whole_line_pushes_on_draw() {
        let m = matrix();
        let ah = asian_handicap(&m, Side::Home, 0.0).unwrap();
        assert!((ah.push - m.match_result().draw).abs() < 1e-12);
        assert!((ah.effective_probability() - m.match_result().home / (1.0 - ah.push)).abs() < 1e-9);
    }

    #[test]
    fn test_quarter_line_splits() {
        let m = matrix();
        let ah = asian_handicap(&m, Side::Home, -0.25).unwrap();
        assert!(ah.is_quarter_line());
        // draw loses half the stake, any win is a full win
        assert!((ah.half_lose - m.match_result().draw).abs() < 1e-12);
        assert!((ah.win - m.match_result().home).abs() < 1e-12);
        assert_eq!(ah.half_win, 0.0);
        let total = ah.win + ah.half_win + ah.push + ah.half_lose + ah.lose;
        assert!((total - 1.0).abs() < 1e-9);

        let plus = asian_handicap(&m, Side::Away, 0.25).unwrap();
        assert!((plus.half_win - m.match_result().draw).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_off_grid_line() {
        assert_eq!(
            asian_handicap(&matrix(), Side::Home, 0.3).unwrap_err(),
            ModelError::InvalidLine(0.3)
        );
    }

    #[test]
    fn test_predict_covers_both_sides() {
        let p = HandicapPredictor::default().predict(1.3, 1.2).unwrap();
        assert_eq!(p.european.len(), 10);
        assert_eq!(p.asian.len(), 42);
        assert!(p.asian.iter().any(|a| a.line == -0.25 && a.is_quarter_line()));
    }
}

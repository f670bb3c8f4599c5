//! Player goalscorer markets from shot volume and shot quality

use serde::Serialize;

use super::Side;
use crate::types::PlayerProfile;

pub const NO_GOALSCORER: &str = "No goalscorer";
/// Takes the scoring mass when no listed player has any xG
pub const OTHER_PLAYER: &str = "Other player";
pub const DEFAULT_AVG_GOALS_PER_MATCH: f64 = 2.7;
/// Either side is equally likely to open the scoring
const TEAM_SCORES_FIRST: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGoalPrediction {
    pub name: String,
    pub side: Side,
    pub expected_minutes: f64,
    pub xg_per_90: f64,
    pub match_xg: f64,
    pub anytime: f64,
    pub two_or_more: f64,
    /// Share of the team's xG, halved; not yet normalised
    pub first_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FirstScorer {
    pub name: String,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalscorerPrediction {
    pub home: Vec<PlayerGoalPrediction>,
    pub away: Vec<PlayerGoalPrediction>,
    /// Sums to 1 including the no-goalscorer option
    pub first_scorer: Vec<FirstScorer>,
}

impl GoalscorerPrediction {
    pub fn player(&self, name: &str) -> Option<&PlayerGoalPrediction> {
        self.home.iter().chain(&self.away).find(|p| p.name == name)
    }

    pub fn top(&self, side: Side, n: usize) -> &[PlayerGoalPrediction] {
        let players = match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        };
        &players[..players.len().min(n)]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GoalscorerPredictor {
    pub avg_goals_per_match: f64,
}

impl Default for GoalscorerPredictor {
    fn default() -> Self {
        Self {
            avg_goals_per_match: DEFAULT_AVG_GOALS_PER_MATCH,
        }
    }
}

impl GoalscorerPredictor {
    pub fn predict_player(&self, player: &PlayerProfile, side: Side, team_xg: f64) -> PlayerGoalPrediction {
        let xg_per_90 = (player.shots_per_90 * player.xg_per_shot).max(0.0);
        let match_xg = xg_per_90 * (player.expected_minutes.max(0.0) / 90.0);

        let (anytime, two_or_more) = if match_xg > 0.0 {
            let none = (-match_xg).exp();
            (1.0 - none, 1.0 - none * (1.0 + match_xg))
        } else {
            (0.0, 0.0)
        };

        // fall back to half the league scoring rate when the team xG is unknown
        let team_xg = if team_xg > 0.0 {
            team_xg
        } else {
            self.avg_goals_per_match / 2.0
        };
        let first_share = if anytime > 0.0 {
            match_xg / team_xg * TEAM_SCORES_FIRST
        } else {
            0.0
        };

        PlayerGoalPrediction {
            name: player.name.clone(),
            side,
            expected_minutes: player.expected_minutes,
            xg_per_90,
            match_xg,
            anytime,
            two_or_more,
            first_share,
        }
    }

    pub fn predict_match(
        &self,
        home_players: &[PlayerProfile],
        away_players: &[PlayerProfile],
        home_xg: f64,
        away_xg: f64,
    ) -> GoalscorerPrediction {
        let by_anytime = |a: &PlayerGoalPrediction, b: &PlayerGoalPrediction| b.anytime.total_cmp(&a.anytime);

        let mut home: Vec<_> = home_players
            .iter()
            .map(|p| self.predict_player(p, Side::Home, home_xg))
            .collect();
        let mut away: Vec<_> = away_players
            .iter()
            .map(|p| self.predict_player(p, Side::Away, away_xg))
            .collect();
        home.sort_by(by_anytime);
        away.sort_by(by_anytime);

        let no_goal = (-(home_xg.max(0.0) + away_xg.max(0.0))).exp();
        let total_share: f64 = home.iter().chain(&away).map(|p| p.first_share).sum();

        let mut first_scorer: Vec<FirstScorer> = if total_share > 0.0 {
            home.iter()
                .chain(&away)
                .map(|p| FirstScorer {
                    name: p.name.clone(),
                    probability: p.first_share / total_share * (1.0 - no_goal),
                })
                .collect()
        } else if no_goal < 1.0 {
            vec![FirstScorer {
                name: OTHER_PLAYER.to_string(),
                probability: 1.0 - no_goal,
            }]
        } else {
            Vec::new()
        };
        first_scorer.push(FirstScorer {
            name: NO_GOALSCORER.to_string(),
            probability: no_goal,
        });
        first_scorer.sort_by(|a, b| b.probability.total_cmp(&a.probability));

        GoalscorerPrediction {
            home,
            away,
            first_scorer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, shots: f64, xg_per_shot: f64, minutes: f64) -> PlayerProfile {
        PlayerProfile {
            name: name.to_string(),
            shots_per_90: shots,
            xg_per_shot,
            expected_minutes: minutes,
        }
    }

    #[test]
    fn test_player_probabilities() {
        let p = GoalscorerPredictor::default().predict_player(&player("Lewandowski", 4.0, 0.15, 90.0), Side::Home, 1.8);
        assert!((p.match_xg - 0.6).abs() < 1e-12);
        assert!((p.anytime - (1.0 - (-0.6f64).exp())).abs() < 1e-12);
        assert!((p.two_or_more - (1.0 - (-0.6f64).exp() * 1.6)).abs() < 1e-12);
        assert!(p.two_or_more < p.anytime);
        assert!((p.first_share - 0.6 / 1.8 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_minutes_scale_xg() {
        let sub = GoalscorerPredictor::default().predict_player(&player("Sub", 3.0, 0.1, 30.0), Side::Away, 1.0);
        assert!((sub.match_xg - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_first_scorer_sums_to_one() {
        let p = GoalscorerPredictor::default().predict_match(
            &[player("A", 4.0, 0.15, 90.0), player("B", 2.0, 0.1, 70.0)],
            &[player("C", 3.0, 0.12, 90.0)],
            1.6,
            1.1,
        );
        let total: f64 = p.first_scorer.iter().map(|f| f.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let none = p.first_scorer.iter().find(|f| f.name == NO_GOALSCORER).unwrap();
        assert!((none.probability - (-2.7f64).exp()).abs() < 1e-12);
        assert_eq!(p.top(Side::Home, 1)[0].name, "A");
        assert!(p.player("C").is_some());
    }

    #[test]
    fn test_non_shooter_never_scores() {
        let p = GoalscorerPredictor::default().predict_match(&[player("Keeper", 0.0, 0.0, 90.0)], &[], 1.0, 1.0);
        assert_eq!(p.home[0].anytime, 0.0);
        assert!(p.first_scorer.iter().all(|f| f.name != "Keeper"));

        let total: f64 = p.first_scorer.iter().map(|f| f.probability).sum();
        assert!((total - 1.0).abs() < 1e-9);
        let other = p.first_scorer.iter().find(|f| f.name == OTHER_PLAYER).unwrap();
        assert!((other.probability - (1.0 - (-2.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_goalless_match_is_certain_no_scorer() {
        let p = GoalscorerPredictor::default().predict_match(&[player("Keeper", 0.0, 0.0, 90.0)], &[], 0.0, 0.0);
        assert_eq!(p.first_scorer.len(), 1);
        assert_eq!(p.first_scorer[0].name, NO_GOALSCORER);
        assert_eq!(p.first_scorer[0].probability, 1.0);
    }
}

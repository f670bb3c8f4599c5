//! ELO team ratings with home advantage and a goal-difference K bonus

use std::collections::HashMap;

use tracing::debug;

use super::ThreeWay;
use crate::types::Fixture;

#[derive(Debug, Clone, Copy)]
pub struct EloConfig {
    pub k_factor: f64,
    /// Rating points credited to the home side
    pub home_advantage: f64,
    pub initial_rating: f64,
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            k_factor: 32.0,
            home_advantage: 100.0,
            initial_rating: 1500.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EloRatings {
    config: EloConfig,
    ratings: HashMap<String, f64>,
}

impl EloRatings {
    pub fn new(config: EloConfig) -> Self {
        Self {
            config,
            ratings: HashMap::new(),
        }
    }

    pub fn config(&self) -> &EloConfig {
        &self.config
    }

    pub fn rating(&self, team: &str) -> f64 {
        self.ratings
            .get(team)
            .copied()
            .unwrap_or(self.config.initial_rating)
    }

    pub fn set_rating(&mut self, team: &str, rating: f64) {
        self.ratings.insert(team.to_string(), rating);
    }

    pub fn bulk_load(&mut self, ratings: HashMap<String, f64>) {
        self.ratings.extend(ratings);
    }

    pub fn ratings(&self) -> &HashMap<String, f64> {
        &self.ratings
    }

    /// Ratings sorted best first
    pub fn table(&self) -> Vec<(String, f64)> {
        let mut table: Vec<(String, f64)> =
            self.ratings.iter().map(|(t, r)| (t.clone(), *r)).collect();
        table.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        table
    }

    /// Win expectancy of `a` against `b`
    pub fn expected_score(&self, a: f64, b: f64, a_is_home: bool) -> f64 {
        let mut diff = b - a;
        if a_is_home {
            diff -= self.config.home_advantage;
        }
        1.0 / (1.0 + 10f64.powf(diff / 400.0))
    }

    /// Apply one result and return the new (home, away) ratings
    pub fn update(&mut self, home: &str, away: &str, home_goals: u32, away_goals: u32) -> (f64, f64) {
        let home_rating = self.rating(home);
        let away_rating = self.rating(away);

        let expected_home = self.expected_score(home_rating, away_rating, true);
        let expected_away = 1.0 - expected_home;

        let (actual_home, actual_away) = match home_goals.cmp(&away_goals) {
            std::cmp::Ordering::Greater => (1.0, 0.0),
            std::cmp::Ordering::Less => (0.0, 1.0),
            std::cmp::Ordering::Equal => (0.5, 0.5),
        };

        let goal_diff = home_goals.abs_diff(away_goals);
        let multiplier = if goal_diff > 1 {
            1.0 + (goal_diff - 1) as f64 * 0.1
        } else {
            1.0
        };
        let k = self.config.k_factor * multiplier;

        let new_home = home_rating + k * (actual_home - expected_home);
        let new_away = away_rating + k * (actual_away - expected_away);

        self.ratings.insert(home.to_string(), new_home);
        self.ratings.insert(away.to_string(), new_away);
        (new_home, new_away)
    }

    /// 1X2 from ratings. The draw share narrows as the gap widens, floored at 15%.
    pub fn predict(&self, home: &str, away: &str) -> ThreeWay {
        let home_rating = self.rating(home);
        let away_rating = self.rating(away);

        let expected_home = self.expected_score(home_rating, away_rating, true);
        let gap = (home_rating - away_rating + self.config.home_advantage).abs();
        let draw = (0.30 - gap / 1000.0).max(0.15);
        let remaining = 1.0 - draw;

        ThreeWay {
            home: expected_home * remaining,
            draw,
            away: (1.0 - expected_home) * remaining,
        }
    }

    /// Apply every finished fixture in date order. Returns how many were applied.
    pub fn replay(&mut self, fixtures: &[Fixture]) -> usize {
        let mut played: Vec<&Fixture> = fixtures.iter().filter(|f| f.score().is_some()).collect();
        played.sort_by_key(|f| f.date);

        for fixture in &played {
            if let Some((hg, ag)) = fixture.score() {
                let (h, a) = self.update(&fixture.home_team, &fixture.away_team, hg, ag);
                debug!(
                    "ELO {} {}-{} {} -> {:.1} / {:.1}",
                    fixture.home_team, hg, ag, fixture.away_team, h, a
                );
            }
        }
        played.len()
    }
}

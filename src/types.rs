use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A played (or scheduled) match as imported from a fixtures file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub id: i64,
    #[serde(default)]
    pub league: Option<String>,
    #[serde(default)]
    pub season: Option<i32>,
    pub date: DateTime<Utc>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_goals: Option<u32>,
    #[serde(default)]
    pub away_goals: Option<u32>,
    #[serde(default)]
    pub referee: Option<String>,
    #[serde(default)]
    pub home_stats: Option<TeamMatchStats>,
    #[serde(default)]
    pub away_stats: Option<TeamMatchStats>,
}

impl Fixture {
    /// Final score, if the match has one
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_goals?, self.away_goals?))
    }
}

/// Per-team box score for one fixture
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchStats {
    #[serde(default)]
    pub possession: Option<f64>, // percent, 0-100
    #[serde(default)]
    pub shots_on_goal: Option<u32>,
    #[serde(default)]
    pub total_shots: Option<u32>,
    #[serde(default)]
    pub corner_kicks: Option<u32>,
    #[serde(default)]
    pub fouls: Option<u32>,
    #[serde(default)]
    pub yellow_cards: Option<u32>,
    #[serde(default)]
    pub red_cards: Option<u32>,
}

/// Top-level shape of an import file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureFile {
    pub fixtures: Vec<Fixture>,
}

/// Player season profile used by the goalscorer model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub shots_per_90: f64,
    pub xg_per_shot: f64,
    /// Expected minutes in the upcoming match
    #[serde(default = "default_minutes")]
    pub expected_minutes: f64,
}

fn default_minutes() -> f64 {
    90.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_file_parses_optional_fields() {
        let json = r#"{"fixtures":[{"id":7,"date":"2024-08-18T19:00:00Z",
            "home_team":"Real Madrid","away_team":"Sevilla",
            "home_goals":2,"away_goals":0,
            "home_stats":{"corner_kicks":6,"yellow_cards":1}}]}"#;
        let file: FixtureFile = serde_json::from_str(json).unwrap();
        let f = &file.fixtures[0];
        assert_eq!(f.score(), Some((2, 0)));
        assert_eq!(f.home_stats.as_ref().unwrap().corner_kicks, Some(6));
        assert!(f.away_stats.is_none());
        assert!(f.referee.is_none());
    }

    #[test]
    fn test_unplayed_fixture_has_no_score() {
        let json = r#"{"id":8,"date":"2024-08-25T19:00:00Z","home_team":"A","away_team":"B","home_goals":1}"#;
        let f: Fixture = serde_json::from_str(json).unwrap();
        assert_eq!(f.score(), None);
    }

    #[test]
    fn test_player_profile_defaults_to_full_match() {
        let p: PlayerProfile =
            serde_json::from_str(r#"{"name":"Vinícius","shots_per_90":3.1,"xg_per_shot":0.12}"#).unwrap();
        assert_eq!(p.expected_minutes, 90.0);
    }
}

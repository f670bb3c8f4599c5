//! Bookmaker team names to stored team names
//!
//! Rushbet prints "Atlético de Madrid" where the fixture history says
//! "Atletico Madrid". Names are normalised, matched exactly if possible and
//! otherwise scored by fuzzy similarity. Resolved names are remembered in the
//! store so a mapping is only guessed once.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::fold_label;
use crate::store::Store;

/// Saved as verified without review
pub const CONFIDENCE_AUTO_MATCH: f64 = 0.85;
/// Saved but flagged for review
pub const CONFIDENCE_TENTATIVE: f64 = 0.60;
/// Below this nothing is saved
pub const CONFIDENCE_REJECT: f64 = 0.50;

/// Club-form tokens that carry no identity
const CLUB_TOKENS: &[&str] = &[
    "fc", "cf", "cd", "sc", "ac", "afc", "ca", "cp", "sd", "ud", "rc", "rcd", "sl", "ss", "as", "club", "de",
    "deportivo", "futbol", "football",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Verified,
    Tentative,
    LowConfidence,
}

impl MatchStatus {
    pub fn from_confidence(confidence: f64) -> Option<Self> {
        if confidence >= CONFIDENCE_AUTO_MATCH {
            Some(Self::Verified)
        } else if confidence >= CONFIDENCE_TENTATIVE {
            Some(Self::Tentative)
        } else if confidence >= CONFIDENCE_REJECT {
            Some(Self::LowConfidence)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMatch {
    pub source: String,
    pub team: String,
    pub confidence: f64,
    pub status: MatchStatus,
}

impl TeamMatch {
    pub fn is_verified(&self) -> bool {
        self.status == MatchStatus::Verified
    }
}

/// Lowercase, accents and punctuation stripped, club tokens dropped
pub fn normalize(name: &str) -> String {
    let folded: String = fold_label(name)
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let tokens: Vec<&str> = folded
        .split_whitespace()
        .filter(|t| !CLUB_TOKENS.contains(t))
        .collect();

    if tokens.is_empty() {
        // "FC" alone: keep what there was
        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    } else {
        tokens.join(" ")
    }
}

/// Words in alphabetical order, so "Madrid Atletico" equals "Atletico Madrid"
fn token_sort(name: &str) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

/// Similarity of two normalised names in [0, 1]: the better of bigram
/// Sørensen-Dice and token-sorted normalised Levenshtein
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let dice = strsim::sorensen_dice(a, b);
    let sorted = strsim::normalized_levenshtein(&token_sort(a), &token_sort(b));
    dice.max(sorted)
}

/// Fuzzy matcher over a fixed list of known team names
pub struct TeamMatcher {
    teams: Vec<(String, String)>,
}

impl TeamMatcher {
    pub fn new<I, S>(teams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let teams = teams
            .into_iter()
            .map(Into::into)
            .map(|t: String| {
                let n = normalize(&t);
                (t, n)
            })
            .collect();
        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    /// Best candidate, or `None` if nothing clears the reject threshold
    pub fn find(&self, source: &str) -> Option<TeamMatch> {
        let needle = normalize(source);

        if let Some((team, _)) = self.teams.iter().find(|(_, n)| *n == needle) {
            return Some(TeamMatch {
                source: source.to_string(),
                team: team.clone(),
                confidence: 1.0,
                status: MatchStatus::Verified,
            });
        }

        let (team, confidence) = self
            .teams
            .iter()
            .map(|(team, n)| (team, similarity(&needle, n)))
            .max_by(|a, b| a.1.total_cmp(&b.1))?;

        let status = MatchStatus::from_confidence(confidence)?;
        Some(TeamMatch {
            source: source.to_string(),
            team: team.clone(),
            confidence,
            status,
        })
    }
}

/// Stored team for a bookmaker name: saved mapping first, then fuzzy match
/// against the store's teams. New matches are saved.
pub fn resolve_team(store: &Store, source: &str) -> Result<Option<TeamMatch>> {
    let source = source.trim();
    if source.is_empty() {
        return Ok(None);
    }

    if let Some(saved) = store.team_mapping(source)? {
        debug!("Team '{}' mapped from store to '{}'", source, saved.team);
        return Ok(Some(saved));
    }

    let matcher = TeamMatcher::new(store.teams()?);
    let Some(found) = matcher.find(source) else {
        warn!("No stored team matches '{}'", source);
        return Ok(None);
    };

    store.save_team_mapping(&found)?;
    info!(
        "Auto-match: '{}' -> '{}' (confidence {:.0}%, {:?})",
        source,
        found.team,
        found.confidence * 100.0,
        found.status
    );
    Ok(Some(found))
}

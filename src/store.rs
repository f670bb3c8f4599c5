//! Fixture store - SQLite history for team form and value bet logging
//!
//! Holds imported fixtures with per-team box scores, serves last-N team
//! averages to the predictors and records every value bet the analysis finds.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::team_mapping::{MatchStatus, TeamMatch};
use crate::types::{Fixture, TeamMatchStats};
use crate::value::ValueBet;

/// Weight of each older match relative to the one after it
pub const EWMA_DECAY: f64 = 0.9;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS fixtures (
        id INTEGER PRIMARY KEY,
        league TEXT,
        season INTEGER,
        date TEXT NOT NULL,
        home_team TEXT NOT NULL,
        away_team TEXT NOT NULL,
        home_goals INTEGER,
        away_goals INTEGER,
        referee TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_fixtures_date ON fixtures(date);
    CREATE INDEX IF NOT EXISTS idx_fixtures_home ON fixtures(home_team);
    CREATE INDEX IF NOT EXISTS idx_fixtures_away ON fixtures(away_team);

    CREATE TABLE IF NOT EXISTS team_match_stats (
        fixture_id INTEGER NOT NULL REFERENCES fixtures(id),
        is_home INTEGER NOT NULL,
        possession REAL,
        shots_on_goal INTEGER,
        total_shots INTEGER,
        corner_kicks INTEGER,
        fouls INTEGER,
        yellow_cards INTEGER,
        red_cards INTEGER,
        PRIMARY KEY (fixture_id, is_home)
    );

    CREATE TABLE IF NOT EXISTS value_bets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        run_id TEXT NOT NULL,
        recorded_at TEXT NOT NULL,
        event_id INTEGER NOT NULL,
        event_name TEXT NOT NULL,
        market TEXT NOT NULL,
        selection TEXT NOT NULL,
        line REAL,
        probability REAL NOT NULL,
        odds REAL NOT NULL,
        edge REAL NOT NULL,
        kelly REAL NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_value_bets_run ON value_bets(run_id);

    CREATE TABLE IF NOT EXISTS team_mappings (
        source_name TEXT PRIMARY KEY,
        team TEXT NOT NULL,
        confidence REAL NOT NULL,
        verified INTEGER NOT NULL,
        updated_at TEXT NOT NULL
    );
";

/// Recent-form averages for one team, per match
#[derive(Debug, Clone, PartialEq)]
pub struct TeamAverages {
    pub team: String,
    pub matches: usize,
    pub goals_for: f64,
    pub goals_against: f64,
    pub corners_for: Option<f64>,
    pub corners_against: Option<f64>,
    /// Yellow plus red cards
    pub cards: Option<f64>,
    pub shots: Option<f64>,
    pub possession: Option<f64>,
}

/// Row counts
#[derive(Debug, Clone)]
pub struct StoreStats {
    pub fixtures: u32,
    pub played: u32,
    pub teams: u32,
    pub value_bets: u32,
    pub runs: u32,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Fixtures: {} ({} played) | Teams: {} | Value bets: {} over {} runs",
            self.fixtures, self.played, self.teams, self.value_bets, self.runs
        )
    }
}

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path.display()))?;
        let store = Self::init(conn)?;
        info!("Fixture database ready at {}", path.display());
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)
            .context("Failed to create schema")?;
        Ok(Self { conn })
    }

    /// Insert or replace fixtures with their box scores
    pub fn import_fixtures(&mut self, fixtures: &[Fixture]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_fixture = tx.prepare(
                "INSERT OR REPLACE INTO fixtures (
                    id, league, season, date, home_team, away_team, home_goals, away_goals, referee
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            let mut insert_stats = tx.prepare(
                "INSERT OR REPLACE INTO team_match_stats (
                    fixture_id, is_home, possession, shots_on_goal, total_shots,
                    corner_kicks, fouls, yellow_cards, red_cards
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for fixture in fixtures {
                insert_fixture.execute(params![
                    fixture.id,
                    fixture.league,
                    fixture.season,
                    fixture.date.to_rfc3339(),
                    fixture.home_team,
                    fixture.away_team,
                    fixture.home_goals,
                    fixture.away_goals,
                    fixture.referee,
                ])?;

                for (is_home, stats) in [(true, &fixture.home_stats), (false, &fixture.away_stats)] {
                    if let Some(s) = stats {
                        insert_stats.execute(params![
                            fixture.id,
                            is_home,
                            s.possession,
                            s.shots_on_goal,
                            s.total_shots,
                            s.corner_kicks,
                            s.fouls,
                            s.yellow_cards,
                            s.red_cards,
                        ])?;
                    }
                }
            }
        }
        tx.commit().context("Failed to commit fixture import")?;

        info!("Imported {} fixtures", fixtures.len());
        Ok(fixtures.len())
    }

    fn stats_for(&self, fixture_id: i64, is_home: bool) -> Result<Option<TeamMatchStats>> {
        let stats = self
            .conn
            .query_row(
                "SELECT possession, shots_on_goal, total_shots, corner_kicks, fouls, yellow_cards, red_cards
                 FROM team_match_stats WHERE fixture_id = ?1 AND is_home = ?2",
                params![fixture_id, is_home],
                |row| {
                    Ok(TeamMatchStats {
                        possession: row.get(0)?,
                        shots_on_goal: row.get(1)?,
                        total_shots: row.get(2)?,
                        corner_kicks: row.get(3)?,
                        fouls: row.get(4)?,
                        yellow_cards: row.get(5)?,
                        red_cards: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }

    fn fixture_from_row(row: &Row<'_>) -> rusqlite::Result<Fixture> {
        let date: String = row.get(3)?;
        let date = DateTime::parse_from_rfc3339(&date)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e)))?;

        Ok(Fixture {
            id: row.get(0)?,
            league: row.get(1)?,
            season: row.get(2)?,
            date,
            home_team: row.get(4)?,
            away_team: row.get(5)?,
            home_goals: row.get(6)?,
            away_goals: row.get(7)?,
            referee: row.get(8)?,
            home_stats: None,
            away_stats: None,
        })
    }

    fn query_fixtures(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Fixture>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut fixtures = stmt
            .query_map(params, Self::fixture_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for fixture in fixtures.iter_mut() {
            fixture.home_stats = self.stats_for(fixture.id, true)?;
            fixture.away_stats = self.stats_for(fixture.id, false)?;
        }
        Ok(fixtures)
    }

    /// All fixtures, oldest first
    pub fn fixtures(&self) -> Result<Vec<Fixture>> {
        self.query_fixtures(
            "SELECT id, league, season, date, home_team, away_team, home_goals, away_goals, referee
             FROM fixtures ORDER BY date ASC",
            [],
        )
    }

    /// Last `n` played fixtures of a team, most recent first
    pub fn last_n(&self, team: &str, n: usize) -> Result<Vec<Fixture>> {
        self.query_fixtures(
            "SELECT id, league, season, date, home_team, away_team, home_goals, away_goals, referee
             FROM fixtures
             WHERE (home_team = ?1 OR away_team = ?1)
               AND home_goals IS NOT NULL AND away_goals IS NOT NULL
             ORDER BY date DESC LIMIT ?2",
            params![team, n as i64],
        )
    }

    /// Every team name seen in home or away position
    pub fn teams(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT home_team FROM fixtures UNION SELECT away_team FROM fixtures ORDER BY 1",
        )?;
        let teams = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(teams)
    }

    /// Per-match averages over the last `last_n` played games. With `weighted`
    /// the most recent match has weight 1 and each older one 0.9 times the
    /// previous.
    pub fn team_averages(&self, team: &str, last_n: usize, weighted: bool) -> Result<Option<TeamAverages>> {
        let fixtures = self.last_n(team, last_n)?;
        if fixtures.is_empty() {
            debug!("No played fixtures for {}", team);
            return Ok(None);
        }

        let mut goals_for = Mean::default();
        let mut goals_against = Mean::default();
        let mut corners_for = Mean::default();
        let mut corners_against = Mean::default();
        let mut cards = Mean::default();
        let mut shots = Mean::default();
        let mut possession = Mean::default();

        for (i, fixture) in fixtures.iter().enumerate() {
            let w = if weighted { EWMA_DECAY.powi(i as i32) } else { 1.0 };
            let is_home = fixture.home_team == team;
            let (own, opp) = if is_home {
                (&fixture.home_stats, &fixture.away_stats)
            } else {
                (&fixture.away_stats, &fixture.home_stats)
            };

            if let Some((home, away)) = fixture.score() {
                let (scored, conceded) = if is_home { (home, away) } else { (away, home) };
                goals_for.add(w, Some(scored as f64));
                goals_against.add(w, Some(conceded as f64));
            }

            let own = own.as_ref();
            corners_for.add(w, own.and_then(|s| s.corner_kicks).map(f64::from));
            corners_against.add(w, opp.as_ref().and_then(|s| s.corner_kicks).map(f64::from));
            cards.add(
                w,
                own.and_then(|s| match (s.yellow_cards, s.red_cards) {
                    (None, None) => None,
                    (y, r) => Some(f64::from(y.unwrap_or(0) + r.unwrap_or(0))),
                }),
            );
            shots.add(w, own.and_then(|s| s.total_shots).map(f64::from));
            possession.add(w, own.and_then(|s| s.possession));
        }

        Ok(Some(TeamAverages {
            team: team.to_string(),
            matches: fixtures.len(),
            goals_for: goals_for.value().unwrap_or(0.0),
            goals_against: goals_against.value().unwrap_or(0.0),
            corners_for: corners_for.value(),
            corners_against: corners_against.value(),
            cards: cards.value(),
            shots: shots.value(),
            possession: possession.value(),
        }))
    }

    /// Log value bets found in one analysis run
    pub fn record_value_bets(
        &mut self,
        run_id: Uuid,
        event_id: u64,
        event_name: &str,
        bets: &[ValueBet],
    ) -> Result<usize> {
        let recorded_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO value_bets (
                    run_id, recorded_at, event_id, event_name, market, selection,
                    line, probability, odds, edge, kelly
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;
            for bet in bets {
                stmt.execute(params![
                    run_id.to_string(),
                    recorded_at,
                    event_id as i64,
                    event_name,
                    format!("{:?}", bet.market),
                    bet.selection,
                    bet.line,
                    bet.probability,
                    bet.odds.to_f64().unwrap_or(0.0),
                    bet.edge,
                    bet.kelly,
                ])?;
            }
        }
        tx.commit().context("Failed to record value bets")?;

        debug!("Recorded {} value bets for run {}", bets.len(), run_id);
        Ok(bets.len())
    }

    pub fn value_bet_count(&self, run_id: Uuid) -> Result<u32> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM value_bets WHERE run_id = ?1",
            [run_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(count as u32)
    }

    pub fn team_mapping(&self, source: &str) -> Result<Option<TeamMatch>> {
        let mapping = self
            .conn
            .query_row(
                "SELECT team, confidence, verified FROM team_mappings WHERE source_name = ?1",
                [source],
                |row| {
                    let confidence: f64 = row.get(1)?;
                    let verified: bool = row.get(2)?;
                    let status = if verified {
                        MatchStatus::Verified
                    } else {
                        MatchStatus::from_confidence(confidence).unwrap_or(MatchStatus::LowConfidence)
                    };
                    Ok(TeamMatch {
                        source: source.to_string(),
                        team: row.get(0)?,
                        confidence,
                        status,
                    })
                },
            )
            .optional()?;
        Ok(mapping)
    }

    pub fn save_team_mapping(&self, mapping: &TeamMatch) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO team_mappings (source_name, team, confidence, verified, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                mapping.source,
                mapping.team,
                mapping.confidence,
                mapping.is_verified(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Manual correction of a mapping; always stored as verified
    pub fn verify_team_mapping(&self, source: &str, team: &str) -> Result<()> {
        self.save_team_mapping(&TeamMatch {
            source: source.to_string(),
            team: team.to_string(),
            confidence: 1.0,
            status: MatchStatus::Verified,
        })?;
        info!("Mapping verified: '{}' -> '{}'", source, team);
        Ok(())
    }

    /// Mappings still waiting for manual review
    pub fn unverified_team_mappings(&self) -> Result<Vec<TeamMatch>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_name, team, confidence FROM team_mappings WHERE verified = 0 ORDER BY confidence ASC",
        )?;
        let mappings = stmt
            .query_map([], |row| {
                let confidence: f64 = row.get(2)?;
                Ok(TeamMatch {
                    source: row.get(0)?,
                    team: row.get(1)?,
                    confidence,
                    status: MatchStatus::from_confidence(confidence).unwrap_or(MatchStatus::LowConfidence),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(mappings)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let count = |sql: &str| -> Result<u32> {
            let n: i64 = self.conn.query_row(sql, [], |row| row.get(0))?;
            Ok(n as u32)
        };

        Ok(StoreStats {
            fixtures: count("SELECT COUNT(*) FROM fixtures")?,
            played: count("SELECT COUNT(*) FROM fixtures WHERE home_goals IS NOT NULL AND away_goals IS NOT NULL")?,
            teams: count("SELECT COUNT(*) FROM (SELECT home_team FROM fixtures UNION SELECT away_team FROM fixtures)")?,
            value_bets: count("SELECT COUNT(*) FROM value_bets")?,
            runs: count("SELECT COUNT(DISTINCT run_id) FROM value_bets")?,
        })
    }
}

/// Weighted running mean that ignores missing values
#[derive(Default)]
struct Mean {
    sum: f64,
    weight: f64,
}

impl Mean {
    fn add(&mut self, weight: f64, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += weight * v;
            self.weight += weight;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.sum / self.weight)
    }
}

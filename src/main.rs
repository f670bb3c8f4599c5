use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use sports_predictor::alerts::AlertClient;
use sports_predictor::analysis::analyze_event;
use sports_predictor::catalog::{Catalog, MarketCategory};
use sports_predictor::config::Config;
use sports_predictor::kambi::{KambiClient, OddsSource, SnapshotFile};
use sports_predictor::models::EloRatings;
use sports_predictor::predictions::{MatchInputs, MatchPredictor, MatchReport};
use sports_predictor::store::Store;
use sports_predictor::taxonomy::{self, Severity};
use sports_predictor::types::{FixtureFile, PlayerProfile};

#[derive(Parser)]
#[command(name = "sports-predictor")]
#[command(version, about = "Football market catalog, match predictions and value bet detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalogued markets
    Catalog {
        /// Category key, e.g. tiempo_reglamentario or corners
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Lint betting taxonomy markdown documents
    Lint {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Predict every market from expected goals
    Predict {
        #[arg(long)]
        home_xg: f64,
        #[arg(long)]
        away_xg: f64,
        #[arg(long, requires = "away_corners")]
        home_corners: Option<f64>,
        #[arg(long, requires = "home_corners")]
        away_corners: Option<f64>,
        #[arg(long, requires = "away_cards")]
        home_cards: Option<f64>,
        #[arg(long, requires = "home_cards")]
        away_cards: Option<f64>,
        /// Referee's cards per match
        #[arg(long)]
        referee_cards: Option<f64>,
        /// JSON file with {"home": [...], "away": [...]} player profiles
        #[arg(long)]
        players: Option<PathBuf>,
        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Replay a fixtures file and print ELO ratings
    Elo {
        fixtures: PathBuf,
        #[arg(short, long, default_value = "20")]
        top: usize,
    },
    /// Import a fixtures file into the local database
    Import { fixtures: PathBuf },
    /// List bookmaker football events
    Events {
        /// Saved listView responses instead of the live API
        #[arg(long)]
        snapshot: Vec<PathBuf>,
    },
    /// Compare model predictions with bookmaker odds for events
    Analyze {
        #[arg(required = true)]
        event_ids: Vec<u64>,
        /// Saved betoffer responses instead of the live API
        #[arg(long)]
        snapshot: Vec<PathBuf>,
    },
    /// Database summary and team mappings awaiting review
    Stats,
    /// Confirm or correct a bookmaker team name mapping
    Verify { source: String, team: String },
}

#[derive(serde::Deserialize, Default)]
struct PlayersFile {
    #[serde(default)]
    home: Vec<PlayerProfile>,
    #[serde(default)]
    away: Vec<PlayerProfile>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Setup logging
    FmtSubscriber::builder()
        .with_max_level(match config.log_level.as_str() {
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        })
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    match cli.command {
        Commands::Catalog { category } => print_catalog(category.as_deref()),
        Commands::Lint { files } => lint(&files),
        Commands::Predict {
            home_xg,
            away_xg,
            home_corners,
            away_corners,
            home_cards,
            away_cards,
            referee_cards,
            players,
            json,
        } => {
            let players = match players {
                Some(path) => read_json::<PlayersFile>(&path)?,
                None => PlayersFile::default(),
            };
            let inputs = MatchInputs {
                home_xg,
                away_xg,
                corners: home_corners.zip(away_corners),
                cards: home_cards.zip(away_cards).map(|(h, a)| (h, a, referee_cards)),
                elo: None,
                home_players: players.home,
                away_players: players.away,
            };
            let report = MatchPredictor::new(config.poisson_model(), 0.0).predict(&inputs)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Commands::Elo { fixtures, top } => {
            let file: FixtureFile = read_json(&fixtures)?;
            let mut elo = EloRatings::default();
            let played = elo.replay(&file.fixtures);
            info!("Replayed {} played fixtures", played);
            for (i, (team, rating)) in elo.table().iter().take(top).enumerate() {
                println!("{:>3}. {:<30} {:>7.1}", i + 1, team, rating);
            }
            Ok(())
        }
        Commands::Import { fixtures } => {
            let file: FixtureFile = read_json(&fixtures)?;
            let mut store = Store::open(&config.db_path)?;
            store.import_fixtures(&file.fixtures)?;
            println!("{}", store.stats()?);
            Ok(())
        }
        Commands::Events { snapshot } => {
            let source = odds_source(&config, &snapshot)?;
            let events = source.events().await?;
            for event in &events {
                let odds = event
                    .odds
                    .as_ref()
                    .map(|o| format!("{} / {} / {}", o.home, o.draw, o.away))
                    .unwrap_or_else(|| "-".to_string());
                let start = event
                    .start
                    .map(|s| s.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{:>12}  {:16}  {:<40} {:<25} {}", event.id, start, event.name, event.league, odds);
            }
            info!("{} events", events.len());
            Ok(())
        }
        Commands::Analyze { event_ids, snapshot } => analyze(&config, &event_ids, &snapshot).await,
        Commands::Stats => {
            let store = Store::open(&config.db_path)?;
            println!("{}", store.stats()?);
            for mapping in store.unverified_team_mappings()? {
                println!(
                    "  unverified: '{}' -> '{}' ({:.0}%)",
                    mapping.source,
                    mapping.team,
                    mapping.confidence * 100.0
                );
            }
            Ok(())
        }
        Commands::Verify { source, team } => {
            let store = Store::open(&config.db_path)?;
            store.verify_team_mapping(&source, &team)
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

fn odds_source(config: &Config, snapshot: &[PathBuf]) -> Result<Box<dyn OddsSource>> {
    if snapshot.is_empty() {
        Ok(Box::new(KambiClient::new(config.clone())?))
    } else {
        Ok(Box::new(SnapshotFile::load(snapshot)?))
    }
}

fn print_catalog(category: Option<&str>) -> Result<()> {
    let catalog = Catalog::builtin();
    let categories: Vec<MarketCategory> = match category {
        Some(key) => match MarketCategory::from_key(key) {
            Some(c) => vec![c],
            None => bail!("Unknown category '{}'", key),
        },
        None => MarketCategory::ALL.to_vec(),
    };

    for category in categories {
        let markets = catalog.by_category(category);
        if markets.is_empty() {
            continue;
        }
        println!("{} ({})", category, category.key());
        for market in markets {
            println!("  {:<40} {}", market.name, market.outcomes.join(" / "));
        }
    }
    Ok(())
}

fn lint(files: &[PathBuf]) -> Result<()> {
    let docs = files
        .iter()
        .map(taxonomy::load)
        .collect::<Result<Vec<_>, _>>()?;

    let findings = taxonomy::lint(&docs);
    for finding in &findings {
        println!("{}", finding);
    }

    let errors = findings.iter().filter(|f| f.severity == Severity::Error).count();
    info!("{} findings, {} errors", findings.len(), errors);
    if errors > 0 {
        bail!("{} taxonomy errors", errors);
    }
    Ok(())
}

fn print_report(report: &MatchReport) {
    let mr = &report.match_result;
    println!("xG {:.2} - {:.2}", mr.home_xg, mr.away_xg);
    println!(
        "1X2          {:.1}% / {:.1}% / {:.1}%",
        mr.result.home * 100.0,
        mr.result.draw * 100.0,
        mr.result.away * 100.0
    );
    println!(
        "Double chance 1X {:.1}% | 12 {:.1}% | X2 {:.1}%",
        mr.double_chance.home_or_draw * 100.0,
        mr.double_chance.home_or_away * 100.0,
        mr.double_chance.draw_or_away * 100.0
    );
    println!("BTTS yes     {:.1}%", report.goals.btts.yes * 100.0);
    for ou in &report.goals.over_under {
        println!("Over {:<4}     {:.1}%", ou.line, ou.over * 100.0);
    }
    for s in report.exact_score.top().iter().take(5) {
        println!("Score {:<6}  {:.1}%", s.label(), s.probability * 100.0);
    }
    if let Some(c) = &report.corners {
        println!("Corners expected {:.1} (sd {:.1})", c.total_avg, c.total_std);
    }
    if let Some(c) = &report.cards {
        println!("Cards expected {:.1}", c.total_expected);
    }
    if let Some(g) = &report.goalscorers {
        for f in g.first_scorer.iter().take(5) {
            println!("First scorer {:<25} {:.1}%", f.name, f.probability * 100.0);
        }
    }
}

async fn analyze(config: &Config, event_ids: &[u64], snapshot: &[PathBuf]) -> Result<()> {
    let mut store = Store::open(&config.db_path)?;
    let alerts = AlertClient::new(config.discord_webhook.clone());
    alerts.analysis_started(event_ids.len()).await;

    let source: Box<dyn OddsSource> = if snapshot.is_empty() {
        let client = KambiClient::new(config.clone())?;
        // warm the event cache concurrently
        for (id, result) in client.fetch_details(event_ids).await {
            if let Err(e) = result {
                warn!("Prefetch of event {} failed: {}", id, e);
            }
        }
        Box::new(client)
    } else {
        Box::new(SnapshotFile::load(snapshot)?)
    };

    for &event_id in event_ids {
        match analyze_event(source.as_ref(), &mut store, config, &alerts, event_id).await {
            Ok(Some(analysis)) => {
                println!(
                    "{} ({} vs {}, xG {:.2}-{:.2}): {} value bets",
                    analysis.event_name,
                    analysis.home.team,
                    analysis.away.team,
                    analysis.home_xg,
                    analysis.away_xg,
                    analysis.value_bets.len()
                );
                for bet in &analysis.value_bets {
                    println!(
                        "  {:<50} @ {:<6} p={:.3} edge={:+.3} kelly/4={:.3}",
                        bet.selection,
                        bet.odds,
                        bet.probability,
                        bet.edge,
                        bet.stake_fraction(0.25, 0.05)
                    );
                }
            }
            Ok(None) => warn!("Event {} skipped: teams unmapped or without history", event_id),
            Err(e) => {
                error!("Event {} failed: {:#}", event_id, e);
                alerts.error(&format!("Analysis of event {}", event_id), &e.to_string()).await;
            }
        }
    }
    Ok(())
}

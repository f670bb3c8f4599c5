use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;

use crate::models::PoissonModel;

#[derive(Debug, Clone)]
pub struct Config {
    // Kambi offering API
    pub kambi_base_url: String,
    pub kambi_offering: String,
    pub kambi_market: String,
    pub kambi_lang: String,
    pub kambi_client_id: String,
    pub kambi_channel_id: String,
    pub event_cache_ttl_secs: u64,

    // Storage
    pub db_path: String,

    // Model parameters
    pub dixon_coles_rho: f64,
    pub home_advantage: f64,
    pub league_avg_goals: f64,
    pub last_n_games: usize,

    // Value detection
    pub min_edge: Decimal,

    // Mode
    pub log_level: String,

    // Alerts
    pub discord_webhook: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            // Kambi offering API (Rushbet Colombia by default)
            kambi_base_url: env::var("KAMBI_BASE_URL")
                .unwrap_or_else(|_| "https://us1.offering-api.kambicdn.com/offering/v2018".to_string()),
            kambi_offering: env::var("KAMBI_OFFERING").unwrap_or_else(|_| "rsico".to_string()),
            kambi_market: env::var("KAMBI_MARKET").unwrap_or_else(|_| "CO".to_string()),
            kambi_lang: env::var("KAMBI_LANG").unwrap_or_else(|_| "es_ES".to_string()),
            kambi_client_id: env::var("KAMBI_CLIENT_ID").unwrap_or_else(|_| "200".to_string()),
            kambi_channel_id: env::var("KAMBI_CHANNEL_ID").unwrap_or_else(|_| "1".to_string()),
            event_cache_ttl_secs: env::var("EVENT_CACHE_TTL_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .context("Invalid EVENT_CACHE_TTL_SECS")?,

            // Storage
            db_path: env::var("DB_PATH").unwrap_or_else(|_| "./data/football.db".to_string()),

            // Model parameters
            dixon_coles_rho: env::var("DIXON_COLES_RHO")
                .unwrap_or_else(|_| "0.1".to_string())
                .parse()
                .context("Invalid DIXON_COLES_RHO")?,
            home_advantage: env::var("HOME_ADVANTAGE")
                .unwrap_or_else(|_| "1.1".to_string())
                .parse()
                .context("Invalid HOME_ADVANTAGE")?,
            league_avg_goals: env::var("LEAGUE_AVG_GOALS")
                .unwrap_or_else(|_| "1.35".to_string())
                .parse()
                .context("Invalid LEAGUE_AVG_GOALS")?,
            last_n_games: env::var("LAST_N_GAMES")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .context("Invalid LAST_N_GAMES")?,

            // Value detection (5% edge like the match result predictor)
            min_edge: env::var("MIN_EDGE")
                .unwrap_or_else(|_| "0.05".to_string())
                .parse()
                .context("Invalid MIN_EDGE")?,

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            discord_webhook: env::var("DISCORD_WEBHOOK").ok(),
        })
    }

    /// Base URL including the offering segment, e.g. `.../v2018/rsico`
    pub fn offering_url(&self) -> String {
        format!(
            "{}/{}",
            self.kambi_base_url.trim_end_matches('/'),
            self.kambi_offering
        )
    }

    /// Goal model with the configured league scoring rate; home teams get the home advantage on top
    pub fn poisson_model(&self) -> PoissonModel {
        PoissonModel {
            league_avg_home: self.league_avg_goals * self.home_advantage,
            league_avg_away: self.league_avg_goals,
            rho: self.dixon_coles_rho,
            ..PoissonModel::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kambi_base_url: "https://us1.offering-api.kambicdn.com/offering/v2018".to_string(),
            kambi_offering: "rsico".to_string(),
            kambi_market: "CO".to_string(),
            kambi_lang: "es_ES".to_string(),
            kambi_client_id: "200".to_string(),
            kambi_channel_id: "1".to_string(),
            event_cache_ttl_secs: 60,
            db_path: "./data/football.db".to_string(),
            dixon_coles_rho: 0.1,
            home_advantage: 1.1,
            league_avg_goals: 1.35,
            last_n_games: 20,
            min_edge: Decimal::new(5, 2),
            log_level: "info".to_string(),
            discord_webhook: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offering_url_strips_trailing_slash() {
        let config = Config {
            kambi_base_url: "https://example.test/offering/v2018/".to_string(),
            ..Config::default()
        };
        assert_eq!(config.offering_url(), "https://example.test/offering/v2018/rsico");
    }

    #[test]
    fn test_poisson_model_uses_league_average() {
        let config = Config {
            league_avg_goals: 1.5,
            home_advantage: 1.2,
            dixon_coles_rho: 0.05,
            ..Config::default()
        };
        let model = config.poisson_model();
        assert!((model.league_avg_home - 1.8).abs() < 1e-12);
        assert_eq!(model.league_avg_away, 1.5);
        assert_eq!(model.rho, 0.05);
    }
}

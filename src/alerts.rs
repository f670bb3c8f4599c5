use anyhow::Result;
use reqwest::Client;
use serde_json::json;
use tracing::error;

use crate::value::ValueBet;

const GREEN: u32 = 0x00FF00;
const BLUE: u32 = 0x0099FF;
const ORANGE: u32 = 0xFFA500;
const RED: u32 = 0xFF0000;

/// Most bets listed in one message
const MAX_LISTED_BETS: usize = 10;

/// Discord webhook client for alerts
pub struct AlertClient {
    client: Client,
    webhook_url: Option<String>,
}

impl AlertClient {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            webhook_url,
        }
    }

    pub fn enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Send a Discord message
    async fn send(&self, content: &str, color: u32) -> Result<()> {
        let Some(url) = &self.webhook_url else {
            return Ok(());
        };

        let payload = json!({
            "embeds": [{
                "description": content,
                "color": color
            }]
        });

        if let Err(e) = self.client.post(url).json(&payload).send().await {
            // alerts never fail an analysis run
            error!("Failed to send Discord alert: {}", e);
        }
        Ok(())
    }

    pub async fn analysis_started(&self, events: usize) {
        let msg = format!("🔎 **Analysis Started**\nEvents: {}", events);
        let _ = self.send(&msg, BLUE).await;
    }

    pub async fn value_bets_found(&self, event: &str, bets: &[ValueBet]) {
        if bets.is_empty() {
            return;
        }
        let _ = self.send(&format_value_bets(event, bets), GREEN).await;
    }

    pub async fn error(&self, context: &str, error: &str) {
        let msg = format!("❌ **Error**\n{}\n```{}```", context, error);
        let _ = self.send(&msg, RED).await;
    }

    pub async fn warning(&self, message: &str) {
        let msg = format!("⚠️ **Warning**\n{}", message);
        let _ = self.send(&msg, ORANGE).await;
    }
}

pub fn format_value_bets(event: &str, bets: &[ValueBet]) -> String {
    let mut msg = format!("💰 **Value Bets**\n{}\n", event);
    for bet in bets.iter().take(MAX_LISTED_BETS) {
        msg.push_str(&format!(
            "• {} @ {} | model {:.1}% vs implied {:.1}% | edge {:+.1}%\n",
            bet.selection,
            bet.odds,
            bet.probability * 100.0,
            bet.implied * 100.0,
            bet.edge * 100.0
        ));
    }
    if bets.len() > MAX_LISTED_BETS {
        msg.push_str(&format!("… and {} more", bets.len() - MAX_LISTED_BETS));
    }
    msg
}

/// Football betting market analysis
///
/// This library catalogues the football betting markets offered by
/// Kambi-powered bookmakers, predicts their probabilities with Poisson
/// (Dixon-Coles), ELO and normal-approximation models, and compares those
/// probabilities with bookmaker odds to find value bets.

pub mod alerts;
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod kambi;
pub mod models;
pub mod predictions;
pub mod retry;
pub mod store;
pub mod taxonomy;
pub mod team_mapping;
pub mod types;
pub mod value;

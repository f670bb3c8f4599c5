//! Lining bookmaker outcomes up against model predictions

use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::catalog::{fold_label, Catalog, MarketCategory, MarketKind};
use crate::predictions::{MarketPrediction, MatchReport, Pick, Side};
use crate::value::Candidate;

use super::types::{EventDetail, Market, Outcome};

/// Which team a label is about, if it names exactly one of them
pub fn side_in_label(label: &str, home: &str, away: &str) -> Option<Side> {
    let label = fold_label(label);
    let home = fold_label(home);
    let away = fold_label(away);
    match (!home.is_empty() && label.contains(&home), !away.is_empty() && label.contains(&away)) {
        (true, false) => Some(Side::Home),
        (false, true) => Some(Side::Away),
        _ => None,
    }
}

/// Kambi outcome type first, then the printed label
pub fn pick_of(outcome: &Outcome, home: &str, away: &str) -> Option<Pick> {
    if let Some(t) = outcome.outcome_type.as_deref() {
        let pick = match t {
            "OT_ONE" => Some(Pick::Home),
            "OT_CROSS" => Some(Pick::Draw),
            "OT_TWO" => Some(Pick::Away),
            "OT_OVER" => Some(Pick::Over),
            "OT_UNDER" => Some(Pick::Under),
            "OT_YES" => Some(Pick::Yes),
            "OT_NO" => Some(Pick::No),
            "OT_ODD" => Some(Pick::Odd),
            "OT_EVEN" => Some(Pick::Even),
            "OT_ONE_OR_CROSS" => Some(Pick::HomeOrDraw),
            "OT_ONE_OR_TWO" => Some(Pick::HomeOrAway),
            "OT_CROSS_OR_TWO" => Some(Pick::DrawOrAway),
            _ => None,
        };
        if pick.is_some() {
            return pick;
        }
    }

    let label = fold_label(&outcome.label);
    match label.as_str() {
        "1" => Some(Pick::Home),
        "x" | "empate" => Some(Pick::Draw),
        "2" => Some(Pick::Away),
        "1x" => Some(Pick::HomeOrDraw),
        "12" => Some(Pick::HomeOrAway),
        "x2" => Some(Pick::DrawOrAway),
        "si" | "yes" => Some(Pick::Yes),
        "no" => Some(Pick::No),
        "par" | "even" => Some(Pick::Even),
        "impar" | "odd" => Some(Pick::Odd),
        l if l.starts_with("mas de") || l.starts_with("over") => Some(Pick::Over),
        l if l.starts_with("menos de") || l.starts_with("under") => Some(Pick::Under),
        l if l == fold_label(home) => Some(Pick::Home),
        l if l == fold_label(away) => Some(Pick::Away),
        _ => None,
    }
}

/// Kambi prints players as "Lewandowski, Robert"
pub fn player_name(raw: &str) -> String {
    match raw.split_once(", ") {
        Some((last, first)) => format!("{} {}", first.trim(), last.trim()),
        None => raw.trim().to_string(),
    }
}

fn is_player_market(kind: MarketKind) -> bool {
    matches!(
        kind,
        MarketKind::AnytimeScorer | MarketKind::FirstScorer | MarketKind::TwoOrMoreGoals
    )
}

/// Resolve a bookmaker market to a catalog kind plus the team it is about
fn market_kind(
    catalog: &Catalog,
    market: &Market,
    category: MarketCategory,
    home: &str,
    away: &str,
) -> Option<(MarketKind, Option<Side>)> {
    let def = catalog.find_by_label(&market.label)?;
    let side = side_in_label(&market.label, home, away);

    let kind = match (def.kind, side) {
        (MarketKind::TotalGoals, Some(_)) => MarketKind::TeamTotalGoals,
        (MarketKind::TotalCorners, Some(_)) => MarketKind::TeamCorners,
        (MarketKind::TotalCards, Some(_)) => MarketKind::TeamCards,
        (kind, _) => kind,
    };

    // half-time boards reuse full-time wording
    if category == MarketCategory::MedioTiempo
        && !matches!(kind, MarketKind::FirstHalfGoals | MarketKind::SecondHalfGoals | MarketKind::FirstHalfResult)
    {
        return None;
    }

    Some((kind, side))
}

fn line_of(outcome: &Outcome) -> Option<f64> {
    outcome.line.and_then(|l| l.to_f64())
}

/// Model prediction for one bookmaker outcome
fn prediction_for(
    report: &MatchReport,
    market: &Market,
    outcome: &Outcome,
    kind: MarketKind,
    market_side: Option<Side>,
    home: &str,
    away: &str,
) -> Option<MarketPrediction> {
    if is_player_market(kind) {
        let name = player_name(outcome.participant.as_deref().unwrap_or(&outcome.label));
        let folded = fold_label(&name);
        return report
            .selections()
            .into_iter()
            .find(|p| p.kind == kind && matches!(&p.pick, Pick::Player(n) if fold_label(n) == folded));
    }

    let pick = pick_of(outcome, home, away)?;
    let (side, line) = match kind {
        MarketKind::AsianHandicap => {
            let side = match pick {
                Pick::Home => Side::Home,
                Pick::Away => Side::Away,
                _ => return None,
            };
            (Some(side), line_of(outcome))
        }
        // three-way lines are quoted from the home side
        MarketKind::EuropeanHandicap => {
            let home_line = market
                .outcomes
                .iter()
                .find(|o| o.outcome_type.as_deref() == Some("OT_ONE"))
                .and_then(line_of)
                .or_else(|| line_of(outcome));
            (Some(Side::Home), home_line.map(f64::round))
        }
        _ => (market_side, line_of(outcome)),
    };

    let probability = report.probability(kind, &pick, side, line)?;
    Some(MarketPrediction {
        kind,
        pick,
        side,
        line,
        probability,
    })
}

/// Every outcome of the event the report can price
pub fn candidates(catalog: &Catalog, detail: &EventDetail, report: &MatchReport) -> Vec<Candidate> {
    let home = detail.home_team.as_str();
    let away = detail.away_team.as_str();
    let mut out = Vec::new();

    for group in &detail.categories {
        for market in &group.markets {
            let Some((kind, side)) = market_kind(catalog, market, group.category, home, away) else {
                continue;
            };
            for outcome in &market.outcomes {
                if let Some(prediction) = prediction_for(report, market, outcome, kind, side, home, away) {
                    out.push(Candidate {
                        prediction,
                        label: format!("{} - {}", market.label, outcome.label),
                        odds: outcome.odds,
                    });
                }
            }
        }
    }

    debug!("Matched {} bookmaker outcomes to model predictions", out.len());
    out
}

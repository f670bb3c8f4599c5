//! Market catalog - the typed betting market taxonomy
//!
//! Every market the toolkit knows about is described once here: which
//! bookmaker category it lives in, its outcomes, the statistics that feed it,
//! where those statistics come from and which model prices it. The catalog
//! is static; nothing mutates it at runtime.

mod builtin;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level grouping used by the bookmaker UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketTab {
    Partido,
    Jugadores,
    Handicap,
}

/// Bookmaker-facing market categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MarketCategory {
    #[serde(rename = "tiempo_reglamentario")]
    TiempoReglamentario,
    #[serde(rename = "medio_tiempo")]
    MedioTiempo,
    #[serde(rename = "corners")]
    Corners,
    #[serde(rename = "tarjetas_equipo")]
    TarjetasEquipo,
    #[serde(rename = "disparos_equipo")]
    DisparosEquipo,
    #[serde(rename = "faltas_equipo")]
    FaltasEquipo,
    #[serde(rename = "eventos_partido")]
    EventosPartido,
    #[serde(rename = "disparos_jugador")]
    DisparosJugador,
    #[serde(rename = "goleador")]
    Goleador,
    #[serde(rename = "tarjetas_jugador")]
    TarjetasJugador,
    #[serde(rename = "apuestas_especiales_jugador")]
    ApuestasEspecialesJugador,
    #[serde(rename = "asistencias_jugador")]
    AsistenciasJugador,
    #[serde(rename = "goles_jugador")]
    GolesJugador,
    #[serde(rename = "paradas_portero")]
    ParadasPortero,
    #[serde(rename = "handicap_3way")]
    Handicap3Way,
    #[serde(rename = "lineas_asiaticas")]
    LineasAsiaticas,
}

impl MarketCategory {
    pub const ALL: [MarketCategory; 16] = [
        MarketCategory::TiempoReglamentario,
        MarketCategory::MedioTiempo,
        MarketCategory::Corners,
        MarketCategory::TarjetasEquipo,
        MarketCategory::DisparosEquipo,
        MarketCategory::FaltasEquipo,
        MarketCategory::EventosPartido,
        MarketCategory::DisparosJugador,
        MarketCategory::Goleador,
        MarketCategory::TarjetasJugador,
        MarketCategory::ApuestasEspecialesJugador,
        MarketCategory::AsistenciasJugador,
        MarketCategory::GolesJugador,
        MarketCategory::ParadasPortero,
        MarketCategory::Handicap3Way,
        MarketCategory::LineasAsiaticas,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MarketCategory::TiempoReglamentario => "tiempo_reglamentario",
            MarketCategory::MedioTiempo => "medio_tiempo",
            MarketCategory::Corners => "corners",
            MarketCategory::TarjetasEquipo => "tarjetas_equipo",
            MarketCategory::DisparosEquipo => "disparos_equipo",
            MarketCategory::FaltasEquipo => "faltas_equipo",
            MarketCategory::EventosPartido => "eventos_partido",
            MarketCategory::DisparosJugador => "disparos_jugador",
            MarketCategory::Goleador => "goleador",
            MarketCategory::TarjetasJugador => "tarjetas_jugador",
            MarketCategory::ApuestasEspecialesJugador => "apuestas_especiales_jugador",
            MarketCategory::AsistenciasJugador => "asistencias_jugador",
            MarketCategory::GolesJugador => "goles_jugador",
            MarketCategory::ParadasPortero => "paradas_portero",
            MarketCategory::Handicap3Way => "handicap_3way",
            MarketCategory::LineasAsiaticas => "lineas_asiaticas",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MarketCategory::TiempoReglamentario => "Tiempo Reglamentario",
            MarketCategory::MedioTiempo => "Medio Tiempo",
            MarketCategory::Corners => "Tiros de Esquina",
            MarketCategory::TarjetasEquipo => "Partido y Tarjetas del Equipo",
            MarketCategory::DisparosEquipo => "Partido y Disparos del Equipo",
            MarketCategory::FaltasEquipo => "Partido y Faltas del Equipo",
            MarketCategory::EventosPartido => "Eventos del Partido",
            MarketCategory::DisparosJugador => "Disparos a Puerta del Jugador",
            MarketCategory::Goleador => "Goleador",
            MarketCategory::TarjetasJugador => "Tarjetas Jugadores",
            MarketCategory::ApuestasEspecialesJugador => "Apuestas Especiales Jugador",
            MarketCategory::AsistenciasJugador => "Asistencias del Jugador",
            MarketCategory::GolesJugador => "Goles del Jugador",
            MarketCategory::ParadasPortero => "Paradas del Portero",
            MarketCategory::Handicap3Way => "Hándicap 3-Way",
            MarketCategory::LineasAsiaticas => "Líneas Asiáticas",
        }
    }

    pub fn tab(&self) -> MarketTab {
        match self {
            MarketCategory::TiempoReglamentario
            | MarketCategory::MedioTiempo
            | MarketCategory::Corners
            | MarketCategory::TarjetasEquipo
            | MarketCategory::DisparosEquipo
            | MarketCategory::FaltasEquipo
            | MarketCategory::EventosPartido => MarketTab::Partido,
            MarketCategory::DisparosJugador
            | MarketCategory::Goleador
            | MarketCategory::TarjetasJugador
            | MarketCategory::ApuestasEspecialesJugador
            | MarketCategory::AsistenciasJugador
            | MarketCategory::GolesJugador
            | MarketCategory::ParadasPortero => MarketTab::Jugadores,
            MarketCategory::Handicap3Way | MarketCategory::LineasAsiaticas => MarketTab::Handicap,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.key() == key)
    }
}

impl fmt::Display for MarketCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Catalogued market types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    MatchResult,
    DoubleChance,
    DrawNoBet,
    BothTeamsToScore,
    TotalGoals,
    TeamTotalGoals,
    OddEvenGoals,
    ExactTotalGoals,
    CorrectScore,
    HalfTimeFullTime,
    FirstHalfResult,
    FirstHalfGoals,
    SecondHalfGoals,
    GoalInBothHalves,
    WinToNil,
    EuropeanHandicap,
    AsianHandicap,
    AsianTotal,
    TotalCorners,
    MostCorners,
    TeamCorners,
    RaceToCorners,
    TotalCards,
    TeamCards,
    RedCardShown,
    TeamShotsOnTarget,
    TeamFouls,
    AnytimeScorer,
    FirstScorer,
    TwoOrMoreGoals,
    PlayerAssist,
    ScoreOrAssist,
    PlayerShotsOnTarget,
    PlayerCarded,
    GoalkeeperSaves,
}

/// Statistics suggested as model inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticKey {
    Xg,
    Xga,
    Xa,
    Elo,
    GoalsForAvg,
    GoalsAgainstAvg,
    ShotsAvg,
    ShotsOnTargetAvg,
    CornersForAvg,
    CornersAgainstAvg,
    CardsAvg,
    RefereeCardsAvg,
    FoulsAvg,
    Possession,
    MinutesPlayed,
    HomeAdvantage,
    GoalkeeperSavesAvg,
}

/// External data providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Understat,
    Fbref,
    ApiFootball,
    Sofascore,
    WhoScored,
    Transfermarkt,
    ClubElo,
    FootballDataCoUk,
    Kambi,
}

impl DataSource {
    pub fn name(&self) -> &'static str {
        match self {
            DataSource::Understat => "Understat",
            DataSource::Fbref => "FBref",
            DataSource::ApiFootball => "API-Football",
            DataSource::Sofascore => "Sofascore",
            DataSource::WhoScored => "WhoScored",
            DataSource::Transfermarkt => "Transfermarkt",
            DataSource::ClubElo => "ClubElo",
            DataSource::FootballDataCoUk => "Football-Data.co.uk",
            DataSource::Kambi => "Kambi (Rushbet)",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            DataSource::Understat => "https://understat.com",
            DataSource::Fbref => "https://fbref.com",
            DataSource::ApiFootball => "https://www.api-football.com",
            DataSource::Sofascore => "https://www.sofascore.com",
            DataSource::WhoScored => "https://www.whoscored.com",
            DataSource::Transfermarkt => "https://www.transfermarkt.com",
            DataSource::ClubElo => "http://clubelo.com",
            DataSource::FootballDataCoUk => "https://www.football-data.co.uk",
            DataSource::Kambi => "https://www.rushbet.co",
        }
    }
}

/// Modelling technique recommended for a market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestedModel {
    Poisson,
    DixonColes,
    Elo,
    MultinomialLogistic,
    NormalApproximation,
    ShareOfTeamXg,
    Empirical,
}

impl SuggestedModel {
    pub fn name(&self) -> &'static str {
        match self {
            SuggestedModel::Poisson => "Poisson",
            SuggestedModel::DixonColes => "Poisson + Dixon-Coles",
            SuggestedModel::Elo => "ELO",
            SuggestedModel::MultinomialLogistic => "Regresión logística multinomial",
            SuggestedModel::NormalApproximation => "Aproximación normal",
            SuggestedModel::ShareOfTeamXg => "Cuota de xG del equipo",
            SuggestedModel::Empirical => "Promedios históricos",
        }
    }
}

/// Static definition of one market
#[derive(Debug, Clone, Copy)]
pub struct MarketDef {
    pub kind: MarketKind,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub category: MarketCategory,
    pub outcomes: &'static [&'static str],
    pub statistics: &'static [StatisticKey],
    pub model: SuggestedModel,
    /// Offered at several lines (2.5, 9.5, -1 ...) rather than fixed outcomes
    pub line_based: bool,
}

/// Static definition of one statistic
#[derive(Debug, Clone, Copy)]
pub struct Statistic {
    pub key: StatisticKey,
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub sources: &'static [DataSource],
}

/// Read-only view over the authored taxonomy
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    markets: &'static [MarketDef],
    statistics: &'static [Statistic],
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            markets: builtin::MARKETS,
            statistics: builtin::STATISTICS,
        }
    }

    pub fn markets(&self) -> &'static [MarketDef] {
        self.markets
    }

    pub fn statistics(&self) -> &'static [Statistic] {
        self.statistics
    }

    pub fn market(&self, kind: MarketKind) -> Option<&'static MarketDef> {
        self.markets.iter().find(|m| m.kind == kind)
    }

    pub fn by_category(&self, category: MarketCategory) -> Vec<&'static MarketDef> {
        self.markets.iter().filter(|m| m.category == category).collect()
    }

    pub fn by_tab(&self, tab: MarketTab) -> Vec<&'static MarketDef> {
        self.markets.iter().filter(|m| m.category.tab() == tab).collect()
    }

    pub fn statistic(&self, key: StatisticKey) -> Option<&'static Statistic> {
        self.statistics.iter().find(|s| s.key == key)
    }

    /// Find a market by a free-text label ("Ambos equipos marcarán", "BTTS").
    ///
    /// Exact folded matches on name or alias win over substring matches; among
    /// substring matches the longest matching alias wins.
    pub fn find_by_label(&self, label: &str) -> Option<&'static MarketDef> {
        let needle = fold_label(label);
        if needle.is_empty() {
            return None;
        }

        let names = |m: &'static MarketDef| {
            std::iter::once(m.name).chain(m.aliases.iter().copied()).map(fold_label)
        };

        if let Some(m) = self.markets.iter().find(|m| names(*m).any(|n| n == needle)) {
            return Some(m);
        }

        self.markets
            .iter()
            .filter_map(|m| {
                names(m)
                    .filter(|n| !n.is_empty() && needle.contains(n.as_str()))
                    .map(|n| n.len())
                    .max()
                    .map(|len| (len, m))
            })
            .max_by_key(|(len, _)| *len)
            .map(|(_, m)| m)
    }

    /// Find a statistic by name or alias ("xG", "Goles esperados")
    pub fn find_statistic(&self, label: &str) -> Option<&'static Statistic> {
        let needle = fold_label(label);
        self.statistics.iter().find(|s| {
            std::iter::once(s.name)
                .chain(s.aliases.iter().copied())
                .any(|n| fold_label(n) == needle)
        })
    }

    pub fn markets_for_statistic(&self, key: StatisticKey) -> Vec<&'static MarketDef> {
        self.markets
            .iter()
            .filter(|m| m.statistics.contains(&key))
            .collect()
    }

    /// All data sources feeding any statistic of a market, deduplicated in
    /// first-seen order
    pub fn sources_for_market(&self, kind: MarketKind) -> Vec<DataSource> {
        let mut sources = Vec::new();
        if let Some(market) = self.market(kind) {
            for key in market.statistics {
                if let Some(stat) = self.statistic(*key) {
                    for source in stat.sources {
                        if !sources.contains(source) {
                            sources.push(*source);
                        }
                    }
                }
            }
        }
        sources
    }
}

/// Lowercase, strip Spanish accents and collapse whitespace so bookmaker and
/// document labels compare equal regardless of typography.
pub fn fold_label(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_space = true;
    for ch in s.chars().flat_map(char::to_lowercase) {
        let ch = match ch {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            c => c,
        };
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_markets_have_outcomes_and_statistics() {
        let catalog = Catalog::builtin();
        for market in catalog.markets() {
            assert!(
                market.line_based || market.outcomes.len() >= 2,
                "{} has no outcomes",
                market.name
            );
            assert!(!market.statistics.is_empty(), "{} has no statistics", market.name);
        }
    }

    #[test]
    fn test_builtin_statistics_are_all_defined() {
        let catalog = Catalog::builtin();
        for market in catalog.markets() {
            for key in market.statistics {
                assert!(catalog.statistic(*key).is_some(), "{:?} missing", key);
            }
        }
    }

    #[test]
    fn test_market_names_unique() {
        let catalog = Catalog::builtin();
        let mut seen = HashSet::new();
        for market in catalog.markets() {
            assert!(seen.insert(fold_label(market.name)), "duplicate {}", market.name);
        }
    }

    #[test]
    fn test_category_keys_round_trip() {
        for category in MarketCategory::ALL {
            assert_eq!(MarketCategory::from_key(category.key()), Some(category));
        }
        assert_eq!(MarketCategory::from_key("nope"), None);
    }

    #[test]
    fn test_category_serde_uses_keys() {
        let json = serde_json::to_string(&MarketCategory::Handicap3Way).unwrap();
        assert_eq!(json, "\"handicap_3way\"");
    }

    #[test]
    fn test_find_by_label_is_accent_insensitive() {
        let catalog = Catalog::builtin();
        let btts = catalog.find_by_label("AMBOS EQUIPOS MARCARAN").unwrap();
        assert_eq!(btts.kind, MarketKind::BothTeamsToScore);

        let one_x_two = catalog.find_by_label("Resultado Final (1X2)").unwrap();
        assert_eq!(one_x_two.kind, MarketKind::MatchResult);
    }

    #[test]
    fn test_find_by_label_prefers_longest_alias() {
        let catalog = Catalog::builtin();
        let market = catalog.find_by_label("Total de tiros de esquina").unwrap();
        assert_eq!(market.kind, MarketKind::TotalCorners);
    }

    #[test]
    fn test_sources_for_market_deduplicates() {
        let catalog = Catalog::builtin();
        let sources = catalog.sources_for_market(MarketKind::MatchResult);
        let unique: HashSet<_> = sources.iter().collect();
        assert_eq!(unique.len(), sources.len());
        assert!(sources.contains(&DataSource::ClubElo));
    }

    #[test]
    fn test_markets_for_statistic() {
        let catalog = Catalog::builtin();
        let corner_markets = catalog.markets_for_statistic(StatisticKey::CornersForAvg);
        assert!(corner_markets.iter().all(|m| m.category == MarketCategory::Corners));
        assert!(!corner_markets.is_empty());
    }

    #[test]
    fn test_fold_label() {
        assert_eq!(fold_label("  Hándicap   Asiático "), "handicap asiatico");
        assert_eq!(fold_label("Córners"), "corners");
    }
}

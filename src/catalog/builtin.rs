use super::DataSource::*;
use super::MarketCategory::*;
use super::StatisticKey::*;
use super::SuggestedModel;
use super::{MarketDef, MarketKind, Statistic};

pub(super) const STATISTICS: &[Statistic] = &[
    Statistic {
        key: Xg,
        name: "xG",
        aliases: &["Expected Goals", "Goles esperados"],
        sources: &[Understat, Fbref, Sofascore],
    },
    Statistic {
        key: Xga,
        name: "xGA",
        aliases: &["Expected Goals Against", "Goles esperados en contra"],
        sources: &[Understat, Fbref],
    },
    Statistic {
        key: Xa,
        name: "xA",
        aliases: &["Expected Assists", "Asistencias esperadas"],
        sources: &[Understat, Fbref],
    },
    Statistic {
        key: Elo,
        name: "ELO",
        aliases: &["ELO Rating", "Rating ELO"],
        sources: &[ClubElo, FootballDataCoUk],
    },
    Statistic {
        key: GoalsForAvg,
        name: "Goles a favor (promedio)",
        aliases: &["Goles promedio", "Goals scored average", "Promedio de goles"],
        sources: &[ApiFootball, FootballDataCoUk, Fbref],
    },
    Statistic {
        key: GoalsAgainstAvg,
        name: "Goles en contra (promedio)",
        aliases: &["Goles recibidos", "Goals conceded average"],
        sources: &[ApiFootball, FootballDataCoUk, Fbref],
    },
    Statistic {
        key: ShotsAvg,
        name: "Tiros (promedio)",
        aliases: &["Disparos", "Shots"],
        sources: &[ApiFootball, Fbref, WhoScored],
    },
    Statistic {
        key: ShotsOnTargetAvg,
        name: "Tiros a puerta (promedio)",
        aliases: &["Disparos a puerta", "Shots on target"],
        sources: &[ApiFootball, Fbref, WhoScored],
    },
    Statistic {
        key: CornersForAvg,
        name: "Córners a favor (promedio)",
        aliases: &["Córners promedio", "Corners"],
        sources: &[ApiFootball, FootballDataCoUk, Sofascore],
    },
    Statistic {
        key: CornersAgainstAvg,
        name: "Córners en contra (promedio)",
        aliases: &["Córners concedidos", "Corners against"],
        sources: &[ApiFootball, FootballDataCoUk],
    },
    Statistic {
        key: CardsAvg,
        name: "Tarjetas (promedio)",
        aliases: &["Tarjetas", "Cards"],
        sources: &[ApiFootball, FootballDataCoUk, WhoScored],
    },
    Statistic {
        key: RefereeCardsAvg,
        name: "Tarjetas del árbitro (promedio)",
        aliases: &["Árbitro", "Referee cards"],
        sources: &[ApiFootball, WhoScored],
    },
    Statistic {
        key: FoulsAvg,
        name: "Faltas (promedio)",
        aliases: &["Faltas", "Fouls"],
        sources: &[ApiFootball, WhoScored],
    },
    Statistic {
        key: Possession,
        name: "Posesión",
        aliases: &["Possession", "Posesión (%)"],
        sources: &[ApiFootball, Sofascore, WhoScored],
    },
    Statistic {
        key: MinutesPlayed,
        name: "Minutos jugados",
        aliases: &["Minutes played", "Minutos"],
        sources: &[ApiFootball, Fbref, Transfermarkt],
    },
    Statistic {
        key: HomeAdvantage,
        name: "Ventaja de local",
        aliases: &["Home advantage", "Localía"],
        sources: &[FootballDataCoUk, ClubElo],
    },
    Statistic {
        key: GoalkeeperSavesAvg,
        name: "Paradas del portero (promedio)",
        aliases: &["Paradas", "Saves"],
        sources: &[ApiFootball, Fbref, Sofascore],
    },
];

pub(super) const MARKETS: &[MarketDef] = &[
    // Tiempo reglamentario
    MarketDef {
        kind: MarketKind::MatchResult,
        name: "Resultado Final (1X2)",
        aliases: &["1x2", "resultado final", "ganador del partido", "tiempo reglamentario"],
        category: TiempoReglamentario,
        outcomes: &["Equipo 1", "Empate", "Equipo 2"],
        statistics: &[Xg, Xga, Elo, GoalsForAvg, GoalsAgainstAvg, HomeAdvantage],
        model: SuggestedModel::DixonColes,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::DoubleChance,
        name: "Doble Oportunidad",
        aliases: &["doble oportunidad", "double chance"],
        category: TiempoReglamentario,
        outcomes: &["1X", "12", "X2"],
        statistics: &[Xg, Elo, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::DrawNoBet,
        name: "Apuesta sin Empate",
        aliases: &["apuesta sin empate", "draw no bet", "dnb"],
        category: TiempoReglamentario,
        outcomes: &["Equipo 1", "Equipo 2"],
        statistics: &[Xg, Elo, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::BothTeamsToScore,
        name: "Ambos Equipos Marcan (BTTS)",
        aliases: &["ambos equipos marcarán", "ambos equipos", "btts", "both teams to score"],
        category: TiempoReglamentario,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, Xga, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::TotalGoals,
        name: "Más/Menos Goles (Over/Under)",
        aliases: &["total de goles", "over/under", "más/menos"],
        category: TiempoReglamentario,
        outcomes: &["Más de", "Menos de"],
        statistics: &[Xg, Xga, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::DixonColes,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::TeamTotalGoals,
        name: "Goles del Equipo",
        aliases: &["total de goles de", "team total goals"],
        category: TiempoReglamentario,
        outcomes: &["Más de", "Menos de"],
        statistics: &[Xg, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::OddEvenGoals,
        name: "Goles Par/Impar",
        aliases: &["par/impar", "odd/even"],
        category: TiempoReglamentario,
        outcomes: &["Par", "Impar"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::ExactTotalGoals,
        name: "Número Exacto de Goles",
        aliases: &["goles exactos", "exact goals"],
        category: TiempoReglamentario,
        outcomes: &["0", "1", "2", "3", "4", "5", "6", "7", "8+"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::CorrectScore,
        name: "Resultado Correcto",
        aliases: &["resultado correcto", "marcador correcto", "correct score"],
        category: TiempoReglamentario,
        outcomes: &["1-0", "2-1", "0-0", "1-1", "Otro"],
        statistics: &[Xg, Xga, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::DixonColes,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::HalfTimeFullTime,
        name: "Descanso/Tiempo Completo",
        aliases: &["descanso/tiempo", "medio tiempo/final", "ht/ft"],
        category: TiempoReglamentario,
        outcomes: &["1/1", "1/X", "1/2", "X/1", "X/X", "X/2", "2/1", "2/X", "2/2"],
        statistics: &[Xg, GoalsForAvg, Elo],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::GoalInBothHalves,
        name: "Gol en Ambas Mitades",
        aliases: &["gol en ambas mitades"],
        category: TiempoReglamentario,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    // Medio tiempo
    MarketDef {
        kind: MarketKind::FirstHalfResult,
        name: "Resultado al Descanso",
        aliases: &["descanso", "1ª parte", "resultado 1.ª parte", "first half result"],
        category: MedioTiempo,
        outcomes: &["Equipo 1", "Empate", "Equipo 2"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::FirstHalfGoals,
        name: "Total de Goles - 1ª Parte",
        aliases: &["total de goles - 1", "first half goals"],
        category: MedioTiempo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::SecondHalfGoals,
        name: "Total de Goles - 2ª Parte",
        aliases: &["total de goles - 2", "second half goals"],
        category: MedioTiempo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    // Eventos
    MarketDef {
        kind: MarketKind::WinToNil,
        name: "Victoria sin Recibir Gol",
        aliases: &["sin recibir", "win to nil"],
        category: EventosPartido,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, Xga, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    // Hándicaps
    MarketDef {
        kind: MarketKind::EuropeanHandicap,
        name: "Hándicap Europeo (3-Way)",
        aliases: &["hándicap 3-way", "handicap 3-way", "european handicap"],
        category: Handicap3Way,
        outcomes: &["Equipo 1", "Empate", "Equipo 2"],
        statistics: &[Xg, Elo, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::AsianHandicap,
        name: "Hándicap Asiático",
        aliases: &["hándicap asiático", "asian handicap"],
        category: LineasAsiaticas,
        outcomes: &["Equipo 1", "Equipo 2"],
        statistics: &[Xg, Elo, GoalsForAvg, GoalsAgainstAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::AsianTotal,
        name: "Total Asiático",
        aliases: &["total asiático", "asian total"],
        category: LineasAsiaticas,
        outcomes: &["Más de", "Menos de"],
        statistics: &[Xg, GoalsForAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    // Córners
    MarketDef {
        kind: MarketKind::TotalCorners,
        name: "Total de Córners",
        aliases: &["total de tiros de esquina", "total de esquina", "total corners"],
        category: Corners,
        outcomes: &["Más de", "Menos de"],
        statistics: &[CornersForAvg, CornersAgainstAvg],
        model: SuggestedModel::NormalApproximation,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::MostCorners,
        name: "Más Córners",
        aliases: &["más tiros de esquina", "más córners", "most corners"],
        category: Corners,
        outcomes: &["Equipo 1", "Empate", "Equipo 2"],
        statistics: &[CornersForAvg, CornersAgainstAvg, Possession],
        model: SuggestedModel::NormalApproximation,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::TeamCorners,
        name: "Córners del Equipo",
        aliases: &["esquina a favor de", "team corners"],
        category: Corners,
        outcomes: &["Más de", "Menos de"],
        statistics: &[CornersForAvg],
        model: SuggestedModel::NormalApproximation,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::RaceToCorners,
        name: "Carrera a Córners",
        aliases: &["carrera a", "race to"],
        category: Corners,
        outcomes: &["Equipo 1", "Ninguno", "Equipo 2"],
        statistics: &[CornersForAvg],
        model: SuggestedModel::NormalApproximation,
        line_based: true,
    },
    // Tarjetas
    MarketDef {
        kind: MarketKind::TotalCards,
        name: "Total de Tarjetas",
        aliases: &["total de tarjetas", "total cards"],
        category: TarjetasEquipo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[CardsAvg, RefereeCardsAvg, FoulsAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::TeamCards,
        name: "Tarjetas del Equipo",
        aliases: &["total de tarjeta", "team cards"],
        category: TarjetasEquipo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[CardsAvg, FoulsAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::RedCardShown,
        name: "Tarjeta Roja Mostrada",
        aliases: &["tarjeta roja mostrada", "tarjeta roja"],
        category: TarjetasEquipo,
        outcomes: &["Sí", "No"],
        statistics: &[CardsAvg, RefereeCardsAvg],
        model: SuggestedModel::Empirical,
        line_based: false,
    },
    // Disparos / faltas
    MarketDef {
        kind: MarketKind::TeamShotsOnTarget,
        name: "Tiros a Puerta del Equipo",
        aliases: &["tiros a puerta", "número total de tiros", "shots on target"],
        category: DisparosEquipo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[ShotsAvg, ShotsOnTargetAvg, Possession],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::TeamFouls,
        name: "Faltas del Equipo",
        aliases: &["faltas", "fouls"],
        category: FaltasEquipo,
        outcomes: &["Más de", "Menos de"],
        statistics: &[FoulsAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    // Jugadores
    MarketDef {
        kind: MarketKind::AnytimeScorer,
        name: "Goleador en Cualquier Momento",
        aliases: &["goleador", "marcará en cualquier momento", "anytime scorer"],
        category: Goleador,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, ShotsAvg, MinutesPlayed],
        model: SuggestedModel::ShareOfTeamXg,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::FirstScorer,
        name: "Primer Goleador",
        aliases: &["primer goleador", "primer gol", "first scorer"],
        category: Goleador,
        outcomes: &["Jugador", "Sin goleador"],
        statistics: &[Xg, ShotsAvg, MinutesPlayed],
        model: SuggestedModel::ShareOfTeamXg,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::TwoOrMoreGoals,
        name: "Marcará 2 o Más Goles",
        aliases: &["2 o más goles", "doblete", "two or more goals"],
        category: GolesJugador,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, ShotsAvg, MinutesPlayed],
        model: SuggestedModel::ShareOfTeamXg,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::PlayerAssist,
        name: "Asistencia del Jugador",
        aliases: &["dará asistencia", "asistencias", "player assist"],
        category: AsistenciasJugador,
        outcomes: &["Sí", "No"],
        statistics: &[Xa, MinutesPlayed],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::ScoreOrAssist,
        name: "Marcará o Dará Asistencia",
        aliases: &["marcará o dará asistencia", "score or assist"],
        category: ApuestasEspecialesJugador,
        outcomes: &["Sí", "No"],
        statistics: &[Xg, Xa, MinutesPlayed],
        model: SuggestedModel::Poisson,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::PlayerShotsOnTarget,
        name: "Disparos a Puerta del Jugador",
        aliases: &["disparos a puerta del jugador", "player shots on target"],
        category: DisparosJugador,
        outcomes: &["Más de", "Menos de"],
        statistics: &[ShotsOnTargetAvg, MinutesPlayed],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
    MarketDef {
        kind: MarketKind::PlayerCarded,
        name: "Jugador Amonestado",
        aliases: &["tarjeta al jugador", "player carded"],
        category: TarjetasJugador,
        outcomes: &["Sí", "No"],
        statistics: &[CardsAvg, FoulsAvg, MinutesPlayed],
        model: SuggestedModel::Empirical,
        line_based: false,
    },
    MarketDef {
        kind: MarketKind::GoalkeeperSaves,
        name: "Paradas del Portero",
        aliases: &["paradas del portero", "goalkeeper saves"],
        category: ParadasPortero,
        outcomes: &["Más de", "Menos de"],
        statistics: &[GoalkeeperSavesAvg, ShotsOnTargetAvg],
        model: SuggestedModel::Poisson,
        line_based: true,
    },
];

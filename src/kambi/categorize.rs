//! Sorting bookmaker offers into market categories
//!
//! Kambi labels are free Spanish text ("Total de goles - 1.ª parte",
//! "Tarjeta roja a Getafe"). Rules run in priority order and the first hit
//! wins, so half-time patterns must be checked before anything else.

use crate::catalog::MarketCategory;

use super::types::{CategoryMarkets, DisplayFormat, Market, Outcome};

const HALF_PATTERNS: &[&str] = &[
    "1ª parte", "2ª parte", "1.ª parte", "2.ª parte",
    "1ª mitad", "2ª mitad", "1.ª mitad", "2.ª mitad",
    "1° parte", "2° parte", "1° mitad", "2° mitad",
    "1st half", "2nd half", "- 1ª", "- 2ª",
];

/// Full-time markets that carry team participants but are not player props
const SAFE_FULL_TIME: &[&str] = &[
    "resultado final", "1x2", "doble oportunidad", "apuesta sin empate",
    "ambos equipos", "btts", "resultado correcto", "marcador correcto",
    "total de goles", "descanso/tiempo", "medio tiempo/final",
    "victoria de", "gol en ambas mitades", "ganador del partido",
];

const PLAYER_KEYWORDS: &[&str] = &[
    "goleador", "primer gol", "marcará", "anytime scorer", "hat-trick", "asistenc",
    "disparo", "tiro", "pases", "faltas cometidas por", "fueras de juego por",
];

const EVENT_KEYWORDS: &[&str] = &["propia meta", "sin recibir gol", "gana al menos", "al palo"];

fn has_any(label: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| label.contains(p))
}

pub fn categorize(label: &str, outcomes: &[Outcome]) -> MarketCategory {
    use MarketCategory::*;
    let l = label.to_lowercase();

    // "Gol en ambas mitades" is a full-time market despite the half wording
    if has_any(&l, HALF_PATTERNS) && !l.contains("ambas mitades") {
        return MedioTiempo;
    }

    if l.contains("esquina") || l.contains("corner") || l.contains("córner") {
        return Corners;
    }

    if has_any(&l, SAFE_FULL_TIME) {
        return TiempoReglamentario;
    }

    if l.contains("asiático") || l.contains("asian") {
        return LineasAsiaticas;
    }
    if l.contains("hándicap") || l.contains("handicap") {
        if l.contains("3-way") || l.contains("3 way") || l.contains("3 opciones") {
            return Handicap3Way;
        }
        return TiempoReglamentario;
    }

    if has_any(&l, PLAYER_KEYWORDS) {
        if l.contains("asistencia") {
            return AsistenciasJugador;
        }
        if l.contains("tarjeta") {
            return TarjetasJugador;
        }
        if l.contains("disparo") || l.contains("tiro") {
            // "tiros por parte de Getafe" is a team market
            if l.contains("parte de") && !l.contains("jugador") {
                return DisparosEquipo;
            }
            return DisparosJugador;
        }
        if l.contains("parada") || l.contains("portero") {
            return ParadasPortero;
        }
        if l.contains("falta") {
            return ApuestasEspecialesJugador;
        }
        if l.contains("goles") || l.contains('2') || l.contains("dos") {
            return GolesJugador;
        }
        return Goleador;
    }

    if outcomes.iter().any(|o| o.participant.is_some()) {
        if l.contains("tarjeta") {
            if l.contains("roja a") || l.contains("total de tarjetas") {
                return TarjetasEquipo;
            }
            return TarjetasJugador;
        }
        return ApuestasEspecialesJugador;
    }

    if l.contains("tarjeta") {
        return TarjetasEquipo;
    }
    if l.contains("disparo") || l.contains("tiro") {
        return DisparosEquipo;
    }
    if has_any(&l, EVENT_KEYWORDS) {
        return EventosPartido;
    }

    TiempoReglamentario
}

fn take_category(categories: &mut [CategoryMarkets], category: MarketCategory) -> Vec<Market> {
    categories
        .iter_mut()
        .find(|c| c.category == category)
        .map(|c| std::mem::take(&mut c.markets))
        .unwrap_or_default()
}

fn push_markets(categories: &mut Vec<CategoryMarkets>, category: MarketCategory, markets: Vec<Market>) {
    if markets.is_empty() {
        return;
    }
    match categories.iter_mut().find(|c| c.category == category) {
        Some(c) => c.markets.extend(markets),
        None => categories.push(CategoryMarkets { category, markets }),
    }
}

/// Move markets that label-based categorisation tends to misplace
pub fn redistribute(categories: &mut Vec<CategoryMarkets>) {
    use MarketCategory::*;

    for source in [TiempoReglamentario, EventosPartido] {
        let mut kept = Vec::new();
        let mut moved: Vec<(MarketCategory, Market)> = Vec::new();

        for market in take_category(categories, source) {
            let l = market.label.to_lowercase();
            let target = if l.contains("parada") && l.contains("portero") {
                Some(ParadasPortero)
            } else if l.contains("disparo") && l.contains("jugador") {
                Some(DisparosJugador)
            } else if source == EventosPartido
                && (l.contains("gol en ambas mitades") || (l.contains("victoria") && l.contains("ambos")))
            {
                Some(TiempoReglamentario)
            } else {
                None
            };

            match target {
                Some(t) => moved.push((t, market)),
                None => kept.push(market),
            }
        }

        push_markets(categories, source, kept);
        for (target, market) in moved {
            push_markets(categories, target, vec![market]);
        }
    }

    // "Marcará o dará asistencia" is a combined prop, not an assist market
    let (specials, assists): (Vec<Market>, Vec<Market>) = take_category(categories, AsistenciasJugador)
        .into_iter()
        .partition(|m| m.label.to_lowercase().contains("marcará o dará"));
    push_markets(categories, AsistenciasJugador, assists);
    push_markets(categories, ApuestasEspecialesJugador, specials);
}

/// Display order for one category: label patterns, first match wins
pub fn market_order(category: MarketCategory, home: &str, away: &str) -> Vec<(String, DisplayFormat)> {
    use DisplayFormat::{Card, List};
    use MarketCategory::*;

    let h = home.to_lowercase();
    let a = away.to_lowercase();
    let fixed = |items: &[(&str, DisplayFormat)]| -> Vec<(String, DisplayFormat)> {
        items.iter().map(|(p, f)| (p.to_string(), *f)).collect()
    };

    match category {
        TiempoReglamentario => vec![
            ("resultado final".into(), Card),
            ("1x2".into(), Card),
            ("total de goles".into(), List),
            ("doble oportunidad".into(), Card),
            ("ambos equipos marcarán".into(), Card),
            ("ambos equipos".into(), Card),
            ("resultado correcto".into(), List),
            ("marcador correcto".into(), List),
            ("apuesta sin empate".into(), Card),
            (format!("total de goles de {h}"), List),
            (format!("total de goles de {a}"), List),
            ("descanso/tiempo".into(), List),
            ("medio tiempo/final".into(), List),
            ("hándicap".into(), List),
            ("handicap".into(), List),
            (format!("victoria de {h} y ambos"), Card),
            (format!("victoria de {a} y ambos"), Card),
            ("gol en ambas mitades".into(), Card),
        ],
        MedioTiempo => vec![
            ("descanso".into(), Card),
            ("apuesta sin empate - 1".into(), Card),
            ("apuesta sin empate -1".into(), Card),
            ("doble oportunidad - 1".into(), Card),
            ("doble oportunidad -1".into(), Card),
            ("ambos equipos marcarán - 1".into(), Card),
            ("total de goles - 1".into(), List),
            (format!("total de goles de {h} - 1"), List),
            (format!("total de goles de {a} - 1"), List),
            ("resultado correcto - 1".into(), List),
            ("2° parte".into(), Card),
            ("2ª parte".into(), Card),
            ("2.ª parte".into(), Card),
            ("apuesta sin empate - 2".into(), Card),
            ("doble oportunidad - 2".into(), Card),
            ("ambos equipos marcarán - 2".into(), Card),
            ("total de goles - 2".into(), List),
            (format!("total de goles de {h} - 2"), List),
            (format!("total de goles de {a} - 2"), List),
        ],
        Corners => vec![
            ("total de tiros de esquina".into(), List),
            ("total de esquina".into(), List),
            (format!("esquina a favor de {h}"), List),
            (format!("esquina a favor de {a}"), List),
            ("más tiros de esquina".into(), Card),
            ("mas tiros de esquina".into(), Card),
            ("más córners".into(), Card),
            ("hándicap de tiros de esquina".into(), List),
            ("handicap de esquina".into(), List),
            ("siguiente tiro de esquina".into(), Card),
            ("total de tiros de esquina - 1".into(), List),
            (format!("esquina por parte de {h} - 1"), List),
            (format!("esquina por parte de {a} - 1"), List),
            ("total de tiros de esquina - 2".into(), List),
            (format!("esquina a favor de {h} - 2"), List),
            (format!("esquina a favor de {a} - 2"), List),
            ("más córners - 1".into(), Card),
            ("más córners - 2".into(), Card),
        ],
        TarjetasEquipo => vec![
            ("total de tarjetas".into(), List),
            (format!("total de tarjeta {h}"), List),
            (format!(" - {h}"), List),
            (format!("total de tarjeta {a}"), List),
            (format!(" - {a}"), List),
            ("tarjeta roja mostrada".into(), Card),
            (format!("tarjeta roja a {h}"), Card),
            (format!("tarjeta roja a {a}"), Card),
            ("más tarjetas".into(), Card),
            ("tarjetas hándicap".into(), List),
        ],
        DisparosEquipo => vec![
            ("número total de disparos".into(), List),
            ("número total de tiros".into(), List),
            ("tiros a puerta".into(), List),
            (format!("tiros a puerta por parte de {h}"), List),
            (format!("por parte de {h}"), List),
            (format!("tiros a puerta por parte de {a}"), List),
            (format!("por parte de {a}"), List),
            ("más tiros a puerta".into(), Card),
        ],
        EventosPartido => vec![
            ("primer gol".into(), Card),
            ("propia meta".into(), Card),
            (format!("victoria de {h} sin recibir"), Card),
            (format!("victoria de {a} sin recibir"), Card),
            (format!("{h} gana al menos"), Card),
            (format!("{a} gana al menos"), Card),
            ("al palo".into(), Card),
        ],
        Handicap3Way => fixed(&[("hándicap 3-way", List), ("handicap 3-way", List)]),
        LineasAsiaticas => fixed(&[
            ("hándicap asiático", List),
            ("handicap asiático", List),
            ("total asiático", List),
        ]),
        _ => Vec::new(),
    }
}

fn priority(label: &str, order: &[(String, DisplayFormat)]) -> (usize, DisplayFormat) {
    let l = label.to_lowercase();
    order
        .iter()
        .enumerate()
        .find(|(_, (pattern, _))| l.contains(pattern.as_str()))
        .map(|(i, (_, format))| (i, *format))
        .unwrap_or((usize::MAX, DisplayFormat::Card))
}

/// Sort every category by its display order and set each market's format.
/// Markets matching no pattern keep their relative order at the end.
pub fn apply_order(categories: &mut [CategoryMarkets], home: &str, away: &str) {
    for group in categories.iter_mut() {
        let order = market_order(group.category, home, away);
        for market in group.markets.iter_mut() {
            market.format = priority(&market.label, &order).1;
        }
        group.markets.sort_by_key(|m| priority(&m.label, &order).0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn outcome(participant: Option<&str>) -> Outcome {
        Outcome {
            label: "x".to_string(),
            odds: Decimal::new(2000, 3),
            line: None,
            outcome_type: None,
            participant: participant.map(str::to_string),
        }
    }

    fn market(label: &str) -> Market {
        Market {
            label: label.to_string(),
            criterion_id: None,
            outcomes: Vec::new(),
            format: DisplayFormat::Card,
        }
    }

    #[test]
    fn test_half_markets_take_priority() {
        assert_eq!(categorize("Total de goles - 1.ª parte", &[]), MarketCategory::MedioTiempo);
        assert_eq!(categorize("Total de tiros de esquina - 1ª parte", &[]), MarketCategory::MedioTiempo);
        assert_eq!(categorize("Gol en ambas mitades", &[]), MarketCategory::TiempoReglamentario);
    }

    #[test]
    fn test_corners_and_safe_list() {
        assert_eq!(categorize("Total de tiros de esquina", &[]), MarketCategory::Corners);
        let team = [outcome(Some("Getafe"))];
        assert_eq!(categorize("Total de goles de Getafe", &team), MarketCategory::TiempoReglamentario);
        assert_eq!(categorize("Resultado Final", &[]), MarketCategory::TiempoReglamentario);
    }

    #[test]
    fn test_handicaps() {
        assert_eq!(categorize("Hándicap asiático", &[]), MarketCategory::LineasAsiaticas);
        assert_eq!(categorize("Hándicap 3-way", &[]), MarketCategory::Handicap3Way);
        assert_eq!(categorize("Hándicap", &[]), MarketCategory::TiempoReglamentario);
    }

    #[test]
    fn test_player_props() {
        assert_eq!(categorize("Goleador en cualquier momento", &[]), MarketCategory::Goleador);
        assert_eq!(categorize("Marcará 2 o más goles", &[]), MarketCategory::GolesJugador);
        assert_eq!(categorize("Asistencia del jugador", &[]), MarketCategory::AsistenciasJugador);
        assert_eq!(categorize("Disparos a puerta del jugador", &[]), MarketCategory::DisparosJugador);
        assert_eq!(categorize("Tiros a puerta por parte de Getafe", &[]), MarketCategory::DisparosEquipo);
        assert_eq!(categorize("Faltas cometidas por el jugador", &[]), MarketCategory::ApuestasEspecialesJugador);
    }

    #[test]
    fn test_participant_fallbacks() {
        let team = [outcome(Some("Getafe"))];
        assert_eq!(categorize("Tarjeta roja a Getafe", &team), MarketCategory::TarjetasEquipo);
        assert_eq!(categorize("Recibirá tarjeta", &team), MarketCategory::TarjetasJugador);
        assert_eq!(categorize("Será titular", &team), MarketCategory::ApuestasEspecialesJugador);
        assert_eq!(categorize("Total de tarjetas", &[]), MarketCategory::TarjetasEquipo);
        assert_eq!(categorize("Victoria sin recibir gol", &[]), MarketCategory::EventosPartido);
        assert_eq!(categorize("Victoria de Getafe", &team), MarketCategory::TiempoReglamentario);
        assert_eq!(categorize("Gol en propia meta", &[]), MarketCategory::EventosPartido);
        assert_eq!(categorize("Algo raro", &[]), MarketCategory::TiempoReglamentario);
    }

    #[test]
    fn test_redistribute() {
        let mut categories = vec![
            CategoryMarkets {
                category: MarketCategory::TiempoReglamentario,
                markets: vec![market("Resultado Final"), market("Paradas del portero")],
            },
            CategoryMarkets {
                category: MarketCategory::EventosPartido,
                markets: vec![market("Victoria de Getafe y ambos equipos marcan")],
            },
            CategoryMarkets {
                category: MarketCategory::AsistenciasJugador,
                markets: vec![market("Marcará o dará asistencia"), market("Dará una asistencia")],
            },
        ];
        redistribute(&mut categories);

        let get = |cat: MarketCategory| -> Vec<String> {
            categories
                .iter()
                .find(|c| c.category == cat)
                .map(|c| c.markets.iter().map(|m| m.label.clone()).collect())
                .unwrap_or_default()
        };
        assert_eq!(get(MarketCategory::ParadasPortero), vec!["Paradas del portero"]);
        assert_eq!(get(MarketCategory::TiempoReglamentario).len(), 2);
        assert!(get(MarketCategory::EventosPartido).is_empty());
        assert_eq!(get(MarketCategory::AsistenciasJugador), vec!["Dará una asistencia"]);
        assert_eq!(get(MarketCategory::ApuestasEspecialesJugador), vec!["Marcará o dará asistencia"]);
    }

    #[test]
    fn test_apply_order_sorts_and_sets_format() {
        let mut categories = vec![CategoryMarkets {
            category: MarketCategory::TiempoReglamentario,
            markets: vec![
                market("Algo raro"),
                market("Doble oportunidad"),
                market("Total de goles"),
                market("Resultado Final"),
            ],
        }];
        apply_order(&mut categories, "Getafe", "Betis");
        let labels: Vec<_> = categories[0].markets.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["Resultado Final", "Total de goles", "Doble oportunidad", "Algo raro"]);
        assert_eq!(categories[0].markets[1].format, DisplayFormat::List);
        assert_eq!(categories[0].markets[3].format, DisplayFormat::Card);
    }
}

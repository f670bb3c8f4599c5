//! Taxonomy documents - Markdown market tables and their lint checks
//!
//! The market taxonomy is authored as Markdown: headings, pipe tables and
//! `>` notes. This module parses those documents into sections and tables
//! and checks them for authoring mistakes (empty option cells, statistics
//! used by a model section that no market lists, markets defined twice).

use std::fmt;
use std::path::Path;

use crate::catalog::{fold_label, Catalog};
use crate::error::TaxonomyError;

#[derive(Debug, Clone, Default)]
pub struct TaxonomyDocument {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default)]
pub struct Section {
    pub heading: String,
    /// 0 for the preamble before the first heading
    pub level: usize,
    pub line: usize,
    pub tables: Vec<Table>,
    pub notes: Vec<String>,
    /// Pipe lines that never became a table (no separator row)
    pub stray_rows: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct Row {
    pub cells: Vec<String>,
    pub line: usize,
}

/// A table row describing a market
#[derive(Debug, Clone)]
pub struct MarketRow {
    pub name: String,
    /// Value of the Opciones/Estadísticas column, `None` if the table has none
    pub details: Option<String>,
    pub cells: Vec<String>,
    pub section: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintFinding {
    pub severity: Severity,
    pub rule: &'static str,
    pub document: String,
    pub line: usize,
    pub message: String,
}

impl fmt::Display for LintFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}:{}: {}[{}] {}",
            self.document, self.line, level, self.rule, self.message
        )
    }
}

/// Load and parse a taxonomy document from disk
pub fn load<P: AsRef<Path>>(path: P) -> Result<TaxonomyDocument, TaxonomyError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| TaxonomyError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let mut doc = parse(&text);
    if doc.title.is_empty() {
        doc.title = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
    }
    Ok(doc)
}

/// Parse Markdown text into sections, tables and notes
pub fn parse(text: &str) -> TaxonomyDocument {
    let lines: Vec<&str> = text.lines().collect();
    let mut doc = TaxonomyDocument::default();
    let mut current = Section::default();
    let mut i = 0;

    while i < lines.len() {
        let line_no = i + 1;
        let trimmed = lines[i].trim();

        if let Some((level, heading)) = parse_heading(trimmed) {
            if doc.title.is_empty() && level == 1 {
                doc.title = heading.clone();
            }
            push_section(&mut doc, std::mem::take(&mut current));
            current = Section {
                heading,
                level,
                line: line_no,
                ..Section::default()
            };
            i += 1;
            continue;
        }

        if let Some(note) = trimmed.strip_prefix('>') {
            let note = note.trim();
            if !note.is_empty() {
                current.notes.push(note.to_string());
            }
            i += 1;
            continue;
        }

        if trimmed.contains('|') {
            let next_is_separator = lines
                .get(i + 1)
                .map(|l| is_separator(l.trim()))
                .unwrap_or(false);

            if next_is_separator {
                let mut table = Table {
                    headers: split_row(trimmed),
                    rows: Vec::new(),
                    line: line_no,
                };
                i += 2;
                while i < lines.len() {
                    let row = lines[i].trim();
                    if row.is_empty() || !row.contains('|') || parse_heading(row).is_some() {
                        break;
                    }
                    table.rows.push(Row {
                        cells: split_row(row),
                        line: i + 1,
                    });
                    i += 1;
                }
                current.tables.push(table);
                continue;
            }

            if trimmed.starts_with('|') {
                current.stray_rows.push(line_no);
            }
        }

        i += 1;
    }

    push_section(&mut doc, current);
    doc
}

fn push_section(doc: &mut TaxonomyDocument, section: Section) {
    let empty_preamble = section.level == 0
        && section.tables.is_empty()
        && section.notes.is_empty()
        && section.stray_rows.is_empty();
    if !empty_preamble {
        doc.sections.push(section);
    }
}

fn parse_heading(line: &str) -> Option<(usize, String)> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &line[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, clean_cell(rest.trim().trim_end_matches('#'))))
}

fn is_separator(line: &str) -> bool {
    if !line.contains('-') || !line.contains('|') && !line.starts_with('-') {
        return false;
    }
    split_row(line).iter().all(|cell| {
        let c = cell.trim_matches(':');
        !c.is_empty() && c.chars().all(|ch| ch == '-')
    })
}

/// Split a pipe-table row into trimmed cells, honouring `\|` escapes
fn split_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = if line.ends_with('|') && !line.ends_with("\\|") {
        &line[..line.len() - 1]
    } else {
        line
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(clean_cell(&std::mem::take(&mut cell))),
            c => cell.push(c),
        }
    }
    cells.push(clean_cell(&cell));
    cells
}

/// Strip emphasis markers and surrounding whitespace
fn clean_cell(cell: &str) -> String {
    cell.replace("**", "").replace('`', "").trim().to_string()
}

fn header_index(headers: &[String], needles: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = fold_label(h);
        needles.iter().any(|n| h.contains(n))
    })
}

const MARKET_HEADERS: &[&str] = &["mercado", "market", "tipo de apuesta"];
const DETAIL_HEADERS: &[&str] = &["opciones", "options", "resultados posibles", "estadisticas", "statistics"];
const MODEL_SECTION: &[&str] = &["modelos predictivos", "predictive models", "modelos sugeridos"];
const MODEL_STAT_HEADERS: &[&str] = &["estadistica", "statistic", "variables", "inputs", "features"];

impl TaxonomyDocument {
    /// All rows of tables that have a market column
    pub fn markets(&self) -> Vec<MarketRow> {
        let mut out = Vec::new();
        for section in &self.sections {
            if is_model_section(section) {
                continue;
            }
            for table in &section.tables {
                let Some(name_idx) = header_index(&table.headers, MARKET_HEADERS) else {
                    continue;
                };
                let detail_idx = header_index(&table.headers, DETAIL_HEADERS);
                for row in &table.rows {
                    let name = row.cells.get(name_idx).cloned().unwrap_or_default();
                    if name.is_empty() {
                        continue;
                    }
                    out.push(MarketRow {
                        name,
                        details: detail_idx.map(|idx| row.cells.get(idx).cloned().unwrap_or_default()),
                        cells: row.cells.clone(),
                        section: section.heading.clone(),
                        line: row.line,
                    });
                }
            }
        }
        out
    }

    /// Statistic names referenced by model sections, with their line
    pub fn model_statistics(&self) -> Vec<(String, usize)> {
        let mut out = Vec::new();
        for section in self.sections.iter().filter(|s| is_model_section(s)) {
            for table in &section.tables {
                let Some(idx) = header_index(&table.headers, MODEL_STAT_HEADERS) else {
                    continue;
                };
                for row in &table.rows {
                    let Some(cell) = row.cells.get(idx) else { continue };
                    for stat in split_list(cell) {
                        out.push((stat, row.line));
                    }
                }
            }
        }
        out
    }

    /// Markets this document defines that the catalog cannot resolve
    pub fn to_catalog_report(&self, catalog: &Catalog) -> Vec<LintFinding> {
        self.markets()
            .into_iter()
            .filter(|row| catalog.find_by_label(&row.name).is_none())
            .map(|row| LintFinding {
                severity: Severity::Warning,
                rule: "uncatalogued-market",
                document: self.title.clone(),
                line: row.line,
                message: format!("market '{}' is not in the catalog", row.name),
            })
            .collect()
    }
}

fn is_model_section(section: &Section) -> bool {
    let heading = fold_label(&section.heading);
    MODEL_SECTION.iter().any(|n| heading.contains(n))
}

fn split_list(cell: &str) -> Vec<String> {
    cell.split([',', ';'])
        .flat_map(|part| part.split(" y "))
        .map(|s| s.trim().trim_end_matches('.').trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Lint a set of documents, in reading order, against the builtin catalog
pub fn lint(docs: &[TaxonomyDocument]) -> Vec<LintFinding> {
    lint_with_catalog(docs, &Catalog::builtin())
}

pub fn lint_with_catalog(docs: &[TaxonomyDocument], catalog: &Catalog) -> Vec<LintFinding> {
    let mut findings = Vec::new();
    // (folded name, document, line) of every market seen so far
    let mut seen: Vec<(String, String, usize)> = Vec::new();
    // market rows of earlier documents count as "above"
    let mut earlier_rows: Vec<MarketRow> = Vec::new();

    for doc in docs {
        for section in &doc.sections {
            for line in &section.stray_rows {
                findings.push(LintFinding {
                    severity: Severity::Warning,
                    rule: "malformed-table",
                    document: doc.title.clone(),
                    line: *line,
                    message: "pipe row outside a table (missing separator row?)".to_string(),
                });
            }
            for table in &section.tables {
                for row in &table.rows {
                    if row.cells.len() != table.headers.len() {
                        findings.push(LintFinding {
                            severity: Severity::Warning,
                            rule: "ragged-row",
                            document: doc.title.clone(),
                            line: row.line,
                            message: format!(
                                "row has {} cells, header has {}",
                                row.cells.len(),
                                table.headers.len()
                            ),
                        });
                    }
                }
            }
        }

        let rows = doc.markets();
        for row in &rows {
            if matches!(&row.details, Some(d) if d.trim().is_empty() || d.trim() == "-") {
                findings.push(LintFinding {
                    severity: Severity::Error,
                    rule: "empty-options",
                    document: doc.title.clone(),
                    line: row.line,
                    message: format!("market '{}' has an empty Opciones/Estadísticas cell", row.name),
                });
            }

            let key = fold_label(&row.name);
            if let Some((_, first_doc, first_line)) = seen.iter().find(|(name, _, _)| *name == key) {
                findings.push(LintFinding {
                    severity: Severity::Warning,
                    rule: "duplicate-market",
                    document: doc.title.clone(),
                    line: row.line,
                    message: format!(
                        "market '{}' already defined at {}:{}",
                        row.name, first_doc, first_line
                    ),
                });
            } else {
                seen.push((key, doc.title.clone(), row.line));
            }
        }

        for (stat, line) in doc.model_statistics() {
            let above = earlier_rows
                .iter()
                .chain(rows.iter().filter(|r| r.line < line));
            if !statistic_mentioned(catalog, &stat, above) {
                findings.push(LintFinding {
                    severity: Severity::Error,
                    rule: "unknown-statistic",
                    document: doc.title.clone(),
                    line,
                    message: format!("statistic '{}' is not referenced by any market above", stat),
                });
            }
        }

        earlier_rows.extend(rows);
    }

    findings.sort_by(|a, b| {
        (a.document.as_str(), a.line, a.rule).cmp(&(b.document.as_str(), b.line, b.rule))
    });
    findings
}

/// A statistic counts as mentioned when its text, or any catalog alias of it,
/// appears in a cell of one of the rows
fn statistic_mentioned<'a>(
    catalog: &Catalog,
    stat: &str,
    mut rows: impl Iterator<Item = &'a MarketRow>,
) -> bool {
    let mut needles = vec![fold_label(stat)];
    if let Some(known) = catalog.find_statistic(stat) {
        needles.push(fold_label(known.name));
        needles.extend(known.aliases.iter().map(|a| fold_label(a)));
    }

    rows.any(|row| {
        row.cells.iter().skip(1).any(|cell| {
            let cell = fold_label(cell);
            needles.iter().any(|n| contains_term(&cell, n))
        })
    })
}

/// Substring match that refuses to match inside a longer word ("xg" in "xga")
fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.map(char::is_alphanumeric).unwrap_or(false)
            && !after.map(char::is_alphanumeric).unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
# Categorías de Apuestas

> Referencia de mercados de fútbol.

## Mercados Principales

| Mercado | Opciones | Estadísticas |
|---------|:--------:|--------------|
| Resultado Final (1X2) | Equipo 1, Empate, Equipo 2 | xG, ELO |
| **Ambos Equipos Marcan (BTTS)** | Sí, No | xG, xGA |
| Total de Córners | | Córners promedio |

## Modelos Predictivos Sugeridos

| Modelo | Estadísticas |
|--------|--------------|
| Poisson | xG, Goles esperados en contra |
| Regresión logística multinomial | ELO y Posesión |
";

    #[test]
    fn test_parse_sections_tables_notes() {
        let doc = parse(DOC);
        assert_eq!(doc.title, "Categorías de Apuestas");
        assert_eq!(doc.sections.len(), 3);
        assert_eq!(doc.sections[0].notes, vec!["Referencia de mercados de fútbol."]);
        let table = &doc.sections[1].tables[0];
        assert_eq!(table.headers, vec!["Mercado", "Opciones", "Estadísticas"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].cells[0], "Ambos Equipos Marcan (BTTS)");
        assert_eq!(table.rows[2].cells[1], "");
    }

    #[test]
    fn test_markets_skip_model_section() {
        let doc = parse(DOC);
        let markets = doc.markets();
        assert_eq!(markets.len(), 3);
        assert_eq!(markets[0].details.as_deref(), Some("Equipo 1, Empate, Equipo 2"));
    }

    #[test]
    fn test_lint_flags_empty_options_and_unknown_statistic() {
        let findings = lint(&[parse(DOC)]);
        let rules: Vec<_> = findings.iter().map(|f| f.rule).collect();
        assert!(rules.contains(&"empty-options"));

        // "Goles esperados en contra" resolves to xGA via the catalog alias
        let unknown: Vec<_> = findings
            .iter()
            .filter(|f| f.rule == "unknown-statistic")
            .collect();
        assert_eq!(unknown.len(), 1);
        assert!(unknown[0].message.contains("Posesión"));
    }

    #[test]
    fn test_duplicate_market_across_documents() {
        let first = parse("# A\n\n| Mercado | Opciones |\n|---|---|\n| Doble Oportunidad | 1X, 12, X2 |\n");
        let second = parse("# B\n\n| Mercado | Opciones |\n|---|---|\n| doble oportunidad | 1X, X2 |\n");
        let findings = lint(&[first, second]);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, "duplicate-market");
        assert_eq!(findings[0].document, "B");
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_escaped_pipe_and_ragged_row() {
        let doc = parse("| Mercado | Opciones |\n|---|---|\n| Par\\|Impar | Par, Impar |\n| Solo |\n");
        let table = &doc.sections[0].tables[0];
        assert_eq!(table.rows[0].cells[0], "Par|Impar");
        let findings = lint(&[doc]);
        assert!(findings.iter().any(|f| f.rule == "ragged-row" && f.line == 4));
    }

    #[test]
    fn test_stray_pipe_rows_reported() {
        let doc = parse("# T\n\n| not | a table |\ntext\n");
        let findings = lint(&[doc]);
        assert_eq!(findings[0].rule, "malformed-table");
        assert_eq!(findings[0].line, 3);
    }

    #[test]
    fn test_contains_term_respects_word_boundaries() {
        assert!(contains_term("xg, elo", "xg"));
        assert!(!contains_term("xga", "xg"));
        assert!(contains_term("goles esperados (xg)", "xg"));
    }

    #[test]
    fn test_catalog_report() {
        let doc = parse("# T\n\n| Mercado | Opciones |\n|---|---|\n| Apuesta inventada | A, B |\n| Doble Oportunidad | 1X, 12, X2 |\n");
        let report = doc.to_catalog_report(&Catalog::builtin());
        assert_eq!(report.len(), 1);
        assert!(report[0].message.contains("Apuesta inventada"));
    }
}

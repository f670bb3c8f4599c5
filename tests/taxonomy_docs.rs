use sports_predictor::catalog::Catalog;
use sports_predictor::taxonomy::{self, Severity};

const DOC: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/docs/betting_categories.md");

#[test]
fn bundled_taxonomy_is_clean() {
    let doc = taxonomy::load(DOC).expect("bundled document loads");
    let findings = taxonomy::lint(std::slice::from_ref(&doc));
    assert!(findings.is_empty(), "{:#?}", findings);
}

#[test]
fn bundled_markets_resolve_in_catalog() {
    let doc = taxonomy::load(DOC).unwrap();
    let catalog = Catalog::builtin();

    let markets = doc.markets();
    assert!(markets.len() >= 10);
    assert!(doc.to_catalog_report(&catalog).is_empty());
    assert!(!doc.model_statistics().is_empty());
}

#[test]
fn second_document_duplicates_are_reported() {
    let first = taxonomy::load(DOC).unwrap();
    let second = taxonomy::parse(
        "# Extra\n\n| Mercado | Opciones |\n|---|---|\n| Doble Oportunidad | 1X, 12, X2 |\n| Carrera a Córners | - |\n",
    );

    let findings = taxonomy::lint(&[first, second]);
    let rules: Vec<_> = findings.iter().map(|f| (f.rule, f.severity)).collect();
    assert!(rules.contains(&("duplicate-market", Severity::Warning)));
    assert!(rules.contains(&("empty-options", Severity::Error)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = taxonomy::load("does/not/exist.md").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.md"));
}

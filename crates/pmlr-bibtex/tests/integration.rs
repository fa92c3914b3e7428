//! Integration tests for pmlr-bibtex.
//!
//! Fixtures live in test-data/ within this crate.

use pmlr_bibtex::charmap::residual_non_ascii;
use pmlr_bibtex::{
    Error, FixOptions, Issue, NoopObserver, RecordKind, fix_bibtex, parse_bibtex, rewrite_quotes,
};
use std::fs;
use std::path::PathBuf;

/// Get the test-data directory path.
fn test_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

fn read_fixture(name: &str) -> String {
    fs::read_to_string(test_data_dir().join(name)).expect("Failed to read fixture")
}

const VENUE: &str = "@Proceedings{corl24, booktitle = {B}, name = {N}, shortname = {S},
  year = {2024}, editor = {E}, volume = {270}, start = {2024-11-06},
  end = {2024-11-09}, published = {2025-01-01}, address = {Munich},
  conference_url = {https://corl.org}}\n";

fn fix_default(source: &str) -> pmlr_bibtex::Result<(String, pmlr_bibtex::FixOutcome)> {
    fix_bibtex(source, &FixOptions::default(), &NoopObserver)
}

#[test]
fn test_fix_sample_delivery() {
    let (output, outcome) = fix_default(&read_fixture("corl2024.bib")).expect("Failed to fix sample");

    insta::assert_snapshot!(output, @r#"
    @Proceedings{corl2024,
        booktitle = {Proceedings of The 8th Conference on Robot Learning},
        name = {Conference on Robot Learning},
        shortname = {CoRL},
        year = {2024},
        editor = {Agrawal, Pulkit and Kroemer, Oliver and Burgard, Wolfram},
        volume = {270},
        start = {2024-11-06},
        end = {2024-11-09},
        published = {2025-01-14},
        address = {Munich, Germany},
        conference_url = {https://www.corl.org},
        conference_number = {8}
    }

    @InProceedings{muller24,
        title = {Learning ``Robust'' Grasps},
        author = {J{\"{u}}rgen M{\"{u}}ller and J\o{}rgen Olsen and Zo{\"{e}} {\~{N}}{\'{u}}{\~{n}}ez},
        pages = {1-15},
        abstract = {We study ``dexterous'' grasping---with 95\% success \& robust \textit{"sim-to-real"} transfer. The robot's policy uses a fine-tuned $\lambda$-schedule.},
        openreview = {abc123},
        software = {https://github.com/example/grasps}
    }

    @InProceedings{grosse24,
        title = {Gr{\"{o}}\ss{}e Matters: Scaling `Visuomotor' Policies},
        author = {Anna Gr{\"{o}}\ss{}e},
        pages = {16-30},
        abstract = {Scaling laws \ldots{} for robots.},
        video = {https://youtu.be/xyz}
    }

    @InProceedings{smith24,
        title = {A Paper Without an Abstract},
        author = {Jane Smith},
        pages = {31-40},
        software = {https://github.com/a/b and https://github.com/a/c}
    }
    "#);

    let changes: Vec<_> = outcome
        .id_changes
        .iter()
        .map(|(a, b)| (a.as_str(), b.as_str()))
        .collect();
    assert_eq!(changes, vec![("müller24", "muller24"), ("größe24", "grosse24")]);

    assert_eq!(
        outcome.issues.messages(),
        vec![
            "Missing or empty required field 'abstract' in entry smith24".to_string(),
            "Software field should contain a single valid URL in entry smith24".to_string(),
        ]
    );
}

#[test]
fn test_sample_output_is_ascii() {
    let (output, _) = fix_default(&read_fixture("corl2024.bib")).unwrap();
    let residual: Vec<char> = output.chars().filter(|c| !c.is_ascii()).collect();
    assert!(residual.is_empty(), "non-ASCII left in output: {residual:?}");
}

#[test]
fn test_output_reparses_to_fixed_records() {
    let (output, outcome) = fix_default(&read_fixture("corl2024.bib")).unwrap();
    let reparsed = parse_bibtex(&output).unwrap();
    assert_eq!(reparsed, outcome.records);

    // Fixing already-fixed output changes nothing.
    let (again, second) = fix_default(&output).unwrap();
    assert_eq!(again, output);
    assert!(second.id_changes.is_empty());
}

#[test]
fn test_quotes_and_dashes_in_title() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{A “smart” idea — really}}, author = {{X}},
          pages = {{1}}, abstract = {{Y}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    assert_eq!(
        outcome.records[1].get_text("title").as_deref(),
        Some("A ``smart'' idea --- really")
    );
}

#[test]
fn test_escape_region_is_preserved() {
    assert_eq!(rewrite_quotes(r#"\command{"quoted"}"#), r#"\command{"quoted"}"#);

    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{See \\emph{{\"this\"}} and \"that\"}},
          author = {{X}}, pages = {{1}}, abstract = {{Y}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    assert_eq!(
        outcome.records[1].get_text("title").as_deref(),
        Some(r#"See \emph{"this"} and ``that''"#)
    );
}

#[test]
fn test_typographic_quotes_inside_markup_are_converted() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{T}}, author = {{X}}, pages = {{1}},
          abstract = {{robust \\textit{{“sim-to-real”}} transfer}}}}"
    );
    let (output, outcome) = fix_default(&source).unwrap();
    let abstract_text = outcome.records[1].get_text("abstract").unwrap();
    assert_eq!(abstract_text, r"robust \textit{``sim-to-real''} transfer");
    assert!(residual_non_ascii(&output).is_empty());
}

#[test]
fn test_characters_inside_markup_arguments_are_mapped() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, author = {{X}}, pages = {{1}}, abstract = {{Y}},
          title = {{\\emph{{ﬁne Größe}} and \\textbf{{‘λ’}}}}}}"
    );
    let (output, outcome) = fix_default(&source).unwrap();
    assert_eq!(
        outcome.records[1].get_text("title").as_deref(),
        Some(r#"\emph{fine Gr{\"{o}}\ss{}e} and \textbf{`$\lambda$'}"#)
    );
    assert!(residual_non_ascii(&output).is_empty());
}

#[test]
fn test_author_list_quotes_and_accents_are_mapped() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{T}}, pages = {{1}}, abstract = {{Y}},
          author = {{José “Pepe” García and Łukasz Nowak and \\textit{{Zoë}} Ølund}}}}"
    );
    let (output, outcome) = fix_default(&source).unwrap();
    let authors = outcome.records[1].get_text("author").unwrap();
    assert!(authors.contains("``Pepe''"), "{authors}");
    assert!(residual_non_ascii(&authors).is_empty(), "{authors}");
    assert!(residual_non_ascii(&output).is_empty());
}

#[test]
fn test_quoted_name_with_accent_is_converted() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, author = {{X}}, pages = {{1}}, abstract = {{Y}},
          title = {{The \"Schrödinger\" Policy}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    assert_eq!(
        outcome.records[1].get_text("title").as_deref(),
        Some(r#"The ``Schr{\"{o}}dinger'' Policy"#)
    );
}

#[test]
fn test_zero_proceedings_produces_nothing() {
    let err = fix_default("@InProceedings{a24, title = {T}}").unwrap_err();
    assert!(matches!(err, Error::ProceedingsCount { found: 0 }));
}

#[test]
fn test_two_proceedings_produce_nothing() {
    let source = format!("{VENUE}{}", VENUE.replace("corl24", "corl24b"));
    let err = fix_default(&source).unwrap_err();
    assert!(matches!(err, Error::ProceedingsCount { found: 2 }));
    assert_eq!(err.to_string(), "Found 2 Proceedings entries, expected 1");
}

#[test]
fn test_missing_volume_names_the_field() {
    let source = VENUE.replace("volume = {270}, ", "");
    let err = fix_default(&source).unwrap_err();
    assert!(err.is_structural());
    assert!(err.to_string().contains("volume"), "{err}");
}

#[test]
fn test_missing_abstract_still_writes_every_record() {
    let source = format!(
        "{VENUE}
@InProceedings{{a24, title = {{A}}, author = {{X}}, pages = {{1}}, abstract = {{Y}}}}
@InProceedings{{b24, title = {{B}}, author = {{X}}, pages = {{2}}}}
@InProceedings{{c24, title = {{C}}, author = {{X}}, pages = {{3}}, abstract = {{Y}}}}"
    );
    let (output, outcome) = fix_default(&source).unwrap();

    assert_eq!(outcome.records.len(), 4);
    assert!(output.contains("@InProceedings{b24,"));
    assert_eq!(
        outcome.issues.iter().collect::<Vec<_>>(),
        vec![&Issue::MissingField {
            id: "b24".to_string(),
            field: "abstract".to_string()
        }]
    );
}

#[test]
fn test_field_order_in_output() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, video = {{v}}, note = {{n}}, abstract = {{A}},
          software = {{https://x.org}}, pages = {{1}}, section = {{Oral}},
          author = {{X}}, title = {{T}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    let paper = &outcome.records[1];
    assert_eq!(paper.kind, RecordKind::InProceedings);
    assert_eq!(
        paper.fields.keys().map(String::as_str).collect::<Vec<_>>(),
        vec!["title", "author", "pages", "abstract", "section", "software", "video", "note"]
    );
}

#[test]
fn test_identifier_collisions_in_encounter_order() {
    let source = format!(
        "{VENUE}
@InProceedings{{müller24, title = {{A}}, author = {{X}}, pages = {{1}}, abstract = {{Y}}}}
@InProceedings{{mûller24, title = {{B}}, author = {{X}}, pages = {{2}}, abstract = {{Y}}}}
@InProceedings{{muller24, title = {{C}}, author = {{X}}, pages = {{3}}, abstract = {{Y}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    let ids: Vec<_> = outcome.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["corl24", "muller24_1", "muller24_2", "muller24"]);
}

#[test]
fn test_abstract_specials_and_author_names() {
    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{50% & more}}, pages = {{1}},
          author = {{Jørgen Olsen and Ada Lovelace}},
          abstract = {{Gains of 50% & more, already escaped 10\\% \\& kept}}}}"
    );
    let (_, outcome) = fix_default(&source).unwrap();
    let paper = &outcome.records[1];
    assert_eq!(
        paper.get_text("abstract").as_deref(),
        Some(r"Gains of 50\% \& more, already escaped 10\% \& kept")
    );
    assert_eq!(paper.get_text("title").as_deref(), Some("50% & more"));
    assert_eq!(
        paper.get_text("author").as_deref(),
        Some(r"J\o{}rgen Olsen and Ada Lovelace")
    );
}

#[test]
fn test_custom_options_limit_normalized_fields() {
    let options = FixOptions {
        text_fields: vec!["title".to_string()],
        escape_special_fields: Vec::new(),
    };
    let source = format!(
        "{VENUE}@InProceedings{{a24, title = {{Café}}, author = {{X}}, pages = {{1}},
          abstract = {{Café 100%}}}}"
    );
    let (_, outcome) = fix_bibtex(&source, &options, &NoopObserver).unwrap();
    let paper = &outcome.records[1];
    assert_eq!(paper.get_text("title").as_deref(), Some(r"Caf{\'{e}}"));
    assert_eq!(paper.get_text("abstract").as_deref(), Some("Café 100%"));
}

#[test]
fn test_report_serializes_to_json() {
    let (_, outcome) = fix_default(&read_fixture("corl2024.bib")).unwrap();
    let issues = serde_json::to_value(&outcome.issues).unwrap();
    assert_eq!(issues[0]["kind"], "missing-field");
    assert_eq!(issues[0]["id"], "smith24");
    assert_eq!(issues[1]["kind"], "malformed-software-url");

    let changes = serde_json::to_value(&outcome.id_changes).unwrap();
    assert_eq!(changes["größe24"], "grosse24");
}

//! Emission behaviour: filesystem layout, atomic writes and fail-fast.

mod common;

use common::{source, FailAfter};
use indoc::indoc;
use patgen::commands::{self, CommandOutcome};
use patgen::cli::GenerateOptions;
use patgen::diagnostics::CollectingSink;
use patgen::io::{FsEmitter, SourceEmitter};
use patgen::model::Namespace;
use patgen::pipeline::Driver;
use patgen::synth::QualifiedName;
use patgen::PatgenConfig;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn three_declarations() -> Vec<patgen::io::SourceFile> {
    vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            #[patterns]
            impl Alpha { #[unapply] pub fn unapply_a(v: &Alpha) -> Option<()> { None } }

            #[patterns]
            impl Beta { #[unapply] pub fn unapply_b(v: &Beta) -> Option<()> { None } }

            #[patterns]
            impl Gamma { #[unapply] pub fn unapply_c(v: &Gamma) -> Option<()> { None } }
        "#},
    )]
}

#[test]
fn test_emission_failure_aborts_remaining_units() {
    let driver = Driver::from_config(&PatgenConfig::default()).unwrap();
    let mut emitter = FailAfter::new(1);

    let err = driver
        .run(three_declarations(), &mut emitter, &CollectingSink::new())
        .unwrap_err();

    assert!(err.is_emission());
    assert_eq!(err.to_string(), "Error writing BetaPatterns");
    let attempted: Vec<_> = emitter.attempted.iter().map(ToString::to_string).collect();
    assert_eq!(attempted, vec!["AlphaPatterns", "BetaPatterns"]);
    assert_eq!(emitter.written.len(), 1);
}

#[test]
fn test_fs_emitter_end_to_end() {
    let out = TempDir::new().unwrap();
    let driver = Driver::from_config(&PatgenConfig::default()).unwrap();
    let mut emitter = FsEmitter::new(out.path());

    let report = driver
        .run(three_declarations(), &mut emitter, &CollectingSink::new())
        .unwrap();

    assert_eq!(report.emitted_count(), 3);
    for name in ["AlphaPatterns", "BetaPatterns", "GammaPatterns"] {
        let text = fs::read_to_string(out.path().join(format!("{name}.rs"))).unwrap();
        assert!(text.contains(&format!("pub struct {name};")));
    }
    let leftovers: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_emitting_same_name_twice_fails() {
    let out = TempDir::new().unwrap();
    let mut emitter = FsEmitter::new(out.path());
    let name = QualifiedName::new(Namespace::parse("a"), "FooPatterns");

    emitter.emit(&name, "pub struct FooPatterns;\n").unwrap();
    let err = emitter.emit(&name, "pub struct Other;\n").unwrap_err();

    assert!(err.is_emission());
    assert_eq!(
        fs::read_to_string(out.path().join("a/FooPatterns.rs")).unwrap(),
        "pub struct FooPatterns;\n"
    );
}

#[test]
fn test_generate_command_over_a_crate_tree() {
    let project = TempDir::new().unwrap();
    let src = project.path().join("src");
    fs::create_dir_all(src.join("shapes")).unwrap();
    fs::write(src.join("lib.rs"), "pub mod shapes;\n").unwrap();
    fs::write(src.join("shapes/mod.rs"), "pub mod circle;\n").unwrap();
    fs::write(
        src.join("shapes/circle.rs"),
        indoc! {r#"
            pub struct Circle { pub radius: f64 }

            #[patterns]
            impl Circle {
                #[unapply]
                pub fn unapply_circle(value: &Circle) -> Option<(f64,)> { Some((value.radius,)) }
            }
        "#},
    )
    .unwrap();
    fs::create_dir_all(src.join("legacy")).unwrap();
    fs::write(
        src.join("legacy/old.rs"),
        "#[patterns] impl Old { #[unapply] pub fn unapply_old(v: &Old) -> Option<()> { None } }",
    )
    .unwrap();

    let out = project.path().join("generated");
    let options = GenerateOptions {
        exclude: vec!["**/legacy/**".to_string()],
        ..Default::default()
    };
    let outcome: CommandOutcome = commands::run_generate(&src, &out, &options).unwrap();

    assert!(outcome.is_success());
    let emitted: Vec<_> = outcome.emitted.iter().map(QualifiedName::dotted).collect();
    assert_eq!(emitted, vec!["shapes.circle.CirclePatterns"]);
    assert!(out.join("shapes/circle/CirclePatterns.rs").is_file());
    assert!(!out.join("legacy").exists());
}

#[test]
fn test_unparsable_source_is_fatal() {
    let project = TempDir::new().unwrap();
    let src = project.path().join("src");
    fs::create_dir_all(&src).unwrap();
    fs::write(src.join("lib.rs"), "pub fn broken( {").unwrap();

    let err = commands::run_check(&src, &GenerateOptions::default()).unwrap_err();
    assert!(err.to_string().contains("lib.rs"));
}

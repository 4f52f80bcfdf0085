//! End-to-end generation scenarios over in-memory sources.

mod common;

use common::{generate, generate_with, source};
use indoc::indoc;
use patgen::diagnostics::Severity;
use patgen::PatgenConfig;
use pretty_assertions::assert_eq;

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_option_declaration_yields_factories() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            #[patterns(name = "Option")]
            pub mod options {
                #[unapply]
                pub fn unapply_some<T: Clone>(value: &Option<T>) -> Option<(T,)> {
                    value.clone().map(|v| (v,))
                }

                #[unapply]
                pub fn unapply_none<T>(value: &Option<T>) -> Option<()> {
                    value.is_none().then_some(())
                }

                pub fn not_an_extractor() {}
            }
        "#},
    )]);

    assert!(run.report.is_ok());
    assert!(run.sink.diagnostics().is_empty());
    assert_eq!(run.names(), vec!["OptionPatterns"]);

    let text = run.unit("", "OptionPatterns").unwrap();
    assert!(text.starts_with("// @generated by patgen"));
    assert!(syn::parse_file(text).is_ok());

    let code = compact(text);
    assert!(code.contains("pubstructOptionPatterns;"));
    assert!(code.contains("pubfnsome<T:Clone,P1>(p1:P1"));
    assert!(code.contains("->::patgen::runtime::Pattern1<Option<T>,T,P1"));
    assert!(code.contains("options::unapply_some(value)"));
    assert!(code.contains("pubfnnone<T>()->::patgen::runtime::Pattern0<Option<T>>"));
    assert!(!code.contains("not_an_extractor"));
}

#[test]
fn test_wrong_arity_excludes_declaration() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            pub struct Bad;

            #[patterns]
            impl Bad {
                #[unapply]
                pub fn unapply_bad() -> Option<()> { None }
            }
        "#},
    )]);

    assert!(run.report.is_ok());
    assert!(run.units.is_empty());

    let errors = run.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, Some("wrong arity"));
    assert!(errors[0].message.starts_with("wrong arity"));
    assert_eq!(errors[0].attribution.function.as_deref(), Some("unapply_bad"));
    assert_eq!(errors[0].attribution.origin.line, 6);
}

#[test]
fn test_declaration_without_extractors_is_warned_and_skipped() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            pub struct Plain;

            #[patterns]
            impl Plain {
                pub fn helper(value: &Plain) -> Option<()> { None }
            }
        "#},
    )]);

    assert!(run.units.is_empty());
    let diagnostics = run.sink.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].message, "No #[unapply] functions found.");
}

#[test]
fn test_instance_bound_extractor_disqualifies_declaration() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            pub struct Point { x: i32, y: i32 }

            #[patterns]
            impl Point {
                #[unapply]
                pub fn unapply_point(value: &Point) -> Option<(i32, i32)> { Some((value.x, value.y)) }

                #[unapply]
                pub fn unapply_origin(&self) -> Option<()> { None }
            }
        "#},
    )]);

    assert!(run.units.is_empty());
    let rules: Vec<_> = run.errors().iter().filter_map(|d| d.rule).collect();
    assert_eq!(rules, vec!["instance-bound", "wrong arity"]);
}

#[test]
fn test_every_violated_rule_is_reported() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            pub struct Multi;

            #[patterns]
            impl Multi {
                #[unapply]
                async fn unapply_a(a: &mut Multi, b: u8) -> u8 { 0 }

                #[unapply]
                pub fn unapply_b(value: &Multi) -> Option<(u8, u8, u8, u8, u8, u8, u8, u8, u8)> { None }
            }
        "#},
    )]);

    assert!(run.units.is_empty());
    let mut rules: Vec<_> = run.errors().iter().filter_map(|d| d.rule).collect();
    rules.sort_unstable();
    assert_eq!(
        rules,
        vec![
            "arity too wide",
            "async",
            "mutable parameter",
            "not accessible",
            "return shape",
            "wrong arity",
        ]
    );
}

#[test]
fn test_namespace_is_preserved() {
    let run = generate(vec![source(
        "src/a/b.rs",
        "a::b",
        indoc! {r#"
            pub struct Foo(pub u8);

            #[patterns]
            impl Foo {
                #[unapply]
                pub fn unapply_foo(value: &Foo) -> Option<(u8,)> { Some((value.0,)) }
            }
        "#},
    )]);

    let names: Vec<_> = run.units.names();
    assert_eq!(names.len(), 1);
    assert_eq!(names[0].to_string(), "a::b::FooPatterns");
    assert_eq!(names[0].dotted(), "a.b.FooPatterns");
}

#[test]
fn test_placeholder_name_yields_bare_suffix() {
    let run = generate(vec![source(
        "src/matchers.rs",
        "matchers",
        indoc! {r#"
            #[patterns(name = "$")]
            pub mod helpers {
                #[unapply]
                pub fn unapply_even(value: &u32) -> Option<()> { (value % 2 == 0).then_some(()) }
            }
        "#},
    )]);

    assert_eq!(run.names(), vec!["matchers::Patterns"]);
    assert!(compact(run.unit("matchers", "Patterns").unwrap()).contains("pubstructPatterns;"));
}

#[test]
fn test_invalid_declaration_does_not_block_others() {
    let run = generate(vec![
        source(
            "src/good.rs",
            "good",
            indoc! {r#"
                #[patterns]
                impl Good {
                    #[unapply]
                    pub fn unapply_good(value: &Good) -> Option<()> { None }
                }
            "#},
        ),
        source(
            "src/bad.rs",
            "bad",
            indoc! {r#"
                #[patterns]
                impl Bad {
                    #[unapply]
                    pub fn unapply_bad(value: &Bad) -> bool { false }
                }
            "#},
        ),
    ]);

    assert_eq!(run.names(), vec!["good::GoodPatterns"]);
    assert_eq!(run.errors().len(), 1);
    assert_eq!(run.errors()[0].rule, Some("return shape"));
}

#[test]
fn test_configured_suffix_and_markers() {
    let config = PatgenConfig {
        suffix: "Cases".into(),
        patterns_marker: "matchable".into(),
        unapply_marker: "extract".into(),
        ..PatgenConfig::default()
    };
    let run = generate_with(
        &config,
        vec![source(
            "src/lib.rs",
            "",
            indoc! {r#"
                #[matchable]
                impl Token {
                    #[extract]
                    pub fn unapply_word(value: &Token) -> Option<(String,)> { None }
                }

                #[patterns]
                impl Ignored {
                    #[unapply]
                    pub fn unapply_x(value: &Ignored) -> Option<()> { None }
                }
            "#},
        )],
    );

    assert_eq!(run.names(), vec!["TokenCases"]);
}

#[test]
fn test_generated_unit_is_valid_rust_for_generic_impl() {
    let run = generate(vec![source(
        "src/tree.rs",
        "tree",
        indoc! {r#"
            pub enum Tree<T> { Leaf(T), Node(Box<Tree<T>>, Box<Tree<T>>) }

            #[patterns]
            impl<T: Clone> Tree<T> {
                #[unapply]
                pub fn unapply_leaf(value: &Self) -> Option<(T,)> {
                    match value { Tree::Leaf(v) => Some((v.clone(),)), _ => None }
                }

                #[unapply]
                pub fn unapply_node(value: &Self) -> Option<(Self, Self)> {
                    match value { Tree::Node(l, r) => Some(((**l).clone(), (**r).clone())), _ => None }
                }
            }
        "#},
    )]);

    let text = run.unit("tree", "TreePatterns").unwrap();
    assert!(syn::parse_file(text).is_ok());
    let code = compact(text);
    assert!(code.contains("pubfnleaf<T:Clone,P1>"));
    assert!(code.contains("Pattern2<Tree<T>,Tree<T>,Tree<T>,P1,P2"));
    assert!(!code.contains("Self"));
}

#[test]
fn test_non_path_self_type_is_reported_not_rendered() {
    let run = generate(vec![source(
        "src/lib.rs",
        "",
        indoc! {r#"
            #[patterns]
            impl (u8, u8) {
                #[unapply]
                pub fn unapply_pair(v: &(u8, u8)) -> Option<(u8, u8)> { Some(*v) }
            }

            #[patterns(name = "Pair")]
            impl (u16, u16) {
                #[unapply]
                pub fn unapply_pair(v: &(u16, u16)) -> Option<(u16, u16)> { Some(*v) }
            }
        "#},
    )]);

    assert!(run.report.is_ok());
    assert_eq!(run.names(), vec!["PairPatterns"]);
    let errors = run.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule, Some("unnamed self type"));
    assert_eq!(errors[0].attribution.origin.line, 2);
}

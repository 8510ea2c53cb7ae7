//! Property-based tests for the extraction pipeline
//!
//! Property: for any generated script, extraction SHALL yield exactly the
//! repositories and dependencies the script was rendered from, and printing
//! the parsed tree SHALL produce source that parses to the same structure.

use buildscan_core::{ConfigurationKind, DiagnosticKind, ExtractError, SyntaxError};
use buildscan_dsl::{
    extract, parse, pretty_print, same_structure, tokenize, Extractor, Statement,
    MAX_NESTING_DEPTH,
};
use buildscan_test_utils::assertions::*;
use buildscan_test_utils::generators::*;
use buildscan_test_utils::render_script;
use proptest::prelude::*;

// ============================================================================
// ARBITRATORS
// ============================================================================

/// Nested `name { ... }` blocks and `name(...)` calls, outermost first.
fn arb_nesting(max_depth: usize) -> impl Strategy<Value = String> {
    (
        prop::collection::vec(("[a-z][a-z0-9_]{0,6}", any::<bool>()), 1..=max_depth),
        "[a-z][a-z0-9_]{0,6}",
    )
        .prop_map(|(levels, innermost)| {
            let mut source = String::new();
            for (name, block) in &levels {
                source.push_str(name);
                source.push(if *block { '{' } else { '(' });
            }
            source.push_str(&innermost);
            for (_, block) in levels.iter().rev() {
                source.push(if *block { '}' } else { ')' });
            }
            source
        })
}

/// Source of a string literal mixing escaped characters and templates,
/// with the number of templates it contains.
fn arb_string_literal() -> impl Strategy<Value = (String, usize)> {
    let segment = prop_oneof![
        "[a-z ${}\"\\\\]{1,6}".prop_map(|text| {
            let escaped = text
                .replace('\\', "\\\\")
                .replace('"', "\\\"")
                .replace('$', "\\$");
            (escaped, 0usize)
        }),
        "[a-z][a-z0-9]{0,4}".prop_map(|name| (format!("${}", name), 1)),
        "[a-z][a-z0-9.]{0,6}".prop_map(|name| (format!("${{{}}}", name), 1)),
    ];
    prop::collection::vec(segment, 0..8).prop_map(|segments| {
        let count: usize = segments.iter().map(|(_, templates)| templates).sum();
        let body: String = segments.into_iter().map(|(text, _)| text).collect();
        (format!("\"{}\"", body), count)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_string_literal_round_trip((literal, templates) in arb_string_literal()) {
        let source = format!("val v = {}\n", literal);
        let script = parse(&source).unwrap();
        match &script.statements[0] {
            Statement::Declaration(declaration) => {
                let value = declaration.value.as_string().unwrap();
                prop_assert_eq!(value.templates.len(), templates);
            }
            other => prop_assert!(false, "expected declaration, got {:?}", other),
        }

        let printed = pretty_print(&script);
        let reparsed = parse(&printed).unwrap();
        prop_assert!(same_structure(&script, &reparsed));
        prop_assert_eq!(pretty_print(&reparsed), printed);
    }

    #[test]
    fn prop_nesting_is_parsed_or_rejected(source in arb_nesting(MAX_NESTING_DEPTH + 32)) {
        let depth = source.chars().filter(|c| *c == '{' || *c == '(').count();
        match parse(&source) {
            Ok(script) => {
                prop_assert!(depth <= MAX_NESTING_DEPTH);
                let reparsed = parse(&pretty_print(&script)).unwrap();
                prop_assert!(same_structure(&script, &reparsed));
            }
            Err(ExtractError::Syntax(SyntaxError::NestingTooDeep { limit, .. })) => {
                prop_assert!(depth > MAX_NESTING_DEPTH);
                prop_assert_eq!(limit, MAX_NESTING_DEPTH);
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    #[test]
    fn prop_generated_script_extracts_to_its_model(script in arb_script()) {
        let report = extract(&script.source).unwrap();

        assert_no_diagnostics(&report.diagnostics);
        prop_assert_eq!(&report.model.repositories, &script.repositories);
        assert_dependencies(&report.model, &script.dependencies);
    }

    #[test]
    fn prop_pretty_print_round_trip(script in arb_script()) {
        let parsed = parse(&script.source).unwrap();
        let printed = pretty_print(&parsed);
        let reparsed = parse(&printed).unwrap();

        prop_assert!(same_structure(&parsed, &reparsed));
        // Canonical form is a fixed point.
        prop_assert_eq!(pretty_print(&reparsed), printed);
    }

    #[test]
    fn prop_extraction_is_deterministic(script in arb_script()) {
        let extractor = Extractor::default();
        let sources = vec![script.source.clone(); 4];

        let first = extractor.extract(&script.source);
        for result in extractor.extract_batch(&sources) {
            prop_assert_eq!(&result, &first);
        }
    }

    #[test]
    fn prop_malformed_literal_is_a_diagnostic(
        configuration in arb_configuration_kind(),
        literal in arb_malformed_coordinate(),
    ) {
        let source = format!("dependencies {{\n\t{}(\"{}\")\n}}\n", configuration, literal);
        let report = extract(&source).unwrap();

        prop_assert!(report.model.dependencies.is_empty());
        prop_assert_eq!(report.diagnostics.len(), 1);
        let is_malformed = matches!(
            &report.diagnostics[0].kind,
            DiagnosticKind::MalformedCoordinate { literal: l, configuration: c, .. }
                if *l == literal && *c == configuration
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn prop_tokenizer_never_panics(source in "\\PC{0,200}") {
        // Either outcome is fine; only panics are failures.
        let _ = tokenize(&source);
        let _ = parse(&source);
    }
}

#[test]
fn test_diagnostics_do_not_hide_valid_declarations() {
    let dependencies = vec![(
        ConfigurationKind::Api,
        buildscan_test_utils::fixtures::coordinate("g:a:1"),
    )];
    let mut source = render_script(&[], &dependencies);
    source.push_str("dependencies {\n\tcompile(\"g:b:1\")\n\tapi(\"g:c:1\")\n}\n");

    let report = extract(&source).unwrap();
    let artifacts: Vec<&str> = report
        .model
        .dependencies
        .iter()
        .map(|d| d.coordinate.artifact.as_str())
        .collect();
    assert_eq!(artifacts, vec!["a", "c"]);
    assert_eq!(report.diagnostics.len(), 1);
}

#[test]
fn test_deep_nesting_fails_only_its_own_script() {
    let depth = 20_000;
    let nested = format!("{}{}", "a{".repeat(depth), "}".repeat(depth));
    let calls = format!("dependencies {{ api({}\"g:a:1\"{}) }}", "f(".repeat(depth), ")".repeat(depth));
    let sources = [
        nested.as_str(),
        buildscan_test_utils::fixtures::MIXED_REPOSITORIES_SCRIPT,
        calls.as_str(),
    ];

    let batch = Extractor::default().extract_batch(&sources);
    assert_structural_error(&batch[0]);
    assert!(matches!(
        batch[0],
        Err(ExtractError::Syntax(SyntaxError::NestingTooDeep { .. }))
    ));
    assert_eq!(batch[1].as_ref().unwrap().model.dependencies.len(), 5);
    assert!(matches!(
        batch[2],
        Err(ExtractError::Syntax(SyntaxError::NestingTooDeep { .. }))
    ));
}

//! End-to-end scenarios over [`parse_file`].

use crate::error::ErrorKind;
use crate::program::parse_file;
use crate::syntax::{ExprNode, Field, Literal, Proposition, Rule, Value};
use crate::FileResult;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn parse_main(source: &str) -> FileResult {
    parse_file(source, "main", &[]).expect("source should parse")
}

fn head_names(rules: &[Rule]) -> Vec<&str> {
    rules.iter().map(|r| r.head().predicate_name()).collect()
}

#[test]
fn conjunction_body() {
    let result = parse_main("Q(x) :- P(x), R(x);");
    assert_eq!(result.rules().len(), 1);
    let rule = &result.rules()[0];
    assert_eq!(rule.head().predicate_name(), "Q");
    let Some(Proposition::Conjunction(conjuncts)) = rule.body() else {
        panic!("expected a conjunction body");
    };
    assert_eq!(conjuncts.len(), 2);
    assert!(conjuncts
        .iter()
        .all(|c| matches!(c, Proposition::Predicate(_))));
}

#[test]
fn disjunction_expands_to_two_rules() {
    let result = parse_main("Q(x) :- P(x) | R(x);");
    assert_eq!(head_names(result.rules()), vec!["Q", "Q"]);
    for rule in result.rules() {
        let Some(Proposition::Conjunction(conjuncts)) = rule.body() else {
            panic!("expected a conjunction body");
        };
        assert_eq!(conjuncts.len(), 1);
    }
}

#[test]
fn aggregated_head_rewrites_to_a_call() {
    let result = parse_main("Q(y? Max= x) distinct :- P(x);");
    let rule = &result.rules()[0];
    assert!(rule.distinct_denoted());
    let fv = &rule.head().record().field_values()[0];
    assert_eq!(*fv.field(), Field::Name("y".to_string()));
    let Value::Expression(e) = fv.value() else {
        panic!("aggregation slot should be rewritten to an expression");
    };
    let ExprNode::Call(call) = e.node() else {
        panic!("expected an aggregating call");
    };
    assert_eq!(call.predicate_name(), "Max");
}

#[test]
fn negation_desugars_to_isnull_combine() {
    let result = parse_main("Q() :- ~P(x);");
    let Some(Proposition::Conjunction(conjuncts)) = result.rules()[0].body() else {
        panic!("expected a conjunction body");
    };
    let Proposition::Predicate(call) = &conjuncts[0] else {
        panic!("expected a predicate");
    };
    assert_eq!(call.predicate_name(), "IsNull");
    let Value::Expression(argument) = call.record().field_values()[0].value() else {
        panic!("expected expression");
    };
    let ExprNode::Combine(combine) = argument.node() else {
        panic!("expected a combine");
    };
    // After the aggregation rewrite the combine head carries Min(1).
    let Value::Expression(value) = combine.head().record().field_values()[0].value() else {
        panic!("expected rewritten aggregation");
    };
    assert!(matches!(value.node(), ExprNode::Call(c) if c.predicate_name() == "Min"));
}

#[test]
fn functor_rule_makes_a_predicate() {
    let result = parse_main("A := F(x: 1);");
    assert_eq!(head_names(result.rules()), vec!["@Make"]);
    let fields = result.rules()[0].head().record().field_values();
    let Value::Expression(target) = fields[0].value() else {
        panic!("expected expression");
    };
    assert!(matches!(
        target.node(),
        ExprNode::Literal(Literal::Predicate(n)) if n == "A"
    ));
}

#[test]
fn function_rule_yields_udf_annotation() {
    let result = parse_main("Inc(x) --> x + 1;");
    assert_eq!(head_names(result.rules()), vec!["@CompileAsUdf", "Inc"]);
    let fields = result.rules()[1].head().record().field_values();
    assert_eq!(
        *fields.last().unwrap().field(),
        Field::Name("logica_value".to_string())
    );
}

#[test]
fn denotations_become_annotations_before_the_rule() {
    let result = parse_main("Q(x) order_by(x) limit(5) :- P(x);");
    assert_eq!(head_names(result.rules()), vec!["@OrderBy", "@Limit", "Q"]);
    // Annotation arguments shift up to make room for the predicate.
    let limit_fields = result.rules()[1].head().record().field_values();
    assert_eq!(*limit_fields[1].field(), Field::Position(1));
}

#[test]
fn multi_body_aggregation_is_lifted() {
    let result = parse_main(
        "Q(key:, total? Sum= x) distinct :- P(key:, x:);\
         Q(key:, total? Sum= y) distinct :- R(key:, y:);",
    );
    assert_eq!(
        head_names(result.rules()),
        vec!["Q_MultBodyAggAux", "Q_MultBodyAggAux", "Q"]
    );
    assert!(result.rules()[2].distinct_denoted());
}

#[test]
fn comments_and_strings_do_not_split_statements() {
    let result = parse_main(
        "# a comment; with a semicolon\n\
         Q(x) :- P(x); /* another; comment */\n\
         R(y: \"term;inator\");",
    );
    assert_eq!(head_names(result.rules()), vec!["Q", "R"]);
}

#[test]
fn reserved_variables_are_rejected() {
    let err = parse_file("Q(x_bad) :- P(x_bad);", "main", &[]).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::ReservedVariable);
}

#[test]
fn incantation_unlocks_extended_operators() {
    let source = "Q(r: a --- b) :- P(a), P(b);";
    assert!(parse_file(source, "main", &[]).is_err());

    let incanted = format!(
        "# Signa inter verba conjugo, symbolum infixus evoco!\n{source}"
    );
    let result = parse_file(&incanted, "main", &[]).expect("extended operators enabled");
    let Value::Expression(e) = result.rules()[0].head().record().field_values()[0].value() else {
        panic!("expected expression");
    };
    assert!(matches!(e.node(), ExprNode::Call(c) if c.predicate_name() == "---"));
}

#[test]
fn imported_file_predicates_are_prefixed() {
    let result = parse_file(
        "Helper(x) :- Internal(x);\nInternal(x) :- Base(x: x);",
        "lib.util",
        &[],
    )
    .expect("library should parse");
    assert_eq!(result.predicates_prefix(), "Util_");
    for rule in result.rules() {
        let name = rule.head().predicate_name();
        assert!(
            name.starts_with("Util_") || name.starts_with('@') || name == "++?",
            "unprefixed predicate {name}"
        );
    }
}

// Filesystem-backed import scenarios.

fn write_files(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("mkdir");
        }
        fs::write(path, content).expect("write file");
    }
    dir
}

fn roots(dir: &TempDir) -> Vec<PathBuf> {
    vec![dir.path().to_path_buf()]
}

#[test]
fn import_renames_references_and_merges_rules() {
    let dir = write_files(&[("lib/util.l", "Helper(x: 7);")]);
    let result = parse_file(
        "import lib.util.Helper as H;\nQ(x) :- H(x:);",
        "main",
        &roots(&dir),
    )
    .expect("import should resolve");

    assert_eq!(head_names(result.rules()), vec!["Q", "Util_Helper"]);
    let rendered = result.to_string();
    assert!(rendered.contains("Util_Helper("));
    assert!(!rendered.contains("H("));

    assert_eq!(result.imported_predicates().len(), 1);
    assert_eq!(result.imported_predicates()[0].synonym(), Some("H"));
}

#[test]
fn imports_merge_in_discovery_order() {
    let dir = write_files(&[("one.l", "First(x: 1);"), ("two.l", "Second(x: 2);")]);
    let result = parse_file(
        "import one.First;\nimport two.Second;\n\
         Q(x) :- First(x:), Second(x:);",
        "main",
        &roots(&dir),
    )
    .expect("imports should resolve");
    assert_eq!(
        head_names(result.rules()),
        vec!["Q", "One_First", "Two_Second"]
    );
}

#[test]
fn transitive_imports_are_merged_at_top_level() {
    let dir = write_files(&[
        ("outer.l", "import inner.Base;\nWrapped(x) :- Base(x:);"),
        ("inner.l", "Base(x: 1);"),
    ]);
    let result = parse_file(
        "import outer.Wrapped;\nQ(x) :- Wrapped(x:);",
        "main",
        &roots(&dir),
    )
    .expect("imports should resolve");
    let names = head_names(result.rules());
    assert!(names.contains(&"Inner_Base"));
    assert!(names.contains(&"Outer_Wrapped"));
}

#[test]
fn circular_imports_name_the_chain() {
    let dir = write_files(&[
        ("cycle_a.l", "import cycle_b.B;\nA(x) :- B(x:);"),
        ("cycle_b.l", "import cycle_a.A;\nB(x) :- A(x:);"),
    ]);
    let err = parse_file(
        "import cycle_a.A;\nQ(x) :- A(x:);",
        "main",
        &roots(&dir),
    )
    .unwrap_err();
    let ErrorKind::CircularImport { chain } = err.kind() else {
        panic!("expected a circular import error, got {err}");
    };
    assert_eq!(chain, "main->cycle_a->cycle_b->cycle_a");
}

#[test]
fn missing_import_file_lists_considered_paths() {
    let dir = write_files(&[]);
    let err = parse_file("import no.Such;\nQ(x) :- Such(x:);", "main", &roots(&dir)).unwrap_err();
    let ErrorKind::ImportNotFound { considered } = err.kind() else {
        panic!("expected import-not-found, got {err}");
    };
    assert!(considered.contains("no.l"));
}

#[test]
fn unused_import_is_an_error() {
    let dir = write_files(&[("lib.l", "Helper(x: 7);")]);
    let err = parse_file("import lib.Helper;\nQ(x) :- P(x);", "main", &roots(&dir)).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UnusedImport { .. }));
}

#[test]
fn undefined_import_is_an_error() {
    let dir = write_files(&[("lib.l", "Helper(x: 7);")]);
    let err = parse_file(
        "import lib.Missing;\nQ(x) :- Missing(x:);",
        "main",
        &roots(&dir),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::UndefinedImport { .. }));
}

#[test]
fn duplicate_definition_across_files_is_an_error() {
    let dir = write_files(&[("lib.l", "Helper(x: 7);")]);
    let err = parse_file(
        "import lib.Helper;\nQ(x) :- Helper(x:);\nLib_Helper(x: 8);",
        "main",
        &roots(&dir),
    )
    .unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::DuplicateDefinition { .. }));
}

#[test]
fn second_root_is_searched_after_the_first() {
    let first = write_files(&[]);
    let second = write_files(&[("lib.l", "Helper(x: 7);")]);
    let result = parse_file(
        "import lib.Helper;\nQ(x) :- Helper(x:);",
        "main",
        &[first.path().to_path_buf(), second.path().to_path_buf()],
    )
    .expect("second root should match");
    assert!(head_names(result.rules()).contains(&"Lib_Helper"));
}

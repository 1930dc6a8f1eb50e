use std::{
    fs::{self},
    path::Path,
};

use minilang::{
    ast::Position,
    error::{Error, ErrorKind, LexError, ParseError, RuntimeError, SemanticError},
    execute, generate,
    interpreter::parser::core::MAX_NESTING_DEPTH,
    parse, run, run_to_string, tokenize,
};
use walkdir::WalkDir;

#[test]
fn sample_programs_match_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/programs").into_iter()
                                      .filter_map(Result::ok)
                                      .filter(|e| e.path().extension().is_some_and(|ext| ext == "mc"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected = expected_output(path);

        count += 1;
        match run_to_string(&source) {
            Ok(output) => assert_eq!(output, expected, "output of {path:?} differs"),
            Err(e) => panic!("Program {path:?} failed:\n{source}\nError: {e}"),
        }
    }

    assert!(count > 0, "No sample programs found in tests/programs");
}

fn expected_output(program: &Path) -> String {
    let path = program.with_extension("out");
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}

fn assert_output(src: &str, expected: &str) {
    match run_to_string(src) {
        Ok(output) => assert_eq!(output, expected, "unexpected output for {src:?}"),
        Err(e) => panic!("Program failed: {e}"),
    }
}

fn runtime_cause(err: &Error) -> &RuntimeError {
    match err {
        Error::Runtime(e) => e.root(),
        other => panic!("expected a runtime error, got {other}"),
    }
}

fn unchecked(src: &str) -> Result<String, RuntimeError> {
    let tokens = tokenize(src).unwrap();
    let tac = generate(&parse(&tokens).unwrap());
    let mut out = Vec::new();
    execute(&tac, &mut out).map(|()| String::from_utf8(out).unwrap())
}

fn assert_failure(src: &str, kind: ErrorKind) -> Error {
    match run_to_string(src) {
        Ok(output) => panic!("Program succeeded with output {output:?} but was expected to fail"),
        Err(e) => {
            assert_eq!(e.kind(), kind, "wrong error kind: {e}");
            e
        },
    }
}

#[test]
fn printing_and_numeric_formatting() {
    assert_output("start int x = 3; print(x); end", "3\n");
    assert_output("start float f = 3; print(f); end", "3.0\n");
    assert_output("start print(5 / 2); end", "2.5\n");
    assert_output("start print(4 / 2); end", "2.0\n");
    assert_output("start print(0.1 + 0.2); end", "0.30000000000000004\n");
    assert_output("start end", "");
}

#[test]
fn while_loop_counts() {
    assert_output("start int i = 0; while (i < 3) { print(i); i = i + 1; } end",
                  "0\n1\n2\n");
    assert_output("start int i = 0; while (i < 2) i = i + 1; print(i); end", "2\n");
    assert_output("start while (0) print(1); end", "");
}

#[test]
fn if_else_picks_one_branch() {
    assert_output("start if (1) print(1); else print(2); end", "1\n");
    assert_output("start if (0) print(1); else print(2); end", "2\n");
    assert_output("start if (0.0) print(1); end", "");
    assert_output("start int a = 2; if (a > 1) if (a > 5) print(5); else print(1); end",
                  "1\n");
}

#[test]
fn operator_precedence_and_associativity() {
    assert_output("start print(2 + 3 * 4); end", "14\n");
    assert_output("start print(10 - 4 - 3); end", "3\n");
    assert_output("start print(8 / 4 / 2); end", "1.0\n");
    assert_output("start print(-2 * 3); end", "-6\n");
    assert_output("start print(!0 + 1); end", "2\n");
    assert_output("start print(1 + 1 == 2); end", "1\n");
    assert_output("start print(--3); end", "3\n");
}

#[test]
fn shadowing_in_nested_blocks() {
    assert_output("start int a = 1; { float a = 2.5; print(a); } print(a); end",
                  "2.5\n1\n");
}

#[test]
fn declaration_sees_itself_zero_initialized() {
    assert_output("start int x = x + 1; print(x); end", "1\n");
    assert_output("start float f; print(f); end", "0.0\n");
}

#[test]
fn narrowing_is_rejected_statically() {
    let err = assert_failure("start int x = 1.5; end", ErrorKind::Semantic);
    assert!(matches!(err,
                     Error::Semantic(SemanticError::NarrowingAssignment { ref name, .. })
                     if name == "x"));
}

#[test]
fn integer_division_into_int_fails_at_run_time() {
    let err = assert_failure("start int x = 4 / 2; end", ErrorKind::Runtime);
    assert!(matches!(runtime_cause(&err), RuntimeError::NarrowingAssignment { .. }));
}

#[test]
fn duplicate_and_undeclared_names() {
    let err = assert_failure("start int a; int a; end", ErrorKind::Semantic);
    assert!(matches!(err,
                     Error::Semantic(SemanticError::DuplicateDeclaration { line: 1,
                                                                           column: 14,
                                                                           .. })));

    assert_failure("start print(y); end", ErrorKind::Semantic);
    assert_failure("start { int z = 1; } print(z); end", ErrorKind::Semantic);
}

#[test]
fn non_block_branch_declarations_are_scoped() {
    assert_failure("start if (1) int y = 2; print(y); end", ErrorKind::Semantic);
    assert_failure("start while (0) float w = 1; w = 2; end", ErrorKind::Semantic);
}

#[test]
fn lexical_errors_carry_positions() {
    let err = assert_failure("start\n  int x = 1 # 2;\nend", ErrorKind::Lexical);
    assert!(matches!(err,
                     Error::Lex(LexError::UnexpectedCharacter { character: '#',
                                                                line: 2,
                                                                column: 13 })));

    let err = assert_failure("start /* never closed\nend", ErrorKind::Lexical);
    assert!(matches!(err,
                     Error::Lex(LexError::UnterminatedComment { line: 1, column: 7 })));
}

#[test]
fn syntax_errors() {
    assert_failure("start int x = 1 end", ErrorKind::Syntactic);
    assert_failure("start print 1; end", ErrorKind::Syntactic);
    assert_failure("int x = 1; end", ErrorKind::Syntactic);
    assert_failure("start if (1) print(1);", ErrorKind::Syntactic);

    let err = assert_failure("start end print(1);", ErrorKind::Syntactic);
    assert!(matches!(err, Error::Parse(ParseError::UnexpectedTrailingTokens { .. })));
}

#[test]
fn runtime_arithmetic_faults() {
    let err = assert_failure("start print(1 / 0); end", ErrorKind::Runtime);
    assert!(matches!(runtime_cause(&err), RuntimeError::DivisionByZero));

    let err = assert_failure("start int x = 9223372036854775807; x = x + 1; end",
                             ErrorKind::Runtime);
    assert!(matches!(runtime_cause(&err), RuntimeError::Overflow));
}

#[test]
fn large_integers_widen_without_failing() {
    assert_output("start int big = 9007199254740993; print(big < 1.5); float f = big; print(f); \
                   end",
                  "0\n9007199254740992.0\n");
}

#[test]
fn runtime_errors_report_the_failing_construct() {
    let err = assert_failure("start\n  int a = 1;\n  print(a / 0);\nend", ErrorKind::Runtime);

    let Error::Runtime(runtime) = &err else {
        panic!("expected a runtime error, got {err}");
    };
    assert_eq!(runtime.position(), Some(Position::new(3, 11)));
    assert!(err.to_string().starts_with("Error on line 3, column 11:"));
}

#[test]
fn nesting_beyond_the_limit_is_a_syntax_error() {
    let deep = MAX_NESTING_DEPTH * 5;
    let source = format!("start print({}1{}); end", "(".repeat(deep), ")".repeat(deep));
    let err = assert_failure(&source, ErrorKind::Syntactic);
    assert!(matches!(err,
                     Error::Parse(ParseError::NestingTooDeep { limit, .. })
                     if limit == MAX_NESTING_DEPTH));

    let source = format!("start {}print(1);{} end", "{".repeat(deep), "}".repeat(deep));
    assert_failure(&source, ErrorKind::Syntactic);

    let source = format!("start print({}1); end", "-".repeat(deep));
    assert_failure(&source, ErrorKind::Syntactic);

    let source = format!("start print({}1{}); end", "(".repeat(50), ")".repeat(50));
    assert_output(&source, "1\n");
}

#[test]
fn output_before_runtime_error_is_kept() {
    let mut out = Vec::new();
    let err = run("start print(1); print(2 / 0); print(3); end", &mut out).unwrap_err();

    assert!(matches!(runtime_cause(&err), RuntimeError::DivisionByZero));
    assert_eq!(String::from_utf8(out).unwrap(), "1\n");
}

#[test]
fn unchecked_programs_are_still_guarded_by_the_machine() {
    let err = unchecked("start print(y); end").unwrap_err();
    assert!(matches!(err.root(), RuntimeError::UndeclaredVariable { name } if name == "y"));

    let err = unchecked("start int x = 2.5; end").unwrap_err();
    assert!(matches!(err.root(), RuntimeError::NarrowingAssignment { .. }));

    let err = unchecked("start int a; int a; end").unwrap_err();
    assert!(matches!(err.root(), RuntimeError::DuplicateDeclaration { name } if name == "a"));
    assert_eq!(err.position(), Some(Position::new(1, 14)));

    let err = unchecked("start if (1) int y = 2; print(y); end").unwrap_err();
    assert!(matches!(err.root(), RuntimeError::UndeclaredVariable { name } if name == "y"));

    assert_eq!(unchecked("start int a = 1; { int a = 2; print(a); } print(a); end").unwrap(),
               "2\n1\n");
}

#[test]
fn generation_is_deterministic() {
    let source = "start int i = 0; while (i < 3) { if (i == 1) print(i); i = i + 1; } end";
    let tokens = tokenize(source).unwrap();
    let program = parse(&tokens).unwrap();

    assert_eq!(generate(&program).to_string(), generate(&program).to_string());
}

use unindent::Unindent;

use super::*;

/// Asserts that `source` aborts with a message containing `needle`.
fn assert_aborts_with(source: &str, needle: &str) {
    let err = run(source).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains(needle), "unexpected error message: {msg}");
}

#[test]
fn missing_program_start_marker() {
    assert_aborts_with("VISIBLE 1 MKAY?\n", "expecting keyword HAI");
}

#[test]
fn missing_program_end_marker() {
    let source = r#"
        HAI
        VISIBLE 1 MKAY?
    "#
    .unindent();
    assert_aborts_with(&source, "expecting keyword KTHXBAI");
}

#[test]
fn block_comment_missing_its_terminator() {
    let source = r#"
        HAI
        OBTW this never ends
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "unexpected end of input, expecting keyword TLDR");
}

#[test]
fn duplicate_declaration_in_the_same_scope() {
    let source = r#"
        HAI
        I HAS A X
        I HAS A X
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "already declared");
}

#[test]
fn arity_mismatch() {
    let source = r#"
        HAI
        HOW DUZ I ADD YR X AN YR Y
        FOUND YR SUM OF X AN Y
        IF U SAY SO
        VISIBLE ADD 1 MKAY? MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "invalid number of arguments");
}

#[test]
fn gimmeh_requires_a_declared_variable() {
    let source = r#"
        HAI
        GIMMEH X
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "has not been declared");
}

#[test]
fn division_by_zero_is_fatal() {
    let source = r#"
        HAI
        VISIBLE QUOSHUNT OF 1 AN 0 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "division by zero");
}

#[test]
fn modulo_by_zero_is_fatal() {
    let source = r#"
        HAI
        VISIBLE MOD OF 1 AN 0 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "division by zero");
}

#[test]
fn arithmetic_rejects_non_numeric_operands() {
    let source = r#"
        HAI
        VISIBLE SUM OF "A" AN 1 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "invalid SUM operation on YARN and NUMBR");
}

#[test]
fn binary_operators_require_their_separator() {
    let source = r#"
        HAI
        VISIBLE SUM OF 1 2 MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "expected AN");
}

#[test]
fn unknown_cast_target() {
    let source = r#"
        HAI
        VISIBLE MAEK 1 A TROOP MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "unknown type");
}

#[test]
fn unparsable_cast_source() {
    let source = r#"
        HAI
        VISIBLE MAEK "ABC" A NUMBR MKAY?
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "cannot cast YARN");
}

#[test]
fn return_outside_a_function_is_fatal() {
    let source = r#"
        HAI
        FOUND YR 1
        KTHXBAI
    "#
    .unindent();
    assert_aborts_with(&source, "outside function");
}
